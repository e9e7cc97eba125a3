use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Outbound mail goes through an HTTP gateway as a JSON POST. Delivery is
/// fire-and-forget: a handler queues the message and moves on, and failures
/// are logged rather than surfaced to the caller.
#[derive(Clone)]
pub struct Mailer {
    inner: Arc<MailerInner>,
}

struct MailerInner {
    client: reqwest::Client,
    gateway_url: Option<String>,
    from: String,
}

#[derive(Debug, Clone, Serialize)]
struct OutboundEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

impl Mailer {
    pub fn new(gateway_url: Option<String>, from: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            inner: Arc::new(MailerInner {
                client,
                gateway_url,
                from,
            }),
        }
    }

    /// Queue a message for delivery on a background task.
    pub fn send_async(&self, to: String, subject: String, body: String) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.deliver(&to, &subject, &body).await;
        });
    }
}

impl MailerInner {
    #[instrument(skip(self, body))]
    async fn deliver(&self, to: &str, subject: &str, body: &str) {
        let Some(url) = self.gateway_url.as_deref() else {
            debug!(to, subject, "no mail gateway configured, dropping email");
            return;
        };

        let payload = OutboundEmail {
            from: &self.from,
            to,
            subject,
            body,
        };
        match self.client.post(url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(to, subject, "email handed to gateway");
            }
            Ok(resp) => {
                warn!(to, subject, status = %resp.status(), "mail gateway rejected email");
            }
            Err(err) => {
                warn!(to, subject, error = %err, "failed to reach mail gateway");
            }
        }
    }
}
