mod common;

use chrono::{Days, Utc};

use ipms_api::services::audit::{AuditFilter, AuditService};

async fn seed(service: &AuditService) {
    service
        .append(
            Some(1),
            Some("alice".to_string()),
            "STOCK_OUT".to_string(),
            "InventoryItem".to_string(),
            "7".to_string(),
            "Stocked out 5 of 'Widget'".to_string(),
        )
        .await
        .unwrap();
    service
        .append(
            Some(2),
            Some("bob".to_string()),
            "CREATE".to_string(),
            "Supplier".to_string(),
            "3".to_string(),
            "Created supplier 'Acme'".to_string(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn filters_by_username_action_and_object_type() {
    let service = AuditService::new(common::setup_db().await);
    seed(&service).await;

    let filter = AuditFilter {
        user: Some("ali".to_string()),
        ..Default::default()
    };
    let logs = service.list(filter, 50, 0).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "STOCK_OUT");

    let filter = AuditFilter {
        object_type: Some("Supplier".to_string()),
        ..Default::default()
    };
    let logs = service.list(filter, 50, 0).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].username.as_deref(), Some("bob"));

    let filter = AuditFilter {
        action: Some("DOES_NOT_EXIST".to_string()),
        ..Default::default()
    };
    assert!(service.list(filter, 50, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn date_range_is_inclusive_of_the_end_date() {
    let service = AuditService::new(common::setup_db().await);
    seed(&service).await;

    let today = Utc::now().date_naive();
    let filter = AuditFilter {
        start_date: Some(today),
        end_date: Some(today),
        ..Default::default()
    };
    assert_eq!(service.list(filter, 50, 0).await.unwrap().len(), 2);

    let yesterday = today - Days::new(1);
    let filter = AuditFilter {
        end_date: Some(yesterday),
        ..Default::default()
    };
    assert!(service.list(filter, 50, 0).await.unwrap().is_empty());
}
