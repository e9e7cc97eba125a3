mod common;

use rust_decimal_macros::dec;

use ipms_api::entities::notification::NotificationKind;
use ipms_api::entities::payment_request::{PaymentStatus, PaymentType};
use ipms_api::errors::ServiceError;
use ipms_api::services::notifications::NotificationService;
use ipms_api::services::payments::{NewPaymentRequest, PaymentFilter, PaymentService};

fn payment(user_id: i32, amount: rust_decimal::Decimal) -> NewPaymentRequest {
    NewPaymentRequest {
        user_id,
        payment_type: PaymentType::OrderPayment,
        amount,
        currency: "GHS".to_string(),
        description: "test payment".to_string(),
        momo_phone: "0241234567".to_string(),
    }
}

#[tokio::test]
async fn notifications_are_scoped_and_broadcasts_are_shared() {
    let service = NotificationService::new(common::setup_db().await);
    service
        .create(Some(1), "personal".to_string(), NotificationKind::Info)
        .await
        .unwrap();
    service
        .create(None, "broadcast".to_string(), NotificationKind::Warning)
        .await
        .unwrap();

    let for_owner = service.list_for_user(1, 50, 0).await.unwrap();
    assert_eq!(for_owner.len(), 2);

    let for_other = service.list_for_user(2, 50, 0).await.unwrap();
    assert_eq!(for_other.len(), 1);
    assert_eq!(for_other[0].message, "broadcast");
}

#[tokio::test]
async fn only_the_owner_may_delete_a_personal_notification() {
    let service = NotificationService::new(common::setup_db().await);
    let personal = service
        .create(Some(1), "personal".to_string(), NotificationKind::Info)
        .await
        .unwrap();
    let broadcast = service
        .create(None, "broadcast".to_string(), NotificationKind::Info)
        .await
        .unwrap();

    let err = service.delete(personal.id, 2).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    service.delete(personal.id, 1).await.unwrap();
    service.delete(broadcast.id, 2).await.unwrap();
}

#[tokio::test]
async fn mark_all_read_reports_the_rows_it_touched() {
    let service = NotificationService::new(common::setup_db().await);
    service
        .create(Some(1), "one".to_string(), NotificationKind::Info)
        .await
        .unwrap();
    service
        .create(None, "two".to_string(), NotificationKind::Info)
        .await
        .unwrap();
    service
        .create(Some(2), "other user".to_string(), NotificationKind::Info)
        .await
        .unwrap();

    assert_eq!(service.mark_all_read(1).await.unwrap(), 2);
    // Second pass finds nothing unread.
    assert_eq!(service.mark_all_read(1).await.unwrap(), 0);
}

#[tokio::test]
async fn payment_requests_get_an_immutable_reference() {
    let service = PaymentService::new(
        common::setup_db().await,
        "https://pay.example.com/pay".to_string(),
    );
    let created = service.create_request(payment(1, dec!(25.50))).await.unwrap();

    assert!(created.reference_id.starts_with("IPMS-"));
    assert_eq!(created.status, PaymentStatus::Pending);
    assert!(created.completed_at.is_none());

    let (updated, old) = service
        .apply_webhook(
            &created.reference_id,
            Some("MOMO-123".to_string()),
            PaymentStatus::Completed,
        )
        .await
        .unwrap();
    assert_eq!(old, PaymentStatus::Pending);
    assert_eq!(updated.status, PaymentStatus::Completed);
    assert_eq!(updated.reference_id, created.reference_id);
    assert!(updated.completed_at.is_some());

    // The gateway transaction is recorded once, even if replayed.
    service
        .apply_webhook(
            &created.reference_id,
            Some("MOMO-123".to_string()),
            PaymentStatus::Completed,
        )
        .await
        .unwrap();
    let transactions = service.list_transactions(1, None).await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].external_transaction_id, "MOMO-123");
}

#[tokio::test]
async fn webhook_for_unknown_reference_is_not_found() {
    let service = PaymentService::new(
        common::setup_db().await,
        "https://pay.example.com/pay".to_string(),
    );
    let err = service
        .apply_webhook("IPMS-DEADBEEF", None, PaymentStatus::Failed)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn generated_links_embed_the_reference() {
    let service = PaymentService::new(
        common::setup_db().await,
        "https://pay.example.com/pay".to_string(),
    );
    let created = service.generate_link(payment(1, dec!(10))).await.unwrap();
    let url = created.payment_url.unwrap();
    assert!(url.starts_with("https://pay.example.com/pay?ref=IPMS-"));
    assert!(url.contains("&phone=0241234567"));
}

#[tokio::test]
async fn payments_are_scoped_to_their_owner() {
    let service = PaymentService::new(
        common::setup_db().await,
        "https://pay.example.com/pay".to_string(),
    );
    let mine = service.create_request(payment(1, dec!(5))).await.unwrap();
    service.create_request(payment(2, dec!(9))).await.unwrap();

    let listed = service
        .list_for_user(1, PaymentFilter::default(), 50, 0)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);

    assert!(service.get_for_user(mine.id, 2).await.unwrap().is_none());
    assert!(matches!(
        service.delete_for_user(mine.id, 2).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[tokio::test]
async fn analytics_totals_completed_amounts_only() {
    let service = PaymentService::new(
        common::setup_db().await,
        "https://pay.example.com/pay".to_string(),
    );
    let a = service.create_request(payment(1, dec!(10))).await.unwrap();
    service.create_request(payment(1, dec!(4))).await.unwrap();
    service
        .apply_webhook(&a.reference_id, None, PaymentStatus::Completed)
        .await
        .unwrap();

    let analytics = service.analytics(1).await.unwrap();
    assert_eq!(analytics.total_payments, 2);
    assert_eq!(analytics.completed_payments, 1);
    assert_eq!(analytics.pending_payments, 1);
    assert_eq!(analytics.total_amount, dec!(10));
}
