mod common;

use ipms_api::entities::purchase_order::OrderStatus;
use ipms_api::errors::ServiceError;
use ipms_api::services::purchase_orders::{
    NewOrder, OrderAction, OrderFilter, PurchaseOrderService,
};
use ipms_api::services::suppliers::{NewSupplier, SupplierFilter, SupplierService};

fn order(supplier: &str, item: &str, quantity: i32) -> NewOrder {
    NewOrder {
        supplier: supplier.to_string(),
        item: item.to_string(),
        quantity,
    }
}

#[tokio::test]
async fn orders_start_pending_and_change_only_via_actions() {
    let service = PurchaseOrderService::new(common::setup_db().await);
    let created = service.create(order("Acme", "Widget", 10)).await.unwrap();

    assert_eq!(created.status, OrderStatus::Pending);

    let approved = service
        .apply_action(created.id, OrderAction::Approve)
        .await
        .unwrap();
    assert_eq!(approved.status, OrderStatus::Approved);

    let rejected = service
        .apply_action(created.id, OrderAction::Reject)
        .await
        .unwrap();
    assert_eq!(rejected.status, OrderStatus::Rejected);
}

#[tokio::test]
async fn unknown_actions_do_not_parse() {
    assert_eq!(OrderAction::parse("approve"), Some(OrderAction::Approve));
    assert_eq!(OrderAction::parse("reject"), Some(OrderAction::Reject));
    assert_eq!(OrderAction::parse("ship"), None);
    assert_eq!(OrderAction::parse("APPROVE"), None);
    assert_eq!(OrderAction::parse(""), None);
}

#[tokio::test]
async fn order_quantity_must_be_positive() {
    let service = PurchaseOrderService::new(common::setup_db().await);
    let err = service.create(order("Acme", "Widget", 0)).await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn order_list_filters_and_status_is_case_insensitive() {
    let service = PurchaseOrderService::new(common::setup_db().await);
    let first = service.create(order("Acme", "Widget", 5)).await.unwrap();
    service.create(order("Globex", "Bolt", 2)).await.unwrap();

    service
        .apply_action(first.id, OrderAction::Approve)
        .await
        .unwrap();

    let filter = OrderFilter {
        status: Some("approved".to_string()),
        ..Default::default()
    };
    let approved = service.list(filter, 50, 0).await.unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].supplier, "Acme");

    let filter = OrderFilter {
        supplier: Some("Glo".to_string()),
        ..Default::default()
    };
    let by_supplier = service.list(filter, 50, 0).await.unwrap();
    assert_eq!(by_supplier.len(), 1);
    assert_eq!(by_supplier[0].item, "Bolt");
}

#[tokio::test]
async fn order_analytics_counts_per_status() {
    let service = PurchaseOrderService::new(common::setup_db().await);
    let a = service.create(order("Acme", "Widget", 1)).await.unwrap();
    service.create(order("Acme", "Bolt", 1)).await.unwrap();
    service.create(order("Globex", "Nut", 1)).await.unwrap();
    service
        .apply_action(a.id, OrderAction::Approve)
        .await
        .unwrap();

    let analytics = service.analytics().await.unwrap();
    let count_of = |status: &str| {
        analytics
            .status_distribution
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap_or(0)
    };
    assert_eq!(count_of("PENDING"), 2);
    assert_eq!(count_of("APPROVED"), 1);
    assert_eq!(count_of("REJECTED"), 0);
}

#[tokio::test]
async fn supplier_crud_and_analytics() {
    let db = common::setup_db().await;
    let suppliers = SupplierService::new(db.clone());
    let orders = PurchaseOrderService::new(db);

    let acme = suppliers
        .create(NewSupplier {
            name: "Acme".to_string(),
            contact_name: "Jo".to_string(),
            contact_email: "jo@acme.test".to_string(),
            contact_phone: "123".to_string(),
            address: "1 Main St".to_string(),
        })
        .await
        .unwrap();

    orders.create(order("Acme", "Widget", 1)).await.unwrap();
    orders.create(order("Acme", "Bolt", 2)).await.unwrap();
    orders.create(order("Globex", "Nut", 1)).await.unwrap();

    let analytics = suppliers.analytics().await.unwrap();
    assert_eq!(analytics.total_suppliers, 1);
    assert_eq!(analytics.top_suppliers[0].supplier, "Acme");
    assert_eq!(analytics.top_suppliers[0].order_count, 2);

    let filter = SupplierFilter {
        contact_email: Some("acme.test".to_string()),
        ..Default::default()
    };
    assert_eq!(suppliers.list(filter, 50, 0).await.unwrap().len(), 1);

    suppliers.delete(acme.id).await.unwrap();
    assert!(matches!(
        suppliers.delete(acme.id).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}
