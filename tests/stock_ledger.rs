mod common;

use ipms_api::errors::ServiceError;
use ipms_api::services::inventory::{ImportRow, InventoryService, ItemFilter, NewItem};

fn item(name: &str, sku: &str, quantity: i32, reorder_level: i32) -> NewItem {
    NewItem {
        name: name.to_string(),
        sku: sku.to_string(),
        quantity,
        reorder_level,
    }
}

#[tokio::test]
async fn stock_out_hits_reorder_level_then_rejects_overdraw() {
    let service = InventoryService::new(common::setup_db().await);
    let created = service
        .create(item("Widget", "W-001", 50, 10))
        .await
        .unwrap();

    let after = service.stock_out(created.id, 45).await.unwrap();
    assert_eq!(after.quantity, 5);
    assert!(after.is_low_stock());

    let err = service.stock_out(created.id, 10).await.unwrap_err();
    assert!(matches!(err, ServiceError::InsufficientStock(_)));

    // A failed stock-out leaves the quantity untouched.
    let unchanged = service.get(created.id).await.unwrap().unwrap();
    assert_eq!(unchanged.quantity, 5);
}

#[tokio::test]
async fn stock_movements_never_go_negative() {
    let service = InventoryService::new(common::setup_db().await);
    let created = service.create(item("Bolt", "B-001", 3, 1)).await.unwrap();

    assert_eq!(service.stock_in(created.id, 7).await.unwrap().quantity, 10);
    assert_eq!(service.stock_out(created.id, 10).await.unwrap().quantity, 0);

    let err = service.stock_out(created.id, 1).await.unwrap_err();
    assert!(matches!(err, ServiceError::InsufficientStock(_)));
    assert_eq!(service.get(created.id).await.unwrap().unwrap().quantity, 0);

    // Stock-out of zero is a no-op, not an error.
    assert_eq!(service.stock_out(created.id, 0).await.unwrap().quantity, 0);
}

#[tokio::test]
async fn stock_movement_on_missing_item_is_not_found() {
    let service = InventoryService::new(common::setup_db().await);
    assert!(matches!(
        service.stock_in(999, 5).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        service.stock_out(999, 5).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[tokio::test]
async fn negative_amounts_are_rejected() {
    let service = InventoryService::new(common::setup_db().await);
    let created = service.create(item("Nut", "N-001", 5, 1)).await.unwrap();

    assert!(matches!(
        service.stock_in(created.id, -1).await.unwrap_err(),
        ServiceError::ValidationError(_)
    ));
    assert!(matches!(
        service.stock_out(created.id, -1).await.unwrap_err(),
        ServiceError::ValidationError(_)
    ));
}

#[tokio::test]
async fn low_stock_metric_tracks_every_mutation() {
    let service = InventoryService::new(common::setup_db().await);
    let a = service.create(item("A", "A-001", 20, 5)).await.unwrap();
    let b = service.create(item("B", "B-001", 4, 5)).await.unwrap();

    let metrics = service.metrics().await.unwrap();
    assert_eq!(metrics.total_items, 2);
    assert_eq!(metrics.low_stock, 1);

    service.stock_out(a.id, 16).await.unwrap();
    let metrics = service.metrics().await.unwrap();
    assert_eq!(metrics.low_stock, 2);

    service.stock_in(b.id, 10).await.unwrap();
    let metrics = service.metrics().await.unwrap();
    assert_eq!(metrics.low_stock, 1);
}

#[tokio::test]
async fn duplicate_sku_conflicts() {
    let service = InventoryService::new(common::setup_db().await);
    service.create(item("First", "DUP-1", 1, 0)).await.unwrap();
    let err = service
        .create(item("Second", "DUP-1", 1, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn csv_import_upserts_by_sku() {
    let service = InventoryService::new(common::setup_db().await);
    let existing = service
        .create(item("Old name", "KEEP-1", 2, 1))
        .await
        .unwrap();

    let rows = vec![
        ImportRow {
            sku: "KEEP-1".to_string(),
            name: "New name".to_string(),
            quantity: 30,
            reorder_level: 5,
        },
        ImportRow {
            sku: "NEW-1".to_string(),
            name: "Brand new".to_string(),
            quantity: 7,
            reorder_level: 2,
        },
    ];
    let summary = service.import_rows(rows).await.unwrap();
    assert_eq!(summary.created, 1);
    assert_eq!(summary.updated, 1);

    let updated = service.get(existing.id).await.unwrap().unwrap();
    assert_eq!(updated.name, "New name");
    assert_eq!(updated.quantity, 30);
    assert_eq!(updated.reorder_level, 5);

    let all = service
        .list(ItemFilter::default(), 50, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn csv_import_rejects_bad_rows() {
    let service = InventoryService::new(common::setup_db().await);

    let missing_sku = vec![ImportRow {
        sku: "  ".to_string(),
        name: "No sku".to_string(),
        quantity: 1,
        reorder_level: 0,
    }];
    assert!(matches!(
        service.import_rows(missing_sku).await.unwrap_err(),
        ServiceError::ValidationError(_)
    ));

    let negative = vec![ImportRow {
        sku: "NEG-1".to_string(),
        name: "Negative".to_string(),
        quantity: -3,
        reorder_level: 0,
    }];
    assert!(matches!(
        service.import_rows(negative).await.unwrap_err(),
        ServiceError::ValidationError(_)
    ));
}

#[tokio::test]
async fn list_filters_by_substring() {
    let service = InventoryService::new(common::setup_db().await);
    service
        .create(item("Steel bracket", "SB-01", 1, 0))
        .await
        .unwrap();
    service
        .create(item("Copper wire", "CW-01", 1, 0))
        .await
        .unwrap();

    let filter = ItemFilter {
        name: Some("bracket".to_string()),
        sku: None,
    };
    let found = service.list(filter, 50, 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].sku, "SB-01");
}
