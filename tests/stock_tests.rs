//! Report, refresh and import through the service

mod common;

use common::{dec, service, service_with_reset_label, unit, FaultyStore};
use gts_stock::db::{MemoryStockStore, StockStore};
use gts_stock::models::{NewUnit, StockEntry};
use gts_stock::AppError;
use std::sync::Arc;

fn entry(package: &str, warehouse: &str) -> StockEntry {
    StockEntry {
        package_barcode: package.to_string(),
        warehouse: warehouse.to_string(),
    }
}

fn new_unit(barcode: &str, package: &str) -> NewUnit {
    NewUnit {
        barcode: barcode.to_string(),
        package_barcode: package.to_string(),
        pallet_barcode: Some("PAL-9".to_string()),
        shipment_number: None,
        delivery_number: None,
        batch_number: Some("LOT-2".to_string()),
        production_date: None,
        end_date: None,
    }
}

#[tokio::test]
async fn empty_store_reports_no_data() {
    let svc = service(Arc::new(MemoryStockStore::new()));
    assert!(matches!(svc.report().await, Err(AppError::NoData)));
}

#[tokio::test]
async fn all_complete_is_a_normal_report() {
    let store = MemoryStockStore::with_units(vec![unit("U1", "P1", Some(true))]);
    let report = service(Arc::new(store)).report().await.unwrap();
    assert!(report.packages[0].all_gts_done);
    assert_eq!(report.detailed_summary, "");
}

#[tokio::test]
async fn report_reflects_updates_immediately() {
    let store = MemoryStockStore::with_units(vec![
        unit("U1", "P1", Some(false)),
        unit("U2", "P1", Some(false)),
    ]);
    let svc = service(Arc::new(store));
    assert_eq!(svc.report().await.unwrap().packages[0].pending_amount, dec("0.5"));

    svc.update_units("U1", &gts_stock::models::UnitPatch::gts(None, true))
        .await
        .unwrap();
    assert_eq!(svc.report().await.unwrap().packages[0].pending_amount, dec("0.25"));
}

#[tokio::test]
async fn refresh_resets_then_stocks_listed_packages() {
    let mut stocked = unit("W1", "P3", Some(false));
    stocked.in_stock = Some(true);
    stocked.warehouse = Some("OLD".to_string());
    let store = MemoryStockStore::with_units(vec![
        unit("U1", "P1", Some(false)),
        unit("U2", "P1", Some(false)),
        unit("V1", "P2", Some(true)),
        stocked,
    ]);
    let svc = service(Arc::new(store.clone()));

    let outcome = svc
        .refresh_stock(&[entry("P1", "KADIKOY"), entry("P404", "KADIKOY")])
        .await
        .unwrap();
    assert_eq!(outcome.reset_units, 4);
    assert_eq!(outcome.matched_entries, 1);
    assert_eq!(outcome.updated_units, 2);
    assert_eq!(outcome.unmatched_entries, vec!["P404".to_string()]);

    for u in store.units_by_package("P1").await.unwrap() {
        assert_eq!(u.in_stock, Some(true));
        assert_eq!(u.warehouse.as_deref(), Some("KADIKOY"));
    }
    // absent from the run: out of stock, warehouse cleared
    let w1 = &store.units_by_barcode("W1").await.unwrap()[0];
    assert_eq!(w1.in_stock, Some(false));
    assert_eq!(w1.warehouse, None);

    let report = svc.report().await.unwrap();
    let p3 = report.packages.iter().find(|p| p.package_barcode == "P3").unwrap();
    assert_eq!(p3.warehouse, None);

    let by_warehouse = svc.warehouse_summary().await.unwrap();
    assert_eq!(by_warehouse.len(), 1);
    assert_eq!(by_warehouse[0].item_count, 2);
    assert_eq!(by_warehouse[0].total_amount, dec("0.5"));
}

#[tokio::test]
async fn configured_reset_label_replaces_warehouse() {
    let mut stocked = unit("W1", "P3", Some(false));
    stocked.in_stock = Some(true);
    stocked.warehouse = Some("OLD".to_string());
    let store = MemoryStockStore::with_units(vec![stocked, unit("U1", "P1", Some(false))]);
    let svc = service_with_reset_label(Arc::new(store.clone()), "ENDER");

    svc.refresh_stock(&[entry("P1", "KADIKOY")]).await.unwrap();

    let w1 = &store.units_by_barcode("W1").await.unwrap()[0];
    assert_eq!(w1.in_stock, Some(false));
    assert_eq!(w1.warehouse.as_deref(), Some("ENDER"));
    let u1 = &store.units_by_barcode("U1").await.unwrap()[0];
    assert_eq!(u1.warehouse.as_deref(), Some("KADIKOY"));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_stock() {
    let mut stocked = unit("U1", "P1", Some(false));
    stocked.in_stock = Some(true);
    stocked.warehouse = Some("OLD".to_string());
    let store = FaultyStore {
        inner: MemoryStockStore::with_units(vec![stocked, unit("V1", "P2", Some(false))]),
        fail_on: "P2".to_string(),
    };
    let inner = store.inner.clone();
    let svc = service(Arc::new(store));

    let result = svc.refresh_stock(&[entry("P2", "NEW")]).await;
    assert!(matches!(result, Err(AppError::Store(_))));

    let u1 = &inner.units_by_barcode("U1").await.unwrap()[0];
    assert_eq!(u1.in_stock, Some(true));
    assert_eq!(u1.warehouse.as_deref(), Some("OLD"));
}

#[tokio::test]
async fn import_inserts_with_defaults() {
    let store = MemoryStockStore::new();
    let svc = service(Arc::new(store.clone()));

    let outcome = svc
        .import_units(vec![new_unit("U1", "P1"), new_unit("U2", "P1")])
        .await
        .unwrap();
    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.updated, 0);

    let u1 = &store.units_by_barcode("U1").await.unwrap()[0];
    assert_eq!(u1.amount, Some(dec("0.25")));
    assert_eq!(u1.is_gts_done, Some(false));
    assert_eq!(u1.order_id.as_deref(), Some(""));
    assert_eq!(u1.batch_number.as_deref(), Some("LOT-2"));

    let report = svc.report().await.unwrap();
    assert_eq!(report.packages[0].pending_amount, dec("0.5"));
}

#[tokio::test]
async fn reimport_keeps_gts_state() {
    let store = MemoryStockStore::with_units(vec![unit("U1", "P1", Some(true))]);
    let svc = service(Arc::new(store.clone()));

    let outcome = svc.import_units(vec![new_unit("U1", "P9")]).await.unwrap();
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.inserted, 0);

    let u1 = &store.units_by_barcode("U1").await.unwrap()[0];
    assert_eq!(u1.package_barcode, "P9");
    assert_eq!(u1.pallet_barcode.as_deref(), Some("PAL-9"));
    assert_eq!(u1.is_gts_done, Some(true));
}

#[tokio::test]
async fn import_without_package_is_rejected() {
    let svc = service(Arc::new(MemoryStockStore::new()));
    let result = svc.import_units(vec![new_unit("U1", " ")]).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn csv_export_follows_report_order() {
    let store = MemoryStockStore::with_units(vec![
        unit("B1", "DONE", Some(true)),
        unit("A1", "OPEN", Some(false)),
    ]);
    let bytes = service(Arc::new(store)).export_csv().await.unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let rows: Vec<&str> = text.lines().skip(1).collect();
    assert!(rows[0].starts_with("OPEN,"));
    assert!(rows[1].starts_with("DONE,"));
}
