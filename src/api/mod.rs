pub mod handlers;

pub use handlers::*;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::service::StockService;

/// Every route of the service
pub fn router(service: Arc<StockService>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/products", get(products_report))
        .route("/api/products/export", get(export_products))
        .route("/api/products/import", post(import_products))
        .route("/api/get_gts_status/:barcode", get(gts_status))
        .route("/api/get_product_details/:barcode", get(product_details))
        .route("/api/update_product", post(update_product))
        .route("/api/stock/refresh", post(refresh_stock))
        .route("/stock/summary", get(stock_summary))
        .route("/stock/warehouse_summary", get(warehouse_summary))
        .with_state(service)
}
