use crate::error::AppResult;
use crate::models::{
    GtsStatus, ImportOutcome, NewUnit, ProductUnit, RefreshOutcome, StockEntry, StockReport,
    StockSummary, UnitPatch, UpdateOutcome, WarehouseStock,
};
use crate::service::StockService;
use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body: barcode plus the fields to write
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub barcode: String,
    #[serde(flatten)]
    pub patch: UnitPatch,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub entries: Vec<StockEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub units: Vec<NewUnit>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Package report with both summaries
pub async fn products_report(
    State(service): State<Arc<StockService>>,
) -> AppResult<Json<StockReport>> {
    Ok(Json(service.report().await?))
}

/// Package report as a CSV download
pub async fn export_products(State(service): State<Arc<StockService>>) -> AppResult<Response> {
    let bytes = service.export_csv().await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"packages.csv\""),
        ],
        bytes,
    )
        .into_response())
}

pub async fn import_products(
    State(service): State<Arc<StockService>>,
    Json(req): Json<ImportRequest>,
) -> AppResult<Json<ImportOutcome>> {
    Ok(Json(service.import_units(req.units).await?))
}

pub async fn gts_status(
    State(service): State<Arc<StockService>>,
    Path(barcode): Path<String>,
) -> AppResult<Json<GtsStatus>> {
    Ok(Json(service.gts_status(&barcode).await?))
}

pub async fn product_details(
    State(service): State<Arc<StockService>>,
    Path(barcode): Path<String>,
) -> AppResult<Json<Vec<ProductUnit>>> {
    Ok(Json(service.product_details(&barcode).await?))
}

/// Set order id / GTS flag on a unit or on every unit of a package
pub async fn update_product(
    State(service): State<Arc<StockService>>,
    Json(req): Json<UpdateProductRequest>,
) -> AppResult<Json<UpdateOutcome>> {
    Ok(Json(service.update_units(&req.barcode, &req.patch).await?))
}

pub async fn refresh_stock(
    State(service): State<Arc<StockService>>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<RefreshOutcome>> {
    Ok(Json(service.refresh_stock(&req.entries).await?))
}

/// In-stock totals per package and warehouse
pub async fn stock_summary(
    State(service): State<Arc<StockService>>,
) -> AppResult<Json<StockSummary>> {
    Ok(Json(service.stock_summary().await?))
}

pub async fn warehouse_summary(
    State(service): State<Arc<StockService>>,
) -> AppResult<Json<Vec<WarehouseStock>>> {
    Ok(Json(service.warehouse_summary().await?))
}
