use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

use super::ProductUnit;

/// Liters as a human would write them: no trailing zeros
pub fn format_liters(value: &BigDecimal) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    let n = value.normalized();
    if n.is_integer() {
        n.with_scale(0).to_string()
    } else {
        n.to_string()
    }
}

/// Decimal out as a normalized string, whatever scale the store returned
pub fn serialize_liters<S: Serializer>(value: &BigDecimal, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_liters(value))
}

pub fn serialize_opt_liters<S: Serializer>(
    value: &Option<BigDecimal>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize_liters(v, s),
        None => s.serialize_none(),
    }
}

/// Per-unit line inside a package entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDetail {
    pub barcode: String,
    pub warehouse: Option<String>,
    pub order_id: Option<String>,
    pub is_gts_done: Option<bool>,
    pub in_stock: Option<bool>,
    #[serde(serialize_with = "serialize_opt_liters")]
    pub amount: Option<BigDecimal>,
}

impl From<&ProductUnit> for UnitDetail {
    fn from(p: &ProductUnit) -> Self {
        Self {
            barcode: p.barcode.clone(),
            warehouse: p.warehouse.clone(),
            order_id: p.order_id.clone(),
            is_gts_done: p.is_gts_done,
            in_stock: p.in_stock,
            amount: p.amount.clone(),
        }
    }
}

/// One package (carton) of the stock report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageReport {
    pub package_barcode: String,
    pub count: usize,
    /// Set only when every unit carries the same label
    pub warehouse: Option<String>,
    /// Units per warehouse label, unlabelled units under ""
    pub warehouses: BTreeMap<String, usize>,
    /// Set only when every unit agrees
    pub in_stock: Option<bool>,
    pub in_stock_count: usize,
    #[serde(serialize_with = "serialize_liters")]
    pub pending_amount: BigDecimal,
    pub all_gts_done: bool,
    pub products: Vec<UnitDetail>,
}

/// `/api/products` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReport {
    pub summary: String,
    pub detailed_summary: String,
    pub packages: Vec<PackageReport>,
}

/// In-stock totals for one (package, warehouse) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageStockGroup {
    pub package_barcode: String,
    pub warehouse: Option<String>,
    #[serde(serialize_with = "serialize_liters")]
    pub total_amount: BigDecimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSummary {
    pub grouped_summary: Vec<PackageStockGroup>,
    pub total_groups: usize,
    #[serde(serialize_with = "serialize_liters")]
    pub total_amount_all: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseStock {
    pub warehouse: Option<String>,
    pub item_count: usize,
    #[serde(serialize_with = "serialize_liters")]
    pub total_amount: BigDecimal,
}

/// How a barcode was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedBy {
    Unit,
    Package,
}

impl ResolvedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedBy::Unit => "barcode",
            ResolvedBy::Package => "package barcode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GtsStatus {
    pub barcode: String,
    pub is_gts_done: bool,
    pub resolved_by: ResolvedBy,
    pub unit_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub status: String,
    pub message: String,
    pub updated: u64,
    pub resolved_by: ResolvedBy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    pub reset_units: u64,
    pub matched_entries: usize,
    pub unmatched_entries: Vec<String>,
    pub updated_units: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub inserted: usize,
    pub updated: usize,
}
