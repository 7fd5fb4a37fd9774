//! Package aggregation over the full unit collection.
//!
//! Everything here is pure: callers load the units, these functions group
//! and total them. Nothing is cached between calls.

use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};
pub use crate::models::report::format_liters;
use crate::models::{
    PackageReport, PackageStockGroup, ProductUnit, StockReport, StockSummary, UnitDetail,
    WarehouseStock,
};

/// Fleet-wide counters collected while walking the packages
#[derive(Debug, Default)]
struct Totals {
    packages: usize,
    products: usize,
    gts_done: usize,
    gts_not_done: usize,
    pending_amount: BigDecimal,
    /// (package size, pending liters) -> number of packages
    signatures: BTreeMap<(usize, BigDecimal), usize>,
}

fn uniform<T: PartialEq + Clone>(mut values: impl Iterator<Item = T>) -> Option<T> {
    let first = values.next()?;
    values.all(|v| v == first).then_some(first)
}

/// Aggregate one package. `units` must be non-empty and share a package barcode.
fn package_report(package_barcode: &str, units: &[&ProductUnit]) -> PackageReport {
    let mut pending_amount = BigDecimal::zero();
    let mut warehouses: BTreeMap<String, usize> = BTreeMap::new();
    let mut in_stock_count = 0;

    for p in units {
        if !p.gts_done() {
            if let Some(amount) = &p.amount {
                pending_amount += amount;
            }
        }
        *warehouses
            .entry(p.warehouse.clone().unwrap_or_default())
            .or_insert(0) += 1;
        if p.is_in_stock() {
            in_stock_count += 1;
        }
    }

    PackageReport {
        package_barcode: package_barcode.to_string(),
        count: units.len(),
        warehouse: uniform(units.iter().map(|p| p.warehouse.clone())).flatten(),
        warehouses,
        in_stock: uniform(units.iter().map(|p| p.is_in_stock())),
        in_stock_count,
        pending_amount,
        all_gts_done: units.iter().all(|p| p.gts_done()),
        products: units.iter().map(|p| UnitDetail::from(*p)).collect(),
    }
}

/// Group units by package barcode, first appearance order
pub fn group_by_package(units: &[ProductUnit]) -> IndexMap<&str, Vec<&ProductUnit>> {
    let mut grouped: IndexMap<&str, Vec<&ProductUnit>> = IndexMap::new();
    for unit in units {
        grouped
            .entry(unit.package_barcode.as_str())
            .or_default()
            .push(unit);
    }
    grouped
}

/// Build the package report. `unit_label` is the per-unit volume shown in
/// the detailed summary (e.g. "0.25").
pub fn build_report(units: &[ProductUnit], unit_label: &str) -> AppResult<StockReport> {
    if units.is_empty() {
        return Err(AppError::NoData);
    }

    let mut totals = Totals::default();
    let mut packages = Vec::new();

    for (package_barcode, group) in group_by_package(units) {
        let package = package_report(package_barcode, &group);

        totals.packages += 1;
        totals.products += package.count;
        let done = group.iter().filter(|p| p.gts_done()).count();
        totals.gts_done += done;
        totals.gts_not_done += package.count - done;
        totals.pending_amount += &package.pending_amount;
        *totals
            .signatures
            .entry((package.count, package.pending_amount.clone()))
            .or_insert(0) += 1;

        packages.push(package);
    }

    // incomplete first, then smaller packages; stable for ties
    packages.sort_by_key(|p| (p.all_gts_done, p.count));

    Ok(StockReport {
        summary: fleet_summary(&totals),
        detailed_summary: detailed_summary(&totals, unit_label),
        packages,
    })
}

fn fleet_summary(totals: &Totals) -> String {
    format!(
        "{} packages hold {} GTS-barcoded units, {} lt left in the warehouse.\n\
         {} units have completed GTS. {} barcodes are still unprocessed.",
        totals.packages,
        totals.products,
        format_liters(&totals.pending_amount),
        totals.gts_done,
        totals.gts_not_done,
    )
}

fn detailed_summary(totals: &Totals, unit_label: &str) -> String {
    totals
        .signatures
        .iter()
        .rev()
        .filter(|((_, pending), _)| *pending > BigDecimal::zero())
        .map(|((size, pending), count)| {
            format!(
                "{} packages of {}x{} hold {} lt.",
                count,
                size,
                unit_label,
                format_liters(pending)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// In-stock totals per (package, warehouse)
pub fn stock_summary(units: &[ProductUnit]) -> StockSummary {
    let mut groups: BTreeMap<(String, Option<String>), (BigDecimal, usize)> = BTreeMap::new();
    for unit in units.iter().filter(|u| u.is_in_stock()) {
        let entry = groups
            .entry((unit.package_barcode.clone(), unit.warehouse.clone()))
            .or_insert_with(|| (BigDecimal::zero(), 0));
        if let Some(amount) = &unit.amount {
            entry.0 += amount;
        }
        entry.1 += 1;
    }

    let grouped_summary: Vec<PackageStockGroup> = groups
        .into_iter()
        .map(|((package_barcode, warehouse), (total_amount, count))| PackageStockGroup {
            package_barcode,
            warehouse,
            total_amount,
            count,
        })
        .collect();

    let total_amount_all = grouped_summary
        .iter()
        .fold(BigDecimal::zero(), |acc, g| acc + &g.total_amount);

    StockSummary {
        total_groups: grouped_summary.len(),
        total_amount_all,
        grouped_summary,
    }
}

/// In-stock totals per warehouse
pub fn warehouse_summary(units: &[ProductUnit]) -> Vec<WarehouseStock> {
    let mut groups: BTreeMap<Option<String>, (usize, BigDecimal)> = BTreeMap::new();
    for unit in units.iter().filter(|u| u.is_in_stock()) {
        let entry = groups
            .entry(unit.warehouse.clone())
            .or_insert_with(|| (0, BigDecimal::zero()));
        entry.0 += 1;
        if let Some(amount) = &unit.amount {
            entry.1 += amount;
        }
    }

    groups
        .into_iter()
        .map(|(warehouse, (item_count, total_amount))| WarehouseStock {
            warehouse,
            item_count,
            total_amount,
        })
        .collect()
}

/// Render the sorted package list as CSV
pub fn export_csv(packages: &[PackageReport]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "package_barcode",
        "count",
        "pending_amount",
        "all_gts_done",
        "warehouse",
        "in_stock_count",
    ])?;

    for p in packages {
        writer.write_record(&[
            p.package_barcode.clone(),
            p.count.to_string(),
            format_liters(&p.pending_amount),
            p.all_gts_done.to_string(),
            p.warehouse.clone().unwrap_or_default(),
            p.in_stock_count.to_string(),
        ])?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
