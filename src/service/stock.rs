use bigdecimal::BigDecimal;
use std::sync::Arc;

use super::report;
use crate::db::{StockStore, StockTx};
use crate::error::{AppError, AppResult};
use crate::models::{
    GtsStatus, ImportOutcome, NewUnit, ProductUnit, RefreshOutcome, ResolvedBy, StockEntry,
    StockReport, StockSummary, UnitPatch, UpdateOutcome, WarehouseStock,
};

/// Stock and GTS operations over a unit store
pub struct StockService {
    store: Arc<dyn StockStore>,
    unit_volume: BigDecimal,
    unit_label: String,
    reset_warehouse: Option<String>,
}

/// Units a barcode resolved to, and how
struct Resolved {
    by: ResolvedBy,
    units: Vec<ProductUnit>,
}

fn check_barcode(barcode: &str) -> AppResult<()> {
    if barcode.trim().is_empty() {
        return Err(AppError::BadRequest("barcode must not be empty".to_string()));
    }
    Ok(())
}

impl StockService {
    pub fn new(
        store: Arc<dyn StockStore>,
        unit_volume: BigDecimal,
        reset_warehouse: Option<String>,
    ) -> Self {
        let unit_label = report::format_liters(&unit_volume);
        Self {
            store,
            unit_volume,
            unit_label,
            reset_warehouse,
        }
    }

    /// Unit barcode first, package barcode second
    async fn resolve(&self, barcode: &str) -> AppResult<Resolved> {
        check_barcode(barcode)?;

        let units = self.store.units_by_barcode(barcode).await?;
        if !units.is_empty() {
            return Ok(Resolved { by: ResolvedBy::Unit, units });
        }

        let units = self.store.units_by_package(barcode).await?;
        if units.is_empty() {
            return Err(AppError::NotFound {
                barcode: barcode.to_string(),
                searched: ResolvedBy::Package,
            });
        }
        Ok(Resolved { by: ResolvedBy::Package, units })
    }

    /// Same resolution, inside an open transaction
    async fn resolve_in(tx: &mut dyn StockTx, barcode: &str) -> AppResult<Resolved> {
        let units = tx.units_by_barcode(barcode).await?;
        if !units.is_empty() {
            return Ok(Resolved { by: ResolvedBy::Unit, units });
        }

        let units = tx.units_by_package(barcode).await?;
        if units.is_empty() {
            return Err(AppError::NotFound {
                barcode: barcode.to_string(),
                searched: ResolvedBy::Package,
            });
        }
        Ok(Resolved { by: ResolvedBy::Package, units })
    }

    /// Package report over every unit in the store
    pub async fn report(&self) -> AppResult<StockReport> {
        let units = self.store.all_units().await?;
        let report = report::build_report(&units, &self.unit_label)?;
        tracing::info!(
            "Stock report built: {} units in {} packages",
            units.len(),
            report.packages.len()
        );
        Ok(report)
    }

    /// Package report as CSV bytes
    pub async fn export_csv(&self) -> AppResult<Vec<u8>> {
        let report = self.report().await?;
        Ok(report::export_csv(&report.packages)?)
    }

    pub async fn stock_summary(&self) -> AppResult<StockSummary> {
        let units = self.store.all_units().await?;
        Ok(report::stock_summary(&units))
    }

    pub async fn warehouse_summary(&self) -> AppResult<Vec<WarehouseStock>> {
        let units = self.store.all_units().await?;
        Ok(report::warehouse_summary(&units))
    }

    /// GTS state of a unit, or of a whole package (AND over its units)
    pub async fn gts_status(&self, barcode: &str) -> AppResult<GtsStatus> {
        let resolved = self.resolve(barcode).await?;
        let is_gts_done = match resolved.by {
            ResolvedBy::Unit => resolved.units[0].gts_done(),
            ResolvedBy::Package => resolved.units.iter().all(|u| u.gts_done()),
        };

        Ok(GtsStatus {
            barcode: barcode.to_string(),
            is_gts_done,
            resolved_by: resolved.by,
            unit_count: resolved.units.len(),
        })
    }

    pub async fn product_details(&self, barcode: &str) -> AppResult<Vec<ProductUnit>> {
        Ok(self.resolve(barcode).await?.units)
    }

    /// Apply `patch` to every unit the barcode resolves to, all or nothing
    pub async fn update_units(&self, barcode: &str, patch: &UnitPatch) -> AppResult<UpdateOutcome> {
        check_barcode(barcode)?;
        patch.validate().map_err(AppError::BadRequest)?;

        let mut tx = self.store.begin().await?;
        let resolved = Self::resolve_in(tx.as_mut(), barcode).await?;

        let mut updated = 0;
        for mut unit in resolved.units {
            patch.apply(&mut unit);
            // an error drops `tx`, rolling back the units already written
            updated += tx.save_unit(&unit).await?;
        }
        tx.commit().await?;

        let message = format!(
            "Updated {} of {} units (searched by {})",
            patch.field_names().join(", "),
            updated,
            resolved.by.as_str()
        );
        tracing::info!("{} for '{}'", message, barcode);

        Ok(UpdateOutcome {
            status: "success".to_string(),
            message,
            updated,
            resolved_by: resolved.by,
        })
    }

    /// Reset all stock, then stock each listed package at its warehouse
    pub async fn refresh_stock(&self, entries: &[StockEntry]) -> AppResult<RefreshOutcome> {
        let mut tx = self.store.begin().await?;

        let mut outcome = RefreshOutcome {
            reset_units: tx.reset_stock(self.reset_warehouse.as_deref()).await?,
            ..RefreshOutcome::default()
        };

        for entry in entries {
            let n = tx
                .stock_package(&entry.package_barcode, &entry.warehouse)
                .await?;
            if n == 0 {
                tracing::warn!("Refresh: package {} has no units", entry.package_barcode);
                outcome.unmatched_entries.push(entry.package_barcode.clone());
            } else {
                outcome.matched_entries += 1;
                outcome.updated_units += n;
            }
        }
        tx.commit().await?;

        tracing::info!(
            "Stock refresh done: reset {}, {} entries matched, {} unmatched, {} units stocked",
            outcome.reset_units,
            outcome.matched_entries,
            outcome.unmatched_entries.len(),
            outcome.updated_units
        );
        Ok(outcome)
    }

    /// Upsert units by barcode. New units start pending with the configured
    /// volume; re-imports only touch shipment metadata.
    pub async fn import_units(&self, units: Vec<NewUnit>) -> AppResult<ImportOutcome> {
        for unit in &units {
            check_barcode(&unit.barcode)?;
            if unit.package_barcode.trim().is_empty() {
                return Err(AppError::BadRequest(format!(
                    "unit '{}' has no package barcode",
                    unit.barcode
                )));
            }
        }

        let mut tx = self.store.begin().await?;
        let mut outcome = ImportOutcome::default();

        for new in units {
            let existing = tx.units_by_barcode(&new.barcode).await?;
            match existing.into_iter().next() {
                Some(mut unit) => {
                    unit.merge_metadata(&new);
                    tx.save_unit(&unit).await?;
                    outcome.updated += 1;
                }
                None => {
                    let unit = ProductUnit::from_new(new, &self.unit_volume);
                    tx.insert_unit(&unit).await?;
                    outcome.inserted += 1;
                }
            }
        }
        tx.commit().await?;

        tracing::info!(
            "Import done: {} inserted, {} updated",
            outcome.inserted,
            outcome.updated
        );
        Ok(outcome)
    }
}
