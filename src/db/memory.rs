use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::store::{StockStore, StockTx};
use crate::error::StoreError;
use crate::models::ProductUnit;

type Units = IndexMap<String, ProductUnit>;

/// In-process store keyed by barcode, insertion ordered. Transactions hold
/// the lock and write to a staged copy that replaces the table on commit.
#[derive(Clone, Default)]
pub struct MemoryStockStore {
    units: Arc<Mutex<Units>>,
}

impl MemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `units`; a later unit with the same barcode
    /// replaces the earlier one
    pub fn with_units(units: impl IntoIterator<Item = ProductUnit>) -> Self {
        let map: Units = units
            .into_iter()
            .map(|u| (u.barcode.clone(), u))
            .collect();
        Self {
            units: Arc::new(Mutex::new(map)),
        }
    }
}

fn by_package(units: &Units, package_barcode: &str) -> Vec<ProductUnit> {
    units
        .values()
        .filter(|u| u.package_barcode == package_barcode)
        .cloned()
        .collect()
}

#[async_trait]
impl StockStore for MemoryStockStore {
    async fn all_units(&self) -> Result<Vec<ProductUnit>, StoreError> {
        Ok(self.units.lock().await.values().cloned().collect())
    }

    async fn units_by_barcode(&self, barcode: &str) -> Result<Vec<ProductUnit>, StoreError> {
        Ok(self.units.lock().await.get(barcode).cloned().into_iter().collect())
    }

    async fn units_by_package(
        &self,
        package_barcode: &str,
    ) -> Result<Vec<ProductUnit>, StoreError> {
        Ok(by_package(&*self.units.lock().await, package_barcode))
    }

    async fn begin(&self) -> Result<Box<dyn StockTx>, StoreError> {
        let guard = self.units.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryStockTx { guard, staged }))
    }
}

pub struct MemoryStockTx {
    guard: OwnedMutexGuard<Units>,
    staged: Units,
}

#[async_trait]
impl StockTx for MemoryStockTx {
    async fn units_by_barcode(&mut self, barcode: &str) -> Result<Vec<ProductUnit>, StoreError> {
        Ok(self.staged.get(barcode).cloned().into_iter().collect())
    }

    async fn units_by_package(
        &mut self,
        package_barcode: &str,
    ) -> Result<Vec<ProductUnit>, StoreError> {
        Ok(by_package(&self.staged, package_barcode))
    }

    async fn insert_unit(&mut self, unit: &ProductUnit) -> Result<(), StoreError> {
        if self.staged.contains_key(&unit.barcode) {
            return Err(StoreError::Rejected(format!(
                "duplicate barcode '{}'",
                unit.barcode
            )));
        }
        self.staged.insert(unit.barcode.clone(), unit.clone());
        Ok(())
    }

    async fn save_unit(&mut self, unit: &ProductUnit) -> Result<u64, StoreError> {
        match self.staged.get_mut(&unit.barcode) {
            Some(row) => {
                *row = unit.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn reset_stock(&mut self, warehouse: Option<&str>) -> Result<u64, StoreError> {
        let mut n = 0;
        for unit in self.staged.values_mut() {
            unit.in_stock = Some(false);
            unit.warehouse = warehouse.map(str::to_string);
            n += 1;
        }
        Ok(n)
    }

    async fn stock_package(
        &mut self,
        package_barcode: &str,
        warehouse: &str,
    ) -> Result<u64, StoreError> {
        let mut n = 0;
        for unit in self
            .staged
            .values_mut()
            .filter(|u| u.package_barcode == package_barcode)
        {
            unit.in_stock = Some(true);
            unit.warehouse = Some(warehouse.to_string());
            n += 1;
        }
        Ok(n)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryStockTx { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
