#![allow(dead_code)]

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use gts_stock::db::{MemoryStockStore, StockStore, StockTx};
use gts_stock::models::ProductUnit;
use gts_stock::{StockService, StoreError};
use std::str::FromStr;
use std::sync::Arc;

pub fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

pub fn unit(barcode: &str, package: &str, done: Option<bool>) -> ProductUnit {
    ProductUnit {
        barcode: barcode.to_string(),
        package_barcode: package.to_string(),
        pallet_barcode: Some("PAL-1".to_string()),
        shipment_number: Some("S-1".to_string()),
        delivery_number: Some("D-1".to_string()),
        batch_number: Some("B-1".to_string()),
        production_date: Some("2024-01-01".to_string()),
        end_date: Some("2026-01-01".to_string()),
        order_id: Some(String::new()),
        amount: Some(dec("0.25")),
        is_gts_done: done,
        warehouse: Some("ENDER".to_string()),
        in_stock: Some(false),
    }
}

pub fn service(store: Arc<dyn StockStore>) -> StockService {
    StockService::new(store, dec("0.25"), None)
}

/// Service whose refresh runs relabel reset units instead of clearing them
pub fn service_with_reset_label(store: Arc<dyn StockStore>, label: &str) -> StockService {
    StockService::new(store, dec("0.25"), Some(label.to_string()))
}

/// Memory store whose transactions refuse to write one barcode
pub struct FaultyStore {
    pub inner: MemoryStockStore,
    pub fail_on: String,
}

#[async_trait]
impl StockStore for FaultyStore {
    async fn all_units(&self) -> Result<Vec<ProductUnit>, StoreError> {
        self.inner.all_units().await
    }

    async fn units_by_barcode(&self, barcode: &str) -> Result<Vec<ProductUnit>, StoreError> {
        self.inner.units_by_barcode(barcode).await
    }

    async fn units_by_package(
        &self,
        package_barcode: &str,
    ) -> Result<Vec<ProductUnit>, StoreError> {
        self.inner.units_by_package(package_barcode).await
    }

    async fn begin(&self) -> Result<Box<dyn StockTx>, StoreError> {
        let inner = self.inner.begin().await?;
        Ok(Box::new(FaultyTx {
            inner,
            fail_on: self.fail_on.clone(),
        }))
    }
}

struct FaultyTx {
    inner: Box<dyn StockTx>,
    fail_on: String,
}

#[async_trait]
impl StockTx for FaultyTx {
    async fn units_by_barcode(&mut self, barcode: &str) -> Result<Vec<ProductUnit>, StoreError> {
        self.inner.units_by_barcode(barcode).await
    }

    async fn units_by_package(
        &mut self,
        package_barcode: &str,
    ) -> Result<Vec<ProductUnit>, StoreError> {
        self.inner.units_by_package(package_barcode).await
    }

    async fn insert_unit(&mut self, unit: &ProductUnit) -> Result<(), StoreError> {
        if unit.barcode == self.fail_on {
            return Err(StoreError::Rejected(format!("cannot write {}", unit.barcode)));
        }
        self.inner.insert_unit(unit).await
    }

    async fn save_unit(&mut self, unit: &ProductUnit) -> Result<u64, StoreError> {
        if unit.barcode == self.fail_on {
            return Err(StoreError::Rejected(format!("cannot write {}", unit.barcode)));
        }
        self.inner.save_unit(unit).await
    }

    async fn reset_stock(&mut self, warehouse: Option<&str>) -> Result<u64, StoreError> {
        self.inner.reset_stock(warehouse).await
    }

    async fn stock_package(
        &mut self,
        package_barcode: &str,
        warehouse: &str,
    ) -> Result<u64, StoreError> {
        if package_barcode == self.fail_on {
            return Err(StoreError::Rejected(format!("cannot stock {}", package_barcode)));
        }
        self.inner.stock_package(package_barcode, warehouse).await
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.inner.commit().await
    }
}
