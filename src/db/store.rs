use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::ProductUnit;

/// Handle on the product-unit collection. Reads see committed state only.
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Every unit, in storage order
    async fn all_units(&self) -> Result<Vec<ProductUnit>, StoreError>;

    async fn units_by_barcode(&self, barcode: &str) -> Result<Vec<ProductUnit>, StoreError>;

    async fn units_by_package(&self, package_barcode: &str)
        -> Result<Vec<ProductUnit>, StoreError>;

    /// Open a write transaction. Dropping it without `commit` discards
    /// every write made through it.
    async fn begin(&self) -> Result<Box<dyn StockTx>, StoreError>;
}

/// Write scope over the collection
#[async_trait]
pub trait StockTx: Send {
    async fn units_by_barcode(&mut self, barcode: &str) -> Result<Vec<ProductUnit>, StoreError>;

    async fn units_by_package(&mut self, package_barcode: &str)
        -> Result<Vec<ProductUnit>, StoreError>;

    async fn insert_unit(&mut self, unit: &ProductUnit) -> Result<(), StoreError>;

    /// Write every column of `unit` onto the row with the same barcode,
    /// returns rows affected
    async fn save_unit(&mut self, unit: &ProductUnit) -> Result<u64, StoreError>;

    /// Mark every unit out of stock; `warehouse` replaces the label, `None`
    /// clears it
    async fn reset_stock(&mut self, warehouse: Option<&str>) -> Result<u64, StoreError>;

    /// Mark every unit of the package in stock at `warehouse`
    async fn stock_package(&mut self, package_barcode: &str, warehouse: &str)
        -> Result<u64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
