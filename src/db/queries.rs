use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::store::{StockStore, StockTx};
use crate::error::StoreError;
use crate::models::ProductUnit;

const UNIT_COLUMNS: &str = "barcode, package_barcode, pallet_barcode, shipment_number, \
    delivery_number, batch_number, production_date, end_date, order_id, amount, \
    is_gts_done, warehouse, in_stock";

/// Postgres-backed store over the `products` table
#[derive(Clone)]
pub struct PgStockStore {
    pool: PgPool,
}

impl PgStockStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StockStore for PgStockStore {
    async fn all_units(&self) -> Result<Vec<ProductUnit>, StoreError> {
        let units = sqlx::query_as::<_, ProductUnit>(&format!(
            "SELECT {} FROM products ORDER BY package_barcode, barcode",
            UNIT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(units)
    }

    async fn units_by_barcode(&self, barcode: &str) -> Result<Vec<ProductUnit>, StoreError> {
        let units = sqlx::query_as::<_, ProductUnit>(&format!(
            "SELECT {} FROM products WHERE barcode = $1",
            UNIT_COLUMNS
        ))
        .bind(barcode)
        .fetch_all(&self.pool)
        .await?;
        Ok(units)
    }

    async fn units_by_package(
        &self,
        package_barcode: &str,
    ) -> Result<Vec<ProductUnit>, StoreError> {
        let units = sqlx::query_as::<_, ProductUnit>(&format!(
            "SELECT {} FROM products WHERE package_barcode = $1 ORDER BY barcode",
            UNIT_COLUMNS
        ))
        .bind(package_barcode)
        .fetch_all(&self.pool)
        .await?;
        Ok(units)
    }

    async fn begin(&self) -> Result<Box<dyn StockTx>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgStockTx { tx }))
    }
}

/// Open Postgres transaction; sqlx rolls it back on drop
pub struct PgStockTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StockTx for PgStockTx {
    async fn units_by_barcode(&mut self, barcode: &str) -> Result<Vec<ProductUnit>, StoreError> {
        // FOR UPDATE keeps the resolved rows stable until commit
        let units = sqlx::query_as::<_, ProductUnit>(&format!(
            "SELECT {} FROM products WHERE barcode = $1 FOR UPDATE",
            UNIT_COLUMNS
        ))
        .bind(barcode)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(units)
    }

    async fn units_by_package(
        &mut self,
        package_barcode: &str,
    ) -> Result<Vec<ProductUnit>, StoreError> {
        let units = sqlx::query_as::<_, ProductUnit>(&format!(
            "SELECT {} FROM products WHERE package_barcode = $1 ORDER BY barcode FOR UPDATE",
            UNIT_COLUMNS
        ))
        .bind(package_barcode)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(units)
    }

    async fn insert_unit(&mut self, unit: &ProductUnit) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO products ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
            UNIT_COLUMNS
        ))
        .bind(&unit.barcode)
        .bind(&unit.package_barcode)
        .bind(&unit.pallet_barcode)
        .bind(&unit.shipment_number)
        .bind(&unit.delivery_number)
        .bind(&unit.batch_number)
        .bind(&unit.production_date)
        .bind(&unit.end_date)
        .bind(&unit.order_id)
        .bind(&unit.amount)
        .bind(unit.is_gts_done)
        .bind(&unit.warehouse)
        .bind(unit.in_stock)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn save_unit(&mut self, unit: &ProductUnit) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET package_barcode = $2,
                pallet_barcode = $3,
                shipment_number = $4,
                delivery_number = $5,
                batch_number = $6,
                production_date = $7,
                end_date = $8,
                order_id = $9,
                amount = $10,
                is_gts_done = $11,
                warehouse = $12,
                in_stock = $13
            WHERE barcode = $1
            "#,
        )
        .bind(&unit.barcode)
        .bind(&unit.package_barcode)
        .bind(&unit.pallet_barcode)
        .bind(&unit.shipment_number)
        .bind(&unit.delivery_number)
        .bind(&unit.batch_number)
        .bind(&unit.production_date)
        .bind(&unit.end_date)
        .bind(&unit.order_id)
        .bind(&unit.amount)
        .bind(unit.is_gts_done)
        .bind(&unit.warehouse)
        .bind(unit.in_stock)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn reset_stock(&mut self, warehouse: Option<&str>) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE products SET in_stock = FALSE, warehouse = $1")
            .bind(warehouse)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn stock_package(
        &mut self,
        package_barcode: &str,
        warehouse: &str,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE products SET in_stock = TRUE, warehouse = $2 WHERE package_barcode = $1",
        )
        .bind(package_barcode)
        .bind(warehouse)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
