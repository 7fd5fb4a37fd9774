pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::{create_pool, MemoryStockStore, PgStockStore, StockStore};
pub use error::{AppError, AppResult, StoreError};
pub use service::StockService;
