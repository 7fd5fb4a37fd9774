pub mod memory;
pub mod pool;
pub mod queries;
pub mod store;

pub use memory::MemoryStockStore;
pub use pool::{create_pool, run_migrations};
pub use queries::PgStockStore;
pub use store::{StockStore, StockTx};
