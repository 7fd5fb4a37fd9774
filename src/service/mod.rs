pub mod report;
pub mod stock;

pub use stock::StockService;
