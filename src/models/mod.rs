pub mod patch;
pub mod report;
pub mod unit;

pub use patch::UnitPatch;
pub use report::{
    GtsStatus, ImportOutcome, PackageReport, PackageStockGroup, RefreshOutcome, ResolvedBy,
    StockReport, StockSummary, UnitDetail, UpdateOutcome, WarehouseStock,
};
pub use unit::{NewUnit, ProductUnit, StockEntry};
