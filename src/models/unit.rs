use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Product unit (one bottle), row of the `products` table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ProductUnit {
    pub barcode: String,           // unit QR code
    pub package_barcode: String,   // carton the unit ships in
    pub pallet_barcode: Option<String>,
    pub shipment_number: Option<String>,
    pub delivery_number: Option<String>,
    pub batch_number: Option<String>,
    pub production_date: Option<String>,
    pub end_date: Option<String>,
    pub order_id: Option<String>,  // client order the unit was assigned to
    #[serde(serialize_with = "super::report::serialize_opt_liters")]
    pub amount: Option<BigDecimal>, // liters
    pub is_gts_done: Option<bool>,
    pub warehouse: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductUnit {
    /// Null counts as not done
    pub fn gts_done(&self) -> bool {
        self.is_gts_done.unwrap_or(false)
    }

    pub fn is_in_stock(&self) -> bool {
        self.in_stock.unwrap_or(false)
    }

    /// Build a fresh unit from an import record with the import defaults
    pub fn from_new(new: NewUnit, unit_volume: &BigDecimal) -> Self {
        Self {
            barcode: new.barcode,
            package_barcode: new.package_barcode,
            pallet_barcode: new.pallet_barcode,
            shipment_number: new.shipment_number,
            delivery_number: new.delivery_number,
            batch_number: new.batch_number,
            production_date: new.production_date,
            end_date: new.end_date,
            order_id: Some(String::new()),
            amount: Some(unit_volume.clone()),
            is_gts_done: Some(false),
            warehouse: None,
            in_stock: None,
        }
    }

    /// Overwrite the shipment metadata from a re-import, leaving GTS and
    /// stock state alone
    pub fn merge_metadata(&mut self, new: &NewUnit) {
        self.package_barcode = new.package_barcode.clone();
        self.pallet_barcode = new.pallet_barcode.clone();
        self.shipment_number = new.shipment_number.clone();
        self.delivery_number = new.delivery_number.clone();
        self.batch_number = new.batch_number.clone();
        self.production_date = new.production_date.clone();
        self.end_date = new.end_date.clone();
    }
}

/// Import record, keyed by barcode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUnit {
    pub barcode: String,
    pub package_barcode: String,
    #[serde(default)]
    pub pallet_barcode: Option<String>,
    #[serde(default)]
    pub shipment_number: Option<String>,
    #[serde(default)]
    pub delivery_number: Option<String>,
    #[serde(default)]
    pub batch_number: Option<String>,
    #[serde(default)]
    pub production_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// One line of a stock refresh run: this package sits in this warehouse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub package_barcode: String,
    pub warehouse: String,
}
