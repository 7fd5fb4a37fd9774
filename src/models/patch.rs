use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Deserializer, Serialize};

use super::ProductUnit;

/// Partial update for product units. Only the fields that are present get
/// merged onto the stored row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitPatch {
    /// `Some(None)` clears the order assignment, `None` leaves it untouched
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_gts_done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<BigDecimal>,
}

/// Maps a present JSON field (including `null`) to `Some(..)`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UnitPatch {
    /// Patch used by GTS completion: assign the order and set the flag
    pub fn gts(order_id: Option<String>, is_gts_done: bool) -> Self {
        Self {
            order_id: Some(order_id),
            is_gts_done: Some(is_gts_done),
            ..Self::default()
        }
    }

    /// Names of the fields this patch writes, in column order
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.order_id.is_some() {
            names.push("order_id");
        }
        if self.is_gts_done.is_some() {
            names.push("is_gts_done");
        }
        if self.warehouse.is_some() {
            names.push("warehouse");
        }
        if self.in_stock.is_some() {
            names.push("in_stock");
        }
        if self.amount.is_some() {
            names.push("amount");
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        self.order_id.is_none()
            && self.is_gts_done.is_none()
            && self.warehouse.is_none()
            && self.in_stock.is_none()
            && self.amount.is_none()
    }

    /// Reject patches that would write nothing or store a negative volume
    pub fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("update carries no fields".to_string());
        }
        if let Some(amount) = &self.amount {
            if *amount < BigDecimal::zero() {
                return Err(format!("amount must not be negative, got {}", amount));
            }
        }
        Ok(())
    }

    pub fn apply(&self, unit: &mut ProductUnit) {
        if let Some(order_id) = &self.order_id {
            unit.order_id = order_id.clone();
        }
        if let Some(done) = self.is_gts_done {
            unit.is_gts_done = Some(done);
        }
        if let Some(warehouse) = &self.warehouse {
            unit.warehouse = Some(warehouse.clone());
        }
        if let Some(in_stock) = self.in_stock {
            unit.in_stock = Some(in_stock);
        }
        if let Some(amount) = &self.amount {
            unit.amount = Some(amount.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn unit() -> ProductUnit {
        ProductUnit {
            barcode: "U1".to_string(),
            package_barcode: "P1".to_string(),
            pallet_barcode: None,
            shipment_number: None,
            delivery_number: None,
            batch_number: None,
            production_date: None,
            end_date: None,
            order_id: Some("ORD-1".to_string()),
            amount: Some(BigDecimal::from_str("0.25").unwrap()),
            is_gts_done: None,
            warehouse: Some("A".to_string()),
            in_stock: Some(true),
        }
    }

    #[test]
    fn absent_fields_are_left_alone() {
        let patch: UnitPatch = serde_json::from_str(r#"{"is_gts_done": true}"#).unwrap();
        let mut u = unit();
        patch.apply(&mut u);
        assert_eq!(u.is_gts_done, Some(true));
        assert_eq!(u.order_id.as_deref(), Some("ORD-1"));
        assert_eq!(u.warehouse.as_deref(), Some("A"));
    }

    #[test]
    fn explicit_null_clears_order() {
        let patch: UnitPatch = serde_json::from_str(r#"{"order_id": null}"#).unwrap();
        assert_eq!(patch.order_id, Some(None));
        let mut u = unit();
        patch.apply(&mut u);
        assert_eq!(u.order_id, None);
    }

    #[test]
    fn field_names_follow_present_fields() {
        assert_eq!(UnitPatch::gts(None, true).field_names(), vec!["order_id", "is_gts_done"]);
        let patch = UnitPatch {
            warehouse: Some("B".to_string()),
            ..UnitPatch::default()
        };
        assert_eq!(patch.field_names(), vec!["warehouse"]);
        assert!(UnitPatch::default().field_names().is_empty());
    }

    #[test]
    fn empty_patch_is_invalid() {
        let patch: UnitPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
        assert!(patch.validate().is_err());
    }

    #[test]
    fn negative_amount_is_invalid() {
        let patch = UnitPatch {
            amount: Some(BigDecimal::from_str("-1").unwrap()),
            ..UnitPatch::default()
        };
        assert!(patch.validate().is_err());
    }
}
