use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Entity, Product};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: Option<i32>,
    pub name: String,
    pub address: String,
    pub postal_code: i32,
    pub city: String,
    pub country: String,
    /// Local server time at creation.
    #[sqlx(rename = "created_at")]
    pub timestamp: NaiveDateTime,
}

impl Warehouse {
    pub fn new(params: WarehouseParams) -> Self {
        Self {
            id: None,
            name: params.name,
            address: params.address,
            postal_code: params.postal_code,
            city: params.city,
            country: params.country,
            timestamp: Local::now().naive_local(),
        }
    }
}

impl Entity for Warehouse {
    fn id(&self) -> Option<i32> {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }
}

/// Warehouse joined with the products it owns, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseWithProducts {
    #[serde(flatten)]
    pub warehouse: Warehouse,
    pub products: Vec<Product>,
}

// ── Request parameters ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseParams {
    pub name: String,
    pub address: String,
    pub postal_code: i32,
    pub city: String,
    pub country: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn central() -> Warehouse {
        Warehouse {
            id: Some(1),
            name: "Central".to_string(),
            address: "1 Main St".to_string(),
            postal_code: 1010,
            city: "Vienna".to_string(),
            country: "Austria".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 4, 9)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn nested_products_are_flattened_next_to_warehouse_fields() {
        let view = WarehouseWithProducts {
            warehouse: central(),
            products: vec![Product {
                id: Some(2),
                name: "Bolt".to_string(),
                product_category: "Hardware".to_string(),
                product_quantity: 500,
                product_unit: "pcs".to_string(),
                warehouse_id: Some(1),
            }],
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["postalCode"], 1010);
        assert_eq!(json["country"], "Austria");
        assert_eq!(json["timestamp"], "2024-04-09T10:30:00");
        assert_eq!(json["products"][0]["name"], "Bolt");
        assert!(json["products"][0].get("warehouseId").is_none());
    }

    #[test]
    fn new_warehouse_is_unsaved() {
        let warehouse = Warehouse::new(WarehouseParams {
            name: "North".to_string(),
            address: "2 Side Rd".to_string(),
            postal_code: 4020,
            city: "Linz".to_string(),
            country: "Austria".to_string(),
        });
        assert_eq!(warehouse.id(), None);
        assert_eq!(warehouse.postal_code, 4020);
    }
}
