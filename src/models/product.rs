use serde::{Deserialize, Serialize};

use super::Entity;

/// Core product entity. `warehouse_id` is the back-reference to the owning
/// warehouse and is never part of the JSON representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Option<i32>,
    pub name: String,
    pub product_category: String,
    pub product_quantity: i32,
    pub product_unit: String,
    #[serde(skip)]
    pub warehouse_id: Option<i32>,
}

impl Product {
    /// A product that has not been stored yet and belongs to no warehouse.
    pub fn unassigned(params: ProductParams) -> Self {
        Self {
            id: None,
            name: params.name,
            product_category: params.product_category,
            product_quantity: params.product_quantity,
            product_unit: params.product_unit,
            warehouse_id: None,
        }
    }

    /// Same as [`Product::unassigned`], with the back-reference set.
    pub fn in_warehouse(params: ProductParams, warehouse_id: i32) -> Self {
        Self {
            warehouse_id: Some(warehouse_id),
            ..Self::unassigned(params)
        }
    }
}

impl Entity for Product {
    fn id(&self) -> Option<i32> {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }
}

// ── Request parameters ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductParams {
    pub name: String,
    pub product_category: String,
    pub product_quantity: i32,
    pub product_unit: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ProductParams {
        ProductParams {
            name: "Bolt".to_string(),
            product_category: "Hardware".to_string(),
            product_quantity: 500,
            product_unit: "pcs".to_string(),
        }
    }

    #[test]
    fn serializes_camel_case_without_back_reference() {
        let mut product = Product::in_warehouse(params(), 7);
        product.set_id(3);

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "name": "Bolt",
                "productCategory": "Hardware",
                "productQuantity": 500,
                "productUnit": "pcs",
            })
        );
        assert!(json.get("warehouseId").is_none());
    }

    #[test]
    fn unassigned_product_has_no_identity_or_owner() {
        let product = Product::unassigned(params());
        assert_eq!(product.id(), None);
        assert_eq!(product.warehouse_id, None);
    }

    #[test]
    fn params_use_request_parameter_names() {
        let uri: axum::http::Uri =
            "/?name=Bolt&productCategory=Hardware&productQuantity=500&productUnit=pcs"
                .parse()
                .unwrap();
        let axum::extract::Query(parsed) =
            axum::extract::Query::<ProductParams>::try_from_uri(&uri).unwrap();
        assert_eq!(parsed.name, "Bolt");
        assert_eq!(parsed.product_category, "Hardware");
        assert_eq!(parsed.product_quantity, 500);
    }
}
