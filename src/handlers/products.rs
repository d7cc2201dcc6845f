use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use super::Params;
use crate::{
    db::{CrudRepository, Storage},
    error::AppResult,
    models::{Product, ProductParams},
    AppState,
};

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn add_product<S: Storage>(
    State(state): State<AppState<S>>,
    Params(params): Params<ProductParams>,
) -> AppResult<String> {
    let product = state
        .db
        .products()
        .save(Product::unassigned(params))
        .await?;

    info!(id = ?product.id, name = %product.name, "Created product");

    Ok(format!("Product with the name {} saved!", product.name))
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn all_products<S: Storage>(
    State(state): State<AppState<S>>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.db.products().find_all().await?;
    info!(count = products.len(), "Listed products");
    Ok(Json(products))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

/// A missing product answers 200 with a JSON `null` body.
pub async fn get_product<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<i32>,
) -> AppResult<Json<Option<Product>>> {
    let product = state.db.products().find_by_id(id).await?;
    info!(id, found = product.is_some(), "Fetched product");
    Ok(Json(product))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::handlers::test_support::*;

    const BOLT: &str = "name=Bolt&productCategory=Hardware&productQuantity=500&productUnit=pcs";

    #[tokio::test]
    async fn add_then_list_includes_submitted_fields() {
        let app = app();

        let (status, body) = post_form(&app, "/products/add", BOLT).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Bolt"));

        let products = get_json(&app, "/products/all").await;
        let products = products.as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["name"], "Bolt");
        assert_eq!(products[0]["productCategory"], "Hardware");
        assert_eq!(products[0]["productQuantity"], 500);
        assert_eq!(products[0]["productUnit"], "pcs");
        assert!(products[0].get("warehouse").is_none());
        assert!(products[0].get("warehouseId").is_none());
    }

    #[tokio::test]
    async fn get_by_id_returns_the_product() {
        let app = app();
        post_form(&app, "/products/add", BOLT).await;

        let product = get_json(&app, "/products/1").await;
        assert_eq!(product["id"], 1);
        assert_eq!(product["name"], "Bolt");
    }

    #[tokio::test]
    async fn unknown_id_is_empty_not_an_error() {
        let app = app();
        let (status, body) = get(&app, "/products/999").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "null");
    }

    #[tokio::test]
    async fn non_integer_id_is_rejected() {
        let app = app();
        let (status, _) = get(&app, "/products/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn no_validation_beyond_types() {
        let app = app();
        let (status, body) = post_form(
            &app,
            "/products/add",
            "name=&productCategory=&productQuantity=-4&productUnit=",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Product with the name  saved!");

        let product = get_json(&app, "/products/1").await;
        assert_eq!(product["productQuantity"], -4);
    }
}
