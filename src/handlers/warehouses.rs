use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, warn};

use super::Params;
use crate::{
    db::{CrudRepository, ProductRepository, Storage},
    error::AppResult,
    models::{Product, ProductParams, Warehouse, WarehouseParams, WarehouseWithProducts},
    AppState,
};

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn add_warehouse<S: Storage>(
    State(state): State<AppState<S>>,
    Params(params): Params<WarehouseParams>,
) -> AppResult<String> {
    let warehouse = state.db.warehouses().save(Warehouse::new(params)).await?;

    info!(id = ?warehouse.id, name = %warehouse.name, "Created warehouse");

    Ok(format!("Warehouse with the name {} saved!", warehouse.name))
}

// ── Attach product ────────────────────────────────────────────────────────────

/// Creates a product owned by warehouse `id`. The product row carries the
/// owner reference, so it is the only write.
pub async fn add_product_to_warehouse<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<i32>,
    Params(params): Params<ProductParams>,
) -> AppResult<String> {
    let Some(warehouse) = state.db.warehouses().find_by_id(id).await? else {
        warn!(id, "Warehouse not found, product not added");
        return Ok(format!("Warehouse with ID {} not found!", id));
    };

    let product = state
        .db
        .products()
        .save(Product::in_warehouse(params, id))
        .await?;

    info!(
        warehouse_id = id,
        product_id = ?product.id,
        name = %product.name,
        "Added product to warehouse"
    );

    Ok(format!(
        "Product {} added to warehouse {}",
        product.name, warehouse.name
    ))
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn all_warehouses<S: Storage>(
    State(state): State<AppState<S>>,
) -> AppResult<Json<Vec<WarehouseWithProducts>>> {
    let warehouses = state.db.warehouses().find_all().await?;

    let mut owned: HashMap<i32, Vec<Product>> = HashMap::new();
    for product in state.db.products().find_all().await? {
        if let Some(warehouse_id) = product.warehouse_id {
            owned.entry(warehouse_id).or_default().push(product);
        }
    }

    let warehouses: Vec<WarehouseWithProducts> = warehouses
        .into_iter()
        .map(|warehouse| {
            let products = warehouse
                .id
                .and_then(|id| owned.remove(&id))
                .unwrap_or_default();
            WarehouseWithProducts {
                warehouse,
                products,
            }
        })
        .collect();

    info!(count = warehouses.len(), "Listed warehouses");

    Ok(Json(warehouses))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

/// A missing warehouse answers 200 with a JSON `null` body.
pub async fn get_warehouse<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<i32>,
) -> AppResult<Json<Option<WarehouseWithProducts>>> {
    let Some(warehouse) = state.db.warehouses().find_by_id(id).await? else {
        info!(id, found = false, "Fetched warehouse");
        return Ok(Json(None));
    };

    let products = state.db.products().find_by_warehouse(id).await?;
    info!(id, found = true, products = products.len(), "Fetched warehouse");

    Ok(Json(Some(WarehouseWithProducts {
        warehouse,
        products,
    })))
}
