use std::marker::PhantomData;

use sqlx::PgPool;

use super::{CrudRepository, ProductRepository, Storage};
use crate::error::AppResult;
use crate::models::{Product, Warehouse};

/// sqlx-backed repository for a single table.
#[derive(Debug)]
pub struct PgRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for PgRepository<E> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

#[derive(Debug, Clone)]
pub struct PgStorage {
    products: PgRepository<Product>,
    warehouses: PgRepository<Warehouse>,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self {
            products: PgRepository::new(pool.clone()),
            warehouses: PgRepository::new(pool),
        }
    }
}

impl Storage for PgStorage {
    type Products = PgRepository<Product>;
    type Warehouses = PgRepository<Warehouse>;

    fn products(&self) -> &Self::Products {
        &self.products
    }

    fn warehouses(&self) -> &Self::Warehouses {
        &self.warehouses
    }
}

// ── Products ──────────────────────────────────────────────────────────────────

const PRODUCT_COLUMNS: &str =
    "id, name, product_category, product_quantity, product_unit, warehouse_id";

impl CrudRepository<Product, i32> for PgRepository<Product> {
    async fn save(&self, product: Product) -> AppResult<Product> {
        if let Some(id) = product.id {
            let updated = sqlx::query_as::<_, Product>(&format!(
                r#"
                UPDATE product
                SET name             = $1,
                    product_category = $2,
                    product_quantity = $3,
                    product_unit     = $4,
                    warehouse_id     = $5
                WHERE id = $6
                RETURNING {PRODUCT_COLUMNS}
                "#
            ))
            .bind(&product.name)
            .bind(&product.product_category)
            .bind(product.product_quantity)
            .bind(&product.product_unit)
            .bind(product.warehouse_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            if let Some(updated) = updated {
                return Ok(updated);
            }
        }

        let inserted = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO product (name, product_category, product_quantity, product_unit, warehouse_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(&product.product_category)
        .bind(product.product_quantity)
        .bind(&product.product_unit)
        .bind(product.warehouse_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn find_all(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn count(&self) -> AppResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM product")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl ProductRepository for PgRepository<Product> {
    async fn find_by_warehouse(&self, warehouse_id: i32) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE warehouse_id = $1 ORDER BY id"
        ))
        .bind(warehouse_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

// ── Warehouses ────────────────────────────────────────────────────────────────

const WAREHOUSE_COLUMNS: &str = "id, name, address, postal_code, city, country, created_at";

impl CrudRepository<Warehouse, i32> for PgRepository<Warehouse> {
    async fn save(&self, warehouse: Warehouse) -> AppResult<Warehouse> {
        if let Some(id) = warehouse.id {
            let updated = sqlx::query_as::<_, Warehouse>(&format!(
                r#"
                UPDATE warehouse
                SET name        = $1,
                    address     = $2,
                    postal_code = $3,
                    city        = $4,
                    country     = $5,
                    created_at  = $6
                WHERE id = $7
                RETURNING {WAREHOUSE_COLUMNS}
                "#
            ))
            .bind(&warehouse.name)
            .bind(&warehouse.address)
            .bind(warehouse.postal_code)
            .bind(&warehouse.city)
            .bind(&warehouse.country)
            .bind(warehouse.timestamp)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            if let Some(updated) = updated {
                return Ok(updated);
            }
        }

        let inserted = sqlx::query_as::<_, Warehouse>(&format!(
            r#"
            INSERT INTO warehouse (name, address, postal_code, city, country, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {WAREHOUSE_COLUMNS}
            "#
        ))
        .bind(&warehouse.name)
        .bind(&warehouse.address)
        .bind(warehouse.postal_code)
        .bind(&warehouse.city)
        .bind(&warehouse.country)
        .bind(warehouse.timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Warehouse>> {
        let warehouse = sqlx::query_as::<_, Warehouse>(&format!(
            "SELECT {WAREHOUSE_COLUMNS} FROM warehouse WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(warehouse)
    }

    async fn find_all(&self) -> AppResult<Vec<Warehouse>> {
        let warehouses = sqlx::query_as::<_, Warehouse>(&format!(
            "SELECT {WAREHOUSE_COLUMNS} FROM warehouse ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(warehouses)
    }

    async fn count(&self) -> AppResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM warehouse")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Products go with it through `ON DELETE CASCADE`.
    async fn delete_by_id(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM warehouse WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
