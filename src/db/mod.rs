use std::future::Future;

use crate::error::AppResult;
use crate::models::{Product, Warehouse};

mod memory;
mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

/// Generic create/read/delete access to one entity type keyed by `K`.
pub trait CrudRepository<E, K>: Clone + Send + Sync + 'static {
    /// Inserts when the entity has no identity (or an unknown one), updates
    /// otherwise. The returned entity always carries its identity.
    fn save(&self, entity: E) -> impl Future<Output = AppResult<E>> + Send;

    fn find_by_id(&self, id: K) -> impl Future<Output = AppResult<Option<E>>> + Send;

    /// All rows in identity order.
    fn find_all(&self) -> impl Future<Output = AppResult<Vec<E>>> + Send;

    fn count(&self) -> impl Future<Output = AppResult<i64>> + Send;

    /// Returns whether a row was removed. Storage-level only: no route deletes
    /// rows. Removing a warehouse also removes every product it owns.
    fn delete_by_id(&self, id: K) -> impl Future<Output = AppResult<bool>> + Send;
}

pub trait ProductRepository: CrudRepository<Product, i32> {
    fn find_by_warehouse(
        &self,
        warehouse_id: i32,
    ) -> impl Future<Output = AppResult<Vec<Product>>> + Send;
}

/// The pair of repositories the HTTP layer works against.
pub trait Storage: Clone + Send + Sync + 'static {
    type Products: ProductRepository;
    type Warehouses: CrudRepository<Warehouse, i32>;

    fn products(&self) -> &Self::Products;
    fn warehouses(&self) -> &Self::Warehouses;
}
