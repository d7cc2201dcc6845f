use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::{CrudRepository, ProductRepository, Storage};
use crate::error::{AppError, AppResult};
use crate::models::{Entity, Product, Warehouse};

/// One insertion-ordered table with its own identity sequence.
#[derive(Debug)]
pub(crate) struct Table<E> {
    rows: IndexMap<i32, E>,
    last_id: i32,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: IndexMap::new(),
            last_id: 0,
        }
    }
}

impl<E: Entity> Table<E> {
    fn save(&mut self, mut entity: E) -> E {
        let id = match entity.id() {
            Some(id) if self.rows.contains_key(&id) => id,
            _ => {
                self.last_id += 1;
                self.last_id
            }
        };
        entity.set_id(id);
        self.rows.insert(id, entity.clone());
        entity
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    products: Table<Product>,
    warehouses: Table<Warehouse>,
}

/// Binds an entity type to its table and the constraints that guard it.
pub(crate) trait MemoryEntity: Entity {
    fn table(tables: &Tables) -> &Table<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Foreign-key check run before every save.
    fn check_references(&self, _tables: &Tables) -> AppResult<()> {
        Ok(())
    }

    /// Cascade run after a row is removed.
    fn on_delete(_id: i32, _tables: &mut Tables) {}
}

impl MemoryEntity for Product {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.products
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.products
    }

    fn check_references(&self, tables: &Tables) -> AppResult<()> {
        match self.warehouse_id {
            Some(warehouse_id) if !tables.warehouses.rows.contains_key(&warehouse_id) => Err(
                AppError::Storage(format!("warehouse {} does not exist", warehouse_id)),
            ),
            _ => Ok(()),
        }
    }
}

impl MemoryEntity for Warehouse {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.warehouses
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.warehouses
    }

    fn on_delete(id: i32, tables: &mut Tables) {
        tables
            .products
            .rows
            .retain(|_, product| product.warehouse_id != Some(id));
    }
}

/// In-process repository. All repositories of one [`MemoryStorage`] share
/// the same tables so references and cascades behave as in PostgreSQL.
#[derive(Debug)]
pub struct MemoryRepository<E> {
    tables: Arc<RwLock<Tables>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for MemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            _entity: PhantomData,
        }
    }
}

impl<E: MemoryEntity> CrudRepository<E, i32> for MemoryRepository<E> {
    async fn save(&self, entity: E) -> AppResult<E> {
        let mut tables = self.tables.write().await;
        entity.check_references(&tables)?;
        Ok(E::table_mut(&mut tables).save(entity))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<E>> {
        let tables = self.tables.read().await;
        Ok(E::table(&tables).rows.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<E>> {
        let tables = self.tables.read().await;
        Ok(E::table(&tables).rows.values().cloned().collect())
    }

    async fn count(&self) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(E::table(&tables).rows.len() as i64)
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if E::table_mut(&mut tables).rows.shift_remove(&id).is_none() {
            return Ok(false);
        }
        E::on_delete(id, &mut tables);
        Ok(true)
    }
}

impl ProductRepository for MemoryRepository<Product> {
    async fn find_by_warehouse(&self, warehouse_id: i32) -> AppResult<Vec<Product>> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .rows
            .values()
            .filter(|product| product.warehouse_id == Some(warehouse_id))
            .cloned()
            .collect())
    }
}

/// Storage used when no `DATABASE_URL` is configured, and by the tests.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    products: MemoryRepository<Product>,
    warehouses: MemoryRepository<Warehouse>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        let tables = Arc::new(RwLock::new(Tables::default()));
        Self {
            products: MemoryRepository {
                tables: Arc::clone(&tables),
                _entity: PhantomData,
            },
            warehouses: MemoryRepository {
                tables,
                _entity: PhantomData,
            },
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    type Products = MemoryRepository<Product>;
    type Warehouses = MemoryRepository<Warehouse>;

    fn products(&self) -> &Self::Products {
        &self.products
    }

    fn warehouses(&self) -> &Self::Warehouses {
        &self.warehouses
    }
}
