mod product;
mod warehouse;

pub use product::*;
pub use warehouse::*;

/// A persisted record identified by a database-generated integer key.
pub trait Entity: Clone + Send + Sync + 'static {
    /// `None` until the record has been saved once.
    fn id(&self) -> Option<i32>;

    fn set_id(&mut self, id: i32);
}
