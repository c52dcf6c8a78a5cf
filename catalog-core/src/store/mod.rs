//! Storage for the product catalog
//!
//! Includes the JSON file backend (`JsonFileStore`).

pub mod file;
pub use file::{JsonFileStore, StoreConfig};

use async_trait::async_trait;

use crate::error::Result;
use crate::outcome::{AddOutcome, DeleteOutcome, Lookup, UpdateOutcome};
use crate::product::{IdQuery, NewProduct, Patch, Product};

/// Operations over a persisted product catalog
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every stored product, in insertion order
    async fn load(&self) -> Result<Vec<Product>>;

    /// Validate and store a new product under the next id
    async fn add(&self, candidate: NewProduct) -> Result<AddOutcome>;

    /// First product whose id loosely equals `id`
    async fn get_by_id(&self, id: IdQuery) -> Result<Lookup>;

    /// Remove products whose id strictly equals `id`
    async fn delete_by_id(&self, id: IdQuery) -> Result<DeleteOutcome>;

    /// Overwrite existing properties of the product whose id loosely equals `id`
    async fn update(&self, id: IdQuery, patch: Patch) -> Result<UpdateOutcome>;
}
