//! JSON file product store
//!
//! The whole catalog lives in one file as a JSON array of products.
//!
//! # Behavior
//! - **No cache**: every operation re-reads the file; mutations rewrite it whole.
//! - **No locking**: concurrent read-modify-write cycles can lose updates.
//! - **Missing file**: treated as an empty catalog; created on first write.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;

use crate::error::{Error, Result};
use crate::outcome::{AddOutcome, DeleteOutcome, Lookup, UpdateOutcome, Warning};
use crate::product::{IdQuery, NewProduct, Patch, Product, ProductId};
use crate::store::ProductRepository;

/// Distinguishes temporary files of overlapping atomic writes
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Configuration for JsonFileStore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON file
    pub path: PathBuf,
    /// Write to a temporary file and rename it over the target
    #[serde(default)]
    pub atomic_writes: bool,
    /// Pretty-print the file instead of writing it compact
    #[serde(default)]
    pub pretty: bool,
}

impl StoreConfig {
    /// Create config from path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            atomic_writes: false,
            pretty: false,
        }
    }

    /// Enable or disable write-then-rename persistence
    pub fn with_atomic_writes(mut self, enabled: bool) -> Self {
        self.atomic_writes = enabled;
        self
    }

    /// Enable or disable pretty-printed output
    pub fn with_pretty(mut self, enabled: bool) -> Self {
        self.pretty = enabled;
        self
    }
}

/// Product catalog persisted as a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    config: StoreConfig,
}

impl JsonFileStore {
    /// Create a store over the configured file. Nothing is read until the first operation.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Create a store with default settings for `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::new(path))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Read every product from disk
    pub async fn load(&self) -> Result<Vec<Product>> {
        if !fs::try_exists(&self.config.path).await? {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.config.path).await?;
        let products: Vec<Product> = serde_json::from_str(&content)?;

        tracing::debug!("Loaded {} products from {:?}", products.len(), self.config.path);
        Ok(products)
    }

    /// Overwrite the file with `products`
    async fn persist(&self, products: &[Product]) -> Result<()> {
        let json = if self.config.pretty {
            serde_json::to_string_pretty(products)?
        } else {
            serde_json::to_string(products)?
        };

        if self.config.atomic_writes {
            let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
            let tmp_path = self.config.path.with_extension(format!("{}.tmp", seq));
            fs::write(&tmp_path, json).await?;
            fs::rename(tmp_path, &self.config.path).await?;
        } else {
            fs::write(&self.config.path, json).await?;
        }

        tracing::debug!("Wrote {} products to {:?}", products.len(), self.config.path);
        Ok(())
    }

    /// Store `candidate` under the id following the last stored product.
    ///
    /// The id comes from the last element of the file, not the largest id,
    /// so deleting the newest product and adding again reuses its id.
    /// Properties of the candidate win over the assigned id.
    pub async fn add(&self, candidate: NewProduct) -> Result<AddOutcome> {
        let candidate = match candidate.normalized() {
            Ok(candidate) => candidate,
            Err(e) => return Ok(reject_add(invalid_value(e))),
        };

        let missing = candidate.missing_fields();
        if !missing.is_empty() {
            return Ok(reject_add(Warning::MissingFields { fields: missing }));
        }

        let mut products = self.load().await?;

        let id = match products.last() {
            None => ProductId::FIRST,
            Some(last) => last
                .id
                .next()
                .ok_or_else(|| Error::internal(format!("no id follows {}", last.id)))?,
        };

        if products.iter().any(|p| p.code == candidate.code) {
            return Ok(reject_add(Warning::DuplicateCode {
                code: candidate.code,
            }));
        }

        let product = match Product::from_candidate(id, candidate) {
            Ok(product) => product,
            Err(e) => return Ok(reject_add(invalid_value(e))),
        };
        products.push(product.clone());
        self.persist(&products).await?;

        tracing::info!("Product {} successfully added", product.id);
        Ok(AddOutcome::Added(product))
    }

    /// First product whose id loosely equals `id` (`"3"` finds product 3)
    pub async fn get_by_id(&self, id: impl Into<IdQuery>) -> Result<Lookup> {
        let id = id.into();
        let products = self.load().await?;

        Ok(products
            .into_iter()
            .find(|p| id.matches_loose(p.id))
            .map_or(Lookup::NotFound, Lookup::Found))
    }

    /// Remove products whose id strictly equals `id`. Text ids never match.
    pub async fn delete_by_id(&self, id: impl Into<IdQuery>) -> Result<DeleteOutcome> {
        let id = id.into();
        let mut products = self.load().await?;

        if !products.iter().any(|p| id.matches_strict(p.id)) {
            tracing::info!("Product with id {} does not exist", id);
            return Ok(DeleteOutcome::NotFound);
        }

        products.retain(|p| !id.matches_strict(p.id));
        self.persist(&products).await?;

        tracing::info!("Product with id {} was successfully deleted", id);
        Ok(DeleteOutcome::Deleted)
    }

    /// Apply `patch` key by key to the product whose id loosely equals `id`.
    ///
    /// Every key must already exist on the product, and a new `code` must not
    /// belong to any product. The first failing key aborts the update and
    /// nothing is written, even if earlier keys were accepted.
    pub async fn update(&self, id: impl Into<IdQuery>, patch: Patch) -> Result<UpdateOutcome> {
        let id = id.into();
        let mut products = self.load().await?;

        let Some(index) = products.iter().position(|p| id.matches_loose(p.id)) else {
            tracing::info!("The product with id {} does not exist", id);
            return Ok(UpdateOutcome::NotFound);
        };

        let mut object = match serde_json::to_value(&products[index])? {
            Value::Object(object) => object,
            other => {
                return Err(Error::internal(format!(
                    "product {} serialized to {} instead of an object",
                    products[index].id, other
                )))
            }
        };

        for (key, value) in patch.iter() {
            if key == "code" && object.get("code") != Some(value) {
                let taken = products.iter().any(|p| value.as_str() == Some(p.code.as_str()));
                if taken {
                    let code = value
                        .as_str()
                        .map_or_else(|| value.to_string(), str::to_owned);
                    return Ok(reject_update(Warning::CodeCollision { code }));
                }
            }

            match object.get_mut(key) {
                Some(slot) => *slot = value.clone(),
                None => {
                    return Ok(reject_update(Warning::UnknownProperty { key: key.clone() }));
                }
            }
        }

        let updated: Product = match serde_json::from_value(Value::Object(object)) {
            Ok(product) => product,
            Err(e) => return Ok(reject_update(invalid_value(e))),
        };

        products[index] = updated.clone();
        self.persist(&products).await?;

        tracing::info!("Product with id {} was successfully updated", id);
        Ok(UpdateOutcome::Updated(updated))
    }
}

fn invalid_value(e: serde_json::Error) -> Warning {
    Warning::InvalidValue {
        reason: e.to_string(),
    }
}

fn reject_add(warning: Warning) -> AddOutcome {
    tracing::warn!("Product not added: {}", warning);
    AddOutcome::Rejected(warning)
}

fn reject_update(warning: Warning) -> UpdateOutcome {
    tracing::warn!("Product not updated: {}", warning);
    UpdateOutcome::Rejected(warning)
}

#[async_trait]
impl ProductRepository for JsonFileStore {
    async fn load(&self) -> Result<Vec<Product>> {
        JsonFileStore::load(self).await
    }

    async fn add(&self, candidate: NewProduct) -> Result<AddOutcome> {
        JsonFileStore::add(self, candidate).await
    }

    async fn get_by_id(&self, id: IdQuery) -> Result<Lookup> {
        JsonFileStore::get_by_id(self, id).await
    }

    async fn delete_by_id(&self, id: IdQuery) -> Result<DeleteOutcome> {
        JsonFileStore::delete_by_id(self, id).await
    }

    async fn update(&self, id: IdQuery, patch: Patch) -> Result<UpdateOutcome> {
        JsonFileStore::update(self, id, patch).await
    }
}
