//! Prelude: Re-exports common types for convenience
//!
//! # Usage
//! ```
//! use catalog_core::prelude::*;
//! ```

pub use crate::error::{Error, Result};

pub use crate::outcome::{AddOutcome, DeleteOutcome, Lookup, UpdateOutcome, Warning};
pub use crate::product::{IdQuery, NewProduct, Patch, Product, ProductId};
pub use crate::store::{JsonFileStore, ProductRepository, StoreConfig};
