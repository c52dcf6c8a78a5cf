//! # Catalog Core
//!
//! A product catalog persisted as a single JSON file.
//!
//! This crate provides:
//! - Products (`product`) - stored records, candidates, id queries, patches
//! - Outcomes (`outcome`) - per-operation results and rejection warnings
//! - Storage (`store`) - the `ProductRepository` trait and `JsonFileStore`
//! - Logging (`logging`) - tracing setup with file rotation
//!
//! ```no_run
//! use catalog_core::prelude::*;
//!
//! # async fn run() -> catalog_core::Result<()> {
//! let store = JsonFileStore::open("products.json");
//! let outcome = store
//!     .add(NewProduct::new("Lamp", "Desk lamp", 200, "lamp.png", "abc121", 25))
//!     .await?;
//! if let AddOutcome::Rejected(warning) = outcome {
//!     eprintln!("{}", warning);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod outcome;
pub mod prelude;
pub mod product;
pub mod store;

pub use error::{Error, Result};
