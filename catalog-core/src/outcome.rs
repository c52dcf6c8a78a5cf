//! Results of store operations
//!
//! A rejected operation is not an error: it yields a [`Warning`] inside the
//! outcome and leaves the backing file untouched. Only I/O and parse
//! failures surface as [`Error`](crate::error::Error).

use thiserror::Error;

use crate::product::Product;

/// Why an operation was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// A required field was empty or zero
    #[error("all fields must be filled, missing: {}", fields.join(", "))]
    MissingFields {
        /// Offending fields
        fields: Vec<&'static str>,
    },

    /// The candidate's code is already taken
    #[error("the product code already exists: {code}")]
    DuplicateCode {
        /// Requested code
        code: String,
    },

    /// An update tried to move a product onto a code that is already taken
    #[error("the product code already exists: {code}, generate a new code")]
    CodeCollision {
        /// Requested code
        code: String,
    },

    /// An update targeted a property the product does not have
    #[error("property '{key}' does not exist on the product")]
    UnknownProperty {
        /// Patch key
        key: String,
    },

    /// A property ended up with a value of the wrong type for its field
    #[error("invalid property value: {reason}")]
    InvalidValue {
        /// Decoder message
        reason: String,
    },
}

/// Outcome of `add`
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The product was stored
    Added(Product),
    /// Nothing was stored
    Rejected(Warning),
}

impl AddOutcome {
    /// The stored product, if any
    pub fn product(&self) -> Option<&Product> {
        match self {
            Self::Added(product) => Some(product),
            Self::Rejected(_) => None,
        }
    }

    /// The rejection reason, if any
    pub fn warning(&self) -> Option<&Warning> {
        match self {
            Self::Added(_) => None,
            Self::Rejected(warning) => Some(warning),
        }
    }
}

/// Outcome of `get_by_id`
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// First product whose id matched
    Found(Product),
    /// No product matched
    NotFound,
}

impl Lookup {
    /// Convert into an `Option`
    pub fn into_option(self) -> Option<Product> {
        match self {
            Self::Found(product) => Some(product),
            Self::NotFound => None,
        }
    }

    /// Whether a product matched
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Outcome of `delete_by_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Matching products were removed
    Deleted,
    /// No product matched; nothing was written
    NotFound,
}

/// Outcome of `update`
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The product after the patch was applied and stored
    Updated(Product),
    /// No product matched; nothing was written
    NotFound,
    /// The patch was refused; nothing was written
    Rejected(Warning),
}

impl UpdateOutcome {
    /// The updated product, if any
    pub fn product(&self) -> Option<&Product> {
        match self {
            Self::Updated(product) => Some(product),
            _ => None,
        }
    }

    /// The rejection reason, if any
    pub fn warning(&self) -> Option<&Warning> {
        match self {
            Self::Rejected(warning) => Some(warning),
            _ => None,
        }
    }
}
