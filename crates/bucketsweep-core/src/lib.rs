//! bucketsweep Core
//!
//! Core types and error handling shared across bucketsweep components.
//!
//! This crate provides:
//! - The storage object model that filters select from
//! - Error types and result handling
//! - Helpers for converting backend tag lists

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{tags_from_pairs, StorageObject, Tag, Tags};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{StorageObject, Tag, Tags};
}
