//! # Character Catalog
//!
//! The data-model crate: normalized character records, the relation kinds
//! that can connect them and the weight table that scores those relations.
//! This crate knows nothing about graphs or games.

pub mod catalog;
pub mod entities;
pub mod error;
pub mod mechanics;

pub use catalog::*;
pub use entities::*;
pub use error::CatalogError;
pub use mechanics::*;
