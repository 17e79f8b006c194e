//! Canonical model description shared across Seedforge crates.
//!
//! A [`ModelStructure`] is the contract between the analysis layer (which
//! reconstructs it from schema source text) and the generation/storage
//! layers (which consume it to produce and persist fake records).

pub mod error;
pub mod model;
pub mod validation;

pub use error::{Error, Result};
pub use model::{FieldDefinition, FieldKind, ModelStructure, ReferenceDefinition};
pub use validation::validate_structure;
