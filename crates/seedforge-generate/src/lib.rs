//! Synthetic-record generation for Seedforge.
//!
//! Consumes [`seedforge_core::ModelStructure`]s to produce per-model record
//! sets: a priority-ordered registry of per-kind value strategies handles
//! individual fields, a reference resolver wires foreign identifiers across
//! models afterwards, and the engine orchestrates both.

pub mod engine;
pub mod errors;
pub mod ids;
pub mod model;
pub mod resolver;
pub mod values;

pub use engine::{Datasets, GenerationEngine, Record, record_pools};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationReport, ModelReport};
pub use resolver::{RealIdSource, ReferenceResolver, ResolverOptions};
pub use values::{GenerationContext, GeneratorRegistry, ValueStrategy};
