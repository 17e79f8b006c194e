//! Persistence of generated datasets.
//!
//! Three targets: a single JSON document, an executable mongosh import
//! script, and direct insertion through a pluggable [`StoreAdapter`].

pub mod adapter;
pub mod errors;
pub mod infer;
pub mod manager;
pub mod memory;
pub mod script;

pub use adapter::{InsertOutcome, StoreAdapter};
pub use errors::StorageError;
pub use infer::infer_structure;
pub use manager::{DbSaveReport, OutputFormat, StorageManager};
pub use memory::InMemoryStoreAdapter;
pub use script::render_import_script;
