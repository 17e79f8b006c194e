//! Schema-source analysis for Seedforge.
//!
//! Raw schema definition files are treated as semi-structured text, not as a
//! program: a chain of fallback strategies scans them lexically and extracts
//! whatever field declarations it can recognize. Fields that cannot be
//! extracted with confidence are omitted rather than failing the analysis.

pub mod mongoose;
pub mod scanner;
pub mod strategy;

pub use mongoose::MongooseTextStrategy;
pub use scanner::{ModelEntry, ModelInfo, ModelScanner, ScanOptions};
pub use strategy::{AnalysisStrategy, StrategyRegistry};
