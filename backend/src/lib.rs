pub mod config;
pub mod convert;
pub mod encoding;
pub mod error;
pub mod extractor;
pub mod graph_builder;
pub mod logger;
pub mod turtle;
pub mod types;
pub mod uri;
pub mod vocab;
pub mod xml_tree;

pub use config::{ConversionConfig, FailurePolicy};
pub use convert::{ConversionStats, inspect, run_conversion};
pub use error::{ConvertError, Result};
pub use types::{ConceptRecord, ConceptSchemeRecord, LangString, MetadataEntry};
