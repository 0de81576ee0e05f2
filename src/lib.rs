//! Ingestion, normalisation and analytics for retail catalog exports and IDX
//! digit corpora.
//!
//! ```text
//! text  -> tokenizer -> schema::decode -> unify::Unifier      -> ProductRecord
//!                                     \-> analytics::aggregate -> buckets
//! bytes -> idx::ImageDataset -> stats::DigitStats
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod fetch;
pub mod idx;
pub mod output;
pub mod schema;
pub mod stats;
pub mod tokenizer;
pub mod unify;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use idx::{ImageDataset, decode_images, decode_labels};
pub use schema::{SourceRecord, SourceTag, decode};
pub use stats::DigitStats;
pub use tokenizer::tokenize;
pub use unify::{ProductRecord, SourceBatch, Unifier};
