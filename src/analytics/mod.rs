//! Grouped rollups over shopping-trend purchases.
//!
//! Each dimension is a single forward pass that folds rows into buckets
//! created on first sight of their key, followed by a stable sort on the
//! bucket's sales total. [`report::TrendReport`] runs every dimension plus the
//! global summary in one call.

pub mod aggregate;
pub mod report;
pub mod types;
pub mod utility;

pub use aggregate::{aggregate, by_age_bracket, by_category, by_location, by_season, summarize};
pub use report::TrendReport;
pub use types::{
    AgeBracketBucket, CategoryBucket, GroupBy, LocationBucket, Rollup, SeasonBucket, TrendSummary,
};
