//! Bucket and summary types produced by the aggregation engine.

use serde::Serialize;

/// Sales and rating rollup for one product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub category: String,
    pub total_sales: f64,
    /// Running mean of review ratings.
    pub average_rating: f64,
    pub item_count: usize,
}

/// Sales rollup for one customer location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationBucket {
    pub location: String,
    pub total_sales: f64,
    pub customer_count: usize,
    pub average_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonBucket {
    pub season: String,
    pub sales: f64,
}

/// Purchases by customers within an inclusive age range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeBracketBucket {
    pub range: &'static str,
    pub min_age: i64,
    pub max_age: i64,
    pub count: usize,
    pub total_spent: f64,
}

/// Whole-dataset reductions, independent of any grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSummary {
    pub total_customers: usize,
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub average_rating: f64,
}

/// Grouping dimension for [`crate::analytics::aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GroupBy {
    Category,
    Location,
    Season,
    AgeBracket,
}

/// Buckets for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rollup {
    Category(Vec<CategoryBucket>),
    Location(Vec<LocationBucket>),
    Season(Vec<SeasonBucket>),
    AgeBracket(Vec<AgeBracketBucket>),
}

impl Rollup {
    pub fn len(&self) -> usize {
        match self {
            Rollup::Category(b) => b.len(),
            Rollup::Location(b) => b.len(),
            Rollup::Season(b) => b.len(),
            Rollup::AgeBracket(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
