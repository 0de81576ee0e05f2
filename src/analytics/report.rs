use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::aggregate::{by_age_bracket, by_category, by_location, by_season, summarize};
use crate::analytics::types::{
    AgeBracketBucket, CategoryBucket, LocationBucket, SeasonBucket, TrendSummary,
};
use crate::config::PipelineConfig;
use crate::schema::ShoppingTrend;

/// Every trend rollup computed over the same rows.
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub generated_at: DateTime<Utc>,
    pub summary: TrendSummary,
    pub categories: Vec<CategoryBucket>,
    pub locations: Vec<LocationBucket>,
    pub seasons: Vec<SeasonBucket>,
    pub age_brackets: Vec<AgeBracketBucket>,
}

impl TrendReport {
    #[tracing::instrument(skip_all, fields(rows = rows.len()))]
    pub fn build(rows: &[ShoppingTrend], config: &PipelineConfig) -> Self {
        TrendReport {
            generated_at: Utc::now(),
            summary: summarize(rows),
            categories: by_category(rows),
            locations: by_location(rows, config.location_limit),
            seasons: by_season(rows),
            age_brackets: by_age_bracket(rows),
        }
    }
}
