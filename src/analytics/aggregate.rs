use tracing::debug;

use crate::analytics::types::{
    AgeBracketBucket, CategoryBucket, GroupBy, LocationBucket, Rollup, SeasonBucket, TrendSummary,
};
use crate::analytics::utility::{Buckets, into_sorted_desc, online_mean};
use crate::config::PipelineConfig;
use crate::schema::ShoppingTrend;

/// Inclusive age ranges. Ages below the first range count toward it, ages
/// above the last toward the last, so every row lands in exactly one bracket.
pub static AGE_BRACKETS: [(&str, i64, i64); 6] = [
    ("18-25", 18, 25),
    ("26-35", 26, 35),
    ("36-45", 36, 45),
    ("46-55", 46, 55),
    ("56-65", 56, 65),
    ("65+", 66, 100),
];

/// Runs the rollup for a single dimension.
#[tracing::instrument(skip(rows, config), fields(rows = rows.len()))]
pub fn aggregate(rows: &[ShoppingTrend], group_by: GroupBy, config: &PipelineConfig) -> Rollup {
    let rollup = match group_by {
        GroupBy::Category => Rollup::Category(by_category(rows)),
        GroupBy::Location => Rollup::Location(by_location(rows, config.location_limit)),
        GroupBy::Season => Rollup::Season(by_season(rows)),
        GroupBy::AgeBracket => Rollup::AgeBracket(by_age_bracket(rows)),
    };
    debug!(buckets = rollup.len(), "Aggregation complete");
    rollup
}

/// Sales total, item count and running rating mean per category, highest
/// sales first.
pub fn by_category(rows: &[ShoppingTrend]) -> Vec<CategoryBucket> {
    let mut buckets = Buckets::new();

    for row in rows {
        let bucket = buckets.entry(row.category.clone()).or_insert_with(|| CategoryBucket {
            category: row.category.clone(),
            total_sales: 0.0,
            average_rating: 0.0,
            item_count: 0,
        });
        bucket.total_sales += row.purchase_amount;
        bucket.average_rating = online_mean(bucket.average_rating, bucket.item_count, row.review_rating);
        bucket.item_count += 1;
    }

    into_sorted_desc(buckets, |b| b.total_sales)
}

/// Sales, customer count and average order value per location; only the
/// `limit` best-selling locations are returned.
pub fn by_location(rows: &[ShoppingTrend], limit: usize) -> Vec<LocationBucket> {
    let mut buckets = Buckets::new();

    for row in rows {
        let bucket = buckets.entry(row.location.clone()).or_insert_with(|| LocationBucket {
            location: row.location.clone(),
            total_sales: 0.0,
            customer_count: 0,
            average_order_value: 0.0,
        });
        bucket.total_sales += row.purchase_amount;
        bucket.customer_count += 1;
        bucket.average_order_value = bucket.total_sales / bucket.customer_count as f64;
    }

    let mut sorted = into_sorted_desc(buckets, |b| b.total_sales);
    sorted.truncate(limit);
    sorted
}

pub fn by_season(rows: &[ShoppingTrend]) -> Vec<SeasonBucket> {
    let mut buckets = Buckets::new();

    for row in rows {
        buckets
            .entry(row.season.clone())
            .or_insert_with(|| SeasonBucket {
                season: row.season.clone(),
                sales: 0.0,
            })
            .sales += row.purchase_amount;
    }

    into_sorted_desc(buckets, |b| b.sales)
}

/// All six age brackets in ascending age order, including empty ones.
pub fn by_age_bracket(rows: &[ShoppingTrend]) -> Vec<AgeBracketBucket> {
    let mut buckets: Vec<AgeBracketBucket> = AGE_BRACKETS
        .iter()
        .map(|&(range, min_age, max_age)| AgeBracketBucket {
            range,
            min_age,
            max_age,
            count: 0,
            total_spent: 0.0,
        })
        .collect();

    for row in rows {
        let bucket = &mut buckets[bracket_index(row.age)];
        bucket.count += 1;
        bucket.total_spent += row.purchase_amount;
    }

    buckets
}

/// Index into [`AGE_BRACKETS`] for `age`.
pub fn bracket_index(age: i64) -> usize {
    AGE_BRACKETS
        .iter()
        .position(|&(_, min, max)| (min..=max).contains(&age))
        .unwrap_or(if age < AGE_BRACKETS[0].1 {
            0
        } else {
            AGE_BRACKETS.len() - 1
        })
}

/// Totals and averages over every row. Averages are 0 for empty input.
pub fn summarize(rows: &[ShoppingTrend]) -> TrendSummary {
    if rows.is_empty() {
        return TrendSummary::default();
    }

    let total_revenue: f64 = rows.iter().map(|r| r.purchase_amount).sum();
    let rating_sum: f64 = rows.iter().map(|r| r.review_rating).sum();
    let n = rows.len() as f64;

    TrendSummary {
        total_customers: rows.len(),
        total_revenue,
        average_order_value: total_revenue / n,
        average_rating: rating_sum / n,
    }
}
