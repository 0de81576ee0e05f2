use indexmap::IndexMap;

/// Folds `value` into a mean taken over `count` earlier values.
pub fn online_mean(mean: f64, count: usize, value: f64) -> f64 {
    (mean * count as f64 + value) / (count + 1) as f64
}

/// Buckets keyed by group, in the order keys were first seen.
pub type Buckets<B> = IndexMap<String, B>;

/// Buckets in descending `measure` order; equal measures keep first-seen order.
pub fn into_sorted_desc<B, F>(buckets: Buckets<B>, measure: F) -> Vec<B>
where
    F: Fn(&B) -> f64,
{
    let mut sorted: Vec<B> = buckets.into_values().collect();
    sorted.sort_by(|a, b| measure(b).total_cmp(&measure(a)));
    sorted
}
