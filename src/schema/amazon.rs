use serde::Serialize;

use super::{Fields, Schema};

/// A row of the Amazon product export.
///
/// Prices stay as the raw currency strings (`"₹1,099"`); they are normalised
/// by the unifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AmazonProduct {
    pub product_id: String,
    pub product_name: String,
    /// `|`-separated category path.
    pub category: String,
    pub discounted_price: String,
    pub actual_price: String,
    pub discount_percentage: String,
    pub rating: f64,
    pub rating_count: String,
    pub about_product: String,
    pub user_ids: Vec<String>,
    pub user_names: Vec<String>,
    pub review_ids: Vec<String>,
    pub review_titles: Vec<String>,
    pub review_contents: Vec<String>,
    pub img_link: String,
    pub product_link: String,
}

impl Schema for AmazonProduct {
    const NAME: &'static str = "amazon";
    const COLUMNS: usize = 16;

    fn from_fields(f: &mut Fields) -> Self {
        AmazonProduct {
            product_id: f.text(0),
            product_name: f.text(1),
            category: f.text(2),
            discounted_price: f.text(3),
            actual_price: f.text(4),
            discount_percentage: f.text(5),
            rating: f.float(6),
            rating_count: f.text(7),
            about_product: f.text(8),
            user_ids: f.list(9),
            user_names: f.list(10),
            review_ids: f.list(11),
            review_titles: f.list(12),
            review_contents: f.list(13),
            img_link: f.text(14),
            product_link: f.text(15),
        }
    }
}
