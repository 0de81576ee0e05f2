use serde::Serialize;

use super::{Fields, Schema};

/// One purchase from the shopping-behaviour export.
///
/// These rows feed both the trend analytics and the product catalog (after
/// deduplication, see [`crate::unify`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShoppingTrend {
    pub customer_id: i64,
    pub age: i64,
    pub gender: String,
    pub item_purchased: String,
    pub category: String,
    /// USD.
    pub purchase_amount: f64,
    pub location: String,
    pub size: String,
    pub color: String,
    pub season: String,
    pub review_rating: f64,
    pub subscription_status: String,
    pub shipping_type: String,
    pub discount_applied: String,
    pub promo_code_used: String,
    pub previous_purchases: i64,
    pub payment_method: String,
    pub frequency_of_purchases: String,
}

impl Schema for ShoppingTrend {
    const NAME: &'static str = "shopping_trends";
    const COLUMNS: usize = 18;

    fn from_fields(f: &mut Fields) -> Self {
        ShoppingTrend {
            customer_id: f.int(0),
            age: f.int(1),
            gender: f.text(2),
            item_purchased: f.text(3),
            category: f.text(4),
            purchase_amount: f.float(5),
            location: f.text(6),
            size: f.text(7),
            color: f.text(8),
            season: f.text(9),
            review_rating: f.float(10),
            subscription_status: f.text(11),
            shipping_type: f.text(12),
            discount_applied: f.text(13),
            promo_code_used: f.text(14),
            previous_purchases: f.int(15),
            payment_method: f.text(16),
            frequency_of_purchases: f.text(17),
        }
    }
}
