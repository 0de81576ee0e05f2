use serde::Serialize;

use super::{Fields, Schema};

/// A row of the Flipkart product export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlipkartProduct {
    pub category_1: String,
    pub category_2: String,
    pub category_3: String,
    pub title: String,
    pub product_rating: f64,
    /// Raw currency string.
    pub selling_price: String,
    /// Raw currency string, the listed maximum retail price.
    pub mrp: String,
    pub seller_name: String,
    pub seller_rating: f64,
    pub description: String,
    pub highlights: String,
    pub image_links: String,
}

impl Schema for FlipkartProduct {
    const NAME: &'static str = "flipkart";
    const COLUMNS: usize = 12;

    fn from_fields(f: &mut Fields) -> Self {
        FlipkartProduct {
            category_1: f.text(0),
            category_2: f.text(1),
            category_3: f.text(2),
            title: f.text(3),
            product_rating: f.float(4),
            selling_price: f.text(5),
            mrp: f.text(6),
            seller_name: f.text(7),
            seller_rating: f.float(8),
            description: f.text(9),
            highlights: f.text(10),
            image_links: f.text(11),
        }
    }
}
