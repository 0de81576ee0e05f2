use serde::Serialize;

use super::{Fields, Schema};

/// A row of the BigBasket grocery catalog. Prices are already numeric INR.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BigBasketProduct {
    pub index: i64,
    pub product: String,
    pub category: String,
    pub sub_category: String,
    pub brand: String,
    pub sale_price: f64,
    pub market_price: f64,
    pub kind: String,
    pub rating: f64,
    pub description: String,
}

impl Schema for BigBasketProduct {
    const NAME: &'static str = "bigbasket";
    const COLUMNS: usize = 10;

    fn from_fields(f: &mut Fields) -> Self {
        BigBasketProduct {
            index: f.int(0),
            product: f.text(1),
            category: f.text(2),
            sub_category: f.text(3),
            brand: f.text(4),
            sale_price: f.float(5),
            market_price: f.float(6),
            kind: f.text(7),
            rating: f.float(8),
            description: f.text(9),
        }
    }
}
