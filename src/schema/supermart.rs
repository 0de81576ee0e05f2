use serde::Serialize;

use super::{Fields, Schema};

/// A row of the Supermart grocery sales export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupermartSale {
    pub order_id: String,
    pub customer_name: String,
    pub category: String,
    pub sub_category: String,
    pub city: String,
    /// Kept verbatim; the export mixes date formats.
    pub order_date: String,
    pub region: String,
    pub sales: f64,
    pub discount: f64,
    pub profit: f64,
    pub state: String,
}

impl Schema for SupermartSale {
    const NAME: &'static str = "supermart";
    const COLUMNS: usize = 11;

    fn from_fields(f: &mut Fields) -> Self {
        SupermartSale {
            order_id: f.text(0),
            customer_name: f.text(1),
            category: f.text(2),
            sub_category: f.text(3),
            city: f.text(4),
            order_date: f.text(5),
            region: f.text(6),
            sales: f.float(7),
            discount: f.float(8),
            profit: f.float(9),
            state: f.text(10),
        }
    }
}
