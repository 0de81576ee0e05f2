use serde::Serialize;

use super::{Fields, Schema};

/// An entry of the flat product category list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductCategory {
    pub id: i64,
    pub category_name: String,
}

impl Schema for ProductCategory {
    const NAME: &'static str = "categories";
    const COLUMNS: usize = 2;

    fn from_fields(f: &mut Fields) -> Self {
        ProductCategory {
            id: f.int(0),
            category_name: f.text(1),
        }
    }
}
