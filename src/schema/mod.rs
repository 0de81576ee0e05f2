//! Typed decoders for the delimited catalog exports.
//!
//! Every schema is positional: the header row is discarded and each remaining
//! line is tokenized and mapped column-by-column onto a flat record. Decoding
//! is permissive. A bad number becomes `0`, a missing column becomes empty,
//! and a row whose width differs from the schema's column count is still
//! decoded but reported once per call through a `warn!` event.

mod amazon;
mod bigbasket;
mod categories;
mod flipkart;
mod supermart;
mod trends;

pub use amazon::AmazonProduct;
pub use bigbasket::BigBasketProduct;
pub use categories::ProductCategory;
pub use flipkart::FlipkartProduct;
pub use supermart::SupermartSale;
pub use trends::ShoppingTrend;

use serde::Serialize;
use tracing::{debug, warn};

use crate::tokenizer::tokenize;

/// The catalog a product record originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Amazon,
    BigBasket,
    Trends,
    Flipkart,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Amazon => "amazon",
            SourceTag::BigBasket => "bigbasket",
            SourceTag::Trends => "trends",
            SourceTag::Flipkart => "flipkart",
        }
    }

    /// Prefix used when building synthetic product ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            SourceTag::Amazon => "amazon",
            SourceTag::BigBasket => "bb",
            SourceTag::Trends => "trend",
            SourceTag::Flipkart => "flipkart",
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded row from one of the four product catalogs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SourceRecord {
    Amazon(AmazonProduct),
    BigBasket(BigBasketProduct),
    Trends(ShoppingTrend),
    Flipkart(FlipkartProduct),
}

impl SourceRecord {
    pub fn tag(&self) -> SourceTag {
        match self {
            SourceRecord::Amazon(_) => SourceTag::Amazon,
            SourceRecord::BigBasket(_) => SourceTag::BigBasket,
            SourceRecord::Trends(_) => SourceTag::Trends,
            SourceRecord::Flipkart(_) => SourceTag::Flipkart,
        }
    }
}

impl From<AmazonProduct> for SourceRecord {
    fn from(value: AmazonProduct) -> Self {
        SourceRecord::Amazon(value)
    }
}

impl From<BigBasketProduct> for SourceRecord {
    fn from(value: BigBasketProduct) -> Self {
        SourceRecord::BigBasket(value)
    }
}

impl From<ShoppingTrend> for SourceRecord {
    fn from(value: ShoppingTrend) -> Self {
        SourceRecord::Trends(value)
    }
}

impl From<FlipkartProduct> for SourceRecord {
    fn from(value: FlipkartProduct) -> Self {
        SourceRecord::Flipkart(value)
    }
}

/// A positional row layout.
pub trait Schema: Sized {
    /// Name used in log events.
    const NAME: &'static str;
    /// Number of columns a well-formed row carries.
    const COLUMNS: usize;

    fn from_fields(fields: &mut Fields) -> Self;
}

/// Decodes the full text of a delimited export, skipping its header line.
///
/// Returns one record per remaining line, in file order.
#[tracing::instrument(skip(text), fields(schema = T::NAME, bytes = text.len()))]
pub fn decode<T: Schema>(text: &str) -> Vec<T> {
    let mut mismatched = 0usize;

    let records: Vec<T> = text
        .trim()
        .lines()
        .skip(1)
        .map(|line| {
            let mut fields = Fields::new(tokenize(line));
            if fields.len() != T::COLUMNS {
                mismatched += 1;
            }
            T::from_fields(&mut fields)
        })
        .collect();

    if mismatched > 0 {
        warn!(
            mismatched,
            expected_columns = T::COLUMNS,
            "Rows with unexpected column count decoded with defaults"
        );
    }
    debug!(rows = records.len(), "Decoded delimited rows");

    records
}

/// Tokenized cells of one row, consumed by position.
#[derive(Debug)]
pub struct Fields(Vec<String>);

impl Fields {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Takes the cell at `index`, or an empty string when the row is short.
    pub fn text(&mut self, index: usize) -> String {
        self.0.get_mut(index).map(std::mem::take).unwrap_or_default()
    }

    pub fn int(&mut self, index: usize) -> i64 {
        parse_int(&self.text(index))
    }

    pub fn float(&mut self, index: usize) -> f64 {
        parse_float(&self.text(index))
    }

    /// Splits a multi-valued cell on commas; an empty cell is an empty list.
    pub fn list(&mut self, index: usize) -> Vec<String> {
        let cell = self.text(index);
        if cell.is_empty() {
            return Vec::new();
        }
        cell.split(',').map(str::to_string).collect()
    }
}

/// Integer parse that falls back to `0`. A decimal value is truncated.
pub fn parse_int(value: &str) -> i64 {
    let value = value.trim();
    value.parse::<i64>().unwrap_or_else(|_| match value.parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc() as i64,
        _ => 0,
    })
}

/// Float parse that falls back to `0.0`; non-finite values count as failures.
pub fn parse_float(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
