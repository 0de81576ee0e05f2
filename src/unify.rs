//! Merges decoded catalog rows into one canonical product list.
//!
//! Each [`SourceBatch`] is mapped in order and the batches are concatenated in
//! the order the caller supplies them. Rows never cause a failure here; the
//! only error is a batch whose records don't belong to its declared source.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::schema::{
    AmazonProduct, BigBasketProduct, FlipkartProduct, ShoppingTrend, SourceRecord, SourceTag,
};

const FALLBACK_CATEGORY: &str = "Uncategorized";

/// A product as presented to callers, whatever catalog it came from.
///
/// Prices are INR. `original_price` and `discount_percent` are either both set
/// or both `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub discount_percent: Option<u8>,
    pub rating: f64,
    pub rating_count: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub source: SourceTag,
}

/// Decoded rows from one catalog, tagged with the catalog they claim to be.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub source: SourceTag,
    pub records: Vec<SourceRecord>,
}

impl SourceBatch {
    pub fn new(source: SourceTag, records: Vec<SourceRecord>) -> Self {
        Self { source, records }
    }

    pub fn amazon(rows: Vec<AmazonProduct>) -> Self {
        Self::wrap(SourceTag::Amazon, rows)
    }

    pub fn bigbasket(rows: Vec<BigBasketProduct>) -> Self {
        Self::wrap(SourceTag::BigBasket, rows)
    }

    pub fn trends(rows: Vec<ShoppingTrend>) -> Self {
        Self::wrap(SourceTag::Trends, rows)
    }

    pub fn flipkart(rows: Vec<FlipkartProduct>) -> Self {
        Self::wrap(SourceTag::Flipkart, rows)
    }

    /// A batch for a source that could not be loaded.
    pub fn empty(source: SourceTag) -> Self {
        Self::new(source, Vec::new())
    }

    fn wrap<T: Into<SourceRecord>>(source: SourceTag, rows: Vec<T>) -> Self {
        Self::new(source, rows.into_iter().map(Into::into).collect())
    }

    fn check(&self) -> Result<()> {
        match self.records.iter().position(|r| r.tag() != self.source) {
            None => Ok(()),
            Some(position) => Err(PipelineError::SchemaMismatch {
                declared: self.source,
                found: self.records[position].tag(),
                position,
            }),
        }
    }
}

/// Maps catalog rows onto [`ProductRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct Unifier {
    config: PipelineConfig,
}

impl Unifier {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Unifies `batches` in the given order.
    ///
    /// Every batch is checked before any mapping happens, so a mismatch never
    /// yields a partial list.
    #[tracing::instrument(skip_all, fields(batches = batches.len()))]
    pub fn unify(&self, batches: &[SourceBatch]) -> Result<Vec<ProductRecord>> {
        for batch in batches {
            batch.check()?;
        }

        let mut ids = IdAllocator::default();
        let mut products = Vec::with_capacity(batches.iter().map(|b| b.records.len()).sum());

        for batch in batches {
            let before = products.len();
            let mut nameless = 0usize;

            let mapped: Vec<ProductRecord> = match batch.source {
                SourceTag::Trends => {
                    let rows = batch.records.iter().filter_map(|r| match r {
                        SourceRecord::Trends(t) => Some(t),
                        _ => None,
                    });
                    dedupe_trends(rows)
                        .into_iter()
                        .enumerate()
                        .map(|(position, t)| self.map_trend(t, position))
                        .collect()
                }
                _ => batch
                    .records
                    .iter()
                    .enumerate()
                    .filter_map(|(position, record)| match record {
                        SourceRecord::Amazon(p) => Some(self.map_amazon(p, position)),
                        SourceRecord::BigBasket(p) => Some(self.map_bigbasket(p, position)),
                        SourceRecord::Flipkart(p) => Some(self.map_flipkart(p, position)),
                        SourceRecord::Trends(_) => None,
                    })
                    .collect(),
            };

            for mut product in mapped {
                if product.name.is_empty() {
                    nameless += 1;
                    continue;
                }
                product.id = ids.claim(product.id);
                products.push(product);
            }

            if nameless > 0 {
                warn!(source = %batch.source, nameless, "Dropped rows without a product name");
            }
            debug!(
                source = %batch.source,
                rows = batch.records.len(),
                products = products.len() - before,
                "Source unified"
            );
        }

        Ok(products)
    }

    fn map_amazon(&self, p: &AmazonProduct, position: usize) -> ProductRecord {
        let listed = parse_currency(&p.actual_price);
        let price = sale_or_listed(parse_currency(&p.discounted_price), listed);
        let (original_price, discount_percent) = split(markdown(listed, price));

        let category = match p.category.split('|').next() {
            Some(head) if !head.is_empty() => head,
            _ => p.category.as_str(),
        };
        let id = if p.product_id.is_empty() {
            self.synthetic_id(SourceTag::Amazon, position, &p.product_name)
        } else {
            p.product_id.clone()
        };

        ProductRecord {
            id,
            name: p.product_name.clone(),
            category: display_category(category),
            price,
            original_price,
            discount_percent,
            rating: clamp_rating(p.rating),
            rating_count: non_empty(&p.rating_count),
            description: non_empty(&p.about_product),
            image: non_empty(&p.img_link),
            brand: None,
            source: SourceTag::Amazon,
        }
    }

    fn map_bigbasket(&self, p: &BigBasketProduct, position: usize) -> ProductRecord {
        let listed = Some(p.market_price).filter(|v| *v > 0.0);
        let price = sale_or_listed(Some(p.sale_price), listed);
        let (original_price, discount_percent) = split(markdown(listed, price));

        ProductRecord {
            id: self.synthetic_id(SourceTag::BigBasket, position, &p.product),
            name: p.product.clone(),
            category: display_category(&p.category),
            price,
            original_price,
            discount_percent,
            rating: clamp_rating(p.rating),
            rating_count: None,
            description: non_empty(&p.description),
            image: None,
            brand: non_empty(&p.brand),
            source: SourceTag::BigBasket,
        }
    }

    fn map_trend(&self, t: &ShoppingTrend, position: usize) -> ProductRecord {
        let name = format!("{} {}", t.color, t.item_purchased).trim().to_string();

        ProductRecord {
            id: self.synthetic_id(SourceTag::Trends, position, &t.item_purchased),
            name,
            category: display_category(&t.category),
            price: (t.purchase_amount * self.config.usd_to_inr).round().max(0.0),
            original_price: None,
            discount_percent: None,
            rating: clamp_rating(t.review_rating),
            rating_count: None,
            description: Some(format!(
                "{} item in {} color, size {}",
                t.category, t.color, t.size
            )),
            image: None,
            brand: None,
            source: SourceTag::Trends,
        }
    }

    fn map_flipkart(&self, p: &FlipkartProduct, position: usize) -> ProductRecord {
        let listed = parse_currency(&p.mrp);
        let price = sale_or_listed(parse_currency(&p.selling_price), listed);
        let (original_price, discount_percent) = split(markdown(listed, price));

        let category = if p.category_2.is_empty() {
            &p.category_1
        } else {
            &p.category_2
        };
        let description = if p.description.is_empty() {
            &p.highlights
        } else {
            &p.description
        };

        ProductRecord {
            id: self.synthetic_id(SourceTag::Flipkart, position, &p.title),
            name: p.title.clone(),
            category: display_category(category),
            price,
            original_price,
            discount_percent,
            rating: clamp_rating(p.product_rating),
            rating_count: None,
            description: non_empty(description),
            image: non_empty(&p.image_links),
            brand: non_empty(&p.seller_name),
            source: SourceTag::Flipkart,
        }
    }

    fn synthetic_id(&self, source: SourceTag, position: usize, name: &str) -> String {
        format!(
            "{}_{}_{}",
            source.id_prefix(),
            position,
            slug(name, self.config.slug_max_len)
        )
    }
}

/// Parses a currency string such as `"₹1,234.50"` by dropping every character
/// that is not a digit or a decimal point.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Returns `(original, percent)` when `listed` is strictly above `price`.
pub fn markdown(listed: Option<f64>, price: f64) -> Option<(f64, u8)> {
    let original = listed.filter(|l| *l > price)?;
    let percent = ((original - price) / original * 100.0).round().clamp(0.0, 100.0);
    Some((original, percent as u8))
}

/// Collapses whitespace runs to `_` and caps the result at `max_len` characters.
pub fn slug(name: &str, max_len: usize) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(max_len)
        .collect()
}

/// Keeps the highest-rated row per (item, category, color, size).
///
/// Output order is the order in which each key was first seen; on equal
/// ratings the earlier row wins.
pub fn dedupe_trends<'a, I>(rows: I) -> Vec<&'a ShoppingTrend>
where
    I: IntoIterator<Item = &'a ShoppingTrend>,
{
    let mut kept: IndexMap<(&str, &str, &str, &str), &ShoppingTrend> = IndexMap::new();

    for row in rows {
        let key = (
            row.item_purchased.as_str(),
            row.category.as_str(),
            row.color.as_str(),
            row.size.as_str(),
        );
        kept.entry(key)
            .and_modify(|best| {
                if row.review_rating > best.review_rating {
                    *best = row;
                }
            })
            .or_insert(row);
    }

    kept.into_values().collect()
}

fn sale_or_listed(sale: Option<f64>, listed: Option<f64>) -> f64 {
    sale.filter(|v| *v > 0.0)
        .or(listed)
        .unwrap_or(0.0)
        .max(0.0)
}

fn split(markdown: Option<(f64, u8)>) -> (Option<f64>, Option<u8>) {
    match markdown {
        Some((original, percent)) => (Some(original), Some(percent)),
        None => (None, None),
    }
}

fn clamp_rating(rating: f64) -> f64 {
    rating.clamp(0.0, 5.0)
}

fn display_category(category: &str) -> String {
    if category.is_empty() {
        FALLBACK_CATEGORY.to_string()
    } else {
        category.to_string()
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Hands out ids that are unique within one unify call.
#[derive(Default)]
struct IdAllocator {
    issued: HashSet<String>,
}

impl IdAllocator {
    fn claim(&mut self, candidate: String) -> String {
        if self.issued.insert(candidate.clone()) {
            return candidate;
        }
        let mut n = 2;
        loop {
            let id = format!("{candidate}~{n}");
            if self.issued.insert(id.clone()) {
                debug!(original = %candidate, id = %id, "Disambiguated duplicate product id");
                return id;
            }
            n += 1;
        }
    }
}
