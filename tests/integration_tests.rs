use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use shoplens::analytics::{TrendReport, by_category};
use shoplens::fetch::gunzip_if_compressed;
use shoplens::idx::{IMAGES_MAGIC, LABELS_MAGIC};
use shoplens::schema::{AmazonProduct, BigBasketProduct, FlipkartProduct, ShoppingTrend};
use shoplens::{
    DigitStats, ImageDataset, PipelineConfig, PipelineError, SourceBatch, SourceTag, Unifier,
    decode,
};
use std::io::Write;

const TRENDS: &str = include_str!("fixtures/shopping_trends.csv");
const AMAZON: &str = include_str!("fixtures/amazon.csv");
const BIGBASKET: &str = include_str!("fixtures/bigbasket.csv");
const FLIPKART: &str = include_str!("fixtures/flipkart.csv");

fn all_batches() -> Vec<SourceBatch> {
    vec![
        SourceBatch::amazon(decode::<AmazonProduct>(AMAZON)),
        SourceBatch::bigbasket(decode::<BigBasketProduct>(BIGBASKET)),
        SourceBatch::trends(decode::<ShoppingTrend>(TRENDS)),
        SourceBatch::flipkart(decode::<FlipkartProduct>(FLIPKART)),
    ]
}

#[test]
fn test_full_catalog_pipeline() {
    let products = Unifier::default()
        .unify(&all_batches())
        .expect("Failed to unify catalogs");

    // 3 amazon + 3 bigbasket + 9 distinct trend items + 2 flipkart
    assert_eq!(products.len(), 17);

    let mut ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), products.len());

    for p in &products {
        assert!(!p.name.is_empty());
        assert!(!p.category.is_empty());
        assert!(p.price >= 0.0);
        assert!((0.0..=5.0).contains(&p.rating));
        assert_eq!(p.original_price.is_some(), p.discount_percent.is_some());
        if let Some(original) = p.original_price {
            assert!(original > p.price);
        }
    }

    let cable = &products[0];
    assert_eq!(cable.id, "B07JW9H4J1");
    assert_eq!(cable.category, "Computers&Accessories");
    assert_eq!(cable.price, 399.0);
    assert_eq!(cable.original_price, Some(1099.0));
    assert_eq!(cable.discount_percent, Some(64));

    // sale above listed: no markdown
    assert_eq!(products[2].price, 329.0);
    assert_eq!(products[2].discount_percent, None);
    assert_eq!(products[2].image, None);

    let lamp = &products[5];
    assert_eq!(lamp.source, SourceTag::BigBasket);
    assert_eq!(lamp.id, "bb_2_Brass_Angle_Deep_-_P");
    assert_eq!(lamp.discount_percent, Some(52));
    assert_eq!(products[4].category, "Kitchen, Garden & Pets");

    let blouse = &products[6];
    assert_eq!(blouse.source, SourceTag::Trends);
    assert_eq!(blouse.id, "trend_0_Blouse");
    assert_eq!(blouse.rating, 4.6);
    assert_eq!(blouse.price, 49.0 * 83.0);

    let ball = &products[16];
    assert_eq!(ball.id, "flipkart_1_Leather_Ball");
    assert_eq!(ball.category, "Sports");
    assert_eq!(ball.description.as_deref(), Some("Hand stitched"));
}

#[test]
fn test_missing_sources_degrade_to_partial_result() {
    let batches = vec![
        SourceBatch::empty(SourceTag::Amazon),
        SourceBatch::flipkart(decode::<FlipkartProduct>(FLIPKART)),
    ];
    let products = Unifier::default().unify(&batches).unwrap();

    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p.source == SourceTag::Flipkart));
    assert!(Unifier::default().unify(&[]).unwrap().is_empty());
}

#[test]
fn test_trend_report_over_fixture() {
    let rows = decode::<ShoppingTrend>(TRENDS);
    assert_eq!(rows.len(), 11);

    let report = TrendReport::build(&rows, &PipelineConfig::default());

    assert_eq!(report.summary.total_customers, 11);
    assert_eq!(report.summary.total_revenue, 596.0);
    assert!((report.summary.average_order_value - 596.0 / 11.0).abs() < 1e-9);

    let categories: Vec<(&str, f64, usize)> = report
        .categories
        .iter()
        .map(|b| (b.category.as_str(), b.total_sales, b.item_count))
        .collect();
    assert_eq!(
        categories,
        vec![
            ("Clothing", 358.0, 7),
            ("Footwear", 110.0, 2),
            ("Outerwear", 97.0, 1),
            ("Accessories", 31.0, 1),
        ]
    );
    assert!((report.categories[0].average_rating - 20.3 / 7.0).abs() < 1e-9);

    assert_eq!(report.locations.len(), 10);
    assert_eq!(report.locations[0].location, "West Virginia");
    let kentucky = report
        .locations
        .iter()
        .find(|b| b.location == "Kentucky")
        .unwrap();
    assert_eq!(kentucky.customer_count, 2);
    assert_eq!(kentucky.average_order_value, 26.5);

    let seasons: Vec<&str> = report.seasons.iter().map(|b| b.season.as_str()).collect();
    assert_eq!(seasons, vec!["Spring", "Winter", "Summer", "Fall"]);

    let counts: Vec<usize> = report.age_brackets.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![2, 2, 1, 3, 2, 1]);
    assert_eq!(counts.iter().sum::<usize>(), rows.len());
}

#[test]
fn test_category_aggregation_is_pure() {
    let rows = decode::<ShoppingTrend>(TRENDS);
    assert_eq!(by_category(&rows), by_category(&rows));
}

#[test]
fn test_gzipped_idx_pipeline() {
    let (images, labels) = mnist_like(&[
        (5, [0, 255, 255, 0]),
        (0, [255, 0, 0, 255]),
        (5, [10, 10, 10, 10]),
    ]);

    let images = gunzip_if_compressed(gzip(&images)).unwrap();
    let labels = gunzip_if_compressed(gzip(&labels)).unwrap();
    let dataset = ImageDataset::decode(images, labels).expect("Failed to decode dataset");

    assert_eq!(dataset.images().len(), dataset.labels().len());
    assert!(dataset.images().iter().all(|img| img.width() == 2 && img.height() == 2));
    assert_eq!(dataset.indices_of(5), vec![0, 2]);

    let stats = DigitStats::from_dataset(&dataset);
    assert_eq!(stats.total_images, 3);
    assert_eq!(stats.digit_counts.len(), 10);
    assert_eq!(stats.digit_counts[&5], 2);
    assert_eq!(stats.digit_counts[&0], 1);
    assert_eq!(stats.average_pixel_intensity, (510.0 + 510.0 + 40.0) / 12.0);

    let rgba = dataset.image(1).unwrap().upscale_rgba(3).unwrap();
    assert_eq!(rgba.len(), 6 * 6 * 4);
    assert_eq!(&rgba[..4], &[255, 255, 255, 255]);
    assert!(dataset.image(1).unwrap().upscale_rgba(usize::MAX).is_none());
}

#[test]
fn test_swapped_containers_fail_hard() {
    let (images, labels) = mnist_like(&[(1, [0, 0, 0, 0])]);

    let err = ImageDataset::decode(labels, images).unwrap_err();
    assert!(matches!(err, PipelineError::Format { .. }));
}

fn mnist_like(samples: &[(u8, [u8; 4])]) -> (Vec<u8>, Vec<u8>) {
    let count = samples.len() as u32;

    let mut images = Vec::new();
    for v in [IMAGES_MAGIC, count, 2, 2] {
        images.extend_from_slice(&v.to_be_bytes());
    }
    let mut labels = Vec::new();
    for v in [LABELS_MAGIC, count] {
        labels.extend_from_slice(&v.to_be_bytes());
    }

    for (label, pixels) in samples {
        images.extend_from_slice(pixels);
        labels.push(*label);
    }

    (images, labels)
}

fn gzip(data: &[u8]) -> Bytes {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    Bytes::from(encoder.finish().unwrap())
}
