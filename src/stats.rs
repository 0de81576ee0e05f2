use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::idx::ImageDataset;

/// Number of digit classes; every class appears in `digit_counts`.
pub const DIGIT_CLASSES: u8 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DigitStats {
    pub total_images: usize,
    pub digit_counts: BTreeMap<u8, usize>,
    /// Labels outside 0-9; not counted in `digit_counts`.
    pub unknown_labels: usize,
    pub average_pixel_intensity: f64,
}

impl DigitStats {
    pub fn from_dataset(dataset: &ImageDataset) -> Self {
        let mut s = DigitStats {
            total_images: dataset.len(),
            digit_counts: (0..DIGIT_CLASSES).map(|d| (d, 0)).collect(),
            unknown_labels: 0,
            average_pixel_intensity: 0.0,
        };

        let mut intensity_sum = 0u64;
        let mut pixel_count = 0usize;

        for (image, label) in dataset.iter() {
            match s.digit_counts.get_mut(&label) {
                Some(count) => *count += 1,
                None => s.unknown_labels += 1,
            }

            intensity_sum += image.pixels().iter().map(|&p| u64::from(p)).sum::<u64>();
            pixel_count += image.pixels().len();
        }

        if s.unknown_labels > 0 {
            warn!(unknown = s.unknown_labels, "Labels outside the digit range");
        }

        if pixel_count > 0 {
            s.average_pixel_intensity = intensity_sum as f64 / pixel_count as f64;
        }

        s
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Share of the dataset labelled `digit`, in percent.
    pub fn digit_pct(&self, digit: u8) -> f64 {
        let count = self.digit_counts.get(&digit).copied().unwrap_or(0);
        Self::pct(count, self.total_images)
    }
}
