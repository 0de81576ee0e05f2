//! Decoder for IDX image/label containers (the MNIST distribution format).
//!
//! ```text
//! images: u32 magic=0x00000803 | u32 count | u32 rows | u32 cols | count*rows*cols u8
//! labels: u32 magic=0x00000801 | u32 count | count u8
//! ```
//!
//! All header fields are big-endian. A wrong magic number or a buffer shorter
//! than its header declares is a hard error; nothing is returned for it.

use bytes::{Buf, Bytes};
use tracing::debug;

use crate::error::{Container, PipelineError, Result};

pub const IMAGES_MAGIC: u32 = 0x0000_0803;
pub const LABELS_MAGIC: u32 = 0x0000_0801;

const IMAGES_HEADER_LEN: usize = 16;
const LABELS_HEADER_LEN: usize = 8;

/// Raster payload of an images container. Pixels are stored contiguously,
/// image-major then row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSet {
    count: usize,
    rows: usize,
    cols: usize,
    pixels: Bytes,
}

impl ImageSet {
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn width(&self) -> usize {
        self.cols
    }

    pub fn height(&self) -> usize {
        self.rows
    }

    pub fn get(&self, index: usize) -> Option<Image<'_>> {
        if index >= self.count {
            return None;
        }
        let size = self.rows * self.cols;
        let start = index * size;
        Some(Image {
            width: self.cols,
            height: self.rows,
            pixels: &self.pixels[start..start + size],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Image<'_>> {
        (0..self.count).filter_map(move |i| self.get(i))
    }
}

/// Decodes an images container.
#[tracing::instrument(skip_all)]
pub fn decode_images(data: impl Into<Bytes>) -> Result<ImageSet> {
    let data: Bytes = data.into();
    let mut header = check_header(&data, Container::Images, IMAGES_MAGIC, IMAGES_HEADER_LEN)?;

    let count = header.get_u32() as usize;
    let rows = header.get_u32() as usize;
    let cols = header.get_u32() as usize;

    let payload = count
        .checked_mul(rows)
        .and_then(|n| n.checked_mul(cols))
        .unwrap_or(usize::MAX);
    let pixels = take_payload(&data, Container::Images, IMAGES_HEADER_LEN, payload)?;

    debug!(count, rows, cols, "Decoded images container");
    Ok(ImageSet {
        count,
        rows,
        cols,
        pixels,
    })
}

/// Decodes a labels container.
#[tracing::instrument(skip_all)]
pub fn decode_labels(data: impl Into<Bytes>) -> Result<Bytes> {
    let data: Bytes = data.into();
    let mut header = check_header(&data, Container::Labels, LABELS_MAGIC, LABELS_HEADER_LEN)?;

    let count = header.get_u32() as usize;
    let labels = take_payload(&data, Container::Labels, LABELS_HEADER_LEN, count)?;

    debug!(count, "Decoded labels container");
    Ok(labels)
}

/// Validates length and magic; returns the header past the magic field.
fn check_header(data: &Bytes, container: Container, magic: u32, header_len: usize) -> Result<&[u8]> {
    if data.len() < 4 {
        return Err(PipelineError::Truncated {
            container,
            expected: header_len,
            actual: data.len(),
        });
    }

    let mut header = &data[..];
    let found = header.get_u32();
    if found != magic {
        return Err(PipelineError::Format {
            container,
            expected: magic,
            found,
        });
    }

    if data.len() < header_len {
        return Err(PipelineError::Truncated {
            container,
            expected: header_len,
            actual: data.len(),
        });
    }

    Ok(&data[4..header_len])
}

fn take_payload(data: &Bytes, container: Container, offset: usize, len: usize) -> Result<Bytes> {
    let end = offset.checked_add(len).unwrap_or(usize::MAX);
    if data.len() < end {
        return Err(PipelineError::Truncated {
            container,
            expected: end,
            actual: data.len(),
        });
    }
    Ok(data.slice(offset..end))
}

/// Images paired index-for-index with their class labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDataset {
    images: ImageSet,
    labels: Bytes,
}

impl ImageDataset {
    /// Pairs decoded images with labels; the two counts must agree.
    pub fn new(images: ImageSet, labels: Bytes) -> Result<Self> {
        if images.len() != labels.len() {
            return Err(PipelineError::CountMismatch {
                images: images.len(),
                labels: labels.len(),
            });
        }
        Ok(Self { images, labels })
    }

    /// Decodes both containers and pairs them.
    pub fn decode(images: impl Into<Bytes>, labels: impl Into<Bytes>) -> Result<Self> {
        Self::new(decode_images(images)?, decode_labels(labels)?)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn width(&self) -> usize {
        self.images.width()
    }

    pub fn height(&self) -> usize {
        self.images.height()
    }

    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn image(&self, index: usize) -> Option<Image<'_>> {
        self.images.get(index)
    }

    pub fn label(&self, index: usize) -> Option<u8> {
        self.labels.get(index).copied()
    }

    /// Positions of every image labelled `digit`, ascending.
    pub fn indices_of(&self, digit: u8) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == digit)
            .map(|(i, _)| i)
            .collect()
    }

    /// `(image, label)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (Image<'_>, u8)> {
        self.images.iter().zip(self.labels.iter().copied())
    }
}

/// A borrowed view of one grayscale image. The pixel slice always holds
/// exactly `width * height` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Image<'a> {
    width: usize,
    height: usize,
    pixels: &'a [u8],
}

impl<'a> Image<'a> {
    /// Wraps `pixels` as a `width x height` raster; `None` if the sizes disagree.
    pub fn new(width: usize, height: usize, pixels: &'a [u8]) -> Option<Self> {
        (width.checked_mul(height)? == pixels.len()).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    pub fn pixel(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.pixels.get(row * self.width + col).copied()
    }

    pub fn rows(self) -> std::slice::Chunks<'a, u8> {
        self.pixels.chunks(self.width.max(1))
    }

    /// Nearest-neighbour upscale into an RGBA buffer of
    /// `(width * factor) * (height * factor) * 4` bytes. Each source pixel
    /// becomes a `factor x factor` block of opaque gray. `None` when the
    /// output size does not fit in `usize`.
    pub fn upscale_rgba(&self, factor: usize) -> Option<Vec<u8>> {
        let size = self
            .pixels
            .len()
            .checked_mul(factor)?
            .checked_mul(factor)?
            .checked_mul(4)?;
        let mut out = Vec::with_capacity(size);

        for row in self.rows() {
            let line: Vec<u8> = row
                .iter()
                .flat_map(|&v| std::iter::repeat_n([v, v, v, 255], factor).flatten())
                .collect();
            for _ in 0..factor {
                out.extend_from_slice(&line);
            }
        }

        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_images_header_and_payload() {
        let buf = images_buffer(2, 2, 3, &[0, 1, 2, 3, 4, 5, 10, 11, 12, 13, 14, 15]);
        let set = decode_images(buf).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.height(), 2);
        assert_eq!(set.width(), 3);
        let second = set.get(1).unwrap();
        assert_eq!(second.pixels(), &[10, 11, 12, 13, 14, 15]);
        assert_eq!(second.pixel(1, 0), Some(13));
        assert_eq!(second.pixel(2, 0), None);
        assert!(set.get(2).is_none());
    }

    #[test]
    fn test_wrong_images_magic_is_format_error() {
        let mut buf = images_buffer(1, 1, 1, &[7]);
        buf[3] = 0x01;

        let err = decode_images(buf).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Format {
                container: Container::Images,
                expected: IMAGES_MAGIC,
                found: LABELS_MAGIC,
            }
        ));
    }

    #[test]
    fn test_labels_file_given_as_images_is_rejected() {
        let err = decode_images(labels_buffer(&[1, 2, 3])).unwrap_err();
        assert!(err.is_format_violation());
    }

    #[test]
    fn test_wrong_labels_magic_is_format_error() {
        let err = decode_labels(images_buffer(0, 28, 28, &[])).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Format {
                container: Container::Labels,
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_payload_is_rejected() {
        let mut buf = images_buffer(2, 2, 2, &[0; 8]);
        buf.truncate(buf.len() - 1);

        let err = decode_images(buf).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Truncated {
                expected: 24,
                actual: 23,
                ..
            }
        ));
    }

    #[test]
    fn test_short_header_is_rejected() {
        assert!(matches!(
            decode_images(vec![0u8, 0]).unwrap_err(),
            PipelineError::Truncated { .. }
        ));
        assert!(matches!(
            decode_labels(vec![0u8, 0, 8, 1, 0]).unwrap_err(),
            PipelineError::Truncated { .. }
        ));
    }

    #[test]
    fn test_huge_declared_count_does_not_overflow() {
        let mut buf = IMAGES_MAGIC.to_be_bytes().to_vec();
        for v in [u32::MAX, u32::MAX, u32::MAX] {
            buf.extend_from_slice(&v.to_be_bytes());
        }
        assert!(decode_images(buf).unwrap_err().is_format_violation());
    }

    #[test]
    fn test_decode_labels() {
        let labels = decode_labels(labels_buffer(&[5, 0, 4])).unwrap();
        assert_eq!(&labels[..], &[5, 0, 4]);
    }

    #[test]
    fn test_dataset_pairs_images_and_labels() {
        let dataset = ImageDataset::decode(
            images_buffer(3, 2, 2, &[0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]),
            labels_buffer(&[7, 3, 7]),
        )
        .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.images().len(), dataset.labels().len());
        assert!(dataset.images().iter().all(|img| img.pixels().len() == 4));
        assert_eq!(dataset.label(1), Some(3));
        assert_eq!(dataset.indices_of(7), vec![0, 2]);
        assert!(dataset.indices_of(9).is_empty());
        assert_eq!(dataset.image(2).unwrap().pixels(), &[2, 2, 2, 2]);
    }

    #[test]
    fn test_dataset_count_mismatch() {
        let err = ImageDataset::decode(images_buffer(2, 1, 1, &[0, 1]), labels_buffer(&[1]))
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::CountMismatch {
                images: 2,
                labels: 1
            }
        ));
    }

    #[test]
    fn test_upscale_rgba() {
        let pixels = [10u8, 20, 30, 40];
        let image = Image::new(2, 2, &pixels).unwrap();
        let out = image.upscale_rgba(2).unwrap();

        assert_eq!(out.len(), 4 * 4 * 4);
        // row 0 of the output: 10,10,20,20
        assert_eq!(&out[0..4], &[10, 10, 10, 255]);
        assert_eq!(&out[4..8], &[10, 10, 10, 255]);
        assert_eq!(&out[8..12], &[20, 20, 20, 255]);
        // row 1 repeats row 0
        assert_eq!(&out[16..32], &out[0..16]);
        // row 2 starts with the second source row
        assert_eq!(&out[32..36], &[30, 30, 30, 255]);
        assert_eq!(&out[60..64], &[40, 40, 40, 255]);
    }

    #[test]
    fn test_upscale_factor_one_is_plain_rgba() {
        let pixels = [0u8, 255];
        let image = Image::new(2, 1, &pixels).unwrap();
        assert_eq!(
            image.upscale_rgba(1),
            Some(vec![0, 0, 0, 255, 255, 255, 255, 255])
        );
        assert_eq!(image.upscale_rgba(0), Some(Vec::new()));
    }

    #[test]
    fn test_upscale_overflow_is_none() {
        let pixels = [1u8; 4];
        let image = Image::new(2, 2, &pixels).unwrap();
        assert_eq!(image.upscale_rgba(1usize << 62), None);
        assert_eq!(image.upscale_rgba(usize::MAX), None);
    }

    #[test]
    fn test_image_rejects_mismatched_raster() {
        let pixels = [0u8; 3];
        assert!(Image::new(2, 2, &pixels).is_none());
        assert!(Image::new(usize::MAX, 2, &pixels).is_none());

        let image = Image::new(3, 1, &pixels).unwrap();
        assert_eq!(image.pixel(0, 2), Some(0));
        assert_eq!(image.pixel(1, 0), None);
        assert_eq!(image.rows().count(), 1);
    }

    fn images_buffer(count: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        for v in [IMAGES_MAGIC, count, rows, cols] {
            buf.extend_from_slice(&v.to_be_bytes());
        }
        buf.extend_from_slice(pixels);
        buf
    }

    fn labels_buffer(labels: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&LABELS_MAGIC.to_be_bytes());
        buf.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        buf.extend_from_slice(labels);
        buf
    }
}
