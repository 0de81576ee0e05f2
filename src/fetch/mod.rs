//! Loading raw source buffers from disk or over HTTP.
//!
//! This is the I/O edge of the pipeline: everything downstream works on fully
//! materialised buffers. Gzipped inputs (IDX corpora usually ship as `.gz`)
//! are decompressed transparently.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use std::io::Read;

use anyhow::{Context, Result};
use bytes::Bytes;
use flate2::read::GzDecoder;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?)
}

/// Reads `location` as a URL when it starts with `http`, otherwise as a path.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, location: &str) -> Result<Bytes> {
    let raw = if location.starts_with("http") {
        fetch_bytes(client, location)
            .await
            .with_context(|| format!("fetching {location}"))?
    } else {
        Bytes::from(
            tokio::fs::read(location)
                .await
                .with_context(|| format!("reading {location}"))?,
        )
    };

    let data = gunzip_if_compressed(raw).with_context(|| format!("decompressing {location}"))?;
    debug!(bytes = data.len(), "Source loaded");
    Ok(data)
}

/// Loads a delimited text source. Invalid UTF-8 is replaced rather than rejected.
pub async fn load_text<C: HttpClient>(client: &C, location: &str) -> Result<String> {
    let data = load_source(client, location).await?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Inflates `data` if it starts with the gzip magic; otherwise returns it as is.
pub fn gunzip_if_compressed(data: Bytes) -> Result<Bytes> {
    if !data.starts_with(&GZIP_MAGIC) {
        return Ok(data);
    }

    let mut out = Vec::new();
    GzDecoder::new(&data[..]).read_to_end(&mut out)?;
    debug!(compressed = data.len(), inflated = out.len(), "Inflated gzip source");
    Ok(Bytes::from(out))
}
