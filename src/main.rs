//! CLI entry point for shoplens.
//!
//! Provides subcommands for unifying product catalogs, aggregating shopping
//! trends, and summarising IDX digit datasets. Inputs may be local paths or
//! URLs; results are printed to stdout.

use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use shoplens::analytics::{self, GroupBy, Rollup, TrendReport};
use shoplens::fetch::{BasicClient, load_source, load_text};
use shoplens::output::{append_csv, to_json, write_csv};
use shoplens::schema::{Schema, ShoppingTrend, decode};
use shoplens::{DigitStats, ImageDataset, PipelineConfig, SourceBatch, SourceTag, Unifier};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "shoplens")]
#[command(about = "Normalise retail catalog exports and summarise digit datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge any subset of the product catalogs into one product list
    Products {
        /// Amazon export (path or URL)
        #[arg(long)]
        amazon: Option<String>,

        /// BigBasket export (path or URL)
        #[arg(long)]
        bigbasket: Option<String>,

        /// Shopping-behaviour export (path or URL)
        #[arg(long)]
        trends: Option<String>,

        /// Flipkart export (path or URL)
        #[arg(long)]
        flipkart: Option<String>,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Append the products as CSV rows to this file instead of printing them
        #[arg(long, value_name = "PATH", conflicts_with = "format")]
        append: Option<String>,
    },
    /// Aggregate shopping-behaviour purchases
    Trends {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Only compute one dimension instead of the full report
        #[arg(short, long, value_enum)]
        group_by: Option<GroupBy>,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Summarise an IDX image/label pair
    Digits {
        /// Images container (path or URL, optionally gzipped)
        #[arg(long)]
        images: String,

        /// Labels container (path or URL, optionally gzipped)
        #[arg(long)]
        labels: String,

        /// Also write the RGBA rendering of the image at this index
        #[arg(long)]
        render: Option<usize>,

        /// Upscale factor for --render
        #[arg(long, default_value_t = 8)]
        scale: usize,

        /// Output file for --render
        #[arg(short, long, default_value = "digit.rgba")]
        out: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/shoplens.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("shoplens.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::from_env();
    let client = BasicClient::new();

    match cli.command {
        Commands::Products {
            amazon,
            bigbasket,
            trends,
            flipkart,
            format,
            append,
        } => {
            let (amazon, bigbasket, trends, flipkart) = tokio::join!(
                catalog(&client, SourceTag::Amazon, amazon.as_deref(), SourceBatch::amazon),
                catalog(&client, SourceTag::BigBasket, bigbasket.as_deref(), SourceBatch::bigbasket),
                catalog(&client, SourceTag::Trends, trends.as_deref(), SourceBatch::trends),
                catalog(&client, SourceTag::Flipkart, flipkart.as_deref(), SourceBatch::flipkart),
            );

            let products = Unifier::new(config).unify(&[amazon, bigbasket, trends, flipkart])?;
            info!(products = products.len(), "Catalogs unified");

            match (append, format) {
                (Some(path), _) => append_csv(&path, &products)?,
                (None, Format::Json) => println!("{}", to_json(&products)?),
                (None, Format::Csv) => write_csv(std::io::stdout().lock(), &products)?,
            }
        }
        Commands::Trends {
            source,
            group_by,
            format,
        } => {
            let text = load_text(&client, &source).await?;
            let rows: Vec<ShoppingTrend> = decode(&text);
            info!(rows = rows.len(), "Trend rows decoded");

            match (group_by, format) {
                (None, Format::Json) => println!("{}", to_json(&TrendReport::build(&rows, &config))?),
                (None, Format::Csv) => bail!("CSV output needs --group-by"),
                (Some(group_by), Format::Json) => {
                    println!("{}", to_json(&analytics::aggregate(&rows, group_by, &config))?)
                }
                (Some(group_by), Format::Csv) => {
                    let out = std::io::stdout().lock();
                    match analytics::aggregate(&rows, group_by, &config) {
                        Rollup::Category(b) => write_csv(out, &b)?,
                        Rollup::Location(b) => write_csv(out, &b)?,
                        Rollup::Season(b) => write_csv(out, &b)?,
                        Rollup::AgeBracket(b) => write_csv(out, &b)?,
                    }
                }
            }
        }
        Commands::Digits {
            images,
            labels,
            render,
            scale,
            out,
        } => {
            let (images, labels) = tokio::try_join!(
                load_source(&client, &images),
                load_source(&client, &labels)
            )?;
            let dataset = ImageDataset::decode(images, labels)?;
            info!(
                images = dataset.len(),
                width = dataset.width(),
                height = dataset.height(),
                "Dataset decoded"
            );

            println!("{}", to_json(&DigitStats::from_dataset(&dataset))?);

            if let Some(index) = render {
                let image = dataset
                    .image(index)
                    .ok_or_else(|| anyhow!("image {index} out of range (dataset has {})", dataset.len()))?;
                let rgba = image
                    .upscale_rgba(scale)
                    .ok_or_else(|| anyhow!("scale {scale} is too large for a {}x{} image", image.width(), image.height()))?;
                std::fs::write(&out, &rgba)?;
                info!(
                    index,
                    label = dataset.label(index),
                    scale,
                    bytes = rgba.len(),
                    path = %out,
                    "Rendered image"
                );
            }
        }
    }

    Ok(())
}

/// Loads and decodes one catalog. An unreachable source becomes an empty
/// batch so the remaining catalogs still unify.
async fn catalog<T, F>(
    client: &BasicClient,
    tag: SourceTag,
    location: Option<&str>,
    wrap: F,
) -> SourceBatch
where
    T: Schema,
    F: FnOnce(Vec<T>) -> SourceBatch,
{
    let Some(location) = location else {
        return SourceBatch::empty(tag);
    };

    match load_text(client, location).await {
        Ok(text) => wrap(decode::<T>(&text)),
        Err(e) => {
            warn!(source = %tag, error = %e, "Source unavailable, continuing without it");
            SourceBatch::empty(tag)
        }
    }
}
