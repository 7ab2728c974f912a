//! Stipple Demo: run one filter over an image file and write a preview copy.
//!
//! ```text
//! stipple-demo photo.jpg --filter '{ "filter": "oil", "range": 2 }'
//! stipple-demo photo.jpg --config marble.json --output warped.png --histogram
//! ```

mod config;
mod image_loader;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use stipple_core::{Channel, FilterConfig, FilterError, Histogram, PixelBuffer};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::image_loader::{ImageLoadError, load_image, preview_path, save_image};

#[derive(Debug, Parser)]
#[command(name = "stipple-demo", version, about = "Apply a pixel filter to an image file")]
struct Args {
    /// Source image.
    input: PathBuf,

    /// JSON file holding the filter config.
    #[arg(short, long, conflicts_with = "filter")]
    config: Option<PathBuf>,

    /// Inline JSON filter config.
    #[arg(short, long)]
    filter: Option<String>,

    /// Output path. Defaults to `<stem><suffix>.<ext>` next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a histogram summary of the filtered image.
    #[arg(long)]
    histogram: bool,
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Image(#[from] ImageLoadError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("cannot read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no filter given; pass --filter or --config")]
    MissingFilter,
}

fn main() -> ExitCode {
    let app = AppConfig::default();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&app.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args, &app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, app: &AppConfig) -> Result<(), DemoError> {
    let json = match (&args.filter, &args.config) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|source| DemoError::ReadConfig {
            path: path.clone(),
            source,
        })?,
        (None, None) => return Err(DemoError::MissingFilter),
    };
    let config = FilterConfig::from_json(&json)?;

    let source = load_image(&args.input)?;
    tracing::info!(
        input = %args.input.display(),
        width = source.width,
        height = source.height,
        filter = config.name(),
        "filtering"
    );

    let output = stipple_core::apply(&config, &source)?;

    let out_path = args
        .output
        .clone()
        .unwrap_or_else(|| preview_path(&args.input, &app.output_suffix));
    save_image(&output, &out_path)?;
    tracing::info!(output = %out_path.display(), "wrote preview");

    if args.histogram {
        print_histogram(&output)?;
    }
    Ok(())
}

fn print_histogram(buffer: &PixelBuffer) -> Result<(), FilterError> {
    let histogram = Histogram::new(buffer)?;
    println!("samples: {}", histogram.num_samples());
    if histogram.is_gray() {
        println!("gray image");
    }
    for (label, channel) in [("red", Channel::Red), ("green", Channel::Green), ("blue", Channel::Blue)] {
        println!(
            "{label:>5}: min {:3}  max {:3}  mean {:7.2}  peak {}",
            histogram.min_value(channel),
            histogram.max_value(channel),
            histogram.mean(channel).unwrap_or(0.0),
            histogram.max_frequency(channel).unwrap_or(0),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_inline_filter() {
        let args = Args::try_parse_from(["stipple-demo", "in.png", "--filter", r#"{"filter":"oil"}"#]).unwrap();
        assert_eq!(args.input, PathBuf::from("in.png"));
        assert!(args.config.is_none());
        assert!(!args.histogram);
    }

    #[test]
    fn test_args_config_and_filter_conflict() {
        let result = Args::try_parse_from(["stipple-demo", "in.png", "--filter", "{}", "--config", "f.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_without_filter_fails() {
        let args = Args::try_parse_from(["stipple-demo", "in.png"]).unwrap();
        let app = AppConfig {
            log_filter: "off".to_owned(),
            output_suffix: "_copy".to_owned(),
        };
        assert!(matches!(run(&args, &app), Err(DemoError::MissingFilter)));
    }
}
