//! markerscan CLI: detect markers in an image file and print JSON.

use clap::Parser;
use markerscan::{encode_png, DetectorParams, MarkerDetector};
use std::path::PathBuf;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(name = "markerscan")]
#[command(about = "Detect DICT_4X4_50 markers in an image and print JSON")]
#[command(version)]
struct Cli {
    /// Path to the input image (JPEG, PNG, BMP, TIFF or WebP).
    image: PathBuf,

    /// Write an annotated PNG to this path.
    #[arg(long)]
    annotated: Option<PathBuf>,

    /// Detector parameters as JSON (missing fields keep their defaults).
    #[arg(long, env = "MARKERSCAN_PARAMS")]
    params: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Log level for diagnostics on stderr.
    #[arg(long, default_value = "warn")]
    log_level: log::LevelFilter,
}

fn run(cli: Cli) -> CliResult<()> {
    #[cfg(feature = "tracing")]
    {
        markerscan::core::init_tracing(false);
        log::set_max_level(cli.log_level);
    }
    #[cfg(not(feature = "tracing"))]
    markerscan::core::init_with_level(cli.log_level)?;

    let params = match &cli.params {
        Some(path) => DetectorParams::load_json(path)?,
        None => DetectorParams::default(),
    };
    let detector = MarkerDetector::new(params);

    let bytes = std::fs::read(&cli.image)
        .map_err(|e| format!("failed to read {}: {e}", cli.image.display()))?;

    let result = match &cli.annotated {
        Some(out) => {
            let (result, annotated) = detector.detect_and_annotate(&bytes)?;
            std::fs::write(out, encode_png(&annotated)?)
                .map_err(|e| format!("failed to write {}: {e}", out.display()))?;
            result
        }
        None => detector.detect(&bytes)?,
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
