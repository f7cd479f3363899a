//! scorescan CLI: recognize notes in a plain-text grayscale score image.

use clap::Parser;
use std::path::{Path, PathBuf};

use scorescan::{render_text, RecognizeConfig, Recognizer};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "scorescan")]
#[command(about = "Recognize notes, durations and measures in a P2 score image")]
#[command(version)]
struct Cli {
    /// Path to the input image (plain PGM, `P2`).
    image: PathBuf,

    /// Recognition config (JSON). Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the full recognition result (JSON).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Skip stem detection; every note is then a whole or a quarter.
    #[arg(long)]
    no_stems: bool,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.no_stems)?;
    run_recognize(&cli.image, config, cli.out.as_deref())
}

fn load_config(path: Option<&Path>, no_stems: bool) -> CliResult<RecognizeConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::info!("Loading config: {}", path.display());
            RecognizeConfig::from_json_file(path).map_err(|e| -> CliError {
                format!("Failed to load config {}: {}", path.display(), e).into()
            })?
        }
        None => RecognizeConfig::default(),
    };
    if no_stems {
        config.stem.enable = false;
    }
    Ok(config)
}

fn run_recognize(
    image_path: &Path,
    config: RecognizeConfig,
    out_path: Option<&Path>,
) -> CliResult<()> {
    let recognizer = Recognizer::with_config(config);
    let result = recognizer.recognize_file(image_path)?;

    for (i, reading) in result.staves.iter().enumerate() {
        let columns: Vec<i32> = reading.stems.iter().map(|s| s.column).collect();
        tracing::debug!(
            "staff {}: lines {:?}, stems at {:?}",
            i,
            reading.staff.lines(),
            columns
        );
    }

    print!("{}", render_text(&result));
    if result.is_empty() {
        println!();
    }

    if let Some(out_path) = out_path {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out_path, &json)?;
        tracing::info!("Results written to {}", out_path.display());
    }

    Ok(())
}
