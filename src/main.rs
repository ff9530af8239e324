use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use cadre_core::{CadreError, Config};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cadre", version, about = "Pick random photos and videos for a digital photo frame")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Seed the random draw (overrides SEED from the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Log every item instead of showing a progress bar
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let t_total = std::time::Instant::now();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let pb = if cli.verbose {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} {msg}")
            .unwrap(),
    );

    let result = cadre_core::run(&config, &|stage, current, total, message| {
        if total > 0 {
            pb.set_length(total);
            pb.set_position(current);
        }
        pb.set_message(format!("{} {}", stage, message));
    });
    pb.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e @ CadreError::DestinationMissing { .. }) => {
            tracing::error!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    eprintln!(
        "Done! {}/{} photos written, {}/{} videos copied ({:.1} MB), {} skipped ({:.2}s)",
        report.photos_written,
        report.photos_selected,
        report.videos_copied,
        report.videos_selected,
        report.video_bytes as f64 / 1024.0 / 1024.0,
        report.photos_failed + report.videos_failed,
        t_total.elapsed().as_secs_f64()
    );
    for warning in &report.warnings {
        eprintln!("  warning: {}", warning);
    }

    Ok(ExitCode::SUCCESS)
}
