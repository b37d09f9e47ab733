//! Descriptive plots of the Spotify top-2000 song table.
//!
//! Reproduces `dance_hist.png`, `dance_pop_scatter.png` and
//! `3d_tempo_happ_pop.png` in the output directory.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use compecon::config::Config;
use compecon::constants::HEAD_ROWS;
use compecon::env_config;
use compecon::report::{write_json, FitReport, SongsReport};
use compecon::songs::{self, SongTable};

const DANCE: &str = "Danceability";
const POPULARITY: &str = "Popularity";
const TEMPO: &str = "Beats Per Minute (BPM)";
const VALENCE: &str = "Valence";

#[derive(Parser)]
#[command(name = "spotify-plots")]
#[command(version)]
#[command(about = "Histogram, scatter and 3-D plots of Spotify song attributes")]
struct Cli {
    /// Song CSV (overrides the config file)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory for the PNG files (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// TOML parameter overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write a JSON summary
    #[arg(long)]
    json: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_config::init_logging(cli.verbose);
    env_config::init_base_path()?;

    let cfg = Config::load_or_default(cli.config.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    let style = cfg.plot;
    let input = cli.input.unwrap_or(cfg.songs.csv);
    let out_dir = cli.output_dir.unwrap_or(cfg.songs.output_dir);

    let total_start = Instant::now();
    let table = SongTable::from_path(&input)
        .with_context(|| format!("Failed to load songs from {}", input.display()))?;

    println!("{}", table.headers().join(" | "));
    for row in table.head(HEAD_ROWS) {
        println!("{}", row.join(" | "));
    }

    let mut report = SongsReport {
        rows: table.len(),
        ..SongsReport::default()
    };
    for name in [DANCE, POPULARITY, TEMPO, VALENCE] {
        let s = table.describe(name).with_context(|| format!("Failed to describe {name}"))?;
        info!(
            "{}: mean {:.2}, std {:.2}, min {}, median {}, max {}",
            name, s.mean, s.std, s.min, s.median, s.max
        );
        report.summaries.push((name.to_string(), s));
    }

    let hist = out_dir.join("dance_hist.png");
    songs::distribution_plot(&table, DANCE, &hist, style).context("Failed to draw histogram")?;
    report.plots.push(hist.display().to_string());

    let scatter = out_dir.join("dance_pop_scatter.png");
    songs::scatter_fit_plot(&table, DANCE, POPULARITY, &scatter, style)
        .context("Failed to draw scatter with fit")?;
    report.plots.push(scatter.display().to_string());
    report.fits.push(FitReport {
        x: DANCE.into(),
        y: POPULARITY.into(),
        fit: songs::linear_fit(table.numeric(DANCE)?, table.numeric(POPULARITY)?)?,
    });

    let scatter_3d = out_dir.join("3d_tempo_happ_pop.png");
    songs::scatter_3d_plot(&table, TEMPO, VALENCE, POPULARITY, &scatter_3d, style)
        .context("Failed to draw 3-D scatter")?;
    report.plots.push(scatter_3d.display().to_string());

    if let Some(path) = cli.json {
        write_json(&path, &report)?;
    }

    println!(
        "Wrote {} plots to {} in {:.2}s",
        report.plots.len(),
        out_dir.display(),
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}
