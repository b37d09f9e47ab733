//! Deterministic crop-sale problem solved by value function iteration.
//!
//! Loads a cached value function when one exists for the calibration and
//! stopping rule, otherwise iterates from V = 0 and caches the result.
//! Writes the value function and policy plots.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use compecon::config::Config;
use compecon::env_config;
use compecon::report::{write_json, VfiReport};
use compecon::storage::{cache_file_path, load_solution, save_solution};
use compecon::vfi::{self, CropModel, VfiSolution};

#[derive(Parser)]
#[command(name = "crop-vfi")]
#[command(version)]
#[command(about = "Value function iteration for the deterministic crop-sale problem")]
struct Cli {
    /// TOML parameter overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the PNG files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Always iterate, ignoring and not writing the cache
    #[arg(long)]
    no_cache: bool,

    /// Keep every iterate of V (forces a fresh solve)
    #[arg(long)]
    history: bool,

    /// Also write a JSON report
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
    env_config::init_rayon_threads();

    let cfg = Config::load_or_default(cli.config.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    let style = cfg.plot;
    let params = cfg.crop.params();
    let settings = cfg.crop.settings(cli.history);

    let total_start = Instant::now();
    let model = CropModel::new(params);
    info!(
        "Crop grid: {} points on [{}, {}], beta={}, sigma={}, R={}",
        model.size(),
        params.grid_lb,
        params.grid_ub,
        params.beta,
        params.sigma,
        params.gross_return
    );

    let cache_path = cache_file_path(&params);
    let use_cache = !cli.no_cache && !cli.history;

    let cached = if use_cache {
        load_solution(&cache_path, &params, &settings)
            .with_context(|| format!("Failed to read cache {}", cache_path.display()))?
    } else {
        None
    };

    let solution: VfiSolution = match cached {
        Some(c) => c.into_solution(&model),
        None => {
            let solution = vfi::solve(&model, &settings);
            if use_cache && solution.converged {
                save_solution(&cache_path, &params, &settings, &solution)
                    .with_context(|| format!("Failed to write cache {}", cache_path.display()))?;
            }
            solution
        }
    };

    if solution.converged {
        println!("Value function converged after {} iterations", solution.iterations);
    } else {
        println!("Value function did not converge");
        warn!("Final distance {:.3e}", solution.distance);
    }

    let value_png = cli.output_dir.join("value_function.png");
    vfi::plots::value_function_plot(&model.grid, &solution, &value_png, style)
        .context("Failed to draw value function")?;
    let policy_png = cli.output_dir.join("policy_functions.png");
    vfi::plots::policy_plot(&model.grid, &solution, &policy_png, style)
        .context("Failed to draw policy functions")?;

    if let Some(history) = &solution.history {
        info!(
            "Recorded {} iterates of V ({} x {} store)",
            solution.iterations.saturating_sub(1),
            history.nrows(),
            history.ncols()
        );
    }

    if let Some(path) = cli.json {
        write_json(&path, &VfiReport::new(&model, &solution))?;
    }

    println!("Total time: {:.2}s", total_start.elapsed().as_secs_f64());
    Ok(())
}
