//! Steady state of the S-period OLG model with endogenous labor.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use ndarray::Array1;

use compecon::config::Config;
use compecon::env_config;
use compecon::olg::{self, solve_steady_state};
use compecon::report::{write_json, SteadyStateReport};

#[derive(Parser)]
#[command(name = "olg-steady-state")]
#[command(version)]
#[command(about = "Solve for the steady state of an overlapping-generations model")]
struct Cli {
    /// TOML parameter overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of periods S (overrides the config file)
    #[arg(short, long)]
    periods: Option<usize>,

    /// Also write a JSON report
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write a life-cycle plot of the solution
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn print_vector(label: &str, values: &[f64]) {
    let formatted: Vec<String> = values.iter().map(|v| format!("{v:.4}")).collect();
    println!("{label} [{}]", formatted.join(", "));
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_config::init_logging(cli.verbose);
    env_config::init_base_path()?;

    let cfg = Config::load_or_default(cli.config.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    let style = cfg.plot;
    let mut olg_cfg = cfg.olg;
    if let Some(s) = cli.periods {
        olg_cfg.periods = s;
        olg_cfg.chi = None;
    }

    let firm = olg_cfg.firm();
    let household = olg_cfg.household().context("Invalid household parameters")?;
    let settings = olg_cfg.settings();
    let guess = Array1::from_vec(olg_cfg.bn_guess());

    let total_start = Instant::now();
    let ss = solve_steady_state(olg_cfg.r_guess, guess, &firm, &household, &settings)
        .context("Steady-state solver failed")?;

    println!("Steady state success: {}", ss.success);
    println!("Iterations: {}", ss.iterations);
    println!("r = {:.6}, w = {:.6}", ss.r, ss.w);
    println!(
        "K = {:.6}, L = {:.6}, Y = {:.6}, C = {:.6}",
        ss.capital, ss.labor, ss.output, ss.aggregate_consumption
    );
    println!("Resource constraint error: {:.3e}", ss.resource_error);
    println!("Max Euler error: {:.3e}", ss.max_euler_error());
    print_vector("Savings b_2..b_S:", &ss.savings());
    print_vector("Labor n_1..n_S:", &ss.labor_supply());

    if let Some(path) = &cli.plot {
        olg::lifecycle_plot(&ss, path, style).context("Failed to draw life-cycle plot")?;
    }
    if let Some(path) = cli.json {
        write_json(&path, &SteadyStateReport::new(&firm, &household, &ss))?;
    }

    println!("Total time: {:.2}s", total_start.elapsed().as_secs_f64());
    Ok(())
}
