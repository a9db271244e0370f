//! Command-line entry point for the portfolio risk engine.
//!
//! Loads market closes and a portfolio table, derives historical shocks,
//! and reports Historical VaR/ES, Monte-Carlo VaR/ES, and portfolio Greeks.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use openvar::loaders::{compute_shocks, load_closes_csv, load_portfolio_csv};
use openvar::math::{sample_covariance, sample_mean, CholeskyMode};
use openvar::report::build_report;
use openvar::risk::{compute_greeks, historical_var_es, monte_carlo_var_es, McParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Portfolio market-risk engine.
#[derive(Debug, Parser)]
#[command(name = "risk_engine", version, about)]
struct Cli {
    /// Portfolio CSV path.
    #[arg(short, long)]
    portfolio: std::path::PathBuf,

    /// Market closes CSV path.
    #[arg(short, long)]
    market: std::path::PathBuf,

    /// VaR confidence level in (0, 1).
    #[arg(long, default_value_t = 0.99)]
    alpha: f64,

    /// Monte-Carlo horizon in days.
    #[arg(long, default_value_t = 1.0)]
    horizon: f64,

    /// Monte-Carlo path count.
    #[arg(long, default_value_t = 200_000)]
    paths: usize,

    /// Monte-Carlo base seed.
    #[arg(long, default_value_t = 123_456_789)]
    seed: u64,

    /// Monte-Carlo worker threads; 0 selects the hardware parallelism.
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Fail on semi-definite covariance instead of zeroing degenerate
    /// directions.
    #[arg(long)]
    strict_cholesky: bool,

    /// Report output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let market = load_closes_csv(&cli.market)?;
    let factors = market.universe.len();
    info!(
        path = %cli.market.display(),
        rows = market.rows(),
        tickers = factors,
        "loaded market data"
    );

    let shocks = compute_shocks(&market.closes_flat, market.rows(), factors)?;
    let scenarios = market.rows() - 1;

    let book = load_portfolio_csv(&cli.portfolio, factors)?;
    if book.is_empty() {
        return Err("portfolio CSV produced no instruments".into());
    }
    let options = book.option_count();
    info!(
        path = %cli.portfolio.display(),
        instruments = book.len(),
        equities = book.len() - options,
        options,
        "loaded portfolio"
    );

    let historical = historical_var_es(&book, &market.universe, &shocks, scenarios, cli.alpha)?;

    let mu = sample_mean(&shocks, scenarios, factors)?;
    let cov = sample_covariance(&shocks, &mu, scenarios, factors)?;

    let params = McParams {
        paths: cli.paths,
        seed: cli.seed,
        threads: cli.threads,
        cholesky: if cli.strict_cholesky {
            CholeskyMode::Strict
        } else {
            CholeskyMode::Tolerant
        },
    };
    let monte_carlo = monte_carlo_var_es(
        &book,
        &market.universe,
        &mu,
        &cov,
        cli.horizon,
        cli.alpha,
        &params,
    )?;

    let greeks = compute_greeks(&book, None);
    let report = build_report(
        &book,
        &market.universe,
        &greeks,
        historical,
        monte_carlo,
        cli.alpha,
        cli.horizon,
    );

    match cli.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("failed to compute risk metrics: {err}");
            ExitCode::FAILURE
        }
    }
}
