//! Main entry point for the power-rankings tool
//!
//! Loads a season of results, fits ratings, prints and saves the rankings
//! table, then optionally answers spread queries interactively.

use anyhow::Result;
use clap::Parser;
use power_rankings::config::AppConfig;
use power_rankings::export::save_rankings;
use power_rankings::feed::ResultsFeed;
use power_rankings::rankings::{render_table, round2};
use power_rankings::spreads::SpreadPrompt;
use power_rankings::{rate_season, RatingSolver, TeamUniverse};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Power Rankings - least-squares team ratings and spreads
#[derive(Parser)]
#[command(
    name = "power-rankings",
    version,
    about = "Fit team ratings and home advantage to a season of results",
    long_about = "Power Rankings fetches a season's results table, fits one rating per team plus a \
                 shared home advantage by least squares on score margins, prints and saves a ranked \
                 table, and forecasts the margin between any two teams."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Results page URL override
    #[arg(long, value_name = "URL", help = "Override the results page URL")]
    url: Option<String>,

    /// Saved results page
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Read results from a saved HTML page instead of fetching"
    )]
    input: Option<PathBuf>,

    /// CSV output path override
    #[arg(short, long, value_name = "FILE", help = "Where to write the rankings CSV")]
    output: Option<PathBuf>,

    /// Team universe override
    #[arg(
        long,
        value_name = "home|all",
        help = "Rate home teams only (default) or every team seen"
    )]
    team_universe: Option<TeamUniverse>,

    /// Iteration cap override
    #[arg(long, value_name = "N", help = "Maximum optimizer iterations")]
    max_iterations: Option<usize>,

    /// Skip the spread prompt
    #[arg(long, help = "Do not ask for spreads after printing rankings")]
    no_prompt: bool,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without fetching")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if args.debug {
        config.service.log_level = "debug".to_string();
    }
    if let Some(url) = &args.url {
        config.feed.url = url.clone();
    }
    if let Some(input) = &args.input {
        config.feed.input_path = Some(input.clone());
    }
    if let Some(output) = &args.output {
        config.output.csv_path = Some(output.clone());
    }
    if let Some(universe) = args.team_universe {
        config.feed.team_universe = universe;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.solver.max_iterations = Some(max_iterations);
    }
    if args.no_prompt {
        config.output.prompt_spreads = false;
    }

    power_rankings::config::validate_config(&config)?;
    Ok(config)
}

/// Display startup banner with run information
fn display_startup_banner(config: &AppConfig) {
    info!("{} v{}", config.service.name, power_rankings::VERSION);
    match &config.feed.input_path {
        Some(path) => info!("   Results file: {}", path.display()),
        None => info!("   Results URL: {}", config.feed.url),
    }
    info!("   Team universe: {}", config.feed.team_universe);
    info!(
        "   Gradient tolerance: {:e}",
        config.solver.gradient_tolerance
    );
    if let Some(path) = &config.output.csv_path {
        info!("   Rankings CSV: {}", path.display());
    }
}

fn run(config: &AppConfig) -> Result<()> {
    let feed = ResultsFeed::new(config.feed.clone())?;
    let games = feed.load_games()?;

    let solver = RatingSolver::from_settings(&config.solver)?;
    let report = rate_season(&games, config.feed.team_universe, &solver)?;

    if !report.fit.converged() {
        warn!(
            "Ratings are the optimizer's best iterate, not a converged solution ({})",
            report.fit.termination
        );
    }

    println!("Home Edge: {:.2}", round2(report.home_advantage()));
    print!("{}", render_table(&report.rankings));

    if let Some(path) = &config.output.csv_path {
        save_rankings(&report.rankings, path)?;
    }

    if config.output.prompt_spreads {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let reported = SpreadPrompt::new(&report.fit.ratings, stdin.lock(), stdout.lock()).run()?;
        info!("Reported {} spreads", reported);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {:#}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config);

    if args.dry_run {
        info!("Configuration validation successful");
        info!("Dry run completed - exiting without fetching results");
        return Ok(());
    }

    if let Err(e) = run(&config) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
