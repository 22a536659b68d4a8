//! Kuramoto Simulator CLI
//!
//! Run seeded Kuramoto simulations over built-in or file-defined graphs.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use kuramoto_sim::{
    GraphKind, GraphSource, RerunLogger, RunResult, Runner, SimConfig, SimError, SimExport,
    DEFAULT_SYNC_THRESHOLD,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Kuramoto synchronization simulator
#[derive(Parser, Debug)]
#[command(name = "kuramoto-sim")]
#[command(about = "Simulate coupled phase oscillators on a graph", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Built-in graph (path, ring, star, complete, grid, random, isolated, all)
    #[arg(short, long, default_value = "ring")]
    graph: String,

    /// Load the graph from a file (.json or edge list) instead
    #[arg(long, conflicts_with = "graph")]
    graph_file: Option<PathBuf>,

    /// Node count for built-in graphs
    #[arg(short, long, default_value = "50")]
    nodes: usize,

    /// Integration time step
    #[arg(long, default_value = "0.1")]
    dt: f64,

    /// Coupling strength K
    #[arg(short = 'k', long, default_value = "0.5")]
    coupling: f64,

    /// Ticks per run
    #[arg(short, long, default_value = "1000")]
    ticks: u64,

    /// Wall-clock milliseconds between ticks (0 = as fast as possible)
    #[arg(long, default_value = "0")]
    interval_ms: u64,

    /// Mean natural frequency
    #[arg(long, default_value = "0.0")]
    omega_mean: f64,

    /// Natural frequency standard deviation (0 = identical oscillators)
    #[arg(long, default_value = "0.0")]
    omega_std: f64,

    /// Number of consecutive seeds to run
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Export frames of a single run to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Export every N ticks
    #[arg(long, default_value = "10")]
    export_interval: u64,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Stream the run to a Rerun viewer (needs the `visualization` feature)
    #[arg(long)]
    visualize: bool,

    /// Interactive terminal dashboard (needs the `dashboard` feature)
    #[arg(long)]
    dashboard: bool,

    /// Fail unless every run ends with r >= this threshold
    #[arg(long, num_args = 0..=1, default_missing_value = "0.9")]
    expect_sync: Option<f64>,
}

fn init_logging(args: &Args) {
    let level = if args.verbose { "debug" } else if args.dashboard { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // The dashboard owns stdout
    let result = if args.dashboard {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };
    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn sources(args: &Args) -> Result<Vec<GraphSource>, SimError> {
    if let Some(path) = &args.graph_file {
        return Ok(vec![GraphSource::File(path.clone())]);
    }
    if args.graph == "all" {
        return Ok(GraphKind::all().into_iter().map(GraphSource::Builtin).collect());
    }
    let kind: GraphKind = args.graph.parse().map_err(SimError::Graph)?;
    Ok(vec![GraphSource::Builtin(kind)])
}

fn config(args: &Args, seed: u64) -> SimConfig {
    SimConfig::default()
        .with_seed(seed)
        .with_nodes(args.nodes)
        .with_dt(args.dt)
        .with_coupling(args.coupling)
        .with_frequencies(args.omega_mean, args.omega_std)
        .with_tick_interval(Duration::from_millis(args.interval_ms))
}

#[cfg(feature = "dashboard")]
fn run_dashboard(source: &GraphSource, config: SimConfig, logger: RerunLogger) -> Result<(), SimError> {
    use kuramoto_sim::SimSession;

    let config = if config.tick_interval.is_zero() {
        config.with_tick_interval(SimConfig::default().tick_interval)
    } else {
        config
    };
    let graph = source.resolve(&config)?;
    let session = SimSession::new(&graph, config)?;

    let session = kuramoto_sim::dashboard::run_live(session, &source.label(), logger)?;
    let history = session.history();
    info!(
        "Dashboard closed at tick {} (K={:.1}, r={:.4}, last {} ticks: mean {:.4}, peak {:.4})",
        session.tick_count(),
        session.coupling(),
        session.order_parameter(),
        history.len(),
        history.mean().unwrap_or(0.0),
        history.peak().unwrap_or(0.0)
    );
    Ok(())
}

#[cfg(not(feature = "dashboard"))]
fn run_dashboard(_source: &GraphSource, _config: SimConfig, _logger: RerunLogger) -> Result<(), SimError> {
    Err(SimError::config("dashboard not available (compile with --features dashboard)"))
}

fn run_with_export(
    runner: &Runner,
    source: &GraphSource,
    config: SimConfig,
    logger: &RerunLogger,
    export_path: &str,
) -> Result<RunResult, SimError> {
    let mut export = SimExport::new(&source.label(), config.seed, config.dt);
    let result = runner.run_source(source, config, logger, Some(&mut export))?;

    export.write_to_file(export_path)?;
    info!("Exported {} frames to {}", export.frames.len(), export_path);
    Ok(result)
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    if !args.json {
        info!("Kuramoto Simulator v0.1.0");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    let sources = sources(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!(
            "Available graphs: {}, all",
            GraphKind::all().iter().map(|k| k.name()).collect::<Vec<_>>().join(", ")
        );
        std::process::exit(1);
    });

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    let logger = if args.visualize {
        RerunLogger::new("kuramoto_sim")
    } else {
        RerunLogger::disabled()
    };

    if args.dashboard {
        if sources.len() > 1 {
            eprintln!("Error: --dashboard only supports a single graph, not 'all'");
            std::process::exit(1);
        }
        if let Err(e) = run_dashboard(&sources[0], config(&args, base_seed), logger) {
            error!("Dashboard failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let runner = Runner::new(args.ticks)
        .with_export_interval(args.export_interval)
        .with_sync_threshold(args.expect_sync.unwrap_or(DEFAULT_SYNC_THRESHOLD))
        .with_pacing(Duration::from_millis(args.interval_ms));

    // Handle --export mode
    if let Some(export_path) = &args.export {
        if sources.len() > 1 || args.seeds > 1 {
            eprintln!("Error: --export only supports a single graph and seed");
            std::process::exit(1);
        }

        match run_with_export(&runner, &sources[0], config(&args, base_seed), &logger, export_path) {
            Ok(result) => {
                report(&result, args.json);
                if args.expect_sync.is_some() && !result.synchronized {
                    std::process::exit(1);
                }
            }
            Err(e) => {
                error!("✗ {} failed: {}", sources[0].label(), e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut all_results: Vec<RunResult> = Vec::new();
    let mut error_count = 0;

    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);

        for source in &sources {
            match runner.run_source(source, config(&args, seed), &logger, None) {
                Ok(result) => {
                    if !args.json {
                        info!(
                            "{} {} (seed={}) r={:.4}",
                            if result.synchronized { "✓" } else { "·" },
                            result.graph,
                            seed,
                            result.final_order_parameter
                        );
                    }
                    all_results.push(result);
                }
                Err(e) => {
                    error!("✗ {} (seed={}) failed: {}", source.label(), seed, e);
                    error_count += 1;
                }
            }
        }
    }

    // Summary
    let total = all_results.len();
    let synchronized = all_results.iter().filter(|r| r.synchronized).count();

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "synchronized": synchronized,
            "errors": error_count,
            "results": all_results,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Failed to encode summary: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!("{}/{} runs synchronized", synchronized, total);

        if args.expect_sync.is_some() {
            for result in all_results.iter().filter(|r| !r.synchronized) {
                warn!(
                    "  - {} seed={}: r={:.4}",
                    result.graph, result.seed, result.final_order_parameter
                );
            }
        }
    }

    // Exit with proper code for CI
    let unsynced = total - synchronized;
    if error_count > 0 || (args.expect_sync.is_some() && unsynced > 0) {
        std::process::exit(1);
    }
}

fn report(result: &RunResult, json: bool) {
    if json {
        match serde_json::to_string_pretty(result) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to encode result: {}", e),
        }
    } else {
        info!(
            "{} {} (seed={}) r={:.4} mean={:.4} peak={:.4}",
            if result.synchronized { "✓" } else { "·" },
            result.graph,
            result.seed,
            result.final_order_parameter,
            result.mean_order_parameter,
            result.peak_order_parameter
        );
    }
}
