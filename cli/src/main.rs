//! Skyline CLI - track service usage from diagram text and simulate
//! architectures from the accumulated history.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use skyline_lib::{
    FrequencyStore, Sampler, ServiceCatalog, TransitionChain, observe_diagram, report,
};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "skyline")]
#[command(about = "Service-usage frequency tracker and architecture simulator", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to the frequency database
    #[arg(
        long,
        value_name = "PATH",
        default_value = "service_frequency.db",
        global = true
    )]
    db: PathBuf,

    /// Path to a catalog file (JSON object of key -> display name)
    /// [default: builtin AWS catalog]
    #[arg(long, value_name = "PATH", global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a diagram file and update the usage counts
    Ingest {
        /// Diagram file to read (use "-" to read from stdin)
        #[arg(value_name = "FILE")]
        input: String,
    },

    /// Print the historical usage counts
    Stats,

    /// Simulate a new architecture from the historical usage counts
    Simulate {
        /// Starting service (random recorded service when omitted)
        #[arg(short, long, value_name = "SERVICE")]
        start: Option<String>,

        /// Number of services in the generated sequence
        #[arg(short, long, default_value_t = 5)]
        length: usize,

        /// RNG seed for reproducible output
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,
    },
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,skyline_lib=info".to_string(),
            2 => "info,skyline_lib=debug".to_string(),
            _ => "debug,skyline_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn read_diagram(input: &str) -> io::Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin().lock().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
    }
}

fn load_catalog(path: Option<&Path>) -> Result<ServiceCatalog, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(ServiceCatalog::from_json_str(&json)?)
        }
        None => Ok(ServiceCatalog::builtin()),
    }
}

async fn run_ingest(
    db: &Path,
    catalog: &ServiceCatalog,
    input: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_diagram(input)?;
    let store = FrequencyStore::connect(db).await?;

    let tally = observe_diagram(&store, catalog, &text).await?;

    println!("Updated frequency in database:");
    println!("{}", report::render_frequencies(&tally)?);
    Ok(())
}

async fn run_stats(db: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = FrequencyStore::connect(db).await?;
    let snapshot = store.snapshot().await?;

    println!("{}", report::render_frequencies(&snapshot)?);
    Ok(())
}

async fn run_simulate(
    db: &Path,
    start: Option<String>,
    length: usize,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = FrequencyStore::connect(db).await?;
    let snapshot = store.snapshot().await?;
    let chain = TransitionChain::from_frequencies(&snapshot)?;

    let mut sampler = match seed {
        Some(seed) => Sampler::seeded(seed),
        None => Sampler::from_entropy(),
    };

    let start = match start {
        Some(start) => start,
        None => sampler.random_start(&chain)?,
    };
    let sequence = sampler.generate(&chain, &start, length.max(1))?;

    println!("Simulated architecture:");
    println!("{}", report::render_sequence(&sequence));
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.json);

    tracing::debug!(db = %cli.db.display(), "Skyline CLI starting");

    let catalog = match load_catalog(cli.catalog.as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load catalog: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Ingest { input } => run_ingest(&cli.db, &catalog, &input).await,
        Commands::Stats => run_stats(&cli.db).await,
        Commands::Simulate {
            start,
            length,
            seed,
        } => run_simulate(&cli.db, start, length, seed).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
