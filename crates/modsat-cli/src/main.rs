mod graph;
mod providers;
mod resolve;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use modsat::{ConfigLoader, MemoryCatalog, ModuleId, ModuleIdQuery};

#[derive(Parser, Debug)]
#[command(name = "modsat")]
#[command(about = "Resolve versioned modules against a module catalog")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Resolver configuration file (JSON)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Ignore MODSAT_* environment variables
    #[arg(long, global = true)]
    no_env: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve root queries to a consistent set of modules
    Resolve(resolve::ResolveArgs),

    /// Print the module graph reachable from root queries
    Graph(graph::GraphArgs),

    /// List modules providing the services required by modules
    Providers(providers::ProvidersArgs),
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Load a JSON catalog manifest
pub(crate) fn load_catalog(path: &Path) -> Result<MemoryCatalog> {
    MemoryCatalog::from_path(path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

pub(crate) fn parse_queries(queries: &[String]) -> Result<Vec<ModuleIdQuery>> {
    queries
        .iter()
        .map(|q| ModuleIdQuery::parse(q).with_context(|| format!("Invalid root query \"{}\"", q)))
        .collect()
}

pub(crate) fn parse_ids(ids: &[String]) -> Result<Vec<ModuleId>> {
    ids.iter()
        .map(|id| ModuleId::parse(id).with_context(|| format!("Invalid module id \"{}\"", id)))
        .collect()
}

fn run() -> Result<i32> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = ConfigLoader::new(!args.no_env)
        .load(args.config.as_deref())
        .context("Failed to load resolver configuration")?;

    match args.command {
        Commands::Resolve(resolve_args) => resolve::execute(resolve_args, config),
        Commands::Graph(graph_args) => graph::execute(graph_args, config),
        Commands::Providers(providers_args) => providers::execute(providers_args),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}
