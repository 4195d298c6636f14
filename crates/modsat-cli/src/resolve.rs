//! Resolve command - resolve root queries against a catalog.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use modsat::{Resolver, ResolverConfig, ResolverError};

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Root module queries (name or name@query)
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Catalog manifest
    #[arg(short = 'f', long, default_value = "modules.json")]
    pub catalog: PathBuf,

    /// Trace traversal and every emitted constraint
    #[arg(long)]
    pub trace: bool,

    /// Skip computing an explanation when resolution fails
    #[arg(long)]
    pub no_explain: bool,

    /// Print the resolved ids as a JSON array
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ResolveArgs, mut config: ResolverConfig) -> Result<i32> {
    if args.trace {
        config.trace = true;
    }
    if args.no_explain {
        config.explain = false;
    }

    let catalog = crate::load_catalog(&args.catalog)?;
    let queries = crate::parse_queries(&args.queries)?;

    let result = match Resolver::new(&catalog).resolve_with(&queries, &config) {
        Ok(result) => result,
        Err(e @ (ResolverError::Unsatisfiable(_) | ResolverError::OptionalPhaseUnsatisfiable { .. })) => {
            eprintln!("{} {}", "Resolution failed:".red().bold(), e);
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        let ids: Vec<String> = result
            .resolved_module_ids()
            .iter()
            .map(|id| id.to_string())
            .collect();
        println!("{}", serde_json::to_string_pretty(&ids)?);
    } else {
        for id in result.resolved_module_ids() {
            println!("{} {}", id.name().green(), id.version());
        }
    }

    Ok(0)
}
