//! Graph command - print the module graph reachable from root queries.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use modsat::graph::{ModuleGraphTraverser, ReifiedDependencies};
use modsat::ResolverConfig;

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Root module queries (name or name@query)
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Catalog manifest
    #[arg(short = 'f', long, default_value = "modules.json")]
    pub catalog: PathBuf,

    /// Trace traversal nodes
    #[arg(long)]
    pub trace: bool,
}

pub fn execute(args: GraphArgs, mut config: ResolverConfig) -> Result<i32> {
    if args.trace {
        config.trace = true;
    }

    let catalog = crate::load_catalog(&args.catalog)?;
    let queries = crate::parse_queries(&args.queries)?;

    let mut rds = ReifiedDependencies::new();
    ModuleGraphTraverser::new(&catalog, &config).traverse(&mut rds, &queries)?;

    print!("{}", rds);
    Ok(0)
}
