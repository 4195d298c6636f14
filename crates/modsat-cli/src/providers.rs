//! Providers command - list service provider modules.

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use modsat::ServiceDependences;

#[derive(Args, Debug)]
pub struct ProvidersArgs {
    /// Consumer module ids (name@version)
    pub ids: Vec<String>,

    /// Look up providers of a service interface instead
    #[arg(short = 's', long)]
    pub service: Option<String>,

    /// Catalog manifest
    #[arg(short = 'f', long, default_value = "modules.json")]
    pub catalog: PathBuf,
}

pub fn execute(args: ProvidersArgs) -> Result<i32> {
    if args.ids.is_empty() && args.service.is_none() {
        bail!("Specify consumer module ids or --service");
    }

    let catalog = crate::load_catalog(&args.catalog)?;
    let services = ServiceDependences::new(&catalog);

    let providers = match &args.service {
        Some(interface) => services.provider_modules_for_interface(interface)?,
        None => services.provider_modules(&crate::parse_ids(&args.ids)?)?,
    };

    if providers.is_empty() {
        eprintln!("No provider modules found");
        return Ok(1);
    }
    for id in &providers {
        println!("{}", id);
    }
    Ok(0)
}
