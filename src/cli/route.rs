use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ebike_twin::parse_route;
use tracing::instrument;

use crate::tables::build_topography_table;

#[derive(Parser)]
pub struct RouteArgs {
    /// GPX track of the delivery route.
    #[clap(long, env = "ROUTE_PATH")]
    pub route: PathBuf,
}

#[instrument(skip_all)]
pub fn route(args: &RouteArgs) -> Result<()> {
    let file = File::open(&args.route)
        .with_context(|| format!("failed to open `{}`", args.route.display()))?;
    let route = parse_route(file)?;
    println!("{}", build_topography_table(&route.topography()));
    Ok(())
}
