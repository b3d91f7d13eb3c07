#![allow(clippy::doc_markdown)]

mod cache;
mod cli;
mod tables;

use clap::{Parser, crate_version};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command, etl, route, simulate};

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt().without_time().compact().with_env_filter(filter).init();
    info!(version = crate_version!(), "starting…");

    match args.command {
        Command::Etl(args) => etl(&args)?,
        Command::Route(args) => route(&args)?,
        Command::Simulate(args) => simulate(&args)?,
    }

    info!("done!");
    Ok(())
}
