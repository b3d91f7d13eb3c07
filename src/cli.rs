mod etl;
mod route;
mod simulate;

use clap::{Parser, Subcommand};

pub use self::{
    etl::{EtlArgs, etl},
    route::{RouteArgs, route},
    simulate::{SimulateArgs, simulate},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Log debug events unless `RUST_LOG` is set.
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract the usage and battery parameters from the raw datasets.
    #[clap(name = "etl")]
    Etl(Box<EtlArgs>),

    /// Summarize the route profile.
    #[clap(name = "route")]
    Route(RouteArgs),

    /// Simulate the fleets and rank the business models.
    #[clap(name = "simulate")]
    Simulate(Box<SimulateArgs>),
}
