#![allow(clippy::doc_markdown)]
//! Techno-economic digital twin of an e-bike fleet.
//!
//! The crate extracts usage and battery parameters from raw datasets, parses a GPX route, and
//! simulates four business models (SIB or LFP chemistry, owned or swapped batteries) day by day
//! in order to rank them by cost per kilometer.

pub mod core;
mod error;
mod prelude;
pub mod quantity;
pub mod route;
pub mod statistics;

pub use self::{
    core::simulation::{SimulationOutcome, run_fleet_simulation},
    error::{Error, Result},
    route::parse_route,
    statistics::perform_etl_and_scaling,
};
