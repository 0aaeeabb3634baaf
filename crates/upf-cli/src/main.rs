// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `upf`: benchmark driver for the uniform pair finder.
//!
//! Builds a scene, runs `SpatialDivision::update` over it a number of times
//! and prints per-update timings and pair counts.
//!
//! # Usage
//! ```text
//! upf [--workers N] [--cell-h F] [--cell-v F] [--config PATH] <random|moving|uniform> [options]
//! ```
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]
// The CLI is expected to print to stdout.
#![allow(clippy::print_stdout)]

mod cli;
mod report;
mod scenario;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.global.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let report = match &cli.command {
        Commands::Random(args) => {
            let config = cli.global.resolve_config(scenario::SCATTER_CELL)?;
            scenario::random(&config, cli.global.seed, args)?
        }
        Commands::Moving(args) => {
            let config = cli.global.resolve_config(scenario::SCATTER_CELL)?;
            scenario::moving(&config, cli.global.seed, args)?
        }
        Commands::Uniform(args) => {
            let config = cli.global.resolve_config(scenario::LATTICE_CELL)?;
            scenario::uniform(&config, args)?
        }
    };

    if cli.global.json {
        println!("{}", serde_json::to_string_pretty(&report.summary())?);
    } else {
        println!("{}", report.render());
    }
    Ok(())
}
