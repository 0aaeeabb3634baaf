// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, Level};
use upf_core::{DivisionConfig, HVSize};

#[derive(Parser, Debug)]
#[command(name = "upf", version, about = "Uniform pair finder benchmark driver")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every scenario.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Worker threads per phase; 0 runs every phase on the main thread
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// Horizontal cell size
    #[arg(long, global = true)]
    pub cell_h: Option<f32>,

    /// Vertical cell size
    #[arg(long, global = true)]
    pub cell_v: Option<f32>,

    /// JSON file holding a `DivisionConfig`; flags override its fields
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for scene generation
    #[arg(long, global = true, default_value_t = 1)]
    pub seed: u64,

    /// Maximum log level written to stderr
    #[arg(long, global = true, default_value_t = Level::WARN)]
    pub log_level: Level,

    /// Log the pair total after every update
    #[arg(long, global = true)]
    pub log_pairs: bool,

    /// Print the summary as JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fresh random positions before every update
    Random(ScatterArgs),
    /// Objects step a fixed distance in a random direction between updates
    Moving(MovingArgs),
    /// One update over an n×n lattice with a known pair count
    Uniform(UniformArgs),
}

/// Scene shape for the random and moving scenarios.
#[derive(Args, Debug, Clone)]
pub struct ScatterArgs {
    /// Number of updates to run
    #[arg(long, default_value_t = 10)]
    pub runs: u32,

    /// Number of objects
    #[arg(long, default_value_t = 100_000)]
    pub objects: usize,

    /// Horizontal positions are drawn from `[0, h_max)`
    #[arg(long, default_value_t = 100.0)]
    pub h_max: f32,

    /// Vertical positions are drawn from `[0, v_max)`
    #[arg(long, default_value_t = 100.0)]
    pub v_max: f32,
}

#[derive(Args, Debug, Clone)]
pub struct MovingArgs {
    #[command(flatten)]
    pub scatter: ScatterArgs,

    /// Distance each object moves between updates
    #[arg(long, default_value_t = 0.2)]
    pub delta: f32,
}

#[derive(Args, Debug, Clone)]
pub struct UniformArgs {
    /// Objects per lattice row
    #[arg(long, default_value_t = 100)]
    pub per_line: usize,
}

impl GlobalArgs {
    /// Builds the effective configuration: `scenario_cell`, then the config
    /// file, then flags.
    pub fn resolve_config(&self, scenario_cell: HVSize) -> Result<DivisionConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => DivisionConfig {
                cell_size: scenario_cell,
                ..DivisionConfig::default()
            },
        };
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(h) = self.cell_h {
            config.cell_size.horizontal = h;
        }
        if let Some(v) = self.cell_v {
            config.cell_size.vertical = v;
        }
        config.log_pair_generation |= self.log_pairs;
        config.validate()?;
        debug!(?config, "resolved configuration");
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<DivisionConfig> {
    let file = File::open(path)
        .with_context(|| format!("failed to open config {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("upf").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_scenario_defaults() {
        let cli = parse(&["random", "--workers", "3", "--cell-v", "0.5"]);
        let config = cli.global.resolve_config(HVSize::new(3.0, 2.0)).unwrap();
        assert_eq!(config.workers, 3);
        assert_eq!(config.cell_size, HVSize::new(3.0, 0.5));
        assert!(!config.log_pair_generation);
    }

    #[test]
    fn global_flags_work_before_the_subcommand() {
        let cli = parse(&["--seed", "9", "--log-pairs", "uniform", "--per-line", "4"]);
        assert_eq!(cli.global.seed, 9);
        assert!(matches!(cli.command, Commands::Uniform(UniformArgs { per_line: 4 })));
        let config = cli.global.resolve_config(HVSize::uniform(2.0)).unwrap();
        assert!(config.log_pair_generation);
    }

    #[test]
    fn invalid_cell_is_rejected() {
        let cli = parse(&["moving", "--cell-h", "0"]);
        let err = cli.global.resolve_config(HVSize::uniform(1.0)).unwrap_err();
        assert!(err.to_string().contains("invalid cell size"));
    }
}
