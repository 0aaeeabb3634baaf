// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene drivers: build objects, run timed updates, collect a report.

use std::time::Instant;

use anyhow::Result;
use tracing::info;
use upf_core::{DivisionConfig, HVSize, Series, SpatialDivision};
use upf_dry_tests::{
    lattice_pair_count, move_objects, random_objects, randomize_positions, uniform_lattice,
    TestObject, XorShift64,
};

use crate::cli::{MovingArgs, ScatterArgs, UniformArgs};
use crate::report::{Report, RunStats};

/// Default cell for the random and moving scenes.
pub const SCATTER_CELL: HVSize = HVSize::new(3.0, 2.0);
/// Default cell for the lattice; the lattice spacing follows it.
pub const LATTICE_CELL: HVSize = HVSize::new(2.0, 2.0);

/// Redraws every position between updates.
pub fn random(config: &DivisionConfig, seed: u64, args: &ScatterArgs) -> Result<Report> {
    let mut rng = XorShift64::new(seed);
    let horizontal = 0.0..args.h_max;
    let vertical = 0.0..args.v_max;
    let mut objects = random_objects(&mut rng, args.objects, horizontal.clone(), vertical.clone());
    run_updates(config, "random", &mut objects, args.runs, |objects| {
        randomize_positions(objects, &mut rng, horizontal.clone(), vertical.clone());
    })
}

/// Moves every object `delta` between updates.
pub fn moving(config: &DivisionConfig, seed: u64, args: &MovingArgs) -> Result<Report> {
    let scatter = &args.scatter;
    let mut rng = XorShift64::new(seed);
    let mut objects = random_objects(&mut rng, scatter.objects, 0.0..scatter.h_max, 0.0..scatter.v_max);
    run_updates(config, "moving", &mut objects, scatter.runs, |objects| {
        move_objects(objects, &mut rng, args.delta);
    })
}

/// Single update over a lattice spaced one cell apart.
pub fn uniform(config: &DivisionConfig, args: &UniformArgs) -> Result<Report> {
    let mut objects = uniform_lattice(args.per_line, config.cell_size);
    let mut report = run_updates(config, "uniform", &mut objects, 1, |_| {})?;
    report.expected_pairs = Some(lattice_pair_count(args.per_line));
    Ok(report)
}

fn run_updates<F>(
    config: &DivisionConfig,
    scenario: &'static str,
    objects: &mut [TestObject],
    runs: u32,
    mut advance: F,
) -> Result<Report>
where
    F: FnMut(&mut [TestObject]),
{
    let pool = config.parallel_phase();
    let cell = config.cell_size;
    info!(
        scenario,
        objects = objects.len(),
        workers = pool.map_or(0, |p| p.num_jobs()),
        "starting"
    );

    let mut division = SpatialDivision::new();
    division.initialize(&Series::new(objects, cell), config.log_pair_generation)?;

    let mut report = Report::new(scenario, objects.len());
    for run in 0..runs {
        let start = Instant::now();
        let pairs = division.update(&mut Series::new(objects, cell), pool.as_ref(), |_, _| {})?;
        let elapsed = start.elapsed();
        info!(run, elapsed_ms = elapsed.as_secs_f64() * 1e3, pairs, "update finished");
        report.runs.push(RunStats { elapsed, pairs });
        advance(&mut *objects);
    }
    Ok(report)
}
