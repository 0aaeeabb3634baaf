// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene builders shared by tests, benches and the CLI.

use core::ops::Range;

use upf_core::{HVPoint, HVSize};

use crate::objects::TestObject;
use crate::rng::XorShift64;

/// `count` objects with uniformly random centers.
///
/// `hx` and `hy` are drawn from `horizontal`, `v` from `vertical`.
pub fn random_objects(
    rng: &mut XorShift64,
    count: usize,
    horizontal: Range<f32>,
    vertical: Range<f32>,
) -> Vec<TestObject> {
    let mut objects: Vec<TestObject> = (0..count)
        .map(|id| TestObject::new(id as u32, HVPoint::default()))
        .collect();
    randomize_positions(&mut objects, rng, horizontal, vertical);
    objects
}

/// Redraws every center, keeping ids and enabled state.
pub fn randomize_positions(
    objects: &mut [TestObject],
    rng: &mut XorShift64,
    horizontal: Range<f32>,
    vertical: Range<f32>,
) {
    for object in objects {
        object.footprint.center = HVPoint::new(
            rng.gen_range_f32(horizontal.clone()),
            rng.gen_range_f32(horizontal.clone()),
            rng.gen_range_f32(vertical.clone()),
        );
    }
}

/// Moves every object `delta` along a random horizontal direction.
pub fn move_objects(objects: &mut [TestObject], rng: &mut XorShift64, delta: f32) {
    for object in objects {
        let dx = rng.gen_range_f32(-1.0..1.0);
        let dy = rng.gen_range_f32(-1.0..1.0);
        let length = dx.hypot(dy);
        if length > 0.0 {
            let scale = delta / length;
            object.footprint.center.translate_horizontal(dx * scale, dy * scale);
        }
    }
}

/// `per_line × per_line` lattice in the `v = 0` plane, spaced one cell apart
/// and offset by ¾ of a cell, growing toward negative coordinates.
///
/// Ids are row-major.
pub fn uniform_lattice(per_line: usize, cell: HVSize) -> Vec<TestObject> {
    let step = cell.horizontal;
    let offset = step * 0.75;
    (0..per_line)
        .flat_map(|y| (0..per_line).map(move |x| (x, y)))
        .enumerate()
        .map(|(id, (x, y))| {
            let center = HVPoint::new(
                -(x as f32 * step) + offset,
                -(y as f32 * step) + offset,
                0.0,
            );
            TestObject::new(id as u32, center)
        })
        .collect()
}

/// Pairs [`uniform_lattice`] produces: every 8-neighbourhood adjacency once.
pub fn lattice_pair_count(per_line: usize) -> u64 {
    let n = per_line as u64;
    if n == 0 {
        return 0;
    }
    2 * n * (n - 1) + 2 * (n - 1) * (n - 1)
}
