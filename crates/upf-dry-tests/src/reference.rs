// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! O(N²) reference pair set.

use std::collections::BTreeSet;

use upf_core::{HVSize, HasBox, SpatialBox};

use crate::objects::TestObject;

/// Orders two ids as `(min, max)`.
pub fn canonical_pair(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

/// Every pair of enabled objects whose cell spans overlap at `cell` and
/// whose voxels differ by at most one cell on every axis.
///
/// Boxes are refreshed on copies, so `objects` may be stale or freshly built.
pub fn brute_force_pairs(objects: &[TestObject], cell: HVSize) -> BTreeSet<(u32, u32)> {
    let half = cell.half();
    let boxes: Vec<(u32, SpatialBox)> = objects
        .iter()
        .filter(|o| o.get_box().is_enabled())
        .map(|o| {
            let mut b: SpatialBox = *o.get_box();
            b.update_voxel(&cell, &half);
            (o.id, b)
        })
        .collect();

    let mut pairs = BTreeSet::new();
    for (i, (id_a, a)) in boxes.iter().enumerate() {
        let span_a = a.span_origin();
        for (id_b, b) in &boxes[i + 1..] {
            let spans_overlap = span_a
                .iter()
                .zip(b.span_origin())
                .all(|(x, y)| x.abs_diff(y) <= 1);
            if spans_overlap && a.is_voxel_neighbour(b) {
                pairs.insert(canonical_pair(*id_a, *id_b));
            }
        }
    }
    pairs
}
