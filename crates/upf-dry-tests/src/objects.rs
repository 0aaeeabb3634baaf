// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Test records and a pair sink for the `on_pair` callback.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use upf_core::{HVPoint, HasBox, SpatialBox};

use crate::reference::canonical_pair;

/// Minimal record: an id plus the embedded box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestObject {
    /// Index-independent identity used in collected pairs.
    pub id: u32,
    /// Footprint handed to the pair finder.
    pub footprint: SpatialBox,
}

impl TestObject {
    /// Enabled object at `center`.
    pub fn new(id: u32, center: HVPoint) -> Self {
        Self {
            id,
            footprint: SpatialBox::new(center),
        }
    }

    /// Convenience accessor for the center.
    pub const fn center(&self) -> HVPoint {
        self.footprint.center
    }
}

impl HasBox for TestObject {
    fn get_box(&self) -> &SpatialBox {
        &self.footprint
    }

    fn get_box_mut(&mut self) -> &mut SpatialBox {
        &mut self.footprint
    }
}

/// Thread-safe sink recording each reported pair as `(min_id, max_id)`.
///
/// A pair reported twice, in either order, is counted in
/// [`PairCollector::duplicates`] instead of being stored again.
#[derive(Debug, Default)]
pub struct PairCollector {
    pairs: Mutex<BTreeSet<(u32, u32)>>,
    reports: AtomicU64,
    duplicates: AtomicU64,
}

impl PairCollector {
    /// Empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one callback invocation.
    pub fn record(&self, a: &TestObject, b: &TestObject) {
        self.reports.fetch_add(1, Ordering::Relaxed);
        let inserted = self
            .pairs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(canonical_pair(a.id, b.id));
        if !inserted {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of callback invocations.
    pub fn reports(&self) -> u64 {
        self.reports.load(Ordering::Relaxed)
    }

    /// Number of reports that repeated an already recorded pair.
    pub fn duplicates(&self) -> u64 {
        self.duplicates.load(Ordering::Relaxed)
    }

    /// Snapshot of the distinct pairs recorded so far.
    pub fn pairs(&self) -> BTreeSet<(u32, u32)> {
        self.pairs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.pairs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.reports.store(0, Ordering::Relaxed);
        self.duplicates.store(0, Ordering::Relaxed);
    }
}
