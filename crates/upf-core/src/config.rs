// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tunables for a pair-finding session.

use crate::error::DivisionError;
use crate::hv::HVSize;
use crate::pool::ParallelPhase;

/// Settings shared by everything that drives a [`SpatialDivision`](crate::SpatialDivision).
///
/// With the `serde` feature the struct round-trips through any serde format;
/// missing fields fall back to [`DivisionConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DivisionConfig {
    /// Grid cell size; objects closer than one cell on every axis always pair.
    pub cell_size: HVSize,
    /// Worker threads per phase. `0` runs every phase on the calling thread.
    pub workers: usize,
    /// Log the number of generated pairs after each update.
    pub log_pair_generation: bool,
}

impl Default for DivisionConfig {
    fn default() -> Self {
        Self {
            cell_size: HVSize::uniform(1.0),
            workers: 0,
            log_pair_generation: false,
        }
    }
}

impl DivisionConfig {
    /// Rejects cell sizes the voxel grid cannot discretize.
    pub fn validate(&self) -> Result<(), DivisionError> {
        if self.cell_size.is_valid_cell() {
            Ok(())
        } else {
            Err(DivisionError::InvalidCellSize(self.cell_size))
        }
    }

    /// Pool matching `workers`, or `None` for sequential updates.
    pub fn parallel_phase(&self) -> Option<ParallelPhase> {
        (self.workers > 0).then(|| ParallelPhase::new(self.workers))
    }
}
