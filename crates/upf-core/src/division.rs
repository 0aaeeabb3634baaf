// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Three-phase update driving the eight blocks.
//!
//! ```text
//! update_boxes  ──barrier──▶  update_blocks  ──barrier──▶  find_pairs
//! (disjoint object chunks)    (one task per block)         (block × bucket range, read-only)
//! ```
//!
//! Each phase either runs on a [`ParallelPhase`] or, without one, on the
//! calling thread; both paths execute the same per-unit code and report the
//! same pair set. Candidates from the blocks are reported only when their
//! voxels differ by at most one cell on every axis. With a pool, `on_pair` is called concurrently from several
//! workers, which is why it must be `Sync`.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, instrument};

use crate::block::{block_masks, Block, Proxy};
use crate::error::DivisionError;
use crate::hv::HVSize;
use crate::pool::{split_range, ParallelPhase, Task};
use crate::series::{HasBox, Series};

/// Lifecycle of a [`SpatialDivision`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DivisionState {
    /// No blocks allocated yet.
    #[default]
    Uninitialized,
    /// Blocks sized for a series; no pairs generated yet.
    Initialized,
    /// At least one update completed.
    Updated,
}

/// Finds candidate pairs among a series of boxes.
#[derive(Debug, Default)]
pub struct SpatialDivision {
    blocks: [Block; Block::COUNT],
    len: usize,
    state: DivisionState,
    log_pair_generation: bool,
}

impl SpatialDivision {
    /// Largest object count a division accepts.
    pub const MAX_OBJECTS: usize = Proxy::MAX_ID as usize;

    /// Creates an uninitialized division.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes the eight blocks for `series`.
    ///
    /// Call again whenever the object count changes.
    pub fn initialize<T: HasBox>(
        &mut self,
        series: &Series<'_, T>,
        log_pair_generation: bool,
    ) -> Result<(), DivisionError> {
        check_cell(series.cell_size())?;
        if series.len() > Self::MAX_OBJECTS {
            return Err(DivisionError::TooManyObjects {
                count: series.len(),
                max: Self::MAX_OBJECTS,
            });
        }

        for (block, mask) in self.blocks.iter_mut().zip(block_masks()) {
            block.initialize(mask, series);
        }
        self.len = series.len();
        self.log_pair_generation = log_pair_generation;
        self.state = DivisionState::Initialized;
        debug!(objects = self.len, "spatial division initialized");
        Ok(())
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> DivisionState {
        self.state
    }

    /// Object count the blocks are sized for.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when sized for zero objects.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether each update logs its pair total.
    pub const fn log_pair_generation(&self) -> bool {
        self.log_pair_generation
    }

    /// The eight parity blocks, `hx` parity varying fastest.
    pub const fn blocks(&self) -> &[Block; Block::COUNT] {
        &self.blocks
    }

    /// Refreshes every box, rebuilds the blocks, and reports each candidate
    /// pair once through `on_pair`. Returns the number of pairs reported.
    ///
    /// Pass `None` to run every phase on the calling thread.
    #[instrument(level = "debug", skip_all, fields(objects = series.len()))]
    pub fn update<T, F>(
        &mut self,
        series: &mut Series<'_, T>,
        pool: Option<&ParallelPhase>,
        on_pair: F,
    ) -> Result<u64, DivisionError>
    where
        T: HasBox + Send + Sync,
        F: Fn(&T, &T) + Sync,
    {
        if self.state == DivisionState::Uninitialized {
            return Err(DivisionError::NotInitialized);
        }
        if series.len() != self.len {
            return Err(DivisionError::SeriesLengthMismatch {
                expected: self.len,
                actual: series.len(),
            });
        }
        let cell = series.cell_size();
        check_cell(cell)?;

        update_boxes(series.objects_mut(), cell, pool);
        debug!("boxes updated");

        let objects = series.objects();
        self.update_blocks(objects, pool);
        debug!("blocks updated");

        let pairs = self.find_pairs(objects, pool, &on_pair);
        self.state = DivisionState::Updated;
        if self.log_pair_generation {
            info!(pairs, "generated candidate pairs");
        }
        Ok(pairs)
    }

    fn update_blocks<T>(&mut self, objects: &[T], pool: Option<&ParallelPhase>)
    where
        T: HasBox + Sync,
    {
        match pool {
            Some(pool) => {
                let cost = objects.len() as u64;
                let tasks = self
                    .blocks
                    .iter_mut()
                    .map(|block| Task::new(cost, move || block.update(objects)))
                    .collect();
                pool.run(tasks);
            }
            None => {
                for block in &mut self.blocks {
                    block.update(objects);
                }
            }
        }
    }

    fn find_pairs<T, F>(&self, objects: &[T], pool: Option<&ParallelPhase>, on_pair: &F) -> u64
    where
        T: HasBox + Sync,
        F: Fn(&T, &T) + Sync,
    {
        let total = AtomicU64::new(0);
        match pool {
            Some(pool) => {
                let total = &total;
                let tasks = self
                    .blocks
                    .iter()
                    .flat_map(|block| {
                        split_range(0..block.num_buckets(), pool.num_jobs()).map(move |range| {
                            Task::new(range.len() as u64, move || {
                                let found = scan(block, range, objects, on_pair);
                                total.fetch_add(found, Ordering::Relaxed);
                            })
                        })
                    })
                    .collect();
                pool.run(tasks);
            }
            None => {
                for block in &self.blocks {
                    let found = scan(block, 0..block.num_buckets(), objects, on_pair);
                    total.fetch_add(found, Ordering::Relaxed);
                }
            }
        }
        total.into_inner()
    }
}

fn check_cell(cell: HVSize) -> Result<(), DivisionError> {
    if cell.is_valid_cell() {
        Ok(())
    } else {
        Err(DivisionError::InvalidCellSize(cell))
    }
}

fn update_boxes<T>(objects: &mut [T], cell: HVSize, pool: Option<&ParallelPhase>)
where
    T: HasBox + Send,
{
    let half = cell.half();
    let update_range = move |chunk: &mut [T]| {
        for object in chunk {
            object.get_box_mut().update_voxel(&cell, &half);
        }
    };

    match pool {
        Some(pool) if !objects.is_empty() => {
            let chunk_len = objects.len().div_ceil(pool.num_jobs());
            let tasks = objects
                .chunks_mut(chunk_len)
                .map(|chunk| Task::new(chunk.len() as u64, move || update_range(chunk)))
                .collect();
            pool.run(tasks);
        }
        _ => update_range(objects),
    }
}

/// Scans `range` of `block`, reporting candidates whose voxels are neighbours.
fn scan<T, F>(block: &Block, range: core::ops::Range<usize>, objects: &[T], on_pair: &F) -> u64
where
    T: HasBox,
    F: Fn(&T, &T),
{
    let mut reported = 0u64;
    block.find_pairs(range, |a, b| {
        let (a, b) = (&objects[a], &objects[b]);
        if a.get_box().is_voxel_neighbour(b.get_box()) {
            on_pair(a, b);
            reported += 1;
        }
    });
    reported
}
