// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Barrier-synchronized task phases on scoped threads.
//!
//! A phase is a batch of independent tasks. [`ParallelPhase::run`] spreads
//! the batch over its workers and returns only after every task finished, so
//! no task ever spans two phases. Tasks are assigned up front, heaviest
//! first, to the worker with the least accumulated cost; workers never
//! share a queue and the runner takes no locks.

use core::num::NonZeroUsize;
use core::ops::Range;

/// One unit of work inside a phase.
pub struct Task<'scope> {
    cost: u64,
    run: Box<dyn FnOnce() + Send + 'scope>,
}

impl<'scope> Task<'scope> {
    /// Wraps `run` with a relative `cost` used for load balancing.
    pub fn new<F>(cost: u64, run: F) -> Self
    where
        F: FnOnce() + Send + 'scope,
    {
        Self {
            cost,
            run: Box::new(run),
        }
    }

    /// Relative cost.
    pub const fn cost(&self) -> u64 {
        self.cost
    }
}

impl core::fmt::Debug for Task<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Task").field("cost", &self.cost).finish_non_exhaustive()
    }
}

/// Fixed-width worker pool that runs one phase at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelPhase {
    workers: NonZeroUsize,
}

impl ParallelPhase {
    /// Pool with `workers` threads; zero is treated as one.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: NonZeroUsize::new(workers).unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Pool sized to the machine's available parallelism.
    pub fn available() -> Self {
        Self {
            workers: std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Number of workers; callers split their work into this many pieces.
    pub const fn num_jobs(&self) -> usize {
        self.workers.get()
    }

    /// Runs every task and returns once all of them completed.
    ///
    /// # Panics
    ///
    /// Re-raises the first worker panic after all workers have stopped.
    pub fn run(&self, tasks: Vec<Task<'_>>) {
        let bins = assign_to_workers(tasks, self.num_jobs());
        if bins.len() <= 1 {
            for task in bins.into_iter().flatten() {
                (task.run)();
            }
            return;
        }

        std::thread::scope(|s| {
            let handles: Vec<_> = bins
                .into_iter()
                .map(|bin| {
                    s.spawn(move || {
                        for task in bin {
                            (task.run)();
                        }
                    })
                })
                .collect();

            for handle in handles {
                if let Err(e) = handle.join() {
                    std::panic::resume_unwind(e);
                }
            }
        });
    }
}

impl Default for ParallelPhase {
    fn default() -> Self {
        Self::available()
    }
}

/// Longest-processing-time-first assignment of tasks to at most `workers` bins.
///
/// Empty bins are dropped, so the result never has more bins than tasks.
pub fn assign_to_workers(mut tasks: Vec<Task<'_>>, workers: usize) -> Vec<Vec<Task<'_>>> {
    let workers = workers.clamp(1, tasks.len().max(1));
    tasks.sort_by(|a, b| b.cost.cmp(&a.cost));

    let mut bins: Vec<(u64, Vec<Task<'_>>)> = (0..workers).map(|_| (0, Vec::new())).collect();
    for task in tasks {
        let lightest = bins
            .iter_mut()
            .min_by_key(|(load, _)| *load)
            .map(|(load, bin)| {
                *load = load.saturating_add(task.cost.max(1));
                bin
            });
        if let Some(bin) = lightest {
            bin.push(task);
        }
    }
    bins.into_iter()
        .map(|(_, bin)| bin)
        .filter(|bin| !bin.is_empty())
        .collect()
}

/// Splits `range` into at most `parts` contiguous, non-empty, near-equal pieces.
pub fn split_range(range: Range<usize>, parts: usize) -> impl Iterator<Item = Range<usize>> {
    let len = range.end.saturating_sub(range.start);
    let parts = parts.clamp(1, len.max(1));
    let base = len / parts;
    let extra = len % parts;
    let start = range.start;
    (0..parts)
        .map(move |i| {
            let lo = start + i * base + i.min(extra);
            let hi = lo + base + usize::from(i < extra);
            lo..hi
        })
        .filter(|r| !r.is_empty())
}
