// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![deny(
    clippy::all,
    clippy::pedantic,
    rust_2018_idioms,
    missing_docs,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![forbid(unsafe_code)]
#![doc = r"Uniform pair finder: a spatial-hashing broad phase for moving objects.

This crate provides:
- Packed voxel coordinates with flag bits (`Voxel`).
- Point-like boxes that remember which half of their cell they occupy (`SpatialBox`).
- A non-owning view over caller records (`Series`, `HasBox`).
- Eight parity-shifted grids (`Block`) driven by `SpatialDivision`.
- A barrier-synchronized scoped-thread runner (`ParallelPhase`).

Design notes:
- Every pair of boxes closer than one cell on every axis is reported, each exactly once.
- No pair whose voxels differ by more than one cell on some axis is ever reported.
- Callback order is unspecified; the pair set does not depend on worker count.
"]

/// Packed per-block proxies and the pairing scan.
pub mod block;
/// Open-addressed cell table.
pub mod buckets;
mod config;
mod division;
mod error;
mod hv;
/// Barrier-synchronized phase runner.
pub mod pool;
mod series;
mod spatial_box;
mod voxel;

pub use block::{block_masks, Block, Proxy};
pub use buckets::{BucketMap, ProxyList};
pub use config::DivisionConfig;
pub use division::{DivisionState, SpatialDivision};
pub use error::DivisionError;
pub use hv::{HVPoint, HVSize};
pub use pool::{assign_to_workers, split_range, ParallelPhase, Task};
pub use series::{HasBox, Series};
pub use spatial_box::SpatialBox;
pub use voxel::{Axis, Voxel};
