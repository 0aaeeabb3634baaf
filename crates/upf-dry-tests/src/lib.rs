// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for upf crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`objects`] - Test records and a thread-safe pair sink
//! - [`reference`] - Brute-force pair reference
//! - [`rng`] - Deterministic PRNG
//! - [`scenes`] - Random, moving and lattice scene builders

pub mod objects;
pub mod reference;
pub mod rng;
pub mod scenes;

pub use objects::{PairCollector, TestObject};
pub use reference::{brute_force_pairs, canonical_pair};
pub use rng::XorShift64;
pub use scenes::{lattice_pair_count, move_objects, random_objects, randomize_positions, uniform_lattice};
