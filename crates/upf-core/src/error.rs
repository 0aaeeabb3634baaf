// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Errors reported by the pair finder.

use thiserror::Error;

use crate::hv::HVSize;

/// Recoverable misuse of [`SpatialDivision`](crate::SpatialDivision) or its configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DivisionError {
    /// `update` was called before `initialize`.
    #[error("spatial division used before initialize")]
    NotInitialized,
    /// The series handed to `update` differs in length from the initialized one.
    #[error("series length changed: initialized for {expected} objects, got {actual}")]
    SeriesLengthMismatch {
        /// Object count the blocks were sized for.
        expected: usize,
        /// Object count of the series passed in.
        actual: usize,
    },
    /// More objects than the 28-bit proxy index can address.
    #[error("too many objects: {count} exceeds the limit of {max}")]
    TooManyObjects {
        /// Requested object count.
        count: usize,
        /// Largest supported object count.
        max: usize,
    },
    /// Cell extents must be finite and strictly positive.
    #[error("invalid cell size {0:?}")]
    InvalidCellSize(HVSize),
}
