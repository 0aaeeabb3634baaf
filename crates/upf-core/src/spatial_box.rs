// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-object footprint consumed by the pair finder.

use crate::hv::{HVPoint, HVSize};
use crate::voxel::{Axis, Voxel};

/// Spatial footprint embedded in a caller's record.
///
/// The cached voxel's four user flags carry the box state:
///
/// | flag     | meaning                                         |
/// |----------|-------------------------------------------------|
/// | `FLAG_A` | disabled; the box is skipped during pairing     |
/// | `FLAG_B` | center lies in the upper half of its `hx` cell  |
/// | `FLAG_C` | center lies in the upper half of its `hy` cell  |
/// | `FLAG_D` | center lies in the upper half of its `v` cell   |
///
/// A box of one cell size centered at `center` straddles exactly two cells
/// per axis: its *cell span*. The "greater" flags select which neighbour
/// completes the span. Two boxes become a candidate pair when their spans
/// share at least one cell.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SpatialBox {
    /// World-space center. Callers move objects by writing here.
    pub center: HVPoint,
    voxel: Voxel,
}

impl SpatialBox {
    /// Box is skipped during pair generation.
    pub const DISABLED: u8 = Voxel::FLAG_A;
    /// Center sits in the upper half of its `hx` cell.
    pub const HX_GREATER: u8 = Voxel::FLAG_B;
    /// Center sits in the upper half of its `hy` cell.
    pub const HY_GREATER: u8 = Voxel::FLAG_C;
    /// Center sits in the upper half of its `v` cell.
    pub const V_GREATER: u8 = Voxel::FLAG_D;

    /// Creates an enabled box at `center`. The cached voxel is computed on
    /// the next [`SpatialBox::update_voxel`].
    pub fn new(center: HVPoint) -> Self {
        Self {
            center,
            voxel: Voxel::default(),
        }
    }

    /// Direction flag for `axis`.
    pub const fn greater_flag(axis: Axis) -> u8 {
        match axis {
            Axis::Hx => Self::HX_GREATER,
            Axis::Hy => Self::HY_GREATER,
            Axis::V => Self::V_GREATER,
        }
    }

    /// Cached voxel, as of the last [`SpatialBox::update_voxel`].
    pub const fn voxel(&self) -> Voxel {
        self.voxel
    }

    /// Includes the box in pair generation again.
    pub fn enable(&mut self) {
        self.voxel.set_flag(Self::DISABLED, false);
    }

    /// Excludes the box from pair generation.
    pub fn disable(&mut self) {
        self.voxel.set_flag(Self::DISABLED, true);
    }

    /// Returns `true` unless the box was disabled.
    pub const fn is_enabled(&self) -> bool {
        !self.voxel.flag(Self::DISABLED)
    }

    /// Returns `true` if the box was disabled.
    pub const fn is_disabled(&self) -> bool {
        self.voxel.flag(Self::DISABLED)
    }

    /// Returns `true` if the center lies in the upper half of its cell on `axis`.
    pub const fn is_greater(&self, axis: Axis) -> bool {
        self.voxel.flag(Self::greater_flag(axis))
    }

    /// Lower cell of the span on each axis, as `[hx, hy, v]`.
    ///
    /// The span on an axis is `{origin, origin + 1}`.
    pub fn span_origin(&self) -> [u32; 3] {
        Axis::ALL.map(|axis| {
            (self.voxel.coord(axis) + u32::from(self.is_greater(axis))).saturating_sub(1)
        })
    }

    /// Returns `true` when the cached voxels differ by at most one cell on
    /// every axis. Boxes further apart cannot overlap.
    pub fn is_voxel_neighbour(&self, other: &Self) -> bool {
        Axis::ALL
            .into_iter()
            .all(|axis| self.voxel.coord(axis).abs_diff(other.voxel.coord(axis)) <= 1)
    }

    /// Recomputes the cached voxel and the three direction flags from `center`.
    ///
    /// `half_cell` must equal `cell.half()`; it is passed in so a whole series
    /// shares one division.
    pub fn update_voxel(&mut self, cell: &HVSize, half_cell: &HVSize) {
        let c = self.center;
        self.voxel.reset_coords(&c, cell);
        self.voxel.set_flag(
            Self::HX_GREATER,
            Voxel::relative_position(c.hx, cell.horizontal) > half_cell.horizontal,
        );
        self.voxel.set_flag(
            Self::HY_GREATER,
            Voxel::relative_position(c.hy, cell.horizontal) > half_cell.horizontal,
        );
        self.voxel.set_flag(
            Self::V_GREATER,
            Voxel::relative_position(c.v, cell.vertical) > half_cell.vertical,
        );
    }
}
