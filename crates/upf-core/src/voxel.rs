// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bit-packed cell coordinates.
//!
//! # Layout (canonical, little-endian bit numbering)
//!
//! ```text
//! bits  0..20  hx     horizontal X cell
//! bits 20..40  hy     horizontal Y cell
//! bits 40..60  v      vertical cell
//! bits 60..64  flags  FLAG_A (60) .. FLAG_D (63)
//! ```
//!
//! Cell `ORIGIN_OFFSET` on every axis contains the world origin. Positions
//! outside the representable universe are clamped to the outermost valid
//! cell instead of failing; callers that need a hard bound must check
//! positions before handing them to the pair finder.

use core::fmt;

use crate::hv::{HVPoint, HVSize};

/// One of the three voxel axes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    /// First horizontal axis.
    Hx,
    /// Second horizontal axis.
    Hy,
    /// Vertical axis.
    V,
}

impl Axis {
    /// All axes in packing order.
    pub const ALL: [Self; 3] = [Self::Hx, Self::Hy, Self::V];

    /// Position of the axis in `[hx, hy, v]` arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::Hx => 0,
            Self::Hy => 1,
            Self::V => 2,
        }
    }

    const fn shift(self) -> u32 {
        self.index() as u32 * Voxel::NUM_COORDINATE_BITS
    }
}

/// Discretized 3D coordinate plus four user flags packed into one `u64`.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Voxel(u64);

impl Voxel {
    /// Bits per coordinate.
    pub const NUM_COORDINATE_BITS: u32 = 20;
    /// Flag bits reserved for the user.
    pub const NUM_USER_FLAGS: u32 = 4;
    /// Number of cells along each axis.
    pub const NUM_VOXELS_PER_AXIS: u32 = 1 << Self::NUM_COORDINATE_BITS;
    /// Largest encodable coordinate.
    pub const MAX_COORD: u32 = Self::NUM_VOXELS_PER_AXIS - 1;
    /// Cell containing the world origin on every axis.
    pub const ORIGIN_OFFSET: u32 = Self::NUM_VOXELS_PER_AXIS / 2;
    /// Smallest coordinate produced from a world position.
    pub const VALID_COORDS_MIN: u32 = 1;
    /// Largest coordinate produced from a world position.
    pub const VALID_COORDS_MAX: u32 = Self::MAX_COORD - 1;

    /// First user flag.
    pub const FLAG_A: u8 = 1 << 0;
    /// Second user flag.
    pub const FLAG_B: u8 = 1 << 1;
    /// Third user flag.
    pub const FLAG_C: u8 = 1 << 2;
    /// Fourth user flag.
    pub const FLAG_D: u8 = 1 << 3;
    /// Every user flag.
    pub const FLAG_ABCD: u8 = Self::FLAG_A | Self::FLAG_B | Self::FLAG_C | Self::FLAG_D;

    const COORD_MASK: u64 = (1 << Self::NUM_COORDINATE_BITS) - 1;
    const FLAGS_SHIFT: u32 = 3 * Self::NUM_COORDINATE_BITS;
    const COORDS_MASK: u64 = (1 << Self::FLAGS_SHIFT) - 1;

    /// Sentinel with every coordinate at `MAX_COORD` and no flags set.
    pub const NULL: Self = Self(Self::COORDS_MASK);

    /// Packs raw cell coordinates. Flags start cleared.
    pub fn from_coords(hx: u32, hy: u32, v: u32) -> Self {
        debug_assert!(hx <= Self::MAX_COORD, "hx out of range: {hx}");
        debug_assert!(hy <= Self::MAX_COORD, "hy out of range: {hy}");
        debug_assert!(v <= Self::MAX_COORD, "v out of range: {v}");
        let mut voxel = Self(0);
        voxel.set_coord(Axis::Hx, hx);
        voxel.set_coord(Axis::Hy, hy);
        voxel.set_coord(Axis::V, v);
        voxel
    }

    /// Discretizes a world position into the cell that contains it.
    pub fn from_position(position: &HVPoint, cell: &HVSize) -> Self {
        let mut voxel = Self(0);
        voxel.reset_coords(position, cell);
        voxel
    }

    /// Rebuilds a voxel from its packed representation.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the packed representation.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns the packed coordinates with every flag bit stripped.
    ///
    /// Never equals `u64::MAX`, which the bucket table reserves as its empty key.
    pub const fn to_coords_mask(self) -> u64 {
        self.0 & Self::COORDS_MASK
    }

    /// Coordinate along `axis`.
    pub const fn coord(self, axis: Axis) -> u32 {
        ((self.0 >> axis.shift()) & Self::COORD_MASK) as u32
    }

    /// Coordinates as `[hx, hy, v]`.
    pub fn coords(self) -> [u32; 3] {
        Axis::ALL.map(|axis| self.coord(axis))
    }

    /// Horizontal X coordinate.
    pub const fn hx(self) -> u32 {
        self.coord(Axis::Hx)
    }

    /// Horizontal Y coordinate.
    pub const fn hy(self) -> u32 {
        self.coord(Axis::Hy)
    }

    /// Vertical coordinate.
    pub const fn v(self) -> u32 {
        self.coord(Axis::V)
    }

    /// Overwrites the coordinate along `axis`; bits above 20 are discarded.
    pub fn set_coord(&mut self, axis: Axis, value: u32) {
        let shift = axis.shift();
        self.0 = (self.0 & !(Self::COORD_MASK << shift))
            | ((u64::from(value) & Self::COORD_MASK) << shift);
    }

    /// Copies the coordinates of `other`, keeping this voxel's flags.
    pub fn copy_coords(&mut self, other: Self) {
        self.0 = (self.0 & !Self::COORDS_MASK) | other.to_coords_mask();
    }

    /// Recomputes the horizontal coordinates from a world position.
    pub fn set_horizontal(&mut self, hx: f32, hy: f32, cell: &HVSize) {
        self.set_coord(Axis::Hx, from_precise(hx, cell.horizontal));
        self.set_coord(Axis::Hy, from_precise(hy, cell.horizontal));
    }

    /// Recomputes the vertical coordinate from a world position.
    pub fn set_vertical(&mut self, v: f32, cell: &HVSize) {
        self.set_coord(Axis::V, from_precise(v, cell.vertical));
    }

    /// Recomputes every coordinate from a world position, keeping flags.
    pub fn reset_coords(&mut self, position: &HVPoint, cell: &HVSize) {
        self.set_horizontal(position.hx, position.hy, cell);
        self.set_vertical(position.v, cell);
    }

    /// Lowers each coordinate to `other`'s where `other` is smaller.
    pub fn minimize(&mut self, other: Self) {
        for axis in Axis::ALL {
            if other.coord(axis) < self.coord(axis) {
                self.set_coord(axis, other.coord(axis));
            }
        }
    }

    /// Raises each coordinate to `other`'s where `other` is larger.
    pub fn maximize(&mut self, other: Self) {
        for axis in Axis::ALL {
            if other.coord(axis) > self.coord(axis) {
                self.set_coord(axis, other.coord(axis));
            }
        }
    }

    /// Per-axis minimum over `voxels`; flags come from the first element.
    pub fn min_of(voxels: &[Self]) -> Option<Self> {
        let (first, rest) = voxels.split_first()?;
        Some(rest.iter().fold(*first, |mut acc, voxel| {
            acc.minimize(*voxel);
            acc
        }))
    }

    /// Per-axis maximum over `voxels`; flags come from the first element.
    pub fn max_of(voxels: &[Self]) -> Option<Self> {
        let (first, rest) = voxels.split_first()?;
        Some(rest.iter().fold(*first, |mut acc, voxel| {
            acc.maximize(*voxel);
            acc
        }))
    }

    /// World position of this cell's minimum corner.
    pub fn to_point(self, cell: &HVSize) -> HVPoint {
        HVPoint::new(
            to_precise(self.hx(), cell.horizontal),
            to_precise(self.hy(), cell.horizontal),
            to_precise(self.v(), cell.vertical),
        )
    }

    /// Clamps every coordinate into `[min, max]`.
    pub fn clamp(&mut self, min: u32, max: u32) {
        for axis in Axis::ALL {
            self.set_coord(axis, self.coord(axis).clamp(min, max));
        }
    }

    /// Raw flag nibble.
    pub const fn flags(self) -> u8 {
        (self.0 >> Self::FLAGS_SHIFT) as u8
    }

    /// Sets or clears every flag in `combination`.
    pub fn set_flags(&mut self, combination: u8, state: bool) {
        let bits = u64::from(combination & Self::FLAG_ABCD) << Self::FLAGS_SHIFT;
        if state {
            self.0 |= bits;
        } else {
            self.0 &= !bits;
        }
    }

    /// Sets or clears a single flag.
    pub fn set_flag(&mut self, flag: u8, state: bool) {
        debug_assert!(flag.is_power_of_two() && flag <= Self::FLAG_D, "not a single flag: {flag:#x}");
        self.set_flags(flag, state);
    }

    /// Replaces this voxel's flags with `other`'s.
    pub fn copy_flags(&mut self, other: Self) {
        self.0 = self.to_coords_mask() | (other.0 & !Self::COORDS_MASK);
    }

    /// Returns `true` if `flag` is set.
    pub const fn flag(self, flag: u8) -> bool {
        self.has_flag_combination(flag)
    }

    /// Returns `true` if every flag in `combination` is set.
    pub const fn has_flag_combination(self, combination: u8) -> bool {
        self.flags() & combination == combination
    }

    /// Returns `true` if any flag in `combination` is set.
    pub const fn has_any_flag_of(self, combination: u8) -> bool {
        self.flags() & combination != 0
    }

    /// Returns `true` if both voxels agree on every flag in `combination`.
    pub const fn same_flag_combination(self, other: Self, combination: u8) -> bool {
        self.flags() & combination == other.flags() & combination
    }

    /// `position mod stride`, wrapped into `[0, stride)` for negative positions.
    pub fn relative_position(position: f32, stride: f32) -> f32 {
        let rem = position % stride;
        if rem < 0.0 {
            rem + stride
        } else {
            rem
        }
    }
}

impl From<Voxel> for u64 {
    fn from(voxel: Voxel) -> Self {
        voxel.raw()
    }
}

impl From<u64> for Voxel {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Debug for Voxel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Voxel")
            .field("hx", &self.hx())
            .field("hy", &self.hy())
            .field("v", &self.v())
            .field("flags", &format_args!("{:#06b}", self.flags()))
            .finish()
    }
}

fn from_precise(position: f32, stride: f32) -> u32 {
    // `as` saturates on overflow and maps NaN to zero.
    let cell = (position / stride).floor() as i64;
    let offset = cell.saturating_add(i64::from(Voxel::ORIGIN_OFFSET));
    offset.clamp(
        i64::from(Voxel::VALID_COORDS_MIN),
        i64::from(Voxel::VALID_COORDS_MAX),
    ) as u32
}

fn to_precise(coord: u32, stride: f32) -> f32 {
    (i64::from(coord) - i64::from(Voxel::ORIGIN_OFFSET)) as f32 * stride
}
