// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Horizontal/vertical value types.
//!
//! The pair finder treats the two horizontal axes uniformly and lets the
//! vertical axis use its own cell height, so sizes carry two components while
//! points carry three.

/// Cell extent: one edge length shared by both horizontal axes plus a height.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HVSize {
    /// Edge length along `hx` and `hy`.
    pub horizontal: f32,
    /// Edge length along `v`.
    pub vertical: f32,
}

impl HVSize {
    /// Creates a size from its horizontal and vertical extents.
    pub const fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Creates a cubic size.
    pub const fn uniform(edge: f32) -> Self {
        Self::new(edge, edge)
    }

    /// Returns half of each extent.
    pub fn half(&self) -> Self {
        Self::new(self.horizontal * 0.5, self.vertical * 0.5)
    }

    /// Returns `true` when both extents are finite and strictly positive.
    pub fn is_valid_cell(&self) -> bool {
        self.horizontal.is_finite()
            && self.vertical.is_finite()
            && self.horizontal > 0.0
            && self.vertical > 0.0
    }
}

impl Default for HVSize {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// World-space point split into a horizontal plane and a vertical coordinate.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HVPoint {
    /// First horizontal coordinate.
    pub hx: f32,
    /// Second horizontal coordinate.
    pub hy: f32,
    /// Vertical coordinate.
    pub v: f32,
}

impl HVPoint {
    /// Creates a point from components.
    pub const fn new(hx: f32, hy: f32, v: f32) -> Self {
        Self { hx, hy, v }
    }

    /// Moves the point within the horizontal plane.
    pub fn translate_horizontal(&mut self, dx: f32, dy: f32) {
        self.hx += dx;
        self.hy += dy;
    }
}
