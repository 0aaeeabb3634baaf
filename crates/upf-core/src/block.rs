// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! One of the eight parity-shifted grids.
//!
//! A block only stores cells whose coordinates share one fixed parity per
//! axis (its *mask*). Every enabled box is filed once per block, into the
//! cell of its span that carries the block's parity: on axes where the
//! box's own cell already matches, the coordinate is kept; elsewhere it moves
//! one step toward the half of the cell the center sits in.
//!
//! Two boxes meet in a block iff that block's cell lies in both spans, so a
//! pair meets once for every cell the spans share. Each proxy records, per
//! axis, whether its bucket cell is the *upper* cell of its span; a pair is
//! emitted only where no axis has both proxies in their upper cell, which
//! selects the lowest shared cell and therefore exactly one block.

use core::ops::Range;

use crate::buckets::{BucketMap, Slots};
use crate::series::{HasBox, Series};
use crate::voxel::{Axis, Voxel};

/// Packed per-box record inside a block.
///
/// ```text
/// bit  0      main: the box lives in this bucket's cell
/// bits 1..4   direction code; bit per axis (hx, hy, v), set when the bucket
///             cell is the upper cell of the box's span on that axis
/// bits 4..32  index of the next proxy in the same list
/// ```
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Proxy(u32);

impl Proxy {
    /// Bits in the type nibble.
    pub const NUM_TYPE_BITS: u32 = 4;
    /// Bits in the next-index field.
    pub const NUM_ID_BITS: u32 = 28;
    /// Largest representable index; reserved as the list terminator.
    pub const MAX_ID: u32 = (1 << Self::NUM_ID_BITS) - 1;
    /// End-of-list marker.
    pub const INVALID_ID: u32 = Self::MAX_ID;

    const MAIN: u32 = 1;
    const TYPE_MASK: u32 = (1 << Self::NUM_TYPE_BITS) - 1;

    /// Proxy that belongs to no list (disabled box).
    pub const DETACHED: Self = Self(Self::INVALID_ID << Self::NUM_TYPE_BITS);

    /// Packs a proxy. `direction` uses its low three bits.
    pub fn new(is_main: bool, direction: u8, next: u32) -> Self {
        debug_assert!(next <= Self::MAX_ID, "next index exceeds 28 bits: {next}");
        let kind = u32::from(is_main) | (u32::from(direction & 0b111) << 1);
        Self((next << Self::NUM_TYPE_BITS) | kind)
    }

    /// Returns `true` if the box lives in the bucket's own cell.
    pub const fn is_main(self) -> bool {
        self.0 & Self::MAIN != 0
    }

    /// Three-bit direction code.
    pub const fn direction(self) -> u8 {
        ((self.0 & Self::TYPE_MASK) >> 1) as u8
    }

    /// Next proxy in the same list, or [`Proxy::INVALID_ID`].
    pub const fn next(self) -> u32 {
        self.0 >> Self::NUM_TYPE_BITS
    }

    /// Returns `true` if this pair is owned by the bucket both proxies share.
    ///
    /// Symmetric. Only meaningful for two proxies filed in the same bucket.
    pub const fn can_pair_with(self, other: Self) -> bool {
        self.direction() & other.direction() == 0
    }
}

impl core::fmt::Debug for Proxy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Proxy")
            .field("main", &self.is_main())
            .field("direction", &format_args!("{:03b}", self.direction()))
            .field("next", &self.next())
            .finish()
    }
}

impl Default for Proxy {
    fn default() -> Self {
        Self::DETACHED
    }
}

/// Grid of cells sharing one coordinate parity per axis.
#[derive(Debug, Clone, Default)]
pub struct Block {
    mask: Voxel,
    proxies: Vec<Proxy>,
    buckets: BucketMap,
}

impl Block {
    /// Number of blocks needed to cover every parity combination.
    pub const COUNT: usize = 8;

    /// Binds the block to `mask` and sizes it for `series`.
    ///
    /// Only the parity of each mask coordinate matters.
    pub fn initialize<T: HasBox>(&mut self, mask: Voxel, series: &Series<'_, T>) {
        self.initialize_for_len(mask, series.len());
    }

    pub(crate) fn initialize_for_len(&mut self, mask: Voxel, len: usize) {
        self.mask = mask;
        self.proxies = vec![Proxy::DETACHED; len];
        self.buckets = BucketMap::with_capacity(len);
    }

    /// Parity mask.
    pub const fn mask(&self) -> Voxel {
        self.mask
    }

    /// One proxy per object, in object order.
    pub fn proxies(&self) -> &[Proxy] {
        &self.proxies
    }

    /// Slot count of the bucket table; bucket ranges index into `0..num_buckets()`.
    pub fn num_buckets(&self) -> usize {
        self.buckets.slot_count()
    }

    /// Number of occupied buckets.
    pub fn occupied_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Occupied buckets whose slot index falls in `range`.
    pub fn buckets(&self, range: Range<usize>) -> Slots<'_> {
        self.buckets.slots(range)
    }

    /// Rebuilds every bucket from the current box state.
    ///
    /// Boxes must have been refreshed with
    /// [`SpatialBox::update_voxel`](crate::SpatialBox::update_voxel) first.
    pub fn update<T: HasBox>(&mut self, objects: &[T]) {
        debug_assert_eq!(
            objects.len(),
            self.proxies.len(),
            "block sized for a different object count"
        );
        self.buckets.clear();

        let parity = self.mask.coords().map(|c| c & 1);
        for (id, (object, proxy)) in objects.iter().zip(self.proxies.iter_mut()).enumerate() {
            let b = object.get_box();
            if b.is_disabled() {
                *proxy = Proxy::DETACHED;
                continue;
            }

            let voxel = b.voxel();
            let mut cell = voxel.coords();
            let mut direction = 0u8;
            for axis in Axis::ALL {
                let i = axis.index();
                let own = cell[i];
                let greater = b.is_greater(axis);
                if own & 1 != parity[i] {
                    cell[i] = if greater {
                        (own + 1).min(Voxel::MAX_COORD)
                    } else {
                        own.saturating_sub(1)
                    };
                }
                let span_origin = (own + u32::from(greater)).saturating_sub(1);
                if cell[i] != span_origin {
                    direction |= 1 << i;
                }
            }

            let key = Voxel::from_coords(cell[0], cell[1], cell[2]).to_coords_mask();
            let is_main = key == voxel.to_coords_mask();
            let list = self.buckets.entry(key);
            let head = if is_main {
                &mut list.main
            } else {
                &mut list.adjacent
            };
            *proxy = Proxy::new(is_main, direction, *head);
            *head = id as u32;
        }
    }

    /// Emits every pair owned by the buckets in `range` and returns the count.
    ///
    /// `emit` receives object indices; the first is always a proxy visited
    /// before the second in list order.
    pub fn find_pairs<F>(&self, range: Range<usize>, mut emit: F) -> u64
    where
        F: FnMut(usize, usize),
    {
        let mut count = 0u64;
        for (_, list) in self.buckets(range) {
            let mut a = list.main;
            while a != Proxy::INVALID_ID {
                let proxy_a = self.proxies[a as usize];
                count += self.pair_with_list(proxy_a, a, proxy_a.next(), &mut emit);
                count += self.pair_with_list(proxy_a, a, list.adjacent, &mut emit);
                a = proxy_a.next();
            }

            let mut a = list.adjacent;
            while a != Proxy::INVALID_ID {
                let proxy_a = self.proxies[a as usize];
                count += self.pair_with_list(proxy_a, a, proxy_a.next(), &mut emit);
                a = proxy_a.next();
            }
        }
        count
    }

    fn pair_with_list<F>(&self, proxy_a: Proxy, a: u32, mut b: u32, emit: &mut F) -> u64
    where
        F: FnMut(usize, usize),
    {
        let mut count = 0u64;
        while b != Proxy::INVALID_ID {
            let proxy_b = self.proxies[b as usize];
            if proxy_a.can_pair_with(proxy_b) {
                emit(a as usize, b as usize);
                count += 1;
            }
            b = proxy_b.next();
        }
        count
    }
}

/// Parity masks in block order: `hx` varies fastest, then `hy`, then `v`.
pub fn block_masks() -> [Voxel; Block::COUNT] {
    core::array::from_fn(|i| {
        let i = i as u32;
        Voxel::from_coords(i & 1, (i >> 1) & 1, (i >> 2) & 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hv::{HVPoint, HVSize};
    use crate::spatial_box::SpatialBox;

    fn boxes(cell: HVSize, centers: &[[f32; 3]]) -> Vec<SpatialBox> {
        centers
            .iter()
            .map(|&[x, y, v]| {
                let mut b = SpatialBox::new(HVPoint::new(x, y, v));
                b.update_voxel(&cell, &cell.half());
                b
            })
            .collect()
    }

    fn all_blocks(objects: &[SpatialBox]) -> Vec<Block> {
        block_masks()
            .into_iter()
            .map(|mask| {
                let mut block = Block::default();
                block.initialize_for_len(mask, objects.len());
                block.update(objects);
                block
            })
            .collect()
    }

    fn collect_pairs(blocks: &[Block]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for block in blocks {
            block.find_pairs(0..block.num_buckets(), |a, b| pairs.push((a.min(b), a.max(b))));
        }
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn proxy_packs_type_and_next_index() {
        let p = Proxy::new(true, 0b101, 12345);
        assert!(p.is_main());
        assert_eq!(p.direction(), 0b101);
        assert_eq!(p.next(), 12345);
        assert_eq!(Proxy::DETACHED.next(), Proxy::INVALID_ID);
        assert!(!Proxy::DETACHED.is_main());
    }

    #[test]
    fn pairing_rule_is_symmetric() {
        for x in 0..8u8 {
            for y in 0..8u8 {
                let a = Proxy::new(false, x, 0);
                let b = Proxy::new(true, y, 0);
                assert_eq!(a.can_pair_with(b), b.can_pair_with(a));
            }
        }
    }

    #[test]
    fn masks_cover_every_parity_combination_once() {
        let mut seen: Vec<[u32; 3]> = block_masks().iter().map(|m| m.coords()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), Block::COUNT);
        assert_eq!(block_masks()[0].coords(), [0, 0, 0]);
        assert_eq!(block_masks()[1].coords(), [1, 0, 0]);
        assert_eq!(block_masks()[4].coords(), [0, 0, 1]);
    }

    #[test]
    fn each_box_is_main_in_exactly_one_block() {
        let objects = boxes(
            HVSize::uniform(1.0),
            &[[0.2, 0.7, 0.1], [3.9, -2.2, 5.5], [-7.4, 1.1, -0.6]],
        );
        let blocks = all_blocks(&objects);
        for id in 0..objects.len() {
            let mains = blocks.iter().filter(|b| b.proxies()[id].is_main()).count();
            assert_eq!(mains, 1, "box {id}");
        }
    }

    #[test]
    fn disabled_boxes_are_detached() {
        let mut objects = boxes(HVSize::uniform(1.0), &[[0.5, 0.5, 0.5], [0.6, 0.5, 0.5]]);
        objects[1].disable();
        let blocks = all_blocks(&objects);
        for block in &blocks {
            assert_eq!(block.proxies()[1], Proxy::DETACHED);
            assert_eq!(block.occupied_buckets(), 1);
        }
        assert!(collect_pairs(&blocks).is_empty());
    }

    #[test]
    fn pair_straddling_a_cell_boundary_is_found_once() {
        // Centers 0.6 apart across the hx boundary at 1.0.
        let objects = boxes(HVSize::uniform(1.0), &[[0.7, 0.5, 0.5], [1.3, 0.5, 0.5]]);
        assert_eq!(collect_pairs(&all_blocks(&objects)), vec![(0, 1)]);
    }

    #[test]
    fn diagonal_neighbours_reached_only_through_adjacent_proxies_pair() {
        // Neither box's own cell lies in the other's span, so the shared cell
        // holds two adjacent proxies.
        let objects = boxes(
            HVSize::uniform(1.0),
            &[[0.45, 1.4, 0.5], [1.4, 0.45, 0.5]],
        );
        assert_eq!(collect_pairs(&all_blocks(&objects)), vec![(0, 1)]);
    }

    #[test]
    fn boxes_in_the_same_cell_pair_once() {
        let objects = boxes(
            HVSize::uniform(4.0),
            &[[1.0, 1.0, 1.0], [1.5, 1.2, 0.8], [3.0, 3.0, 3.0]],
        );
        assert_eq!(collect_pairs(&all_blocks(&objects)), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn split_ranges_emit_the_same_pairs_as_a_full_scan() {
        let centers: Vec<[f32; 3]> = (0..40)
            .map(|i| {
                let f = i as f32;
                [(f * 0.37) % 5.0, (f * 0.73) % 4.0, (f * 0.11) % 2.0]
            })
            .collect();
        let objects = boxes(HVSize::uniform(1.0), &centers);
        let blocks = all_blocks(&objects);
        let full = collect_pairs(&blocks);

        let mut split = Vec::new();
        for block in &blocks {
            let n = block.num_buckets();
            for range in [0..n / 4, n / 4..n / 2, n / 2..n] {
                block.find_pairs(range, |a, b| split.push((a.min(b), a.max(b))));
            }
        }
        split.sort_unstable();
        assert_eq!(full, split);
    }
}
