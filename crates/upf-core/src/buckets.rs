// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Open-addressed bucket table keyed by packed cell coordinates.
//!
//! Linear probing over a power-of-two slot array. `u64::MAX` marks an empty
//! slot; real keys are flag-stripped voxels and never reach it. Slots are
//! addressable by index so the pairing phase can split the table into
//! contiguous ranges and scan them from different threads without locks.

use core::hash::Hasher;
use core::ops::Range;

use rustc_hash::FxHasher;

/// Key reserved for empty slots.
pub const EMPTY_KEY: u64 = u64::MAX;

/// Slot count never drops below this.
const MIN_SLOTS: usize = 16;

/// Heads of the two singly-linked proxy lists filed under one cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProxyList {
    /// First proxy whose box lives in this cell.
    pub main: u32,
    /// First proxy shifted into this cell from a neighbour.
    pub adjacent: u32,
}

impl ProxyList {
    /// Both lists empty.
    pub const EMPTY: Self = Self {
        main: crate::block::Proxy::INVALID_ID,
        adjacent: crate::block::Proxy::INVALID_ID,
    };
}

impl Default for ProxyList {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[derive(Debug, Copy, Clone)]
struct Slot {
    key: u64,
    list: ProxyList,
}

impl Slot {
    const VACANT: Self = Self {
        key: EMPTY_KEY,
        list: ProxyList::EMPTY,
    };

    const fn is_vacant(&self) -> bool {
        self.key == EMPTY_KEY
    }
}

/// Cell-key → [`ProxyList`] map with slot-level access.
#[derive(Debug, Clone)]
pub struct BucketMap {
    slots: Vec<Slot>,
    len: usize,
}

impl Default for BucketMap {
    fn default() -> Self {
        Self::new()
    }
}

impl BucketMap {
    /// Creates an empty table with the minimum slot count.
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::VACANT; MIN_SLOTS],
            len: 0,
        }
    }

    /// Creates a table that holds `entries` keys without growing.
    pub fn with_capacity(entries: usize) -> Self {
        let mut map = Self::new();
        map.reserve(entries);
        map
    }

    /// Makes room for `entries` keys in total, keeping the load factor ≤ ½.
    pub fn reserve(&mut self, entries: usize) {
        let wanted = slots_for(entries);
        if wanted > self.slots.len() {
            self.rehash(wanted);
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no key is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slot count, occupied or not.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Empties every slot, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::VACANT);
        self.len = 0;
    }

    /// Lists filed under `key`, if any.
    pub fn get(&self, key: u64) -> Option<&ProxyList> {
        if key == EMPTY_KEY {
            return None;
        }
        let mask = self.slots.len() - 1;
        let mut index = home_slot(key, mask);
        loop {
            let slot = &self.slots[index];
            if slot.key == key {
                return Some(&slot.list);
            }
            if slot.is_vacant() {
                return None;
            }
            index = (index + 1) & mask;
        }
    }

    /// Lists filed under `key`, inserting empty lists first if absent.
    pub fn entry(&mut self, key: u64) -> &mut ProxyList {
        debug_assert_ne!(key, EMPTY_KEY, "the empty key cannot be stored");
        if slots_for(self.len + 1) > self.slots.len() {
            self.rehash(self.slots.len() * 2);
        }
        let mask = self.slots.len() - 1;
        let mut index = home_slot(key, mask);
        while !self.slots[index].is_vacant() && self.slots[index].key != key {
            index = (index + 1) & mask;
        }
        let slot = &mut self.slots[index];
        if slot.is_vacant() {
            slot.key = key;
            self.len += 1;
        }
        &mut slot.list
    }

    /// Occupied slots whose index falls in `range`, in slot order.
    ///
    /// The range is clamped to the table, so adjacent ranges that tile
    /// `0..slot_count()` visit every key exactly once.
    pub fn slots(&self, range: Range<usize>) -> Slots<'_> {
        let end = range.end.min(self.slots.len());
        let start = range.start.min(end);
        Slots {
            inner: self.slots[start..end].iter(),
        }
    }

    fn rehash(&mut self, slot_count: usize) {
        debug_assert!(slot_count.is_power_of_two());
        let old = std::mem::replace(&mut self.slots, vec![Slot::VACANT; slot_count]);
        let mask = slot_count - 1;
        for slot in old.into_iter().filter(|s| !s.is_vacant()) {
            let mut index = home_slot(slot.key, mask);
            while !self.slots[index].is_vacant() {
                index = (index + 1) & mask;
            }
            self.slots[index] = slot;
        }
    }
}

/// Iterator over the occupied slots of a [`BucketMap`] range.
#[derive(Debug, Clone)]
pub struct Slots<'a> {
    inner: core::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Slots<'a> {
    type Item = (u64, &'a ProxyList);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .by_ref()
            .find(|slot| !slot.is_vacant())
            .map(|slot| (slot.key, &slot.list))
    }
}

fn slots_for(entries: usize) -> usize {
    entries
        .saturating_mul(2)
        .checked_next_power_of_two()
        .unwrap_or(usize::MAX / 2 + 1)
        .max(MIN_SLOTS)
}

fn home_slot(key: u64, mask: usize) -> usize {
    let mut hasher = FxHasher::default();
    hasher.write_u64(key);
    let h = hasher.finish();
    // Fold the high half in; Fx leaves the best entropy in the upper bits.
    ((h ^ (h >> 32)) as usize) & mask
}
