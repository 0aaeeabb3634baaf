// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Non-owning view over the caller's object records.

use crate::hv::HVSize;
use crate::spatial_box::SpatialBox;

/// Records that embed exactly one [`SpatialBox`].
///
/// The pair finder never copies records; it reaches the embedded box through
/// this accessor and hands the whole record back in the pair callback.
pub trait HasBox {
    /// Shared access to the embedded box.
    fn get_box(&self) -> &SpatialBox;
    /// Exclusive access to the embedded box.
    fn get_box_mut(&mut self) -> &mut SpatialBox;
}

impl HasBox for SpatialBox {
    fn get_box(&self) -> &SpatialBox {
        self
    }

    fn get_box_mut(&mut self) -> &mut SpatialBox {
        self
    }
}

/// Borrowed slice of records plus the cell size shared by all of them.
///
/// A series is cheap to build and is expected to be rebound for every
/// update; the records must stay in place while the update runs.
#[derive(Debug)]
pub struct Series<'a, T> {
    objects: &'a mut [T],
    cell_size: HVSize,
}

impl<'a, T: HasBox> Series<'a, T> {
    /// Wraps `objects` with the grid cell size used to discretize them.
    pub fn new(objects: &'a mut [T], cell_size: HVSize) -> Self {
        Self { objects, cell_size }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` when the series holds no records.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Cell size shared by every record.
    pub fn cell_size(&self) -> HVSize {
        self.cell_size
    }

    /// Records in index order.
    pub fn objects(&self) -> &[T] {
        &*self.objects
    }

    /// Mutable records in index order.
    pub fn objects_mut(&mut self) -> &mut [T] {
        &mut *self.objects
    }

    /// Box embedded in record `index`.
    pub fn get_box(&self, index: usize) -> Option<&SpatialBox> {
        self.objects.get(index).map(HasBox::get_box)
    }

    /// Iterates the embedded boxes in index order.
    pub fn boxes(&self) -> impl Iterator<Item = &SpatialBox> + '_ {
        self.objects.iter().map(HasBox::get_box)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hv::HVPoint;

    struct Record {
        id: u32,
        footprint: SpatialBox,
    }

    impl HasBox for Record {
        fn get_box(&self) -> &SpatialBox {
            &self.footprint
        }

        fn get_box_mut(&mut self) -> &mut SpatialBox {
            &mut self.footprint
        }
    }

    #[test]
    fn series_reaches_embedded_boxes_without_copying() {
        let mut records: Vec<Record> = (0..3)
            .map(|id| Record {
                id,
                footprint: SpatialBox::new(HVPoint::new(id as f32, 0.0, 0.0)),
            })
            .collect();
        let mut series = Series::new(&mut records, HVSize::uniform(1.0));
        assert_eq!(series.len(), 3);
        assert_eq!(series.get_box(2).map(|b| b.center.hx), Some(2.0));
        assert!(series.get_box(3).is_none());

        series.objects_mut()[1].get_box_mut().disable();
        let disabled: Vec<u32> = series
            .objects()
            .iter()
            .filter(|r| r.get_box().is_disabled())
            .map(|r| r.id)
            .collect();
        assert_eq!(disabled, vec![1]);
        assert_eq!(series.boxes().filter(|b| b.is_enabled()).count(), 2);
    }
}
