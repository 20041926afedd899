use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    pin_distancer::PinDistancer,
    pins::PinTable,
    verboser::{Message, Verboser},
};

/// Rasterized pixels of every admissible chord, baked once per run.
///
/// Pixels are stored as row major indexes into the working grid of the pin table.
pub struct ChordCache {
    chords: Vec<Option<Box<[u32]>>>,
    distancer: PinDistancer,
    len: usize,
    degenerate: usize,
}

impl ChordCache {
    /// Rasterizes every pair of pins that `distancer` admits.
    ///
    /// `distancer` must describe as many pins as `table` holds.
    pub fn bake(table: &PinTable, distancer: PinDistancer, verboser: &mut impl Verboser) -> Self {
        verboser.verbose(Message::Baking);
        let grid = table.grid();
        let count = distancer.count().min(table.len());

        let chords: Vec<Option<Box<[u32]>>> = (1..count)
            .into_par_iter()
            .flat_map_iter(|big| {
                (0..big).map(move |small| {
                    if !distancer.is_valid(small, big) {
                        return None;
                    }
                    let segment = table.segment(small, big)?;
                    let pixels: Box<[u32]> = grid
                        .get_pixel_indexes_in_segment(segment)
                        .map(|idx| idx as u32)
                        .collect();
                    (!pixels.is_empty()).then_some(pixels)
                })
            })
            .collect();

        let admissible = distancer
            .pairs()
            .filter(|&(small, big)| big < count && distancer.is_valid(small, big))
            .count();
        let len = chords.iter().filter(|chord| chord.is_some()).count();
        let degenerate = admissible - len;
        log::debug!(
            "baked {} chords between {} pins, {} degenerate skipped",
            len,
            count,
            degenerate
        );

        Self {
            chords,
            distancer,
            len,
            degenerate,
        }
    }

    /// Pixels of the chord between `a` and `b`, in either order.
    ///
    /// `None` when the pins are too close, out of range, or collapse to the same pixel.
    pub fn get(&self, a_idx: usize, b_idx: usize) -> Option<&[u32]> {
        if !self.distancer.is_valid(a_idx, b_idx) {
            return None;
        }
        self.chords
            .get(self.distancer.pair_index(a_idx, b_idx))?
            .as_deref()
    }

    /// Every cached chord once, as `((small, big), pixels)`.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &[u32])> + '_ {
        self.distancer
            .pairs()
            .zip(self.chords.iter())
            .filter_map(|(pair, chord)| chord.as_deref().map(|pixels| (pair, pixels)))
    }

    pub fn distancer(&self) -> &PinDistancer {
        &self.distancer
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Admissible pairs left out because their rasterization is empty.
    pub fn degenerate_count(&self) -> usize {
        self.degenerate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grid::Grid, verboser::Silent};
    use std::collections::HashSet;

    fn cache(size: usize, pins: usize, separation: usize) -> (PinTable, ChordCache) {
        let table = PinTable::circular(Grid::square(size), pins, &mut Silent);
        let distancer = PinDistancer::new(pins, separation).unwrap();
        let cache = ChordCache::bake(&table, distancer, &mut Silent);
        (table, cache)
    }

    #[test]
    fn holds_every_admissible_pair_once() {
        let (_, cache) = cache(120, 60, 20);
        let distancer = *cache.distancer();
        let mut seen = HashSet::new();
        for ((a, b), pixels) in cache.iter() {
            assert!(a < b);
            assert!(distancer.distance(a, b) >= 20);
            assert!(!pixels.is_empty());
            assert!(seen.insert((a, b)));
        }
        let expected = (0..60)
            .flat_map(|a| (a + 1..60).map(move |b| (a, b)))
            .filter(|&(a, b)| distancer.distance(a, b) >= 20)
            .count();
        assert_eq!(cache.degenerate_count(), 0);
        assert_eq!(seen.len(), expected);
        assert_eq!(cache.len(), expected);
    }

    #[test]
    fn lookup_is_unordered_and_rejects_close_pins() {
        let (table, cache) = cache(120, 60, 20);
        assert_eq!(cache.get(3, 40), cache.get(40, 3));
        assert!(cache.get(3, 40).is_some());
        assert!(cache.get(3, 22).is_none());
        assert!(cache.get(0, 59).is_none());
        assert!(cache.get(5, 5).is_none());
        assert!(cache.get(5, 600).is_none());

        let grid = table.grid();
        let expected: Vec<u32> = grid
            .get_pixel_indexes_in_segment(table.segment(3, 40).unwrap())
            .map(|idx| idx as u32)
            .collect();
        assert_eq!(cache.get(40, 3), Some(expected.as_slice()));
    }

    #[test]
    fn pins_on_the_same_pixel_are_skipped() {
        // Forty pins on a 3x3 grid collapse onto a handful of pixels.
        let (_, cache) = cache(3, 40, 1);
        assert!(cache.degenerate_count() > 0);
        for (_, pixels) in cache.iter() {
            assert!(!pixels.is_empty());
        }
        assert_eq!(
            cache.len() + cache.degenerate_count(),
            (0..40)
                .flat_map(|a| (a + 1..40).map(move |b| (a, b)))
                .filter(|&(a, b)| cache.distancer().distance(a, b) >= 1)
                .count()
        );
    }
}
