use crate::error::ValidationError;

/// Circular distance rules between the pins of a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinDistancer {
    count: usize,
    min: usize,
}

impl PinDistancer {
    /// Fails unless at least one pair of pins is `distance` or more pins apart.
    pub fn new(count: usize, distance: usize) -> Result<Self, ValidationError> {
        if distance == 0 {
            return Err(ValidationError::ZeroSeparation);
        }
        let required = 2 * distance;
        if count < required {
            Err(ValidationError::NotEnoughPins {
                count,
                required,
                separation: distance,
            })
        } else {
            Ok(Self {
                count,
                min: distance,
            })
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn min(&self) -> usize {
        self.min
    }

    /// Number of pins between `a` and `b` going the short way around the circle.
    pub fn distance(&self, a_idx: usize, b_idx: usize) -> usize {
        let diff = a_idx.abs_diff(b_idx);
        diff.min(self.count.saturating_sub(diff))
    }

    pub fn is_valid(&self, a_idx: usize, b_idx: usize) -> bool {
        a_idx < self.count && b_idx < self.count && self.distance(a_idx, b_idx) >= self.min
    }

    /// Slot of the unordered pair `(a, b)` in a triangular table of `pair_count()` entries.
    ///
    /// `a` and `b` must be different.
    pub fn pair_index(&self, a_idx: usize, b_idx: usize) -> usize {
        let (small, big) = if a_idx < b_idx {
            (a_idx, b_idx)
        } else {
            (b_idx, a_idx)
        };
        big * (big - 1) / 2 + small
    }

    pub fn pair_count(&self) -> usize {
        self.count * self.count.saturating_sub(1) / 2
    }

    /// Every unordered pair `(small, big)` in the order of [`Self::pair_index`].
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        (1..self.count).flat_map(|big| (0..big).map(move |small| (small, big)))
    }
}
