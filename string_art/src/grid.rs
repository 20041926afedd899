use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Segment};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T = usize> {
    pub height: T,
    pub width: T,
}

impl<T> Grid<T> {
    pub fn new(height: T, width: T) -> Self {
        Self { height, width }
    }
}

impl<T: Copy> Grid<T> {
    pub fn square(side: T) -> Self {
        Self {
            height: side,
            width: side,
        }
    }
}

impl Grid {
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bottom right pixel of the grid.
    pub fn max_point(&self) -> Point<usize> {
        Point {
            x: self.width.saturating_sub(1),
            y: self.height.saturating_sub(1),
        }
    }

    pub fn get_pixel_indexes_in_segment(
        &self,
        seg: Segment<usize>,
    ) -> impl Iterator<Item = usize> + '_ {
        seg.rasterize().filter_map(|point| self.index_of(point))
    }

    pub fn index_of(&self, point: Point<usize>) -> Option<usize> {
        if point.x < self.width && point.y < self.height {
            Some(point.y * self.width + point.x)
        } else {
            None
        }
    }

    /// Every pixel of the grid, row by row.
    pub fn points(&self) -> impl Iterator<Item = Point<usize>> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point { x, y }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_are_row_major() {
        let grid = Grid::new(3, 4);
        assert_eq!(grid.index_of(Point::new(1, 2)), Some(9));
        assert_eq!(grid.index_of(Point::new(4, 0)), None);
        assert_eq!(grid.points().count(), 12);
    }

    #[test]
    fn segment_indexes_follow_rasterization() {
        let grid = Grid::square(5);
        let indexes: Vec<_> = grid
            .get_pixel_indexes_in_segment(Segment::new(Point::new(0, 2), Point::new(4, 2)))
            .collect();
        // Four samples at t = k/3 round to x = 0, 1, 3, 4; pixel 12 is never sampled.
        assert_eq!(indexes, vec![10, 11, 13, 14]);
    }
}
