use crate::{geometry::Point, Grid};

mod prepare;

pub use prepare::{decode, prepare};

/// Row major pixel storage on top of a [`Grid`].
#[derive(Clone, Debug, PartialEq)]
pub struct PixelData<T> {
    pixels: Vec<T>,
    grid: Grid,
}

impl<T> PixelData<T> {
    pub fn new(mut builder: impl FnMut(Point<usize>) -> T, grid: Grid) -> Self {
        Self {
            pixels: grid.points().map(&mut builder).collect(),
            grid,
        }
    }

    pub fn filled(value: T, grid: Grid) -> Self
    where
        T: Clone,
    {
        Self {
            pixels: vec![value; grid.len()],
            grid,
        }
    }

    /// Wraps already laid out pixels, or returns `None` when their count does not match `grid`.
    pub fn from_raw(pixels: Vec<T>, grid: Grid) -> Option<Self> {
        (pixels.len() == grid.len()).then_some(Self { pixels, grid })
    }

    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    pub fn get(&self, index: impl ImageIndexer) -> Option<&T> {
        index.get(self)
    }

    pub fn get_mut(&mut self, index: impl ImageIndexer) -> Option<&mut T> {
        index.get_mut(self)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

pub trait ImageIndexer {
    fn get_mut<T>(self, image: &mut PixelData<T>) -> Option<&mut T>;

    fn get<T>(self, image: &PixelData<T>) -> Option<&T>;
}

impl ImageIndexer for usize {
    fn get_mut<T>(self, image: &mut PixelData<T>) -> Option<&mut T> {
        image.pixels.get_mut(self)
    }

    fn get<T>(self, image: &PixelData<T>) -> Option<&T> {
        image.pixels.get(self)
    }
}

impl ImageIndexer for Point<usize> {
    fn get_mut<T>(self, image: &mut PixelData<T>) -> Option<&mut T> {
        image
            .grid
            .index_of(self)
            .and_then(|index| image.pixels.get_mut(index))
    }

    fn get<T>(self, image: &PixelData<T>) -> Option<&T> {
        image
            .grid
            .index_of(self)
            .and_then(|index| image.pixels.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sees_every_point_once() {
        let grid = Grid::new(2, 3);
        let data = PixelData::new(|p| p.y * 10 + p.x, grid);
        assert_eq!(data.pixels(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(data.get(Point::new(2, 1)), Some(&12));
        assert_eq!(data.get(4usize), Some(&11));
        assert_eq!(data.get(Point::new(3, 0)), None);
    }

    #[test]
    fn from_raw_checks_length() {
        assert!(PixelData::from_raw(vec![0u8; 4], Grid::square(2)).is_some());
        assert!(PixelData::from_raw(vec![0u8; 5], Grid::square(2)).is_none());
    }
}
