use std::{fmt, iter::FusedIterator};

use super::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<T> {
    pub start: Point<T>,
    pub end: Point<T>,
}

impl<T: fmt::Display> fmt::Display for Segment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:2}, {:2}]", self.start, self.end)
    }
}

impl<T> Segment<T> {
    pub fn new(start: Point<T>, end: Point<T>) -> Self {
        Self { start, end }
    }
}

impl Segment<usize> {
    /// Pixels crossed by the segment, from `start` to `end`.
    ///
    /// The segment is sampled `round(length)` times at evenly spaced positions that include
    /// both ends, and each sample is rounded to the nearest pixel. A segment whose length
    /// rounds to zero yields nothing.
    pub fn rasterize(&self) -> Raster {
        let start = self.start.as_::<f64>();
        let end = self.end.as_::<f64>();
        let len = start.distance(&end).round() as usize;
        let step = if len > 1 {
            (end - start) / (len - 1) as f64
        } else {
            Point { x: 0.0, y: 0.0 }
        };
        Raster {
            start,
            step,
            next: 0,
            len,
        }
    }
}

/// Iterator over the pixels of a rasterized [`Segment`].
#[derive(Clone, Debug)]
pub struct Raster {
    start: Point<f64>,
    step: Point<f64>,
    next: usize,
    len: usize,
}

impl Iterator for Raster {
    type Item = Point<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let sample = (self.start + self.step * self.next as f64).round();
        self.next += 1;
        // Samples interpolate between two non negative points, so they never go below zero.
        Some(Point {
            x: sample.x.max(0.0) as usize,
            y: sample.y.max(0.0) as usize,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Raster {}

impl FusedIterator for Raster {}
