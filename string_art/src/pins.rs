use crate::{
    geometry::{Circle, Point, Segment},
    grid::Grid,
    verboser::{Message, Verboser},
    Float,
};

/// Pins evenly spaced on the circle of a square working grid.
#[derive(Clone, Debug)]
pub struct PinTable {
    pins: Vec<Point<usize>>,
    grid: Grid,
}

impl PinTable {
    /// Places `pin_count` pins counterclockwise in image coordinates (y grows downwards),
    /// starting at the rightmost point of the circle.
    ///
    /// Each pin is rounded to the nearest pixel and clamped into the grid.
    pub fn circular(grid: Grid, pin_count: usize, verboser: &mut impl Verboser) -> Self {
        let circle = Circle::<f64>::through_pixel_centers(grid);
        let max = grid.max_point();
        let pins = (0..pin_count)
            .map(|i| {
                verboser.verbose(Message::CreatingPin(i));
                let theta = f64::TWO * f64::PI * i as f64 / pin_count as f64;
                circle.point_at(theta).to_pixel(max)
            })
            .collect();
        verboser.verbose(Message::CreatingPin(pin_count));
        Self { pins, grid }
    }

    pub fn pins(&self) -> &[Point<usize>] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn segment(&self, from: usize, to: usize) -> Option<Segment<usize>> {
        Some(Segment::new(*self.pins.get(from)?, *self.pins.get(to)?))
    }

    /// Pin coordinates on a square output image of side `output_size`.
    pub fn scaled(&self, output_size: usize) -> Vec<Point<usize>> {
        let scale = output_size as f64 / self.grid.width.max(1) as f64;
        let max = Grid::square(output_size).max_point();
        self.pins
            .iter()
            .map(|pin| (pin.as_::<f64>() * scale).to_pixel(max))
            .collect()
    }
}
