use num_traits::AsPrimitive;

use crate::{Float, Grid};

use super::Point;

#[derive(Clone, Copy, Debug)]
pub struct Circle<T> {
    pub center: Point<T>,
    pub radius: T,
}

impl<T: Float> Circle<T>
where
    usize: AsPrimitive<T>,
{
    /// Largest circle through the centers of the border pixels of `grid`.
    ///
    /// Pins live on this circle, so every one of them rounds to a pixel inside the grid.
    pub fn through_pixel_centers(grid: Grid) -> Self {
        let side = grid.width.min(grid.height).saturating_sub(1).as_();
        Self {
            center: Point {
                x: grid.width.saturating_sub(1).as_() * T::HALF,
                y: grid.height.saturating_sub(1).as_() * T::HALF,
            },
            radius: side * T::HALF,
        }
    }

    /// Circle inscribed in the pixel area of `grid`, touching its outer edges.
    pub fn inscribed(grid: Grid) -> Self {
        Self {
            center: Point {
                x: grid.width.as_() * T::HALF,
                y: grid.height.as_() * T::HALF,
            },
            radius: grid.width.min(grid.height).as_() * T::HALF,
        }
    }
}

impl<T: Float> Circle<T> {
    pub fn point_at(&self, theta: T) -> Point<T> {
        Point {
            x: self.center.x + self.radius * theta.cos(),
            y: self.center.y + self.radius * theta.sin(),
        }
    }

    pub fn contains(&self, point: Point<T>) -> bool {
        self.center.sq_distance(&point) <= self.radius * self.radius
    }

    /// Whether the center of the pixel at `pixel` falls inside the circle.
    pub fn contains_pixel(&self, pixel: Point<usize>) -> bool
    where
        usize: AsPrimitive<T>,
    {
        self.contains(Point {
            x: pixel.x.as_() + T::HALF,
            y: pixel.y.as_() + T::HALF,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pin_circle_touches_border_pixel_centers() {
        let circle = Circle::<f64>::through_pixel_centers(Grid::square(101));
        assert_relative_eq!(circle.center.x, 50.0);
        assert_relative_eq!(circle.radius, 50.0);
        let right = circle.point_at(0.0);
        assert_relative_eq!(right.x, 100.0);
        assert_relative_eq!(right.y, 50.0);
    }

    #[test]
    fn inscribed_circle_excludes_corners() {
        let circle = Circle::<f32>::inscribed(Grid::square(10));
        assert!(circle.contains_pixel(Point::new(5, 5)));
        assert!(circle.contains_pixel(Point::new(0, 5)));
        assert!(!circle.contains_pixel(Point::new(0, 0)));
        assert!(!circle.contains_pixel(Point::new(9, 9)));
    }
}
