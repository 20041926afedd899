use std::ops::{Add, Div, Mul, Sub};

use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::Float;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T> Add for Point<T>
where
    T: Add<Output = T>,
{
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Point {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl<T> Sub for Point<T>
where
    T: Sub<Output = T>,
{
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Point {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl<T> Mul<T> for Point<T>
where
    T: Mul<Output = T> + Clone,
{
    type Output = Self;

    fn mul(self, scalar: T) -> Self {
        Point {
            x: self.x * scalar.clone(),
            y: self.y * scalar,
        }
    }
}

impl<T> Div<T> for Point<T>
where
    T: Div<Output = T> + Clone,
{
    type Output = Self;

    fn div(self, scalar: T) -> Self {
        Point {
            x: self.x / scalar.clone(),
            y: self.y / scalar,
        }
    }
}

impl<T: Float> Point<T> {
    pub fn sq_distance(&self, other: &Self) -> T {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> T {
        num_traits::Float::sqrt(self.sq_distance(other))
    }

    /// Rounds both coordinates to the nearest integer, half away from zero.
    pub fn round(&self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
        }
    }

    /// Rounds to the nearest pixel and clamps it inside `[0, max]` on both axes.
    pub fn to_pixel(&self, max: Point<usize>) -> Point<usize> {
        let clamp = |value: T, max: usize| -> usize {
            num_traits::ToPrimitive::to_usize(&value.round().max(T::ZERO))
                .unwrap_or(max)
                .min(max)
        };
        Point {
            x: clamp(self.x, max.x),
            y: clamp(self.y, max.y),
        }
    }
}

impl<S> Point<S> {
    pub fn as_<I: Copy + 'static>(self) -> Point<I>
    where
        S: AsPrimitive<I>,
    {
        Point {
            x: self.x.as_(),
            y: self.y.as_(),
        }
    }
}

impl<T> From<Point<T>> for [T; 2] {
    fn from(point: Point<T>) -> Self {
        [point.x, point.y]
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Point<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:2}, {:2})", self.x, self.y)
    }
}
