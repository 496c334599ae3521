use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// Screen-space position in pixels, relative to whatever the adapter treats as
/// the origin (the viewport for the frame, the frame for tiles).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub left: f64,
    pub top: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { left: 0.0, top: 0.0 };

    #[inline]
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.left + rhs.left, self.top + rhs.top)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.left += rhs.left;
        self.top += rhs.top;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.left - rhs.left, self.top - rhs.top)
    }
}

/// Pixel dimensions of the viewport container or the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
