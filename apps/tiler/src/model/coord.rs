use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical tile coordinate on the unbounded grid.
///
/// Serializes as a two element array `[x, y]` so fetch requests read the same
/// way the tile lists handed to `show` do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Shift by a whole-tile offset in the direction the frame moved, which is
    /// the opposite of the direction the revealed tiles move. Saturates at the
    /// edges of the coordinate space.
    #[inline]
    pub fn retreat(self, offset: TileOffset) -> Self {
        Self::new(self.x.saturating_sub(offset.x), self.y.saturating_sub(offset.y))
    }
}

impl From<(i64, i64)> for Coord {
    #[inline]
    fn from((x, y): (i64, i64)) -> Self {
        Coord::new(x, y)
    }
}

impl From<Coord> for (i64, i64) {
    #[inline]
    fn from(value: Coord) -> Self {
        (value.x, value.y)
    }
}

/// Row-major order: `y` first, then `x`.
impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Whole-tile displacement resolved from a pixel drag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileOffset {
    pub x: i64,
    pub y: i64,
}

impl TileOffset {
    pub const ZERO: TileOffset = TileOffset { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Offset that carries `to` onto `from`, i.e. `from - to`, saturating.
    #[inline]
    pub fn between(from: Coord, to: Coord) -> Self {
        Self::new(from.x.saturating_sub(to.x), from.y.saturating_sub(to.y))
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Inclusive rectangle `[x1, x2] x [y1, y2]` of coordinates that should be
/// materialized. A rectangle with `x2 < x1` or `y2 < y1` is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Corners {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl Corners {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub const EMPTY: Corners = Corners {
        x1: 0,
        y1: 0,
        x2: -1,
        y2: -1,
    };

    /// Corners for a top-left origin and a column/row count. The far edge
    /// is clamped to the coordinate space, so a rectangle anchored near
    /// `i64::MAX` comes out narrower instead of wrapping.
    pub fn from_origin(origin: Coord, cols: u32, rows: u32) -> Self {
        if cols == 0 || rows == 0 {
            return Self::EMPTY;
        }
        Self {
            x1: origin.x,
            y1: origin.y,
            x2: origin.x.saturating_add(cols as i64 - 1),
            y2: origin.y.saturating_add(rows as i64 - 1),
        }
    }

    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= self.x1 && coord.x <= self.x2 && coord.y >= self.y1 && coord.y <= self.y2
    }

    pub fn is_empty(&self) -> bool {
        self.x2 < self.x1 || self.y2 < self.y1
    }

    pub fn top_left(&self) -> Coord {
        Coord::new(self.x1, self.y1)
    }

    /// Every coordinate of the rectangle, `y` outer ascending, `x` inner
    /// ascending.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let (x1, x2) = (self.x1, self.x2);
        (self.y1..=self.y2).flat_map(move |y| (x1..=x2).map(move |x| Coord::new(x, y)))
    }
}

impl fmt::Display for Corners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..={}]x[{}..={}]", self.x1, self.x2, self.y1, self.y2)
    }
}
