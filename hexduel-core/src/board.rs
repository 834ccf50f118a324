//! Hex board geometry with axial coordinates

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest supported board radius
pub const MAX_RADIUS: i8 = 32;

/// Axial hex coordinates
///
/// The third cube coordinate `s = -q - r` is derived on demand, so
/// `q + r + s == 0` holds by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i8,
    pub r: i8,
}

impl Hex {
    pub const fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    /// Derived third coordinate, widened so every `i8` pair has one
    pub const fn s(&self) -> i16 {
        -(self.q as i16) - self.r as i16
    }

    /// Check if this hex lies strictly inside the hexagon of the given radius
    ///
    /// A cell is on the board iff `|q|`, `|r|` and `|s|` are all below `radius`,
    /// i.e. it is at most `radius - 1` steps from the center.
    pub fn in_bounds(&self, radius: i8) -> bool {
        let radius = radius as i16;
        (self.q as i16).abs() < radius && (self.r as i16).abs() < radius && self.s().abs() < radius
    }

    /// Distance from center (0,0)
    pub fn distance_to_center(&self) -> i16 {
        ((self.q as i16).abs() + (self.r as i16).abs() + self.s().abs()) / 2
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i16 {
        let dq = (self.q as i16 - other.q as i16).abs();
        let dr = (self.r as i16 - other.r as i16).abs();
        let ds = (self.s() - other.s()).abs();
        (dq + dr + ds) / 2
    }

    /// Offset this hex by a direction vector
    ///
    /// Wraps at the `i8` edges; a wrapped result is never inside a board of
    /// radius `MAX_RADIUS` or less.
    pub fn offset(&self, (dq, dr): (i8, i8)) -> Hex {
        Hex::new(self.q.wrapping_add(dq), self.r.wrapping_add(dr))
    }

    /// The six neighbors, in `DIRECTIONS` order
    pub fn neighbors(&self) -> [Hex; 6] {
        DIRECTIONS.map(|d| self.offset(d))
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=E, 1=NE, 2=NW, 3=W, 4=SW, 5=SE
pub const DIRECTIONS: [(i8, i8); 6] = [
    (1, 0),   // E
    (1, -1),  // NE
    (0, -1),  // NW
    (-1, 0),  // W
    (-1, 1),  // SW
    (0, 1),   // SE
];

/// All cells of a board of the given radius, ordered by `r` then `q`
pub fn cells_within(radius: i8) -> impl Iterator<Item = Hex> {
    let span = (radius - 1).max(0);
    (-span..=span).flat_map(move |r| {
        (-span..=span)
            .map(move |q| Hex::new(q, r))
            .filter(move |hex| hex.in_bounds(radius))
    })
}

/// Number of cells on a board of the given radius
pub const fn cell_count(radius: i8) -> usize {
    if radius <= 0 {
        return 0;
    }
    let n = radius as usize;
    3 * n * (n - 1) + 1
}
