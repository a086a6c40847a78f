//! Compass-ordered Moore neighborhood.
//!
//! North is downwind (`+j`), east is `+i`. The order is clockwise from north,
//! which the avalanche stabilizer relies on for deterministic tie ordering.

/// One of the eight lattice neighbor directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compass {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Compass {
    /// All directions, clockwise from north.
    pub const ALL: [Compass; 8] = [
        Compass::N,
        Compass::NE,
        Compass::E,
        Compass::SE,
        Compass::S,
        Compass::SW,
        Compass::W,
        Compass::NW,
    ];

    /// Row/column offset `(di, dj)` of this direction.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Compass::N => (0, 1),
            Compass::NE => (1, 1),
            Compass::E => (1, 0),
            Compass::SE => (1, -1),
            Compass::S => (0, -1),
            Compass::SW => (-1, -1),
            Compass::W => (-1, 0),
            Compass::NW => (-1, 1),
        }
    }

    /// True for the four diagonal directions.
    pub const fn is_diagonal(self) -> bool {
        matches!(self, Compass::NE | Compass::SE | Compass::SW | Compass::NW)
    }

    /// Creep stencil weight: 1 for axis-aligned neighbors, 1/2 for diagonals.
    pub const fn stencil_weight(self) -> f32 {
        if self.is_diagonal() {
            0.5
        } else {
            1.0
        }
    }
}
