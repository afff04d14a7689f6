use std::fmt;

use serde::{Deserialize, Serialize};


// The server renders 3x3, 4x4 and 5x5 boards. Allow some headroom, but keep coordinates in `u8`.
pub const MAX_BOARD_SIZE: u8 = 10;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BoardShape {
    pub num_rows: u8,
    pub num_cols: u8,
}

impl BoardShape {
    pub fn new(num_rows: usize, num_cols: usize) -> Option<Self> {
        let valid = |n: usize| (1..=MAX_BOARD_SIZE as usize).contains(&n);
        if valid(num_rows) && valid(num_cols) {
            Some(BoardShape {
                num_rows: num_rows as u8,
                num_cols: num_cols as u8,
            })
        } else {
            None
        }
    }

    pub fn num_cells(self) -> usize { self.num_rows as usize * self.num_cols as usize }

    pub fn contains(self, coord: Coord) -> bool {
        coord.row < self.num_rows && coord.col < self.num_cols
    }

    // Row-major order, same as the server-rendered table.
    pub fn coords(self) -> impl Iterator<Item = Coord> + Clone {
        (0..self.num_rows).flat_map(move |row| (0..self.num_cols).map(move |col| Coord { row, col }))
    }
}

impl fmt::Display for BoardShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.num_rows, self.num_cols)
    }
}


// Zero-based position of a cell. Matches `row_index`/`col_index` form fields and
// `row_ind`/`col_ind` in server responses.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self { Coord { row, col } }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}


#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn shape_bounds() {
        assert!(BoardShape::new(3, 3).is_some());
        assert!(BoardShape::new(5, 4).is_some());
        assert!(BoardShape::new(0, 3).is_none());
        assert!(BoardShape::new(3, MAX_BOARD_SIZE as usize + 1).is_none());
    }

    #[test]
    fn coords_are_row_major() {
        let shape = BoardShape::new(2, 3).unwrap();
        assert_eq!(shape.num_cells(), 6);
        assert_eq!(
            shape.coords().collect_vec(),
            vec![
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(0, 2),
                Coord::new(1, 0),
                Coord::new(1, 1),
                Coord::new(1, 2),
            ]
        );
        assert!(shape.contains(Coord::new(1, 2)));
        assert!(!shape.contains(Coord::new(2, 0)));
        assert!(!shape.contains(Coord::new(0, 3)));
    }
}
