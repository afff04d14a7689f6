use std::{fmt, ops};

use ndarray::{Array, Array2};

use crate::coord::{BoardShape, Coord};
use crate::player::Marker;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Cell {
    // Unplayed: rendered as an interactive control.
    Empty,
    // Painted locally after a click, not yet confirmed by the server.
    Pending(Marker),
    // Confirmed by the server. Never changes again.
    Marked(Marker),
}

impl Cell {
    pub fn is_empty(self) -> bool { self == Cell::Empty }
    pub fn is_marked(self) -> bool { matches!(self, Cell::Marked(_)) }
}


#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    data: Array2<Cell>,
}

impl Grid {
    pub fn new(board_shape: BoardShape) -> Self {
        Grid {
            data: Array::from_elem(
                (board_shape.num_rows as usize, board_shape.num_cols as usize),
                Cell::Empty,
            ),
        }
    }

    pub fn shape(&self) -> BoardShape {
        BoardShape {
            num_rows: self.data.shape()[0] as u8,
            num_cols: self.data.shape()[1] as u8,
        }
    }

    pub fn contains(&self, coord: Coord) -> bool { self.shape().contains(coord) }

    pub fn get(&self, coord: Coord) -> Option<Cell> { self.data.get(coord_to_index(coord)).copied() }

    pub fn cells(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.shape().coords().map(|coord| (coord, self[coord]))
    }

    pub fn pending_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells()
            .filter(|(_, cell)| matches!(cell, Cell::Pending(_)))
            .map(|(coord, _)| coord)
    }

    pub fn num_marked(&self) -> usize { self.data.iter().filter(|cell| cell.is_marked()).count() }
}

impl ops::Index<Coord> for Grid {
    type Output = Cell;
    #[track_caller]
    fn index(&self, coord: Coord) -> &Self::Output {
        let shape = self.shape();
        self.data
            .get(coord_to_index(coord))
            .unwrap_or_else(|| panic!("{}", out_of_bound_message(coord, shape)))
    }
}

impl ops::IndexMut<Coord> for Grid {
    #[track_caller]
    fn index_mut(&mut self, coord: Coord) -> &mut Self::Output {
        let shape = self.shape();
        self.data
            .get_mut(coord_to_index(coord))
            .unwrap_or_else(|| panic!("{}", out_of_bound_message(coord, shape)))
    }
}

fn coord_to_index(coord: Coord) -> [usize; 2] { [coord.row as usize, coord.col as usize] }

fn out_of_bound_message(coord: Coord, board_shape: BoardShape) -> String {
    format!("Coord {} is out of bound for {} board", coord, board_shape)
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid ")?;
        f.debug_map()
            .entries(self.cells().filter(|(_, cell)| !cell.is_empty()))
            .finish()
    }
}
