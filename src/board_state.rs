use itertools::Itertools;
use log::warn;

use crate::coord::Coord;
use crate::error::EventError;
use crate::event::{GameId, MoveRecord};
use crate::grid::{Cell, Grid};
use crate::player::{Marker, PlayerType};


#[must_use]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveEffect {
    // An empty cell received a marker.
    Placed,
    // A locally painted cell was confirmed (or corrected) by the server.
    Confirmed,
    // The cell had already been confirmed before; nothing changed.
    AlreadyMarked,
}

// Client-side view of one game: the only place where board contents and turn state live.
// Front-ends render it, but never write to it directly.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BoardState {
    game_id: GameId,
    grid: Grid,
    next_player: Marker,
    next_player_type: PlayerType,
}

impl BoardState {
    pub fn new(
        game_id: GameId, grid: Grid, next_player: Marker, next_player_type: PlayerType,
    ) -> Self {
        BoardState { game_id, grid, next_player, next_player_type }
    }

    pub fn game_id(&self) -> &GameId { &self.game_id }
    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn next_player(&self) -> Marker { self.next_player }
    pub fn next_player_type(&self) -> &PlayerType { &self.next_player_type }
    pub fn is_next_player_human(&self) -> bool { self.next_player_type.is_human() }

    pub fn set_turn(&mut self, next_player: Marker, next_player_type: PlayerType) {
        self.next_player = next_player;
        self.next_player_type = next_player_type;
    }

    // Optimistic local paint. The caller is responsible for checking that the cell is free.
    pub fn paint_pending(&mut self, coord: Coord, marker: Marker) {
        assert!(self.grid[coord].is_empty(), "{}", crate::internal_error_message!());
        self.grid[coord] = Cell::Pending(marker);
    }

    // Removes all local paint that the server has not confirmed.
    pub fn revert_pending(&mut self) -> Vec<Coord> {
        let pending = self.grid.pending_coords().collect_vec();
        for &coord in &pending {
            self.grid[coord] = Cell::Empty;
        }
        pending
    }

    // Applies a move reported by the server. Either fails without changing anything, or
    // marks exactly the target cell.
    pub fn apply_move(&mut self, record: &MoveRecord) -> Result<MoveEffect, EventError> {
        self.check_move(record)?;
        let coord = record.coord();
        Ok(match self.grid[coord] {
            Cell::Empty => {
                self.grid[coord] = Cell::Marked(record.marker);
                MoveEffect::Placed
            }
            Cell::Pending(local_marker) => {
                if local_marker != record.marker {
                    warn!(
                        "Server placed {} at {}, but {} was painted locally",
                        record.marker, coord, local_marker
                    );
                }
                self.grid[coord] = Cell::Marked(record.marker);
                MoveEffect::Confirmed
            }
            Cell::Marked(existing) => {
                if existing != record.marker {
                    warn!(
                        "Server placed {} at {}, but the cell already holds {}",
                        record.marker, coord, existing
                    );
                }
                MoveEffect::AlreadyMarked
            }
        })
    }

    pub fn check_move(&self, record: &MoveRecord) -> Result<(), EventError> {
        if record.game_id != self.game_id {
            return Err(EventError::WrongGame {
                expected: self.game_id.clone(),
                actual: record.game_id.clone(),
            });
        }
        if !self.grid.contains(record.coord()) {
            return Err(EventError::out_of_bounds(record.coord()));
        }
        Ok(())
    }
}
