// The one place that decides what the board looks like. Front-ends only implement `BoardView`,
// i.e. know how to find a cell by coordinates and how to draw it.

use crate::client::ClientState;
use crate::coord::Coord;
use crate::grid::Cell;
use crate::player::{Marker, PlayerType};
use crate::status::StatusView;


pub trait BoardView {
    type Error;

    // `Cell::Empty` must show an interactive control, other cells a static marker.
    fn set_cell(&mut self, coord: Coord, cell: Cell) -> Result<(), Self::Error>;

    fn set_turn(
        &mut self, next_player: Marker, next_player_type: &PlayerType,
    ) -> Result<(), Self::Error>;

    fn set_controls_enabled(&mut self, enabled: bool) -> Result<(), Self::Error>;

    fn set_status(&mut self, status: &StatusView) -> Result<(), Self::Error>;
}

// Projects the full client state onto the view. Idempotent: views are expected to skip updates
// that do not change anything.
pub fn render_board<V: BoardView + ?Sized>(
    state: &ClientState, view: &mut V,
) -> Result<(), V::Error> {
    let board = state.board();
    for (coord, cell) in board.grid().cells() {
        view.set_cell(coord, cell)?;
    }
    view.set_turn(board.next_player(), board.next_player_type())?;
    if let Some(status) = state.status().to_view(state.new_game_url()) {
        view.set_status(&status)?;
    }
    // Last, so that controls re-created by `set_cell` get the right state as well.
    view.set_controls_enabled(state.controls_enabled())?;
    Ok(())
}
