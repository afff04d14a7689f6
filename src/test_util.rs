// Test utilities shared by the client core tests and the front-end crates.

use crate::coord::BoardShape;
use crate::event::{BoardUpdateResponse, MoveRecord};
use crate::grid::Grid;
use crate::player::{Marker, PlayerType};
use crate::setup::BoardSetup;


pub const SAMPLE_GAME_ID: &str = "g1";
pub const SAMPLE_BOARD_UPDATE_URL: &str = "/xo/ajax/board_update/";
pub const SAMPLE_NEW_GAME_URL: &str = "/xo/";

pub fn computer() -> PlayerType { PlayerType::Computer("ai".to_owned()) }

// Empty 3x3 board.
pub fn sample_setup(next_player: Marker, next_player_type: PlayerType) -> BoardSetup {
    BoardSetup {
        game_id: SAMPLE_GAME_ID.to_owned(),
        board_update_url: SAMPLE_BOARD_UPDATE_URL.to_owned(),
        new_game_url: Some(SAMPLE_NEW_GAME_URL.to_owned()),
        next_player,
        next_player_type,
        csrf_token: Some("sample-token".to_owned()),
        grid: Grid::new(BoardShape { num_rows: 3, num_cols: 3 }),
    }
}

pub fn sample_move(row: u8, col: u8, marker: Marker) -> MoveRecord {
    MoveRecord {
        row_ind: row,
        col_ind: col,
        marker,
        game_id: SAMPLE_GAME_ID.to_owned(),
    }
}

pub fn continue_response(
    last_move: Option<MoveRecord>, message: &str, next_player: Marker,
    next_player_type: PlayerType,
) -> BoardUpdateResponse {
    BoardUpdateResponse {
        last_move,
        message: message.to_owned(),
        is_game_over: false,
        next_player: Some(next_player.to_string()),
        next_player_type: Some(next_player_type.into()),
    }
}

pub fn game_over_response(last_move: Option<MoveRecord>, message: &str) -> BoardUpdateResponse {
    BoardUpdateResponse {
        last_move,
        message: message.to_owned(),
        is_game_over: true,
        next_player: None,
        next_player_type: None,
    }
}
