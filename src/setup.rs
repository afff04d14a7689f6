// Initial client state, as rendered by the server into the page.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::coord::{BoardShape, Coord};
use crate::event::GameId;
use crate::grid::{Cell, Grid};
use crate::player::{Marker, PlayerType};
use crate::request_monitor::DEFAULT_REQUEST_TIMEOUT;


// Attributes of the board container.
pub const ATTR_BOARD_UPDATE_URL: &str = "board-update-url";
pub const ATTR_GAME_ID: &str = "game-id";
pub const ATTR_NEXT_PLAYER: &str = "next-player";
pub const ATTR_NEXT_PLAYER_TYPE: &str = "next-player-type";
pub const ATTR_NEW_GAME_URL: &str = "new-game-url";
pub const ATTR_REQUEST_TIMEOUT_MS: &str = "request-timeout-ms";


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SetupError {
    MissingAttribute(&'static str),
    InvalidAttribute { name: &'static str, value: String },
    InvalidBoardShape { num_rows: usize, num_cols: usize },
    RaggedBoard { row: usize, num_cols: usize, expected: usize },
    InvalidCell { coord: Coord, text: String },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SetupError::MissingAttribute(name) => write!(f, "Board attribute \"{name}\" missing"),
            SetupError::InvalidAttribute { name, value } => {
                write!(f, "Board attribute \"{name}\" has invalid value \"{value}\"")
            }
            SetupError::InvalidBoardShape { num_rows, num_cols } => {
                write!(f, "Unsupported board size: {num_rows}x{num_cols}")
            }
            SetupError::RaggedBoard { row, num_cols, expected } => {
                write!(f, "Board row {row} has {num_cols} cells, expected {expected}")
            }
            SetupError::InvalidCell { coord, text } => {
                write!(f, "Cannot parse cell {coord}: \"{text}\"")
            }
        }
    }
}


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ClientOptions {
    pub request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self { ClientOptions { request_timeout: DEFAULT_REQUEST_TIMEOUT } }
}

impl ClientOptions {
    pub fn from_attributes(get_attr: impl Fn(&str) -> Option<String>) -> Result<Self, SetupError> {
        let mut options = ClientOptions::default();
        if let Some(value) = get_attr(ATTR_REQUEST_TIMEOUT_MS) {
            let millis: u64 = parse_attribute(ATTR_REQUEST_TIMEOUT_MS, &value)?;
            options.request_timeout = Duration::from_millis(millis);
        }
        Ok(options)
    }
}


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BoardSetup {
    pub game_id: GameId,
    pub board_update_url: String,
    pub new_game_url: Option<String>,
    pub next_player: Marker,
    pub next_player_type: PlayerType,
    pub csrf_token: Option<String>,
    pub grid: Grid,
}

impl BoardSetup {
    // `cells` is the rendered board, row by row: `None` for cells that still have a control.
    pub fn from_attributes(
        get_attr: impl Fn(&str) -> Option<String>, cells: Vec<Vec<Option<Marker>>>,
    ) -> Result<Self, SetupError> {
        let required = |name: &'static str| get_attr(name).ok_or(SetupError::MissingAttribute(name));
        let next_player = required(ATTR_NEXT_PLAYER)?;
        Ok(BoardSetup {
            game_id: required(ATTR_GAME_ID)?,
            board_update_url: required(ATTR_BOARD_UPDATE_URL)?,
            new_game_url: get_attr(ATTR_NEW_GAME_URL),
            next_player: parse_attribute(ATTR_NEXT_PLAYER, &next_player)?,
            next_player_type: PlayerType::from_server_str(&required(ATTR_NEXT_PLAYER_TYPE)?),
            csrf_token: None,
            grid: grid_from_cells(cells)?,
        })
    }

    pub fn with_csrf_token(mut self, csrf_token: Option<String>) -> Self {
        self.csrf_token = csrf_token;
        self
    }
}

pub fn grid_from_cells(cells: Vec<Vec<Option<Marker>>>) -> Result<Grid, SetupError> {
    let num_rows = cells.len();
    let num_cols = cells.first().map_or(0, |row| row.len());
    let shape = BoardShape::new(num_rows, num_cols)
        .ok_or(SetupError::InvalidBoardShape { num_rows, num_cols })?;
    let mut grid = Grid::new(shape);
    for (row_idx, row) in cells.into_iter().enumerate() {
        if row.len() != num_cols {
            return Err(SetupError::RaggedBoard {
                row: row_idx,
                num_cols: row.len(),
                expected: num_cols,
            });
        }
        for (col_idx, marker) in row.into_iter().enumerate() {
            if let Some(marker) = marker {
                grid[Coord::new(row_idx as u8, col_idx as u8)] = Cell::Marked(marker);
            }
        }
    }
    Ok(grid)
}

// Text of a played cell, e.g. "X". Whitespace is ignored.
pub fn parse_cell_text(coord: Coord, text: &str) -> Result<Marker, SetupError> {
    Marker::from_str(text.trim()).map_err(|_| SetupError::InvalidCell { coord, text: text.to_owned() })
}

fn parse_attribute<T: FromStr>(name: &'static str, value: &str) -> Result<T, SetupError> {
    value.trim().parse().map_err(|_| SetupError::InvalidAttribute { name, value: value.to_owned() })
}


#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn read_board_attributes() {
        let get_attr = attrs(&[
            (ATTR_BOARD_UPDATE_URL, "/xo/ajax/board_update/"),
            (ATTR_GAME_ID, "7"),
            (ATTR_NEXT_PLAYER, "O"),
            (ATTR_NEXT_PLAYER_TYPE, "ai"),
            (ATTR_NEW_GAME_URL, "/xo/"),
        ]);
        let cells = vec![
            vec![Some(Marker::X), None, None],
            vec![None, None, None],
            vec![None, None, None],
        ];
        let setup = BoardSetup::from_attributes(&get_attr, cells).unwrap();
        assert_eq!(setup.game_id, "7");
        assert_eq!(setup.next_player, Marker::O);
        assert_eq!(setup.next_player_type, PlayerType::Computer("ai".to_owned()));
        assert_eq!(setup.new_game_url.as_deref(), Some("/xo/"));
        assert_eq!(setup.grid[Coord::new(0, 0)], Cell::Marked(Marker::X));
        assert_eq!(setup.grid.num_marked(), 1);
        assert_eq!(ClientOptions::from_attributes(&get_attr).unwrap(), ClientOptions::default());
    }

    #[test]
    fn setup_errors() {
        let empty_board = || vec![vec![None; 3]; 3];
        let get_attr = attrs(&[(ATTR_GAME_ID, "7"), (ATTR_NEXT_PLAYER, "O")]);
        assert_eq!(
            BoardSetup::from_attributes(&get_attr, empty_board()),
            Err(SetupError::MissingAttribute(ATTR_BOARD_UPDATE_URL))
        );
        let get_attr = attrs(&[
            (ATTR_BOARD_UPDATE_URL, "/u"),
            (ATTR_GAME_ID, "7"),
            (ATTR_NEXT_PLAYER, "Z"),
            (ATTR_NEXT_PLAYER_TYPE, "human"),
        ]);
        assert!(matches!(
            BoardSetup::from_attributes(&get_attr, empty_board()),
            Err(SetupError::InvalidAttribute { name: ATTR_NEXT_PLAYER, .. })
        ));
        assert_eq!(
            grid_from_cells(vec![vec![None; 3], vec![None; 2]]),
            Err(SetupError::RaggedBoard { row: 1, num_cols: 2, expected: 3 })
        );
        assert_eq!(
            grid_from_cells(vec![]),
            Err(SetupError::InvalidBoardShape { num_rows: 0, num_cols: 0 })
        );
    }

    #[test]
    fn request_timeout_attribute() {
        let options =
            ClientOptions::from_attributes(attrs(&[(ATTR_REQUEST_TIMEOUT_MS, "2500")])).unwrap();
        assert_eq!(options.request_timeout, Duration::from_millis(2500));
        assert!(ClientOptions::from_attributes(attrs(&[(ATTR_REQUEST_TIMEOUT_MS, "soon")])).is_err());
    }

    #[test]
    fn cell_text() {
        assert_eq!(parse_cell_text(Coord::new(0, 0), " X\n"), Ok(Marker::X));
        assert!(parse_cell_text(Coord::new(0, 0), "").is_err());
    }
}
