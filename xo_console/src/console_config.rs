use std::time::Duration;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use url::Url;
use xo_client::coord::{BoardShape, Coord};
use xo_client::grid::Grid;
use xo_client::player::{Marker, PlayerType};
use xo_client::request_monitor::DEFAULT_REQUEST_TIMEOUT;
use xo_client::setup::{BoardSetup, ClientOptions, grid_from_cells, parse_cell_text};


#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum StringSource {
    Literal(String),
    EnvVar(String),
    File(String),
}

impl StringSource {
    pub fn get(&self) -> anyhow::Result<String> {
        match self {
            Self::Literal(s) => Ok(s.clone()),
            Self::EnvVar(v) => {
                std::env::var(v).context(format!("Missing environment variable '{v}'."))
            }
            Self::File(f) => std::fs::read_to_string(f)
                .map(|s| s.trim().to_owned())
                .context(format!("Failed to read file '{f}'.")),
        }
    }
}

// Describes a game that has already been created on the server, e.g. by opening the new game page.
// If moves have been made already, `board` must repeat them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    // Absolute URL of the board update endpoint.
    pub board_update_url: String,
    #[serde(default)]
    pub new_game_url: Option<String>,
    pub game_id: String,
    pub rows: usize,
    pub cols: usize,
    pub next_player: Marker,
    pub next_player_type: PlayerType,
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub request_timeout: Duration,
    #[serde(default)]
    pub csrf_token: Option<StringSource>,
    // Current marks, one string per row, e.g. "X.O". A dot stands for an empty cell. Empty
    // means a fresh board.
    #[serde(default)]
    pub board: Vec<String>,
}

fn default_request_timeout() -> Duration { DEFAULT_REQUEST_TIMEOUT }

impl ConsoleConfig {
    pub fn board_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.board_update_url)
            .with_context(|| format!("Invalid board update URL '{}'.", self.board_update_url))
    }

    pub fn board_setup(&self) -> anyhow::Result<BoardSetup> {
        self.board_url()?;
        let shape = BoardShape::new(self.rows, self.cols)
            .with_context(|| format!("Unsupported board size: {}x{}.", self.rows, self.cols))?;
        let grid = if self.board.is_empty() { Grid::new(shape) } else { self.parse_board()? };
        if grid.shape() != shape {
            return Err(anyhow!("Board is {}, but {} is configured.", grid.shape(), shape));
        }
        let csrf_token = self.csrf_token.as_ref().map(StringSource::get).transpose()?;
        Ok(BoardSetup {
            game_id: self.game_id.clone(),
            board_update_url: self.board_update_url.clone(),
            new_game_url: self.new_game_url.clone(),
            next_player: self.next_player,
            next_player_type: self.next_player_type.clone(),
            csrf_token,
            grid,
        })
    }

    fn parse_board(&self) -> anyhow::Result<Grid> {
        let mut cells = vec![];
        for (row_idx, line) in self.board.iter().enumerate() {
            let mut row = vec![];
            for (col_idx, ch) in line.chars().enumerate() {
                let marker = match ch {
                    '.' => None,
                    _ => {
                        let coord = Coord::new(row_idx as u8, col_idx as u8);
                        let marker = parse_cell_text(coord, &ch.to_string())
                            .map_err(|err| anyhow!("{err}."))?;
                        Some(marker)
                    }
                };
                row.push(marker);
            }
            cells.push(row);
        }
        grid_from_cells(cells).map_err(|err| anyhow!("Invalid board: {err}."))
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions { request_timeout: self.request_timeout }
    }
}


#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use xo_client::grid::Cell;

    use super::*;

    #[test]
    fn parse_config() {
        let config: ConsoleConfig = serde_yaml::from_str(indoc! {"
            board_update_url: http://localhost:8000/xo/ajax/board_update/
            new_game_url: http://localhost:8000/xo/
            game_id: '12'
            rows: 4
            cols: 4
            next_player: O
            next_player_type: xo.players.MinimaxPlayer
            request_timeout: 3s
            csrf_token: !Literal abc
        "})
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(
            config.next_player_type,
            PlayerType::Computer("xo.players.MinimaxPlayer".to_owned())
        );
        assert_eq!(config.client_options().request_timeout, Duration::from_secs(3));

        let setup = config.board_setup().unwrap();
        assert_eq!(setup.game_id, "12");
        assert_eq!(setup.next_player, Marker::O);
        assert_eq!(setup.csrf_token.as_deref(), Some("abc"));
        assert_eq!(setup.grid.shape(), BoardShape::new(4, 4).unwrap());
        assert_eq!(setup.grid.num_marked(), 0);
    }

    #[test]
    fn defaults() {
        let config: ConsoleConfig = serde_yaml::from_str(indoc! {"
            board_update_url: http://localhost:8000/xo/ajax/board_update/
            game_id: g1
            rows: 3
            cols: 3
            next_player: X
            next_player_type: human
        "})
        .unwrap();
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.new_game_url, None);
        assert_eq!(config.board_setup().unwrap().csrf_token, None);
    }

    #[test]
    fn invalid_config() {
        let mut config: ConsoleConfig = serde_yaml::from_str(indoc! {"
            board_update_url: /xo/ajax/board_update/
            game_id: g1
            rows: 3
            cols: 3
            next_player: X
            next_player_type: human
        "})
        .unwrap();
        // Relative URLs only make sense in a browser.
        assert!(config.board_setup().is_err());
        config.board_update_url = "http://localhost:8000/xo/ajax/board_update/".to_owned();
        config.rows = 0;
        assert!(config.board_setup().is_err());
    }

    #[test]
    fn game_in_progress() {
        let mut config: ConsoleConfig = serde_yaml::from_str(indoc! {"
            board_update_url: http://localhost:8000/xo/ajax/board_update/
            game_id: g1
            rows: 3
            cols: 3
            next_player: X
            next_player_type: human
            board:
              - X..
              - .O.
              - ...
        "})
        .unwrap();
        let setup = config.board_setup().unwrap();
        assert_eq!(setup.grid.num_marked(), 2);
        assert_eq!(setup.grid[Coord::new(0, 0)], Cell::Marked(Marker::X));
        assert_eq!(setup.grid[Coord::new(1, 1)], Cell::Marked(Marker::O));
        assert_eq!(setup.grid[Coord::new(2, 2)], Cell::Empty);

        config.board[1] = ".Q.".to_owned();
        assert!(config.board_setup().is_err());
        config.board[1] = ".O".to_owned();
        assert!(config.board_setup().is_err());
        config.board = vec!["X..".to_owned(), "...".to_owned()];
        assert!(config.board_setup().is_err());
    }

    #[test]
    fn string_source() {
        assert_eq!(StringSource::Literal("x".to_owned()).get().unwrap(), "x");
        assert!(StringSource::EnvVar("XO_CONSOLE_SURELY_UNSET_VARIABLE".to_owned()).get().is_err());
        assert!(StringSource::File("/nonexistent/xo/token".to_owned()).get().is_err());
    }
}
