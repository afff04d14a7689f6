// Improvement potential. Redraw in place instead of printing the whole board after every update.

use std::convert::Infallible;

use console::Style;
use itertools::Itertools;
use xo_client::coord::{BoardShape, Coord};
use xo_client::grid::{Cell, Grid};
use xo_client::player::{Marker, PlayerType};
use xo_client::render::BoardView;
use xo_client::status::{StatusLink, StatusView};


// Last projected state of the board, drawn as text on demand.
pub struct TerminalView {
    grid: Grid,
    turn: Option<(Marker, PlayerType)>,
    controls_enabled: bool,
    status: Option<StatusView>,
}

impl TerminalView {
    pub fn new(shape: BoardShape) -> Self {
        TerminalView {
            grid: Grid::new(shape),
            turn: None,
            controls_enabled: false,
            status: None,
        }
    }

    pub fn render(&self) -> String {
        let shape = self.grid.shape();
        let mut lines = vec![];
        lines.push(format!("   {}", (0..shape.num_cols).map(|col| format!(" {col} ")).join(" ")));
        for row in 0..shape.num_rows {
            if row > 0 {
                lines.push(format!("   {}", vec!["---"; shape.num_cols.into()].join("+")));
            }
            let cells = (0..shape.num_cols).map(|col| render_cell(self.grid[Coord::new(row, col)]));
            lines.push(format!("{row}  {}", cells.join("|")));
        }
        lines.push(String::new());
        if let Some(status) = &self.status {
            lines.extend(render_status(status));
        }
        let mut out = lines.iter().map(|line| line.trim_end()).join("\n");
        out.push('\n');
        out.push_str(&self.prompt());
        out
    }

    fn prompt(&self) -> String {
        match &self.turn {
            Some((marker, _)) if self.controls_enabled => {
                format!("Player {marker}, enter your move as \"row col\": ")
            }
            _ => String::new(),
        }
    }
}

impl BoardView for TerminalView {
    type Error = Infallible;

    fn set_cell(&mut self, coord: Coord, cell: Cell) -> Result<(), Infallible> {
        self.grid[coord] = cell;
        Ok(())
    }

    fn set_turn(
        &mut self, next_player: Marker, next_player_type: &PlayerType,
    ) -> Result<(), Infallible> {
        self.turn = Some((next_player, next_player_type.clone()));
        Ok(())
    }

    fn set_controls_enabled(&mut self, enabled: bool) -> Result<(), Infallible> {
        self.controls_enabled = enabled;
        Ok(())
    }

    fn set_status(&mut self, status: &StatusView) -> Result<(), Infallible> {
        self.status = Some(status.clone());
        Ok(())
    }
}

fn marker_style(marker: Marker) -> Style {
    match marker {
        Marker::X => Style::new().red().bold(),
        Marker::O => Style::new().blue().bold(),
    }
}

fn render_cell(cell: Cell) -> String {
    match cell {
        Cell::Empty => "   ".to_owned(),
        Cell::Pending(marker) => format!(" {} ", Style::new().dim().apply_to(marker)),
        Cell::Marked(marker) => format!(" {} ", marker_style(marker).apply_to(marker)),
    }
}

fn render_status(status: &StatusView) -> Vec<String> {
    let mut lines = vec![status.text.clone()];
    match &status.link {
        None => {}
        Some(link @ StatusLink::NewGame { url }) => lines.push(format!("{} {}", link.text(), url)),
        Some(StatusLink::Retry) => lines.push("Type \"retry\" to try again.".to_owned()),
    }
    lines
}


#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use xo_client::render::render_board;

    use super::*;

    #[test]
    fn draw_board() {
        console::set_colors_enabled(false);
        let mut view = TerminalView::new(BoardShape::new(3, 3).unwrap());
        view.set_cell(Coord::new(0, 0), Cell::Marked(Marker::X)).unwrap();
        view.set_cell(Coord::new(1, 2), Cell::Pending(Marker::O)).unwrap();
        view.set_turn(Marker::O, &PlayerType::Human).unwrap();
        view.set_status(&StatusView { text: "X played".to_owned(), link: None }).unwrap();
        view.set_controls_enabled(false).unwrap();
        assert_eq!(
            view.render(),
            indoc! {"
                    0   1   2
                0   X |   |
                   ---+---+---
                1     |   | O
                   ---+---+---
                2     |   |

                X played
            "}
        );
        view.set_controls_enabled(true).unwrap();
        assert!(view.render().ends_with("Player O, enter your move as \"row col\": "));
    }

    #[test]
    fn game_over_link() {
        console::set_colors_enabled(false);
        let status = StatusView {
            text: "Draw".to_owned(),
            link: Some(StatusLink::NewGame { url: "http://localhost/xo/".to_owned() }),
        };
        assert_eq!(render_status(&status), vec![
            "Draw".to_owned(),
            "Start a new game. http://localhost/xo/".to_owned(),
        ]);
    }

    #[test]
    fn renders_client_state() {
        use std::sync::mpsc;
        use xo_client::client::ClientState;
        use xo_client::setup::ClientOptions;
        use xo_client::test_util::sample_setup;

        console::set_colors_enabled(false);
        let (requests_tx, _requests_rx) = mpsc::channel();
        let state = ClientState::new(
            sample_setup(Marker::X, PlayerType::Human),
            ClientOptions::default(),
            requests_tx,
        );
        let mut view = TerminalView::new(state.board().grid().shape());
        render_board(&state, &mut view).unwrap();
        assert!(view.render().ends_with("Player X, enter your move as \"row col\": "));
    }
}
