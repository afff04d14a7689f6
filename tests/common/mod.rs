// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::mpsc;
use std::time::Duration;

use instant::Instant;
use xo_client::client::{ClickError, ClientState, NotableEvent};
use xo_client::coord::Coord;
use xo_client::error::EventError;
use xo_client::event::BoardUpdateResponse;
use xo_client::grid::Cell;
use xo_client::player::{Marker, PlayerType};
use xo_client::render::{BoardView, render_board};
use xo_client::request::{BoardRequest, RequestId};
use xo_client::setup::{BoardSetup, ClientOptions};
use xo_client::status::StatusView;


// Remembers the last value written to every part of the board.
#[derive(Default, Debug)]
pub struct RecordingView {
    pub cells: HashMap<Coord, Cell>,
    pub next_player: Option<Marker>,
    pub next_player_type: Option<PlayerType>,
    pub controls_enabled: Option<bool>,
    pub status: Option<StatusView>,
}

impl RecordingView {
    #[allow(dead_code)]
    pub fn cell(&self, row: u8, col: u8) -> Cell {
        self.cells.get(&Coord::new(row, col)).copied().unwrap_or(Cell::Empty)
    }

    // Cells that no longer show an interactive control.
    #[allow(dead_code)]
    pub fn num_static_cells(&self) -> usize {
        self.cells.values().filter(|cell| !cell.is_empty()).count()
    }

    #[allow(dead_code)]
    pub fn status_text(&self) -> Option<&str> { self.status.as_ref().map(|s| s.text.as_str()) }
}

impl BoardView for RecordingView {
    type Error = Infallible;

    fn set_cell(&mut self, coord: Coord, cell: Cell) -> Result<(), Infallible> {
        self.cells.insert(coord, cell);
        Ok(())
    }

    fn set_turn(
        &mut self, next_player: Marker, next_player_type: &PlayerType,
    ) -> Result<(), Infallible> {
        self.next_player = Some(next_player);
        self.next_player_type = Some(next_player_type.clone());
        Ok(())
    }

    fn set_controls_enabled(&mut self, enabled: bool) -> Result<(), Infallible> {
        self.controls_enabled = Some(enabled);
        Ok(())
    }

    fn set_status(&mut self, status: &StatusView) -> Result<(), Infallible> {
        self.status = Some(status.clone());
        Ok(())
    }
}


// Client state wired to an in-memory transport and a recording view, with a manual clock.
pub struct TestClient {
    pub state: ClientState,
    pub view: RecordingView,
    pub now: Instant,
    requests_rx: mpsc::Receiver<BoardRequest>,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(setup: BoardSetup) -> Self { Self::with_options(setup, ClientOptions::default()) }

    pub fn with_options(setup: BoardSetup, options: ClientOptions) -> Self {
        let (requests_tx, requests_rx) = mpsc::channel();
        let mut client = TestClient {
            state: ClientState::new(setup, options, requests_tx),
            view: RecordingView::default(),
            now: Instant::now(),
            requests_rx,
        };
        client.render();
        client
    }

    pub fn render(&mut self) {
        render_board(&self.state, &mut self.view).unwrap();
    }

    pub fn advance(&mut self, d: Duration) { self.now += d; }

    pub fn requests(&mut self) -> Vec<BoardRequest> { self.requests_rx.try_iter().collect() }

    pub fn bootstrap(&mut self) -> Option<RequestId> {
        let id = self.state.bootstrap(self.now);
        self.render();
        id
    }

    pub fn click(&mut self, row: u8, col: u8) -> Result<RequestId, ClickError> {
        let result = self.state.click_cell(Coord::new(row, col), self.now);
        self.render();
        result
    }

    pub fn respond(
        &mut self, id: RequestId, response: BoardUpdateResponse,
    ) -> Result<NotableEvent, EventError> {
        let result = self.state.process_response(id, response, self.now);
        self.render();
        result
    }

    // Expects exactly one outgoing request and returns it.
    pub fn single_request(&mut self) -> BoardRequest {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request, got {:?}", requests);
        requests.pop().unwrap()
    }
}
