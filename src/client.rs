use std::fmt;
use std::sync::mpsc;
use std::time::Duration;

use instant::Instant;
use log::{debug, error, info, warn};

use crate::board_state::{BoardState, MoveEffect};
use crate::coord::Coord;
use crate::error::{EventError, RequestFailure};
use crate::event::BoardUpdateResponse;
use crate::request::{BoardRequest, RequestId, RequestKind};
use crate::request_monitor::{RequestMonitor, ResponseDisposition};
use crate::setup::{BoardSetup, ClientOptions};
use crate::status::StatusMessage;


// Client-observed game lifecycle:
//
//   AwaitingHumanInput -> Submitting -> AwaitingHumanInput
//                                    -> AutoPolling -> AutoPolling (while computers move)
//                                                   -> AwaitingHumanInput
//                                                   -> Failed -> AutoPolling (retry)
//                                    -> GameOver
//
// `GameOver` is terminal. A failed submission goes back to `AwaitingHumanInput`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClientPhase {
    AwaitingHumanInput,
    Submitting,
    AutoPolling,
    Failed,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ClickError {
    GameOver,
    RequestInFlight,
    NotYourTurn,
    OutOfBounds(Coord),
    CellOccupied(Coord),
}

impl fmt::Display for ClickError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClickError::GameOver => write!(f, "the game is over"),
            ClickError::RequestInFlight => write!(f, "waiting for the server"),
            ClickError::NotYourTurn => write!(f, "it is not a human player's turn"),
            ClickError::OutOfBounds(coord) => write!(f, "cell {coord} is outside the board"),
            ClickError::CellOccupied(coord) => write!(f, "cell {coord} is already taken"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RetryError {
    NothingToRetry,
    RequestInFlight,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    None,
    HumanToMove,
    ComputerToMove,
    GameOver,
}


pub struct ClientState {
    board_update_url: String,
    new_game_url: Option<String>,
    csrf_token: Option<String>,
    board: BoardState,
    phase: ClientPhase,
    status: StatusMessage,
    requests: RequestMonitor,
    requests_tx: mpsc::Sender<BoardRequest>,
    bootstrapped: bool,
}

impl ClientState {
    pub fn new(
        setup: BoardSetup, options: ClientOptions, requests_tx: mpsc::Sender<BoardRequest>,
    ) -> Self {
        let BoardSetup {
            game_id,
            board_update_url,
            new_game_url,
            next_player,
            next_player_type,
            csrf_token,
            grid,
        } = setup;
        ClientState {
            board_update_url,
            new_game_url,
            csrf_token,
            board: BoardState::new(game_id, grid, next_player, next_player_type),
            phase: ClientPhase::AwaitingHumanInput,
            status: StatusMessage::Unchanged,
            requests: RequestMonitor::new(options.request_timeout),
            requests_tx,
            bootstrapped: false,
        }
    }

    pub fn board(&self) -> &BoardState { &self.board }
    pub fn phase(&self) -> ClientPhase { self.phase }
    pub fn status(&self) -> &StatusMessage { &self.status }
    pub fn new_game_url(&self) -> Option<&str> { self.new_game_url.as_deref() }
    pub fn request_deadline(&self) -> Option<Instant> {
        self.requests.in_flight().map(|request| request.deadline)
    }
    // Timers may fire early. Whoever drives `check_timeout` should wait this long and call it
    // again for as long as this returns `Some`.
    pub fn time_until_deadline(&self, now: Instant) -> Option<Duration> {
        self.request_deadline().map(|deadline| deadline.saturating_duration_since(now))
    }

    // Board controls accept clicks only when a human is to move and nothing is in flight.
    pub fn controls_enabled(&self) -> bool {
        self.phase == ClientPhase::AwaitingHumanInput && self.board.is_next_player_human()
    }

    // Called once after the page is loaded. If a computer player is to move, asks the server for
    // its move right away, so that a reloaded page resumes the game without a click.
    pub fn bootstrap(&mut self, now: Instant) -> Option<RequestId> {
        if self.bootstrapped {
            return None;
        }
        self.bootstrapped = true;
        if self.phase != ClientPhase::AwaitingHumanInput || self.board.is_next_player_human() {
            return None;
        }
        info!(
            "Player {} ({}) is to move on page load",
            self.board.next_player(),
            self.board.next_player_type()
        );
        self.start_polling(now)
    }

    pub fn click_cell(&mut self, coord: Coord, now: Instant) -> Result<RequestId, ClickError> {
        match self.phase {
            ClientPhase::AwaitingHumanInput => {}
            ClientPhase::Submitting | ClientPhase::AutoPolling => {
                return Err(ClickError::RequestInFlight);
            }
            ClientPhase::Failed => return Err(ClickError::NotYourTurn),
            ClientPhase::GameOver => return Err(ClickError::GameOver),
        }
        if !self.board.is_next_player_human() {
            return Err(ClickError::NotYourTurn);
        }
        match self.board.grid().get(coord) {
            None => return Err(ClickError::OutOfBounds(coord)),
            Some(cell) if !cell.is_empty() => return Err(ClickError::CellOccupied(coord)),
            Some(_) => {}
        }
        let marker = self.board.next_player();
        let kind = RequestKind::MoveSubmission {
            coord,
            marker,
            player_type: self.board.next_player_type().clone(),
        };
        let id = self.send_request(kind, now).ok_or(ClickError::RequestInFlight)?;
        self.board.paint_pending(coord, marker);
        self.phase = ClientPhase::Submitting;
        Ok(id)
    }

    pub fn process_response(
        &mut self, id: RequestId, response: BoardUpdateResponse, now: Instant,
    ) -> Result<NotableEvent, EventError> {
        let kind = match self.requests.finish(id) {
            ResponseDisposition::Current(kind) => kind,
            ResponseDisposition::Late(kind) => {
                info!("Applying late response to request {:?}", id);
                kind
            }
            ResponseDisposition::Stale => {
                warn!("Ignoring stale response to request {:?}", id);
                return Ok(NotableEvent::None);
            }
        };
        if self.phase == ClientPhase::GameOver {
            // Should not happen: no requests are sent after the game is over.
            error!("{}", crate::internal_error_message!("response to {:?} after game over", id));
            return Ok(NotableEvent::None);
        }
        match self.apply_response(&response, now) {
            Ok(event) => Ok(event),
            Err(err) => {
                warn!("Cannot apply response to request {:?}: {}", id, err);
                self.handle_failure(kind, err.clone().into());
                Err(err)
            }
        }
    }

    pub fn process_request_failure(&mut self, id: RequestId, failure: RequestFailure) -> bool {
        match self.requests.fail(id) {
            Some(request) => {
                warn!("Request {:?} failed: {}", id, failure);
                self.handle_failure(request.kind, failure);
                true
            }
            None => {
                debug!("Ignoring failure of request {:?} that is not in flight: {}", id, failure);
                false
            }
        }
    }

    // Gives up on the request in flight if it is past its deadline.
    pub fn check_timeout(&mut self, now: Instant) -> Option<RequestId> {
        let request = self.requests.take_expired(now)?;
        warn!("Request {:?} timed out", request.id);
        self.handle_failure(request.kind, RequestFailure::Timeout);
        Some(request.id)
    }

    // Asks again for the move of a computer player after a failed poll. A failed move submission
    // is retried by clicking again.
    pub fn retry(&mut self, now: Instant) -> Result<RequestId, RetryError> {
        if self.phase != ClientPhase::Failed {
            return Err(RetryError::NothingToRetry);
        }
        info!("Retrying status poll");
        self.start_polling(now).ok_or(RetryError::RequestInFlight)
    }

    fn apply_response(
        &mut self, response: &BoardUpdateResponse, now: Instant,
    ) -> Result<NotableEvent, EventError> {
        let next_turn = response.next_turn()?;
        if let Some(record) = &response.last_move {
            self.board.check_move(record)?;
        }
        // Nothing below may fail: the response is applied either fully or not at all.
        if let Some(record) = &response.last_move {
            match self.board.apply_move(record)? {
                MoveEffect::Placed | MoveEffect::Confirmed => {
                    debug!("{} marked {}", record.marker, record.coord());
                }
                MoveEffect::AlreadyMarked => {
                    warn!("Move at {} was already on the board", record.coord());
                }
            }
        }
        let unconfirmed = self.board.revert_pending();
        if !unconfirmed.is_empty() {
            warn!("Server did not confirm local move(s) at {:?}", unconfirmed);
        }
        match next_turn {
            None => {
                info!("Game {} is over: {}", self.board.game_id(), response.message);
                self.phase = ClientPhase::GameOver;
                self.status = StatusMessage::GameOver(response.message.clone());
                self.requests.close();
                Ok(NotableEvent::GameOver)
            }
            Some((next_player, next_player_type)) => {
                self.board.set_turn(next_player, next_player_type);
                self.status = StatusMessage::Server(response.message.clone());
                if self.board.is_next_player_human() {
                    self.phase = ClientPhase::AwaitingHumanInput;
                    Ok(NotableEvent::HumanToMove)
                } else {
                    self.start_polling(now);
                    Ok(NotableEvent::ComputerToMove)
                }
            }
        }
    }

    fn handle_failure(&mut self, kind: RequestKind, failure: RequestFailure) {
        match kind {
            RequestKind::MoveSubmission { coord, .. } => {
                self.board.revert_pending();
                info!("Move at {} was not accepted, waiting for a new click", coord);
                self.phase = ClientPhase::AwaitingHumanInput;
                self.status = StatusMessage::SubmitFailed(failure);
            }
            RequestKind::StatusPoll => {
                self.phase = ClientPhase::Failed;
                self.status = StatusMessage::PollFailed(failure);
            }
        }
    }

    fn start_polling(&mut self, now: Instant) -> Option<RequestId> {
        let Some(id) = self.send_request(RequestKind::StatusPoll, now) else {
            error!("{}", crate::internal_error_message!("cannot poll: request in flight"));
            return None;
        };
        self.phase = ClientPhase::AutoPolling;
        self.status = StatusMessage::Thinking(self.board.next_player());
        Some(id)
    }

    fn send_request(&mut self, kind: RequestKind, now: Instant) -> Option<RequestId> {
        let id = self.requests.start(kind.clone(), now)?;
        info!("Sending request {:?}: {:?}", id, kind);
        let request = BoardRequest::new(
            id,
            kind,
            &self.board_update_url,
            self.board.game_id(),
            self.csrf_token.as_deref(),
        );
        if self.requests_tx.send(request).is_err() {
            // The request will time out.
            error!("Request channel disconnected, request {:?} is lost", id);
        }
        Some(id)
    }
}
