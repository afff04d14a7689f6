use std::fmt;

use crate::coord::Coord;


#[macro_export]
macro_rules! internal_error_message {
    () => {
        format!("Internal error at {}:{}.", file!(), line!())
    };
    ($($arg:tt)+) => {
        format!("Internal error at {}:{}: {}.", file!(), line!(), format!($($arg)*))
    };
}


// Why a request did not produce a usable response. Each variant leaves the client in a state
// from which the user can continue: see `ClientState::process_request_failure`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RequestFailure {
    // The request never reached the server or the connection broke.
    Network(String),
    // The server answered with a non-2xx status.
    HttpStatus(u16),
    // The server answered, but the body is not a valid board update.
    MalformedResponse(String),
    // No answer before the deadline.
    Timeout,
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RequestFailure::Network(message) => write!(f, "network error ({message})"),
            RequestFailure::HttpStatus(status) => {
                write!(f, "server responded with status {status}")
            }
            RequestFailure::MalformedResponse(message) => {
                write!(f, "malformed server response ({message})")
            }
            RequestFailure::Timeout => write!(f, "request timed out"),
        }
    }
}


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EventError {
    // The response describes a move in a different game.
    WrongGame { expected: String, actual: String },
    // The response is well-formed JSON, but cannot be applied to the board.
    CannotApplyEvent(String),
    // The response cannot be parsed.
    MalformedResponse(String),
}

impl EventError {
    pub fn out_of_bounds(coord: Coord) -> Self {
        EventError::CannotApplyEvent(format!("move at {coord} is outside the board"))
    }
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventError::WrongGame { expected, actual } => {
                write!(f, "response for game {actual} while playing game {expected}")
            }
            EventError::CannotApplyEvent(message) => write!(f, "cannot apply update: {message}"),
            EventError::MalformedResponse(message) => write!(f, "{message}"),
        }
    }
}

impl From<EventError> for RequestFailure {
    fn from(err: EventError) -> Self { RequestFailure::MalformedResponse(err.to_string()) }
}
