use crate::error::RequestFailure;
use crate::player::Marker;


pub const NEW_GAME_LINK_TEXT: &str = "Start a new game.";
pub const RETRY_LINK_TEXT: &str = "Retry.";


// What the status region should say. Text either comes verbatim from the server or is derived
// from server-provided turn state; the client never guesses.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum StatusMessage {
    // Initial state: keep whatever the server rendered.
    Unchanged,
    Server(String),
    Thinking(Marker),
    GameOver(String),
    SubmitFailed(RequestFailure),
    PollFailed(RequestFailure),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum StatusLink {
    NewGame { url: String },
    Retry,
}

impl StatusLink {
    pub fn text(&self) -> &'static str {
        match self {
            StatusLink::NewGame { .. } => NEW_GAME_LINK_TEXT,
            StatusLink::Retry => RETRY_LINK_TEXT,
        }
    }
}

// Fully resolved content of the status region.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StatusView {
    pub text: String,
    pub link: Option<StatusLink>,
}

impl StatusMessage {
    // Returns `None` if the status region should be left as is.
    pub fn to_view(&self, new_game_url: Option<&str>) -> Option<StatusView> {
        let (text, link) = match self {
            StatusMessage::Unchanged => return None,
            StatusMessage::Server(message) => (message.clone(), None),
            StatusMessage::Thinking(marker) => (thinking_text(*marker), None),
            StatusMessage::GameOver(message) => (
                message.clone(),
                new_game_url.map(|url| StatusLink::NewGame { url: url.to_owned() }),
            ),
            StatusMessage::SubmitFailed(failure) => {
                (format!("Could not submit move: {failure}. Please try again."), None)
            }
            StatusMessage::PollFailed(failure) => {
                (format!("Could not get the next move: {failure}."), Some(StatusLink::Retry))
            }
        };
        Some(StatusView { text, link })
    }
}

pub fn thinking_text(marker: Marker) -> String { format!("Player {marker} is thinking...") }
