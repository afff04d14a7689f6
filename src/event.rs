use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::coord::Coord;
use crate::error::EventError;
use crate::player::{Marker, PlayerType};


pub type GameId = String;


// A move that has been applied on the server. Sent both in response to a move submission
// (echoing the human move) and in response to a status poll (the computer move).
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRecord {
    #[serde(deserialize_with = "deserialize_index")]
    pub row_ind: u8,
    #[serde(deserialize_with = "deserialize_index")]
    pub col_ind: u8,
    pub marker: Marker,
    #[serde(deserialize_with = "deserialize_game_id")]
    pub game_id: GameId,
}

impl MoveRecord {
    pub fn coord(&self) -> Coord { Coord::new(self.row_ind, self.col_ind) }
}

// The JSON envelope returned by the board update endpoint.
//
// `next_player` and `next_player_type` are only meaningful while the game continues. Once
// `is_game_over` is set the server may omit them or send anything at all, so they are kept as raw
// strings and only parsed by `next_turn`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BoardUpdateResponse {
    #[serde(rename = "move", default)]
    pub last_move: Option<MoveRecord>,
    #[serde(default)]
    pub message: String,
    pub is_game_over: bool,
    #[serde(default)]
    pub next_player: Option<String>,
    #[serde(default)]
    pub next_player_type: Option<String>,
}

impl BoardUpdateResponse {
    pub fn from_json(json: &str) -> Result<Self, EventError> {
        serde_json::from_str(json).map_err(|err| EventError::MalformedResponse(err.to_string()))
    }

    // Turn state for a continuing game. Checked before anything is applied, so that a broken
    // response does not leave the board half-updated.
    pub fn next_turn(&self) -> Result<Option<(Marker, PlayerType)>, EventError> {
        if self.is_game_over {
            return Ok(None);
        }
        let (Some(marker), Some(player_type)) = (&self.next_player, &self.next_player_type) else {
            return Err(EventError::MalformedResponse(
                "game continues, but next player is not specified".to_owned(),
            ));
        };
        let marker = Marker::from_str(marker).map_err(|_| {
            EventError::MalformedResponse(format!("invalid next player: \"{marker}\""))
        })?;
        if player_type.is_empty() {
            return Err(EventError::MalformedResponse("empty next player type".to_owned()));
        }
        Ok(Some((marker, PlayerType::from(player_type.clone()))))
    }
}


// The server echoes form fields, so numbers sometimes come back as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

fn deserialize_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    use serde::de::Error;
    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n,
        NumberOrString::String(s) => s.trim().parse().map_err(D::Error::custom)?,
    };
    u8::try_from(value).map_err(|_| D::Error::custom(format!("index {value} is too large")))
}

fn deserialize_game_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<GameId, D::Error> {
    Ok(match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n.to_string(),
        NumberOrString::String(s) => s,
    })
}
