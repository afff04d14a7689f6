use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};


pub const HUMAN_PLAYER_TYPE: &str = "human";


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumString, Serialize, Deserialize)]
pub enum Marker {
    X,
    O,
}

impl Marker {
    pub fn opponent(self) -> Self {
        match self {
            Marker::X => Marker::O,
            Marker::O => Marker::X,
        }
    }
}


// Anything that is not "human" is a player whose moves are computed by the server. The server
// identifies those by strategy class (e.g. "xo.players.MinimaxPlayer"); we keep the original
// string so that it can be echoed back in `cur_player_type`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlayerType {
    Human,
    Computer(String),
}

impl PlayerType {
    pub fn from_server_str(s: &str) -> Self { PlayerType::from(s.to_owned()) }

    pub fn as_server_str(&self) -> &str {
        match self {
            PlayerType::Human => HUMAN_PLAYER_TYPE,
            PlayerType::Computer(s) => s,
        }
    }

    pub fn is_human(&self) -> bool { matches!(self, PlayerType::Human) }
}

impl From<String> for PlayerType {
    fn from(s: String) -> Self {
        if s == HUMAN_PLAYER_TYPE { PlayerType::Human } else { PlayerType::Computer(s) }
    }
}

impl From<PlayerType> for String {
    fn from(player_type: PlayerType) -> Self {
        match player_type {
            PlayerType::Human => HUMAN_PLAYER_TYPE.to_owned(),
            PlayerType::Computer(s) => s,
        }
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.as_server_str()) }
}
