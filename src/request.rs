use url::form_urlencoded;

use crate::coord::Coord;
use crate::event::GameId;
use crate::player::{Marker, PlayerType};


// Names of the form fields the server-rendered board attaches to every cell.
pub const FIELD_GAME_ID: &str = "game_id";
pub const FIELD_ROW_INDEX: &str = "row_index";
pub const FIELD_COL_INDEX: &str = "col_index";
pub const FIELD_NEXT_PLAYER: &str = "next_player";
pub const FIELD_CUR_PLAYER_TYPE: &str = "cur_player_type";
pub const FIELD_CSRF_TOKEN: &str = "csrfmiddlewaretoken";


// Per-client sequence number. Responses are matched to requests by it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RequestId(pub u64);

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RequestKind {
    // A human move. `marker` is the marker being placed, `player_type` is the type of the mover.
    MoveSubmission {
        coord: Coord,
        marker: Marker,
        player_type: PlayerType,
    },
    // Asks the server for the move of a computer player.
    StatusPoll,
}

impl RequestKind {
    pub fn is_poll(&self) -> bool { matches!(self, RequestKind::StatusPoll) }
}

// Everything a transport needs to perform a board update request. Both kinds are plain GETs
// with URL query parameters; the response is always a `BoardUpdateResponse`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BoardRequest {
    pub id: RequestId,
    pub kind: RequestKind,
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl BoardRequest {
    pub fn new(
        id: RequestId, kind: RequestKind, url: &str, game_id: &GameId, csrf_token: Option<&str>,
    ) -> Self {
        let mut query = vec![(FIELD_GAME_ID.to_owned(), game_id.clone())];
        if let RequestKind::MoveSubmission { coord, marker, ref player_type } = kind {
            query.extend([
                (FIELD_ROW_INDEX.to_owned(), coord.row.to_string()),
                (FIELD_COL_INDEX.to_owned(), coord.col.to_string()),
                (FIELD_NEXT_PLAYER.to_owned(), marker.to_string()),
                (FIELD_CUR_PLAYER_TYPE.to_owned(), player_type.as_server_str().to_owned()),
            ]);
        }
        if let Some(token) = csrf_token {
            query.push((FIELD_CSRF_TOKEN.to_owned(), token.to_owned()));
        }
        BoardRequest { id, kind, url: url.to_owned(), query }
    }

    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }

    // The board update URL is usually relative to the page, so this does not try to parse it.
    pub fn url_with_query(&self) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.url, separator, self.query_string())
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn move_submission_fields() {
        let request = BoardRequest::new(
            RequestId(3),
            RequestKind::MoveSubmission {
                coord: Coord::new(1, 2),
                marker: Marker::O,
                player_type: PlayerType::Human,
            },
            "/xo/ajax/board_update/",
            &"42".to_owned(),
            Some("t0k en"),
        );
        assert_eq!(
            request.url_with_query(),
            "/xo/ajax/board_update/?game_id=42&row_index=1&col_index=2&next_player=O\
             &cur_player_type=human&csrfmiddlewaretoken=t0k+en"
        );
    }

    #[test]
    fn status_poll_fields() {
        let request = BoardRequest::new(
            RequestId(1),
            RequestKind::StatusPoll,
            "http://localhost:8000/update?v=2",
            &"g1".to_owned(),
            None,
        );
        assert_eq!(request.url_with_query(), "http://localhost:8000/update?v=2&game_id=g1");
    }
}
