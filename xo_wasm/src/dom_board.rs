// The server-rendered board. Expected markup:
//
//   <div class="board" game-id=".." board-update-url=".." next-player="X" next-player-type="human"
//        new-game-url="..">
//     <table>
//       <tr>
//         <td><form ..><input type="hidden" name="row_index" ..> .. <button>..</button></form></td>
//         <td><div class="square">O</div></td>
//         ..
//   <div class="col" id="message">..</div>
//
// An unplayed cell holds a form, a played cell holds a `div.square` with the marker.

use log::warn;
use wasm_bindgen::JsCast;
use xo_client::coord::Coord;
use xo_client::grid::Cell;
use xo_client::player::{Marker, PlayerType};
use xo_client::render::BoardView;
use xo_client::request::{FIELD_CSRF_TOKEN, FIELD_CUR_PLAYER_TYPE, FIELD_NEXT_PLAYER};
use xo_client::setup::{
    ATTR_NEXT_PLAYER, ATTR_NEXT_PLAYER_TYPE, BoardSetup, ClientOptions, parse_cell_text,
};
use xo_client::status::{StatusLink, StatusView};

use crate::rust_error;
use crate::web_document::{WebDocument, web_document};
use crate::web_element_ext::WebElementExt;
use crate::web_error_handling::JsResult;
use crate::web_iterators::IntoHtmlCollectionIterator;
use crate::web_util::parse_cookie;


pub const CSRF_COOKIE: &str = "csrftoken";

pub const CRASH_NOTICE: &str = "Something went wrong. Please reload the page.";

const SQUARE_CLASS: &str = "square";
const PENDING_CLASS: &str = "pending";
const MESSAGE_SELECTOR: &str = "div#message";
const MESSAGE_ROW_CLASSES: [&str; 2] = ["row", "justify-content-center"];
const MESSAGE_LINK_ID: &str = "message-link";
const DATA_ACTION: &str = "data-action";
const RETRY_ACTION: &str = "retry";


pub struct DomBoard {
    board: web_sys::Element,
    table: web_sys::HtmlTableElement,
    message: Option<web_sys::Element>,
    last_status: Option<StatusView>,
}

impl DomBoard {
    // Returns `None` if there is no game on this page.
    pub fn find() -> JsResult<Option<Self>> {
        let document = web_document()?;
        let Some(board) = document.query_selector("div.board")? else {
            return Ok(None);
        };
        let table = match board.query_selector("table")? {
            Some(table) => table,
            None => document.query_selector_existing("table")?,
        };
        let table = table
            .dyn_into::<web_sys::HtmlTableElement>()
            .map_err(|_| rust_error!("Board table is not a table"))?;
        let message = document.query_selector(MESSAGE_SELECTOR)?;
        if message.is_none() {
            warn!("Message region not found, status updates will not be shown");
        }
        Ok(Some(DomBoard { board, table, message, last_status: None }))
    }

    pub fn table(&self) -> &web_sys::HtmlTableElement { &self.table }
    pub fn message(&self) -> Option<&web_sys::Element> { self.message.as_ref() }

    pub fn read_setup(&self) -> JsResult<(BoardSetup, ClientOptions)> {
        let get_attr = |name: &str| self.board.get_attribute(name);
        let mut cells = vec![];
        for (row_idx, row) in self.table.rows().into_iterator().enumerate() {
            let row = row
                .dyn_into::<web_sys::HtmlTableRowElement>()
                .map_err(|_| rust_error!("Board row {} is not a table row", row_idx))?;
            let mut row_cells = vec![];
            for (col_idx, td) in row.cells().into_iterator().enumerate() {
                let marker = match td.query_selector(&format!("div.{SQUARE_CLASS}"))? {
                    Some(square) => {
                        let coord = coord_from_indices(row_idx, col_idx)?;
                        let text = square.text_content().unwrap_or_default();
                        Some(parse_cell_text(coord, &text).map_err(|err| rust_error!("{}", err))?)
                    }
                    None => None,
                };
                row_cells.push(marker);
            }
            cells.push(row_cells);
        }
        let setup = BoardSetup::from_attributes(get_attr, cells)
            .map_err(|err| rust_error!("{}", err))?
            .with_csrf_token(read_csrf_token(&web_document()?)?);
        let options =
            ClientOptions::from_attributes(get_attr).map_err(|err| rust_error!("{}", err))?;
        Ok((setup, options))
    }

    // Coordinates of the cell control that contains `target`, if any.
    pub fn clicked_coord(&self, target: &web_sys::Element) -> JsResult<Option<Coord>> {
        let Some(button) = target.closest("button")? else {
            return Ok(None);
        };
        let Some(td) = button.closest("td")? else {
            return Ok(None);
        };
        let Some(tr) = td.closest("tr")? else {
            return Ok(None);
        };
        if !self.table.contains(Some(&tr)) {
            return Ok(None);
        }
        let (Ok(td), Ok(tr)) = (
            td.dyn_into::<web_sys::HtmlTableCellElement>(),
            tr.dyn_into::<web_sys::HtmlTableRowElement>(),
        ) else {
            return Ok(None);
        };
        let (Ok(row), Ok(col)) = (u8::try_from(tr.row_index()), u8::try_from(td.cell_index()))
        else {
            return Ok(None);
        };
        Ok(Some(Coord::new(row, col)))
    }

    // Action requested by a click inside the message region.
    pub fn is_retry_link(target: &web_sys::Element) -> JsResult<bool> {
        Ok(target.closest(&format!("[{DATA_ACTION}=\"{RETRY_ACTION}\"]"))?.is_some())
    }

    fn cell_element(&self, coord: Coord) -> JsResult<web_sys::Element> {
        let row = self
            .table
            .rows()
            .item(coord.row.into())
            .ok_or_else(|| rust_error!("Board row {} not found", coord.row))?
            .dyn_into::<web_sys::HtmlTableRowElement>()
            .map_err(|_| rust_error!("Board row {} is not a table row", coord.row))?;
        row.cells()
            .item(coord.col.into())
            .ok_or_else(|| rust_error!("Board cell {} not found", coord))
    }
}

impl BoardView for DomBoard {
    type Error = wasm_bindgen::JsValue;

    fn set_cell(&mut self, coord: Coord, cell: Cell) -> JsResult<()> {
        let td = self.cell_element(coord)?;
        let form = td.query_selector("form")?;
        let square = td.query_selector(&format!("div.{SQUARE_CLASS}"))?;
        match cell {
            Cell::Empty => {
                if let Some(square) = square {
                    square.remove();
                }
                let form = form.ok_or_else(|| rust_error!("Cell {} cannot be reset", coord))?;
                if form.has_attribute("hidden") {
                    form.remove_attribute("hidden")?;
                }
            }
            Cell::Pending(marker) | Cell::Marked(marker) => {
                let pending = matches!(cell, Cell::Pending(_));
                let square = match square {
                    Some(square) => square,
                    None => {
                        let square =
                            web_document()?.create_element("div")?.with_classes([SQUARE_CLASS])?;
                        td.insert_before(&square, form.as_deref())?;
                        square
                    }
                };
                let text = marker.to_string();
                if square.text_content().as_deref() != Some(text.as_str()) {
                    square.set_text_content(Some(&text));
                }
                square.class_list().toggle_with_force(PENDING_CLASS, pending)?;
                if let Some(form) = form {
                    if pending {
                        // Kept around in case the move is not accepted.
                        form.set_attribute("hidden", "")?;
                    } else {
                        form.remove();
                    }
                }
            }
        }
        Ok(())
    }

    fn set_turn(&mut self, next_player: Marker, next_player_type: &PlayerType) -> JsResult<()> {
        let marker = next_player.to_string();
        let player_type = next_player_type.as_server_str();
        self.board.set_attribute(ATTR_NEXT_PLAYER, &marker)?;
        self.board.set_attribute(ATTR_NEXT_PLAYER_TYPE, player_type)?;
        let fields = [(FIELD_NEXT_PLAYER, marker.as_str()), (FIELD_CUR_PLAYER_TYPE, player_type)];
        for (field, value) in fields {
            let selector = format!("input[name=\"{field}\"]");
            let inputs = self.table.query_selector_all_as::<web_sys::HtmlInputElement>(&selector)?;
            for input in inputs {
                input.set_value(value);
            }
        }
        Ok(())
    }

    fn set_controls_enabled(&mut self, enabled: bool) -> JsResult<()> {
        for button in self.table.query_selector_all_as::<web_sys::HtmlButtonElement>("button")? {
            if button.disabled() == enabled {
                button.set_disabled(!enabled);
            }
        }
        Ok(())
    }

    fn set_status(&mut self, status: &StatusView) -> JsResult<()> {
        if self.last_status.as_ref() == Some(status) {
            return Ok(());
        }
        let Some(message) = &self.message else {
            return Ok(());
        };
        write_message(message, status)?;
        self.last_status = Some(status.clone());
        Ok(())
    }
}

// Replaces the status after a panic. The board stays on the page, but nothing handles clicks
// any more.
pub fn show_crash_notice() -> JsResult<()> {
    let Some(message) = web_document()?.query_selector(MESSAGE_SELECTOR)? else {
        return Ok(());
    };
    write_message(&message, &StatusView { text: CRASH_NOTICE.to_owned(), link: None })
}

fn write_message(message: &web_sys::Element, status: &StatusView) -> JsResult<()> {
    message.remove_all_children();
    message
        .append_new_element("div")?
        .with_classes(MESSAGE_ROW_CLASSES)?
        .with_text_content(&status.text);
    if let Some(link) = &status.link {
        let a = message
            .append_new_element("a")?
            .with_id(MESSAGE_LINK_ID)
            .with_classes(MESSAGE_ROW_CLASSES)?
            .with_text_content(link.text());
        match link {
            StatusLink::NewGame { url } => a.set_attribute("href", url)?,
            StatusLink::Retry => {
                a.with_attribute("href", "#")?.set_attribute(DATA_ACTION, RETRY_ACTION)?
            }
        }
    }
    Ok(())
}

// Django puts the token into a cookie; pages may also render it as a hidden form field.
fn read_csrf_token(document: &WebDocument) -> JsResult<Option<String>> {
    if let Some(token) = parse_cookie(&document.cookie()?, CSRF_COOKIE) {
        return Ok(Some(token));
    }
    let selector = format!("input[name=\"{FIELD_CSRF_TOKEN}\"]");
    Ok(document
        .query_selector(&selector)?
        .and_then(|input| input.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value()))
}

fn coord_from_indices(row: usize, col: usize) -> JsResult<Coord> {
    match (u8::try_from(row), u8::try_from(col)) {
        (Ok(row), Ok(col)) => Ok(Coord::new(row, col)),
        _ => Err(rust_error!("Board is too large")),
    }
}
