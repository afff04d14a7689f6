// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod dom_board;
pub mod web_document;
pub mod web_element_ext;
pub mod web_error_handling;
pub mod web_fetch;
pub mod web_iterators;
pub mod web_logger;
pub mod web_util;

use std::cell::RefCell;
use std::sync::mpsc;
use std::time::Duration;

use instant::Instant;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use xo_client::client::ClientState;
use xo_client::error::RequestFailure;
use xo_client::event::BoardUpdateResponse;
use xo_client::render::render_board;
use xo_client::request::{BoardRequest, RequestId};

use crate::dom_board::DomBoard;
use crate::web_document::web_window;
use crate::web_element_ext::WebElementExt;
use crate::web_error_handling::{JsResult, describe_js_error, set_panic_hook};


struct WebClient {
    state: ClientState,
    requests_rx: mpsc::Receiver<BoardRequest>,
    request_timeout: Duration,
    view: DomBoard,
}

// The client is single-threaded, so wrapping all mutable singletons in `thread_local!` seems ok.
thread_local! {
    static CLIENT: RefCell<Option<WebClient>> = const { RefCell::new(None) };
}

impl WebClient {
    // Brings the page in sync with the client state and sends whatever the state has requested.
    // Must be called after every state change.
    fn update(&mut self) -> JsResult<()> {
        render_board(&self.state, &mut self.view)?;
        for request in self.requests_rx.try_iter() {
            dispatch(request, self.request_timeout)?;
        }
        Ok(())
    }
}

fn with_client<R>(f: impl FnOnce(&mut WebClient) -> JsResult<R>) -> JsResult<R> {
    CLIENT.with(|cell| {
        let mut client = cell
            .try_borrow_mut()
            .map_err(|_| rust_error!("{}", xo_client::internal_error_message!("client is busy")))?;
        let client = client.as_mut().ok_or_else(|| rust_error!("Client is not initialized"))?;
        f(client)
    })
}

// Errors in callbacks have nowhere to go.
fn log_js_error(context: &str, result: JsResult<()>) {
    if let Err(err) = result {
        error!("{}: {}", context, describe_js_error(&err));
    }
}


#[wasm_bindgen(start)]
pub fn start() -> JsResult<()> {
    set_panic_hook();
    web_logger::init(log::LevelFilter::Info);
    let Some(view) = DomBoard::find()? else {
        debug!("No board on this page");
        return Ok(());
    };
    let (setup, options) = view.read_setup()?;
    info!(
        "Game {} on a {} board, {} ({}) to move",
        setup.game_id,
        setup.grid.shape(),
        setup.next_player,
        setup.next_player_type
    );

    view.table().add_event_listener_and_forget("click", |event: web_sys::Event| {
        log_js_error("Cannot process click", on_board_click(event));
        Ok(())
    })?;
    // Cell forms are never submitted the old-fashioned way.
    view.table().add_event_listener_and_forget("submit", |event: web_sys::Event| {
        event.prevent_default();
        Ok(())
    })?;
    if let Some(message) = view.message() {
        message.add_event_listener_and_forget("click", |event: web_sys::Event| {
            log_js_error("Cannot process click", on_message_click(event));
            Ok(())
        })?;
    }

    let (requests_tx, requests_rx) = mpsc::channel();
    let request_timeout = options.request_timeout;
    let state = ClientState::new(setup, options, requests_tx);
    CLIENT.with(|cell| {
        *cell.borrow_mut() = Some(WebClient { state, requests_rx, request_timeout, view });
    });
    with_client(|client| {
        client.state.bootstrap(Instant::now());
        client.update()
    })
}

// Asks the server for a computer move after a failed poll. Also bound to the retry link.
#[wasm_bindgen]
pub fn retry() -> JsResult<()> {
    with_client(|client| {
        if let Err(err) = client.state.retry(Instant::now()) {
            warn!("Cannot retry: {:?}", err);
        }
        client.update()
    })
}

fn on_board_click(event: web_sys::Event) -> JsResult<()> {
    let Some(target) = event.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) else {
        return Ok(());
    };
    with_client(|client| {
        let Some(coord) = client.view.clicked_coord(&target)? else {
            return Ok(());
        };
        event.prevent_default();
        match client.state.click_cell(coord, Instant::now()) {
            Ok(id) => debug!("Cell {} clicked, request {:?}", coord, id),
            Err(err) => info!("Ignoring click on {}: {}", coord, err),
        }
        client.update()
    })
}

fn on_message_click(event: web_sys::Event) -> JsResult<()> {
    let Some(target) = event.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) else {
        return Ok(());
    };
    if !DomBoard::is_retry_link(&target)? {
        return Ok(());
    }
    event.prevent_default();
    retry()
}

// Performs the request in the background. Only one request is in flight at a time, and there is
// no way to cancel it: a response that comes after the timeout is sorted out by `ClientState`.
fn dispatch(request: BoardRequest, timeout: Duration) -> JsResult<()> {
    let id = request.id;
    debug!("Fetching {}", request.url_with_query());
    spawn_local(async move {
        let result = web_fetch::fetch_board_update(&request).await;
        log_js_error(
            &format!("Cannot process response to request {id:?}"),
            on_fetch_result(id, result),
        );
    });

    schedule_timeout_check(timeout)
}

fn schedule_timeout_check(delay: Duration) -> JsResult<()> {
    // Fire slightly after the deadline to make sure it has passed.
    let delay_ms = i32::try_from(delay.as_millis() + 1).unwrap_or(i32::MAX);
    let on_timeout = Closure::once_into_js(move || {
        log_js_error("Cannot check request timeout", check_timeout());
    });
    web_window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
        on_timeout.unchecked_ref(),
        delay_ms,
    )?;
    Ok(())
}

fn on_fetch_result(
    id: RequestId, result: Result<BoardUpdateResponse, RequestFailure>,
) -> JsResult<()> {
    with_client(|client| {
        let now = Instant::now();
        match result {
            Ok(response) => {
                if let Err(err) = client.state.process_response(id, response, now) {
                    warn!("Rejected response to request {:?}: {}", id, err);
                }
            }
            Err(failure) => {
                client.state.process_request_failure(id, failure);
            }
        }
        client.update()
    })
}

fn check_timeout() -> JsResult<()> {
    with_client(|client| {
        let now = Instant::now();
        if client.state.check_timeout(now).is_some() {
            return client.update();
        }
        // Either the timer fired early or a newer request is in flight.
        match client.state.time_until_deadline(now) {
            Some(delay) => schedule_timeout_check(delay),
            None => Ok(()),
        }
    })
}
