// Board update requests over `window.fetch`.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use xo_client::error::RequestFailure;
use xo_client::event::BoardUpdateResponse;
use xo_client::request::BoardRequest;

use crate::web_error_handling::describe_js_error;


pub async fn fetch_board_update(
    request: &BoardRequest,
) -> Result<BoardUpdateResponse, RequestFailure> {
    let window = web_sys::window().ok_or_else(|| network_failure("no window"))?;
    let init = web_sys::RequestInit::new();
    init.set_method("GET");
    let http_request =
        web_sys::Request::new_with_str_and_init(&request.url_with_query(), &init)
            .map_err(js_failure)?;
    let headers = http_request.headers();
    headers.set("Accept", "application/json").map_err(js_failure)?;
    // Lets the server tell these requests apart from page loads, like jQuery does.
    headers.set("X-Requested-With", "XMLHttpRequest").map_err(js_failure)?;

    let response = JsFuture::from(window.fetch_with_request(&http_request))
        .await
        .map_err(js_failure)?
        .dyn_into::<web_sys::Response>()
        .map_err(|_| network_failure("fetch did not return a response"))?;
    if !response.ok() {
        return Err(RequestFailure::HttpStatus(response.status()));
    }
    let body = JsFuture::from(response.text().map_err(js_failure)?)
        .await
        .map_err(js_failure)?
        .as_string()
        .ok_or_else(|| RequestFailure::MalformedResponse("body is not text".to_owned()))?;
    Ok(BoardUpdateResponse::from_json(&body)?)
}

fn network_failure(message: &str) -> RequestFailure { RequestFailure::Network(message.to_owned()) }

fn js_failure(err: JsValue) -> RequestFailure { RequestFailure::Network(describe_js_error(&err)) }
