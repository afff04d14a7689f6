use std::time::Duration;

use anyhow::Context;
use reqwest::header;
use url::Url;
use xo_client::error::RequestFailure;
use xo_client::event::BoardUpdateResponse;
use xo_client::request::BoardRequest;


// Blocking board update requests. Cheap to clone: one copy per request thread.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl HttpTransport {
    // The HTTP timeout matches the client-side one, so that a hanging request does not outlive the
    // moment the client gives up on it.
    pub fn new(base_url: Url, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client.")?;
        Ok(HttpTransport { client, base_url })
    }

    pub fn fetch(&self, request: &BoardRequest) -> Result<BoardUpdateResponse, RequestFailure> {
        let url = self
            .base_url
            .join(&request.url)
            .map_err(|err| RequestFailure::Network(format!("bad URL: {err}")))?;
        let response = self
            .client
            .get(url)
            .query(&request.query)
            .header(header::ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .map_err(request_failure)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequestFailure::HttpStatus(status.as_u16()));
        }
        let body = response.text().map_err(request_failure)?;
        Ok(BoardUpdateResponse::from_json(&body)?)
    }
}

fn request_failure(err: reqwest::Error) -> RequestFailure {
    if err.is_timeout() {
        RequestFailure::Timeout
    } else {
        RequestFailure::Network(err.to_string())
    }
}
