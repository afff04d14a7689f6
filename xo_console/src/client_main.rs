use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use instant::Instant;
use log::{info, warn};
use xo_client::client::{ClientPhase, ClientState};
use xo_client::coord::Coord;
use xo_client::error::RequestFailure;
use xo_client::event::BoardUpdateResponse;
use xo_client::render::render_board;
use xo_client::request::{BoardRequest, RequestId};

use crate::console_config::ConsoleConfig;
use crate::http_transport::HttpTransport;
use crate::tui::TerminalView;


enum IncomingEvent {
    Response(RequestId, Result<BoardUpdateResponse, RequestFailure>),
    Terminal(String),
    InputClosed,
    // The request in flight may have passed its deadline.
    Tick,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ConsoleCommand {
    Move(Coord),
    Retry,
    Quit,
}

fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let line = line.trim();
    match line {
        "retry" | "r" => return Ok(ConsoleCommand::Retry),
        "quit" | "q" => return Ok(ConsoleCommand::Quit),
        _ => {}
    }
    let parts: Vec<_> =
        line.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty()).collect();
    let [row, col] = parts[..] else {
        return Err(format!("Expected \"row col\", \"retry\" or \"quit\", got \"{line}\""));
    };
    let parse_index = |s: &str| s.parse::<u8>().map_err(|_| format!("Invalid index: \"{s}\""));
    Ok(ConsoleCommand::Move(Coord::new(parse_index(row)?, parse_index(col)?)))
}

// Whether the game is stuck until the user types something.
fn needs_user_input(phase: ClientPhase) -> bool {
    match phase {
        ClientPhase::AwaitingHumanInput | ClientPhase::Failed => true,
        ClientPhase::Submitting | ClientPhase::AutoPolling | ClientPhase::GameOver => false,
    }
}

fn send_requests(
    requests_rx: &mpsc::Receiver<BoardRequest>, transport: &HttpTransport,
    events_tx: &mpsc::Sender<IncomingEvent>,
) {
    for request in requests_rx.try_iter() {
        let transport = transport.clone();
        let events_tx = events_tx.clone();
        thread::spawn(move || {
            let result = transport.fetch(&request);
            // The receiver is gone only if the game loop has finished.
            let _ = events_tx.send(IncomingEvent::Response(request.id, result));
        });
    }
}

pub fn run(config: ConsoleConfig) -> anyhow::Result<()> {
    let setup = config.board_setup()?;
    let options = config.client_options();
    let transport = HttpTransport::new(config.board_url()?, options.request_timeout)?;
    let shape = setup.grid.shape();
    info!("Joining game {} on a {} board", setup.game_id, shape);

    let (events_tx, events_rx) = mpsc::channel();
    let (requests_tx, requests_rx) = mpsc::channel();
    let mut client_state = ClientState::new(setup, options, requests_tx);
    let mut view = TerminalView::new(shape);

    let stdin_events_tx = events_tx.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let event = match line {
                Ok(line) => IncomingEvent::Terminal(line),
                Err(_) => break,
            };
            if stdin_events_tx.send(event).is_err() {
                return;
            }
        }
        let _ = stdin_events_tx.send(IncomingEvent::InputClosed);
    });

    client_state.bootstrap(Instant::now());
    let mut input_closed = false;
    loop {
        send_requests(&requests_rx, &transport, &events_tx);
        let Ok(()) = render_board(&client_state, &mut view);
        print!("{}", view.render());
        io::stdout().flush().context("Failed to write to stdout.")?;
        if client_state.phase() == ClientPhase::GameOver {
            return Ok(());
        }
        if input_closed && needs_user_input(client_state.phase()) {
            info!("Input closed, leaving the game");
            return Ok(());
        }

        let event = match client_state.time_until_deadline(Instant::now()) {
            Some(delay) => match events_rx.recv_timeout(delay) {
                Ok(event) => event,
                Err(mpsc::RecvTimeoutError::Timeout) => IncomingEvent::Tick,
                Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
            },
            None => match events_rx.recv() {
                Ok(event) => event,
                Err(mpsc::RecvError) => return Ok(()),
            },
        };
        let now = Instant::now();
        match event {
            IncomingEvent::Response(id, Ok(response)) => {
                if let Err(err) = client_state.process_response(id, response, now) {
                    warn!("Rejected response to request {:?}: {}", id, err);
                }
            }
            IncomingEvent::Response(id, Err(failure)) => {
                client_state.process_request_failure(id, failure);
            }
            IncomingEvent::Tick => {
                client_state.check_timeout(now);
            }
            // Computer players can still finish the game.
            IncomingEvent::InputClosed => input_closed = true,
            IncomingEvent::Terminal(line) => match parse_command(&line) {
                Ok(ConsoleCommand::Move(coord)) => {
                    if let Err(err) = client_state.click_cell(coord, now) {
                        println!("Cannot play {coord}: {err}.");
                    }
                }
                Ok(ConsoleCommand::Retry) => {
                    if let Err(err) = client_state.retry(now) {
                        println!("Nothing to retry ({err:?}).");
                    }
                }
                Ok(ConsoleCommand::Quit) => return Ok(()),
                Err(message) => println!("{message}"),
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn commands() {
        assert_eq!(parse_command("1 2"), Ok(ConsoleCommand::Move(Coord::new(1, 2))));
        assert_eq!(parse_command(" 0,1 \n"), Ok(ConsoleCommand::Move(Coord::new(0, 1))));
        assert_eq!(parse_command("2, 0"), Ok(ConsoleCommand::Move(Coord::new(2, 0))));
        assert_eq!(parse_command("retry"), Ok(ConsoleCommand::Retry));
        assert_eq!(parse_command("q"), Ok(ConsoleCommand::Quit));
        assert!(parse_command("1").is_err());
        assert!(parse_command("1 2 3").is_err());
        assert!(parse_command("a b").is_err());
        assert!(parse_command("-1 0").is_err());
    }

    #[test]
    fn computers_play_without_user_input() {
        assert!(needs_user_input(ClientPhase::AwaitingHumanInput));
        assert!(needs_user_input(ClientPhase::Failed));
        assert!(!needs_user_input(ClientPhase::AutoPolling));
        assert!(!needs_user_input(ClientPhase::Submitting));
        assert!(!needs_user_input(ClientPhase::GameOver));
    }
}
