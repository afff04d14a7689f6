// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod board_state;
pub mod client;
pub mod coord;
pub mod error;
pub mod event;
pub mod grid;
pub mod player;
pub mod render;
pub mod request;
pub mod request_monitor;
pub mod setup;
pub mod status;
pub mod test_util;
