// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod client_main;
mod console_config;
mod http_transport;
mod tui;

use anyhow::Context;
use clap::{Command, arg};
use console_config::ConsoleConfig;


fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("xo")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about("Tic-tac-toe console client")
        .subcommand_required(true)
        .subcommand(Command::new("play").about("Play a game hosted by the web server").arg(
            arg!(<config_file> "Path to the configuration file: yaml-serialized ConsoleConfig."),
        ))
        .get_matches();

    match matches.subcommand() {
        Some(("play", sub_matches)) => {
            let config_file = sub_matches
                .get_one::<String>("config_file")
                .context("Missing config file argument")?;
            client_main::run(read_config_file(config_file)?)
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

fn read_config_file(filename: &str) -> anyhow::Result<ConsoleConfig> {
    let contents = std::fs::read_to_string(filename)
        .with_context(|| format!("Failed to read config file '{filename}'."))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file '{filename}'."))
}
