#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal adapter that boots the Gull Raid experience.
//!
//! Reads player commands from stdin on a helper thread, pumps the session
//! clock from wall time, and renders session events as text.

mod input;
mod terminal;

use std::{
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use gull_raid_core::{Command as GameCommand, GameConfig, WELCOME_BANNER};
use gull_raid_presentation::{present, SilentAudio};
use gull_raid_session::{apply, Session};
use log::warn;

use crate::input::PlayerInput;
use crate::terminal::TerminalPresentation;

const PUMP_INTERVAL: Duration = Duration::from_millis(100);

/// Command-line options for a Gull Raid run.
#[derive(Debug, Parser)]
#[command(name = "gull-raid", about = "Guess which room the seagull raids")]
struct Options {
    /// Number of rooms on the board.
    #[arg(long, default_value_t = 9)]
    rooms: u32,
    /// Number of seagull waves in a run.
    #[arg(long, default_value_t = 3)]
    waves: u32,
    /// Selection countdown length in seconds.
    #[arg(long, default_value_t = 5)]
    timer: u32,
    /// Seagull flight time before resolution, in milliseconds.
    #[arg(long = "move-time-ms", default_value_t = 5_000)]
    move_time_ms: u64,
    /// Fixed entropy seed for reproducible runs; fresh randomness when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Start with background music muted.
    #[arg(long)]
    muted: bool,
}

impl Options {
    fn entropy(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// Entry point for the Gull Raid command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let options = Options::parse();

    let config = GameConfig::new(
        options.rooms,
        options.waves,
        options.timer,
        Duration::from_millis(options.move_time_ms),
    )
    .context("invalid game configuration")?;

    println!("{WELCOME_BANNER}");
    println!("Commands: start, ready, pick <room>, restart, reset, music, quit");

    let mut session = Session::new(config, options.entropy());
    let mut presentation = TerminalPresentation::default();
    let mut audio = SilentAudio::default();
    let mut events = Vec::new();

    if options.muted {
        apply(&mut session, GameCommand::ToggleMusic, &mut events);
    }

    let inputs = spawn_input_reader();
    let mut last_pump = Instant::now();

    loop {
        thread::sleep(PUMP_INTERVAL);

        loop {
            match inputs.try_recv() {
                Ok(line) => match input::parse(&line) {
                    Some(PlayerInput::Start) => apply(
                        &mut session,
                        GameCommand::StartGame {
                            entropy: options.entropy(),
                        },
                        &mut events,
                    ),
                    Some(PlayerInput::Ready) => {
                        apply(&mut session, GameCommand::ReadyToSelect, &mut events)
                    }
                    Some(PlayerInput::Pick(room)) => {
                        apply(&mut session, GameCommand::SelectRoom { room }, &mut events)
                    }
                    Some(PlayerInput::Restart) => {
                        apply(&mut session, GameCommand::RestartWave, &mut events)
                    }
                    Some(PlayerInput::Reset) => apply(
                        &mut session,
                        GameCommand::ResetGame {
                            entropy: options.entropy(),
                        },
                        &mut events,
                    ),
                    Some(PlayerInput::Music) => {
                        apply(&mut session, GameCommand::ToggleMusic, &mut events)
                    }
                    Some(PlayerInput::Quit) => {
                        present(&events, &mut presentation, &mut audio);
                        println!("Thanks for playing.");
                        return Ok(());
                    }
                    None => warn!("ignoring unknown input: {line:?}"),
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    present(&events, &mut presentation, &mut audio);
                    return Ok(());
                }
            }
        }

        let dt = last_pump.elapsed();
        last_pump = Instant::now();
        apply(&mut session, GameCommand::Tick { dt }, &mut events);

        present(&events, &mut presentation, &mut audio);
        events.clear();
    }
}

fn spawn_input_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    let _ = thread::Builder::new()
        .name("stdin-reader".to_owned())
        .spawn(move || {
            for line in std::io::stdin().lines() {
                let Ok(line) = line else { break };
                if sender.send(line).is_err() {
                    break;
                }
            }
        });
    receiver
}
