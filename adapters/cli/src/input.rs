//! Player input parsing for the terminal adapter.

use gull_raid_core::RoomId;

/// Parsed player intent from one line of terminal input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerInput {
    /// Begin a fresh run.
    Start,
    /// Signal readiness for the selection countdown.
    Ready,
    /// Guess a room by its number.
    Pick(RoomId),
    /// Replay the wave that just failed.
    Restart,
    /// Abandon the run and return to the start screen.
    Reset,
    /// Toggle background music.
    Music,
    /// Leave the game.
    Quit,
}

/// Parses one input line. Unknown input yields `None` and is ignored.
pub(crate) fn parse(line: &str) -> Option<PlayerInput> {
    let mut parts = line.split_whitespace();
    let keyword = parts.next()?.to_ascii_lowercase();
    match keyword.as_str() {
        "start" => Some(PlayerInput::Start),
        "ready" => Some(PlayerInput::Ready),
        "pick" | "select" => {
            let room: u32 = parts.next()?.parse().ok()?;
            Some(PlayerInput::Pick(RoomId::new(room)))
        }
        "restart" => Some(PlayerInput::Restart),
        "reset" => Some(PlayerInput::Reset),
        "music" | "mute" => Some(PlayerInput::Music),
        "quit" | "exit" => Some(PlayerInput::Quit),
        _ => None,
    }
}
