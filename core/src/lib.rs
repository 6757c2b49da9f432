#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gull Raid game.
//!
//! This crate defines the message surface that connects adapters to the
//! authoritative session. Adapters submit [`Command`] values describing
//! player input and elapsed time, the session executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for the
//! presentation and audio ports to react to. The session is the sole owner
//! of mutable game state; everything crossing this boundary is a value.

use std::{fmt, num::NonZeroU32, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the game boots.
pub const WELCOME_BANNER: &str = "Welcome to Gull Raid. Guard your chips.";

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts a fresh game, reseeding the target generators from `entropy`.
    StartGame {
        /// Entropy word used to reinitialise all generator seeds.
        entropy: u64,
    },
    /// Replays the wave the player just failed. Valid only after a game over.
    RestartWave,
    /// Abandons the current run and returns to the start screen.
    ResetGame {
        /// Entropy word used to reinitialise all generator seeds.
        entropy: u64,
    },
    /// Signals that the player is ready and the selection countdown may run.
    ReadyToSelect,
    /// Records the player's guess for the current wave.
    SelectRoom {
        /// Room the player believes the seagull will raid.
        room: RoomId,
    },
    /// Flips the background-music mute flag.
    ToggleMusic,
    /// Advances the session's logical clock, firing any due timers.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the session for the presentation and audio ports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The game board was rebuilt with the listed rooms.
    BoardCreated {
        /// Rooms composing the board, in display order.
        rooms: Vec<RoomId>,
    },
    /// The active screen changed.
    ScreenChanged {
        /// Screen that became active.
        screen: Screen,
    },
    /// The wave counter advanced.
    WaveCounterUpdated {
        /// Wave that is about to play.
        current: WaveId,
        /// Total number of waves in the run.
        total: u32,
    },
    /// The avatar for the given wave should be shown at its perch.
    AvatarShown {
        /// Wave whose seagull enters the stage.
        wave: WaveId,
    },
    /// The player should be prompted to pick a room.
    SelectionPromptShown,
    /// The selection countdown changed.
    TimerUpdated {
        /// Seconds remaining before the selection window closes.
        seconds: u32,
    },
    /// The player's chosen room should be highlighted.
    RoomMarkedSelected {
        /// Room the player picked.
        room: RoomId,
    },
    /// The avatar begins moving toward its target room.
    AvatarMoved {
        /// Wave whose seagull is on the move.
        wave: WaveId,
        /// Room the seagull is heading for.
        room: RoomId,
    },
    /// The target room is revealed at resolution time.
    TargetRevealed {
        /// Room the seagull raided.
        room: RoomId,
    },
    /// The seagull visual should fade out of the given room.
    SeagullVisualCleared {
        /// Room the seagull leaves behind.
        room: RoomId,
    },
    /// The raided room turns celebratory after a defeated wave.
    RoomCelebrated {
        /// Room that hosts the celebration.
        room: RoomId,
    },
    /// Every room and seagull visual should be cleared.
    AllRoomVisualsCleared,
    /// The run ended in failure.
    GameOverShown {
        /// Why the run ended.
        reason: GameOverReason,
    },
    /// The run ended with every wave defeated.
    VictoryShown,
    /// Background music should start if the audio collaborator allows it.
    MusicStartRequested,
    /// The mute flag changed and the music button should reflect it.
    MusicButtonUpdated {
        /// Whether music is now muted.
        muted: bool,
    },
}

/// Screens the presentation surface can display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    /// Title screen shown before and between runs.
    Start,
    /// The playable board.
    Game,
    /// Failure screen with the game-over message.
    GameOver,
    /// Celebration screen shown after the final wave.
    Victory,
}

/// Phase of the active wave while the game is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The wave was presented and the session waits for the ready signal.
    AwaitingReady,
    /// The selection countdown is running.
    Selecting,
    /// The seagull is in flight; resolution is pending.
    Resolving,
}

/// Terminal failure outcomes, rendered as the player-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameOverReason {
    /// The countdown expired with no room selected.
    TimedOut,
    /// The player picked the exact room the seagull raided.
    Caught,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut => write!(f, "Time's up! You didn't select a room!"),
            Self::Caught => write!(f, "Oh no! Your food is gone!"),
        }
    }
}

/// Pseudo-random target-selection algorithms, one per wave in rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Fisher-Yates shuffle seeded by a small linear-congruential step.
    Shuffle,
    /// Classic linear congruential generator.
    LinearCongruential,
    /// Perlin-like phase noise blended with a clock sine.
    Noise,
}

impl Algorithm {
    /// Algorithm assigned to the wave at the given zero-based index.
    ///
    /// Waves cycle Shuffle, LinearCongruential, Noise when a run has more
    /// than three waves.
    #[must_use]
    pub const fn for_wave_index(index: u32) -> Self {
        match index % 3 {
            0 => Self::Shuffle,
            1 => Self::LinearCongruential,
            _ => Self::Noise,
        }
    }
}

/// Unique identifier of a board room, numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// Creates a new room identifier with the provided 1-based number.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier of a wave, numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveId(u32);

impl WaveId {
    /// Creates a new wave identifier with the provided 1-based number.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable per-session configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    total_rooms: NonZeroU32,
    wave_count: NonZeroU32,
    selection_timer_secs: NonZeroU32,
    move_time: Duration,
}

impl GameConfig {
    /// Validates and constructs a session configuration.
    ///
    /// Zero-valued rooms, waves or timer lengths are programming errors in
    /// the embedding adapter and are rejected up front.
    pub fn new(
        total_rooms: u32,
        wave_count: u32,
        selection_timer_secs: u32,
        move_time: Duration,
    ) -> Result<Self, ConfigError> {
        let total_rooms = NonZeroU32::new(total_rooms).ok_or(ConfigError::ZeroRooms)?;
        let wave_count = NonZeroU32::new(wave_count).ok_or(ConfigError::ZeroWaves)?;
        let selection_timer_secs =
            NonZeroU32::new(selection_timer_secs).ok_or(ConfigError::ZeroTimer)?;
        Ok(Self {
            total_rooms,
            wave_count,
            selection_timer_secs,
            move_time,
        })
    }

    /// Number of rooms on the board.
    #[must_use]
    pub const fn total_rooms(&self) -> NonZeroU32 {
        self.total_rooms
    }

    /// Number of waves in a full run.
    #[must_use]
    pub const fn wave_count(&self) -> NonZeroU32 {
        self.wave_count
    }

    /// Length of the selection countdown in whole seconds.
    #[must_use]
    pub const fn selection_timer_secs(&self) -> NonZeroU32 {
        self.selection_timer_secs
    }

    /// Delay between room selection and wave resolution.
    #[must_use]
    pub const fn move_time(&self) -> Duration {
        self.move_time
    }
}

/// Reasons a session configuration fails validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The board must contain at least one room.
    #[error("a game board requires at least one room")]
    ZeroRooms,
    /// A run must contain at least one wave.
    #[error("a run requires at least one wave")]
    ZeroWaves,
    /// The selection countdown must last at least one second.
    #[error("the selection timer requires at least one second")]
    ZeroTimer,
}
