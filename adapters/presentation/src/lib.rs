#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation and audio port contracts for Gull Raid adapters.
//!
//! The session core never talks to a user interface directly; it emits
//! [`Event`] values, and [`present`] translates them into calls on the
//! [`Presentation`] and [`Audio`] ports. Port failures are logged and
//! swallowed so a broken surface can never block gameplay progression.

use anyhow::Result as AnyResult;
use gull_raid_core::{Event, GameOverReason, RoomId, Screen, WaveId};
use log::warn;

/// Output boundary through which the game reflects state into a UI.
///
/// Every method may fail; the dispatcher treats failures as cosmetic.
pub trait Presentation {
    /// Rebuilds the board with the given rooms in display order.
    fn create_board(&mut self, rooms: &[RoomId]) -> AnyResult<()>;
    /// Switches the visible screen.
    fn show_screen(&mut self, screen: Screen) -> AnyResult<()>;
    /// Updates the selection countdown display.
    fn update_timer(&mut self, seconds: u32) -> AnyResult<()>;
    /// Updates the wave counter display.
    fn update_wave_counter(&mut self, current: WaveId, total: u32) -> AnyResult<()>;
    /// Shows the seagull avatar for the given wave at its perch.
    fn show_avatar_for_wave(&mut self, wave: WaveId) -> AnyResult<()>;
    /// Prompts the player to pick a room.
    fn show_selection_prompt(&mut self) -> AnyResult<()>;
    /// Animates the avatar moving toward a room.
    fn move_avatar_to_room(&mut self, wave: WaveId, room: RoomId) -> AnyResult<()>;
    /// Highlights the player's chosen room.
    fn mark_room_selected(&mut self, room: RoomId) -> AnyResult<()>;
    /// Reveals the seagull inside the raided room.
    fn reveal_target_in_room(&mut self, room: RoomId) -> AnyResult<()>;
    /// Fades the seagull visual out of a room.
    fn clear_seagull_visual(&mut self, room: RoomId) -> AnyResult<()>;
    /// Turns a room celebratory after a defeated wave.
    fn mark_room_celebratory(&mut self, room: RoomId) -> AnyResult<()>;
    /// Clears every room and seagull visual.
    fn clear_all_room_visuals(&mut self) -> AnyResult<()>;
    /// Shows the game-over screen content.
    fn show_game_over(&mut self, reason: GameOverReason) -> AnyResult<()>;
    /// Shows the victory screen content.
    fn show_victory(&mut self) -> AnyResult<()>;
    /// Reflects the mute flag on the music button.
    fn update_music_button(&mut self, muted: bool) -> AnyResult<()>;
}

/// Fire-and-forget audio collaborator.
///
/// Environments may refuse playback (browser autoplay policies, missing
/// devices); callers log such failures and move on.
pub trait Audio {
    /// Prepares the audio backend. Idempotent.
    fn initialize(&mut self) -> AnyResult<()>;
    /// Starts looping background music unless muted.
    fn start_music(&mut self) -> AnyResult<()>;
    /// Flips the mute flag, pausing or resuming playback. Returns the new flag.
    fn toggle_music(&mut self) -> bool;
    /// Whether music is currently audible.
    fn is_playing(&self) -> bool;
    /// Whether music is muted.
    fn is_muted(&self) -> bool;
}

/// Translates session events into presentation and audio port calls.
///
/// Failures from either port are logged through `log` and swallowed; the
/// remaining events are still dispatched.
pub fn present(events: &[Event], presentation: &mut dyn Presentation, audio: &mut dyn Audio) {
    for event in events {
        let outcome = dispatch(event, presentation, audio);
        if let Err(error) = outcome {
            warn!("presentation side effect failed: {error:#}");
        }
    }
}

fn dispatch(
    event: &Event,
    presentation: &mut dyn Presentation,
    audio: &mut dyn Audio,
) -> AnyResult<()> {
    match event {
        Event::BoardCreated { rooms } => presentation.create_board(rooms),
        Event::ScreenChanged { screen } => presentation.show_screen(*screen),
        Event::TimerUpdated { seconds } => presentation.update_timer(*seconds),
        Event::WaveCounterUpdated { current, total } => {
            presentation.update_wave_counter(*current, *total)
        }
        Event::AvatarShown { wave } => presentation.show_avatar_for_wave(*wave),
        Event::SelectionPromptShown => presentation.show_selection_prompt(),
        Event::AvatarMoved { wave, room } => presentation.move_avatar_to_room(*wave, *room),
        Event::RoomMarkedSelected { room } => presentation.mark_room_selected(*room),
        Event::TargetRevealed { room } => presentation.reveal_target_in_room(*room),
        Event::SeagullVisualCleared { room } => presentation.clear_seagull_visual(*room),
        Event::RoomCelebrated { room } => presentation.mark_room_celebratory(*room),
        Event::AllRoomVisualsCleared => presentation.clear_all_room_visuals(),
        Event::GameOverShown { reason } => presentation.show_game_over(*reason),
        Event::VictoryShown => presentation.show_victory(),
        Event::MusicStartRequested => {
            if !audio.is_playing() && !audio.is_muted() {
                audio.initialize()?;
                audio.start_music()?;
            }
            Ok(())
        }
        Event::MusicButtonUpdated { muted } => {
            let now_muted = audio.toggle_music();
            if now_muted != *muted {
                warn!("audio mute flag drifted from session state");
            }
            presentation.update_music_button(*muted)
        }
    }
}

/// Audio stub for surfaces without a sound device.
///
/// Tracks the playing and muted flags so the dispatcher's
/// play-unless-muted logic behaves the same as with a real backend.
#[derive(Debug, Default)]
pub struct SilentAudio {
    initialized: bool,
    playing: bool,
    muted: bool,
}

impl Audio for SilentAudio {
    fn initialize(&mut self) -> AnyResult<()> {
        self.initialized = true;
        Ok(())
    }

    fn start_music(&mut self) -> AnyResult<()> {
        if !self.muted {
            self.playing = true;
        }
        Ok(())
    }

    fn toggle_music(&mut self) -> bool {
        self.muted = !self.muted;
        self.playing = !self.muted && self.initialized;
        self.muted
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn is_muted(&self) -> bool {
        self.muted
    }
}
