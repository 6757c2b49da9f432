//! Text presentation of session events.

use anyhow::Result as AnyResult;
use gull_raid_core::{GameOverReason, RoomId, Screen, WaveId};
use gull_raid_presentation::Presentation;

const ROOMS_PER_ROW: usize = 3;

/// Presentation port that renders the game as terminal lines.
#[derive(Debug, Default)]
pub(crate) struct TerminalPresentation {
    room_count: usize,
}

impl TerminalPresentation {
    fn print_board(&self) {
        for row in (1..=self.room_count).collect::<Vec<_>>().chunks(ROOMS_PER_ROW) {
            let cells: Vec<String> = row.iter().map(|room| format!("[{room:>2}]")).collect();
            println!("  {}", cells.join(" "));
        }
    }
}

impl Presentation for TerminalPresentation {
    fn create_board(&mut self, rooms: &[RoomId]) -> AnyResult<()> {
        self.room_count = rooms.len();
        println!("The boardwalk has {} rooms:", rooms.len());
        self.print_board();
        Ok(())
    }

    fn show_screen(&mut self, screen: Screen) -> AnyResult<()> {
        match screen {
            Screen::Start => println!("== start screen =="),
            Screen::Game => println!("== game on =="),
            Screen::GameOver => println!("== game over =="),
            Screen::Victory => println!("== victory =="),
        }
        Ok(())
    }

    fn update_timer(&mut self, seconds: u32) -> AnyResult<()> {
        println!("  {seconds}...");
        Ok(())
    }

    fn update_wave_counter(&mut self, current: WaveId, total: u32) -> AnyResult<()> {
        println!("Seagull {current} of {total}", current = current.get());
        Ok(())
    }

    fn show_avatar_for_wave(&mut self, wave: WaveId) -> AnyResult<()> {
        println!("Seagull {} lands on the railing.", wave.get());
        Ok(())
    }

    fn show_selection_prompt(&mut self) -> AnyResult<()> {
        println!("Type 'ready', then 'pick <room>' to hide your chips.");
        Ok(())
    }

    fn move_avatar_to_room(&mut self, wave: WaveId, _room: RoomId) -> AnyResult<()> {
        // The destination stays secret until resolution.
        println!("Seagull {} takes off!", wave.get());
        Ok(())
    }

    fn mark_room_selected(&mut self, room: RoomId) -> AnyResult<()> {
        println!("You stash your chips in room {}.", room.get());
        Ok(())
    }

    fn reveal_target_in_room(&mut self, room: RoomId) -> AnyResult<()> {
        println!("The seagull dives into room {}!", room.get());
        Ok(())
    }

    fn clear_seagull_visual(&mut self, room: RoomId) -> AnyResult<()> {
        println!("The seagull flaps away from room {}.", room.get());
        Ok(())
    }

    fn mark_room_celebratory(&mut self, room: RoomId) -> AnyResult<()> {
        println!("Room {} celebrates!", room.get());
        Ok(())
    }

    fn clear_all_room_visuals(&mut self) -> AnyResult<()> {
        if self.room_count > 0 {
            self.print_board();
        }
        Ok(())
    }

    fn show_game_over(&mut self, reason: GameOverReason) -> AnyResult<()> {
        println!("{reason}");
        println!("Type 'restart' to retry this wave or 'reset' to give up.");
        Ok(())
    }

    fn show_victory(&mut self) -> AnyResult<()> {
        println!("You kept your chips through every wave!");
        Ok(())
    }

    fn update_music_button(&mut self, muted: bool) -> AnyResult<()> {
        println!("Music {}.", if muted { "muted" } else { "on" });
        Ok(())
    }
}
