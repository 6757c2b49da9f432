#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Gull Raid.
//!
//! The [`Session`] owns every piece of mutable game state: the wave list,
//! the player's selection, the generator seeds and all pending timers.
//! Adapters drive it exclusively through [`apply`], which executes one
//! [`Command`] and appends the resulting [`Event`] values for the
//! presentation and audio ports. Timers are plain data keyed by logical
//! deadlines and fired by `Command::Tick`, so cancelling one removes it
//! outright and a cancelled timer can never fire.

use std::time::Duration;

use gull_raid_core::{
    Algorithm, Command, Event, GameConfig, GameOverReason, Phase, RoomId, Screen, WaveId,
};
use gull_raid_system_target_generation::TargetGenerator;
use log::{debug, info, warn};

const COUNTDOWN_QUANTUM: Duration = Duration::from_secs(1);
const SEAGULL_EXIT_DELAY: Duration = Duration::from_millis(1_000);
const NEXT_WAVE_DELAY: Duration = Duration::from_millis(3_000);

/// Run-level mode of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// No run in progress; the start screen is showing.
    Idle,
    /// A run is in progress.
    Active {
        /// Phase of the wave currently playing.
        phase: Phase,
    },
    /// The run ended in failure; only restart or reset leave this state.
    GameOver,
    /// Every wave was defeated; only reset leaves this state.
    Victory,
}

#[derive(Clone, Debug)]
struct Wave {
    id: WaveId,
    algorithm: Algorithm,
    target_room: Option<RoomId>,
    active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DelayKind {
    ResolveWave,
    SeagullExit,
    NextWave,
}

#[derive(Clone, Copy, Debug)]
struct PendingDelay {
    kind: DelayKind,
    deadline: Duration,
}

/// Represents the authoritative state of one game session.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    mode: Mode,
    clock: Duration,
    started_waves: u32,
    player_alive: bool,
    game_active: bool,
    selected_room: Option<RoomId>,
    timer_remaining: u32,
    defeated_waves: Vec<WaveId>,
    waves: Vec<Wave>,
    generator: TargetGenerator,
    countdown_next_tick: Option<Duration>,
    delays: Vec<PendingDelay>,
    muted: bool,
}

impl Session {
    /// Creates an idle session with generator seeds derived from `entropy`.
    #[must_use]
    pub fn new(config: GameConfig, entropy: u64) -> Self {
        Self {
            mode: Mode::Idle,
            clock: Duration::ZERO,
            started_waves: 0,
            player_alive: true,
            game_active: false,
            selected_room: None,
            timer_remaining: config.selection_timer_secs().get(),
            defeated_waves: Vec::new(),
            waves: build_waves(&config),
            generator: TargetGenerator::new(entropy),
            countdown_next_tick: None,
            delays: Vec::new(),
            muted: false,
            config,
        }
    }

    fn reset_state(&mut self) {
        self.started_waves = 0;
        self.player_alive = true;
        self.game_active = false;
        self.selected_room = None;
        self.timer_remaining = self.config.selection_timer_secs().get();
        self.defeated_waves.clear();
    }

    fn clear_timers(&mut self) {
        self.countdown_next_tick = None;
        self.delays.clear();
    }

    fn clear_active_flags(&mut self) {
        for wave in &mut self.waves {
            wave.active = false;
        }
    }

    fn start_game(&mut self, entropy: u64, out_events: &mut Vec<Event>) {
        info!("starting new game");

        self.clear_timers();
        self.reset_state();
        self.game_active = true;
        self.generator.reset(entropy);
        self.waves = build_waves(&self.config);

        if !self.muted {
            out_events.push(Event::MusicStartRequested);
        }

        let rooms = (1..=self.config.total_rooms().get())
            .map(RoomId::new)
            .collect();
        out_events.push(Event::BoardCreated { rooms });
        out_events.push(Event::AllRoomVisualsCleared);
        out_events.push(Event::ScreenChanged {
            screen: Screen::Game,
        });

        self.start_wave(out_events);
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.started_waves >= self.config.wave_count().get() {
            self.game_won(out_events);
            return;
        }

        out_events.push(Event::AllRoomVisualsCleared);

        self.started_waves += 1;
        let wave_id = WaveId::new(self.started_waves);
        out_events.push(Event::WaveCounterUpdated {
            current: wave_id,
            total: self.config.wave_count().get(),
        });

        self.clear_active_flags();
        let index = (self.started_waves - 1) as usize;
        self.waves[index].active = true;
        out_events.push(Event::AvatarShown { wave: wave_id });

        let algorithm = self.waves[index].algorithm;
        let target = self
            .generator
            .draw(algorithm, self.config.total_rooms(), self.clock);
        self.waves[index].target_room = Some(target);
        info!(
            "starting wave {} using {algorithm:?}",
            wave_id.get()
        );

        self.selected_room = None;
        out_events.push(Event::SelectionPromptShown);
        self.mode = Mode::Active {
            phase: Phase::AwaitingReady,
        };
    }

    fn ready_to_select(&mut self, out_events: &mut Vec<Event>) {
        if self.mode
            != (Mode::Active {
                phase: Phase::AwaitingReady,
            })
        {
            debug!("ready signal ignored in {:?}", self.mode);
            return;
        }

        self.mode = Mode::Active {
            phase: Phase::Selecting,
        };
        self.timer_remaining = self.config.selection_timer_secs().get();
        out_events.push(Event::TimerUpdated {
            seconds: self.timer_remaining,
        });
        self.countdown_next_tick = Some(self.clock + COUNTDOWN_QUANTUM);
    }

    fn select_room(&mut self, room: RoomId, out_events: &mut Vec<Event>) {
        if self.mode
            != (Mode::Active {
                phase: Phase::Selecting,
            })
        {
            debug!("room selection ignored in {:?}", self.mode);
            return;
        }
        if self.selected_room.is_some() {
            debug!("duplicate room selection ignored");
            return;
        }
        if room.get() < 1 || room.get() > self.config.total_rooms().get() {
            warn!("room {} is outside the board, ignoring", room.get());
            return;
        }

        info!("player selected room {}", room.get());
        self.selected_room = Some(room);
        out_events.push(Event::RoomMarkedSelected { room });

        self.countdown_next_tick = None;
        self.start_movement(out_events);
    }

    fn start_movement(&mut self, out_events: &mut Vec<Event>) {
        let index = (self.started_waves - 1) as usize;
        let wave_id = self.waves[index].id;
        let Some(target) = self.waves[index].target_room else {
            warn!("wave {} has no target, skipping movement", wave_id.get());
            return;
        };

        out_events.push(Event::AvatarMoved {
            wave: wave_id,
            room: target,
        });
        self.delays.push(PendingDelay {
            kind: DelayKind::ResolveWave,
            deadline: self.clock + self.config.move_time(),
        });
        self.mode = Mode::Active {
            phase: Phase::Resolving,
        };
    }

    fn resolve_wave(&mut self, out_events: &mut Vec<Event>) {
        let index = (self.started_waves.max(1) - 1) as usize;
        let wave_id = self.waves[index].id;
        let Some(target) = self.waves[index].target_room else {
            warn!("wave {} resolved without a target", wave_id.get());
            return;
        };

        out_events.push(Event::TargetRevealed { room: target });

        if self.selected_room == Some(target) {
            self.game_over(GameOverReason::Caught, out_events);
        } else {
            self.defeated_waves.push(wave_id);
            self.waves[index].active = false;
            self.delays.push(PendingDelay {
                kind: DelayKind::SeagullExit,
                deadline: self.clock + SEAGULL_EXIT_DELAY,
            });
            self.delays.push(PendingDelay {
                kind: DelayKind::NextWave,
                deadline: self.clock + NEXT_WAVE_DELAY,
            });
        }
    }

    fn seagull_exit(&mut self, out_events: &mut Vec<Event>) {
        let index = (self.started_waves.max(1) - 1) as usize;
        if let Some(target) = self.waves[index].target_room {
            out_events.push(Event::SeagullVisualCleared { room: target });
            out_events.push(Event::RoomCelebrated { room: target });
        }
    }

    fn game_over(&mut self, reason: GameOverReason, out_events: &mut Vec<Event>) {
        info!("game over: {reason}");

        self.game_active = false;
        self.player_alive = false;
        self.clear_timers();
        self.clear_active_flags();
        self.mode = Mode::GameOver;

        out_events.push(Event::ScreenChanged {
            screen: Screen::GameOver,
        });
        out_events.push(Event::GameOverShown { reason });
    }

    fn game_won(&mut self, out_events: &mut Vec<Event>) {
        info!("game won");

        self.game_active = false;
        self.clear_timers();
        self.clear_active_flags();
        self.mode = Mode::Victory;

        out_events.push(Event::ScreenChanged {
            screen: Screen::Victory,
        });
        out_events.push(Event::VictoryShown);
    }

    fn restart_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.mode != Mode::GameOver {
            debug!("restart ignored in {:?}", self.mode);
            return;
        }

        info!("restarting current wave");

        self.clear_timers();
        self.player_alive = true;
        self.game_active = true;
        self.selected_room = None;
        self.timer_remaining = self.config.selection_timer_secs().get();
        // Rewind by one so the wave the player just failed plays again.
        // The replay draws a fresh target rather than reusing the old one.
        self.started_waves = self.started_waves.saturating_sub(1);

        if !self.muted {
            out_events.push(Event::MusicStartRequested);
        }
        out_events.push(Event::ScreenChanged {
            screen: Screen::Game,
        });

        self.start_wave(out_events);
    }

    fn reset_game(&mut self, entropy: u64, out_events: &mut Vec<Event>) {
        info!("resetting game");

        self.clear_timers();
        self.reset_state();
        self.generator.reset(entropy);
        self.waves = build_waves(&self.config);
        self.mode = Mode::Idle;

        out_events.push(Event::AllRoomVisualsCleared);
        out_events.push(Event::ScreenChanged {
            screen: Screen::Start,
        });
    }

    fn toggle_music(&mut self, out_events: &mut Vec<Event>) {
        self.muted = !self.muted;
        out_events.push(Event::MusicButtonUpdated { muted: self.muted });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);

        // Fire due timers one at a time in deadline order. Each handler
        // observes the state left by the previous one, and a terminal
        // transition clears the containers so nothing stale can fire.
        while let Some(due) = self.take_next_due() {
            match due {
                DueTimer::CountdownTick => self.countdown_tick(out_events),
                DueTimer::Delay(DelayKind::ResolveWave) => self.resolve_wave(out_events),
                DueTimer::Delay(DelayKind::SeagullExit) => self.seagull_exit(out_events),
                DueTimer::Delay(DelayKind::NextWave) => self.start_wave(out_events),
            }
        }
    }

    fn take_next_due(&mut self) -> Option<DueTimer> {
        let countdown_due = self.countdown_next_tick.filter(|at| *at <= self.clock);

        let delay_due = self
            .delays
            .iter()
            .enumerate()
            .filter(|(_, delay)| delay.deadline <= self.clock)
            .min_by_key(|(_, delay)| delay.deadline)
            .map(|(index, delay)| (index, delay.deadline));

        match (countdown_due, delay_due) {
            (Some(tick_at), Some((_, deadline))) if tick_at <= deadline => {
                self.countdown_next_tick = Some(tick_at + COUNTDOWN_QUANTUM);
                Some(DueTimer::CountdownTick)
            }
            (Some(tick_at), None) => {
                self.countdown_next_tick = Some(tick_at + COUNTDOWN_QUANTUM);
                Some(DueTimer::CountdownTick)
            }
            (_, Some((index, _))) => {
                let delay = self.delays.remove(index);
                Some(DueTimer::Delay(delay.kind))
            }
            (None, None) => None,
        }
    }

    fn countdown_tick(&mut self, out_events: &mut Vec<Event>) {
        debug_assert!(
            self.selected_room.is_none(),
            "a selection cancels the countdown"
        );

        self.timer_remaining = self.timer_remaining.saturating_sub(1);
        out_events.push(Event::TimerUpdated {
            seconds: self.timer_remaining,
        });

        if self.timer_remaining == 0 {
            self.countdown_next_tick = None;
            self.game_over(GameOverReason::TimedOut, out_events);
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum DueTimer {
    CountdownTick,
    Delay(DelayKind),
}

fn build_waves(config: &GameConfig) -> Vec<Wave> {
    (0..config.wave_count().get())
        .map(|index| Wave {
            id: WaveId::new(index + 1),
            algorithm: Algorithm::for_wave_index(index),
            target_room: None,
            active: false,
        })
        .collect()
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame { entropy } => session.start_game(entropy, out_events),
        Command::RestartWave => session.restart_wave(out_events),
        Command::ResetGame { entropy } => session.reset_game(entropy, out_events),
        Command::ReadyToSelect => session.ready_to_select(out_events),
        Command::SelectRoom { room } => session.select_room(room, out_events),
        Command::ToggleMusic => session.toggle_music(out_events),
        Command::Tick { dt } => session.tick(dt, out_events),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::time::Duration;

    use super::{Mode, Session};
    use gull_raid_core::{Algorithm, GameConfig, RoomId, WaveId};

    /// Run-level mode the session is currently in.
    #[must_use]
    pub fn mode(session: &Session) -> Mode {
        session.mode
    }

    /// Configuration the session was constructed with.
    #[must_use]
    pub fn config(session: &Session) -> GameConfig {
        session.config
    }

    /// Logical clock accumulated from tick commands.
    #[must_use]
    pub fn clock(session: &Session) -> Duration {
        session.clock
    }

    /// Wave currently playing, if a run has started one.
    #[must_use]
    pub fn current_wave(session: &Session) -> Option<WaveId> {
        if session.started_waves == 0 {
            None
        } else {
            Some(WaveId::new(session.started_waves))
        }
    }

    /// Whether the player survived so far.
    #[must_use]
    pub fn player_alive(session: &Session) -> bool {
        session.player_alive
    }

    /// Whether a run is in progress.
    #[must_use]
    pub fn game_active(session: &Session) -> bool {
        session.game_active
    }

    /// Room the player picked in the current wave, if any.
    #[must_use]
    pub fn selected_room(session: &Session) -> Option<RoomId> {
        session.selected_room
    }

    /// Seconds remaining on the selection countdown.
    #[must_use]
    pub fn timer_remaining(session: &Session) -> u32 {
        session.timer_remaining
    }

    /// Identifiers of the waves defeated so far, in defeat order.
    #[must_use]
    pub fn defeated_waves(session: &Session) -> Vec<WaveId> {
        session.defeated_waves.clone()
    }

    /// Whether background music is muted.
    #[must_use]
    pub fn is_muted(session: &Session) -> bool {
        session.muted
    }

    /// Whether any countdown tick or one-shot delay is still pending.
    #[must_use]
    pub fn has_pending_timers(session: &Session) -> bool {
        session.countdown_next_tick.is_some() || !session.delays.is_empty()
    }

    /// Captures a read-only view of the session's waves.
    #[must_use]
    pub fn wave_view(session: &Session) -> WaveView {
        WaveView {
            snapshots: session
                .waves
                .iter()
                .map(|wave| WaveSnapshot {
                    id: wave.id,
                    algorithm: wave.algorithm,
                    target_room: wave.target_room,
                    active: wave.active,
                })
                .collect(),
        }
    }

    /// Read-only snapshot describing all waves in the run.
    #[derive(Clone, Debug)]
    pub struct WaveView {
        snapshots: Vec<WaveSnapshot>,
    }

    impl WaveView {
        /// Iterator over the captured wave snapshots in id order.
        pub fn iter(&self) -> impl Iterator<Item = &WaveSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<WaveSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single wave's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WaveSnapshot {
        /// Stable identifier of the wave.
        pub id: WaveId,
        /// Algorithm that picks this wave's target.
        pub algorithm: Algorithm,
        /// Target room, assigned when the wave starts.
        pub target_room: Option<RoomId>,
        /// Whether this wave is the one currently playing.
        pub active: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig::new(9, 3, 5, Duration::from_millis(5_000)).expect("valid config")
    }

    #[test]
    fn new_session_is_idle_with_full_wave_list() {
        let session = Session::new(config(), 1);
        assert_eq!(query::mode(&session), Mode::Idle);
        assert!(!query::game_active(&session));
        assert_eq!(query::current_wave(&session), None);

        let waves = query::wave_view(&session).into_vec();
        assert_eq!(waves.len(), 3);
        assert_eq!(waves[0].algorithm, Algorithm::Shuffle);
        assert_eq!(waves[1].algorithm, Algorithm::LinearCongruential);
        assert_eq!(waves[2].algorithm, Algorithm::Noise);
        assert!(waves.iter().all(|wave| wave.target_room.is_none()));
        assert!(waves.iter().all(|wave| !wave.active));
    }

    #[test]
    fn wave_lists_cycle_algorithms_beyond_three_waves() {
        let config = GameConfig::new(4, 5, 5, Duration::ZERO).expect("valid config");
        let session = Session::new(config, 1);
        let algorithms: Vec<Algorithm> = query::wave_view(&session)
            .iter()
            .map(|wave| wave.algorithm)
            .collect();
        assert_eq!(
            algorithms,
            vec![
                Algorithm::Shuffle,
                Algorithm::LinearCongruential,
                Algorithm::Noise,
                Algorithm::Shuffle,
                Algorithm::LinearCongruential,
            ]
        );
    }

    #[test]
    fn toggle_music_flips_the_muted_flag() {
        let mut session = Session::new(config(), 1);
        let mut events = Vec::new();

        apply(&mut session, Command::ToggleMusic, &mut events);
        assert!(query::is_muted(&session));
        assert_eq!(events, vec![Event::MusicButtonUpdated { muted: true }]);

        events.clear();
        apply(&mut session, Command::ToggleMusic, &mut events);
        assert!(!query::is_muted(&session));
        assert_eq!(events, vec![Event::MusicButtonUpdated { muted: false }]);
    }

    #[test]
    fn muted_sessions_do_not_request_music_on_start() {
        let mut session = Session::new(config(), 1);
        let mut events = Vec::new();
        apply(&mut session, Command::ToggleMusic, &mut events);

        events.clear();
        apply(&mut session, Command::StartGame { entropy: 7 }, &mut events);
        assert!(!events.contains(&Event::MusicStartRequested));
    }

    #[test]
    fn ticks_without_pending_timers_emit_nothing() {
        let mut session = Session::new(config(), 1);
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::Tick {
                dt: Duration::from_secs(30),
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::clock(&session), Duration::from_secs(30));
    }
}
