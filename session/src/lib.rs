#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session orchestration for Neon Snake.
//!
//! [`GameSession`] owns the authoritative world, the pure systems and the
//! collaborators supplied by the host. Every player intent enters through one
//! of its methods, is translated into [`Command`] values and pumped through the
//! world and the systems until no further commands are produced. The session
//! then reacts to the resulting events by driving the overlay, the audio sink
//! and the persistent store.

use std::time::Duration;

use neon_snake_core::{
    validate_layout, BoundaryMode, Command, ConfigurationError, Direction, Event, GridSize,
    SessionPhase, SessionSnapshot, SoundCue, TailRule, Tone, TransitionCause,
    DEFAULT_BASE_TICK_RATE, DEFAULT_GRID_SIZE, DEFAULT_INITIAL_LENGTH,
};
use neon_snake_storage::{read_high_score, write_high_score, KeyValueStore};
use neon_snake_system_clock::GameClock;
use neon_snake_system_food_placement::FoodPlacement;
use neon_snake_system_high_score::HighScoreTracker;
use neon_snake_world::{self as world, query, World};

/// Title shown before the first session starts.
pub const TITLE: &str = "Neon Snake";

/// Seed used when the host does not supply one.
pub const DEFAULT_SEED: u64 = 0x6e65_6f6e_5f73_6e6b;

/// Host surface that can display a modal title and message.
pub trait Overlay {
    /// Shows the overlay with the provided title and message.
    fn show_overlay(&mut self, title: &str, message: &str);

    /// Hides the overlay.
    fn hide_overlay(&mut self);
}

/// Host facility that plays short procedural tones.
pub trait AudioSink {
    /// Plays `tone` without blocking the caller.
    fn play_sound(&mut self, tone: Tone) -> anyhow::Result<()>;
}

/// Audio sink that discards every tone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_sound(&mut self, tone: Tone) -> anyhow::Result<()> {
        log::debug!("muted tone at {} Hz", tone.frequency_hz);
        Ok(())
    }
}

/// Parameters used to construct a [`GameSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Side length of the square grid.
    pub grid_size: GridSize,
    /// Number of segments the snake spawns with.
    pub initial_length: u32,
    /// Ticks per second at a speed multiplier of 1.0.
    pub base_tick_rate: u32,
    /// Boundary mode the first session starts in.
    pub mode: BoundaryMode,
    /// Collision rule applied to the tail cell.
    pub tail_rule: TailRule,
    /// Seed for food placement.
    pub seed: u64,
}

impl SessionConfig {
    /// Checks the configuration against the world invariants.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_layout(self.grid_size, self.initial_length)?;
        if self.base_tick_rate == 0 {
            return Err(ConfigurationError::ZeroTickRate);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            initial_length: DEFAULT_INITIAL_LENGTH,
            base_tick_rate: DEFAULT_BASE_TICK_RATE,
            mode: BoundaryMode::Classic,
            tail_rule: TailRule::Strict,
            seed: DEFAULT_SEED,
        }
    }
}

/// Single-player snake session bound to host collaborators.
#[derive(Debug)]
pub struct GameSession<O, A, S> {
    world: World,
    clock: GameClock,
    food: FoodPlacement,
    high_score: HighScoreTracker,
    overlay: O,
    audio: A,
    store: S,
    frame_events: Vec<Event>,
}

impl<O, A, S> GameSession<O, A, S>
where
    O: Overlay,
    A: AudioSink,
    S: KeyValueStore,
{
    /// Creates an idle session, loading the persisted high score from `store`.
    ///
    /// The overlay is shown with the title screen and food is placed
    /// immediately.
    pub fn new(
        config: SessionConfig,
        overlay: O,
        audio: A,
        store: S,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let best = read_high_score(&store);
        log::info!("loaded high score {best}");

        let mut session = Self {
            world: World::new(),
            clock: GameClock::new(),
            food: FoodPlacement::new(config.seed),
            high_score: HighScoreTracker::new(best),
            overlay,
            audio,
            store,
            frame_events: Vec::new(),
        };

        session.dispatch(vec![
            Command::ConfigureTickRate {
                base_tick_rate: config.base_tick_rate,
            },
            Command::ConfigureTailRule {
                rule: config.tail_rule,
            },
            Command::SetMode { mode: config.mode },
            Command::ConfigureGrid {
                size: config.grid_size,
                initial_length: config.initial_length,
            },
        ]);
        session.overlay.show_overlay(TITLE, "Press Start to play");

        Ok(session)
    }

    /// Buffers a direction change for the next tick.
    pub fn queue_direction(&mut self, direction: Direction) {
        self.dispatch(vec![Command::QueueDirection { direction }]);
    }

    /// Starts play, restarting when the previous session ended.
    pub fn start(&mut self) {
        self.dispatch(vec![Command::Start]);
    }

    /// Pauses a running session.
    pub fn pause(&mut self) {
        self.dispatch(vec![Command::Pause]);
    }

    /// Resumes a paused session.
    pub fn resume(&mut self) {
        self.dispatch(vec![Command::Resume]);
    }

    /// Pauses or resumes depending on the current phase.
    pub fn toggle_pause(&mut self) {
        self.dispatch(vec![Command::TogglePause]);
    }

    /// Resets the session and starts playing immediately.
    pub fn restart(&mut self) {
        self.dispatch(vec![Command::Restart]);
    }

    /// Reports that the host window lost focus.
    pub fn focus_lost(&mut self) {
        self.dispatch(vec![Command::FocusLost]);
    }

    /// Switches to the next manual speed preset.
    pub fn cycle_speed(&mut self) {
        self.dispatch(vec![Command::CycleSpeed]);
    }

    /// Flips between classic and wrap boundaries.
    pub fn toggle_mode(&mut self) {
        self.dispatch(vec![Command::ToggleMode]);
    }

    /// Advances the session clock to the host timestamp `now`.
    ///
    /// Performs at most one simulation tick.
    pub fn frame(&mut self, now: Duration) {
        let events = std::mem::take(&mut self.frame_events);
        let mut commands = Vec::new();
        self.clock.handle(
            now,
            &events,
            query::phase(&self.world),
            query::tick_interval(&self.world),
            &mut commands,
        );
        self.dispatch(commands);
    }

    /// Captures everything required to present the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            grid: query::grid_size(&self.world),
            snake: query::snake(&self.world).to_vec(),
            food: query::food(&self.world),
            score: query::score(&self.world),
            high_score: self.high_score.best(),
            speed: query::speed(&self.world),
            speed_preset: query::speed_preset(&self.world),
            mode: query::mode(&self.world),
            phase: query::phase(&self.world),
        }
    }

    /// Current phase of the session state machine.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        query::phase(&self.world)
    }

    /// Score of the current session.
    #[must_use]
    pub fn score(&self) -> u32 {
        query::score(&self.world)
    }

    /// Best score observed by this client.
    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    /// Wall-clock time between ticks at the current speed.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        query::tick_interval(&self.world)
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Overlay collaborator supplied at construction.
    #[must_use]
    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Audio collaborator supplied at construction.
    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Persistent store supplied at construction.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn dispatch(&mut self, initial: Vec<Command>) {
        let mut pending = initial;
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            if events.is_empty() {
                break;
            }

            self.react(&events);
            self.food.handle(
                &events,
                query::grid_size(&self.world),
                query::snake(&self.world),
                &mut pending,
            );
            self.frame_events.extend(events);
        }
    }

    fn react(&mut self, events: &[Event]) {
        if let Some(best) = self.high_score.handle(events) {
            if let Err(error) = write_high_score(&mut self.store, best) {
                log::warn!("failed to persist high score {best}: {error}");
            }
        }

        for event in events {
            match event {
                Event::PhaseChanged { from, to, cause } => {
                    log::debug!("phase {from:?} -> {to:?} ({cause:?})");
                    self.react_to_phase(*to, *cause);
                }
                Event::GameOver { score, collision } => {
                    log::info!("game over after {collision:?} collision with score {score}");
                    self.overlay
                        .show_overlay("Game Over", &format!("Score: {score}"));
                    self.play(SoundCue::GameOver);
                }
                Event::ModeChanged { mode, toggled } => {
                    log::info!("boundary mode set to {}", mode.label());
                    if *toggled {
                        self.play(SoundCue::ModeToggle);
                    }
                }
                Event::SpeedChanged { multiplier, cause } => {
                    log::info!("speed {multiplier} ({cause:?})");
                }
                Event::FoodConsumed { cell, score } => {
                    log::debug!("food eaten at {cell}, score {score}");
                }
                Event::ConfigurationRejected { reason } => {
                    log::warn!("configuration rejected: {reason}");
                }
                Event::SessionReset { .. }
                | Event::DirectionQueued { .. }
                | Event::DirectionRejected { .. }
                | Event::SnakeAdvanced { .. }
                | Event::FoodRequested
                | Event::FoodPlaced { .. } => {}
            }
        }
    }

    fn react_to_phase(&mut self, to: SessionPhase, cause: TransitionCause) {
        match (to, cause) {
            (SessionPhase::Running, cause) => {
                self.overlay.hide_overlay();
                if cause == TransitionCause::Start {
                    self.play(SoundCue::Start);
                }
            }
            (SessionPhase::Paused, TransitionCause::FocusLost) => {
                self.overlay.show_overlay("Paused", "Window lost focus");
            }
            (SessionPhase::Paused, _) => {
                self.overlay
                    .show_overlay("Paused", "Press Resume to continue");
            }
            (SessionPhase::Idle, _) => {
                self.overlay.show_overlay(TITLE, "Press Start to play");
            }
            (SessionPhase::GameOver, _) => {}
        }
    }

    fn play(&mut self, cue: SoundCue) {
        if let Err(error) = self.audio.play_sound(cue.tone()) {
            log::warn!("failed to play {cue:?} cue: {error:#}");
        }
    }
}
