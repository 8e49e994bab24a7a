#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Neon Snake.
//!
//! The world owns the snake, the food cell, the score, the speed multiplier,
//! the boundary mode and the session phase. It is mutated exclusively through
//! [`apply`], which reports every observable change as an [`Event`].

mod snake;

use neon_snake_core::{
    validate_layout, BoundaryMode, Cell, Collision, Command, ConfigurationError, Event, GridSize,
    SessionPhase, SpeedChangeCause, SpeedMultiplier, SpeedPreset, TailRule, TransitionCause,
    DEFAULT_BASE_TICK_RATE, DEFAULT_GRID_SIZE, DEFAULT_INITIAL_LENGTH, POINTS_PER_FOOD,
    SPEEDUP_SCORE_INTERVAL,
};

use snake::Snake;

/// Represents the authoritative Neon Snake world state.
#[derive(Debug)]
pub struct World {
    grid: GridSize,
    initial_length: u32,
    base_tick_rate: u32,
    tail_rule: TailRule,
    snake: Snake,
    food: Option<Cell>,
    score: u32,
    speed: SpeedMultiplier,
    speed_preset: SpeedPreset,
    mode: BoundaryMode,
    phase: SessionPhase,
    tick_index: u64,
}

impl World {
    /// Creates an idle world laid out with the default grid and snake length.
    ///
    /// No food is placed until a [`Command::PlaceFood`] arrives.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: DEFAULT_GRID_SIZE,
            initial_length: DEFAULT_INITIAL_LENGTH,
            base_tick_rate: DEFAULT_BASE_TICK_RATE,
            tail_rule: TailRule::default(),
            snake: Snake::laid_out(DEFAULT_GRID_SIZE, DEFAULT_INITIAL_LENGTH),
            food: None,
            score: 0,
            speed: SpeedMultiplier::DEFAULT,
            speed_preset: SpeedPreset::default(),
            mode: BoundaryMode::default(),
            phase: SessionPhase::Idle,
            tick_index: 0,
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.snake = Snake::laid_out(self.grid, self.initial_length);
        self.food = None;
        self.score = 0;
        self.speed = self.speed_preset.multiplier();
        self.tick_index = 0;

        out_events.push(Event::SessionReset {
            grid: self.grid,
            initial_length: self.initial_length,
        });
        out_events.push(Event::FoodRequested);
    }

    fn transition(
        &mut self,
        to: SessionPhase,
        cause: TransitionCause,
        out_events: &mut Vec<Event>,
    ) {
        let from = self.phase;
        self.phase = to;
        out_events.push(Event::PhaseChanged { from, to, cause });
    }

    fn step(&mut self, out_events: &mut Vec<Event>) {
        let direction = self.snake.commit_pending();

        let next = match self.grid.advance(self.snake.head(), direction, self.mode) {
            Some(cell) => cell,
            None => {
                self.end(Collision::Wall, out_events);
                return;
            }
        };

        let grows = self.food == Some(next);
        let ignore_tail = self.tail_rule == TailRule::Permissive && !grows;
        if self.snake.occupies(next, ignore_tail) {
            self.end(Collision::Body, out_events);
            return;
        }

        self.snake.advance(next, grows);
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::SnakeAdvanced {
            head: next,
            grew: grows,
        });

        if grows {
            self.consume_food(next, out_events);
        }
    }

    fn consume_food(&mut self, cell: Cell, out_events: &mut Vec<Event>) {
        self.score = self.score.saturating_add(POINTS_PER_FOOD);
        out_events.push(Event::FoodConsumed {
            cell,
            score: self.score,
        });

        if self.score % SPEEDUP_SCORE_INTERVAL == 0 {
            if let Some(faster) = self.speed.accelerated() {
                self.speed = faster;
                out_events.push(Event::SpeedChanged {
                    multiplier: faster,
                    cause: SpeedChangeCause::Automatic,
                });
            }
        }

        self.food = None;
        out_events.push(Event::FoodRequested);
    }

    fn end(&mut self, collision: Collision, out_events: &mut Vec<Event>) {
        self.transition(SessionPhase::GameOver, TransitionCause::Collision, out_events);
        out_events.push(Event::GameOver {
            score: self.score,
            collision,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            size,
            initial_length,
        } => {
            if let Err(reason) = validate_layout(size, initial_length) {
                out_events.push(Event::ConfigurationRejected { reason });
                return;
            }

            world.grid = size;
            world.initial_length = initial_length;
            world.reset(out_events);
            if world.phase != SessionPhase::Idle {
                world.transition(
                    SessionPhase::Idle,
                    TransitionCause::Reconfigured,
                    out_events,
                );
            }
        }
        Command::ConfigureTickRate { base_tick_rate } => {
            if base_tick_rate == 0 {
                out_events.push(Event::ConfigurationRejected {
                    reason: ConfigurationError::ZeroTickRate,
                });
                return;
            }
            world.base_tick_rate = base_tick_rate;
        }
        Command::ConfigureTailRule { rule } => {
            world.tail_rule = rule;
        }
        Command::SetMode { mode } => {
            if world.mode != mode {
                world.mode = mode;
                out_events.push(Event::ModeChanged {
                    mode,
                    toggled: false,
                });
            }
        }
        Command::ToggleMode => {
            world.mode = world.mode.toggled();
            out_events.push(Event::ModeChanged {
                mode: world.mode,
                toggled: true,
            });
        }
        Command::CycleSpeed => {
            let preset = world.speed.next_preset();
            world.speed_preset = preset;
            world.speed = preset.multiplier();
            out_events.push(Event::SpeedChanged {
                multiplier: world.speed,
                cause: SpeedChangeCause::Manual,
            });
        }
        Command::QueueDirection { direction } => match world.snake.queue(direction) {
            Ok(()) => out_events.push(Event::DirectionQueued { direction }),
            Err(reason) => out_events.push(Event::DirectionRejected { direction, reason }),
        },
        Command::Start => match world.phase {
            SessionPhase::Idle | SessionPhase::Paused => {
                world.transition(SessionPhase::Running, TransitionCause::Start, out_events);
            }
            SessionPhase::GameOver => {
                world.reset(out_events);
                world.transition(SessionPhase::Running, TransitionCause::Start, out_events);
            }
            SessionPhase::Running => {}
        },
        Command::Pause => {
            if world.phase == SessionPhase::Running {
                world.transition(SessionPhase::Paused, TransitionCause::Pause, out_events);
            }
        }
        Command::Resume => {
            if world.phase == SessionPhase::Paused {
                world.transition(SessionPhase::Running, TransitionCause::Resume, out_events);
            }
        }
        Command::TogglePause => match world.phase {
            SessionPhase::Running => {
                world.transition(SessionPhase::Paused, TransitionCause::Pause, out_events);
            }
            SessionPhase::Paused => {
                world.transition(SessionPhase::Running, TransitionCause::Resume, out_events);
            }
            SessionPhase::Idle | SessionPhase::GameOver => {}
        },
        Command::Restart => {
            world.reset(out_events);
            world.transition(SessionPhase::Running, TransitionCause::Restart, out_events);
        }
        Command::FocusLost => {
            if world.phase == SessionPhase::Running {
                world.transition(SessionPhase::Paused, TransitionCause::FocusLost, out_events);
            }
        }
        Command::Step => {
            if world.phase == SessionPhase::Running {
                world.step(out_events);
            }
        }
        Command::PlaceFood { cell } => {
            if world.grid.contains(cell) {
                world.food = Some(cell);
                out_events.push(Event::FoodPlaced { cell });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use neon_snake_core::{
        BoundaryMode, Cell, Direction, GridSize, SessionPhase, SpeedMultiplier, SpeedPreset,
        TailRule,
    };

    /// Side length of the active grid.
    #[must_use]
    pub fn grid_size(world: &World) -> GridSize {
        world.grid
    }

    /// Number of segments the snake is laid out with on reset.
    #[must_use]
    pub fn initial_length(world: &World) -> u32 {
        world.initial_length
    }

    /// Snake cells ordered from head to tail.
    #[must_use]
    pub fn snake(world: &World) -> &[Cell] {
        world.snake.segments()
    }

    /// Cell occupied by the snake's head.
    #[must_use]
    pub fn head(world: &World) -> Cell {
        world.snake.head()
    }

    /// Heading applied on the most recent tick.
    #[must_use]
    pub fn direction(world: &World) -> Direction {
        world.snake.direction()
    }

    /// Direction buffered for the next tick, if any.
    #[must_use]
    pub fn pending_direction(world: &World) -> Option<Direction> {
        world.snake.pending_direction()
    }

    /// Cell holding the food item, if one has been placed.
    #[must_use]
    pub fn food(world: &World) -> Option<Cell> {
        world.food
    }

    /// Score accumulated during the current session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Speed multiplier currently in effect.
    #[must_use]
    pub fn speed(world: &World) -> SpeedMultiplier {
        world.speed
    }

    /// Last preset chosen by the player.
    #[must_use]
    pub fn speed_preset(world: &World) -> SpeedPreset {
        world.speed_preset
    }

    /// Boundary mode currently in effect.
    #[must_use]
    pub fn mode(world: &World) -> BoundaryMode {
        world.mode
    }

    /// Current phase of the session state machine.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.phase
    }

    /// Ticks per second at a multiplier of 1.0.
    #[must_use]
    pub fn base_tick_rate(world: &World) -> u32 {
        world.base_tick_rate
    }

    /// Wall-clock time between ticks at the current speed.
    #[must_use]
    pub fn tick_interval(world: &World) -> Duration {
        world.speed.tick_interval(world.base_tick_rate)
    }

    /// Collision rule applied to the tail cell.
    #[must_use]
    pub fn tail_rule(world: &World) -> TailRule {
        world.tail_rule
    }

    /// Number of ticks that moved the snake since the last reset.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
