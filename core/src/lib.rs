#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Neon Snake engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

mod speed;

pub use speed::{SpeedMultiplier, SpeedPreset};

/// Side length of the grid used when no configuration is supplied.
pub const DEFAULT_GRID_SIZE: GridSize = GridSize::new(20);

/// Number of segments the snake spawns with when no configuration is supplied.
pub const DEFAULT_INITIAL_LENGTH: u32 = 5;

/// Ticks per second at a speed multiplier of 1.0.
pub const DEFAULT_BASE_TICK_RATE: u32 = 10;

/// Points awarded for every food item eaten.
pub const POINTS_PER_FOOD: u32 = 10;

/// Score interval at which the speed multiplier automatically increases.
pub const SPEEDUP_SCORE_INTERVAL: u32 = 50;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the grid and initial snake length, resetting the session to idle.
    ConfigureGrid {
        /// Side length of the square grid.
        size: GridSize,
        /// Number of segments the snake spawns with.
        initial_length: u32,
    },
    /// Updates the number of ticks per second at a multiplier of 1.0.
    ConfigureTickRate {
        /// Ticks per second before the speed multiplier is applied.
        base_tick_rate: u32,
    },
    /// Selects how the tail cell participates in self-collision checks.
    ConfigureTailRule {
        /// Rule applied from the next tick onwards.
        rule: TailRule,
    },
    /// Sets the boundary mode without treating it as a player toggle.
    SetMode {
        /// Mode that should become active.
        mode: BoundaryMode,
    },
    /// Flips between classic and wrap boundaries.
    ToggleMode,
    /// Advances the manual speed preset to the next entry in the cycle.
    CycleSpeed,
    /// Buffers a direction change for the next tick.
    QueueDirection {
        /// Direction requested by the player.
        direction: Direction,
    },
    /// Starts play, restarting first when the previous session ended.
    Start,
    /// Pauses a running session.
    Pause,
    /// Resumes a paused session.
    Resume,
    /// Pauses a running session or resumes a paused one.
    TogglePause,
    /// Resets the session and immediately starts playing.
    Restart,
    /// Reports that the host window lost focus.
    FocusLost,
    /// Advances the simulation by one tick.
    Step,
    /// Places the food item at the provided cell.
    PlaceFood {
        /// Cell that should hold the food.
        cell: Cell,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Reports that a configuration command was refused.
    ConfigurationRejected {
        /// Specific reason the configuration failed validation.
        reason: ConfigurationError,
    },
    /// Confirms that the session was reinitialised.
    SessionReset {
        /// Grid used by the new session.
        grid: GridSize,
        /// Length of the freshly laid out snake.
        initial_length: u32,
    },
    /// Announces a transition of the session state machine.
    PhaseChanged {
        /// Phase before the transition.
        from: SessionPhase,
        /// Phase after the transition.
        to: SessionPhase,
        /// Trigger responsible for the transition.
        cause: TransitionCause,
    },
    /// Confirms that a direction was buffered for the next tick.
    DirectionQueued {
        /// Direction stored in the pending slot.
        direction: Direction,
    },
    /// Reports that a direction request was discarded.
    DirectionRejected {
        /// Direction that was requested.
        direction: Direction,
        /// Reason the request was discarded.
        reason: DirectionRejection,
    },
    /// Confirms that the snake moved one cell.
    SnakeAdvanced {
        /// Cell occupied by the new head.
        head: Cell,
        /// Whether the tail was kept because food was eaten.
        grew: bool,
    },
    /// Requests that a food placement system choose a new food cell.
    FoodRequested,
    /// Confirms that food now occupies the provided cell.
    FoodPlaced {
        /// Cell holding the food item.
        cell: Cell,
    },
    /// Confirms that the snake ate the food item.
    FoodConsumed {
        /// Cell where the food was eaten.
        cell: Cell,
        /// Score after the food was counted.
        score: u32,
    },
    /// Announces a change of the speed multiplier.
    SpeedChanged {
        /// Multiplier now in effect.
        multiplier: SpeedMultiplier,
        /// Whether the change came from scoring or from the player.
        cause: SpeedChangeCause,
    },
    /// Announces that the boundary mode changed.
    ModeChanged {
        /// Mode now in effect.
        mode: BoundaryMode,
        /// Whether the player toggled the mode or it was configured.
        toggled: bool,
    },
    /// Reports the end of a session.
    GameOver {
        /// Final score of the session.
        score: u32,
        /// Collision that ended the session.
        collision: Collision,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: u32,
    y: u32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Side length of the square play field measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridSize(u32);

impl GridSize {
    /// Smallest grid that can host a snake and a food item.
    pub const MIN: u32 = 2;

    /// Creates a new grid size wrapper.
    #[must_use]
    pub const fn new(side: u32) -> Self {
        Self(side)
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Cell at the integer centre of the grid, rounding towards the origin.
    #[must_use]
    pub const fn center(&self) -> Cell {
        Cell::new(self.0 / 2, self.0 / 2)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x() < self.0 && cell.y() < self.0
    }

    /// Computes the neighbour of `cell` in `direction` under the boundary `mode`.
    ///
    /// Wrap mode folds each axis back into `[0, side)`; classic mode returns
    /// `None` once either axis leaves the grid.
    #[must_use]
    pub fn advance(&self, cell: Cell, direction: Direction, mode: BoundaryMode) -> Option<Cell> {
        let side = i64::from(self.0);
        if side == 0 {
            return None;
        }

        let (dx, dy) = direction.offset();
        let x = i64::from(cell.x()) + i64::from(dx);
        let y = i64::from(cell.y()) + i64::from(dy);

        match mode {
            BoundaryMode::Wrap => Some(Cell::new(
                x.rem_euclid(side) as u32,
                y.rem_euclid(side) as u32,
            )),
            BoundaryMode::Classic => {
                if (0..side).contains(&x) && (0..side).contains(&y) {
                    Some(Cell::new(x as u32, y as u32))
                } else {
                    None
                }
            }
        }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        DEFAULT_GRID_SIZE
    }
}

/// Cardinal movement directions available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Unit offset applied to a cell when moving in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Direction pointing the other way along the same axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Reports whether `other` would reverse this direction.
    #[must_use]
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// Boundary policy applied when the head crosses a grid edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Crossing an edge ends the game.
    #[default]
    Classic,
    /// Crossing an edge teleports the head to the opposite edge.
    Wrap,
}

impl BoundaryMode {
    /// Returns the other boundary mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Classic => Self::Wrap,
            Self::Wrap => Self::Classic,
        }
    }

    /// Human readable name of the mode.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::Wrap => "Wrap",
        }
    }
}

/// Rule deciding whether the current tail cell counts as occupied during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailRule {
    /// The whole pre-move body, tail included, is checked for collisions.
    #[default]
    Strict,
    /// The tail is ignored unless the snake grows on this tick.
    Permissive,
}

/// Phases of the session state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Session prepared but never started.
    #[default]
    Idle,
    /// Ticks are being processed.
    Running,
    /// Play suspended by the player or by focus loss.
    Paused,
    /// Session ended by a collision.
    GameOver,
}

impl SessionPhase {
    /// Reports whether ticks are processed in this phase.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Trigger that caused a session phase transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionCause {
    /// Player pressed start.
    Start,
    /// Player requested a fresh session.
    Restart,
    /// Player paused the session.
    Pause,
    /// Player resumed the session.
    Resume,
    /// Host window lost focus while running.
    FocusLost,
    /// Snake collided with a wall or itself.
    Collision,
    /// Configuration change reinitialised the session.
    Reconfigured,
}

/// Kind of collision that ended a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collision {
    /// Head left the grid in classic mode.
    Wall,
    /// Head entered a cell occupied by the snake's own body.
    Body,
}

/// Reasons a queued direction may be discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectionRejection {
    /// The direction would reverse the current heading.
    Reversal,
    /// A direction is already buffered for this tick.
    AlreadyBuffered,
}

/// Origin of a speed multiplier change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeedChangeCause {
    /// Score reached a multiple of [`SPEEDUP_SCORE_INTERVAL`].
    Automatic,
    /// Player cycled the speed preset.
    Manual,
}

/// Reasons a configuration command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigurationError {
    /// Grid side is below [`GridSize::MIN`].
    GridTooSmall {
        /// Side length that was requested.
        side: u32,
    },
    /// Initial snake length is zero or does not fit left of the grid centre.
    SnakeDoesNotFit {
        /// Length that was requested.
        length: u32,
        /// Side length of the grid.
        side: u32,
    },
    /// Base tick rate must be positive.
    ZeroTickRate,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridTooSmall { side } => {
                write!(f, "grid side must be at least {} (received {side})", GridSize::MIN)
            }
            Self::SnakeDoesNotFit { length, side } => write!(
                f,
                "initial snake length {length} must be between 1 and {} on a {side}x{side} grid",
                max_initial_length(GridSize::new(*side))
            ),
            Self::ZeroTickRate => write!(f, "base tick rate must be positive"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Longest snake that can be laid out horizontally left of the grid centre.
#[must_use]
pub const fn max_initial_length(grid: GridSize) -> u32 {
    grid.get() / 2 + 1
}

/// Checks the grid and snake length against the layout invariants.
pub fn validate_layout(grid: GridSize, initial_length: u32) -> Result<(), ConfigurationError> {
    if grid.get() < GridSize::MIN {
        return Err(ConfigurationError::GridTooSmall { side: grid.get() });
    }

    if initial_length == 0 || initial_length > max_initial_length(grid) {
        return Err(ConfigurationError::SnakeDoesNotFit {
            length: initial_length,
            side: grid.get(),
        });
    }

    Ok(())
}

/// Shape of an oscillator used for procedural sound cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Pure sine tone.
    Sine,
    /// Square wave.
    Square,
    /// Rising sawtooth wave.
    Sawtooth,
    /// Triangle wave.
    Triangle,
}

/// Description of a short procedural tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tone {
    /// Oscillator frequency in hertz.
    pub frequency_hz: u32,
    /// Length of the tone.
    pub duration: Duration,
    /// Oscillator shape.
    pub waveform: Waveform,
}

impl Tone {
    /// Creates a new tone descriptor.
    #[must_use]
    pub const fn new(frequency_hz: u32, duration: Duration, waveform: Waveform) -> Self {
        Self {
            frequency_hz,
            duration,
            waveform,
        }
    }
}

/// Discrete moments that are acknowledged with a sound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player started a session.
    Start,
    /// Player toggled the boundary mode.
    ModeToggle,
    /// Session ended.
    GameOver,
}

impl SoundCue {
    /// Every cue, in a stable order.
    pub const ALL: [SoundCue; 3] = [Self::Start, Self::ModeToggle, Self::GameOver];

    /// Tone played for the cue.
    #[must_use]
    pub const fn tone(self) -> Tone {
        match self {
            Self::Start => Tone::new(880, Duration::from_millis(60), Waveform::Sine),
            Self::ModeToggle => Tone::new(440, Duration::from_millis(80), Waveform::Square),
            Self::GameOver => Tone::new(120, Duration::from_millis(60), Waveform::Sawtooth),
        }
    }
}

/// Immutable view of everything a frame needs to present the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Grid the session is played on.
    pub grid: GridSize,
    /// Snake cells, head first.
    pub snake: Vec<Cell>,
    /// Current food cell, if one is placed.
    pub food: Option<Cell>,
    /// Score of the running session.
    pub score: u32,
    /// Best score observed during the lifetime of the client.
    pub high_score: u32,
    /// Speed multiplier in effect.
    pub speed: SpeedMultiplier,
    /// Last speed preset selected by the player.
    pub speed_preset: SpeedPreset,
    /// Boundary mode in effect.
    pub mode: BoundaryMode,
    /// Phase of the session state machine.
    pub phase: SessionPhase,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_round_trips_through_bincode() {
        assert_round_trip(&Cell::new(7, 13));
    }

    #[test]
    fn boundary_mode_round_trips_through_bincode() {
        assert_round_trip(&BoundaryMode::Wrap);
    }

    #[test]
    fn classic_advance_stops_at_every_edge() {
        let grid = GridSize::new(4);
        let mode = BoundaryMode::Classic;

        assert_eq!(grid.advance(Cell::new(3, 1), Direction::Right, mode), None);
        assert_eq!(grid.advance(Cell::new(0, 1), Direction::Left, mode), None);
        assert_eq!(grid.advance(Cell::new(1, 0), Direction::Up, mode), None);
        assert_eq!(grid.advance(Cell::new(1, 3), Direction::Down, mode), None);
        assert_eq!(
            grid.advance(Cell::new(1, 1), Direction::Right, mode),
            Some(Cell::new(2, 1))
        );
    }

    #[test]
    fn wrap_advance_folds_each_axis_independently() {
        let grid = GridSize::new(4);
        let mode = BoundaryMode::Wrap;

        assert_eq!(
            grid.advance(Cell::new(3, 1), Direction::Right, mode),
            Some(Cell::new(0, 1))
        );
        assert_eq!(
            grid.advance(Cell::new(0, 2), Direction::Left, mode),
            Some(Cell::new(3, 2))
        );
        assert_eq!(
            grid.advance(Cell::new(2, 0), Direction::Up, mode),
            Some(Cell::new(2, 3))
        );
        assert_eq!(
            grid.advance(Cell::new(2, 3), Direction::Down, mode),
            Some(Cell::new(2, 0))
        );
    }

    #[test]
    fn opposite_directions_pair_up() {
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Right.is_opposite(Direction::Right));
    }

    #[test]
    fn layout_validation_rejects_snakes_that_cross_the_left_edge() {
        let grid = GridSize::new(20);
        assert_eq!(validate_layout(grid, 11), Ok(()));
        assert_eq!(
            validate_layout(grid, 12),
            Err(ConfigurationError::SnakeDoesNotFit {
                length: 12,
                side: 20
            })
        );
        assert_eq!(
            validate_layout(grid, 0),
            Err(ConfigurationError::SnakeDoesNotFit { length: 0, side: 20 })
        );
        assert_eq!(
            validate_layout(GridSize::new(1), 1),
            Err(ConfigurationError::GridTooSmall { side: 1 })
        );
    }

    #[test]
    fn sound_cues_match_feedback_tones() {
        assert_eq!(SoundCue::Start.tone().frequency_hz, 880);
        assert_eq!(SoundCue::ModeToggle.tone().waveform, Waveform::Square);
        assert_eq!(
            SoundCue::GameOver.tone().duration,
            Duration::from_millis(60)
        );
    }
}
