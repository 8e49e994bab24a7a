#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Food placement system that answers food requests with a free grid cell.

use neon_snake_core::{Cell, Command, Event, GridSize};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of random draws attempted before falling back to a fixed cell.
pub const PLACEMENT_ATTEMPTS: u32 = 5_000;

/// Outcome of a single food placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Cell chosen for the food item.
    pub cell: Cell,
    /// Whether the random search was exhausted and the fallback cell was used.
    ///
    /// The fallback cell is not checked against the snake and may overlap it.
    pub fallback: bool,
}

/// Chooses a cell for the food item that is not covered by `snake`.
///
/// Draws independent uniform coordinates for up to [`PLACEMENT_ATTEMPTS`]
/// attempts, then settles on [`fallback_cell`].
pub fn place_food<R: Rng>(snake: &[Cell], grid: GridSize, rng: &mut R) -> Placement {
    let side = grid.get();
    if side > 0 {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let cell = Cell::new(rng.gen_range(0..side), rng.gen_range(0..side));
            if !snake.contains(&cell) {
                return Placement {
                    cell,
                    fallback: false,
                };
            }
        }
    }

    Placement {
        cell: fallback_cell(grid),
        fallback: true,
    }
}

/// Deterministic cell used once the random search gives up.
///
/// Sits two columns right and one row below the grid centre, clamped to the
/// last row and column.
#[must_use]
pub fn fallback_cell(grid: GridSize) -> Cell {
    let last = grid.get().saturating_sub(1);
    let center = grid.center();
    Cell::new((center.x() + 2).min(last), (center.y() + 1).min(last))
}

/// Pure system that emits [`Command::PlaceFood`] whenever the world asks for food.
#[derive(Debug)]
pub struct FoodPlacement<R = ChaCha8Rng> {
    rng: R,
}

impl FoodPlacement<ChaCha8Rng> {
    /// Creates a food placement system driven by a seeded ChaCha generator.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> FoodPlacement<R> {
    /// Creates a food placement system that draws from the provided generator.
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Consumes events and the current snake to emit food placement commands.
    ///
    /// At most one command is emitted per batch no matter how many requests
    /// the batch contains.
    pub fn handle(
        &mut self,
        events: &[Event],
        grid: GridSize,
        snake: &[Cell],
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::FoodRequested))
        {
            return;
        }

        let placement = place_food(snake, grid, &mut self.rng);
        if placement.fallback {
            log::warn!(
                "food placement exhausted {PLACEMENT_ATTEMPTS} attempts; using fallback cell {}",
                placement.cell
            );
        }
        out.push(Command::PlaceFood {
            cell: placement.cell,
        });
    }
}
