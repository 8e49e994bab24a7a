use neon_snake_core::{Cell, Direction, DirectionRejection, GridSize};

/// Ordered snake body together with its heading and buffered input.
#[derive(Clone, Debug)]
pub(crate) struct Snake {
    segments: Vec<Cell>,
    direction: Direction,
    pending: Option<Direction>,
}

impl Snake {
    /// Lays the snake out horizontally, head at the grid centre, facing right.
    ///
    /// Callers must validate `length` against the grid beforehand.
    pub(crate) fn laid_out(grid: GridSize, length: u32) -> Self {
        let center = grid.center();
        let segments = (0..length)
            .map(|index| Cell::new(center.x().saturating_sub(index), center.y()))
            .collect();

        Self {
            segments,
            direction: Direction::Right,
            pending: None,
        }
    }

    pub(crate) fn segments(&self) -> &[Cell] {
        &self.segments
    }

    pub(crate) fn head(&self) -> Cell {
        self.segments[0]
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn pending_direction(&self) -> Option<Direction> {
        self.pending
    }

    /// Stores `direction` for the next tick. The first accepted request wins.
    pub(crate) fn queue(&mut self, direction: Direction) -> Result<(), DirectionRejection> {
        if self.pending.is_some() {
            return Err(DirectionRejection::AlreadyBuffered);
        }

        if self.direction.is_opposite(direction) {
            return Err(DirectionRejection::Reversal);
        }

        self.pending = Some(direction);
        Ok(())
    }

    /// Promotes the buffered direction, if any, and returns the heading for this tick.
    pub(crate) fn commit_pending(&mut self) -> Direction {
        if let Some(direction) = self.pending.take() {
            self.direction = direction;
        }
        self.direction
    }

    /// Reports whether `cell` is covered by the body, optionally ignoring the tail.
    pub(crate) fn occupies(&self, cell: Cell, ignore_tail: bool) -> bool {
        let body = if ignore_tail && self.segments.len() > 1 {
            &self.segments[..self.segments.len() - 1]
        } else {
            &self.segments[..]
        };
        body.contains(&cell)
    }

    /// Prepends `head` and drops the tail unless the snake grows.
    pub(crate) fn advance(&mut self, head: Cell, grow: bool) {
        self.segments.insert(0, head);
        if !grow {
            let _ = self.segments.pop();
        }
    }
}
