#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step game clock that converts frame timestamps into simulation ticks.

use std::time::Duration;

use neon_snake_core::{Command, Event, SessionPhase};

/// Pure system that emits [`Command::Step`] whenever a tick interval elapses.
///
/// The clock is driven by monotonic frame timestamps supplied by the host. It
/// never emits more than one step per frame; time beyond a whole interval is
/// carried into the next tick rather than replayed as a burst.
#[derive(Clone, Debug, Default)]
pub struct GameClock {
    last_tick: Option<Duration>,
}

impl GameClock {
    /// Creates a clock that has not observed any frame yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp the next tick is measured from, if a frame has been observed.
    #[must_use]
    pub fn last_tick(&self) -> Option<Duration> {
        self.last_tick
    }

    /// Consumes one frame worth of events and emits at most one step command.
    ///
    /// `events` must contain everything the world emitted since the previous
    /// frame. A transition into [`SessionPhase::Running`] among them rebases
    /// the clock to `now` and suppresses stepping for this frame.
    pub fn handle(
        &mut self,
        now: Duration,
        events: &[Event],
        phase: SessionPhase,
        tick_interval: Duration,
        out: &mut Vec<Command>,
    ) {
        let last_tick = *self.last_tick.get_or_insert(now);

        let entered_running = events.iter().any(|event| {
            matches!(
                event,
                Event::PhaseChanged {
                    to: SessionPhase::Running,
                    ..
                }
            )
        });
        if entered_running {
            self.last_tick = Some(now);
            return;
        }

        if !phase.is_running() {
            return;
        }

        let elapsed = now.saturating_sub(last_tick);
        if elapsed < tick_interval {
            return;
        }

        out.push(Command::Step);
        self.last_tick = Some(now.saturating_sub(carry(elapsed, tick_interval)));
    }
}

fn carry(elapsed: Duration, interval: Duration) -> Duration {
    let interval_nanos = interval.as_nanos();
    if interval_nanos == 0 {
        return Duration::ZERO;
    }

    let remainder = elapsed.as_nanos() % interval_nanos;
    Duration::from_nanos(u64::try_from(remainder).unwrap_or(u64::MAX))
}
