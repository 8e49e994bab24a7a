use neon_snake_core::{
    BoundaryMode, Cell, Collision, Command, Direction, DirectionRejection, Event, GridSize,
    SessionPhase, SpeedChangeCause, SpeedMultiplier, TailRule, TransitionCause,
};
use neon_snake_world::{self as world, query, World};

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn running_world() -> World {
    let mut world = World::new();
    let _ = run(&mut world, Command::Start);
    world
}

fn cell_ahead(world: &World) -> Cell {
    query::grid_size(world)
        .advance(
            query::head(world),
            query::direction(world),
            query::mode(world),
        )
        .expect("cell ahead is inside the grid")
}

#[test]
fn classic_mode_ends_on_the_tick_that_leaves_the_grid() {
    let mut world = running_world();
    assert_eq!(query::head(&world), Cell::new(10, 10));

    for _ in 0..9 {
        let events = run(&mut world, Command::Step);
        assert!(matches!(
            events.as_slice(),
            [Event::SnakeAdvanced { grew: false, .. }]
        ));
    }
    assert_eq!(query::head(&world), Cell::new(19, 10));
    let before: Vec<Cell> = query::snake(&world).to_vec();

    let events = run(&mut world, Command::Step);

    assert_eq!(
        events,
        vec![
            Event::PhaseChanged {
                from: SessionPhase::Running,
                to: SessionPhase::GameOver,
                cause: TransitionCause::Collision,
            },
            Event::GameOver {
                score: 0,
                collision: Collision::Wall,
            },
        ]
    );
    assert_eq!(query::snake(&world), before.as_slice());
    assert_eq!(query::phase(&world), SessionPhase::GameOver);
}

#[test]
fn wrap_mode_returns_to_the_starting_column_after_a_full_lap() {
    let mut world = running_world();
    let _ = run(
        &mut world,
        Command::SetMode {
            mode: BoundaryMode::Wrap,
        },
    );
    let start = query::head(&world);

    for _ in 0..20 {
        let _ = run(&mut world, Command::Step);
    }

    assert_eq!(query::head(&world), start);
    assert_eq!(query::phase(&world), SessionPhase::Running);
}

#[test]
fn fifth_food_raises_the_multiplier_once() {
    let mut world = running_world();

    for eaten in 1..=5 {
        let food = cell_ahead(&world);
        let _ = run(&mut world, Command::PlaceFood { cell: food });
        let events = run(&mut world, Command::Step);

        let speed_changes: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, Event::SpeedChanged { .. }))
            .collect();

        if eaten < 5 {
            assert!(speed_changes.is_empty(), "unexpected speed-up at {eaten}");
            assert_eq!(query::speed(&world), SpeedMultiplier::DEFAULT);
        } else {
            assert_eq!(
                speed_changes,
                vec![&Event::SpeedChanged {
                    multiplier: SpeedMultiplier::from_tenths(12),
                    cause: SpeedChangeCause::Automatic,
                }]
            );
        }
        assert!(events.contains(&Event::FoodRequested));
        assert_eq!(query::food(&world), None);
    }

    assert_eq!(query::score(&world), 50);
    assert_eq!(query::snake(&world).len(), 10);

    let _ = run(&mut world, Command::Step);
    assert_eq!(query::speed(&world), SpeedMultiplier::from_tenths(12));
}

#[test]
fn growth_keeps_the_tail() {
    let mut world = running_world();
    let tail = *query::snake(&world).last().expect("snake has a tail");
    let food = cell_ahead(&world);
    let _ = run(&mut world, Command::PlaceFood { cell: food });

    let events = run(&mut world, Command::Step);

    assert_eq!(
        &events[..2],
        &[
            Event::SnakeAdvanced {
                head: food,
                grew: true,
            },
            Event::FoodConsumed {
                cell: food,
                score: 10,
            },
        ]
    );
    assert_eq!(query::snake(&world).last(), Some(&tail));
    assert_eq!(query::snake(&world).len(), 6);
}

fn coil_towards_tail(rule: TailRule) -> World {
    let mut world = World::new();
    let _ = run(
        &mut world,
        Command::ConfigureGrid {
            size: GridSize::new(10),
            initial_length: 4,
        },
    );
    let _ = run(&mut world, Command::ConfigureTailRule { rule });
    let _ = run(&mut world, Command::Start);

    for direction in [Direction::Up, Direction::Left] {
        let _ = run(&mut world, Command::QueueDirection { direction });
        let _ = run(&mut world, Command::Step);
    }
    let _ = run(
        &mut world,
        Command::QueueDirection {
            direction: Direction::Down,
        },
    );
    world
}

#[test]
fn strict_rule_treats_the_departing_tail_as_occupied() {
    let mut world = coil_towards_tail(TailRule::Strict);
    assert_eq!(query::tail_rule(&world), TailRule::Strict);
    let before: Vec<Cell> = query::snake(&world).to_vec();

    let events = run(&mut world, Command::Step);

    assert_eq!(query::phase(&world), SessionPhase::GameOver);
    assert_eq!(
        events.last(),
        Some(&Event::GameOver {
            score: 0,
            collision: Collision::Body,
        })
    );
    assert_eq!(query::snake(&world), before.as_slice());
}

#[test]
fn permissive_rule_allows_chasing_the_tail() {
    let mut world = coil_towards_tail(TailRule::Permissive);
    assert_eq!(query::tail_rule(&world), TailRule::Permissive);
    let _ = run(&mut world, Command::Step);

    assert_eq!(query::phase(&world), SessionPhase::Running);
    assert_eq!(query::head(&world), Cell::new(4, 5));
}

#[test]
fn speed_stops_increasing_at_the_ceiling() {
    let mut world = World::new();
    let _ = run(
        &mut world,
        Command::ConfigureGrid {
            size: GridSize::new(200),
            initial_length: 5,
        },
    );
    let _ = run(&mut world, Command::Start);

    let mut changes = Vec::new();
    for _ in 0..60 {
        let cell = cell_ahead(&world);
        let _ = run(&mut world, Command::PlaceFood { cell });
        for event in run(&mut world, Command::Step) {
            if let Event::SpeedChanged { multiplier, cause } = event {
                assert_eq!(cause, SpeedChangeCause::Automatic);
                changes.push((query::score(&world), multiplier));
            }
        }
    }

    assert_eq!(query::phase(&world), SessionPhase::Running);
    assert_eq!(query::score(&world), 600);
    assert_eq!(query::speed(&world), SpeedMultiplier::MAX);
    assert_eq!(changes.len(), 10);
    assert_eq!(changes.last(), Some(&(500, SpeedMultiplier::MAX)));
}

#[test]
fn reversal_and_second_input_are_rejected() {
    let mut world = running_world();

    assert_eq!(
        run(
            &mut world,
            Command::QueueDirection {
                direction: Direction::Left,
            }
        ),
        vec![Event::DirectionRejected {
            direction: Direction::Left,
            reason: DirectionRejection::Reversal,
        }]
    );
    assert_eq!(
        run(
            &mut world,
            Command::QueueDirection {
                direction: Direction::Up,
            }
        ),
        vec![Event::DirectionQueued {
            direction: Direction::Up,
        }]
    );
    assert_eq!(
        run(
            &mut world,
            Command::QueueDirection {
                direction: Direction::Left,
            }
        ),
        vec![Event::DirectionRejected {
            direction: Direction::Left,
            reason: DirectionRejection::AlreadyBuffered,
        }]
    );
}

#[test]
fn steps_are_ignored_outside_running() {
    let mut world = World::new();
    assert!(run(&mut world, Command::Step).is_empty());

    let _ = run(&mut world, Command::Start);
    let _ = run(&mut world, Command::Pause);
    let head = query::head(&world);
    assert!(run(&mut world, Command::Step).is_empty());
    assert_eq!(query::head(&world), head);
}

#[test]
fn phase_transitions_follow_the_state_machine() {
    let mut world = World::new();

    assert!(run(&mut world, Command::TogglePause).is_empty());
    assert!(run(&mut world, Command::Resume).is_empty());

    assert_eq!(
        run(&mut world, Command::Start),
        vec![Event::PhaseChanged {
            from: SessionPhase::Idle,
            to: SessionPhase::Running,
            cause: TransitionCause::Start,
        }]
    );
    assert!(run(&mut world, Command::Start).is_empty());

    assert_eq!(
        run(&mut world, Command::FocusLost),
        vec![Event::PhaseChanged {
            from: SessionPhase::Running,
            to: SessionPhase::Paused,
            cause: TransitionCause::FocusLost,
        }]
    );
    assert!(run(&mut world, Command::FocusLost).is_empty());

    assert_eq!(
        run(&mut world, Command::TogglePause),
        vec![Event::PhaseChanged {
            from: SessionPhase::Paused,
            to: SessionPhase::Running,
            cause: TransitionCause::Resume,
        }]
    );
}

#[test]
fn start_after_game_over_resets_the_session() {
    let mut world = running_world();
    let food = cell_ahead(&world);
    let _ = run(&mut world, Command::PlaceFood { cell: food });
    while query::phase(&world) == SessionPhase::Running {
        let _ = run(&mut world, Command::Step);
    }
    assert_eq!(query::score(&world), 10);

    let events = run(&mut world, Command::Start);

    assert_eq!(events[0], Event::SessionReset {
        grid: GridSize::new(20),
        initial_length: 5,
    });
    assert!(events.contains(&Event::FoodRequested));
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::head(&world), Cell::new(10, 10));
    assert_eq!(query::phase(&world), SessionPhase::Running);
}

#[test]
fn reset_restores_selected_preset_and_keeps_mode() {
    let mut world = running_world();
    let _ = run(&mut world, Command::CycleSpeed);
    let _ = run(&mut world, Command::ToggleMode);
    assert_eq!(query::speed(&world), SpeedMultiplier::from_tenths(15));

    let _ = run(&mut world, Command::Restart);

    assert_eq!(query::speed(&world), SpeedMultiplier::from_tenths(15));
    assert_eq!(query::mode(&world), BoundaryMode::Wrap);
    assert_eq!(query::phase(&world), SessionPhase::Running);
}
