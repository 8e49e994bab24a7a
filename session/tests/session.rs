use std::{io, time::Duration};

use neon_snake_core::{
    BoundaryMode, Cell, Direction, GridSize, SessionPhase, SoundCue, SpeedPreset, Tone,
};
use neon_snake_session::{AudioSink, GameSession, Overlay, SessionConfig};
use neon_snake_storage::{KeyValueStore, MemoryStore, StorageError, HIGH_SCORE_KEY};
use neon_snake_world::query;

#[derive(Debug, Default)]
struct RecordingOverlay {
    history: Vec<(String, String)>,
    visible: bool,
}

impl RecordingOverlay {
    fn last(&self) -> Option<(&str, &str)> {
        self.history
            .last()
            .map(|(title, message)| (title.as_str(), message.as_str()))
    }
}

impl Overlay for RecordingOverlay {
    fn show_overlay(&mut self, title: &str, message: &str) {
        self.history.push((title.to_owned(), message.to_owned()));
        self.visible = true;
    }

    fn hide_overlay(&mut self) {
        self.visible = false;
    }
}

#[derive(Debug, Default)]
struct RecordingAudio {
    tones: Vec<Tone>,
    broken: bool,
}

impl AudioSink for RecordingAudio {
    fn play_sound(&mut self, tone: Tone) -> anyhow::Result<()> {
        if self.broken {
            anyhow::bail!("audio device unavailable");
        }
        self.tones.push(tone);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(Some("0".to_owned()))
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io {
            path: "readonly.json".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

type TestSession<S = MemoryStore> = GameSession<RecordingOverlay, RecordingAudio, S>;

fn session_with<S: KeyValueStore>(store: S) -> GameSession<RecordingOverlay, RecordingAudio, S> {
    GameSession::new(
        SessionConfig::default(),
        RecordingOverlay::default(),
        RecordingAudio::default(),
        store,
    )
    .expect("default configuration is valid")
}

fn session() -> TestSession {
    session_with(MemoryStore::new())
}

struct Host {
    now: Duration,
}

impl Host {
    fn new() -> Self {
        Self {
            now: Duration::from_secs(1),
        }
    }

    fn frame<S: KeyValueStore>(&mut self, session: &mut TestSession<S>) {
        self.now += session.tick_interval();
        session.frame(self.now);
    }

    fn eat_one<S: KeyValueStore>(&mut self, session: &mut TestSession<S>) {
        let score = session.score();
        for _ in 0..400 {
            if session.score() > score {
                return;
            }
            let snapshot = session.snapshot();
            let head = snapshot.snake[0];
            let food = snapshot.food.expect("food is always placed");
            let wanted = if head.x() != food.x() {
                Direction::Right
            } else {
                Direction::Down
            };
            if wanted != query::direction(session.world()) {
                session.queue_direction(wanted);
            }
            self.frame(session);
        }
        panic!("snake never reached the food");
    }

    fn run_until_game_over<S: KeyValueStore>(&mut self, session: &mut TestSession<S>) {
        for _ in 0..100 {
            if session.phase() == SessionPhase::GameOver {
                return;
            }
            self.frame(session);
        }
        panic!("session never ended");
    }
}

#[test]
fn construction_shows_title_and_places_food() {
    let mut store = MemoryStore::new();
    store.set_item(HIGH_SCORE_KEY, "70").expect("seed store");
    let session = session_with(store);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.high_score, 70);
    assert_eq!(snapshot.grid, GridSize::new(20));
    let food = snapshot.food.expect("food placed on construction");
    assert!(!snapshot.snake.contains(&food));
    assert_eq!(
        session.overlay().last(),
        Some(("Neon Snake", "Press Start to play"))
    );
    assert!(session.overlay().visible);
}

#[test]
fn invalid_configuration_is_rejected() {
    let config = SessionConfig {
        grid_size: GridSize::new(6),
        initial_length: 5,
        ..SessionConfig::default()
    };
    let result = GameSession::new(
        config,
        RecordingOverlay::default(),
        RecordingAudio::default(),
        MemoryStore::new(),
    );
    assert!(result.is_err());
}

#[test]
fn start_hides_overlay_and_plays_start_tone() {
    let mut session = session();
    session.start();

    assert_eq!(session.phase(), SessionPhase::Running);
    assert!(!session.overlay().visible);
    assert_eq!(session.audio().tones, vec![SoundCue::Start.tone()]);
}

#[test]
fn pause_overlays_name_their_cause() {
    let mut session = session();
    session.start();

    session.toggle_pause();
    assert_eq!(
        session.overlay().last(),
        Some(("Paused", "Press Resume to continue"))
    );

    session.resume();
    assert!(!session.overlay().visible);

    session.focus_lost();
    assert_eq!(session.phase(), SessionPhase::Paused);
    assert_eq!(
        session.overlay().last(),
        Some(("Paused", "Window lost focus"))
    );
    assert_eq!(session.audio().tones.len(), 1, "resume is silent");
}

#[test]
fn paused_frames_do_not_tick_and_resume_waits_a_full_interval() {
    let mut session = session();
    let mut host = Host::new();
    session.start();
    host.frame(&mut session);
    host.frame(&mut session);
    let head = session.snapshot().snake[0];
    assert_eq!(head, Cell::new(11, 10));

    session.pause();
    for _ in 0..10 {
        host.frame(&mut session);
    }
    assert_eq!(session.snapshot().snake[0], head);

    session.resume();
    host.frame(&mut session);
    assert_eq!(session.snapshot().snake[0], head, "resume frame rebases");

    session.frame(host.now + session.tick_interval() / 2);
    assert_eq!(session.snapshot().snake[0], head);

    host.frame(&mut session);
    assert_eq!(session.snapshot().snake[0], Cell::new(12, 10));
}

#[test]
fn game_over_persists_a_new_record() {
    let mut session = session();
    let mut host = Host::new();
    session.toggle_mode();
    session.start();
    host.frame(&mut session);

    host.eat_one(&mut session);
    assert_eq!(session.score(), 10);

    session.toggle_mode();
    assert_eq!(session.snapshot().mode, BoundaryMode::Classic);
    host.run_until_game_over(&mut session);

    let score = session.score();
    assert!(score >= 10);
    assert_eq!(session.high_score(), score);
    assert_eq!(
        session.store().get_item(HIGH_SCORE_KEY).expect("read"),
        Some(score.to_string())
    );
    let message = format!("Score: {score}");
    assert_eq!(session.overlay().last(), Some(("Game Over", message.as_str())));

    let tones = &session.audio().tones;
    assert_eq!(tones.first(), Some(&SoundCue::ModeToggle.tone()));
    assert_eq!(tones.last(), Some(&SoundCue::GameOver.tone()));
}

#[test]
fn scores_that_do_not_beat_the_record_are_not_written() {
    let mut store = MemoryStore::new();
    store.set_item(HIGH_SCORE_KEY, "500").expect("seed store");
    let mut session = session_with(store);
    let mut host = Host::new();
    session.start();
    host.frame(&mut session);
    host.run_until_game_over(&mut session);

    assert_eq!(session.high_score(), 500);
    assert_eq!(
        session.store().get_item(HIGH_SCORE_KEY).expect("read"),
        Some("500".to_owned())
    );
    let message = format!("Score: {}", session.score());
    assert_eq!(session.overlay().last(), Some(("Game Over", message.as_str())));
}

#[test]
fn persistence_and_audio_failures_are_swallowed() {
    let mut session = GameSession::new(
        SessionConfig {
            mode: BoundaryMode::Wrap,
            ..SessionConfig::default()
        },
        RecordingOverlay::default(),
        RecordingAudio {
            broken: true,
            ..RecordingAudio::default()
        },
        ReadOnlyStore,
    )
    .expect("valid configuration");
    let mut host = Host::new();
    session.start();
    host.frame(&mut session);
    host.eat_one(&mut session);
    session.toggle_mode();
    host.run_until_game_over(&mut session);

    assert!(session.score() >= 10);
    assert_eq!(session.high_score(), session.score());
    assert!(session.audio().tones.is_empty());
    assert_eq!(session.phase(), SessionPhase::GameOver);
}

#[test]
fn start_after_game_over_begins_a_fresh_session() {
    let mut session = session();
    let mut host = Host::new();
    session.start();
    host.frame(&mut session);
    host.run_until_game_over(&mut session);

    session.start();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Running);
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.snake[0], Cell::new(10, 10));
    assert!(snapshot.food.is_some());
    assert_eq!(session.audio().tones.last(), Some(&SoundCue::Start.tone()));
}

#[test]
fn speed_preset_survives_restart() {
    let mut session = session();
    session.start();
    session.cycle_speed();
    assert_eq!(session.snapshot().speed_preset, SpeedPreset::Fast);
    assert_eq!(session.tick_interval(), Duration::from_micros(66_666));

    session.restart();

    assert_eq!(session.snapshot().speed_preset, SpeedPreset::Fast);
    assert_eq!(session.tick_interval(), Duration::from_micros(66_666));
    assert_eq!(session.phase(), SessionPhase::Running);
}
