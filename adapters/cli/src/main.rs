#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Neon Snake experience.

mod config;

use std::{cell::RefCell, fs::File, path::PathBuf, rc::Rc};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use neon_snake_core::{BoundaryMode, TailRule, Tone};
use neon_snake_rendering::{
    compose_scene, FrameFeedback, FrameInput, OverlayPresentation, Palette, Presentation,
    RenderingBackend,
};
use neon_snake_rendering_macroquad::MacroquadBackend;
use neon_snake_session::{AudioSink, GameSession, Overlay, TITLE};
use neon_snake_storage::{JsonFileStore, KeyValueStore};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use self::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Classic,
    Wrap,
}

impl From<ModeArg> for BoundaryMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Classic => BoundaryMode::Classic,
            ModeArg::Wrap => BoundaryMode::Wrap,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "neon-snake", version, about = "Neon-styled grid snake")]
struct Args {
    /// TOML file providing default settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of cells along each edge of the grid.
    #[arg(long)]
    grid_size: Option<u32>,
    /// Number of segments the snake spawns with.
    #[arg(long)]
    initial_length: Option<u32>,
    /// Ticks per second at normal speed.
    #[arg(long)]
    base_tick_rate: Option<u32>,
    /// Boundary mode of the first session.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Lets the head move into the cell the tail is vacating.
    #[arg(long)]
    permissive_tail: bool,
    /// Seed for food placement.
    #[arg(long)]
    seed: Option<u64>,
    /// JSON file the high score is stored in.
    #[arg(long)]
    storage: Option<PathBuf>,
    /// Side length of the square play field in logical units.
    #[arg(long)]
    logical_size: Option<f32>,
    /// Minimum severity of logged messages.
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
    /// Writes logs to this file instead of the terminal.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Synchronises presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    vsync: bool,
    /// Logs frame timing once per second.
    #[arg(long)]
    show_fps: bool,
}

impl Args {
    fn overrides(&self) -> GameConfig {
        GameConfig {
            grid_size: self.grid_size,
            initial_snake_length: self.initial_length,
            base_tick_rate: self.base_tick_rate,
            mode: self.mode.map(BoundaryMode::from),
            tail_rule: self.permissive_tail.then_some(TailRule::Permissive),
            logical_size: self.logical_size,
            seed: self.seed,
            storage_path: self.storage.clone(),
        }
    }
}

/// Overlay that records the latest request for the next composed scene.
#[derive(Clone, Debug, Default)]
struct SceneOverlay(Rc<RefCell<Option<OverlayPresentation>>>);

impl SceneOverlay {
    fn current(&self) -> Option<OverlayPresentation> {
        self.0.borrow().clone()
    }
}

impl Overlay for SceneOverlay {
    fn show_overlay(&mut self, title: &str, message: &str) {
        *self.0.borrow_mut() = Some(OverlayPresentation::new(title, message));
    }

    fn hide_overlay(&mut self) {
        *self.0.borrow_mut() = None;
    }
}

/// Audio sink that hands tones to the rendering backend at the end of the frame.
#[derive(Clone, Debug, Default)]
struct QueuedAudio(Rc<RefCell<Vec<Tone>>>);

impl QueuedAudio {
    fn drain(&self) -> Vec<Tone> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl AudioSink for QueuedAudio {
    fn play_sound(&mut self, tone: Tone) -> Result<()> {
        self.0.borrow_mut().push(tone);
        Ok(())
    }
}

/// Entry point for the Neon Snake command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level, args.log_file.as_ref())?;

    let file_config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let resolved = file_config.merge(args.overrides()).validate()?;
    let seed = resolved.seed.unwrap_or_else(rand::random);
    log::info!(
        "starting {}x{} grid, length {}, {} ticks/s, {} mode, seed {seed}",
        resolved.grid_size.get(),
        resolved.grid_size.get(),
        resolved.initial_length,
        resolved.base_tick_rate,
        resolved.mode.label(),
    );

    let overlay = SceneOverlay::default();
    let audio = QueuedAudio::default();
    let store = JsonFileStore::new(&resolved.storage_path);
    log::info!("high scores stored in {}", store.path().display());

    let mut session = GameSession::new(
        resolved.session_config(seed),
        overlay.clone(),
        audio.clone(),
        store,
    )?;

    let palette = Palette::neon();
    let logical_size = resolved.logical_size;
    let scene = compose_scene(
        &session.snapshot(),
        overlay.current().as_ref(),
        &palette,
        logical_size,
    )?;

    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps);

    backend.run(Presentation::new(TITLE, scene), move |now, input, scene| {
        apply_frame_input(&mut session, input);
        session.frame(now);

        match compose_scene(
            &session.snapshot(),
            overlay.current().as_ref(),
            &palette,
            logical_size,
        ) {
            Ok(next) => *scene = next,
            Err(error) => log::error!("failed to compose scene: {error}"),
        }

        FrameFeedback {
            sounds: audio.drain(),
        }
    })
}

fn init_logging(level: LevelFilter, log_file: Option<&PathBuf>) -> Result<()> {
    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            WriteLogger::init(level, Config::default(), file)
        }
        None => TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
    };
    installed.context("failed to initialise logging")
}

/// Forwards one frame of player input to the session.
///
/// Focus loss is applied first so a stalled frame never steers a paused snake
/// into a wall.
fn apply_frame_input<O, A, S>(session: &mut GameSession<O, A, S>, input: FrameInput)
where
    O: Overlay,
    A: AudioSink,
    S: KeyValueStore,
{
    let FrameInput {
        directions,
        start,
        toggle_pause,
        resume,
        restart,
        cycle_speed,
        toggle_mode,
        focus_lost,
    } = input;

    if focus_lost {
        session.focus_lost();
    }
    for direction in directions {
        session.queue_direction(direction);
    }
    if start {
        session.start();
    }
    if toggle_pause {
        session.toggle_pause();
    }
    if resume {
        session.resume();
    }
    if restart {
        session.restart();
    }
    if cycle_speed {
        session.cycle_speed();
    }
    if toggle_mode {
        session.toggle_mode();
    }
}
