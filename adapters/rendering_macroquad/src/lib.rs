#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Neon Snake.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Enable this crate's `audio` feature to synthesise
//! and play sound cues; without it tones are only logged.
//!
//! The adapter uses Macroquad's immediate-mode UI module so the control panel
//! can host the session buttons. All UI-specific calls live inside the local
//! `ui` module to avoid leaking Macroquad UI types throughout the renderer.

pub mod audio;
mod ui;

use self::ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiResult};
use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use neon_snake_core::Direction;
use neon_snake_rendering::{
    Color, FoodPresentation, FrameFeedback, FrameInput, GridPresentation, HudPresentation,
    OverlayPresentation, Presentation, RenderingBackend, Scene, SegmentPresentation, CELL_INSET,
};
use std::{collections::VecDeque, time::Duration};

/// Gap between two frames after which the window is assumed to have lost focus.
pub const FOCUS_LOSS_THRESHOLD: Duration = Duration::from_millis(500);

/// Number of bands used along each axis when approximating the head gradient.
const GRADIENT_BANDS: usize = 6;

/// Number of translucent layers used to approximate a glow.
const GLOW_LAYERS: usize = 4;

/// Action requested through the control panel.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlPanelAction {
    /// The start button was pressed.
    Start,
    /// The pause button was pressed.
    TogglePause,
    /// The resume button was pressed.
    Resume,
    /// The restart button was pressed.
    Restart,
    /// The speed button was pressed.
    CycleSpeed,
    /// The mode button was pressed.
    ToggleMode,
    /// A direction pad button was pressed.
    Steer(Direction),
}

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct ControlPanelInputState {
    latched: FrameInput,
}

impl ControlPanelInputState {
    /// Records that a control-panel button was pressed this frame.
    pub fn register(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::Start => self.latched.start = true,
            ControlPanelAction::TogglePause => self.latched.toggle_pause = true,
            ControlPanelAction::Resume => self.latched.resume = true,
            ControlPanelAction::Restart => self.latched.restart = true,
            ControlPanelAction::CycleSpeed => self.latched.cycle_speed = true,
            ControlPanelAction::ToggleMode => self.latched.toggle_mode = true,
            ControlPanelAction::Steer(direction) => self.latched.directions.push(direction),
        }
    }

    /// Returns every latched request and clears the latches so each action fires only once.
    pub fn take(&mut self) -> FrameInput {
        std::mem::take(&mut self.latched)
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct KeyboardShortcuts {
    /// `Escape` quits the game loop.
    quit_requested: bool,
    /// Arrow keys and `WASD`.
    directions: Vec<Direction>,
    /// `Enter` starts a session.
    start: bool,
    /// `Space` pauses or resumes.
    toggle_pause: bool,
    /// `R` restarts.
    restart: bool,
    /// `V` cycles the speed preset.
    cycle_speed: bool,
    /// `M` toggles the boundary mode.
    toggle_mode: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let bindings = [
            (KeyCode::Up, Direction::Up),
            (KeyCode::W, Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::S, Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::A, Direction::Left),
            (KeyCode::Right, Direction::Right),
            (KeyCode::D, Direction::Right),
        ];
        let directions = bindings
            .into_iter()
            .filter(|(key, _)| is_key_pressed(*key))
            .map(|(_, direction)| direction)
            .collect();

        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            directions,
            start: is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter),
            toggle_pause: is_key_pressed(KeyCode::Space),
            restart: is_key_pressed(KeyCode::R),
            cycle_speed: is_key_pressed(KeyCode::V),
            toggle_mode: is_key_pressed(KeyCode::M),
        }
    }
}

/// Detects focus loss from stalls between consecutive frames.
///
/// Browsers and most desktop compositors stop scheduling frames for hidden
/// windows, so a long gap is reported as a lost focus on the first frame after
/// the window comes back.
///
/// Only stalls are observed. A window that loses keyboard focus but keeps
/// receiving frames, such as an unobscured desktop window behind another
/// application, is never reported and the game keeps running.
#[derive(Clone, Copy, Debug, Default)]
struct FocusMonitor {
    last_frame: Option<Duration>,
}

impl FocusMonitor {
    fn observe(&mut self, now: Duration) -> bool {
        let previous = self.last_frame.replace(now);
        previous
            .map(|previous| now.saturating_sub(previous) > FOCUS_LOSS_THRESHOLD)
            .unwrap_or(false)
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    update: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += breakdown.update;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update: self.update_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameFeedback + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            scene,
        } = presentation;

        let side = scene.logical_size.round().max(1.0) as i32;
        let mut config = macroquad::window::Conf {
            window_title,
            window_width: side + scene.control_panel.width.round() as i32,
            window_height: side,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut fps_counter = FpsCounter::default();
            let mut focus = FocusMonitor::default();
            let mut control_panel_input = ControlPanelInputState::default();
            #[cfg(feature = "audio")]
            let mut sound_bank = audio::SoundBank::preload().await;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    log::info!("quit requested");
                    break;
                }

                let now = Duration::from_secs_f64(macroquad::time::get_time().max(0.0));
                let focus_lost = focus.observe(now);
                let frame_input = gather_frame_input_from_observations(
                    control_panel_input.take(),
                    keyboard,
                    focus_lost,
                );

                let update_start = macroquad::time::get_time();
                let feedback = update_scene(now, frame_input, &mut scene);
                let update_duration = seconds_since(update_start);

                #[cfg(feature = "audio")]
                sound_bank.play(&feedback.sounds).await;
                #[cfg(not(feature = "audio"))]
                for tone in &feedback.sounds {
                    log::debug!("audio disabled, skipping {} Hz tone", tone.frequency_hz);
                }

                let render_start = macroquad::time::get_time();
                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                macroquad::window::clear_background(to_macroquad_color(scene.clear_color));
                draw_grid(&scene.grid, &metrics);
                if let Some(food) = &scene.food {
                    draw_food(food, &scene.grid, &metrics);
                }
                for segment in &scene.snake {
                    draw_segment(segment, &scene.grid, &metrics);
                }
                draw_hud(&scene.hud, &metrics);
                if let Some(overlay) = &scene.overlay {
                    draw_overlay(overlay, &scene, &metrics);
                }

                let panel_context = draw_control_panel(&scene, screen_width, screen_height);
                if let Some(panel_context) = panel_context {
                    let mut control_panel_ui = macroquad::ui::root_ui();
                    let ControlPanelUiResult { actions } =
                        draw_control_panel_ui(&mut control_panel_ui, panel_context);
                    for action in actions {
                        control_panel_input.register(action);
                    }
                }

                let render_duration = seconds_since(render_start);
                let frame_breakdown = FrameBreakdown {
                    frame: Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0)),
                    update: update_duration,
                    render: render_duration,
                };

                let fps_metrics = fps_counter.record_frame(frame_breakdown);
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_update,
                        avg_render,
                    }) = fps_metrics
                    {
                        log::info!(
                            "FPS: {:.2} (10s avg: {:.2}) | update: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_update.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn seconds_since(start: f64) -> Duration {
    Duration::from_secs_f64((macroquad::time::get_time() - start).max(0.0))
}

/// Maps the square logical surface onto the part of the screen left of the control panel.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    panel_width: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world = scene.logical_size;
        let panel_width = scene.control_panel.width.max(0.0).min(screen_width);
        let available_width = (screen_width - panel_width).max(0.0);
        let scale = if world <= f32::EPSILON {
            1.0
        } else {
            (available_width / world).min(screen_height / world).max(0.0)
        };

        let scaled = world * scale;
        let offset_x = ((available_width - scaled) * 0.5).max(0.0);
        let offset_y = ((screen_height - scaled) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
            panel_width,
        }
    }

    fn to_screen(&self, logical: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + logical.x * self.scale,
            self.offset_y + logical.y * self.scale,
        )
    }

    fn length(&self, logical: f32) -> f32 {
        logical * self.scale
    }
}

/// Screen-space rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ScreenRect {
    origin: Vec2,
    size: Vec2,
}

impl ScreenRect {
    fn expanded(self, amount: f32) -> Self {
        Self {
            origin: self.origin - Vec2::splat(amount),
            size: self.size + Vec2::splat(amount * 2.0),
        }
    }
}

/// Screen rectangle covered by `cell` after the inset is applied.
fn inset_cell_rect(
    cell: neon_snake_core::Cell,
    grid: &GridPresentation,
    metrics: &SceneMetrics,
) -> ScreenRect {
    let origin = grid.cell_origin(cell) + Vec2::splat(CELL_INSET);
    let side = (grid.cell_length - CELL_INSET * 2.0).max(1.0);
    ScreenRect {
        origin: metrics.to_screen(origin),
        size: Vec2::splat(metrics.length(side)),
    }
}

fn gather_frame_input_from_observations(
    panel: FrameInput,
    keyboard: KeyboardShortcuts,
    focus_lost: bool,
) -> FrameInput {
    let mut directions = panel.directions;
    directions.extend(keyboard.directions);

    FrameInput {
        directions,
        start: panel.start || keyboard.start,
        toggle_pause: panel.toggle_pause || keyboard.toggle_pause,
        resume: panel.resume,
        restart: panel.restart || keyboard.restart,
        cycle_speed: panel.cycle_speed || keyboard.cycle_speed,
        toggle_mode: panel.toggle_mode || keyboard.toggle_mode,
        focus_lost: panel.focus_lost || focus_lost,
    }
}

fn draw_grid(grid: &GridPresentation, metrics: &SceneMetrics) {
    let color = to_macroquad_color(grid.line_color);
    let extent = grid.extent();
    let thickness = metrics.length(1.0).max(1.0);

    for offset in grid.line_offsets() {
        let start = metrics.to_screen(Vec2::new(offset, 0.0));
        let end = metrics.to_screen(Vec2::new(offset, extent));
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, thickness, color);

        let start = metrics.to_screen(Vec2::new(0.0, offset));
        let end = metrics.to_screen(Vec2::new(extent, offset));
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, thickness, color);
    }
}

fn draw_rect(rect: ScreenRect, color: Color) {
    macroquad::shapes::draw_rectangle(
        rect.origin.x,
        rect.origin.y,
        rect.size.x,
        rect.size.y,
        to_macroquad_color(color),
    );
}

/// Approximates a blurred halo with concentric translucent rectangles.
fn draw_glow(rect: ScreenRect, glow: neon_snake_rendering::Glow, metrics: &SceneMetrics) {
    let radius = metrics.length(glow.radius);
    for layer in (1..=GLOW_LAYERS).rev() {
        let fraction = layer as f32 / GLOW_LAYERS as f32;
        let alpha = glow.color.alpha * (1.0 - fraction + 1.0 / GLOW_LAYERS as f32);
        draw_rect(rect.expanded(radius * fraction * 0.5), glow.color.with_alpha(alpha));
    }
}

fn draw_food(food: &FoodPresentation, grid: &GridPresentation, metrics: &SceneMetrics) {
    let rect = inset_cell_rect(food.cell, grid, metrics);
    draw_glow(rect, food.glow, metrics);
    draw_rect(rect, food.fill);

    let origin = grid.cell_origin(food.cell) + Vec2::splat(grid.cell_length * 0.3);
    draw_rect(
        ScreenRect {
            origin: metrics.to_screen(origin),
            size: Vec2::splat(metrics.length(grid.cell_length * 0.4)),
        },
        food.highlight,
    );
}

fn draw_segment(segment: &SegmentPresentation, grid: &GridPresentation, metrics: &SceneMetrics) {
    let rect = inset_cell_rect(segment.cell, grid, metrics);
    if let Some(glow) = segment.glow {
        draw_glow(rect, glow, metrics);
    }

    let Some(to) = segment.gradient_to else {
        draw_rect(rect, segment.fill);
        return;
    };

    let band = rect.size / GRADIENT_BANDS as f32;
    for row in 0..GRADIENT_BANDS {
        for column in 0..GRADIENT_BANDS {
            let color = gradient_color(segment.fill, to, column, row, GRADIENT_BANDS);
            draw_rect(
                ScreenRect {
                    origin: rect.origin + Vec2::new(column as f32 * band.x, row as f32 * band.y),
                    size: band,
                },
                color,
            );
        }
    }
}

/// Color of the band at (`column`, `row`) in a top-left to bottom-right gradient.
fn gradient_color(from: Color, to: Color, column: usize, row: usize, bands: usize) -> Color {
    if bands <= 1 {
        return from;
    }
    let t = (column + row) as f32 / ((bands - 1) * 2) as f32;
    from.lerp(to, t)
}

fn draw_text(text: &str, position: Vec2, font_size: f32, color: Color) {
    let _ = macroquad::text::draw_text(
        text,
        position.x,
        position.y,
        font_size,
        to_macroquad_color(color),
    );
}

fn draw_hud(hud: &HudPresentation, metrics: &SceneMetrics) {
    let origin = metrics.to_screen(hud.panel_origin);
    draw_rect(
        ScreenRect {
            origin,
            size: hud.panel_size * metrics.scale,
        },
        hud.panel_color,
    );

    let font_size = metrics.length(hud.font_size).max(1.0);
    for line in &hud.lines {
        draw_text(
            &line.text,
            metrics.to_screen(line.position),
            font_size,
            hud.text_color,
        );
    }
}

fn draw_overlay(overlay: &OverlayPresentation, scene: &Scene, metrics: &SceneMetrics) {
    let size = scene.logical_size;
    draw_rect(
        ScreenRect {
            origin: metrics.to_screen(Vec2::ZERO),
            size: Vec2::splat(metrics.length(size)),
        },
        scene.overlay_backdrop,
    );

    let title_size = metrics.length(36.0).max(1.0);
    let message_size = metrics.length(18.0).max(1.0);
    let center = metrics.to_screen(Vec2::splat(size * 0.5));

    let title = macroquad::text::measure_text(&overlay.title, None, title_size as u16, 1.0);
    draw_text(
        &overlay.title,
        Vec2::new(center.x - title.width * 0.5, center.y - metrics.length(8.0)),
        title_size,
        scene.overlay_text,
    );

    let message = macroquad::text::measure_text(&overlay.message, None, message_size as u16, 1.0);
    draw_text(
        &overlay.message,
        Vec2::new(center.x - message.width * 0.5, center.y + metrics.length(24.0)),
        message_size,
        scene.overlay_text.with_alpha(0.8),
    );
}

fn draw_control_panel(
    scene: &Scene,
    screen_width: f32,
    screen_height: f32,
) -> Option<ControlPanelUiContext> {
    let panel = &scene.control_panel;
    if panel.width <= f32::EPSILON {
        return None;
    }

    let left = (screen_width - panel.width).max(0.0);
    let background_color = to_macroquad_color(panel.background);
    macroquad::shapes::draw_rectangle(left, 0.0, panel.width, screen_height, background_color);

    Some(ControlPanelUiContext {
        origin: MacroquadVec2::new(left, 0.0),
        size: MacroquadVec2::new(panel.width, screen_height),
        background: background_color,
        score_label: panel.score_label.clone(),
        best_label: panel.best_label.clone(),
        speed_label: panel.speed_label.clone(),
        mode_label: panel.mode_label.clone(),
    })
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
