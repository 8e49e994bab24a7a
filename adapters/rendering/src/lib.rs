#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Neon Snake adapters.
//!
//! Scenes are composed from a [`SessionSnapshot`] by the pure
//! [`compose_scene`] function and then handed to a [`RenderingBackend`],
//! which owns the window, draws the scene and gathers player input.

use anyhow::Result as AnyResult;
use glam::Vec2;
use neon_snake_core::{Cell, Direction, SessionSnapshot, Tone};
use std::{error::Error, fmt, time::Duration};

/// Side length of the square logical drawing surface.
pub const DEFAULT_LOGICAL_SIZE: f32 = 600.0;

/// Gap left between a cell's edge and the filled square drawn inside it.
pub const CELL_INSET: f32 = 2.0;

/// Minimum blur radius applied to glowing cells.
pub const MIN_GLOW_RADIUS: f32 = 8.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Linearly interpolates between `self` and `other`.
    #[must_use]
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |from: f32, to: f32| from + (to - from) * t;

        Self {
            red: mix(self.red, other.red),
            green: mix(self.green, other.green),
            blue: mix(self.blue, other.blue),
            alpha: mix(self.alpha, other.alpha),
        }
    }
}

/// Colors used to compose a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Fill used to clear every frame.
    pub background: Color,
    /// Color of the faint grid lines.
    pub grid_line: Color,
    /// Fill of every body segment.
    pub snake_body: Color,
    /// Starting color of the head gradient.
    pub snake_head: Color,
    /// Fill of the food cell.
    pub food: Color,
    /// Glow emitted by the head and the food.
    pub glow: Color,
    /// Small highlight drawn in the centre of the food cell.
    pub food_highlight: Color,
    /// Translucent panel behind the HUD text.
    pub hud_panel: Color,
    /// HUD text color.
    pub hud_text: Color,
    /// Backdrop dimming the scene behind the overlay.
    pub overlay_backdrop: Color,
    /// Overlay title and message color.
    pub overlay_text: Color,
    /// Background of the control panel.
    pub control_panel: Color,
}

impl Palette {
    /// Dark neon palette.
    #[must_use]
    pub fn neon() -> Self {
        Self {
            background: Color::from_rgb_u8(0x06, 0x10, 0x16),
            grid_line: Color::new(1.0, 1.0, 1.0, 0.02),
            snake_body: Color::from_rgb_u8(0x00, 0xf5, 0xa0),
            snake_head: Color::from_rgb_u8(0x7c, 0x5c, 0xff),
            food: Color::from_rgb_u8(0xff, 0x4d, 0x7e),
            glow: Color::from_rgb_u8(0x7c, 0x5c, 0xff).with_alpha(0.15),
            food_highlight: Color::new(1.0, 1.0, 1.0, 0.06),
            hud_panel: Color::new(1.0, 1.0, 1.0, 0.04),
            hud_text: Color::new(1.0, 1.0, 1.0, 0.7),
            overlay_backdrop: Color::from_rgb_u8(0x02, 0x06, 0x0a).with_alpha(0.72),
            overlay_text: Color::from_rgb_u8(0xe6, 0xf7, 0xff),
            control_panel: Color::from_rgb_u8(0x0b, 0x1a, 0x24),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::neon()
    }
}

/// Describes the square play field in logical units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of cells along each edge.
    pub side: u32,
    /// Side length of a single cell in logical units.
    pub cell_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl GridPresentation {
    /// Creates a grid descriptor whose cells evenly fit within `logical_size`.
    ///
    /// The cell length is rounded down to whole logical units. Returns an error
    /// when the grid is empty or the cells would collapse to zero length.
    pub fn new(side: u32, logical_size: f32, line_color: Color) -> Result<Self, RenderingError> {
        if side == 0 {
            return Err(RenderingError::EmptyGrid);
        }

        let cell_length = (logical_size / side as f32).floor();
        if !cell_length.is_finite() || cell_length < 1.0 {
            return Err(RenderingError::CellTooSmall {
                side,
                logical_size: logical_size.max(0.0) as u32,
            });
        }

        Ok(Self {
            side,
            cell_length,
            line_color,
        })
    }

    /// Total side length covered by the cells.
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.side as f32 * self.cell_length
    }

    /// Top-left corner of `cell` in logical units.
    #[must_use]
    pub fn cell_origin(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            cell.x() as f32 * self.cell_length,
            cell.y() as f32 * self.cell_length,
        )
    }

    /// Offsets of the `side + 1` grid lines along either axis.
    ///
    /// Each line is offset by half a logical unit.
    pub fn line_offsets(&self) -> impl Iterator<Item = f32> + '_ {
        (0..=self.side).map(move |index| index as f32 * self.cell_length + 0.5)
    }
}

/// Soft halo drawn around a cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    /// Halo color.
    pub color: Color,
    /// Blur radius in logical units.
    pub radius: f32,
}

/// Single snake segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentPresentation {
    /// Cell occupied by the segment.
    pub cell: Cell,
    /// Fill color, or the gradient start for the head.
    pub fill: Color,
    /// Gradient end color running diagonally across the cell, if any.
    pub gradient_to: Option<Color>,
    /// Optional halo.
    pub glow: Option<Glow>,
    /// Whether the segment is the head.
    pub head: bool,
}

/// Food item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoodPresentation {
    /// Cell holding the food.
    pub cell: Cell,
    /// Fill color.
    pub fill: Color,
    /// Halo around the food.
    pub glow: Glow,
    /// Color of the inner highlight covering the middle 40% of the cell.
    pub highlight: Color,
}

/// Single line of HUD text.
#[derive(Clone, Debug, PartialEq)]
pub struct HudLine {
    /// Text to draw.
    pub text: String,
    /// Baseline origin in logical units.
    pub position: Vec2,
}

/// Heads-up display drawn over the top-left corner of the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct HudPresentation {
    /// Top-left corner of the translucent panel.
    pub panel_origin: Vec2,
    /// Size of the translucent panel.
    pub panel_size: Vec2,
    /// Panel fill.
    pub panel_color: Color,
    /// Text color.
    pub text_color: Color,
    /// Font size in logical units.
    pub font_size: f32,
    /// Lines to draw.
    pub lines: Vec<HudLine>,
}

/// Modal message drawn on top of the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayPresentation {
    /// Headline text.
    pub title: String,
    /// Secondary text.
    pub message: String,
}

impl OverlayPresentation {
    /// Creates a new overlay descriptor.
    #[must_use]
    pub fn new<T, M>(title: T, message: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Side panel hosting the session buttons.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlPanelView {
    /// Width of the panel in screen pixels.
    pub width: f32,
    /// Background color of the panel.
    pub background: Color,
    /// Current score label.
    pub score_label: String,
    /// High score label.
    pub best_label: String,
    /// Label of the speed cycling button.
    pub speed_label: String,
    /// Label of the mode toggle button.
    pub mode_label: String,
}

impl ControlPanelView {
    /// Default width of the control panel in screen pixels.
    pub const DEFAULT_WIDTH: f32 = 220.0;
}

/// Scene description combining the grid, snake, food, HUD and overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Side length of the logical drawing surface.
    pub logical_size: f32,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Grid geometry and line color.
    pub grid: GridPresentation,
    /// Food item, if placed.
    pub food: Option<FoodPresentation>,
    /// Snake segments ordered from tail to head so the head is drawn last.
    pub snake: Vec<SegmentPresentation>,
    /// Heads-up display.
    pub hud: HudPresentation,
    /// Modal overlay, if visible.
    pub overlay: Option<OverlayPresentation>,
    /// Backdrop dimming the scene behind the overlay.
    pub overlay_backdrop: Color,
    /// Overlay text color.
    pub overlay_text: Color,
    /// Side panel hosting the session buttons.
    pub control_panel: ControlPanelView,
}

/// Composes a scene for the provided session snapshot.
///
/// The function is pure; adapters call it once per frame.
pub fn compose_scene(
    snapshot: &SessionSnapshot,
    overlay: Option<&OverlayPresentation>,
    palette: &Palette,
    logical_size: f32,
) -> Result<Scene, RenderingError> {
    let grid = GridPresentation::new(snapshot.grid.get(), logical_size, palette.grid_line)?;
    let glow_radius = (grid.cell_length * 0.6).max(MIN_GLOW_RADIUS);
    let glow = Glow {
        color: palette.glow,
        radius: glow_radius,
    };

    let food = snapshot.food.map(|cell| FoodPresentation {
        cell,
        fill: palette.food,
        glow,
        highlight: palette.food_highlight,
    });

    let snake = snapshot
        .snake
        .iter()
        .enumerate()
        .rev()
        .map(|(index, cell)| {
            if index == 0 {
                SegmentPresentation {
                    cell: *cell,
                    fill: palette.snake_head,
                    gradient_to: Some(palette.snake_body),
                    glow: Some(glow),
                    head: true,
                }
            } else {
                SegmentPresentation {
                    cell: *cell,
                    fill: palette.snake_body,
                    gradient_to: None,
                    glow: None,
                    head: false,
                }
            }
        })
        .collect();

    let hud = HudPresentation {
        panel_origin: Vec2::new(10.0, 10.0),
        panel_size: Vec2::new(210.0, 52.0),
        panel_color: palette.hud_panel,
        text_color: palette.hud_text,
        font_size: 14.0,
        lines: vec![
            HudLine {
                text: format!("Score: {}", snapshot.score),
                position: Vec2::new(20.0, 32.0),
            },
            HudLine {
                text: format!("Speed {}", snapshot.speed),
                position: Vec2::new(120.0, 32.0),
            },
            HudLine {
                text: format!("Mode: {}", snapshot.mode.label()),
                position: Vec2::new(20.0, 54.0),
            },
            HudLine {
                text: format!("Best: {}", snapshot.high_score),
                position: Vec2::new(120.0, 54.0),
            },
        ],
    };

    let control_panel = ControlPanelView {
        width: ControlPanelView::DEFAULT_WIDTH,
        background: palette.control_panel,
        score_label: format!("Score: {}", snapshot.score),
        best_label: format!("Best: {}", snapshot.high_score),
        speed_label: format!("Speed: {}", snapshot.speed_preset.label()),
        mode_label: format!("Mode: {}", snapshot.mode.label()),
    };

    Ok(Scene {
        logical_size,
        clear_color: palette.background,
        grid,
        food,
        snake,
        hud,
        overlay: overlay.cloned(),
        overlay_backdrop: palette.overlay_backdrop,
        overlay_text: palette.overlay_text,
        control_panel,
    })
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Scene content that should be displayed first.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Direction requests in the order they were observed.
    pub directions: Vec<Direction>,
    /// Start was requested.
    pub start: bool,
    /// Pause toggle was requested.
    pub toggle_pause: bool,
    /// Resume was requested.
    pub resume: bool,
    /// Restart was requested.
    pub restart: bool,
    /// Speed cycling was requested.
    pub cycle_speed: bool,
    /// Boundary mode toggle was requested.
    pub toggle_mode: bool,
    /// The window lost focus since the previous frame.
    pub focus_lost: bool,
}

/// Output produced by the scene update closure for the backend to act on.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameFeedback {
    /// Tones the backend should play this frame.
    pub sounds: Vec<Tone>,
}

/// Rendering backend capable of presenting Neon Snake scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the monotonic time elapsed
    /// since the backend started, the input captured during the frame, and may
    /// replace the scene before it is rendered. The returned feedback lists the
    /// sounds to play.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameFeedback + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The grid must contain at least one cell.
    EmptyGrid,
    /// The logical surface is too small to give every cell a positive length.
    CellTooSmall {
        /// Number of cells along each edge.
        side: u32,
        /// Logical surface size that failed validation.
        logical_size: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must contain at least one cell"),
            Self::CellTooSmall { side, logical_size } => write!(
                f,
                "a logical size of {logical_size} cannot fit {side} cells per edge"
            ),
        }
    }
}

impl Error for RenderingError {}
