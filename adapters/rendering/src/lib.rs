#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Escape adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_escape_core::{CellCoord, CellState, Difficulty, Direction, GameState, HslColor};
use std::{error::Error, fmt, time::Duration};

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
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Converts an opaque hue/saturation/lightness color into RGBA.
    #[must_use]
    pub fn from_hsl(hsl: HslColor) -> Self {
        let hue = hsl.hue_degrees().rem_euclid(360.0);
        let saturation = hsl.saturation().clamp(0.0, 1.0);
        let lightness = hsl.lightness().clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let hue_prime = hue / 60.0;
        let secondary = chroma * (1.0 - (hue_prime % 2.0 - 1.0).abs());
        let (red, green, blue) = match hue_prime as u32 {
            0 => (chroma, secondary, 0.0),
            1 => (secondary, chroma, 0.0),
            2 => (0.0, chroma, secondary),
            3 => (0.0, secondary, chroma),
            4 => (secondary, 0.0, chroma),
            _ => (chroma, 0.0, secondary),
        };
        let lift = lightness - chroma / 2.0;

        Self::new(red + lift, green + lift, blue + lift, 1.0)
    }

    /// Returns the same color with a replacement alpha channel.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Logical pixel extent of the drawable stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageSize {
    /// Stage width in logical pixels.
    pub width: f32,
    /// Stage height in logical pixels.
    pub height: f32,
}

impl StageSize {
    /// Square stage matching the classic canvas size.
    pub const DEFAULT: Self = Self::new(600.0, 600.0);

    /// Creates a stage extent from a logical width and height.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for StageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Fill colors used when drawing maze cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MazePalette {
    /// Fill for wall cells.
    pub wall: Color,
    /// Fill for carved corridor cells.
    pub open: Color,
    /// Fill for the start cell.
    pub start: Color,
    /// Fill for the goal cell.
    pub goal: Color,
}

impl MazePalette {
    /// Palette matching the classic browser rendition of the game.
    #[must_use]
    pub const fn classic() -> Self {
        Self {
            wall: Color::from_rgb_u8(0x33, 0x33, 0x33),
            open: Color::from_rgb_u8(0xff, 0xff, 0xff),
            start: Color::from_rgb_u8(0x4c, 0xaf, 0x50),
            goal: Color::from_rgb_u8(0xf4, 0x43, 0x36),
        }
    }

    /// Returns the fill color for one cell state.
    #[must_use]
    pub const fn fill(&self, state: CellState) -> Color {
        match state {
            CellState::Wall => self.wall,
            CellState::Open => self.open,
            CellState::Start => self.start,
            CellState::Goal => self.goal,
        }
    }
}

impl Default for MazePalette {
    fn default() -> Self {
        Self::classic()
    }
}

/// State snapshot of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneCell {
    /// Coordinate of the cell within the grid.
    pub cell: CellCoord,
    /// Carved state of the cell.
    pub state: CellState,
}

impl SceneCell {
    /// Creates a new cell snapshot.
    #[must_use]
    pub const fn new(cell: CellCoord, state: CellState) -> Self {
        Self { cell, state }
    }
}

/// Describes the maze grid rendered in the middle of the stage.
#[derive(Clone, Debug, PartialEq)]
pub struct MazePresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Snapshot of every cell in row-major order.
    pub cells: Vec<SceneCell>,
    /// Fill colors applied per cell state.
    pub palette: MazePalette,
}

impl MazePresentation {
    /// Creates a new maze descriptor.
    ///
    /// Returns an error when either dimension is zero or when `cells` does
    /// not cover the full grid.
    pub fn new(
        columns: u32,
        rows: u32,
        cells: Vec<SceneCell>,
        palette: MazePalette,
    ) -> std::result::Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::InvalidMazeDimensions { columns, rows });
        }

        let expected = columns as usize * rows as usize;
        if cells.len() != expected {
            return Err(RenderingError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            cells,
            palette,
        })
    }

    /// Side length of one square cell, fitted to the smaller stage axis.
    #[must_use]
    pub fn cell_length(&self, stage: StageSize) -> f32 {
        (stage.width / self.columns as f32)
            .min(stage.height / self.rows as f32)
            .floor()
    }

    /// Top-left corner of the maze, centered within the stage.
    #[must_use]
    pub fn origin(&self, stage: StageSize) -> Vec2 {
        let length = self.cell_length(stage);
        Vec2::new(
            (stage.width - self.columns as f32 * length) / 2.0,
            (stage.height - self.rows as f32 * length) / 2.0,
        )
    }

    /// Top-left corner of one cell in stage pixels.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord, stage: StageSize) -> Vec2 {
        let length = self.cell_length(stage);
        self.origin(stage) + Vec2::new(cell.column() as f32 * length, cell.row() as f32 * length)
    }

    /// Center of one cell in stage pixels.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord, stage: StageSize) -> Vec2 {
        let length = self.cell_length(stage);
        self.cell_origin(cell, stage) + Vec2::splat(length / 2.0)
    }
}

/// Player disc drawn on top of its current cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Cell currently occupied by the player.
    pub cell: CellCoord,
    /// Fill color of the disc.
    pub color: Color,
}

impl PlayerPresentation {
    /// Fill color matching the classic browser rendition of the game.
    pub const CLASSIC_FILL: Color = Color::from_rgb_u8(0x00, 0x33, 0x66);

    /// Divisor applied to the cell length to obtain the disc radius.
    pub const RADIUS_DIVISOR: f32 = 2.4;

    /// Creates a new player descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord, color: Color) -> Self {
        Self { cell, color }
    }

    /// Disc radius derived from the cell side length.
    #[must_use]
    pub fn radius(cell_length: f32) -> f32 {
        cell_length / Self::RADIUS_DIVISOR
    }
}

/// Celebration particle drawn above the maze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParticlePresentation {
    /// Filled circle used for firework tracers and embers.
    Disc {
        /// Center position in stage pixels.
        center: Vec2,
        /// Radius in stage pixels.
        radius: f32,
        /// Fill color including any fade alpha.
        color: Color,
    },
    /// Rotated rectangle used for confetti.
    Rect {
        /// Center position in stage pixels.
        center: Vec2,
        /// Width and height in stage pixels.
        size: Vec2,
        /// Rotation around the center in radians.
        rotation: f32,
        /// Fill color.
        color: Color,
    },
}

/// Overlay drawn across the stage while a celebration is running.
#[derive(Clone, Debug, PartialEq)]
pub struct CelebrationPresentation {
    /// Banner text centered near the top of the stage.
    pub banner: String,
    /// Translucent layer drawn over the maze before the particles.
    pub dim: Color,
}

impl CelebrationPresentation {
    /// Dim applied over the maze during celebrations.
    pub const STAGE_DIM: Color = Color::new(0.0, 0.0, 0.0, 0.15);

    /// Creates an overlay with the standard stage dim.
    #[must_use]
    pub fn new<T>(banner: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            banner: banner.into(),
            dim: Self::STAGE_DIM,
        }
    }
}

/// Session status presented by the control panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudPresentation {
    /// Current lifecycle state of the game.
    pub game_state: GameState,
    /// Whole seconds elapsed in the running session.
    pub elapsed_seconds: u64,
    /// Difficulty used for the next new game.
    pub difficulty: Difficulty,
    /// Master volume shown by the audio controls, in `[0.0, 1.0]`.
    pub volume: f32,
}

impl HudPresentation {
    /// Creates a new status descriptor.
    #[must_use]
    pub const fn new(
        game_state: GameState,
        elapsed_seconds: u64,
        difficulty: Difficulty,
        volume: f32,
    ) -> Self {
        Self {
            game_state,
            elapsed_seconds,
            difficulty,
            volume,
        }
    }

    /// Label for the new-game button, which flips while a maze is played.
    #[must_use]
    pub const fn start_button_label(&self) -> &'static str {
        match self.game_state {
            GameState::Playing => "Reset Game",
            GameState::NotStarted | GameState::Won => "Start New Game",
        }
    }

    /// Formats the elapsed play time for the timer label.
    #[must_use]
    pub fn timer_label(&self) -> String {
        format!("Time: {}s", self.elapsed_seconds)
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Movement direction pressed on this frame, the last press winning.
    pub step: Option<Direction>,
    /// Whether the adapter detected a new-game request on this frame.
    pub start_requested: bool,
    /// Difficulty selected from the control panel on this frame.
    pub difficulty_selected: Option<Difficulty>,
    /// Master volume chosen from the control panel on this frame.
    pub volume_selected: Option<f32>,
}

/// Scene description combining the maze, player, and celebration layers.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Stage extent in logical pixels.
    pub stage: StageSize,
    /// Maze grid backdrop.
    pub maze: MazePresentation,
    /// Player disc drawn on its current cell.
    pub player: PlayerPresentation,
    /// Live celebration particles in draw order.
    pub particles: Vec<ParticlePresentation>,
    /// Celebration overlay shown while particles are live.
    pub celebration: Option<CelebrationPresentation>,
    /// Session status mirrored by the control panel.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        stage: StageSize,
        maze: MazePresentation,
        player: PlayerPresentation,
        particles: Vec<ParticlePresentation>,
        celebration: Option<CelebrationPresentation>,
        hud: HudPresentation,
    ) -> Self {
        Self {
            stage,
            maze,
            player,
            particles,
            celebration,
            hud,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Escape scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered, allowing adapters to animate world snapshots
    /// deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Maze dimensions must both be positive.
    InvalidMazeDimensions {
        /// Number of columns supplied by the caller.
        columns: u32,
        /// Number of rows supplied by the caller.
        rows: u32,
    },
    /// Cell snapshots must cover the full grid.
    CellCountMismatch {
        /// Cell count implied by the grid dimensions.
        expected: usize,
        /// Cell count actually supplied.
        actual: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMazeDimensions { columns, rows } => {
                write!(
                    f,
                    "maze dimensions must be positive (received {columns}x{rows})"
                )
            }
            Self::CellCountMismatch { expected, actual } => {
                write!(
                    f,
                    "cell snapshots must cover the grid (expected {expected}, received {actual})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
