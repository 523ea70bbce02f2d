#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Escape game.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new event batches of their own.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Banner drawn across the maze while a celebration is running.
pub const CELEBRATION_BANNER: &str = "CONGRATULATIONS!";

/// Notice surfaced to the player once the celebration has fully drained.
pub const COMPLETION_NOTICE: &str = "You solved the maze! Great job!";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Discards the current session and carves a fresh maze.
    NewGame {
        /// Dimensions of the maze to carve, already normalized to odd values.
        dimensions: GridDimensions,
        /// Seed fed to the maze generator for reproducible layouts.
        seed: u64,
    },
    /// Requests that the player advance one cell in the given direction.
    Move {
        /// Direction of the attempted step.
        direction: Direction,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world and by systems after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that a fresh maze was carved and the session reset.
    MazeGenerated {
        /// Dimensions of the newly carved maze.
        dimensions: GridDimensions,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before the step.
        from: CellCoord,
        /// Cell the player occupies after the step.
        to: CellCoord,
    },
    /// Announces that the player reached the goal. Fires once per session.
    MazeSolved {
        /// Simulated time spent in the Playing state.
        elapsed: Duration,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that the celebration drained its last particle and went idle.
    CelebrationFinished,
    /// Asks the audio adapter to play a sound cue.
    AudioCueRequested {
        /// Cue that should be played.
        cue: AudioCue,
    },
}

/// Sound cues the celebration system may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Short melodic cheer played once when a celebration starts.
    Cheer,
    /// Low boom played once per explosion burst.
    Boom,
}

/// Classification of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Solid cell that blocks movement.
    Wall,
    /// Carved passage the player may occupy.
    Open,
    /// Carved cell where every session begins.
    Start,
    /// Carved cell that ends the session when entered.
    Goal,
}

impl CellState {
    /// Reports whether the player may occupy this cell.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
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

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the neighboring cell one step away in the given direction.
    ///
    /// Steps that would leave the non-negative coordinate space yield `None`;
    /// upper bounds are the grid's concern, not the coordinate's.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (column, row) = match direction {
            Direction::Up => (Some(self.column), self.row.checked_sub(1)),
            Direction::Down => (Some(self.column), self.row.checked_add(1)),
            Direction::Left => (self.column.checked_sub(1), Some(self.row)),
            Direction::Right => (self.column.checked_add(1), Some(self.row)),
        };
        Some(Self::new(column?, row?))
    }
}

/// Difficulty presets offered by the game, each mapping to a maze side length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// 11 x 11 maze.
    Easy,
    /// 21 x 21 maze.
    Normal,
    /// 31 x 31 maze.
    Hard,
    /// 41 x 41 maze.
    Expert,
}

impl Difficulty {
    /// Side length of the square maze carved for this difficulty.
    #[must_use]
    pub const fn grid_side(self) -> u32 {
        match self {
            Self::Easy => 11,
            Self::Normal => 21,
            Self::Hard => 31,
            Self::Expert => 41,
        }
    }

    /// Square maze dimensions for this difficulty.
    #[must_use]
    pub fn dimensions(self) -> GridDimensions {
        let side = self.grid_side();
        GridDimensions::new(side, side)
    }

    /// Lowercase label used by the CLI and the control panel.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::Expert => "expert",
        }
    }

    /// Parses a difficulty label, falling back to [`Difficulty::Normal`] when
    /// the label is not recognized.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        for candidate in Self::ALL {
            if trimmed.eq_ignore_ascii_case(candidate.label()) {
                return candidate;
            }
        }
        Self::Normal
    }

    /// Every difficulty in ascending maze-size order.
    pub const ALL: [Self; 4] = [Self::Easy, Self::Normal, Self::Hard, Self::Expert];
}

/// Maze dimensions measured in whole cells, guaranteed odd and at least five.
///
/// The carving algorithm only terminates correctly on odd dimensions, so the
/// constructor normalizes rather than rejects: even or undersized requests
/// round down to the nearest odd value no smaller than five.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    columns: u32,
    rows: u32,
}

impl GridDimensions {
    /// Smallest side length that still yields a carvable maze.
    pub const MIN_SIDE: u32 = 5;

    /// Creates maze dimensions, normalizing each axis to an odd value >= 5.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns: normalize_side(columns),
            rows: normalize_side(rows),
        }
    }

    /// Number of cell columns in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells contained in the maze.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

fn normalize_side(requested: u32) -> u32 {
    let clamped = requested.max(GridDimensions::MIN_SIDE);
    if clamped % 2 == 0 {
        clamped - 1
    } else {
        clamped
    }
}

/// Lifecycle of a single game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// No game has been started; the idle preview maze is shown.
    NotStarted,
    /// The player is navigating the maze and the clock is running.
    Playing,
    /// The goal was reached; movement is ignored until a new game begins.
    Won,
}

/// Color expressed as hue, saturation and lightness.
///
/// The celebration system randomizes hues; adapters convert to their native
/// color space when drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HslColor {
    hue_degrees: f32,
    saturation: f32,
    lightness: f32,
}

impl HslColor {
    /// Creates a color from a hue in degrees and saturation/lightness in 0..=1.
    #[must_use]
    pub const fn new(hue_degrees: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue_degrees,
            saturation,
            lightness,
        }
    }

    /// Hue angle in degrees, nominally within 0..360.
    #[must_use]
    pub const fn hue_degrees(&self) -> f32 {
        self.hue_degrees
    }

    /// Saturation in the range 0.0..=1.0.
    #[must_use]
    pub const fn saturation(&self) -> f32 {
        self.saturation
    }

    /// Lightness in the range 0.0..=1.0.
    #[must_use]
    pub const fn lightness(&self) -> f32 {
        self.lightness
    }
}
