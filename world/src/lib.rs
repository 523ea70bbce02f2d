#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Escape.
//!
//! The world owns the carved maze, the player position, the three-state
//! session machine and the elapsed clock. Adapters mutate it exclusively
//! through [`apply`] and read it back through the [`query`] module.

mod grid;

use std::time::Duration;

use maze_escape_core::{CellCoord, CellState, Command, Difficulty, Event, GameState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use grid::{generate, Grid};

const PREVIEW_SEED: u64 = 0x6d61_7a65_5f65_7363;

/// Represents the authoritative Maze Escape world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    player: CellCoord,
    game_state: GameState,
    elapsed: Duration,
}

impl World {
    /// Creates a new world showing the idle preview maze.
    ///
    /// The preview is carved from a fixed seed at the default difficulty so
    /// the player sees a maze before the first game starts; the session state
    /// stays [`GameState::NotStarted`] until a `NewGame` command arrives.
    #[must_use]
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(PREVIEW_SEED);
        let grid = generate(Difficulty::Normal.dimensions(), &mut rng);
        let player = grid.start();
        Self {
            grid,
            player,
            game_state: GameState::NotStarted,
            elapsed: Duration::ZERO,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::NewGame { dimensions, seed } => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            world.grid = generate(dimensions, &mut rng);
            world.player = world.grid.start();
            world.game_state = GameState::Playing;
            world.elapsed = Duration::ZERO;
            out_events.push(Event::MazeGenerated { dimensions });
        }
        Command::Move { direction } => {
            if world.game_state != GameState::Playing {
                return;
            }

            let from = world.player;
            let Some(to) = from.step(direction) else {
                return;
            };
            let Some(state) = world.grid.cell(to) else {
                return;
            };
            if !state.is_walkable() {
                return;
            }

            world.player = to;
            out_events.push(Event::PlayerMoved { from, to });

            if state == CellState::Goal {
                world.game_state = GameState::Won;
                out_events.push(Event::MazeSolved {
                    elapsed: world.elapsed,
                });
            }
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            if world.game_state == GameState::Playing {
                world.elapsed = world.elapsed.saturating_add(dt);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Grid, World};
    use maze_escape_core::{CellCoord, GameState, GridDimensions};

    /// Provides read-only access to the carved maze.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Cell the player currently occupies.
    #[must_use]
    pub fn player(world: &World) -> CellCoord {
        world.player
    }

    /// Current session state.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.game_state
    }

    /// Simulated time accrued while the session has been in Playing.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Whole seconds of play time, recomputed for HUD display each frame.
    #[must_use]
    pub fn elapsed_seconds(world: &World) -> u64 {
        world.elapsed.as_secs()
    }

    /// Dimensions of the current maze.
    #[must_use]
    pub fn dimensions(world: &World) -> GridDimensions {
        world.grid.dimensions()
    }
}
