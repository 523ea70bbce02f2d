//! Frame-by-frame orchestration of the world, the celebration system and the
//! audio seam.
//!
//! The session is the single owner of both clocks: every displayed frame
//! submits one `Tick`, and the celebration engine derives its burst schedule
//! from the `TimeAdvanced` events that tick broadcasts. Input gathered by the
//! rendering backend is translated into commands here, never applied directly.

use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use maze_escape_audio::{route_cues, AudioService, Volume};
use maze_escape_core::{
    Command, Difficulty, Event, GridDimensions, CELEBRATION_BANNER, COMPLETION_NOTICE,
};
use maze_escape_rendering::{
    CelebrationPresentation, Color, FrameInput, HudPresentation, MazePalette, MazePresentation,
    ParticlePresentation, PlayerPresentation, Scene, SceneCell, StageSize,
};
use maze_escape_system_celebration::{
    CelebrationEngine, Config as CelebrationConfig, ParticleSnapshot, StageBounds,
};
use maze_escape_world::{apply, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const CELEBRATION_DURATION: Duration = Duration::from_secs(8);

/// Owns the game state and drives it from per-frame rendering callbacks.
pub(crate) struct Session<A> {
    world: World,
    engine: CelebrationEngine,
    audio: A,
    seed_stream: ChaCha8Rng,
    difficulty: Difficulty,
    size_override: Option<GridDimensions>,
    mute: bool,
    stage: StageSize,
    events: Vec<Event>,
    follow_ups: Vec<Event>,
}

impl<A> Session<A>
where
    A: AudioService,
{
    /// Creates a session showing the idle preview maze.
    ///
    /// `seed` feeds a stream of per-game sub-seeds, so one CLI seed reproduces
    /// the same sequence of layouts across successive games.
    pub(crate) fn new(
        difficulty: Difficulty,
        size_override: Option<GridDimensions>,
        seed: u64,
        mute: bool,
        audio: A,
    ) -> Self {
        let mut seed_stream = ChaCha8Rng::seed_from_u64(seed);
        let stage = StageSize::DEFAULT;
        let engine = CelebrationEngine::new(
            CelebrationConfig::new(CELEBRATION_DURATION, seed_stream.gen()),
            StageBounds::new(stage.width, stage.height),
        );

        Self {
            world: World::new(),
            engine,
            audio,
            seed_stream,
            difficulty,
            size_override,
            mute,
            stage,
            events: Vec::new(),
            follow_ups: Vec::new(),
        }
    }

    /// Builds the scene shown before the first frame callback runs.
    pub(crate) fn initial_scene(&self) -> Result<Scene> {
        let maze = self.maze_presentation()?;
        Ok(Scene::new(
            self.stage,
            maze,
            self.player_presentation(),
            Vec::new(),
            None,
            self.hud_presentation(),
        ))
    }

    /// Advances the game by one frame and refreshes the scene in place.
    pub(crate) fn frame(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        self.events.clear();
        self.follow_ups.clear();

        if let Some(volume) = input.volume_selected {
            self.audio.set_master_volume(Volume::new(volume));
        }

        let mut new_game = input.start_requested;
        if let Some(difficulty) = input.difficulty_selected {
            // Picking a difficulty regenerates immediately and retires any
            // explicit --size override.
            self.difficulty = difficulty;
            self.size_override = None;
            new_game = true;
        }
        if new_game {
            let dimensions = self
                .size_override
                .unwrap_or_else(|| self.difficulty.dimensions());
            let seed = self.seed_stream.gen();
            apply(
                &mut self.world,
                Command::NewGame { dimensions, seed },
                &mut self.events,
            );
        }
        if let Some(direction) = input.step {
            apply(
                &mut self.world,
                Command::Move { direction },
                &mut self.events,
            );
        }
        apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        // The engine observes MazeGenerated before TimeAdvanced, so a new game
        // mid-celebration stops the old session before any further spawning.
        self.engine.handle(&self.events, &mut self.follow_ups);

        if !self.mute {
            route_cues(&mut self.audio, &self.follow_ups);
        }

        for event in self.events.iter().chain(self.follow_ups.iter()) {
            match event {
                Event::MazeSolved { elapsed } => {
                    println!("Solved in {}s. Celebration started.", elapsed.as_secs());
                }
                Event::CelebrationFinished => println!("{COMPLETION_NOTICE}"),
                _ => {}
            }
        }

        self.populate_scene(scene);
    }

    fn populate_scene(&self, scene: &mut Scene) {
        if let Ok(maze) = self.maze_presentation() {
            scene.maze = maze;
        }
        scene.stage = self.stage;
        scene.player = self.player_presentation();
        scene.particles = self
            .engine
            .particles()
            .map(particle_presentation)
            .collect();
        scene.celebration = if self.engine.is_idle() {
            None
        } else {
            Some(CelebrationPresentation::new(CELEBRATION_BANNER))
        };
        scene.hud = self.hud_presentation();
    }

    fn maze_presentation(&self) -> Result<MazePresentation> {
        let grid = query::grid(&self.world);
        let cells = grid
            .iter()
            .map(|(cell, state)| SceneCell::new(cell, state))
            .collect();
        let maze =
            MazePresentation::new(grid.columns(), grid.rows(), cells, MazePalette::classic())?;
        Ok(maze)
    }

    fn player_presentation(&self) -> PlayerPresentation {
        PlayerPresentation::new(
            query::player(&self.world),
            PlayerPresentation::CLASSIC_FILL,
        )
    }

    fn hud_presentation(&self) -> HudPresentation {
        HudPresentation::new(
            query::game_state(&self.world),
            query::elapsed_seconds(&self.world),
            self.difficulty,
            self.audio.master_volume().level(),
        )
    }
}

fn particle_presentation(particle: ParticleSnapshot) -> ParticlePresentation {
    match particle {
        ParticleSnapshot::Tracer {
            x,
            y,
            radius,
            color,
        } => ParticlePresentation::Disc {
            center: Vec2::new(x, y),
            radius,
            color: Color::from_hsl(color),
        },
        ParticleSnapshot::Ember {
            x,
            y,
            radius,
            alpha,
            color,
        } => ParticlePresentation::Disc {
            center: Vec2::new(x, y),
            radius,
            color: Color::from_hsl(color).with_alpha(alpha),
        },
        ParticleSnapshot::Confetti {
            x,
            y,
            width,
            height,
            rotation,
            color,
        } => ParticlePresentation::Rect {
            center: Vec2::new(x, y),
            size: Vec2::new(width, height),
            rotation,
            color: Color::from_hsl(color),
        },
    }
}
