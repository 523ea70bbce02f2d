#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Escape experience.

mod session;

use anyhow::Result;
use clap::Parser;
use maze_escape_audio::{AudioService, NullAudio, Volume};
use maze_escape_core::{Difficulty, GridDimensions};
use maze_escape_rendering::{Color, Presentation, RenderingBackend};
use maze_escape_rendering_macroquad::MacroquadBackend;

use crate::session::Session;

const WINDOW_TITLE: &str = "Maze Escape";
const CLEAR_COLOR: Color = Color::from_rgb_u8(18, 18, 22);

/// Command-line options recognised by the game.
#[derive(Debug, Parser)]
#[command(
    name = "maze-escape",
    about = "Carve a random maze, escape it, enjoy the fireworks."
)]
struct Args {
    /// Difficulty preset; unrecognised labels fall back to normal.
    #[arg(long, default_value = "normal")]
    difficulty: String,

    /// Explicit maze side length, normalised to an odd value >= 5.
    /// Takes precedence over --difficulty.
    #[arg(long)]
    size: Option<u32>,

    /// Seed for deterministic maze layouts; omitted seeds come from entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    vsync: bool,

    /// Print frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,

    /// Drop every audio cue instead of routing it to the audio service.
    #[arg(long)]
    mute: bool,

    /// Initial master volume in [0.0, 1.0].
    #[arg(long)]
    volume: Option<f32>,
}

/// Entry point for the Maze Escape command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let difficulty = Difficulty::from_label(&args.difficulty);
    let size_override = args.size.map(|side| GridDimensions::new(side, side));
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut audio = NullAudio::default();
    if let Some(volume) = args.volume {
        audio.set_master_volume(Volume::new(volume));
    }

    let mut session = Session::new(difficulty, size_override, seed, args.mute, audio);
    let presentation = Presentation::new(WINDOW_TITLE, CLEAR_COLOR, session.initial_scene()?);

    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps);
    backend.run(presentation, move |dt, input, scene| {
        session.frame(dt, input, scene);
    })
}
