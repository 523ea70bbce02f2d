#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Maze Escape.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature; sound cues travel through the separate audio
//! adapter instead. Consumers that need platform playback can opt back in by
//! enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.
//!
//! The adapter uses Macroquad's immediate-mode UI module so the control panel
//! can host widgets. All UI-specific calls live inside the local `ui` module to
//! avoid leaking Macroquad UI types throughout the renderer.

mod ui;

use self::ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiResult};
use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use maze_escape_core::{Difficulty, Direction};
use maze_escape_rendering::{
    CelebrationPresentation, Color, FrameInput, MazePresentation, ParticlePresentation,
    PlayerPresentation, Presentation, RenderingBackend, Scene, StageSize,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// Width in screen pixels reserved for the control panel.
const CONTROL_PANEL_WIDTH: f32 = 220.0;
const CONTROL_PANEL_BACKGROUND: Color = Color::from_rgb_u8(24, 24, 28);
const BANNER_HEIGHT_RATIO: f32 = 0.12;
const BANNER_FONT_SIZE: f32 = 44.0;
const BANNER_COLOR: Color = Color::new(1.0, 0.84, 0.25, 1.0);

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlPanelInputState {
    start_latched: bool,
    difficulty_latched: Option<Difficulty>,
    volume_latched: Option<f32>,
}

impl ControlPanelInputState {
    /// Returns whether the UI requested a new game and clears the latch so the
    /// action fires only once.
    pub fn take_start(&mut self) -> bool {
        let latched = self.start_latched;
        self.start_latched = false;
        latched
    }

    /// Records that the start/reset button was pressed this frame.
    pub fn register_start(&mut self) {
        self.start_latched = true;
    }

    /// Returns the latched difficulty selection, clearing it so the action fires once.
    pub fn take_difficulty(&mut self) -> Option<Difficulty> {
        self.difficulty_latched.take()
    }

    /// Records that a difficulty button was pressed this frame.
    pub fn register_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty_latched = Some(difficulty);
    }

    /// Returns the latched volume slider value, clearing it so it applies once.
    pub fn take_volume(&mut self) -> Option<f32> {
        self.volume_latched.take()
    }

    /// Records that the volume slider moved this frame.
    pub fn register_volume(&mut self, volume: f32) {
        self.volume_latched = Some(volume);
    }
}

/// Snapshot of edge-triggered keyboard input observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `Space` or `Enter` starts or resets the game.
    start_pressed: bool,
    /// Movement step resolved from the arrow keys and WASD.
    step: Option<Direction>,
}

impl KeyboardShortcuts {
    const MOVEMENT_KEYS: [(KeyCode, Direction); 8] = [
        (KeyCode::Up, Direction::Up),
        (KeyCode::W, Direction::Up),
        (KeyCode::Down, Direction::Down),
        (KeyCode::S, Direction::Down),
        (KeyCode::Left, Direction::Left),
        (KeyCode::A, Direction::Left),
        (KeyCode::Right, Direction::Right),
        (KeyCode::D, Direction::Right),
    ];

    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let start_pressed = is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::Enter);

        // Several movement keys in one frame resolve last-write-wins.
        let mut step = None;
        for (key, direction) in Self::MOVEMENT_KEYS {
            if is_key_pressed(key) {
                step = Some(direction);
            }
        }

        Self {
            quit_requested,
            start_pressed,
            step,
        }
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

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, frame: Duration, render: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.render_accum += render;

        self.frame_times.push_back(frame);
        self.window_duration += frame;

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
        if seconds <= f32::EPSILON {
            self.elapsed = Duration::ZERO;
            self.frames = 0;
            self.render_accum = Duration::ZERO;
            return None;
        }

        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_render = if self.frames == 0 {
            Duration::ZERO
        } else {
            self.render_accum / self.frames
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.render_accum = Duration::ZERO;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_render,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 880,
            window_height: 660,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut control_panel_input = ControlPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = FrameInput {
                    step: keyboard.step,
                    start_requested: keyboard.start_pressed || control_panel_input.take_start(),
                    difficulty_selected: control_panel_input.take_difficulty(),
                    volume_selected: control_panel_input.take_volume(),
                };

                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                let render_start = Instant::now();
                draw_maze(&scene.maze, scene.stage, &metrics);
                draw_player(&scene, &metrics);
                if let Some(overlay) = scene.celebration.as_ref() {
                    draw_stage_dim(overlay, &metrics);
                }
                draw_particles(&scene.particles, &metrics);
                if let Some(overlay) = scene.celebration.as_ref() {
                    draw_banner(overlay, scene.stage, &metrics);
                }

                let (panel_origin, panel_size) = panel_geometry(screen_width, screen_height);
                let panel_background = to_macroquad_color(CONTROL_PANEL_BACKGROUND);
                macroquad::shapes::draw_rectangle(
                    panel_origin.x,
                    panel_origin.y,
                    panel_size.x,
                    panel_size.y,
                    panel_background,
                );
                let mut control_panel_ui = macroquad::ui::root_ui();
                let ControlPanelUiResult {
                    start_pressed,
                    difficulty_selected,
                    volume_selected,
                } = draw_control_panel_ui(
                    &mut control_panel_ui,
                    ControlPanelUiContext {
                        origin: panel_origin,
                        size: panel_size,
                        background: panel_background,
                        hud: scene.hud,
                    },
                );
                if start_pressed {
                    control_panel_input.register_start();
                }
                if let Some(difficulty) = difficulty_selected {
                    control_panel_input.register_difficulty(difficulty);
                }
                if let Some(volume) = volume_selected {
                    control_panel_input.register_volume(volume);
                }

                let render_duration = render_start.elapsed();
                if let Some(FpsMetrics {
                    per_second,
                    trailing_ten_seconds,
                    avg_render,
                }) = fps_counter.record_frame(frame_dt, render_duration)
                {
                    if show_fps {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
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

/// Scale and centering applied to project the logical stage onto the screen.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    stage_width_scaled: f32,
    stage_height_scaled: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let stage = scene.stage;
        let panel_width = CONTROL_PANEL_WIDTH.min(screen_width);
        let available_width = (screen_width - panel_width).max(0.0);
        let scale = if stage.width <= f32::EPSILON || stage.height <= f32::EPSILON {
            1.0
        } else {
            let width_ratio = if available_width <= f32::EPSILON {
                f32::INFINITY
            } else {
                available_width / stage.width
            };
            width_ratio.min(screen_height / stage.height)
        };

        let stage_width_scaled = stage.width * scale;
        let stage_height_scaled = stage.height * scale;
        let offset_x = ((available_width - stage_width_scaled) * 0.5).max(0.0);
        let offset_y = ((screen_height - stage_height_scaled) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
            stage_width_scaled,
            stage_height_scaled,
        }
    }

    fn project(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + point.x * self.scale,
            self.offset_y + point.y * self.scale,
        )
    }
}

fn panel_geometry(screen_width: f32, screen_height: f32) -> (MacroquadVec2, MacroquadVec2) {
    let width = CONTROL_PANEL_WIDTH.min(screen_width);
    let left = (screen_width - width).max(0.0);
    (
        MacroquadVec2::new(left, 0.0),
        MacroquadVec2::new(width, screen_height),
    )
}

fn draw_maze(maze: &MazePresentation, stage: StageSize, metrics: &SceneMetrics) {
    let length = maze.cell_length(stage) * metrics.scale;
    if length <= f32::EPSILON {
        return;
    }

    for cell in &maze.cells {
        let origin = metrics.project(maze.cell_origin(cell.cell, stage));
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            length,
            length,
            to_macroquad_color(maze.palette.fill(cell.state)),
        );
    }
}

fn draw_player(scene: &Scene, metrics: &SceneMetrics) {
    let cell_length = scene.maze.cell_length(scene.stage);
    let radius = PlayerPresentation::radius(cell_length) * metrics.scale;
    if radius <= f32::EPSILON {
        return;
    }

    let center = metrics.project(scene.maze.cell_center(scene.player.cell, scene.stage));
    macroquad::shapes::draw_circle(
        center.x,
        center.y,
        radius,
        to_macroquad_color(scene.player.color),
    );
}

fn draw_particles(particles: &[ParticlePresentation], metrics: &SceneMetrics) {
    for particle in particles {
        match particle {
            ParticlePresentation::Disc {
                center,
                radius,
                color,
            } => {
                let center = metrics.project(*center);
                macroquad::shapes::draw_circle(
                    center.x,
                    center.y,
                    radius * metrics.scale,
                    to_macroquad_color(*color),
                );
            }
            ParticlePresentation::Rect {
                center,
                size,
                rotation,
                color,
            } => {
                let [a, b, c, d] = confetti_corners(*center, *size, *rotation)
                    .map(|corner| metrics.project(corner));
                let color = to_macroquad_color(*color);
                macroquad::shapes::draw_triangle(
                    MacroquadVec2::new(a.x, a.y),
                    MacroquadVec2::new(b.x, b.y),
                    MacroquadVec2::new(c.x, c.y),
                    color,
                );
                macroquad::shapes::draw_triangle(
                    MacroquadVec2::new(a.x, a.y),
                    MacroquadVec2::new(c.x, c.y),
                    MacroquadVec2::new(d.x, d.y),
                    color,
                );
            }
        }
    }
}

/// Corners of a confetti rectangle rotated around its center, in draw order.
fn confetti_corners(center: Vec2, size: Vec2, rotation: f32) -> [Vec2; 4] {
    let (sin, cos) = rotation.sin_cos();
    let half = size * 0.5;
    let axis_x = Vec2::new(cos, sin) * half.x;
    let axis_y = Vec2::new(-sin, cos) * half.y;

    [
        center - axis_x - axis_y,
        center + axis_x - axis_y,
        center + axis_x + axis_y,
        center - axis_x + axis_y,
    ]
}

fn draw_stage_dim(overlay: &CelebrationPresentation, metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle(
        metrics.offset_x,
        metrics.offset_y,
        metrics.stage_width_scaled,
        metrics.stage_height_scaled,
        to_macroquad_color(overlay.dim),
    );
}

fn draw_banner(overlay: &CelebrationPresentation, stage: StageSize, metrics: &SceneMetrics) {
    let font_size = (BANNER_FONT_SIZE * metrics.scale).max(18.0);
    let dimensions =
        macroquad::text::measure_text(&overlay.banner, None, font_size as u16, 1.0);
    let x = metrics.offset_x + (metrics.stage_width_scaled - dimensions.width) * 0.5;
    let y = metrics.offset_y + stage.height * BANNER_HEIGHT_RATIO * metrics.scale;

    macroquad::text::draw_text(
        &overlay.banner,
        x,
        y,
        font_size,
        to_macroquad_color(BANNER_COLOR),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape_core::{CellCoord, CellState, GameState};
    use maze_escape_rendering::{HudPresentation, MazePalette, SceneCell};

    fn base_scene() -> Scene {
        let mut cells = Vec::new();
        for row in 0..11 {
            for column in 0..11 {
                let state = if row % 2 == 0 && column % 2 == 0 {
                    CellState::Open
                } else {
                    CellState::Wall
                };
                cells.push(SceneCell::new(CellCoord::new(column, row), state));
            }
        }
        let maze =
            MazePresentation::new(11, 11, cells, MazePalette::classic()).expect("valid maze");

        Scene::new(
            StageSize::DEFAULT,
            maze,
            PlayerPresentation::new(CellCoord::new(1, 1), PlayerPresentation::CLASSIC_FILL),
            Vec::new(),
            None,
            HudPresentation::new(GameState::NotStarted, 0, Difficulty::Normal, 0.9),
        )
    }

    #[test]
    fn scene_metrics_reserve_the_control_panel_width() {
        let scene = base_scene();
        let metrics = SceneMetrics::from_scene(&scene, 880.0, 660.0);

        let expected_scale = (880.0 - CONTROL_PANEL_WIDTH) / 600.0;
        assert!((metrics.scale - expected_scale.min(660.0 / 600.0)).abs() <= 1e-5);
        assert!(metrics.offset_x + metrics.stage_width_scaled <= 880.0 - CONTROL_PANEL_WIDTH + 1e-3);
    }

    #[test]
    fn scene_metrics_center_the_stage_vertically() {
        let scene = base_scene();
        let metrics = SceneMetrics::from_scene(&scene, 1400.0, 800.0);

        // Height is the limiting axis here, so the stage fills it exactly.
        assert!((metrics.scale - 800.0 / 600.0).abs() <= 1e-5);
        assert!((metrics.offset_y - 0.0).abs() <= 1e-3);
        let horizontal_slack = (1400.0 - CONTROL_PANEL_WIDTH) - metrics.stage_width_scaled;
        assert!((metrics.offset_x - horizontal_slack * 0.5).abs() <= 1e-3);
    }

    #[test]
    fn scene_metrics_survive_degenerate_screens() {
        let scene = base_scene();
        let metrics = SceneMetrics::from_scene(&scene, 100.0, 0.0);

        assert!(metrics.scale.abs() <= f32::EPSILON || metrics.scale.is_finite());
        assert!(metrics.offset_x >= 0.0);
        assert!(metrics.offset_y >= 0.0);
    }

    #[test]
    fn project_applies_scale_then_offset() {
        let scene = base_scene();
        let metrics = SceneMetrics::from_scene(&scene, 880.0, 660.0);

        let projected = metrics.project(Vec2::new(10.0, 20.0));
        assert!((projected.x - (metrics.offset_x + 10.0 * metrics.scale)).abs() <= 1e-5);
        assert!((projected.y - (metrics.offset_y + 20.0 * metrics.scale)).abs() <= 1e-5);
    }

    #[test]
    fn panel_geometry_pins_the_panel_to_the_right_edge() {
        let (origin, size) = panel_geometry(880.0, 660.0);
        assert!((origin.x - (880.0 - CONTROL_PANEL_WIDTH)).abs() <= 1e-5);
        assert!((origin.y - 0.0).abs() <= f32::EPSILON);
        assert!((size.x - CONTROL_PANEL_WIDTH).abs() <= 1e-5);
        assert!((size.y - 660.0).abs() <= f32::EPSILON);

        let (narrow_origin, narrow_size) = panel_geometry(100.0, 400.0);
        assert!((narrow_origin.x - 0.0).abs() <= f32::EPSILON);
        assert!((narrow_size.x - 100.0).abs() <= f32::EPSILON);
    }

    #[test]
    fn unrotated_confetti_corners_form_an_axis_aligned_rectangle() {
        let corners = confetti_corners(Vec2::new(10.0, 10.0), Vec2::new(8.0, 4.0), 0.0);

        assert_vec2_close(corners[0], Vec2::new(6.0, 8.0));
        assert_vec2_close(corners[1], Vec2::new(14.0, 8.0));
        assert_vec2_close(corners[2], Vec2::new(14.0, 12.0));
        assert_vec2_close(corners[3], Vec2::new(6.0, 12.0));
    }

    #[test]
    fn rotated_confetti_corners_keep_their_center_and_diagonal() {
        let center = Vec2::new(5.0, 7.0);
        let size = Vec2::new(6.0, 3.6);
        let corners = confetti_corners(center, size, 1.1);

        let centroid = corners.iter().copied().sum::<Vec2>() / 4.0;
        assert_vec2_close(centroid, center);

        let diagonal = (corners[0] - corners[2]).length();
        assert!((diagonal - size.length()).abs() <= 1e-4);
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);
        let render = Duration::from_millis(2);

        assert!(counter.record_frame(frame, render).is_none());
        assert!(counter.record_frame(frame, render).is_none());
        assert!(counter.record_frame(frame, render).is_none());

        let metrics = counter
            .record_frame(frame, render)
            .expect("should report FPS after one second of samples");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() <= 1e-3);
        assert_eq!(metrics.avg_render, Duration::from_millis(2));
        assert!(counter.record_frame(frame, render).is_none());
    }

    #[test]
    fn fps_counter_tracks_trailing_ten_second_average() {
        let mut counter = FpsCounter::default();

        for _ in 0..10 {
            for sample in 0..5 {
                let metrics = counter.record_frame(Duration::from_millis(200), Duration::ZERO);
                if sample == 4 {
                    let metrics = metrics.expect("should report every second");
                    assert!((metrics.per_second - 5.0).abs() <= 1e-3);
                    assert!((metrics.trailing_ten_seconds - 5.0).abs() <= 1e-3);
                } else {
                    assert!(metrics.is_none());
                }
            }
        }

        for sample in 0..10 {
            let metrics = counter.record_frame(Duration::from_millis(100), Duration::ZERO);
            if sample == 9 {
                let metrics = metrics.expect("should report every second");
                assert!((metrics.per_second - 10.0).abs() <= 1e-3);
                assert!((metrics.trailing_ten_seconds - 5.5).abs() <= 1e-3);
            } else {
                assert!(metrics.is_none());
            }
        }
    }

    fn assert_vec2_close(actual: Vec2, expected: Vec2) {
        let delta = actual - expected;
        assert!(
            delta.length() <= 1e-4,
            "expected {expected:?}, got {actual:?} (delta {delta:?})"
        );
    }
}
