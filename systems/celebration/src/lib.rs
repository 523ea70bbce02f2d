#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic celebration system that reacts to maze events.
//!
//! The engine owns every live particle of a celebration: firework tracers,
//! ember bursts, and confetti. It consumes world events through [`CelebrationEngine::handle`]
//! and reports audio cues and its own completion as new events.

mod particles;

use std::time::Duration;

use maze_escape_core::{AudioCue, Event, HslColor};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::particles::{explosion_color, ConfettiPiece, Ember, Firework};

const DEFAULT_BURST_PERIOD: Duration = Duration::from_millis(400);
const DEFAULT_FIREWORK_PROBABILITY: f32 = 0.12;
const DEFAULT_EXPLOSION_PROBABILITY: f32 = 0.05;
const DEFAULT_OPENING_CONFETTI: u32 = 120;
const DEFAULT_OPENING_FIREWORKS: u32 = 6;
const DEFAULT_BURST_CONFETTI: u32 = 30;
const DEFAULT_APEX_EMBERS: CountRange = CountRange::new(60, 120);
const DEFAULT_SCHEDULED_EMBERS: CountRange = CountRange::new(40, 120);
const DEFAULT_AMBIENT_EMBERS: CountRange = CountRange::new(30, 80);

const SCHEDULED_BURST_MARGIN_X: f32 = 80.0;
const SCHEDULED_BURST_MIN_Y: f32 = 60.0;
const AMBIENT_BURST_MARGIN_X: f32 = 50.0;
const AMBIENT_BURST_MIN_Y: f32 = 50.0;
// Bursts detonate in the upper part of the stage so embers rain down on it.
const BURST_CEILING_RATIO: f32 = 0.6;

/// Extent of the drawable stage in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageBounds {
    width: f32,
    height: f32,
}

impl StageBounds {
    /// Creates stage bounds from a logical width and height.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the stage width in logical pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stage height in logical pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Inclusive range of particle counts sampled once per burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountRange {
    min: u32,
    max: u32,
}

impl CountRange {
    /// Creates an inclusive count range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Returns the smallest count the range can produce.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Returns the largest count the range can produce.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    fn sample(&self, rng: &mut impl Rng) -> u32 {
        debug_assert!(self.min <= self.max, "count range is inverted");
        rng.gen_range(self.min..=self.max)
    }
}

/// Configuration parameters required to construct the celebration engine.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    duration: Duration,
    rng_seed: u64,
    burst_period: Duration,
    firework_probability: f32,
    explosion_probability: f32,
    opening_confetti: u32,
    opening_fireworks: u32,
    burst_confetti: u32,
    apex_embers: CountRange,
    scheduled_embers: CountRange,
    ambient_embers: CountRange,
}

impl Config {
    /// Creates a configuration using the provided session duration and seed.
    #[must_use]
    pub const fn new(duration: Duration, rng_seed: u64) -> Self {
        Self {
            duration,
            rng_seed,
            burst_period: DEFAULT_BURST_PERIOD,
            firework_probability: DEFAULT_FIREWORK_PROBABILITY,
            explosion_probability: DEFAULT_EXPLOSION_PROBABILITY,
            opening_confetti: DEFAULT_OPENING_CONFETTI,
            opening_fireworks: DEFAULT_OPENING_FIREWORKS,
            burst_confetti: DEFAULT_BURST_CONFETTI,
            apex_embers: DEFAULT_APEX_EMBERS,
            scheduled_embers: DEFAULT_SCHEDULED_EMBERS,
            ambient_embers: DEFAULT_AMBIENT_EMBERS,
        }
    }

    /// Overrides the cadence of scheduled ember bursts.
    #[must_use]
    pub const fn with_burst_period(mut self, period: Duration) -> Self {
        self.burst_period = period;
        self
    }

    /// Overrides the per-frame chances of ambient fireworks and bursts.
    #[must_use]
    pub const fn with_spawn_probabilities(mut self, firework: f32, explosion: f32) -> Self {
        self.firework_probability = firework;
        self.explosion_probability = explosion;
        self
    }

    /// Overrides the confetti and firework counts released by [`CelebrationEngine::start`].
    #[must_use]
    pub const fn with_opening_volley(mut self, confetti: u32, fireworks: u32) -> Self {
        self.opening_confetti = confetti;
        self.opening_fireworks = fireworks;
        self
    }

    /// Overrides the ember count released when a firework stalls at its apex.
    #[must_use]
    pub const fn with_apex_embers(mut self, embers: CountRange) -> Self {
        self.apex_embers = embers;
        self
    }

    /// Overrides the makeup of the periodically scheduled bursts.
    #[must_use]
    pub const fn with_scheduled_burst(mut self, embers: CountRange, confetti: u32) -> Self {
        self.scheduled_embers = embers;
        self.burst_confetti = confetti;
        self
    }

    /// Overrides the ember count of ambient chance bursts.
    #[must_use]
    pub const fn with_ambient_embers(mut self, embers: CountRange) -> Self {
        self.ambient_embers = embers;
        self
    }
}

/// Presentation-ready view of one live particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParticleSnapshot {
    /// Rising firework rocket drawn as a small tracer dot.
    Tracer {
        /// Horizontal stage position in logical pixels.
        x: f32,
        /// Vertical stage position in logical pixels.
        y: f32,
        /// Tracer radius in logical pixels.
        radius: f32,
        /// Tracer color.
        color: HslColor,
    },
    /// Explosion fragment fading out over its lifetime.
    Ember {
        /// Horizontal stage position in logical pixels.
        x: f32,
        /// Vertical stage position in logical pixels.
        y: f32,
        /// Current radius in logical pixels, shrinking with age.
        radius: f32,
        /// Remaining opacity in the `[0.0, 1.0]` range.
        alpha: f32,
        /// Ember color.
        color: HslColor,
    },
    /// Rotating confetti rectangle.
    Confetti {
        /// Horizontal stage position in logical pixels.
        x: f32,
        /// Vertical stage position in logical pixels.
        y: f32,
        /// Rectangle width in logical pixels.
        width: f32,
        /// Rectangle height in logical pixels.
        height: f32,
        /// Rotation around the rectangle center in radians.
        rotation: f32,
        /// Confetti color.
        color: HslColor,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Active,
    Draining,
}

/// Fixed-period burst timer driven by frame deltas.
#[derive(Debug)]
struct BurstSchedule {
    period: Duration,
    accumulator: Duration,
}

impl BurstSchedule {
    const fn new(period: Duration) -> Self {
        Self {
            period,
            accumulator: Duration::ZERO,
        }
    }

    fn cancel(&mut self) {
        self.accumulator = Duration::ZERO;
    }

    fn resolve_due_bursts(&mut self, dt: Duration) -> usize {
        if self.period.is_zero() {
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let mut due = 0;
        while self.accumulator >= self.period {
            self.accumulator -= self.period;
            due += 1;
        }
        due
    }
}

/// Particle engine that runs one celebration session at a time.
#[derive(Debug)]
pub struct CelebrationEngine {
    config: Config,
    rng: ChaCha8Rng,
    phase: Phase,
    elapsed: Duration,
    duration: Duration,
    schedule: BurstSchedule,
    bounds: StageBounds,
    fireworks: Vec<Firework>,
    embers: Vec<Ember>,
    confetti: Vec<ConfettiPiece>,
}

impl CelebrationEngine {
    /// Creates an idle engine for the given stage.
    #[must_use]
    pub fn new(config: Config, bounds: StageBounds) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            phase: Phase::Idle,
            elapsed: Duration::ZERO,
            duration: config.duration,
            schedule: BurstSchedule::new(config.burst_period),
            bounds,
            fireworks: Vec::new(),
            embers: Vec::new(),
            confetti: Vec::new(),
        }
    }

    /// Consumes world events and emits audio cues plus completion events.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        for event in events {
            match event {
                Event::MazeSolved { .. } => self.start(self.config.duration, out),
                Event::MazeGenerated { .. } => self.stop(),
                Event::TimeAdvanced { dt } => self.update(*dt, out),
                _ => {}
            }
        }
    }

    /// Begins a celebration session lasting `duration`.
    ///
    /// Releases the opening confetti shower and firework volley and requests
    /// a single cheer cue. Calling this on an engine that is already
    /// celebrating has no effect.
    pub fn start(&mut self, duration: Duration, out: &mut Vec<Event>) {
        if self.phase != Phase::Idle {
            return;
        }
        debug_assert!(
            self.bounds.width() >= 200.0 && self.bounds.height() >= 200.0,
            "stage too small for celebration bursts"
        );

        self.phase = Phase::Active;
        self.elapsed = Duration::ZERO;
        self.duration = duration;
        self.schedule.cancel();

        out.push(Event::AudioCueRequested {
            cue: AudioCue::Cheer,
        });
        self.spawn_confetti(self.config.opening_confetti);
        for _ in 0..self.config.opening_fireworks {
            self.fireworks.push(Firework::launch(&mut self.rng, self.bounds));
        }
    }

    /// Advances the celebration by one frame delta.
    pub fn update(&mut self, dt: Duration, out: &mut Vec<Event>) {
        match self.phase {
            Phase::Idle => {}
            Phase::Active => {
                self.elapsed = self.elapsed.saturating_add(dt);
                if self.elapsed >= self.duration {
                    // The session is over: cancel pending bursts and let the
                    // remaining particles animate out.
                    self.phase = Phase::Draining;
                    self.schedule.cancel();
                } else {
                    let due = self.schedule.resolve_due_bursts(dt);
                    for _ in 0..due {
                        self.spawn_scheduled_burst(out);
                    }
                    if self.rng.gen::<f32>() < self.config.firework_probability {
                        self.fireworks.push(Firework::launch(&mut self.rng, self.bounds));
                    }
                    if self.rng.gen::<f32>() < self.config.explosion_probability {
                        self.spawn_ambient_burst(out);
                    }
                }
                self.integrate(dt, out);
            }
            Phase::Draining => {
                self.integrate(dt, out);
                if self.no_particles_left() {
                    self.phase = Phase::Idle;
                    out.push(Event::CelebrationFinished);
                }
            }
        }
    }

    /// Ends the session immediately and discards every live particle.
    pub fn stop(&mut self) {
        self.phase = Phase::Idle;
        self.elapsed = Duration::ZERO;
        self.schedule.cancel();
        self.fireworks.clear();
        self.embers.clear();
        self.confetti.clear();
    }

    /// Returns a presentation snapshot of every live particle.
    pub fn particles(&self) -> impl Iterator<Item = ParticleSnapshot> + '_ {
        self.fireworks
            .iter()
            .map(Firework::snapshot)
            .chain(self.embers.iter().map(Ember::snapshot))
            .chain(self.confetti.iter().map(ConfettiPiece::snapshot))
    }

    /// Returns the number of live particles across all kinds.
    #[must_use]
    pub fn active_particle_count(&self) -> usize {
        self.fireworks.len() + self.embers.len() + self.confetti.len()
    }

    /// Returns `true` while no celebration session is running or draining.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    fn spawn_scheduled_burst(&mut self, out: &mut Vec<Event>) {
        let x = self.rng.gen_range(
            SCHEDULED_BURST_MARGIN_X..self.bounds.width() - SCHEDULED_BURST_MARGIN_X,
        );
        let y = self
            .rng
            .gen_range(SCHEDULED_BURST_MIN_Y..self.bounds.height() * BURST_CEILING_RATIO);
        self.detonate(x, y, self.config.scheduled_embers, out);
        self.spawn_confetti(self.config.burst_confetti);
    }

    fn spawn_ambient_burst(&mut self, out: &mut Vec<Event>) {
        let x = self
            .rng
            .gen_range(AMBIENT_BURST_MARGIN_X..self.bounds.width() - AMBIENT_BURST_MARGIN_X);
        let y = self
            .rng
            .gen_range(AMBIENT_BURST_MIN_Y..self.bounds.height() * BURST_CEILING_RATIO);
        self.detonate(x, y, self.config.ambient_embers, out);
    }

    fn detonate(&mut self, x: f32, y: f32, counts: CountRange, out: &mut Vec<Event>) {
        let color = explosion_color(&mut self.rng);
        self.scatter_embers(x, y, color, counts);
        out.push(Event::AudioCueRequested {
            cue: AudioCue::Boom,
        });
    }

    fn scatter_embers(&mut self, x: f32, y: f32, color: HslColor, counts: CountRange) {
        let count = counts.sample(&mut self.rng);
        for _ in 0..count {
            self.embers.push(Ember::scatter(&mut self.rng, x, y, color));
        }
    }

    fn spawn_confetti(&mut self, count: u32) {
        for _ in 0..count {
            self.confetti.push(ConfettiPiece::spawn(&mut self.rng, self.bounds));
        }
    }

    fn integrate(&mut self, dt: Duration, out: &mut Vec<Event>) {
        let dt = dt.as_secs_f32();
        let bounds = self.bounds;
        let apex_embers = self.config.apex_embers;

        let embers = &mut self.embers;
        let rng = &mut self.rng;
        self.fireworks.retain_mut(|firework| {
            firework.integrate(dt);
            if firework.reached_apex() {
                let (x, y) = firework.position();
                let count = apex_embers.sample(rng);
                for _ in 0..count {
                    embers.push(Ember::scatter(rng, x, y, firework.color()));
                }
                out.push(Event::AudioCueRequested {
                    cue: AudioCue::Boom,
                });
                return false;
            }
            !firework.below_stage(bounds)
        });

        self.embers.retain_mut(|ember| {
            ember.integrate(dt);
            !ember.expired()
        });

        self.confetti.retain_mut(|piece| {
            piece.integrate(dt);
            !piece.below_stage(bounds)
        });
    }

    fn no_particles_left(&self) -> bool {
        self.fireworks.is_empty() && self.embers.is_empty() && self.confetti.is_empty()
    }
}
