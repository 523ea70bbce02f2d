//! Particle storage and ballistic integration for the celebration engine.
//!
//! All velocities are expressed in stage pixels per second and accelerations
//! in pixels per second squared, so integration scales linearly with the
//! frame delta instead of assuming a fixed frame rate.

use maze_escape_core::HslColor;
use rand::Rng;

use crate::{ParticleSnapshot, StageBounds};

const FIREWORK_LAUNCH_MARGIN: f32 = 50.0;
const FIREWORK_LAUNCH_DEPTH: f32 = 10.0;
const FIREWORK_SPEED_X: (f32, f32) = (-90.0, 90.0);
const FIREWORK_SPEED_Y: (f32, f32) = (-600.0, -420.0);
const FIREWORK_GRAVITY: f32 = 540.0;
const FIREWORK_APEX_VELOCITY: f32 = -120.0;
const FIREWORK_CULL_MARGIN: f32 = 50.0;
const TRACER_RADIUS: f32 = 2.0;
const FIREWORK_SATURATION: f32 = 0.8;
const FIREWORK_LIGHTNESS: f32 = 0.6;

const EMBER_SPEED: (f32, f32) = (120.0, 480.0);
const EMBER_GRAVITY: f32 = 432.0;
const EMBER_LIFE_SECONDS: (f32, f32) = (0.8, 1.6);
const EMBER_FULL_RADIUS: f32 = 4.0;

const CONFETTI_DRIFT: (f32, f32) = (-60.0, 60.0);
const CONFETTI_FALL: (f32, f32) = (60.0, 240.0);
const CONFETTI_GRAVITY: f32 = 72.0;
const CONFETTI_SPIN: (f32, f32) = (-6.0, 6.0);
const CONFETTI_SIZE: (f32, f32) = (4.0, 10.0);
const CONFETTI_HEIGHT_RATIO: f32 = 0.6;
const CONFETTI_CULL_MARGIN: f32 = 20.0;
const CONFETTI_SATURATION: f32 = 0.7;
const CONFETTI_LIGHTNESS: f32 = 0.5;

fn random_hue(rng: &mut impl Rng, saturation: f32, lightness: f32) -> HslColor {
    let hue = rng.gen_range(0.0_f32..360.0).floor();
    HslColor::new(hue, saturation, lightness)
}

/// Color shared by every ember of one explosion burst.
pub(crate) fn explosion_color(rng: &mut impl Rng) -> HslColor {
    random_hue(rng, FIREWORK_SATURATION, FIREWORK_LIGHTNESS)
}

/// Rocket rising from below the stage until its apex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Firework {
    x: f32,
    y: f32,
    velocity_x: f32,
    velocity_y: f32,
    color: HslColor,
}

impl Firework {
    pub(crate) fn launch(rng: &mut impl Rng, bounds: StageBounds) -> Self {
        Self {
            x: rng.gen_range(FIREWORK_LAUNCH_MARGIN..bounds.width() - FIREWORK_LAUNCH_MARGIN),
            y: bounds.height() + FIREWORK_LAUNCH_DEPTH,
            velocity_x: rng.gen_range(FIREWORK_SPEED_X.0..FIREWORK_SPEED_X.1),
            velocity_y: rng.gen_range(FIREWORK_SPEED_Y.0..FIREWORK_SPEED_Y.1),
            color: random_hue(rng, FIREWORK_SATURATION, FIREWORK_LIGHTNESS),
        }
    }

    pub(crate) fn integrate(&mut self, dt: f32) {
        self.x += self.velocity_x * dt;
        self.y += self.velocity_y * dt;
        self.velocity_y += FIREWORK_GRAVITY * dt;
    }

    /// A firework converts into an ember burst once its climb has stalled.
    pub(crate) fn reached_apex(&self) -> bool {
        self.velocity_y >= FIREWORK_APEX_VELOCITY
    }

    pub(crate) fn below_stage(&self, bounds: StageBounds) -> bool {
        self.y > bounds.height() + FIREWORK_CULL_MARGIN
    }

    pub(crate) const fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub(crate) const fn color(&self) -> HslColor {
        self.color
    }

    pub(crate) fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot::Tracer {
            x: self.x,
            y: self.y,
            radius: TRACER_RADIUS,
            color: self.color,
        }
    }
}

/// Fragment of an explosion burst, fading out over its lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Ember {
    x: f32,
    y: f32,
    velocity_x: f32,
    velocity_y: f32,
    age: f32,
    life: f32,
    color: HslColor,
}

impl Ember {
    pub(crate) fn scatter(rng: &mut impl Rng, x: f32, y: f32, color: HslColor) -> Self {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = rng.gen_range(EMBER_SPEED.0..EMBER_SPEED.1);
        Self {
            x,
            y,
            velocity_x: angle.cos() * speed,
            velocity_y: angle.sin() * speed,
            age: 0.0,
            life: rng.gen_range(EMBER_LIFE_SECONDS.0..EMBER_LIFE_SECONDS.1),
            color,
        }
    }

    pub(crate) fn integrate(&mut self, dt: f32) {
        self.x += self.velocity_x * dt;
        self.y += self.velocity_y * dt;
        self.velocity_y += EMBER_GRAVITY * dt;
        self.age += dt;
    }

    pub(crate) fn expired(&self) -> bool {
        self.age >= self.life
    }

    fn intensity(&self) -> f32 {
        (1.0 - self.age / self.life).max(0.0)
    }

    pub(crate) fn snapshot(&self) -> ParticleSnapshot {
        let intensity = self.intensity();
        ParticleSnapshot::Ember {
            x: self.x,
            y: self.y,
            radius: (intensity * EMBER_FULL_RADIUS).max(1.0),
            alpha: intensity,
            color: self.color,
        }
    }
}

/// Rotating rectangle drifting down from above the stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ConfettiPiece {
    x: f32,
    y: f32,
    velocity_x: f32,
    velocity_y: f32,
    rotation: f32,
    spin: f32,
    width: f32,
    color: HslColor,
}

impl ConfettiPiece {
    pub(crate) fn spawn(rng: &mut impl Rng, bounds: StageBounds) -> Self {
        Self {
            x: rng.gen_range(0.0..bounds.width()),
            y: rng.gen_range(-bounds.height() * 0.5..0.0),
            velocity_x: rng.gen_range(CONFETTI_DRIFT.0..CONFETTI_DRIFT.1),
            velocity_y: rng.gen_range(CONFETTI_FALL.0..CONFETTI_FALL.1),
            rotation: rng.gen_range(0.0..std::f32::consts::TAU),
            spin: rng.gen_range(CONFETTI_SPIN.0..CONFETTI_SPIN.1),
            width: rng.gen_range(CONFETTI_SIZE.0..CONFETTI_SIZE.1),
            color: random_hue(rng, CONFETTI_SATURATION, CONFETTI_LIGHTNESS),
        }
    }

    pub(crate) fn integrate(&mut self, dt: f32) {
        self.x += self.velocity_x * dt;
        self.y += self.velocity_y * dt;
        self.velocity_y += CONFETTI_GRAVITY * dt;
        self.rotation += self.spin * dt;
    }

    pub(crate) fn below_stage(&self, bounds: StageBounds) -> bool {
        self.y > bounds.height() + CONFETTI_CULL_MARGIN
    }

    pub(crate) fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot::Confetti {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.width * CONFETTI_HEIGHT_RATIO,
            rotation: self.rotation,
            color: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn fireworks_launch_below_the_stage_and_climb() {
        let bounds = StageBounds::new(600.0, 600.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let firework = Firework::launch(&mut rng, bounds);

        let (x, y) = firework.position();
        assert!(x >= FIREWORK_LAUNCH_MARGIN);
        assert!(x <= bounds.width() - FIREWORK_LAUNCH_MARGIN);
        assert!(y > bounds.height());
        assert!(firework.velocity_y < 0.0);
        assert!(!firework.reached_apex());
    }

    #[test]
    fn fireworks_reach_apex_as_gravity_wins() {
        let bounds = StageBounds::new(600.0, 600.0);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut firework = Firework::launch(&mut rng, bounds);

        let mut steps = 0;
        while !firework.reached_apex() && steps < 600 {
            firework.integrate(1.0 / 60.0);
            steps += 1;
        }

        assert!(firework.reached_apex(), "firework never stalled");
        // Slowest launch is -420 px/s against 540 px/s^2 of gravity, so the
        // apex arrives within a second.
        assert!(steps <= 60);
    }

    #[test]
    fn embers_expire_at_end_of_life() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut ember = Ember::scatter(&mut rng, 100.0, 100.0, HslColor::new(10.0, 0.8, 0.6));

        assert!(!ember.expired());
        for _ in 0..120 {
            ember.integrate(1.0 / 60.0);
        }
        assert!(ember.expired());
    }

    #[test]
    fn ember_fade_shrinks_radius_and_alpha() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut ember = Ember::scatter(&mut rng, 0.0, 0.0, HslColor::new(200.0, 0.8, 0.6));

        let fresh = ember.snapshot();
        ember.integrate(0.5);
        let aged = ember.snapshot();

        let (
            ParticleSnapshot::Ember {
                radius: fresh_radius,
                alpha: fresh_alpha,
                ..
            },
            ParticleSnapshot::Ember {
                radius: aged_radius,
                alpha: aged_alpha,
                ..
            },
        ) = (fresh, aged)
        else {
            panic!("ember snapshots expected");
        };

        assert!(aged_alpha < fresh_alpha);
        assert!(aged_radius <= fresh_radius);
        assert!(aged_radius >= 1.0);
    }

    #[test]
    fn confetti_spawns_above_the_stage_and_falls_out() {
        let bounds = StageBounds::new(600.0, 600.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut piece = ConfettiPiece::spawn(&mut rng, bounds);

        assert!(piece.y <= 0.0);
        assert!(!piece.below_stage(bounds));

        for _ in 0..(20 * 60) {
            piece.integrate(1.0 / 60.0);
        }
        assert!(piece.below_stage(bounds));
    }
}
