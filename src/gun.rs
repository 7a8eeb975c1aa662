/// Fire-rate limiter and bullet factory shared by the player and the aliens.
use rand::Rng;

use crate::bullet::Bullet;
use crate::config::GunConfig;
use crate::vector::{Size, Vector};

/// Relative spread applied to every redrawn fire interval (±20%).
pub const FIRE_JITTER: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Player,
    Alien,
}

/// Draw a value uniformly within ±[`FIRE_JITTER`] of `base`.
pub fn jittered(base: f32, rng: &mut impl Rng) -> f32 {
    base * rng.gen_range((1.0 - FIRE_JITTER)..=(1.0 + FIRE_JITTER))
}

#[derive(Clone, Debug)]
pub struct Gun {
    owner: Owner,
    bullet_speed: f32,
    bullet_size: Size,
    base_fire_interval: f32,
    current_fire_interval: f32,
    time_since_last_shot: f32,
}

impl Gun {
    pub fn new(owner: Owner, config: &GunConfig, rng: &mut impl Rng) -> Self {
        let mut gun = Self {
            owner,
            bullet_speed: config.bullet_speed,
            bullet_size: config.bullet_size,
            base_fire_interval: config.fire_interval,
            current_fire_interval: 0.0,
            time_since_last_shot: 0.0,
        };
        gun.reset(rng);
        gun
    }

    /// Re-randomize the cooldown so guns created together don't fire in lockstep.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        if self.fires_unconditionally() {
            self.current_fire_interval = 0.0;
            self.time_since_last_shot = 0.0;
            return;
        }
        self.current_fire_interval = jittered(self.base_fire_interval, rng);
        self.time_since_last_shot = rng.gen_range(0.0..self.current_fire_interval);
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn current_fire_interval(&self) -> f32 {
        self.current_fire_interval
    }

    pub fn time_since_last_shot(&self) -> f32 {
        self.time_since_last_shot
    }

    fn fires_unconditionally(&self) -> bool {
        self.base_fire_interval == 0.0
    }

    pub fn can_fire(&self) -> bool {
        self.fires_unconditionally() || self.time_since_last_shot >= self.current_fire_interval
    }

    pub fn update(&mut self, time_step: f32) {
        if self.fires_unconditionally() {
            return;
        }
        self.time_since_last_shot += time_step;
    }

    /// Fire from `muzzle` along `direction` (a unit vector).
    ///
    /// The bullet is centred horizontally on the muzzle; upward shots spawn
    /// just above it, downward shots just below.  Returns `None` while cooling
    /// down, leaving the gun untouched.
    pub fn fire(&mut self, muzzle: Vector, direction: Vector, rng: &mut impl Rng) -> Option<Bullet> {
        if !self.can_fire() {
            return None;
        }
        if !self.fires_unconditionally() {
            self.time_since_last_shot = 0.0;
            self.current_fire_interval = jittered(self.base_fire_interval, rng);
        }

        let y = if direction.y < 0.0 {
            muzzle.y - self.bullet_size.h
        } else {
            muzzle.y
        };
        let position = Vector::new(muzzle.x - self.bullet_size.w / 2.0, y);
        Some(Bullet::new(
            self.owner,
            position,
            direction * self.bullet_speed,
            self.bullet_size,
        ))
    }
}
