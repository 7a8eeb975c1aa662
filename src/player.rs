/// The player's cannon: horizontal movement, firing and the
/// `Alive → Exploding → Reviving → Alive` cycle.
use rand::Rng;

use crate::bullet::Bullet;
use crate::config::PlayerConfig;
use crate::environment::PLAY_AREA;
use crate::gun::{Gun, Owner};
use crate::input::InputSnapshot;
use crate::vector::{Size, Vector};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerStatus {
    Alive,
    /// Just hit: frozen in place, cannot move or fire.
    Exploding,
    /// Back at the spawn point; can move and fire but cannot be hit.
    Reviving,
}

#[derive(Clone, Debug)]
pub struct Player {
    config: PlayerConfig,
    position: Vector,
    gun: Gun,
    lives: u32,
    score: u32,
    status: PlayerStatus,
    /// Seconds spent in the current `Exploding`/`Reviving` status.
    status_timer: f32,
}

impl Player {
    pub fn new(config: &PlayerConfig, rng: &mut impl Rng) -> Self {
        Self {
            config: *config,
            position: config.spawn,
            gun: Gun::new(Owner::Player, &config.gun, rng),
            lives: config.lives,
            score: 0,
            status: PlayerStatus::Alive,
            status_timer: 0.0,
        }
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn size(&self) -> Size {
        self.config.size
    }

    pub fn gun(&self) -> &Gun {
        &self.gun
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn is_alive(&self) -> bool {
        self.status == PlayerStatus::Alive
    }

    /// Seconds elapsed in the current non-`Alive` status.
    pub fn status_timer(&self) -> f32 {
        self.status_timer
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    pub fn gain_life(&mut self) {
        self.lives += 1;
    }

    pub fn reset_gun(&mut self, rng: &mut impl Rng) {
        self.gun.reset(rng);
    }

    /// Take a hit: lose a life and start exploding.  Ignored unless `Alive`.
    pub fn hit(&mut self) {
        if self.status != PlayerStatus::Alive {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        self.status = PlayerStatus::Exploding;
        self.status_timer = 0.0;
        tracing::debug!(lives = self.lives, "player hit");
    }

    /// Advance one tick.  Returns the bullet fired this tick, if any;
    /// `may_fire` is false while a previous player bullet is still in flight.
    pub fn update(
        &mut self,
        time_step: f32,
        input: &InputSnapshot,
        may_fire: bool,
        rng: &mut impl Rng,
    ) -> Option<Bullet> {
        self.gun.update(time_step);

        match self.status {
            PlayerStatus::Exploding => {
                self.status_timer += time_step;
                if self.status_timer >= self.config.explode_duration {
                    self.status = PlayerStatus::Reviving;
                    self.status_timer = 0.0;
                    self.position = self.config.spawn;
                }
                return None;
            }
            PlayerStatus::Reviving => {
                self.status_timer += time_step;
                if self.status_timer >= self.config.revive_duration {
                    self.status = PlayerStatus::Alive;
                    self.status_timer = 0.0;
                }
            }
            PlayerStatus::Alive => {}
        }

        self.steer(time_step, input);

        if input.fire && may_fire {
            let muzzle = self.position + Vector::new(self.config.size.w / 2.0, 0.0);
            return self.gun.fire(muzzle, Vector::UP, rng);
        }
        None
    }

    fn steer(&mut self, time_step: f32, input: &InputSnapshot) {
        let heading = match (input.move_left, input.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => return,
        };
        let min_x = self.config.side_padding;
        let max_x = PLAY_AREA - self.config.side_padding - self.config.size.w;
        let x = (self.position.x + heading * self.config.speed * time_step).clamp(min_x, max_x);
        self.position = self.position.with_x(x);
    }
}
