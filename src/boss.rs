/// The bonus ship that periodically crosses the top of the screen.
use crate::config::BossConfig;
use crate::environment::PLAY_AREA;
use crate::vector::{Direction, Size, Vector};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossStatus {
    Alive,
    Exploding,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Boss {
    config: BossConfig,
    position: Vector,
    status: BossStatus,
    direction: Direction,
    explode_timer: f32,
}

impl Boss {
    /// Spawn just off-screen on the edge opposite to `direction`.
    pub fn new(config: &BossConfig, direction: Direction) -> Self {
        let x = match direction {
            Direction::Right => -config.size.w,
            Direction::Left => PLAY_AREA,
        };
        Self {
            config: *config,
            position: Vector::new(x, config.y),
            status: BossStatus::Alive,
            direction,
            explode_timer: 0.0,
        }
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn size(&self) -> Size {
        self.config.size
    }

    pub fn status(&self) -> BossStatus {
        self.status
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_alive(&self) -> bool {
        self.status == BossStatus::Alive
    }

    pub fn is_dead(&self) -> bool {
        self.status == BossStatus::Dead
    }

    /// Shot down.  Returns the score awarded, or `None` if it wasn't alive.
    pub fn hit(&mut self) -> Option<u32> {
        if self.status != BossStatus::Alive {
            return None;
        }
        self.status = BossStatus::Exploding;
        self.explode_timer = 0.0;
        Some(self.config.score)
    }

    pub fn update(&mut self, time_step: f32) {
        match self.status {
            BossStatus::Alive => {
                let dx = self.direction.sign() * self.config.speed * time_step;
                self.position = self.position + Vector::new(dx, 0.0);
            }
            BossStatus::Exploding => {
                self.explode_timer += time_step;
                if self.explode_timer >= self.config.explode_duration {
                    self.status = BossStatus::Dead;
                }
            }
            BossStatus::Dead => {}
        }
    }

    /// Has it crossed the whole screen and left on the far side?
    pub fn is_out_of_bounds(&self) -> bool {
        match self.direction {
            Direction::Right => self.position.x >= PLAY_AREA,
            Direction::Left => self.position.x <= -self.config.size.w,
        }
    }
}
