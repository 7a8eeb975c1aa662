use crate::environment::PLAY_AREA;
use crate::gun::Owner;
use crate::vector::{Size, Vector};

/// Projectile.  Owner, velocity and size are fixed at creation; only the
/// position moves.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    owner: Owner,
    position: Vector,
    velocity: Vector,
    size: Size,
}

impl Bullet {
    pub fn new(owner: Owner, position: Vector, velocity: Vector, size: Size) -> Self {
        Self {
            owner,
            position,
            velocity,
            size,
        }
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn update(&mut self, time_step: f32) {
        self.position = self.position + self.velocity * time_step;
    }

    /// Fully outside the 0–100 play area on either axis.
    pub fn is_out_of_bounds(&self) -> bool {
        self.position.x <= -self.size.w
            || self.position.x >= PLAY_AREA
            || self.position.y <= -self.size.h
            || self.position.y >= PLAY_AREA
    }
}
