/// Pure collision predicates.  Every collision in the game reduces to
/// [`overlaps`], a strict axis-aligned box test.
use crate::alien::AlienSet;
use crate::bullet::Bullet;
use crate::player::Player;
use crate::vector::{Size, Vector};

/// Edge length of the square percentage-space play area.
pub const PLAY_AREA: f32 = 100.0;

/// Do two boxes overlap?  Boxes that merely touch along an edge do not.
pub fn overlaps(a_pos: Vector, a_size: Size, b_pos: Vector, b_size: Size) -> bool {
    a_pos.x < b_pos.x + b_size.w
        && a_pos.x + a_size.w > b_pos.x
        && a_pos.y < b_pos.y + b_size.h
        && a_pos.y + a_size.h > b_pos.y
}

/// Stateless query helpers over the game's entities.
#[derive(Clone, Copy, Debug, Default)]
pub struct GameEnvironment;

impl GameEnvironment {
    pub fn new() -> Self {
        Self
    }

    pub fn is_out_of_bounds(&self, bullet: &Bullet) -> bool {
        bullet.is_out_of_bounds()
    }

    pub fn bullet_hits(&self, bullet: &Bullet, position: Vector, size: Size) -> bool {
        overlaps(bullet.position(), bullet.size(), position, size)
    }

    pub fn bullet_hits_player(&self, bullet: &Bullet, player: &Player) -> bool {
        self.bullet_hits(bullet, player.position(), player.size())
    }

    /// Has the formation's lower edge come down to the player's row?
    pub fn formation_reached_player(&self, alien_set: &AlienSet, player: &Player) -> bool {
        alien_set.position().y + alien_set.size().h >= player.position().y
    }
}
