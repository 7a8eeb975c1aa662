//! Arcade invaders simulation.
//!
//! The library is render-agnostic: a driver feeds `(time_step, InputSnapshot)`
//! into [`GameState::update`] and reads back a [`GameView`].  All coordinates
//! live in a 0–100 percentage space with `y` growing downwards.

pub mod alien;
pub mod boss;
pub mod bullet;
pub mod config;
pub mod environment;
pub mod error;
pub mod game_state;
pub mod gun;
pub mod input;
pub mod layout;
pub mod player;
pub mod vector;
pub mod wall;

pub use game_state::{GameState, GameStatus, GameView};
pub use input::InputSnapshot;
