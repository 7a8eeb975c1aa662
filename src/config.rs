/// Game tunables and the driver's environment-derived settings.
///
/// Distances are in percentage space (0–100), times in seconds, speeds in
/// percent per second.
use std::time::Duration;

use crate::error::ConfigError;
use crate::vector::{Size, Vector};

// ── Difficulty ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    /// Multiplier applied to the formation's starting move interval.
    fn move_interval_scale(self) -> f32 {
        match self {
            Level::Easy => 1.3,
            Level::Medium => 1.0,
            Level::Hard => 0.7,
        }
    }

    /// Multiplier applied to every alien gun's base fire interval.
    fn fire_interval_scale(self) -> f32 {
        match self {
            Level::Easy => 1.5,
            Level::Medium => 1.0,
            Level::Hard => 0.6,
        }
    }

    fn boss_interval_scale(self) -> f32 {
        match self {
            Level::Easy => 0.8,
            Level::Medium => 1.0,
            Level::Hard => 1.2,
        }
    }
}

// ── Per-entity sections ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GunConfig {
    pub bullet_speed: f32,
    pub bullet_size: Size,
    /// Seconds between shots; `0.0` means "fire on every call".
    pub fire_interval: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerConfig {
    pub size: Size,
    /// Top-left corner the player starts at and is returned to when reviving.
    pub spawn: Vector,
    pub speed: f32,
    /// Closest the player may get to either side edge.
    pub side_padding: f32,
    pub lives: u32,
    pub explode_duration: f32,
    pub revive_duration: f32,
    pub gun: GunConfig,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlienConfig {
    pub size: Size,
    /// Distance between the top-left corners of neighbouring grid cells.
    pub pitch: Vector,
    /// Descent speed while the formation is entering.
    pub entry_speed: f32,
    /// Resting vertical offset of the first wave.
    pub rest_top: f32,
    /// Extra resting offset added per cleared wave.
    pub wave_drop: f32,
    pub max_rest_top: f32,
    pub move_interval: f32,
    /// Multiplicative factor applied to the move interval on every kill.
    pub speed_up: f32,
    pub step_x: f32,
    pub step_y: f32,
    pub side_padding: f32,
    pub gun: GunConfig,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossConfig {
    pub size: Size,
    pub y: f32,
    pub speed: f32,
    pub score: u32,
    /// Base seconds between appearances (jittered ±20%).
    pub appear_interval: f32,
    pub explode_duration: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallConfig {
    pub count: usize,
    pub size: Size,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub alien: AlienConfig,
    pub boss: BossConfig,
    pub wall: WallConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        let bullet_size = Size::new(0.6, 2.5);
        Self {
            player: PlayerConfig {
                size: Size::new(6.0, 4.0),
                spawn: Vector::new(47.0, 90.0),
                speed: 50.0,
                side_padding: 2.0,
                lives: 3,
                explode_duration: 1.5,
                revive_duration: 2.0,
                gun: GunConfig {
                    bullet_speed: 90.0,
                    bullet_size,
                    fire_interval: 0.35,
                },
            },
            alien: AlienConfig {
                size: Size::new(5.0, 4.0),
                pitch: Vector::new(7.0, 6.0),
                entry_speed: 25.0,
                rest_top: 12.0,
                wave_drop: 4.0,
                max_rest_top: 32.0,
                move_interval: 0.7,
                speed_up: 0.96,
                step_x: 2.0,
                step_y: 3.0,
                side_padding: 2.0,
                gun: GunConfig {
                    bullet_speed: 40.0,
                    bullet_size,
                    fire_interval: 45.0,
                },
            },
            boss: BossConfig {
                size: Size::new(8.0, 4.0),
                y: 5.0,
                speed: 15.0,
                score: 100,
                appear_interval: 25.0,
                explode_duration: 1.0,
            },
            wall: WallConfig {
                count: 4,
                size: Size::new(10.0, 6.0),
                y: 76.0,
            },
        }
    }
}

impl GameConfig {
    /// The default game tuned for a difficulty level.
    pub fn for_level(level: Level) -> Self {
        let mut config = Self::default();
        config.alien.move_interval *= level.move_interval_scale();
        config.alien.gun.fire_interval *= level.fire_interval_scale();
        config.boss.appear_interval *= level.boss_interval_scale();
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("player.speed", self.player.speed)?;
        positive("player.explode_duration", self.player.explode_duration)?;
        positive("player.revive_duration", self.player.revive_duration)?;
        positive("alien.move_interval", self.alien.move_interval)?;
        positive("alien.entry_speed", self.alien.entry_speed)?;
        positive("alien.step_x", self.alien.step_x)?;
        positive("alien.step_y", self.alien.step_y)?;
        positive("boss.speed", self.boss.speed)?;
        positive("boss.appear_interval", self.boss.appear_interval)?;
        if self.player.lives == 0 {
            return Err(ConfigError::NotPositive("player.lives"));
        }
        if !(self.alien.speed_up > 0.0 && self.alien.speed_up <= 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "alien.speed_up",
                range: "(0, 1]",
                value: self.alien.speed_up,
            });
        }
        for (name, gun) in [("player.gun", &self.player.gun), ("alien.gun", &self.alien.gun)] {
            if gun.fire_interval < 0.0 {
                return Err(ConfigError::OutOfRange {
                    name,
                    range: "[0, inf)",
                    value: gun.fire_interval,
                });
            }
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive(name))
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Settings for the terminal front-end, read from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverConfig {
    /// Target duration of one frame.
    pub frame: Duration,
    /// Upper bound on the time step handed to the simulation.
    pub max_time_step: f32,
    /// Fixed RNG seed; a fresh one is drawn per game when `None`.
    pub seed: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frame: Duration::from_millis(33), // ≈30 FPS
            max_time_step: 0.1,
            seed: None,
        }
    }
}

impl DriverConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(fps) = std::env::var("INVADERS_FPS") {
            match fps.parse::<u32>() {
                Ok(parsed) if (1..=240).contains(&parsed) => {
                    config.frame = Duration::from_secs_f64(1.0 / parsed as f64);
                }
                Ok(_) => tracing::warn!("INVADERS_FPS must be 1-240, using default"),
                Err(_) => tracing::warn!("Invalid INVADERS_FPS '{}', using default", fps),
            }
        }

        if let Ok(ms) = std::env::var("INVADERS_MAX_TIMESTEP_MS") {
            match ms.parse::<u32>() {
                Ok(parsed) if parsed > 0 => config.max_time_step = parsed as f32 / 1000.0,
                Ok(_) => tracing::warn!("INVADERS_MAX_TIMESTEP_MS must be > 0, using default"),
                Err(_) => {
                    tracing::warn!("Invalid INVADERS_MAX_TIMESTEP_MS '{}', using default", ms)
                }
            }
        }

        if let Ok(seed) = std::env::var("INVADERS_SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => config.seed = Some(parsed),
                Err(_) => tracing::warn!("Invalid INVADERS_SEED '{}', ignoring", seed),
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame.is_zero() {
            return Err(ConfigError::NotPositive("frame"));
        }
        positive("max_time_step", self.max_time_step)
    }

    /// Clamp a measured frame delta to what the simulation accepts.
    pub fn clamp_time_step(&self, elapsed: Duration) -> f32 {
        elapsed.as_secs_f32().min(self.max_time_step)
    }
}
