/// The orchestrator: owns every entity and runs the per-frame pipeline.
///
/// Each tick is strictly ordered:
///
/// 1. nothing happens unless the game is running;
/// 2. the player moves/fires; an exploding player freezes the world;
/// 3. the formation moves; while it is still entering nothing else runs;
/// 4. every ready alien gun fires;
/// 5. bullets advance and are resolved against player, aliens, boss, walls;
/// 6. the boss spawns, moves or despawns;
/// 7. the formation grinds down any wall it touches;
/// 8. a cleared wave is replaced, or the game is lost.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::alien::AlienSet;
use crate::boss::Boss;
use crate::bullet::Bullet;
use crate::config::GameConfig;
use crate::environment::{GameEnvironment, PLAY_AREA};
use crate::error::GameError;
use crate::gun::{jittered, Owner};
use crate::input::InputSnapshot;
use crate::layout::{AlienLayout, WallLayout, CANONICAL_ALIEN_PLAN, CANONICAL_WALL_PLAN};
use crate::player::{Player, PlayerStatus};
use crate::vector::{Direction, Vector};
use crate::wall::Wall;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Start,
    Running,
    Paused,
    Lost,
}

/// Read-only view handed to a renderer between ticks.
#[derive(Clone, Copy, Debug)]
pub struct GameView<'a> {
    pub alien_set: &'a AlienSet,
    pub player: &'a Player,
    pub bullets: &'a [Bullet],
    pub boss: Option<&'a Boss>,
    pub walls: &'a [Wall],
    pub status: GameStatus,
    pub wave: u32,
    pub aliens_killed: u32,
    pub bosses_killed: u32,
    pub best_score: u32,
}

#[derive(Clone, Debug)]
pub struct GameState {
    config: GameConfig,
    alien_layout: AlienLayout,
    wall_layout: WallLayout,
    rng: StdRng,
    environment: GameEnvironment,

    alien_set: AlienSet,
    player: Player,
    walls: Vec<Wall>,
    bullets: Vec<Bullet>,
    boss: Option<Boss>,

    status: GameStatus,
    /// Number of waves cleared so far; offsets each new formation's resting height.
    wave: u32,
    aliens_killed: u32,
    bosses_killed: u32,
    best_score: u32,
    is_player_bullet_present: bool,
    time_since_boss: f32,
    next_boss_interval: f32,
    /// Pause key state last frame, so holding it toggles only once.
    pause_held: bool,
}

impl GameState {
    /// A new game on the canonical alien and wall plans.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_plans(config, CANONICAL_ALIEN_PLAN, CANONICAL_WALL_PLAN, seed)
    }

    /// A new game on custom plans.  The config and plans are validated here,
    /// once; later waves reuse the parsed layout.
    pub fn with_plans(
        config: GameConfig,
        alien_plan: &str,
        wall_plan: &str,
        seed: u64,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let alien_layout = AlienLayout::parse(alien_plan)?;
        let wall_layout = WallLayout::parse(wall_plan)?;
        let mut rng = StdRng::seed_from_u64(seed);

        let alien_set = AlienSet::new(&alien_layout, &config.alien, 0, &mut rng);
        let player = Player::new(&config.player, &mut rng);
        let walls = build_walls(&config, &wall_layout);
        let next_boss_interval = jittered(config.boss.appear_interval, &mut rng);

        Ok(Self {
            config,
            alien_layout,
            wall_layout,
            rng,
            environment: GameEnvironment::new(),
            alien_set,
            player,
            walls,
            bullets: Vec::new(),
            boss: None,
            status: GameStatus::Start,
            wave: 0,
            aliens_killed: 0,
            bosses_killed: 0,
            best_score: 0,
            is_player_bullet_present: false,
            time_since_boss: 0.0,
            next_boss_interval,
            pause_held: false,
        })
    }

    /// Carry a best score over from an earlier game in this process.
    pub fn with_best_score(mut self, best_score: u32) -> Self {
        self.best_score = best_score;
        self
    }

    // ── Read access ──────────────────────────────────────────────────────────

    pub fn view(&self) -> GameView<'_> {
        GameView {
            alien_set: &self.alien_set,
            player: &self.player,
            bullets: &self.bullets,
            boss: self.boss.as_ref(),
            walls: &self.walls,
            status: self.status,
            wave: self.wave,
            aliens_killed: self.aliens_killed,
            bosses_killed: self.bosses_killed,
            best_score: self.best_score(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn alien_set(&self) -> &AlienSet {
        &self.alien_set
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn aliens_killed(&self) -> u32 {
        self.aliens_killed
    }

    pub fn bosses_killed(&self) -> u32 {
        self.bosses_killed
    }

    /// Highest score seen in this process, including the game in progress.
    pub fn best_score(&self) -> u32 {
        self.best_score.max(self.player.score())
    }

    pub fn is_player_bullet_present(&self) -> bool {
        self.is_player_bullet_present
    }

    /// Inject a projectile, e.g. for scripted scenarios.
    pub fn push_bullet(&mut self, bullet: Bullet) {
        if bullet.owner() == Owner::Player {
            self.is_player_bullet_present = true;
        }
        self.bullets.push(bullet);
    }

    // ── Meta controls ────────────────────────────────────────────────────────

    /// Apply start/pause/restart.  Pause toggles on press, not while held.
    pub fn handle_controls(&mut self, input: &InputSnapshot) {
        let pause_pressed = input.pause && !self.pause_held;
        self.pause_held = input.pause;

        match self.status {
            GameStatus::Start if input.start => self.status = GameStatus::Running,
            GameStatus::Running if pause_pressed => {
                self.status = GameStatus::Paused;
                tracing::debug!("paused");
            }
            GameStatus::Paused if pause_pressed => {
                self.status = GameStatus::Running;
                tracing::debug!("resumed");
            }
            GameStatus::Paused | GameStatus::Lost if input.restart => self.restart(),
            _ => {}
        }
    }

    /// Start over at wave 0, keeping the best score and the RNG stream.
    pub fn restart(&mut self) {
        self.best_score = self.best_score();
        self.alien_set = AlienSet::new(&self.alien_layout, &self.config.alien, 0, &mut self.rng);
        self.player = Player::new(&self.config.player, &mut self.rng);
        self.walls = build_walls(&self.config, &self.wall_layout);
        self.bullets.clear();
        self.boss = None;
        self.status = GameStatus::Start;
        self.wave = 0;
        self.aliens_killed = 0;
        self.bosses_killed = 0;
        self.is_player_bullet_present = false;
        self.time_since_boss = 0.0;
        self.next_boss_interval = jittered(self.config.boss.appear_interval, &mut self.rng);
        tracing::debug!(best_score = self.best_score, "restarted");
    }

    // ── Per-frame pipeline ───────────────────────────────────────────────────

    pub fn update(&mut self, time_step: f32, input: &InputSnapshot) {
        if self.status != GameStatus::Running {
            return;
        }

        let may_fire = !self.is_player_bullet_present;
        if let Some(bullet) = self.player.update(time_step, input, may_fire, &mut self.rng) {
            self.bullets.push(bullet);
            self.is_player_bullet_present = true;
        }
        if self.player.status() == PlayerStatus::Exploding {
            return;
        }

        self.alien_set.update(time_step);
        if self.alien_set.is_entering() {
            return;
        }

        let fired = self.alien_set.fire(&mut self.rng);
        self.bullets.extend(fired);

        self.resolve_bullets(time_step);
        self.update_boss(time_step);
        self.wear_walls();
        self.resolve_end_of_tick();
    }

    fn resolve_bullets(&mut self, time_step: f32) {
        let bullets = std::mem::take(&mut self.bullets);
        let mut kept = Vec::with_capacity(bullets.len());
        let mut alien_died = false;

        for mut bullet in bullets {
            bullet.update(time_step);
            let from_player = bullet.owner() == Owner::Player;

            let dropped = if self.environment.is_out_of_bounds(&bullet) {
                true
            } else if !from_player {
                self.hit_player(&bullet)
            } else if self.hit_alien(&bullet) {
                alien_died = true;
                true
            } else {
                self.hit_boss(&bullet)
            };

            let dropped = dropped
                || self
                    .walls
                    .iter_mut()
                    .any(|wall| wall.collide(bullet.position(), bullet.size()));

            if dropped {
                if from_player {
                    self.is_player_bullet_present = false;
                }
                continue;
            }
            kept.push(bullet);
        }

        self.bullets = kept;
        if alien_died {
            self.alien_set.adapt();
        }
    }

    fn hit_player(&mut self, bullet: &Bullet) -> bool {
        if !self.player.is_alive() || !self.environment.bullet_hits_player(bullet, &self.player) {
            return false;
        }
        self.player.hit();
        true
    }

    /// First living alien (row-major) under the bullet is killed.
    fn hit_alien(&mut self, bullet: &Bullet) -> bool {
        let size = self.alien_set.alien_size();
        let target = self
            .alien_set
            .living()
            .map(|(row, column, _)| (row, column))
            .find(|&(row, column)| {
                self.environment
                    .bullet_hits(bullet, self.alien_set.alien_position(row, column), size)
            });

        let Some((row, column)) = target else {
            return false;
        };
        if let Some(score) = self.alien_set.kill(row, column) {
            self.player.add_score(score);
            self.aliens_killed += 1;
        }
        true
    }

    fn hit_boss(&mut self, bullet: &Bullet) -> bool {
        let Some(boss) = self.boss.as_mut() else {
            return false;
        };
        if !boss.is_alive() || !self.environment.bullet_hits(bullet, boss.position(), boss.size()) {
            return false;
        }
        if let Some(score) = boss.hit() {
            self.player.add_score(score);
            self.bosses_killed += 1;
            tracing::debug!(score, "boss destroyed");
        }
        true
    }

    fn update_boss(&mut self, time_step: f32) {
        let Some(boss) = self.boss.as_mut() else {
            self.time_since_boss += time_step;
            if self.time_since_boss >= self.next_boss_interval {
                let direction = if self.rng.gen_bool(0.5) {
                    Direction::Right
                } else {
                    Direction::Left
                };
                self.boss = Some(Boss::new(&self.config.boss, direction));
                self.time_since_boss = 0.0;
                tracing::debug!(?direction, "boss spawned");
            }
            return;
        };

        boss.update(time_step);
        let (dead, escaped) = (boss.is_dead(), boss.is_out_of_bounds());
        if dead {
            self.boss = None;
            self.next_boss_interval = jittered(self.config.boss.appear_interval, &mut self.rng);
        } else if escaped {
            self.boss = None;
            tracing::debug!("boss escaped");
        }
    }

    /// Aliens chew through any wall piece they overlap.
    fn wear_walls(&mut self) {
        let size = self.alien_set.alien_size();
        for (row, column, _) in self.alien_set.living() {
            let position = self.alien_set.alien_position(row, column);
            for wall in &mut self.walls {
                wall.collide(position, size);
            }
        }
    }

    fn resolve_end_of_tick(&mut self) {
        if self.alien_set.alive_count() == 0 {
            self.wave += 1;
            self.alien_set =
                AlienSet::new(&self.alien_layout, &self.config.alien, self.wave, &mut self.rng);
            self.bullets.clear();
            self.is_player_bullet_present = false;
            self.player.gain_life();
            self.player.reset_gun(&mut self.rng);
            tracing::debug!(wave = self.wave, lives = self.player.lives(), "wave cleared");
        } else if self.player.lives() < 1
            || self
                .environment
                .formation_reached_player(&self.alien_set, &self.player)
        {
            self.status = GameStatus::Lost;
            self.best_score = self.best_score();
            tracing::debug!(score = self.player.score(), wave = self.wave, "game lost");
        }
    }
}

/// Walls spread evenly across the screen at the configured height.
fn build_walls(config: &GameConfig, layout: &WallLayout) -> Vec<Wall> {
    let count = config.wall.count;
    let size = config.wall.size;
    (0..count)
        .map(|i| {
            let centre = PLAY_AREA * (i + 1) as f32 / (count + 1) as f32;
            Wall::new(Vector::new(centre - size.w / 2.0, config.wall.y), size, layout)
        })
        .collect()
}
