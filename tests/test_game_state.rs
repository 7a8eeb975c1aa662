use alien_invasion::alien::Cell;
use alien_invasion::bullet::Bullet;
use alien_invasion::config::{GameConfig, Level};
use alien_invasion::error::{ConfigError, GameError, LayoutError};
use alien_invasion::gun::Owner;
use alien_invasion::layout::CANONICAL_WALL_PLAN;
use alien_invasion::player::PlayerStatus;
use alien_invasion::vector::{Size, Vector};
use alien_invasion::{GameState, GameStatus, InputSnapshot};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BULLET: Size = Size { w: 0.6, h: 2.5 };

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

/// No alien fire, no boss, no walls: only what a test sets up happens.
fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.alien.gun.fire_interval = 1.0e6;
    config.boss.appear_interval = 1.0e6;
    config.wall.count = 0;
    config
}

fn input(f: impl FnOnce(&mut InputSnapshot)) -> InputSnapshot {
    let mut snapshot = InputSnapshot::NONE;
    f(&mut snapshot);
    snapshot
}

/// Started game whose formation has already landed.
fn running(config: GameConfig, plan: &str) -> GameState {
    let mut state = GameState::with_plans(config, plan, CANONICAL_WALL_PLAN, 1).unwrap();
    state.handle_controls(&input(|i| i.start = true));
    assert_eq!(state.status(), GameStatus::Running);
    state.update(10.0, &InputSnapshot::NONE);
    assert!(!state.alien_set().is_entering());
    state
}

fn tick(state: &mut GameState, time_step: f32) {
    state.update(time_step, &InputSnapshot::NONE);
}

fn alien_bullet(x: f32, y: f32) -> Bullet {
    Bullet::new(Owner::Alien, Vector::new(x, y), Vector::new(0.0, 40.0), BULLET)
}

fn player_bullet(x: f32, y: f32) -> Bullet {
    Bullet::new(Owner::Player, Vector::new(x, y), Vector::new(0.0, -90.0), BULLET)
}

/// Alien bullet placed to land on the player during the next short tick.
fn shoot_player(state: &mut GameState) {
    let at = state.player().position();
    state.push_bullet(alien_bullet(at.x + 2.0, at.y - 1.0));
    tick(state, 0.01);
}

// ── Flow ──────────────────────────────────────────────────────────────────────

#[test]
fn nothing_moves_before_start() {
    let mut state = GameState::new(quiet_config(), 3).unwrap();
    let at = state.alien_set().position();

    state.update(1.0, &input(|i| i.move_right = true));

    assert_eq!(state.status(), GameStatus::Start);
    assert_eq!(state.alien_set().position(), at);
    assert_eq!(state.player().position(), quiet_config().player.spawn);
}

#[test]
fn canonical_game_starts_with_full_board() {
    let state = GameState::new(GameConfig::default(), 3).unwrap();
    assert_eq!(state.alien_set().alive_count(), 55);
    assert_eq!(state.walls().len(), 4);
    assert_eq!(state.player().lives(), 3);
    assert_eq!(state.wave(), 0);
    assert!(state.bullets().is_empty());
    assert!(state.boss().is_none());
}

#[test]
fn bad_plan_is_rejected() {
    assert!(matches!(
        GameState::with_plans(quiet_config(), "AB\nA", CANONICAL_WALL_PLAN, 0),
        Err(GameError::Layout(LayoutError::RaggedRow { .. }))
    ));
    assert!(matches!(
        GameState::with_plans(quiet_config(), "...", CANONICAL_WALL_PLAN, 0),
        Err(GameError::Layout(LayoutError::NoAliens))
    ));
}

#[test]
fn bad_config_is_rejected() {
    let mut config = quiet_config();
    config.alien.gun.fire_interval = -1.0;
    assert!(matches!(
        GameState::new(config, 1),
        Err(GameError::Config(ConfigError::OutOfRange { name: "alien.gun", .. }))
    ));

    let mut config = quiet_config();
    config.alien.speed_up = 1.5;
    assert!(matches!(
        GameState::new(config, 1),
        Err(GameError::Config(ConfigError::OutOfRange { name: "alien.speed_up", .. }))
    ));

    let mut config = quiet_config();
    config.player.lives = 0;
    let err = GameState::new(config, 1).unwrap_err();
    assert_eq!(err, GameError::Config(ConfigError::NotPositive("player.lives")));
    assert_eq!(err.to_string(), "player.lives must be greater than zero");
}

#[test]
fn world_waits_for_the_entrance() {
    let mut config = quiet_config();
    config.player.gun.fire_interval = 0.0;
    let mut state = GameState::with_plans(config, "A", CANONICAL_WALL_PLAN, 1).unwrap();
    state.handle_controls(&input(|i| i.start = true));
    state.push_bullet(alien_bullet(20.0, 50.0));

    state.update(0.1, &input(|i| i.fire = true));

    assert!(state.alien_set().is_entering());
    // The player may act, but bullets are not advanced yet.
    assert_eq!(state.bullets().len(), 2);
    assert_eq!(state.bullets()[0].position(), Vector::new(20.0, 50.0));
}

#[test]
fn pause_toggles_once_per_press() {
    let mut state = running(quiet_config(), "A");
    let pause = input(|i| i.pause = true);

    state.handle_controls(&pause);
    assert_eq!(state.status(), GameStatus::Paused);
    state.handle_controls(&pause);
    assert_eq!(state.status(), GameStatus::Paused);

    let at = state.alien_set().position();
    state.update(5.0, &InputSnapshot::NONE);
    assert_eq!(state.alien_set().position(), at);

    state.handle_controls(&InputSnapshot::NONE);
    assert_eq!(state.status(), GameStatus::Paused);
    state.handle_controls(&pause);
    assert_eq!(state.status(), GameStatus::Running);
}

#[test]
fn restart_keeps_best_score() {
    let mut state = running(quiet_config(), "A");
    state.push_bullet(player_bullet(49.0, 14.0));
    tick(&mut state, 0.01);
    assert_eq!(state.player().score(), 30);

    // Ignored while running.
    state.handle_controls(&input(|i| i.restart = true));
    assert_eq!(state.status(), GameStatus::Running);

    state.handle_controls(&input(|i| i.pause = true));
    state.handle_controls(&input(|i| i.restart = true));

    assert_eq!(state.status(), GameStatus::Start);
    assert_eq!(state.wave(), 0);
    assert_eq!(state.player().score(), 0);
    assert_eq!(state.player().lives(), 3);
    assert_eq!(state.aliens_killed(), 0);
    assert_eq!(state.best_score(), 30);
    assert_eq!(state.view().best_score, 30);
}

// ── Waves ─────────────────────────────────────────────────────────────────────

#[test]
fn clearing_the_last_alien_starts_the_next_wave() {
    let mut state = running(quiet_config(), "A");
    assert!(approx(state.alien_set().position().x, 47.5));
    assert!(approx(state.alien_set().position().y, 12.0));

    state.push_bullet(player_bullet(49.0, 14.0));
    assert!(state.is_player_bullet_present());
    tick(&mut state, 0.01);

    assert_eq!(state.wave(), 1);
    assert_eq!(state.player().score(), 30);
    assert_eq!(state.player().lives(), 4);
    assert_eq!(state.aliens_killed(), 1);
    assert_eq!(state.status(), GameStatus::Running);
    assert!(state.bullets().is_empty());
    assert!(!state.is_player_bullet_present());

    let set = state.alien_set();
    assert_eq!(set.alive_count(), 1);
    assert!(set.is_entering());
    assert!(approx(set.rest_top(), 16.0));
}

#[test]
fn a_bullet_kills_at_most_one_alien() {
    let mut state = running(quiet_config(), "A\nA");
    let set = state.alien_set();
    // Long enough to straddle both rows.
    let at = set.position();
    state.push_bullet(Bullet::new(
        Owner::Player,
        Vector::new(at.x + 1.0, at.y + 2.0),
        Vector::new(0.0, -1.0),
        Size::new(0.6, 8.0),
    ));
    tick(&mut state, 0.01);

    assert_eq!(state.alien_set().alive_count(), 1);
    assert_eq!(state.aliens_killed(), 1);
    assert!(state.bullets().is_empty());
    // The top row went first, so the set shrank from above.
    assert_eq!(state.alien_set().rows(), 1);
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn alien_bullet_hits_player_and_freezes_the_world() {
    let mut state = running(quiet_config(), "A");
    shoot_player(&mut state);

    assert_eq!(state.player().lives(), 2);
    assert_eq!(state.player().status(), PlayerStatus::Exploding);
    assert_eq!(state.status(), GameStatus::Running);
    assert!(state.bullets().is_empty());

    state.push_bullet(alien_bullet(20.0, 50.0));
    let at = state.alien_set().position();
    tick(&mut state, 1.0);

    assert_eq!(state.alien_set().position(), at);
    assert_eq!(state.bullets()[0].position(), Vector::new(20.0, 50.0));
}

#[test]
fn reviving_player_is_invulnerable() {
    let mut state = running(quiet_config(), "A");
    shoot_player(&mut state);
    tick(&mut state, quiet_config().player.explode_duration);
    assert_eq!(state.player().status(), PlayerStatus::Reviving);
    assert_eq!(state.player().position(), quiet_config().player.spawn);

    shoot_player(&mut state);
    assert_eq!(state.player().lives(), 2);
    assert_eq!(state.bullets().len(), 1);
}

#[test]
fn losing_the_last_life_ends_the_game() {
    let mut config = quiet_config();
    config.player.lives = 1;
    let mut state = running(config, "A");
    state.push_bullet(player_bullet(10.0, 60.0));
    shoot_player(&mut state);

    assert_eq!(state.player().lives(), 0);
    assert_eq!(state.status(), GameStatus::Lost);

    // Frozen until restarted.
    let at = state.bullets()[0].position();
    tick(&mut state, 1.0);
    assert_eq!(state.bullets()[0].position(), at);

    state.handle_controls(&input(|i| i.restart = true));
    assert_eq!(state.status(), GameStatus::Start);
}

#[test]
fn formation_reaching_the_player_ends_the_game() {
    let mut config = quiet_config();
    config.alien.rest_top = 88.0;
    config.alien.max_rest_top = 90.0;
    let state = running(config, "A");
    assert_eq!(state.status(), GameStatus::Lost);
    assert_eq!(state.player().lives(), 3);
}

#[test]
fn one_player_bullet_in_flight() {
    let mut config = quiet_config();
    config.player.gun.fire_interval = 0.0;
    // Aliens flank the player's column so the shot flies off the top.
    let mut state = running(config, "A.........A");
    let fire = input(|i| i.fire = true);

    state.update(0.01, &fire);
    state.update(0.01, &fire);
    state.update(0.01, &fire);
    let from_player = |s: &GameState| {
        s.bullets()
            .iter()
            .filter(|b| b.owner() == Owner::Player)
            .count()
    };
    assert_eq!(from_player(&state), 1);
    assert!(state.is_player_bullet_present());

    for _ in 0..60 {
        tick(&mut state, 0.05);
    }
    assert_eq!(from_player(&state), 0);
    assert!(!state.is_player_bullet_present());

    state.update(0.01, &fire);
    assert_eq!(from_player(&state), 1);
}

// ── Walls ─────────────────────────────────────────────────────────────────────

#[test]
fn walls_absorb_bullets() {
    let mut config = quiet_config();
    config.wall.count = 1;
    let mut state = running(config, "A");
    let wall = &state.walls()[0];
    let solid = wall.solid_count();
    let centre = wall.position().x + wall.size().w / 2.0;
    let top = wall.position().y;

    // Lands on the wall's solid middle rows.
    state.push_bullet(alien_bullet(centre, top + 2.5));
    tick(&mut state, 0.01);

    assert!(state.bullets().is_empty());
    assert!(state.walls()[0].solid_count() < solid);
    assert_eq!(state.player().lives(), 3);
}

#[test]
fn player_shot_stopped_by_a_wall_frees_the_gun() {
    let mut config = quiet_config();
    config.wall.count = 1;
    config.player.gun.fire_interval = 0.0;
    let mut state = running(config, "A");
    let wall = &state.walls()[0];
    let centre = wall.position().x + wall.size().w / 2.0;
    let top = wall.position().y;
    let solid = wall.solid_count();

    state.push_bullet(player_bullet(centre, top + 3.0));
    assert!(state.is_player_bullet_present());
    tick(&mut state, 0.01);

    assert!(state.bullets().is_empty());
    assert!(!state.is_player_bullet_present());
    assert!(state.walls()[0].solid_count() < solid);
    assert_eq!(state.alien_set().alive_count(), 1);

    state.update(0.01, &input(|i| i.fire = true));
    assert_eq!(state.bullets().len(), 1);
}

#[test]
fn formation_wears_walls_down() {
    let mut config = quiet_config();
    config.wall.count = 1;
    config.wall.y = 12.0;
    let state = running(config, "A");

    let wall = &state.walls()[0];
    assert!(wall.solid_count() < 30);
    assert!(wall.solid_count() > 0);
    // Pieces below the alien's bottom edge survive.
    assert!(wall.piece_grid()[4][0]);
}

// ── Boss ──────────────────────────────────────────────────────────────────────

fn boss_config() -> GameConfig {
    let mut config = quiet_config();
    config.boss.appear_interval = 0.5;
    config
}

#[test]
fn boss_appears_after_interval() {
    let state = running(boss_config(), "A");
    let boss = state.boss().unwrap();
    assert!(boss.is_alive());
    assert!(approx(boss.position().y, boss_config().boss.y));
}

#[test]
fn shooting_the_boss_scores_and_it_despawns() {
    let mut state = running(boss_config(), "A");
    tick(&mut state, 1.0);
    let boss = state.boss().unwrap();
    let at = boss.position();
    assert!(at.x > 0.0 && at.x < 100.0);

    state.push_bullet(player_bullet(at.x + 4.0, at.y + 1.0));
    tick(&mut state, 0.01);

    assert_eq!(state.player().score(), 100);
    assert_eq!(state.bosses_killed(), 1);
    assert!(!state.boss().unwrap().is_alive());
    assert!(state.bullets().is_empty());
    assert!(!state.is_player_bullet_present());

    tick(&mut state, 1.5);
    assert!(state.boss().is_none());
}

#[test]
fn boss_escapes_off_screen() {
    let mut state = running(boss_config(), "A");
    assert!(state.boss().is_some());

    tick(&mut state, 10.0);
    assert!(state.boss().is_none());
    assert_eq!(state.bosses_killed(), 0);
    assert_eq!(state.player().score(), 0);
}

// ── Whole-game properties ─────────────────────────────────────────────────────

fn random_input(rng: &mut StdRng, status: GameStatus) -> InputSnapshot {
    InputSnapshot {
        move_left: rng.gen_bool(0.4),
        move_right: rng.gen_bool(0.4),
        fire: rng.gen_bool(0.6),
        pause: false,
        start: true,
        restart: status == GameStatus::Lost,
    }
}

#[test]
fn invariants_hold_through_random_play() {
    let mut state = GameState::new(GameConfig::for_level(Level::Hard), 11).unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let mut wave = state.wave();
    let mut killed = state.aliens_killed();
    let mut interval = state.alien_set().move_interval();

    for _ in 0..4000 {
        let input = random_input(&mut rng, state.status());
        state.handle_controls(&input);
        state.update(0.05, &input);

        let set = state.alien_set();
        let live = set.cells().filter(|(_, _, cell)| cell.is_alive()).count();
        assert_eq!(live, set.alive_count());
        assert_eq!(set.living().count(), set.alive_count());

        if set.alive_count() > 0 {
            let alive = |r: usize, c: usize| set.cell(r, c).is_some_and(Cell::is_alive);
            let (rows, columns) = (set.rows(), set.columns());
            assert!((0..columns).any(|c| alive(0, c)));
            assert!((0..columns).any(|c| alive(rows - 1, c)));
            assert!((0..rows).any(|r| alive(r, 0)));
            assert!((0..rows).any(|r| alive(r, columns - 1)));
        }

        // Same formation as last tick (a restart resets the kill tally).
        if state.wave() == wave && state.aliens_killed() >= killed {
            assert!(set.move_interval() <= interval);
        }
        wave = state.wave();
        killed = state.aliens_killed();
        interval = set.move_interval();

        let player_bullets = state
            .bullets()
            .iter()
            .filter(|b| b.owner() == Owner::Player)
            .count();
        assert!(player_bullets <= 1);
        assert_eq!(player_bullets == 1, state.is_player_bullet_present());
    }
}

#[test]
fn same_seed_same_game() {
    let play = || {
        let mut state = GameState::new(GameConfig::default(), 5).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1500 {
            let input = random_input(&mut rng, state.status());
            state.handle_controls(&input);
            state.update(0.05, &input);
        }
        state
    };
    let (a, b) = (play(), play());

    assert_eq!(a.player().score(), b.player().score());
    assert_eq!(a.player().lives(), b.player().lives());
    assert_eq!(a.player().position(), b.player().position());
    assert_eq!(a.alien_set().alive_count(), b.alien_set().alive_count());
    assert_eq!(a.alien_set().position(), b.alien_set().position());
    assert_eq!(a.bullets().len(), b.bullets().len());
    assert_eq!(a.wave(), b.wave());
}
