//! Pure game-logic entry points.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (plus the frame timestamp and, where needed, an RNG handle) and
//! returns a brand-new `GameState`.  Side effects are limited to the injected
//! RNG.  The subsystem modules work on that fresh copy in place, in a fixed
//! order, so one call is one complete tick.

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::clock::Clock;
use crate::config::{GameConfig, UpgradeDef};
use crate::entities::{
    Bullet, Enemy, EnemyBullet, ExpOrb, GameEvent, GameState, GameStatus, Item, Particle, Player,
};
use crate::error::ConfigResult;
use crate::player::FrameInput;
use crate::{combat, enemy, items, particles, phase, player, progression};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the opening state of a match: player at the world centre, empty
/// pools, phase one.  Fails if the config tables are inconsistent.
pub fn init_state(config: Arc<GameConfig>, now_ms: f64) -> ConfigResult<GameState> {
    config.validate()?;

    let p = &config.player;
    let player = Player {
        pos: Vec2::new(config.world.width, config.world.height) / 2.0,
        radius: p.radius,
        speed: p.speed,
        level: 1,
        exp: 0,
        exp_to_next: p.exp_to_next,
        max_health: p.max_health,
        health: p.max_health,
        attack: p.attack,
        fire_interval: p.fire_interval,
        regen: p.regen,
        magnet_radius: p.magnet_radius,
        shot_count: p.shot_count,
        piercing: p.piercing,
        hit_invulnerable: false,
        hit_invulnerable_timer: 0.0,
        item_invulnerable: false,
        item_invulnerable_timer: 0.0,
        moving: false,
    };

    Ok(GameState {
        clock: Clock::new(now_ms, config.world.max_frame_delta),
        player,
        enemies: Vec::new(),
        bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        orbs: Vec::new(),
        items: Vec::new(),
        particles: Vec::new(),
        phase: 0,
        game_time: 0.0,
        last_enemy_spawn: 0.0,
        last_item_spawn: 0.0,
        last_shot: None,
        boss_spawned: false,
        kills: 0,
        upgrade_choices: Vec::new(),
        status: GameStatus::Playing,
        frame: 0,
        events: Vec::new(),
        config,
    })
}

// ── Per-frame tick (RNG is injected) ─────────────────────────────────────────

/// Advance the simulation to `now_ms`.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// Paused and finished states come back unchanged apart from a cleared event
/// list.
pub fn tick(
    state: &GameState,
    input: &FrameInput,
    now_ms: f64,
    rng: &mut impl Rng,
) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    if next.status != GameStatus::Playing {
        return next;
    }

    let dt = next.clock.frame_delta(now_ms);
    let game_time = next.clock.elapsed_secs(now_ms);
    next.frame += 1;

    // ── 1. Phase / timer ─────────────────────────────────────────────────────
    phase::advance(&mut next, game_time);
    if next.status.is_over() {
        return next;
    }
    if phase::boss_due(&next) {
        enemy::spawn_boss(&mut next, rng);
    }

    // ── 2. Player ────────────────────────────────────────────────────────────
    player::update_player(&mut next, input, dt);

    // ── 3. Enemy spawn & AI ──────────────────────────────────────────────────
    enemy::spawn_wave_enemy(&mut next, rng);
    enemy::update_enemies(&mut next, dt);

    // ── 4. Combat ────────────────────────────────────────────────────────────
    combat::fire(&mut next);
    combat::update_bullets(&mut next, dt, rng);
    combat::update_enemy_bullets(&mut next, dt);
    combat::contact_damage(&mut next);
    if next.status.is_over() {
        return next;
    }

    // ── 5. Particles ─────────────────────────────────────────────────────────
    particles::update_particles(&mut next.particles, dt);

    // ── 6. Items ─────────────────────────────────────────────────────────────
    items::spawn_item(&mut next, rng);
    items::update_items(&mut next);

    // ── 7. Progression ───────────────────────────────────────────────────────
    progression::update_orbs(&mut next, dt, rng);
    if next.status == GameStatus::LevelUp {
        next.clock.pause(now_ms);
    }

    next
}

// ── Pause & upgrade choice (pure) ───────────────────────────────────────────

/// Pause a running match.  Any other state is returned unchanged.
pub fn pause(state: &GameState, now_ms: f64) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    if next.status == GameStatus::Playing {
        next.status = GameStatus::Paused;
        next.clock.pause(now_ms);
    }
    next
}

/// Resume a match paused with [`pause`].  A pending upgrade offer can only be
/// closed by [`choose_upgrade`].
pub fn resume(state: &GameState, now_ms: f64) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    if next.status == GameStatus::Paused {
        next.status = GameStatus::Playing;
        next.clock.resume(now_ms);
    }
    next
}

pub fn toggle_pause(state: &GameState, now_ms: f64) -> GameState {
    match state.status {
        GameStatus::Playing => pause(state, now_ms),
        GameStatus::Paused => resume(state, now_ms),
        _ => state.clone(),
    }
}

/// Take the offered upgrade with identifier `id` and resume play.
///
/// A selection that is not part of the current offer (stale, or no offer
/// pending) is ignored.  If the carried-over experience already fills the
/// next threshold, a fresh offer is presented straight away.
pub fn choose_upgrade(
    state: &GameState,
    id: &str,
    now_ms: f64,
    rng: &mut impl Rng,
) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    if next.status != GameStatus::LevelUp {
        debug!(id, "upgrade selection ignored: no offer pending");
        return next;
    }
    let Some(choice) = next.upgrade_choices.iter().find(|u| u.id == id).cloned() else {
        debug!(id, "upgrade selection ignored: not on offer");
        return next;
    };

    progression::apply_upgrade(&mut next.player, &choice.effect);
    next.upgrade_choices.clear();
    next.status = GameStatus::Playing;
    next.clock.resume(now_ms);
    debug!(id, "upgrade applied");

    progression::check_level_up(&mut next, rng);
    if next.status == GameStatus::LevelUp {
        next.clock.pause(now_ms);
    }
    next
}

// ── Render snapshot ──────────────────────────────────────────────────────────

/// Read-only view handed to the presentation layer once per frame.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub world: Vec2,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub bullets: &'a [Bullet],
    pub enemy_bullets: &'a [EnemyBullet],
    pub orbs: &'a [ExpOrb],
    pub items: &'a [Item],
    pub particles: &'a [Particle],
    pub phase: usize,
    pub phase_name: &'a str,
    pub game_time: f32,
    pub remaining_time: f32,
    /// In `[0, 1]`.
    pub health_fraction: f32,
    /// In `[0, 1]`.
    pub exp_fraction: f32,
    pub level: u32,
    pub kills: u32,
    pub status: GameStatus,
    pub upgrade_choices: &'a [UpgradeDef],
    pub events: &'a [GameEvent],
}

pub fn snapshot(state: &GameState) -> Snapshot<'_> {
    let player = &state.player;
    let health_fraction = if player.max_health > 0.0 {
        (player.health / player.max_health).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let exp_fraction = if player.exp_to_next > 0 {
        (player.exp as f32 / player.exp_to_next as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Snapshot {
        world: state.world_size(),
        player,
        enemies: &state.enemies,
        bullets: &state.bullets,
        enemy_bullets: &state.enemy_bullets,
        orbs: &state.orbs,
        items: &state.items,
        particles: &state.particles,
        phase: state.phase,
        phase_name: &state.config.phases[state.phase].name,
        game_time: state.game_time,
        remaining_time: phase::remaining_time(state),
        health_fraction,
        exp_fraction,
        level: player.level,
        kills: state.kills,
        status: state.status,
        upgrade_choices: &state.upgrade_choices,
        events: &state.events,
    }
}
