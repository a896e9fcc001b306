//! Enemy spawner and per-kind AI.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use tracing::{debug, info};

use crate::config::{DashParams, EnemyTemplate, RangedParams};
use crate::entities::{DashState, Enemy, EnemyBullet, EnemyKind, GameEvent, GameState};
use crate::math::{clamp_point, direction, pick_weighted};

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Map a uniform draw in `[0, 1)` to a spawnable kind using a phase's weights.
pub fn choose_kind(weights: &[f32; 4], draw: f32) -> EnemyKind {
    EnemyKind::SPAWNABLE[pick_weighted(weights.iter().copied(), draw)]
}

/// A point `distance` away from `center` at a uniformly random angle,
/// clamped into the world.
pub fn spawn_position(center: Vec2, distance: f32, world: Vec2, rng: &mut impl Rng) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    clamp_point(center + Vec2::from_angle(angle) * distance, Vec2::ZERO, world)
}

/// Build an enemy from its template, scaling health and speed by `multiplier`.
pub fn make_enemy(
    kind: EnemyKind,
    template: &EnemyTemplate,
    pos: Vec2,
    multiplier: f32,
    now: f32,
) -> Enemy {
    let health = template.health * multiplier;
    Enemy {
        pos,
        kind,
        radius: template.radius,
        speed: template.speed * multiplier,
        health,
        max_health: health,
        exp_value: template.exp_value,
        contact_damage: template.contact_damage,
        color: template.color,
        dash: DashState::default(),
        last_shot: now,
    }
}

/// Spawn one weighted enemy if the active phase's interval has elapsed.
pub fn spawn_wave_enemy(state: &mut GameState, rng: &mut impl Rng) {
    let config = Arc::clone(&state.config);
    let phase = &config.phases[state.phase];
    if state.game_time - state.last_enemy_spawn < phase.spawn_interval {
        return;
    }
    state.last_enemy_spawn = state.game_time;

    let kind = choose_kind(&phase.weights, rng.gen::<f32>());
    let pos = spawn_position(
        state.player.pos,
        config.enemies.spawn_distance,
        state.world_size(),
        rng,
    );
    let enemy = make_enemy(
        kind,
        config.enemies.get(kind),
        pos,
        phase.enemy_multiplier,
        state.game_time,
    );
    debug!(?kind, x = pos.x, y = pos.y, "enemy spawned");
    state.enemies.push(enemy);
}

/// Spawn the boss.  Only ever called once per match, by the boss trigger.
pub fn spawn_boss(state: &mut GameState, rng: &mut impl Rng) {
    let config = Arc::clone(&state.config);
    let pos = spawn_position(
        state.player.pos,
        config.enemies.spawn_distance,
        state.world_size(),
        rng,
    );
    let boss = make_enemy(EnemyKind::Boss, &config.enemies.boss, pos, 1.0, state.game_time);
    state.enemies.push(boss);
    state.boss_spawned = true;
    state.events.push(GameEvent::BossSpawned);
    info!(at = state.game_time, "boss spawned");
}

// ── AI ────────────────────────────────────────────────────────────────────────

/// Move every enemy by its kind's rule, fire ranged attacks, clamp to the
/// world and finally push overlapping enemies apart.
pub fn update_enemies(state: &mut GameState, dt: f32) {
    let config = Arc::clone(&state.config);
    let target = state.player.pos;
    let now = state.game_time;
    let world = state.world_size();

    for enemy in state.enemies.iter_mut() {
        let template = config.enemies.get(enemy.kind);
        let toward = direction(enemy.pos, target);

        match enemy.kind {
            EnemyKind::Chaser | EnemyKind::Tank => {
                if let Some(dir) = toward {
                    enemy.pos += dir * enemy.speed * dt;
                }
            }
            EnemyKind::Dasher => {
                if let Some(dash) = &template.dash {
                    dash_step(enemy, dash, toward, dt);
                }
            }
            EnemyKind::Shooter => {
                if let Some(ranged) = &template.ranged {
                    standoff_step(enemy, ranged, target, toward, dt);
                    try_fire(enemy, ranged, toward, now, &mut state.enemy_bullets);
                }
            }
            EnemyKind::Boss => {
                if let Some(dash) = &template.dash {
                    dash_step(enemy, dash, toward, dt);
                }
                if let Some(ranged) = &template.ranged {
                    try_fire(enemy, ranged, toward, now, &mut state.enemy_bullets);
                }
            }
        }
    }

    separate(&mut state.enemies);
    for enemy in state.enemies.iter_mut() {
        enemy.pos = clamp_point(enemy.pos, Vec2::ZERO, world);
    }
}

/// Approach slowly; every `cooldown` seconds lock a velocity toward the
/// player and dash along it for `duration` seconds.
fn dash_step(enemy: &mut Enemy, dash: &DashParams, toward: Option<Vec2>, dt: f32) {
    if enemy.dash.dashing {
        enemy.pos += enemy.dash.velocity * dt;
        enemy.dash.timer += dt;
        if enemy.dash.timer >= dash.duration {
            enemy.dash.dashing = false;
            enemy.dash.timer = 0.0;
        }
        return;
    }

    enemy.dash.timer += dt;
    if enemy.dash.timer >= dash.cooldown {
        enemy.dash.dashing = true;
        enemy.dash.timer = 0.0;
        enemy.dash.velocity = toward
            .map(|dir| dir * enemy.speed * dash.speed_factor)
            .unwrap_or(Vec2::ZERO);
    } else if let Some(dir) = toward {
        enemy.pos += dir * enemy.speed * dash.approach_factor * dt;
    }
}

/// Hold a distance band around the player: advance when too far, back off
/// when inside `standoff - margin`.
fn standoff_step(
    enemy: &mut Enemy,
    ranged: &RangedParams,
    target: Vec2,
    toward: Option<Vec2>,
    dt: f32,
) {
    let Some(dir) = toward else {
        return;
    };
    let dist = enemy.pos.distance(target);
    if dist > ranged.standoff {
        enemy.pos += dir * enemy.speed * dt;
    } else if dist < ranged.standoff - ranged.margin {
        enemy.pos -= dir * enemy.speed * dt;
    }
}

fn try_fire(
    enemy: &mut Enemy,
    ranged: &RangedParams,
    toward: Option<Vec2>,
    now: f32,
    out: &mut Vec<EnemyBullet>,
) {
    if now - enemy.last_shot < ranged.interval {
        return;
    }
    let Some(dir) = toward else {
        return;
    };
    enemy.last_shot = now;
    out.extend(volley(enemy.pos, dir, ranged, now));
}

/// Fan `ranged.projectiles` bullets evenly across `ranged.spread` radians,
/// centred on `dir`.
pub fn volley(origin: Vec2, dir: Vec2, ranged: &RangedParams, now: f32) -> Vec<EnemyBullet> {
    let count = ranged.projectiles.max(1);
    let (first, step) = if count > 1 {
        (-ranged.spread / 2.0, ranged.spread / (count - 1) as f32)
    } else {
        (0.0, 0.0)
    };

    (0..count)
        .map(|i| {
            let heading = Vec2::from_angle(first + step * i as f32).rotate(dir);
            EnemyBullet {
                pos: origin,
                vel: heading * ranged.bullet_speed,
                born: now,
                damage: ranged.bullet_damage,
            }
        })
        .collect()
}

/// Soft circle separation: every overlapping pair is pushed apart along the
/// line between centres, each by half the overlap.  Coincident pairs have no
/// axis and are left alone.
pub fn separate(enemies: &mut [Enemy]) {
    for j in 1..enemies.len() {
        let (head, tail) = enemies.split_at_mut(j);
        let b = &mut tail[0];
        for a in head.iter_mut() {
            let min = a.radius + b.radius;
            let Some(axis) = direction(b.pos, a.pos) else {
                continue;
            };
            let dist = a.pos.distance(b.pos);
            if dist < min {
                let push = axis * (min - dist) / 2.0;
                a.pos += push;
                b.pos -= push;
            }
        }
    }
}
