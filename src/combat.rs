//! Combat resolution: auto-fire, projectiles, collisions and damage.

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use tracing::{debug, info};

use crate::entities::{Bullet, Enemy, GameEvent, GameState, GameStatus, Player};
use crate::math::{circles_overlap, direction, distance};
use crate::particles::spawn_death_particles;
use crate::progression::spawn_orb;

// ── Player fire ───────────────────────────────────────────────────────────────

/// Indices of up to `count` distinct enemies nearest to `from`, closest first.
/// Equal distances keep collection order.
pub fn nearest_targets(from: Vec2, enemies: &[Enemy], count: usize) -> Vec<usize> {
    let mut ranked: Vec<(usize, f32)> = enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_alive())
        .map(|(i, e)| (i, distance(from, e.pos)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.into_iter().take(count).map(|(i, _)| i).collect()
}

/// Fire one volley at the nearest enemies if the fire interval has elapsed.
///
/// With no valid target nothing is fired and the cooldown is left untouched,
/// so the next tick with a target fires immediately.
pub fn fire(state: &mut GameState) {
    let now = state.game_time;
    let player = &state.player;
    if let Some(last) = state.last_shot {
        if now - last < player.fire_interval {
            return;
        }
    }

    let speed = state.config.projectiles.speed;
    let origin = player.pos;
    let shots: Vec<Bullet> = nearest_targets(origin, &state.enemies, player.shot_count as usize)
        .into_iter()
        .filter_map(|i| direction(origin, state.enemies[i].pos))
        .map(|dir| Bullet {
            pos: origin,
            vel: dir * speed,
            born: now,
            hits: 0,
        })
        .collect();

    if shots.is_empty() {
        return;
    }
    state.last_shot = Some(now);
    state.events.push(GameEvent::ShotFired { count: shots.len() });
    state.bullets.extend(shots);
}

// ── Projectiles ───────────────────────────────────────────────────────────────

fn out_of_bounds(pos: Vec2, world: Vec2) -> bool {
    pos.x < 0.0 || pos.y < 0.0 || pos.x > world.x || pos.y > world.y
}

/// Advance player bullets and resolve their hits.
///
/// Each bullet hits at most one enemy per tick, the first overlapping live
/// enemy in collection order, and is dropped once its hit count exceeds the
/// player's piercing.  Enemies brought to zero health are removed afterwards.
pub fn update_bullets(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    let config = Arc::clone(&state.config);
    let world = state.world_size();
    let now = state.game_time;
    let attack = state.player.attack;
    let piercing = state.player.piercing;
    let radius = config.projectiles.radius;

    let mut survivors = Vec::with_capacity(state.bullets.len());
    for mut bullet in std::mem::take(&mut state.bullets) {
        bullet.pos += bullet.vel * dt;
        if now - bullet.born > config.projectiles.lifetime || out_of_bounds(bullet.pos, world) {
            continue;
        }

        let hit = state
            .enemies
            .iter_mut()
            .find(|e| e.is_alive() && circles_overlap(bullet.pos, radius, e.pos, e.radius));
        if let Some(enemy) = hit {
            enemy.health -= attack;
            bullet.hits += 1;
            if bullet.hits > piercing {
                continue;
            }
        }
        survivors.push(bullet);
    }
    state.bullets = survivors;

    remove_dead_enemies(state, rng);
}

/// Drop every enemy whose health reached zero, leaving one orb, a particle
/// burst and a kill for each.
pub fn remove_dead_enemies(state: &mut GameState, rng: &mut impl Rng) {
    let (alive, dead): (Vec<Enemy>, Vec<Enemy>) =
        std::mem::take(&mut state.enemies).into_iter().partition(Enemy::is_alive);
    state.enemies = alive;

    for enemy in dead {
        spawn_orb(state, enemy.pos, enemy.exp_value);
        spawn_death_particles(state, &enemy, rng);
        state.kills += 1;
        state.events.push(GameEvent::EnemyKilled(enemy.kind));
        debug!(kind = ?enemy.kind, kills = state.kills, "enemy killed");
    }
}

/// Advance enemy bullets; drop expired or escaped ones and apply hits on the
/// player.
pub fn update_enemy_bullets(state: &mut GameState, dt: f32) {
    let world = state.world_size();
    let now = state.game_time;
    let lifetime = state.config.projectiles.enemy_lifetime;
    let radius = state.config.projectiles.enemy_radius;

    let mut survivors = Vec::with_capacity(state.enemy_bullets.len());
    for mut bullet in std::mem::take(&mut state.enemy_bullets) {
        bullet.pos += bullet.vel * dt;
        if now - bullet.born > lifetime || out_of_bounds(bullet.pos, world) {
            continue;
        }
        if circles_overlap(bullet.pos, radius, state.player.pos, state.player.radius) {
            damage_player(state, bullet.damage);
            continue;
        }
        survivors.push(bullet);
    }
    state.enemy_bullets = survivors;
}

// ── Damage ────────────────────────────────────────────────────────────────────

/// Apply contact damage from every enemy overlapping the player this tick.
pub fn contact_damage(state: &mut GameState) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let touching: Vec<f32> = state
        .enemies
        .iter()
        .filter(|e| circles_overlap(player_pos, player_radius, e.pos, e.radius))
        .map(|e| e.contact_damage)
        .collect();
    for amount in touching {
        damage_player(state, amount);
    }
}

/// Damage the player unless invulnerable.  Returns whether health changed.
///
/// Applied damage starts the hit-invulnerability window; dropping to zero
/// health ends the match in defeat, exactly once.
pub fn damage_player(state: &mut GameState, amount: f32) -> bool {
    if state.status.is_over() || state.player.is_invulnerable() || !(amount > 0.0) {
        return false;
    }

    let player = &mut state.player;
    player.health = (player.health - amount).clamp(0.0, player.max_health);
    player.hit_invulnerable = true;
    player.hit_invulnerable_timer = state.config.player.hit_invulnerability;
    state.events.push(GameEvent::PlayerDamaged { amount });

    if player.health <= 0.0 {
        state.status = GameStatus::Defeat;
        state.events.push(GameEvent::Defeat);
        info!(
            level = player.level,
            kills = state.kills,
            survived = state.game_time,
            "player defeated"
        );
    }
    true
}

/// Count both invulnerability timers down, clearing each flag at zero.
pub fn tick_invulnerability(player: &mut Player, dt: f32) {
    if player.hit_invulnerable {
        player.hit_invulnerable_timer -= dt;
        if player.hit_invulnerable_timer <= 0.0 {
            player.hit_invulnerable = false;
            player.hit_invulnerable_timer = 0.0;
        }
    }
    if player.item_invulnerable {
        player.item_invulnerable_timer -= dt;
        if player.item_invulnerable_timer <= 0.0 {
            player.item_invulnerable = false;
            player.item_invulnerable_timer = 0.0;
        }
    }
}
