//! Timed pickups and their effects.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::config::ItemEffect;
use crate::entities::{Enemy, EnemyKind, GameEvent, GameState, Item, ItemKind};
use crate::math::{circles_overlap, clamp_point, pick_weighted};
use crate::progression::spawn_orb;

/// Spawn one weighted item in the annulus around the player when the spawn
/// interval has elapsed.
pub fn spawn_item(state: &mut GameState, rng: &mut impl Rng) {
    let config = Arc::clone(&state.config);
    let items = &config.items;
    if state.game_time - state.last_item_spawn < items.spawn_interval {
        return;
    }
    state.last_item_spawn = state.game_time;

    let angle = rng.gen_range(0.0..TAU);
    let dist = rng.gen_range(items.min_distance..=items.max_distance);
    let margin = Vec2::splat(items.edge_margin);
    let pos = clamp_point(
        state.player.pos + Vec2::from_angle(angle) * dist,
        margin,
        (state.world_size() - margin).max(margin),
    );

    let index = pick_weighted(items.table.iter().map(|def| def.chance), rng.gen::<f32>());
    let def = &items.table[index];
    debug!(kind = ?def.kind, x = pos.x, y = pos.y, "item spawned");
    state.items.push(Item {
        pos,
        kind: def.kind,
        radius: def.radius,
        color: def.color,
        effect: def.effect.clone(),
    });
}

/// Collect every item the player touches, applying each effect once.
pub fn update_items(state: &mut GameState) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let (picked, remaining): (Vec<Item>, Vec<Item>) = std::mem::take(&mut state.items)
        .into_iter()
        .partition(|item| circles_overlap(player_pos, player_radius, item.pos, item.radius));
    state.items = remaining;

    for item in picked {
        apply_item_effect(state, item.kind, &item.effect);
    }
}

pub fn apply_item_effect(state: &mut GameState, kind: ItemKind, effect: &ItemEffect) {
    match *effect {
        ItemEffect::Heal { amount } => {
            let player = &mut state.player;
            player.health = (player.health + amount).clamp(0.0, player.max_health);
        }
        ItemEffect::Invulnerability { seconds } => {
            let player = &mut state.player;
            player.item_invulnerable = true;
            player.item_invulnerable_timer = player.item_invulnerable_timer.max(seconds);
        }
        ItemEffect::ClearEnemies => clear_enemies(state),
        ItemEffect::MagnetizeOrbs => {
            for orb in state.orbs.iter_mut() {
                orb.magnetized = true;
            }
        }
    }
    state.events.push(GameEvent::ItemApplied(kind));
    debug!(?kind, "item applied");
}

/// Area bomb: every non-boss enemy becomes an orb and is removed, all in one
/// step.  The boss is untouched.
pub fn clear_enemies(state: &mut GameState) {
    let (bosses, cleared): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| e.kind == EnemyKind::Boss);
    state.enemies = bosses;

    for enemy in cleared {
        spawn_orb(state, enemy.pos, enemy.exp_value);
        state.kills += 1;
        state.events.push(GameEvent::EnemyKilled(enemy.kind));
    }
}
