//! Experience orbs, leveling and upgrades.

use std::sync::Arc;

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::config::{OrbTier, UpgradeDef, UpgradeEffect};
use crate::entities::{ExpOrb, GameEvent, GameState, GameStatus, Player};
use crate::math::direction;

// ── Orbs ──────────────────────────────────────────────────────────────────────

/// Highest tier whose threshold `value` reaches.  `tiers` is ascending and
/// non-empty (checked by config validation).
pub fn orb_tier(tiers: &[OrbTier], value: u32) -> &OrbTier {
    tiers
        .iter()
        .rev()
        .find(|tier| value >= tier.min_value)
        .unwrap_or(&tiers[0])
}

pub fn spawn_orb(state: &mut GameState, pos: Vec2, value: u32) {
    let tier = orb_tier(&state.config.orbs.tiers, value);
    let orb = ExpOrb {
        pos,
        value,
        radius: tier.radius,
        color: tier.color,
        magnetized: false,
    };
    state.orbs.push(orb);
}

/// Pull orbs inside the magnet radius (or magnetized ones, faster) toward the
/// player, then collect every orb within the player's radius.
pub fn update_orbs(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    let config = Arc::clone(&state.config);
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let magnet_radius = state.player.magnet_radius;

    let mut gained = 0u32;
    let mut survivors = Vec::with_capacity(state.orbs.len());
    for mut orb in std::mem::take(&mut state.orbs) {
        let dist = orb.pos.distance(player_pos);
        if orb.magnetized || dist < magnet_radius {
            if let Some(dir) = direction(orb.pos, player_pos) {
                let speed = if orb.magnetized {
                    config.orbs.magnetized_pull_speed
                } else {
                    config.orbs.pull_speed
                };
                orb.pos += dir * (speed * dt).min(dist);
            }
        }
        if orb.pos.distance(player_pos) < player_radius {
            gained = gained.saturating_add(orb.value);
            continue;
        }
        survivors.push(orb);
    }
    state.orbs = survivors;

    if gained > 0 {
        gain_exp(state, gained, rng);
    }
}

// ── Leveling ──────────────────────────────────────────────────────────────────

/// Add experience and level up if the threshold is reached.
pub fn gain_exp(state: &mut GameState, amount: u32, rng: &mut impl Rng) {
    state.player.exp = state.player.exp.saturating_add(amount);
    check_level_up(state, rng);
}

/// Next threshold after `current`, floored.
pub fn next_threshold(current: u32, growth: f32) -> u32 {
    // The small bias keeps e.g. 100 * 1.3 from flooring to 129.
    ((current as f32 * growth + 1e-3).floor() as u32).max(1)
}

/// Level up once if experience has reached the threshold: carry the surplus,
/// grow the threshold, heal a little, pause and present an upgrade offer.
///
/// Does nothing while another offer is still pending; the check runs again
/// when that offer is resolved.
pub fn check_level_up(state: &mut GameState, rng: &mut impl Rng) {
    if state.status != GameStatus::Playing {
        return;
    }
    let config = Arc::clone(&state.config);
    let progression = &config.progression;
    let player = &mut state.player;
    if player.exp < player.exp_to_next {
        return;
    }

    player.exp -= player.exp_to_next;
    player.exp_to_next = next_threshold(player.exp_to_next, progression.exp_growth);
    player.level += 1;
    player.health = (player.health + player.max_health * progression.level_up_heal)
        .min(player.max_health);
    let level = player.level;

    state.upgrade_choices = draw_offer(&progression.upgrades, progression.offer_size, rng);
    state.status = GameStatus::LevelUp;
    state.events.push(GameEvent::LevelUp { level });
    info!(
        level,
        choices = ?state.upgrade_choices.iter().map(|u| u.id.as_str()).collect::<Vec<_>>(),
        "level up"
    );
}

/// Up to `size` distinct upgrades sampled without replacement.
pub fn draw_offer(catalog: &[UpgradeDef], size: usize, rng: &mut impl Rng) -> Vec<UpgradeDef> {
    catalog.choose_multiple(rng, size).cloned().collect()
}

/// Apply one upgrade's stat change.
pub fn apply_upgrade(player: &mut Player, effect: &UpgradeEffect) {
    match *effect {
        UpgradeEffect::Attack { factor } => player.attack *= factor,
        UpgradeEffect::MoveSpeed { factor } => player.speed *= factor,
        UpgradeEffect::FireInterval { factor } => player.fire_interval *= factor,
        UpgradeEffect::MaxHealth { amount } => {
            player.max_health += amount;
            player.health = (player.health + amount).clamp(0.0, player.max_health);
        }
        UpgradeEffect::Regen { amount } => player.regen += amount,
        UpgradeEffect::MagnetRadius { factor } => player.magnet_radius *= factor,
        UpgradeEffect::ShotCount { amount } => player.shot_count += amount,
        UpgradeEffect::Piercing { amount } => player.piercing += amount,
    }
}
