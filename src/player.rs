//! Player movement, regeneration and timers.

use glam::Vec2;

use crate::combat::tick_invulnerability;
use crate::entities::GameState;
use crate::math::direction;

/// Pointer state handed in by the front-end every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// World-space point the player steers toward.
    pub target: Vec2,
    /// False while the pointer is idle or outside the play field.
    pub aiming: bool,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn toward(target: Vec2) -> Self {
        Self { target, aiming: true }
    }
}

/// Move toward the input target (outside the dead zone), clamp to the world,
/// regenerate health and count invulnerability down.
pub fn update_player(state: &mut GameState, input: &FrameInput, dt: f32) {
    let dead_zone = state.config.player.dead_zone;
    let world = state.world_size();
    let player = &mut state.player;

    player.moving = false;
    if input.aiming && player.pos.distance(input.target) > dead_zone {
        if let Some(dir) = direction(player.pos, input.target) {
            player.pos += dir * player.speed * dt;
            player.moving = true;
        }
    }
    let inset = Vec2::splat(player.radius);
    player.pos = player.pos.clamp(inset, (world - inset).max(inset));

    if player.regen > 0.0 && player.health < player.max_health {
        player.health = (player.health + player.regen * dt).min(player.max_health);
    }

    tick_invulnerability(player, dt);
}
