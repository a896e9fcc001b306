//! Cosmetic particles.  Nothing in gameplay reads them.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::entities::{Enemy, GameState, Particle};

/// Burst of `base_count + radius / 2` particles at a dying enemy.
pub fn spawn_death_particles(state: &mut GameState, enemy: &Enemy, rng: &mut impl Rng) {
    let cfg = &state.config.particles;
    let count = cfg.base_count + (enemy.radius / 2.0) as usize;

    state.particles.extend((0..count).map(|_| {
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(cfg.min_speed..=cfg.max_speed);
        Particle {
            pos: enemy.pos,
            vel: Vec2::from_angle(angle) * speed,
            life: cfg.lifetime,
            max_life: cfg.lifetime,
            radius: rng.gen_range(cfg.min_radius..=cfg.max_radius),
            color: enemy.color,
        }
    }));
}

/// Drift every particle and drop the expired ones.
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    particles.retain_mut(|p| {
        p.pos += p.vel * dt;
        p.life -= dt;
        p.life > 0.0
    });
}
