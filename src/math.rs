//! Small geometry helpers shared by every subsystem.

use glam::Vec2;

/// Below this length a vector is treated as zero.
const EPSILON: f32 = 1e-4;

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector pointing from `from` to `to`, or `None` when the points coincide.
///
/// Callers treat `None` as "no movement this tick" so a NaN velocity can never
/// enter the simulation.
pub fn direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let len = delta.length();
    if len < EPSILON || !len.is_finite() {
        None
    } else {
        Some(delta / len)
    }
}

/// True when two circles overlap (strictly).
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Clamp a point into `[min, max]` on both axes.
pub fn clamp_point(p: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    p.clamp(min, max)
}

/// Format seconds as `m:ss`.
pub fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Walk `weights` accumulating a running sum and return the first index whose
/// cumulative weight exceeds `draw` (a uniform sample in `[0, 1)`).  Falls
/// back to index 0 when rounding leaves the draw past the final sum.
pub fn pick_weighted(weights: impl IntoIterator<Item = f32>, draw: f32) -> usize {
    let mut cumulative = 0.0;
    for (index, weight) in weights.into_iter().enumerate() {
        cumulative += weight;
        if draw < cumulative {
            return index;
        }
    }
    0
}
