//! Survival arena simulation core.
//!
//! The library holds every gameplay rule; the binary in `main.rs` only feeds
//! input in and draws the snapshot that comes out.

pub mod clock;
pub mod combat;
pub mod compute;
pub mod config;
pub mod constants;
pub mod enemy;
pub mod entities;
pub mod error;
pub mod items;
pub mod math;
pub mod particles;
pub mod phase;
pub mod player;
pub mod progression;
