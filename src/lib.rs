//! Roid Rage - simulation core for a top-down space shooter
//!
//! Core modules:
//! - `sim`: Bodies, collision detection, handler dispatch, deferred events
//! - `world`: Entity lifecycles and the per-frame update
//! - `director`: Seeded wave spawning
//! - `hud`: Per-frame snapshot for UI collaborators
//! - `config`: Data-driven game balance

pub mod config;
pub mod director;
pub mod error;
pub mod hud;
pub mod sim;
pub mod world;

pub use config::GameConfig;
pub use error::{SimError, SimResult};
pub use world::World;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (64 Hz, exactly representable)
    pub const SIM_DT: f32 = 1.0 / 64.0;

    /// Logical screen size; the origin is at the screen center
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Body radii per entity kind
    pub const PLAYER_RADIUS: f32 = 40.0;
    pub const ENEMY_RADIUS: f32 = 48.0;
    pub const ASTEROID_RADIUS: f32 = 13.0;
    pub const PROJECTILE_RADIUS: f32 = 4.0;

    /// Player defaults
    pub const PLAYER_INITIAL_HITPOINTS: f32 = 100.0;
    pub const PLAYER_INITIAL_SPEED: f32 = 200.0; // units/second
    pub const PLAYER_SHOOT_RATE: f32 = 1.0; // projectiles/second

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 400.0; // units/second
    pub const PROJECTILE_TTL: f32 = (SCREEN_HEIGHT - 100.0) / PROJECTILE_SPEED;
    pub const PROJECTILE_DAMAGE: f32 = 10.0;

    /// Enemy defaults
    pub const ENEMY_INITIAL_HITPOINTS: f32 = 30.0;
    pub const ENEMY_MAX_SPEED: f32 = 50.0;
    pub const ENEMY_MAX_TURN: f32 = 100.0;
    pub const ENEMY_CREDITS: u32 = 10;

    /// Lifetime of spawned asteroids and enemies (seconds)
    pub const ENTITY_TTL: f32 = 30.0;

    /// Damage the player takes on contact
    pub const ENEMY_COLLISION_DAMAGE: f32 = 20.0;
    pub const ASTEROID_COLLISION_DAMAGE: f32 = 10.0;

    /// Event queue growth chunk
    pub const EVENT_QUEUE_CHUNK: usize = 16;
    /// Largest accepted event queue growth chunk
    pub const MAX_EVENT_CHUNK: usize = 4096;
    /// Handler table size
    pub const MAX_HANDLERS: usize = 10;
    /// Largest accepted handler table size
    pub const MAX_HANDLER_CAPACITY: usize = 256;
    /// Largest accepted fixed body registry size
    pub const MAX_BODY_CAPACITY: usize = 1 << 20;
}

/// Wrap an angle into [0, 2π). Non-finite input comes back as NaN.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // Tiny negative angles round up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Clamp a vector's length to `max`, keeping its direction
#[inline]
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    v.clamp_length_max(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert_eq!(wrap_angle(1.0), 1.0);
        assert_eq!(wrap_angle(-1e-9), 0.0);
    }

    #[test]
    fn test_wrap_angle_huge_values() {
        for angle in [1.0e8_f32, 1.0e10, -3.0e12, f32::MAX] {
            let wrapped = wrap_angle(angle);
            assert!((0.0..TAU).contains(&wrapped), "{} -> {}", angle, wrapped);
        }
        assert!(wrap_angle(f32::INFINITY).is_nan());
    }

    #[test]
    fn test_clamp_length() {
        let v = clamp_length(Vec2::new(30.0, 40.0), 10.0);
        assert!((v.length() - 10.0).abs() < 1e-4);
        assert!((v.x - 6.0).abs() < 1e-4);

        let short = Vec2::new(1.0, 0.0);
        assert_eq!(clamp_length(short, 10.0), short);
    }
}
