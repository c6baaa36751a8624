//! Game balance and simulation configuration
//!
//! Loaded once at startup from JSON; every field has a default so partial
//! files are accepted.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Tunable parameters for the simulation and the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Simulation ===
    /// Fixed simulation step (seconds)
    pub sim_step: f32,
    /// Maximum fixed steps per update; `None` runs as many as the accumulator holds
    pub max_substeps: Option<u32>,
    /// Fixed body registry size; `None` grows on demand
    pub body_capacity: Option<usize>,
    /// Fixed handler table size; `None` grows on demand
    pub handler_capacity: Option<usize>,
    /// Event queue growth chunk
    pub event_chunk: usize,

    // === Player ===
    pub player_hitpoints: f32,
    pub player_speed: f32,
    /// Projectiles per second
    pub fire_rate: f32,
    pub player_spawn: Vec2,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_ttl: f32,
    pub projectile_damage: f32,

    // === Enemies ===
    pub enemy_hitpoints: f32,
    pub enemy_max_speed: f32,
    pub enemy_max_turn: f32,
    /// Credits awarded per enemy killed
    pub enemy_credits: u32,

    // === Shared ===
    /// Lifetime of asteroids and enemies (seconds)
    pub entity_ttl: f32,
    pub enemy_collision_damage: f32,
    pub asteroid_collision_damage: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sim_step: SIM_DT,
            max_substeps: None,
            body_capacity: None,
            handler_capacity: Some(MAX_HANDLERS),
            event_chunk: EVENT_QUEUE_CHUNK,

            player_hitpoints: PLAYER_INITIAL_HITPOINTS,
            player_speed: PLAYER_INITIAL_SPEED,
            fire_rate: PLAYER_SHOOT_RATE,
            player_spawn: Vec2::new(0.0, SCREEN_HEIGHT / 2.0 - 50.0),

            projectile_speed: PROJECTILE_SPEED,
            projectile_ttl: PROJECTILE_TTL,
            projectile_damage: PROJECTILE_DAMAGE,

            enemy_hitpoints: ENEMY_INITIAL_HITPOINTS,
            enemy_max_speed: ENEMY_MAX_SPEED,
            enemy_max_turn: ENEMY_MAX_TURN,
            enemy_credits: ENEMY_CREDITS,

            entity_ttl: ENTITY_TTL,
            enemy_collision_damage: ENEMY_COLLISION_DAMAGE,
            asteroid_collision_damage: ASTEROID_COLLISION_DAMAGE,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Reject values the update loop cannot run with
    pub fn validate(&self) -> SimResult<()> {
        if self.sim_step.is_nan() || self.sim_step <= 0.0 {
            return Err(SimError::Config(format!(
                "sim_step must be positive, got {}",
                self.sim_step
            )));
        }
        if self.fire_rate.is_nan() || self.fire_rate <= 0.0 {
            return Err(SimError::Config(format!(
                "fire_rate must be positive, got {}",
                self.fire_rate
            )));
        }
        if self.event_chunk == 0 || self.event_chunk > MAX_EVENT_CHUNK {
            return Err(SimError::Config(format!(
                "event_chunk must be in 1..={}, got {}",
                MAX_EVENT_CHUNK, self.event_chunk
            )));
        }
        if self.body_capacity.is_some_and(|n| n > MAX_BODY_CAPACITY) {
            return Err(SimError::Config(format!(
                "body_capacity must be at most {}",
                MAX_BODY_CAPACITY
            )));
        }
        if self.handler_capacity.is_some_and(|n| n > MAX_HANDLER_CAPACITY) {
            return Err(SimError::Config(format!(
                "handler_capacity must be at most {}",
                MAX_HANDLER_CAPACITY
            )));
        }
        if self.max_substeps == Some(0) {
            return Err(SimError::Config("max_substeps must be non-zero".into()));
        }
        Ok(())
    }

    /// Shot cooldown after firing
    pub fn shoot_cooldown(&self) -> f32 {
        1.0 / self.fire_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shoot_cooldown(), 1.0);
        assert_eq!(config.handler_capacity, Some(MAX_HANDLERS));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "enemy_hitpoints": 50.0 }"#).unwrap();
        assert_eq!(config.enemy_hitpoints, 50.0);
        assert_eq!(config.sim_step, SIM_DT);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = GameConfig::default();
        config.body_capacity = Some(20);
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "sim_step": 0.0 }"#),
            Err(SimError::Config(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "fire_rate": -1.0 }"#),
            Err(SimError::Config(_))
        ));
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_storage() {
        for json in [
            r#"{ "event_chunk": 1000000000000000000 }"#,
            r#"{ "event_chunk": 0 }"#,
            r#"{ "body_capacity": 1000000000000000000 }"#,
            r#"{ "handler_capacity": 1000000000000000000 }"#,
        ] {
            assert!(
                matches!(GameConfig::from_json(json), Err(SimError::Config(_))),
                "{} accepted",
                json
            );
        }

        let config = GameConfig {
            event_chunk: usize::MAX / 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            crate::World::new(config),
            Err(SimError::Config(_))
        ));

        let config = GameConfig::from_json(r#"{ "event_chunk": 4096 }"#).unwrap();
        assert!(crate::World::new(config).is_ok());
    }
}
