//! Gameplay entities
//!
//! Each entity owns exactly one body in the simulation, referenced by handle.
//! Constructors only build the logical record; the world registers the body.

use std::ops::BitOr;

use glam::Vec2;

use crate::clamp_length;
use crate::consts::*;
use crate::sim::{Body, BodyHandle, BodyType};
use crate::wrap_angle;

/// Held player intents, set and cleared on key events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Actions(u8);

impl Actions {
    pub const NONE: Self = Self(0);
    pub const MOVE_LEFT: Self = Self(1);
    pub const MOVE_RIGHT: Self = Self(1 << 1);
    pub const MOVE_UP: Self = Self(1 << 2);
    pub const MOVE_DOWN: Self = Self(1 << 3);
    pub const SHOOT: Self = Self(1 << 4);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Unit-axis movement direction; left wins over right, up over down
    pub fn direction(self) -> Vec2 {
        let x = if self.contains(Self::MOVE_LEFT) {
            -1.0
        } else if self.contains(Self::MOVE_RIGHT) {
            1.0
        } else {
            0.0
        };
        // Screen up is -y
        let y = if self.contains(Self::MOVE_UP) {
            -1.0
        } else if self.contains(Self::MOVE_DOWN) {
            1.0
        } else {
            0.0
        };
        Vec2::new(x, y)
    }
}

impl BitOr for Actions {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Common surface the world uses to register and sync entities
pub trait Entity {
    /// Body template for this entity, without an owner
    fn make_body(&self) -> Body;
    /// Handle of the registered body
    fn body(&self) -> BodyHandle;
    fn attach(&mut self, body: BodyHandle);
    /// Copy simulated state back from the body
    fn sync(&mut self, body: &Body);
}

/// The player ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub hitpoints: f32,
    /// Units per second
    pub speed: f32,
    pub shoot_cooldown: f32,
    pub actions: Actions,
    pub credits: u32,
    body: BodyHandle,
}

impl Player {
    pub fn new(pos: Vec2, hitpoints: f32, speed: f32) -> Self {
        Self {
            pos,
            hitpoints,
            speed,
            shoot_cooldown: 0.0,
            actions: Actions::NONE,
            credits: 0,
            body: BodyHandle::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hitpoints > 0.0
    }

    /// Apply held movement for `dt`
    pub fn apply_movement(&mut self, dt: f32) {
        self.pos += self.actions.direction() * self.speed * dt;
    }

    /// Tick the cooldown; returns true if a shot should be fired now
    pub fn try_shoot(&mut self, dt: f32, cooldown: f32) -> bool {
        self.shoot_cooldown -= dt;
        if self.actions.contains(Actions::SHOOT) && self.shoot_cooldown <= 0.0 {
            self.shoot_cooldown = cooldown;
            true
        } else {
            false
        }
    }
}

impl Entity for Player {
    fn make_body(&self) -> Body {
        // Kinematic: moved by input, never by velocity
        Body::new(
            self.pos,
            PLAYER_RADIUS,
            BodyType::PLAYER,
            BodyType::ENEMY | BodyType::ASTEROID,
        )
    }

    fn body(&self) -> BodyHandle {
        self.body
    }

    fn attach(&mut self, body: BodyHandle) {
        self.body = body;
    }

    fn sync(&mut self, body: &Body) {
        self.pos = body.pos;
    }
}

/// A hostile ship that seeks the player
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing, derived from velocity
    pub rot: f32,
    pub hitpoints: f32,
    pub ttl: f32,
    /// Set when projectile damage took the last hitpoint
    pub shot_down: bool,
    body: BodyHandle,
}

impl Enemy {
    pub fn new(pos: Vec2, hitpoints: f32, ttl: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rot: 0.0,
            hitpoints,
            ttl,
            shot_down: false,
            body: BodyHandle::default(),
        }
    }

    /// Steer toward `target`; returns the new velocity
    pub fn steer(&mut self, target: Vec2, max_speed: f32, max_turn: f32) -> Vec2 {
        self.vel = seek(self.pos, self.vel, target, max_speed, max_turn);
        if self.vel != Vec2::ZERO {
            self.rot = wrap_angle(self.vel.y.atan2(self.vel.x));
        }
        self.vel
    }
}

impl Entity for Enemy {
    fn make_body(&self) -> Body {
        Body::new(
            self.pos,
            ENEMY_RADIUS,
            BodyType::ENEMY,
            BodyType::PLAYER | BodyType::PROJECTILE,
        )
        .with_velocity(self.vel)
    }

    fn body(&self) -> BodyHandle {
        self.body
    }

    fn attach(&mut self, body: BodyHandle) {
        self.body = body;
    }

    fn sync(&mut self, body: &Body) {
        self.pos = body.pos;
    }
}

/// A drifting, spinning rock
#[derive(Debug, Clone)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rot: f32,
    /// Radians per second
    pub rot_speed: f32,
    pub hitpoints: f32,
    pub ttl: f32,
    body: BodyHandle,
}

impl Asteroid {
    pub fn new(pos: Vec2, vel: Vec2, rot_speed: f32, ttl: f32) -> Self {
        Self {
            pos,
            vel,
            rot: 0.0,
            rot_speed,
            hitpoints: 1.0,
            ttl,
            body: BodyHandle::default(),
        }
    }

    /// Integrate rotation, wrapping at 2π
    pub fn rotate(&mut self, dt: f32) {
        self.rot = wrap_angle(self.rot + self.rot_speed * dt);
    }
}

impl Entity for Asteroid {
    fn make_body(&self) -> Body {
        Body::new(self.pos, ASTEROID_RADIUS, BodyType::ASTEROID, BodyType::PLAYER)
            .with_velocity(self.vel)
    }

    fn body(&self) -> BodyHandle {
        self.body
    }

    fn attach(&mut self, body: BodyHandle) {
        self.body = body;
    }

    fn sync(&mut self, body: &Body) {
        self.pos = body.pos;
        self.vel = body.vel;
    }
}

/// A player shot
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub ttl: f32,
    body: BodyHandle,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, ttl: f32) -> Self {
        Self {
            pos,
            vel,
            ttl,
            body: BodyHandle::default(),
        }
    }
}

impl Entity for Projectile {
    fn make_body(&self) -> Body {
        Body::new(
            self.pos,
            PROJECTILE_RADIUS,
            BodyType::PROJECTILE,
            BodyType::ENEMY,
        )
        .with_velocity(self.vel)
    }

    fn body(&self) -> BodyHandle {
        self.body
    }

    fn attach(&mut self, body: BodyHandle) {
        self.body = body;
    }

    fn sync(&mut self, body: &Body) {
        self.pos = body.pos;
    }
}

/// Velocity-clamped seek steering
///
/// desired = normalize(target - pos) * max_speed,
/// steering = clamp(desired - vel, max_turn),
/// result = clamp(vel + steering, max_speed).
pub fn seek(pos: Vec2, vel: Vec2, target: Vec2, max_speed: f32, max_turn: f32) -> Vec2 {
    let desired = (target - pos).normalize_or_zero() * max_speed;
    let steering = clamp_length(desired - vel, max_turn);
    clamp_length(vel + steering, max_speed)
}
