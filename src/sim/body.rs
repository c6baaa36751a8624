//! Physical bodies and the type vocabulary used for collision filtering

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use glam::Vec2;
use slotmap::new_key_type;

new_key_type! {
    /// Handle of a body registered with the simulation
    pub struct BodyHandle;
    /// Handle of an enemy in the world
    pub struct EnemyId;
    /// Handle of an asteroid in the world
    pub struct AsteroidId;
    /// Handle of a projectile in the world
    pub struct ProjectileId;
}

/// Set of body types, one bit per kind
///
/// A body has a type (usually a single bit) and a collision mask (the types
/// it reacts to). Both use this same bitset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BodyType(u8);

impl BodyType {
    pub const NONE: Self = Self(0);
    pub const PLAYER: Self = Self(1);
    pub const ENEMY: Self = Self(1 << 1);
    pub const ASTEROID: Self = Self(1 << 2);
    pub const PROJECTILE: Self = Self(1 << 3);

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any bit is shared
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True if every bit of `other` is set in `self`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for BodyType {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for BodyType {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for BodyType {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(BodyType, &str); 4] = [
            (BodyType::PLAYER, "PLAYER"),
            (BodyType::ENEMY, "ENEMY"),
            (BodyType::ASTEROID, "ASTEROID"),
            (BodyType::PROJECTILE, "PROJECTILE"),
        ];
        let mut first = true;
        for (bit, name) in NAMES {
            if self.contains(bit) && !bit.is_empty() {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("NONE")?;
        }
        Ok(())
    }
}

/// Non-owning back-reference from a body to the entity it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Player,
    Enemy(EnemyId),
    Asteroid(AsteroidId),
    Projectile(ProjectileId),
}

/// A simulated circle
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// What this body is
    pub kind: BodyType,
    /// What this body reacts to
    pub collision_mask: BodyType,
    /// Entity owning this body; registration fails without one
    pub owner: Option<EntityRef>,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32, kind: BodyType, collision_mask: BodyType) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            kind,
            collision_mask,
            owner: None,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_owner(mut self, owner: EntityRef) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Advance position by velocity
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Each body's type is in the other's collision mask
    #[inline]
    pub fn reacts_with(&self, other: &Body) -> bool {
        self.kind.intersects(other.collision_mask) && other.kind.intersects(self.collision_mask)
    }

    /// Strict circle overlap; touching circles do not collide
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.pos.distance(other.pos) < self.radius + other.radius
    }
}
