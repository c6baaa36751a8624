//! Body registry
//!
//! Bodies live in a generational slot map. A handle stays valid until its
//! body is removed; stale handles resolve to nothing, so removal is
//! idempotent and identity is never confused with equal coordinates.

use slotmap::SlotMap;

use super::body::{Body, BodyHandle};
use crate::error::{SimError, SimResult};

/// Storage for all active bodies
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    bodies: SlotMap<BodyHandle, Body>,
    /// Fixed size, or `None` for a growable registry
    capacity: Option<usize>,
}

impl BodyRegistry {
    /// Growable registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that refuses bodies beyond `capacity`. Slots are allocated
    /// as bodies arrive.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            capacity: Some(capacity),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Register a body. Nothing is stored on failure.
    pub fn add(&mut self, body: Body) -> SimResult<BodyHandle> {
        if body.owner.is_none() {
            return Err(SimError::InvariantViolation("body registered without an owner"));
        }
        if let Some(capacity) = self.capacity {
            if self.bodies.len() >= capacity {
                return Err(SimError::CapacityExceeded {
                    what: "body registry",
                    capacity,
                });
            }
        }
        Ok(self.bodies.insert(body))
    }

    /// Remove a body by handle; a stale handle is a no-op
    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        self.bodies.remove(handle)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate in slot order (stable between mutations)
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> {
        self.bodies.iter_mut()
    }

    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{BodyType, EntityRef};
    use glam::Vec2;

    fn player_body() -> Body {
        Body::new(Vec2::ZERO, 40.0, BodyType::PLAYER, BodyType::ENEMY).with_owner(EntityRef::Player)
    }

    #[test]
    fn test_add_requires_owner() {
        let mut reg = BodyRegistry::new();
        let orphan = Body::new(Vec2::ZERO, 1.0, BodyType::ENEMY, BodyType::PLAYER);
        assert!(matches!(reg.add(orphan), Err(SimError::InvariantViolation(_))));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_fixed_capacity() {
        let mut reg = BodyRegistry::with_capacity(2);
        reg.add(player_body()).unwrap();
        reg.add(player_body()).unwrap();
        assert_eq!(
            reg.add(player_body()),
            Err(SimError::CapacityExceeded {
                what: "body registry",
                capacity: 2
            })
        );
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut reg = BodyRegistry::new();
        let a = reg.add(player_body()).unwrap();
        let b = reg.add(player_body()).unwrap();

        assert!(reg.remove(a).is_some());
        assert!(reg.remove(a).is_none());
        assert!(!reg.contains(a));
        // Identical twin is untouched
        assert!(reg.contains(b));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let mut reg = BodyRegistry::new();
        let a = reg.add(player_body()).unwrap();
        reg.remove(a);
        let b = reg.add(player_body()).unwrap();
        assert_ne!(a, b);
        assert!(reg.get(a).is_none());
        assert!(reg.remove(a).is_none());
        assert!(reg.contains(b));
    }
}
