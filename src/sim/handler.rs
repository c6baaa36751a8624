//! Collision handler table
//!
//! Handlers are closures over a caller-supplied context type `C`, invoked in
//! registration order for every qualifying body pair.

use std::fmt;

use super::body::{Body, BodyHandle, BodyType};
use crate::error::{SimError, SimResult};

/// One side of a detected contact
#[derive(Debug, Clone, Copy)]
pub struct Contact<'a> {
    pub handle: BodyHandle,
    pub body: &'a Body,
}

/// Callback invoked with `(a, b, context)` on overlap
pub type CollisionCallback<C> = Box<dyn Fn(Contact<'_>, Contact<'_>, &mut C) -> SimResult<()>>;

/// Index of a registered handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub usize);

/// A registered collision rule
pub struct CollisionHandler<C> {
    /// Both participants' types must intersect this mask
    pub type_mask: BodyType,
    pub callback: CollisionCallback<C>,
}

impl<C> CollisionHandler<C> {
    pub fn new<F>(type_mask: BodyType, callback: F) -> Self
    where
        F: Fn(Contact<'_>, Contact<'_>, &mut C) -> SimResult<()> + 'static,
    {
        Self {
            type_mask,
            callback: Box::new(callback),
        }
    }

    /// True if this handler is interested in a pair of these types
    #[inline]
    pub fn matches(&self, a: BodyType, b: BodyType) -> bool {
        self.type_mask.intersects(a) && self.type_mask.intersects(b)
    }
}

impl<C> fmt::Debug for CollisionHandler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionHandler")
            .field("type_mask", &self.type_mask)
            .finish_non_exhaustive()
    }
}

/// Ordered handler registrations
pub struct HandlerTable<C> {
    handlers: Vec<CollisionHandler<C>>,
    capacity: Option<usize>,
}

impl<C> HandlerTable<C> {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            handlers: Vec::new(),
            capacity,
        }
    }

    pub fn add(&mut self, handler: CollisionHandler<C>) -> SimResult<HandlerId> {
        if let Some(capacity) = self.capacity {
            if self.handlers.len() >= capacity {
                return Err(SimError::CapacityExceeded {
                    what: "handler table",
                    capacity,
                });
            }
        }
        self.handlers.push(handler);
        Ok(HandlerId(self.handlers.len() - 1))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke every matching handler with `(a, b)`, in registration order.
    /// Stops at the first failing callback.
    pub fn dispatch(&self, a: Contact<'_>, b: Contact<'_>, ctx: &mut C) -> SimResult<()> {
        for handler in &self.handlers {
            if handler.matches(a.body.kind, b.body.kind) {
                (handler.callback)(a, b, ctx)?;
            }
        }
        Ok(())
    }
}

impl<C> fmt::Debug for HandlerTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("handlers", &self.handlers)
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_matches_needs_both_types() {
        let h: CollisionHandler<()> =
            CollisionHandler::new(BodyType::PLAYER | BodyType::ENEMY, |_, _, _| Ok(()));
        assert!(h.matches(BodyType::PLAYER, BodyType::ENEMY));
        assert!(h.matches(BodyType::ENEMY, BodyType::ENEMY));
        assert!(!h.matches(BodyType::PLAYER, BodyType::ASTEROID));
    }

    #[test]
    fn test_capacity() {
        let mut table: HandlerTable<()> = HandlerTable::new(Some(1));
        assert_eq!(
            table
                .add(CollisionHandler::new(BodyType::PLAYER, |_, _, _| Ok(())))
                .unwrap(),
            HandlerId(0)
        );
        assert!(matches!(
            table.add(CollisionHandler::new(BodyType::PLAYER, |_, _, _| Ok(()))),
            Err(SimError::CapacityExceeded { capacity: 1, .. })
        ));
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let mut table: HandlerTable<Vec<&'static str>> = HandlerTable::new(None);
        table
            .add(CollisionHandler::new(BodyType::ENEMY, |_, _, log: &mut Vec<_>| {
                log.push("first");
                Ok(())
            }))
            .unwrap();
        table
            .add(CollisionHandler::new(BodyType::ASTEROID, |_, _, log: &mut Vec<_>| {
                log.push("skipped");
                Ok(())
            }))
            .unwrap();
        table
            .add(CollisionHandler::new(BodyType::ENEMY, |_, _, log: &mut Vec<_>| {
                log.push("second");
                Ok(())
            }))
            .unwrap();

        let body = Body::new(Vec2::ZERO, 1.0, BodyType::ENEMY, BodyType::ENEMY);
        let contact = Contact {
            handle: BodyHandle::default(),
            body: &body,
        };
        let mut log = Vec::new();
        table.dispatch(contact, contact, &mut log).unwrap();
        assert_eq!(log, vec!["first", "second"]);
    }
}
