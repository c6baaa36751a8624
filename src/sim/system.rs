//! Simulation system: integration, brute-force collision detection, dispatch
//!
//! `step` never adds or removes bodies. Handlers only record outcomes into
//! the caller's context; the caller applies them once the step is over.

use glam::Vec2;

use super::body::{Body, BodyHandle, BodyType};
use super::handler::{CollisionHandler, Contact, HandlerId, HandlerTable};
use super::registry::BodyRegistry;
use crate::error::SimResult;

/// Bodies plus the collision rules applied to them
#[derive(Debug)]
pub struct Simulation<C> {
    bodies: BodyRegistry,
    handlers: HandlerTable<C>,
    /// Handle snapshot reused across steps
    order: Vec<BodyHandle>,
}

impl<C> Default for Simulation<C> {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl<C> Simulation<C> {
    /// `None` capacities grow on demand
    pub fn new(body_capacity: Option<usize>, handler_capacity: Option<usize>) -> Self {
        let bodies = match body_capacity {
            Some(capacity) => BodyRegistry::with_capacity(capacity),
            None => BodyRegistry::new(),
        };
        Self {
            bodies,
            handlers: HandlerTable::new(handler_capacity),
            order: Vec::new(),
        }
    }

    pub fn add_body(&mut self, body: Body) -> SimResult<BodyHandle> {
        self.bodies.add(body)
    }

    /// Remove by identity. Removing an absent body does nothing.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        self.bodies.remove(handle)
    }

    pub fn add_handler<F>(&mut self, type_mask: BodyType, callback: F) -> SimResult<HandlerId>
    where
        F: Fn(Contact<'_>, Contact<'_>, &mut C) -> SimResult<()> + 'static,
    {
        self.handlers.add(CollisionHandler::new(type_mask, callback))
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    pub fn bodies(&self) -> &BodyRegistry {
        &self.bodies
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Move a body, e.g. one driven by input rather than velocity
    pub fn set_position(&mut self, handle: BodyHandle, pos: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.pos = pos;
        }
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, vel: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.vel = vel;
        }
    }

    /// Advance every body by `dt`, then test every ordered pair.
    ///
    /// A pair `(a, b)` qualifies when each type is in the other's mask and
    /// the circles strictly overlap. Matching handlers run with `(a, b)` in
    /// registration order; the mirrored pair `(b, a)` is visited separately,
    /// so handlers pick their roles by checking `a`'s type.
    ///
    /// Returns the number of qualifying ordered pairs.
    pub fn step(&mut self, dt: f32, ctx: &mut C) -> SimResult<usize> {
        let Self {
            bodies,
            handlers,
            order,
        } = self;

        if bodies.is_empty() {
            return Ok(0);
        }

        for (_, body) in bodies.iter_mut() {
            body.integrate(dt);
        }

        order.clear();
        order.extend(bodies.handles());

        let mut contacts = 0;
        for &ha in order.iter() {
            let Some(a) = bodies.get(ha) else { continue };
            for &hb in order.iter() {
                if ha == hb {
                    continue;
                }
                let Some(b) = bodies.get(hb) else { continue };
                if a.reacts_with(b) && a.overlaps(b) {
                    contacts += 1;
                    handlers.dispatch(
                        Contact { handle: ha, body: a },
                        Contact { handle: hb, body: b },
                        ctx,
                    )?;
                }
            }
        }

        Ok(contacts)
    }
}
