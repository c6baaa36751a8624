//! Collision simulation module
//!
//! Bodies, handlers and the deferred event queue. This module knows nothing
//! about gameplay beyond the body type vocabulary:
//! - Fixed step size chosen by the caller
//! - Stable iteration order (registry slot order)
//! - No entity is created or destroyed during a step

pub mod body;
pub mod event;
pub mod handler;
pub mod registry;
pub mod system;

pub use body::{AsteroidId, Body, BodyHandle, BodyType, EnemyId, EntityRef, ProjectileId};
pub use event::{EventQueue, GameEvent};
pub use handler::{CollisionCallback, CollisionHandler, Contact, HandlerId, HandlerTable};
pub use registry::BodyRegistry;
pub use system::Simulation;
