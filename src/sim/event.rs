//! Deferred collision outcomes
//!
//! Handlers append events during a step; the world drains them after the
//! step finishes, so the body population never changes mid-scan.

use super::body::{BodyHandle, EnemyId, EntityRef, ProjectileId};
use crate::consts::EVENT_QUEUE_CHUNK;
use crate::error::{SimError, SimResult};

/// Gameplay outcome of a detected collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// The player touched an enemy or an asteroid
    PlayerCollision {
        player: BodyHandle,
        other: BodyHandle,
        other_owner: EntityRef,
    },
    /// A projectile hit an enemy
    EnemyHit {
        enemy: EnemyId,
        projectile: ProjectileId,
        damage: f32,
    },
}

/// Append-only event buffer, emptied logically between updates
#[derive(Debug, Clone)]
pub struct EventQueue<E> {
    events: Vec<E>,
    /// Growth step when full
    chunk: usize,
}

impl<E> Default for EventQueue<E> {
    /// Empty queue that allocates on first push
    fn default() -> Self {
        Self {
            events: Vec::new(),
            chunk: EVENT_QUEUE_CHUNK,
        }
    }
}

impl<E> EventQueue<E> {
    /// Empty queue growing by `chunk`; nothing is allocated yet
    pub fn new(chunk: usize) -> Self {
        Self {
            events: Vec::new(),
            chunk: chunk.max(1),
        }
    }

    /// Queue with its first chunk already reserved
    pub fn preallocated(chunk: usize) -> SimResult<Self> {
        let mut queue = Self::new(chunk);
        queue.grow()?;
        Ok(queue)
    }

    /// Append an event, growing by one chunk when full
    pub fn push(&mut self, event: E) -> SimResult<()> {
        if self.events.len() == self.events.capacity() {
            self.grow()?;
        }
        self.events.push(event);
        Ok(())
    }

    fn grow(&mut self) -> SimResult<()> {
        self.events
            .try_reserve_exact(self.chunk)
            .map_err(|_| SimError::OutOfMemory {
                what: "event queue",
            })
    }

    /// Take all events in insertion order. Storage is kept.
    pub fn drain(&mut self) -> std::vec::Drain<'_, E> {
        self.events.drain(..)
    }

    /// Reset length to zero without releasing storage
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.events.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grows_in_chunks() {
        let mut queue = EventQueue::preallocated(4).unwrap();
        assert!(queue.capacity() >= 4);
        for i in 0..5 {
            queue.push(i).unwrap();
        }
        assert_eq!(queue.len(), 5);
        assert!(queue.capacity() >= 8);
    }

    #[test]
    fn test_drain_preserves_order_and_storage() {
        let mut queue = EventQueue::new(4);
        for i in 0..10 {
            queue.push(i).unwrap();
        }
        let capacity = queue.capacity();

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained, (0..10).collect::<Vec<_>>());
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), capacity);
    }

    #[test]
    fn test_clear_keeps_storage() {
        let mut queue = EventQueue::new(2);
        queue.push("a").unwrap();
        queue.push("b").unwrap();
        queue.push("c").unwrap();
        let capacity = queue.capacity();
        queue.clear();
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.capacity(), capacity);
    }

    #[test]
    fn test_zero_chunk_is_bumped() {
        let mut queue = EventQueue::new(0);
        queue.push(1u8).unwrap();
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_new_does_not_allocate() {
        let queue: EventQueue<u64> = EventQueue::new(usize::MAX / 2);
        assert_eq!(queue.capacity(), 0);
    }

    #[test]
    fn test_failed_growth_is_out_of_memory() {
        let mut queue: EventQueue<u64> = EventQueue::new(usize::MAX / 2);
        assert_eq!(
            queue.push(1),
            Err(SimError::OutOfMemory {
                what: "event queue"
            })
        );
        assert!(queue.is_empty());

        assert!(matches!(
            EventQueue::<u64>::preallocated(usize::MAX / 2),
            Err(SimError::OutOfMemory { .. })
        ));
    }
}
