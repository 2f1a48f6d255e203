//! Object pools for bullets, enemies and power-ups.
//!
//! A pool owns the *inactive* instances of one entity kind. Active
//! instances live in the engine's active lists; moving an instance between
//! the two is the only way it changes lifecycle, so it is always in exactly
//! one place.

use tracing::{debug, warn};

use arena_core::enums::EntityKind;
use arena_core::types::EntityRef;
use arena_physics::{BodyHandle, PhysicsWorld};

use crate::entities::{Bullet, Enemy, PowerUp};

/// Capability surface shared by every pooled entity.
pub trait Poolable {
    fn entity_ref(&self) -> EntityRef;

    fn is_destroyed(&self) -> bool;

    /// Mark the entity destroyed. Safe to call more than once.
    fn destroy(&mut self);

    /// Physics body, if the entity has one.
    fn body(&self) -> Option<BodyHandle> {
        None
    }

    /// Destroy and take the entity out of the world.
    fn deactivate(&mut self, physics: &mut PhysicsWorld) {
        self.destroy();
        if let Some(body) = self.body() {
            physics.set_enabled(body, false);
        }
    }
}

/// Lifetime counters for one pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances built by the factory.
    pub constructed: u32,
    /// Successful `acquire` calls.
    pub acquired: u32,
    /// `release` calls.
    pub released: u32,
}

/// LIFO free-list of inactive instances of one kind. Grows without bound.
pub struct EntityPool<T> {
    kind: EntityKind,
    free: Vec<T>,
    factory: Option<fn(EntityRef) -> T>,
    next_slot: u32,
    stats: PoolStats,
}

impl<T: Poolable> EntityPool<T> {
    /// Pool that constructs new instances with `factory` when empty.
    pub fn new(kind: EntityKind, factory: fn(EntityRef) -> T) -> Self {
        Self {
            kind,
            free: Vec::new(),
            factory: Some(factory),
            next_slot: 0,
            stats: PoolStats::default(),
        }
    }

    /// Pool with no construction path. `acquire` only ever hands back
    /// previously released instances.
    pub fn unregistered(kind: EntityKind) -> Self {
        Self {
            kind,
            free: Vec::new(),
            factory: None,
            next_slot: 0,
            stats: PoolStats::default(),
        }
    }

    /// Most recently released instance, or a new one. `None` when the pool
    /// is empty and has no factory; callers skip the spawn.
    pub fn acquire(&mut self) -> Option<T> {
        if let Some(item) = self.free.pop() {
            self.stats.acquired += 1;
            return Some(item);
        }

        let Some(factory) = self.factory else {
            warn!(kind = ?self.kind, "pool has no free instance and no factory");
            return None;
        };

        let entity = EntityRef::new(self.kind, self.next_slot);
        self.next_slot += 1;
        self.stats.constructed += 1;
        self.stats.acquired += 1;
        debug!(%entity, "pool grew");
        Some(factory(entity))
    }

    /// Deactivate `item` and push it onto the free-list.
    pub fn release(&mut self, mut item: T, physics: &mut PhysicsWorld) {
        debug_assert_eq!(item.entity_ref().kind, self.kind);
        item.deactivate(physics);
        self.stats.released += 1;
        self.free.push(item);
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Inactive instances, oldest release first.
    pub fn iter_free(&self) -> impl Iterator<Item = &T> {
        self.free.iter()
    }
}

/// The three entity pools the director uses.
pub struct Pools {
    pub bullets: EntityPool<Bullet>,
    pub enemies: EntityPool<Enemy>,
    pub power_ups: EntityPool<PowerUp>,
}

impl Pools {
    pub fn new() -> Self {
        Self {
            bullets: EntityPool::new(EntityKind::Bullet, Bullet::new),
            enemies: EntityPool::new(EntityKind::Enemy, Enemy::new),
            power_ups: EntityPool::new(EntityKind::PowerUp, PowerUp::new),
        }
    }
}

impl Default for Pools {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo_round_trip_without_allocation() {
        let mut physics = PhysicsWorld::new();
        let mut pool = EntityPool::new(EntityKind::Bullet, Bullet::new);

        let items: Vec<Bullet> = (0..4).filter_map(|_| pool.acquire()).collect();
        assert_eq!(pool.stats().constructed, 4);
        let released: Vec<EntityRef> = items.iter().map(|b| b.entity_ref()).collect();
        for item in items {
            pool.release(item, &mut physics);
        }

        let again: Vec<EntityRef> = (0..4)
            .filter_map(|_| pool.acquire())
            .map(|b| b.entity_ref())
            .collect();
        let mut expected = released;
        expected.reverse();
        assert_eq!(again, expected, "acquire must return the last released first");
        assert_eq!(pool.stats().constructed, 4, "no net allocation");
        assert_eq!(pool.stats().acquired, 8);
        assert_eq!(pool.stats().released, 4);
    }

    #[test]
    fn test_release_marks_destroyed() {
        let mut physics = PhysicsWorld::new();
        let mut pool = EntityPool::new(EntityKind::Bullet, Bullet::new);
        let mut bullet = pool.acquire().unwrap();
        assert!(bullet.reset(
            glam::Vec3::ZERO,
            glam::Vec3::NEG_Z,
            8.0,
            arena_core::enums::Owner::Player
        ));
        assert!(!bullet.is_destroyed());

        pool.release(bullet, &mut physics);
        assert!(pool.iter_free().all(|b| b.is_destroyed()));
    }

    #[test]
    fn test_unregistered_pool_reports_not_available() {
        let mut pool: EntityPool<Bullet> = EntityPool::unregistered(EntityKind::Bullet);
        assert!(pool.acquire().is_none());
        assert_eq!(pool.stats(), PoolStats::default());
    }

    #[test]
    fn test_slots_are_unique_per_pool() {
        let mut pool = EntityPool::new(EntityKind::Enemy, Enemy::new);
        let a = pool.acquire().unwrap().entity_ref();
        let b = pool.acquire().unwrap().entity_ref();
        assert_ne!(a, b);
        assert_eq!(a.kind, EntityKind::Enemy);
    }
}
