//! End-to-end scenarios through the public world API

use glam::Vec2;
use proptest::prelude::*;

use roid_rage::consts::*;
use roid_rage::sim::{Body, BodyType, EntityRef, EventQueue, GameEvent, Simulation};
use roid_rage::world::{Entity, Projectile, Status};
use roid_rage::{GameConfig, World};

fn world_at_origin() -> World {
    World::new(GameConfig {
        player_spawn: Vec2::ZERO,
        ..GameConfig::default()
    })
    .unwrap()
}

#[test]
fn test_projectile_expires_after_ttl() {
    let mut world = world_at_origin();
    world
        .spawn_projectile(Projectile::new(Vec2::ZERO, Vec2::ZERO, 5.0))
        .unwrap();

    for _ in 0..4 {
        world.update(1.0).unwrap();
        assert_eq!(world.projectile_count(), 1);
    }
    world.update(1.0).unwrap();
    assert_eq!(world.projectile_count(), 0);
    // Only the player's body is left
    assert_eq!(world.simulation().bodies().len(), 1);
}

#[test]
fn test_ttl_boundary_is_inclusive() {
    let mut world = world_at_origin();
    world
        .spawn_projectile(Projectile::new(Vec2::new(0.0, -300.0), Vec2::ZERO, 0.016))
        .unwrap();
    world.update(0.016).unwrap();
    assert_eq!(world.projectile_count(), 0);
}

#[test]
fn test_player_enemy_contact_single_event() {
    let mut sim: Simulation<EventQueue<GameEvent>> = Simulation::default();
    sim.add_handler(BodyType::PLAYER | BodyType::ENEMY, |a, b, events| {
        if a.body.kind == BodyType::PLAYER {
            events.push(GameEvent::PlayerCollision {
                player: a.handle,
                other: b.handle,
                other_owner: EntityRef::Player,
            })?;
        }
        Ok(())
    })
    .unwrap();

    let player = sim
        .add_body(
            Body::new(Vec2::ZERO, 40.0, BodyType::PLAYER, BodyType::ENEMY | BodyType::ASTEROID)
                .with_owner(EntityRef::Player),
        )
        .unwrap();
    let enemy = sim
        .add_body(
            Body::new(Vec2::new(10.0, 0.0), 40.0, BodyType::ENEMY, BodyType::PLAYER)
                .with_owner(EntityRef::Player),
        )
        .unwrap();

    let mut events = EventQueue::default();
    sim.step(0.1, &mut events).unwrap();

    let collected: Vec<_> = events.drain().collect();
    assert_eq!(collected.len(), 1);
    match collected[0] {
        GameEvent::PlayerCollision { player: p, other, .. } => {
            assert_eq!(p, player);
            assert_eq!(other, enemy);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_three_hits_in_one_batch_kill_enemy() {
    let mut world = world_at_origin();
    let enemy = world.add_enemy(0.0, -300.0).unwrap();
    let body = world.enemy(enemy).unwrap().body();
    for _ in 0..3 {
        world
            .spawn_projectile(Projectile::new(Vec2::new(0.0, -300.0), Vec2::ZERO, 5.0))
            .unwrap();
    }

    world.update(SIM_DT).unwrap();
    assert!(world.enemy(enemy).is_none());
    assert!(world.simulation().body(body).is_none());
    assert_eq!(world.projectile_count(), 0);
    assert_eq!(world.credits(), ENEMY_CREDITS);
}

#[test]
fn test_spawn_is_transactional() {
    let mut world = World::new(GameConfig {
        body_capacity: Some(3),
        ..GameConfig::default()
    })
    .unwrap();
    world.add_asteroid(100.0, 0.0, 0.0, 0.0, 0.0).unwrap();
    world.add_enemy(-200.0, 0.0).unwrap();
    assert!(world.add_asteroid(0.0, 0.0, 0.0, 0.0, 0.0).is_err());
    assert_eq!(world.asteroid_count(), 1);
    assert_eq!(world.enemy_count(), 1);
    assert_eq!(world.simulation().bodies().len(), 3);
}

#[test]
fn test_remove_twice_is_harmless() {
    let mut world = world_at_origin();
    let id = world.add_enemy(300.0, 0.0).unwrap();
    assert!(world.remove_enemy(id).is_some());
    assert!(world.remove_enemy(id).is_none());
    assert_eq!(world.enemy_count(), 0);
    assert_eq!(world.simulation().bodies().len(), 1);
}

#[test]
fn test_player_dies_to_asteroids() {
    let mut world = World::new(GameConfig {
        player_spawn: Vec2::ZERO,
        player_hitpoints: 20.0,
        ..GameConfig::default()
    })
    .unwrap();
    world.add_asteroid(5.0, 0.0, 0.0, 0.0, 0.0).unwrap();
    world.add_asteroid(-5.0, 0.0, 0.0, 0.0, 0.0).unwrap();

    assert_eq!(world.update(SIM_DT).unwrap(), Status::GameOver);
    assert_eq!(world.hitpoints(), 0.0);
    assert_eq!(world.asteroid_count(), 0);
}

/// Asteroid position after feeding `chunks` (in 1/1024 s units) as frames
fn drift(chunks: &[u32]) -> Vec2 {
    let mut world = World::new(GameConfig::default()).unwrap();
    let id = world
        .add_asteroid(-300.0, -200.0, 30.0, -10.0, 1.0)
        .unwrap();
    for &k in chunks {
        world.update(k as f32 / 1024.0).unwrap();
    }
    world.asteroid(id).unwrap().pos
}

proptest! {
    #[test]
    fn prop_accumulator_ignores_frame_chunking(
        chunks in prop::collection::vec(1u32..=64, 1..40),
    ) {
        let total: u32 = chunks.iter().sum();
        prop_assert_eq!(drift(&chunks), drift(&[total]));
    }
}
