//! World: entity collections and the per-frame update
//!
//! Update order, each phase finishing before the next starts:
//! 1. Fixed-step physics (accumulator), handlers record events
//! 2. Apply events (damage, zeroing), never removing anything
//! 3. Player movement and shooting
//! 4. Liveness sweep: expire or destroy, then run behaviour on survivors
//! 5. Report whether the game goes on
//!
//! An entity and its body are added and removed together.

pub mod entity;

use glam::Vec2;
use slotmap::{Key, SlotMap};

use crate::config::GameConfig;
use crate::error::{SimError, SimResult};
use crate::sim::{
    AsteroidId, BodyType, Contact, EnemyId, EntityRef, EventQueue, GameEvent, ProjectileId,
    Simulation,
};

pub use entity::{Actions, Asteroid, Enemy, Entity, Player, Projectile, seek};

/// Simulation whose handlers write into the world's event queue
pub type WorldSim = Simulation<EventQueue<GameEvent>>;

/// Outcome of one world update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// The player died; the caller should stop the loop
    GameOver,
}

/// All live game state
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    player: Player,
    enemies: SlotMap<EnemyId, Enemy>,
    asteroids: SlotMap<AsteroidId, Asteroid>,
    projectiles: SlotMap<ProjectileId, Projectile>,
    sim: WorldSim,
    events: EventQueue<GameEvent>,
    /// Unsimulated time carried between updates
    accumulator: f32,
    paused: bool,
}

impl World {
    pub fn new(config: GameConfig) -> SimResult<Self> {
        config.validate()?;

        let mut sim: WorldSim = Simulation::new(config.body_capacity, config.handler_capacity);
        sim.add_handler(BodyType::PLAYER | BodyType::ENEMY, handle_player_collision)?;
        sim.add_handler(BodyType::PLAYER | BodyType::ASTEROID, handle_player_collision)?;
        let damage = config.projectile_damage;
        sim.add_handler(
            BodyType::ENEMY | BodyType::PROJECTILE,
            move |a, b, events: &mut EventQueue<GameEvent>| handle_enemy_hit(a, b, events, damage),
        )?;

        let mut player = Player::new(
            config.player_spawn,
            config.player_hitpoints,
            config.player_speed,
        );
        let handle = sim.add_body(player.make_body().with_owner(EntityRef::Player))?;
        player.attach(handle);

        log::info!(
            "World created: {} handlers, step {}s",
            sim.handler_count(),
            config.sim_step
        );

        Ok(Self {
            events: EventQueue::preallocated(config.event_chunk)?,
            config,
            player,
            enemies: SlotMap::with_key(),
            asteroids: SlotMap::with_key(),
            projectiles: SlotMap::with_key(),
            sim,
            accumulator: 0.0,
            paused: false,
        })
    }

    // === Spawning ===

    /// Spawn an enemy with configured hitpoints and lifetime
    pub fn add_enemy(&mut self, x: f32, y: f32) -> SimResult<EnemyId> {
        let enemy = Enemy::new(
            Vec2::new(x, y),
            self.config.enemy_hitpoints,
            self.config.entity_ttl,
        );
        self.spawn_enemy(enemy)
    }

    /// Spawn an asteroid with configured lifetime
    pub fn add_asteroid(
        &mut self,
        x: f32,
        y: f32,
        xvel: f32,
        yvel: f32,
        rot_speed: f32,
    ) -> SimResult<AsteroidId> {
        let asteroid = Asteroid::new(
            Vec2::new(x, y),
            Vec2::new(xvel, yvel),
            rot_speed,
            self.config.entity_ttl,
        );
        self.spawn_asteroid(asteroid)
    }

    pub fn spawn_enemy(&mut self, enemy: Enemy) -> SimResult<EnemyId> {
        if !(enemy.pos.is_finite() && enemy.vel.is_finite()) {
            return Err(SimError::InvalidSpawn("enemy motion is not finite"));
        }
        let id = insert(&mut self.enemies, &mut self.sim, enemy, EntityRef::Enemy)?;
        log::debug!("Spawned enemy {:?}", id);
        Ok(id)
    }

    pub fn spawn_asteroid(&mut self, asteroid: Asteroid) -> SimResult<AsteroidId> {
        if !(asteroid.pos.is_finite() && asteroid.vel.is_finite() && asteroid.rot_speed.is_finite())
        {
            return Err(SimError::InvalidSpawn("asteroid motion is not finite"));
        }
        let id = insert(&mut self.asteroids, &mut self.sim, asteroid, EntityRef::Asteroid)?;
        log::debug!("Spawned asteroid {:?}", id);
        Ok(id)
    }

    pub fn spawn_projectile(&mut self, projectile: Projectile) -> SimResult<ProjectileId> {
        if !(projectile.pos.is_finite() && projectile.vel.is_finite()) {
            return Err(SimError::InvalidSpawn("projectile motion is not finite"));
        }
        let id = insert(
            &mut self.projectiles,
            &mut self.sim,
            projectile,
            EntityRef::Projectile,
        )?;
        log::debug!("Spawned projectile {:?}", id);
        Ok(id)
    }

    // === Removal ===

    pub fn remove_enemy(&mut self, id: EnemyId) -> Option<Enemy> {
        let enemy = self.enemies.remove(id)?;
        self.sim.remove_body(enemy.body());
        Some(enemy)
    }

    pub fn remove_asteroid(&mut self, id: AsteroidId) -> Option<Asteroid> {
        let asteroid = self.asteroids.remove(id)?;
        self.sim.remove_body(asteroid.body());
        Some(asteroid)
    }

    pub fn remove_projectile(&mut self, id: ProjectileId) -> Option<Projectile> {
        let projectile = self.projectiles.remove(id)?;
        self.sim.remove_body(projectile.body());
        Some(projectile)
    }

    // === Input ===

    pub fn set_action(&mut self, action: Actions) {
        self.player.actions.insert(action);
    }

    pub fn clear_action(&mut self, action: Actions) {
        self.player.actions.remove(action);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // === Update ===

    /// Advance the world by `dt` seconds of real time
    pub fn update(&mut self, dt: f32) -> SimResult<Status> {
        if self.paused {
            return Ok(Status::Running);
        }

        if let Err(e) = self.run_physics(dt) {
            // Outcomes of a partial step are dropped with it
            self.events.clear();
            return Err(e);
        }
        self.process_events()?;

        let spawn = self.update_player(dt);
        self.sweep(dt);
        // Live entities are consistent even if the shot failed
        spawn?;

        if self.player.is_alive() {
            Ok(Status::Running)
        } else {
            log::info!("Game over: {} credits", self.player.credits);
            Ok(Status::GameOver)
        }
    }

    /// Run as many fixed steps as the accumulator holds
    fn run_physics(&mut self, dt: f32) -> SimResult<()> {
        let step = self.config.sim_step;
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= step {
            if self.config.max_substeps.is_some_and(|max| substeps >= max) {
                break;
            }
            self.sim.step(step, &mut self.events)?;
            self.accumulator -= step;
            substeps += 1;
        }
        Ok(())
    }

    /// Apply every queued event in order, then empty the queue
    fn process_events(&mut self) -> SimResult<()> {
        let mut events = std::mem::take(&mut self.events);
        let result = events.drain().try_for_each(|event| self.apply_event(event));
        events.clear();
        self.events = events;
        result
    }

    /// Effects are applied blindly: an entity already at zero hitpoints
    /// still takes damage. Removal happens in the sweep.
    fn apply_event(&mut self, event: GameEvent) -> SimResult<()> {
        match event {
            GameEvent::EnemyHit {
                enemy,
                projectile,
                damage,
            } => {
                log::debug!("Enemy hit by player!");
                let target = self.enemies.get_mut(enemy).ok_or_else(stale_owner)?;
                target.hitpoints -= damage;
                if target.hitpoints <= 0.0 {
                    target.shot_down = true;
                }
                let shot = self.projectiles.get_mut(projectile).ok_or_else(stale_owner)?;
                shot.ttl = 0.0;
            }
            GameEvent::PlayerCollision {
                player,
                other,
                other_owner,
            } => {
                if player != self.player.body() || !self.sim.bodies().contains(other) {
                    return Err(stale_owner());
                }
                self.apply_player_collision(other_owner)?;
            }
        }
        Ok(())
    }

    /// The player takes contact damage; the other party is destroyed
    fn apply_player_collision(&mut self, other_owner: EntityRef) -> SimResult<()> {
        match other_owner {
            EntityRef::Enemy(id) => {
                log::debug!("Player collided with an enemy!");
                let enemy = self.enemies.get_mut(id).ok_or_else(stale_owner)?;
                enemy.hitpoints = 0.0;
                self.player.hitpoints -= self.config.enemy_collision_damage;
            }
            EntityRef::Asteroid(id) => {
                log::debug!("Player collided with an asteroid!");
                let asteroid = self.asteroids.get_mut(id).ok_or_else(stale_owner)?;
                asteroid.hitpoints = 0.0;
                self.player.hitpoints -= self.config.asteroid_collision_damage;
            }
            EntityRef::Player | EntityRef::Projectile(_) => {
                return Err(SimError::InvariantViolation(
                    "player collision with unexpected body",
                ));
            }
        }
        Ok(())
    }

    /// Move the player and fire if requested
    fn update_player(&mut self, dt: f32) -> SimResult<()> {
        let player = &mut self.player;
        player.apply_movement(dt);
        self.sim.set_position(player.body(), player.pos);

        if !player.try_shoot(dt, self.config.shoot_cooldown()) {
            return Ok(());
        }
        let shot = Projectile::new(
            player.pos,
            Vec2::new(0.0, -self.config.projectile_speed),
            self.config.projectile_ttl,
        );
        match self.spawn_projectile(shot) {
            Ok(_) => Ok(()),
            Err(e @ SimError::CapacityExceeded { .. }) => {
                log::warn!("Shot dropped: {}", e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Destroy dead or expired entities; update the survivors
    fn sweep(&mut self, dt: f32) {
        let Self {
            config,
            player,
            enemies,
            asteroids,
            projectiles,
            sim,
            ..
        } = self;

        let target = player.pos;
        enemies.retain(|id, enemy| {
            enemy.ttl -= dt;
            if enemy.hitpoints <= 0.0 || enemy.ttl <= 0.0 {
                sim.remove_body(enemy.body());
                if enemy.shot_down {
                    player.credits += config.enemy_credits;
                    log::debug!("Enemy {:?} destroyed", id);
                } else if enemy.hitpoints <= 0.0 {
                    log::debug!("Enemy {:?} rammed", id);
                } else {
                    log::debug!("Enemy {:?} expired", id);
                }
                return false;
            }
            if let Some(body) = sim.body(enemy.body()) {
                enemy.sync(body);
            }
            let vel = enemy.steer(target, config.enemy_max_speed, config.enemy_max_turn);
            sim.set_velocity(enemy.body(), vel);
            true
        });

        asteroids.retain(|id, asteroid| {
            asteroid.ttl -= dt;
            if asteroid.hitpoints <= 0.0 || asteroid.ttl <= 0.0 {
                sim.remove_body(asteroid.body());
                log::debug!("Asteroid {:?} removed", id);
                return false;
            }
            if let Some(body) = sim.body(asteroid.body()) {
                asteroid.sync(body);
            }
            asteroid.rotate(dt);
            true
        });

        projectiles.retain(|id, projectile| {
            projectile.ttl -= dt;
            if projectile.ttl <= 0.0 {
                sim.remove_body(projectile.body());
                log::debug!("Projectile {:?} removed", id);
                return false;
            }
            if let Some(body) = sim.body(projectile.body()) {
                projectile.sync(body);
            }
            true
        });
    }

    // === Read-only views ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(id)
    }

    pub fn asteroid(&self, id: AsteroidId) -> Option<&Asteroid> {
        self.asteroids.get(id)
    }

    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.get(id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = (EnemyId, &Enemy)> {
        self.enemies.iter()
    }

    pub fn asteroids(&self) -> impl Iterator<Item = (AsteroidId, &Asteroid)> {
        self.asteroids.iter()
    }

    pub fn projectiles(&self) -> impl Iterator<Item = (ProjectileId, &Projectile)> {
        self.projectiles.iter()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn asteroid_count(&self) -> usize {
        self.asteroids.len()
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn simulation(&self) -> &WorldSim {
        &self.sim
    }

    pub fn credits(&self) -> u32 {
        self.player.credits
    }

    pub fn hitpoints(&self) -> f32 {
        self.player.hitpoints
    }
}

/// Insert an entity and register its body as one step
fn insert<K: Key, T: Entity>(
    pool: &mut SlotMap<K, T>,
    sim: &mut WorldSim,
    entity: T,
    owner: fn(K) -> EntityRef,
) -> SimResult<K> {
    let body = entity.make_body();
    let id = pool.insert(entity);
    match sim.add_body(body.with_owner(owner(id))) {
        Ok(handle) => {
            if let Some(entity) = pool.get_mut(id) {
                entity.attach(handle);
            }
            Ok(id)
        }
        Err(e) => {
            pool.remove(id);
            log::warn!("Spawn rejected: {}", e);
            Err(e)
        }
    }
}

fn stale_owner() -> SimError {
    debug_assert!(false, "event references a destroyed entity");
    log::error!("Event references a destroyed entity");
    SimError::InvariantViolation("event references a destroyed entity")
}

/// Player vs enemy/asteroid; only the ordering with the player first records
fn handle_player_collision(
    a: Contact<'_>,
    b: Contact<'_>,
    events: &mut EventQueue<GameEvent>,
) -> SimResult<()> {
    if a.body.kind != BodyType::PLAYER {
        return Ok(());
    }
    let other_owner = b
        .body
        .owner
        .ok_or(SimError::InvariantViolation("colliding body has no owner"))?;
    events.push(GameEvent::PlayerCollision {
        player: a.handle,
        other: b.handle,
        other_owner,
    })
}

/// Enemy vs projectile; only the ordering with the enemy first records
fn handle_enemy_hit(
    a: Contact<'_>,
    b: Contact<'_>,
    events: &mut EventQueue<GameEvent>,
    damage: f32,
) -> SimResult<()> {
    if a.body.kind != BodyType::ENEMY {
        return Ok(());
    }
    match (a.body.owner, b.body.owner) {
        (Some(EntityRef::Enemy(enemy)), Some(EntityRef::Projectile(projectile))) => {
            events.push(GameEvent::EnemyHit {
                enemy,
                projectile,
                damage,
            })
        }
        _ => Err(SimError::InvariantViolation(
            "enemy hit without enemy and projectile owners",
        )),
    }
}
