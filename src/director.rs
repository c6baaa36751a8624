//! Wave director
//!
//! Spawns asteroids and enemies on a fixed tick through the world's public
//! spawn calls, the same path an external script uses. All randomness comes
//! from a seeded PCG so a run is reproducible from its seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::world::World;

/// Seconds between director ticks
pub const DIRECTOR_TICK: f32 = 2.0;

/// Seeded wave spawner
#[derive(Debug, Clone)]
pub struct Director {
    seed: u64,
    rng: Pcg32,
    /// Time carried toward the next tick
    timer: f32,
    wave: u32,
}

impl Director {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            timer: 0.0,
            wave: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Advance by `dt`, spawning a wave on every elapsed tick.
    /// Returns the number of entities spawned.
    pub fn update(&mut self, world: &mut World, dt: f32) -> SimResult<usize> {
        self.timer += dt;
        let mut spawned = 0;
        while self.timer >= DIRECTOR_TICK {
            self.timer -= DIRECTOR_TICK;
            spawned += self.spawn_wave(world)?;
        }
        Ok(spawned)
    }

    /// One wave: a few asteroids from the top edge, an enemy every third wave
    fn spawn_wave(&mut self, world: &mut World) -> SimResult<usize> {
        self.wave += 1;
        let wave = self.wave;

        let half_w = SCREEN_WIDTH / 2.0;
        let top = -SCREEN_HEIGHT / 2.0;
        let asteroids = 1 + (wave / 2).min(4);
        let mut spawned = 0;

        for _ in 0..asteroids {
            let x = self.rng.random_range(-half_w..half_w);
            let xvel = self.rng.random_range(-20.0..20.0);
            let yvel = self.rng.random_range(40.0..120.0);
            let rot_speed = self.rng.random_range(-3.0..3.0);
            spawned += accept(world.add_asteroid(x, top, xvel, yvel, rot_speed))?;
        }

        if wave % 3 == 0 {
            let x = self.rng.random_range(-half_w..half_w);
            spawned += accept(world.add_enemy(x, top))?;
        }

        log::info!("Wave {}: spawned {} entities", wave, spawned);
        Ok(spawned)
    }
}

/// A full registry drops the spawn; anything else is an error
fn accept<T>(result: SimResult<T>) -> SimResult<usize> {
    match result {
        Ok(_) => Ok(1),
        Err(SimError::CapacityExceeded { .. }) => Ok(0),
        Err(e) => Err(e),
    }
}
