//! Per-frame snapshot for HUD and UI collaborators
//!
//! Built once per frame from the world; consumers never write back.

use serde::{Deserialize, Serialize};

use crate::world::World;

/// Frames-per-second over whole elapsed seconds
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    elapsed: f32,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame; returns true when a new reading is published
    pub fn frame(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.frames += 1;
        if self.elapsed >= 1.0 {
            self.elapsed -= 1.0;
            self.fps = self.frames;
            self.frames = 0;
            true
        } else {
            false
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// What the HUD shows this frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HudState {
    pub fps: u32,
    pub render_time_ms: u32,
    pub credits: u32,
    pub hitpoints: f32,
    pub paused: bool,
    pub shop_visible: bool,
}

impl HudState {
    /// Refresh from the world and frame stats
    pub fn update(&mut self, world: &World, fps: &FpsCounter, render_time_ms: u32) {
        self.fps = fps.fps();
        self.render_time_ms = render_time_ms;
        self.credits = world.credits();
        self.hitpoints = world.hitpoints();
        self.paused = world.is_paused();
    }
}
