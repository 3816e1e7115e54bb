//! Frame timing service.
//!
//! Published into the [`ModuleContext`](crate::context::ModuleContext) by the
//! manager at the start of every update pass, so modules can read elapsed
//! session time without tracking it themselves.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub elapsed: f32,
    pub delta: f32,
    pub frame_count: u64,
}

impl Default for FrameTime {
    fn default() -> Self {
        FrameTime {
            elapsed: 0.0,
            delta: 0.0,
            frame_count: 0,
        }
    }
}

impl FrameTime {
    /// Advance by one frame of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        self.delta = dt;
        self.frame_count += 1;
    }
}
