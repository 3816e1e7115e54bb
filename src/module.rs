//! The lifecycle contract every engine module implements.
//!
//! Modules of unrelated concrete types are stored as `Box<dyn EngineModule>`
//! and driven uniformly by the [`ModuleManager`](crate::manager::ModuleManager):
//!
//! 1. `init` once, in dependency order
//! 2. `register_services` right after a successful `init`
//! 3. `update` then `render` every frame, in registration order
//! 4. `shutdown` once, in reverse registration order
//!
//! Modules never see each other directly. Anything a module wants to share is
//! published as a service into the [`ModuleContext`] and read back by its
//! dependents.
//!
//! # Example
//!
//! ```ignore
//! struct AudioModule { volume: f32 }
//!
//! impl EngineModule for AudioModule {
//!     fn name(&self) -> &str { "Audio" }
//!
//!     fn init(&mut self, _ctx: &mut ModuleContext) -> Result<(), ModuleError> {
//!         self.volume = 1.0;
//!         Ok(())
//!     }
//! }
//! ```

use std::any::Any;

use smallvec::SmallVec;

use crate::context::ModuleContext;
use crate::error::ModuleError;

/// Names of the modules that must initialize before this one.
pub type Dependencies = SmallVec<[String; 4]>;

/// Lifecycle contract for a pluggable engine subsystem.
pub trait EngineModule: Any {
    /// Unique name of this module within a session.
    fn name(&self) -> &str;

    /// Modules that must be initialized first. Unregistered names are ignored.
    fn dependencies(&self) -> Dependencies {
        Dependencies::new()
    }

    /// Bring the module up. Dependencies have already had their turn.
    fn init(&mut self, ctx: &mut ModuleContext) -> Result<(), ModuleError>;

    /// Publish services for dependents. Called only after `init` succeeded.
    fn register_services(&mut self, _ctx: &mut ModuleContext) {}

    /// Per-frame simulation step. Must return promptly.
    fn update(&mut self, _ctx: &mut ModuleContext, _delta_time: f32) {}

    /// Per-frame draw step, after every module's `update`. Render-side
    /// services (targets, draw queues) live in the context too.
    fn render(&mut self, _ctx: &mut ModuleContext) {}

    /// Release resources. Never fails.
    fn shutdown(&mut self, _ctx: &mut ModuleContext) {}
}

/// Where a registered module sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleState {
    /// Stored, not yet initialized (or skipped during initialization).
    #[default]
    Registered,
    /// `init` succeeded; the module receives frame calls.
    Initialized,
    /// `init` returned an error.
    Failed,
    /// `shutdown` has run.
    ShutDown,
}

impl ModuleState {
    pub fn is_initialized(self) -> bool {
        self == ModuleState::Initialized
    }
}
