//! Explicit service context handed to every module hook.
//!
//! Instead of a process-wide engine singleton, the [`ModuleManager`] owns one
//! [`ModuleContext`] per session and passes it into `init`, `update`, `render`
//! and `shutdown`. Services are plain bevy [`Resource`]s stored in an internal
//! [`World`], so a module publishes a service with [`insert_service`] and its
//! dependents look it up by type.
//!
//! [`ModuleManager`]: crate::manager::ModuleManager
//! [`insert_service`]: ModuleContext::insert_service

use bevy_ecs::prelude::*;

use crate::resources::frametime::FrameTime;

/// Shared service storage for a module session.
pub struct ModuleContext {
    world: World,
}

impl Default for ModuleContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleContext {
    /// Create a context with a fresh [`FrameTime`] service.
    pub fn new() -> Self {
        let mut world = World::new();
        world.insert_resource(FrameTime::default());
        ModuleContext { world }
    }

    /// Publish (or replace) a service.
    pub fn insert_service<R: Resource>(&mut self, service: R) {
        self.world.insert_resource(service);
    }

    /// Borrow a service, if published.
    pub fn service<R: Resource>(&self) -> Option<&R> {
        self.world.get_resource::<R>()
    }

    /// Mutably borrow a service, if published.
    pub fn service_mut<R: Resource>(&mut self) -> Option<Mut<'_, R>> {
        self.world.get_resource_mut::<R>()
    }

    pub fn has_service<R: Resource>(&self) -> bool {
        self.world.contains_resource::<R>()
    }

    /// Remove a service and hand it back.
    pub fn remove_service<R: Resource>(&mut self) -> Option<R> {
        self.world.remove_resource::<R>()
    }

    /// Current frame timing, as last published by the manager.
    pub fn frame_time(&self) -> FrameTime {
        self.world
            .get_resource::<FrameTime>()
            .copied()
            .unwrap_or_default()
    }

    /// Direct access to the underlying world, for modules that keep entities.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
