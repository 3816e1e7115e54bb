//! Lifecycle coordinator and host-facing API.
//!
//! The [`ModuleManager`] owns the [`ModuleRegistry`] and the session's
//! [`ModuleContext`], and sequences every lifecycle call:
//!
//! | pass | order | gate |
//! |------|-------|------|
//! | init | dependency order, computed once | none |
//! | update / render | registration order | module initialized |
//! | shutdown | reverse registration order | module initialized |
//!
//! Dependency order only matters for init. Frame calls are independent and use
//! registration order for reproducibility. Teardown reverses registration
//! order regardless of the dependency graph.
//!
//! Nothing in here panics on bad input: duplicate names, missing or circular
//! dependencies and failed inits are logged and the pass keeps going.
//!
//! # Usage
//!
//! ```ignore
//! let mut manager = ModuleManager::new();
//! manager.register_module("Physics", PhysicsModule::default());
//! manager.register_module("Render", RenderModule::default());
//! manager.initialize_all_modules();
//! while running {
//!     manager.update_all_modules(dt);
//!     manager.render_all_modules();
//! }
//! manager.shutdown_all_modules();
//! ```

use log::{debug, info, warn};
use serde::Serialize;

use crate::context::ModuleContext;
use crate::error::ModuleError;
use crate::module::{EngineModule, ModuleState};
use crate::registry::ModuleRegistry;
use crate::resolver::{DependencyOrder, sort_by_dependencies};
use crate::resources::frametime::FrameTime;
use crate::resources::managerconfig::ManagerConfig;

/// Outcome of [`ModuleManager::initialize_all_modules`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitSummary {
    /// Dependency order the pass walked.
    pub order: Vec<String>,
    /// Modules whose init succeeded, in call order.
    pub initialized: Vec<String>,
    /// Modules whose init returned an error.
    pub failed: Vec<String>,
    /// Modules not attempted because a dependency was not ready (strict mode only).
    pub skipped: Vec<String>,
    /// Missing and circular dependency findings, rendered as messages.
    pub diagnostics: Vec<String>,
}

/// Owns every module for the session and drives their lifecycle.
pub struct ModuleManager {
    registry: ModuleRegistry,
    context: ModuleContext,
    strict_dependencies: bool,
    initialized: bool,
    /// Registration order snapshot used by the frame and shutdown passes.
    frame_order: Vec<String>,
    last_init: Option<InitSummary>,
}

impl Default for ModuleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleManager {
    pub fn new() -> Self {
        ModuleManager {
            registry: ModuleRegistry::new(),
            context: ModuleContext::new(),
            strict_dependencies: false,
            initialized: false,
            frame_order: Vec::new(),
            last_init: None,
        }
    }

    /// Create a manager with the settings from `config`.
    /// Modules listed in the config are not registered here.
    pub fn with_config(config: &ManagerConfig) -> Self {
        let mut manager = Self::new();
        manager.strict_dependencies = config.strict_dependencies;
        manager
    }

    /// When set, a module is only initialized if every registered dependency
    /// initialized successfully.
    pub fn set_strict_dependencies(&mut self, strict: bool) {
        self.strict_dependencies = strict;
    }

    pub fn strict_dependencies(&self) -> bool {
        self.strict_dependencies
    }

    // ---------------- registration ----------------

    /// Register `module` under `name`. A module already stored under that
    /// name is replaced and dropped.
    pub fn register_module<M: EngineModule>(&mut self, name: impl Into<String>, module: M) {
        self.register_boxed(name, Box::new(module));
    }

    /// Register an already boxed module.
    pub fn register_boxed(&mut self, name: impl Into<String>, module: Box<dyn EngineModule>) {
        let name = name.into();
        if self.initialized {
            warn!(
                "Module {} registered after initialization; it will not be initialized this session",
                name
            );
        }
        debug!("Registering module: {}", name);
        let was_initialized = self
            .registry
            .entry(&name)
            .is_some_and(|entry| entry.is_initialized());
        let replaced = self.registry.register(name.clone(), module);
        if let Some(mut old) = replaced {
            if was_initialized {
                debug!("Shutting down replaced module: {}", name);
                old.shutdown(&mut self.context);
            }
        }
    }

    // ---------------- lifecycle ----------------

    /// Initialize every registered module in dependency order.
    ///
    /// A failing module is logged and the pass continues with the rest.
    /// Calling this again after a successful pass returns the previous summary.
    pub fn initialize_all_modules(&mut self) -> InitSummary {
        if self.initialized {
            debug!("ModuleManager already initialized, skipping");
            return self.last_init.clone().unwrap_or_default();
        }

        let order = sort_by_dependencies(&self.registry);
        info!("Module initialization order: {:?}", order.order);

        let mut summary = InitSummary {
            order: order.order.clone(),
            diagnostics: order.diagnostics.iter().map(ToString::to_string).collect(),
            ..InitSummary::default()
        };

        for name in &order.order {
            if self.strict_dependencies {
                if let Some(blocker) = self.uninitialized_dependency(name) {
                    warn!(
                        "Skipping module {}: dependency {} is not initialized",
                        name, blocker
                    );
                    summary.skipped.push(name.clone());
                    continue;
                }
            }

            let Some(entry) = self.registry.entry_mut(name) else {
                continue;
            };

            debug!("Initializing module: {}", name);
            match entry.module_mut().init(&mut self.context) {
                Ok(()) => {
                    entry.module_mut().register_services(&mut self.context);
                    entry.set_state(ModuleState::Initialized);
                    summary.initialized.push(name.clone());
                }
                Err(e) => {
                    warn!("Failed to initialize module {}: {}", name, e);
                    entry.set_state(ModuleState::Failed);
                    summary.failed.push(name.clone());
                }
            }
        }

        self.frame_order = self
            .registry
            .loaded_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.initialized = true;

        info!(
            "Modules initialized: {} ok, {} failed, {} skipped",
            summary.initialized.len(),
            summary.failed.len(),
            summary.skipped.len()
        );
        self.last_init = Some(summary.clone());
        summary
    }

    /// First registered dependency of `name` that is not initialized, ignoring
    /// self references.
    fn uninitialized_dependency(&self, name: &str) -> Option<String> {
        let module = self.registry.get(name)?;
        module.dependencies().into_iter().find(|dep| {
            dep != name
                && self
                    .registry
                    .entry(dep)
                    .is_some_and(|entry| !entry.is_initialized())
        })
    }

    /// Advance frame time and call `update` on every initialized module, in
    /// registration order.
    pub fn update_all_modules(&mut self, delta_time: f32) {
        if !self.initialized {
            return;
        }

        let mut time: FrameTime = self.context.frame_time();
        time.advance(delta_time);
        self.context.insert_service(time);

        for name in &self.frame_order {
            if let Some(entry) = self.registry.entry_mut(name) {
                if entry.is_initialized() {
                    entry.module_mut().update(&mut self.context, delta_time);
                }
            }
        }
    }

    /// Call `render` on every initialized module, in registration order.
    pub fn render_all_modules(&mut self) {
        if !self.initialized {
            return;
        }

        for name in &self.frame_order {
            if let Some(entry) = self.registry.entry_mut(name) {
                if entry.is_initialized() {
                    entry.module_mut().render(&mut self.context);
                }
            }
        }
    }

    /// Shut down every initialized module in reverse registration order.
    /// A second call is a no-op.
    pub fn shutdown_all_modules(&mut self) {
        if !self.initialized {
            return;
        }

        for name in self.frame_order.iter().rev() {
            if let Some(entry) = self.registry.entry_mut(name) {
                if entry.is_initialized() {
                    debug!("Shutting down module: {}", name);
                    entry.module_mut().shutdown(&mut self.context);
                    entry.set_state(ModuleState::ShutDown);
                }
            }
        }

        self.initialized = false;
        info!("All modules shut down");
    }

    /// Run a single module's `update`, with the same gate the frame pass uses.
    pub fn update_module(&mut self, name: &str, delta_time: f32) -> Result<(), ModuleError> {
        let entry = self
            .registry
            .entry_mut(name)
            .ok_or_else(|| ModuleError::ModuleNotFound(name.to_string()))?;
        if !entry.is_initialized() {
            return Err(ModuleError::UninitializedModuleCall {
                name: name.to_string(),
                operation: "update",
            });
        }
        entry.module_mut().update(&mut self.context, delta_time);
        Ok(())
    }

    // ---------------- queries ----------------

    pub fn get_module(&self, name: &str) -> Option<&dyn EngineModule> {
        self.registry.get(name)
    }

    pub fn get_module_mut(&mut self, name: &str) -> Option<&mut dyn EngineModule> {
        self.registry.get_mut(name)
    }

    /// Like [`get_module`](Self::get_module), with the miss as an error value.
    pub fn try_get_module(&self, name: &str) -> Result<&dyn EngineModule, ModuleError> {
        self.registry
            .get(name)
            .ok_or_else(|| ModuleError::ModuleNotFound(name.to_string()))
    }

    /// Borrow a module as its concrete type.
    pub fn get_module_as<T: EngineModule>(&self, name: &str) -> Option<&T> {
        self.registry.get_as::<T>(name)
    }

    pub fn get_module_as_mut<T: EngineModule>(&mut self, name: &str) -> Option<&mut T> {
        self.registry.get_as_mut::<T>(name)
    }

    pub fn is_module_loaded(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Names of all live modules in registration order.
    pub fn get_loaded_modules(&self) -> Vec<String> {
        self.registry
            .loaded_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn is_module_initialized(&self, name: &str) -> bool {
        self.registry
            .entry(name)
            .is_some_and(|entry| entry.is_initialized())
    }

    pub fn module_state(&self, name: &str) -> Option<ModuleState> {
        self.registry.entry(name).map(|entry| entry.state())
    }

    /// Compute the dependency order of the current registry.
    pub fn dependency_order(&self) -> DependencyOrder {
        sort_by_dependencies(&self.registry)
    }

    /// `true` between a completed init pass and shutdown.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn context(&self) -> &ModuleContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ModuleContext {
        &mut self.context
    }
}

impl Drop for ModuleManager {
    fn drop(&mut self) {
        if self.initialized {
            self.shutdown_all_modules();
        }
    }
}
