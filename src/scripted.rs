//! Modules described by configuration instead of code.
//!
//! A [`ScriptedModule`] carries a name, a dependency list and a switch to make
//! its init fail. It does no real work; it records its hook calls in the
//! [`CallLog`] service and counts update/render calls, which is enough to
//! exercise a module graph from the command line.

use log::debug;

use crate::context::ModuleContext;
use crate::error::ModuleError;
use crate::module::{Dependencies, EngineModule};
use crate::resources::calllog::{CallLog, Hook};
use crate::resources::managerconfig::ModuleSpec;

#[derive(Debug, Clone, Default)]
pub struct ScriptedModule {
    name: String,
    dependencies: Dependencies,
    fail_init: bool,
    pub updates: u64,
    pub renders: u64,
}

impl ScriptedModule {
    pub fn new(name: impl Into<String>) -> Self {
        ScriptedModule {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder method to declare a dependency.
    pub fn depends_on(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn from_spec(spec: &ModuleSpec) -> Self {
        ScriptedModule {
            name: spec.name.clone(),
            dependencies: spec.dependencies.iter().cloned().collect(),
            fail_init: spec.fail_init,
            updates: 0,
            renders: 0,
        }
    }

    fn record(&self, ctx: &mut ModuleContext, hook: Hook) {
        if let Some(mut log) = ctx.service_mut::<CallLog>() {
            log.push(self.name.clone(), hook);
            return;
        }
        let mut log = CallLog::default();
        log.push(self.name.clone(), hook);
        ctx.insert_service(log);
    }
}

impl EngineModule for ScriptedModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Dependencies {
        self.dependencies.clone()
    }

    fn init(&mut self, ctx: &mut ModuleContext) -> Result<(), ModuleError> {
        if self.fail_init {
            return Err(ModuleError::init_failed(format!(
                "{} is configured to fail",
                self.name
            )));
        }
        self.record(ctx, Hook::Init);
        debug!("[{}] init", self.name);
        Ok(())
    }

    fn update(&mut self, ctx: &mut ModuleContext, _delta_time: f32) {
        self.updates += 1;
        self.record(ctx, Hook::Update);
    }

    fn render(&mut self, ctx: &mut ModuleContext) {
        self.renders += 1;
        self.record(ctx, Hook::Render);
    }

    fn shutdown(&mut self, ctx: &mut ModuleContext) {
        self.record(ctx, Hook::Shutdown);
        debug!("[{}] shutdown after {} frames", self.name, self.updates);
    }
}
