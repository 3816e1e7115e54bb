//! Serializable summary of a host session.

use serde::Serialize;

use crate::manager::{InitSummary, ModuleManager};
use crate::module::ModuleState;
use crate::resources::calllog::{CallLog, CallRecord};
use crate::scripted::ScriptedModule;

#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport {
    pub name: String,
    pub dependencies: Vec<String>,
    pub state: ModuleState,
    /// Frame counters, present for scripted modules only.
    pub updates: Option<u64>,
    pub renders: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub strict_dependencies: bool,
    pub frames: u32,
    pub init: InitSummary,
    pub modules: Vec<ModuleReport>,
    pub calls: Vec<CallRecord>,
}

impl SessionReport {
    /// Snapshot the manager after a run.
    pub fn collect(manager: &ModuleManager, init: InitSummary, frames: u32) -> Self {
        let modules = manager
            .get_loaded_modules()
            .into_iter()
            .filter_map(|name| {
                let module = manager.get_module(&name)?;
                let scripted = manager.get_module_as::<ScriptedModule>(&name);
                Some(ModuleReport {
                    dependencies: module.dependencies().into_vec(),
                    state: manager.module_state(&name).unwrap_or_default(),
                    updates: scripted.map(|s| s.updates),
                    renders: scripted.map(|s| s.renders),
                    name,
                })
            })
            .collect();

        let calls = manager
            .context()
            .service::<CallLog>()
            .map(|log| log.entries.clone())
            .unwrap_or_default();

        SessionReport {
            strict_dependencies: manager.strict_dependencies(),
            frames,
            init,
            modules,
            calls,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
