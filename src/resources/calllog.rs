//! Record of lifecycle hook calls.
//!
//! [`ScriptedModule`](crate::scripted::ScriptedModule) appends to this service
//! so a host can show exactly which hooks ran and in what order.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

/// Lifecycle hook a [`CallRecord`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hook {
    Init,
    Update,
    Render,
    Shutdown,
}

/// One hook call made to one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    /// Name the module reports for itself.
    pub module: String,
    /// Which hook ran.
    pub hook: Hook,
}

/// Service holding every recorded hook call for the session.
#[derive(Resource, Debug, Clone, Default)]
pub struct CallLog {
    /// Calls in the order they happened.
    pub entries: Vec<CallRecord>,
}

impl CallLog {
    /// Append a call for `module`.
    pub fn push(&mut self, module: impl Into<String>, hook: Hook) {
        self.entries.push(CallRecord {
            module: module.into(),
            hook,
        });
    }

    /// Modules that received `hook`, in call order.
    pub fn modules_for(&self, hook: Hook) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|record| record.hook == hook)
            .map(|record| record.module.as_str())
            .collect()
    }
}
