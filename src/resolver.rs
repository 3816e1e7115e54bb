//! Dependency ordering for module initialization.
//!
//! Depth-first, post-order traversal over the registry. A module is emitted
//! only after every registered module it depends on, and every live module is
//! emitted exactly once whatever the graph looks like:
//!
//! - dependency names that are not registered impose no constraint
//! - re-entering a module that is still on the current path is a cycle; the
//!   offending edge is skipped and the module is emitted when its own
//!   traversal completes
//! - a module depending on itself is the one-node case of the above
//!
//! Roots are taken in registration order, so the result is deterministic.
//! The traversal keeps its own stack instead of recursing, so deep chains do
//! not grow the call stack.

use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::error::ModuleError;
use crate::module::Dependencies;
use crate::registry::ModuleRegistry;

/// Result of [`sort_by_dependencies`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyOrder {
    /// Module names, dependencies first.
    pub order: Vec<String>,
    /// Missing and circular dependencies found on the way.
    pub diagnostics: Vec<ModuleError>,
}

impl DependencyOrder {
    /// Position of `name` in the order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }

    pub fn has_cycles(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, ModuleError::CircularDependency { .. }))
    }

    pub fn missing(&self) -> impl Iterator<Item = &ModuleError> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, ModuleError::MissingDependency { .. }))
    }
}

/// One module on the traversal path and how far through its dependencies we are.
struct Frame {
    name: String,
    dependencies: Dependencies,
    next: usize,
}

impl Frame {
    fn new(registry: &ModuleRegistry, name: &str) -> Self {
        Frame {
            name: name.to_string(),
            dependencies: registry
                .get(name)
                .map(|module| module.dependencies())
                .unwrap_or_default(),
            next: 0,
        }
    }
}

/// Compute an initialization order for every module in `registry`.
pub fn sort_by_dependencies(registry: &ModuleRegistry) -> DependencyOrder {
    let mut result = DependencyOrder::default();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut visiting: FxHashSet<String> = FxHashSet::default();
    let mut stack: Vec<Frame> = Vec::new();

    for root in registry.loaded_names() {
        if visited.contains(root) {
            continue;
        }

        visiting.insert(root.to_string());
        stack.push(Frame::new(registry, root));

        while let Some(frame) = stack.last_mut() {
            let Some(dependency) = frame.dependencies.get(frame.next).cloned() else {
                // All dependencies handled: emit in post-order.
                let Some(done) = stack.pop() else {
                    break;
                };
                visiting.remove(&done.name);
                visited.insert(done.name.clone());
                result.order.push(done.name);
                continue;
            };
            frame.next += 1;

            if !registry.contains(&dependency) {
                let missing = ModuleError::MissingDependency {
                    module: frame.name.clone(),
                    dependency,
                };
                debug!("{}, ignoring", missing);
                result.diagnostics.push(missing);
                continue;
            }
            if visited.contains(&dependency) {
                continue;
            }
            if visiting.contains(&dependency) {
                let cycle = ModuleError::CircularDependency {
                    module: frame.name.clone(),
                    dependency,
                };
                warn!("{}", cycle);
                result.diagnostics.push(cycle);
                continue;
            }

            visiting.insert(dependency.clone());
            let next = Frame::new(registry, &dependency);
            stack.push(next);
        }
    }

    result
}
