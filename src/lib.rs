//! Module lifecycle manager for engine subsystems.
//!
//! A registry owns a set of named modules, resolves their declared
//! dependencies into an initialization order, and drives per-frame
//! update/render and final shutdown in a deterministic sequence.
//!
//! - [`module`] – the [`EngineModule`](module::EngineModule) contract
//! - [`registry`] – owning name → module store with registration order
//! - [`resolver`] – dependency ordering with cycle breaking
//! - [`manager`] – lifecycle coordinator and host API
//! - [`context`] – service context passed to module hooks
//! - [`resources`] – services and configuration
//! - [`scripted`] – config-described modules
//! - [`report`] – JSON session report

pub mod context;
pub mod error;
pub mod manager;
pub mod module;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod resources;
pub mod scripted;
