//! Services published into the module context, and manager configuration.
//!
//! Overview
//! - `calllog` – ordered record of lifecycle hook calls made to scripted modules
//! - `frametime` – elapsed time, delta and frame count, advanced every update pass
//! - `managerconfig` – INI-backed manager/session settings and module declarations
pub mod calllog;
pub mod frametime;
pub mod managerconfig;
