//! Module manager configuration.
//!
//! Loaded from an INI file. Missing keys keep their defaults, so a session can
//! start without any file at all.
//!
//! # Configuration File Format
//!
//! ```ini
//! [manager]
//! strict_dependencies = false
//!
//! [session]
//! frames = 3
//! delta = 0.016
//!
//! [module.Physics]
//! dependencies =
//!
//! [module.Render]
//! dependencies = Physics
//! fail_init = false
//! ```
//!
//! Every `[module.<Name>]` section describes a
//! [`ScriptedModule`](crate::scripted::ScriptedModule). Sections are kept in
//! file order, which becomes the registration order.

use configparser::ini::Ini;
use log::info;
use std::path::{Path, PathBuf};

const DEFAULT_STRICT_DEPENDENCIES: bool = false;
const DEFAULT_FRAMES: u32 = 3;
const DEFAULT_DELTA: f32 = 1.0 / 60.0;
const DEFAULT_CONFIG_PATH: &str = "./modules.ini";
const MODULE_SECTION_PREFIX: &str = "module.";

/// A module declared in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    pub name: String,
    pub dependencies: Vec<String>,
    /// Make the module's init hook report failure.
    pub fail_init: bool,
}

/// Manager and session settings.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Skip modules whose registered dependencies did not initialize.
    pub strict_dependencies: bool,
    /// Number of update/render frames the host runs.
    pub frames: u32,
    /// Fixed delta time fed to each update, in seconds.
    pub delta: f32,
    /// Modules to register, in file order.
    pub modules: Vec<ModuleSpec>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ManagerConfig {
    /// Create a configuration with default values and no modules.
    pub fn new() -> Self {
        Self {
            strict_dependencies: DEFAULT_STRICT_DEPENDENCIES,
            frames: DEFAULT_FRAMES,
            delta: DEFAULT_DELTA,
            modules: Vec::new(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from `config_path`.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let path: &Path = &self.config_path;
        let mut ini = Ini::new_cs();
        ini.load(path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&ini)?;
        info!(
            "Loaded config from {:?}: {} modules, frames={}, delta={}, strict={}",
            self.config_path,
            self.modules.len(),
            self.frames,
            self.delta,
            self.strict_dependencies
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut ini = Ini::new_cs();
        ini.read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&ini)
    }

    fn apply(&mut self, ini: &Ini) -> Result<(), String> {
        // [manager] section
        if let Some(strict) = ini.getbool("manager", "strict_dependencies")? {
            self.strict_dependencies = strict;
        }

        // [session] section
        if let Some(frames) = ini.getuint("session", "frames")? {
            self.frames = u32::try_from(frames)
                .map_err(|_| format!("[session] frames out of range: {}", frames))?;
        }
        if let Some(delta) = ini.getfloat("session", "delta")? {
            self.delta = delta as f32;
        }

        // [module.*] sections
        self.modules.clear();
        for section in ini.sections() {
            let Some(name) = section.strip_prefix(MODULE_SECTION_PREFIX) else {
                continue;
            };
            if name.is_empty() {
                return Err(format!("Module section without a name: [{}]", section));
            }
            let dependencies = ini
                .get(&section, "dependencies")
                .map(|deps| parse_name_list(&deps))
                .unwrap_or_default();
            let fail_init = ini.getbool(&section, "fail_init")?.unwrap_or(false);
            self.modules.push(ModuleSpec {
                name: name.to_string(),
                dependencies,
                fail_init,
            });
        }

        Ok(())
    }
}

/// Split a comma separated list, dropping blanks.
fn parse_name_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
