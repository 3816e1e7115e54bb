//! `modulekit` host entry point.
//!
//! Builds a module graph from an INI file, then runs one full session with it:
//!
//! 1. Load [`ManagerConfig`] (defaults if the file is missing)
//! 2. Register one [`ScriptedModule`] per `[module.<Name>]` section
//! 3. Initialize in dependency order
//! 4. Run the configured number of update/render frames
//! 5. Shut down in reverse registration order
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --config modules.ini --frames 5
//! cargo run -- --config modules.ini --order-only
//! cargo run -- --config modules.ini --json
//! ```

use clap::Parser;
use std::path::PathBuf;

use modulekit::manager::ModuleManager;
use modulekit::report::SessionReport;
use modulekit::resources::managerconfig::ManagerConfig;
use modulekit::scripted::ScriptedModule;

/// Module lifecycle host
#[derive(Parser)]
#[command(version, about = "Register, order and drive engine modules described in an INI file.")]
struct Cli {
    /// Path to the module configuration file.
    #[arg(long, value_name = "PATH", default_value = "./modules.ini")]
    config: PathBuf,

    /// Override the number of frames to run.
    #[arg(long, value_name = "N")]
    frames: Option<u32>,

    /// Print the dependency order and exit without running the session.
    #[arg(long)]
    order_only: bool,

    /// Print a JSON session report on stdout.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = ManagerConfig::with_path(cli.config.clone());
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    if let Some(frames) = cli.frames {
        config.frames = frames;
    }

    let mut manager = ModuleManager::with_config(&config);
    for spec in &config.modules {
        manager.register_module(spec.name.clone(), ScriptedModule::from_spec(spec));
    }

    if cli.order_only {
        let order = manager.dependency_order();
        for name in &order.order {
            println!("{}", name);
        }
        for diagnostic in &order.diagnostics {
            eprintln!("warning: {}", diagnostic);
        }
        return;
    }

    // --------------- Session ---------------
    let init = manager.initialize_all_modules();
    for _ in 0..config.frames {
        manager.update_all_modules(config.delta);
        manager.render_all_modules();
    }
    manager.shutdown_all_modules();

    if cli.json {
        let report = SessionReport::collect(&manager, init, config.frames);
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        log::info!(
            "Session finished: {} modules, {} frames, {} failed, {} skipped",
            manager.get_loaded_modules().len(),
            config.frames,
            init.failed.len(),
            init.skipped.len()
        );
    }
}
