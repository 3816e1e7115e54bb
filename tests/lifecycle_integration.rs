//! Lifecycle integration tests: init ordering, frame gating and teardown order.

use std::cell::RefCell;
use std::rc::Rc;

use bevy_ecs::prelude::Resource;

use modulekit::context::ModuleContext;
use modulekit::error::ModuleError;
use modulekit::manager::ModuleManager;
use modulekit::module::{Dependencies, EngineModule, ModuleState};
use modulekit::resources::calllog::{CallLog, Hook};
use modulekit::resources::managerconfig::ManagerConfig;
use modulekit::scripted::ScriptedModule;

type Calls = Rc<RefCell<Vec<String>>>;

/// Records every hook call as "Name.hook" into a shared list.
struct Recorder {
    name: &'static str,
    deps: Vec<&'static str>,
    fail_init: bool,
    calls: Calls,
}

impl Recorder {
    fn new(name: &'static str, deps: &[&'static str], calls: &Calls) -> Self {
        Recorder {
            name,
            deps: deps.to_vec(),
            fail_init: false,
            calls: Rc::clone(calls),
        }
    }

    fn failing(mut self) -> Self {
        self.fail_init = true;
        self
    }

    fn log(&self, hook: &str) {
        self.calls.borrow_mut().push(format!("{}.{}", self.name, hook));
    }
}

impl EngineModule for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn dependencies(&self) -> Dependencies {
        self.deps.iter().map(|d| d.to_string()).collect()
    }

    fn init(&mut self, _ctx: &mut ModuleContext) -> Result<(), ModuleError> {
        self.log("init");
        if self.fail_init {
            return Err(ModuleError::init_failed("recorder failure"));
        }
        Ok(())
    }

    fn update(&mut self, _ctx: &mut ModuleContext, _delta_time: f32) {
        self.log("update");
    }

    fn render(&mut self, _ctx: &mut ModuleContext) {
        self.log("render");
    }

    fn shutdown(&mut self, _ctx: &mut ModuleContext) {
        self.log("shutdown");
    }
}

fn calls_for(calls: &Calls, hook: &str) -> Vec<String> {
    let suffix = format!(".{}", hook);
    calls
        .borrow()
        .iter()
        .filter_map(|c| c.strip_suffix(&suffix).map(str::to_string))
        .collect()
}

fn physics_render_ui(calls: &Calls) -> ModuleManager {
    let mut manager = ModuleManager::new();
    manager.register_module("Physics", Recorder::new("Physics", &[], calls));
    manager.register_module("Render", Recorder::new("Render", &["Physics"], calls));
    manager.register_module("UI", Recorder::new("UI", &["Render"], calls));
    manager
}

#[test]
fn physics_render_ui_full_session() {
    let calls: Calls = Rc::default();
    let mut manager = physics_render_ui(&calls);

    assert_eq!(
        manager.dependency_order().order,
        vec!["Physics", "Render", "UI"]
    );

    let summary = manager.initialize_all_modules();
    assert_eq!(summary.initialized, vec!["Physics", "Render", "UI"]);
    assert_eq!(calls_for(&calls, "init"), vec!["Physics", "Render", "UI"]);

    manager.update_all_modules(0.016);
    assert_eq!(calls_for(&calls, "update"), vec!["Physics", "Render", "UI"]);

    manager.render_all_modules();
    assert_eq!(calls_for(&calls, "render"), vec!["Physics", "Render", "UI"]);

    manager.shutdown_all_modules();
    assert_eq!(calls_for(&calls, "shutdown"), vec!["UI", "Render", "Physics"]);
}

#[test]
fn init_follows_dependencies_but_frames_follow_registration() {
    let calls: Calls = Rc::default();
    let mut manager = ModuleManager::new();
    manager.register_module("UI", Recorder::new("UI", &["Render"], &calls));
    manager.register_module("Render", Recorder::new("Render", &["Physics"], &calls));
    manager.register_module("Physics", Recorder::new("Physics", &[], &calls));

    manager.initialize_all_modules();
    manager.update_all_modules(0.016);
    manager.render_all_modules();
    manager.shutdown_all_modules();

    assert_eq!(calls_for(&calls, "init"), vec!["Physics", "Render", "UI"]);
    assert_eq!(calls_for(&calls, "update"), vec!["UI", "Render", "Physics"]);
    assert_eq!(calls_for(&calls, "render"), vec!["UI", "Render", "Physics"]);
    assert_eq!(calls_for(&calls, "shutdown"), vec!["Physics", "Render", "UI"]);
}

#[test]
fn update_comes_before_render_within_a_frame() {
    let calls: Calls = Rc::default();
    let mut manager = ModuleManager::new();
    manager.register_module("A", Recorder::new("A", &[], &calls));
    manager.register_module("B", Recorder::new("B", &[], &calls));
    manager.initialize_all_modules();
    calls.borrow_mut().clear();

    manager.update_all_modules(0.016);
    manager.render_all_modules();

    assert_eq!(
        *calls.borrow(),
        vec!["A.update", "B.update", "A.render", "B.render"]
    );
}

#[test]
fn shutdown_runs_in_reverse_registration_order() {
    let calls: Calls = Rc::default();
    let mut manager = ModuleManager::new();
    for name in ["A", "B", "C"] {
        manager.register_module(name, Recorder::new(name, &[], &calls));
    }
    manager.initialize_all_modules();
    manager.shutdown_all_modules();
    assert_eq!(calls_for(&calls, "shutdown"), vec!["C", "B", "A"]);
}

#[test]
fn failed_module_never_gets_frame_or_shutdown_calls() {
    let calls: Calls = Rc::default();
    let mut manager = ModuleManager::new();
    manager.register_module("Map", Recorder::new("Map", &[], &calls).failing());
    manager.register_module("Player", Recorder::new("Player", &["Map"], &calls));
    manager.register_module("Menu", Recorder::new("Menu", &[], &calls));

    let summary = manager.initialize_all_modules();
    assert_eq!(summary.failed, vec!["Map"]);
    assert_eq!(summary.initialized, vec!["Player", "Menu"]);

    for _ in 0..3 {
        manager.update_all_modules(0.016);
        manager.render_all_modules();
    }
    manager.shutdown_all_modules();

    assert!(!calls_for(&calls, "update").contains(&"Map".to_string()));
    assert!(!calls_for(&calls, "render").contains(&"Map".to_string()));
    assert_eq!(calls_for(&calls, "shutdown"), vec!["Menu", "Player"]);
    assert_eq!(manager.module_state("Map"), Some(ModuleState::Failed));
}

#[test]
fn duplicate_registration_leaves_one_live_entry() {
    let calls: Calls = Rc::default();
    let mut manager = ModuleManager::new();
    manager.register_module("UI", Recorder::new("OldUI", &[], &calls));
    manager.register_module("Input", Recorder::new("Input", &[], &calls));
    manager.register_module("UI", Recorder::new("NewUI", &[], &calls));

    assert_eq!(manager.get_module("UI").map(|m| m.name()), Some("NewUI"));
    assert_eq!(manager.get_loaded_modules(), vec!["UI", "Input"]);

    manager.initialize_all_modules();
    manager.update_all_modules(0.016);
    assert_eq!(calls_for(&calls, "update"), vec!["NewUI", "Input"]);
    assert!(calls_for(&calls, "init").iter().all(|n| n != "OldUI"));
}

#[test]
fn lookups_report_absence_without_panicking() {
    let manager = ModuleManager::new();
    assert!(manager.get_module("Console").is_none());
    assert!(!manager.is_module_loaded("Console"));
    assert!(manager.get_loaded_modules().is_empty());
    assert!(matches!(
        manager.try_get_module("Console"),
        Err(ModuleError::ModuleNotFound(name)) if name == "Console"
    ));
}

#[test]
fn cyclic_modules_still_initialize_once_each() {
    let calls: Calls = Rc::default();
    let mut manager = ModuleManager::new();
    manager.register_module("A", Recorder::new("A", &["B"], &calls));
    manager.register_module("B", Recorder::new("B", &["A"], &calls));

    let summary = manager.initialize_all_modules();
    assert_eq!(calls_for(&calls, "init"), vec!["B", "A"]);
    assert_eq!(summary.diagnostics.len(), 1);
    assert!(summary.diagnostics[0].contains("circular dependency"));
}

#[test]
fn second_shutdown_is_a_noop() {
    let calls: Calls = Rc::default();
    let mut manager = physics_render_ui(&calls);
    manager.initialize_all_modules();
    manager.shutdown_all_modules();
    manager.shutdown_all_modules();
    assert_eq!(calls_for(&calls, "shutdown").len(), 3);
}

#[test]
fn dropping_an_initialized_manager_shuts_modules_down() {
    let calls: Calls = Rc::default();
    {
        let mut manager = physics_render_ui(&calls);
        manager.initialize_all_modules();
    }
    assert_eq!(calls_for(&calls, "shutdown"), vec!["UI", "Render", "Physics"]);
}

#[test]
fn late_registration_is_not_driven() {
    let calls: Calls = Rc::default();
    let mut manager = ModuleManager::new();
    manager.register_module("Early", Recorder::new("Early", &[], &calls));
    manager.initialize_all_modules();
    manager.register_module("Late", Recorder::new("Late", &[], &calls));

    manager.update_all_modules(0.016);
    assert_eq!(calls_for(&calls, "update"), vec!["Early"]);
    assert_eq!(manager.module_state("Late"), Some(ModuleState::Registered));
}

#[test]
fn replacing_an_initialized_module_shuts_the_old_one_down() {
    let calls: Calls = Rc::default();
    let mut manager = ModuleManager::new();
    manager.register_module("UI", Recorder::new("OldUI", &[], &calls));
    manager.initialize_all_modules();

    manager.register_module("UI", Recorder::new("NewUI", &[], &calls));
    assert_eq!(calls_for(&calls, "shutdown"), vec!["OldUI"]);
    assert_eq!(manager.module_state("UI"), Some(ModuleState::Registered));

    manager.shutdown_all_modules();
    assert_eq!(calls_for(&calls, "shutdown"), vec!["OldUI"]);
    assert!(calls_for(&calls, "init").iter().all(|n| n != "NewUI"));
}

#[test]
fn replacing_before_init_does_not_shut_down() {
    let calls: Calls = Rc::default();
    let mut manager = ModuleManager::new();
    manager.register_module("UI", Recorder::new("OldUI", &[], &calls));
    manager.register_module("UI", Recorder::new("NewUI", &[], &calls));
    assert!(calls.borrow().is_empty());
}

#[derive(Resource)]
struct PhysicsWorld {
    gravity: f32,
}

/// Publishes a service for dependents.
struct PhysicsModule;

impl EngineModule for PhysicsModule {
    fn name(&self) -> &str {
        "Physics"
    }

    fn init(&mut self, _ctx: &mut ModuleContext) -> Result<(), ModuleError> {
        Ok(())
    }

    fn register_services(&mut self, ctx: &mut ModuleContext) {
        ctx.insert_service(PhysicsWorld { gravity: -9.8 });
    }
}

/// Requires the physics service at init.
#[derive(Default)]
struct PlayerModule {
    gravity: Option<f32>,
}

impl EngineModule for PlayerModule {
    fn name(&self) -> &str {
        "Player"
    }

    fn dependencies(&self) -> Dependencies {
        ["Physics".to_string()].into_iter().collect()
    }

    fn init(&mut self, ctx: &mut ModuleContext) -> Result<(), ModuleError> {
        let world = ctx
            .service::<PhysicsWorld>()
            .ok_or_else(|| ModuleError::init_failed("physics service unavailable"))?;
        self.gravity = Some(world.gravity);
        Ok(())
    }
}

#[test]
fn dependents_see_services_registered_by_dependencies() {
    let mut manager = ModuleManager::new();
    manager.register_module("Player", PlayerModule::default());
    manager.register_module("Physics", PhysicsModule);

    let summary = manager.initialize_all_modules();
    assert_eq!(summary.initialized, vec!["Physics", "Player"]);
    let player = manager.get_module_as::<PlayerModule>("Player").unwrap();
    assert_eq!(player.gravity, Some(-9.8));
}

#[test]
fn dependent_detects_its_own_missing_precondition() {
    let mut manager = ModuleManager::new();
    manager.register_module("Player", PlayerModule::default());

    let summary = manager.initialize_all_modules();
    assert_eq!(summary.failed, vec!["Player"]);
    assert!(!manager.is_module_initialized("Player"));
}

#[test]
fn scripted_modules_from_config_run_a_session() {
    let mut config = ManagerConfig::new();
    config
        .load_from_str(
            "[session]\nframes = 2\n\
             [module.Physics]\ndependencies =\n\
             [module.Render]\ndependencies = Physics\n\
             [module.Console]\ndependencies = Render\nfail_init = true\n",
        )
        .unwrap();

    let mut manager = ModuleManager::with_config(&config);
    for spec in &config.modules {
        manager.register_module(spec.name.clone(), ScriptedModule::from_spec(spec));
    }
    manager.initialize_all_modules();
    for _ in 0..config.frames {
        manager.update_all_modules(config.delta);
        manager.render_all_modules();
    }
    manager.shutdown_all_modules();

    let log = manager.context().service::<CallLog>().unwrap();
    assert_eq!(log.modules_for(Hook::Init), vec!["Physics", "Render"]);
    assert_eq!(
        log.modules_for(Hook::Update),
        vec!["Physics", "Render", "Physics", "Render"]
    );
    assert_eq!(
        log.modules_for(Hook::Render),
        vec!["Physics", "Render", "Physics", "Render"]
    );
    assert_eq!(log.modules_for(Hook::Shutdown), vec!["Render", "Physics"]);

    let render = manager.get_module_as::<ScriptedModule>("Render").unwrap();
    assert_eq!(render.updates, 2);
    assert_eq!(render.renders, 2);
    assert_eq!(manager.module_state("Console"), Some(ModuleState::Failed));
}
