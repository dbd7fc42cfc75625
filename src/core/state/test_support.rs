//=========================================================================
// Test Support
//=========================================================================
//
// Recording collaborators shared by the state system tests. Every mock
// appends "<key>:<event>" lines to a shared log.
//
//=========================================================================

use std::cell::RefCell;
use std::rc::Rc;

use super::{State, StateContext, StateEntry, StateManager, StateSettings};
use crate::core::systems::{
    AssetRequest, LoadCompletion, Loader, MainLoop, RenderMode, RenderTarget, Renderer,
    SystemsProvider, Viewport,
};

pub(crate) type Log = Rc<RefCell<Vec<String>>>;
pub(crate) type Completions = Rc<RefCell<Vec<LoadCompletion>>>;

//=== MockRenderer ========================================================

pub(crate) struct MockRenderer {
    mode: RenderMode,
    log: Log,
    next_target: u64,
}

impl MockRenderer {
    pub fn new(mode: RenderMode) -> Self {
        Self::with_log(mode, Log::default())
    }

    pub fn with_log(mode: RenderMode, log: Log) -> Self {
        Self {
            mode,
            log,
            next_target: 0,
        }
    }

    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl Renderer for MockRenderer {
    fn mode(&self) -> RenderMode {
        self.mode
    }

    fn create_offscreen_target(
        &mut self,
        key: &str,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> RenderTarget {
        self.log
            .borrow_mut()
            .push(format!("target:{}:{}x{}", key, width, height));
        self.next_target += 1;
        RenderTarget {
            id: self.next_target,
            x,
            y,
            width,
            height,
        }
    }

    fn render_to_screen(&mut self, state: &StateEntry) {
        self.log.borrow_mut().push(format!("render:{}", state.key()));
    }
}

//=== MockLoader ==========================================================

/// Parks each completion in `completions` so the test decides when (and
/// whether) the load finishes.
pub(crate) struct MockLoader {
    key: String,
    queue: Vec<AssetRequest>,
    log: Log,
    completions: Completions,
}

impl Loader for MockLoader {
    fn reset(&mut self) {
        self.log.borrow_mut().push(format!("{}:reset", self.key));
        self.queue.clear();
    }

    fn enqueue(&mut self, request: AssetRequest) {
        self.queue.push(request);
    }

    fn queue_size(&self) -> usize {
        self.queue.len()
    }

    fn start(&mut self, completion: LoadCompletion) {
        self.log.borrow_mut().push(format!("{}:load_start", self.key));
        self.queue.clear();
        self.completions.borrow_mut().push(completion);
    }

    fn cancel(&mut self) {
        self.log.borrow_mut().push(format!("{}:cancel", self.key));
    }
}

//=== MockMainLoop ========================================================

/// A `stalled` driver never reports running.
pub(crate) struct MockMainLoop {
    key: String,
    log: Log,
    running: bool,
    stalled: bool,
}

impl MainLoop for MockMainLoop {
    fn start(&mut self) {
        self.log.borrow_mut().push(format!("{}:loop_start", self.key));
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_running(&mut self, running: bool) {
        self.running = running && !self.stalled;
    }

    fn step(&mut self, timestamp: f64, state: &mut dyn State, context: &mut StateContext<'_>) {
        self.log
            .borrow_mut()
            .push(format!("{}:step:{}", self.key, timestamp));
        context.time = timestamp;
        state.update(context);
    }
}

//=== MockSystems =========================================================

pub(crate) struct MockSystems {
    log: Log,
    completions: Completions,
    created: Vec<String>,
    without_loader: Vec<String>,
    stalled: Vec<String>,
}

impl MockSystems {
    pub fn new() -> Self {
        Self::shared(Log::default(), Completions::default())
    }

    pub fn shared(log: Log, completions: Completions) -> Self {
        Self {
            log,
            completions,
            created: Vec::new(),
            without_loader: Vec::new(),
            stalled: Vec::new(),
        }
    }

    /// States registered under `key` get no loader.
    pub fn without_loader(mut self, key: &str) -> Self {
        self.without_loader.push(key.to_owned());
        self
    }

    /// States registered under `key` get a driver that never runs.
    pub fn stalled(mut self, key: &str) -> Self {
        self.stalled.push(key.to_owned());
        self
    }

    /// Keys systems were built for, in order.
    pub fn created(&self) -> Vec<String> {
        self.created.clone()
    }
}

impl SystemsProvider for MockSystems {
    fn create_loader(&mut self, key: &str) -> Option<Box<dyn Loader>> {
        if self.without_loader.iter().any(|k| k == key) {
            return None;
        }

        Some(Box::new(MockLoader {
            key: key.to_owned(),
            queue: Vec::new(),
            log: self.log.clone(),
            completions: self.completions.clone(),
        }))
    }

    fn create_main_loop(&mut self, key: &str) -> Box<dyn MainLoop> {
        self.created.push(key.to_owned());
        Box::new(MockMainLoop {
            key: key.to_owned(),
            log: self.log.clone(),
            running: false,
            stalled: self.stalled.iter().any(|k| k == key),
        })
    }
}

//=== Probe ===============================================================

/// State instance that logs every hook it receives.
pub(crate) struct Probe {
    settings: StateSettings,
    assets: Vec<(&'static str, &'static str)>,
    log: Log,
}

impl Probe {
    pub fn new(key: &str) -> Self {
        Self {
            settings: StateSettings::new(key),
            assets: Vec::new(),
            log: Log::default(),
        }
    }

    pub fn with_log(mut self, log: Log) -> Self {
        self.log = log;
        self
    }

    pub fn with_settings(mut self, configure: impl FnOnce(&mut StateSettings)) -> Self {
        configure(&mut self.settings);
        self
    }

    /// Queue `path` under `key` during preload.
    pub fn preloading(mut self, key: &'static str, path: &'static str) -> Self {
        self.assets.push((key, path));
        self
    }

    fn record(&self, ctx: &StateContext<'_>, hook: &str) {
        self.log.borrow_mut().push(format!("{}:{}", ctx.key(), hook));
    }
}

impl State for Probe {
    fn settings(&self) -> StateSettings {
        self.settings.clone()
    }

    fn init(&mut self, ctx: &mut StateContext<'_>) {
        self.record(ctx, "init");
    }

    fn preload(&mut self, ctx: &mut StateContext<'_>) {
        self.record(ctx, "preload");
        for (key, path) in &self.assets {
            ctx.load(*key, *path);
        }
    }

    fn load_update(&mut self, ctx: &mut StateContext<'_>) {
        self.record(ctx, "load_update");
    }

    fn create(&mut self, ctx: &mut StateContext<'_>) {
        self.record(ctx, "create");
    }

    fn shutdown(&mut self, ctx: &mut StateContext<'_>) {
        self.record(ctx, "shutdown");
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        self.record(ctx, "update");
    }
}

//=== Harness =============================================================

/// A manager wired to recording mocks.
pub(crate) struct Harness {
    pub manager: StateManager,
    pub log: Log,
    pub completions: Completions,
}

impl Harness {
    /// Manager still in the pre-boot phase.
    pub fn new() -> Self {
        Self::with_systems(|systems| systems)
    }

    pub fn with_systems(configure: impl FnOnce(MockSystems) -> MockSystems) -> Self {
        let log = Log::default();
        let completions = Completions::default();
        let systems = configure(MockSystems::shared(log.clone(), completions.clone()));

        Self {
            manager: StateManager::new(Viewport::new(800, 600), Box::new(systems)),
            log,
            completions,
        }
    }

    pub fn booted() -> Self {
        let mut harness = Self::new();
        harness.boot();
        harness
    }

    pub fn boot(&mut self) {
        let renderer = MockRenderer::with_log(RenderMode::Direct, self.log.clone());
        let rejected = self.manager.boot(Box::new(renderer));
        assert!(rejected.is_empty(), "unexpected rejections: {:?}", rejected);
    }

    pub fn probe(&self, key: &str) -> Probe {
        Probe::new(key).with_log(self.log.clone())
    }

    pub fn logged(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// Log lines ending in `:<event>`.
    pub fn events(&self, event: &str) -> Vec<String> {
        let suffix = format!(":{}", event);
        self.log
            .borrow()
            .iter()
            .filter(|line| line.ends_with(&suffix))
            .cloned()
            .collect()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    /// Fires every parked completion and lets the manager pick them up.
    pub fn finish_loads(&mut self) {
        let parked: Vec<_> = self.completions.borrow_mut().drain(..).collect();
        for completion in parked {
            completion.complete();
        }
        self.manager.poll_loads();
    }
}
