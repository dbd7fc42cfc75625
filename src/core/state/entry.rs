//=========================================================================
// State Entry
//=========================================================================
//
// Canonical form of a registered state: key, registration index, active
// flag, normalized hooks, settings, and the state's private systems.
//
// The active flag and `settings.active` move together and only the state
// manager flips them.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{State, StateContext};
use crate::core::systems::{LoadCompletion, Loader, MainLoop, RenderTarget};

//=== StateSettings =======================================================

/// Per-state configuration bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSettings {
    /// Registry key. Empty until registration assigns one.
    pub key: String,

    /// Mirrors the entry's active flag once registered. Before that, `true`
    /// asks for the state to start as soon as it is registered.
    pub active: bool,

    pub visible: bool,
    pub x: i32,
    pub y: i32,

    /// Offscreen target size. `None` falls back to the host viewport.
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl StateSettings {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            key: String::new(),
            active: false,
            visible: true,
            x: 0,
            y: 0,
            width: None,
            height: None,
        }
    }
}

//=== StateSystems ========================================================

/// Subsystems owned by one state and never shared with another.
pub struct StateSystems {
    pub loader: Option<Box<dyn Loader>>,
    pub main_loop: Box<dyn MainLoop>,

    /// Offscreen target, allocated only under offscreen compositing.
    pub target: Option<RenderTarget>,
}

impl std::fmt::Debug for StateSystems {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateSystems")
            .field("has_loader", &self.loader.is_some())
            .field("running", &self.main_loop.is_running())
            .field("target", &self.target)
            .finish()
    }
}

//=== StateEntry ==========================================================

/// A registered state.
pub struct StateEntry {
    key: String,
    index: usize,
    active: bool,
    state: Box<dyn State>,
    settings: StateSettings,
    systems: StateSystems,
}

impl StateEntry {
    pub(crate) fn new(
        index: usize,
        state: Box<dyn State>,
        settings: StateSettings,
        systems: StateSystems,
    ) -> Self {
        Self {
            key: settings.key.clone(),
            index,
            active: settings.active,
            state,
            settings,
            systems,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Position at which the state was registered. Never changes.
    pub fn index(&self) -> usize {
        self.index
    }

    /// True from `start` until `pause`, including while loading.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn settings(&self) -> &StateSettings {
        &self.settings
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.settings.visible = visible;
    }

    pub fn systems(&self) -> &StateSystems {
        &self.systems
    }

    pub fn target(&self) -> Option<&RenderTarget> {
        self.systems.target.as_ref()
    }

    //--- Lifecycle (manager only) -----------------------------------------

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
        self.settings.active = active;
    }

    pub(crate) fn init(&mut self) {
        let mut ctx = StateContext::new(&mut self.settings, self.systems.loader.as_deref_mut());
        self.state.init(&mut ctx);
    }

    /// Resets the loader, runs `preload`, and reports how many requests it
    /// queued. A state without a loader skips `preload` and reports 0.
    pub(crate) fn preload(&mut self) -> usize {
        let Some(loader) = self.systems.loader.as_deref_mut() else {
            return 0;
        };
        loader.reset();

        let mut ctx = StateContext::new(&mut self.settings, Some(&mut *loader));
        self.state.preload(&mut ctx);

        loader.queue_size()
    }

    /// Tells the loader an in-flight load was abandoned.
    pub(crate) fn cancel_load(&mut self) {
        if let Some(loader) = self.systems.loader.as_deref_mut() {
            loader.cancel();
        }
    }

    pub(crate) fn begin_load(&mut self, completion: LoadCompletion) {
        if let Some(loader) = self.systems.loader.as_deref_mut() {
            loader.start(completion);
        }
    }

    #[allow(deprecated)]
    pub(crate) fn load_update(&mut self) {
        let mut ctx = StateContext::new(&mut self.settings, self.systems.loader.as_deref_mut());
        self.state.load_update(&mut ctx);
    }

    pub(crate) fn create(&mut self) {
        let mut ctx = StateContext::new(&mut self.settings, self.systems.loader.as_deref_mut());
        self.state.create(&mut ctx);
    }

    pub(crate) fn shutdown(&mut self) {
        let mut ctx = StateContext::new(&mut self.settings, self.systems.loader.as_deref_mut());
        self.state.shutdown(&mut ctx);
    }

    pub(crate) fn start_main_loop(&mut self) {
        self.systems.main_loop.set_running(true);
        self.systems.main_loop.start();
    }

    /// Forwards `timestamp` to the driver if it is running.
    ///
    /// Returns whether the driver was stepped.
    pub(crate) fn step(&mut self, timestamp: f64) -> bool {
        let StateSystems {
            loader, main_loop, ..
        } = &mut self.systems;

        if !main_loop.is_running() {
            return false;
        }

        let mut ctx = StateContext::new(&mut self.settings, loader.as_deref_mut());
        main_loop.step(timestamp, &mut *self.state, &mut ctx);
        true
    }
}

impl std::fmt::Debug for StateEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateEntry")
            .field("key", &self.key)
            .field("index", &self.index)
            .field("active", &self.active)
            .field("settings", &self.settings)
            .field("systems", &self.systems)
            .finish_non_exhaustive()
    }
}
