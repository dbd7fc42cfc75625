//=========================================================================
// State Sources
//=========================================================================
//
// Normalizes the three registration shapes into a `StateEntry`:
//
//   Instance(Box<dyn State>) ──────────────┐
//   Config(StateConfig)      ── hooks ─────┼─→ link() → StateEntry
//   Factory(FnOnce) ─┬─ Instance ──────────┤
//                    └─ Object(hooks) ─────┘
//
// `link` assigns the key, builds the state's private systems, and asks
// the renderer for an offscreen target under offscreen compositing.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::{State, StateEntry, StateHooks, StateSettings, StateSystems};
use crate::core::systems::{RenderMode, Renderer, SystemsProvider, Viewport};

/// Key used when neither the caller nor the source names one.
pub const DEFAULT_KEY: &str = "default";

//=== StateConfig =========================================================

/// Plain configuration record: settings plus closure hooks.
#[derive(Debug, Default)]
pub struct StateConfig {
    pub settings: StateSettings,
    pub hooks: StateHooks,
}

impl StateConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            settings: StateSettings::new(key),
            hooks: StateHooks::new(),
        }
    }

    /// Start as soon as the state is registered.
    pub fn active(mut self, active: bool) -> Self {
        self.settings.active = active;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.settings.visible = visible;
        self
    }

    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.settings.x = x;
        self.settings.y = y;
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.settings.width = Some(width);
        self.settings.height = Some(height);
        self
    }

    pub fn hooks(mut self, hooks: StateHooks) -> Self {
        self.hooks = hooks;
        self
    }
}

//=== FactoryOutput =======================================================

/// What a factory source produced.
pub enum FactoryOutput {
    /// A full state instance; registered exactly like
    /// [`StateSource::Instance`].
    Instance(Box<dyn State>),

    /// A bare hook object. Settings are synthesized from defaults.
    Object(StateHooks),
}

//=== StateSource =========================================================

/// Input accepted by `StateManager::add`.
pub enum StateSource {
    Instance(Box<dyn State>),
    Config(StateConfig),
    Factory(Box<dyn FnOnce() -> FactoryOutput>),
}

impl StateSource {
    pub fn instance<S: State + 'static>(state: S) -> Self {
        Self::Instance(Box::new(state))
    }

    pub fn config(config: StateConfig) -> Self {
        Self::Config(config)
    }

    pub fn factory<F>(factory: F) -> Self
    where
        F: FnOnce() -> FactoryOutput + 'static,
    {
        Self::Factory(Box::new(factory))
    }

    /// Key carried by the source itself. Factories are opaque until
    /// invoked, so they never carry one.
    pub fn embedded_key(&self) -> Option<String> {
        let key = match self {
            Self::Instance(state) => state.settings().key,
            Self::Config(config) => config.settings.key.clone(),
            Self::Factory(_) => return None,
        };

        (!key.is_empty()).then_some(key)
    }
}

impl std::fmt::Debug for StateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance"),
            Self::Config(config) => f.debug_tuple("Config").field(&config.settings.key).finish(),
            Self::Factory(_) => f.write_str("Factory"),
        }
    }
}

//=== Key Resolution ======================================================

/// Effective registry key: explicit non-empty key, else the source's
/// embedded key, else [`DEFAULT_KEY`].
pub(crate) fn resolve_key(explicit: Option<&str>, source: &StateSource) -> String {
    match explicit {
        Some(key) if !key.is_empty() => key.to_owned(),
        _ => source
            .embedded_key()
            .unwrap_or_else(|| DEFAULT_KEY.to_owned()),
    }
}

//=== Adapter =============================================================

/// Adapter output. `wants_start` carries the source's own `active`
/// request; the entry itself always begins inactive.
pub(crate) struct Adapted {
    pub entry: StateEntry,
    pub wants_start: bool,
}

/// Host pieces the adapter links a new state against.
pub(crate) struct HostLink<'a> {
    pub viewport: Viewport,
    pub renderer: &'a mut dyn Renderer,
    pub provider: &'a mut dyn SystemsProvider,
}

/// Normalizes `source` into an entry registered as `key` at `index`.
///
/// The key must already have been checked for uniqueness.
pub(crate) fn adapt(
    source: StateSource,
    key: &str,
    index: usize,
    host: HostLink<'_>,
) -> Adapted {
    match source {
        StateSource::Instance(state) => from_instance(state, key, index, host),
        StateSource::Config(StateConfig { settings, hooks }) => {
            link(Box::new(hooks), settings, key, index, host)
        }
        StateSource::Factory(factory) => match factory() {
            FactoryOutput::Instance(state) => from_instance(state, key, index, host),
            FactoryOutput::Object(hooks) => {
                link(Box::new(hooks), StateSettings::default(), key, index, host)
            }
        },
    }
}

fn from_instance(state: Box<dyn State>, key: &str, index: usize, host: HostLink<'_>) -> Adapted {
    let settings = state.settings();
    link(state, settings, key, index, host)
}

fn link(
    state: Box<dyn State>,
    mut settings: StateSettings,
    key: &str,
    index: usize,
    host: HostLink<'_>,
) -> Adapted {
    settings.key = key.to_owned();
    let wants_start = std::mem::replace(&mut settings.active, false);

    let target = (host.renderer.mode() == RenderMode::Offscreen).then(|| {
        let width = settings.width.unwrap_or(host.viewport.width);
        let height = settings.height.unwrap_or(host.viewport.height);
        trace!(target: "states", "Allocating {}x{} target for {:?}", width, height, key);
        host.renderer
            .create_offscreen_target(key, settings.x, settings.y, width, height)
    });

    let systems = StateSystems {
        loader: host.provider.create_loader(key),
        main_loop: host.provider.create_main_loop(key),
        target,
    };

    Adapted {
        entry: StateEntry::new(index, state, settings, systems),
        wants_start,
    }
}

//=== Tests ===============================================================
