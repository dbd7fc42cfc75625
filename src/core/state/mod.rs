//=========================================================================
// State System
//=========================================================================
//
// Registers named states, defers registration until boot, drives each
// state through init → preload → (load) → create, and steps active
// states every host frame.
//
// Architecture:
//   StateManager
//     ├─ states:  IndexMap<String, StateEntry>   (registry, insertion order)
//     ├─ pending: PendingQueue                   (pre-boot registrations)
//     ├─ active:  ActiveSet                      (sorted by registration index)
//     └─ loading: key → load cycle               (suspended in preload)
//
// Flow:
//   StateSource → adapt() → StateEntry → start() → [Loader] → create
//               → ActiveSet → step(ts) → MainLoop::step()
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::systems::{AssetRequest, Loader};

//=== Module Declarations =================================================

mod active_set;
mod entry;
mod error;
mod hooks;
mod pending_queue;
mod source;
mod state_manager;

#[cfg(test)]
mod test_support;

//=== Public API ==========================================================

pub use active_set::{ActiveRecord, ActiveSet};
pub use entry::{StateEntry, StateSettings, StateSystems};
pub use error::StateError;
pub use hooks::{Hook, StateHooks};
pub use pending_queue::{PendingQueue, PendingRegistration};
pub use source::{FactoryOutput, StateConfig, StateSource, DEFAULT_KEY};
pub use state_manager::{AddOutcome, StateManager};

//=== State Trait =========================================================

/// Lifecycle hooks of a registered state.
///
/// Every hook has an empty default, so an implementation only overrides
/// what it needs:
///
/// ```rust
/// # use aetheric_states::prelude::*;
/// struct Title;
///
/// impl State for Title {
///     fn create(&mut self, ctx: &mut StateContext<'_>) {
///         log::info!("{} ready", ctx.key());
///     }
/// }
/// ```
///
/// Order on start: `init`, `preload`, then (after any queued loads finish)
/// `load_update` and `create`. Per frame, the state's main-loop driver
/// calls `pre_update`, `update`, `post_update` and `render`.
pub trait State {
    /// Settings the state asks for at registration: embedded key,
    /// visibility, geometry, and whether to start right away.
    fn settings(&self) -> StateSettings {
        StateSettings::default()
    }

    fn init(&mut self, _ctx: &mut StateContext<'_>) {}

    /// Queue resources here via [`StateContext::load`]. Queuing anything
    /// suspends the start until the loader completes. Not called for
    /// states without a loader.
    fn preload(&mut self, _ctx: &mut StateContext<'_>) {}

    /// Called once when a suspended load completes, right before `create`.
    #[deprecated(note = "incremental load progress is not reported; use `create`")]
    fn load_update(&mut self, _ctx: &mut StateContext<'_>) {}

    fn create(&mut self, _ctx: &mut StateContext<'_>) {}

    fn shutdown(&mut self, _ctx: &mut StateContext<'_>) {}

    fn pre_update(&mut self, _ctx: &mut StateContext<'_>) {}

    fn update(&mut self, _ctx: &mut StateContext<'_>) {}

    fn post_update(&mut self, _ctx: &mut StateContext<'_>) {}

    fn render(&mut self, _ctx: &mut StateContext<'_>) {}
}

//=== StateContext ========================================================

/// What a hook sees of its own state.
pub struct StateContext<'a> {
    settings: &'a mut StateSettings,
    loader: Option<&'a mut (dyn Loader + 'static)>,

    /// Timestamp of the current frame in milliseconds. Zero outside frames.
    pub time: f64,

    /// Milliseconds since the previous frame of this state.
    pub delta: f64,
}

impl<'a> StateContext<'a> {
    pub fn new(
        settings: &'a mut StateSettings,
        loader: Option<&'a mut (dyn Loader + 'static)>,
    ) -> Self {
        Self {
            settings,
            loader,
            time: 0.0,
            delta: 0.0,
        }
    }

    pub fn key(&self) -> &str {
        &self.settings.key
    }

    pub fn settings(&self) -> &StateSettings {
        self.settings
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.settings.visible = visible;
    }

    /// The state's loader, if its systems include one.
    pub fn loader(&mut self) -> Option<&mut (dyn Loader + 'static)> {
        self.loader.as_deref_mut()
    }

    /// Queues a resource on the state's loader.
    ///
    /// Returns `false` when the state has no loader.
    pub fn load(&mut self, key: impl Into<String>, path: impl Into<std::path::PathBuf>) -> bool {
        match self.loader.as_deref_mut() {
            Some(loader) => {
                loader.enqueue(AssetRequest::new(key, path));
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for StateContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateContext")
            .field("key", &self.settings.key)
            .field("has_loader", &self.loader.is_some())
            .field("time", &self.time)
            .field("delta", &self.delta)
            .finish()
    }
}
