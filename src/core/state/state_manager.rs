//=========================================================================
// State Manager
//=========================================================================
//
// Registry, boot deferral, activation, and frame stepping for states.
//
// Lifecycle of one state:
//
//   add ──(pre-boot)──> PendingQueue ──boot()──┐
//    │                                          v
//    └──────────────(booted)──────────────> Registered
//                                               │ start()
//                                               v
//                               init → preload ─┬─ nothing queued ──┐
//                                               └─ queued → Loading │
//                                                   │ completion     │
//                                                   v                v
//                                            load_update → create → Active
//                                                                   │ ^
//                                                           pause() v │ start()
//                                                                 Paused
//
// States without a loader skip `preload` and go straight to `create`.
//
// All mutation happens synchronously inside `add`, `start`, `pause`,
// `load_complete` and `boot`. Loader completions arrive over a channel and
// are applied by `poll_loads`, which `step` runs first every frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use crossbeam_channel::{unbounded, Receiver, Sender};
use indexmap::IndexMap;
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::source::{adapt, resolve_key, Adapted, HostLink};
use super::{ActiveSet, PendingQueue, StateEntry, StateError, StateSource};
use crate::core::systems::{LoadCompletion, LoadTicket, Renderer, SystemsProvider, Viewport};

//=== AddOutcome ==========================================================

/// Result of a successful [`StateManager::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Registered immediately at this registration index.
    Added { index: usize },

    /// Buffered until boot at this queue position.
    Deferred { position: usize },
}

//=== StateManager ========================================================

/// Owns every registered state and drives their lifecycle.
///
/// The manager is in its pre-boot phase until [`StateManager::boot`]
/// hands it a renderer. Before that, `add` and `start` only record
/// intent.
///
/// ```rust
/// # use aetheric_states::prelude::*;
/// let mut states = StateManager::new(Viewport::default(), Box::new(DefaultSystems::default()));
///
/// states.add(Some("title"), StateSource::config(StateConfig::new("title")), true).unwrap();
/// assert!(!states.is_active("title"));
///
/// states.boot(Box::new(NullRenderer::default()));
/// assert!(states.is_active("title"));
///
/// states.step(16.0);
/// ```
pub struct StateManager {
    viewport: Viewport,
    provider: Box<dyn SystemsProvider>,
    renderer: Option<Box<dyn Renderer>>,
    states: IndexMap<String, StateEntry>,
    pending: PendingQueue,
    active: ActiveSet,
    loading: HashMap<String, u64>,
    next_cycle: u64,
    completion_tx: Sender<LoadTicket>,
    completion_rx: Receiver<LoadTicket>,
}

impl StateManager {
    //--- Construction -----------------------------------------------------

    /// Creates an empty manager in the pre-boot phase.
    ///
    /// `viewport` is the fallback size for offscreen targets; `provider`
    /// builds each state's loader and main-loop driver.
    pub fn new(viewport: Viewport, provider: Box<dyn SystemsProvider>) -> Self {
        let (completion_tx, completion_rx) = unbounded();

        Self {
            viewport,
            provider,
            renderer: None,
            states: IndexMap::new(),
            pending: PendingQueue::new(),
            active: ActiveSet::new(),
            loading: HashMap::new(),
            next_cycle: 0,
            completion_tx,
            completion_rx,
        }
    }

    //--- Boot -------------------------------------------------------------

    pub fn is_booted(&self) -> bool {
        self.renderer.is_some()
    }

    /// Ends the pre-boot phase and replays buffered registrations in order.
    ///
    /// Registrations rejected during the replay (duplicate keys) are
    /// logged and returned; the rest of the queue still goes through.
    /// Booting twice is ignored.
    pub fn boot(&mut self, renderer: Box<dyn Renderer>) -> Vec<StateError> {
        if self.is_booted() {
            warn!(target: "states", "State manager already booted, ignoring");
            return Vec::new();
        }

        info!(
            target: "states",
            "Booting state manager ({} pending registrations)",
            self.pending.len()
        );
        self.renderer = Some(renderer);

        let mut rejected = Vec::new();
        for pending in self.pending.take() {
            if let Err(err) = self.add(pending.key.as_deref(), pending.source, pending.auto_start) {
                warn!(target: "states", "Dropping pending registration #{}: {}", pending.index, err);
                rejected.push(err);
            }
        }

        rejected
    }

    //--- Registration -----------------------------------------------------

    /// Registers a state.
    ///
    /// The key is `key` if non-empty, else the key embedded in `source`,
    /// else `"default"`. The state starts right away when `auto_start` is
    /// set or its own settings ask to be active.
    ///
    /// Before boot the request is only buffered and cannot fail.
    ///
    /// # Errors
    ///
    /// [`StateError::DuplicateKey`] if the key is taken. The registry is
    /// left untouched and `source` is never invoked.
    pub fn add(
        &mut self,
        key: Option<&str>,
        source: StateSource,
        auto_start: bool,
    ) -> Result<AddOutcome, StateError> {
        let Some(renderer) = self.renderer.as_deref_mut() else {
            let position = self.pending.push(key.map(str::to_owned), source, auto_start);
            debug!(target: "states", "Deferred registration #{} ({:?}) until boot", position, key);
            return Ok(AddOutcome::Deferred { position });
        };

        let key = resolve_key(key, &source);
        if self.states.contains_key(&key) {
            return Err(StateError::DuplicateKey { key });
        }

        let index = self.states.len();
        let host = HostLink {
            viewport: self.viewport,
            renderer,
            provider: &mut *self.provider,
        };
        let Adapted { entry, wants_start } = adapt(source, &key, index, host);

        self.states.insert(key.clone(), entry);
        debug!(target: "states", "Registered state {:?} at index {}", key, index);

        if auto_start || wants_start {
            self.start(&key);
        }

        Ok(AddOutcome::Added { index })
    }

    /// Registers an initial list of states; only the first auto-starts.
    ///
    /// Sources carry their own keys. Returns the registrations rejected
    /// immediately (only possible after boot).
    pub fn queue_initial(&mut self, sources: Vec<StateSource>) -> Vec<StateError> {
        sources
            .into_iter()
            .enumerate()
            .filter_map(|(i, source)| self.add(None, source, i == 0).err())
            .collect()
    }

    //--- Activation -------------------------------------------------------

    /// Starts the state registered under `key`.
    ///
    /// Runs `init`, then `preload` if the state has a loader. If nothing was
    /// queued the state is created and active before this returns;
    /// otherwise it stays loading until its loader reports completion.
    ///
    /// Before boot this only flags the pending registration for start on
    /// boot. Unknown keys and states already active or loading are ignored.
    pub fn start(&mut self, key: &str) {
        if !self.is_booted() {
            if !self.pending.mark_auto_start(key) {
                debug!(target: "states", "No pending registration {:?} to start on boot", key);
            }
            return;
        }

        if self.active.contains(key) || self.loading.contains_key(key) {
            debug!(target: "states", "State {:?} already started", key);
            return;
        }

        let Some(entry) = self.states.get_mut(key) else {
            debug!(target: "states", "Ignoring start of unknown state {:?}", key);
            return;
        };

        entry.set_active(true);
        entry.init();
        let queued = entry.preload();

        if queued == 0 {
            self.start_create(key);
            return;
        }

        self.next_cycle += 1;
        let cycle = self.next_cycle;
        self.loading.insert(key.to_owned(), cycle);

        debug!(target: "states", "State {:?} loading {} assets (cycle {})", key, queued, cycle);

        let completion = LoadCompletion::new(LoadTicket::new(key, cycle), self.completion_tx.clone());
        entry.begin_load(completion);
    }

    /// Hands a finished load to the create phase.
    ///
    /// `step` does this for completions sent through
    /// [`LoadCompletion::complete`]. Hosts that route completions
    /// themselves pass the result of [`LoadCompletion::into_ticket`].
    ///
    /// Tickets for loads that were cancelled (paused mid-load) or already
    /// handled are ignored.
    pub fn load_complete(&mut self, ticket: LoadTicket) {
        if self.loading.get(ticket.key()) != Some(&ticket.cycle()) {
            debug!(
                target: "states",
                "Ignoring stale load completion for {:?} (cycle {})",
                ticket.key(),
                ticket.cycle()
            );
            return;
        }

        let key = ticket.into_key();
        self.loading.remove(&key);

        if let Some(entry) = self.states.get_mut(&key) {
            entry.load_update();
        }
        self.start_create(&key);
    }

    /// Applies every load completion reported so far.
    ///
    /// Returns the number of completions received.
    pub fn poll_loads(&mut self) -> usize {
        let mut received = 0;
        while let Ok(ticket) = self.completion_rx.try_recv() {
            self.load_complete(ticket);
            received += 1;
        }
        received
    }

    /// Pauses an active state, removing it from the Active set.
    ///
    /// Pausing a loading state cancels the load; its completion will be
    /// ignored and `create` never runs. Anything else is a no-op.
    pub fn pause(&mut self, key: &str) {
        if self.loading.remove(key).is_some() {
            if let Some(entry) = self.states.get_mut(key) {
                entry.cancel_load();
                entry.set_active(false);
            }
            debug!(target: "states", "Cancelled load of state {:?}", key);
            return;
        }

        let Some(entry) = self.states.get_mut(key) else {
            debug!(target: "states", "Ignoring pause of unknown state {:?}", key);
            return;
        };

        if self.active.remove_index(entry.index()).is_some() {
            entry.set_active(false);
            debug!(target: "states", "Paused state {:?}", key);
        }
    }

    fn start_create(&mut self, key: &str) {
        let Some(entry) = self.states.get_mut(key) else {
            return;
        };

        entry.create();
        self.active.insert(entry.index(), key);
        entry.start_main_loop();

        debug!(target: "states", "State {:?} created and active", key);
    }

    //--- Frame ------------------------------------------------------------

    /// Steps every active state whose driver is running, in registration
    /// order. Pending load completions are applied first.
    pub fn step(&mut self, timestamp: f64) {
        self.poll_loads();

        for record in self.active.iter() {
            if let Some(entry) = self.states.get_mut(&record.key) {
                if entry.step(timestamp) {
                    trace!(target: "states", "Stepped {:?} at {}", record.key, timestamp);
                }
            }
        }
    }

    /// Presents every visible active state, in registration order.
    pub fn render(&mut self) {
        let Some(renderer) = self.renderer.as_deref_mut() else {
            return;
        };

        for record in self.active.iter() {
            if let Some(entry) = self.states.get(&record.key) {
                if entry.settings().visible {
                    renderer.render_to_screen(entry);
                }
            }
        }
    }

    /// Host teardown: cancels in-flight loads, then runs `shutdown` on
    /// every active state and pauses it.
    pub fn shutdown(&mut self) {
        let loading: Vec<String> = self.loading.keys().cloned().collect();
        for key in loading {
            self.pause(&key);
        }

        for key in self.active.keys() {
            if let Some(entry) = self.states.get_mut(&key) {
                entry.shutdown();
            }
            self.pause(&key);
        }

        info!(target: "states", "State manager shut down");
    }

    //--- Queries ----------------------------------------------------------

    pub fn get_state(&self, key: &str) -> Option<&StateEntry> {
        self.states.get(key)
    }

    pub fn get_state_mut(&mut self, key: &str) -> Option<&mut StateEntry> {
        self.states.get_mut(key)
    }

    /// Whether `key` is in the Active set. Loading states are not.
    pub fn is_active(&self, key: &str) -> bool {
        self.active.contains(key) && self.states.get(key).is_some_and(StateEntry::is_active)
    }

    /// Whether `key` is suspended waiting on its loader.
    pub fn is_loading(&self, key: &str) -> bool {
        self.loading.contains_key(key)
    }

    /// Registration index of `key`.
    pub fn state_index(&self, key: &str) -> Option<usize> {
        self.states.get(key).map(StateEntry::index)
    }

    /// Position of `key` within the Active set.
    pub fn active_index(&self, key: &str) -> Option<usize> {
        self.active.position(key)
    }

    /// Keys of the Active set, in stepping order.
    pub fn active_keys(&self) -> Vec<String> {
        self.active.keys()
    }

    pub fn active(&self) -> &ActiveSet {
        &self.active
    }

    /// Registered states in registration order.
    pub fn states(&self) -> impl Iterator<Item = &StateEntry> {
        self.states.values()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Registrations waiting for boot.
    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl std::fmt::Debug for StateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateManager")
            .field("booted", &self.is_booted())
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("pending", &self.pending.len())
            .field("active", &self.active.keys())
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

//=== Tests ===============================================================
