//=========================================================================
// Aetheric Engine
//
// Entry point that wires a state manager to the winit host.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Platform]
//         │                          │                   │
//         ├─ with_size()             └─ states()         ├─ boot on window
//         ├─ with_renderer()            (pre-boot adds)  └─ step per redraw
//         └─ with_state()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};
use winit::window::Window;

//=== Internal Dependencies ===============================================

use crate::core::state::{StateManager, StateSource};
use crate::core::systems::{DefaultSystems, NullRenderer, Renderer, SystemsProvider, Viewport};
use crate::platform::{Platform, PlatformError, WindowSettings};

//=== RendererFactory =====================================================

/// Builds the host renderer once the window exists.
pub type RendererFactory = Box<dyn Fn(Arc<Window>) -> Box<dyn Renderer>>;

fn null_renderer(_window: Arc<Window>) -> Box<dyn Renderer> {
    Box::new(NullRenderer::default())
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: "Aetheric Engine"
/// - **Size**: 800x600 (also the fallback size of offscreen targets)
/// - **Asset root**: `assets`
/// - **Renderer**: [`NullRenderer`]
///
/// # Examples
///
/// ```no_run
/// use aetheric_states::prelude::*;
///
/// EngineBuilder::new()
///     .with_title("Demo")
///     .with_size(1280, 720)
///     .with_initial_states(vec![
///         StateSource::config(StateConfig::new("boot")),
///         StateSource::config(StateConfig::new("menu")),
///     ])
///     .build()
///     .run()
///     .unwrap();
/// ```
pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    asset_root: PathBuf,
    systems: Option<Box<dyn SystemsProvider>>,
    renderer_factory: RendererFactory,
    initial_states: Vec<StateSource>,
    states: Vec<(String, StateSource, bool)>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Aetheric Engine".to_owned(),
            width: 800,
            height: 600,
            asset_root: PathBuf::from("assets"),
            systems: None,
            renderer_factory: Box::new(null_renderer),
            initial_states: Vec::new(),
            states: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the window size, which is also the fallback size of offscreen
    /// state targets.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.width = width;
        self.height = height;
        self
    }

    /// Directory the default [`crate::core::systems::FileLoader`] reads
    /// from. Ignored when custom systems are installed.
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Replaces the per-state loader/main-loop provider.
    pub fn with_systems<P: SystemsProvider + 'static>(mut self, systems: P) -> Self {
        self.systems = Some(Box::new(systems));
        self
    }

    /// Installs the renderer factory, called once when the window exists.
    pub fn with_renderer<F>(mut self, factory: F) -> Self
    where
        F: Fn(Arc<Window>) -> Box<dyn Renderer> + 'static,
    {
        self.renderer_factory = Box::new(factory);
        self
    }

    /// Registers a state. It is materialized at boot.
    pub fn with_state(mut self, key: impl Into<String>, source: StateSource, auto_start: bool) -> Self {
        self.states.push((key.into(), source, auto_start));
        self
    }

    /// Registers an initial list of states ahead of any [`Self::with_state`]
    /// ones. Only the first auto-starts.
    pub fn with_initial_states(mut self, sources: Vec<StateSource>) -> Self {
        self.initial_states.extend(sources);
        self
    }

    /// Builds the engine. All states are still pending until `run` boots.
    pub fn build(self) -> Engine {
        info!("Building engine ({}x{}, \"{}\")", self.width, self.height, self.title);

        let systems = self
            .systems
            .unwrap_or_else(|| Box::new(DefaultSystems::new(self.asset_root)));
        let mut states = StateManager::new(Viewport::new(self.width, self.height), systems);

        let mut rejected = states.queue_initial(self.initial_states);
        for (key, source, auto_start) in self.states {
            if let Err(err) = states.add(Some(&key), source, auto_start) {
                rejected.push(err);
            }
        }
        for err in rejected {
            warn!("State registration rejected: {}", err);
        }

        Engine {
            states,
            window: WindowSettings {
                title: self.title,
                width: self.width,
                height: self.height,
            },
            renderer_factory: self.renderer_factory,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Aetheric Engine runtime.
///
/// Holds the state manager until [`Engine::run`] hands it to the winit
/// host. Create via [`EngineBuilder`].
pub struct Engine {
    states: StateManager,
    window: WindowSettings,
    renderer_factory: RendererFactory,
}

impl Engine {
    /// State manager, for registrations beyond the builder's.
    ///
    /// The manager is still pre-boot here: `add` and `start` are queued.
    pub fn states(&mut self) -> &mut StateManager {
        &mut self.states
    }

    /// Opens the window and runs until it closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the winit event loop cannot be created
    /// or fails while running.
    pub fn run(self) -> Result<(), PlatformError> {
        info!(
            "Starting engine runtime ({} states pending)",
            self.states.pending_len()
        );

        let result = Platform::new(self.window, self.states, self.renderer_factory).run();

        info!("Engine shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
