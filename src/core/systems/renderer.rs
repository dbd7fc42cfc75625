//=========================================================================
// Renderer Boundary
//=========================================================================
//
// The state manager never draws. It asks the host renderer for an
// offscreen target when a state is registered (offscreen compositing
// only) and hands visible active states to `render_to_screen`.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::state::StateEntry;

//=== Viewport ============================================================

/// Host surface size, used when a state leaves its own size unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

//=== RenderMode ==========================================================

/// How the host renderer composes states onto the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// States draw straight to the screen surface.
    #[default]
    Direct,

    /// Each state draws into a private offscreen target that is
    /// composited afterwards.
    Offscreen,
}

//=== RenderTarget ========================================================

/// Handle to an offscreen target owned by exactly one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    pub id: u64,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

//=== Renderer Trait ======================================================

/// Host renderer, as seen by the state manager.
///
/// A renderer only exists once the host has a render context, which is
/// why handing one to [`crate::core::state::StateManager::boot`] is what
/// ends the pre-boot phase.
pub trait Renderer {
    /// Composition mode. Offscreen targets are only requested in
    /// [`RenderMode::Offscreen`].
    fn mode(&self) -> RenderMode;

    /// Allocates an offscreen target for the state registered under `key`.
    fn create_offscreen_target(
        &mut self,
        key: &str,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> RenderTarget;

    /// Presents one state. Called once per frame per visible active state.
    fn render_to_screen(&mut self, state: &StateEntry);
}

//=== NullRenderer ========================================================

/// Renderer that allocates target handles but never draws anything.
///
/// Default renderer of the engine host until the application installs a
/// real one via `EngineBuilder::with_renderer`.
#[derive(Debug, Default)]
pub struct NullRenderer {
    mode: RenderMode,
    next_target: u64,
}

impl NullRenderer {
    pub fn new(mode: RenderMode) -> Self {
        Self { mode, next_target: 0 }
    }
}

impl Renderer for NullRenderer {
    fn mode(&self) -> RenderMode {
        self.mode
    }

    fn create_offscreen_target(
        &mut self,
        _key: &str,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> RenderTarget {
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
        trace!(target: "states", "NullRenderer skipping state {:?}", state.key());
    }
}

//=== Tests ===============================================================
