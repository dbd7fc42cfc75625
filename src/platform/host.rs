//=========================================================================
// Platform Host
//=========================================================================
//
// Winit application handler that owns the window and the state manager.
//
// Lifecycle:
//   resumed()          → create window → build renderer → StateManager::boot
//   RedrawRequested    → StateManager::step(ms) → StateManager::render
//                        → request next redraw
//   CloseRequested     → StateManager::shutdown → exit
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Instant;

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use super::PlatformError;
use crate::core::state::StateManager;
use crate::engine::RendererFactory;

//=== WindowSettings ======================================================

/// Window parameters handed over from the engine builder.
#[derive(Debug, Clone)]
pub(crate) struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Window owner and frame driver for the state manager.
///
/// Runs on the main thread (winit requirement on macOS/iOS). The window,
/// and therefore the renderer, is created lazily in `resumed()`; that is
/// the moment the state manager boots.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Arc<Window>>,

    settings: WindowSettings,
    states: StateManager,
    renderer_factory: RendererFactory,

    /// Origin of the millisecond timestamps passed to `step`.
    started_at: Instant,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub fn new(
        settings: WindowSettings,
        states: StateManager,
        renderer_factory: RendererFactory,
    ) -> Self {
        info!(target: "platform", "Platform host initialized");
        Self {
            window: None,
            settings,
            states,
            renderer_factory,
            started_at: Instant::now(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Steps and presents every active state for one frame.
    fn frame(&mut self) {
        let timestamp = self.started_at.elapsed().as_secs_f64() * 1000.0;
        self.states.step(timestamp);
        self.states.render();
    }

    fn boot(&mut self, window: Arc<Window>) {
        let renderer = (self.renderer_factory)(window);

        for err in self.states.boot(renderer) {
            error!(target: "platform", "State registration failed at boot: {}", err);
        }

        info!(
            target: "platform",
            "Booted {} states ({} active)",
            self.states.len(),
            self.states.active().len()
        );
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn states(&self) -> &StateManager {
        &self.states
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    ///
    /// Creates the window if it doesn't exist yet and boots the state
    /// manager against it. A later resume reuses both.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                let window = Arc::new(window);
                self.boot(Arc::clone(&window));
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.states.shutdown();
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => {
                self.frame();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{StateConfig, StateSource};
    use crate::core::systems::{DefaultSystems, NullRenderer, Renderer, Viewport};

    fn platform_with(states: StateManager) -> Platform {
        Platform::new(
            WindowSettings {
                title: "test".into(),
                width: 320,
                height: 240,
            },
            states,
            Box::new(|_: Arc<Window>| -> Box<dyn Renderer> { Box::new(NullRenderer::default()) }),
        )
    }

    #[test]
    fn platform_creation_defers_window_and_boot() {
        let mut states = StateManager::new(Viewport::default(), Box::new(DefaultSystems::default()));
        states
            .add(Some("title"), StateSource::config(StateConfig::default()), true)
            .unwrap();

        let platform = platform_with(states);

        assert!(platform.window().is_none(), "Window should be created lazily");
        assert!(!platform.states().is_booted());
        assert_eq!(platform.states().pending_len(), 1);
    }

    #[test]
    fn frame_before_boot_is_harmless() {
        let states = StateManager::new(Viewport::default(), Box::new(DefaultSystems::default()));
        let mut platform = platform_with(states);

        platform.frame();

        assert!(platform.states().active().is_empty());
    }
}
