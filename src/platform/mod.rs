//=========================================================================
// Platform Subsystem
//
// Bridges winit (window + event loop) with the state manager.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌──────────────────────────────────────────┐
//  │  Winit Event Loop                        │
//  │   ├─ resumed ──────────> boot(renderer)  │
//  │   ├─ RedrawRequested ──> step(ms)        │
//  │   │                      render()        │
//  │   └─ CloseRequested ───> shutdown()      │
//  └──────────────────────────────────────────┘
//                 ↑
//   Loader workers ── LoadTicket (crossbeam) ──┘
// ```
//
// Key Design Decisions:
// - **Window creation = boot**: a renderer can only be built once a
//   window exists, so states registered earlier stay queued until then
// - **RedrawRequested = frame boundary**: one `step` per presented frame
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod host;

//=== External Crates =====================================================

use thiserror::Error;
use winit::error::EventLoopError;

//=== Internal Imports ====================================================

pub(crate) use host::{Platform, WindowSettings};

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are typically fatal - if the event loop can't be created,
/// the engine cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    /// Event loop execution error.
    #[error("Event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }

    #[test]
    fn platform_error_display_format() {
        let err = PlatformError::EventLoopCreation(EventLoopError::ExitFailure(3));
        assert!(err.to_string().starts_with("Event loop creation failed"));
    }
}
