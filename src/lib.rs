//=========================================================================
// Aetheric States — Library Root
//
// State (scene) lifecycle orchestration for the Aetheric Engine.
//
// Responsibilities:
// - Expose the state manager and the collaborator traits it drives
// - Keep the winit host (`platform`) hidden from end users
// - Provide the `Engine` facade that boots states once a window exists
//   and steps them every frame
//
// Typical usage:
// ```no_run
// use aetheric_states::prelude::*;
//
// fn main() -> Result<(), PlatformError> {
//     EngineBuilder::new()
//         .with_state("title", StateSource::config(StateConfig::new("title")), true)
//         .build()
//         .run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the state manager and collaborator traits. Hosts other
// than the bundled winit engine drive `core::state::StateManager`
// directly.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the winit event loop and window; `engine` is the
// builder-facing entry point that hands states to it.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, RendererFactory};
pub use platform::PlatformError;
