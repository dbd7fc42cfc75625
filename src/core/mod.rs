//=========================================================================
// Core Systems
//
// Engine-side state orchestration, independent of the OS platform layer.
//
// Responsibilities:
// - Register states and defer registration until the host has booted
// - Drive each state through init / preload / create and pause
// - Step active states once per host frame, in registration order
// - Define the collaborator traits (renderer, loader, main loop) the
//   orchestration talks to
//
// Notes:
// Everything here runs on the thread that owns the `StateManager`.
// The only cross-thread traffic is loader completion, which arrives
// over a crossbeam channel and is applied at the start of each step.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod state;
pub mod systems;

//=== Public API ==========================================================

pub use state::{State, StateContext, StateManager};
pub use systems::{Loader, MainLoop, Renderer, SystemsProvider};
