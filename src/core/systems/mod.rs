//=========================================================================
// State Systems
//=========================================================================
//
// Collaborators the state manager drives but does not implement:
// renderer, per-state loader, per-state main-loop driver, and the
// provider that builds a state's private loader/driver pair.
//
//=========================================================================

//=== Module Declarations =================================================

mod loader;
mod main_loop;
mod provider;
mod renderer;

//=== Public API ==========================================================

pub use loader::{AssetCache, AssetRequest, FileLoader, LoadCompletion, LoadTicket, Loader};
pub use main_loop::{MainLoop, VariableStepLoop};
pub use provider::{DefaultSystems, SystemsProvider};
pub use renderer::{NullRenderer, RenderMode, RenderTarget, Renderer, Viewport};
