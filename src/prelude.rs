//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_states::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine host
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::platform::PlatformError;

// State system
pub use crate::core::state::{
    AddOutcome, FactoryOutput, State, StateConfig, StateContext, StateEntry, StateError,
    StateHooks, StateManager, StateSettings, StateSource,
};

// Collaborators
pub use crate::core::systems::{
    AssetRequest, DefaultSystems, LoadCompletion, LoadTicket, Loader, MainLoop, NullRenderer,
    RenderMode, RenderTarget, Renderer, SystemsProvider, Viewport,
};
