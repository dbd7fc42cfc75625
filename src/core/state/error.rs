//=========================================================================
// State Errors
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== StateError ==========================================================

/// Registration failures.
///
/// Unknown keys passed to `start`/`pause` are not errors; they are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The resolved key is already registered. Nothing was added.
    #[error("state key {key:?} is already registered")]
    DuplicateKey { key: String },
}
