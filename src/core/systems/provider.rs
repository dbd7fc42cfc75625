//=========================================================================
// Systems Provider
//=========================================================================
//
// Builds the private subsystems each state owns. Called exactly once per
// state, at registration.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

//=== Internal Dependencies ===============================================

use super::{FileLoader, Loader, MainLoop, VariableStepLoop};

//=== SystemsProvider Trait ===============================================

/// Factory for a state's loader and main-loop driver.
pub trait SystemsProvider {
    /// Loader for the state registered under `key`. `None` means the state
    /// never suspends for loading; its `preload` hook is still called.
    fn create_loader(&mut self, key: &str) -> Option<Box<dyn Loader>>;

    fn create_main_loop(&mut self, key: &str) -> Box<dyn MainLoop>;
}

//=== DefaultSystems ======================================================

/// Gives every state a [`FileLoader`] rooted at the asset directory and a
/// [`VariableStepLoop`].
#[derive(Debug, Clone)]
pub struct DefaultSystems {
    asset_root: PathBuf,
}

impl DefaultSystems {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
        }
    }

    pub fn asset_root(&self) -> &std::path::Path {
        &self.asset_root
    }
}

impl Default for DefaultSystems {
    fn default() -> Self {
        Self::new("assets")
    }
}

impl SystemsProvider for DefaultSystems {
    fn create_loader(&mut self, _key: &str) -> Option<Box<dyn Loader>> {
        Some(Box::new(FileLoader::new(self.asset_root.clone())))
    }

    fn create_main_loop(&mut self, _key: &str) -> Box<dyn MainLoop> {
        Box::new(VariableStepLoop::new())
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::systems::AssetRequest;

    #[test]
    fn default_root_is_assets_dir() {
        assert_eq!(DefaultSystems::default().asset_root(), std::path::Path::new("assets"));
    }

    #[test]
    fn each_call_builds_fresh_systems() {
        let mut provider = DefaultSystems::new("data");

        let mut first = provider.create_loader("a").unwrap();
        let second = provider.create_loader("b").unwrap();
        first.enqueue(AssetRequest::new("x", "x.bin"));

        assert_eq!(first.queue_size(), 1);
        assert_eq!(second.queue_size(), 0, "loaders are never shared");
        assert!(!provider.create_main_loop("a").is_running());
    }
}
