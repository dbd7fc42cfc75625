//=========================================================================
// State Hooks
//=========================================================================
//
// Fixed-shape record of lifecycle closures. Every slot starts as a no-op,
// so configuration records and factory objects normalize to a `State`
// whose hooks can always be called unconditionally.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{State, StateContext};

//=== Hook ================================================================

/// A single lifecycle callback.
pub type Hook = Box<dyn FnMut(&mut StateContext<'_>)>;

fn noop() -> Hook {
    Box::new(|_| {})
}

//=== StateHooks ==========================================================

/// Closure-backed lifecycle hooks.
///
/// ```rust
/// # use aetheric_states::prelude::*;
/// let hooks = StateHooks::new()
///     .on_preload(|ctx| { ctx.load("logo", "images/logo.png"); })
///     .on_create(|ctx| log::info!("{} created", ctx.key()));
/// ```
pub struct StateHooks {
    init: Hook,
    preload: Hook,
    load_update: Hook,
    create: Hook,
    shutdown: Hook,
    pre_update: Hook,
    update: Hook,
    post_update: Hook,
    render: Hook,
}

impl StateHooks {
    /// All hooks set to no-ops.
    pub fn new() -> Self {
        Self {
            init: noop(),
            preload: noop(),
            load_update: noop(),
            create: noop(),
            shutdown: noop(),
            pre_update: noop(),
            update: noop(),
            post_update: noop(),
            render: noop(),
        }
    }

    pub fn on_init<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut StateContext<'_>) + 'static,
    {
        self.init = Box::new(hook);
        self
    }

    pub fn on_preload<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut StateContext<'_>) + 'static,
    {
        self.preload = Box::new(hook);
        self
    }

    /// Runs once when a suspended load completes, right before `create`.
    pub fn on_load_update<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut StateContext<'_>) + 'static,
    {
        self.load_update = Box::new(hook);
        self
    }

    pub fn on_create<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut StateContext<'_>) + 'static,
    {
        self.create = Box::new(hook);
        self
    }

    pub fn on_shutdown<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut StateContext<'_>) + 'static,
    {
        self.shutdown = Box::new(hook);
        self
    }

    pub fn on_pre_update<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut StateContext<'_>) + 'static,
    {
        self.pre_update = Box::new(hook);
        self
    }

    pub fn on_update<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut StateContext<'_>) + 'static,
    {
        self.update = Box::new(hook);
        self
    }

    pub fn on_post_update<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut StateContext<'_>) + 'static,
    {
        self.post_update = Box::new(hook);
        self
    }

    pub fn on_render<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut StateContext<'_>) + 'static,
    {
        self.render = Box::new(hook);
        self
    }
}

impl Default for StateHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateHooks").finish_non_exhaustive()
    }
}

//=== State Implementation ================================================

impl State for StateHooks {
    fn init(&mut self, ctx: &mut StateContext<'_>) {
        (self.init)(ctx)
    }

    fn preload(&mut self, ctx: &mut StateContext<'_>) {
        (self.preload)(ctx)
    }

    fn load_update(&mut self, ctx: &mut StateContext<'_>) {
        (self.load_update)(ctx)
    }

    fn create(&mut self, ctx: &mut StateContext<'_>) {
        (self.create)(ctx)
    }

    fn shutdown(&mut self, ctx: &mut StateContext<'_>) {
        (self.shutdown)(ctx)
    }

    fn pre_update(&mut self, ctx: &mut StateContext<'_>) {
        (self.pre_update)(ctx)
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        (self.update)(ctx)
    }

    fn post_update(&mut self, ctx: &mut StateContext<'_>) {
        (self.post_update)(ctx)
    }

    fn render(&mut self, ctx: &mut StateContext<'_>) {
        (self.render)(ctx)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;
    use crate::core::state::StateSettings;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn unset_hooks_are_noops() {
        let mut hooks = StateHooks::new();
        let mut settings = StateSettings::new("idle");
        let mut ctx = StateContext::new(&mut settings, None);

        hooks.init(&mut ctx);
        hooks.preload(&mut ctx);
        hooks.load_update(&mut ctx);
        hooks.create(&mut ctx);
        hooks.pre_update(&mut ctx);
        hooks.update(&mut ctx);
        hooks.post_update(&mut ctx);
        hooks.render(&mut ctx);
        hooks.shutdown(&mut ctx);
    }

    #[test]
    fn supplied_hook_replaces_only_its_slot() {
        let created = Rc::new(Cell::new(0));
        let counter = created.clone();
        let mut hooks = StateHooks::new().on_create(move |_| counter.set(counter.get() + 1));

        let mut settings = StateSettings::new("menu");
        let mut ctx = StateContext::new(&mut settings, None);
        hooks.init(&mut ctx);
        hooks.create(&mut ctx);
        hooks.create(&mut ctx);

        assert_eq!(created.get(), 2);
    }

    #[test]
    fn hooks_see_their_state_key() {
        let seen = Rc::new(std::cell::RefCell::new(String::new()));
        let sink = seen.clone();
        let mut hooks = StateHooks::new().on_init(move |ctx| *sink.borrow_mut() = ctx.key().to_owned());

        let mut settings = StateSettings::new("options");
        hooks.init(&mut StateContext::new(&mut settings, None));

        assert_eq!(*seen.borrow(), "options");
    }
}
