//=========================================================================
// Main-Loop Driver
//=========================================================================
//
// Per-state driver that turns host timestamps into hook calls.
//
// Flow:
//   StateManager::step(ts) → MainLoop::step(ts) → pre_update → update
//                                                → post_update → render
//
// The manager only forwards timestamps to drivers that report running;
// cadence and delta computation live entirely in the driver.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::state::{State, StateContext};

//=== MainLoop Trait ======================================================

/// Main-loop driver owned by a single state.
pub trait MainLoop {
    /// Called once each time the state reaches the Active set.
    fn start(&mut self);

    /// Whether the driver wants timestamps forwarded to it.
    fn is_running(&self) -> bool;

    fn set_running(&mut self, running: bool);

    /// Advances the state to `timestamp` (milliseconds since host start).
    fn step(&mut self, timestamp: f64, state: &mut dyn State, context: &mut StateContext<'_>);
}

//=== VariableStepLoop ====================================================

/// Runs every hook once per forwarded timestamp, with `delta` taken from
/// the previous timestamp.
///
/// The first step after [`MainLoop::start`] reports a zero delta.
#[derive(Debug, Default)]
pub struct VariableStepLoop {
    running: bool,
    last_timestamp: Option<f64>,
    frames: u64,
}

impl VariableStepLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames stepped since the last start.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl MainLoop for VariableStepLoop {
    fn start(&mut self) {
        self.last_timestamp = None;
        self.frames = 0;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    fn step(&mut self, timestamp: f64, state: &mut dyn State, context: &mut StateContext<'_>) {
        // Host clocks can jitter backwards; never hand hooks a negative delta
        let delta = self
            .last_timestamp
            .map_or(0.0, |last| (timestamp - last).max(0.0));
        self.last_timestamp = Some(timestamp);
        self.frames += 1;

        context.time = timestamp;
        context.delta = delta;

        state.pre_update(context);
        state.update(context);
        state.post_update(context);
        state.render(context);
    }
}

//=== Tests ===============================================================
