//=========================================================================
// Boot Sequence Demo
//
// Registers one state of each source kind and runs the engine:
// - `splash`: a `State` instance that preloads an asset
// - `hud`: a hook-based config, started with the splash
// - `menu`: a factory, left paused
//
// Run with `RUST_LOG=debug cargo run --example boot_sequence`.
//
//=========================================================================

use aetheric_states::prelude::*;
use log::info;

//=== Splash ==============================================================

struct Splash {
    elapsed: f64,
}

impl State for Splash {
    fn settings(&self) -> StateSettings {
        StateSettings::new("splash")
    }

    fn preload(&mut self, ctx: &mut StateContext<'_>) {
        ctx.load("logo", "logo.png");
    }

    fn create(&mut self, ctx: &mut StateContext<'_>) {
        let logo = ctx
            .loader()
            .and_then(|loader| loader.get("logo"))
            .map_or(0, |bytes| bytes.len());
        info!("splash created ({} logo bytes)", logo);
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        self.elapsed += ctx.delta;
        if self.elapsed > 3000.0 {
            ctx.set_visible(false);
        }
    }
}

//=== Entry Point =========================================================

fn main() -> Result<(), PlatformError> {
    env_logger::init();

    let hud = StateConfig::new("hud").size(320, 48).hooks(
        StateHooks::new()
            .on_create(|ctx| info!("{} created at {:.0}ms", ctx.key(), ctx.time))
            .on_render(|ctx| log::trace!("{} render", ctx.key())),
    );

    let menu = StateSource::factory(|| {
        FactoryOutput::Object(StateHooks::new().on_create(|_| info!("menu created")))
    });

    EngineBuilder::new()
        .with_title("Boot Sequence")
        .with_size(1024, 768)
        .with_asset_root("assets")
        .with_initial_states(vec![StateSource::instance(Splash { elapsed: 0.0 })])
        .with_state("hud", StateSource::config(hud.active(true)), false)
        .with_state("menu", menu, false)
        .build()
        .run()
}
