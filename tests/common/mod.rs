//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `tank_arena::game::configure_headless` to install gameplay plugins.
//! - time advances by a fixed manual step so every `update` runs exactly one
//!   fixed-timestep pass (collision resolution lives in `FixedPostUpdate`).

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

pub const STEP: Duration = Duration::from_micros(15_625);

pub fn app_headless() -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(STEP));
    app.insert_resource(Time::<Fixed>::from_duration(STEP));

    tank_arena::game::configure_headless(&mut app);
    // `App::run` would do this; manual `update` loops must finish plugins themselves.
    app.finish();
    app.cleanup();
    app
}

/// Headless app with the encounter built and the pools spawned.
pub fn app_in_encounter() -> App {
    let mut app = app_headless();
    for _ in 0..3 {
        app.update();
    }
    app
}
