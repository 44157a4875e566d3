//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::projectiles::ProjectilesPlugin;

pub mod combat;
pub mod core;
pub mod effects;
pub mod encounter;
pub mod level;
pub mod physics;
pub mod projectiles;
pub mod vehicles;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    level::plugin(app);
    encounter::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    vehicles::plugin(app);
    effects::plugin(app);
    combat::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
}
