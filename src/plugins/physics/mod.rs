//! Physics plugin: avian2d in top-down mode, tied to the encounter's pause flag.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::encounter::Encounter;

pub fn plugin(app: &mut App) {
    let ppm = app
        .world()
        .get_resource::<Tunables>()
        .map_or(Tunables::default().pixels_per_meter, |t| t.pixels_per_meter);

    app.add_plugins(PhysicsPlugins::default().with_length_unit(ppm))
        .insert_resource(Gravity(Vec2::ZERO))
        .add_systems(Update, sync_physics_clock);
}

/// Pausing is one-way: once the encounter stops, the physics clock stays stopped.
pub fn sync_physics_clock(encounter: Res<Encounter>, mut time: ResMut<Time<Physics>>) {
    if encounter.is_paused() && !time.is_paused() {
        time.pause();
        info!("Simulation paused");
    }
}
