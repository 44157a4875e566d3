//! Core plugin: shared tunables and global settings.
//!
//! Tunables inserted by the app before this plugin runs are kept.

use bevy::prelude::*;

use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    app.init_resource::<Tunables>()
        .insert_resource(ClearColor(Color::srgb(0.06, 0.07, 0.05)));
}
