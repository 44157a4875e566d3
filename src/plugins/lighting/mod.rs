//! Lighting plugin (Firefly) (render-only).
//!
//! One light rides on the player hull; every hull casts a shadow.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::encounter::Encounter;
use crate::plugins::vehicles::Vehicle;

#[derive(Component)]
pub struct PlayerLight;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(
            Update,
            (attach_hull_occluders, follow_player_light).run_if(in_state(GameState::InGame)),
        );
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("PlayerLight"),
        PlayerLight,
        PointLight2d {
            color: Color::srgb(1.0, 0.9, 0.75),
            radius: 520.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn attach_hull_occluders(
    mut commands: Commands,
    q: Query<(Entity, &Vehicle), Without<Occluder2d>>,
) {
    for (e, vehicle) in &q {
        commands
            .entity(e)
            .insert(Occluder2d::circle(vehicle.profile.hull_radius));
    }
}

fn follow_player_light(
    encounter: Res<Encounter>,
    q_player: Query<&Transform, (With<Vehicle>, Without<PlayerLight>)>,
    mut q_light: Query<&mut Transform, (With<PlayerLight>, Without<Vehicle>)>,
) {
    let Some(tf_player) = encounter.player().and_then(|p| q_player.get(p).ok()) else {
        return;
    };
    let Ok(mut tf_light) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_player.translation.x;
    tf_light.translation.y = tf_player.translation.y;
}
