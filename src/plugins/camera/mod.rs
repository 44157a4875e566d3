//! Camera plugin (render-only): follows the player hull, clamped to the arena.
//!
//! ```text
//! OnEnter(InGame): spawn MainCamera
//! PostUpdate:      follow_player (before transform propagation)
//! ```
//!
//! The player and the camera are both read through `Transform`, so the two
//! queries are kept disjoint with `Without` filters.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::encounter::Encounter;
use crate::plugins::level::LevelData;
use crate::plugins::vehicles::Vehicle;

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PostUpdate,
            follow_player
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera { responsiveness: 5.0 },
        FireflyConfig::default(),
        Transform::from_xyz(0.0, 0.0, 999.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player(
    time: Res<Time>,
    encounter: Res<Encounter>,
    level: Res<LevelData>,
    q_player: Query<&Transform, (With<Vehicle>, Without<MainCamera>)>,
    mut q_cam: Query<(&mut Transform, &MainCamera, &Projection), Without<Vehicle>>,
) {
    let Some(player) = encounter.player() else { return; };
    let Ok(tf_player) = q_player.get(player) else { return; };
    let Ok((mut tf_cam, main_cam, projection)) = q_cam.single_mut() else { return; };

    let alpha = 1.0 - (-main_cam.responsiveness * time.delta_secs()).exp();
    let current = tf_cam.translation.truncate();
    let target = current.lerp(tf_player.translation.truncate(), alpha);

    // Keep the view inside the arena; a view larger than the arena centres on it.
    let half_view = match projection {
        Projection::Orthographic(ortho) => ortho.area.half_size(),
        _ => Vec2::ZERO,
    };
    let bounds = level.bounds();
    let slack = (bounds.half_size() - half_view).max(Vec2::ZERO);
    let clamped = target.clamp(bounds.center() - slack, bounds.center() + slack);

    tf_cam.translation.x = clamped.x;
    tf_cam.translation.y = clamped.y;
}
