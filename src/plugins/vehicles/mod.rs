//! Vehicles: player and hostile tanks built from one component and a stat profile.
//!
//! Pipeline (`Update`, ordered by `StepSet`):
//! - Input: sample keyboard/mouse into `PlayerIntent` (only while input is enabled)
//! - Player: apply intent to the player hull and turret, write a fire request
//! - Hostiles: in roster order, aim at the player, close in, fire on cooldown
//!
//! The player runs first so hostiles always read this frame's player position.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::Layer;
use crate::common::state::{GameState, StepSet};
use crate::plugins::camera::MainCamera;
use crate::plugins::combat::damage::MobilityState;
use crate::plugins::encounter::Encounter;
use crate::plugins::projectiles::messages::FireRequest;

mod components;

pub use components::*;

/// Chasers stop once the player is within this fraction of their fire range.
pub const CHASE_STANDOFF: f32 = 0.6;

const HULL_Z: f32 = 1.0;
const BARREL_LENGTH: f32 = 22.0;

pub fn plugin(app: &mut App) {
    app.init_resource::<PlayerIntent>()
        .add_systems(Update, gather_player_input.in_set(StepSet::Input))
        .add_systems(Update, update_player.in_set(StepSet::Player))
        .add_systems(Update, update_hostiles.in_set(StepSet::Hostiles))
        .add_systems(
            PostUpdate,
            (present_vehicles, sync_turret_visuals).run_if(in_state(GameState::InGame)),
        );
}

// -----------------------------------------------------------------------------
// Spawn
// -----------------------------------------------------------------------------

#[inline]
pub fn hull_layers(faction: Faction) -> CollisionLayers {
    match faction {
        Faction::Player => CollisionLayers::new(
            Layer::Player,
            [Layer::Terrain, Layer::Bounds, Layer::Enemy, Layer::EnemyBullet],
        ),
        Faction::Hostile => CollisionLayers::new(
            Layer::Enemy,
            [
                Layer::Terrain,
                Layer::Bounds,
                Layer::Player,
                Layer::Enemy,
                Layer::PlayerBullet,
            ],
        ),
    }
}

fn hull_color(class: VehicleClass, mobility: MobilityState) -> Color {
    match (class, mobility) {
        (_, MobilityState::Destroyed) => Color::srgb(0.18, 0.17, 0.16),
        (_, MobilityState::Immobilised) => Color::srgb(0.45, 0.38, 0.3),
        (VehicleClass::Player, _) => Color::srgb(0.2, 0.75, 0.9),
        (VehicleClass::Basic, _) => Color::srgb(0.9, 0.25, 0.25),
        (VehicleClass::Heavy, _) => Color::srgb(0.65, 0.25, 0.85),
    }
}

/// Spawn a vehicle hull with its turret barrel. Terrain and vehicle-vehicle
/// blocking come from the hull's collision layers.
pub fn spawn_vehicle(commands: &mut Commands, vehicle: Vehicle, position: Vec2) -> Entity {
    let profile = vehicle.profile;
    let class = vehicle.class;
    let faction = vehicle.faction();
    let r = profile.hull_radius;

    let mut entity = commands.spawn((
        Name::new(format!("{class:?}Tank")),
        vehicle,
        Turret::default(),
        Sprite {
            color: hull_color(class, MobilityState::Healthy),
            custom_size: Some(Vec2::splat(r * 2.0)),
            ..default()
        },
        Transform::from_translation(position.extend(HULL_Z)),
        RigidBody::Dynamic,
        LockedAxes::ROTATION_LOCKED,
        Collider::circle(r),
        hull_layers(faction),
        LinearVelocity::ZERO,
        DespawnOnExit(GameState::InGame),
    ));

    if faction == Faction::Hostile {
        entity.insert(FireCooldown(Timer::from_seconds(
            profile.fire_cooldown_secs,
            TimerMode::Once,
        )));
    }

    entity.with_children(|parent| {
        parent.spawn((
            TurretVisual,
            Sprite {
                color: Color::srgb(0.1, 0.1, 0.12),
                custom_size: Some(Vec2::new(BARREL_LENGTH, 6.0)),
                ..default()
            },
            Transform::from_xyz(BARREL_LENGTH * 0.5, 0.0, 0.1),
        ));
    });

    entity.id()
}

// -----------------------------------------------------------------------------
// Step: input -> player -> hostiles
// -----------------------------------------------------------------------------

fn gather_player_input(
    encounter: Res<Encounter>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    windows: Query<&Window>,
    q_camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut intent: ResMut<PlayerIntent>,
) {
    *intent = PlayerIntent::default();
    if !encounter.input_enabled() {
        return;
    }

    if let Some(keys) = keys {
        let mut axis = Vec2::ZERO;
        if keys.pressed(KeyCode::KeyW) {
            axis.y += 1.0;
        }
        if keys.pressed(KeyCode::KeyS) {
            axis.y -= 1.0;
        }
        if keys.pressed(KeyCode::KeyA) {
            axis.x -= 1.0;
        }
        if keys.pressed(KeyCode::KeyD) {
            axis.x += 1.0;
        }
        intent.move_axis = axis.normalize_or_zero();
    }

    intent.fire = buttons.is_some_and(|b| b.just_pressed(MouseButton::Left));

    // Cursor may be outside the window, or there may be no window at all (headless).
    let Ok(window) = windows.single() else { return; };
    let Some(cursor) = window.cursor_position() else { return; };
    let Ok((camera, camera_tf)) = q_camera.single() else { return; };
    intent.aim = camera.viewport_to_world_2d(camera_tf, cursor).ok();
}

fn update_player(
    encounter: Res<Encounter>,
    intent: Res<PlayerIntent>,
    mut q: Query<(&Vehicle, &mut Turret, &mut LinearVelocity, &Transform)>,
    mut writer: MessageWriter<FireRequest>,
) {
    let Some(player) = encounter.player() else { return; };
    let Ok((vehicle, mut turret, mut vel, tf)) = q.get_mut(player) else { return; };

    if vehicle.mobility() != MobilityState::Healthy {
        vel.0 = Vec2::ZERO;
        return;
    }

    let origin = tf.translation.truncate();
    vel.0 = intent.move_axis * vehicle.profile.move_speed;
    if let Some(aim) = intent.aim {
        turret.aim_at(origin, aim);
    }

    if intent.fire && encounter.input_enabled() {
        writer.write(FireRequest {
            faction: Faction::Player,
            origin,
            rotation: turret.rotation,
        });
    }
}

fn update_hostiles(
    time: Res<Time>,
    encounter: Res<Encounter>,
    mut q: Query<(
        &Vehicle,
        &mut Turret,
        &mut LinearVelocity,
        &Transform,
        Option<&mut FireCooldown>,
    )>,
    mut writer: MessageWriter<FireRequest>,
) {
    let target = encounter
        .player()
        .and_then(|p| q.get(p).ok())
        .filter(|(vehicle, ..)| vehicle.mobility() != MobilityState::Destroyed)
        .map(|(_, _, _, tf, _)| tf.translation.truncate());

    for &hostile in encounter.hostiles() {
        let Ok((vehicle, mut turret, mut vel, tf, cooldown)) = q.get_mut(hostile) else {
            continue;
        };

        if vehicle.mobility() != MobilityState::Healthy {
            vel.0 = Vec2::ZERO;
            continue;
        }
        let Some(target) = target else {
            vel.0 = Vec2::ZERO;
            continue;
        };

        let origin = tf.translation.truncate();
        let to_target = target - origin;
        let distance = to_target.length();
        let profile = vehicle.profile;

        turret.aim_at(origin, target);

        vel.0 = match profile.movement {
            MovementPolicy::Chase if distance > profile.fire_range * CHASE_STANDOFF => {
                to_target.normalize_or_zero() * profile.move_speed
            }
            _ => Vec2::ZERO,
        };

        let Some(mut cooldown) = cooldown else { continue; };
        cooldown.tick(time.delta());
        if distance <= profile.fire_range && cooldown.is_finished() {
            cooldown.reset();
            writer.write(FireRequest {
                faction: Faction::Hostile,
                origin,
                rotation: turret.rotation,
            });
        }
    }
}

// -----------------------------------------------------------------------------
// Presentation (derived from Vehicle / Turret)
// -----------------------------------------------------------------------------

fn present_vehicles(mut q: Query<(&Vehicle, &mut Sprite), Changed<Vehicle>>) {
    for (vehicle, mut sprite) in &mut q {
        sprite.color = hull_color(vehicle.class, vehicle.mobility());
    }
}

fn sync_turret_visuals(
    q_turrets: Query<&Turret>,
    mut q_barrels: Query<(&ChildOf, &mut Transform), With<TurretVisual>>,
) {
    for (child_of, mut tf) in &mut q_barrels {
        let Ok(turret) = q_turrets.get(child_of.parent()) else { continue; };
        let dir = Vec2::from_angle(turret.rotation);
        tf.rotation = Quat::from_rotation_z(turret.rotation);
        tf.translation = (dir * BARREL_LENGTH * 0.5).extend(tf.translation.z);
    }
}

#[cfg(test)]
mod tests;
