//! Fire consumer: launch projectiles from the faction pools.
//!
//! Pool exhaustion is a capacity decision, not an error: the request is
//! dropped and `fire` reports `false`.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use super::components::{PooledProjectile, Projectile, ProjectileState};
use super::messages::FireRequest;
use super::pool::{PROJECTILE_Z, ProjectilePools, active_projectile_layers};
use crate::common::tunables::Tunables;
use crate::plugins::encounter::Encounter;

/// Everything `fire` writes on a pooled projectile.
pub type ProjectileSlots<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut ProjectileState,
        &'static mut Projectile,
        &'static mut Transform,
        &'static mut LinearVelocity,
        &'static mut Visibility,
        &'static mut CollisionLayers,
    ),
    With<PooledProjectile>,
>;

/// Launch one projectile. Returns `false` if the faction's pool is exhausted.
///
/// `fired_at` is the roster sequence number at fire time; the resolver uses it
/// to decide which hostiles this shot may hit.
pub fn fire(
    pools: &mut ProjectilePools,
    slots: &mut ProjectileSlots,
    request: &FireRequest,
    fired_at: u32,
    launch_speed: f32,
) -> bool {
    let pool = pools.pool_mut(request.faction);
    let Some((slot, entity)) = pool.acquire() else {
        return false;
    };

    let Ok((mut state, mut projectile, mut tf, mut vel, mut vis, mut layers)) =
        slots.get_mut(entity)
    else {
        warn!("Pooled projectile {entity:?} is missing its components; slot released");
        pool.release(slot);
        return false;
    };

    *state = ProjectileState::Active;
    projectile.fired_at = fired_at;
    tf.translation = request.origin.extend(PROJECTILE_Z);
    tf.rotation = Quat::from_rotation_z(request.rotation);
    vel.0 = Vec2::from_angle(request.rotation) * launch_speed;
    *vis = Visibility::Visible;
    *layers = active_projectile_layers(request.faction);
    true
}

pub fn allocate_fire_requests(
    mut reader: MessageReader<FireRequest>,
    encounter: Res<Encounter>,
    tunables: Res<Tunables>,
    mut pools: ResMut<ProjectilePools>,
    mut slots: ProjectileSlots,
) {
    for request in reader.read() {
        // Once the player is gone nothing may be launched, whoever asked.
        if !encounter.is_running() {
            continue;
        }

        let fired = fire(
            &mut pools,
            &mut slots,
            request,
            encounter.roster_seq(),
            tunables.launch_speed,
        );
        if !fired && pools.pool(request.faction).is_exhausted() {
            debug!("{:?} projectile pool exhausted; shot dropped", request.faction);
        }
    }
}
