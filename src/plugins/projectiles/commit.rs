//! Return commit: recycle retired projectiles back into their pool.
//!
//! This system is the "owner" of the *Inactive invariants*.
//!
//! Invariant: Inactive projectiles must be:
//! - hidden
//! - velocity = 0
//! - collide with nothing (filters empty)
//! - free in their pool

use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{PooledProjectile, ProjectileState};
use super::pool::{ProjectilePools, inactive_projectile_layers};

pub fn return_to_pool_commit(
    mut pools: ResMut<ProjectilePools>,
    mut q: Query<(
        &PooledProjectile,
        &mut ProjectileState,
        &mut Visibility,
        &mut LinearVelocity,
        &mut CollisionLayers,
    )>,
) {
    for (pooled, mut state, mut vis, mut vel, mut layers) in &mut q {
        if *state != ProjectileState::PendingReturn {
            continue;
        }

        *state = ProjectileState::Inactive;
        *vis = Visibility::Hidden;
        vel.0 = Vec2::ZERO;
        *layers = inactive_projectile_layers(pooled.faction);

        pools.pool_mut(pooled.faction).release(pooled.slot);
    }
}
