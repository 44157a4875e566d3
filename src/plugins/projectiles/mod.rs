//! Projectiles plugin: **message-based producer → consumer** firing over fixed pools.
//!
//! # Data flow
//! ```text
//!   Update (StepSet)
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (A) Producers: vehicles::update_player / update_hostiles                  │
//!│      - writes: FireRequest { faction, origin, rotation }                   │
//!│                                                                            │
//!│  (B) Consumer: allocate_fire_requests            (StepSet::Fire)           │
//!│      - mutates: ProjectilePools (acquire)                                  │
//!│      - mutates: ProjectileState, Projectile, Transform, LinearVelocity,    │
//!│                 Visibility, CollisionLayers                                │
//!└────────────────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!   FixedPostUpdate
//!┌────────────────────────────────────────────────────────────────────────────┐
//!│  (C) Avian emits CollisionStart messages                                   │
//!│                                                                            │
//!│  (D) combat::resolve_collisions                  (ResolveSet::Resolve)     │
//!│      - retires: ProjectileState Active -> PendingReturn                    │
//!│                                                                            │
//!│  (E) return_to_pool_commit                       (ResolveSet::Commit)      │
//!│      - writes Inactive invariants, ProjectilePools (release)               │
//!└────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Producers never borrow the pools. The allocator and the commit are the only
//! systems that touch them, so slot ownership stays in two places.
//!
//! A shot's targets are fixed by its collision layers at fire time: terrain and
//! arena bounds always, plus the opposing faction's hulls.

pub mod allocator;
pub mod commit;
pub mod components;
pub mod messages;
pub mod pool;

use bevy::prelude::*;

use crate::common::state::{ResolveSet, StepSet};

pub struct ProjectilesPlugin;

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<pool::ProjectilePools>()
            .add_message::<messages::FireRequest>()
            .add_systems(Startup, pool::init_projectile_pools);

        app.add_systems(
            Update,
            allocator::allocate_fire_requests.in_set(StepSet::Fire),
        );

        app.add_systems(
            FixedPostUpdate,
            commit::return_to_pool_commit.in_set(ResolveSet::Commit),
        );
    }
}

#[cfg(test)]
mod tests;
