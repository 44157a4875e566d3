//! Collision layers.
//!
//! Pairwise blocking (vehicle vs vehicle, vehicle vs terrain) and hit detection
//! (projectile vs hull/tile/bounds) are both expressed as layer filters, so the
//! physics engine only reports pairs the combat rules care about.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    Terrain,
    Bounds,
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
}

/// Membership kept, filters cleared: the entity no longer interacts with anything.
#[inline]
pub fn non_interacting(membership: Layer) -> CollisionLayers {
    CollisionLayers::new(membership, [] as [Layer; 0])
}
