//! Tunable gameplay constants.

use bevy::prelude::*;

/// Which hostiles a player shot may hit.
///
/// `Snapshot`: only hostiles already on the roster when the shot was fired.
/// `Live`: any hostile on the roster when the hit is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetBinding {
    #[default]
    Snapshot,
    Live,
}

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    /// Projectile launch speed in world units per second.
    pub launch_speed: f32,
    pub player_pool_capacity: usize,
    pub hostile_pool_capacity: usize,
    pub immobilise_score: u32,
    pub destroy_score: u32,
    pub explosion_frames: u32,
    pub explosion_fps: f32,
    pub target_binding: TargetBinding,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            launch_speed: 500.0,
            player_pool_capacity: 5,
            hostile_pool_capacity: 10,
            immobilise_score: 5,
            destroy_score: 10,
            explosion_frames: 24,
            explosion_fps: 24.0,
            target_binding: TargetBinding::Snapshot,
        }
    }
}
