//! Buffered fire requests.
//!
//! Producers (player input, hostile AI) only write intent; the allocator is the
//! single writer to the projectile pools.

use bevy::prelude::*;

use crate::plugins::vehicles::Faction;

#[derive(Message, Clone, Copy, Debug)]
pub struct FireRequest {
    pub faction: Faction,
    pub origin: Vec2,
    /// Turret rotation in radians.
    pub rotation: f32,
}
