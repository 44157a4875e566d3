use bevy::prelude::*;

use crate::common::pool::SlotHandle;
use crate::plugins::vehicles::Faction;

/// A pre-spawned projectile owned by one faction's pool.
#[derive(Component, Debug, Clone, Copy)]
pub struct PooledProjectile {
    pub faction: Faction,
    pub slot: SlotHandle,
}

/// Lifecycle of a pooled projectile.
///
/// `Active -> PendingReturn` is the retire step (resolver); `PendingReturn ->
/// Inactive` is the commit step, which hands the slot back to the pool. Both
/// transitions only fire from their source state, so retiring twice is a no-op.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

impl ProjectileState {
    /// Mark an active projectile for return. `false` if it was not active.
    #[inline]
    pub fn retire(&mut self) -> bool {
        if *self != Self::Active {
            return false;
        }
        *self = Self::PendingReturn;
        true
    }
}

/// Per-shot data written at fire time.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Projectile {
    /// Roster sequence number when the shot was fired.
    pub fired_at: u32,
}
