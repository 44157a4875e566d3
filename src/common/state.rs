//! Global state machine and schedule ordering.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
}

/// Per-frame encounter step (`Update`).
///
/// Player state must be current before hostiles read it, and fire requests
/// written by either side are allocated at the end of the same step.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepSet {
    Input,
    Player,
    Hostiles,
    Fire,
}

/// Collision pipeline (`FixedPostUpdate`, after avian writes collision messages).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveSet {
    /// Contacts become damage, erosion and retired projectiles.
    Resolve,
    /// Retired projectiles go back to their pool.
    Commit,
}
