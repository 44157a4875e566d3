//! Damage model: pure state transitions for vehicle health and tile erosion.
//!
//! Nothing in here touches the ECS. The resolver feeds component data in and
//! writes the results back.

use bevy::platform::collections::HashMap;

// -----------------------------------------------------------------------------
// Vehicles
// -----------------------------------------------------------------------------

/// Per-profile damage rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRules {
    pub damage_per_hit: u32,
    /// Health at or below this (but above zero) is Immobilised.
    pub immobilise_threshold: u32,
}

/// Health bounded to `[0, max]`. Only ever goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    #[inline]
    pub fn current(self) -> u32 {
        self.current
    }

    #[inline]
    pub fn max(self) -> u32 {
        self.max
    }
}

/// Ordered: a vehicle only ever moves to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MobilityState {
    Healthy,
    Immobilised,
    Destroyed,
}

pub fn mobility_state(health: Health, rules: DamageRules) -> MobilityState {
    if health.current == 0 {
        MobilityState::Destroyed
    } else if health.current <= rules.immobilise_threshold {
        MobilityState::Immobilised
    } else {
        MobilityState::Healthy
    }
}

/// Result of one `apply_damage` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub before: MobilityState,
    pub after: MobilityState,
}

impl HitOutcome {
    /// First crossing of the immobilise threshold.
    ///
    /// A hit that goes straight from Healthy to Destroyed also crosses it, once.
    /// A vehicle that was already Immobilised (or Destroyed) never fires it again.
    #[inline]
    pub fn entered_immobilised(self) -> bool {
        self.before == MobilityState::Healthy && self.after != MobilityState::Healthy
    }

    /// This hit is the one that destroyed the vehicle.
    #[inline]
    pub fn destroyed(self) -> bool {
        self.before != MobilityState::Destroyed && self.after == MobilityState::Destroyed
    }
}

/// Subtract one hit's worth of damage, saturating at zero.
pub fn apply_damage(health: &mut Health, rules: DamageRules) -> HitOutcome {
    let before = mobility_state(*health, rules);
    health.current = health.current.saturating_sub(rules.damage_per_hit);
    let after = mobility_state(*health, rules);
    HitOutcome { before, after }
}

// -----------------------------------------------------------------------------
// Terrain
// -----------------------------------------------------------------------------

/// One erosion stage of a destructible tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileStage {
    pub collides: bool,
}

/// Stage definitions keyed by tileset-local id.
///
/// Tile indices placed in the level are global ids (`first_gid + local`), the
/// way tile maps number tiles across tilesets. Erosion moves a tile to the
/// next local id.
#[derive(Debug, Clone, Default)]
pub struct TileStageTable {
    first_gid: u32,
    stages: HashMap<u32, TileStage>,
}

impl TileStageTable {
    pub fn new(first_gid: u32) -> Self {
        Self {
            first_gid,
            stages: HashMap::default(),
        }
    }

    pub fn with_stage(mut self, local_id: u32, stage: TileStage) -> Self {
        self.stages.insert(local_id, stage);
        self
    }

    #[inline]
    pub fn first_gid(&self) -> u32 {
        self.first_gid
    }

    /// Stage for a global tile index, if the table defines one.
    pub fn stage(&self, index: u32) -> Option<TileStage> {
        let local = index.checked_sub(self.first_gid)?;
        self.stages.get(&local).copied()
    }

    /// Collidability a freshly placed tile starts with. Undefined stages are passable.
    pub fn initial_collides(&self, index: u32) -> bool {
        self.stage(index).is_some_and(|s| s.collides)
    }
}

/// Erosion state of one destructible tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileState {
    pub index: u32,
    pub collides: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Erosion {
    /// Tile moved to the next stage.
    Advanced(TileState),
    /// Tile is passable, or already sits on a stage the table does not define.
    /// Nothing changed.
    Terminal,
}

/// Move a tile to its next damage stage.
///
/// The index always advances. Collidability is copied from the table when the
/// new stage is defined and kept otherwise; a tile on an undefined stage erodes
/// no further. Stages never regress, and once a tile stops colliding it stays
/// that way.
pub fn advance_tile_damage(tile: &mut TileState, table: &TileStageTable) -> Erosion {
    if !tile.collides || table.stage(tile.index).is_none() {
        return Erosion::Terminal;
    }
    let Some(next) = tile.index.checked_add(1) else {
        return Erosion::Terminal;
    };

    tile.index = next;
    if let Some(stage) = table.stage(next) {
        tile.collides = stage.collides;
    }
    Erosion::Advanced(*tile)
}
