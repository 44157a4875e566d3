//! Encounter director: owns the roster, the score and the encounter-wide flags.
//!
//! `Encounter` is the single simulation-state struct for one fight. The director
//! builds it from `LevelData` on entering `InGame`; the combat resolver is the
//! only other writer (damage outcomes, score, player destruction).
//!
//! ```text
//! OnEnter(InGame): build_encounter
//!   - player spawn   -> player hull
//!   - enemy/boss     -> hostile hulls, enlisted in declaration order
//!   - explosion pool -> capacity = hostiles + 1
//! Update:          StepSet::{Input, Player, Hostiles, Fire} (while running)
//! FixedPostUpdate: ResolveSet::{Resolve, Commit} (after avian collision messages)
//! ```

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::{GameState, ResolveSet, StepSet};
use crate::plugins::effects;
use crate::plugins::level::{LevelData, SpawnKind};
use crate::plugins::vehicles::{self, Enlisted, Vehicle, VehicleClass};

pub fn plugin(app: &mut App) {
    app.init_resource::<Encounter>()
        .configure_sets(
            Update,
            (
                StepSet::Input,
                StepSet::Player,
                StepSet::Hostiles,
                StepSet::Fire,
            )
                .chain()
                .run_if(in_state(GameState::InGame))
                .run_if(encounter_running),
        )
        .configure_sets(
            FixedPostUpdate,
            (ResolveSet::Resolve, ResolveSet::Commit)
                .chain()
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(OnEnter(GameState::InGame), build_encounter);
}

/// Run condition: the encounter has not been paused by the player's destruction.
pub fn encounter_running(encounter: Res<Encounter>) -> bool {
    encounter.is_running()
}

#[derive(Resource, Debug)]
pub struct Encounter {
    player: Option<Entity>,
    hostiles: Vec<Entity>,
    next_seq: u32,
    score: u32,
    input_enabled: bool,
    paused: bool,
    player_destroyed: bool,
}

impl Default for Encounter {
    fn default() -> Self {
        Self {
            player: None,
            hostiles: Vec::new(),
            next_seq: 0,
            score: 0,
            input_enabled: true,
            paused: false,
            player_destroyed: false,
        }
    }
}

impl Encounter {
    #[inline]
    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn set_player(&mut self, player: Entity) {
        self.player = Some(player);
    }

    /// Active hostiles in roster order.
    #[inline]
    pub fn hostiles(&self) -> &[Entity] {
        &self.hostiles
    }

    /// Append a hostile to the roster and return its enlistment number.
    pub fn enlist_hostile(&mut self, hostile: Entity) -> u32 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.hostiles.push(hostile);
        seq
    }

    /// Enlistment number the next hostile will get. A shot fired now can hit
    /// every hostile enlisted below this.
    #[inline]
    pub fn roster_seq(&self) -> u32 {
        self.next_seq
    }

    /// Linear lookup by entity identity.
    pub fn roster_index(&self, hull: Entity) -> Option<usize> {
        self.hostiles.iter().position(|&e| e == hull)
    }

    pub fn remove_hostile(&mut self, index: usize) -> Entity {
        self.hostiles.remove(index)
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    #[inline]
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        !self.paused
    }

    #[inline]
    pub fn player_destroyed(&self) -> bool {
        self.player_destroyed
    }

    /// Terminal transition on player destruction: input off, roster cleared,
    /// simulation paused. Returns `false` if it already happened.
    pub fn end_with_player_destroyed(&mut self) -> bool {
        if self.player_destroyed {
            return false;
        }
        self.player_destroyed = true;
        self.input_enabled = false;
        self.paused = true;
        self.hostiles.clear();
        true
    }
}

/// Build the roster from the level's spawn declarations.
pub fn build_encounter(
    mut commands: Commands,
    level: Res<LevelData>,
    mut encounter: ResMut<Encounter>,
) {
    if let Err(err) = level.validate() {
        warn!("Level rejected, encounter not built: {err}");
        return;
    }

    *encounter = Encounter::default();

    // The player goes first so every hostile has something to target.
    for decl in level.spawns.iter().filter(|d| d.kind == SpawnKind::Player) {
        let player = vehicles::spawn_vehicle(
            &mut commands,
            Vehicle::new(VehicleClass::Player),
            decl.position,
        );
        encounter.set_player(player);
    }

    for decl in &level.spawns {
        let class = match decl.kind {
            SpawnKind::Player => continue,
            SpawnKind::Enemy => VehicleClass::Basic,
            SpawnKind::Boss => VehicleClass::Heavy,
        };
        let hostile = vehicles::spawn_vehicle(&mut commands, Vehicle::new(class), decl.position);
        let seq = encounter.enlist_hostile(hostile);
        commands.entity(hostile).insert(Enlisted(seq));
    }

    // Enough for every hostile going up at once, plus the player.
    let capacity = level.hostile_spawn_count() + 1;
    let pool = effects::spawn_explosion_pool(&mut commands, capacity);
    commands.insert_resource(pool);

    info!(
        "Encounter built: {} hostiles, explosion pool {capacity}",
        encounter.hostiles().len()
    );
}
