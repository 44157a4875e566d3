use bevy::prelude::*;

use crate::plugins::combat::damage::{self, DamageRules, Health, HitOutcome, MobilityState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Hostile,
}

/// Which stat profile a vehicle was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleClass {
    Player,
    Basic,
    Heavy,
}

impl VehicleClass {
    #[inline]
    pub fn faction(self) -> Faction {
        match self {
            Self::Player => Faction::Player,
            Self::Basic | Self::Heavy => Faction::Hostile,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementPolicy {
    /// Velocity comes from player input.
    Driven,
    Stationary,
    /// Close in on the player until inside `CHASE_STANDOFF` of fire range.
    Chase,
}

/// Stats that distinguish vehicle variants. Combat rules are the same for all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleProfile {
    pub max_health: u32,
    pub damage: DamageRules,
    pub move_speed: f32,
    pub fire_cooldown_secs: f32,
    pub fire_range: f32,
    pub hull_radius: f32,
    pub movement: MovementPolicy,
}

impl VehicleProfile {
    pub const PLAYER: Self = Self {
        max_health: 100,
        damage: DamageRules {
            damage_per_hit: 10,
            immobilise_threshold: 0,
        },
        move_speed: 160.0,
        fire_cooldown_secs: 0.0,
        fire_range: f32::INFINITY,
        hull_radius: 16.0,
        movement: MovementPolicy::Driven,
    };

    pub const BASIC: Self = Self {
        max_health: 30,
        damage: DamageRules {
            damage_per_hit: 10,
            immobilise_threshold: 10,
        },
        move_speed: 70.0,
        fire_cooldown_secs: 2.0,
        fire_range: 420.0,
        hull_radius: 16.0,
        movement: MovementPolicy::Chase,
    };

    pub const HEAVY: Self = Self {
        max_health: 80,
        damage: DamageRules {
            damage_per_hit: 10,
            immobilise_threshold: 20,
        },
        move_speed: 45.0,
        fire_cooldown_secs: 1.2,
        fire_range: 520.0,
        hull_radius: 24.0,
        movement: MovementPolicy::Stationary,
    };

    pub fn for_class(class: VehicleClass) -> Self {
        match class {
            VehicleClass::Player => Self::PLAYER,
            VehicleClass::Basic => Self::BASIC,
            VehicleClass::Heavy => Self::HEAVY,
        }
    }
}

/// A combatant. The entity carrying this is also its hull collider.
#[derive(Component, Debug, Clone)]
pub struct Vehicle {
    pub class: VehicleClass,
    pub profile: VehicleProfile,
    pub health: Health,
}

impl Vehicle {
    pub fn new(class: VehicleClass) -> Self {
        Self::with_profile(class, VehicleProfile::for_class(class))
    }

    pub fn with_profile(class: VehicleClass, profile: VehicleProfile) -> Self {
        Self {
            class,
            profile,
            health: Health::full(profile.max_health),
        }
    }

    #[inline]
    pub fn faction(&self) -> Faction {
        self.class.faction()
    }

    #[inline]
    pub fn mobility(&self) -> MobilityState {
        damage::mobility_state(self.health, self.profile.damage)
    }

    #[inline]
    pub fn take_hit(&mut self) -> HitOutcome {
        damage::apply_damage(&mut self.health, self.profile.damage)
    }
}

/// Firing origin and direction. Rotation in radians, 0 = +X.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Turret {
    pub rotation: f32,
}

impl Turret {
    pub fn aim_at(&mut self, from: Vec2, to: Vec2) {
        let d = to - from;
        if d.length_squared() > 1e-4 {
            self.rotation = d.y.atan2(d.x);
        }
    }
}

#[derive(Component, Deref, DerefMut)]
pub struct FireCooldown(pub Timer);

/// Roster sequence number a hostile was enlisted with.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enlisted(pub u32);

/// Child sprite drawn as the turret barrel.
#[derive(Component)]
pub struct TurretVisual;

/// Sampled player intent for this frame.
#[derive(Resource, Debug, Default)]
pub struct PlayerIntent {
    pub move_axis: Vec2,
    pub aim: Option<Vec2>,
    pub fire: bool,
}
