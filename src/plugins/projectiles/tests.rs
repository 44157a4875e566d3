//! Projectile pool tests: pre-spawn, fire, retire, commit.
//!
//! Systems run once against a hand-built world. Fire requests are written as
//! messages; nothing here depends on a physics step.

use std::f32::consts::FRAC_PI_2;

use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::allocator::{self, ProjectileSlots};
use super::commit;
use super::components::{PooledProjectile, Projectile, ProjectileState};
use super::messages::FireRequest;
use super::pool::{self, ProjectilePools};
use crate::common::layers::Layer;
use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;
use crate::plugins::encounter::Encounter;
use crate::plugins::vehicles::Faction;

// --------------------------------------------------------------------------------------
// Helpers
// --------------------------------------------------------------------------------------

fn setup_world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.init_resource::<ProjectilePools>();
    world.init_resource::<Encounter>();
    world.init_resource::<Messages<FireRequest>>();
    run_system_once(&mut world, pool::init_projectile_pools);
    world
}

fn request(faction: Faction, rotation: f32) -> FireRequest {
    FireRequest {
        faction,
        origin: Vec2::new(10.0, -20.0),
        rotation,
    }
}

fn fire_now(world: &mut World, req: FireRequest, fired_at: u32) -> bool {
    run_system_once(
        world,
        move |mut pools: ResMut<ProjectilePools>, mut slots: ProjectileSlots| {
            allocator::fire(&mut pools, &mut slots, &req, fired_at, 500.0)
        },
    )
}

fn active_of(world: &mut World, faction: Faction) -> Vec<Entity> {
    world
        .query::<(Entity, &PooledProjectile, &ProjectileState)>()
        .iter(world)
        .filter(|(_, p, s)| p.faction == faction && **s == ProjectileState::Active)
        .map(|(e, ..)| e)
        .collect()
}

// --------------------------------------------------------------------------------------
// Pools
// --------------------------------------------------------------------------------------

#[test]
fn init_spawns_both_pools_inactive() {
    let mut world = setup_world();

    let pools = world.resource::<ProjectilePools>();
    assert_eq!(pools.player.capacity(), 5);
    assert_eq!(pools.hostile.capacity(), 10);
    assert_eq!(pools.player.active_count(), 0);

    let mut q = world.query::<(
        &PooledProjectile,
        &ProjectileState,
        &Visibility,
        &CollisionLayers,
        &CollisionEventsEnabled,
    )>();
    assert_eq!(q.iter(&world).count(), 15);

    for (pooled, state, vis, layers, _) in q.iter(&world) {
        assert_eq!(*state, ProjectileState::Inactive);
        assert_eq!(*vis, Visibility::Hidden);
        let membership = match pooled.faction {
            Faction::Player => Layer::PlayerBullet,
            Faction::Hostile => Layer::EnemyBullet,
        };
        assert!(layers.memberships.has_all(membership));
        assert!(!layers.filters.has_all(Layer::Terrain));
        assert!(!layers.filters.has_all(Layer::Bounds));
    }
}

#[test]
fn fire_launches_along_rotation_at_launch_speed() {
    let mut world = setup_world();

    assert!(fire_now(&mut world, request(Faction::Player, FRAC_PI_2), 3));

    let active = active_of(&mut world, Faction::Player);
    assert_eq!(active.len(), 1);
    let e = active[0];

    let vel = world.get::<LinearVelocity>(e).unwrap().0;
    assert!((vel - Vec2::new(0.0, 500.0)).length() < 1e-3);
    assert_eq!(
        world.get::<Transform>(e).unwrap().translation.truncate(),
        Vec2::new(10.0, -20.0)
    );
    assert_eq!(*world.get::<Visibility>(e).unwrap(), Visibility::Visible);
    assert_eq!(world.get::<Projectile>(e).unwrap().fired_at, 3);

    let layers = world.get::<CollisionLayers>(e).unwrap();
    assert!(layers.filters.has_all(Layer::Terrain));
    assert!(layers.filters.has_all(Layer::Bounds));
    assert!(layers.filters.has_all(Layer::Enemy));
    assert!(!layers.filters.has_all(Layer::Player));
}

#[test]
fn hostile_shots_target_the_player_layer() {
    let mut world = setup_world();

    assert!(fire_now(&mut world, request(Faction::Hostile, 0.0), 0));

    let e = active_of(&mut world, Faction::Hostile)[0];
    let layers = world.get::<CollisionLayers>(e).unwrap();
    assert!(layers.memberships.has_all(Layer::EnemyBullet));
    assert!(layers.filters.has_all(Layer::Player));
    assert!(!layers.filters.has_all(Layer::Enemy));
    assert_eq!(world.resource::<ProjectilePools>().player.active_count(), 0);
}

#[test]
fn sixth_player_shot_is_dropped() {
    let mut world = setup_world();

    for _ in 0..6 {
        world.write_message(request(Faction::Player, 0.0));
    }
    run_system_once(&mut world, allocator::allocate_fire_requests);

    assert_eq!(active_of(&mut world, Faction::Player).len(), 5);
    let pools = world.resource::<ProjectilePools>();
    assert!(pools.player.is_exhausted());
    assert_eq!(pools.player.capacity(), 5);

    assert!(!fire_now(&mut world, request(Faction::Player, 0.0), 0));
}

#[test]
fn allocator_stamps_roster_sequence() {
    let mut world = setup_world();
    {
        let mut encounter = world.resource_mut::<Encounter>();
        let a = Entity::PLACEHOLDER;
        encounter.enlist_hostile(a);
        encounter.enlist_hostile(a);
    }

    world.write_message(request(Faction::Player, 0.0));
    run_system_once(&mut world, allocator::allocate_fire_requests);

    let e = active_of(&mut world, Faction::Player)[0];
    assert_eq!(world.get::<Projectile>(e).unwrap().fired_at, 2);
}

#[test]
fn allocator_refuses_after_player_destroyed() {
    let mut world = setup_world();
    world.resource_mut::<Encounter>().end_with_player_destroyed();

    world.write_message(request(Faction::Player, 0.0));
    world.write_message(request(Faction::Hostile, 0.0));
    run_system_once(&mut world, allocator::allocate_fire_requests);

    assert!(active_of(&mut world, Faction::Player).is_empty());
    assert!(active_of(&mut world, Faction::Hostile).is_empty());
}

// --------------------------------------------------------------------------------------
// Retire / commit
// --------------------------------------------------------------------------------------

#[test]
fn retire_only_from_active() {
    let mut state = ProjectileState::Inactive;
    assert!(!state.retire());
    assert_eq!(state, ProjectileState::Inactive);

    state = ProjectileState::Active;
    assert!(state.retire());
    assert_eq!(state, ProjectileState::PendingReturn);
    assert!(!state.retire());
}

#[test]
fn commit_restores_inactive_invariants_and_frees_slot() {
    let mut world = setup_world();
    assert!(fire_now(&mut world, request(Faction::Player, 0.0), 0));
    let e = active_of(&mut world, Faction::Player)[0];

    assert!(world.get_mut::<ProjectileState>(e).unwrap().retire());
    run_system_once(&mut world, commit::return_to_pool_commit);

    assert_eq!(
        *world.get::<ProjectileState>(e).unwrap(),
        ProjectileState::Inactive
    );
    assert_eq!(*world.get::<Visibility>(e).unwrap(), Visibility::Hidden);
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::ZERO);
    let layers = world.get::<CollisionLayers>(e).unwrap();
    assert!(!layers.filters.has_all(Layer::Terrain));
    assert!(!layers.filters.has_all(Layer::Enemy));
    assert_eq!(world.resource::<ProjectilePools>().player.active_count(), 0);

    // A second commit has nothing pending and frees nothing twice.
    run_system_once(&mut world, commit::return_to_pool_commit);
    assert_eq!(world.resource::<ProjectilePools>().player.active_count(), 0);
    assert_eq!(world.resource::<ProjectilePools>().player.capacity(), 5);
}

#[test]
fn freed_slot_can_fire_again() {
    let mut world = setup_world();
    for _ in 0..5 {
        assert!(fire_now(&mut world, request(Faction::Player, 0.0), 0));
    }
    assert!(!fire_now(&mut world, request(Faction::Player, 0.0), 0));

    let e = active_of(&mut world, Faction::Player)[0];
    world.get_mut::<ProjectileState>(e).unwrap().retire();
    run_system_once(&mut world, commit::return_to_pool_commit);

    assert!(fire_now(&mut world, request(Faction::Player, 0.0), 0));
    assert_eq!(active_of(&mut world, Faction::Player).len(), 5);
}
