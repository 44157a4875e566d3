use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::{
    CHASE_STANDOFF, Faction, FireCooldown, PlayerIntent, Turret, TurretVisual, Vehicle,
    VehicleClass, VehicleProfile, hull_layers,
};
use crate::common::layers::Layer;
use crate::common::test_utils::run_system_once;
use crate::plugins::combat::damage::MobilityState;
use crate::plugins::encounter::Encounter;
use crate::plugins::projectiles::messages::FireRequest;

fn setup_world() -> World {
    let mut world = World::new();
    world.init_resource::<Encounter>();
    world.init_resource::<PlayerIntent>();
    world.init_resource::<Messages<FireRequest>>();
    world.insert_resource(Time::<()>::default());
    world
}

fn spawn(world: &mut World, vehicle: Vehicle, position: Vec2) -> Entity {
    run_system_once(world, move |mut commands: Commands| {
        super::spawn_vehicle(&mut commands, vehicle.clone(), position)
    })
}

fn fire_requests(world: &mut World) -> Vec<FireRequest> {
    world
        .resource_mut::<Messages<FireRequest>>()
        .drain()
        .collect()
}

fn wreck(vehicle: &mut Vehicle) {
    while vehicle.mobility() != MobilityState::Destroyed {
        vehicle.take_hit();
    }
}

#[test]
fn profiles_differ_only_in_stats() {
    assert_eq!(VehicleClass::Player.faction(), Faction::Player);
    assert_eq!(VehicleClass::Basic.faction(), Faction::Hostile);
    assert_eq!(VehicleClass::Heavy.faction(), Faction::Hostile);

    let heavy = Vehicle::new(VehicleClass::Heavy);
    assert_eq!(heavy.profile, VehicleProfile::HEAVY);
    assert_eq!(heavy.health.current(), VehicleProfile::HEAVY.max_health);
    assert_eq!(heavy.mobility(), MobilityState::Healthy);
}

#[test]
fn spawn_vehicle_builds_hull_and_barrel() {
    let mut world = setup_world();
    let hostile = spawn(&mut world, Vehicle::new(VehicleClass::Basic), Vec2::new(40.0, 0.0));

    let e = world.entity(hostile);
    assert!(e.contains::<FireCooldown>());
    assert!(matches!(e.get::<RigidBody>(), Some(RigidBody::Dynamic)));
    let layers = e.get::<CollisionLayers>().unwrap();
    assert!(layers.memberships.has_all(Layer::Enemy));
    assert!(layers.filters.has_all(Layer::Terrain));
    assert!(layers.filters.has_all(Layer::PlayerBullet));
    assert!(!layers.filters.has_all(Layer::EnemyBullet));

    let barrels = world
        .query_filtered::<&ChildOf, With<TurretVisual>>()
        .iter(&world)
        .filter(|c| c.parent() == hostile)
        .count();
    assert_eq!(barrels, 1);

    let player = spawn(&mut world, Vehicle::new(VehicleClass::Player), Vec2::ZERO);
    assert!(!world.entity(player).contains::<FireCooldown>());
}

#[test]
fn player_and_hostile_layers_are_complementary() {
    let player = hull_layers(Faction::Player);
    let hostile = hull_layers(Faction::Hostile);

    assert!(player.filters.has_all(Layer::Enemy));
    assert!(hostile.filters.has_all(Layer::Player));
    assert!(player.filters.has_all(Layer::EnemyBullet));
    assert!(!player.filters.has_all(Layer::PlayerBullet));
}

#[test]
fn player_follows_intent_and_requests_fire() {
    let mut world = setup_world();
    let player = spawn(&mut world, Vehicle::new(VehicleClass::Player), Vec2::ZERO);
    world.resource_mut::<Encounter>().set_player(player);
    *world.resource_mut::<PlayerIntent>() = PlayerIntent {
        move_axis: Vec2::X,
        aim: Some(Vec2::new(0.0, 100.0)),
        fire: true,
    };

    run_system_once(&mut world, super::update_player);

    let speed = VehicleProfile::PLAYER.move_speed;
    assert_eq!(world.get::<LinearVelocity>(player).unwrap().0, Vec2::X * speed);

    let requests = fire_requests(&mut world);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].faction, Faction::Player);
    assert!((requests[0].rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
}

#[test]
fn destroyed_player_does_not_move_or_fire() {
    let mut world = setup_world();
    let mut vehicle = Vehicle::new(VehicleClass::Player);
    wreck(&mut vehicle);
    let player = spawn(&mut world, vehicle, Vec2::ZERO);
    world.resource_mut::<Encounter>().set_player(player);
    *world.resource_mut::<PlayerIntent>() = PlayerIntent {
        move_axis: Vec2::Y,
        aim: None,
        fire: true,
    };

    run_system_once(&mut world, super::update_player);

    assert_eq!(world.get::<LinearVelocity>(player).unwrap().0, Vec2::ZERO);
    assert!(fire_requests(&mut world).is_empty());
}

#[test]
fn chaser_closes_in_until_standoff() {
    let mut world = setup_world();
    let player = spawn(&mut world, Vehicle::new(VehicleClass::Player), Vec2::ZERO);
    world.resource_mut::<Encounter>().set_player(player);

    let range = VehicleProfile::BASIC.fire_range;
    let far = spawn(&mut world, Vehicle::new(VehicleClass::Basic), Vec2::new(range * 2.0, 0.0));
    let near = spawn(
        &mut world,
        Vehicle::new(VehicleClass::Basic),
        Vec2::new(range * CHASE_STANDOFF * 0.5, 0.0),
    );
    for hostile in [far, near] {
        world.resource_mut::<Encounter>().enlist_hostile(hostile);
    }

    run_system_once(&mut world, super::update_hostiles);

    let v_far = world.get::<LinearVelocity>(far).unwrap().0;
    assert!(v_far.x < 0.0, "moves toward the player");
    assert_eq!(world.get::<LinearVelocity>(near).unwrap().0, Vec2::ZERO);

    let turret = world.get::<Turret>(far).unwrap();
    assert!((turret.rotation.abs() - std::f32::consts::PI).abs() < 1e-5);
}

#[test]
fn hostile_fires_in_range_when_cooldown_elapsed() {
    let mut world = setup_world();
    let player = spawn(&mut world, Vehicle::new(VehicleClass::Player), Vec2::ZERO);
    world.resource_mut::<Encounter>().set_player(player);

    let heavy = spawn(&mut world, Vehicle::new(VehicleClass::Heavy), Vec2::new(200.0, 0.0));
    world.resource_mut::<Encounter>().enlist_hostile(heavy);

    // Cooldown still running: no shot.
    run_system_once(&mut world, super::update_hostiles);
    assert!(fire_requests(&mut world).is_empty());

    world
        .get_mut::<FireCooldown>(heavy)
        .unwrap()
        .tick(std::time::Duration::from_secs(5));
    run_system_once(&mut world, super::update_hostiles);

    let requests = fire_requests(&mut world);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].faction, Faction::Hostile);
    assert_eq!(requests[0].origin, Vec2::new(200.0, 0.0));
}

#[test]
fn hostiles_off_the_roster_are_not_updated() {
    let mut world = setup_world();
    let player = spawn(&mut world, Vehicle::new(VehicleClass::Player), Vec2::ZERO);
    world.resource_mut::<Encounter>().set_player(player);

    let range = VehicleProfile::BASIC.fire_range;
    let hostile = spawn(&mut world, Vehicle::new(VehicleClass::Basic), Vec2::new(range * 2.0, 0.0));
    world.resource_mut::<Encounter>().enlist_hostile(hostile);
    world.resource_mut::<Encounter>().end_with_player_destroyed();

    run_system_once(&mut world, super::update_hostiles);

    assert_eq!(world.get::<LinearVelocity>(hostile).unwrap().0, Vec2::ZERO);
    assert!(fire_requests(&mut world).is_empty());
}

#[test]
fn immobilised_hostile_holds_still() {
    let mut world = setup_world();
    let player = spawn(&mut world, Vehicle::new(VehicleClass::Player), Vec2::ZERO);
    world.resource_mut::<Encounter>().set_player(player);

    let mut vehicle = Vehicle::new(VehicleClass::Basic);
    vehicle.take_hit();
    vehicle.take_hit();
    assert_eq!(vehicle.mobility(), MobilityState::Immobilised);

    let range = VehicleProfile::BASIC.fire_range;
    let hostile = spawn(&mut world, vehicle, Vec2::new(range * 2.0, 0.0));
    world.resource_mut::<Encounter>().enlist_hostile(hostile);

    run_system_once(&mut world, super::update_hostiles);

    assert_eq!(world.get::<LinearVelocity>(hostile).unwrap().0, Vec2::ZERO);
}

#[test]
fn input_is_ignored_while_disabled() {
    let mut world = setup_world();
    world.resource_mut::<Encounter>().end_with_player_destroyed();
    *world.resource_mut::<PlayerIntent>() = PlayerIntent {
        move_axis: Vec2::X,
        aim: None,
        fire: true,
    };

    run_system_once(&mut world, super::gather_player_input);

    let intent = world.resource::<PlayerIntent>();
    assert_eq!(intent.move_axis, Vec2::ZERO);
    assert!(!intent.fire);
}
