//! Combat resolver: turns physics contacts into damage, score and effects.
//!
//! Every contact is classified once, by what each side *is*:
//!
//! ```text
//! (category A, category B)               -> Contact
//! ---------------------------------------------------------------
//! (Projectile(_),       Tile)            -> TerrainHit
//! (Projectile(Hostile), Hull(Player))    -> PlayerHit
//! (Projectile(Player),  Hull(Hostile))   -> HostileHit
//! (Projectile(_),       Bounds)          -> BoundaryExit
//! anything else                          -> ignored
//! ```
//!
//! Order within a pair does not matter. The resolver only marks projectiles
//! `PendingReturn`; `ResolveSet::Commit` hands them back to their pool.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::layers::{Layer, non_interacting};
use crate::common::state::ResolveSet;
use crate::common::tunables::{TargetBinding, Tunables};
use crate::plugins::effects::ExplosionSpawner;
use crate::plugins::encounter::Encounter;
use crate::plugins::level::LevelData;
use crate::plugins::projectiles::components::{PooledProjectile, Projectile, ProjectileState};
use crate::plugins::vehicles::{Enlisted, Faction, Vehicle};
use crate::plugins::world::{ArenaWall, TerrainTile, passable_terrain_layers};

pub mod damage;

use damage::{Erosion, advance_tile_damage};

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedPostUpdate,
        resolve_collisions.in_set(ResolveSet::Resolve),
    );
}

/// What one side of a contact is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Projectile(Faction),
    Hull(Faction),
    Tile,
    Bounds,
}

/// A contact the resolver has a handler for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    TerrainHit { projectile: Entity, tile: Entity },
    PlayerHit { projectile: Entity, hull: Entity },
    HostileHit { projectile: Entity, hull: Entity },
    BoundaryExit { projectile: Entity },
}

/// Map a categorised pair to its handler. `None` for pairs nobody handles.
pub fn resolve_pair(a: (Entity, Category), b: (Entity, Category)) -> Option<Contact> {
    use Category::*;

    match (a.1, b.1) {
        (Projectile(_), Tile) => Some(Contact::TerrainHit {
            projectile: a.0,
            tile: b.0,
        }),
        (Projectile(Faction::Hostile), Hull(Faction::Player)) => Some(Contact::PlayerHit {
            projectile: a.0,
            hull: b.0,
        }),
        (Projectile(Faction::Player), Hull(Faction::Hostile)) => Some(Contact::HostileHit {
            projectile: a.0,
            hull: b.0,
        }),
        (Projectile(_), Bounds) => Some(Contact::BoundaryExit { projectile: a.0 }),
        (Projectile(_), _) => None,
        (_, Projectile(_)) => resolve_pair(b, a),
        _ => None,
    }
}

type ProjectileQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static PooledProjectile,
        &'static Projectile,
        &'static mut ProjectileState,
    ),
>;

type HullQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Vehicle,
        &'static Transform,
        &'static mut CollisionLayers,
        &'static mut LinearVelocity,
        Option<&'static Enlisted>,
    ),
    Without<TerrainTile>,
>;

type TileQuery<'w, 's> =
    Query<'w, 's, (&'static mut TerrainTile, &'static mut CollisionLayers), Without<Vehicle>>;

/// Contacts report colliders; gameplay state lives on the body.
#[inline]
fn gameplay_owner(collider: Entity, body: Option<Entity>) -> Entity {
    body.unwrap_or(collider)
}

fn categorize(
    e: Entity,
    projectiles: &ProjectileQuery,
    hulls: &HullQuery,
    tiles: &TileQuery,
    walls: &Query<(), With<ArenaWall>>,
) -> Option<Category> {
    if let Ok((pooled, ..)) = projectiles.get(e) {
        return Some(Category::Projectile(pooled.faction));
    }
    if let Ok((vehicle, ..)) = hulls.get(e) {
        return Some(Category::Hull(vehicle.faction()));
    }
    if tiles.contains(e) {
        return Some(Category::Tile);
    }
    if walls.contains(e) {
        return Some(Category::Bounds);
    }
    None
}

#[allow(clippy::too_many_arguments)]
pub fn resolve_collisions(
    mut started: MessageReader<CollisionStart>,
    mut encounter: ResMut<Encounter>,
    tunables: Res<Tunables>,
    level: Res<LevelData>,
    mut projectiles: ProjectileQuery,
    mut hulls: HullQuery,
    mut tiles: TileQuery,
    walls: Query<(), With<ArenaWall>>,
    mut explosions: ExplosionSpawner,
) {
    for ev in started.read() {
        let e1 = gameplay_owner(ev.collider1, ev.body1);
        let e2 = gameplay_owner(ev.collider2, ev.body2);

        let Some(c1) = categorize(e1, &projectiles, &hulls, &tiles, &walls) else {
            continue;
        };
        let Some(c2) = categorize(e2, &projectiles, &hulls, &tiles, &walls) else {
            continue;
        };
        let Some(contact) = resolve_pair((e1, c1), (e2, c2)) else {
            continue;
        };

        match contact {
            Contact::TerrainHit { projectile, tile } => {
                if !retire(&mut projectiles, projectile) {
                    continue;
                }
                let Ok((mut tile, mut layers)) = tiles.get_mut(tile) else {
                    continue;
                };
                if let Erosion::Advanced(state) = advance_tile_damage(&mut tile.state, &level.stages)
                {
                    if !state.collides {
                        *layers = passable_terrain_layers();
                        debug!("Tile {} eroded to passable", tile.cell);
                    }
                }
            }

            Contact::BoundaryExit { projectile } => {
                retire(&mut projectiles, projectile);
            }

            Contact::PlayerHit { projectile, hull } => {
                if encounter.player() != Some(hull) {
                    continue;
                }
                if !retire(&mut projectiles, projectile) {
                    continue;
                }
                let Ok((mut vehicle, tf, _, mut vel, _)) = hulls.get_mut(hull) else {
                    continue;
                };

                let outcome = vehicle.take_hit();
                if outcome.after == damage::MobilityState::Destroyed
                    && encounter.end_with_player_destroyed()
                {
                    vel.0 = Vec2::ZERO;
                    explosions.trigger_at(tf.translation.truncate());
                    info!("Player destroyed; encounter over with score {}", encounter.score());
                }
            }

            Contact::HostileHit { projectile, hull } => {
                // A hull that already left the roster is a wreck: nothing to resolve.
                let Some(index) = encounter.roster_index(hull) else {
                    debug!("Hit on {hull:?} ignored: not on the roster");
                    continue;
                };
                if !can_hit(&projectiles, &hulls, projectile, hull, tunables.target_binding) {
                    continue;
                }
                if !retire(&mut projectiles, projectile) {
                    continue;
                }
                let Ok((mut vehicle, tf, mut layers, mut vel, _)) = hulls.get_mut(hull) else {
                    continue;
                };

                let outcome = vehicle.take_hit();
                let position = tf.translation.truncate();

                if outcome.entered_immobilised() {
                    explosions.trigger_at(position);
                    encounter.add_score(tunables.immobilise_score);
                    info!(
                        "{:?} immobilised at {position}; score {}",
                        vehicle.class,
                        encounter.score()
                    );
                }

                if outcome.destroyed() {
                    encounter.remove_hostile(index);
                    *layers = non_interacting(Layer::Enemy);
                    vel.0 = Vec2::ZERO;
                    encounter.add_score(tunables.destroy_score);
                    info!(
                        "{:?} destroyed at {position}; {} hostiles left, score {}",
                        vehicle.class,
                        encounter.hostiles().len(),
                        encounter.score()
                    );
                }
            }
        }
    }
}

/// Mark a projectile for return. `false` if it was already retired this step.
fn retire(projectiles: &mut ProjectileQuery, projectile: Entity) -> bool {
    projectiles
        .get_mut(projectile)
        .is_ok_and(|(_, _, mut state)| state.retire())
}

/// With snapshot binding a shot only hits hostiles enlisted before it was fired.
fn can_hit(
    projectiles: &ProjectileQuery,
    hulls: &HullQuery,
    projectile: Entity,
    hull: Entity,
    binding: TargetBinding,
) -> bool {
    match binding {
        TargetBinding::Live => true,
        TargetBinding::Snapshot => {
            let Ok((_, shot, _)) = projectiles.get(projectile) else {
                return false;
            };
            let Ok((.., enlisted)) = hulls.get(hull) else {
                return false;
            };
            enlisted.is_some_and(|e| e.0 < shot.fired_at)
        }
    }
}
