use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{PooledProjectile, Projectile, ProjectileState};
use crate::common::layers::{Layer, non_interacting};
use crate::common::pool::SlotPool;
use crate::common::tunables::Tunables;
use crate::plugins::vehicles::Faction;

pub const PROJECTILE_Z: f32 = 2.0;
const PROJECTILE_RADIUS: f32 = 3.0;

/// Two independent bounded pools, one per firing faction.
#[derive(Resource, Debug, Default)]
pub struct ProjectilePools {
    pub player: SlotPool<Entity>,
    pub hostile: SlotPool<Entity>,
}

impl ProjectilePools {
    #[inline]
    pub fn pool(&self, faction: Faction) -> &SlotPool<Entity> {
        match faction {
            Faction::Player => &self.player,
            Faction::Hostile => &self.hostile,
        }
    }

    #[inline]
    pub fn pool_mut(&mut self, faction: Faction) -> &mut SlotPool<Entity> {
        match faction {
            Faction::Player => &mut self.player,
            Faction::Hostile => &mut self.hostile,
        }
    }
}

#[inline]
fn membership(faction: Faction) -> Layer {
    match faction {
        Faction::Player => Layer::PlayerBullet,
        Faction::Hostile => Layer::EnemyBullet,
    }
}

/// Terrain and bounds always; hulls of the opposing faction only.
#[inline]
pub fn active_projectile_layers(faction: Faction) -> CollisionLayers {
    let target = match faction {
        Faction::Player => Layer::Enemy,
        Faction::Hostile => Layer::Player,
    };
    CollisionLayers::new(membership(faction), [Layer::Terrain, Layer::Bounds, target])
}

/// Inactive projectiles collide with nothing, so they never generate collision events.
#[inline]
pub fn inactive_projectile_layers(faction: Faction) -> CollisionLayers {
    non_interacting(membership(faction))
}

fn spawn_pool(commands: &mut Commands, faction: Faction, capacity: usize) -> SlotPool<Entity> {
    let color = match faction {
        Faction::Player => Color::srgb(1.0, 0.85, 0.3),
        Faction::Hostile => Color::srgb(1.0, 0.4, 0.3),
    };

    let entities: Vec<Entity> = (0..capacity)
        .map(|_| {
            commands
                .spawn((
                    Name::new(format!("{faction:?}Projectile(Pooled)")),
                    ProjectileState::Inactive,
                    Projectile::default(),
                    Sprite {
                        color,
                        custom_size: Some(Vec2::splat(PROJECTILE_RADIUS * 2.0)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 0.0, PROJECTILE_Z),
                    Visibility::Hidden,
                    RigidBody::Dynamic,
                    Collider::circle(PROJECTILE_RADIUS),
                    Sensor,
                    inactive_projectile_layers(faction),
                    LinearVelocity(Vec2::ZERO),
                    CollisionEventsEnabled,
                ))
                .id()
        })
        .collect();

    let pool = SlotPool::from_items(entities);
    for (slot, entity) in pool.iter() {
        commands
            .entity(entity)
            .insert(PooledProjectile { faction, slot });
    }
    pool
}

/// Pre-spawn both projectile pools (inactive).
///
/// Physics components stay present for the whole game; activation only
/// rewrites component values, never the archetype.
pub fn init_projectile_pools(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut pools: ResMut<ProjectilePools>,
) {
    pools.player = spawn_pool(&mut commands, Faction::Player, tunables.player_pool_capacity);
    pools.hostile = spawn_pool(&mut commands, Faction::Hostile, tunables.hostile_pool_capacity);
    info!(
        "Projectile pools ready: player {}, hostile {}",
        pools.player.capacity(),
        pools.hostile.capacity()
    );
}
