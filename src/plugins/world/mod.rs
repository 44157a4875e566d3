//! World plugin: arena bounds, floor and the destructible terrain layer.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::{Layer, non_interacting};
use crate::common::state::GameState;
use crate::plugins::combat::damage::TileState;
use crate::plugins::level::LevelData;

const WALL_THICKNESS: f32 = 30.0;
const TILE_Z: f32 = 0.5;

pub fn plugin(app: &mut App) {
    app.add_systems(
        OnEnter(GameState::InGame),
        (spawn_arena, spawn_floor, spawn_destructible_terrain),
    )
    .add_systems(
        PostUpdate,
        present_tiles.run_if(in_state(GameState::InGame)),
    );
}

/// One of the four walls around the arena. A projectile touching one has left the level.
#[derive(Component, Debug, Clone, Copy)]
pub struct ArenaWall;

/// One cell of the destructible layer. The entity persists; only its state changes.
#[derive(Component, Debug, Clone, Copy)]
pub struct TerrainTile {
    pub cell: IVec2,
    pub state: TileState,
}

#[inline]
pub fn solid_terrain_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Terrain,
        [
            Layer::Player,
            Layer::Enemy,
            Layer::PlayerBullet,
            Layer::EnemyBullet,
        ],
    )
}

#[inline]
pub fn passable_terrain_layers() -> CollisionLayers {
    non_interacting(Layer::Terrain)
}

fn spawn_arena(mut commands: Commands, level: Res<LevelData>) {
    let wall_color = Color::srgb(0.25, 0.27, 0.33);
    let half = level.size * 0.5;
    let t = WALL_THICKNESS;

    let wall_layers = CollisionLayers::new(
        Layer::Bounds,
        [
            Layer::Player,
            Layer::Enemy,
            Layer::PlayerBullet,
            Layer::EnemyBullet,
        ],
    );

    let mut spawn_wall = |name: &str, pos: Vec2, size: Vec2| {
        commands.spawn((
            Name::new(name.to_string()),
            ArenaWall,
            Sprite {
                color: wall_color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            wall_layers,
            DespawnOnExit(GameState::InGame),
        ));
    };

    spawn_wall(
        "WallTop",
        Vec2::new(0.0, half.y + t * 0.5),
        Vec2::new(level.size.x + t * 2.0, t),
    );
    spawn_wall(
        "WallBottom",
        Vec2::new(0.0, -half.y - t * 0.5),
        Vec2::new(level.size.x + t * 2.0, t),
    );
    spawn_wall(
        "WallLeft",
        Vec2::new(-half.x - t * 0.5, 0.0),
        Vec2::new(t, level.size.y),
    );
    spawn_wall(
        "WallRight",
        Vec2::new(half.x + t * 0.5, 0.0),
        Vec2::new(t, level.size.y),
    );
}

/// Checkerboard ground layer. Purely visual.
fn spawn_floor(mut commands: Commands, level: Res<LevelData>) {
    let grid = level.grid_size();
    let tile = level.tile_size;

    (0..grid.y)
        .flat_map(|y| (0..grid.x).map(move |x| IVec2::new(x, y)))
        .for_each(|cell| {
            let color = if (cell.x + cell.y) % 2 == 0 {
                Color::srgb(0.2, 0.24, 0.16)
            } else {
                Color::srgb(0.18, 0.22, 0.14)
            };

            commands.spawn((
                Sprite::from_color(color, Vec2::splat(tile)),
                Transform::from_translation(level.cell_center(cell).extend(0.0)),
                DespawnOnExit(GameState::InGame),
            ));
        });
}

fn spawn_destructible_terrain(mut commands: Commands, level: Res<LevelData>) {
    let size = level.tile_size;

    for placement in &level.tiles {
        let state = TileState {
            index: placement.index,
            collides: level.stages.initial_collides(placement.index),
        };
        let layers = if state.collides {
            solid_terrain_layers()
        } else {
            passable_terrain_layers()
        };

        commands.spawn((
            Name::new(format!("Tile{}", placement.cell)),
            TerrainTile {
                cell: placement.cell,
                state,
            },
            Sprite {
                color: tile_color(state, level.stages.first_gid()),
                custom_size: Some(Vec2::splat(size)),
                ..default()
            },
            Transform::from_translation(level.cell_center(placement.cell).extend(TILE_Z)),
            RigidBody::Static,
            Collider::rectangle(size, size),
            layers,
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// Walls lighten with each damage stage; passable rubble is drawn as dark ground.
fn tile_color(state: TileState, first_gid: u32) -> Color {
    if !state.collides {
        return Color::srgb(0.28, 0.25, 0.2);
    }
    let stage = state.index.saturating_sub(first_gid) as f32;
    let shade = (0.45 + 0.12 * stage).min(0.85);
    Color::srgb(shade, shade * 0.9, shade * 0.75)
}

fn present_tiles(
    level: Res<LevelData>,
    mut q: Query<(&TerrainTile, &mut Sprite), Changed<TerrainTile>>,
) {
    for (tile, mut sprite) in &mut q {
        sprite.color = tile_color(tile.state, level.stages.first_gid());
    }
}
