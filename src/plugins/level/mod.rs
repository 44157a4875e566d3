//! Level data: arena size, spawn declarations and the destructible tile layer.
//!
//! Loading level files is someone else's job. This plugin only guarantees a
//! `LevelData` resource exists (a built-in arena unless the app inserted one)
//! and gives the rest of the game one place to ask "is this level usable?".

use std::fmt;

use bevy::prelude::*;

use crate::plugins::combat::damage::{TileStage, TileStageTable};

pub fn plugin(app: &mut App) {
    app.init_resource::<LevelData>();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnKind {
    Player,
    Enemy,
    Boss,
}

/// One entry of the level's object layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnDeclaration {
    pub kind: SpawnKind,
    pub position: Vec2,
}

impl SpawnDeclaration {
    pub fn new(kind: SpawnKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: Vec2::new(x, y),
        }
    }
}

/// A destructible tile placed on the grid. `index` is a global tile id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub cell: IVec2,
    pub index: u32,
}

#[derive(Resource, Debug, Clone)]
pub struct LevelData {
    /// Arena size in world units, centred on the origin.
    pub size: Vec2,
    pub tile_size: f32,
    pub spawns: Vec<SpawnDeclaration>,
    pub tiles: Vec<TilePlacement>,
    pub stages: TileStageTable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    MissingPlayerSpawn,
    DuplicatePlayerSpawn { count: usize },
    SpawnOutOfBounds { kind: SpawnKind, position: Vec2 },
    TileOutOfBounds { cell: IVec2 },
    TileIndexBelowFirstGid { cell: IVec2, index: u32, first_gid: u32 },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPlayerSpawn => write!(f, "level has no player spawn"),
            Self::DuplicatePlayerSpawn { count } => {
                write!(f, "level has {count} player spawns, expected exactly one")
            }
            Self::SpawnOutOfBounds { kind, position } => {
                write!(f, "{kind:?} spawn at {position} lies outside the arena")
            }
            Self::TileOutOfBounds { cell } => write!(f, "tile at cell {cell} lies outside the arena"),
            Self::TileIndexBelowFirstGid {
                cell,
                index,
                first_gid,
            } => write!(
                f,
                "tile at cell {cell} has index {index}, below the tileset's first gid {first_gid}"
            ),
        }
    }
}

impl std::error::Error for LevelError {}

impl LevelData {
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(Vec2::ZERO, self.size)
    }

    /// Grid dimensions in cells.
    pub fn grid_size(&self) -> IVec2 {
        (self.size / self.tile_size).floor().as_ivec2()
    }

    /// World-space centre of a grid cell. Cell (0, 0) is the bottom-left corner.
    pub fn cell_center(&self, cell: IVec2) -> Vec2 {
        self.bounds().min + (cell.as_vec2() + Vec2::splat(0.5)) * self.tile_size
    }

    pub fn hostile_spawn_count(&self) -> usize {
        self.spawns
            .iter()
            .filter(|s| s.kind != SpawnKind::Player)
            .count()
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        let players = self
            .spawns
            .iter()
            .filter(|s| s.kind == SpawnKind::Player)
            .count();
        match players {
            0 => return Err(LevelError::MissingPlayerSpawn),
            1 => {}
            count => return Err(LevelError::DuplicatePlayerSpawn { count }),
        }

        let bounds = self.bounds();
        if let Some(s) = self.spawns.iter().find(|s| !bounds.contains(s.position)) {
            return Err(LevelError::SpawnOutOfBounds {
                kind: s.kind,
                position: s.position,
            });
        }

        let grid = self.grid_size();
        let first_gid = self.stages.first_gid();
        for t in &self.tiles {
            if t.cell.cmplt(IVec2::ZERO).any() || t.cell.cmpge(grid).any() {
                return Err(LevelError::TileOutOfBounds { cell: t.cell });
            }
            if t.index < first_gid {
                return Err(LevelError::TileIndexBelowFirstGid {
                    cell: t.cell,
                    index: t.index,
                    first_gid,
                });
            }
        }

        Ok(())
    }
}

impl Default for LevelData {
    /// Built-in arena: the player on the left, two tanks and a heavy on the
    /// right, and three destructible walls in between.
    fn default() -> Self {
        const FIRST_GID: u32 = 1;

        // Stages 0..=2 are walls in increasing states of ruin; stage 3 is rubble.
        let stages = TileStageTable::new(FIRST_GID)
            .with_stage(0, TileStage { collides: true })
            .with_stage(1, TileStage { collides: true })
            .with_stage(2, TileStage { collides: true })
            .with_stage(3, TileStage { collides: false });

        let wall = |x: i32, ys: std::ops::RangeInclusive<i32>| {
            ys.map(move |y| TilePlacement {
                cell: IVec2::new(x, y),
                index: FIRST_GID,
            })
        };

        let tiles = wall(18, 8..=22)
            .chain(wall(25, 2..=9))
            .chain(wall(25, 21..=28))
            .collect();

        Self {
            size: Vec2::new(1600.0, 960.0),
            tile_size: 32.0,
            spawns: vec![
                SpawnDeclaration::new(SpawnKind::Player, -640.0, 0.0),
                SpawnDeclaration::new(SpawnKind::Enemy, 360.0, 280.0),
                SpawnDeclaration::new(SpawnKind::Enemy, 360.0, -280.0),
                SpawnDeclaration::new(SpawnKind::Boss, 620.0, 0.0),
            ],
            tiles,
            stages,
        }
    }
}
