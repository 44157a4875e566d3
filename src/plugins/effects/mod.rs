//! Explosion effects: a bounded pool of pre-spawned explosions with finite playback.
//!
//! ```text
//!   ExplosionSpawner::trigger_at(pos)   pool.acquire -> visible, playing from frame 0
//!   play_explosions (Update)            advance frames; last frame -> ExplosionFinished
//!   retire_finished_explosions          pool.release -> hidden
//! ```
//!
//! Explosions tick on virtual time, not physics time, so the one marking the
//! player's destruction still plays after the simulation is paused.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::pool::{SlotHandle, SlotPool};
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::vehicles::Vehicle;

const EXPLOSION_Z: f32 = 5.0;
const EXPLOSION_SIZE: f32 = 64.0;

pub fn plugin(app: &mut App) {
    app.init_resource::<ExplosionPool>()
        .add_message::<ExplosionFinished>()
        .add_systems(
            Update,
            (play_explosions, retire_finished_explosions)
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
}

#[derive(Component, Debug, Clone, Copy)]
pub struct PooledExplosion {
    pub slot: SlotHandle,
}

/// Playback clock of one explosion.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Explosion {
    pub frame: u32,
    pub elapsed_secs: f32,
    pub playing: bool,
}

impl Explosion {
    fn started() -> Self {
        Self {
            frame: 0,
            elapsed_secs: 0.0,
            playing: true,
        }
    }
}

#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct ExplosionPool(pub SlotPool<Entity>);

/// Playback completion notification.
#[derive(Message, Debug, Clone, Copy)]
pub struct ExplosionFinished {
    pub entity: Entity,
}

/// Pre-spawn `capacity` hidden explosions and return the pool that owns them.
pub fn spawn_explosion_pool(commands: &mut Commands, capacity: usize) -> ExplosionPool {
    let entities: Vec<Entity> = (0..capacity)
        .map(|_| {
            commands
                .spawn((
                    Name::new("Explosion(Pooled)"),
                    Explosion::default(),
                    Sprite {
                        color: Color::srgba(1.0, 0.6, 0.15, 1.0),
                        custom_size: Some(Vec2::splat(EXPLOSION_SIZE)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 0.0, EXPLOSION_Z),
                    Visibility::Hidden,
                    DespawnOnExit(GameState::InGame),
                ))
                .id()
        })
        .collect();

    let pool = SlotPool::from_items(entities);
    for (slot, entity) in pool.iter() {
        commands.entity(entity).insert(PooledExplosion { slot });
    }
    ExplosionPool(pool)
}

/// Acquire-and-play access to the explosion pool for gameplay systems.
#[derive(SystemParam)]
pub struct ExplosionSpawner<'w, 's> {
    pool: ResMut<'w, ExplosionPool>,
    slots: Query<
        'w,
        's,
        (&'static mut Explosion, &'static mut Transform, &'static mut Visibility),
        (With<PooledExplosion>, Without<Vehicle>),
    >,
}

impl ExplosionSpawner<'_, '_> {
    /// Start an explosion at `position`. `false` if the pool is exhausted.
    pub fn trigger_at(&mut self, position: Vec2) -> bool {
        let Some((slot, entity)) = self.pool.acquire() else {
            debug!("Explosion pool exhausted; effect at {position} dropped");
            return false;
        };

        let Ok((mut explosion, mut tf, mut vis)) = self.slots.get_mut(entity) else {
            warn!("Pooled explosion {entity:?} is missing its components");
            self.pool.release(slot);
            return false;
        };

        *explosion = Explosion::started();
        tf.translation = position.extend(EXPLOSION_Z);
        tf.scale = Vec3::splat(0.25);
        *vis = Visibility::Visible;
        true
    }
}

pub fn play_explosions(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut q: Query<(Entity, &mut Explosion, &mut Transform, &mut Sprite), With<PooledExplosion>>,
    mut writer: MessageWriter<ExplosionFinished>,
) {
    let frame_secs = 1.0 / tunables.explosion_fps.max(1.0);
    let frames = tunables.explosion_frames.max(1);

    for (e, mut explosion, mut tf, mut sprite) in &mut q {
        if !explosion.playing {
            continue;
        }

        explosion.elapsed_secs += time.delta_secs();
        explosion.frame = (explosion.elapsed_secs / frame_secs) as u32;

        if explosion.frame >= frames {
            explosion.playing = false;
            writer.write(ExplosionFinished { entity: e });
            continue;
        }

        // Asset-free playback: grow fast, fade out.
        let t = explosion.frame as f32 / frames as f32;
        tf.scale = Vec3::splat(0.25 + 0.75 * t.sqrt());
        let mut c = sprite.color.to_srgba();
        c.alpha = 1.0 - t;
        sprite.color = c.into();
    }
}

pub fn retire_finished_explosions(
    mut reader: MessageReader<ExplosionFinished>,
    mut pool: ResMut<ExplosionPool>,
    mut q: Query<(&PooledExplosion, &mut Visibility)>,
) {
    for done in reader.read() {
        let Ok((pooled, mut vis)) = q.get_mut(done.entity) else {
            continue;
        };
        pool.release(pooled.slot);
        *vis = Visibility::Hidden;
    }
}
