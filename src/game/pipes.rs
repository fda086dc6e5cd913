//! Obstacle batches: an upper pipe, a lower pipe, and the invisible scoring
//! gap between them, spawned on a fixed cadence and scrolled leftward.

use bevy::prelude::*;
use rand::Rng;

use super::{
    SCROLL_SPEED, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
    assets::GameAssets,
    collision::{Collider, ColliderKind},
    player::{PLAYER_SIZE, Velocity},
};
use crate::{AppSystems, PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<BatchMember>();
    app.init_resource::<SpawnTimer>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_spawn_timer);

    // The timer only ticks while the world is unpaused, so entering the
    // game-over overlay stops the spawner and a restart resumes it.
    app.add_systems(
        Update,
        spawn_pipe_batches
            .in_set(AppSystems::TickTimers)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );

    app.add_systems(
        Update,
        despawn_offscreen_batches
            .in_set(AppSystems::Update)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Seconds between obstacle batches.
pub const SPAWN_PERIOD: f32 = 3.0;

/// Pipe sprite size. Tall enough that a pipe always reaches past the screen
/// edge, whatever the gap offset.
pub const PIPE_SIZE: Vec2 = Vec2::new(90.0, 640.0);

/// Vertical opening between a pipe pair: four player heights.
pub const GAP_HEIGHT: f32 = PLAYER_SIZE.y * 4.0;

/// X where batches spawn: one viewport width right of center, fully off
/// screen.
const SPAWN_X: f32 = VIEWPORT_WIDTH;

/// X past which a batch member is gone for good.
const DESPAWN_X: f32 = -(VIEWPORT_WIDTH / 2.0 + PIPE_SIZE.x);

/// Repeating timer driving the spawner.
#[derive(Resource)]
pub struct SpawnTimer(pub Timer);

impl Default for SpawnTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(SPAWN_PERIOD, TimerMode::Repeating))
    }
}

/// Marker for every member of an obstacle batch (both pipes and the gap
/// sensor). Restart tears down everything carrying this.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct BatchMember;

/// Where one batch's pieces sit vertically, given the random center offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchLayout {
    pub upper_pipe_y: f32,
    pub lower_pipe_y: f32,
    pub gap_y: f32,
}

/// Lay out a batch around `offset`, the vertical center of the opening.
pub fn batch_layout(offset: f32) -> BatchLayout {
    BatchLayout {
        upper_pipe_y: offset + GAP_HEIGHT / 2.0 + PIPE_SIZE.y / 2.0,
        lower_pipe_y: offset - GAP_HEIGHT / 2.0 - PIPE_SIZE.y / 2.0,
        gap_y: offset,
    }
}

/// Uniform draw over [0, H/2), recentered to [-H/4, +H/4).
pub fn random_gap_offset(rng: &mut impl Rng) -> f32 {
    rng.random_range(0.0..VIEWPORT_HEIGHT / 2.0) - VIEWPORT_HEIGHT / 4.0
}

fn reset_spawn_timer(mut timer: ResMut<SpawnTimer>) {
    timer.0.reset();
}

fn spawn_pipe_batches(
    time: Res<Time>,
    mut timer: ResMut<SpawnTimer>,
    mut commands: Commands,
    game_assets: Res<GameAssets>,
) {
    timer.0.tick(time.delta());
    if !timer.0.just_finished() {
        return;
    }

    let offset = random_gap_offset(&mut rand::rng());
    spawn_batch(&mut commands, &game_assets, offset);
}

/// Spawn one batch: upper pipe, lower pipe, gap sensor, all moving left at
/// [`SCROLL_SPEED`].
fn spawn_batch(commands: &mut Commands, game_assets: &GameAssets, offset: f32) {
    let layout = batch_layout(offset);
    let velocity = Velocity(Vec2::new(-SCROLL_SPEED, 0.0));

    commands.spawn((
        Name::new("Upper Pipe"),
        BatchMember,
        Collider::new(ColliderKind::Obstacle, PIPE_SIZE),
        velocity,
        Sprite {
            image: game_assets.pipe_top.clone(),
            custom_size: Some(PIPE_SIZE),
            ..default()
        },
        Transform::from_xyz(SPAWN_X, layout.upper_pipe_y, 0.0),
        DespawnOnExit(Screen::Gameplay),
    ));

    commands.spawn((
        Name::new("Lower Pipe"),
        BatchMember,
        Collider::new(ColliderKind::Obstacle, PIPE_SIZE),
        velocity,
        Sprite {
            image: game_assets.pipe_bottom.clone(),
            custom_size: Some(PIPE_SIZE),
            ..default()
        },
        Transform::from_xyz(SPAWN_X, layout.lower_pipe_y, 0.0),
        DespawnOnExit(Screen::Gameplay),
    ));

    // The gap sensor is invisible: no sprite, just a collider spanning the
    // opening.
    commands.spawn((
        Name::new("Gap Sensor"),
        BatchMember,
        Collider::new(ColliderKind::Gap, Vec2::new(PIPE_SIZE.x, GAP_HEIGHT)),
        velocity,
        Transform::from_xyz(SPAWN_X, layout.gap_y, 0.0),
        DespawnOnExit(Screen::Gameplay),
    ));

    info!("Spawned pipe batch with gap at y={offset:.1}");
}

fn despawn_offscreen_batches(
    mut commands: Commands,
    batch_query: Query<(Entity, &Transform), With<BatchMember>>,
) {
    for (entity, transform) in &batch_query {
        if transform.translation.x < DESPAWN_X {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::ecs::world::CommandQueue;

    use super::*;

    fn placeholder_assets(images: &mut Assets<Image>) -> GameAssets {
        let image = images.add(Image::default());
        GameAssets {
            fish_frames: [image.clone(), image.clone()],
            pipe_top: image.clone(),
            pipe_bottom: image.clone(),
            background: image,
        }
    }

    #[test]
    fn batch_spawns_two_pipes_and_one_gap() {
        let mut images = Assets::<Image>::default();
        let mut world = World::new();
        let mut queue = CommandQueue::default();
        let mut commands = Commands::new(&mut queue, &world);

        spawn_batch(&mut commands, &placeholder_assets(&mut images), 50.0);
        queue.apply(&mut world);

        let mut pipes = 0;
        let mut gaps = 0;
        let mut colliders = world.query::<&Collider>();
        for collider in colliders.iter(&world) {
            match collider.kind {
                ColliderKind::Obstacle => pipes += 1,
                ColliderKind::Gap => gaps += 1,
                ColliderKind::Player => {}
            }
        }
        assert_eq!((pipes, gaps), (2, 1));
    }

    #[test]
    fn batch_members_all_scroll_left_at_the_same_speed() {
        let mut images = Assets::<Image>::default();
        let mut world = World::new();
        let mut queue = CommandQueue::default();
        let mut commands = Commands::new(&mut queue, &world);

        spawn_batch(&mut commands, &placeholder_assets(&mut images), -120.0);
        queue.apply(&mut world);

        let mut members = world.query_filtered::<&Velocity, With<BatchMember>>();
        let velocities: Vec<_> = members.iter(&world).collect();
        assert_eq!(velocities.len(), 3);
        for velocity in velocities {
            assert_eq!(velocity.0, Vec2::new(-SCROLL_SPEED, 0.0));
        }
    }

    #[test]
    fn gap_sensor_sits_at_pipe_midpoint() {
        for offset in [-180.0, 0.0, 42.5, 179.9] {
            let layout = batch_layout(offset);
            let midpoint = (layout.upper_pipe_y + layout.lower_pipe_y) / 2.0;
            assert_eq!(layout.gap_y, midpoint);
        }
    }

    #[test]
    fn gap_spans_exactly_gap_height() {
        let layout = batch_layout(37.0);
        let upper_inner_edge = layout.upper_pipe_y - PIPE_SIZE.y / 2.0;
        let lower_inner_edge = layout.lower_pipe_y + PIPE_SIZE.y / 2.0;
        assert!((upper_inner_edge - lower_inner_edge - GAP_HEIGHT).abs() < 1e-4);
        assert!((upper_inner_edge - layout.gap_y - GAP_HEIGHT / 2.0).abs() < 1e-4);
    }

    #[test]
    fn gap_offset_stays_within_quarter_viewport() {
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let offset = random_gap_offset(&mut rng);
            assert!(offset >= -VIEWPORT_HEIGHT / 4.0);
            assert!(offset < VIEWPORT_HEIGHT / 4.0);
        }
    }

    #[test]
    fn spawn_timer_fires_once_per_period() {
        let mut timer = SpawnTimer::default().0;

        timer.tick(Duration::from_secs_f32(2.9));
        assert!(!timer.just_finished());

        // First period elapses: exactly one batch.
        timer.tick(Duration::from_secs_f32(0.2));
        assert!(timer.just_finished());
        assert_eq!(timer.times_finished_this_tick(), 1);

        // Second period: exactly one more, no double-fire.
        timer.tick(Duration::from_secs_f32(3.0));
        assert!(timer.just_finished());
        assert_eq!(timer.times_finished_this_tick(), 1);
    }
}
