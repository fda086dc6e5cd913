//! The player fish: gravity, flap impulses, and the two-frame swim animation.

use bevy::prelude::*;

use super::{
    assets::{GameAssets, load_game_assets},
    collision::{Collider, ColliderKind},
};
use crate::{AppSystems, PausableSystems, audio::sound_effect, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Player>();
    app.register_type::<Velocity>();

    app.add_systems(
        OnEnter(Screen::Gameplay),
        spawn_player.after(load_game_assets),
    );

    app.add_systems(
        Update,
        handle_flap_input
            .in_set(AppSystems::RecordInput)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );

    app.add_systems(
        Update,
        animate_swim
            .in_set(AppSystems::TickTimers)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );

    // Gravity feeds velocity, velocity feeds position, in that order.
    app.add_systems(
        Update,
        (apply_gravity, apply_velocity)
            .chain()
            .in_set(AppSystems::Update)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Player sprite size in world units.
pub const PLAYER_SIZE: Vec2 = Vec2::new(60.0, 45.0);

/// Downward acceleration while gravity is enabled, px/s^2.
const GRAVITY: f32 = 1400.0;

/// Fixed upward impulse applied per tap.
pub const FLAP_IMPULSE: f32 = 80.0;

/// Player body mass. A flap sets the vertical speed to impulse / mass.
pub const PLAYER_MASS: f32 = 0.16;

/// Seconds per swim animation frame.
const SWIM_FRAME_SECONDS: f32 = 0.4;

/// The player-controlled fish.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct Player {
    pub mass: f32,
    /// Gravity is off until the first tap of a run, so the fish hangs in
    /// place while the player gets ready.
    pub gravity_enabled: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            mass: PLAYER_MASS,
            gravity_enabled: false,
        }
    }
}

/// Velocity in px/s, integrated into [`Transform`] every frame. Carried by
/// the player and by every obstacle batch member.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Velocity(pub Vec2);

/// Two-frame swim cycle.
#[derive(Component)]
struct SwimAnimation {
    timer: Timer,
    frame: usize,
}

impl Default for SwimAnimation {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(SWIM_FRAME_SECONDS, TimerMode::Repeating),
            frame: 0,
        }
    }
}

fn spawn_player(mut commands: Commands, game_assets: Res<GameAssets>) {
    commands.spawn((
        Name::new("Player"),
        Player::default(),
        Velocity::default(),
        Collider::new(ColliderKind::Player, PLAYER_SIZE),
        SwimAnimation::default(),
        Sprite {
            image: game_assets.fish_frames[0].clone(),
            custom_size: Some(PLAYER_SIZE),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0),
        DespawnOnExit(Screen::Gameplay),
    ));

    info!("Player spawned");
}

/// Apply one tap's worth of lift.
///
/// The velocity must be zeroed before the impulse is applied: residual
/// falling speed would otherwise eat into the impulse.
pub fn flap(player: &mut Player, velocity: &mut Velocity) {
    player.gravity_enabled = true;
    velocity.0 = Vec2::ZERO;
    velocity.0.y += FLAP_IMPULSE / player.mass;
}

/// True when any of the game's "tap" inputs was just pressed.
pub fn tap_just_pressed(mouse: &ButtonInput<MouseButton>, keys: &ButtonInput<KeyCode>) -> bool {
    mouse.just_pressed(MouseButton::Left)
        || keys.just_pressed(KeyCode::Space)
        || keys.just_pressed(KeyCode::ArrowUp)
}

fn handle_flap_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut player_query: Query<(&mut Player, &mut Velocity)>,
) {
    if !tap_just_pressed(&mouse, &keys) {
        return;
    }
    let Ok((mut player, mut velocity)) = player_query.single_mut() else {
        return;
    };

    flap(&mut player, &mut velocity);

    let flap_sound = asset_server.load("audio/sound_effects/flap.ogg");
    commands.spawn(sound_effect(flap_sound));
}

fn apply_gravity(time: Res<Time>, mut player_query: Query<(&Player, &mut Velocity)>) {
    for (player, mut velocity) in &mut player_query {
        if player.gravity_enabled {
            velocity.0.y -= GRAVITY * time.delta_secs();
        }
    }
}

/// Integrate every velocity carrier (player, pipes, gap sensors).
fn apply_velocity(time: Res<Time>, mut query: Query<(&mut Transform, &Velocity)>) {
    for (mut transform, velocity) in &mut query {
        transform.translation += velocity.0.extend(0.0) * time.delta_secs();
    }
}

fn animate_swim(
    time: Res<Time>,
    game_assets: Res<GameAssets>,
    mut query: Query<(&mut SwimAnimation, &mut Sprite)>,
) {
    for (mut animation, mut sprite) in &mut query {
        animation.timer.tick(time.delta());
        if animation.timer.just_finished() {
            animation.frame = (animation.frame + 1) % game_assets.fish_frames.len();
            sprite.image = game_assets.fish_frames[animation.frame].clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flap_discards_residual_velocity() {
        let mut player = Player::default();
        // Falling fast and drifting; none of it should survive the flap.
        let mut velocity = Velocity(Vec2::new(12.0, -300.0));

        flap(&mut player, &mut velocity);

        assert_eq!(velocity.0, Vec2::new(0.0, FLAP_IMPULSE / PLAYER_MASS));
    }

    #[test]
    fn first_flap_enables_gravity() {
        let mut player = Player::default();
        let mut velocity = Velocity::default();
        assert!(!player.gravity_enabled);

        flap(&mut player, &mut velocity);

        assert!(player.gravity_enabled);
    }

    #[test]
    fn flap_speed_is_impulse_over_mass() {
        let mut player = Player {
            mass: 0.5,
            gravity_enabled: true,
        };
        let mut velocity = Velocity::default();

        flap(&mut player, &mut velocity);

        assert_eq!(velocity.0.y, FLAP_IMPULSE / 0.5);
    }
}
