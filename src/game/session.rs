//! Session lifecycle: score, the game-over transition, and restart.
//!
//! A run ends on any fatal contact. The game-over overlay opening pauses the
//! whole world (see `screens/gameplay.rs`), which freezes motion and the
//! spawner in one move. Any tap while the overlay is up tears the run down
//! and starts a fresh one.

use bevy::prelude::*;

use super::{
    VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
    collision::{Collider, ColliderKind, Contact, ContactOutcome, Contacted, classify},
    pipes::{BatchMember, SpawnTimer},
    player::{Player, Velocity, tap_just_pressed},
};
use crate::{
    AppSystems, PausableSystems, audio::sound_effect, menus::Menu, screens::Screen,
    theme::{GameFont, palette::HEADER_TEXT},
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<GameScore>();
    app.register_type::<GameScore>();
    app.add_message::<RestartSession>();

    app.add_systems(
        OnEnter(Screen::Gameplay),
        (reset_score, spawn_ground, spawn_score_label),
    );

    app.add_systems(
        Update,
        (apply_contact_outcomes, update_score_label)
            .chain()
            .in_set(AppSystems::Update)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );

    // Restart must keep running while the game-over overlay has the world
    // paused, so these two are deliberately not in PausableSystems.
    app.add_systems(
        Update,
        request_restart_on_tap
            .in_set(AppSystems::RecordInput)
            .run_if(in_state(Menu::GameOver)),
    );
    app.add_systems(
        Update,
        restart_session
            .in_set(AppSystems::Update)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Height of the invisible ground strip at the bottom of the viewport.
const GROUND_THICKNESS: f32 = 2.0;

/// Resource tracking the current run's score. Only ever increments, except
/// for the reset to zero on restart.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct GameScore {
    pub score: u32,
}

impl GameScore {
    pub fn reset(&mut self) {
        self.score = 0;
    }
}

/// Request to tear the current run down and start a new one.
#[derive(Message, Debug, Clone, Copy)]
pub struct RestartSession;

/// Marker for the score readout at the top of the screen.
#[derive(Component)]
struct ScoreLabel;

/// Reset score when starting a new game.
fn reset_score(mut score: ResMut<GameScore>) {
    score.reset();
    info!("Score reset");
}

/// The ground is an invisible full-width obstacle strip: falling all the way
/// down ends the run just like hitting a pipe.
fn spawn_ground(mut commands: Commands) {
    commands.spawn((
        Name::new("Ground"),
        Collider::new(
            ColliderKind::Obstacle,
            Vec2::new(VIEWPORT_WIDTH, GROUND_THICKNESS),
        ),
        Transform::from_xyz(0.0, -VIEWPORT_HEIGHT / 2.0, 0.0),
        DespawnOnExit(Screen::Gameplay),
    ));
}

fn spawn_score_label(mut commands: Commands, game_font: Res<GameFont>) {
    commands.spawn((
        Name::new("Score Label"),
        ScoreLabel,
        Text("0".to_string()),
        TextFont {
            font: game_font.0.clone(),
            font_size: 60.0,
            ..default()
        },
        TextColor(HEADER_TEXT),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(40.0),
            justify_self: JustifySelf::Center,
            ..default()
        },
        GlobalZIndex(1),
        DespawnOnExit(Screen::Gameplay),
    ));
}

/// Run every contact through the classifier and act on the outcome.
fn apply_contact_outcomes(
    mut commands: Commands,
    mut contacts: MessageReader<Contact>,
    mut score: ResMut<GameScore>,
    mut next_menu: ResMut<NextState<Menu>>,
    menu: Res<State<Menu>>,
    asset_server: Res<AssetServer>,
) {
    // Track game-over locally so a gap contact queued in the same frame as a
    // fatal one cannot still score.
    let mut game_over = *menu.get() == Menu::GameOver;

    for contact in contacts.read() {
        match classify(contact.pair, game_over) {
            ContactOutcome::Scored => {
                score.score += 1;
                info!("Score: {}", score.score);

                let blip = asset_server.load("audio/sound_effects/score.ogg");
                commands.spawn(sound_effect(blip));
            }
            ContactOutcome::Fatal => {
                game_over = true;
                info!("Run over. Final score: {}", score.score);

                let splash = asset_server.load("audio/sound_effects/splash.ogg");
                commands.spawn(sound_effect(splash));

                next_menu.set(Menu::GameOver);
            }
            ContactOutcome::Ignored => {}
        }
    }
}

/// Keep the score readout equal to the integer score.
fn update_score_label(
    score: Res<GameScore>,
    mut label_query: Query<&mut Text, With<ScoreLabel>>,
) {
    if !score.is_changed() {
        return;
    }
    for mut text in &mut label_query {
        text.0 = score.score.to_string();
    }
}

fn request_restart_on_tap(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut restarts: MessageWriter<RestartSession>,
) {
    if tap_just_pressed(&mouse, &keys) {
        restarts.write(RestartSession);
    }
}

/// Tear the run down and set up the next one: clear obstacles, zero the
/// score, rewind the spawn timer, and put the player back at the center with
/// gravity off until their first tap.
fn restart_session(
    mut commands: Commands,
    mut restarts: MessageReader<RestartSession>,
    mut score: ResMut<GameScore>,
    mut spawn_timer: ResMut<SpawnTimer>,
    mut next_menu: ResMut<NextState<Menu>>,
    mut player_query: Query<(&mut Player, &mut Velocity, &mut Transform)>,
    batch_query: Query<Entity, With<BatchMember>>,
    contacted_query: Query<Entity, (With<Contacted>, Without<BatchMember>)>,
) {
    if restarts.is_empty() {
        return;
    }
    restarts.clear();

    score.reset();
    spawn_timer.0.reset();

    for entity in &batch_query {
        commands.entity(entity).despawn();
    }
    // The ground outlives the run; let it report contacts again.
    for entity in &contacted_query {
        commands.entity(entity).remove::<Contacted>();
    }

    if let Ok((mut player, mut velocity, mut transform)) = player_query.single_mut() {
        player.gravity_enabled = false;
        velocity.0 = Vec2::ZERO;
        transform.translation.x = 0.0;
        transform.translation.y = 0.0;
    }

    next_menu.set(Menu::None);
    info!("Session restarted");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    #[test]
    fn restart_clears_the_run_and_rearms_the_session() {
        let mut world = World::new();
        world.init_resource::<Messages<RestartSession>>();
        world.init_resource::<NextState<Menu>>();
        world.insert_resource(GameScore { score: 5 });

        // Mid-period timer, as after a run ending between batches.
        let mut spawn_timer = SpawnTimer::default();
        spawn_timer.0.tick(Duration::from_secs_f32(1.5));
        world.insert_resource(spawn_timer);

        // A falling player that died partway down the screen.
        let player = world
            .spawn((
                Player {
                    gravity_enabled: true,
                    ..Default::default()
                },
                Velocity(Vec2::new(0.0, -250.0)),
                Transform::from_xyz(0.0, -120.0, 1.0),
            ))
            .id();

        for x in [100.0, 300.0, 500.0] {
            world.spawn((BatchMember, Transform::from_xyz(x, 0.0, 0.0)));
        }
        let ground = world.spawn((Contacted, Transform::default())).id();

        world
            .resource_mut::<Messages<RestartSession>>()
            .write(RestartSession);
        world.run_system_once(restart_session).unwrap();

        // Score and spawn cadence rewound.
        assert_eq!(world.resource::<GameScore>().score, 0);
        assert_eq!(world.resource::<SpawnTimer>().0.elapsed_secs(), 0.0);

        // Every batch member gone, the ground armed to report contacts again.
        let mut batches = world.query_filtered::<(), With<BatchMember>>();
        assert_eq!(batches.iter(&world).count(), 0);
        assert!(!world.entity(ground).contains::<Contacted>());

        // Player back at the origin, hanging until the first tap.
        let player_ref = world.entity(player);
        assert!(!player_ref.get::<Player>().unwrap().gravity_enabled);
        assert_eq!(player_ref.get::<Velocity>().unwrap().0, Vec2::ZERO);
        let translation = player_ref.get::<Transform>().unwrap().translation;
        assert_eq!(translation.truncate(), Vec2::ZERO);

        // And the game-over overlay is on its way out.
        assert!(matches!(
            *world.resource::<NextState<Menu>>(),
            NextState::Pending(Menu::None)
        ));
    }

    #[test]
    fn restart_is_a_no_op_without_a_request() {
        let mut world = World::new();
        world.init_resource::<Messages<RestartSession>>();
        world.init_resource::<NextState<Menu>>();
        world.insert_resource(GameScore { score: 3 });
        world.insert_resource(SpawnTimer::default());

        world.spawn((BatchMember, Transform::default()));

        world.run_system_once(restart_session).unwrap();

        assert_eq!(world.resource::<GameScore>().score, 3);
        let mut batches = world.query_filtered::<(), With<BatchMember>>();
        assert_eq!(batches.iter(&world).count(), 1);
    }

    #[test]
    fn score_resets_to_zero() {
        let mut score = GameScore { score: 5 };
        score.reset();
        assert_eq!(score.score, 0);
    }

    #[test]
    fn scored_outcomes_add_exactly_one() {
        let mut score = GameScore::default();
        for expected in 1..=3 {
            let outcome = classify((ColliderKind::Player, ColliderKind::Gap), false);
            if outcome == ContactOutcome::Scored {
                score.score += 1;
            }
            assert_eq!(score.score, expected);
        }
    }
}
