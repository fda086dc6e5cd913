//! Scrolling background: three viewport-width tiles cycling leftward to fake
//! an endless seascape. Purely cosmetic.

use bevy::prelude::*;

use super::{
    VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
    assets::{GameAssets, load_game_assets},
};
use crate::{AppSystems, PausableSystems, screens::Screen};

/// Number of tiles in the loop.
const TILE_COUNT: usize = 3;

/// One tile scrolls its own width in this many seconds.
const CYCLE_SECONDS: f32 = 5.0;

const TILE_SPEED: f32 = VIEWPORT_WIDTH / CYCLE_SECONDS;

#[derive(Component)]
struct BackgroundTile;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        OnEnter(Screen::Gameplay),
        spawn_background.after(load_game_assets),
    );

    app.add_systems(
        Update,
        scroll_background
            .in_set(AppSystems::Update)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

fn spawn_background(mut commands: Commands, game_assets: Res<GameAssets>) {
    for i in 0..TILE_COUNT {
        commands.spawn((
            Name::new(format!("Background Tile {i}")),
            BackgroundTile,
            Sprite {
                image: game_assets.background.clone(),
                custom_size: Some(Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)),
                ..default()
            },
            // Z=-1 keeps the backdrop behind pipes and player.
            Transform::from_xyz(i as f32 * VIEWPORT_WIDTH, 0.0, -1.0),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
}

/// Wrap a tile that has fully scrolled off the left edge back to the right
/// end of the loop.
fn wrap_tile_x(x: f32) -> f32 {
    if x <= -VIEWPORT_WIDTH {
        x + VIEWPORT_WIDTH * TILE_COUNT as f32
    } else {
        x
    }
}

fn scroll_background(
    time: Res<Time>,
    mut tile_query: Query<&mut Transform, With<BackgroundTile>>,
) {
    for mut transform in &mut tile_query {
        let x = transform.translation.x - TILE_SPEED * time.delta_secs();
        transform.translation.x = wrap_tile_x(x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_wraps_after_a_full_width() {
        let wrapped = wrap_tile_x(-VIEWPORT_WIDTH - 0.5);
        assert_eq!(wrapped, VIEWPORT_WIDTH * 2.0 - 0.5);
    }

    #[test]
    fn tile_on_screen_does_not_wrap() {
        assert_eq!(wrap_tile_x(-100.0), -100.0);
    }
}
