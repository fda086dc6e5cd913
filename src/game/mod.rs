//! The main game module for the swim-through-the-pipes arcade loop.
//!
//! This module contains all the gameplay logic including:
//! - Player gravity and flap impulses
//! - Obstacle batch spawning (pipe pair + scoring gap) on a fixed cadence
//! - Contact detection and classification
//! - Session lifecycle (score, game over, restart)
//! - Scrolling background tiles

mod assets;
mod background;
mod collision;
mod pipes;
mod player;
mod session;

use bevy::prelude::*;

use crate::{audio::music, screens::Screen};

/// World-space size of the playfield. The camera is 1:1, so these are also
/// pixels.
pub const VIEWPORT_WIDTH: f32 = 480.0;
pub const VIEWPORT_HEIGHT: f32 = 720.0;

/// Constant leftward scroll speed for obstacle batches: two viewport widths
/// covered in (width / 100) seconds, i.e. 200 px/s.
pub const SCROLL_SPEED: f32 = 200.0;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        assets::plugin,
        background::plugin,
        collision::plugin,
        pipes::plugin,
        player::plugin,
        session::plugin,
    ));
}

/// System to spawn the game level when entering gameplay.
/// Called from `screens/gameplay.rs` on `OnEnter(Screen::Gameplay)`.
pub fn spawn_game(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        Name::new("Gameplay Music"),
        music(asset_server.load("audio/music/bubbling_along.ogg")),
        DespawnOnExit(Screen::Gameplay),
    ));

    info!("Game spawned - swim!");
}
