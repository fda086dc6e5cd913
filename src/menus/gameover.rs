//! The game-over overlay.
//!
//! This is display only. The restart-on-tap input lives with the rest of the
//! session lifecycle in `game::session`.

use bevy::prelude::*;

use crate::{menus::Menu, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::GameOver), spawn_gameover_overlay);
}

fn spawn_gameover_overlay(mut commands: Commands) {
    commands.spawn((
        widget::ui_root("Game Over Overlay"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::GameOver),
        children![
            widget::header("Game Over"),
            widget::label("Tap to play again."),
        ],
    ));
}
