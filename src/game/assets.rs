//! Texture handles shared by the gameplay spawners.

use bevy::prelude::*;

use crate::screens::Screen;

/// Holds the named textures the game objects are built from.
#[derive(Resource)]
pub struct GameAssets {
    /// The two frames of the player's swim animation.
    pub fish_frames: [Handle<Image>; 2],
    pub pipe_top: Handle<Image>,
    pub pipe_bottom: Handle<Image>,
    pub background: Handle<Image>,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), load_game_assets);
}

/// Load game assets - must run before any systems that use [`GameAssets`].
pub fn load_game_assets(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(GameAssets {
        fish_frames: [
            asset_server.load("images/swimmy_1.png"),
            asset_server.load("images/swimmy_2.png"),
        ],
        pipe_top: asset_server.load("images/pipe_top.png"),
        pipe_bottom: asset_server.load("images/pipe_bottom.png"),
        background: asset_server.load("images/seabed.png"),
    });
}
