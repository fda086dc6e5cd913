use bevy::prelude::*;

/// Near-white text for the dark underwater backdrop
pub const LABEL_TEXT: Color = Color::srgb(0.95, 0.97, 1.0);

/// Near-white text for headers
pub const HEADER_TEXT: Color = Color::srgb(0.95, 0.97, 1.0);

/// Dark text for buttons
pub const BUTTON_TEXT: Color = Color::srgb(0.08, 0.12, 0.18);
/// #35a6c9
pub const BUTTON_BACKGROUND: Color = Color::srgb(0.208, 0.651, 0.788);
/// #5cc3e0
pub const BUTTON_HOVERED_BACKGROUND: Color = Color::srgb(0.361, 0.765, 0.878);
/// #25789c
pub const BUTTON_PRESSED_BACKGROUND: Color = Color::srgb(0.145, 0.471, 0.612);
