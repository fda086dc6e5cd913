//! Contact detection and classification.
//!
//! There is no physics engine here: colliders are axis-aligned boxes checked
//! against the player each frame. Categories are a closed enum carried on
//! each entity, and the classifier pattern-matches on the pair.

use bevy::prelude::*;

use super::player::Player;
use crate::{AppSystems, PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Collider>();
    app.register_type::<Contacted>();
    app.add_message::<Contact>();

    app.add_systems(
        Update,
        detect_player_contacts
            .in_set(AppSystems::Update)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// The category carried by every contact-relevant entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ColliderKind {
    Player,
    /// Solid world: pipes and the ground strip.
    Obstacle,
    /// The invisible scoring sensor between a pipe pair.
    Gap,
}

/// Axis-aligned collision box.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Collider {
    pub kind: ColliderKind,
    pub half_extents: Vec2,
}

impl Collider {
    pub fn new(kind: ColliderKind, size: Vec2) -> Self {
        Self {
            kind,
            half_extents: size / 2.0,
        }
    }
}

/// Marker inserted once a collider has reported a contact with the player,
/// so a sensor fires once per pass instead of once per overlapping frame.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Contacted;

/// A begin-contact notification involving the player.
#[derive(Message, Debug, Clone, Copy)]
pub struct Contact {
    pub pair: (ColliderKind, ColliderKind),
}

/// What the session should do about a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// The player crossed a gap sensor: award a point.
    Scored,
    /// The player hit something solid: end the run.
    Fatal,
    /// The run is already over; contacts after death change nothing.
    Ignored,
}

/// Classify a contact pair. Gap contacts score, everything else ends the
/// run, and nothing at all happens once the run is already over.
pub fn classify(pair: (ColliderKind, ColliderKind), game_over: bool) -> ContactOutcome {
    use ColliderKind::*;

    if game_over {
        return ContactOutcome::Ignored;
    }
    match pair {
        (Gap, _) | (_, Gap) => ContactOutcome::Scored,
        _ => ContactOutcome::Fatal,
    }
}

/// Overlap test for two axis-aligned boxes. Touching edges do not count.
pub fn aabb_overlap(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> bool {
    (a_pos.x - b_pos.x).abs() < a_half.x + b_half.x
        && (a_pos.y - b_pos.y).abs() < a_half.y + b_half.y
}

/// Check the player against every collider it has not already touched and
/// emit a [`Contact`] per new overlap.
fn detect_player_contacts(
    mut commands: Commands,
    mut contacts: MessageWriter<Contact>,
    player_query: Query<(&Transform, &Collider), With<Player>>,
    collider_query: Query<(Entity, &Transform, &Collider), (Without<Player>, Without<Contacted>)>,
) {
    let Ok((player_transform, player_collider)) = player_query.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, transform, collider) in &collider_query {
        let pos = transform.translation.truncate();
        if aabb_overlap(
            player_pos,
            player_collider.half_extents,
            pos,
            collider.half_extents,
        ) {
            commands.entity(entity).insert(Contacted);
            contacts.write(Contact {
                pair: (player_collider.kind, collider.kind),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Deliberate choice: the gap sensor contact-tests against the player,
    // so the scoring path can actually fire. A sensor that only tested
    // against its own category would never produce a Scored outcome.
    #[test]
    fn gap_contact_scores_while_playing() {
        let outcome = classify((ColliderKind::Player, ColliderKind::Gap), false);
        assert_eq!(outcome, ContactOutcome::Scored);

        // Order of the pair does not matter.
        let outcome = classify((ColliderKind::Gap, ColliderKind::Player), false);
        assert_eq!(outcome, ContactOutcome::Scored);
    }

    #[test]
    fn obstacle_contact_is_fatal_while_playing() {
        let outcome = classify((ColliderKind::Player, ColliderKind::Obstacle), false);
        assert_eq!(outcome, ContactOutcome::Fatal);
    }

    #[test]
    fn all_contacts_ignored_after_game_over() {
        for other in [ColliderKind::Gap, ColliderKind::Obstacle] {
            let outcome = classify((ColliderKind::Player, other), true);
            assert_eq!(outcome, ContactOutcome::Ignored);
        }
    }

    #[test]
    fn overlapping_boxes_collide() {
        let half = Vec2::splat(10.0);
        assert!(aabb_overlap(Vec2::ZERO, half, Vec2::new(15.0, 5.0), half));
    }

    #[test]
    fn separated_boxes_do_not_collide() {
        let half = Vec2::splat(10.0);
        assert!(!aabb_overlap(Vec2::ZERO, half, Vec2::new(25.0, 0.0), half));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let half = Vec2::splat(10.0);
        assert!(!aabb_overlap(Vec2::ZERO, half, Vec2::new(20.0, 0.0), half));
    }
}
