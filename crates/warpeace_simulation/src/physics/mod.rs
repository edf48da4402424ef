//! Physics simulation module
//!
//! Headless velocity интеграция, knockback состояние, мост к Rapier.

use bevy::prelude::*;

pub mod knockback;
pub mod movement;
pub mod rapier;

pub use knockback::{KnockbackStep, Knockbackable, DEFAULT_KNOCKBACK_DURATION};
pub use movement::{
    apply_knockback_velocity, apply_movement_input, integrate_velocity_to_transform,
    KinematicController, MovementInput, PhysicsBody,
};
pub use rapier::RapierContactBridgePlugin;

use crate::SimulationSet;

/// Movement Plugin
///
/// Порядок (SimulationSet::Physics):
/// 1. apply_movement_input — ходьба (пропускается под knockback)
/// 2. apply_knockback_velocity — knockback перекрывает ходьбу
/// 3. integrate_velocity_to_transform — position += velocity × dt
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                apply_movement_input,
                apply_knockback_velocity,
                integrate_velocity_to_transform,
            )
                .chain()
                .in_set(SimulationSet::Physics),
        );
    }
}
