//! AI movement systems.

use bevy::prelude::*;

use crate::ai::{EnemyFsm, EnemyState, PatrolRoute};
use crate::health::Dead;
use crate::physics::MovementInput;
use crate::registry::PlayerRegistry;

/// Система: EnemyState → MovementInput
///
/// - Patrol: к текущей точке маршрута
/// - Chase: к ближайшему игроку
/// - Idle / PlayerDetected / Attack: стоим
pub fn ai_movement_from_state(
    mut enemies: Query<(&Transform, &EnemyFsm, &PatrolRoute, &mut MovementInput), Without<Dead>>,
    registry: Res<PlayerRegistry>,
) {
    for (transform, fsm, route, mut input) in enemies.iter_mut() {
        let position = transform.translation;

        let target = match fsm.state() {
            EnemyState::Patrol => route.current(),
            EnemyState::Chase => registry
                .nearest_player(position)
                .map(|nearest| nearest.position),
            EnemyState::Idle | EnemyState::PlayerDetected | EnemyState::Attack => None,
        };

        input.direction = match target {
            Some(target) => {
                let offset = target - position;
                Vec3::new(offset.x, 0.0, offset.z).normalize_or_zero()
            }
            None => Vec3::ZERO,
        };
    }
}
