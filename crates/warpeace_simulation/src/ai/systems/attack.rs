//! Enemy repeating attack (живёт между Attack.enter и Attack.exit).

use bevy::prelude::*;

use crate::ai::{AIConfig, EnemyFsm, EnemyState};
use crate::combat::AttackIntent;
use crate::health::Dead;
use crate::registry::PlayerRegistry;

/// Система: Attack state → AttackIntent каждые `attack_interval` секунд
///
/// Направление — на ближайшего живого игрока в момент удара.
pub fn enemy_attack_repeat(
    mut enemies: Query<(Entity, &Transform, &mut EnemyFsm, &AIConfig), Without<Dead>>,
    registry: Res<PlayerRegistry>,
    time: Res<Time<Fixed>>,
    mut intents: EventWriter<AttackIntent>,
) {
    let delta = time.delta_secs();

    for (entity, transform, mut fsm, config) in enemies.iter_mut() {
        if fsm.state() != EnemyState::Attack {
            continue;
        }
        let Some(attack) = fsm.attack_mut() else {
            continue;
        };

        // Первый удар — на тике входа (until_next == 0)
        if attack.until_next > 0.0 {
            attack.until_next -= delta;
            if attack.until_next > 0.0 {
                continue;
            }
        }

        let Some(nearest) = registry.nearest_player(transform.translation) else {
            continue;
        };

        attack.until_next += config.attack_interval;
        intents.write(AttackIntent {
            attacker: entity,
            direction: nearest.position - transform.translation,
        });
    }
}
