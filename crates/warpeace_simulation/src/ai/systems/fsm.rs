//! Enemy FSM transitions.
//!
//! | State          | Выход (приоритет 1)          | →              | Выход (приоритет 2)        | →      |
//! |----------------|------------------------------|----------------|----------------------------|--------|
//! | Idle           | игрок в min_agro_range       | PlayerDetected | idle_duration истёк        | Patrol |
//! | Patrol         | игрок в min_agro_range       | PlayerDetected | точка патруля достигнута   | Idle   |
//! | PlayerDetected | игрок вне max_agro_range     | Idle           | detection_duration истёк   | Chase  |
//! | Chase          | игрок вне max_agro_range     | Idle           | игрок в attack_range       | Attack |
//! | Attack         | игрок вне max_agro_range     | Idle           | игрок вне attack_range     | Chase  |
//!
//! Не больше одного перехода за тик. Нет живых игроков → "не в радиусе" для любых проверок.

use bevy::prelude::*;

use crate::ai::{AIConfig, EnemyFsm, EnemyState, EnemyStateChanged, PatrolRoute};
use crate::health::Dead;
use crate::registry::PlayerRegistry;

/// Что враг знает на этом тике
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Perception {
    /// Квадрат расстояния до ближайшего живого игрока
    pub nearest_distance_squared: Option<f32>,
    pub reached_patrol_point: bool,
}

impl Perception {
    fn within(&self, range: f32) -> bool {
        self.nearest_distance_squared
            .is_some_and(|distance_squared| distance_squared <= range * range)
    }
}

/// Чистая функция перехода: None — остаёмся в текущем состоянии
pub fn next_state(
    state: EnemyState,
    state_time: f32,
    config: &AIConfig,
    perception: &Perception,
) -> Option<EnemyState> {
    let detected = perception.within(config.min_agro_range);
    let in_agro = perception.within(config.max_agro_range);
    let in_attack = perception.within(config.attack_range);

    match state {
        EnemyState::Idle if detected => Some(EnemyState::PlayerDetected),
        EnemyState::Idle if state_time >= config.idle_duration => Some(EnemyState::Patrol),
        EnemyState::Patrol if detected => Some(EnemyState::PlayerDetected),
        EnemyState::Patrol if perception.reached_patrol_point => Some(EnemyState::Idle),
        EnemyState::PlayerDetected | EnemyState::Chase | EnemyState::Attack if !in_agro => {
            Some(EnemyState::Idle)
        }
        EnemyState::PlayerDetected if state_time >= config.detection_duration => {
            Some(EnemyState::Chase)
        }
        EnemyState::Chase if in_attack => Some(EnemyState::Attack),
        EnemyState::Attack if !in_attack => Some(EnemyState::Chase),
        _ => None,
    }
}

/// Система: FSM переходы врагов
pub fn enemy_fsm_transitions(
    mut enemies: Query<
        (Entity, &Transform, &mut EnemyFsm, &AIConfig, &mut PatrolRoute),
        Without<Dead>,
    >,
    registry: Res<PlayerRegistry>,
    time: Res<Time<Fixed>>,
    mut changes: EventWriter<EnemyStateChanged>,
) {
    let delta = time.delta_secs();

    for (entity, transform, mut fsm, config, mut route) in enemies.iter_mut() {
        fsm.advance(delta);

        let position = transform.translation;
        let perception = Perception {
            nearest_distance_squared: registry
                .nearest_player(position)
                .map(|nearest| nearest.distance_squared),
            reached_patrol_point: fsm.state() == EnemyState::Patrol
                && route.reached(position, config.patrol_arrival_distance),
        };

        let Some(next) = next_state(fsm.state(), fsm.state_time(), config, &perception) else {
            continue;
        };

        if fsm.state() == EnemyState::Patrol && next == EnemyState::Idle {
            route.advance();
        }

        let previous = fsm.transition_to(next);
        changes.write(EnemyStateChanged {
            entity,
            from: previous,
            to: next,
        });

        crate::log(&format!(
            "🤖 Enemy {:?}: {:?} → {:?}",
            entity, previous, next
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sees(distance: f32) -> Perception {
        Perception {
            nearest_distance_squared: Some(distance * distance),
            reached_patrol_point: false,
        }
    }

    fn nobody() -> Perception {
        Perception::default()
    }

    #[test]
    fn test_patrol_detects_player() {
        let config = AIConfig::default();
        assert_eq!(
            next_state(EnemyState::Patrol, 0.0, &config, &sees(5.0)),
            Some(EnemyState::PlayerDetected)
        );
        assert_eq!(next_state(EnemyState::Patrol, 0.0, &config, &sees(7.0)), None);
    }

    #[test]
    fn test_patrol_point_reached_goes_idle() {
        let config = AIConfig::default();
        let perception = Perception {
            reached_patrol_point: true,
            ..nobody()
        };
        assert_eq!(
            next_state(EnemyState::Patrol, 0.0, &config, &perception),
            Some(EnemyState::Idle)
        );
    }

    #[test]
    fn test_detection_beats_arrival() {
        let config = AIConfig::default();
        let perception = Perception {
            nearest_distance_squared: Some(1.0),
            reached_patrol_point: true,
        };
        assert_eq!(
            next_state(EnemyState::Patrol, 0.0, &config, &perception),
            Some(EnemyState::PlayerDetected)
        );
    }

    #[test]
    fn test_idle_timer() {
        let config = AIConfig::default();
        assert_eq!(next_state(EnemyState::Idle, 1.9, &config, &nobody()), None);
        assert_eq!(
            next_state(EnemyState::Idle, 2.0, &config, &nobody()),
            Some(EnemyState::Patrol)
        );
    }

    #[test]
    fn test_detection_window_then_chase() {
        let config = AIConfig::default();
        assert_eq!(
            next_state(EnemyState::PlayerDetected, 0.1, &config, &sees(8.0)),
            None
        );
        assert_eq!(
            next_state(EnemyState::PlayerDetected, 0.5, &config, &sees(8.0)),
            Some(EnemyState::Chase)
        );
    }

    #[test]
    fn test_leaving_max_agro_returns_to_idle() {
        let config = AIConfig::default();
        for state in [
            EnemyState::PlayerDetected,
            EnemyState::Chase,
            EnemyState::Attack,
        ] {
            assert_eq!(
                next_state(state, 10.0, &config, &sees(10.5)),
                Some(EnemyState::Idle),
                "{state:?}"
            );
            assert_eq!(
                next_state(state, 10.0, &config, &nobody()),
                Some(EnemyState::Idle),
                "{state:?}"
            );
        }
    }

    #[test]
    fn test_chase_attack_cycle() {
        let config = AIConfig::default();
        assert_eq!(
            next_state(EnemyState::Chase, 0.0, &config, &sees(1.5)),
            Some(EnemyState::Attack)
        );
        assert_eq!(next_state(EnemyState::Attack, 0.0, &config, &sees(1.0)), None);
        assert_eq!(
            next_state(EnemyState::Attack, 0.0, &config, &sees(2.0)),
            Some(EnemyState::Chase)
        );
    }

    #[test]
    fn test_attack_range_from_patrol_goes_through_detection() {
        // Игрок появился вплотную: Chase не пропускается, переход один за тик
        let config = AIConfig::default();
        assert_eq!(
            next_state(EnemyState::Patrol, 0.0, &config, &sees(0.5)),
            Some(EnemyState::PlayerDetected)
        );
    }
}
