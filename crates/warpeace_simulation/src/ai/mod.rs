//! Enemy AI module
//!
//! FSM: Idle → Patrol → PlayerDetected → Chase → Attack по расстоянию до ближайшего игрока.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

pub use components::{AIConfig, AttackRepeat, EnemyFsm, EnemyState, PatrolRoute};
pub use events::EnemyStateChanged;
pub use systems::{
    ai_movement_from_state, enemy_attack_repeat, enemy_fsm_transitions, next_state, Perception,
};

use crate::registry::{refresh_player_registry, PlayerRegistry};
use crate::SimulationSet;

/// AI Plugin
///
/// Порядок выполнения (SimulationSet::Ai):
/// 1. refresh_player_registry — снимок игроков на тик
/// 2. enemy_fsm_transitions — переход FSM (максимум один)
/// 3. enemy_attack_repeat — AttackIntent в Attack state
/// 4. ai_movement_from_state — state → MovementInput (применится на следующем тике)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerRegistry>()
            .add_event::<EnemyStateChanged>()
            .add_systems(
                FixedUpdate,
                (
                    refresh_player_registry,
                    enemy_fsm_transitions,
                    enemy_attack_repeat,
                    ai_movement_from_state,
                )
                    .chain()
                    .in_set(SimulationSet::Ai),
            );
    }
}
