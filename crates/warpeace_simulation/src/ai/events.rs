//! AI Events

use bevy::prelude::*;

use crate::ai::EnemyState;

/// Враг сменил состояние FSM
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EnemyStateChanged {
    pub entity: Entity,
    pub from: EnemyState,
    pub to: EnemyState,
}
