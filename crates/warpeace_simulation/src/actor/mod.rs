//! Actor — базовый компонент боевых сущностей (игроки, враги)
//!
//! Faction определяет полярность контакта: урон по своим только с friendly fire,
//! лечение только по своим.

use bevy::prelude::*;

use crate::health::Health;

/// Фракция игроков
pub const PLAYER_FACTION: u64 = 0;

/// Фракция врагов
pub const ENEMY_FACTION: u64 = 1;

/// Актор (игрок, враг)
///
/// Автоматически добавляет Health и Transform через Required Components.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
#[require(Health, Transform)]
pub struct Actor {
    /// Stable ID фракции
    pub faction_id: u64,
}

impl Actor {
    pub fn new(faction_id: u64) -> Self {
        Self { faction_id }
    }
}
