//! Player components
//!
//! Отмечает entity которым управляет игрок через input (в отличие от AI).

use bevy::prelude::*;

use crate::actor::Actor;
use crate::combat::{AttackIntent, Weapon};
use crate::health::Dead;
use crate::physics::Knockbackable;

/// Игрок
///
/// `index` — порядковый номер (P1 = 0). При равных расстояниях AI выбирает меньший index.
///
/// # Архитектурная заметка
/// - AI systems ищут цели через PlayerRegistry (только игроки)
/// - Input коллаборатор пишет MovementInput / Facing / PlayerAttackInput
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
#[require(Actor, Facing, PlayerAttackInput)]
pub struct Player {
    pub index: u32,
}

/// Куда смотрит игрок (направление атаки)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing(pub Vec3);

impl Default for Facing {
    fn default() -> Self {
        Self(Vec3::Z)
    }
}

/// Кнопка атаки зажата
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerAttackInput {
    pub held: bool,
}

/// System: атака на удержание кнопки
///
/// Intent только когда cooldown готов: не спамим события каждый тик.
/// Под knockback атака подавлена.
pub fn player_attack_on_hold(
    players: Query<
        (
            Entity,
            &PlayerAttackInput,
            &Facing,
            &Weapon,
            Option<&Knockbackable>,
        ),
        (With<Player>, Without<Dead>),
    >,
    mut intents: EventWriter<AttackIntent>,
) {
    for (entity, input, facing, weapon, knockbackable) in players.iter() {
        if !input.held || !weapon.can_attack() {
            continue;
        }
        if knockbackable.is_some_and(Knockbackable::is_knocked_back) {
            continue;
        }

        intents.write(AttackIntent {
            attacker: entity,
            direction: facing.0,
        });
    }
}
