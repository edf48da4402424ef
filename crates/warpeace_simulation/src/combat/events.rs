//! Combat события
//!
//! ContactEvent — вход (физика / headless детектор), остальные — результат резолва.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::combat::{DamageRoll, KnockbackRoute};
use crate::error::CombatError;
use crate::feedback::AudioCue;

/// Событие: carrier коснулся entity
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ContactEvent {
    pub carrier: Entity,
    pub target: Entity,
    /// Velocity цели до того, как физика развела тела (для отмены impulse у Bouncing)
    pub pre_contact_velocity: Option<Vec3>,
}

/// Событие: урон нанесен
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub carrier: Entity,
    /// Выброшенное значение
    pub rolled: u32,
    /// Реально снятое HP (0 если цель неуязвима или уже на нуле)
    pub applied: u32,
    pub critical: bool,
    pub knockback: KnockbackRoute,
}

/// Событие: лечение применено
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HealApplied {
    pub healer: Entity,
    pub target: Entity,
    pub carrier: Entity,
    pub rolled: u32,
    pub applied: u32,
    pub critical: bool,
}

/// Почему контакт проигнорирован
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// У цели нет Health
    NoHealth,
    /// Полярность: лечение по врагу / урон по своему без friendly fire
    Polarity,
    /// Цель сама carrier (снаряд vs снаряд)
    CarrierTarget,
    /// Carrier коснулся своего атакующего
    SelfContact,
    /// Повторный контакт с той же целью подряд
    RepeatedContact,
}

/// Событие: контакт проигнорирован, carrier остаётся живым
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ContactIgnored {
    pub carrier: Entity,
    pub target: Entity,
    pub reason: IgnoreReason,
}

/// Событие: резолв контакта сломался (не путать с ignored)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ContactFailed {
    pub carrier: Entity,
    pub target: Entity,
    pub error: CombatError,
}

/// Событие: carrier израсходован (деспавн)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CarrierConsumed {
    pub carrier: Entity,
    pub target: Entity,
}

/// SystemParam: все выходы резолва контактов
#[derive(SystemParam)]
pub struct CombatReport<'w> {
    pub damage: EventWriter<'w, DamageDealt>,
    pub heals: EventWriter<'w, HealApplied>,
    pub ignored: EventWriter<'w, ContactIgnored>,
    pub failed: EventWriter<'w, ContactFailed>,
    pub consumed: EventWriter<'w, CarrierConsumed>,
    pub audio: EventWriter<'w, AudioCue>,
}

impl DamageDealt {
    pub fn from_roll(
        attacker: Entity,
        target: Entity,
        carrier: Entity,
        roll: DamageRoll,
        applied: u32,
        knockback: KnockbackRoute,
    ) -> Self {
        Self {
            attacker,
            target,
            carrier,
            rolled: roll.amount,
            applied,
            critical: roll.critical,
            knockback,
        }
    }
}
