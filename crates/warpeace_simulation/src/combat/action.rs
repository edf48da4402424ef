//! CombatAction — "War And Peace" payload
//!
//! Архитектура:
//! - `CombatProfile` — проверенные числа оружия (урон, крит, knockback, полярность)
//! - `CombatAction` — profile + wiring (attacker, knockback origin), живёт в carrier entity
//! - `CombatProfileConfig` — serde-форма profile, валидируется через `TryFrom`
//!
//! Инварианты проверяются один раз при сборке profile, дальше не клампятся.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{non_negative, ConfigError};

/// Модель контакта carrier'а с целью
///
/// - Piercing: trigger-контакт, проходит сквозь цели (ignored → ничего не делаем)
/// - Bouncing: collider-контакт, физика отталкивает (ignored → отменяем impulse разделения)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactModel {
    #[default]
    Piercing,
    Bouncing,
}

/// Откуда берётся направление knockback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockbackDirection {
    /// normalize(target - knockback_origin)
    #[default]
    FromOrigin,
    /// Направление полёта carrier'а (быстрые снаряды успевают пролететь цель до контакта)
    CarrierHeading,
}

/// Проверенные параметры атаки/лечения
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct CombatProfile {
    title: String,
    is_heal: bool,
    is_friendly_fire: bool,
    critical_chance: f32,
    critical_multiplier: f32,
    min_damage: u32,
    max_damage: u32,
    knockback_magnitude: f32,
    knockbackable_magnitude: f32,
    knockback_direction: KnockbackDirection,
}

impl CombatProfile {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_heal(&self) -> bool {
        self.is_heal
    }

    pub fn is_friendly_fire(&self) -> bool {
        self.is_friendly_fire
    }

    /// Шанс крита в процентах, [0, 100]
    pub fn critical_chance(&self) -> f32 {
        self.critical_chance
    }

    pub fn critical_multiplier(&self) -> f32 {
        self.critical_multiplier
    }

    pub fn min_damage(&self) -> u32 {
        self.min_damage
    }

    pub fn max_damage(&self) -> u32 {
        self.max_damage
    }

    /// Impulse для generic physics тел
    pub fn knockback_magnitude(&self) -> f32 {
        self.knockback_magnitude
    }

    /// Скорость для Knockbackable entities
    pub fn knockbackable_magnitude(&self) -> f32 {
        self.knockbackable_magnitude
    }

    pub fn knockback_direction(&self) -> KnockbackDirection {
        self.knockback_direction
    }
}

impl Default for CombatProfile {
    fn default() -> Self {
        Self {
            title: "strike".to_string(),
            is_heal: false,
            is_friendly_fire: false,
            critical_chance: 0.0,
            critical_multiplier: 1.0,
            min_damage: 10,
            max_damage: 10,
            knockback_magnitude: 0.0,
            knockbackable_magnitude: 0.0,
            knockback_direction: KnockbackDirection::FromOrigin,
        }
    }
}

/// Serde-форма `CombatProfile` (JSON конфиг оружия)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatProfileConfig {
    pub title: String,
    pub is_heal: bool,
    pub is_friendly_fire: bool,
    pub critical_chance: f32,
    pub critical_multiplier: f32,
    pub min_damage: u32,
    pub max_damage: u32,
    pub knockback_magnitude: f32,
    pub knockbackable_magnitude: f32,
    pub knockback_direction: KnockbackDirection,
}

impl Default for CombatProfileConfig {
    fn default() -> Self {
        let profile = CombatProfile::default();
        Self {
            title: profile.title,
            is_heal: profile.is_heal,
            is_friendly_fire: profile.is_friendly_fire,
            critical_chance: profile.critical_chance,
            critical_multiplier: profile.critical_multiplier,
            min_damage: profile.min_damage,
            max_damage: profile.max_damage,
            knockback_magnitude: profile.knockback_magnitude,
            knockbackable_magnitude: profile.knockbackable_magnitude,
            knockback_direction: profile.knockback_direction,
        }
    }
}

impl CombatProfileConfig {
    pub fn damage(title: impl Into<String>, min_damage: u32, max_damage: u32) -> Self {
        Self {
            title: title.into(),
            min_damage,
            max_damage,
            ..Default::default()
        }
    }

    pub fn heal(title: impl Into<String>, min_heal: u32, max_heal: u32) -> Self {
        Self {
            is_heal: true,
            ..Self::damage(title, min_heal, max_heal)
        }
    }

    pub fn with_friendly_fire(mut self, enabled: bool) -> Self {
        self.is_friendly_fire = enabled;
        self
    }

    pub fn with_critical(mut self, chance: f32, multiplier: f32) -> Self {
        self.critical_chance = chance;
        self.critical_multiplier = multiplier;
        self
    }

    pub fn with_knockback(mut self, generic: f32, knockbackable: f32) -> Self {
        self.knockback_magnitude = generic;
        self.knockbackable_magnitude = knockbackable;
        self
    }

    pub fn with_knockback_direction(mut self, direction: KnockbackDirection) -> Self {
        self.knockback_direction = direction;
        self
    }

    pub fn build(self) -> Result<CombatProfile, ConfigError> {
        CombatProfile::try_from(self)
    }
}

impl TryFrom<CombatProfileConfig> for CombatProfile {
    type Error = ConfigError;

    fn try_from(config: CombatProfileConfig) -> Result<Self, Self::Error> {
        if config.min_damage > config.max_damage {
            return Err(ConfigError::InvalidDamageRange {
                min: config.min_damage,
                max: config.max_damage,
            });
        }

        if !(0.0..=100.0).contains(&config.critical_chance) {
            return Err(ConfigError::CriticalChanceOutOfRange(config.critical_chance));
        }

        Ok(Self {
            title: config.title,
            is_heal: config.is_heal,
            is_friendly_fire: config.is_friendly_fire,
            critical_chance: config.critical_chance,
            critical_multiplier: non_negative("critical_multiplier", config.critical_multiplier)?,
            min_damage: config.min_damage,
            max_damage: config.max_damage,
            knockback_magnitude: non_negative("knockback_magnitude", config.knockback_magnitude)?,
            knockbackable_magnitude: non_negative(
                "knockbackable_magnitude",
                config.knockbackable_magnitude,
            )?,
            knockback_direction: config.knockback_direction,
        })
    }
}

/// Payload атаки: profile + кто атакует + откуда толкать
///
/// Для melee `knockback_origin == attacker`, для снаряда — сам снаряд.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct CombatAction {
    pub attacker: Entity,
    pub knockback_origin: Entity,
    pub profile: CombatProfile,
}

impl CombatAction {
    /// Melee wiring: толкаем от атакующего
    pub fn new(attacker: Entity, profile: CombatProfile) -> Self {
        Self {
            attacker,
            knockback_origin: attacker,
            profile,
        }
    }

    pub fn with_knockback_origin(mut self, origin: Entity) -> Self {
        self.knockback_origin = origin;
        self
    }
}
