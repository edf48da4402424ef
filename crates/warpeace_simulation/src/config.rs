//! SimulationConfig — JSON конфиг симуляции
//!
//! Загружается один раз, валидируется целиком (fail fast): runtime типы
//! (`Weapon`, `AIConfig`) после этого не перепроверяются.

use std::collections::BTreeMap;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::AIConfig;
use crate::combat::{
    CombatProfileConfig, ContactModel, KnockbackDirection, Weapon, WeaponConfig, WeaponDelivery,
};
use crate::error::{non_negative, positive, ConfigError};
use crate::physics::DEFAULT_KNOCKBACK_DURATION;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed DeterministicRng
    pub seed: u64,
    /// Частота FixedUpdate (Hz)
    pub tick_hz: f64,
    pub knockback_duration: f32,
    /// Окно неуязвимости игроков после урона (секунды)
    pub invulnerability_window: f32,
    /// Через сколько удаляется труп врага (секунды)
    pub corpse_despawn_delay: f32,
    pub player_max_health: u32,
    pub enemy_max_health: u32,
    pub player_move_speed: f32,
    pub enemy_move_speed: f32,
    pub hurtbox_radius: f32,
    pub ai: AIConfig,
    pub player_weapon: String,
    pub enemy_weapon: String,
    pub weapons: BTreeMap<String, WeaponConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let mut weapons = BTreeMap::new();
        weapons.insert(
            "sword".to_string(),
            WeaponConfig {
                profile: CombatProfileConfig::damage("sword", 10, 50)
                    .with_critical(10.0, 2.0)
                    .with_knockback(1.0, 6.0),
                delivery: WeaponDelivery::Melee {
                    reach: 1.0,
                    radius: 0.75,
                    lifetime: 0.1,
                },
                model: ContactModel::Piercing,
                pierce: 0,
                cooldown: 0.5,
            },
        );
        weapons.insert(
            "bow".to_string(),
            WeaponConfig {
                profile: CombatProfileConfig::damage("arrow", 8, 15)
                    .with_critical(20.0, 1.5)
                    .with_knockback(0.5, 3.0)
                    .with_knockback_direction(KnockbackDirection::CarrierHeading),
                delivery: WeaponDelivery::Ranged {
                    speed: 20.0,
                    radius: 0.2,
                    lifetime: 2.0,
                },
                model: ContactModel::Piercing,
                pierce: 1,
                cooldown: 0.8,
            },
        );
        weapons.insert(
            "healing_orb".to_string(),
            WeaponConfig {
                profile: CombatProfileConfig::heal("healing orb", 15, 25).with_critical(10.0, 2.0),
                delivery: WeaponDelivery::Ranged {
                    speed: 8.0,
                    radius: 0.3,
                    lifetime: 3.0,
                },
                model: ContactModel::Bouncing,
                pierce: 0,
                cooldown: 1.5,
            },
        );
        weapons.insert(
            "claws".to_string(),
            WeaponConfig {
                profile: CombatProfileConfig::damage("claws", 5, 12).with_knockback(1.0, 4.0),
                delivery: WeaponDelivery::Melee {
                    reach: 1.0,
                    radius: 1.0,
                    lifetime: 0.1,
                },
                model: ContactModel::Piercing,
                pierce: 0,
                cooldown: 0.5,
            },
        );

        Self {
            seed: 42,
            tick_hz: 60.0,
            knockback_duration: DEFAULT_KNOCKBACK_DURATION,
            invulnerability_window: 0.5,
            corpse_despawn_delay: 2.0,
            player_max_health: 100,
            enemy_max_health: 60,
            player_move_speed: 4.0,
            enemy_move_speed: 3.0,
            hurtbox_radius: 0.5,
            ai: AIConfig::default(),
            player_weapon: "sword".to_string(),
            enemy_weapon: "claws".to_string(),
            weapons,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tick_hz", self.tick_hz as f32)?;
        non_negative("knockback_duration", self.knockback_duration)?;
        non_negative("invulnerability_window", self.invulnerability_window)?;
        non_negative("corpse_despawn_delay", self.corpse_despawn_delay)?;
        non_negative("player_move_speed", self.player_move_speed)?;
        non_negative("enemy_move_speed", self.enemy_move_speed)?;
        positive("hurtbox_radius", self.hurtbox_radius)?;
        self.ai.validate()?;

        for name in self.weapons.keys() {
            self.weapon(name)?;
        }
        self.weapon(&self.player_weapon)?;
        self.weapon(&self.enemy_weapon)?;
        Ok(())
    }

    /// Собрать `Weapon` по имени из таблицы оружия
    pub fn weapon(&self, name: &str) -> Result<Weapon, ConfigError> {
        let config = self
            .weapons
            .get(name)
            .ok_or_else(|| ConfigError::UnknownWeapon(name.to_string()))?;
        Weapon::try_from(config.clone())
    }
}
