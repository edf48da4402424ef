//! Weapon — как актор доставляет CombatAction
//!
//! Архитектура (intent-based):
//! - Решение "атаковать" принимают AI (enemy_attack_repeat) и input (player_attack_on_hold)
//!   → AttackIntent
//! - fire_weapons проверяет cooldown и спавнит carrier (melee strike / projectile)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::combat::{spawn_carrier, CombatProfile, CombatProfileConfig, ContactModel};
use crate::error::{non_negative, positive, ConfigError};
use crate::health::Dead;

/// Способ доставки
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeaponDelivery {
    /// Сфера перед атакующим на `reach` метрах
    Melee { reach: f32, radius: f32, lifetime: f32 },
    /// Снаряд со скоростью `speed` m/s
    Ranged { speed: f32, radius: f32, lifetime: f32 },
}

impl Default for WeaponDelivery {
    fn default() -> Self {
        Self::Melee {
            reach: 1.0,
            radius: 0.75,
            lifetime: 0.1,
        }
    }
}

/// Оружие актора
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    pub profile: CombatProfile,
    pub delivery: WeaponDelivery,
    pub model: ContactModel,
    /// Сколько дополнительных целей пробивает Piercing carrier
    pub pierce: u32,
    /// Cooldown между атаками (секунды)
    pub cooldown: f32,
    /// Текущий cooldown таймер (0 = готов)
    pub cooldown_timer: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            profile: CombatProfile::default(),
            delivery: WeaponDelivery::default(),
            model: ContactModel::Piercing,
            pierce: 0,
            cooldown: 0.5,
            cooldown_timer: 0.0,
        }
    }
}

impl Weapon {
    pub fn can_attack(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    pub fn start_cooldown(&mut self) {
        self.cooldown_timer = self.cooldown;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }
    }
}

/// Serde-форма `Weapon`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub profile: CombatProfileConfig,
    #[serde(default)]
    pub delivery: WeaponDelivery,
    #[serde(default)]
    pub model: ContactModel,
    #[serde(default)]
    pub pierce: u32,
    #[serde(default = "default_cooldown")]
    pub cooldown: f32,
}

fn default_cooldown() -> f32 {
    0.5
}

impl TryFrom<WeaponConfig> for Weapon {
    type Error = ConfigError;

    fn try_from(config: WeaponConfig) -> Result<Self, Self::Error> {
        let delivery = match config.delivery {
            WeaponDelivery::Melee {
                reach,
                radius,
                lifetime,
            } => WeaponDelivery::Melee {
                reach: non_negative("reach", reach)?,
                radius: positive("radius", radius)?,
                lifetime: positive("lifetime", lifetime)?,
            },
            WeaponDelivery::Ranged {
                speed,
                radius,
                lifetime,
            } => WeaponDelivery::Ranged {
                speed: positive("speed", speed)?,
                radius: positive("radius", radius)?,
                lifetime: positive("lifetime", lifetime)?,
            },
        };

        Ok(Self {
            profile: CombatProfile::try_from(config.profile)?,
            delivery,
            model: config.model,
            pierce: config.pierce,
            cooldown: non_negative("cooldown", config.cooldown)?,
            cooldown_timer: 0.0,
        })
    }
}

/// Event: актор хочет атаковать в направлении `direction`
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AttackIntent {
    pub attacker: Entity,
    pub direction: Vec3,
}

/// Event: carrier заспавнен
#[derive(Event, Debug, Clone, PartialEq)]
pub struct WeaponFired {
    pub attacker: Entity,
    pub carrier: Entity,
}

/// System: обновление weapon cooldown таймеров
pub fn tick_weapon_cooldowns(mut query: Query<&mut Weapon>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut weapon in query.iter_mut() {
        weapon.tick(delta);
    }
}

/// System: AttackIntent → carrier
///
/// Intent на cooldown / от мёртвого / без Weapon отбрасывается.
pub fn fire_weapons(
    mut commands: Commands,
    mut intents: EventReader<AttackIntent>,
    mut attackers: Query<(&mut Weapon, &Actor, &Transform), Without<Dead>>,
    mut fired: EventWriter<WeaponFired>,
) {
    for intent in intents.read() {
        let Ok((mut weapon, actor, transform)) = attackers.get_mut(intent.attacker) else {
            continue;
        };

        if !weapon.can_attack() {
            continue;
        }

        weapon.start_cooldown();
        let carrier = spawn_carrier(
            &mut commands,
            &weapon,
            intent.attacker,
            actor.faction_id,
            transform.translation,
            intent.direction,
        );

        fired.write(WeaponFired {
            attacker: intent.attacker,
            carrier,
        });

        crate::log(&format!(
            "🗡️ {:?} uses '{}' → carrier {:?}",
            intent.attacker,
            weapon.profile.title(),
            carrier
        ));
    }
}
