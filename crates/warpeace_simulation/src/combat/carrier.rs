//! Action carriers — melee удары и снаряды
//!
//! Carrier — временная entity с `ActionCarrier` + `ContactRadius`:
//! - Melee strike: стоит перед атакующим `lifetime` секунд, knockback от атакующего
//! - Projectile: летит по `ProjectileMotion`, knockback от самого снаряда
//!
//! Фракция атакующего снимается в момент спавна (атакующий может умереть раньше снаряда).

use bevy::prelude::*;

use crate::combat::{CombatAction, ContactModel, ContactRadius, Weapon, WeaponDelivery};

/// Компонент: entity несёт CombatAction до контакта
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ActionCarrier {
    pub action: CombatAction,
    pub model: ContactModel,
    /// Фракция атакующего на момент спавна
    pub faction_id: u64,
    /// Направление движения (для KnockbackDirection::CarrierHeading)
    pub heading: Vec3,
    /// Последняя цель контакта (подавляет повторный контакт подряд)
    pub last_contacted: Option<Entity>,
    /// Сколько ещё целей может пробить Piercing carrier, прежде чем израсходоваться
    pub pierces_remaining: u32,
}

impl ActionCarrier {
    pub fn new(action: CombatAction, model: ContactModel, faction_id: u64, heading: Vec3) -> Self {
        Self {
            action,
            model,
            faction_id,
            heading,
            last_contacted: None,
            pierces_remaining: 0,
        }
    }

    pub fn with_pierces(mut self, pierces: u32) -> Self {
        self.pierces_remaining = pierces;
        self
    }

    /// Засчитать попадание. true → carrier израсходован.
    pub fn spend_hit(&mut self) -> bool {
        if self.model == ContactModel::Piercing && self.pierces_remaining > 0 {
            self.pierces_remaining -= 1;
            return false;
        }
        true
    }
}

/// Компонент: время жизни carrier'а (секунды)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CarrierLifetime {
    pub remaining: f32,
}

/// Компонент: прямолинейное движение снаряда
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ProjectileMotion {
    pub velocity: Vec3,
}

/// Заспавнить carrier для выстрела/удара оружием
///
/// `direction` — куда смотрит атакующий (нормализуется, вертикаль отбрасывается).
pub fn spawn_carrier(
    commands: &mut Commands,
    weapon: &Weapon,
    attacker: Entity,
    faction_id: u64,
    attacker_position: Vec3,
    direction: Vec3,
) -> Entity {
    let heading = Vec3::new(direction.x, 0.0, direction.z).normalize_or(Vec3::Z);
    let action = CombatAction::new(attacker, weapon.profile.clone());

    match weapon.delivery {
        WeaponDelivery::Melee {
            reach,
            radius,
            lifetime,
        } => commands
            .spawn((
                ActionCarrier::new(action, weapon.model, faction_id, heading)
                    .with_pierces(weapon.pierce),
                ContactRadius(radius),
                CarrierLifetime {
                    remaining: lifetime,
                },
                Transform::from_translation(attacker_position + heading * reach),
            ))
            .id(),
        WeaponDelivery::Ranged {
            speed,
            radius,
            lifetime,
        } => {
            // Снаряд сам себе knockback origin → нужен id до вставки компонентов
            let projectile = commands.spawn_empty().id();
            commands.entity(projectile).insert((
                ActionCarrier::new(
                    action.with_knockback_origin(projectile),
                    weapon.model,
                    faction_id,
                    heading,
                )
                .with_pierces(weapon.pierce),
                ContactRadius(radius),
                CarrierLifetime {
                    remaining: lifetime,
                },
                ProjectileMotion {
                    velocity: heading * speed,
                },
                Transform::from_translation(attacker_position),
            ));
            projectile
        }
    }
}

/// Система: движение снарядов
pub fn move_projectiles(
    mut projectiles: Query<(&ProjectileMotion, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (motion, mut transform) in projectiles.iter_mut() {
        transform.translation += motion.velocity * delta;
    }
}

/// Система: истечение времени жизни carriers
pub fn tick_carrier_lifetimes(
    mut commands: Commands,
    mut carriers: Query<(Entity, &mut CarrierLifetime)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut lifetime) in carriers.iter_mut() {
        lifetime.remaining -= delta;
        if lifetime.remaining <= 0.0 {
            if let Ok(mut entity_commands) = commands.get_entity(entity) {
                entity_commands.despawn();
            }
        }
    }
}
