//! Combat system module
//!
//! ECS ответственность:
//! - CombatAction payload (profile + attacker + knockback origin)
//! - Carriers (melee strike / projectile), контакты, резолв урона и лечения
//! - Knockback маршрутизация
//!
//! Поток одного удара:
//! AttackIntent → fire_weapons → carrier → (detect_contacts | rapier) → ContactEvent
//! → resolve_contacts → Health + knockback → DamageDealt / HealApplied

use bevy::prelude::*;

pub mod action;
pub mod carrier;
pub mod contact;
pub mod events;
pub mod knockback;
pub mod resolution;
pub mod roll;
pub mod weapon;

pub use action::{
    CombatAction, CombatProfile, CombatProfileConfig, ContactModel, KnockbackDirection,
};
pub use carrier::{
    move_projectiles, spawn_carrier, tick_carrier_lifetimes, ActionCarrier, CarrierLifetime,
    ProjectileMotion,
};
pub use contact::{detect_contacts, spheres_overlap, ContactOverlaps, ContactRadius, Hurtbox};
pub use events::{
    CarrierConsumed, CombatReport, ContactEvent, ContactFailed, ContactIgnored, DamageDealt,
    HealApplied, IgnoreReason,
};
pub use knockback::{knockback_direction, resolve_knockback, KnockbackRoute, KnockbackTarget};
pub use resolution::{
    decide_contact, resolve_contact, resolve_contacts, ContactDecision, ContactOutcome,
    ContactTarget,
};
pub use roll::{roll_damage, DamageRoll};
pub use weapon::{
    fire_weapons, tick_weapon_cooldowns, AttackIntent, Weapon, WeaponConfig, WeaponDelivery,
    WeaponFired,
};

use crate::SimulationSet;

/// Combat Plugin
///
/// Порядок выполнения (FixedUpdate):
/// - Physics: move_projectiles
/// - Contacts: detect_contacts → resolve_contacts
/// - Vitals: tick_carrier_lifetimes (после контактов — carrier успевает попасть на последнем тике)
/// - Attacks: tick_weapon_cooldowns → fire_weapons
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<ContactEvent>()
            .add_event::<DamageDealt>()
            .add_event::<HealApplied>()
            .add_event::<ContactIgnored>()
            .add_event::<ContactFailed>()
            .add_event::<CarrierConsumed>()
            .add_event::<AttackIntent>()
            .add_event::<WeaponFired>();

        app.add_systems(
            FixedUpdate,
            (
                move_projectiles.in_set(SimulationSet::Physics),
                (detect_contacts, resolve_contacts)
                    .chain()
                    .in_set(SimulationSet::Contacts),
                tick_carrier_lifetimes.in_set(SimulationSet::Vitals),
                (tick_weapon_cooldowns, fire_weapons)
                    .chain()
                    .in_set(SimulationSet::Attacks),
            ),
        );
    }
}
