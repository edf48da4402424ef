//! Резолв контакта carrier → цель
//!
//! Таблица решений (heal / friendly fire / своя фракция):
//!
//! | is_heal | friendly_fire | same_faction | решение |
//! |---------|---------------|--------------|---------|
//! | false   | false         | false        | Hurt    |
//! | false   | false         | true         | Ignore  |
//! | false   | true          | *            | Hurt    |
//! | true    | *             | true         | Heal    |
//! | true    | *             | false        | Ignore  |
//!
//! Hurt: roll → Health::hurt → knockback → carrier израсходован (с учётом pierce).
//! Heal: roll → Health::heal → carrier израсходован.
//! Ignore: carrier живёт дальше; Bouncing отменяет impulse разделения у цели.
//!
//! Позиции проверяются до мутаций: Failed не трогает Health.

use std::collections::HashSet;

use bevy::prelude::*;
use bevy_rapier3d::prelude::ExternalImpulse;
use rand::Rng;

use crate::actor::Actor;
use crate::combat::{
    knockback_direction, resolve_knockback, roll_damage, ActionCarrier, CarrierConsumed,
    CombatReport, ContactEvent, ContactFailed, ContactIgnored, ContactModel, DamageDealt,
    DamageRoll, HealApplied, IgnoreReason, KnockbackRoute, KnockbackTarget,
};
use crate::error::CombatError;
use crate::feedback::{AudioClip, AudioCue};
use crate::health::{Health, HealthChange, HealthNotifier};
use crate::physics::{Knockbackable, PhysicsBody};
use crate::DeterministicRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactDecision {
    Hurt,
    Heal,
    Ignore,
}

pub fn decide_contact(is_heal: bool, is_friendly_fire: bool, same_faction: bool) -> ContactDecision {
    match (is_heal, is_friendly_fire, same_faction) {
        (true, _, true) => ContactDecision::Heal,
        (true, _, false) => ContactDecision::Ignore,
        (false, true, _) => ContactDecision::Hurt,
        (false, false, true) => ContactDecision::Ignore,
        (false, false, false) => ContactDecision::Hurt,
    }
}

/// Результат одного контакта
#[derive(Debug, Clone, PartialEq)]
pub enum ContactOutcome {
    Hurt {
        roll: DamageRoll,
        change: HealthChange,
        knockback: KnockbackRoute,
        consumed: bool,
    },
    Healed {
        roll: DamageRoll,
        change: HealthChange,
    },
    Ignored(IgnoreReason),
    Failed(CombatError),
}

impl ContactOutcome {
    pub fn consumes_carrier(&self) -> bool {
        match self {
            Self::Hurt { consumed, .. } => *consumed,
            Self::Healed { .. } => true,
            Self::Ignored(_) | Self::Failed(_) => false,
        }
    }
}

/// Состояние цели контакта
#[derive(Default)]
pub struct ContactTarget<'a> {
    pub faction_id: Option<u64>,
    pub health: Option<&'a mut Health>,
    pub position: Option<Vec3>,
    pub knockbackable: Option<&'a mut Knockbackable>,
    pub impulse: Option<&'a mut ExternalImpulse>,
    pub body: Option<&'a mut PhysicsBody>,
}

/// Резолв одного контакта (без ECS, тестируется напрямую)
///
/// `carrier_position` / `origin_position` — позиции carrier'а и knockback origin,
/// если они есть в мире. Failed не записывается в `last_contacted`: повтор
/// после исправления позиций резолвится заново.
#[allow(clippy::too_many_arguments)]
pub fn resolve_contact<R: Rng + ?Sized>(
    carrier: &mut ActionCarrier,
    carrier_entity: Entity,
    carrier_position: Option<Vec3>,
    origin_position: Option<Vec3>,
    target_entity: Entity,
    target: ContactTarget<'_>,
    pre_contact_velocity: Option<Vec3>,
    rng: &mut R,
) -> ContactOutcome {
    if target_entity == carrier.action.attacker {
        return ContactOutcome::Ignored(IgnoreReason::SelfContact);
    }
    if carrier.last_contacted == Some(target_entity) {
        return ContactOutcome::Ignored(IgnoreReason::RepeatedContact);
    }

    let outcome = resolve_new_contact(
        carrier,
        carrier_entity,
        carrier_position,
        origin_position,
        target_entity,
        target,
        pre_contact_velocity,
        rng,
    );
    if !matches!(outcome, ContactOutcome::Failed(_)) {
        carrier.last_contacted = Some(target_entity);
    }
    outcome
}

#[allow(clippy::too_many_arguments)]
fn resolve_new_contact<R: Rng + ?Sized>(
    carrier: &mut ActionCarrier,
    carrier_entity: Entity,
    carrier_position: Option<Vec3>,
    origin_position: Option<Vec3>,
    target_entity: Entity,
    target: ContactTarget<'_>,
    pre_contact_velocity: Option<Vec3>,
    rng: &mut R,
) -> ContactOutcome {
    let ContactTarget {
        faction_id,
        health,
        position,
        knockbackable,
        impulse,
        body,
    } = target;

    let Some(health) = health else {
        cancel_separation(carrier.model, pre_contact_velocity, body);
        return ContactOutcome::Ignored(IgnoreReason::NoHealth);
    };

    let same_faction = faction_id == Some(carrier.faction_id);
    let profile = &carrier.action.profile;

    match decide_contact(profile.is_heal(), profile.is_friendly_fire(), same_faction) {
        ContactDecision::Ignore => {
            cancel_separation(carrier.model, pre_contact_velocity, body);
            ContactOutcome::Ignored(IgnoreReason::Polarity)
        }
        ContactDecision::Heal => {
            let roll = roll_damage(&carrier.action, rng);
            let change = health.heal(roll.amount);
            ContactOutcome::Healed { roll, change }
        }
        ContactDecision::Hurt => {
            let Some(target_position) = position else {
                return ContactOutcome::Failed(CombatError::MissingTargetPosition(target_entity));
            };
            let Some(origin) = origin_position.or(carrier_position) else {
                return ContactOutcome::Failed(CombatError::MissingOrigin {
                    origin: carrier.action.knockback_origin,
                    carrier: carrier_entity,
                });
            };

            let roll = roll_damage(&carrier.action, rng);
            let change = health.hurt(roll.amount);

            let direction = knockback_direction(
                profile.knockback_direction(),
                target_position,
                origin,
                carrier.heading,
            );
            let knockback = resolve_knockback(
                direction,
                KnockbackTarget {
                    knockbackable,
                    impulse,
                    body,
                },
                profile.knockbackable_magnitude(),
                profile.knockback_magnitude(),
            );

            ContactOutcome::Hurt {
                roll,
                change,
                knockback,
                consumed: carrier.spend_hit(),
            }
        }
    }
}

/// Bouncing carrier на игнорируемой цели: физика уже развела тела, откатываем velocity
fn cancel_separation(model: ContactModel, pre_contact_velocity: Option<Vec3>, body: Option<&mut PhysicsBody>) {
    if model != ContactModel::Bouncing {
        return;
    }
    if let (Some(velocity), Some(body)) = (pre_contact_velocity, body) {
        body.velocity = velocity;
    }
}

/// Система: ContactEvent → урон / лечение / ignore
///
/// Контакты одного тика резолвятся по порядку событий. Израсходованный carrier
/// игнорирует оставшиеся контакты этого тика.
#[allow(clippy::type_complexity)]
pub fn resolve_contacts(
    mut commands: Commands,
    mut contacts: EventReader<ContactEvent>,
    mut carriers: Query<(&mut ActionCarrier, Option<&Transform>)>,
    mut targets: Query<
        (
            Option<&Actor>,
            Option<&mut Health>,
            Option<&Transform>,
            Option<&mut Knockbackable>,
            Option<&mut ExternalImpulse>,
            Option<&mut PhysicsBody>,
        ),
        Without<ActionCarrier>,
    >,
    positions: Query<&Transform>,
    mut rng: ResMut<DeterministicRng>,
    mut notifier: HealthNotifier,
    mut report: CombatReport,
) {
    let mut spent: HashSet<Entity> = HashSet::new();

    for contact in contacts.read() {
        if spent.contains(&contact.carrier) {
            continue;
        }

        let target_is_carrier = carriers.contains(contact.target);
        let Ok((mut carrier, carrier_transform)) = carriers.get_mut(contact.carrier) else {
            continue;
        };

        if target_is_carrier {
            report.ignored.write(ContactIgnored {
                carrier: contact.carrier,
                target: contact.target,
                reason: IgnoreReason::CarrierTarget,
            });
            continue;
        }

        let carrier_position = carrier_transform.map(|transform| transform.translation);
        let origin_position = positions
            .get(carrier.action.knockback_origin)
            .ok()
            .map(|transform| transform.translation);

        let outcome = match targets.get_mut(contact.target) {
            Ok((actor, health, transform, knockbackable, impulse, body)) => resolve_contact(
                &mut carrier,
                contact.carrier,
                carrier_position,
                origin_position,
                contact.target,
                ContactTarget {
                    faction_id: actor.map(|actor| actor.faction_id),
                    health: health.map(|health| health.into_inner()),
                    position: transform.map(|transform| transform.translation),
                    knockbackable: knockbackable.map(|knockbackable| knockbackable.into_inner()),
                    impulse: impulse.map(|impulse| impulse.into_inner()),
                    body: body.map(|body| body.into_inner()),
                },
                contact.pre_contact_velocity,
                &mut rng.rng,
            ),
            // Цель уже удалена из мира
            Err(_) => resolve_contact(
                &mut carrier,
                contact.carrier,
                carrier_position,
                origin_position,
                contact.target,
                ContactTarget::default(),
                contact.pre_contact_velocity,
                &mut rng.rng,
            ),
        };

        let attacker = carrier.action.attacker;
        let title = carrier.action.profile.title().to_string();

        match &outcome {
            ContactOutcome::Hurt {
                roll,
                change,
                knockback,
                ..
            } => {
                notifier.publish(contact.target, *change, Some(attacker));
                report.damage.write(DamageDealt::from_roll(
                    attacker,
                    contact.target,
                    contact.carrier,
                    *roll,
                    change.applied(),
                    *knockback,
                ));
                if change.applied() > 0 {
                    report.audio.write(AudioCue::at(AudioClip::Hurt, contact.target));
                }
                crate::log(&format!(
                    "⚔️ '{}' {:?} → {:?}: {} dmg{} (applied {}, knockback {:?})",
                    title,
                    attacker,
                    contact.target,
                    roll.amount,
                    if roll.critical { " CRIT" } else { "" },
                    change.applied(),
                    knockback
                ));
            }
            ContactOutcome::Healed { roll, change } => {
                notifier.publish(contact.target, *change, Some(attacker));
                report.heals.write(HealApplied {
                    healer: attacker,
                    target: contact.target,
                    carrier: contact.carrier,
                    rolled: roll.amount,
                    applied: change.applied(),
                    critical: roll.critical,
                });
                if change.applied() > 0 {
                    report.audio.write(AudioCue::at(AudioClip::Heal, contact.target));
                }
                crate::log(&format!(
                    "💚 '{}' {:?} → {:?}: +{} (applied {})",
                    title,
                    attacker,
                    contact.target,
                    roll.amount,
                    change.applied()
                ));
            }
            ContactOutcome::Ignored(reason) => {
                report.ignored.write(ContactIgnored {
                    carrier: contact.carrier,
                    target: contact.target,
                    reason: *reason,
                });
            }
            ContactOutcome::Failed(error) => {
                crate::log_error(&format!(
                    "Contact {:?} → {:?} failed: {}",
                    contact.carrier, contact.target, error
                ));
                report.failed.write(ContactFailed {
                    carrier: contact.carrier,
                    target: contact.target,
                    error: error.clone(),
                });
            }
        }

        if outcome.consumes_carrier() {
            spent.insert(contact.carrier);
            report.consumed.write(CarrierConsumed {
                carrier: contact.carrier,
                target: contact.target,
            });
            if let Ok(mut entity_commands) = commands.get_entity(contact.carrier) {
                entity_commands.despawn();
            }
        }
    }
}
