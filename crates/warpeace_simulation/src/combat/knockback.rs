//! Knockback resolver
//!
//! Маршрутизация толчка по возможностям цели (приоритет сверху вниз):
//! 1. Knockbackable — кастомный knockback (direction × knockbackable_magnitude)
//! 2. rapier ExternalImpulse — generic тело под rapier
//! 3. PhysicsBody — generic тело headless (impulse direction × knockback_magnitude)
//! 4. ничего — no-op
//!
//! Любая magnitude ≤ 0 → knockback у action не настроен, пропускаем целиком.

use bevy::prelude::*;
use bevy_rapier3d::prelude::ExternalImpulse;

use crate::combat::KnockbackDirection;
use crate::physics::{Knockbackable, PhysicsBody};

/// Куда ушёл knockback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnockbackRoute {
    Knockbackable,
    RapierImpulse,
    Body,
    /// Нечего толкать
    NoBody,
    /// Magnitude не настроена или направление нулевое
    Skipped,
}

/// Возможности цели, которые может задеть knockback
#[derive(Default)]
pub struct KnockbackTarget<'a> {
    pub knockbackable: Option<&'a mut Knockbackable>,
    pub impulse: Option<&'a mut ExternalImpulse>,
    pub body: Option<&'a mut PhysicsBody>,
}

/// Направление толчка
///
/// FromOrigin: normalize(target - origin), полный 3D вектор.
/// CarrierHeading: куда летел carrier (быстрые снаряды проскакивают цель до контакта).
///
/// Горизонтальным толчок делает только `Knockbackable::consume`; generic impulse идёт по вектору как есть.
pub fn knockback_direction(
    mode: KnockbackDirection,
    target_position: Vec3,
    origin_position: Vec3,
    carrier_heading: Vec3,
) -> Vec3 {
    let raw = match mode {
        KnockbackDirection::FromOrigin => target_position - origin_position,
        KnockbackDirection::CarrierHeading => carrier_heading,
    };
    raw.normalize_or_zero()
}

pub fn resolve_knockback(
    direction: Vec3,
    target: KnockbackTarget<'_>,
    knockbackable_magnitude: f32,
    generic_magnitude: f32,
) -> KnockbackRoute {
    if knockbackable_magnitude <= 0.0 || generic_magnitude <= 0.0 {
        return KnockbackRoute::Skipped;
    }
    if direction == Vec3::ZERO {
        return KnockbackRoute::Skipped;
    }

    if let Some(knockbackable) = target.knockbackable {
        knockbackable.knockback(direction, knockbackable_magnitude);
        return KnockbackRoute::Knockbackable;
    }

    if let Some(impulse) = target.impulse {
        impulse.impulse += direction * generic_magnitude;
        return KnockbackRoute::RapierImpulse;
    }

    if let Some(body) = target.body {
        body.apply_impulse(direction * generic_magnitude);
        return KnockbackRoute::Body;
    }

    KnockbackRoute::NoBody
}
