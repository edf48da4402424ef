//! Knockbackable — кастомный knockback вместо generic impulse
//!
//! Resolver (combat/knockback.rs) только выставляет состояние.
//! Потребляет его `apply_knockback_velocity`: пока активно, горизонтальная
//! velocity = direction × magnitude, ходьба не пишет velocity.

use bevy::prelude::*;

/// Длительность knockback по умолчанию (секунды)
pub const DEFAULT_KNOCKBACK_DURATION: f32 = 0.1;

/// Шаг потребления knockback за тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnockbackStep {
    /// Knockback не активен
    Idle,
    /// Активен: горизонтальная velocity на этот тик
    Push(Vec3),
    /// Только что закончился — горизонтальную скорость нужно погасить
    Finished,
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Knockbackable {
    /// Сколько длится один knockback (секунды)
    pub duration: f32,
    is_knocked_back: bool,
    direction: Vec3,
    magnitude: f32,
    remaining: f32,
}

impl Default for Knockbackable {
    fn default() -> Self {
        Self::new(DEFAULT_KNOCKBACK_DURATION)
    }
}

impl Knockbackable {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            is_knocked_back: false,
            direction: Vec3::ZERO,
            magnitude: 0.0,
            remaining: 0.0,
        }
    }

    pub fn is_knocked_back(&self) -> bool {
        self.is_knocked_back
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Новый knockback перезаписывает текущий и перезапускает таймер
    pub fn knockback(&mut self, direction: Vec3, magnitude: f32) {
        self.is_knocked_back = true;
        self.direction = direction;
        self.magnitude = magnitude;
        self.remaining = self.duration;
    }

    pub fn consume(&mut self, delta: f32) -> KnockbackStep {
        if !self.is_knocked_back {
            return KnockbackStep::Idle;
        }

        if self.remaining > f32::EPSILON {
            self.remaining -= delta;
            let push = self.direction * self.magnitude;
            return KnockbackStep::Push(Vec3::new(push.x, 0.0, push.z));
        }

        self.is_knocked_back = false;
        self.direction = Vec3::ZERO;
        self.magnitude = 0.0;
        self.remaining = 0.0;
        KnockbackStep::Finished
    }
}
