//! Ошибки симуляции
//!
//! - `ConfigError` — нарушение инвариантов при сборке runtime типов из конфига (fail fast)
//! - `CombatError` — резолв контакта не смог завершиться (логируется и пропускается)

use bevy::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("damage range is inverted: min_damage {min} > max_damage {max}")]
    InvalidDamageRange { min: u32, max: u32 },

    #[error("critical chance {0} is outside [0, 100]")]
    CriticalChanceOutOfRange(f32),

    #[error("{field} must be a finite value >= 0, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be > 0, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("agro ranges must satisfy 0 <= min_agro_range ({min}) < max_agro_range ({max})")]
    InvalidAgroRanges { min: f32, max: f32 },

    #[error("unknown weapon `{0}`")]
    UnknownWeapon(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CombatError {
    #[error("neither knockback origin {origin:?} nor carrier {carrier:?} has a position")]
    MissingOrigin { origin: Entity, carrier: Entity },

    #[error("contact target {0:?} has health but no position")]
    MissingTargetPosition(Entity),
}

/// Проверка `value >= 0` (и не NaN)
pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

pub(crate) fn positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
