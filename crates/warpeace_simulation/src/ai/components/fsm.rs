//! Enemy FSM components (state machine, config, patrol route).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{non_negative, positive, ConfigError};

/// Состояния врага
///
/// Начальное — Patrol. Терминального нет: цикл до смерти.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum EnemyState {
    Idle,
    #[default]
    Patrol,
    PlayerDetected,
    Chase,
    Attack,
}

/// Повторяющаяся атака (живёт между Attack.enter и Attack.exit)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AttackRepeat {
    /// Секунд до следующего удара (≤ 0 → бить сейчас)
    pub until_next: f32,
}

/// FSM врага
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(AIConfig, PatrolRoute)]
pub struct EnemyFsm {
    state: EnemyState,
    /// Время в текущем состоянии (секунды)
    state_time: f32,
    attack: Option<AttackRepeat>,
}

impl EnemyFsm {
    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    pub fn attack(&self) -> Option<&AttackRepeat> {
        self.attack.as_ref()
    }

    pub fn attack_mut(&mut self) -> Option<&mut AttackRepeat> {
        self.attack.as_mut()
    }

    pub fn advance(&mut self, delta: f32) {
        self.state_time += delta;
    }

    /// exit(текущее) → enter(next). Возвращает предыдущее состояние.
    pub fn transition_to(&mut self, next: EnemyState) -> EnemyState {
        let previous = self.state;
        self.exit();
        self.state = next;
        self.state_time = 0.0;
        self.enter();
        previous
    }

    fn enter(&mut self) {
        if self.state == EnemyState::Attack {
            // Первый удар сразу на входе, дальше по интервалу
            self.attack = Some(AttackRepeat { until_next: 0.0 });
        }
    }

    fn exit(&mut self) {
        if self.state == EnemyState::Attack {
            self.attack = None;
        }
    }
}

/// Параметры AI
///
/// Инвариант: 0 ≤ min_agro_range < max_agro_range.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AIConfig {
    /// Радиус обнаружения игрока (метры)
    pub min_agro_range: f32,
    /// Радиус потери игрока (метры)
    pub max_agro_range: f32,
    pub attack_range: f32,
    /// Сколько стоять в Idle перед патрулём (секунды)
    pub idle_duration: f32,
    /// Окно PlayerDetected перед погоней (секунды)
    pub detection_duration: f32,
    /// Интервал повторной атаки (секунды)
    pub attack_interval: f32,
    /// Точка патруля считается достигнутой ближе этого расстояния
    pub patrol_arrival_distance: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            min_agro_range: 6.0,
            max_agro_range: 10.0,
            attack_range: 1.5,
            idle_duration: 2.0,
            detection_duration: 0.5,
            attack_interval: 1.0,
            patrol_arrival_distance: 0.25,
        }
    }
}

impl AIConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = non_negative("min_agro_range", self.min_agro_range)?;
        let max = non_negative("max_agro_range", self.max_agro_range)?;
        if min >= max {
            return Err(ConfigError::InvalidAgroRanges { min, max });
        }
        non_negative("attack_range", self.attack_range)?;
        non_negative("idle_duration", self.idle_duration)?;
        non_negative("detection_duration", self.detection_duration)?;
        positive("attack_interval", self.attack_interval)?;
        non_negative("patrol_arrival_distance", self.patrol_arrival_distance)?;
        Ok(())
    }
}

/// Маршрут патруля (точки по кругу)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    points: Vec<Vec3>,
    next: usize,
}

impl PatrolRoute {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points, next: 0 }
    }

    /// Текущая цель патруля (None — маршрут пустой)
    pub fn current(&self) -> Option<Vec3> {
        self.points.get(self.next).copied()
    }

    pub fn current_index(&self) -> usize {
        self.next
    }

    /// Следующая точка (по кругу)
    pub fn advance(&mut self) {
        if !self.points.is_empty() {
            self.next = (self.next + 1) % self.points.len();
        }
    }

    /// Пустой маршрут считается достигнутым сразу
    pub fn reached(&self, position: Vec3, arrival_distance: f32) -> bool {
        match self.current() {
            Some(point) => {
                let flat = Vec3::new(point.x - position.x, 0.0, point.z - position.z);
                flat.length_squared() <= arrival_distance * arrival_distance
            }
            None => true,
        }
    }
}
