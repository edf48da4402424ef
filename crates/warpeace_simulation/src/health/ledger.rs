//! Health ledger — HP актора, окно неуязвимости, переход в смерть
//!
//! Инвариант: 0 ≤ current ≤ max
//!
//! Все изменения идут через один путь (`apply`):
//! 1. new = clamp(current ± delta, 0, max); не изменилось → `Unchanged`, никаких эффектов
//! 2. reaction hook (урон открывает окно неуязвимости)
//! 3. commit current
//! 4. current == 0 → dead (один раз)
//!
//! Уведомления (HealthChanged / EntityDied) публикует вызывающая система
//! по возвращённому `HealthChange`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Что делать с окном неуязвимости при уроне, который прошёл мимо окна
/// (`hurt_ignoring_invulnerability`, например горение)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvulnerabilityRefresh {
    /// Активное окно не продлевается (базовый ledger)
    #[default]
    Keep,
    /// Каждый урон перезапускает окно (игроки)
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum HealthChangeKind {
    Hurt,
    Heal,
    Revive,
}

/// Результат мутации ledger'а
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthChange {
    /// Отклонено: неуязвим (hurt) или мёртв (heal)
    Rejected,
    /// Clamp насытился — ничего не произошло
    Unchanged,
    Changed {
        kind: HealthChangeKind,
        previous: u32,
        current: u32,
        /// Этот вызов перевёл entity в dead
        died: bool,
    },
}

impl HealthChange {
    pub fn is_changed(&self) -> bool {
        matches!(self, HealthChange::Changed { .. })
    }

    pub fn died(&self) -> bool {
        matches!(self, HealthChange::Changed { died: true, .. })
    }

    /// Фактически применённая дельта (0 если не изменилось)
    pub fn applied(&self) -> u32 {
        match self {
            HealthChange::Changed { previous, current, .. } => previous.abs_diff(*current),
            _ => 0,
        }
    }
}

/// Здоровье актора
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: u32,
    max: u32,
    dead: bool,
    invulnerable_remaining: f32,
    /// Длительность окна неуязвимости после урона (секунды), 0 = без окна
    pub invulnerability_window: f32,
    pub refresh: InvulnerabilityRefresh,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            dead: max == 0,
            invulnerable_remaining: 0.0,
            invulnerability_window: 0.0,
            refresh: InvulnerabilityRefresh::Keep,
        }
    }

    pub fn with_invulnerability(mut self, window: f32, refresh: InvulnerabilityRefresh) -> Self {
        self.invulnerability_window = window.max(0.0);
        self.refresh = refresh;
        self
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_remaining > 0.0
    }

    pub fn invulnerable_remaining(&self) -> f32 {
        self.invulnerable_remaining
    }

    /// Урон; во время окна неуязвимости отклоняется
    pub fn hurt(&mut self, amount: u32) -> HealthChange {
        if self.is_invulnerable() {
            return HealthChange::Rejected;
        }
        self.apply(HealthChangeKind::Hurt, amount)
    }

    /// Урон в обход окна неуязвимости (damage over time)
    pub fn hurt_ignoring_invulnerability(&mut self, amount: u32) -> HealthChange {
        self.apply(HealthChangeKind::Hurt, amount)
    }

    /// Лечение; мёртвых лечить нельзя, только `revive`
    pub fn heal(&mut self, amount: u32) -> HealthChange {
        if self.dead {
            return HealthChange::Rejected;
        }
        self.apply(HealthChangeKind::Heal, amount)
    }

    /// Воскрешение: dead → alive с полным HP
    pub fn revive(&mut self) -> HealthChange {
        if !self.dead {
            return HealthChange::Unchanged;
        }

        let previous = self.current;
        self.dead = false;
        self.current = self.max;
        self.invulnerable_remaining = 0.0;

        HealthChange::Changed {
            kind: HealthChangeKind::Revive,
            previous,
            current: self.current,
            died: false,
        }
    }

    /// Тик окна неуязвимости
    pub fn tick(&mut self, delta: f32) {
        if self.invulnerable_remaining > 0.0 {
            self.invulnerable_remaining = (self.invulnerable_remaining - delta).max(0.0);
        }
    }

    fn apply(&mut self, kind: HealthChangeKind, amount: u32) -> HealthChange {
        let next = match kind {
            HealthChangeKind::Hurt => self.current.saturating_sub(amount),
            HealthChangeKind::Heal | HealthChangeKind::Revive => {
                self.current.saturating_add(amount).min(self.max)
            }
        };

        if next == self.current {
            return HealthChange::Unchanged;
        }

        // React, затем commit
        if kind == HealthChangeKind::Hurt {
            self.react_to_hurt();
        }

        let previous = self.current;
        self.current = next;

        let died = self.current == 0 && !self.dead;
        if died {
            self.dead = true;
        }

        HealthChange::Changed {
            kind,
            previous,
            current: self.current,
            died,
        }
    }

    fn react_to_hurt(&mut self) {
        if self.invulnerability_window <= 0.0 {
            return;
        }

        let restart = match self.refresh {
            InvulnerabilityRefresh::Keep => !self.is_invulnerable(),
            InvulnerabilityRefresh::Restart => true,
        };

        if restart {
            self.invulnerable_remaining = self.invulnerability_window;
        }
    }
}
