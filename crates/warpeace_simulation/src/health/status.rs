//! Damage over time (горение)
//!
//! Бьёт через `hurt_ignoring_invulnerability` — окно неуязвимости его не останавливает.

use bevy::prelude::*;

use crate::health::{Health, HealthNotifier};

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Burning {
    pub damage_per_tick: u32,
    /// Интервал между тиками урона (секунды)
    pub interval: f32,
    /// Сколько ещё горит (секунды)
    pub remaining: f32,
    /// Кто поджёг
    pub source: Option<Entity>,
    timer: f32,
}

impl Burning {
    pub fn new(damage_per_tick: u32, interval: f32, duration: f32) -> Self {
        Self {
            damage_per_tick,
            interval,
            remaining: duration,
            source: None,
            timer: 0.0,
        }
    }

    pub fn from_source(mut self, source: Entity) -> Self {
        self.source = Some(source);
        self
    }

    /// Сколько тиков урона наступило за delta (0 или 1)
    fn advance(&mut self, delta: f32) -> bool {
        self.remaining -= delta;
        self.timer += delta;
        if self.interval > 0.0 && self.timer >= self.interval {
            self.timer -= self.interval;
            return true;
        }
        false
    }

    pub fn is_extinguished(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Система: тик горения
pub fn tick_burning(
    mut commands: Commands,
    mut burning: Query<(Entity, &mut Burning, &mut Health)>,
    mut notifier: HealthNotifier,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut burn, mut health) in burning.iter_mut() {
        if health.is_alive() && burn.advance(delta) {
            let change = health.hurt_ignoring_invulnerability(burn.damage_per_tick);
            notifier.publish(entity, change, burn.source);
        }

        if burn.is_extinguished() || health.is_dead() {
            commands.entity(entity).remove::<Burning>();
        }
    }
}
