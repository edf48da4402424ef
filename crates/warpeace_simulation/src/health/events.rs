//! Health события + notifier

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::health::{HealthChange, HealthChangeKind};

/// Событие: HP изменилось (только при реальном изменении)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub kind: HealthChangeKind,
    pub previous: u32,
    pub current: u32,
    /// Кто вызвал изменение (атакующий, лекарь), None для DoT / revive
    pub source: Option<Entity>,
}

/// Событие: entity умер (current достиг 0)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Событие: entity воскрешён
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityRevived {
    pub entity: Entity,
}

/// Запрос на воскрешение (от внешней логики: союзник поднял игрока, респавн и т.д.)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ReviveRequest {
    pub entity: Entity,
}

/// SystemParam: публикация результата мутации ledger'а
///
/// Порядок: HealthChanged → EntityDied.
#[derive(SystemParam)]
pub struct HealthNotifier<'w> {
    changed: EventWriter<'w, HealthChanged>,
    died: EventWriter<'w, EntityDied>,
}

impl HealthNotifier<'_> {
    pub fn publish(&mut self, entity: Entity, change: HealthChange, source: Option<Entity>) {
        let HealthChange::Changed { kind, previous, current, died } = change else {
            return;
        };

        self.changed.write(HealthChanged {
            entity,
            kind,
            previous,
            current,
            source,
        });

        if died {
            self.died.write(EntityDied {
                entity,
                killer: source,
            });
        }
    }
}
