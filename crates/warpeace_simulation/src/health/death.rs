//! Смерть и воскрешение
//!
//! - Враги: `DeathBehavior::Despawn` → Dead + DespawnAfter (труп исчезает по таймеру)
//! - Игроки: `DeathBehavior::Persist` → Dead остаётся в мире, движение заблокировано,
//!   камера перестаёт держать его в фокусе. `ReviveRequest` откатывает всё назад.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::feedback::{AudioClip, AudioCue, FocusRequest};
use crate::health::{EntityDied, EntityRevived, Health, HealthNotifier, ReviveRequest};
use crate::physics::{MovementInput, PhysicsBody};
use crate::player::Player;

/// Компонент-маркер: entity мертв
///
/// Движение, AI и атаки мёртвых пропускаются (Without<Dead>).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Что происходит с entity после смерти
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeathBehavior {
    /// Удалить из мира через `delay` секунд
    Despawn { delay: f32 },
    /// Остаться в мире в состоянии Dead до воскрешения
    Persist,
}

impl Default for DeathBehavior {
    fn default() -> Self {
        Self::Despawn { delay: 0.0 }
    }
}

/// Компонент: деспавн через `remaining` секунд
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    pub remaining: f32,
}

/// Система: реакция на EntityDied
pub fn handle_deaths(
    mut commands: Commands,
    mut deaths: EventReader<EntityDied>,
    mut actors: Query<(
        Option<&DeathBehavior>,
        Option<&mut PhysicsBody>,
        Option<&mut MovementInput>,
    )>,
    mut focus: EventWriter<FocusRequest>,
    mut audio: EventWriter<AudioCue>,
) {
    for event in deaths.read() {
        let Ok((behavior, body, input)) = actors.get_mut(event.entity) else {
            continue;
        };

        audio.write(AudioCue::at(AudioClip::Death, event.entity));

        let Ok(mut entity_commands) = commands.get_entity(event.entity) else {
            continue;
        };
        entity_commands.insert(Dead);

        match behavior.copied().unwrap_or_default() {
            DeathBehavior::Despawn { delay } => {
                entity_commands.insert(DespawnAfter { remaining: delay });
                crate::log_info(&format!(
                    "⚰️ {:?} killed by {:?}, despawn in {:.2}s",
                    event.entity, event.killer, delay
                ));
            }
            DeathBehavior::Persist => {
                if let Some(mut body) = body {
                    body.velocity = Vec3::ZERO;
                }
                if let Some(mut input) = input {
                    input.direction = Vec3::ZERO;
                }
                focus.write(FocusRequest::Remove(event.entity));
                crate::log_info(&format!(
                    "💀 {:?} killed by {:?} (persists until revived)",
                    event.entity, event.killer
                ));
            }
        }
    }
}

/// Система: ReviveRequest → полный HP, снимаем Dead, возвращаем фокус камеры
pub fn process_revive_requests(
    mut commands: Commands,
    mut requests: EventReader<ReviveRequest>,
    mut actors: Query<(&mut Health, Has<Player>)>,
    mut notifier: HealthNotifier,
    mut revived: EventWriter<EntityRevived>,
    mut focus: EventWriter<FocusRequest>,
    mut audio: EventWriter<AudioCue>,
) {
    for request in requests.read() {
        let Ok((mut health, is_player)) = actors.get_mut(request.entity) else {
            crate::log_warning(&format!("ReviveRequest: {:?} has no Health", request.entity));
            continue;
        };

        let change = health.revive();
        if !change.is_changed() {
            continue;
        }

        notifier.publish(request.entity, change, None);
        revived.write(EntityRevived {
            entity: request.entity,
        });
        audio.write(AudioCue::at(AudioClip::Revive, request.entity));

        if let Ok(mut entity_commands) = commands.get_entity(request.entity) {
            entity_commands.remove::<(Dead, DespawnAfter)>();
        }
        if is_player {
            focus.write(FocusRequest::Add(request.entity));
        }

        crate::log_info(&format!("✨ {:?} revived ({} HP)", request.entity, health.current()));
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter
pub fn despawn_after_timeout(
    mut commands: Commands,
    mut query: Query<(Entity, &mut DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut despawn_after) in query.iter_mut() {
        despawn_after.remaining -= delta;
        if despawn_after.remaining <= 0.0 {
            crate::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
