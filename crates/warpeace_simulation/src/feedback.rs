//! Feedback коллабораторы: звук и фокус камеры
//!
//! Симуляция только публикует намерения:
//! - AudioCue — fire-and-forget, хост проигрывает (или нет, ошибки в бой не попадают)
//! - FocusRequest — применяется к `CameraFocus` (идемпотентный набор целей камеры)

use bevy::prelude::*;

use crate::player::Player;
use crate::SimulationSet;

/// Какой звук проиграть
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AudioClip {
    Hurt,
    Heal,
    Death,
    Revive,
}

/// Событие: проиграть one-shot звук
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AudioCue {
    pub clip: AudioClip,
    pub volume_scale: f32,
    /// Кто звучит (для позиционирования)
    pub emitter: Option<Entity>,
}

impl AudioCue {
    pub fn at(clip: AudioClip, emitter: Entity) -> Self {
        Self {
            clip,
            volume_scale: 1.0,
            emitter: Some(emitter),
        }
    }
}

/// Событие: добавить/убрать entity из фокуса камеры
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    Add(Entity),
    Remove(Entity),
}

/// Кого камера держит в кадре
#[derive(Resource, Debug, Clone, Default)]
pub struct CameraFocus {
    targets: Vec<Entity>,
}

impl CameraFocus {
    /// Повторное добавление — no-op
    pub fn add(&mut self, entity: Entity) -> bool {
        if self.targets.contains(&entity) {
            return false;
        }
        self.targets.push(entity);
        true
    }

    /// Удаление отсутствующего — no-op
    pub fn remove(&mut self, entity: Entity) -> bool {
        let before = self.targets.len();
        self.targets.retain(|&e| e != entity);
        self.targets.len() != before
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.targets.contains(&entity)
    }

    pub fn targets(&self) -> &[Entity] {
        &self.targets
    }
}

pub struct FeedbackPlugin;

impl Plugin for FeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AudioCue>()
            .add_event::<FocusRequest>()
            .init_resource::<CameraFocus>()
            .add_systems(
                FixedUpdate,
                (focus_spawned_players, apply_focus_requests)
                    .chain()
                    .in_set(SimulationSet::Vitals)
                    .after(crate::health::handle_deaths)
                    .after(crate::health::process_revive_requests),
            );
    }
}

/// Система: новый игрок попадает в фокус камеры
pub fn focus_spawned_players(
    players: Query<Entity, Added<Player>>,
    mut focus: EventWriter<FocusRequest>,
) {
    for entity in players.iter() {
        focus.write(FocusRequest::Add(entity));
    }
}

/// Система: FocusRequest → CameraFocus
pub fn apply_focus_requests(mut requests: EventReader<FocusRequest>, mut focus: ResMut<CameraFocus>) {
    for request in requests.read() {
        match *request {
            FocusRequest::Add(entity) => {
                if focus.add(entity) {
                    crate::log(&format!("🎥 Camera focus + {:?}", entity));
                }
            }
            FocusRequest::Remove(entity) => {
                if focus.remove(entity) {
                    crate::log(&format!("🎥 Camera focus - {:?}", entity));
                }
            }
        }
    }
}
