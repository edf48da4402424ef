//! PlayerRegistry — снимок игроков для AI на текущий тик
//!
//! Обновляется в начале SimulationSet::Ai. Записи отсортированы по `Player::index`,
//! поэтому nearest_player при равных расстояниях отдаёт меньший index.

use bevy::prelude::*;

use crate::health::Health;
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerEntry {
    pub index: u32,
    pub entity: Entity,
    pub position: Vec3,
    pub alive: bool,
}

/// Ближайший живой игрок
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPlayer {
    pub entity: Entity,
    pub position: Vec3,
    pub distance_squared: f32,
}

impl NearestPlayer {
    pub fn distance(&self) -> f32 {
        self.distance_squared.sqrt()
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerRegistry {
    entries: Vec<PlayerEntry>,
}

impl PlayerRegistry {
    pub fn from_entries(mut entries: Vec<PlayerEntry>) -> Self {
        entries.sort_by_key(|entry| entry.index);
        Self { entries }
    }

    pub fn entries(&self) -> &[PlayerEntry] {
        &self.entries
    }

    /// Ближайший живой игрок к `from` (мёртвые не учитываются)
    pub fn nearest_player(&self, from: Vec3) -> Option<NearestPlayer> {
        let mut nearest: Option<NearestPlayer> = None;

        for entry in self.entries.iter().filter(|entry| entry.alive) {
            let distance_squared = from.distance_squared(entry.position);
            // Строгое `<`: при равенстве остаётся игрок с меньшим index
            if nearest.is_none_or(|best| distance_squared < best.distance_squared) {
                nearest = Some(NearestPlayer {
                    entity: entry.entity,
                    position: entry.position,
                    distance_squared,
                });
            }
        }

        nearest
    }

    pub fn living_player_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.alive).count()
    }

    /// true когда живых игроков нет (в том числе когда игроков нет вообще)
    pub fn all_incapacitated_or_dead(&self) -> bool {
        self.living_player_count() == 0
    }
}

/// System: пересобрать PlayerRegistry из мира
pub fn refresh_player_registry(
    players: Query<(Entity, &Player, &Transform, &Health)>,
    mut registry: ResMut<PlayerRegistry>,
) {
    *registry = PlayerRegistry::from_entries(
        players
            .iter()
            .map(|(entity, player, transform, health)| PlayerEntry {
                index: player.index,
                entity,
                position: transform.translation,
                alive: health.is_alive(),
            })
            .collect(),
    );
}
