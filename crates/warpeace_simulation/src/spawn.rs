//! Спавн игроков и врагов из SimulationConfig
//!
//! Единственное место, где собирается набор компонентов актора.

use bevy::prelude::*;

use crate::actor::{Actor, ENEMY_FACTION, PLAYER_FACTION};
use crate::ai::{EnemyFsm, PatrolRoute};
use crate::combat::{Hurtbox, Weapon};
use crate::config::SimulationConfig;
use crate::health::{DeathBehavior, Health, InvulnerabilityRefresh};
use crate::physics::{KinematicController, Knockbackable};
use crate::player::Player;

/// Заспавнить игрока
///
/// Игрок после смерти остаётся в мире (Persist) до ReviveRequest.
pub fn spawn_player(
    commands: &mut Commands,
    config: &SimulationConfig,
    index: u32,
    position: Vec3,
    weapon: Weapon,
) -> Entity {
    commands
        .spawn((
            Player { index },
            Actor::new(PLAYER_FACTION),
            Health::new(config.player_max_health)
                .with_invulnerability(config.invulnerability_window, InvulnerabilityRefresh::Restart),
            DeathBehavior::Persist,
            KinematicController {
                move_speed: config.player_move_speed,
            },
            Knockbackable::new(config.knockback_duration),
            Hurtbox {
                radius: config.hurtbox_radius,
            },
            weapon,
            Transform::from_translation(position),
        ))
        .id()
}

/// Заспавнить врага с патрульным маршрутом
pub fn spawn_enemy(
    commands: &mut Commands,
    config: &SimulationConfig,
    position: Vec3,
    patrol_points: Vec<Vec3>,
    weapon: Weapon,
) -> Entity {
    commands
        .spawn((
            EnemyFsm::default(),
            config.ai.clone(),
            PatrolRoute::new(patrol_points),
            Actor::new(ENEMY_FACTION),
            Health::new(config.enemy_max_health),
            DeathBehavior::Despawn {
                delay: config.corpse_despawn_delay,
            },
            KinematicController {
                move_speed: config.enemy_move_speed,
            },
            Knockbackable::new(config.knockback_duration),
            Hurtbox {
                radius: config.hurtbox_radius,
            },
            weapon,
            Transform::from_translation(position),
        ))
        .id()
}
