//! Player domain
//!
//! Компоненты игрока + атака на удержание.

use bevy::prelude::*;

pub mod player;

pub use player::{player_attack_on_hold, Facing, Player, PlayerAttackInput};

use crate::combat::{fire_weapons, tick_weapon_cooldowns};
use crate::SimulationSet;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            player_attack_on_hold
                .in_set(SimulationSet::Attacks)
                .after(tick_weapon_cooldowns)
                .before(fire_weapons),
        );
    }
}
