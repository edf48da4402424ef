//! Health module
//!
//! Ledger (HP + неуязвимость + смерть), damage over time, смерть/воскрешение.

use bevy::prelude::*;

pub mod death;
pub mod events;
pub mod ledger;
pub mod status;

pub use death::{
    despawn_after_timeout, handle_deaths, process_revive_requests, Dead, DeathBehavior,
    DespawnAfter,
};
pub use events::{EntityDied, EntityRevived, HealthChanged, HealthNotifier, ReviveRequest};
pub use ledger::{Health, HealthChange, HealthChangeKind, InvulnerabilityRefresh};
pub use status::{tick_burning, Burning};

use crate::SimulationSet;

/// Health Plugin
///
/// Порядок (SimulationSet::Vitals, после резолва контактов):
/// 1. tick_invulnerability — окна неуязвимости
/// 2. tick_burning — damage over time
/// 3. handle_deaths — EntityDied этого тика (контакты + горение)
/// 4. process_revive_requests
/// 5. despawn_after_timeout
pub struct HealthPlugin;

impl Plugin for HealthPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HealthChanged>()
            .add_event::<EntityDied>()
            .add_event::<EntityRevived>()
            .add_event::<ReviveRequest>()
            .add_systems(
                FixedUpdate,
                (
                    tick_invulnerability,
                    tick_burning,
                    handle_deaths,
                    process_revive_requests,
                    despawn_after_timeout,
                )
                    .chain()
                    .in_set(SimulationSet::Vitals),
            );
    }
}

/// Система: тик окон неуязвимости
pub fn tick_invulnerability(mut query: Query<&mut Health>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut health in query.iter_mut() {
        health.tick(delta);
    }
}
