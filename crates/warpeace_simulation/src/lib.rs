//! War And Peace Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (headless, детерминированная)
//!
//! Подсистемы:
//! - combat — CombatAction, carriers, резолв контактов, knockback
//! - health — HP ledger, неуязвимость, смерть/воскрешение, горение
//! - ai — enemy FSM (Idle/Patrol/PlayerDetected/Chase/Attack)
//! - physics — velocity интеграция, knockback состояние, мост к Rapier
//! - feedback — audio cues + camera focus для хоста

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod actor;
pub mod ai;
pub mod combat;
pub mod config;
pub mod error;
pub mod feedback;
pub mod health;
pub mod logger;
pub mod physics;
pub mod player;
pub mod registry;
pub mod spawn;

// Re-export основных типов для удобства
pub use actor::{Actor, ENEMY_FACTION, PLAYER_FACTION};
pub use ai::{AIConfig, AIPlugin, EnemyFsm, EnemyState, EnemyStateChanged, PatrolRoute};
pub use combat::{
    ActionCarrier, AttackIntent, CombatAction, CombatPlugin, CombatProfile, CombatProfileConfig,
    ContactEvent, ContactModel, DamageDealt, HealApplied, Hurtbox, KnockbackDirection, Weapon,
    WeaponDelivery,
};
pub use config::SimulationConfig;
pub use error::{CombatError, ConfigError};
pub use feedback::{AudioCue, CameraFocus, FeedbackPlugin, FocusRequest};
pub use health::{
    Burning, Dead, DeathBehavior, EntityDied, EntityRevived, Health, HealthChange, HealthPlugin,
    ReviveRequest,
};
pub use logger::*;
pub use physics::{KinematicController, Knockbackable, MovementInput, MovementPlugin, PhysicsBody};
pub use player::{Facing, Player, PlayerAttackInput, PlayerPlugin};
pub use registry::PlayerRegistry;
pub use spawn::{spawn_enemy, spawn_player};

/// Фазы одного fixed тика (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Ходьба, knockback, интеграция velocity, снаряды
    Physics,
    /// Детекция и резолв контактов carrier → цель
    Contacts,
    /// Неуязвимость, горение, смерть/воскрешение, lifetime carriers
    Vitals,
    /// PlayerRegistry, FSM врагов, AI движение
    Ai,
    /// Cooldowns, атака игрока, спавн carriers
    Attacks,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Берёт `SimulationConfig` из мира (если вставлен заранее), иначе default.
/// Конфиг должен быть проверен заранее (`SimulationConfig::validate`,
/// `create_simulation_app` делает это сам).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }

        let fixed = Time::<Fixed>::from_hz(config.tick_hz);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(fixed.timestep()))
            .insert_resource(fixed)
            .insert_resource(config)
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Physics,
                    SimulationSet::Contacts,
                    SimulationSet::Vitals,
                    SimulationSet::Ai,
                    SimulationSet::Attacks,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((
                MovementPlugin,
                CombatPlugin,
                HealthPlugin,
                FeedbackPlugin,
                AIPlugin,
                PlayerPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` продвигает часы ровно на один fixed timestep.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let fixed = Time::<Fixed>::from_hz(60.0);
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(fixed.timestep()))
        .insert_resource(fixed);

    app
}

/// Headless App с полной симуляцией, готовый к `advance_tick`
///
/// Конфиг проверяется до сборки App: невалидный (например `tick_hz <= 0`) → `ConfigError`.
pub fn create_simulation_app(config: SimulationConfig) -> Result<App, ConfigError> {
    config.validate()?;

    let mut app = create_headless_app(config.seed);
    app.insert_resource(config).add_plugins(SimulationPlugin);

    // Первый update только запускает часы (delta = 0, fixed тика нет)
    app.update();
    Ok(app)
}

/// Один fixed тик симуляции
pub fn advance_tick(app: &mut App) {
    app.update();
}

pub fn advance_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        advance_tick(app);
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
