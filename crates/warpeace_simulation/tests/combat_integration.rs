//! Интеграционные тесты combat системы
//!
//! Полный fixed тик: detect_contacts → resolve_contacts → Health / knockback → события.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionEvent, RigidBody};
use bevy_rapier3d::rapier::geometry::CollisionEventFlags;
use warpeace_simulation::combat::{
    ContactIgnored, ContactRadius, IgnoreReason, KnockbackRoute,
};
use warpeace_simulation::health::{HealthChangeKind, HealthChanged, InvulnerabilityRefresh};
use warpeace_simulation::physics::RapierContactBridgePlugin;
use warpeace_simulation::{
    advance_tick, advance_ticks, create_headless_app, create_simulation_app, ActionCarrier,
    Actor, Burning, CameraFocus, CombatAction, CombatProfileConfig, ConfigError, ContactEvent,
    ContactModel, DamageDealt, Dead, DeathBehavior, EntityDied, HealApplied, Health, Hurtbox,
    Knockbackable, PhysicsBody, Player, PlayerAttackInput, ReviveRequest, SimulationConfig,
    SimulationPlugin, ENEMY_FACTION, PLAYER_FACTION,
};

fn app() -> App {
    create_simulation_app(SimulationConfig::default()).unwrap()
}

fn events<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world()
        .resource::<Events<E>>()
        .iter_current_update_events()
        .cloned()
        .collect()
}

fn spawn_attacker(app: &mut App, faction_id: u64) -> Entity {
    app.world_mut()
        .spawn((Actor::new(faction_id), Transform::default()))
        .id()
}

fn spawn_target(app: &mut App, faction_id: u64, health: Health, at: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Actor::new(faction_id),
            health,
            Hurtbox::default(),
            Transform::from_translation(at),
        ))
        .id()
}

/// Carrier, висящий на месте с радиусом контакта
fn spawn_carrier(app: &mut App, carrier: ActionCarrier, at: Vec3) -> Entity {
    app.world_mut()
        .spawn((carrier, ContactRadius(0.5), Transform::from_translation(at)))
        .id()
}

fn health(app: &App, entity: Entity) -> u32 {
    app.world()
        .get::<Health>(entity)
        .map(Health::current)
        .unwrap_or_default()
}

#[test]
fn test_basic_hurt_consumes_carrier() {
    let mut app = app();
    let attacker = spawn_attacker(&mut app, ENEMY_FACTION);
    let target = spawn_target(&mut app, PLAYER_FACTION, Health::new(100), Vec3::X);

    let profile = CombatProfileConfig::damage("club", 10, 50).build().unwrap();
    let carrier = spawn_carrier(
        &mut app,
        ActionCarrier::new(
            CombatAction::new(attacker, profile),
            ContactModel::Piercing,
            ENEMY_FACTION,
            Vec3::X,
        ),
        Vec3::new(0.5, 0.0, 0.0),
    );

    advance_tick(&mut app);

    let hp = health(&app, target);
    assert!((50..=90).contains(&hp), "HP = {}", hp);
    assert!(app.world().get_entity(carrier).is_err(), "carrier must be consumed");

    let damage = events::<DamageDealt>(&app);
    assert_eq!(damage.len(), 1);
    assert_eq!(damage[0].attacker, attacker);
    assert_eq!(damage[0].applied, 100 - hp);
}

#[test]
fn test_critical_heal_adds_exactly_double() {
    let mut app = app();
    let healer = spawn_attacker(&mut app, PLAYER_FACTION);
    let mut wounded = Health::new(100);
    wounded.hurt(95);
    let target = spawn_target(&mut app, PLAYER_FACTION, wounded, Vec3::X);

    let profile = CombatProfileConfig::heal("potion", 45, 45)
        .with_critical(100.0, 2.0)
        .build()
        .unwrap();
    spawn_carrier(
        &mut app,
        ActionCarrier::new(
            CombatAction::new(healer, profile),
            ContactModel::Piercing,
            PLAYER_FACTION,
            Vec3::X,
        ),
        Vec3::new(0.5, 0.0, 0.0),
    );

    advance_tick(&mut app);

    assert_eq!(health(&app, target), 95);
    let heals = events::<HealApplied>(&app);
    assert_eq!(heals.len(), 1);
    assert_eq!(heals[0].applied, 90);
    assert!(heals[0].critical);
}

#[test]
fn test_friendly_strike_is_ignored() {
    let mut app = app();
    let attacker = spawn_attacker(&mut app, PLAYER_FACTION);
    let ally = spawn_target(&mut app, PLAYER_FACTION, Health::new(100), Vec3::X);

    let carrier = spawn_carrier(
        &mut app,
        ActionCarrier::new(
            CombatAction::new(attacker, CombatProfileConfig::damage("sword", 10, 10).build().unwrap()),
            ContactModel::Piercing,
            PLAYER_FACTION,
            Vec3::X,
        ),
        Vec3::new(0.5, 0.0, 0.0),
    );

    advance_tick(&mut app);

    assert_eq!(health(&app, ally), 100);
    assert!(app.world().get_entity(carrier).is_ok(), "ignored contact keeps carrier");
    assert_eq!(
        events::<ContactIgnored>(&app),
        vec![ContactIgnored {
            carrier,
            target: ally,
            reason: IgnoreReason::Polarity,
        }]
    );
}

#[test]
fn test_friendly_fire_hurts_ally() {
    let mut app = app();
    let attacker = spawn_attacker(&mut app, PLAYER_FACTION);
    let ally = spawn_target(&mut app, PLAYER_FACTION, Health::new(100), Vec3::X);

    let profile = CombatProfileConfig::damage("grenade", 20, 20)
        .with_friendly_fire(true)
        .build()
        .unwrap();
    spawn_carrier(
        &mut app,
        ActionCarrier::new(
            CombatAction::new(attacker, profile),
            ContactModel::Piercing,
            PLAYER_FACTION,
            Vec3::X,
        ),
        Vec3::new(0.5, 0.0, 0.0),
    );

    advance_tick(&mut app);

    assert_eq!(health(&app, ally), 80);
}

#[test]
fn test_knockback_moves_generic_body() {
    let mut app = app();
    let attacker = spawn_attacker(&mut app, ENEMY_FACTION);
    let target = app
        .world_mut()
        .spawn((
            Actor::new(PLAYER_FACTION),
            Health::new(100),
            Hurtbox::default(),
            PhysicsBody::default(),
            Transform::from_translation(Vec3::X),
        ))
        .id();

    let profile = CombatProfileConfig::damage("shove", 1, 1)
        .with_knockback(1.0, 1.0)
        .build()
        .unwrap();
    spawn_carrier(
        &mut app,
        ActionCarrier::new(
            CombatAction::new(attacker, profile),
            ContactModel::Piercing,
            ENEMY_FACTION,
            Vec3::X,
        ),
        Vec3::new(0.5, 0.0, 0.0),
    );

    advance_tick(&mut app);
    let damage = events::<DamageDealt>(&app);
    assert_eq!(damage[0].knockback, KnockbackRoute::Body);

    // ~20 секунд: damped velocity успевает погаснуть
    advance_ticks(&mut app, 1200);

    let position = app.world().get::<Transform>(target).unwrap().translation;
    let displacement = position - Vec3::X;
    assert!(
        (displacement - Vec3::X).length() < 0.1,
        "displacement = {:?}",
        displacement
    );
}

#[test]
fn test_repeated_contact_in_one_tick_is_suppressed() {
    let mut app = app();
    let attacker = spawn_attacker(&mut app, ENEMY_FACTION);
    let target = spawn_target(&mut app, PLAYER_FACTION, Health::new(100), Vec3::new(30.0, 0.0, 0.0));

    // Без ContactRadius: контакты приходят только вручную
    let carrier = app
        .world_mut()
        .spawn((
            ActionCarrier::new(
                CombatAction::new(attacker, CombatProfileConfig::damage("spear", 7, 7).build().unwrap()),
                ContactModel::Piercing,
                ENEMY_FACTION,
                Vec3::X,
            )
            .with_pierces(5),
            Transform::default(),
        ))
        .id();

    for _ in 0..2 {
        app.world_mut().send_event(ContactEvent {
            carrier,
            target,
            pre_contact_velocity: None,
        });
    }
    advance_tick(&mut app);

    assert_eq!(health(&app, target), 93);
    assert_eq!(events::<DamageDealt>(&app).len(), 1);
    let ignored = events::<ContactIgnored>(&app);
    assert_eq!(ignored.len(), 1);
    assert_eq!(ignored[0].reason, IgnoreReason::RepeatedContact);
    assert!(app.world().get_entity(carrier).is_ok());
}

#[test]
fn test_carrier_hitting_carrier_is_ignored() {
    let mut app = app();
    let attacker = spawn_attacker(&mut app, ENEMY_FACTION);
    let carrier = |app: &mut App| {
        app.world_mut()
            .spawn((
                ActionCarrier::new(
                    CombatAction::new(attacker, CombatProfileConfig::damage("bolt", 5, 5).build().unwrap()),
                    ContactModel::Piercing,
                    ENEMY_FACTION,
                    Vec3::X,
                ),
                Transform::default(),
            ))
            .id()
    };
    let first = carrier(&mut app);
    let second = carrier(&mut app);

    app.world_mut().send_event(ContactEvent {
        carrier: first,
        target: second,
        pre_contact_velocity: None,
    });
    advance_tick(&mut app);

    let ignored = events::<ContactIgnored>(&app);
    assert_eq!(ignored.len(), 1);
    assert_eq!(ignored[0].reason, IgnoreReason::CarrierTarget);
    assert!(app.world().get_entity(first).is_ok());
    assert!(app.world().get_entity(second).is_ok());
}

#[test]
fn test_target_without_health_is_ignored() {
    let mut app = app();
    let attacker = spawn_attacker(&mut app, ENEMY_FACTION);
    let wall = app
        .world_mut()
        .spawn((Hurtbox::default(), Transform::from_translation(Vec3::X)))
        .id();

    let carrier = spawn_carrier(
        &mut app,
        ActionCarrier::new(
            CombatAction::new(attacker, CombatProfileConfig::damage("rock", 5, 5).build().unwrap()),
            ContactModel::Piercing,
            ENEMY_FACTION,
            Vec3::X,
        ),
        Vec3::new(0.5, 0.0, 0.0),
    );

    advance_tick(&mut app);

    let ignored = events::<ContactIgnored>(&app);
    assert_eq!(ignored.len(), 1);
    assert_eq!(ignored[0].target, wall);
    assert_eq!(ignored[0].reason, IgnoreReason::NoHealth);
    assert!(app.world().get_entity(carrier).is_ok());
}

#[test]
fn test_player_attack_on_hold_hits_enemy() {
    let config = SimulationConfig::default();
    let mut app = create_simulation_app(config.clone()).unwrap();
    let sword = config.weapon("sword").unwrap();
    let claws = config.weapon("claws").unwrap();

    let (player, enemy) = {
        let world = app.world_mut();
        let mut commands = world.commands();
        let player = warpeace_simulation::spawn_player(&mut commands, &config, 0, Vec3::ZERO, sword);
        // Враг вне агро: стоит на месте (пустой маршрут), сам не атакует
        let enemy = warpeace_simulation::spawn_enemy(
            &mut commands,
            &config,
            Vec3::new(0.0, 0.0, 1.0),
            Vec::new(),
            claws,
        );
        commands.entity(player).insert(PlayerAttackInput { held: true });
        drop(commands);
        world.flush();
        (player, enemy)
    };

    // Тик 1: intent + спавн strike, тик 2: контакт
    advance_ticks(&mut app, 2);

    assert!(health(&app, enemy) < config.enemy_max_health);
    assert!(app.world().get::<Player>(player).is_some());
}

#[test]
fn test_enemy_death_despawns_after_delay() {
    let config = SimulationConfig::default();
    let mut app = create_simulation_app(config.clone()).unwrap();
    let attacker = spawn_attacker(&mut app, PLAYER_FACTION);
    let enemy = {
        let world = app.world_mut();
        let mut commands = world.commands();
        let enemy = warpeace_simulation::spawn_enemy(
            &mut commands,
            &config,
            Vec3::X,
            Vec::new(),
            config.weapon("claws").unwrap(),
        );
        drop(commands);
        world.flush();
        enemy
    };

    let profile = CombatProfileConfig::damage("execute", 500, 500).build().unwrap();
    spawn_carrier(
        &mut app,
        ActionCarrier::new(
            CombatAction::new(attacker, profile),
            ContactModel::Piercing,
            PLAYER_FACTION,
            Vec3::X,
        ),
        Vec3::new(0.5, 0.0, 0.0),
    );

    advance_tick(&mut app);

    let died = events::<EntityDied>(&app);
    assert_eq!(died.len(), 1);
    assert_eq!(died[0].entity, enemy);
    assert_eq!(died[0].killer, Some(attacker));
    assert!(app.world().get::<Dead>(enemy).is_some());

    // corpse_despawn_delay = 2.0s → 120 тиков + запас
    advance_ticks(&mut app, 125);
    assert!(app.world().get_entity(enemy).is_err());
}

#[test]
fn test_dead_player_persists_until_revived() {
    let config = SimulationConfig::default();
    let mut app = create_simulation_app(config.clone()).unwrap();
    let attacker = spawn_attacker(&mut app, ENEMY_FACTION);
    let player = {
        let world = app.world_mut();
        let mut commands = world.commands();
        let player = warpeace_simulation::spawn_player(
            &mut commands,
            &config,
            0,
            Vec3::X,
            config.weapon("sword").unwrap(),
        );
        drop(commands);
        world.flush();
        player
    };

    advance_tick(&mut app);
    assert!(app.world().resource::<CameraFocus>().contains(player));

    spawn_carrier(
        &mut app,
        ActionCarrier::new(
            CombatAction::new(attacker, CombatProfileConfig::damage("doom", 999, 999).build().unwrap()),
            ContactModel::Piercing,
            ENEMY_FACTION,
            Vec3::X,
        ),
        Vec3::new(0.5, 0.0, 0.0),
    );
    advance_tick(&mut app);

    assert_eq!(health(&app, player), 0);
    assert!(app.world().get::<Dead>(player).is_some());
    assert!(!app.world().resource::<CameraFocus>().contains(player));

    // Persist: труп не исчезает
    advance_ticks(&mut app, 300);
    assert!(app.world().get_entity(player).is_ok());

    app.world_mut().send_event(ReviveRequest { entity: player });
    advance_tick(&mut app);

    assert_eq!(health(&app, player), config.player_max_health);
    assert!(app.world().get::<Dead>(player).is_none());
    assert!(app.world().resource::<CameraFocus>().contains(player));
}

#[test]
fn test_knockback_without_body_wears_off() {
    let mut app = app();
    let attacker = spawn_attacker(&mut app, ENEMY_FACTION);
    let target = app
        .world_mut()
        .spawn((
            Actor::new(PLAYER_FACTION),
            Health::new(100),
            Hurtbox::default(),
            Knockbackable::new(0.1),
            Transform::from_translation(Vec3::X),
        ))
        .id();

    let profile = CombatProfileConfig::damage("shove", 1, 1)
        .with_knockback(1.0, 5.0)
        .build()
        .unwrap();
    spawn_carrier(
        &mut app,
        ActionCarrier::new(
            CombatAction::new(attacker, profile),
            ContactModel::Piercing,
            ENEMY_FACTION,
            Vec3::X,
        ),
        Vec3::new(0.5, 0.0, 0.0),
    );

    advance_tick(&mut app);
    assert_eq!(events::<DamageDealt>(&app)[0].knockback, KnockbackRoute::Knockbackable);
    assert!(app.world().get::<Knockbackable>(target).unwrap().is_knocked_back());

    // 0.1s = 6 тиков + запас
    advance_ticks(&mut app, 30);
    assert!(!app.world().get::<Knockbackable>(target).unwrap().is_knocked_back());
}

#[test]
fn test_burning_hits_through_invulnerability_until_death() {
    let mut app = app();
    let mut ledger = Health::new(10).with_invulnerability(5.0, InvulnerabilityRefresh::Keep);
    ledger.hurt(1);
    assert!(ledger.is_invulnerable());

    let target = app
        .world_mut()
        .spawn((
            Actor::new(PLAYER_FACTION),
            ledger,
            DeathBehavior::Persist,
            Burning::new(3, 0.1, 10.0),
            Transform::default(),
        ))
        .id();

    let mut changes: Vec<HealthChanged> = Vec::new();
    let mut deaths: Vec<EntityDied> = Vec::new();
    for _ in 0..60 {
        advance_tick(&mut app);
        changes.extend(events::<HealthChanged>(&app));
        deaths.extend(events::<EntityDied>(&app));
    }

    let currents: Vec<u32> = changes
        .iter()
        .filter(|change| change.entity == target && change.kind == HealthChangeKind::Hurt)
        .map(|change| change.current)
        .collect();
    assert_eq!(currents, vec![6, 3, 0]);
    assert!(changes.iter().all(|change| change.source.is_none()));

    assert_eq!(
        deaths,
        vec![EntityDied {
            entity: target,
            killer: None
        }]
    );
    assert_eq!(health(&app, target), 0);
    assert!(app.world().get::<Dead>(target).is_some());
    assert!(app.world().get::<Burning>(target).is_none());
}

#[test]
fn test_rapier_collision_resolves_through_bridge() {
    let config = SimulationConfig::default();
    let mut app = create_headless_app(config.seed);
    app.insert_resource(config)
        .add_plugins((SimulationPlugin, RapierContactBridgePlugin));
    app.update();

    let attacker = spawn_attacker(&mut app, ENEMY_FACTION);
    let target = spawn_target(&mut app, PLAYER_FACTION, Health::new(100), Vec3::new(20.0, 0.0, 0.0));
    // Без ContactRadius: контакт приходит только от rapier
    let carrier = app
        .world_mut()
        .spawn((
            ActionCarrier::new(
                CombatAction::new(attacker, CombatProfileConfig::damage("arrow", 7, 7).build().unwrap()),
                ContactModel::Piercing,
                ENEMY_FACTION,
                Vec3::X,
            ),
            Transform::from_translation(Vec3::new(19.5, 0.0, 0.0)),
        ))
        .id();

    app.world_mut().send_event(CollisionEvent::Started(
        target,
        carrier,
        CollisionEventFlags::empty(),
    ));
    advance_tick(&mut app);

    assert_eq!(health(&app, target), 93);
    assert_eq!(events::<DamageDealt>(&app).len(), 1);
    assert!(app.world().get_entity(carrier).is_err());
}

#[test]
fn test_rapier_body_is_not_integrated_headless() {
    let mut app = app();
    let body = app
        .world_mut()
        .spawn((
            RigidBody::Dynamic,
            PhysicsBody {
                velocity: Vec3::new(3.0, 0.0, 0.0),
                ..default()
            },
            Transform::default(),
        ))
        .id();
    let headless = app
        .world_mut()
        .spawn((
            PhysicsBody {
                velocity: Vec3::new(3.0, 0.0, 0.0),
                ..default()
            },
            Transform::default(),
        ))
        .id();

    advance_ticks(&mut app, 10);

    assert_eq!(app.world().get::<Transform>(body).unwrap().translation, Vec3::ZERO);
    assert!(app.world().get::<Transform>(headless).unwrap().translation.x > 0.0);
}

#[test]
fn test_invalid_tick_rate_is_rejected() {
    let config = SimulationConfig {
        tick_hz: 0.0,
        ..Default::default()
    };

    let result = create_simulation_app(config);
    assert!(matches!(
        result,
        Err(ConfigError::NonPositive { field: "tick_hz", .. })
    ));
}
