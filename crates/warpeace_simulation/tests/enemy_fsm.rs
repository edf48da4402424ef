//! Интеграционные тесты enemy FSM
//!
//! Враг + игрок в полной симуляции, переходы наблюдаем через EnemyStateChanged.

use bevy::prelude::*;
use warpeace_simulation::{
    advance_tick, create_simulation_app, spawn_enemy, spawn_player, DamageDealt, EnemyFsm,
    EnemyState, EnemyStateChanged, Health, PatrolRoute, PlayerRegistry, SimulationConfig,
};

struct Skirmish {
    app: App,
    config: SimulationConfig,
    enemy: Entity,
    player: Option<Entity>,
}

fn skirmish(player_at: Option<Vec3>, patrol: Vec<Vec3>) -> Skirmish {
    let config = SimulationConfig::default();
    let mut app = create_simulation_app(config.clone()).unwrap();

    let (enemy, player) = {
        let world = app.world_mut();
        let mut commands = world.commands();
        let enemy = spawn_enemy(
            &mut commands,
            &config,
            Vec3::ZERO,
            patrol,
            config.weapon("claws").unwrap(),
        );
        let player = player_at.map(|position| {
            spawn_player(&mut commands, &config, 0, position, config.weapon("sword").unwrap())
        });
        drop(commands);
        world.flush();
        (enemy, player)
    };

    Skirmish {
        app,
        config,
        enemy,
        player,
    }
}

impl Skirmish {
    /// Один тик → переходы FSM этого тика
    fn tick(&mut self) -> Vec<(EnemyState, EnemyState)> {
        advance_tick(&mut self.app);
        self.app
            .world()
            .resource::<Events<EnemyStateChanged>>()
            .iter_current_update_events()
            .filter(|event| event.entity == self.enemy)
            .map(|event| (event.from, event.to))
            .collect()
    }

    fn run_until<F>(&mut self, max_ticks: usize, mut done: F) -> Vec<(EnemyState, EnemyState)>
    where
        F: FnMut(&App) -> bool,
    {
        let mut transitions = Vec::new();
        for _ in 0..max_ticks {
            transitions.extend(self.tick());
            if done(&self.app) {
                break;
            }
        }
        transitions
    }

    fn state(&self) -> EnemyState {
        self.app
            .world()
            .get::<EnemyFsm>(self.enemy)
            .map(EnemyFsm::state)
            .unwrap_or_default()
    }

    fn teleport_player(&mut self, to: Vec3) {
        let player = self.player.unwrap();
        self.app
            .world_mut()
            .get_mut::<Transform>(player)
            .unwrap()
            .translation = to;
    }
}

#[test]
fn test_detect_chase_attack_sequence() {
    let mut skirmish = skirmish(Some(Vec3::new(5.0, 0.0, 0.0)), vec![Vec3::new(0.0, 0.0, -20.0)]);
    let player = skirmish.player.unwrap();

    let transitions = skirmish.run_until(600, |app| {
        app.world()
            .resource::<Events<DamageDealt>>()
            .iter_current_update_events()
            .any(|event| event.target == player)
    });

    assert_eq!(
        transitions,
        vec![
            (EnemyState::Patrol, EnemyState::PlayerDetected),
            (EnemyState::PlayerDetected, EnemyState::Chase),
            (EnemyState::Chase, EnemyState::Attack),
        ]
    );

    let hp = skirmish.app.world().get::<Health>(player).unwrap().current();
    assert!(hp < skirmish.config.player_max_health);
}

#[test]
fn test_player_escape_cancels_attack() {
    let mut skirmish = skirmish(Some(Vec3::new(1.0, 0.0, 0.0)), vec![Vec3::new(0.0, 0.0, -20.0)]);

    skirmish.run_until(300, |app| {
        app.world()
            .resource::<Events<EnemyStateChanged>>()
            .iter_current_update_events()
            .any(|event| event.to == EnemyState::Attack)
    });
    assert_eq!(skirmish.state(), EnemyState::Attack);

    skirmish.teleport_player(Vec3::new(50.0, 0.0, 0.0));
    let transitions = skirmish.tick();

    assert_eq!(transitions, vec![(EnemyState::Attack, EnemyState::Idle)]);
    let fsm = skirmish.app.world().get::<EnemyFsm>(skirmish.enemy).unwrap();
    assert!(fsm.attack().is_none(), "Attack.exit must cancel the repeating attack");
}

#[test]
fn test_patrol_without_players_cycles_route() {
    let mut skirmish = skirmish(None, vec![Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO]);

    // ~0.33s до первой точки, 2s Idle, затем обратно
    let transitions = skirmish.run_until(400, |_| false);

    assert!(transitions.len() >= 3, "transitions = {:?}", transitions);
    assert_eq!(
        &transitions[..3],
        &[
            (EnemyState::Patrol, EnemyState::Idle),
            (EnemyState::Idle, EnemyState::Patrol),
            (EnemyState::Patrol, EnemyState::Idle),
        ]
    );

    assert!(skirmish
        .app
        .world()
        .resource::<PlayerRegistry>()
        .all_incapacitated_or_dead());

    let route = skirmish.app.world().get::<PatrolRoute>(skirmish.enemy).unwrap();
    assert_eq!(route.current_index() % 2, transitions.iter().filter(|t| t.1 == EnemyState::Idle).count() % 2);
}
