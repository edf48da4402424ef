//! Headless skirmish War And Peace
//!
//! Два игрока против патрулирующих врагов, без рендера.
//! Использование: `warpeace_simulation [config.json] [ticks]`

use bevy::prelude::*;
use warpeace_simulation::{
    advance_tick, create_simulation_app, log_error, log_info, spawn_enemy, spawn_player, Dead,
    DamageDealt, EntityDied, Facing, HealApplied, Player, PlayerAttackInput, SimulationConfig,
};

const DEFAULT_TICKS: usize = 1200;

fn main() {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => match SimulationConfig::from_path(&path) {
            Ok(config) => config,
            Err(error) => {
                log_error(&format!("Failed to load config '{}': {}", path, error));
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };
    let ticks = args
        .next()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    let mut app = match create_simulation_app(config.clone()) {
        Ok(app) => app,
        Err(error) => {
            log_error(&format!("Invalid config: {}", error));
            std::process::exit(1);
        }
    };
    log_info(&format!(
        "Starting War And Peace headless skirmish (seed: {}, {} ticks)",
        config.seed, ticks
    ));

    if let Err(error) = spawn_skirmish(app.world_mut(), &config) {
        log_error(&format!("Failed to spawn skirmish: {}", error));
        std::process::exit(1);
    }

    let mut damage_total = 0u32;
    let mut heal_total = 0u32;
    let mut deaths = 0usize;

    for tick in 0..ticks {
        aim_players_at_nearest_enemy(app.world_mut());
        advance_tick(&mut app);

        let world = app.world();
        damage_total += world
            .resource::<Events<DamageDealt>>()
            .iter_current_update_events()
            .map(|event| event.applied)
            .sum::<u32>();
        heal_total += world
            .resource::<Events<HealApplied>>()
            .iter_current_update_events()
            .map(|event| event.applied)
            .sum::<u32>();
        deaths += world
            .resource::<Events<EntityDied>>()
            .iter_current_update_events()
            .count();

        if tick % 100 == 0 {
            log_info(&format!(
                "Tick {}: {} entities, {} damage, {} healed, {} deaths",
                tick,
                app.world().entities().len(),
                damage_total,
                heal_total,
                deaths
            ));
        }
    }

    log_info("Simulation complete!");
}

fn spawn_skirmish(
    world: &mut World,
    config: &SimulationConfig,
) -> Result<(), warpeace_simulation::ConfigError> {
    let player_weapon = config.weapon(&config.player_weapon)?;
    let enemy_weapon = config.weapon(&config.enemy_weapon)?;

    let mut commands = world.commands();
    for (index, position) in [Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)]
        .into_iter()
        .enumerate()
    {
        let player = spawn_player(
            &mut commands,
            config,
            index as u32,
            position,
            player_weapon.clone(),
        );
        commands
            .entity(player)
            .insert(PlayerAttackInput { held: true });
    }

    spawn_enemy(
        &mut commands,
        config,
        Vec3::new(12.0, 0.0, 0.0),
        vec![Vec3::new(12.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 4.0)],
        enemy_weapon.clone(),
    );
    spawn_enemy(
        &mut commands,
        config,
        Vec3::new(-10.0, 0.0, 6.0),
        vec![Vec3::new(-10.0, 0.0, 6.0), Vec3::new(-3.0, 0.0, 0.0)],
        enemy_weapon,
    );
    drop(commands);
    world.flush();

    Ok(())
}

/// Input-коллаборатор: игрок смотрит на ближайшего врага
fn aim_players_at_nearest_enemy(world: &mut World) {
    let enemies: Vec<Vec3> = world
        .query_filtered::<&Transform, (With<warpeace_simulation::EnemyFsm>, Without<Dead>)>()
        .iter(world)
        .map(|transform| transform.translation)
        .collect();

    let mut players = world.query_filtered::<(&Transform, &mut Facing), With<Player>>();
    for (transform, mut facing) in players.iter_mut(world) {
        let position = transform.translation;
        let nearest = enemies.iter().min_by(|a, b| {
            position
                .distance_squared(**a)
                .total_cmp(&position.distance_squared(**b))
        });
        if let Some(target) = nearest {
            facing.0 = (*target - position).normalize_or(facing.0);
        }
    }
}
