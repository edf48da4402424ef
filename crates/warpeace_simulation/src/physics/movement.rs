//! Kinematic контроллер для NPC/игрока + generic physics тела
//!
//! Архитектура:
//! - `PhysicsBody` — своя velocity интеграция (headless), linear damping
//! - `KinematicController` + `MovementInput` — ходьба (velocity пишется каждый тик)
//! - `Knockbackable` в активном состоянии перекрывает ходьбу (movement не пишет velocity)
//! - Тела под rapier (`RigidBody`) двигает rapier, headless интеграция их пропускает
//!
//! Детерминизм: fixed timestep, порядок систем через `.chain()`

use bevy::prelude::*;
use bevy_rapier3d::prelude::RigidBody;

use crate::health::Dead;
use crate::physics::{KnockbackStep, Knockbackable};

/// Тело с velocity (generic physics body)
///
/// Knockback без `Knockbackable` приходит сюда как impulse: velocity += impulse / mass.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
    pub mass: f32,
    /// Доля скорости, теряемая за секунду (1.0 → impulse 1 сдвигает тело массы 1 на ~1м)
    pub linear_damping: f32,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass: 1.0,
            linear_damping: 1.0,
        }
    }
}

impl PhysicsBody {
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }
}

/// Kinematic контроллер компонент
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(PhysicsBody, MovementInput)]
pub struct KinematicController {
    /// Скорость движения (m/s)
    pub move_speed: f32,
}

impl Default for KinematicController {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
        }
    }
}

/// Входные данные для движения
///
/// Игрок: заполняется input коллаборатором. NPC: AI (ai_movement_from_state).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MovementInput {
    /// Направление движения (не обязательно нормализовано)
    pub direction: Vec3,
}

/// Система применения движения от input
///
/// Пропускает entities под активным knockback и мёртвых.
pub fn apply_movement_input(
    mut query: Query<
        (&KinematicController, &MovementInput, &mut PhysicsBody, Option<&Knockbackable>),
        Without<Dead>,
    >,
) {
    for (controller, input, mut body, knockback) in query.iter_mut() {
        if knockback.is_some_and(|k| k.is_knocked_back()) {
            continue;
        }

        if input.direction.length_squared() > 0.01 {
            let direction = input.direction.normalize();
            body.velocity.x = direction.x * controller.move_speed;
            body.velocity.z = direction.z * controller.move_speed;
        } else {
            body.velocity.x = 0.0;
            body.velocity.z = 0.0;
        }
    }
}

/// Система: тикает таймер knockback, активный knockback пишет горизонтальную velocity
///
/// Таймер тикает и без PhysicsBody: состояние обязано погаснуть через `duration`.
pub fn apply_knockback_velocity(
    mut query: Query<(&mut Knockbackable, Option<&mut PhysicsBody>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut knockback, body) in query.iter_mut() {
        let step = knockback.consume(delta);
        let Some(mut body) = body else {
            continue;
        };
        match step {
            KnockbackStep::Idle => {}
            KnockbackStep::Push(push) => {
                body.velocity.x = push.x;
                body.velocity.z = push.z;
            }
            KnockbackStep::Finished => {
                body.velocity.x = 0.0;
                body.velocity.z = 0.0;
            }
        }
    }
}

/// Система интеграции velocity → Transform (headless, без Rapier)
///
/// position += velocity × dt, затем damping для тел без контроллера
/// (контроллер сам перезаписывает горизонтальную скорость каждый тик).
/// Тела с rapier `RigidBody` пропускаются: их Transform пишет rapier.
pub fn integrate_velocity_to_transform(
    mut query: Query<
        (&mut PhysicsBody, &mut Transform, Has<KinematicController>),
        Without<RigidBody>,
    >,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut body, mut transform, kinematic) in query.iter_mut() {
        transform.translation += body.velocity * delta;

        if !kinematic {
            let keep = (1.0 - body.linear_damping * delta).max(0.0);
            body.velocity *= keep;
        }
    }
}
