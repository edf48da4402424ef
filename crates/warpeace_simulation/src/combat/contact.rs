//! Headless детектор контактов
//!
//! Архитектура:
//! - Carrier — сфера `ContactRadius`, цель — сфера `Hurtbox`
//! - Пересечение: distance < carrier.radius + hurtbox.radius
//! - ContactEvent шлётся только на ВХОД в пересечение (как trigger enter)
//! - `ContactOverlaps` помнит с кем carrier пересекается прямо сейчас
//!
//! С rapier вместо этого работает physics/rapier.rs (CollisionEvent::Started).

use bevy::prelude::*;

use crate::combat::ContactEvent;
use crate::physics::PhysicsBody;

/// Hurtbox — сфера, в которую может попасть carrier
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hurtbox {
    pub radius: f32,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

/// Радиус контакта carrier'а
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(ContactOverlaps)]
pub struct ContactRadius(pub f32);

/// Entities, с которыми carrier пересекался на прошлом тике
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct ContactOverlaps(Vec<Entity>);

impl ContactOverlaps {
    pub fn contains(&self, entity: Entity) -> bool {
        self.0.contains(&entity)
    }
}

pub fn spheres_overlap(a: Vec3, radius_a: f32, b: Vec3, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// Система: сферы carrier'ов vs hurtboxes → ContactEvent на входе в пересечение
pub fn detect_contacts(
    mut carriers: Query<(Entity, &ContactRadius, &Transform, &mut ContactOverlaps)>,
    hurtboxes: Query<(Entity, &Hurtbox, &Transform, Option<&PhysicsBody>)>,
    mut contacts: EventWriter<ContactEvent>,
) {
    for (carrier, radius, carrier_transform, mut overlaps) in carriers.iter_mut() {
        let mut current = Vec::new();

        for (target, hurtbox, target_transform, body) in hurtboxes.iter() {
            if target == carrier {
                continue;
            }
            if !spheres_overlap(
                carrier_transform.translation,
                radius.0,
                target_transform.translation,
                hurtbox.radius,
            ) {
                continue;
            }

            current.push(target);
            if !overlaps.contains(target) {
                contacts.write(ContactEvent {
                    carrier,
                    target,
                    pre_contact_velocity: body.map(|body| body.velocity),
                });
            }
        }

        overlaps.0 = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_carrier(app: &mut App, at: Vec3, radius: f32) -> Entity {
        app.world_mut()
            .spawn((ContactRadius(radius), Transform::from_translation(at)))
            .id()
    }

    fn spawn_target(app: &mut App, at: Vec3) -> Entity {
        app.world_mut()
            .spawn((Hurtbox { radius: 0.5 }, Transform::from_translation(at)))
            .id()
    }

    fn contacts(app: &App) -> Vec<ContactEvent> {
        app.world()
            .resource::<Events<ContactEvent>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_event::<ContactEvent>()
            .add_systems(Update, detect_contacts);
        app
    }

    #[test]
    fn test_overlap_boundary_is_exclusive() {
        assert!(spheres_overlap(Vec3::ZERO, 1.0, Vec3::new(1.49, 0.0, 0.0), 0.5));
        assert!(!spheres_overlap(Vec3::ZERO, 1.0, Vec3::new(1.5, 0.0, 0.0), 0.5));
    }

    #[test]
    fn test_contact_emitted_once_per_overlap() {
        let mut app = app();
        let carrier = spawn_carrier(&mut app, Vec3::ZERO, 1.0);
        let target = spawn_target(&mut app, Vec3::new(1.0, 0.0, 0.0));

        app.update();
        let first = contacts(&app);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].carrier, carrier);
        assert_eq!(first[0].target, target);

        // Всё ещё пересекаются → повторного события нет
        app.update();
        assert!(contacts(&app).is_empty());
    }

    #[test]
    fn test_reentry_emits_again() {
        let mut app = app();
        spawn_carrier(&mut app, Vec3::ZERO, 1.0);
        let target = spawn_target(&mut app, Vec3::new(1.0, 0.0, 0.0));

        app.update();
        app.world_mut()
            .entity_mut(target)
            .get_mut::<Transform>()
            .unwrap()
            .translation = Vec3::new(10.0, 0.0, 0.0);
        app.update();
        assert!(contacts(&app).is_empty());

        app.world_mut()
            .entity_mut(target)
            .get_mut::<Transform>()
            .unwrap()
            .translation = Vec3::new(0.5, 0.0, 0.0);
        app.update();
        assert_eq!(contacts(&app).len(), 1);
    }
}
