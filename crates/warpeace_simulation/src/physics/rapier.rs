//! Rapier bridge
//!
//! Подключается вместе с `RapierPhysicsPlugin` (в headless симуляции не нужен):
//! CollisionEvent::Started(carrier, target) → ContactEvent.
//!
//! Тела с rapier `RigidBody` двигает rapier: headless интеграция `PhysicsBody`
//! их пропускает, knockback приходит через `ExternalImpulse` (combat/knockback.rs).
//! `PhysicsBody` в rapier не зеркалится.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::combat::{ActionCarrier, ContactEvent};
use crate::physics::PhysicsBody;
use crate::SimulationSet;

pub struct RapierContactBridgePlugin;

impl Plugin for RapierContactBridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollisionEvent>().add_systems(
            FixedUpdate,
            forward_rapier_collisions
                .in_set(SimulationSet::Contacts)
                .before(crate::combat::resolve_contacts),
        );
    }
}

/// Система: rapier CollisionEvent → ContactEvent
///
/// Порядок пары в rapier произвольный — carrier определяем по компоненту.
/// Pre-contact velocity берём из PhysicsBody (rapier Velocity уже содержит impulse разделения).
pub fn forward_rapier_collisions(
    mut collisions: EventReader<CollisionEvent>,
    carriers: Query<(), With<ActionCarrier>>,
    bodies: Query<&PhysicsBody>,
    mut contacts: EventWriter<ContactEvent>,
) {
    for collision in collisions.read() {
        let CollisionEvent::Started(a, b, _flags) = *collision else {
            continue;
        };

        let (carrier, target) = if carriers.contains(a) {
            (a, b)
        } else if carriers.contains(b) {
            (b, a)
        } else {
            continue;
        };

        contacts.write(ContactEvent {
            carrier,
            target,
            pre_contact_velocity: bodies.get(target).ok().map(|body| body.velocity),
        });
    }
}
