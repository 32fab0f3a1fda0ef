use hecs::{Entity, World};

use crate::{components::Collider, contexts::PhysicsContext, Game};

/// Collision system
/// Walks through each collider and checks if it has collided with any other
/// entity. Detected collisions are added to `collisions_this_frame` for ease
/// of reference.
pub fn collision_system(game: &mut Game) {
    let world = &mut game.world;
    let physics_context = &mut game.physics_context;
    collision_system_inner(world, physics_context);
}

pub(crate) fn collision_system_inner(world: &World, physics_context: &mut PhysicsContext) {
    for (_, collider) in world.query::<&mut Collider>().iter() {
        // Clear out any collisions from previous frames.
        collider.collisions_this_frame.clear();

        for contact_pair in physics_context.narrow_phase.contacts_with(collider.handle) {
            if !contact_pair.has_any_active_contact {
                continue;
            }
            let other = if contact_pair.collider1 == collider.handle {
                contact_pair.collider2
            } else {
                contact_pair.collider1
            };
            push_entity(collider, physics_context, other);
        }

        for (a, b, intersecting) in physics_context
            .narrow_phase
            .intersections_with(collider.handle)
        {
            if intersecting {
                let other = if a == collider.handle { b } else { a };
                push_entity(collider, physics_context, other);
            }
        }
    }
}

/// Record the entity behind a collider, if there is one. Bodies that belong
/// to no entity (ragdoll parts, boundary walls) carry no user data and are
/// ignored.
fn push_entity(
    collider: &mut Collider,
    physics_context: &PhysicsContext,
    other: rapier2d::prelude::ColliderHandle,
) {
    let other_collider = &physics_context.colliders[other];
    if let Some(other_entity) = Entity::from_bits(other_collider.user_data as u64) {
        collider.collisions_this_frame.push(other_entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapier2d::prelude::*;

    use crate::components::{Collider as ColliderComponent, RigidBody as RigidBodyComponent};

    #[test]
    pub fn test_collision() {
        let mut physics_context = PhysicsContext::default();
        let mut world = World::default();

        let a = make_entity(
            &mut world,
            &mut physics_context,
            vector![0.5, 0.0],
        );
        let b = make_entity(
            &mut world,
            &mut physics_context,
            vector![0.0, 0.0],
        );

        physics_context.step(16.7);
        collision_system_inner(&world, &mut physics_context);

        let a_collider = world.get::<&ColliderComponent>(a).unwrap();
        assert!(a_collider.collisions_this_frame.contains(&b));
        drop(a_collider);

        let b_collider = world.get::<&ColliderComponent>(b).unwrap();
        assert!(b_collider.collisions_this_frame.contains(&a));
    }

    fn make_entity(
        world: &mut World,
        physics_context: &mut PhysicsContext,
        translation: Vector<Real>,
    ) -> hecs::Entity {
        let entity = world.spawn(());
        let rigid_body = RigidBodyBuilder::dynamic().translation(translation).build();
        let collider = ColliderBuilder::cuboid(1.0, 1.0).build();
        let (rigid_body, collider): (RigidBodyComponent, ColliderComponent) =
            physics_context.create_rigid_body_and_collider(entity, rigid_body, collider);
        world.insert(entity, (rigid_body, collider)).unwrap();

        entity
    }
}
