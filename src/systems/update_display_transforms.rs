use hecs::World;
use rapier2d::prelude::vector;

use crate::{
    components::{DisplayNode, RigidBody},
    contexts::PhysicsContext,
    Game,
};

/// Walks through each pair of [`RigidBody`]s and [`DisplayNode`]s and keeps
/// them in sync, honouring each body's sync mode:
///
/// * `auto_sync` - the body's translation and rotation are applied to the
///   display node
/// * `reverse_sync` - the display node's translation is applied to the body
/// * neither - the pair is left alone
///
/// Entities without a display node never sync.
pub fn update_display_transforms_system(game: &mut Game) {
    let world = &mut game.world;
    let physics_context = &mut game.physics_context;
    update_display_transforms_system_inner(world, physics_context);
}

pub(crate) fn update_display_transforms_system_inner(
    world: &mut World,
    physics_context: &mut PhysicsContext,
) {
    for (_, (rigid_body, display_node)) in world.query_mut::<(&RigidBody, &mut DisplayNode)>() {
        if rigid_body.auto_sync() {
            let Some(body) = physics_context.rigid_bodies.get(rigid_body.handle) else {
                continue;
            };
            display_node.translation.x = body.translation().x;
            display_node.translation.y = body.translation().y;
            display_node.rotation = body.rotation().angle();
        } else if rigid_body.reverse_sync() {
            let Some(body) = physics_context.rigid_bodies.get_mut(rigid_body.handle) else {
                continue;
            };
            body.set_translation(
                vector![display_node.translation.x, display_node.translation.y],
                true,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::vec2;
    use hecs::World;
    use rapier2d::{
        math::Isometry,
        prelude::{vector, ColliderBuilder, RigidBodyBuilder},
    };

    fn spawn_kinematic(
        world: &mut World,
        physics_context: &mut PhysicsContext,
    ) -> hecs::Entity {
        let entity = world.spawn((DisplayNode::default(),));
        let mut rigid_body = RigidBodyBuilder::kinematic_position_based().build();
        rigid_body.set_next_kinematic_position(Isometry::new(vector![1., 2.], 0.3));

        let collider = ColliderBuilder::ball(0.5).build();
        let (rigid_body, collider) =
            physics_context.create_rigid_body_and_collider(entity, rigid_body, collider);
        world.insert(entity, (rigid_body, collider)).unwrap();

        entity
    }

    #[test]
    pub fn test_auto_sync_copies_body_transform_to_the_display_node() {
        let mut world = World::default();
        let mut physics_context = PhysicsContext::default();
        let entity = spawn_kinematic(&mut world, &mut physics_context);

        for _ in 0..4 {
            physics_context.step(16.7);
            update_display_transforms_system_inner(&mut world, &mut physics_context);
        }

        let display_node = world.get::<&DisplayNode>(entity).unwrap();
        assert_relative_eq!(display_node.translation.x, 1.);
        assert_relative_eq!(display_node.translation.y, 2.);
        assert_relative_eq!(display_node.rotation, 0.3, epsilon = 1e-5);
    }

    #[test]
    pub fn test_reverse_sync_copies_the_display_node_back_to_the_body() {
        let mut world = World::default();
        let mut physics_context = PhysicsContext::default();
        let entity = spawn_kinematic(&mut world, &mut physics_context);

        {
            let mut rigid_body = world.get::<&mut RigidBody>(entity).unwrap();
            rigid_body.set_reverse_sync(true);
            let mut display_node = world.get::<&mut DisplayNode>(entity).unwrap();
            display_node.translation = vec2(50., 60.);
        }

        update_display_transforms_system_inner(&mut world, &mut physics_context);

        let rigid_body = world.get::<&RigidBody>(entity).unwrap();
        let body = &physics_context.rigid_bodies[rigid_body.handle];
        assert_relative_eq!(body.translation().x, 50.);
        assert_relative_eq!(body.translation().y, 60.);
    }

    #[test]
    pub fn test_no_sync_when_both_flags_are_off() {
        let mut world = World::default();
        let mut physics_context = PhysicsContext::default();
        let entity = spawn_kinematic(&mut world, &mut physics_context);

        {
            let mut rigid_body = world.get::<&mut RigidBody>(entity).unwrap();
            rigid_body.set_auto_sync(false);
        }

        physics_context.step(16.7);
        update_display_transforms_system_inner(&mut world, &mut physics_context);

        let display_node = world.get::<&DisplayNode>(entity).unwrap();
        assert_relative_eq!(display_node.translation.x, 0.);
        assert_relative_eq!(display_node.translation.y, 0.);
    }
}
