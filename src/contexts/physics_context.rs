use anyhow::{anyhow, Result};
use crossbeam::channel::Receiver;
use glam::{vec2, Vec2};
use hecs::{Entity, World};
use rapier2d::prelude::*;

use crate::components::{
    Collider as ColliderComponent, Joint, JointSettings, RigidBody as RigidBodyComponent,
};
use crate::{shapes::ellipse_vertices, GanderError, GanderResult};

/// Number of segments used when turning a ball collider back into an
/// outline for drawing.
const BALL_OUTLINE_SEGMENTS: u32 = 12;

/// Wrapper around the `rapier` simulation state.
///
/// Owns every `rapier` set. Bodies and colliders added here are owned by the
/// simulation; components hold handles only.
pub struct PhysicsContext {
    /// The rapier physics pipeline
    pub physics_pipeline: PhysicsPipeline,
    /// Gravity, in pixels per second squared
    pub gravity: Vector<Real>,
    /// The rapier query pipeline, refreshed after each step
    pub query_pipeline: QueryPipeline,
    /// All colliders in the simulation
    pub colliders: ColliderSet,
    /// Broad phase collision detection state
    pub broad_phase: BroadPhase,
    /// Narrow phase collision detection state
    pub narrow_phase: NarrowPhase,
    /// All rigid bodies in the simulation
    pub rigid_bodies: RigidBodySet,
    /// Sleep/wake bookkeeping
    pub island_manager: IslandManager,
    /// Receiver for collision events emitted during a step
    pub collision_recv: Receiver<CollisionEvent>,
    /// Receiver for contact force events emitted during a step
    pub contact_force_recv: Receiver<ContactForceEvent>,
    /// Event collector feeding the receivers
    pub event_handler: ChannelEventCollector,
    /// Integration parameters; `dt` is overwritten on each step
    pub integration_parameters: IntegrationParameters,
    /// All impulse joints in the simulation
    pub impulse_joints: ImpulseJointSet,
    /// All multibody joints in the simulation
    pub multibody_joints: MultibodyJointSet,
    /// Continuous collision detection solver
    pub ccd_solver: CCDSolver,
}

impl Default for PhysicsContext {
    fn default() -> Self {
        let (collision_send, collision_recv) = crossbeam::channel::unbounded();
        let (contact_force_send, contact_force_recv) = crossbeam::channel::unbounded();
        let event_handler = ChannelEventCollector::new(collision_send, contact_force_send);

        // Screen coordinates: y points down, so gravity is positive.
        // Roughly earth gravity at 100 pixels per metre.
        let gravity: Vector<Real> = vector![0., 980.];

        let mut integration_parameters = IntegrationParameters::default();
        // Assume 60fps until the ticker reports real frame times.
        integration_parameters.dt = 1. / 60.;

        PhysicsContext {
            physics_pipeline: PhysicsPipeline::new(),
            gravity,
            query_pipeline: QueryPipeline::new(),
            colliders: ColliderSet::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_bodies: RigidBodySet::new(),
            island_manager: IslandManager::new(),
            collision_recv,
            contact_force_recv,
            event_handler,
            integration_parameters,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }
}

impl PhysicsContext {
    /// Advance the simulation by `elapsed_ms` milliseconds.
    ///
    /// The step is a single integration with `dt = elapsed_ms / 1000` - the
    /// timestep is fixed per call but externally variable. There is no
    /// sub-stepping or accumulator.
    pub fn step(&mut self, elapsed_ms: f32) {
        self.integration_parameters.dt = elapsed_ms / 1000.;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &self.event_handler,
        );

        self.query_pipeline
            .update(&self.rigid_bodies, &self.colliders);
    }

    /// Add a rigid body and its collider to the simulation on behalf of an
    /// entity, returning the components to attach.
    ///
    /// The collider's `user_data` is tagged with the entity so collision
    /// events can be traced back to it.
    pub fn create_rigid_body_and_collider(
        &mut self,
        entity: Entity,
        rigid_body: RigidBody,
        mut collider: Collider,
    ) -> (RigidBodyComponent, ColliderComponent) {
        collider.user_data = entity.to_bits().get() as _;
        let rigid_body_handle = self.rigid_bodies.insert(rigid_body);
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, rigid_body_handle, &mut self.rigid_bodies);

        (
            RigidBodyComponent::new(rigid_body_handle),
            ColliderComponent::new(collider_handle),
        )
    }

    /// Add a rigid body and its collider that belong to no entity, such as a
    /// ragdoll part or a boundary wall.
    pub fn insert_body(&mut self, rigid_body: RigidBody, collider: Collider) -> RigidBodyHandle {
        let rigid_body_handle = self.rigid_bodies.insert(rigid_body);
        self.colliders
            .insert_with_parent(collider, rigid_body_handle, &mut self.rigid_bodies);

        rigid_body_handle
    }

    /// Add a static rectangular body centered on (x, y).
    pub fn create_static_rectangle(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::fixed().translation(vector![x, y]).build();
        let collider = ColliderBuilder::cuboid(width / 2., height / 2.).build();

        self.insert_body(rigid_body, collider)
    }

    /// Create a constraint between two bodies.
    ///
    /// The constraint is a position motor along the axis between the two
    /// bodies at creation time: it pulls them towards the rest length with
    /// the given stiffness and damping, leaving relative rotation free. A
    /// negative rest length in `settings` means "use the current distance
    /// between the bodies".
    pub fn join_bodies(
        &mut self,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        settings: &JointSettings,
    ) -> GanderResult<Joint> {
        let b1 = self
            .rigid_bodies
            .get(body1)
            .ok_or(GanderError::BodyNotFound(body1))?;
        let b2 = self
            .rigid_bodies
            .get(body2)
            .ok_or(GanderError::BodyNotFound(body2))?;

        let delta = b2.translation() - b1.translation();
        let distance = delta.norm();
        let rest_length = if settings.rest_length < 0. {
            distance
        } else {
            settings.rest_length
        };

        let world_axis = if distance > f32::EPSILON {
            UnitVector::new_normalize(delta)
        } else {
            Vector::x_axis()
        };
        let local_axis1 = b1.position().inverse_transform_unit_vector(&world_axis);
        let local_axis2 = b2.position().inverse_transform_unit_vector(&world_axis);

        let joint = GenericJointBuilder::new(JointAxesMask::empty())
            .local_axis1(local_axis1)
            .local_axis2(local_axis2)
            .motor_position(
                JointAxis::X,
                rest_length,
                settings.stiffness,
                settings.damping,
            )
            .build();
        let handle = self.impulse_joints.insert(body1, body2, joint, true);

        Ok(Joint {
            handle,
            body1,
            body2,
            visible: settings.visible,
        })
    }

    /// Merge a source body's colliders into a target body, removing the
    /// source from the simulation.
    ///
    /// When `auto_hull` is true the target's colliders are replaced by a
    /// single convex hull of their combined body-local vertices.
    pub fn merge_bodies(
        &mut self,
        target: RigidBodyHandle,
        source: RigidBodyHandle,
        auto_hull: bool,
    ) -> GanderResult<()> {
        if self.rigid_bodies.get(target).is_none() {
            return Err(GanderError::BodyNotFound(target));
        }
        let source_body = self
            .rigid_bodies
            .get(source)
            .ok_or(GanderError::BodyNotFound(source))?;

        for collider_handle in source_body.colliders().to_vec() {
            self.colliders
                .set_parent(collider_handle, Some(target), &mut self.rigid_bodies);
        }
        self.rigid_bodies.remove(
            source,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            false,
        );

        if auto_hull {
            self.recompute_hull(target)?;
        }

        Ok(())
    }

    /// Replace a body's colliders with one convex hull of their combined
    /// body-local vertices. Bodies whose vertices are too degenerate to hull
    /// are left untouched.
    fn recompute_hull(&mut self, handle: RigidBodyHandle) -> GanderResult<()> {
        let body = self
            .rigid_bodies
            .get(handle)
            .ok_or(GanderError::BodyNotFound(handle))?;
        let collider_handles = body.colliders().to_vec();

        let mut points: Vec<Point<Real>> = vec![];
        for collider_handle in &collider_handles {
            if let Some(local_points) = self.collider_local_points(*collider_handle) {
                points.extend(local_points);
            }
        }

        let Some(builder) = ColliderBuilder::convex_hull(&points) else {
            log::warn!("Skipping hull recompute - vertices are degenerate");
            return Ok(());
        };

        for collider_handle in collider_handles {
            self.colliders.remove(
                collider_handle,
                &mut self.island_manager,
                &mut self.rigid_bodies,
                false,
            );
        }
        self.colliders
            .insert_with_parent(builder.build(), handle, &mut self.rigid_bodies);

        Ok(())
    }

    /// The body-local outline of a body's first collider, for drawing.
    ///
    /// Returns `None` for bodies without colliders and for shapes that have
    /// no sensible polygon outline.
    pub fn body_vertices(&self, handle: RigidBodyHandle) -> Option<Vec<Vec2>> {
        let body = self.rigid_bodies.get(handle)?;
        let collider_handle = *body.colliders().first()?;
        let local_points = self.collider_local_points(collider_handle)?;

        Some(local_points.iter().map(|p| vec2(p.x, p.y)).collect())
    }

    /// The outline of a collider's shape in the parent body's local space.
    fn collider_local_points(&self, handle: ColliderHandle) -> Option<Vec<Point<Real>>> {
        let collider = self.colliders.get(handle)?;
        let shape = collider.shape();

        let shape_points: Vec<Point<Real>> = if let Some(polygon) = shape.as_convex_polygon() {
            polygon.points().to_vec()
        } else if let Some(cuboid) = shape.as_cuboid() {
            let he = cuboid.half_extents;
            vec![
                point![-he.x, -he.y],
                point![he.x, -he.y],
                point![he.x, he.y],
                point![-he.x, he.y],
            ]
        } else if let Some(ball) = shape.as_ball() {
            ellipse_vertices(ball.radius * 2., ball.radius * 2., BALL_OUTLINE_SEGMENTS)
        } else {
            return None;
        };

        let position = collider.position_wrt_parent()?;
        Some(shape_points.iter().map(|p| position * p).collect())
    }

    /// Get the `rapier` rigid body behind an entity's
    /// [`RigidBodyComponent`].
    pub fn get_rigid_body<'a>(
        &'a mut self,
        world: &World,
        entity: Entity,
    ) -> Result<&'a mut RigidBody> {
        let rigid_body_handle = world.get::<&RigidBodyComponent>(entity)?.handle;
        self.rigid_bodies
            .get_mut(rigid_body_handle)
            .ok_or_else(|| anyhow!("Unable to get Rigid Body for handle!"))
    }

    /// Get the `rapier` collider behind an entity's [`ColliderComponent`].
    pub fn get_collider<'a>(
        &'a mut self,
        world: &World,
        entity: Entity,
    ) -> Result<&'a mut Collider> {
        let collider_handle = world.get::<&ColliderComponent>(entity)?.handle;
        self.colliders
            .get_mut(collider_handle)
            .ok_or_else(|| anyhow!("Unable to get Collider for handle!"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ball_at(physics_context: &mut PhysicsContext, x: f32, y: f32) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![x, y])
            .build();
        let collider = ColliderBuilder::ball(5.).build();
        physics_context.insert_body(rigid_body, collider)
    }

    #[test]
    pub fn test_step_advances_the_simulation() {
        let mut physics_context = PhysicsContext::default();
        let handle = ball_at(&mut physics_context, 0., 0.);

        for _ in 0..10 {
            physics_context.step(16.7);
        }

        // Gravity points down the screen (+y).
        let body = &physics_context.rigid_bodies[handle];
        assert!(body.translation().y > 0.);
    }

    #[test]
    pub fn test_join_bodies_defaults_rest_length_to_distance() {
        let mut physics_context = PhysicsContext::default();
        let body1 = ball_at(&mut physics_context, 0., 0.);
        let body2 = ball_at(&mut physics_context, 100., 0.);

        let joint = physics_context
            .join_bodies(body1, body2, &JointSettings::default())
            .unwrap();

        assert_eq!(joint.body1, body1);
        assert_eq!(joint.body2, body2);

        let impulse_joint = physics_context.impulse_joints.get(joint.handle).unwrap();
        assert_eq!(impulse_joint.body1, body1);
        assert_eq!(impulse_joint.body2, body2);

        let motor = impulse_joint.data.motor(JointAxis::X).unwrap();
        assert_relative_eq!(motor.target_pos, 100.);
    }

    #[test]
    pub fn test_join_bodies_keeps_explicit_rest_length() {
        let mut physics_context = PhysicsContext::default();
        let body1 = ball_at(&mut physics_context, 0., 0.);
        let body2 = ball_at(&mut physics_context, 100., 0.);

        let settings = JointSettings {
            rest_length: 25.,
            ..Default::default()
        };
        let joint = physics_context
            .join_bodies(body1, body2, &settings)
            .unwrap();

        let impulse_joint = physics_context.impulse_joints.get(joint.handle).unwrap();
        let motor = impulse_joint.data.motor(JointAxis::X).unwrap();
        assert_relative_eq!(motor.target_pos, 25.);
    }

    #[test]
    pub fn test_join_bodies_with_missing_body_is_an_error() {
        let mut physics_context = PhysicsContext::default();
        let body1 = ball_at(&mut physics_context, 0., 0.);

        let result = physics_context.join_bodies(
            body1,
            RigidBodyHandle::invalid(),
            &JointSettings::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    pub fn test_merge_bodies_moves_colliders_and_removes_the_source() {
        let mut physics_context = PhysicsContext::default();
        let target = physics_context.create_static_rectangle(0., 0., 20., 20.);
        let source = physics_context.create_static_rectangle(30., 0., 20., 20.);

        physics_context.merge_bodies(target, source, false).unwrap();

        assert!(physics_context.rigid_bodies.get(source).is_none());
        let body = &physics_context.rigid_bodies[target];
        assert_eq!(body.colliders().len(), 2);
    }

    #[test]
    pub fn test_merge_bodies_with_auto_hull_leaves_one_convex_collider() {
        let mut physics_context = PhysicsContext::default();
        let target = physics_context.create_static_rectangle(0., 0., 20., 20.);
        let source = physics_context.create_static_rectangle(30., 0., 20., 20.);

        physics_context.merge_bodies(target, source, true).unwrap();

        let body = &physics_context.rigid_bodies[target];
        assert_eq!(body.colliders().len(), 1);
        let collider = &physics_context.colliders[body.colliders()[0]];
        assert!(collider.shape().as_convex_polygon().is_some());
    }

    #[test]
    pub fn test_body_vertices_of_a_cuboid() {
        let mut physics_context = PhysicsContext::default();
        let handle = physics_context.create_static_rectangle(10., 10., 40., 20.);

        let vertices = physics_context.body_vertices(handle).unwrap();
        assert_eq!(vertices.len(), 4);
        assert!(vertices.contains(&vec2(-20., -10.)));
        assert!(vertices.contains(&vec2(20., 10.)));
    }
}
