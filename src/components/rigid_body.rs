use rapier2d::prelude::{RigidBodyHandle, RigidBodyType};

use crate::{
    components::{Joint, JointSettings},
    contexts::PhysicsContext,
    GanderResult,
};

/// Component added to an entity to map it to a `rapier` rigid body.
///
/// Also carries the entity's sync mode. The two flags are mutually
/// exclusive:
///
/// * `auto_sync` (the default) - the body's position and rotation are
///   applied to the entity's [`super::DisplayNode`] every frame.
/// * `reverse_sync` - the display node's position is copied back onto the
///   body every frame instead.
///
/// If the entity has no display node, no sync occurs in either direction.
#[derive(Debug, Clone)]
pub struct RigidBody {
    /// Handle to the `rapier` rigid body
    pub handle: RigidBodyHandle,
    auto_sync: bool,
    reverse_sync: bool,
}

impl RigidBody {
    /// Create a new `RigidBody` component. `auto_sync` starts enabled.
    pub fn new(handle: RigidBodyHandle) -> Self {
        Self {
            handle,
            auto_sync: true,
            reverse_sync: false,
        }
    }

    /// Whether body transforms are copied to the display node each frame
    pub fn auto_sync(&self) -> bool {
        self.auto_sync
    }

    /// Enable or disable body→display sync. Enabling it disables
    /// `reverse_sync`.
    pub fn set_auto_sync(&mut self, auto_sync: bool) {
        self.auto_sync = auto_sync;
        if auto_sync {
            self.reverse_sync = false;
        }
    }

    /// Whether the display node's position is copied to the body each frame
    pub fn reverse_sync(&self) -> bool {
        self.reverse_sync
    }

    /// Enable or disable display→body sync. Enabling it disables
    /// `auto_sync`.
    pub fn set_reverse_sync(&mut self, reverse_sync: bool) {
        self.reverse_sync = reverse_sync;
        if reverse_sync {
            self.auto_sync = false;
        }
    }

    /// Whether the underlying body is static
    pub fn is_static(&self, physics_context: &PhysicsContext) -> bool {
        physics_context
            .rigid_bodies
            .get(self.handle)
            .map(|body| body.is_fixed())
            .unwrap_or(false)
    }

    /// Make the underlying body static or dynamic
    pub fn set_static(&self, physics_context: &mut PhysicsContext, is_static: bool) {
        if let Some(body) = physics_context.rigid_bodies.get_mut(self.handle) {
            let body_type = if is_static {
                RigidBodyType::Fixed
            } else {
                RigidBodyType::Dynamic
            };
            body.set_body_type(body_type, true);
        }
    }

    /// Create a constraint between this body and another one.
    ///
    /// A negative `rest_length` in the settings uses the current distance
    /// between the two bodies.
    pub fn join(
        &self,
        physics_context: &mut PhysicsContext,
        other: RigidBodyHandle,
        settings: &JointSettings,
    ) -> GanderResult<Joint> {
        physics_context.join_bodies(self.handle, other, settings)
    }

    /// Merge another body's colliders into this one.
    ///
    /// When `auto_hull` is true the merged colliders are replaced by a
    /// single convex hull of their body-local vertices.
    pub fn add_body(
        &self,
        physics_context: &mut PhysicsContext,
        other: RigidBodyHandle,
        auto_hull: bool,
    ) -> GanderResult<()> {
        physics_context.merge_bodies(self.handle, other, auto_hull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapier2d::prelude::{ColliderBuilder, RigidBodyBuilder};

    #[test]
    pub fn test_sync_flags_are_mutually_exclusive() {
        let mut physics_context = PhysicsContext::default();
        let handle = physics_context.insert_body(
            RigidBodyBuilder::dynamic().build(),
            ColliderBuilder::ball(1.).build(),
        );
        let mut rigid_body = RigidBody::new(handle);

        // Default is body→display.
        assert!(rigid_body.auto_sync());
        assert!(!rigid_body.reverse_sync());

        rigid_body.set_reverse_sync(true);
        assert!(!rigid_body.auto_sync());
        assert!(rigid_body.reverse_sync());

        rigid_body.set_auto_sync(true);
        assert!(rigid_body.auto_sync());
        assert!(!rigid_body.reverse_sync());

        // Disabling one flag never enables the other.
        rigid_body.set_auto_sync(false);
        assert!(!rigid_body.auto_sync());
        assert!(!rigid_body.reverse_sync());
    }

    #[test]
    pub fn test_set_static_changes_the_body_type() {
        let mut physics_context = PhysicsContext::default();
        let handle = physics_context.insert_body(
            RigidBodyBuilder::dynamic().build(),
            ColliderBuilder::ball(1.).build(),
        );
        let rigid_body = RigidBody::new(handle);

        assert!(!rigid_body.is_static(&physics_context));
        rigid_body.set_static(&mut physics_context, true);
        assert!(rigid_body.is_static(&physics_context));
        rigid_body.set_static(&mut physics_context, false);
        assert!(!rigid_body.is_static(&physics_context));
    }
}
