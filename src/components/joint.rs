use rapier2d::prelude::{ImpulseJointHandle, RigidBodyHandle};

/// A constraint between two bodies, as created by
/// [`crate::contexts::PhysicsContext::join_bodies`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    /// Handle to the `rapier` impulse joint
    pub handle: ImpulseJointHandle,
    /// The first body of the constraint
    pub body1: RigidBodyHandle,
    /// The second body of the constraint
    pub body2: RigidBodyHandle,
    /// Whether a debug renderer should draw this constraint
    pub visible: bool,
}

/// Parameters for creating a constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSettings {
    /// Stiffness of the constraint. 1 is rigid; around 0.5 is springy.
    pub stiffness: f32,
    /// Damping of the constraint. 0.1 is considered high.
    pub damping: f32,
    /// Rest length between the bodies, or negative to use the distance
    /// between them at creation time.
    pub rest_length: f32,
    /// Whether a debug renderer should draw the constraint
    pub visible: bool,
}

impl Default for JointSettings {
    fn default() -> Self {
        Self {
            stiffness: 1.,
            damping: 0.,
            rest_length: -1.,
            visible: true,
        }
    }
}

impl JointSettings {
    /// The defaults used for joints between ragdoll parts: springy and not
    /// drawn.
    pub fn ragdoll() -> Self {
        Self {
            stiffness: 0.5,
            visible: false,
            ..Default::default()
        }
    }
}
