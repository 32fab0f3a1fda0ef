use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};
use thiserror::Error;

/// Errors produced by Gander operations.
///
/// Factory functions keep the looser contract of returning `Option` - a
/// missing or unsupported input is not an error, it is simply nothing.
#[derive(Error, Debug)]
pub enum GanderError {
    /// The rigid body set has no body for this handle
    #[error("No rigid body in the simulation for handle {0:?}")]
    BodyNotFound(RigidBodyHandle),
    /// The collider set has no collider for this handle
    #[error("No collider in the simulation for handle {0:?}")]
    ColliderNotFound(ColliderHandle),
    /// The entity has no display node attached
    #[error("The entity has no display node to synchronise against")]
    DisplayNodeNotFound,
    /// Wrapped IO error
    #[error(transparent)]
    IO(#[from] std::io::Error),
    /// Wrapped error from an internal lookup
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
