use hecs::Entity;
use rapier2d::prelude::ColliderHandle;

/// A component that enables collision detection - essentially a thin wrapper
/// around a `rapier` collider.
#[derive(Debug, Clone)]
pub struct Collider {
    /// A list of entities that may have collided with this one this frame
    pub collisions_this_frame: Vec<Entity>,
    /// Handle to the `rapier` collider
    pub handle: ColliderHandle,
}

impl Collider {
    /// Create a new collider component
    pub fn new(handle: ColliderHandle) -> Collider {
        Collider {
            collisions_this_frame: vec![],
            handle,
        }
    }
}
