/// Wrapper around the `rapier` simulation state
pub mod physics_context;

pub use physics_context::PhysicsContext;
