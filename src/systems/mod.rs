#![allow(missing_docs)]
pub mod collision;
pub mod physics;
pub mod rag_dolls;
pub mod update_display_transforms;

pub use collision::collision_system;
pub use physics::physics_system;
pub use rag_dolls::rag_doll_sync_system;
pub use update_display_transforms::update_display_transforms_system;
