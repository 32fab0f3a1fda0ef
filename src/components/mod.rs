/// Collision bookkeeping component
pub mod collider;
/// Renderable scene node stand-in
pub mod display_node;
/// Constraint wrapper and settings
pub mod joint;
/// Multi-part jointed composite
pub mod rag_doll;
/// Physics body component and sync flags
pub mod rigid_body;

pub use collider::Collider;
pub use display_node::{DisplayNode, Graphics, Skin};
pub use joint::{Joint, JointSettings};
pub use rag_doll::{Part, PartRef, RagDoll};
pub use rigid_body::RigidBody;
