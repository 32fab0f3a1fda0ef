use hecs::World;

use crate::{components::RagDoll, contexts::PhysicsContext, Game};

/// Walks through each [`RagDoll`] and sets every part's display node to
/// match the transform of its body. Parts without a display node are
/// skipped.
pub fn rag_doll_sync_system(game: &mut Game) {
    let world = &mut game.world;
    let physics_context = &game.physics_context;
    rag_doll_sync_system_inner(world, physics_context);
}

pub(crate) fn rag_doll_sync_system_inner(world: &mut World, physics_context: &PhysicsContext) {
    for (_, rag_doll) in world.query_mut::<&mut RagDoll>() {
        rag_doll.update(physics_context);
    }
}
