use crate::Game;

/// Update the physics simulation, advancing it by the elapsed milliseconds
/// reported by the game's ticker.
pub fn physics_system(game: &mut Game) {
    let elapsed_ms = game.ticker.tick();
    game.physics_context.step(elapsed_ms);
}
