use std::time::Instant;

use glam::{vec2, Vec2};
use hecs::{Entity, World};
use rapier2d::prelude::{vector, RigidBodyHandle};

use crate::{
    components::DisplayNode,
    contexts::PhysicsContext,
    shapes::Rect,
    systems::{
        collision_system, physics_system, rag_doll_sync_system, update_display_transforms_system,
    },
    GanderResult, DEFAULT_WALL_THICKNESS,
};

/// Options for creating a [`Game`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GameOptions {
    /// Create a ground body at this y position
    pub ground: Option<f32>,
    /// Create bounding walls around the screen rectangle
    pub auto_walls: bool,
}

/// Measures the wall clock time between frames.
pub struct Ticker {
    last_tick: Instant,
}

impl Default for Ticker {
    fn default() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }
}

impl Ticker {
    /// Milliseconds elapsed since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(self.last_tick).as_secs_f32() * 1000.;
        self.last_tick = now;

        elapsed_ms
    }
}

/// A game that owns the physics simulation and the entity world, and drives
/// the per-frame synchronisation between them.
pub struct Game {
    /// All entities and their components
    pub world: World,
    /// The physics simulation
    pub physics_context: PhysicsContext,
    /// Frame timer feeding the physics step
    pub ticker: Ticker,
    screen: Rect,
    bounds: Option<[RigidBodyHandle; 4]>,
    ground: Option<RigidBodyHandle>,
}

impl Game {
    /// Create a game for a screen rectangle, optionally with a ground body
    /// and bounding walls.
    pub fn new(screen: Rect, options: GameOptions) -> Self {
        let mut game = Self {
            world: World::new(),
            physics_context: PhysicsContext::default(),
            ticker: Ticker::default(),
            screen,
            bounds: None,
            ground: None,
        };

        if let Some(ground_y) = options.ground {
            game.make_ground(ground_y, DEFAULT_WALL_THICKNESS);
        }
        if options.auto_walls {
            game.set_bounds(screen, DEFAULT_WALL_THICKNESS);
        }

        game
    }

    /// The screen rectangle the game was created with
    pub fn screen(&self) -> Rect {
        self.screen
    }

    /// Create four static walls bounding a rectangle, sized to the rectangle
    /// plus the given thickness margin. Returned and stored in order: left,
    /// right, top, bottom.
    pub fn set_bounds(&mut self, bounds: Rect, thickness: f32) -> [RigidBodyHandle; 4] {
        let left = self.physics_context.create_static_rectangle(
            bounds.x - thickness,
            bounds.y,
            thickness,
            bounds.height,
        );
        let right = self.physics_context.create_static_rectangle(
            bounds.right(),
            bounds.y,
            thickness,
            bounds.height,
        );
        let top = self.physics_context.create_static_rectangle(
            bounds.x,
            bounds.y - thickness,
            bounds.width,
            thickness,
        );
        let bottom = self.physics_context.create_static_rectangle(
            bounds.x,
            bounds.bottom(),
            bounds.width,
            thickness,
        );

        let walls = [left, right, top, bottom];
        self.bounds = Some(walls);

        walls
    }

    /// The bounding walls, if set
    pub fn bounds(&self) -> Option<[RigidBodyHandle; 4]> {
        self.bounds
    }

    /// The left wall, if any
    pub fn left(&self) -> Option<RigidBodyHandle> {
        self.bounds.map(|walls| walls[0])
    }

    /// The right wall, if any
    pub fn right(&self) -> Option<RigidBodyHandle> {
        self.bounds.map(|walls| walls[1])
    }

    /// The top wall, if any
    pub fn top(&self) -> Option<RigidBodyHandle> {
        self.bounds.map(|walls| walls[2])
    }

    /// The bottom wall, if any
    pub fn bottom(&self) -> Option<RigidBodyHandle> {
        self.bounds.map(|walls| walls[3])
    }

    /// Create a static ground body spanning the screen width, plus margins,
    /// at the given y position.
    pub fn make_ground(&mut self, ground_y: f32, thickness: f32) -> RigidBodyHandle {
        let ground = self.physics_context.create_static_rectangle(
            self.screen.x - thickness,
            ground_y,
            self.screen.width + 2. * thickness,
            thickness,
        );
        self.ground = Some(ground);

        ground
    }

    /// The ground body, if any
    pub fn ground(&self) -> Option<RigidBodyHandle> {
        self.ground
    }

    /// Gravity, in pixels per second squared
    pub fn gravity(&self) -> Vec2 {
        vec2(
            self.physics_context.gravity.x,
            self.physics_context.gravity.y,
        )
    }

    /// Set the world gravity
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.physics_context.gravity = vector![gravity.x, gravity.y];
    }

    /// Move an entity's body, and its display node when it has one, to a
    /// position.
    pub fn set_position(&mut self, entity: Entity, position: Vec2) -> GanderResult<()> {
        let body = self.physics_context.get_rigid_body(&self.world, entity)?;
        body.set_translation(vector![position.x, position.y], true);

        if let Ok(mut display_node) = self.world.get::<&mut DisplayNode>(entity) {
            display_node.translation = position;
        }

        Ok(())
    }

    /// An entity's position as its display node reports it
    pub fn position(&self, entity: Entity) -> Option<Vec2> {
        self.world
            .get::<&DisplayNode>(entity)
            .ok()
            .map(|display_node| display_node.translation)
    }

    /// Run one frame: step the physics simulation by the ticker's elapsed
    /// time, record collisions, then synchronise display nodes with their
    /// bodies.
    pub fn update(&mut self) {
        physics_system(self);
        collision_system(self);
        update_display_transforms_system(self);
        rag_doll_sync_system(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::shapes::{rigid_shape, Shape};
    use crate::systems::update_display_transforms::update_display_transforms_system_inner;

    fn test_game() -> Game {
        Game::new(Rect::new(0., 0., 800., 400.), GameOptions::default())
    }

    #[test]
    pub fn test_set_bounds_creates_four_static_walls() {
        let mut game = test_game();
        let walls = game.set_bounds(game.screen(), 16.);

        assert_eq!(game.bounds(), Some(walls));
        for wall in walls {
            assert!(game.physics_context.rigid_bodies[wall].is_fixed());
        }

        let left = &game.physics_context.rigid_bodies[game.left().unwrap()];
        assert_relative_eq!(left.translation().x, -16.);
        let right = &game.physics_context.rigid_bodies[game.right().unwrap()];
        assert_relative_eq!(right.translation().x, 800.);
        let top = &game.physics_context.rigid_bodies[game.top().unwrap()];
        assert_relative_eq!(top.translation().y, -16.);
        let bottom = &game.physics_context.rigid_bodies[game.bottom().unwrap()];
        assert_relative_eq!(bottom.translation().y, 400.);
    }

    #[test]
    pub fn test_make_ground_creates_a_static_body() {
        let mut game = test_game();
        let ground = game.make_ground(380., 16.);

        assert_eq!(game.ground(), Some(ground));
        let body = &game.physics_context.rigid_bodies[ground];
        assert!(body.is_fixed());
        assert_relative_eq!(body.translation().y, 380.);
    }

    #[test]
    pub fn test_game_options_create_ground_and_walls() {
        let game = Game::new(
            Rect::new(0., 0., 800., 400.),
            GameOptions {
                ground: Some(380.),
                auto_walls: true,
            },
        );

        assert!(game.ground().is_some());
        assert!(game.bounds().is_some());
    }

    #[test]
    pub fn test_set_position_moves_body_and_display_node() {
        let mut game = test_game();
        let shape = Shape::Circle {
            x: 10.,
            y: 10.,
            radius: 5.,
        };
        let entity = rigid_shape(&mut game.world, &mut game.physics_context, &shape, None).unwrap();

        game.set_position(entity, vec2(100., 200.)).unwrap();

        assert_eq!(game.position(entity), Some(vec2(100., 200.)));
        let body = game
            .physics_context
            .get_rigid_body(&game.world, entity)
            .unwrap();
        assert_relative_eq!(body.translation().x, 100.);
        assert_relative_eq!(body.translation().y, 200.);
    }

    #[test]
    pub fn test_a_shape_falls_under_gravity() {
        let mut game = test_game();
        let shape = Shape::Rectangle {
            x: 400.,
            y: 50.,
            width: 40.,
            height: 40.,
        };
        let entity = rigid_shape(&mut game.world, &mut game.physics_context, &shape, None).unwrap();

        for _ in 0..30 {
            game.physics_context.step(16.7);
            update_display_transforms_system_inner(&mut game.world, &mut game.physics_context);
        }

        let position = game.position(entity).unwrap();
        assert!(position.y > 50.);
        assert_relative_eq!(position.x, 400., epsilon = 1e-2);
    }

    #[test]
    pub fn test_update_runs_a_frame() {
        let mut game = Game::new(
            Rect::new(0., 0., 800., 400.),
            GameOptions {
                ground: Some(380.),
                auto_walls: true,
            },
        );
        let shape = Shape::Circle {
            x: 400.,
            y: 50.,
            radius: 10.,
        };
        rigid_shape(&mut game.world, &mut game.physics_context, &shape, None).unwrap();

        for _ in 0..3 {
            game.update();
        }
    }
}
