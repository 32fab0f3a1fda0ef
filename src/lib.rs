#![deny(missing_docs)]

//! Honk! Welcome to Gander! 🪿
//!
//! Gander is a thin synchronisation layer between a [`rapier2d`] physics
//! simulation and the display nodes of a [`hecs`] based game. It converts
//! shape descriptors into physics bodies, mirrors body transforms onto
//! display nodes every frame, and provides a small multi-body "ragdoll"
//! abstraction for jointed groups of parts.
//!
//! The heavy lifting - collision detection, constraint solving, rendering -
//! all belongs to the libraries this crate glues together. What Gander owns
//! is the bookkeeping: which body drives which node, in which direction, and
//! what the parts of a composite are called.
//!
//! # Getting started
//!
//! ```no_run
//! use gander::{Game, GameOptions, shapes::{rigid_shape, Rect, Shape}};
//!
//! let screen = Rect::new(0.0, 0.0, 800.0, 400.0);
//! let mut game = Game::new(screen, GameOptions { ground: Some(380.0), auto_walls: true });
//!
//! let square = Shape::Rectangle { x: 400.0, y: 50.0, width: 40.0, height: 40.0 };
//! rigid_shape(&mut game.world, &mut game.physics_context, &square, None);
//!
//! loop {
//!     game.update();
//! }
//! ```

pub use glam;
pub use hecs;
pub use nalgebra;
pub use rapier2d;

pub use game::{Game, GameOptions, Ticker};
pub use gander_error::GanderError;

/// Components are data attached to entities to drive the simulation
pub mod components;
/// Contexts are wrappers around external state the crate synchronises with
pub mod contexts;
mod game;
mod gander_error;
/// Conversion of shape descriptors into physics bodies
pub mod shapes;
/// Systems are functions called each frame to update the simulation
pub mod systems;

/// Gander result type
pub type GanderResult<T> = std::result::Result<T, GanderError>;

/// Default thickness, in pixels, of boundary walls and ground bodies
pub const DEFAULT_WALL_THICKNESS: f32 = 16.;

/// Default number of edges used to approximate an ellipse
pub const DEFAULT_ELLIPSE_EDGES: u32 = 12;
