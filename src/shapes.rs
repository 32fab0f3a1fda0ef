//! Conversion of shape descriptors into `rapier` bodies.
//!
//! Descriptors are plain data the display layer understands: rectangles,
//! circles, polygons and ellipses in screen coordinates. Conversion produces
//! a dynamic rigid body positioned at the shape center and a collider whose
//! vertices are shape-local, because that is the coordinate space `rapier`
//! colliders are built in. Polygon and ellipse vertex lists are re-centered
//! on their vertex mean before the convex hull is taken.

use glam::{vec2, Vec2};
use hecs::{Entity, World};
use log::warn;
use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    components::{DisplayNode, Graphics, Skin},
    contexts::PhysicsContext,
    DEFAULT_ELLIPSE_EDGES,
};

/// A shape descriptor, as the display layer would describe it.
///
/// Positions are the *center* of the shape in screen space, except for
/// [`Shape::Polygon`] whose points are a screen space outline; a polygon
/// body is positioned at the vertex mean of its outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// An axis-aligned rectangle centered on (x, y)
    Rectangle {
        /// Center x
        x: f32,
        /// Center y
        y: f32,
        /// Full width
        width: f32,
        /// Full height
        height: f32,
    },
    /// A circle centered on (x, y)
    Circle {
        /// Center x
        x: f32,
        /// Center y
        y: f32,
        /// Radius
        radius: f32,
    },
    /// An axis-aligned ellipse centered on (x, y)
    Ellipse {
        /// Center x
        x: f32,
        /// Center y
        y: f32,
        /// Full width (x diameter)
        width: f32,
        /// Full height (y diameter)
        height: f32,
    },
    /// A closed polygon described by its outline in screen space
    Polygon {
        /// The outline, in order
        points: Vec<Vec2>,
    },
    /// A rounded rectangle. Recognised but unsupported - conversion
    /// always returns `None`.
    RoundedRectangle {
        /// Center x
        x: f32,
        /// Center y
        y: f32,
        /// Full width
        width: f32,
        /// Full height
        height: f32,
        /// Corner radius
        radius: f32,
    },
}

impl Shape {
    /// The shape-local outline of this shape, centered on the body origin.
    ///
    /// Curved shapes are sampled with `segments` points. Returns `None` for
    /// unsupported kinds and empty polygons.
    pub fn outline(&self, segments: u32) -> Option<Vec<Vec2>> {
        match self {
            Shape::Rectangle { width, height, .. } => {
                let (hw, hh) = (width / 2., height / 2.);
                Some(vec![
                    vec2(-hw, -hh),
                    vec2(hw, -hh),
                    vec2(hw, hh),
                    vec2(-hw, hh),
                ])
            }
            Shape::Circle { radius, .. } => Some(
                ellipse_vertices(radius * 2., radius * 2., segments)
                    .iter()
                    .map(|p| vec2(p.x, p.y))
                    .collect(),
            ),
            Shape::Ellipse { width, height, .. } => Some(
                ellipse_vertices(*width, *height, segments)
                    .iter()
                    .map(|p| vec2(p.x, p.y))
                    .collect(),
            ),
            Shape::Polygon { points } => {
                if points.is_empty() {
                    return None;
                }
                let mean = vertex_mean(points);
                Some(points.iter().map(|p| *p - mean).collect())
            }
            Shape::RoundedRectangle { .. } => None,
        }
    }
}

/// A screen space rectangle, used for world bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new `Rect`
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The right edge of the rectangle
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// The bottom edge of the rectangle
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Sample the vertices of an ellipse as a regular polygon approximation.
///
/// The angular step is fixed at `2π / edges` - it does not adapt to
/// curvature. Sampling starts at `θ = 2π` and walks downwards, matching the
/// winding expected by the display layer.
pub fn ellipse_vertices(width: f32, height: f32, edges: u32) -> Vec<Point<Real>> {
    let dtheta = std::f32::consts::TAU / edges as f32;
    let w = 0.5 * width;
    let h = 0.5 * height;

    (0..edges)
        .map(|i| {
            let theta = std::f32::consts::TAU - i as f32 * dtheta;
            point![w * theta.cos(), h * theta.sin()]
        })
        .collect()
}

/// Re-center a vertex list so its vertex mean is the origin.
pub fn centered(points: &[Point<Real>]) -> Vec<Point<Real>> {
    if points.is_empty() {
        return vec![];
    }

    let mut cx = 0.;
    let mut cy = 0.;
    for point in points {
        cx += point.x;
        cy += point.y;
    }
    cx /= points.len() as f32;
    cy /= points.len() as f32;

    points.iter().map(|p| point![p.x - cx, p.y - cy]).collect()
}

/// The vertex mean of a screen space outline.
pub fn vertex_mean(points: &[Vec2]) -> Vec2 {
    points.iter().sum::<Vec2>() / points.len() as f32
}

/// Convert a shape descriptor into a dynamic rigid body and its collider.
///
/// The body is positioned at the shape center (the vertex mean for
/// polygons); the collider is built in shape-local coordinates. Returns
/// `None` for rounded rectangles, empty polygons, and vertex lists too
/// degenerate to take a convex hull of.
pub fn body_from_shape(shape: &Shape) -> Option<(RigidBody, Collider)> {
    let (translation, collider) = match shape {
        Shape::Rectangle {
            x,
            y,
            width,
            height,
        } => (
            vector![*x, *y],
            ColliderBuilder::cuboid(width / 2., height / 2.).build(),
        ),
        Shape::Circle { x, y, radius } => (vector![*x, *y], ColliderBuilder::ball(*radius).build()),
        Shape::Ellipse {
            x,
            y,
            width,
            height,
        } => {
            let vertices = centered(&ellipse_vertices(*width, *height, DEFAULT_ELLIPSE_EDGES));
            match ColliderBuilder::convex_hull(&vertices) {
                Some(builder) => (vector![*x, *y], builder.build()),
                None => {
                    warn!("Degenerate ellipse - no convex hull: {shape:?}");
                    return None;
                }
            }
        }
        Shape::Polygon { points } => {
            if points.is_empty() {
                warn!("Empty polygon outline");
                return None;
            }
            let mean = vertex_mean(points);
            let vertices = centered(
                &points
                    .iter()
                    .map(|p| point![p.x, p.y])
                    .collect::<Vec<Point<Real>>>(),
            );
            match ColliderBuilder::convex_hull(&vertices) {
                Some(builder) => (vector![mean.x, mean.y], builder.build()),
                None => {
                    warn!("Degenerate polygon - no convex hull: {shape:?}");
                    return None;
                }
            }
        }
        Shape::RoundedRectangle { .. } => {
            // Unsupported, like the display layer's rounded rectangle kind.
            warn!("Unknown or unsupported shape specified: {shape:?}");
            return None;
        }
    };

    let body = RigidBodyBuilder::dynamic().translation(translation).build();
    Some((body, collider))
}

/// Spawn an entity with a [`crate::components::RigidBody`] built from a
/// shape descriptor.
///
/// The entity gets a [`DisplayNode`] positioned at the body; when a skin is
/// supplied, the node carries [`Graphics`] for the shape outline. Returns
/// `None` if the shape could not be converted.
pub fn rigid_shape(
    world: &mut World,
    physics_context: &mut PhysicsContext,
    shape: &Shape,
    skin: Option<&Skin>,
) -> Option<Entity> {
    let (body, collider) = body_from_shape(shape)?;
    let translation = vec2(body.translation().x, body.translation().y);

    let entity = world.spawn(());
    let (rigid_body, collider) = physics_context.create_rigid_body_and_collider(
        entity, body, collider,
    );

    let mut display_node = DisplayNode {
        translation,
        ..Default::default()
    };
    if let Some(skin) = skin {
        if let Some(points) = shape.outline(DEFAULT_ELLIPSE_EDGES) {
            display_node.graphics = Some(Graphics {
                points,
                skin: skin.clone(),
            });
        }
    }

    world
        .insert(entity, (rigid_body, collider, display_node))
        .ok()?;

    Some(entity)
}
