use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A renderable scene node.
///
/// This is the crate's stand-in for a scene graph entity: a renderer reads
/// translation, rotation and graphics from here each frame. The sync systems
/// write into it; nothing in this crate draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayNode {
    /// Position of the node in screen space
    pub translation: Vec2,
    /// Rotation of the node, in radians
    pub rotation: f32,
    /// Whether a renderer should draw this node
    pub visible: bool,
    /// Polygon graphics drawn at this node, if any
    pub graphics: Option<Graphics>,
}

impl Default for DisplayNode {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            rotation: 0.,
            visible: true,
            graphics: None,
        }
    }
}

/// A filled and/or stroked polygon attached to a [`DisplayNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graphics {
    /// The polygon outline, in node-local coordinates
    pub points: Vec<Vec2>,
    /// How to fill and stroke the polygon
    pub skin: Skin,
}

/// Skinning information for a drawn part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skin {
    /// Fill colour as 0xRRGGBB, or `None` for no fill
    pub fill_color: Option<u32>,
    /// Fill opacity in [0, 1]
    pub fill_alpha: f32,
    /// Stroke colour as 0xRRGGBB, or `None` for no stroke
    pub line_color: Option<u32>,
    /// Stroke width in pixels
    pub line_width: f32,
}

impl Default for Skin {
    fn default() -> Self {
        Self {
            fill_color: None,
            fill_alpha: 1.,
            line_color: None,
            line_width: 1.,
        }
    }
}

impl Skin {
    /// A solid fill with no stroke
    pub fn fill(color: u32) -> Self {
        Self {
            fill_color: Some(color),
            ..Default::default()
        }
    }
}
