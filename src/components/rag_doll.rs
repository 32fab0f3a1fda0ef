use std::collections::HashMap;

use glam::vec2;
use rapier2d::prelude::{Collider, RigidBody, RigidBodyHandle};

use crate::{
    components::{DisplayNode, Graphics, Joint, JointSettings, Skin},
    contexts::PhysicsContext,
};

/// A body and collider destined to become one part of a [`RagDoll`],
/// optionally labeled.
pub struct Part {
    /// The part's label, or `None` to have one generated
    pub label: Option<String>,
    /// The part's rigid body
    pub body: RigidBody,
    /// The part's collider
    pub collider: Collider,
}

impl Part {
    /// An unlabeled part; the ragdoll assigns a `part<N>` label
    pub fn new(body: RigidBody, collider: Collider) -> Self {
        Self {
            label: None,
            body,
            collider,
        }
    }

    /// A labeled part
    pub fn labeled(label: impl Into<String>, body: RigidBody, collider: Collider) -> Self {
        Self {
            label: Some(label.into()),
            body,
            collider,
        }
    }
}

/// A ragdoll part referenced either by label or directly by body handle.
#[derive(Debug, Clone, Copy)]
pub enum PartRef<'a> {
    /// Look the part up in the ragdoll's part map
    Label(&'a str),
    /// Use a raw body, which need not belong to the ragdoll
    Handle(RigidBodyHandle),
}

impl<'a> From<&'a str> for PartRef<'a> {
    fn from(label: &'a str) -> Self {
        PartRef::Label(label)
    }
}

impl From<RigidBodyHandle> for PartRef<'_> {
    fn from(handle: RigidBodyHandle) -> Self {
        PartRef::Handle(handle)
    }
}

/// A component for an object composed of many jointed body parts, each with
/// its own display node.
///
/// Parts are indexed by label. Labels are unique within one ragdoll; parts
/// constructed or added without a label get a generated `part<N>` label. A
/// part may legitimately have no display node - it is skipped during sync.
#[derive(Default)]
pub struct RagDoll {
    parts: HashMap<String, RigidBodyHandle>,
    clips: HashMap<String, DisplayNode>,
    joints: Vec<Joint>,
}

impl RagDoll {
    /// Create a ragdoll from parts, adding every part's body and collider to
    /// the simulation. Unlabeled parts are labeled `part0`, `part1`, … in
    /// order.
    pub fn new(physics_context: &mut PhysicsContext, parts: Vec<Part>) -> Self {
        let mut rag_doll = RagDoll::default();

        for part in parts {
            let handle = physics_context.insert_body(part.body, part.collider);
            let label = part
                .label
                .unwrap_or_else(|| rag_doll.unique_label("part"));
            rag_doll.parts.insert(label, handle);
        }

        rag_doll
    }

    /// The parts of this ragdoll, indexed by label
    pub fn parts(&self) -> &HashMap<String, RigidBodyHandle> {
        &self.parts
    }

    /// The display nodes of this ragdoll, indexed by part label
    pub fn clips(&self) -> &HashMap<String, DisplayNode> {
        &self.clips
    }

    /// The constraints created between this ragdoll's parts
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Get the body part associated with a label
    pub fn get_part(&self, label: &str) -> Option<RigidBodyHandle> {
        self.parts.get(label).copied()
    }

    /// Add a part under the given label, or under a generated one.
    pub fn add_part(&mut self, part: RigidBodyHandle, label: Option<&str>) -> &mut Self {
        let label = label
            .map(str::to_owned)
            .unwrap_or_else(|| self.unique_label("part"));
        self.parts.insert(label, part);

        self
    }

    /// Associate a display node with a part label.
    pub fn set_clip(&mut self, label: impl Into<String>, clip: DisplayNode) -> &mut Self {
        self.clips.insert(label.into(), clip);
        self
    }

    /// Create a label not used by any existing part, by linear probing over
    /// `<prefix>0`, `<prefix>1`, …
    pub fn unique_label(&self, prefix: &str) -> String {
        let mut count = 0;
        while self.parts.contains_key(&format!("{prefix}{count}")) {
            count += 1;
        }

        format!("{prefix}{count}")
    }

    /// Create a constraint joining two parts of the ragdoll.
    ///
    /// `part2` may be a label or a raw body handle. Returns `None` if either
    /// side cannot be resolved. When no settings are given the joint is
    /// springy (stiffness 0.5) and invisible.
    pub fn join<'a>(
        &mut self,
        physics_context: &mut PhysicsContext,
        part1: &str,
        part2: impl Into<PartRef<'a>>,
        settings: Option<JointSettings>,
    ) -> Option<Joint> {
        let p1 = self.get_part(part1)?;
        let p2 = match part2.into() {
            PartRef::Label(label) => self.get_part(label)?,
            PartRef::Handle(handle) => handle,
        };

        let settings = settings.unwrap_or_else(JointSettings::ragdoll);
        let joint = physics_context.join_bodies(p1, p2, &settings).ok()?;
        self.joints.push(joint);

        Some(joint)
    }

    /// Create display nodes with graphics for each part that has skinning
    /// information.
    ///
    /// The polygon is taken from the part body's current collider vertices.
    /// Parts without a matching skin, or whose bodies have no drawable
    /// outline, are skipped.
    pub fn make_graphics(&mut self, physics_context: &PhysicsContext, skins: &HashMap<String, Skin>) {
        let labels: Vec<String> = self.parts.keys().cloned().collect();

        for label in labels {
            let Some(skin) = skins.get(&label) else {
                continue;
            };
            let Some(clip) = draw_part(physics_context, self.parts[&label], skin) else {
                continue;
            };
            self.clips.insert(label, clip);
        }
    }

    /// Set all display nodes to match the transforms of their corresponding
    /// body parts. Parts without a display node are skipped.
    pub fn update(&mut self, physics_context: &PhysicsContext) {
        for (label, handle) in &self.parts {
            let Some(clip) = self.clips.get_mut(label) else {
                continue;
            };
            let Some(body) = physics_context.rigid_bodies.get(*handle) else {
                continue;
            };

            clip.translation.x = body.translation().x;
            clip.translation.y = body.translation().y;
            clip.rotation = body.rotation().angle();
        }
    }
}

/// Draw one body part: a display node at the body's transform carrying the
/// collider outline as graphics.
fn draw_part(
    physics_context: &PhysicsContext,
    handle: RigidBodyHandle,
    skin: &Skin,
) -> Option<DisplayNode> {
    let points = physics_context.body_vertices(handle)?;
    let body = physics_context.rigid_bodies.get(handle)?;

    Some(DisplayNode {
        translation: vec2(body.translation().x, body.translation().y),
        rotation: body.rotation().angle(),
        visible: true,
        graphics: Some(Graphics {
            points,
            skin: skin.clone(),
        }),
    })
}
