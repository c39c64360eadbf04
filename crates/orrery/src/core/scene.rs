// core/scene.rs
//
// Scene graph of 3D transform nodes. Each node holds a back-reference to its
// parent (never owning) and the ids of its children. World transforms are
// composed by walking from a node up to its root.
//
// Usage:
//   let mut scene = SceneGraph::new();
//   let pivot = scene.spawn(TransformNode::new());
//   let mesh = scene.spawn_child(pivot, TransformNode::new().with_translation(Vec3::X * 8.0))?;
//   scene.get_mut(pivot).unwrap().rotation_y += 0.01;
//   let world = scene.world_position(mesh);

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use crate::api::types::NodeId;
use crate::error::SceneError;

/// Local transform of a node, relative to its parent (or world for roots).
///
/// Rotation is restricted to the Y axis: orbits lie in the XZ plane and
/// bodies spin about their vertical axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformNode {
    pub translation: Vec3,
    /// Accumulated rotation about +Y, in radians.
    pub rotation_y: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Default for TransformNode {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_y: 0.0,
            scale: 1.0,
        }
    }
}

impl TransformNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation_y(mut self, rotation_y: f32) -> Self {
        self.rotation_y = rotation_y;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Translate * Rotate * Scale.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.rotation_y),
            self.translation,
        )
    }
}

#[derive(Debug, Clone)]
struct Slot {
    node: TransformNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Tree of transform nodes addressed by `NodeId`.
///
/// Cycles are rejected at `set_parent`, so walking parent links always
/// terminates at a root.
#[derive(Debug, Default)]
pub struct SceneGraph {
    slots: HashMap<NodeId, Slot>,
    /// Nodes with no parent.
    roots: Vec<NodeId>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node. Returns its id.
    pub fn spawn(&mut self, node: TransformNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.slots.insert(
            id,
            Slot {
                node,
                parent: None,
                children: Vec::new(),
            },
        );
        self.roots.push(id);
        id
    }

    /// Add a node directly under `parent`.
    pub fn spawn_child(&mut self, parent: NodeId, node: TransformNode) -> Result<NodeId, SceneError> {
        if !self.slots.contains_key(&parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        let id = self.spawn(node);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Re-parent `child`. `None` makes it a root.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        if !self.slots.contains_key(&child) {
            return Err(SceneError::UnknownNode(child));
        }
        if let Some(p) = parent {
            if p == child {
                return Err(SceneError::SelfParent(child));
            }
            if !self.slots.contains_key(&p) {
                return Err(SceneError::UnknownNode(p));
            }
            if self.is_ancestor(child, p) {
                return Err(SceneError::Cycle { child, parent: p });
            }
        }

        // Detach from the old parent
        if let Some(old) = self.slots.get(&child).and_then(|s| s.parent) {
            if let Some(old_slot) = self.slots.get_mut(&old) {
                old_slot.children.retain(|&c| c != child);
            }
        }

        if let Some(slot) = self.slots.get_mut(&child) {
            slot.parent = parent;
        }

        match parent {
            Some(p) => {
                if let Some(parent_slot) = self.slots.get_mut(&p) {
                    if !parent_slot.children.contains(&child) {
                        parent_slot.children.push(child);
                    }
                }
                self.roots.retain(|&r| r != child);
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }
        Ok(())
    }

    /// Whether `ancestor` lies on the parent chain of `node` (or is `node`).
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.slots.get(&id).and_then(|s| s.parent);
        }
        false
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&TransformNode> {
        self.slots.get(&id).map(|s| &s.node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TransformNode> {
        self.slots.get_mut(&id).map(|s| &mut s.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(&id).and_then(|s| s.parent)
    }

    pub fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.slots.get(&id).map(|s| s.children.as_slice())
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Remove a node. Its children become roots.
    pub fn remove(&mut self, id: NodeId) -> Option<TransformNode> {
        let slot = self.slots.remove(&id)?;
        if let Some(parent) = slot.parent {
            if let Some(parent_slot) = self.slots.get_mut(&parent) {
                parent_slot.children.retain(|&c| c != id);
            }
        }
        for child in slot.children {
            if let Some(child_slot) = self.slots.get_mut(&child) {
                child_slot.parent = None;
            }
            if !self.roots.contains(&child) {
                self.roots.push(child);
            }
        }
        self.roots.retain(|&r| r != id);
        Some(slot.node)
    }

    /// World matrix of a node, composed by walking up to its root.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let slot = self.slots.get(&id)?;
        let mut world = slot.node.local_matrix();
        let mut current = slot.parent;
        while let Some(parent_id) = current {
            let parent = self.slots.get(&parent_id)?;
            world = parent.node.local_matrix() * world;
            current = parent.parent;
        }
        Some(world)
    }

    /// World-space origin of a node.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_point3(Vec3::ZERO))
    }

    /// Total Y rotation of a node in world space: its own angle plus every ancestor's.
    pub fn world_rotation_y(&self, id: NodeId) -> Option<f32> {
        let slot = self.slots.get(&id)?;
        let mut angle = slot.node.rotation_y;
        let mut current = slot.parent;
        while let Some(parent_id) = current {
            let parent = self.slots.get(&parent_id)?;
            angle += parent.node.rotation_y;
            current = parent.parent;
        }
        Some(angle)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.roots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn spawn_child_links_both_ways() {
        let mut scene = SceneGraph::new();
        let parent = scene.spawn(TransformNode::new());
        let child = scene.spawn_child(parent, TransformNode::new()).unwrap();

        assert_eq!(scene.parent(child), Some(parent));
        assert_eq!(scene.children(parent), Some([child].as_slice()));
        assert_eq!(scene.roots(), &[parent]);
    }

    #[test]
    fn world_position_follows_pivot_rotation() {
        let mut scene = SceneGraph::new();
        let pivot = scene.spawn(TransformNode::new());
        let mesh = scene
            .spawn_child(pivot, TransformNode::new().with_translation(Vec3::new(8.0, 0.0, 0.0)))
            .unwrap();

        scene.get_mut(pivot).unwrap().rotation_y = FRAC_PI_2;

        // +90° about Y carries +X onto -Z
        let pos = scene.world_position(mesh).unwrap();
        assert!(pos.abs_diff_eq(Vec3::new(0.0, 0.0, -8.0), 1e-5), "pos = {pos}");
    }

    #[test]
    fn moon_composes_through_planet() {
        let mut scene = SceneGraph::new();
        let earth_pivot = scene.spawn(TransformNode::new());
        let earth = scene
            .spawn_child(earth_pivot, TransformNode::new().with_translation(Vec3::new(8.0, 0.0, 0.0)))
            .unwrap();
        let moon_pivot = scene.spawn_child(earth, TransformNode::new()).unwrap();
        let moon = scene
            .spawn_child(moon_pivot, TransformNode::new().with_translation(Vec3::new(1.5, 0.0, 0.0)))
            .unwrap();

        let pos = scene.world_position(moon).unwrap();
        assert!(pos.abs_diff_eq(Vec3::new(9.5, 0.0, 0.0), 1e-5));

        // Earth's self-rotation swings the moon around it
        scene.get_mut(earth).unwrap().rotation_y = FRAC_PI_2;
        let pos = scene.world_position(moon).unwrap();
        assert!(pos.abs_diff_eq(Vec3::new(8.0, 0.0, -1.5), 1e-5), "pos = {pos}");

        scene.get_mut(moon).unwrap().rotation_y = 0.25;
        assert_eq!(scene.world_rotation_y(moon), Some(FRAC_PI_2 + 0.25));
    }

    #[test]
    fn rejects_cycles() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn(TransformNode::new());
        let b = scene.spawn_child(a, TransformNode::new()).unwrap();
        let c = scene.spawn_child(b, TransformNode::new()).unwrap();

        assert_eq!(scene.set_parent(a, Some(c)), Err(SceneError::Cycle { child: a, parent: c }));
        assert_eq!(scene.set_parent(a, Some(a)), Err(SceneError::SelfParent(a)));
        // Unchanged after the rejected attach
        assert_eq!(scene.parent(a), None);
    }

    #[test]
    fn unknown_nodes_are_errors() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn(TransformNode::new());
        assert_eq!(
            scene.set_parent(a, Some(NodeId(99))),
            Err(SceneError::UnknownNode(NodeId(99)))
        );
        assert!(scene.spawn_child(NodeId(42), TransformNode::new()).is_err());
    }

    #[test]
    fn remove_orphans_children() {
        let mut scene = SceneGraph::new();
        let parent = scene.spawn(TransformNode::new());
        let child = scene.spawn_child(parent, TransformNode::new()).unwrap();

        scene.remove(parent);

        assert_eq!(scene.parent(child), None);
        assert!(scene.roots().contains(&child));
        assert!(scene.world_position(parent).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn reparent_moves_child_between_lists() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn(TransformNode::new());
        let b = scene.spawn(TransformNode::new());
        let c = scene.spawn_child(a, TransformNode::new()).unwrap();

        scene.set_parent(c, Some(b)).unwrap();
        assert_eq!(scene.children(a), Some([].as_slice()));
        assert_eq!(scene.children(b), Some([c].as_slice()));

        scene.set_parent(c, None).unwrap();
        assert!(scene.roots().contains(&c));
    }
}
