//! Named mesh containers.

use serde::{Deserialize, Serialize};

use crate::{Aabb, TriangleMesh};

/// What a scene node represents.
///
/// Only [`NodeRole::Solid`] nodes are deck geometry; numeric consumers must
/// skip every other role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// Deck geometry.
    Solid,
    /// Axes and origin dot.
    Marker,
    /// Translucent plane showing where a section is taken.
    SectionPlane,
    /// Reinforcement bars embedded in the deck.
    Reinforcement,
}

impl NodeRole {
    /// True for nodes that are not part of the deck mesh.
    pub fn is_decoration(self) -> bool {
        !matches!(self, NodeRole::Solid)
    }
}

/// A scene node: one mesh with a name and a role.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name (used as the node name in exports).
    pub name: String,
    /// What the node represents.
    pub role: NodeRole,
    /// The geometry for this node.
    pub mesh: TriangleMesh,
}

impl SceneNode {
    /// Create a new scene node.
    pub fn new(name: impl Into<String>, role: NodeRole, mesh: TriangleMesh) -> Self {
        Self {
            name: name.into(),
            role,
            mesh,
        }
    }
}

/// A scene containing several meshes.
///
/// Unlike [`TriangleMesh::merge`], which folds geometry into one buffer,
/// a scene keeps nodes apart so they can be exported or filtered by role.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Name of the scene (used as the root name in exports).
    pub name: String,
    /// Ordered list of nodes.
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    /// Add a mesh as a new node.
    pub fn add(&mut self, name: impl Into<String>, role: NodeRole, mesh: TriangleMesh) {
        self.nodes.push(SceneNode::new(name, role, mesh));
    }

    /// Move every node of `other` into this scene.
    pub fn append(&mut self, other: Scene) {
        self.nodes.extend(other.nodes);
    }

    /// Get total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if scene is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes with the given role, in insertion order.
    pub fn nodes_with_role(&self, role: NodeRole) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter().filter(move |n| n.role == role)
    }

    /// First node with the given name.
    pub fn node(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// All meshes with the given role merged into one.
    pub fn combined(&self, role: NodeRole) -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        for node in self.nodes_with_role(role) {
            mesh.merge(&node.mesh);
        }
        mesh
    }

    /// Triangle count over nodes with the given role.
    pub fn num_triangles(&self, role: NodeRole) -> usize {
        self.nodes_with_role(role)
            .map(|n| n.mesh.num_triangles())
            .sum()
    }

    /// Bounds over nodes with the given role.
    pub fn bounds(&self, role: NodeRole) -> Option<Aabb> {
        self.nodes_with_role(role)
            .filter_map(|n| n.mesh.bounds())
            .reduce(|a, b| a.union(&b))
    }
}
