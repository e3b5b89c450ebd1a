//! 完全グラフの辺

use super::NodeId;
use crate::dependency::DependencySet;
use mimizuku_core::Role;

/// Directed, role-labelled edge. The role is always a forward role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub role: Role,
    pub to: NodeId,
    pub depends: DependencySet,
}

impl Edge {
    /// The endpoint opposite to `node`
    pub fn neighbor(&self, node: NodeId) -> NodeId {
        if self.from == node {
            self.to
        } else {
            self.from
        }
    }

    /// Role of this edge as seen from `node`
    pub fn role_from(&self, node: NodeId) -> Role {
        if self.from == node {
            self.role.clone()
        } else {
            self.role.inverse()
        }
    }

    fn matches(&self, from: NodeId, role: &Role, to: NodeId) -> bool {
        self.from == from && self.to == to && self.role == *role
    }
}

/// Unordered edge list with constant-time removal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeList(Vec<Edge>);

impl EdgeList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn add(&mut self, edge: Edge) {
        self.0.push(edge);
    }

    /// Remove the `(from, role, to)` edge by swapping it with the last one
    pub fn remove(&mut self, from: NodeId, role: &Role, to: NodeId) -> Option<Edge> {
        let pos = self.0.iter().position(|e| e.matches(from, role, to))?;
        Some(self.0.swap_remove(pos))
    }

    pub fn find(&self, from: NodeId, role: &Role, to: NodeId) -> Option<&Edge> {
        self.0.iter().find(|e| e.matches(from, role, to))
    }

    pub fn find_mut(&mut self, from: NodeId, role: &Role, to: NodeId) -> Option<&mut Edge> {
        self.0.iter_mut().find(|e| e.matches(from, role, to))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn retain<F: FnMut(&Edge) -> bool>(&mut self, f: F) {
        self.0.retain(f);
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.0.iter_mut()
    }
}
