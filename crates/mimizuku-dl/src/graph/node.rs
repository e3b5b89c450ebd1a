//! 完全グラフのノード

use super::edge::EdgeList;
use crate::dependency::DependencySet;
use mimizuku_core::{Concept, Individual, Literal, LiteralValue};
use std::collections::BTreeMap;
use std::fmt;

/// Stable arena index of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeName {
    Named(Individual),
    Anonymous(u32),
    Literal(u32),
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeName::Named(individual) => write!(f, "{}", individual),
            NodeName::Anonymous(n) => write!(f, "_:anon{}", n),
            NodeName::Literal(n) => write!(f, "_:lit{}", n),
        }
    }
}

/// What a literal node stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralState {
    Value(LiteralValue),
    /// Asserted literal whose lexical form is not in its datatype
    Invalid(Literal),
    /// Fresh value introduced for a data restriction
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Individual {
        out_edges: EdgeList,
        /// Named individuals and nominals sit at level 0, generated nodes have none
        nominal_level: Option<u32>,
        parent: Option<NodeId>,
        depth: u32,
    },
    Literal {
        state: LiteralState,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: NodeName,
    pub(crate) types: BTreeMap<Concept, DependencySet>,
    pub(crate) merged_to: Option<(NodeId, DependencySet)>,
    pub(crate) differences: BTreeMap<NodeId, DependencySet>,
    pub(crate) in_edges: EdgeList,
    pub kind: NodeKind,
    pub created_branch: i32,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: NodeName, kind: NodeKind, created_branch: i32) -> Self {
        Self {
            id,
            name,
            types: BTreeMap::new(),
            merged_to: None,
            differences: BTreeMap::new(),
            in_edges: EdgeList::new(),
            kind,
            created_branch,
        }
    }

    pub fn types(&self) -> &BTreeMap<Concept, DependencySet> {
        &self.types
    }

    pub fn has_type(&self, concept: &Concept) -> bool {
        self.types.contains_key(concept)
    }

    pub fn type_depends(&self, concept: &Concept) -> Option<&DependencySet> {
        self.types.get(concept)
    }

    pub fn merged_to(&self) -> Option<&(NodeId, DependencySet)> {
        self.merged_to.as_ref()
    }

    pub fn is_merged(&self) -> bool {
        self.merged_to.is_some()
    }

    pub fn differences(&self) -> &BTreeMap<NodeId, DependencySet> {
        &self.differences
    }

    pub fn in_edges(&self) -> &EdgeList {
        &self.in_edges
    }

    pub fn out_edges(&self) -> Option<&EdgeList> {
        match &self.kind {
            NodeKind::Individual { out_edges, .. } => Some(out_edges),
            NodeKind::Literal { .. } => None,
        }
    }

    pub(crate) fn out_edges_mut(&mut self) -> Option<&mut EdgeList> {
        match &mut self.kind {
            NodeKind::Individual { out_edges, .. } => Some(out_edges),
            NodeKind::Literal { .. } => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal { .. })
    }

    pub fn is_named(&self) -> bool {
        matches!(self.name, NodeName::Named(_))
    }

    pub fn individual(&self) -> Option<&Individual> {
        match &self.name {
            NodeName::Named(individual) => Some(individual),
            _ => None,
        }
    }

    pub fn literal_state(&self) -> Option<&LiteralState> {
        match &self.kind {
            NodeKind::Literal { state } => Some(state),
            NodeKind::Individual { .. } => None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        match &self.kind {
            NodeKind::Individual { parent, .. } => *parent,
            NodeKind::Literal { .. } => None,
        }
    }

    pub fn depth(&self) -> u32 {
        match &self.kind {
            NodeKind::Individual { depth, .. } => *depth,
            NodeKind::Literal { .. } => 0,
        }
    }

    pub fn nominal_level(&self) -> Option<u32> {
        match &self.kind {
            NodeKind::Individual { nominal_level, .. } => *nominal_level,
            NodeKind::Literal { .. } => None,
        }
    }

    /// Generated individuals can be blocked, roots and nominals cannot
    pub fn is_blockable(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Individual {
                nominal_level: None,
                parent: Some(_),
                ..
            }
        )
    }
}
