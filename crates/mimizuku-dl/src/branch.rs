//! 分岐点 (choice points)

use crate::dependency::DependencySet;
use crate::graph::{Change, NodeId};
use mimizuku_core::{Concept, Role};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchKind {
    /// Bottom of the stack, pushed when a graph is initialized
    Root,
    /// Add one disjunct to `node`; earlier disjuncts are added negated
    Disjunction {
        node: NodeId,
        disjunction: Concept,
        disjuncts: Vec<Concept>,
    },
    /// Merge one pair of `role`-successors of `node`; earlier pairs are made different
    Merge {
        node: NodeId,
        role: Role,
        pairs: Vec<(NodeId, NodeId)>,
    },
}

/// A choice point together with the changes made since it was taken
#[derive(Debug, Clone)]
pub struct Branch {
    pub index: u32,
    pub kind: BranchKind,
    pub(crate) term_depends: DependencySet,
    pub(crate) try_next: usize,
    pub(crate) prev_ds: DependencySet,
    pub(crate) node_count: usize,
    pub(crate) trail: Vec<Change>,
}

impl Branch {
    pub(crate) fn root(node_count: usize) -> Self {
        Self::new(0, BranchKind::Root, DependencySet::independent(), node_count)
    }

    pub(crate) fn new(
        index: u32,
        kind: BranchKind,
        term_depends: DependencySet,
        node_count: usize,
    ) -> Self {
        Self {
            index,
            kind,
            term_depends,
            try_next: 0,
            prev_ds: DependencySet::independent(),
            node_count,
            trail: Vec::new(),
        }
    }

    pub fn alternatives(&self) -> usize {
        match &self.kind {
            BranchKind::Root => 0,
            BranchKind::Disjunction { disjuncts, .. } => disjuncts.len(),
            BranchKind::Merge { pairs, .. } => pairs.len(),
        }
    }

    pub fn try_next(&self) -> usize {
        self.try_next
    }

    pub fn is_exhausted(&self) -> bool {
        self.try_next >= self.alternatives()
    }

    /// Dependencies of the concept or restriction that caused this choice
    pub fn term_depends(&self) -> &DependencySet {
        &self.term_depends
    }

    /// Clash dependencies collected from the alternatives that already failed
    pub fn prev_ds(&self) -> &DependencySet {
        &self.prev_ds
    }

    /// Number of nodes in the graph when the choice was made
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Dependencies of the facts added by alternative `alt`.
    ///
    /// The last alternative no longer depends on this branch: it holds as
    /// soon as every earlier alternative has failed.
    pub(crate) fn alternative_depends(&self, alt: usize, do_explanation: bool) -> DependencySet {
        if alt + 1 >= self.alternatives() {
            self.term_depends.union(&self.prev_ds, do_explanation)
        } else {
            self.term_depends
                .union(&DependencySet::from_branch(self.index), do_explanation)
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            BranchKind::Root => write!(f, "Branch 0 (root)"),
            BranchKind::Disjunction {
                node, disjunction, ..
            } => write!(
                f,
                "Branch {} on {} for {} [{}/{}]",
                self.index,
                node,
                disjunction,
                self.try_next + 1,
                self.alternatives()
            ),
            BranchKind::Merge { node, role, .. } => write!(
                f,
                "Branch {} merging {}-successors of {} [{}/{}]",
                self.index,
                role,
                node,
                self.try_next + 1,
                self.alternatives()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_alternative_drops_own_branch() {
        let kind = BranchKind::Disjunction {
            node: NodeId(0),
            disjunction: Concept::or(vec![Concept::atom("A"), Concept::atom("B")]),
            disjuncts: vec![Concept::atom("A"), Concept::atom("B")],
        };
        let mut branch = Branch::new(3, kind, DependencySet::from_branch(1), 1);
        branch.prev_ds = DependencySet::from_branch(2);

        let first = branch.alternative_depends(0, false);
        assert!(first.contains(3) && first.contains(1));

        let last = branch.alternative_depends(1, false);
        assert!(!last.contains(3));
        assert!(last.contains(1) && last.contains(2));
    }

    #[test]
    fn test_root_has_no_alternatives() {
        let root = Branch::root(4);
        assert_eq!(root.alternatives(), 0);
        assert!(root.is_exhausted());
        assert_eq!(root.node_count(), 4);
    }
}
