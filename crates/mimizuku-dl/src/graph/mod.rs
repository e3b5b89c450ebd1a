//! 完全グラフ (completion graph)
//!
//! Nodes live in an arena addressed by `NodeId`. All tables sit behind a
//! single `Arc`, so a derived graph shares storage with its source until its
//! first mutation performs one deep copy.
//!
//! Every mutation made while a choice point is open is appended to that
//! branch's undo trail; backjumping replays the trails in reverse.

mod diagnostics;
mod edge;
mod node;

pub use edge::{Edge, EdgeList};
pub use node::{LiteralState, Node, NodeId, NodeKind, NodeName};

use crate::branch::{Branch, BranchKind};
use crate::clash::{Clash, ClashType};
use crate::dependency::{DependencySet, NO_BRANCH};
use mimizuku_core::{Axiom, Concept, Individual, RBox, Role};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, trace};

/// Undo record of a single graph mutation
#[derive(Debug, Clone)]
pub(crate) enum Change {
    NodeCreated(NodeId),
    TypeAdded {
        node: NodeId,
        concept: Concept,
        previous: Option<DependencySet>,
    },
    EdgeAdded {
        from: NodeId,
        role: Role,
        to: NodeId,
        previous: Option<DependencySet>,
    },
    DifferenceAdded {
        node: NodeId,
        other: NodeId,
        previous: Option<DependencySet>,
    },
    Merged {
        node: NodeId,
    },
}

#[derive(Debug, Clone, Default)]
struct GraphTables {
    nodes: Vec<Node>,
    names: HashMap<NodeName, NodeId>,
    branches: Vec<Branch>,
    asserted_clashes: Vec<Clash>,
    anonymous_count: u32,
    literal_count: u32,
}

impl GraphTables {
    fn insert_edge(&mut self, edge: Edge) {
        if let Some(out) = self.nodes[edge.from.index()].out_edges_mut() {
            out.add(edge.clone());
        }
        self.nodes[edge.to.index()].in_edges.add(edge);
    }

    fn remove_edge(&mut self, from: NodeId, role: &Role, to: NodeId) {
        if let Some(out) = self.nodes[from.index()].out_edges_mut() {
            out.remove(from, role, to);
        }
        self.nodes[to.index()].in_edges.remove(from, role, to);
    }

    fn set_edge_depends(&mut self, from: NodeId, role: &Role, to: NodeId, ds: DependencySet) {
        if let Some(edge) = self.nodes[from.index()]
            .out_edges_mut()
            .and_then(|out| out.find_mut(from, role, to))
        {
            edge.depends = ds.clone();
        }
        if let Some(edge) = self.nodes[to.index()].in_edges.find_mut(from, role, to) {
            edge.depends = ds;
        }
    }

    fn undo(&mut self, change: Change) {
        match change {
            Change::NodeCreated(id) => {
                debug_assert_eq!(id.index() + 1, self.nodes.len());
                if let Some(node) = self.nodes.pop() {
                    self.names.remove(&node.name);
                }
            }
            Change::TypeAdded {
                node,
                concept,
                previous,
            } => {
                let types = &mut self.nodes[node.index()].types;
                match previous {
                    Some(ds) => {
                        types.insert(concept, ds);
                    }
                    None => {
                        types.remove(&concept);
                    }
                }
            }
            Change::EdgeAdded {
                from,
                role,
                to,
                previous,
            } => match previous {
                Some(ds) => self.set_edge_depends(from, &role, to, ds),
                None => self.remove_edge(from, &role, to),
            },
            Change::DifferenceAdded {
                node,
                other,
                previous,
            } => {
                let differences = &mut self.nodes[node.index()].differences;
                match previous {
                    Some(ds) => {
                        differences.insert(other, ds);
                    }
                    None => {
                        differences.remove(&other);
                    }
                }
            }
            Change::Merged { node } => {
                self.nodes[node.index()].merged_to = None;
            }
        }
    }
}

/// Search counters of one graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub branches: usize,
    pub backjumps: usize,
    pub max_branch_depth: usize,
    pub copies: usize,
}

#[derive(Debug, Clone)]
pub struct CompletionGraph {
    tables: Arc<GraphTables>,
    branch: i32,
    clash: Option<Clash>,
    track_explanations: bool,
    revision: u64,
    stats: GraphStats,
}

impl CompletionGraph {
    pub fn new(track_explanations: bool) -> Self {
        Self {
            tables: Arc::new(GraphTables::default()),
            branch: NO_BRANCH,
            clash: None,
            track_explanations,
            revision: 0,
            stats: GraphStats::default(),
        }
    }

    /// Working copy sharing all storage with `self` until it is mutated
    pub fn derive(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            branch: self.branch,
            clash: self.clash.clone(),
            track_explanations: self.track_explanations,
            revision: self.revision,
            stats: GraphStats::default(),
        }
    }

    fn tables(&self) -> &GraphTables {
        &self.tables
    }

    fn tables_mut(&mut self) -> &mut GraphTables {
        if Arc::get_mut(&mut self.tables).is_none() {
            self.stats.copies += 1;
            debug!(nodes = self.tables.nodes.len(), "copy-on-write");
        }
        Arc::make_mut(&mut self.tables)
    }

    fn record(&mut self, change: Change) {
        self.revision += 1;
        if self.branch > 0 {
            let index = self.branch as usize;
            if let Some(branch) = self.tables_mut().branches.get_mut(index) {
                branch.trail.push(change);
            }
        }
    }

    pub fn track_explanations(&self) -> bool {
        self.track_explanations
    }

    /// Increases on every change; the strategies use it to detect a fixed point
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.tables().nodes[id.index()]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.tables().nodes.iter()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        (0..self.node_count() as u32).map(NodeId).collect()
    }

    pub fn node_count(&self) -> usize {
        self.tables().nodes.len()
    }

    pub fn lookup(&self, name: &NodeName) -> Option<NodeId> {
        self.tables().names.get(name).copied()
    }

    pub fn individual_node(&self, individual: &Individual) -> Option<NodeId> {
        self.lookup(&NodeName::Named(individual.clone()))
    }

    pub fn branch(&self) -> i32 {
        self.branch
    }

    pub fn branch_count(&self) -> usize {
        self.tables().branches.len()
    }

    pub fn branches(&self) -> &[Branch] {
        &self.tables().branches
    }

    pub fn clash(&self) -> Option<&Clash> {
        self.clash.as_ref()
    }

    pub fn asserted_clashes(&self) -> &[Clash] {
        &self.tables().asserted_clashes
    }

    fn push_node(&mut self, name: NodeName, kind: NodeKind) -> NodeId {
        let branch = self.branch;
        let tables = self.tables_mut();
        let id = NodeId(tables.nodes.len() as u32);
        tables.names.insert(name.clone(), id);
        tables.nodes.push(Node::new(id, name, kind, branch));
        self.record(Change::NodeCreated(id));
        id
    }

    fn next_anonymous(&mut self) -> u32 {
        let tables = self.tables_mut();
        tables.anonymous_count += 1;
        tables.anonymous_count - 1
    }

    /// Node for a named individual, created on first use with its nominal
    pub fn add_individual(&mut self, individual: &Individual) -> NodeId {
        let name = NodeName::Named(individual.clone());
        if let Some(id) = self.lookup(&name) {
            return id;
        }

        let id = self.push_node(
            name,
            NodeKind::Individual {
                out_edges: EdgeList::new(),
                nominal_level: Some(0),
                parent: None,
                depth: 0,
            },
        );
        self.add_type(
            id,
            Concept::Nominal(individual.clone()),
            DependencySet::independent(),
        );
        id
    }

    /// Fresh unnamed root, the subject of a concept satisfiability test
    pub fn add_root(&mut self) -> NodeId {
        let name = NodeName::Anonymous(self.next_anonymous());
        self.push_node(
            name,
            NodeKind::Individual {
                out_edges: EdgeList::new(),
                nominal_level: None,
                parent: None,
                depth: 0,
            },
        )
    }

    /// Generated successor of `parent`
    pub fn add_anonymous(&mut self, parent: NodeId) -> NodeId {
        let depth = self.node(parent).depth() + 1;
        let name = NodeName::Anonymous(self.next_anonymous());
        self.push_node(
            name,
            NodeKind::Individual {
                out_edges: EdgeList::new(),
                nominal_level: None,
                parent: Some(parent),
                depth,
            },
        )
    }

    pub fn add_literal(&mut self, state: LiteralState) -> NodeId {
        let tables = self.tables_mut();
        tables.literal_count += 1;
        let name = NodeName::Literal(tables.literal_count - 1);
        self.push_node(name, NodeKind::Literal { state })
    }

    /// Representative of `node` in the merge forest
    pub fn find(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some((target, _)) = self.node(current).merged_to() {
            current = *target;
        }
        current
    }

    /// Representative of `node` and the union of the merge dependencies along the way
    pub fn find_with_depends(&self, node: NodeId) -> (NodeId, DependencySet) {
        let mut current = node;
        let mut ds = DependencySet::independent();
        while let Some((target, merge_ds)) = self.node(current).merged_to() {
            ds = ds.union(merge_ds, self.track_explanations);
            current = *target;
        }
        (current, ds)
    }

    pub fn is_same(&self, a: NodeId, b: NodeId) -> bool {
        self.find(a) == self.find(b)
    }

    /// Record `concept` on `node`, and on every node it has been merged into.
    /// Returns whether anything changed.
    pub fn add_type(&mut self, node: NodeId, concept: Concept, ds: DependencySet) -> bool {
        let mut current = node;
        let mut ds = ds.stamped(self.branch);
        let mut changed = false;
        loop {
            changed |= self.add_type_to(current, &concept, ds.clone());
            match self.node(current).merged_to().cloned() {
                Some((target, merge_ds)) => {
                    ds = ds.union(&merge_ds, self.track_explanations);
                    current = target;
                }
                None => break,
            }
        }
        changed
    }

    fn add_type_to(&mut self, node: NodeId, concept: &Concept, ds: DependencySet) -> bool {
        if let Some(existing) = self.node(node).type_depends(concept) {
            if existing.is_independent() || !ds.is_independent() {
                return false;
            }
        }

        trace!(node = %node, concept = %concept, "add type");
        let previous = self.tables_mut().nodes[node.index()]
            .types
            .insert(concept.clone(), ds.clone());
        self.record(Change::TypeAdded {
            node,
            concept: concept.clone(),
            previous,
        });
        self.check_type_clash(node, concept, &ds);
        true
    }

    fn check_type_clash(&mut self, node: NodeId, concept: &Concept, ds: &DependencySet) {
        let name = self.node(node).name.to_string();
        let kind = match concept {
            Concept::Bottom => {
                self.set_clash(Clash::new(node, ClashType::Bottom, ds.clone(), vec![name]));
                return;
            }
            Concept::Atom(_) | Concept::NotAtom(_) => ClashType::Atomic,
            Concept::Nominal(_) | Concept::NotNominal(_) => ClashType::Nominal,
            Concept::Datatype(_) | Concept::NotDatatype(_) => ClashType::EmptyDatatype,
            _ => return,
        };

        let complement = concept.negate();
        if let Some(other) = self.node(node).type_depends(&complement) {
            let depends = ds.union(other, self.track_explanations);
            let clash = Clash::new(node, kind, depends, vec![name, concept.to_string()]);
            self.set_clash(clash);
        }
    }

    /// Keep the clash that justifies the deepest backjump
    pub fn set_clash(&mut self, clash: Clash) {
        if clash.depends.is_independent() && !self.tables().asserted_clashes.contains(&clash) {
            self.tables_mut().asserted_clashes.push(clash.clone());
        }

        let replace = match &self.clash {
            None => true,
            Some(current) => clash.depends.max() >= current.depends.max(),
        };
        if replace {
            debug!(clash = %clash, "clash");
            self.clash = Some(clash);
        }
    }

    /// Add a `role` edge. Inverse roles are stored in their forward direction
    /// and both endpoints are redirected to their representatives.
    pub fn add_edge(&mut self, from: NodeId, role: &Role, to: NodeId, ds: DependencySet) -> bool {
        let (from, to, role) = if role.inverse {
            (to, from, role.inverse())
        } else {
            (from, to, role.clone())
        };
        let expl = self.track_explanations;
        let (from, from_ds) = self.find_with_depends(from);
        let (to, to_ds) = self.find_with_depends(to);
        let ds = ds
            .union(&from_ds, expl)
            .union(&to_ds, expl)
            .stamped(self.branch);

        let previous = match self.node(from).out_edges() {
            None => return false,
            Some(out) => match out.find(from, &role, to) {
                Some(existing) if existing.depends.is_independent() || !ds.is_independent() => {
                    return false
                }
                Some(existing) => Some(existing.depends.clone()),
                None => None,
            },
        };

        trace!(from = %from, role = %role, to = %to, "add edge");
        let tables = self.tables_mut();
        if previous.is_some() {
            tables.set_edge_depends(from, &role, to, ds);
        } else {
            tables.insert_edge(Edge {
                from,
                role: role.clone(),
                to,
                depends: ds,
            });
        }
        self.record(Change::EdgeAdded {
            from,
            role,
            to,
            previous,
        });
        true
    }

    /// Representatives reachable from `node` over `role` or any of its sub-roles
    pub fn neighbours(
        &self,
        node: NodeId,
        role: &Role,
        rbox: &dyn RBox,
    ) -> Vec<(NodeId, DependencySet)> {
        self.collect_neighbours(node, |edge_role| rbox.is_sub_role(edge_role, role))
    }

    /// Like `neighbours`, without the role hierarchy
    pub fn exact_neighbours(&self, node: NodeId, role: &Role) -> Vec<(NodeId, DependencySet)> {
        self.collect_neighbours(node, |edge_role| edge_role == role)
    }

    fn collect_neighbours<F: Fn(&Role) -> bool>(
        &self,
        node: NodeId,
        matches: F,
    ) -> Vec<(NodeId, DependencySet)> {
        let node = self.find(node);
        let mut result: Vec<(NodeId, DependencySet)> = Vec::new();
        let mut push = |other: NodeId, ds: &DependencySet| {
            if self.node(other).is_merged() || result.iter().any(|(id, _)| *id == other) {
                return;
            }
            result.push((other, ds.clone()));
        };

        if let Some(out) = self.node(node).out_edges() {
            for edge in out.iter() {
                if matches(&edge.role) {
                    push(edge.to, &edge.depends);
                }
            }
        }
        for edge in self.node(node).in_edges().iter() {
            if matches(&edge.role.inverse()) {
                push(edge.from, &edge.depends);
            }
        }
        result
    }

    /// Roles connecting `a` to `b`, as seen from `a`
    pub fn edges_between(&self, a: NodeId, b: NodeId) -> BTreeSet<Role> {
        let mut roles = BTreeSet::new();
        if let Some(out) = self.node(a).out_edges() {
            roles.extend(out.iter().filter(|e| e.to == b).map(|e| e.role.clone()));
        }
        roles.extend(
            self.node(a)
                .in_edges()
                .iter()
                .filter(|e| e.from == b)
                .map(|e| e.role.inverse()),
        );
        roles
    }

    pub fn set_different(&mut self, a: NodeId, b: NodeId, ds: DependencySet) {
        let expl = self.track_explanations;
        let (a, a_ds) = self.find_with_depends(a);
        let (b, b_ds) = self.find_with_depends(b);
        let ds = ds.union(&a_ds, expl).union(&b_ds, expl).stamped(self.branch);

        if a == b {
            let args = vec![self.node(a).name.to_string(), self.node(b).name.to_string()];
            self.set_clash(Clash::new(a, ClashType::Nominal, ds, args));
            return;
        }

        for (x, y) in [(a, b), (b, a)] {
            if let Some(existing) = self.node(x).differences().get(&y) {
                if existing.is_independent() || !ds.is_independent() {
                    continue;
                }
            }
            let previous = self.tables_mut().nodes[x.index()]
                .differences
                .insert(y, ds.clone());
            self.record(Change::DifferenceAdded {
                node: x,
                other: y,
                previous,
            });
        }
    }

    /// Dependencies of `a ≠ b`, if the two are known to be different
    pub fn is_different(&self, a: NodeId, b: NodeId) -> Option<DependencySet> {
        let expl = self.track_explanations;
        let (a, a_ds) = self.find_with_depends(a);
        let (b, b_ds) = self.find_with_depends(b);
        self.node(a)
            .differences()
            .get(&b)
            .map(|ds| ds.union(&a_ds, expl).union(&b_ds, expl))
    }

    /// Merge `y` into `x`. Types, edges and differences of `y` are copied to
    /// the representative with `ds` added to their dependencies.
    pub fn merge(&mut self, y: NodeId, x: NodeId, ds: DependencySet) {
        let expl = self.track_explanations;
        let (mut y, y_ds) = self.find_with_depends(y);
        let (mut x, x_ds) = self.find_with_depends(x);
        if x == y {
            return;
        }
        let ds = ds.union(&y_ds, expl).union(&x_ds, expl).stamped(self.branch);

        if self.node(y).is_named() && !self.node(x).is_named() {
            std::mem::swap(&mut x, &mut y);
        }

        match (self.node(x).literal_state(), self.node(y).literal_state()) {
            (None, None) => {}
            (Some(LiteralState::Value(a)), Some(LiteralState::Value(b))) if a != b => {
                let args = vec![a.to_literal().to_string(), b.to_literal().to_string()];
                self.set_clash(Clash::new(x, ClashType::LiteralMerge, ds, args));
                return;
            }
            (Some(LiteralState::Anonymous), Some(state))
                if !matches!(state, LiteralState::Anonymous) =>
            {
                std::mem::swap(&mut x, &mut y);
            }
            (Some(_), Some(_)) => {}
            _ => {
                // An individual and a data value never denote the same element
                let args = vec![self.node(x).name.to_string(), self.node(y).name.to_string()];
                self.set_clash(Clash::new(x, ClashType::LiteralMerge, ds, args));
                return;
            }
        }

        if let Some(diff_ds) = self.is_different(x, y) {
            let args = vec![self.node(y).name.to_string(), self.node(x).name.to_string()];
            let depends = ds.union(&diff_ds, expl);
            self.set_clash(Clash::new(x, ClashType::Nominal, depends, args));
            return;
        }

        debug!(from = %y, into = %x, "merge");
        self.tables_mut().nodes[y.index()].merged_to = Some((x, ds.clone()));
        self.record(Change::Merged { node: y });

        let merged = self.node(y).clone();
        for (concept, concept_ds) in merged.types() {
            self.add_type(x, concept.clone(), concept_ds.union(&ds, expl));
        }
        if let Some(out) = merged.out_edges() {
            for edge in out.iter() {
                self.add_edge(x, &edge.role, edge.to, edge.depends.union(&ds, expl));
            }
        }
        for edge in merged.in_edges().iter() {
            self.add_edge(edge.from, &edge.role, x, edge.depends.union(&ds, expl));
        }
        for (other, diff_ds) in merged.differences() {
            self.set_different(x, *other, diff_ds.union(&ds, expl));
        }
    }

    /// Push the root branch. Everything asserted before this call is the
    /// fixed base no backjump can undo.
    pub fn initialize(&mut self) {
        if self.tables().branches.is_empty() {
            let node_count = self.node_count();
            self.tables_mut().branches.push(Branch::root(node_count));
        }
        self.branch = self.branch_count() as i32 - 1;
    }

    /// Open a choice point and apply its first alternative
    pub fn add_branch(&mut self, kind: BranchKind, term_depends: DependencySet) {
        let index = self.branch_count();
        let branch = Branch::new(index as u32, kind, term_depends, self.node_count());
        debug!(branch = %branch, "new branch");
        self.tables_mut().branches.push(branch);
        self.branch = index as i32;
        self.stats.branches += 1;
        self.stats.max_branch_depth = self.stats.max_branch_depth.max(index);
        self.try_branch(index);
    }

    fn try_branch(&mut self, index: usize) {
        let branch = &self.tables().branches[index];
        let alt = branch.try_next;
        if alt >= branch.alternatives() {
            return;
        }
        let ds = branch.alternative_depends(alt, self.track_explanations);
        let kind = branch.kind.clone();
        trace!(branch = index, alternative = alt, "try branch");

        match kind {
            BranchKind::Root => {}
            BranchKind::Disjunction {
                node, disjuncts, ..
            } => {
                for earlier in &disjuncts[..alt] {
                    self.add_type(node, earlier.negate(), ds.clone());
                }
                self.add_type(node, disjuncts[alt].clone(), ds);
            }
            BranchKind::Merge { pairs, .. } => {
                for &(a, b) in &pairs[..alt] {
                    self.set_different(a, b, ds.clone());
                }
                let (y, x) = pairs[alt];
                self.merge(y, x, ds);
            }
        }
    }

    /// Resolve the current clash by backjumping.
    ///
    /// Undoes everything done since the deepest choice point the clash
    /// depends on and applies its next alternative; exhausted branches pass
    /// the clash further down. Returns `false` once the clash depends on no
    /// choice point, meaning the graph has no model.
    pub fn backjump(&mut self) -> bool {
        let expl = self.track_explanations;
        while let Some(clash) = self.clash.take() {
            let target = clash.depends.max();
            if target <= 0 || target as usize >= self.branch_count() {
                self.clash = Some(clash);
                return false;
            }

            let b = target as usize;
            self.stats.backjumps += 1;
            debug!(from = self.branch, to = b, clash = %clash, "backjump");
            self.restore(b);

            let mut failed = clash.depends.clone();
            failed.remove(b as u32);
            let tables = self.tables_mut();
            let branch = &mut tables.branches[b];
            branch.prev_ds = branch.prev_ds.union(&failed, expl);
            branch.try_next += 1;
            if branch.try_next < branch.alternatives() {
                self.try_branch(b);
            } else {
                trace!(branch = b, "branch exhausted");
                let depends = branch.prev_ds.union(&branch.term_depends, expl);
                self.clash = Some(Clash { depends, ..clash });
            }
        }
        true
    }

    /// Undo every change made at branch `b` or later and drop the later branches
    fn restore(&mut self, b: usize) {
        let tables = self.tables_mut();
        let mut changes = Vec::new();
        while tables.branches.len() > b + 1 {
            if let Some(branch) = tables.branches.pop() {
                changes.extend(branch.trail.into_iter().rev());
            }
        }
        changes.extend(tables.branches[b].trail.drain(..).rev());
        for change in changes {
            tables.undo(change);
        }
        debug_assert_eq!(
            tables.nodes.len(),
            tables.branches[b].node_count(),
            "nodes created after branch {} survived the restore",
            b
        );
        self.branch = b as i32;
        self.revision += 1;
    }

    /// Remove every fact whose explanation mentions one of `axioms`.
    /// Only meaningful when explanations are tracked.
    pub fn retract_explained_by(&mut self, axioms: &[Arc<Axiom>]) -> usize {
        let mentions = |ds: &DependencySet| axioms.iter().any(|a| ds.mentions(a));
        let tables = self.tables_mut();
        let mut removed = 0;

        for node in tables.nodes.iter_mut() {
            let before = node.types.len() + node.differences.len() + node.in_edges.len();
            node.types.retain(|_, ds| !mentions(ds));
            node.differences.retain(|_, ds| !mentions(ds));
            node.in_edges.retain(|e| !mentions(&e.depends));
            removed += before - (node.types.len() + node.differences.len() + node.in_edges.len());

            if let Some(out) = node.out_edges_mut() {
                let before = out.len();
                out.retain(|e| !mentions(&e.depends));
                removed += before - out.len();
            }
            if node.merged_to.as_ref().map_or(false, |(_, ds)| mentions(ds)) {
                node.merged_to = None;
                removed += 1;
            }
        }
        tables.asserted_clashes.retain(|c| !mentions(&c.depends));

        if self.clash.as_ref().map_or(false, |c| mentions(&c.depends)) {
            self.clash = None;
        }
        if self.clash.is_none() {
            if let Some(surviving) = self.tables().asserted_clashes.first().cloned() {
                debug!(clash = %surviving, "asserted clash survives retraction");
                self.set_clash(surviving);
            }
        }
        if self.clash.is_none() {
            self.recheck_type_clashes();
        }
        self.revision += 1;
        removed
    }

    /// Look for complementary or bottom types on every representative.
    /// Type clashes are otherwise only found when a type is inserted.
    fn recheck_type_clashes(&mut self) {
        let labels: Vec<(NodeId, Concept, DependencySet)> = self
            .nodes()
            .filter(|node| !node.is_merged())
            .flat_map(|node| {
                node.types()
                    .iter()
                    .map(move |(concept, ds)| (node.id, concept.clone(), ds.clone()))
            })
            .collect();
        for (node, concept, ds) in labels {
            self.check_type_clash(node, &concept, &ds);
        }
    }
}
