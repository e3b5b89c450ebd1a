//! 概念充足可能性キャッシュ
//!
//! Results of concept satisfiability tests, keyed by the normalized
//! concept. Satisfiable entries keep a summary of the root node of the model
//! that was found, which is enough to answer some subsumption questions
//! without another search.

use crate::graph::{CompletionGraph, NodeId};
use mimizuku_core::{Concept, Role};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::trace;

/// Three-valued answer of the "known" queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Known {
    True,
    False,
    Unknown,
}

impl Known {
    pub fn is_known(self) -> bool {
        self != Known::Unknown
    }

    pub fn to_option(self) -> Option<bool> {
        match self {
            Known::True => Some(true),
            Known::False => Some(false),
            Known::Unknown => None,
        }
    }
}

impl From<bool> for Known {
    fn from(value: bool) -> Self {
        if value {
            Known::True
        } else {
            Known::False
        }
    }
}

/// Root node of a model found for a cached concept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedModel {
    /// Label of the root; the flag tells whether the type holds independently of any choice
    pub types: BTreeMap<Concept, bool>,
    /// Roles of the root's outgoing and incoming edges, as seen from the root
    pub roles: BTreeSet<Role>,
    /// The model was built by a completed search
    pub complete: bool,
    /// The root label depends on no choice point
    pub independent: bool,
}

impl CachedModel {
    /// Summarize the root node of a saturated graph
    pub fn from_root(graph: &CompletionGraph, root: NodeId) -> Self {
        let root = graph.find(root);
        let node = graph.node(root);
        let types: BTreeMap<Concept, bool> = node
            .types()
            .iter()
            .map(|(concept, ds)| (concept.clone(), ds.is_independent()))
            .collect();

        let mut roles = BTreeSet::new();
        if let Some(out) = node.out_edges() {
            roles.extend(out.iter().map(|e| e.role.clone()));
        }
        roles.extend(node.in_edges().iter().map(|e| e.role.inverse()));

        let independent = types.values().all(|independent| *independent);
        Self {
            types,
            roles,
            complete: true,
            independent,
        }
    }

    fn has_nominals(&self) -> bool {
        self.types
            .keys()
            .any(|c| matches!(c, Concept::Nominal(_) | Concept::NotNominal(_)))
    }

    fn restricts_successors(&self) -> bool {
        self.types
            .keys()
            .any(|c| matches!(c, Concept::Forall(..) | Concept::AtMost(..)))
    }

    /// Whether the two roots could be merged into one node without a clash.
    /// Only answers `true` when that is certain.
    fn is_mergeable_with(&self, other: &CachedModel) -> bool {
        if !self.complete || !other.complete || self.has_nominals() || other.has_nominals() {
            return false;
        }
        if !self.roles.is_empty() && !other.roles.is_empty() {
            return false;
        }
        if (self.restricts_successors() && !other.roles.is_empty())
            || (other.restricts_successors() && !self.roles.is_empty())
        {
            return false;
        }

        !self.types.keys().any(|c| {
            c.is_primitive() && other.types.contains_key(&c.negate())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedNode {
    Unsatisfiable,
    Satisfiable(CachedModel),
}

/// Cache statistics, passive only
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// LRU-bounded satisfiability cache
#[derive(Debug, Clone)]
pub struct ConceptCache {
    capacity: usize,
    entries: HashMap<Concept, (CachedNode, u64)>,
    recency: BTreeMap<u64, Concept>,
    tick: u64,
    stats: CacheStats,
}

impl ConceptCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            tick: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Look up `concept`, marking it as recently used
    pub fn get(&mut self, concept: &Concept) -> Option<&CachedNode> {
        let tick = self.next_tick();
        match self.entries.get_mut(concept) {
            Some((node, last_used)) => {
                self.stats.hits += 1;
                self.recency.remove(last_used);
                self.recency.insert(tick, concept.clone());
                *last_used = tick;
                Some(&*node)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Look up without touching recency or statistics
    pub fn peek(&self, concept: &Concept) -> Option<&CachedNode> {
        self.entries.get(concept).map(|(node, _)| node)
    }

    pub fn put_unsat(&mut self, concept: Concept) {
        self.put(concept, CachedNode::Unsatisfiable);
    }

    pub fn put_sat(&mut self, concept: Concept, model: CachedModel) {
        self.put(concept, CachedNode::Satisfiable(model));
    }

    fn put(&mut self, concept: Concept, node: CachedNode) {
        if self.capacity == 0 {
            return;
        }
        let tick = self.next_tick();
        if let Some((_, last_used)) = self.entries.get(&concept) {
            self.recency.remove(last_used);
        } else if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        trace!(concept = %concept, "cache put");
        self.recency.insert(tick, concept.clone());
        self.entries.insert(concept, (node, tick));
    }

    fn evict_oldest(&mut self) {
        let oldest = self.recency.keys().next().copied();
        if let Some(tick) = oldest {
            if let Some(concept) = self.recency.remove(&tick) {
                trace!(concept = %concept, "cache eviction");
                self.entries.remove(&concept);
                self.stats.evictions += 1;
            }
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Drop every entry. Called whenever the TBox or RBox changes.
    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    pub fn is_known_sat(&self, concept: &Concept) -> Known {
        match concept {
            Concept::Top => return Known::True,
            Concept::Bottom => return Known::False,
            _ => {}
        }
        match self.peek(concept) {
            Some(CachedNode::Unsatisfiable) => Known::False,
            Some(CachedNode::Satisfiable(_)) => Known::True,
            None => Known::Unknown,
        }
    }

    /// Subsumption from cached models alone.
    ///
    /// `True` when `sub` is unsatisfiable or its model has `sup` independently;
    /// `False` when the models of `sub` and `¬sup` are certainly mergeable.
    pub fn is_known_sub_class_of(&self, sub: &Concept, sup: &Concept) -> Known {
        if *sup == Concept::Top || *sub == Concept::Bottom || sub == sup {
            return Known::True;
        }

        let sub_model = match self.peek(sub) {
            Some(CachedNode::Unsatisfiable) => return Known::True,
            Some(CachedNode::Satisfiable(model)) => model,
            None => return Known::Unknown,
        };
        if sub_model.types.get(sup) == Some(&true) {
            return Known::True;
        }

        match self.peek(&sup.negate()) {
            Some(CachedNode::Satisfiable(neg_model)) if sub_model.is_mergeable_with(neg_model) => {
                Known::False
            }
            _ => Known::Unknown,
        }
    }
}
