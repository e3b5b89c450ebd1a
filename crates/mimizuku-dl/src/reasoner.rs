//! 知識ベースと整合性検査ドライバ
//!
//! Every query is reduced to one question: does the completion graph,
//! extended with one extra assumption, still have a model? The answer comes
//! from the satisfiability cache when possible, otherwise from running the
//! selected strategy on a copy-on-write working graph.

use crate::cache::{CacheStats, CachedModel, CachedNode, ConceptCache, Known};
use crate::clash::Clash;
use crate::config::{ReasonerConfig, ResetPolicy};
use crate::dependency::DependencySet;
use crate::graph::{CompletionGraph, LiteralState, NodeId};
use crate::incremental::{assert_axiom, ChangeTracker};
use crate::strategy::{CompletionSession, CompletionStrategy, Expansion, Strategy};
use crate::timer::{CancelHandle, Timer};
use crate::ReasonerError;
use mimizuku_core::{
    Axiom, AxiomKind, ClassExpression, Concept, DatatypeError, DatatypeReasoner, Expressivity,
    Individual, Literal, Ontology, OwlIri, PropertyExpression, XsdDatatypes,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unchecked,
    Consistent,
    Inconsistent,
    Aborted,
}

/// A value of a property for some individual
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PropertyValue {
    Individual(Individual),
    Literal(Literal),
}

/// Counters accumulated over all checks of a knowledge base
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReasonerStats {
    pub consistency_checks: usize,
    pub incremental_checks: usize,
    pub satisfiability_checks: usize,
    pub instance_checks: usize,
    pub branches: usize,
    pub backjumps: usize,
    pub copies: usize,
    pub generated_nodes: usize,
    pub cache: CacheStats,
}

/// OWL DL knowledge base with a tableau consistency engine
pub struct KnowledgeBase {
    ontology: Ontology,
    datatypes: Box<dyn DatatypeReasoner>,
    config: ReasonerConfig,
    cache: ConceptCache,
    state: State,
    /// ABox assertions only, before any rule has fired
    base: Option<CompletionGraph>,
    /// Graph of the last consistency check
    completed: Option<CompletionGraph>,
    /// Whether `completed` came from the EL strategy, whose successors may be
    /// shared between predecessors
    completed_el: bool,
    changes: ChangeTracker,
    last_clash: Option<Clash>,
    last_graph: Option<CompletionGraph>,
    stats: ReasonerStats,
    cancel: CancelHandle,
}

impl KnowledgeBase {
    pub fn new(ontology: Ontology) -> Self {
        Self::with_config(ontology, ReasonerConfig::default())
    }

    pub fn with_config(ontology: Ontology, config: ReasonerConfig) -> Self {
        Self {
            ontology,
            datatypes: Box::new(XsdDatatypes::new()),
            cache: ConceptCache::new(config.cache_capacity),
            config,
            state: State::Unchecked,
            base: None,
            completed: None,
            completed_el: false,
            changes: ChangeTracker::new(),
            last_clash: None,
            last_graph: None,
            stats: ReasonerStats::default(),
            cancel: CancelHandle::new(),
        }
    }

    /// Replace the datatype reasoner. Discards all derived state.
    pub fn with_datatypes(mut self, datatypes: Box<dyn DatatypeReasoner>) -> Self {
        self.datatypes = datatypes;
        self.reset();
        self
    }

    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    pub fn config(&self) -> &ReasonerConfig {
        &self.config
    }

    pub fn expressivity(&self) -> Expressivity {
        self.ontology.expressivity()
    }

    /// Add an axiom. ABox changes are tracked for incremental checking,
    /// TBox and RBox changes drop the cache and every derived graph.
    pub fn add_axiom(&mut self, axiom: Axiom) -> Result<Arc<Axiom>, ReasonerError> {
        if let Axiom::DataPropertyAssertion(_, _, literal) = &axiom {
            if !self.datatypes.is_known(&literal.datatype) {
                return Err(DatatypeError::UnknownDatatype(literal.datatype.clone()).into());
            }
        }

        let known = self.ontology.contains(&axiom);
        let stored = self.ontology.add_axiom(axiom);
        if known {
            return Ok(stored);
        }

        debug!(axiom = %stored, "axiom added");
        match stored.kind() {
            AxiomKind::ABox => {
                self.changes.record_addition(stored.clone());
                self.abox_changed();
            }
            AxiomKind::TBox | AxiomKind::RBox => self.schema_changed(),
        }
        Ok(stored)
    }

    /// Remove an axiom; returns whether it was present
    pub fn remove_axiom(&mut self, axiom: &Axiom) -> bool {
        let Some(removed) = self.ontology.remove_axiom(axiom) else {
            return false;
        };

        debug!(axiom = %removed, "axiom removed");
        match removed.kind() {
            AxiomKind::ABox => {
                self.changes.record_deletion(removed);
                self.abox_changed();
            }
            AxiomKind::TBox | AxiomKind::RBox => self.schema_changed(),
        }
        true
    }

    fn abox_changed(&mut self) {
        self.base = None;
        if !self.config.incremental_consistency {
            self.completed = None;
        }
        if self.state != State::Aborted {
            self.state = State::Unchecked;
        }
    }

    fn schema_changed(&mut self) {
        self.cache.invalidate();
        self.base = None;
        self.completed = None;
        self.changes.clear();
        if self.state != State::Aborted {
            self.state = State::Unchecked;
        }
    }

    /// Discard every derived result, including an aborted session
    pub fn reset(&mut self) {
        self.cache = ConceptCache::new(self.config.cache_capacity);
        self.state = State::Unchecked;
        self.base = None;
        self.completed = None;
        self.changes.clear();
        self.last_clash = None;
        self.last_graph = None;
        self.stats = ReasonerStats::default();
        self.cancel.clear();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn stats(&self) -> ReasonerStats {
        ReasonerStats {
            cache: self.cache.stats(),
            ..self.stats
        }
    }

    /// Graph of the most recent completion run, whatever the query was
    pub fn last_graph(&self) -> Option<&CompletionGraph> {
        self.last_graph.as_ref()
    }

    fn ensure_live(&self) -> Result<(), ReasonerError> {
        if self.state == State::Aborted {
            Err(ReasonerError::SessionAborted)
        } else {
            Ok(())
        }
    }

    fn ensure_individual(&self, individual: &Individual) -> Result<(), ReasonerError> {
        if self.ontology.individuals().contains(individual) {
            Ok(())
        } else {
            Err(ReasonerError::UnknownIndividual(individual.clone()))
        }
    }

    /// The ABox as a graph, before any rule has fired
    fn build_base(&self) -> CompletionGraph {
        let mut graph = CompletionGraph::new(self.config.track_explanations);
        for individual in self.ontology.individuals() {
            graph.add_individual(individual);
        }
        for axiom in self.ontology.abox_axioms() {
            assert_axiom(&mut graph, axiom, self.datatypes.as_ref());
        }
        graph
    }

    fn base_graph(&mut self) -> CompletionGraph {
        let base = match self.base.take() {
            Some(base) => base,
            None => self.build_base(),
        };
        let derived = base.derive();
        self.base = Some(base);
        derived
    }

    /// Whether the completed graph can be extended by a run of the strategy
    /// selected for `expressivity`.
    ///
    /// It must hold no choice point, since an assumption added on top of it
    /// must never be undone by a backjump. An EL graph is not tree shaped and
    /// only serves queries that stay within EL.
    fn completed_reusable(&self, expressivity: &Expressivity) -> bool {
        self.completed.as_ref().map_or(false, |graph| {
            graph.branch_count() <= 1 && (!self.completed_el || expressivity.is_el())
        })
    }

    /// Starting point of a query on a consistent knowledge base
    fn query_graph(&mut self, expressivity: &Expressivity) -> CompletionGraph {
        if self.config.reset_policy == ResetPolicy::Partial && self.completed_reusable(expressivity) {
            if let Some(completed) = &self.completed {
                if completed.clash().is_none() {
                    return completed.derive();
                }
            }
        }
        self.base_graph()
    }

    /// Run the strategy selected for `expressivity` on `graph`
    fn complete(
        &mut self,
        graph: CompletionGraph,
        expressivity: &Expressivity,
    ) -> Result<(bool, CompletionGraph), ReasonerError> {
        self.ensure_live()?;
        let mut strategy = Strategy::select(expressivity);
        let timer = Timer::new(self.config.timeout(), self.cancel.clone());
        let mut session = CompletionSession::new(
            graph,
            &self.ontology,
            &self.ontology,
            self.datatypes.as_ref(),
            &timer,
        );
        let outcome = strategy.expand(&mut session);
        let CompletionSession { graph, stats, .. } = session;

        let graph_stats = graph.stats();
        self.stats.branches += graph_stats.branches;
        self.stats.backjumps += graph_stats.backjumps;
        self.stats.copies += graph_stats.copies;
        self.stats.generated_nodes += stats.generated_nodes;

        let expansion = match outcome {
            Ok(expansion) => expansion,
            Err(err) => {
                if err.is_fatal() {
                    warn!(error = %err, "reasoning aborted");
                    self.state = State::Aborted;
                }
                self.last_graph = Some(graph);
                return Err(err);
            }
        };

        if cfg!(debug_assertions) {
            graph.validate()?;
        }

        let satisfiable = expansion == Expansion::Saturated;
        debug!(
            strategy = strategy.name(),
            satisfiable,
            nodes = graph.node_count(),
            branches = graph_stats.branches,
            backjumps = graph_stats.backjumps,
            "completion finished"
        );
        if !satisfiable {
            self.last_clash = graph.clash().cloned();
        }
        self.last_graph = Some(graph.clone());
        Ok((satisfiable, graph))
    }

    pub fn is_consistent(&mut self) -> Result<bool, ReasonerError> {
        self.ensure_live()?;
        match self.state {
            State::Consistent => return Ok(true),
            State::Inconsistent => return Ok(false),
            _ => {}
        }
        if self.config.incremental_consistency && self.completed.is_some() && !self.changes.is_empty() {
            return self.is_inc_consistent();
        }
        self.check_full()
    }

    fn check_full(&mut self) -> Result<bool, ReasonerError> {
        let expressivity = self.ontology.expressivity();
        info!(
            individuals = self.ontology.individuals().len(),
            axioms = self.ontology.axioms().len(),
            dl = %expressivity.dl_name(),
            "consistency check"
        );

        let mut graph = self.base_graph();
        if graph.node_count() == 0 {
            // The domain is never empty
            graph.add_root();
        }
        let (consistent, graph) = self.complete(graph, &expressivity)?;
        self.finish_check(consistent, graph, &expressivity);
        self.stats.consistency_checks += 1;
        Ok(consistent)
    }

    fn finish_check(&mut self, consistent: bool, graph: CompletionGraph, expressivity: &Expressivity) {
        info!(consistent, "consistency check finished");
        self.state = if consistent {
            State::Consistent
        } else {
            State::Inconsistent
        };
        self.completed = Some(graph);
        self.completed_el = expressivity.is_el();
        self.changes.clear();
    }

    /// Apply the pending ABox changes to the completed graph instead of
    /// starting over. Falls back to a full check when the completed graph
    /// cannot be extended, or when axioms were removed without explanations.
    pub fn is_inc_consistent(&mut self) -> Result<bool, ReasonerError> {
        self.ensure_live()?;
        let expressivity = self.ontology.expressivity();
        let usable = self.completed_reusable(&expressivity)
            && (self.changes.deleted().is_empty() || self.config.track_explanations);
        if !usable {
            debug!("incremental check not applicable");
            return self.check_full();
        }
        let Some(mut graph) = self.completed.take() else {
            return self.check_full();
        };

        info!(
            added = self.changes.added().len(),
            deleted = self.changes.deleted().len(),
            "incremental consistency check"
        );
        if !self.changes.deleted().is_empty() {
            let removed = graph.retract_explained_by(self.changes.deleted());
            debug!(removed, "retracted facts");
        }
        for axiom in self.changes.added() {
            assert_axiom(&mut graph, axiom, self.datatypes.as_ref());
        }

        let (consistent, graph) = self.complete(graph, &expressivity)?;
        self.finish_check(consistent, graph, &expressivity);
        self.stats.incremental_checks += 1;
        Ok(consistent)
    }

    pub fn is_satisfiable(&mut self, class: &ClassExpression) -> Result<bool, ReasonerError> {
        self.ensure_live()?;
        self.concept_satisfiable(&class.to_concept())
    }

    fn concept_satisfiable(&mut self, concept: &Concept) -> Result<bool, ReasonerError> {
        if !self.is_consistent()? {
            return Ok(false);
        }

        let with_abox = self.ontology.tbox_expressivity().nominals || concept.has_nominals();
        let cacheable = self.config.use_cache && !with_abox;
        if cacheable {
            match self.cache.get(concept) {
                Some(CachedNode::Unsatisfiable) => return Ok(false),
                Some(CachedNode::Satisfiable(_)) => return Ok(true),
                None => {}
            }
        }

        let mut expressivity = if with_abox {
            self.ontology.expressivity()
        } else {
            self.ontology.tbox_expressivity()
        };
        expressivity.visit(concept);
        let mut graph = if with_abox {
            self.query_graph(&expressivity)
        } else {
            CompletionGraph::new(self.config.track_explanations)
        };
        let root = graph.add_root();
        graph.add_type(root, concept.clone(), DependencySet::independent());

        let (satisfiable, graph) = self.complete(graph, &expressivity)?;
        self.stats.satisfiability_checks += 1;
        if cacheable {
            if satisfiable {
                self.cache
                    .put_sat(concept.clone(), CachedModel::from_root(&graph, root));
            } else {
                self.cache.put_unsat(concept.clone());
            }
        }
        Ok(satisfiable)
    }

    /// Satisfiability from the cache alone. Unknown until the current ABox
    /// has been checked, since an ABox change can make every concept
    /// unsatisfiable without touching the cache.
    pub fn is_known_satisfiable(&self, class: &ClassExpression) -> Known {
        match self.state {
            State::Inconsistent => Known::False,
            State::Consistent => self.cache.is_known_sat(&class.to_concept()),
            State::Unchecked | State::Aborted => Known::Unknown,
        }
    }

    pub fn is_sub_class_of(
        &mut self,
        sub: &ClassExpression,
        sup: &ClassExpression,
    ) -> Result<bool, ReasonerError> {
        self.ensure_live()?;
        let (sub, sup) = (sub.to_concept(), sup.to_concept());
        if !self.concept_satisfiable(&sub)? {
            return Ok(true);
        }
        match self.cache.is_known_sub_class_of(&sub, &sup) {
            Known::True => return Ok(true),
            Known::False => return Ok(false),
            Known::Unknown => {}
        }
        let query = Concept::and(vec![sub, sup.negate()]);
        Ok(!self.concept_satisfiable(&query)?)
    }

    pub fn is_known_sub_class_of(&self, sub: &ClassExpression, sup: &ClassExpression) -> Known {
        match self.state {
            State::Inconsistent => Known::True,
            State::Consistent => self
                .cache
                .is_known_sub_class_of(&sub.to_concept(), &sup.to_concept()),
            State::Unchecked | State::Aborted => Known::Unknown,
        }
    }

    pub fn is_type(
        &mut self,
        individual: &Individual,
        class: &ClassExpression,
    ) -> Result<bool, ReasonerError> {
        self.ensure_live()?;
        self.ensure_individual(individual)?;
        if !self.is_consistent()? {
            return Ok(true);
        }
        match self.is_known_type(individual, class) {
            Known::True => return Ok(true),
            Known::False => return Ok(false),
            Known::Unknown => {}
        }

        let negated = class.to_concept().negate();
        let mut expressivity = self.ontology.expressivity();
        expressivity.visit(&negated);
        let mut graph = self.query_graph(&expressivity);
        let node = graph
            .individual_node(individual)
            .ok_or_else(|| ReasonerError::UnknownIndividual(individual.clone()))?;
        graph.add_type(node, negated, DependencySet::independent());

        let (satisfiable, _) = self.complete(graph, &expressivity)?;
        self.stats.instance_checks += 1;
        Ok(!satisfiable)
    }

    /// Representative of `individual` in the completed graph, if it was
    /// reached through merges that depend on no choice point
    fn settled_node(&self, individual: &Individual) -> Option<(&CompletionGraph, NodeId)> {
        if self.state != State::Consistent {
            return None;
        }
        let graph = self.completed.as_ref()?;
        let (node, ds) = graph.find_with_depends(graph.individual_node(individual)?);
        ds.is_independent().then_some((graph, node))
    }

    /// Instance check from the completed graph alone
    pub fn is_known_type(&self, individual: &Individual, class: &ClassExpression) -> Known {
        if self.state == State::Inconsistent {
            return Known::True;
        }
        let Some((graph, node)) = self.settled_node(individual) else {
            return Known::Unknown;
        };

        let concept = class.to_concept();
        if concept == Concept::Top {
            return Known::True;
        }
        let label = graph.node(node);
        if label.type_depends(&concept).map_or(false, DependencySet::is_independent) {
            return Known::True;
        }
        if label
            .type_depends(&concept.negate())
            .map_or(false, DependencySet::is_independent)
        {
            return Known::False;
        }
        // The completed graph is a model in which the individual lacks the class
        if matches!(concept, Concept::Atom(_)) && !label.has_type(&concept) {
            return Known::False;
        }
        Known::Unknown
    }

    /// Named classes of `individual` that need no search
    pub fn get_obvious_types(&self, individual: &Individual) -> Vec<OwlIri> {
        let Some((graph, node)) = self.settled_node(individual) else {
            return Vec::new();
        };
        graph
            .node(node)
            .types()
            .iter()
            .filter_map(|(concept, ds)| match concept {
                Concept::Atom(iri) if ds.is_independent() => Some(iri.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_same_as(&mut self, a: &Individual, b: &Individual) -> Result<bool, ReasonerError> {
        self.ensure_live()?;
        self.ensure_individual(a)?;
        self.ensure_individual(b)?;
        if !self.is_consistent()? || a == b {
            return Ok(true);
        }
        if let (Some((graph, x)), Some((_, y))) = (self.settled_node(a), self.settled_node(b)) {
            if x == y {
                return Ok(true);
            }
            if graph.is_different(x, y).map_or(false, |ds| ds.is_independent()) {
                return Ok(false);
            }
        }

        let expressivity = self.ontology.expressivity();
        let mut graph = self.query_graph(&expressivity);
        let (x, y) = self.query_nodes(&graph, a, b)?;
        graph.set_different(x, y, DependencySet::independent());
        let (satisfiable, _) = self.complete(graph, &expressivity)?;
        self.stats.instance_checks += 1;
        Ok(!satisfiable)
    }

    pub fn is_different_from(&mut self, a: &Individual, b: &Individual) -> Result<bool, ReasonerError> {
        self.ensure_live()?;
        self.ensure_individual(a)?;
        self.ensure_individual(b)?;
        if !self.is_consistent()? {
            return Ok(true);
        }
        if a == b {
            return Ok(false);
        }

        let expressivity = self.ontology.expressivity();
        let mut graph = self.query_graph(&expressivity);
        let (x, y) = self.query_nodes(&graph, a, b)?;
        graph.merge(x, y, DependencySet::independent());
        let (satisfiable, _) = self.complete(graph, &expressivity)?;
        self.stats.instance_checks += 1;
        Ok(!satisfiable)
    }

    fn query_nodes(
        &self,
        graph: &CompletionGraph,
        a: &Individual,
        b: &Individual,
    ) -> Result<(NodeId, NodeId), ReasonerError> {
        let x = graph
            .individual_node(a)
            .ok_or_else(|| ReasonerError::UnknownIndividual(a.clone()))?;
        let y = graph
            .individual_node(b)
            .ok_or_else(|| ReasonerError::UnknownIndividual(b.clone()))?;
        Ok((x, y))
    }

    /// Values of `property` for `individual`.
    ///
    /// Object values are the named individuals `v` with `individual: ∃P.{v}`
    /// entailed; data values are those asserted or derived without any choice.
    pub fn get_property_values(
        &mut self,
        individual: &Individual,
        property: &PropertyExpression,
    ) -> Result<Vec<PropertyValue>, ReasonerError> {
        self.ensure_live()?;
        self.ensure_individual(individual)?;
        if !self.is_consistent()? {
            let everyone = if property.is_data() {
                Vec::new()
            } else {
                self.ontology
                    .individuals()
                    .iter()
                    .cloned()
                    .map(PropertyValue::Individual)
                    .collect()
            };
            return Ok(everyone);
        }

        let role = property.to_role();
        let graph = match &self.completed {
            Some(graph) => graph.derive(),
            None => return Ok(Vec::new()),
        };
        let Some(subject) = graph.individual_node(individual) else {
            return Ok(Vec::new());
        };
        let (subject, subject_ds) = graph.find_with_depends(subject);
        let neighbours = graph.neighbours(subject, &role, &self.ontology);

        if property.is_data() {
            let mut values: Vec<PropertyValue> = neighbours
                .iter()
                .filter(|(_, ds)| ds.is_independent() && subject_ds.is_independent())
                .filter_map(|(node, _)| match graph.node(*node).literal_state() {
                    Some(LiteralState::Value(value)) => {
                        Some(PropertyValue::Literal(value.to_literal()))
                    }
                    _ => None,
                })
                .collect();
            values.sort();
            values.dedup();
            return Ok(values);
        }

        let mut values = Vec::new();
        let candidates: Vec<Individual> = self.ontology.individuals().iter().cloned().collect();
        for candidate in candidates {
            let Some(node) = graph.individual_node(&candidate) else {
                continue;
            };
            let (node, node_ds) = graph.find_with_depends(node);
            // The completed graph is a model: only its neighbours can be values
            let Some((_, edge_ds)) = neighbours.iter().find(|(n, _)| *n == node) else {
                continue;
            };
            let settled = edge_ds.is_independent()
                && node_ds.is_independent()
                && subject_ds.is_independent();
            let has_value = ClassExpression::HasValue {
                property: property.clone(),
                individual: candidate.clone(),
            };
            if settled || self.is_type(individual, &has_value)? {
                values.push(PropertyValue::Individual(candidate));
            }
        }
        Ok(values)
    }

    /// Human-readable reason for the last negative result
    pub fn get_explanation(&self) -> Option<String> {
        self.last_clash.as_ref().map(Clash::describe)
    }

    /// Axioms behind the last clash; empty unless explanations are tracked
    pub fn get_explanation_set(&self) -> BTreeSet<Arc<Axiom>> {
        self.last_clash
            .as_ref()
            .map(|clash| clash.depends.explain().clone())
            .unwrap_or_default()
    }

    pub fn last_clash(&self) -> Option<&Clash> {
        self.last_clash.as_ref()
    }

    /// Check the structural invariants of the completed graph
    pub fn validate(&self) -> Result<(), ReasonerError> {
        match &self.completed {
            Some(graph) => graph.validate(),
            None => Ok(()),
        }
    }

    pub fn print_tree(&self) -> String {
        match self.last_graph.as_ref().or(self.completed.as_ref()) {
            Some(graph) => graph.print_tree(),
            None => String::from("completion graph: not built"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EX: &str = "http://example.org/";

    fn ind(name: &str) -> Individual {
        Individual::new(format!("{}{}", EX, name))
    }

    fn class(name: &str) -> ClassExpression {
        ClassExpression::named(format!("{}{}", EX, name))
    }

    #[test]
    fn test_empty_knowledge_base_is_consistent() {
        let mut kb = KnowledgeBase::new(Ontology::new());
        assert!(kb.is_consistent().unwrap());
        assert_eq!(kb.stats().consistency_checks, 1);
    }

    #[test]
    fn test_unsatisfiable_thing_makes_empty_kb_inconsistent() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(Axiom::SubClassOf(ClassExpression::Thing, ClassExpression::Nothing));
        let mut kb = KnowledgeBase::new(ontology);
        assert!(!kb.is_consistent().unwrap());
    }

    #[test]
    fn test_unknown_datatype_is_rejected() {
        let mut kb = KnowledgeBase::new(Ontology::new());
        let result = kb.add_axiom(Axiom::DataPropertyAssertion(
            PropertyExpression::data(format!("{}p", EX)),
            ind("a"),
            Literal::new("x", "http://example.org/myType"),
        ));
        assert!(matches!(
            result,
            Err(ReasonerError::Datatype(DatatypeError::UnknownDatatype(_)))
        ));
    }

    #[test]
    fn test_unknown_individual() {
        let mut kb = KnowledgeBase::new(Ontology::new());
        assert!(matches!(
            kb.is_type(&ind("nobody"), &class("C")),
            Err(ReasonerError::UnknownIndividual(_))
        ));
    }

    #[test]
    fn test_obvious_types() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(Axiom::SubClassOf(class("Cat"), class("Animal")));
        ontology.add_axiom(Axiom::ClassAssertion(class("Cat"), ind("tom")));
        let mut kb = KnowledgeBase::new(ontology);
        assert!(kb.is_consistent().unwrap());

        let types = kb.get_obvious_types(&ind("tom"));
        assert!(types.contains(&OwlIri::new(format!("{}Animal", EX))));
        assert_eq!(kb.is_known_type(&ind("tom"), &class("Animal")), Known::True);
        assert_eq!(kb.is_known_type(&ind("tom"), &class("Dog")), Known::False);
    }

    #[test]
    fn test_schema_change_invalidates_cache() {
        let mut kb = KnowledgeBase::new(Ontology::new());
        assert!(kb.is_satisfiable(&class("A")).unwrap());
        assert_eq!(kb.is_known_satisfiable(&class("A")), Known::True);

        kb.add_axiom(Axiom::SubClassOf(class("A"), ClassExpression::Nothing))
            .unwrap();
        assert_eq!(kb.is_known_satisfiable(&class("A")), Known::Unknown);
        assert!(kb.is_consistent().unwrap());
        assert_eq!(kb.is_known_satisfiable(&class("A")), Known::Unknown);
        assert!(!kb.is_satisfiable(&class("A")).unwrap());
    }

    #[test]
    fn test_known_answers_wait_for_abox_check() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(Axiom::SubClassOf(class("Cat"), class("Animal")));
        let mut kb = KnowledgeBase::new(ontology);
        assert!(kb.is_sub_class_of(&class("Cat"), &class("Animal")).unwrap());
        assert_eq!(kb.is_known_satisfiable(&class("Cat")), Known::True);

        kb.add_axiom(Axiom::ClassAssertion(class("Cat"), ind("tom")))
            .unwrap();
        assert_eq!(kb.is_known_satisfiable(&class("Cat")), Known::Unknown);
        assert_eq!(kb.is_known_sub_class_of(&class("Cat"), &class("Animal")), Known::Unknown);

        assert!(kb.is_consistent().unwrap());
        assert_eq!(kb.is_known_satisfiable(&class("Cat")), Known::True);
        assert_eq!(kb.is_known_sub_class_of(&class("Cat"), &class("Animal")), Known::True);
    }
}
