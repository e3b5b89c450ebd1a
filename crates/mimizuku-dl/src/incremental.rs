//! ABox 変更の追跡と差分適用

use crate::dependency::DependencySet;
use crate::graph::{CompletionGraph, LiteralState, NodeId};
use mimizuku_core::{Axiom, Concept, DatatypeReasoner};
use std::sync::Arc;
use tracing::trace;

/// ABox axioms added or removed since the last completed check
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    added: Vec<Arc<Axiom>>,
    deleted: Vec<Arc<Axiom>>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_addition(&mut self, axiom: Arc<Axiom>) {
        if let Some(pos) = self.deleted.iter().position(|a| *a == axiom) {
            self.deleted.remove(pos);
        } else {
            self.added.push(axiom);
        }
    }

    pub fn record_deletion(&mut self, axiom: Arc<Axiom>) {
        if let Some(pos) = self.added.iter().position(|a| *a == axiom) {
            self.added.remove(pos);
        } else {
            self.deleted.push(axiom);
        }
    }

    pub fn added(&self) -> &[Arc<Axiom>] {
        &self.added
    }

    pub fn deleted(&self) -> &[Arc<Axiom>] {
        &self.deleted
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }

    pub fn clear(&mut self) {
        self.added.clear();
        self.deleted.clear();
    }
}

/// Assert an ABox axiom on the graph at the current branch.
/// Axioms of the other kinds are ignored.
pub fn assert_axiom(
    graph: &mut CompletionGraph,
    axiom: &Arc<Axiom>,
    datatypes: &dyn DatatypeReasoner,
) {
    let ds = DependencySet::independent()
        .union_explanation(std::iter::once(axiom), graph.track_explanations());
    trace!(axiom = %axiom, "assert");

    match axiom.as_ref() {
        Axiom::ClassAssertion(class, individual) => {
            let node = graph.add_individual(individual);
            graph.add_type(node, class.to_concept(), ds);
        }
        Axiom::ObjectPropertyAssertion(property, subject, object) => {
            let s = graph.add_individual(subject);
            let o = graph.add_individual(object);
            graph.add_edge(s, &property.to_role(), o, ds);
        }
        Axiom::NegativeObjectPropertyAssertion(property, subject, object) => {
            let s = graph.add_individual(subject);
            graph.add_individual(object);
            let concept = Concept::forall(property.to_role(), Concept::NotNominal(object.clone()));
            graph.add_type(s, concept, ds);
        }
        Axiom::DataPropertyAssertion(property, subject, literal) => {
            let s = graph.add_individual(subject);
            let state = match datatypes.canonical(literal) {
                Ok(value) => LiteralState::Value(value),
                Err(_) => LiteralState::Invalid(literal.clone()),
            };
            let o = graph.add_literal(state);
            graph.add_edge(s, &property.to_role(), o, ds);
        }
        Axiom::SameIndividual(individuals) => {
            let nodes: Vec<NodeId> = individuals.iter().map(|i| graph.add_individual(i)).collect();
            for pair in nodes.windows(2) {
                graph.merge(pair[1], pair[0], ds.clone());
            }
        }
        Axiom::DifferentIndividuals(individuals) => {
            let nodes: Vec<NodeId> = individuals.iter().map(|i| graph.add_individual(i)).collect();
            for (i, a) in nodes.iter().enumerate() {
                for b in &nodes[i + 1..] {
                    graph.set_different(*a, *b, ds.clone());
                }
            }
        }
        _ => {}
    }
}
