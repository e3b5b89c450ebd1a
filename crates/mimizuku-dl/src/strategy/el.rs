//! EL 戦略
//!
//! Deterministic completion for inputs without disjunction, universal
//! restrictions, cardinalities, nominals or inverses. Every `∃R.C` with the
//! same filler label shares one successor, so the graph stays finite
//! without blocking.

use super::rules::{self, NodeRule};
use super::{CompletionSession, CompletionStrategy, Expansion};
use crate::graph::NodeId;
use crate::ReasonerError;
use mimizuku_core::{Axiom, Concept, Role};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

const DETERMINISTIC: &[NodeRule] = &[
    rules::unfold,
    rules::conjunction,
    rules::domain_range,
];

/// Filler label plus the axioms it was derived from
type FillerKey = (Concept, BTreeSet<Arc<Axiom>>);

#[derive(Debug, Clone, Default)]
pub struct ElStrategy {
    fillers: HashMap<FillerKey, NodeId>,
}

impl ElStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filler label of `∃role.filler`: the filler and the ranges of every super role
    fn filler_label(session: &CompletionSession<'_>, role: &Role, filler: &Concept) -> Concept {
        let mut operands = vec![filler.clone()];
        for sup in session.rbox.super_roles(role) {
            operands.extend(session.rbox.ranges(&sup).iter().map(|d| d.concept.clone()));
        }
        Concept::and(operands)
    }

    fn generate(&mut self, session: &mut CompletionSession<'_>) -> bool {
        let revision = session.graph.revision();
        for node in session.graph.node_ids() {
            if session.graph.node(node).is_merged() || session.graph.node(node).is_literal() {
                continue;
            }
            for (concept, ds) in rules::label(session, node) {
                let Concept::Exists(role, filler) = concept else {
                    continue;
                };
                let satisfied = session
                    .graph
                    .neighbours(node, &role, session.rbox)
                    .iter()
                    .any(|(n, _)| *filler == Concept::Top || session.graph.node(*n).has_type(&filler));
                if satisfied {
                    continue;
                }

                let label = Self::filler_label(session, &role, &filler);
                let key = (label.clone(), ds.explain().clone());
                let successor = match self.fillers.get(&key) {
                    Some(existing) => session.graph.find(*existing),
                    None => {
                        let created = session.graph.add_anonymous(node);
                        session.stats.generated_nodes += 1;
                        self.fillers.insert(key, created);
                        created
                    }
                };
                session.graph.add_edge(node, &role, successor, ds.clone());
                session.graph.add_type(successor, *filler, ds);
            }
        }
        session.graph.revision() != revision
    }
}

impl CompletionStrategy for ElStrategy {
    fn name(&self) -> &'static str {
        "el"
    }

    fn expand(&mut self, session: &mut CompletionSession<'_>) -> Result<Expansion, ReasonerError> {
        session.graph.initialize();
        loop {
            session.timer.check()?;
            rules::saturate(session, DETERMINISTIC)?;
            if let Some(clash) = session.graph.clash() {
                debug!(clash = %clash, "no model");
                return Ok(Expansion::Clash);
            }
            if !self.generate(session) {
                debug!(fillers = self.fillers.len(), "saturated");
                return Ok(Expansion::Saturated);
            }
        }
    }
}
