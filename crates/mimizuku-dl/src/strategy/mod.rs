//! 展開戦略 (completion strategies)
//!
//! A strategy drives the completion graph to a fixed point. The strategy is
//! picked once per check from the expressivity of the input: the EL
//! strategy is deterministic and shares successors, the tableau strategy
//! handles the full language with branching and blocking.

mod el;
mod rules;
mod tableau;

pub use el::ElStrategy;
pub use tableau::TableauStrategy;

use crate::graph::CompletionGraph;
use crate::timer::Timer;
use crate::ReasonerError;
use mimizuku_core::{DatatypeReasoner, Expressivity, RBox, TBox};
use serde::Serialize;

/// Outcome of a completion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// No rule applies and the graph has no clash
    Saturated,
    /// Every alternative ended in a clash
    Clash,
}

/// Rule counters of one completion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExpansionStats {
    pub iterations: usize,
    pub generated_nodes: usize,
    pub merges: usize,
}

/// Everything a rule application needs, threaded through the rules as one value
pub struct CompletionSession<'a> {
    pub graph: CompletionGraph,
    pub tbox: &'a dyn TBox,
    pub rbox: &'a dyn RBox,
    pub datatypes: &'a dyn DatatypeReasoner,
    pub timer: &'a Timer,
    pub stats: ExpansionStats,
}

impl<'a> CompletionSession<'a> {
    pub fn new(
        graph: CompletionGraph,
        tbox: &'a dyn TBox,
        rbox: &'a dyn RBox,
        datatypes: &'a dyn DatatypeReasoner,
        timer: &'a Timer,
    ) -> Self {
        Self {
            graph,
            tbox,
            rbox,
            datatypes,
            timer,
            stats: ExpansionStats::default(),
        }
    }
}

pub trait CompletionStrategy {
    fn name(&self) -> &'static str;

    /// Apply rules until the graph is saturated or has no model
    fn expand(&mut self, session: &mut CompletionSession<'_>) -> Result<Expansion, ReasonerError>;
}

/// The strategies shipped with the engine
#[derive(Debug, Clone)]
pub enum Strategy {
    El(ElStrategy),
    Tableau(TableauStrategy),
}

impl Strategy {
    pub fn select(expressivity: &Expressivity) -> Self {
        if expressivity.is_el() {
            Strategy::El(ElStrategy::new())
        } else {
            Strategy::Tableau(TableauStrategy::new())
        }
    }
}

impl CompletionStrategy for Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::El(strategy) => strategy.name(),
            Strategy::Tableau(strategy) => strategy.name(),
        }
    }

    fn expand(&mut self, session: &mut CompletionSession<'_>) -> Result<Expansion, ReasonerError> {
        match self {
            Strategy::El(strategy) => strategy.expand(session),
            Strategy::Tableau(strategy) => strategy.expand(session),
        }
    }
}
