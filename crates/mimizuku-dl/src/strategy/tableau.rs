//! テーブロー戦略
//!
//! Rule priority: deterministic rules to a fixed point, then the `≤` rule,
//! then `⊔`, then the generating rules `∃` and `≥`. Any clash is resolved by
//! backjumping before the next rule fires.

use super::rules::{self, NodeRule};
use super::{CompletionSession, CompletionStrategy, Expansion};
use crate::branch::BranchKind;
use crate::clash::{Clash, ClashType};
use crate::dependency::DependencySet;
use crate::graph::{CompletionGraph, LiteralState, NodeId};
use crate::ReasonerError;
use mimizuku_core::{Concept, Role};
use tracing::{debug, trace};

const DETERMINISTIC: &[NodeRule] = &[
    rules::unfold,
    rules::internalize,
    rules::conjunction,
    rules::nominal,
    rules::domain_range,
    rules::universal,
    rules::min_max,
    rules::disjoint_properties,
    rules::literal,
];

#[derive(Debug, Clone, Default)]
pub struct TableauStrategy;

impl TableauStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl CompletionStrategy for TableauStrategy {
    fn name(&self) -> &'static str {
        "tableau"
    }

    fn expand(&mut self, session: &mut CompletionSession<'_>) -> Result<Expansion, ReasonerError> {
        session.graph.initialize();
        loop {
            session.timer.check()?;
            if session.graph.clash().is_some() {
                if !session.graph.backjump() {
                    debug!(clash = ?session.graph.clash().map(|c| c.to_string()), "no model");
                    return Ok(Expansion::Clash);
                }
                continue;
            }

            rules::saturate(session, DETERMINISTIC)?;
            if session.graph.clash().is_some() {
                continue;
            }
            if apply_max(session) || apply_disjunction(session) || apply_generating(session) {
                continue;
            }
            return Ok(Expansion::Saturated);
        }
    }
}

/// Whether `node` or one of its ancestors is blocked by pairwise blocking
pub(crate) fn is_blocked(graph: &CompletionGraph, node: NodeId) -> bool {
    let mut current = graph.find(node);
    for _ in 0..graph.node_count() {
        if !graph.node(current).is_blockable() {
            return false;
        }
        if is_directly_blocked(graph, current) {
            return true;
        }
        match graph.node(current).parent() {
            Some(parent) => current = graph.find(parent),
            None => return false,
        }
    }
    false
}

fn same_label(graph: &CompletionGraph, a: NodeId, b: NodeId) -> bool {
    graph.node(a).types().keys().eq(graph.node(b).types().keys())
}

/// `x` is blocked by an ancestor `y` when both and their parents carry the
/// same labels and the parent edges have the same roles
fn is_directly_blocked(graph: &CompletionGraph, x: NodeId) -> bool {
    let Some(x_parent) = graph.node(x).parent().map(|p| graph.find(p)) else {
        return false;
    };
    let x_roles = graph.edges_between(x_parent, x);

    let mut candidate = x_parent;
    for _ in 0..graph.node_count() {
        let Some(y_parent) = graph.node(candidate).parent().map(|p| graph.find(p)) else {
            return false;
        };
        if graph.node(candidate).is_blockable()
            && same_label(graph, x, candidate)
            && same_label(graph, x_parent, y_parent)
            && graph.edges_between(y_parent, candidate) == x_roles
        {
            trace!(node = %x, blocker = %candidate, "blocked");
            return true;
        }
        candidate = y_parent;
    }
    false
}

/// Representative nodes in arena order
fn live_nodes(graph: &CompletionGraph) -> Vec<NodeId> {
    graph
        .node_ids()
        .into_iter()
        .filter(|id| !graph.node(*id).is_merged())
        .collect()
}

/// Neighbours of `node` over `role` that carry `filler`, with the dependencies of both
fn qualified_neighbours(
    session: &CompletionSession<'_>,
    node: NodeId,
    role: &Role,
    filler: &Concept,
) -> Vec<(NodeId, DependencySet)> {
    let expl = session.graph.track_explanations();
    session
        .graph
        .neighbours(node, role, session.rbox)
        .into_iter()
        .filter_map(|(neighbour, ds)| {
            if *filler == Concept::Top {
                return Some((neighbour, ds));
            }
            session
                .graph
                .node(neighbour)
                .type_depends(filler)
                .map(|filler_ds| (neighbour, ds.union(filler_ds, expl)))
        })
        .collect()
}

/// `≤n R.C` restrictions on a node, functional roles included as `≤1 R.⊤`
fn max_restrictions(
    session: &CompletionSession<'_>,
    node: NodeId,
) -> Vec<(u32, Role, Concept, DependencySet, bool)> {
    let mut restrictions: Vec<(u32, Role, Concept, DependencySet, bool)> = session
        .graph
        .node(node)
        .types()
        .iter()
        .filter_map(|(concept, ds)| match concept {
            Concept::AtMost(n, role, filler) if *n > 0 => {
                Some((*n, role.clone(), (**filler).clone(), ds.clone(), false))
            }
            _ => None,
        })
        .collect();

    if !session.graph.node(node).is_literal() {
        for (role, axiom) in session.rbox.functional_roles() {
            let ds = rules::because(session, &DependencySet::independent(), axiom);
            restrictions.push((1, role.clone(), Concept::Top, ds, true));
        }
    }
    restrictions
}

/// The `≤` rule: choose `C`/`¬C` for unqualified neighbours, then merge
/// surplus neighbours. Applies at most once per call.
fn apply_max(session: &mut CompletionSession<'_>) -> bool {
    let expl = session.graph.track_explanations();
    for node in live_nodes(&session.graph) {
        for (n, role, filler, ds, functional) in max_restrictions(session, node) {
            let neighbours = session.graph.neighbours(node, &role, session.rbox);
            if neighbours.len() <= n as usize {
                continue;
            }

            if filler != Concept::Top {
                let complement = filler.negate();
                let undecided = neighbours.iter().find(|(neighbour, _)| {
                    let label = session.graph.node(*neighbour);
                    !label.has_type(&filler) && !label.has_type(&complement)
                });
                if let Some((neighbour, edge_ds)) = undecided {
                    trace!(node = %node, neighbour = %neighbour, "choose rule");
                    let disjuncts = vec![filler.clone(), complement];
                    let kind = BranchKind::Disjunction {
                        node: *neighbour,
                        disjunction: Concept::or(disjuncts.clone()),
                        disjuncts,
                    };
                    session.graph.add_branch(kind, ds.union(edge_ds, expl));
                    return true;
                }
            }

            let qualified = qualified_neighbours(session, node, &role, &filler);
            if qualified.len() <= n as usize {
                continue;
            }

            let mut depends = qualified
                .iter()
                .fold(ds.clone(), |acc, (_, q_ds)| acc.union(q_ds, expl));
            let mut pairs = Vec::new();
            for (i, (a, _)) in qualified.iter().enumerate() {
                for (b, _) in &qualified[i + 1..] {
                    match session.graph.is_different(*a, *b) {
                        Some(diff_ds) => depends = depends.union(&diff_ds, expl),
                        None => pairs.push(merge_pair(&session.graph, *a, *b)),
                    }
                }
            }

            match pairs.len() {
                0 => {
                    let graph = &session.graph;
                    let (kind, args) = if functional {
                        (
                            ClashType::FunctionalCardinality,
                            vec![graph.node(node).name.to_string(), role.to_string()],
                        )
                    } else {
                        (
                            ClashType::MaxCardinality,
                            vec![graph.node(node).name.to_string(), n.to_string(), role.to_string()],
                        )
                    };
                    session.graph.set_clash(Clash::new(node, kind, depends, args));
                }
                1 => {
                    let (y, x) = pairs[0];
                    session.stats.merges += 1;
                    session.graph.merge(y, x, depends);
                }
                _ => {
                    session.stats.merges += 1;
                    let kind = BranchKind::Merge { node, role, pairs };
                    session.graph.add_branch(kind, depends);
                }
            }
            return true;
        }
    }
    false
}

/// `(from, into)`: named nodes and older nodes survive a merge
fn merge_pair(graph: &CompletionGraph, a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    let (a_named, b_named) = (graph.node(a).is_named(), graph.node(b).is_named());
    if a_named && !b_named {
        (b, a)
    } else if b_named && !a_named {
        (a, b)
    } else if a < b {
        (b, a)
    } else {
        (a, b)
    }
}

/// The `⊔` rule on the first unsatisfied disjunction
fn apply_disjunction(session: &mut CompletionSession<'_>) -> bool {
    for node in live_nodes(&session.graph) {
        if is_blocked(&session.graph, node) {
            continue;
        }
        let open = session
            .graph
            .node(node)
            .types()
            .iter()
            .find_map(|(concept, ds)| match concept {
                Concept::Or(disjuncts)
                    if !disjuncts.iter().any(|d| session.graph.node(node).has_type(d)) =>
                {
                    Some((concept.clone(), disjuncts.clone(), ds.clone()))
                }
                _ => None,
            });

        if let Some((disjunction, disjuncts, ds)) = open {
            let kind = BranchKind::Disjunction {
                node,
                disjunction,
                disjuncts,
            };
            session.graph.add_branch(kind, ds);
            return true;
        }
    }
    false
}

/// The `∃` and `≥` rules on every unblocked node
fn apply_generating(session: &mut CompletionSession<'_>) -> bool {
    let revision = session.graph.revision();
    for node in live_nodes(&session.graph) {
        if session.graph.node(node).is_literal() || is_blocked(&session.graph, node) {
            continue;
        }
        for (concept, ds) in rules::label(session, node) {
            if session.graph.clash().is_some() {
                return true;
            }
            match concept {
                Concept::Exists(role, filler) => generate(session, node, &role, &filler, 1, ds),
                Concept::AtLeast(n, role, filler) => generate(session, node, &role, &filler, n, ds),
                _ => {}
            }
        }
    }
    session.graph.revision() != revision
}

fn generate(
    session: &mut CompletionSession<'_>,
    node: NodeId,
    role: &Role,
    filler: &Concept,
    n: u32,
    ds: DependencySet,
) {
    let qualified = qualified_neighbours(session, node, role, filler);

    if n == 1 {
        if !qualified.is_empty() {
            return;
        }
        if let Concept::Nominal(individual) = filler {
            let target = session.graph.add_individual(individual);
            session.graph.add_edge(node, role, target, ds);
            return;
        }
    } else {
        // Greedy count of pairwise different qualified neighbours, newest first
        let mut distinct: Vec<NodeId> = Vec::new();
        for (neighbour, _) in qualified.iter().rev() {
            if distinct
                .iter()
                .all(|other| session.graph.is_different(*neighbour, *other).is_some())
            {
                distinct.push(*neighbour);
            }
        }
        if distinct.len() >= n as usize {
            return;
        }
    }

    let data = !role.inverse && session.rbox.is_data_property(&role.iri);
    let mut created = Vec::with_capacity(n as usize);
    for _ in 0..n {
        let successor = if data {
            session.graph.add_literal(LiteralState::Anonymous)
        } else {
            session.graph.add_anonymous(node)
        };
        session.stats.generated_nodes += 1;
        session.graph.add_edge(node, role, successor, ds.clone());
        if *filler != Concept::Top {
            session.graph.add_type(successor, filler.clone(), ds.clone());
        }
        for other in &created {
            session.graph.set_different(successor, *other, ds.clone());
        }
        created.push(successor);
    }
    trace!(node = %node, role = %role, count = n, "generated successors");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Timer;
    use mimizuku_core::{Individual, Ontology, XsdDatatypes};

    fn atom(name: &str) -> Concept {
        Concept::atom(format!("http://example.org/{}", name))
    }

    fn expand(ontology: &Ontology, graph: CompletionGraph) -> (Expansion, CompletionGraph) {
        let datatypes = XsdDatatypes::new();
        let timer = Timer::unlimited();
        let mut session = CompletionSession::new(graph, ontology, ontology, &datatypes, &timer);
        let result = TableauStrategy::new().expand(&mut session).unwrap();
        (result, session.graph)
    }

    fn rooted(concept: Concept) -> CompletionGraph {
        let mut graph = CompletionGraph::new(false);
        let root = graph.add_root();
        graph.add_type(root, concept, DependencySet::independent());
        graph
    }

    #[test]
    fn test_disjunction_backtracks_to_second_alternative() {
        let ontology = Ontology::new();
        let concept = Concept::and(vec![
            Concept::or(vec![atom("A"), atom("B")]),
            atom("A").negate(),
        ]);
        let (result, graph) = expand(&ontology, rooted(concept));
        assert_eq!(result, Expansion::Saturated);
        assert!(graph.node(NodeId(0)).has_type(&atom("B")));
    }

    #[test]
    fn test_unsatisfiable_disjunction() {
        let ontology = Ontology::new();
        let concept = Concept::and(vec![
            Concept::or(vec![atom("A"), atom("B")]),
            atom("A").negate(),
            atom("B").negate(),
        ]);
        let (result, _) = expand(&ontology, rooted(concept));
        assert_eq!(result, Expansion::Clash);
    }

    #[test]
    fn test_exists_forall_clash() {
        let ontology = Ontology::new();
        let r = Role::new("http://example.org/r");
        let concept = Concept::and(vec![
            Concept::exists(r.clone(), atom("C")),
            Concept::forall(r, atom("C").negate()),
        ]);
        let (result, _) = expand(&ontology, rooted(concept));
        assert_eq!(result, Expansion::Clash);
    }

    #[test]
    fn test_cyclic_definition_is_blocked() {
        let mut ontology = Ontology::new();
        let r = mimizuku_core::PropertyExpression::object("http://example.org/r");
        ontology.add_axiom(mimizuku_core::Axiom::SubClassOf(
            mimizuku_core::ClassExpression::named("http://example.org/A"),
            mimizuku_core::ClassExpression::some(
                r.clone(),
                mimizuku_core::ClassExpression::named("http://example.org/A"),
            ),
        ));
        let query = Concept::and(vec![
            atom("A"),
            Concept::forall(r.to_role(), Concept::or(vec![atom("B"), atom("D")])),
        ]);
        let (result, graph) = expand(&ontology, rooted(query));
        assert_eq!(result, Expansion::Saturated);
        assert!(graph.node_count() < 10);
    }

    #[test]
    fn test_at_least_creates_distinct_successors() {
        let ontology = Ontology::new();
        let r = Role::new("http://example.org/r");
        let (result, graph) = expand(&ontology, rooted(Concept::at_least(3, r.clone(), atom("C"))));
        assert_eq!(result, Expansion::Saturated);
        let successors = graph.neighbours(NodeId(0), &r, &ontology);
        assert_eq!(successors.len(), 3);
        assert!(graph.is_different(successors[0].0, successors[2].0).is_some());
    }

    #[test]
    fn test_at_most_merges_named_successors() {
        let ontology = Ontology::new();
        let r = Role::new("http://example.org/r");
        let mut graph = CompletionGraph::new(false);
        let a = graph.add_individual(&Individual::new("http://example.org/a"));
        let b = graph.add_individual(&Individual::new("http://example.org/b"));
        let c = graph.add_individual(&Individual::new("http://example.org/c"));
        graph.add_edge(a, &r, b, DependencySet::independent());
        graph.add_edge(a, &r, c, DependencySet::independent());
        graph.add_type(a, Concept::at_most(1, r, Concept::Top), DependencySet::independent());

        let (result, graph) = expand(&ontology, graph);
        assert_eq!(result, Expansion::Saturated);
        assert!(graph.is_same(b, c));
    }

    #[test]
    fn test_at_most_with_distinct_successors_clashes() {
        let ontology = Ontology::new();
        let r = Role::new("http://example.org/r");
        let concept = Concept::and(vec![
            Concept::at_least(2, r.clone(), Concept::Top),
            Concept::at_most(1, r, atom("C")),
            Concept::forall(Role::new("http://example.org/r"), atom("C")),
        ]);
        let (result, _) = expand(&ontology, rooted(concept));
        assert_eq!(result, Expansion::Clash);
    }
}
