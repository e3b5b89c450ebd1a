//! 決定的な展開規則
//!
//! Each rule looks at one node and adds whatever its label forces. None of
//! them opens a choice point; the nondeterministic and generating rules live
//! with the tableau strategy.

use super::CompletionSession;
use crate::clash::{Clash, ClashType};
use crate::dependency::DependencySet;
use crate::graph::{LiteralState, NodeId};
use crate::ReasonerError;
use mimizuku_core::{Axiom, Concept, OwlIri, Role};
use std::sync::Arc;

pub(crate) type NodeRule = fn(&mut CompletionSession<'_>, NodeId);

/// `ds` extended with the axiom a told consequence came from
pub(crate) fn because(session: &CompletionSession<'_>, ds: &DependencySet, axiom: &Arc<Axiom>) -> DependencySet {
    ds.union_explanation(std::iter::once(axiom), session.graph.track_explanations())
}

/// Snapshot of a node label, so rules can add types while walking it
pub(crate) fn label(session: &CompletionSession<'_>, node: NodeId) -> Vec<(Concept, DependencySet)> {
    session
        .graph
        .node(node)
        .types()
        .iter()
        .map(|(c, ds)| (c.clone(), ds.clone()))
        .collect()
}

/// Apply `rules` to every representative node until nothing changes or a clash appears
pub(crate) fn saturate(
    session: &mut CompletionSession<'_>,
    rules: &[NodeRule],
) -> Result<(), ReasonerError> {
    loop {
        session.timer.check()?;
        session.stats.iterations += 1;
        let revision = session.graph.revision();

        for node in session.graph.node_ids() {
            for rule in rules {
                if session.graph.clash().is_some() {
                    return Ok(());
                }
                if session.graph.node(node).is_merged() {
                    break;
                }
                rule(session, node);
            }
        }

        if session.graph.clash().is_some() || session.graph.revision() == revision {
            return Ok(());
        }
    }
}

/// Lazy unfolding of named concepts
pub(crate) fn unfold(session: &mut CompletionSession<'_>, node: NodeId) {
    for (concept, ds) in label(session, node) {
        if !matches!(concept, Concept::Atom(_)) {
            continue;
        }
        for definition in session.tbox.unfold(&concept) {
            let ds = because(session, &ds, &definition.axiom);
            session.graph.add_type(node, definition.concept.clone(), ds);
        }
    }
}

/// General concept inclusions hold on every individual
pub(crate) fn internalize(session: &mut CompletionSession<'_>, node: NodeId) {
    if session.graph.node(node).is_literal() {
        return;
    }
    for definition in session.tbox.internalized() {
        let ds = because(session, &DependencySet::independent(), &definition.axiom);
        session.graph.add_type(node, definition.concept.clone(), ds);
    }
}

pub(crate) fn conjunction(session: &mut CompletionSession<'_>, node: NodeId) {
    for (concept, ds) in label(session, node) {
        if let Concept::And(operands) = concept {
            for operand in operands {
                session.graph.add_type(node, operand, ds.clone());
            }
        }
    }
}

/// A node labelled `{o}` is the individual `o`
pub(crate) fn nominal(session: &mut CompletionSession<'_>, node: NodeId) {
    for (concept, ds) in label(session, node) {
        if let Concept::Nominal(individual) = concept {
            let target = session.graph.add_individual(&individual);
            if !session.graph.is_same(node, target) {
                session.stats.merges += 1;
                session.graph.merge(node, target, ds);
            }
        }
    }
}

/// Domains and ranges of the roles on the node's outgoing edges
pub(crate) fn domain_range(session: &mut CompletionSession<'_>, node: NodeId) {
    let edges: Vec<(Role, NodeId, DependencySet)> = match session.graph.node(node).out_edges() {
        Some(out) => out
            .iter()
            .map(|e| (e.role.clone(), e.to, e.depends.clone()))
            .collect(),
        None => return,
    };

    for (role, to, ds) in edges {
        for sup in session.rbox.super_roles(&role) {
            for definition in session.rbox.domains(&sup) {
                let ds = because(session, &ds, &definition.axiom);
                session.graph.add_type(node, definition.concept.clone(), ds);
            }
            for definition in session.rbox.ranges(&sup) {
                let ds = because(session, &ds, &definition.axiom);
                session.graph.add_type(to, definition.concept.clone(), ds);
            }
        }
    }
}

/// `∀R.C` and `≤0 R.C`, including propagation along transitive sub-roles
pub(crate) fn universal(session: &mut CompletionSession<'_>, node: NodeId) {
    let expl = session.graph.track_explanations();
    for (concept, ds) in label(session, node) {
        match concept {
            Concept::Forall(role, filler) => {
                for (neighbour, edge_ds) in session.graph.neighbours(node, &role, session.rbox) {
                    session.graph.add_type(neighbour, (*filler).clone(), ds.union(&edge_ds, expl));
                }
                for transitive in session.rbox.transitive_sub_roles(&role) {
                    let propagated = Concept::forall(transitive.clone(), (*filler).clone());
                    for (neighbour, edge_ds) in session.graph.neighbours(node, &transitive, session.rbox) {
                        session.graph.add_type(neighbour, propagated.clone(), ds.union(&edge_ds, expl));
                    }
                }
            }
            Concept::AtMost(0, role, filler) => {
                let neighbours = session.graph.neighbours(node, &role, session.rbox);
                if *filler == Concept::Top {
                    if let Some((neighbour, edge_ds)) = neighbours.into_iter().next() {
                        let args = vec![
                            session.graph.node(node).name.to_string(),
                            role.to_string(),
                            session.graph.node(neighbour).name.to_string(),
                        ];
                        let depends = ds.union(&edge_ds, expl);
                        session.graph.set_clash(Clash::new(node, ClashType::MaxZero, depends, args));
                    }
                } else {
                    for (neighbour, edge_ds) in neighbours {
                        session.graph.add_type(neighbour, filler.negate(), ds.union(&edge_ds, expl));
                    }
                }
            }
            _ => {}
        }
    }
}

/// `≥n R.C` and `≤m R.C` with `m < n` on the same node
pub(crate) fn min_max(session: &mut CompletionSession<'_>, node: NodeId) {
    let label = label(session, node);
    for (concept, ds) in &label {
        let Concept::AtLeast(min, role, filler) = concept else {
            continue;
        };
        for (other, other_ds) in &label {
            let Concept::AtMost(max, other_role, other_filler) = other else {
                continue;
            };
            if max < min && other_role == role && other_filler == filler {
                let args = vec![
                    session.graph.node(node).name.to_string(),
                    min.to_string(),
                    max.to_string(),
                    role.to_string(),
                ];
                let depends = ds.union(other_ds, session.graph.track_explanations());
                session.graph.set_clash(Clash::new(node, ClashType::MinMax, depends, args));
                return;
            }
        }
    }
}

/// Two nodes connected by disjoint roles
pub(crate) fn disjoint_properties(session: &mut CompletionSession<'_>, node: NodeId) {
    let graph = &session.graph;
    let mut edges: Vec<(Role, NodeId, DependencySet)> = Vec::new();
    if let Some(out) = graph.node(node).out_edges() {
        edges.extend(out.iter().map(|e| (e.role.clone(), e.to, e.depends.clone())));
    }
    edges.extend(
        graph
            .node(node)
            .in_edges()
            .iter()
            .map(|e| (e.role.inverse(), e.from, e.depends.clone())),
    );
    let edges: Vec<(Role, NodeId, DependencySet)> = edges
        .into_iter()
        .filter(|(_, other, _)| !graph.node(*other).is_merged())
        .collect();

    for (role, other, ds) in &edges {
        for sup in session.rbox.super_roles(role) {
            for (disjoint, axiom) in session.rbox.disjoint_roles(&sup) {
                let conflicting = edges.iter().find(|(r, o, _)| {
                    o == other && session.rbox.is_sub_role(r, disjoint)
                });
                if let Some((conflict_role, _, conflict_ds)) = conflicting {
                    let args = vec![
                        session.graph.node(node).name.to_string(),
                        session.graph.node(*other).name.to_string(),
                        role.to_string(),
                        conflict_role.to_string(),
                    ];
                    let depends = ds.union(conflict_ds, session.graph.track_explanations());
                    let depends = because(session, &depends, axiom);
                    session
                        .graph
                        .set_clash(Clash::new(node, ClashType::DisjointProperties, depends, args));
                    return;
                }
            }
        }
    }
}

/// Literal validity and data range membership
pub(crate) fn literal(session: &mut CompletionSession<'_>, node: NodeId) {
    let expl = session.graph.track_explanations();
    let state = match session.graph.node(node).literal_state() {
        Some(state) => state.clone(),
        None => return,
    };
    let name = session.graph.node(node).name.to_string();
    let incoming = session
        .graph
        .node(node)
        .in_edges()
        .iter()
        .fold(DependencySet::independent(), |acc, e| acc.union(&e.depends, expl));

    let mut positive: Vec<(OwlIri, DependencySet)> = Vec::new();
    let mut negative: Vec<(OwlIri, DependencySet)> = Vec::new();
    for (concept, ds) in label(session, node) {
        match concept {
            Concept::Datatype(iri) => positive.push((iri, ds)),
            Concept::NotDatatype(iri) => negative.push((iri, ds)),
            _ => {}
        }
    }

    match state {
        LiteralState::Invalid(literal) => {
            let clash = Clash::new(node, ClashType::InvalidLiteral, incoming, vec![literal.to_string()]);
            session.graph.set_clash(clash);
        }
        LiteralState::Value(value) => {
            let violated = positive
                .iter()
                .find(|(dt, _)| !session.datatypes.is_member(&value, dt))
                .or_else(|| {
                    negative
                        .iter()
                        .find(|(dt, _)| session.datatypes.is_member(&value, dt))
                });
            if let Some((datatype, ds)) = violated {
                let args = vec![value.to_literal().to_string(), datatype.to_string()];
                let depends = ds.union(&incoming, expl);
                session
                    .graph
                    .set_clash(Clash::new(node, ClashType::ValueDatatype, depends, args));
            }
        }
        LiteralState::Anonymous => {
            let pos: Vec<OwlIri> = positive.iter().map(|(dt, _)| dt.clone()).collect();
            let neg: Vec<OwlIri> = negative.iter().map(|(dt, _)| dt.clone()).collect();
            if !session.datatypes.is_satisfiable(&pos, &neg) {
                let depends = positive
                    .iter()
                    .chain(negative.iter())
                    .fold(incoming, |acc, (_, ds)| acc.union(ds, expl));
                let ranges: Vec<String> = pos
                    .iter()
                    .map(|d| d.to_string())
                    .chain(neg.iter().map(|d| format!("¬{}", d)))
                    .collect();
                let args = vec![name, ranges.join(", ")];
                session
                    .graph
                    .set_clash(Clash::new(node, ClashType::EmptyDatatype, depends, args));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CompletionGraph;
    use crate::timer::Timer;
    use mimizuku_core::{
        ClassExpression, Individual, Literal, LiteralValue, Ontology, PropertyExpression,
        XsdDatatypes,
    };

    const EX: &str = "http://example.org/";

    fn ind(name: &str) -> Individual {
        Individual::new(format!("{}{}", EX, name))
    }

    fn class(name: &str) -> ClassExpression {
        ClassExpression::named(format!("{}{}", EX, name))
    }

    fn atom(name: &str) -> Concept {
        Concept::atom(format!("{}{}", EX, name))
    }

    fn run(ontology: &Ontology, graph: CompletionGraph, rules: &[NodeRule]) -> CompletionGraph {
        let datatypes = XsdDatatypes::new();
        let timer = Timer::unlimited();
        let mut session = CompletionSession::new(graph, ontology, ontology, &datatypes, &timer);
        saturate(&mut session, rules).unwrap();
        session.graph
    }

    #[test]
    fn test_unfolding_reaches_fixed_point() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(Axiom::SubClassOf(class("A"), class("B")));
        ontology.add_axiom(Axiom::SubClassOf(
            class("B"),
            ClassExpression::and(vec![class("C"), class("D")]),
        ));

        let mut graph = CompletionGraph::new(false);
        let a = graph.add_individual(&ind("a"));
        graph.add_type(a, atom("A"), DependencySet::independent());
        let graph = run(&ontology, graph, &[unfold, conjunction]);

        for name in ["B", "C", "D"] {
            assert!(graph.node(a).has_type(&atom(name)), "missing {}", name);
        }
    }

    #[test]
    fn test_forall_over_transitive_role() {
        let mut ontology = Ontology::new();
        let r = PropertyExpression::object(format!("{}r", EX));
        ontology.add_axiom(Axiom::TransitiveProperty(r.clone()));

        let mut graph = CompletionGraph::new(false);
        let a = graph.add_individual(&ind("a"));
        let b = graph.add_individual(&ind("b"));
        let c = graph.add_individual(&ind("c"));
        let role = r.to_role();
        graph.add_edge(a, &role, b, DependencySet::independent());
        graph.add_edge(b, &role, c, DependencySet::independent());
        graph.add_type(a, Concept::forall(role.clone(), atom("C")), DependencySet::independent());

        let graph = run(&ontology, graph, &[universal]);
        assert!(graph.node(b).has_type(&atom("C")));
        assert!(graph.node(c).has_type(&atom("C")));
    }

    #[test]
    fn test_domain_and_range() {
        let mut ontology = Ontology::new();
        let p = PropertyExpression::object(format!("{}teaches", EX));
        ontology.add_axiom(Axiom::ObjectPropertyDomain(p.clone(), class("Lecturer")));
        ontology.add_axiom(Axiom::ObjectPropertyRange(p.clone(), class("Course")));

        let mut graph = CompletionGraph::new(false);
        let a = graph.add_individual(&ind("a"));
        let b = graph.add_individual(&ind("b"));
        graph.add_edge(b, &p.to_role().inverse(), a, DependencySet::independent());

        let graph = run(&ontology, graph, &[domain_range]);
        assert!(graph.node(a).has_type(&atom("Lecturer")));
        assert!(graph.node(b).has_type(&atom("Course")));
    }

    #[test]
    fn test_min_max_clash() {
        let ontology = Ontology::new();
        let role = Role::new(format!("{}r", EX));
        let mut graph = CompletionGraph::new(false);
        let a = graph.add_individual(&ind("a"));
        graph.add_type(a, Concept::at_least(3, role.clone(), Concept::Top), DependencySet::independent());
        graph.add_type(a, Concept::at_most(2, role, Concept::Top), DependencySet::independent());

        let graph = run(&ontology, graph, &[min_max]);
        assert_eq!(graph.clash().map(|c| c.kind), Some(ClashType::MinMax));
    }

    #[test]
    fn test_disjoint_properties_clash() {
        let mut ontology = Ontology::new();
        let p = PropertyExpression::object(format!("{}likes", EX));
        let q = PropertyExpression::object(format!("{}hates", EX));
        ontology.add_axiom(Axiom::DisjointProperties(vec![p.clone(), q.clone()]));

        let mut graph = CompletionGraph::new(false);
        let a = graph.add_individual(&ind("a"));
        let b = graph.add_individual(&ind("b"));
        graph.add_edge(a, &p.to_role(), b, DependencySet::independent());
        graph.add_edge(a, &q.to_role(), b, DependencySet::independent());

        let graph = run(&ontology, graph, &[disjoint_properties]);
        assert_eq!(graph.clash().map(|c| c.kind), Some(ClashType::DisjointProperties));
    }

    #[test]
    fn test_literal_outside_its_range() {
        let ontology = Ontology::new();
        let mut graph = CompletionGraph::new(false);
        let lit = graph.add_literal(LiteralState::Value(LiteralValue::Integer(-5)));
        graph.add_type(
            lit,
            Concept::Datatype(OwlIri::new(mimizuku_core::datatype::XSD_NON_NEGATIVE_INTEGER)),
            DependencySet::independent(),
        );

        let graph = run(&ontology, graph, &[literal]);
        assert_eq!(graph.clash().map(|c| c.kind), Some(ClashType::ValueDatatype));
    }

    #[test]
    fn test_invalid_literal_clash() {
        let ontology = Ontology::new();
        let mut graph = CompletionGraph::new(false);
        graph.add_literal(LiteralState::Invalid(Literal::new(
            "abc",
            mimizuku_core::datatype::XSD_INTEGER,
        )));

        let graph = run(&ontology, graph, &[literal]);
        assert_eq!(graph.clash().map(|c| c.kind), Some(ClashType::InvalidLiteral));
    }
}
