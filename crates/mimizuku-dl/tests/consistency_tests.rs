// End-to-end consistency scenarios for mimizuku-dl

use mimizuku_core::{Axiom, ClassExpression, Individual, Ontology, PropertyExpression};
use mimizuku_dl::{ClashType, KnowledgeBase, ReasonerConfig};
use tracing_subscriber::EnvFilter;

const EX: &str = "http://example.org/";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ind(name: &str) -> Individual {
    Individual::new(format!("{}{}", EX, name))
}

fn class(name: &str) -> ClassExpression {
    ClassExpression::named(format!("{}{}", EX, name))
}

fn prop(name: &str) -> PropertyExpression {
    PropertyExpression::object(format!("{}{}", EX, name))
}

#[test]
fn test_disjoint_types_are_inconsistent_with_explanation() {
    init_tracing();
    let mut ontology = Ontology::new();
    ontology.add_axiom(Axiom::ClassAssertion(class("C"), ind("a")));
    ontology.add_axiom(Axiom::DisjointClasses(vec![class("C"), class("D")]));

    let config = ReasonerConfig::default().with_explanations();
    let mut kb = KnowledgeBase::with_config(ontology, config);
    assert!(kb.is_consistent().unwrap());

    kb.add_axiom(Axiom::ClassAssertion(class("D"), ind("a"))).unwrap();
    assert!(!kb.is_consistent().unwrap());

    let explanation = kb.get_explanation_set();
    assert!(explanation.contains(&Axiom::ClassAssertion(class("C"), ind("a"))));
    assert!(explanation.contains(&Axiom::ClassAssertion(class("D"), ind("a"))));
    assert!(kb.get_explanation().is_some());
}

#[test]
fn test_contradictory_definition_is_unsatisfiable() {
    let mut ontology = Ontology::new();
    ontology.add_axiom(Axiom::EquivalentClasses(vec![
        class("C"),
        ClassExpression::and(vec![class("A"), class("A").not()]),
    ]));

    let mut kb = KnowledgeBase::new(ontology);
    assert!(!kb.is_satisfiable(&class("C")).unwrap());

    // Only the fresh root of the tested concept was ever created
    let graph = kb.last_graph().expect("satisfiability graph");
    assert_eq!(graph.node_count(), 1);
    assert_eq!(kb.last_clash().map(|c| c.kind), Some(ClashType::Atomic));
}

#[test]
fn test_same_individuals_share_types() {
    let mut ontology = Ontology::new();
    ontology.add_axiom(Axiom::SameIndividual(vec![ind("a"), ind("b")]));

    let mut kb = KnowledgeBase::new(ontology);
    kb.add_axiom(Axiom::ClassAssertion(class("C"), ind("a"))).unwrap();
    assert!(kb.is_type(&ind("b"), &class("C")).unwrap());
    assert!(!kb.is_type(&ind("b"), &class("D")).unwrap());
}

#[test]
fn test_max_cardinality_merges_fillers() {
    let mut ontology = Ontology::new();
    ontology.add_axiom(Axiom::ClassAssertion(ClassExpression::max(1, prop("p")), ind("a")));
    ontology.add_axiom(Axiom::ObjectPropertyAssertion(prop("p"), ind("a"), ind("b")));
    ontology.add_axiom(Axiom::ObjectPropertyAssertion(prop("p"), ind("a"), ind("c")));

    let mut kb = KnowledgeBase::new(ontology);
    assert!(kb.is_consistent().unwrap());
    assert!(kb.is_same_as(&ind("b"), &ind("c")).unwrap());
    assert!(!kb.is_different_from(&ind("b"), &ind("c")).unwrap());
}

#[test]
fn test_max_cardinality_with_different_fillers_is_inconsistent() {
    let mut ontology = Ontology::new();
    ontology.add_axiom(Axiom::ClassAssertion(ClassExpression::max(1, prop("p")), ind("a")));
    ontology.add_axiom(Axiom::ObjectPropertyAssertion(prop("p"), ind("a"), ind("b")));
    ontology.add_axiom(Axiom::ObjectPropertyAssertion(prop("p"), ind("a"), ind("c")));
    ontology.add_axiom(Axiom::DifferentIndividuals(vec![ind("b"), ind("c")]));

    let mut kb = KnowledgeBase::new(ontology);
    assert!(!kb.is_consistent().unwrap());
    assert_eq!(kb.last_clash().map(|c| c.kind), Some(ClashType::MaxCardinality));
}

/// Four choice points on `a`; only the last one is involved in the clash
fn backjumping_ontology() -> Ontology {
    let mut ontology = Ontology::new();
    for i in 1..=3 {
        ontology.add_axiom(Axiom::ClassAssertion(
            ClassExpression::or(vec![class(&format!("A{}", i)), class(&format!("B{}", i))]),
            ind("a"),
        ));
    }
    ontology.add_axiom(Axiom::ClassAssertion(
        ClassExpression::or(vec![class("X"), class("Y")]),
        ind("a"),
    ));
    ontology.add_axiom(Axiom::SubClassOf(class("X"), ClassExpression::some(prop("r"), class("E"))));
    ontology.add_axiom(Axiom::SubClassOf(class("Y"), ClassExpression::some(prop("r"), class("E"))));
    ontology.add_axiom(Axiom::ClassAssertion(
        ClassExpression::only(prop("r"), class("E").not()),
        ind("a"),
    ));
    ontology
}

#[test]
fn test_rerun_after_backjump_reproduces_clash() {
    init_tracing();
    let mut kb = KnowledgeBase::new(backjumping_ontology());
    assert!(!kb.is_consistent().unwrap());
    let first_clash = kb.last_clash().cloned().expect("clash");
    let first_stats = kb.last_graph().expect("graph").stats();
    assert!(first_stats.branches >= 4);
    assert!(first_stats.backjumps >= 1);
    assert!(first_clash.depends.is_independent());

    kb.reset();
    assert!(!kb.is_consistent().unwrap());
    assert_eq!(kb.last_clash().cloned(), Some(first_clash));
    assert_eq!(kb.last_graph().expect("graph").stats(), first_stats);
}

#[test]
fn test_backjump_skips_unrelated_branches() {
    let mut kb = KnowledgeBase::new(backjumping_ontology());
    assert!(!kb.is_consistent().unwrap());
    let stats = kb.last_graph().expect("graph").stats();
    // Retrying the three unrelated disjunctions would need at least three more backjumps
    assert!(stats.backjumps <= 2);
}

#[test]
fn test_functional_data_property_with_two_values_is_inconsistent() {
    let age = PropertyExpression::data(format!("{}age", EX));
    let mut ontology = Ontology::new();
    ontology.add_axiom(Axiom::FunctionalProperty(age.clone()));

    let mut kb = KnowledgeBase::new(ontology);
    kb.add_axiom(Axiom::DataPropertyAssertion(age.clone(), ind("a"), mimizuku_core::Literal::integer(1)))
        .unwrap();
    assert!(kb.is_consistent().unwrap());

    kb.add_axiom(Axiom::DataPropertyAssertion(age, ind("a"), mimizuku_core::Literal::integer(2)))
        .unwrap();
    assert!(!kb.is_consistent().unwrap());
    assert_eq!(kb.last_clash().map(|c| c.kind), Some(ClashType::LiteralMerge));
}

#[test]
fn test_tbox_without_individuals_is_checked_on_a_fresh_root() {
    let mut ontology = Ontology::new();
    ontology.add_axiom(Axiom::SubClassOf(
        ClassExpression::Thing,
        ClassExpression::and(vec![class("A"), class("A").not()]),
    ));
    let mut kb = KnowledgeBase::new(ontology);
    assert!(!kb.is_consistent().unwrap());
}
