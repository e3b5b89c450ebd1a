use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mimizuku_core::{Axiom, ClassExpression, Individual, Ontology, PropertyExpression};
use mimizuku_dl::{KnowledgeBase, ReasonerConfig};

fn class(i: usize) -> ClassExpression {
    ClassExpression::named(format!("http://example.org/Class{}", i))
}

/// A subclass chain with one typed individual per class
fn chain_ontology(size: usize) -> Ontology {
    let mut ontology = Ontology::new();
    for i in 1..size {
        ontology.add_axiom(Axiom::SubClassOf(class(i), class(i - 1)));
        ontology.add_axiom(Axiom::ClassAssertion(
            class(i),
            Individual::new(format!("http://example.org/ind{}", i)),
        ));
    }
    ontology
}

/// Independent disjunctions followed by a clash that depends on the last one only
fn backjumping_ontology(disjunctions: usize) -> Ontology {
    let a = Individual::new("http://example.org/a");
    let r = PropertyExpression::object("http://example.org/r");
    let mut ontology = Ontology::new();
    for i in 0..disjunctions {
        ontology.add_axiom(Axiom::ClassAssertion(
            ClassExpression::or(vec![class(2 * i), class(2 * i + 1)]),
            a.clone(),
        ));
    }
    let x = ClassExpression::named("http://example.org/X");
    let y = ClassExpression::named("http://example.org/Y");
    let e = ClassExpression::named("http://example.org/E");
    ontology.add_axiom(Axiom::ClassAssertion(ClassExpression::or(vec![x.clone(), y.clone()]), a.clone()));
    ontology.add_axiom(Axiom::SubClassOf(x, ClassExpression::some(r.clone(), e.clone())));
    ontology.add_axiom(Axiom::SubClassOf(y, ClassExpression::some(r.clone(), e.clone())));
    ontology.add_axiom(Axiom::ClassAssertion(ClassExpression::only(r, e.not()), a));
    ontology
}

fn benchmark_consistency(c: &mut Criterion) {
    for size in [10, 50, 100] {
        let ontology = chain_ontology(size);
        c.bench_function(&format!("consistency_chain_{}", size), |b| {
            b.iter(|| {
                let mut kb = KnowledgeBase::new(black_box(&ontology).clone());
                kb.is_consistent()
            });
        });
    }
}

fn benchmark_backjumping(c: &mut Criterion) {
    for disjunctions in [3, 6, 12] {
        let ontology = backjumping_ontology(disjunctions);
        for explanations in [false, true] {
            let config = ReasonerConfig {
                track_explanations: explanations,
                ..ReasonerConfig::default()
            };
            c.bench_function(
                &format!("backjumping_{}_disjunctions_explain_{}", disjunctions, explanations),
                |b| {
                    b.iter(|| {
                        let mut kb =
                            KnowledgeBase::with_config(black_box(&ontology).clone(), config.clone());
                        kb.is_consistent()
                    });
                },
            );
        }
    }
}

fn benchmark_cached_satisfiability(c: &mut Criterion) {
    let mut kb = KnowledgeBase::new(chain_ontology(50));
    let query = ClassExpression::and(vec![class(49), class(0).not()]);

    c.bench_function("satisfiability_cached", |b| {
        b.iter(|| kb.is_satisfiable(black_box(&query)));
    });
}

criterion_group!(
    benches,
    benchmark_consistency,
    benchmark_backjumping,
    benchmark_cached_satisfiability
);
criterion_main!(benches);
