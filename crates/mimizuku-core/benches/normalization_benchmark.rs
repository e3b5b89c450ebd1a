use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mimizuku_core::{Axiom, ClassExpression, Ontology, PropertyExpression};

fn nested_expression(depth: usize) -> ClassExpression {
    let property = PropertyExpression::object("http://example.org/r");
    let mut expr = ClassExpression::named("http://example.org/Leaf");
    for i in 0..depth {
        let sibling = ClassExpression::named(format!("http://example.org/Class{}", i));
        expr = if i % 2 == 0 {
            ClassExpression::some(property.clone(), ClassExpression::and(vec![expr, sibling]))
        } else {
            ClassExpression::only(property.clone(), ClassExpression::or(vec![sibling, expr]).not())
        };
    }
    expr
}

fn benchmark_nnf_normalization(c: &mut Criterion) {
    let depths = vec![5, 10, 20];

    for depth in depths {
        let expr = nested_expression(depth);
        c.bench_function(&format!("nnf_normalization_depth_{}", depth), |b| {
            b.iter(|| {
                let _concept = black_box(&expr).to_concept();
            });
        });
    }
}

fn benchmark_ontology_indexing(c: &mut Criterion) {
    let sizes = vec![10, 50, 100];

    for size in sizes {
        let axioms: Vec<Axiom> = (1..size)
            .map(|i| {
                Axiom::SubClassOf(
                    ClassExpression::named(format!("http://example.org/Class{}", i)),
                    ClassExpression::named(format!("http://example.org/Class{}", i - 1)),
                )
            })
            .collect();

        c.bench_function(&format!("ontology_indexing_{}_axioms", size), |b| {
            b.iter(|| {
                let mut ontology = Ontology::new();
                for axiom in black_box(&axioms) {
                    ontology.add_axiom(axiom.clone());
                }
            });
        });
    }
}

criterion_group!(benches, benchmark_nnf_normalization, benchmark_ontology_indexing);
criterion_main!(benches);
