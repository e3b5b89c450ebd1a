//! Property tests for concept normalization

use mimizuku_core::{Concept, Individual, Role};
use proptest::prelude::*;

fn arb_concept() -> impl Strategy<Value = Concept> {
    let leaf = prop_oneof![
        Just(Concept::Top),
        Just(Concept::Bottom),
        (0u8..4).prop_map(|i| Concept::atom(format!("http://example.org/A{}", i))),
        (0u8..4).prop_map(|i| Concept::atom(format!("http://example.org/A{}", i)).negate()),
        (0u8..2).prop_map(|i| Concept::Nominal(Individual::new(format!("http://example.org/o{}", i)))),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        let role = (0u8..2, any::<bool>()).prop_map(|(i, inverse)| Role {
            inverse,
            ..Role::new(format!("http://example.org/r{}", i))
        });
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Concept::and),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Concept::or),
            (role.clone(), inner.clone()).prop_map(|(r, c)| Concept::exists(r, c)),
            (role.clone(), inner.clone()).prop_map(|(r, c)| Concept::forall(r, c)),
            (1u32..3, role.clone(), inner.clone()).prop_map(|(n, r, c)| Concept::at_least(n, r, c)),
            (0u32..3, role, inner).prop_map(|(n, r, c)| Concept::at_most(n, r, c)),
        ]
    })
}

proptest! {
    #[test]
    fn negation_is_an_involution(c in arb_concept()) {
        prop_assert_eq!(c.negate().negate(), c);
    }

    #[test]
    fn conjunction_is_commutative(a in arb_concept(), b in arb_concept()) {
        prop_assert_eq!(
            Concept::and(vec![a.clone(), b.clone()]),
            Concept::and(vec![b, a])
        );
    }

    #[test]
    fn disjunction_absorbs_duplicates(a in arb_concept()) {
        prop_assert_eq!(Concept::or(vec![a.clone(), a.clone()]), a);
    }
}
