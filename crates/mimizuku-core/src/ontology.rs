//! 公理ストアと TBox / RBox インデックス
//!
//! Class axioms are split the usual way for lazy unfolding: an inclusion
//! with a named class on the left is attached to that class and only fires
//! when the class shows up in a node label; everything else is internalized
//! into a concept every node has to satisfy.

use crate::expressivity::Expressivity;
use crate::model::{Axiom, AxiomKind, ClassExpression, Concept, Individual, OwlIri, Role};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Told consequence of an axiom, together with the axiom it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub concept: Concept,
    pub axiom: Arc<Axiom>,
}

/// Class axiom store as seen by the completion rules
pub trait TBox {
    /// Concepts implied by a primitive concept in a node label
    fn unfold(&self, concept: &Concept) -> &[Definition];

    /// Concepts every individual node has to satisfy
    fn internalized(&self) -> &[Definition];
}

/// Role hierarchy and role characteristics
pub trait RBox {
    fn is_sub_role(&self, sub: &Role, sup: &Role) -> bool;

    /// All super roles of `role`, including `role` itself
    fn super_roles(&self, role: &Role) -> Vec<Role>;

    fn is_functional(&self, role: &Role) -> Option<&Arc<Axiom>>;

    fn functional_roles(&self) -> &[(Role, Arc<Axiom>)];

    fn is_transitive(&self, role: &Role) -> bool;

    /// Transitive roles below (or equal to) `role`
    fn transitive_sub_roles(&self, role: &Role) -> Vec<Role>;

    fn disjoint_roles(&self, role: &Role) -> &[(Role, Arc<Axiom>)];

    fn domains(&self, role: &Role) -> &[Definition];

    fn ranges(&self, role: &Role) -> &[Definition];

    fn is_data_property(&self, iri: &OwlIri) -> bool;
}

/// OWL DL Ontology with derived reasoning indexes
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    pub iri: Option<OwlIri>,
    axioms: Vec<Arc<Axiom>>,
    individuals: BTreeSet<Individual>,
    classes: BTreeSet<OwlIri>,
    properties: BTreeSet<OwlIri>,
    data_properties: BTreeSet<OwlIri>,

    unfoldings: HashMap<Concept, Vec<Definition>>,
    internalized: Vec<Definition>,

    told_super_roles: BTreeMap<Role, BTreeSet<Role>>,
    role_closure: HashMap<Role, BTreeSet<Role>>,
    functional: Vec<(Role, Arc<Axiom>)>,
    transitive: BTreeSet<Role>,
    disjoint: HashMap<Role, Vec<(Role, Arc<Axiom>)>>,
    domains: HashMap<Role, Vec<Definition>>,
    ranges: HashMap<Role, Vec<Definition>>,

    tbox_expressivity: Expressivity,
    abox_expressivity: Expressivity,
}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iri(iri: OwlIri) -> Self {
        Self {
            iri: Some(iri),
            ..Self::default()
        }
    }

    /// Add an axiom and index it. Adding an axiom twice returns the stored copy.
    pub fn add_axiom(&mut self, axiom: Axiom) -> Arc<Axiom> {
        if let Some(existing) = self.axioms.iter().find(|a| ***a == axiom) {
            return existing.clone();
        }

        let axiom = Arc::new(axiom);
        self.axioms.push(axiom.clone());
        self.index(&axiom);
        if axiom.kind() == AxiomKind::RBox {
            self.close_roles();
        }
        axiom
    }

    /// Remove an axiom. All indexes are rebuilt from the remaining axioms.
    pub fn remove_axiom(&mut self, axiom: &Axiom) -> Option<Arc<Axiom>> {
        let position = self.axioms.iter().position(|a| **a == *axiom)?;
        let removed = self.axioms.remove(position);
        self.rebuild();
        Some(removed)
    }

    pub fn contains(&self, axiom: &Axiom) -> bool {
        self.axioms.iter().any(|a| **a == *axiom)
    }

    pub fn axioms(&self) -> &[Arc<Axiom>] {
        &self.axioms
    }

    pub fn abox_axioms(&self) -> impl Iterator<Item = &Arc<Axiom>> {
        self.axioms.iter().filter(|a| a.kind() == AxiomKind::ABox)
    }

    pub fn individuals(&self) -> &BTreeSet<Individual> {
        &self.individuals
    }

    pub fn classes(&self) -> &BTreeSet<OwlIri> {
        &self.classes
    }

    pub fn properties(&self) -> &BTreeSet<OwlIri> {
        &self.properties
    }

    pub fn expressivity(&self) -> Expressivity {
        self.tbox_expressivity.union(&self.abox_expressivity)
    }

    pub fn tbox_expressivity(&self) -> Expressivity {
        self.tbox_expressivity
    }

    pub fn has_nominals(&self) -> bool {
        self.expressivity().nominals
    }

    fn rebuild(&mut self) {
        let axioms = std::mem::take(&mut self.axioms);
        *self = Self {
            iri: self.iri.take(),
            axioms,
            ..Self::default()
        };
        for axiom in self.axioms.clone() {
            self.index(&axiom);
        }
        self.close_roles();
    }

    fn index(&mut self, axiom: &Arc<Axiom>) {
        match axiom.as_ref() {
            Axiom::SubClassOf(sub, sup) => {
                self.add_inclusion(sub.to_concept(), sup.to_concept(), axiom);
                self.register_classes(&[sub, sup]);
            }
            Axiom::EquivalentClasses(classes) => {
                let concepts: Vec<Concept> = classes.iter().map(|c| c.to_concept()).collect();
                for (i, sub) in concepts.iter().enumerate() {
                    for (j, sup) in concepts.iter().enumerate() {
                        if i != j {
                            self.add_inclusion(sub.clone(), sup.clone(), axiom);
                        }
                    }
                }
                self.register_classes(&classes.iter().collect::<Vec<_>>());
            }
            Axiom::DisjointClasses(classes) => {
                let concepts: Vec<Concept> = classes.iter().map(|c| c.to_concept()).collect();
                for i in 0..concepts.len() {
                    for j in (i + 1)..concepts.len() {
                        let (a, b) = (&concepts[i], &concepts[j]);
                        let a_named = matches!(a, Concept::Atom(_));
                        let b_named = matches!(b, Concept::Atom(_));
                        if a_named {
                            self.add_inclusion(a.clone(), b.negate(), axiom);
                        }
                        if b_named {
                            self.add_inclusion(b.clone(), a.negate(), axiom);
                        }
                        if !a_named && !b_named {
                            self.add_inclusion(a.clone(), b.negate(), axiom);
                        }
                    }
                }
                self.register_classes(&classes.iter().collect::<Vec<_>>());
            }
            Axiom::SubPropertyOf(sub, sup) => {
                let (sub, sup) = (sub.to_role(), sup.to_role());
                self.add_role_inclusion(&sub, &sup);
                self.register_role(&sub);
                self.register_role(&sup);
            }
            Axiom::EquivalentProperties(properties) => {
                let roles: Vec<Role> = properties.iter().map(|p| p.to_role()).collect();
                for a in &roles {
                    for b in &roles {
                        if a != b {
                            self.add_role_inclusion(a, b);
                        }
                    }
                    self.register_role(a);
                }
            }
            Axiom::ObjectPropertyDomain(property, class) => {
                let role = property.to_role();
                let definition = Definition {
                    concept: class.to_concept(),
                    axiom: axiom.clone(),
                };
                self.tbox_expressivity.visit(&definition.concept);
                self.domains
                    .entry(role.clone())
                    .or_default()
                    .push(definition.clone());
                self.ranges.entry(role.inverse()).or_default().push(definition);
                if property.is_data() {
                    self.data_properties.insert(property.iri().clone());
                }
                self.register_role(&role);
                self.register_classes(&[class]);
            }
            Axiom::ObjectPropertyRange(property, class) => {
                let role = property.to_role();
                let definition = Definition {
                    concept: class.to_concept(),
                    axiom: axiom.clone(),
                };
                self.tbox_expressivity.visit(&definition.concept);
                self.ranges
                    .entry(role.clone())
                    .or_default()
                    .push(definition.clone());
                self.domains.entry(role.inverse()).or_default().push(definition);
                if property.is_data() {
                    self.data_properties.insert(property.iri().clone());
                    self.tbox_expressivity.datatypes = true;
                }
                self.register_role(&role);
                self.register_classes(&[class]);
            }
            Axiom::FunctionalProperty(property) => {
                let role = property.to_role();
                self.functional.push((role.clone(), axiom.clone()));
                self.tbox_expressivity.functional = true;
                if property.is_data() {
                    self.data_properties.insert(property.iri().clone());
                }
                self.register_role(&role);
            }
            Axiom::InverseFunctionalProperty(property) => {
                let role = property.to_role();
                self.functional.push((role.inverse(), axiom.clone()));
                self.tbox_expressivity.functional = true;
                self.tbox_expressivity.inverses = true;
                self.register_role(&role);
            }
            Axiom::TransitiveProperty(property) => {
                let role = property.to_role();
                self.transitive.insert(role.clone());
                self.transitive.insert(role.inverse());
                self.tbox_expressivity.transitivity = true;
                self.register_role(&role);
            }
            Axiom::SymmetricProperty(property) => {
                let role = property.to_role();
                self.add_role_inclusion(&role, &role.inverse());
                self.tbox_expressivity.inverses = true;
                self.register_role(&role);
            }
            Axiom::DisjointProperties(properties) => {
                let roles: Vec<Role> = properties.iter().map(|p| p.to_role()).collect();
                for a in &roles {
                    for b in &roles {
                        if a != b {
                            self.disjoint
                                .entry(a.clone())
                                .or_default()
                                .push((b.clone(), axiom.clone()));
                            self.disjoint
                                .entry(a.inverse())
                                .or_default()
                                .push((b.inverse(), axiom.clone()));
                        }
                    }
                    self.register_role(a);
                }
                self.tbox_expressivity.role_disjointness = true;
            }
            Axiom::SameIndividual(individuals) | Axiom::DifferentIndividuals(individuals) => {
                self.individuals.extend(individuals.iter().cloned());
            }
            Axiom::ClassAssertion(class, individual) => {
                self.abox_expressivity.visit(&class.to_concept());
                self.individuals.insert(individual.clone());
                self.register_classes(&[class]);
            }
            Axiom::ObjectPropertyAssertion(property, subject, object) => {
                self.abox_expressivity.visit_role(&property.to_role());
                self.individuals.insert(subject.clone());
                self.individuals.insert(object.clone());
                self.register_role(&property.to_role());
            }
            Axiom::NegativeObjectPropertyAssertion(property, subject, object) => {
                // Asserted as ∀R.¬{o} on the subject
                self.abox_expressivity.universal = true;
                self.abox_expressivity.nominals = true;
                self.abox_expressivity.negation = true;
                self.abox_expressivity.visit_role(&property.to_role());
                self.individuals.insert(subject.clone());
                self.individuals.insert(object.clone());
                self.register_role(&property.to_role());
            }
            Axiom::DataPropertyAssertion(property, subject, _) => {
                self.abox_expressivity.datatypes = true;
                self.data_properties.insert(property.iri().clone());
                self.individuals.insert(subject.clone());
                self.register_role(&property.to_role());
            }
        }
    }

    fn add_inclusion(&mut self, sub: Concept, sup: Concept, axiom: &Arc<Axiom>) {
        if sup == Concept::Top || sub == Concept::Bottom {
            return;
        }
        self.tbox_expressivity.visit(&sup);
        self.record_nominals(&sub);
        self.record_nominals(&sup);

        match sub {
            Concept::Atom(_) => {
                self.unfoldings.entry(sub).or_default().push(Definition {
                    concept: sup,
                    axiom: axiom.clone(),
                });
            }
            Concept::Top => {
                self.tbox_expressivity.general_axioms = true;
                self.internalized.push(Definition {
                    concept: sup,
                    axiom: axiom.clone(),
                });
            }
            sub => {
                let concept = Concept::or(vec![sub.negate(), sup]);
                self.tbox_expressivity.visit(&concept);
                self.tbox_expressivity.general_axioms = true;
                self.internalized.push(Definition {
                    concept,
                    axiom: axiom.clone(),
                });
            }
        }
    }

    fn add_role_inclusion(&mut self, sub: &Role, sup: &Role) {
        self.told_super_roles
            .entry(sub.clone())
            .or_default()
            .insert(sup.clone());
        self.told_super_roles
            .entry(sub.inverse())
            .or_default()
            .insert(sup.inverse());
        self.tbox_expressivity.role_hierarchy = true;
        if sub.inverse != sup.inverse {
            self.tbox_expressivity.inverses = true;
        }
    }

    fn close_roles(&mut self) {
        self.role_closure.clear();
        for role in self.told_super_roles.keys() {
            let mut seen = BTreeSet::new();
            let mut stack = vec![role.clone()];
            while let Some(current) = stack.pop() {
                if !seen.insert(current.clone()) {
                    continue;
                }
                if let Some(sups) = self.told_super_roles.get(&current) {
                    stack.extend(sups.iter().cloned());
                }
            }
            self.role_closure.insert(role.clone(), seen);
        }
    }

    fn record_nominals(&mut self, concept: &Concept) {
        concept.visit(&mut |c| {
            if let Concept::Nominal(i) | Concept::NotNominal(i) = c {
                self.individuals.insert(i.clone());
            }
        });
    }

    fn register_role(&mut self, role: &Role) {
        self.tbox_expressivity.visit_role(role);
        self.properties.insert(role.iri.clone());
    }

    fn register_classes(&mut self, classes: &[&ClassExpression]) {
        for class in classes {
            let concept = class.to_concept();
            self.record_nominals(&concept);
            concept.visit(&mut |c| {
                if let Concept::Atom(iri) | Concept::NotAtom(iri) = c {
                    self.classes.insert(iri.clone());
                }
            });
        }
    }
}

impl TBox for Ontology {
    fn unfold(&self, concept: &Concept) -> &[Definition] {
        self.unfoldings
            .get(concept)
            .map(|defs| defs.as_slice())
            .unwrap_or(&[])
    }

    fn internalized(&self) -> &[Definition] {
        &self.internalized
    }
}

impl RBox for Ontology {
    fn is_sub_role(&self, sub: &Role, sup: &Role) -> bool {
        sub == sup
            || self
                .role_closure
                .get(sub)
                .map_or(false, |sups| sups.contains(sup))
    }

    fn super_roles(&self, role: &Role) -> Vec<Role> {
        match self.role_closure.get(role) {
            Some(sups) => sups.iter().cloned().collect(),
            None => vec![role.clone()],
        }
    }

    fn is_functional(&self, role: &Role) -> Option<&Arc<Axiom>> {
        self.functional
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, axiom)| axiom)
    }

    fn functional_roles(&self) -> &[(Role, Arc<Axiom>)] {
        &self.functional
    }

    fn is_transitive(&self, role: &Role) -> bool {
        self.transitive.contains(role)
    }

    fn transitive_sub_roles(&self, role: &Role) -> Vec<Role> {
        self.transitive
            .iter()
            .filter(|sub| self.is_sub_role(sub, role))
            .cloned()
            .collect()
    }

    fn disjoint_roles(&self, role: &Role) -> &[(Role, Arc<Axiom>)] {
        self.disjoint
            .get(role)
            .map(|roles| roles.as_slice())
            .unwrap_or(&[])
    }

    fn domains(&self, role: &Role) -> &[Definition] {
        self.domains
            .get(role)
            .map(|defs| defs.as_slice())
            .unwrap_or(&[])
    }

    fn ranges(&self, role: &Role) -> &[Definition] {
        self.ranges
            .get(role)
            .map(|defs| defs.as_slice())
            .unwrap_or(&[])
    }

    fn is_data_property(&self, iri: &OwlIri) -> bool {
        self.data_properties.contains(iri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyExpression;

    const EX: &str = "http://example.org/";

    fn class(name: &str) -> ClassExpression {
        ClassExpression::named(format!("{}{}", EX, name))
    }

    fn prop(name: &str) -> PropertyExpression {
        PropertyExpression::object(format!("{}{}", EX, name))
    }

    fn role(name: &str) -> Role {
        Role::new(format!("{}{}", EX, name))
    }

    #[test]
    fn test_named_inclusion_is_unfolded() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(Axiom::SubClassOf(class("Cat"), class("Animal")));

        let defs = ontology.unfold(&class("Cat").to_concept());
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].concept, class("Animal").to_concept());
        assert!(ontology.internalized().is_empty());
        assert!(ontology.expressivity().is_el());
    }

    #[test]
    fn test_equivalence_with_complex_class() {
        let mut ontology = Ontology::new();
        let definition = ClassExpression::some(prop("hasChild"), ClassExpression::Thing);
        ontology.add_axiom(Axiom::EquivalentClasses(vec![class("Parent"), definition]));

        assert_eq!(ontology.unfold(&class("Parent").to_concept()).len(), 1);
        assert_eq!(ontology.internalized().len(), 1);
        assert!(ontology.tbox_expressivity().general_axioms);
    }

    #[test]
    fn test_disjoint_named_classes_unfold_both_ways() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(Axiom::DisjointClasses(vec![class("C"), class("D")]));

        let c = ontology.unfold(&class("C").to_concept());
        let d = ontology.unfold(&class("D").to_concept());
        assert_eq!(c[0].concept, class("D").to_concept().negate());
        assert_eq!(d[0].concept, class("C").to_concept().negate());
        assert!(Arc::ptr_eq(&c[0].axiom, &d[0].axiom));
    }

    #[test]
    fn test_role_hierarchy_closure_with_inverses() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(Axiom::SubPropertyOf(prop("hasSon"), prop("hasChild")));
        ontology.add_axiom(Axiom::SubPropertyOf(prop("hasChild"), prop("hasRelative")));

        assert!(ontology.is_sub_role(&role("hasSon"), &role("hasRelative")));
        assert!(ontology.is_sub_role(&role("hasSon").inverse(), &role("hasRelative").inverse()));
        assert!(!ontology.is_sub_role(&role("hasRelative"), &role("hasSon")));
        assert_eq!(ontology.super_roles(&role("hasSon")).len(), 3);
    }

    #[test]
    fn test_symmetric_role() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(Axiom::SymmetricProperty(prop("knows")));
        assert!(ontology.is_sub_role(&role("knows"), &role("knows").inverse()));
        assert!(ontology.is_sub_role(&role("knows").inverse(), &role("knows")));
    }

    #[test]
    fn test_domain_applies_to_inverse_as_range() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(Axiom::ObjectPropertyDomain(prop("hasChild"), class("Parent")));

        assert_eq!(ontology.domains(&role("hasChild")).len(), 1);
        assert_eq!(ontology.ranges(&role("hasChild").inverse()).len(), 1);
        assert!(ontology.ranges(&role("hasChild")).is_empty());
    }

    #[test]
    fn test_transitive_sub_roles() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(Axiom::TransitiveProperty(prop("partOf")));
        ontology.add_axiom(Axiom::SubPropertyOf(prop("partOf"), prop("locatedIn")));

        assert!(ontology.is_transitive(&role("partOf").inverse()));
        assert_eq!(ontology.transitive_sub_roles(&role("locatedIn")), vec![role("partOf")]);
    }

    #[test]
    fn test_remove_axiom_rebuilds_indexes() {
        let mut ontology = Ontology::new();
        let axiom = Axiom::SubClassOf(class("Cat"), class("Animal"));
        ontology.add_axiom(axiom.clone());
        ontology.add_axiom(Axiom::ClassAssertion(
            class("Cat"),
            Individual::new(format!("{}tom", EX)),
        ));

        assert!(ontology.remove_axiom(&axiom).is_some());
        assert!(ontology.unfold(&class("Cat").to_concept()).is_empty());
        assert_eq!(ontology.axioms().len(), 1);
        assert_eq!(ontology.individuals().len(), 1);
        assert!(ontology.remove_axiom(&axiom).is_none());
    }

    #[test]
    fn test_duplicate_axiom_is_stored_once() {
        let mut ontology = Ontology::new();
        let first = ontology.add_axiom(Axiom::SubClassOf(class("A"), class("B")));
        let second = ontology.add_axiom(Axiom::SubClassOf(class("A"), class("B")));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(ontology.unfold(&class("A").to_concept()).len(), 1);
    }

    #[test]
    fn test_nominals_detected() {
        let mut ontology = Ontology::new();
        ontology.add_axiom(Axiom::SubClassOf(
            class("Weekday"),
            ClassExpression::OneOf(vec![Individual::new(format!("{}monday", EX))]),
        ));
        assert!(ontology.has_nominals());
        assert_eq!(ontology.individuals().len(), 1);
    }
}
