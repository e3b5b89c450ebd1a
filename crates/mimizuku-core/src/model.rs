//! OWL DL データモデル
//!
//! Surface syntax (`ClassExpression`, `PropertyExpression`, `Axiom`) as it is
//! handed to the reasoner, and the normalized terms (`Concept`, `Role`) the
//! tableau labels nodes and keys its caches with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// OWL IRI wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OwlIri(pub String);

impl OwlIri {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwlIri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// OWL Individual
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Individual(pub OwlIri);

impl Individual {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(OwlIri::new(s))
    }

    pub fn iri(&self) -> &OwlIri {
        &self.0
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed literal, e.g. `"42"^^xsd:integer`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: OwlIri,
}

impl Literal {
    pub fn new<L: Into<String>, D: Into<String>>(lexical: L, datatype: D) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: OwlIri::new(datatype),
        }
    }

    pub fn string<L: Into<String>>(lexical: L) -> Self {
        Self::new(lexical, crate::datatype::XSD_STRING)
    }

    pub fn integer(value: i64) -> Self {
        Self::new(value.to_string(), crate::datatype::XSD_INTEGER)
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(value.to_string(), crate::datatype::XSD_BOOLEAN)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"^^<{}>", self.lexical, self.datatype)
    }
}

/// OWL DL Property Expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyExpression {
    /// Object property
    ObjectProperty(OwlIri),

    /// Data property
    DataProperty(OwlIri),

    /// Inverse property: R⁻
    InverseOf(Box<PropertyExpression>),
}

impl PropertyExpression {
    pub fn object<S: Into<String>>(iri: S) -> Self {
        PropertyExpression::ObjectProperty(OwlIri::new(iri))
    }

    pub fn data<S: Into<String>>(iri: S) -> Self {
        PropertyExpression::DataProperty(OwlIri::new(iri))
    }

    pub fn inverse(self) -> Self {
        PropertyExpression::InverseOf(Box::new(self))
    }

    /// The named property underneath any number of inversions
    pub fn iri(&self) -> &OwlIri {
        match self {
            PropertyExpression::ObjectProperty(iri) | PropertyExpression::DataProperty(iri) => iri,
            PropertyExpression::InverseOf(inner) => inner.iri(),
        }
    }

    pub fn is_data(&self) -> bool {
        match self {
            PropertyExpression::ObjectProperty(_) => false,
            PropertyExpression::DataProperty(_) => true,
            PropertyExpression::InverseOf(inner) => inner.is_data(),
        }
    }

    pub fn to_role(&self) -> Role {
        match self {
            PropertyExpression::ObjectProperty(iri) | PropertyExpression::DataProperty(iri) => {
                Role::named(iri.clone())
            }
            PropertyExpression::InverseOf(inner) => inner.to_role().inverse(),
        }
    }
}

impl fmt::Display for PropertyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyExpression::ObjectProperty(iri) | PropertyExpression::DataProperty(iri) => {
                write!(f, "{}", iri)
            }
            PropertyExpression::InverseOf(inner) => write!(f, "ObjectInverseOf({})", inner),
        }
    }
}

/// Normalized role: a named property, possibly inverted
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Role {
    pub iri: OwlIri,
    pub inverse: bool,
}

impl Role {
    pub fn named(iri: OwlIri) -> Self {
        Self { iri, inverse: false }
    }

    pub fn new<S: Into<String>>(iri: S) -> Self {
        Self::named(OwlIri::new(iri))
    }

    pub fn inverse(&self) -> Role {
        Role {
            iri: self.iri.clone(),
            inverse: !self.inverse,
        }
    }

    /// The non-inverted role with the same name
    pub fn forward(&self) -> Role {
        Role::named(self.iri.clone())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            write!(f, "{}⁻", self.iri)
        } else {
            write!(f, "{}", self.iri)
        }
    }
}

/// OWL DL Class Expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassExpression {
    /// Named class
    Named(OwlIri),

    /// owl:Thing (⊤)
    Thing,

    /// owl:Nothing (⊥)
    Nothing,

    /// Intersection of classes: C1 ⊓ C2 ⊓ ... ⊓ Cn
    IntersectionOf(Vec<ClassExpression>),

    /// Union of classes: C1 ⊔ C2 ⊔ ... ⊔ Cn
    UnionOf(Vec<ClassExpression>),

    /// Complement of class: ¬C
    ComplementOf(Box<ClassExpression>),

    /// Enumeration of individuals: {i1, i2, ..., in}
    OneOf(Vec<Individual>),

    /// Existential restriction: ∃R.C
    SomeValuesFrom {
        property: PropertyExpression,
        class: Box<ClassExpression>,
    },

    /// Universal restriction: ∀R.C
    AllValuesFrom {
        property: PropertyExpression,
        class: Box<ClassExpression>,
    },

    /// Has value: ∃R.{i}
    HasValue {
        property: PropertyExpression,
        individual: Individual,
    },

    /// Minimum cardinality: ≥n R.C
    MinCardinality {
        cardinality: u32,
        property: PropertyExpression,
        class: Option<Box<ClassExpression>>, // None means owl:Thing
    },

    /// Maximum cardinality: ≤n R.C
    MaxCardinality {
        cardinality: u32,
        property: PropertyExpression,
        class: Option<Box<ClassExpression>>,
    },

    /// Exact cardinality: =n R.C
    ExactCardinality {
        cardinality: u32,
        property: PropertyExpression,
        class: Option<Box<ClassExpression>>,
    },

    /// Datatype used as a data range filler
    Datatype(OwlIri),
}

impl ClassExpression {
    pub fn named<S: Into<String>>(iri: S) -> Self {
        ClassExpression::Named(OwlIri::new(iri))
    }

    pub fn datatype<S: Into<String>>(iri: S) -> Self {
        ClassExpression::Datatype(OwlIri::new(iri))
    }

    pub fn and(operands: Vec<ClassExpression>) -> Self {
        ClassExpression::IntersectionOf(operands)
    }

    pub fn or(operands: Vec<ClassExpression>) -> Self {
        ClassExpression::UnionOf(operands)
    }

    pub fn not(self) -> Self {
        ClassExpression::ComplementOf(Box::new(self))
    }

    pub fn some(property: PropertyExpression, class: ClassExpression) -> Self {
        ClassExpression::SomeValuesFrom {
            property,
            class: Box::new(class),
        }
    }

    pub fn only(property: PropertyExpression, class: ClassExpression) -> Self {
        ClassExpression::AllValuesFrom {
            property,
            class: Box::new(class),
        }
    }

    pub fn max(cardinality: u32, property: PropertyExpression) -> Self {
        ClassExpression::MaxCardinality {
            cardinality,
            property,
            class: None,
        }
    }

    pub fn min(cardinality: u32, property: PropertyExpression) -> Self {
        ClassExpression::MinCardinality {
            cardinality,
            property,
            class: None,
        }
    }

    /// Normalize into negation normal form
    pub fn to_concept(&self) -> Concept {
        match self {
            ClassExpression::Named(iri) => Concept::Atom(iri.clone()),
            ClassExpression::Thing => Concept::Top,
            ClassExpression::Nothing => Concept::Bottom,
            ClassExpression::IntersectionOf(operands) => {
                Concept::and(operands.iter().map(|c| c.to_concept()).collect())
            }
            ClassExpression::UnionOf(operands) => {
                Concept::or(operands.iter().map(|c| c.to_concept()).collect())
            }
            ClassExpression::ComplementOf(inner) => inner.to_concept().negate(),
            ClassExpression::OneOf(individuals) => Concept::or(
                individuals
                    .iter()
                    .map(|i| Concept::Nominal(i.clone()))
                    .collect(),
            ),
            ClassExpression::SomeValuesFrom { property, class } => {
                Concept::exists(property.to_role(), class.to_concept())
            }
            ClassExpression::AllValuesFrom { property, class } => {
                Concept::forall(property.to_role(), class.to_concept())
            }
            ClassExpression::HasValue {
                property,
                individual,
            } => Concept::exists(property.to_role(), Concept::Nominal(individual.clone())),
            ClassExpression::MinCardinality {
                cardinality,
                property,
                class,
            } => Concept::at_least(*cardinality, property.to_role(), filler(class)),
            ClassExpression::MaxCardinality {
                cardinality,
                property,
                class,
            } => Concept::at_most(*cardinality, property.to_role(), filler(class)),
            ClassExpression::ExactCardinality {
                cardinality,
                property,
                class,
            } => {
                let role = property.to_role();
                let filler = filler(class);
                Concept::and(vec![
                    Concept::at_least(*cardinality, role.clone(), filler.clone()),
                    Concept::at_most(*cardinality, role, filler),
                ])
            }
            ClassExpression::Datatype(iri) => Concept::Datatype(iri.clone()),
        }
    }
}

fn filler(class: &Option<Box<ClassExpression>>) -> Concept {
    class
        .as_ref()
        .map(|c| c.to_concept())
        .unwrap_or(Concept::Top)
}

impl fmt::Display for ClassExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            ClassExpression::Named(iri) => write!(f, "{}", iri),
            ClassExpression::Thing => write!(f, "owl:Thing"),
            ClassExpression::Nothing => write!(f, "owl:Nothing"),
            ClassExpression::IntersectionOf(ops) => {
                write!(f, "ObjectIntersectionOf(")?;
                list(f, ops)?;
                write!(f, ")")
            }
            ClassExpression::UnionOf(ops) => {
                write!(f, "ObjectUnionOf(")?;
                list(f, ops)?;
                write!(f, ")")
            }
            ClassExpression::ComplementOf(inner) => write!(f, "ObjectComplementOf({})", inner),
            ClassExpression::OneOf(individuals) => {
                write!(f, "ObjectOneOf(")?;
                list(f, individuals)?;
                write!(f, ")")
            }
            ClassExpression::SomeValuesFrom { property, class } => {
                write!(f, "SomeValuesFrom({} {})", property, class)
            }
            ClassExpression::AllValuesFrom { property, class } => {
                write!(f, "AllValuesFrom({} {})", property, class)
            }
            ClassExpression::HasValue {
                property,
                individual,
            } => write!(f, "HasValue({} {})", property, individual),
            ClassExpression::MinCardinality {
                cardinality,
                property,
                class,
            } => cardinality_fmt(f, "MinCardinality", *cardinality, property, class),
            ClassExpression::MaxCardinality {
                cardinality,
                property,
                class,
            } => cardinality_fmt(f, "MaxCardinality", *cardinality, property, class),
            ClassExpression::ExactCardinality {
                cardinality,
                property,
                class,
            } => cardinality_fmt(f, "ExactCardinality", *cardinality, property, class),
            ClassExpression::Datatype(iri) => write!(f, "{}", iri),
        }
    }
}

fn cardinality_fmt(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    cardinality: u32,
    property: &PropertyExpression,
    class: &Option<Box<ClassExpression>>,
) -> fmt::Result {
    match class {
        Some(class) => write!(f, "{}({} {} {})", name, cardinality, property, class),
        None => write!(f, "{}({} {})", name, cardinality, property),
    }
}

/// Concept in negation normal form.
///
/// Operands of `And`/`Or` are flattened, sorted and deduplicated by the
/// smart constructors, so two syntactically different but equivalent
/// conjunctions compare (and hash) equal. Build values through
/// [`Concept::and`], [`Concept::or`] and friends rather than the variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Concept {
    Top,
    Bottom,
    Atom(OwlIri),
    NotAtom(OwlIri),
    Nominal(Individual),
    NotNominal(Individual),
    Datatype(OwlIri),
    NotDatatype(OwlIri),
    And(Vec<Concept>),
    Or(Vec<Concept>),
    Exists(Role, Box<Concept>),
    Forall(Role, Box<Concept>),
    AtLeast(u32, Role, Box<Concept>),
    AtMost(u32, Role, Box<Concept>),
}

impl Concept {
    pub fn atom<S: Into<String>>(iri: S) -> Self {
        Concept::Atom(OwlIri::new(iri))
    }

    pub fn and(operands: Vec<Concept>) -> Concept {
        let mut flat = Vec::with_capacity(operands.len());
        for operand in operands {
            match operand {
                Concept::Top => {}
                Concept::Bottom => return Concept::Bottom,
                Concept::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        flat.sort();
        flat.dedup();
        match flat.len() {
            0 => Concept::Top,
            1 => flat.pop().unwrap_or(Concept::Top),
            _ => Concept::And(flat),
        }
    }

    pub fn or(operands: Vec<Concept>) -> Concept {
        let mut flat = Vec::with_capacity(operands.len());
        for operand in operands {
            match operand {
                Concept::Bottom => {}
                Concept::Top => return Concept::Top,
                Concept::Or(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        flat.sort();
        flat.dedup();
        match flat.len() {
            0 => Concept::Bottom,
            1 => flat.pop().unwrap_or(Concept::Bottom),
            _ => Concept::Or(flat),
        }
    }

    pub fn exists(role: Role, filler: Concept) -> Concept {
        match filler {
            Concept::Bottom => Concept::Bottom,
            filler => Concept::Exists(role, Box::new(filler)),
        }
    }

    pub fn forall(role: Role, filler: Concept) -> Concept {
        match filler {
            Concept::Top => Concept::Top,
            filler => Concept::Forall(role, Box::new(filler)),
        }
    }

    pub fn at_least(n: u32, role: Role, filler: Concept) -> Concept {
        match (n, filler) {
            (0, _) => Concept::Top,
            (_, Concept::Bottom) => Concept::Bottom,
            (n, filler) => Concept::AtLeast(n, role, Box::new(filler)),
        }
    }

    pub fn at_most(n: u32, role: Role, filler: Concept) -> Concept {
        match filler {
            Concept::Bottom => Concept::Top,
            filler => Concept::AtMost(n, role, Box::new(filler)),
        }
    }

    /// Complement in negation normal form
    pub fn negate(&self) -> Concept {
        match self {
            Concept::Top => Concept::Bottom,
            Concept::Bottom => Concept::Top,
            Concept::Atom(iri) => Concept::NotAtom(iri.clone()),
            Concept::NotAtom(iri) => Concept::Atom(iri.clone()),
            Concept::Nominal(i) => Concept::NotNominal(i.clone()),
            Concept::NotNominal(i) => Concept::Nominal(i.clone()),
            Concept::Datatype(iri) => Concept::NotDatatype(iri.clone()),
            Concept::NotDatatype(iri) => Concept::Datatype(iri.clone()),
            Concept::And(ops) => Concept::or(ops.iter().map(Concept::negate).collect()),
            Concept::Or(ops) => Concept::and(ops.iter().map(Concept::negate).collect()),
            Concept::Exists(role, filler) => Concept::forall(role.clone(), filler.negate()),
            Concept::Forall(role, filler) => Concept::exists(role.clone(), filler.negate()),
            Concept::AtLeast(0, _, _) => Concept::Bottom,
            Concept::AtLeast(n, role, filler) => {
                Concept::at_most(n - 1, role.clone(), (**filler).clone())
            }
            Concept::AtMost(n, role, filler) => {
                Concept::at_least(n + 1, role.clone(), (**filler).clone())
            }
        }
    }

    /// Primitive concepts are the ones a clash can be read off directly
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Concept::Top
                | Concept::Bottom
                | Concept::Atom(_)
                | Concept::NotAtom(_)
                | Concept::Nominal(_)
                | Concept::NotNominal(_)
                | Concept::Datatype(_)
                | Concept::NotDatatype(_)
        )
    }

    pub fn is_data_range(&self) -> bool {
        matches!(self, Concept::Datatype(_) | Concept::NotDatatype(_))
    }

    /// Pre-order walk over this concept and all of its sub-concepts
    pub fn visit<F: FnMut(&Concept)>(&self, f: &mut F) {
        f(self);
        match self {
            Concept::And(ops) | Concept::Or(ops) => {
                for op in ops {
                    op.visit(f);
                }
            }
            Concept::Exists(_, filler)
            | Concept::Forall(_, filler)
            | Concept::AtLeast(_, _, filler)
            | Concept::AtMost(_, _, filler) => filler.visit(f),
            _ => {}
        }
    }

    pub fn has_nominals(&self) -> bool {
        let mut found = false;
        self.visit(&mut |c| {
            if matches!(c, Concept::Nominal(_) | Concept::NotNominal(_)) {
                found = true;
            }
        });
        found
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn joined(f: &mut fmt::Formatter<'_>, ops: &[Concept], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, op) in ops.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", sep)?;
                }
                write!(f, "{}", op)?;
            }
            write!(f, ")")
        }

        match self {
            Concept::Top => write!(f, "⊤"),
            Concept::Bottom => write!(f, "⊥"),
            Concept::Atom(iri) | Concept::Datatype(iri) => write!(f, "{}", iri),
            Concept::NotAtom(iri) | Concept::NotDatatype(iri) => write!(f, "¬{}", iri),
            Concept::Nominal(i) => write!(f, "{{{}}}", i),
            Concept::NotNominal(i) => write!(f, "¬{{{}}}", i),
            Concept::And(ops) => joined(f, ops, "⊓"),
            Concept::Or(ops) => joined(f, ops, "⊔"),
            Concept::Exists(role, filler) => write!(f, "∃{}.{}", role, filler),
            Concept::Forall(role, filler) => write!(f, "∀{}.{}", role, filler),
            Concept::AtLeast(n, role, filler) => write!(f, "≥{} {}.{}", n, role, filler),
            Concept::AtMost(n, role, filler) => write!(f, "≤{} {}.{}", n, role, filler),
        }
    }
}

/// Which store an axiom belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxiomKind {
    TBox,
    RBox,
    ABox,
}

/// OWL DL Axiom
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axiom {
    /// SubClassOf with complex class expressions
    SubClassOf(ClassExpression, ClassExpression),

    /// EquivalentClasses with complex expressions
    EquivalentClasses(Vec<ClassExpression>),

    /// DisjointClasses with complex expressions
    DisjointClasses(Vec<ClassExpression>),

    /// SubPropertyOf with property expressions
    SubPropertyOf(PropertyExpression, PropertyExpression),

    /// EquivalentProperties
    EquivalentProperties(Vec<PropertyExpression>),

    /// Property domain (object or data property)
    ObjectPropertyDomain(PropertyExpression, ClassExpression),

    /// Property range (object or data property)
    ObjectPropertyRange(PropertyExpression, ClassExpression),

    /// Functional property
    FunctionalProperty(PropertyExpression),

    /// Inverse functional property
    InverseFunctionalProperty(PropertyExpression),

    /// Transitive property
    TransitiveProperty(PropertyExpression),

    /// Symmetric property
    SymmetricProperty(PropertyExpression),

    /// Property disjointness
    DisjointProperties(Vec<PropertyExpression>),

    /// Same individual
    SameIndividual(Vec<Individual>),

    /// Different individuals
    DifferentIndividuals(Vec<Individual>),

    /// Class assertion with complex class
    ClassAssertion(ClassExpression, Individual),

    /// Object property assertion
    ObjectPropertyAssertion(PropertyExpression, Individual, Individual),

    /// Negative object property assertion
    NegativeObjectPropertyAssertion(PropertyExpression, Individual, Individual),

    /// Data property assertion
    DataPropertyAssertion(PropertyExpression, Individual, Literal),
}

impl Axiom {
    pub fn kind(&self) -> AxiomKind {
        match self {
            Axiom::SubClassOf(..) | Axiom::EquivalentClasses(_) | Axiom::DisjointClasses(_) => {
                AxiomKind::TBox
            }
            // Domains and ranges are role metadata even though they mention classes
            Axiom::SubPropertyOf(..)
            | Axiom::EquivalentProperties(_)
            | Axiom::ObjectPropertyDomain(..)
            | Axiom::ObjectPropertyRange(..)
            | Axiom::FunctionalProperty(_)
            | Axiom::InverseFunctionalProperty(_)
            | Axiom::TransitiveProperty(_)
            | Axiom::SymmetricProperty(_)
            | Axiom::DisjointProperties(_) => AxiomKind::RBox,
            Axiom::SameIndividual(_)
            | Axiom::DifferentIndividuals(_)
            | Axiom::ClassAssertion(..)
            | Axiom::ObjectPropertyAssertion(..)
            | Axiom::NegativeObjectPropertyAssertion(..)
            | Axiom::DataPropertyAssertion(..) => AxiomKind::ABox,
        }
    }

    /// Individuals mentioned directly by an assertion
    pub fn individuals(&self) -> Vec<&Individual> {
        match self {
            Axiom::SameIndividual(list) | Axiom::DifferentIndividuals(list) => list.iter().collect(),
            Axiom::ClassAssertion(_, i) | Axiom::DataPropertyAssertion(_, i, _) => vec![i],
            Axiom::ObjectPropertyAssertion(_, s, o)
            | Axiom::NegativeObjectPropertyAssertion(_, s, o) => vec![s, o],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, name: &str, items: &[T]) -> fmt::Result {
            write!(f, "{}(", name)?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, ")")
        }

        match self {
            Axiom::SubClassOf(sub, sup) => write!(f, "SubClassOf({} {})", sub, sup),
            Axiom::EquivalentClasses(cs) => list(f, "EquivalentClasses", cs),
            Axiom::DisjointClasses(cs) => list(f, "DisjointClasses", cs),
            Axiom::SubPropertyOf(sub, sup) => write!(f, "SubPropertyOf({} {})", sub, sup),
            Axiom::EquivalentProperties(ps) => list(f, "EquivalentProperties", ps),
            Axiom::ObjectPropertyDomain(p, c) => write!(f, "PropertyDomain({} {})", p, c),
            Axiom::ObjectPropertyRange(p, c) => write!(f, "PropertyRange({} {})", p, c),
            Axiom::FunctionalProperty(p) => write!(f, "FunctionalProperty({})", p),
            Axiom::InverseFunctionalProperty(p) => write!(f, "InverseFunctionalProperty({})", p),
            Axiom::TransitiveProperty(p) => write!(f, "TransitiveProperty({})", p),
            Axiom::SymmetricProperty(p) => write!(f, "SymmetricProperty({})", p),
            Axiom::DisjointProperties(ps) => list(f, "DisjointProperties", ps),
            Axiom::SameIndividual(is) => list(f, "SameIndividual", is),
            Axiom::DifferentIndividuals(is) => list(f, "DifferentIndividuals", is),
            Axiom::ClassAssertion(c, i) => write!(f, "ClassAssertion({} {})", c, i),
            Axiom::ObjectPropertyAssertion(p, s, o) => {
                write!(f, "ObjectPropertyAssertion({} {} {})", p, s, o)
            }
            Axiom::NegativeObjectPropertyAssertion(p, s, o) => {
                write!(f, "NegativeObjectPropertyAssertion({} {} {})", p, s, o)
            }
            Axiom::DataPropertyAssertion(p, s, l) => {
                write!(f, "DataPropertyAssertion({} {} {})", p, s, l)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str) -> Concept {
        Concept::atom(format!("http://example.org/{}", name))
    }

    #[test]
    fn test_conjunction_is_order_insensitive() {
        let c1 = Concept::and(vec![atom("A"), atom("B")]);
        let c2 = Concept::and(vec![atom("B"), Concept::and(vec![atom("A"), Concept::Top])]);
        assert_eq!(c1, c2);
    }

    #[test]
    fn test_degenerate_connectives() {
        assert_eq!(Concept::and(vec![]), Concept::Top);
        assert_eq!(Concept::or(vec![]), Concept::Bottom);
        assert_eq!(Concept::and(vec![atom("A"), Concept::Bottom]), Concept::Bottom);
        assert_eq!(Concept::or(vec![atom("A"), Concept::Top]), Concept::Top);
        assert_eq!(Concept::and(vec![atom("A"), atom("A")]), atom("A"));
    }

    #[test]
    fn test_complement_pair_is_kept_for_the_tableau() {
        let c = Concept::and(vec![atom("A"), atom("A").negate()]);
        assert!(matches!(c, Concept::And(ref ops) if ops.len() == 2));
    }

    #[test]
    fn test_negation_normal_form() {
        let r = Role::new("http://example.org/r");
        let expr = ClassExpression::some(
            PropertyExpression::object("http://example.org/r"),
            ClassExpression::named("http://example.org/A"),
        )
        .not();

        assert_eq!(
            expr.to_concept(),
            Concept::forall(r.clone(), atom("A").negate())
        );

        let at_most = Concept::at_most(2, r.clone(), Concept::Top);
        assert_eq!(at_most.negate(), Concept::at_least(3, r.clone(), Concept::Top));
        assert_eq!(Concept::at_least(1, r.clone(), Concept::Top).negate(), Concept::at_most(0, r, Concept::Top));
    }

    #[test]
    fn test_exact_cardinality_splits() {
        let expr = ClassExpression::ExactCardinality {
            cardinality: 1,
            property: PropertyExpression::object("http://example.org/r"),
            class: None,
        };
        match expr.to_concept() {
            Concept::And(ops) => {
                assert_eq!(ops.len(), 2);
                assert!(ops.iter().any(|c| matches!(c, Concept::AtLeast(1, _, _))));
                assert!(ops.iter().any(|c| matches!(c, Concept::AtMost(1, _, _))));
            }
            other => panic!("Expected conjunction, got {}", other),
        }
    }

    #[test]
    fn test_one_of_becomes_nominal_disjunction() {
        let expr = ClassExpression::OneOf(vec![
            Individual::new("http://example.org/a"),
            Individual::new("http://example.org/b"),
        ]);
        let concept = expr.to_concept();
        assert!(concept.has_nominals());
        assert!(matches!(concept, Concept::Or(ref ops) if ops.len() == 2));
    }

    #[test]
    fn test_inverse_property_role() {
        let p = PropertyExpression::object("http://example.org/hasParent").inverse();
        let role = p.to_role();
        assert!(role.inverse);
        assert_eq!(role.inverse(), Role::new("http://example.org/hasParent"));
        assert_eq!(
            PropertyExpression::object("http://example.org/p").inverse().inverse().to_role(),
            Role::new("http://example.org/p")
        );
    }

    #[test]
    fn test_axiom_kinds() {
        let a = Individual::new("http://example.org/a");
        let c = ClassExpression::named("http://example.org/C");
        assert_eq!(Axiom::ClassAssertion(c.clone(), a).kind(), AxiomKind::ABox);
        assert_eq!(Axiom::SubClassOf(c.clone(), ClassExpression::Thing).kind(), AxiomKind::TBox);
        assert_eq!(
            Axiom::ObjectPropertyDomain(PropertyExpression::object("http://example.org/p"), c).kind(),
            AxiomKind::RBox
        );
    }
}
