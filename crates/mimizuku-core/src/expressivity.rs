//! 表現力の判定

use crate::model::{Concept, Role};
use serde::{Deserialize, Serialize};

/// Language features used by a set of concepts and role axioms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expressivity {
    pub negation: bool,
    pub disjunction: bool,
    pub universal: bool,
    pub cardinality: bool,
    pub nominals: bool,
    pub inverses: bool,
    pub functional: bool,
    pub transitivity: bool,
    pub role_hierarchy: bool,
    pub role_disjointness: bool,
    pub datatypes: bool,
    pub general_axioms: bool,
}

impl Expressivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every feature `concept` uses
    pub fn visit(&mut self, concept: &Concept) {
        concept.visit(&mut |c| match c {
            Concept::NotAtom(_) => self.negation = true,
            Concept::Nominal(_) => self.nominals = true,
            Concept::NotNominal(_) => {
                self.nominals = true;
                self.negation = true;
            }
            Concept::Datatype(_) | Concept::NotDatatype(_) => self.datatypes = true,
            Concept::Or(_) => self.disjunction = true,
            Concept::Exists(role, _) => self.visit_role(role),
            Concept::Forall(role, _) => {
                self.universal = true;
                self.visit_role(role);
            }
            Concept::AtLeast(n, role, _) => {
                if *n > 1 {
                    self.cardinality = true;
                }
                self.visit_role(role);
            }
            Concept::AtMost(_, role, _) => {
                self.cardinality = true;
                self.visit_role(role);
            }
            _ => {}
        });
    }

    pub fn visit_role(&mut self, role: &Role) {
        if role.inverse {
            self.inverses = true;
        }
    }

    pub fn union(&self, other: &Expressivity) -> Expressivity {
        Expressivity {
            negation: self.negation || other.negation,
            disjunction: self.disjunction || other.disjunction,
            universal: self.universal || other.universal,
            cardinality: self.cardinality || other.cardinality,
            nominals: self.nominals || other.nominals,
            inverses: self.inverses || other.inverses,
            functional: self.functional || other.functional,
            transitivity: self.transitivity || other.transitivity,
            role_hierarchy: self.role_hierarchy || other.role_hierarchy,
            role_disjointness: self.role_disjointness || other.role_disjointness,
            datatypes: self.datatypes || other.datatypes,
            general_axioms: self.general_axioms || other.general_axioms,
        }
    }

    /// Whether the deterministic EL completion is complete for this input.
    ///
    /// Atomic negation is tolerated: a `¬A` label can only produce an
    /// atomic clash, which the EL rules detect as well.
    pub fn is_el(&self) -> bool {
        !(self.disjunction
            || self.universal
            || self.cardinality
            || self.nominals
            || self.inverses
            || self.functional
            || self.transitivity
            || self.role_disjointness
            || self.datatypes
            || self.general_axioms)
    }

    /// Conventional DL name, e.g. `SHOIQ(D)`
    pub fn dl_name(&self) -> String {
        if self.is_el() {
            let mut name = String::from("EL");
            if self.role_hierarchy {
                name.push('H');
            }
            return name;
        }

        let mut name = String::from(if self.transitivity { "S" } else { "ALC" });
        if self.role_hierarchy {
            name.push('H');
        }
        if self.nominals {
            name.push('O');
        }
        if self.inverses {
            name.push('I');
        }
        if self.cardinality {
            name.push('Q');
        } else if self.functional {
            name.push('F');
        }
        if self.datatypes {
            name.push_str("(D)");
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_el_detection() {
        let r = Role::new("http://example.org/r");
        let mut expr = Expressivity::new();
        expr.visit(&Concept::exists(r.clone(), Concept::atom("http://example.org/A")));
        assert!(expr.is_el());
        assert_eq!(expr.dl_name(), "EL");

        expr.visit(&Concept::forall(r, Concept::atom("http://example.org/B")));
        assert!(!expr.is_el());
        assert_eq!(expr.dl_name(), "ALC");
    }

    #[test]
    fn test_dl_name_features() {
        let expr = Expressivity {
            transitivity: true,
            role_hierarchy: true,
            nominals: true,
            inverses: true,
            cardinality: true,
            datatypes: true,
            ..Expressivity::default()
        };
        assert_eq!(expr.dl_name(), "SHOIQ(D)");
    }
}
