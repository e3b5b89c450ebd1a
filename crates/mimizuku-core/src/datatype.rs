//! XSD データ型推論

use crate::model::{Literal, OwlIri};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_INT: &str = "http://www.w3.org/2001/XMLSchema#int";
pub const XSD_NON_NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
pub const RDFS_LITERAL: &str = "http://www.w3.org/2000/01/rdf-schema#Literal";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatatypeError {
    #[error("Unknown datatype: {0}")]
    UnknownDatatype(OwlIri),

    #[error("Invalid lexical form \"{lexical}\" for datatype {datatype}")]
    InvalidLexicalForm { lexical: String, datatype: OwlIri },
}

/// Canonical value of a literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LiteralValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl LiteralValue {
    /// Canonical lexical form typed with the primitive datatype
    pub fn to_literal(&self) -> Literal {
        match self {
            LiteralValue::String(s) => Literal::string(s.clone()),
            LiteralValue::Integer(i) => Literal::integer(*i),
            LiteralValue::Boolean(b) => Literal::boolean(*b),
        }
    }
}

/// Literal canonicalization and value-space reasoning
pub trait DatatypeReasoner {
    fn is_known(&self, datatype: &OwlIri) -> bool;

    fn canonical(&self, literal: &Literal) -> Result<LiteralValue, DatatypeError>;

    fn is_member(&self, value: &LiteralValue, datatype: &OwlIri) -> bool;

    /// Whether some value belongs to every datatype in `positive` and to none in `negative`
    fn is_satisfiable(&self, positive: &[OwlIri], negative: &[OwlIri]) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    String,
    Boolean,
    Integer,
}

fn family(datatype: &str) -> Option<Family> {
    match datatype {
        XSD_STRING => Some(Family::String),
        XSD_BOOLEAN => Some(Family::Boolean),
        XSD_INTEGER | XSD_INT | XSD_NON_NEGATIVE_INTEGER => Some(Family::Integer),
        _ => None,
    }
}

/// The XSD subset supported out of the box
#[derive(Debug, Clone, Copy, Default)]
pub struct XsdDatatypes;

impl XsdDatatypes {
    pub fn new() -> Self {
        Self
    }

    // One representative per region where membership in the integer types is constant
    const INTEGER_WITNESSES: [i64; 4] = [i32::MIN as i64 - 1, -1, 0, i32::MAX as i64 + 1];
}

impl DatatypeReasoner for XsdDatatypes {
    fn is_known(&self, datatype: &OwlIri) -> bool {
        datatype.as_str() == RDFS_LITERAL || family(datatype.as_str()).is_some()
    }

    fn canonical(&self, literal: &Literal) -> Result<LiteralValue, DatatypeError> {
        let invalid = || DatatypeError::InvalidLexicalForm {
            lexical: literal.lexical.clone(),
            datatype: literal.datatype.clone(),
        };

        let datatype = literal.datatype.as_str();
        if datatype == RDFS_LITERAL {
            return Ok(LiteralValue::String(literal.lexical.clone()));
        }

        let value = match family(datatype) {
            Some(Family::String) => LiteralValue::String(literal.lexical.clone()),
            Some(Family::Boolean) => match literal.lexical.trim() {
                "true" | "1" => LiteralValue::Boolean(true),
                "false" | "0" => LiteralValue::Boolean(false),
                _ => return Err(invalid()),
            },
            Some(Family::Integer) => {
                let lexical = literal.lexical.trim();
                let lexical = lexical.strip_prefix('+').unwrap_or(lexical);
                LiteralValue::Integer(lexical.parse::<i64>().map_err(|_| invalid())?)
            }
            None => return Err(DatatypeError::UnknownDatatype(literal.datatype.clone())),
        };

        if self.is_member(&value, &literal.datatype) {
            Ok(value)
        } else {
            Err(invalid())
        }
    }

    fn is_member(&self, value: &LiteralValue, datatype: &OwlIri) -> bool {
        match (value, datatype.as_str()) {
            (_, RDFS_LITERAL) => true,
            (LiteralValue::String(_), XSD_STRING) => true,
            (LiteralValue::Boolean(_), XSD_BOOLEAN) => true,
            (LiteralValue::Integer(_), XSD_INTEGER) => true,
            (LiteralValue::Integer(i), XSD_INT) => i32::try_from(*i).is_ok(),
            (LiteralValue::Integer(i), XSD_NON_NEGATIVE_INTEGER) => *i >= 0,
            _ => false,
        }
    }

    fn is_satisfiable(&self, positive: &[OwlIri], negative: &[OwlIri]) -> bool {
        if negative.iter().any(|d| d.as_str() == RDFS_LITERAL) {
            return false;
        }

        let positive: Vec<&OwlIri> = positive
            .iter()
            .filter(|d| d.as_str() != RDFS_LITERAL)
            .collect();
        let Some(first) = positive.first() else {
            return true;
        };

        // Unknown datatypes are opaque: disjoint from everything but themselves
        let Some(fam) = family(first.as_str()) else {
            return positive.iter().all(|d| d == first) && !negative.contains(first);
        };
        if positive.iter().any(|d| family(d.as_str()) != Some(fam)) {
            return false;
        }

        let witnesses: Vec<LiteralValue> = match fam {
            Family::String => vec![LiteralValue::String(String::new())],
            Family::Boolean => vec![LiteralValue::Boolean(false)],
            Family::Integer => Self::INTEGER_WITNESSES
                .iter()
                .map(|i| LiteralValue::Integer(*i))
                .collect(),
        };

        witnesses.iter().any(|value| {
            positive.iter().all(|d| self.is_member(value, d))
                && !negative.iter().any(|d| self.is_member(value, d))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(s: &str) -> OwlIri {
        OwlIri::new(s)
    }

    #[test]
    fn test_canonical_integer() {
        let dt = XsdDatatypes::new();
        assert_eq!(
            dt.canonical(&Literal::new("+42", XSD_INTEGER)).unwrap(),
            LiteralValue::Integer(42)
        );
        assert_eq!(
            dt.canonical(&Literal::new("42", XSD_INT)).unwrap().to_literal(),
            Literal::integer(42)
        );
    }

    #[test]
    fn test_invalid_lexical_forms() {
        let dt = XsdDatatypes::new();
        assert!(matches!(
            dt.canonical(&Literal::new("forty-two", XSD_INTEGER)),
            Err(DatatypeError::InvalidLexicalForm { .. })
        ));
        assert!(matches!(
            dt.canonical(&Literal::new("-1", XSD_NON_NEGATIVE_INTEGER)),
            Err(DatatypeError::InvalidLexicalForm { .. })
        ));
        assert!(matches!(
            dt.canonical(&Literal::new("maybe", XSD_BOOLEAN)),
            Err(DatatypeError::InvalidLexicalForm { .. })
        ));
    }

    #[test]
    fn test_unknown_datatype() {
        let dt = XsdDatatypes::new();
        let result = dt.canonical(&Literal::new("x", "http://example.org/custom"));
        assert_eq!(
            result,
            Err(DatatypeError::UnknownDatatype(iri("http://example.org/custom")))
        );
    }

    #[test]
    fn test_value_space_satisfiability() {
        let dt = XsdDatatypes::new();
        assert!(dt.is_satisfiable(&[iri(XSD_INTEGER), iri(XSD_INT)], &[]));
        assert!(!dt.is_satisfiable(&[iri(XSD_STRING), iri(XSD_INTEGER)], &[]));
        assert!(dt.is_satisfiable(&[iri(XSD_INTEGER)], &[iri(XSD_NON_NEGATIVE_INTEGER)]));
        assert!(!dt.is_satisfiable(&[iri(XSD_NON_NEGATIVE_INTEGER)], &[iri(XSD_INTEGER)]));
        // Large positive integers are outside xsd:int but still non-negative
        assert!(dt.is_satisfiable(&[iri(XSD_NON_NEGATIVE_INTEGER)], &[iri(XSD_INT)]));
        assert!(!dt.is_satisfiable(&[], &[iri(RDFS_LITERAL)]));
    }
}
