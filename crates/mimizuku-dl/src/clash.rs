//! 衝突 (clash) の種類と説明

use crate::dependency::DependencySet;
use crate::graph::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a contradiction found in the completion graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClashType {
    Atomic,
    Bottom,
    Nominal,
    MinMax,
    MaxCardinality,
    FunctionalCardinality,
    MaxZero,
    DisjointProperties,
    InvalidLiteral,
    EmptyDatatype,
    ValueDatatype,
    LiteralMerge,
}

impl ClashType {
    /// Message template, `{0}`, `{1}`, ... refer to the clash arguments
    pub fn template(&self) -> &'static str {
        match self {
            ClashType::Atomic => "{0} has both {1} and its complement",
            ClashType::Bottom => "{0} has type owl:Nothing",
            ClashType::Nominal => "{0} and {1} must be both the same and different",
            ClashType::MinMax => "{0} has at least {1} and at most {2} {3} successors",
            ClashType::MaxCardinality => {
                "{0} has more than {1} distinct {2} successors"
            }
            ClashType::FunctionalCardinality => {
                "{0} has distinct values for the functional property {1}"
            }
            ClashType::MaxZero => "{0} cannot have any {1} successor but has {2}",
            ClashType::DisjointProperties => {
                "{0} is connected to {1} by the disjoint properties {2} and {3}"
            }
            ClashType::InvalidLiteral => "{0} is not a valid literal",
            ClashType::EmptyDatatype => "No value satisfies the data ranges of {0}: {1}",
            ClashType::ValueDatatype => "Literal {0} is not a member of {1}",
            ClashType::LiteralMerge => "Literals {0} and {1} with different values were merged",
        }
    }
}

/// A detected contradiction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clash {
    pub node: NodeId,
    pub kind: ClashType,
    pub depends: DependencySet,
    pub args: Vec<String>,
}

impl Clash {
    pub fn new(node: NodeId, kind: ClashType, depends: DependencySet, args: Vec<String>) -> Self {
        Self {
            node,
            kind,
            depends,
            args,
        }
    }

    /// Template filled in with the clash arguments
    pub fn describe(&self) -> String {
        let mut message = self.kind.template().to_string();
        for (i, arg) in self.args.iter().enumerate() {
            message = message.replace(&format!("{{{}}}", i), arg);
        }
        message
    }
}

impl fmt::Display for Clash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {} {}", self.kind, self.describe(), self.depends)
    }
}
