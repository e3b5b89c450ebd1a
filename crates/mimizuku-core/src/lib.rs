//! OWL DL 項モデルと公理ストア
//!
//! このクレートはテーブロー推論エンジンが消費するものを提供します:
//! - OWL DL の構文 (ClassExpression, PropertyExpression, Axiom)
//! - 否定標準形の概念 (Concept) とロール (Role)
//! - TBox / RBox インデックスを持つ公理ストア (Ontology)
//! - XSD データ型の正規化と値空間の充足可能性判定

pub mod model;
pub mod expressivity;
pub mod ontology;
pub mod datatype;

pub use model::{
    Axiom, AxiomKind, ClassExpression, Concept, Individual, Literal, OwlIri, PropertyExpression,
    Role,
};
pub use expressivity::Expressivity;
pub use ontology::{Definition, Ontology, RBox, TBox};
pub use datatype::{DatatypeError, DatatypeReasoner, LiteralValue, XsdDatatypes};
