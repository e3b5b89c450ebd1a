//! OWL DL テーブロー整合性検査エンジン
//!
//! このクレートは SROIQ 系の知識ベースに対する整合性検査を提供します:
//! - 完全グラフ (individuals, literals, edges) とコピーオンライト共有
//! - 依存集合による依存指向バックジャンプ (dependency-directed backjumping)
//! - 衝突 (clash) の検出と公理レベルの説明
//! - 概念充足可能性キャッシュ
//! - 表現力に応じて選ばれる展開戦略 (EL / tableau)
//! - ABox 変更の差分整合性検査

pub mod dependency;
pub mod clash;
pub mod branch;
pub mod graph;
pub mod cache;
pub mod timer;
pub mod config;
pub mod strategy;
pub mod incremental;
pub mod reasoner;

pub use dependency::{BranchSet, DependencySet, NO_BRANCH};
pub use clash::{Clash, ClashType};
pub use branch::{Branch, BranchKind};
pub use graph::{CompletionGraph, Edge, EdgeList, GraphStats, LiteralState, Node, NodeId, NodeKind, NodeName};
pub use cache::{CacheStats, CachedModel, CachedNode, ConceptCache, Known};
pub use timer::{CancelHandle, Timer};
pub use config::{ReasonerConfig, ResetPolicy};
pub use strategy::{CompletionSession, CompletionStrategy, Expansion, Strategy};
pub use incremental::ChangeTracker;
pub use reasoner::{KnowledgeBase, PropertyValue, ReasonerStats};

use mimizuku_core::{DatatypeError, Individual};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReasonerError {
    #[error("Timeout after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("Reasoning was cancelled")]
    Cancelled,

    #[error("Session aborted by an earlier timeout or cancellation; reset the knowledge base")]
    SessionAborted,

    #[error("Unknown individual: {0}")]
    UnknownIndividual(Individual),

    #[error("Datatype error: {0}")]
    Datatype(#[from] DatatypeError),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl ReasonerError {
    /// Errors after which the knowledge base refuses further queries
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReasonerError::Timeout { .. } | ReasonerError::Cancelled)
    }
}
