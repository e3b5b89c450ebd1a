//! 推論器の設定

use crate::ReasonerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which graph a query starts from after the knowledge base has been checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetPolicy {
    /// Every query starts from the unexpanded ABox graph
    Full,
    /// Queries reuse the completed graph when it holds no open choice point
    Partial,
}

/// Reasoner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerConfig {
    /// 説明 (axiom sets) を依存集合に記録する
    pub track_explanations: bool,

    /// 概念充足可能性キャッシュを使う
    pub use_cache: bool,

    /// キャッシュの最大エントリ数
    pub cache_capacity: usize,

    /// 1 回の検査のタイムアウト（ミリ秒）
    pub timeout_ms: Option<u64>,

    /// ABox の変更を完成済みグラフに差分適用する
    pub incremental_consistency: bool,

    pub reset_policy: ResetPolicy,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            track_explanations: false,
            use_cache: true,
            cache_capacity: 10_000,
            timeout_ms: None,
            incremental_consistency: false,
            reset_policy: ResetPolicy::Partial,
        }
    }
}

impl ReasonerConfig {
    pub fn from_json(json: &str) -> Result<Self, ReasonerError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ReasonerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn with_explanations(mut self) -> Self {
        self.track_explanations = true;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_incremental_consistency(mut self) -> Self {
        self.incremental_consistency = true;
        self
    }
}
