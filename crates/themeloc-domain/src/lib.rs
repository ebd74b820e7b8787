use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Classification of every key path that differs between the previous
/// snapshot of the authoritative tree and its current state. The three
/// lists are disjoint and sorted ascending; removed subtrees collapse to
/// their highest removed path while added subtrees enumerate every
/// descendant leaf path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChangeSet {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// What one synchronization pass would do to a single target language.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LanguagePlan {
    pub lang: String,
    /// Key paths that would be sent to the translation provider.
    pub translate: Vec<String>,
    /// Key paths that would be deleted from the target tree.
    pub remove: Vec<String>,
}

/// Dry-run output for one document kind.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncPlan {
    pub kind: String,
    pub changes: ChangeSet,
    pub languages: Vec<LanguagePlan>,
}

/// Per-language counters for one applied synchronization pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LanguageStat {
    pub lang: String,
    /// Keys filled or overwritten through the translation provider.
    pub translated: usize,
    /// Non-string leaves copied verbatim from the authoritative tree.
    pub copied: usize,
    /// Keys left untouched because a translation was already provided.
    pub skipped: usize,
    /// Keys (or whole subtrees) deleted from the target tree.
    pub removed: usize,
    /// Keys left absent because the provider failed; retried on the next run.
    pub failed: usize,
}

/// Result of one applied pass over a document kind.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncSummary {
    pub kind: String,
    pub changes: ChangeSet,
    pub languages: Vec<LanguageStat>,
}
