//! Per-run conversion state.

use indexmap::{IndexMap, IndexSet};
use sprout_core::{NodeId, TextRun};

/// Write-only collector of non-fatal problems.
///
/// Each distinct message is kept and logged once, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct WarningSink {
    messages: IndexSet<String>,
}

impl WarningSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning; repeats of an already seen message are ignored.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.messages.contains(&message) {
            tracing::warn!("{}", message);
            self.messages.insert(message);
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Styled runs of every text node in the snapshot, keyed by node id.
#[derive(Debug, Clone, Default)]
pub struct TextRunCache {
    runs: IndexMap<NodeId, Vec<TextRun>>,
}

impl TextRunCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, runs: Vec<TextRun>) {
        self.runs.insert(id, runs);
    }

    pub fn get(&self, id: &NodeId) -> Option<&[TextRun]> {
        self.runs.get(id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }
}

/// State owned by one conversion run.
///
/// The normalizer writes into it; generators only read.
#[derive(Debug, Clone, Default)]
pub struct ConversionContext {
    warnings: WarningSink,
    text_runs: TextRunCache,
}

impl ConversionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything from a previous run.
    pub fn reset(&mut self) {
        self.warnings.clear();
        self.text_runs.clear();
    }

    pub fn warnings(&self) -> &WarningSink {
        &self.warnings
    }

    pub fn warnings_mut(&mut self) -> &mut WarningSink {
        &mut self.warnings
    }

    pub fn text_runs(&self) -> &TextRunCache {
        &self.text_runs
    }

    pub fn text_runs_mut(&mut self) -> &mut TextRunCache {
        &mut self.text_runs
    }
}
