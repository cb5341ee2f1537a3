//! Testing utilities for the planning board.
//!
//! This module provides tools for integration testing:
//! - `MockBackend` for deterministic completions without API calls
//! - `TestHarness` for scripted board scenarios
//! - Assertion helpers for verifying board state

use crate::artifact::ArtifactKind;
use crate::board::{Board, BoardConfig};
use crate::completion::{CompletionBackend, CompletionError, CompletionParams};
use crate::id::ArtifactId;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// One call received by a [`MockBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub params: CompletionParams,
}

#[derive(Default)]
struct MockState {
    script: VecDeque<Result<String, String>>,
    calls: Vec<RecordedCall>,
}

/// A completion backend that returns scripted responses in order.
///
/// Once the script runs out every call returns an empty string.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
    delay: Option<Duration>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a successful response to the script.
    pub fn respond(self, text: impl Into<String>) -> Self {
        self.queue(text);
        self
    }

    /// Append a failing response to the script.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.queue_failure(message);
        self
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Append a successful response through a shared handle.
    pub fn queue(&self, text: impl Into<String>) {
        self.lock().script.push_back(Ok(text.into()));
    }

    /// Append a failing response through a shared handle.
    pub fn queue_failure(&self, message: impl Into<String>) {
        self.lock().script.push_back(Err(message.into()));
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lock().script.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<String, CompletionError> {
        let next = {
            let mut state = self.lock();
            state.calls.push(RecordedCall {
                model: model.to_string(),
                prompt: prompt.to_string(),
                params,
            });
            state.script.pop_front()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(CompletionError::Unavailable(message)),
            None => Ok(String::new()),
        }
    }
}

/// Test harness for running board scenarios.
pub struct TestHarness {
    /// The scripted backend, shared with the board.
    pub backend: Arc<MockBackend>,
    /// The board under test.
    pub board: Board<Arc<MockBackend>>,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Create a harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(BoardConfig::new().with_model("mock-model"))
    }

    pub fn with_config(config: BoardConfig) -> Self {
        let backend = Arc::new(MockBackend::new());
        let board = Board::new(Arc::clone(&backend), config);
        Self { backend, board }
    }

    /// Queue a completion response.
    pub fn expect_completion(&mut self, text: impl Into<String>) -> &mut Self {
        self.backend.queue(text);
        self
    }

    /// Queue a completion failure.
    pub fn expect_failure(&mut self, message: impl Into<String>) -> &mut Self {
        self.backend.queue_failure(message);
        self
    }

    /// Add a requirement that must be accepted.
    #[track_caller]
    pub fn requirement(&mut self, text: &str) -> ArtifactId {
        match self.board.add_requirement(text) {
            Some(id) => id,
            None => panic!("requirement {text:?} was rejected"),
        }
    }

    /// Texts of one column, in display order.
    pub fn texts(&self, kind: ArtifactKind) -> Vec<String> {
        self.board
            .view()
            .column(kind)
            .iter()
            .map(|c| c.text.clone())
            .collect()
    }

    /// Ids of one column, in display order.
    pub fn ids(&self, kind: ArtifactKind) -> Vec<ArtifactId> {
        self.board.store().ids(kind)
    }

    /// Highlighted cards as (kind, id), left to right.
    pub fn highlighted(&self) -> Vec<(ArtifactKind, ArtifactId)> {
        self.board
            .view()
            .highlighted()
            .iter()
            .map(|c| (c.kind, c.id))
            .collect()
    }

    /// Number of completion calls made so far.
    pub fn call_count(&self) -> usize {
        self.backend.calls().len()
    }

    /// Prompt of the most recent completion call.
    pub fn last_prompt(&self) -> Option<String> {
        self.backend.calls().last().map(|c| c.prompt.clone())
    }

    #[track_caller]
    pub fn assert_column_len(&self, kind: ArtifactKind, expected: usize) {
        let actual = self.board.store().len(kind);
        assert_eq!(
            actual, expected,
            "expected {expected} {kind} records, found {actual}"
        );
    }

    #[track_caller]
    pub fn assert_ids_unique(&self) {
        let mut all: Vec<ArtifactId> = ArtifactKind::ALL
            .iter()
            .flat_map(|k| self.ids(*k))
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total, "duplicate ids on the board");
    }
}
