//! Board - the primary public API for sprint planning.
//!
//! A [`Board`] is one planning session: the artifact store, the id
//! allocator, the selected task and the generation pipeline. Every
//! operation runs to completion and returns what changed; callers
//! re-render from [`Board::view`] afterwards.

use crate::artifact::{ArtifactKind, Card, Epic, Requirement, Story, Task};
use crate::completion::{CompletionBackend, CompletionParams};
use crate::id::{ArtifactId, IdAllocator};
use crate::pipeline::{GenerationError, Generator};
use crate::store::ArtifactStore;
use crate::view::{BoardView, Intent, Outcome};
use std::time::Duration;
use thiserror::Error;

/// Default model identifier used for every generation call.
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";

/// Errors from Board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Invalid configuration value.
#[derive(Debug, Error)]
#[error("invalid value for {key}: {value:?} ({reason})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Configuration for a planning board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// Model identifier sent with every completion.
    pub model: String,

    /// Maximum tokens per completion.
    pub max_tokens: usize,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Upper bound on a single completion call.
    pub timeout: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardConfig {
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2048,
            temperature: Some(0.7),
            timeout: Duration::from_secs(90),
        }
    }

    /// Build a config from `PLANNER_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Some(model) = lookup("PLANNER_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(raw) = lookup("PLANNER_MAX_TOKENS") {
            config.max_tokens = parse_value("PLANNER_MAX_TOKENS", &raw)?;
        }
        if let Some(raw) = lookup("PLANNER_TIMEOUT_SECS") {
            let secs: u64 = parse_value("PLANNER_TIMEOUT_SECS", &raw)?;
            if secs == 0 {
                return Err(ConfigError {
                    key: "PLANNER_TIMEOUT_SECS",
                    value: raw,
                    reason: "must be at least 1".to_string(),
                });
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("PLANNER_TEMPERATURE") {
            let temp: f32 = parse_value("PLANNER_TEMPERATURE", &raw)?;
            if !(0.0..=1.0).contains(&temp) {
                return Err(ConfigError {
                    key: "PLANNER_TEMPERATURE",
                    value: raw,
                    reason: "must be between 0.0 and 1.0".to_string(),
                });
            }
            config.temperature = Some(temp);
        }

        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn params(&self) -> CompletionParams {
        CompletionParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// A sprint planning board.
///
/// Owns all session state; there is no process-wide board. For several
/// concurrent users, give each user a `Board` of their own.
pub struct Board<B> {
    store: ArtifactStore,
    ids: IdAllocator,
    selected: Option<Task>,
    generator: Generator<B>,
    config: BoardConfig,
}

impl<B: CompletionBackend> Board<B> {
    /// Create an empty board generating through `backend`.
    pub fn new(backend: B, config: BoardConfig) -> Self {
        let generator = Generator::new(backend, config.model.clone())
            .with_params(config.params())
            .with_timeout(config.timeout);
        Self {
            store: ArtifactStore::new(),
            ids: IdAllocator::new(),
            selected: None,
            generator,
            config,
        }
    }

    /// Add a requirement typed by the user.
    ///
    /// Text is trimmed; blank input is ignored and returns `None`.
    pub fn add_requirement(&mut self, text: &str) -> Option<ArtifactId> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("ignoring blank requirement");
            return None;
        }
        let id = self.ids.next_id();
        self.store.append(Requirement::new(id, text));
        tracing::info!(%id, "requirement added");
        Some(id)
    }

    /// Generate an epic from a requirement.
    ///
    /// Returns `Ok(None)` when the requirement no longer exists or the
    /// model produced only whitespace.
    pub async fn convert_to_epic(
        &mut self,
        requirement_id: ArtifactId,
    ) -> Result<Option<ArtifactId>, BoardError> {
        let Some(requirement) = self.store.requirement(requirement_id) else {
            tracing::debug!(%requirement_id, "convert_to_epic on missing requirement");
            return Ok(None);
        };
        let requirement_text = requirement.text().to_string();

        let epic_text = self.generator.generate_epic(&requirement_text).await?;
        if epic_text.is_empty() {
            tracing::warn!(%requirement_id, "epic generation returned no text");
            return Ok(None);
        }

        let id = self.ids.next_id();
        self.store.append(Epic::new(id, epic_text, requirement_id));
        tracing::info!(%id, %requirement_id, "epic created");
        Ok(Some(id))
    }

    /// Generate user stories under an epic.
    ///
    /// The originating requirement text is sent along; if that requirement
    /// was deleted an empty string is used instead.
    pub async fn expand_epic_to_stories(
        &mut self,
        epic_id: ArtifactId,
    ) -> Result<Vec<ArtifactId>, BoardError> {
        let Some(epic) = self.store.epic(epic_id) else {
            tracing::debug!(%epic_id, "expand_epic_to_stories on missing epic");
            return Ok(Vec::new());
        };
        let epic_text = epic.text().to_string();
        let requirement_id = epic.requirement_id();
        let requirement_text = self
            .store
            .requirement(requirement_id)
            .map(|r| r.text().to_string())
            .unwrap_or_default();

        let stories = self
            .generator
            .generate_user_stories(&epic_text, &requirement_text)
            .await?;
        if stories.is_empty() {
            tracing::warn!(%epic_id, "story generation produced no stories");
        }

        let created = stories
            .into_iter()
            .map(|text| {
                let id = self.ids.next_id();
                self.store.append(Story::new(id, text, epic_id, requirement_id));
                id
            })
            .collect::<Vec<_>>();
        tracing::info!(%epic_id, count = created.len(), "stories created");
        Ok(created)
    }

    /// Break a story into tasks.
    pub async fn break_story(&mut self, story_id: ArtifactId) -> Result<Vec<ArtifactId>, BoardError> {
        let Some(story) = self.store.story(story_id) else {
            tracing::debug!(%story_id, "break_story on missing story");
            return Ok(Vec::new());
        };
        let story_text = story.text().to_string();
        let epic_id = story.epic_id();
        let requirement_id = story.requirement_id();

        let tasks = self.generator.break_story_into_tasks(&story_text).await?;
        if tasks.is_empty() {
            tracing::warn!(%story_id, "task generation produced no tasks");
        }

        let created = tasks
            .into_iter()
            .map(|text| {
                let id = self.ids.next_id();
                self.store
                    .append(Task::new(id, text, story_id, epic_id, requirement_id));
                id
            })
            .collect::<Vec<_>>();
        tracing::info!(%story_id, count = created.len(), "tasks created");
        Ok(created)
    }

    /// Replace a record's text. Ids and links never change.
    pub fn edit(&mut self, kind: ArtifactKind, id: ArtifactId, new_text: impl Into<String>) -> bool {
        let edited = self.store.set_text(kind, id, new_text);
        if !edited {
            tracing::debug!(%kind, %id, "edit on missing record");
        }
        edited
    }

    /// Delete a record. Children are left in place.
    ///
    /// Deleting the selected task clears the selection.
    pub fn delete(&mut self, kind: ArtifactKind, id: ArtifactId) -> bool {
        let removed = self.store.remove(kind, id);
        if kind == ArtifactKind::Task && self.selected.as_ref().is_some_and(|t| t.id() == id) {
            self.selected = None;
        }
        if removed {
            tracing::info!(%kind, %id, "record deleted");
        }
        removed
    }

    /// Select a task for highlighting. Unknown ids leave the selection as is.
    pub fn select_task(&mut self, task_id: ArtifactId) -> bool {
        match self.store.task(task_id) {
            Some(task) => {
                self.selected = Some(task.clone());
                true
            }
            None => false,
        }
    }

    /// Drop the current selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Copy of the selected task, as it was when selected.
    pub fn selection(&self) -> Option<&Task> {
        self.selected.as_ref()
    }

    /// Dispatch one presentation-layer intent.
    pub async fn apply(&mut self, intent: Intent) -> Result<Outcome, BoardError> {
        let outcome = match intent {
            Intent::AddRequirement { text } => match self.add_requirement(&text) {
                Some(id) => Outcome::Created(vec![id]),
                None => Outcome::Unchanged,
            },
            Intent::Edit { kind, id, text } => Outcome::from_flag(self.edit(kind, id, text)),
            Intent::Delete { kind, id } => Outcome::from_flag(self.delete(kind, id)),
            Intent::ConvertToEpic { requirement_id } => self
                .convert_to_epic(requirement_id)
                .await?
                .map_or(Outcome::Unchanged, |id| Outcome::Created(vec![id])),
            Intent::ExpandEpic { epic_id } => {
                Outcome::from_created(self.expand_epic_to_stories(epic_id).await?)
            }
            Intent::BreakStory { story_id } => Outcome::from_created(self.break_story(story_id).await?),
            Intent::SelectTask { task_id } => Outcome::from_flag(self.select_task(task_id)),
        };
        Ok(outcome)
    }

    /// Snapshot of all four columns with highlight flags.
    pub fn view(&self) -> BoardView {
        BoardView::build(&self.store, self.selected.as_ref())
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        self.generator.backend()
    }

    /// The id the next created record will receive.
    pub fn next_id(&self) -> ArtifactId {
        self.ids.peek()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_config_builder() {
        let config = BoardConfig::new()
            .with_model("claude-3-opus")
            .with_max_tokens(1024)
            .with_temperature(0.2)
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.model, "claude-3-opus");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.params().max_tokens, 1024);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = BoardConfig::from_lookup(|key| match key {
            "PLANNER_MODEL" => Some("my-model".to_string()),
            "PLANNER_MAX_TOKENS" => Some(" 800 ".to_string()),
            "PLANNER_TIMEOUT_SECS" => Some("15".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.model, "my-model");
        assert_eq!(config.max_tokens, 800);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.temperature, Some(0.7));
    }

    #[test]
    fn test_config_defaults_when_unset() {
        let config = BoardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, BoardConfig::new());
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let err = BoardConfig::from_lookup(|key| {
            (key == "PLANNER_MAX_TOKENS").then(|| "lots".to_string())
        })
        .unwrap_err();
        assert_eq!(err.key, "PLANNER_MAX_TOKENS");

        let err = BoardConfig::from_lookup(|key| {
            (key == "PLANNER_TIMEOUT_SECS").then(|| "0".to_string())
        })
        .unwrap_err();
        assert_eq!(err.key, "PLANNER_TIMEOUT_SECS");

        let err = BoardConfig::from_lookup(|key| {
            (key == "PLANNER_TEMPERATURE").then(|| "1.5".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("between 0.0 and 1.0"));
    }
}
