//! Generation pipeline: prompt construction, the completion call, and
//! splitting the raw response into artifact texts.
//!
//! Each stage embeds caller text into a prompt template, asks the backend
//! for a completion with the session model, and parses the reply:
//!
//! - epics are a single trimmed block of text
//! - stories are separated by `<<<SPLIT>>>`
//! - tasks are separated by `<<<TASK_SPLIT>>>`
//!
//! # Preamble filtering
//!
//! Models sometimes open with "Here are the stories:" even when told not
//! to. After splitting, any segment that starts with the preamble phrase is
//! dropped. This is a phrasing heuristic: a reply in another language or
//! with different wording slips through as an ordinary item.

use crate::completion::{CompletionBackend, CompletionError, CompletionParams};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

const EPIC_TEMPLATE: &str = include_str!("prompts/epic.txt");
const STORIES_TEMPLATE: &str = include_str!("prompts/stories.txt");
const TASKS_TEMPLATE: &str = include_str!("prompts/tasks.txt");

/// Delimiter placed after each generated user story.
pub const STORY_DELIMITER: &str = "<<<SPLIT>>>";

/// Delimiter placed after each generated task.
pub const TASK_DELIMITER: &str = "<<<TASK_SPLIT>>>";

/// How a multi-item response is cut into items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRule {
    pub delimiter: &'static str,
    /// Segments starting with this phrase are discarded.
    pub preamble: &'static str,
    /// Compare the preamble ignoring ASCII case.
    pub case_insensitive: bool,
}

/// Story responses: exact-case "Here are" filter.
pub const STORY_SPLIT: SplitRule = SplitRule {
    delimiter: STORY_DELIMITER,
    preamble: "Here are",
    case_insensitive: false,
};

/// Task responses: any-case "here are" filter.
pub const TASK_SPLIT: SplitRule = SplitRule {
    delimiter: TASK_DELIMITER,
    preamble: "here are",
    case_insensitive: true,
};

/// Pipeline stage, carried on errors so the UI can say what failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Epic,
    Stories,
    Tasks,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GenerationStage::Epic => "epic",
            GenerationStage::Stories => "user stories",
            GenerationStage::Tasks => "tasks",
        })
    }
}

/// The completion call for a stage failed or timed out.
#[derive(Debug, Error)]
#[error("{stage} generation failed: {source}")]
pub struct GenerationError {
    pub stage: GenerationStage,
    #[source]
    pub source: CompletionError,
}

/// Split `raw` on the rule's delimiter, trim each piece, and drop empty
/// and preamble segments. Order of appearance is preserved.
pub fn split_items(raw: &str, rule: &SplitRule) -> Vec<String> {
    raw.split(rule.delimiter)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter(|segment| {
            let keep = !starts_with_preamble(segment, rule);
            if !keep {
                tracing::warn!(
                    preamble = rule.preamble,
                    "dropping conversational preamble from generated response"
                );
            }
            keep
        })
        .map(str::to_string)
        .collect()
}

fn starts_with_preamble(segment: &str, rule: &SplitRule) -> bool {
    if !rule.case_insensitive {
        return segment.starts_with(rule.preamble);
    }
    segment
        .get(..rule.preamble.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(rule.preamble))
}

/// Fill `{name}` placeholders in a single pass, so substituted text is
/// never itself scanned for placeholders.
fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let template = template.trim_end();
    let mut out = String::with_capacity(template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let hit = values.iter().find_map(|(name, value)| {
            let token_len = name.len() + 2;
            let matches = tail.len() >= token_len
                && tail[1..].starts_with(name)
                && tail[1 + name.len()..].starts_with('}');
            matches.then_some((token_len, *value))
        });
        match hit {
            Some((token_len, value)) => {
                out.push_str(value);
                rest = &tail[token_len..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Prompt asking for one epic derived from a requirement.
pub fn epic_prompt(requirement_text: &str) -> String {
    render_template(EPIC_TEMPLATE, &[("requirement", requirement_text)])
}

/// Prompt asking for delimited user stories under an epic.
pub fn stories_prompt(epic_text: &str, requirement_text: &str) -> String {
    render_template(
        STORIES_TEMPLATE,
        &[
            ("delimiter", STORY_DELIMITER),
            ("epic", epic_text),
            ("requirement", requirement_text),
        ],
    )
}

/// Prompt asking for delimited one-sentence tasks for a story.
pub fn tasks_prompt(story_text: &str) -> String {
    render_template(
        TASKS_TEMPLATE,
        &[("delimiter", TASK_DELIMITER), ("story", story_text)],
    )
}

/// Runs the three generation stages against a completion backend.
pub struct Generator<B> {
    backend: B,
    model: String,
    params: CompletionParams,
    timeout: Duration,
}

impl<B: CompletionBackend> Generator<B> {
    pub fn new(backend: B, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            params: CompletionParams::default(),
            timeout: Duration::from_secs(90),
        }
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generate the body of an epic. Whitespace-only replies yield `""`.
    pub async fn generate_epic(&self, requirement_text: &str) -> Result<String, GenerationError> {
        let raw = self
            .call(GenerationStage::Epic, &epic_prompt(requirement_text))
            .await?;
        Ok(raw.trim().to_string())
    }

    /// Generate user stories for an epic, in response order.
    pub async fn generate_user_stories(
        &self,
        epic_text: &str,
        requirement_text: &str,
    ) -> Result<Vec<String>, GenerationError> {
        let raw = self
            .call(
                GenerationStage::Stories,
                &stories_prompt(epic_text, requirement_text),
            )
            .await?;
        Ok(split_items(&raw, &STORY_SPLIT))
    }

    /// Break a story into one-sentence tasks, in response order.
    pub async fn break_story_into_tasks(
        &self,
        story_text: &str,
    ) -> Result<Vec<String>, GenerationError> {
        let raw = self
            .call(GenerationStage::Tasks, &tasks_prompt(story_text))
            .await?;
        Ok(split_items(&raw, &TASK_SPLIT))
    }

    async fn call(&self, stage: GenerationStage, prompt: &str) -> Result<String, GenerationError> {
        tracing::debug!(%stage, model = %self.model, prompt_len = prompt.len(), "requesting completion");

        let pending = self.backend.complete(&self.model, prompt, self.params);
        let result = match tokio::time::timeout(self.timeout, pending).await {
            Ok(result) => result,
            Err(_) => Err(CompletionError::Timeout(self.timeout)),
        };

        result.map_err(|source| {
            tracing::error!(%stage, error = %source, "generation call failed");
            GenerationError { stage, source }
        })
    }
}
