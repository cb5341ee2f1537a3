//! What the presentation layer sees and what it may ask for.
//!
//! [`BoardView`] is a plain snapshot of the four columns. [`Intent`] is the
//! closed set of requests a front end can send back.

use crate::artifact::{ArtifactKind, Card, Task};
use crate::id::ArtifactId;
use crate::store::ArtifactStore;
use serde::Serialize;

/// Character limit for card previews on the board.
pub const PREVIEW_CHARS: usize = 100;

/// One card as rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub kind: ArtifactKind,
    pub id: ArtifactId,
    pub text: String,
    /// Linked to the selected task (or is the selected task).
    pub highlighted: bool,
}

impl CardView {
    /// Text cut to `limit` characters, with `…` appended when cut.
    pub fn preview(&self, limit: usize) -> String {
        truncate_chars(&self.text, limit)
    }
}

/// Cut `text` to at most `limit` chars; mark the cut with `…`.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}…", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Snapshot of the whole board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub requirements: Vec<CardView>,
    pub epics: Vec<CardView>,
    pub stories: Vec<CardView>,
    pub tasks: Vec<CardView>,
    pub selected_task: Option<ArtifactId>,
}

impl BoardView {
    /// Build the snapshot, marking the selected task and its recorded ancestors.
    pub fn build(store: &ArtifactStore, selected: Option<&Task>) -> Self {
        let is = |linked: Option<ArtifactId>, id: ArtifactId| linked == Some(id);
        let req_link = selected.map(Task::requirement_id);
        let epic_link = selected.map(Task::epic_id);
        let story_link = selected.map(Task::story_id);
        let task_link = selected.map(|t| t.id());

        Self {
            requirements: cards(store.requirements(), |id| is(req_link, id)),
            epics: cards(store.epics(), |id| is(epic_link, id)),
            stories: cards(store.stories(), |id| is(story_link, id)),
            tasks: cards(store.tasks(), |id| is(task_link, id)),
            selected_task: task_link,
        }
    }

    /// Cards of one column.
    pub fn column(&self, kind: ArtifactKind) -> &[CardView] {
        match kind {
            ArtifactKind::Requirement => &self.requirements,
            ArtifactKind::Epic => &self.epics,
            ArtifactKind::Story => &self.stories,
            ArtifactKind::Task => &self.tasks,
        }
    }

    /// Every highlighted card, left to right.
    pub fn highlighted(&self) -> Vec<&CardView> {
        ArtifactKind::ALL
            .iter()
            .flat_map(|k| self.column(*k))
            .filter(|c| c.highlighted)
            .collect()
    }
}

fn cards<T: Card>(records: &[T], highlight: impl Fn(ArtifactId) -> bool) -> Vec<CardView> {
    records
        .iter()
        .map(|r| CardView {
            kind: T::KIND,
            id: r.id(),
            text: r.text().to_string(),
            highlighted: highlight(r.id()),
        })
        .collect()
}

/// A request from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AddRequirement { text: String },
    Edit { kind: ArtifactKind, id: ArtifactId, text: String },
    Delete { kind: ArtifactKind, id: ArtifactId },
    ConvertToEpic { requirement_id: ArtifactId },
    ExpandEpic { epic_id: ArtifactId },
    BreakStory { story_id: ArtifactId },
    SelectTask { task_id: ArtifactId },
}

impl Intent {
    /// Column that receives new cards when this intent succeeds.
    pub fn creates(&self) -> Option<ArtifactKind> {
        match self {
            Intent::AddRequirement { .. } => Some(ArtifactKind::Requirement),
            Intent::ConvertToEpic { .. } => Some(ArtifactKind::Epic),
            Intent::ExpandEpic { .. } => Some(ArtifactKind::Story),
            Intent::BreakStory { .. } => Some(ArtifactKind::Task),
            Intent::Edit { .. } | Intent::Delete { .. } | Intent::SelectTask { .. } => None,
        }
    }

    /// Whether applying this intent calls the completion backend.
    pub fn is_generation(&self) -> bool {
        matches!(
            self,
            Intent::ConvertToEpic { .. } | Intent::ExpandEpic { .. } | Intent::BreakStory { .. }
        )
    }
}

/// What an applied intent changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// New records, in creation order.
    Created(Vec<ArtifactId>),
    /// An existing record was edited, removed or selected.
    Updated,
    /// Nothing changed (blank input, unknown id, empty generation).
    Unchanged,
}

impl Outcome {
    pub(crate) fn from_flag(changed: bool) -> Self {
        if changed {
            Outcome::Updated
        } else {
            Outcome::Unchanged
        }
    }

    pub(crate) fn from_created(ids: Vec<ArtifactId>) -> Self {
        if ids.is_empty() {
            Outcome::Unchanged
        } else {
            Outcome::Created(ids)
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Outcome::Unchanged)
    }
}
