//! Artifact records: requirements, epics, user stories and tasks.
//!
//! Each kind is its own struct. Ids and ancestor links are fixed at
//! construction; only the text can change afterwards.

use crate::id::ArtifactId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Discriminant for the four artifact collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Requirement,
    Epic,
    Story,
    Task,
}

impl ArtifactKind {
    /// All kinds in board column order.
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Requirement,
        ArtifactKind::Epic,
        ArtifactKind::Story,
        ArtifactKind::Task,
    ];

    /// Lowercase name used in commands and logs.
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Requirement => "requirement",
            ArtifactKind::Epic => "epic",
            ArtifactKind::Story => "story",
            ArtifactKind::Task => "task",
        }
    }

    /// Column heading on the board.
    pub fn column_title(&self) -> &'static str {
        match self {
            ArtifactKind::Requirement => "Requirements",
            ArtifactKind::Epic => "Agile Epics",
            ArtifactKind::Story => "User Stories",
            ArtifactKind::Task => "Tasks",
        }
    }

    /// Position of this kind's column, left to right.
    pub fn column_index(&self) -> usize {
        match self {
            ArtifactKind::Requirement => 0,
            ArtifactKind::Epic => 1,
            ArtifactKind::Story => 2,
            ArtifactKind::Task => 3,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no artifact kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown artifact kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ArtifactKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "requirement" | "req" => Ok(ArtifactKind::Requirement),
            "epic" => Ok(ArtifactKind::Epic),
            "story" | "user-story" | "user_story" => Ok(ArtifactKind::Story),
            "task" => Ok(ArtifactKind::Task),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Ancestor link carried by child records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentField {
    RequirementId,
    EpicId,
    StoryId,
}

/// Behaviour shared by every artifact record.
pub trait Card {
    /// Which collection this record lives in.
    const KIND: ArtifactKind;

    fn id(&self) -> ArtifactId;

    fn text(&self) -> &str;

    /// Value of an ancestor link, or `None` when this kind does not carry it.
    fn parent(&self, field: ParentField) -> Option<ArtifactId>;

    #[doc(hidden)]
    fn replace_text(&mut self, text: String);
}

/// Free-text requirement entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    id: ArtifactId,
    text: String,
}

impl Requirement {
    pub fn new(id: ArtifactId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// Epic generated from one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epic {
    id: ArtifactId,
    text: String,
    requirement_id: ArtifactId,
}

impl Epic {
    pub fn new(id: ArtifactId, text: impl Into<String>, requirement_id: ArtifactId) -> Self {
        Self {
            id,
            text: text.into(),
            requirement_id,
        }
    }

    pub fn requirement_id(&self) -> ArtifactId {
        self.requirement_id
    }
}

/// User story generated from an epic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    id: ArtifactId,
    text: String,
    epic_id: ArtifactId,
    requirement_id: ArtifactId,
}

impl Story {
    pub fn new(
        id: ArtifactId,
        text: impl Into<String>,
        epic_id: ArtifactId,
        requirement_id: ArtifactId,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            epic_id,
            requirement_id,
        }
    }

    pub fn epic_id(&self) -> ArtifactId {
        self.epic_id
    }

    pub fn requirement_id(&self) -> ArtifactId {
        self.requirement_id
    }
}

/// Task broken out of a user story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: ArtifactId,
    text: String,
    story_id: ArtifactId,
    epic_id: ArtifactId,
    requirement_id: ArtifactId,
}

impl Task {
    pub fn new(
        id: ArtifactId,
        text: impl Into<String>,
        story_id: ArtifactId,
        epic_id: ArtifactId,
        requirement_id: ArtifactId,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            story_id,
            epic_id,
            requirement_id,
        }
    }

    pub fn story_id(&self) -> ArtifactId {
        self.story_id
    }

    pub fn epic_id(&self) -> ArtifactId {
        self.epic_id
    }

    pub fn requirement_id(&self) -> ArtifactId {
        self.requirement_id
    }
}

impl Card for Requirement {
    const KIND: ArtifactKind = ArtifactKind::Requirement;

    fn id(&self) -> ArtifactId {
        self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn parent(&self, _field: ParentField) -> Option<ArtifactId> {
        None
    }

    fn replace_text(&mut self, text: String) {
        self.text = text;
    }
}

impl Card for Epic {
    const KIND: ArtifactKind = ArtifactKind::Epic;

    fn id(&self) -> ArtifactId {
        self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn parent(&self, field: ParentField) -> Option<ArtifactId> {
        match field {
            ParentField::RequirementId => Some(self.requirement_id),
            ParentField::EpicId | ParentField::StoryId => None,
        }
    }

    fn replace_text(&mut self, text: String) {
        self.text = text;
    }
}

impl Card for Story {
    const KIND: ArtifactKind = ArtifactKind::Story;

    fn id(&self) -> ArtifactId {
        self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn parent(&self, field: ParentField) -> Option<ArtifactId> {
        match field {
            ParentField::RequirementId => Some(self.requirement_id),
            ParentField::EpicId => Some(self.epic_id),
            ParentField::StoryId => None,
        }
    }

    fn replace_text(&mut self, text: String) {
        self.text = text;
    }
}

impl Card for Task {
    const KIND: ArtifactKind = ArtifactKind::Task;

    fn id(&self) -> ArtifactId {
        self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn parent(&self, field: ParentField) -> Option<ArtifactId> {
        match field {
            ParentField::RequirementId => Some(self.requirement_id),
            ParentField::EpicId => Some(self.epic_id),
            ParentField::StoryId => Some(self.story_id),
        }
    }

    fn replace_text(&mut self, text: String) {
        self.text = text;
    }
}

/// Borrowed view of a record of any kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactRef<'a> {
    Requirement(&'a Requirement),
    Epic(&'a Epic),
    Story(&'a Story),
    Task(&'a Task),
}

impl<'a> ArtifactRef<'a> {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactRef::Requirement(_) => ArtifactKind::Requirement,
            ArtifactRef::Epic(_) => ArtifactKind::Epic,
            ArtifactRef::Story(_) => ArtifactKind::Story,
            ArtifactRef::Task(_) => ArtifactKind::Task,
        }
    }

    pub fn id(&self) -> ArtifactId {
        match self {
            ArtifactRef::Requirement(r) => r.id(),
            ArtifactRef::Epic(e) => e.id(),
            ArtifactRef::Story(s) => s.id(),
            ArtifactRef::Task(t) => t.id(),
        }
    }

    pub fn text(&self) -> &'a str {
        match self {
            ArtifactRef::Requirement(r) => &r.text,
            ArtifactRef::Epic(e) => &e.text,
            ArtifactRef::Story(s) => &s.text,
            ArtifactRef::Task(t) => &t.text,
        }
    }

    pub fn parent(&self, field: ParentField) -> Option<ArtifactId> {
        match self {
            ArtifactRef::Requirement(r) => r.parent(field),
            ArtifactRef::Epic(e) => e.parent(field),
            ArtifactRef::Story(s) => s.parent(field),
            ArtifactRef::Task(t) => t.parent(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> ArtifactId {
        ArtifactId::from_raw(raw)
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Epic".parse::<ArtifactKind>().unwrap(), ArtifactKind::Epic);
        assert_eq!("req".parse::<ArtifactKind>().unwrap(), ArtifactKind::Requirement);
        assert_eq!("user-story".parse::<ArtifactKind>().unwrap(), ArtifactKind::Story);
        assert_eq!(
            "bug".parse::<ArtifactKind>(),
            Err(UnknownKind("bug".to_string()))
        );
    }

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in ArtifactKind::ALL {
            assert_eq!(kind.name().parse::<ArtifactKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_column_order() {
        let indices: Vec<usize> = ArtifactKind::ALL.iter().map(|k| k.column_index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(ArtifactKind::Epic.column_title(), "Agile Epics");
    }

    #[test]
    fn test_parent_links() {
        let task = Task::new(id(9), "Write migration", id(5), id(3), id(1));
        assert_eq!(task.parent(ParentField::StoryId), Some(id(5)));
        assert_eq!(task.parent(ParentField::EpicId), Some(id(3)));
        assert_eq!(task.parent(ParentField::RequirementId), Some(id(1)));

        let epic = Epic::new(id(3), "Checkout", id(1));
        assert_eq!(epic.parent(ParentField::RequirementId), Some(id(1)));
        assert_eq!(epic.parent(ParentField::StoryId), None);

        let req = Requirement::new(id(1), "Users can pay");
        assert_eq!(req.parent(ParentField::RequirementId), None);
    }

    #[test]
    fn test_replace_text_keeps_links() {
        let mut story = Story::new(id(4), "old", id(2), id(1));
        story.replace_text("new".to_string());
        assert_eq!(story.text(), "new");
        assert_eq!(story.id(), id(4));
        assert_eq!(story.epic_id(), id(2));
        assert_eq!(story.requirement_id(), id(1));
    }

    #[test]
    fn test_artifact_ref_dispatch() {
        let epic = Epic::new(id(2), "Epic body", id(1));
        let r = ArtifactRef::Epic(&epic);
        assert_eq!(r.kind(), ArtifactKind::Epic);
        assert_eq!(r.id(), id(2));
        assert_eq!(r.text(), "Epic body");
        assert_eq!(r.parent(ParentField::RequirementId), Some(id(1)));
    }
}
