//! In-memory artifact store.
//!
//! Four insertion-ordered collections, one per artifact kind. Every
//! operation is total: lookups return `None`, removals of unknown ids
//! report `false`.

use crate::artifact::{ArtifactKind, ArtifactRef, Card, Epic, ParentField, Requirement, Story, Task};
use crate::id::ArtifactId;
use serde::Serialize;

/// The four ordered artifact collections.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtifactStore {
    requirements: Vec<Requirement>,
    epics: Vec<Epic>,
    stories: Vec<Story>,
    tasks: Vec<Task>,
}

/// A record that can be appended to the store.
pub trait Stored: Card + Sized {
    #[doc(hidden)]
    fn column(store: &ArtifactStore) -> &Vec<Self>;
    #[doc(hidden)]
    fn column_mut(store: &mut ArtifactStore) -> &mut Vec<Self>;
}

impl Stored for Requirement {
    fn column(store: &ArtifactStore) -> &Vec<Self> {
        &store.requirements
    }
    fn column_mut(store: &mut ArtifactStore) -> &mut Vec<Self> {
        &mut store.requirements
    }
}

impl Stored for Epic {
    fn column(store: &ArtifactStore) -> &Vec<Self> {
        &store.epics
    }
    fn column_mut(store: &mut ArtifactStore) -> &mut Vec<Self> {
        &mut store.epics
    }
}

impl Stored for Story {
    fn column(store: &ArtifactStore) -> &Vec<Self> {
        &store.stories
    }
    fn column_mut(store: &mut ArtifactStore) -> &mut Vec<Self> {
        &mut store.stories
    }
}

impl Stored for Task {
    fn column(store: &ArtifactStore) -> &Vec<Self> {
        &store.tasks
    }
    fn column_mut(store: &mut ArtifactStore) -> &mut Vec<Self> {
        &mut store.tasks
    }
}

impl ArtifactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the end of its collection.
    pub fn append<T: Stored>(&mut self, record: T) {
        T::column_mut(self).push(record);
    }

    /// Remove the record with `id` from the `kind` collection.
    ///
    /// Returns whether a record was removed. Unknown ids are a no-op.
    pub fn remove(&mut self, kind: ArtifactKind, id: ArtifactId) -> bool {
        match kind {
            ArtifactKind::Requirement => remove_from(&mut self.requirements, id),
            ArtifactKind::Epic => remove_from(&mut self.epics, id),
            ArtifactKind::Story => remove_from(&mut self.stories, id),
            ArtifactKind::Task => remove_from(&mut self.tasks, id),
        }
    }

    /// Look up a record of any kind.
    pub fn find_by_id(&self, kind: ArtifactKind, id: ArtifactId) -> Option<ArtifactRef<'_>> {
        match kind {
            ArtifactKind::Requirement => self.requirement(id).map(ArtifactRef::Requirement),
            ArtifactKind::Epic => self.epic(id).map(ArtifactRef::Epic),
            ArtifactKind::Story => self.story(id).map(ArtifactRef::Story),
            ArtifactKind::Task => self.task(id).map(ArtifactRef::Task),
        }
    }

    /// All records of `kind` whose `field` equals `parent_id`, in insertion order.
    ///
    /// Kinds that do not carry `field` yield nothing.
    pub fn find_children(
        &self,
        kind: ArtifactKind,
        field: ParentField,
        parent_id: ArtifactId,
    ) -> Vec<ArtifactRef<'_>> {
        match kind {
            ArtifactKind::Requirement => Vec::new(),
            ArtifactKind::Epic => children_in(&self.epics, field, parent_id)
                .map(ArtifactRef::Epic)
                .collect(),
            ArtifactKind::Story => children_in(&self.stories, field, parent_id)
                .map(ArtifactRef::Story)
                .collect(),
            ArtifactKind::Task => children_in(&self.tasks, field, parent_id)
                .map(ArtifactRef::Task)
                .collect(),
        }
    }

    /// Replace the text of a record in place. Returns `false` if absent.
    pub fn set_text(&mut self, kind: ArtifactKind, id: ArtifactId, text: impl Into<String>) -> bool {
        let text = text.into();
        match kind {
            ArtifactKind::Requirement => set_text_in(&mut self.requirements, id, text),
            ArtifactKind::Epic => set_text_in(&mut self.epics, id, text),
            ArtifactKind::Story => set_text_in(&mut self.stories, id, text),
            ArtifactKind::Task => set_text_in(&mut self.tasks, id, text),
        }
    }

    pub fn requirement(&self, id: ArtifactId) -> Option<&Requirement> {
        find_in(&self.requirements, id)
    }

    pub fn epic(&self, id: ArtifactId) -> Option<&Epic> {
        find_in(&self.epics, id)
    }

    pub fn story(&self, id: ArtifactId) -> Option<&Story> {
        find_in(&self.stories, id)
    }

    pub fn task(&self, id: ArtifactId) -> Option<&Task> {
        find_in(&self.tasks, id)
    }

    pub fn epics_of_requirement(&self, requirement_id: ArtifactId) -> Vec<&Epic> {
        children_in(&self.epics, ParentField::RequirementId, requirement_id).collect()
    }

    pub fn stories_of_epic(&self, epic_id: ArtifactId) -> Vec<&Story> {
        children_in(&self.stories, ParentField::EpicId, epic_id).collect()
    }

    pub fn tasks_of_story(&self, story_id: ArtifactId) -> Vec<&Task> {
        children_in(&self.tasks, ParentField::StoryId, story_id).collect()
    }

    /// Records of one kind, in insertion order.
    pub fn all<T: Stored>(&self) -> &[T] {
        T::column(self)
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn epics(&self) -> &[Epic] {
        &self.epics
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of records of `kind`.
    pub fn len(&self, kind: ArtifactKind) -> usize {
        match kind {
            ArtifactKind::Requirement => self.requirements.len(),
            ArtifactKind::Epic => self.epics.len(),
            ArtifactKind::Story => self.stories.len(),
            ArtifactKind::Task => self.tasks.len(),
        }
    }

    /// Whether every collection is empty.
    pub fn is_empty(&self) -> bool {
        ArtifactKind::ALL.iter().all(|k| self.len(*k) == 0)
    }

    /// Ids of one column, in display order.
    pub fn ids(&self, kind: ArtifactKind) -> Vec<ArtifactId> {
        match kind {
            ArtifactKind::Requirement => self.requirements.iter().map(Card::id).collect(),
            ArtifactKind::Epic => self.epics.iter().map(Card::id).collect(),
            ArtifactKind::Story => self.stories.iter().map(Card::id).collect(),
            ArtifactKind::Task => self.tasks.iter().map(Card::id).collect(),
        }
    }
}

fn find_in<T: Card>(records: &[T], id: ArtifactId) -> Option<&T> {
    records.iter().find(|r| r.id() == id)
}

fn remove_from<T: Card>(records: &mut Vec<T>, id: ArtifactId) -> bool {
    let before = records.len();
    records.retain(|r| r.id() != id);
    records.len() != before
}

fn set_text_in<T: Card>(records: &mut [T], id: ArtifactId, text: String) -> bool {
    match records.iter_mut().find(|r| r.id() == id) {
        Some(record) => {
            record.replace_text(text);
            true
        }
        None => false,
    }
}

fn children_in<T: Card>(
    records: &[T],
    field: ParentField,
    parent_id: ArtifactId,
) -> impl Iterator<Item = &T> {
    records
        .iter()
        .filter(move |r| r.parent(field) == Some(parent_id))
}
