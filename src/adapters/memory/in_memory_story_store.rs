//! In-memory story store.
//!
//! Serves stories and content units to the consumers and keeps what they
//! write back. Used by the demo binary and tests; failures can be injected
//! per operation to exercise the consumers' abort paths.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::analysis::StoryAnalysis;
use crate::domain::comic::Artifact;
use crate::domain::foundation::{DomainError, ErrorCode, StoryId};
use crate::domain::story::{ContentUnit, Story};
use crate::ports::{StoryContentProvider, StoryResultSink};

/// Operations whose failure can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    GetStory,
    GetContentUnits,
    UpdateAnalysis,
    SaveArtifact,
}

#[derive(Default)]
struct StoreState {
    stories: HashMap<StoryId, Story>,
    units: HashMap<StoryId, Vec<ContentUnit>>,
    /// Every analysis write, in order.
    analysis_writes: Vec<(StoryId, StoryAnalysis)>,
    artifacts: Vec<Artifact>,
    failing: Vec<StoreOperation>,
}

/// Story store backed by process memory.
#[derive(Default)]
pub struct InMemoryStoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a story with its content units, replacing any previous one.
    pub fn insert_story(&self, story: Story, mut units: Vec<ContentUnit>) {
        units.sort_by_key(|u| u.position);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.units.insert(story.id, units);
        state.stories.insert(story.id, story);
    }

    /// Makes every later call of `operation` fail.
    pub fn fail_on(&self, operation: StoreOperation) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.failing.push(operation);
    }

    /// Latest analysis stored for a story.
    pub fn analysis_for(&self, id: StoryId) -> Option<StoryAnalysis> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .analysis_writes
            .iter()
            .rev()
            .find(|(story_id, _)| *story_id == id)
            .map(|(_, analysis)| analysis.clone())
    }

    /// Number of analysis writes performed for a story.
    pub fn analysis_write_count(&self, id: StoryId) -> usize {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .analysis_writes
            .iter()
            .filter(|(story_id, _)| *story_id == id)
            .count()
    }

    /// All artifact records, in save order.
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .artifacts
            .clone()
    }

    fn check(&self, operation: StoreOperation) -> Result<(), DomainError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if state.failing.contains(&operation) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Injected failure for {:?}", operation),
            ));
        }
        Ok(())
    }
}

fn not_found(id: StoryId) -> DomainError {
    DomainError::new(ErrorCode::StoryNotFound, format!("Story {} not found", id))
        .with_detail("story_id", id.to_string())
}

#[async_trait]
impl StoryContentProvider for InMemoryStoryStore {
    async fn get_story(&self, id: StoryId) -> Result<Story, DomainError> {
        self.check(StoreOperation::GetStory)?;
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.stories.get(&id).cloned().ok_or_else(|| not_found(id))
    }

    async fn get_content_units(&self, id: StoryId) -> Result<Vec<ContentUnit>, DomainError> {
        self.check(StoreOperation::GetContentUnits)?;
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.units.get(&id).cloned().ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl StoryResultSink for InMemoryStoryStore {
    async fn update_story_analysis(
        &self,
        id: StoryId,
        analysis: &StoryAnalysis,
    ) -> Result<(), DomainError> {
        self.check(StoreOperation::UpdateAnalysis)?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !state.stories.contains_key(&id) {
            return Err(not_found(id));
        }
        state.analysis_writes.push((id, analysis.clone()));
        Ok(())
    }

    async fn save_artifact(&self, artifact: Artifact) -> Result<(), DomainError> {
        self.check(StoreOperation::SaveArtifact)?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.artifacts.push(artifact);
        Ok(())
    }
}
