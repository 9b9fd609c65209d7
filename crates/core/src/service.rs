//! The idea CRUD contract.
//!
//! [`IdeaService`] wires an [`IdeaApi`] to the read caches and the mutation tracker. It is
//! built once at startup and passed to every consumer; clones share the same caches.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::api::IdeaApi;
use crate::draft::IdeaDraft;
use crate::model::{Idea, IdeaId};
use crate::mutation::{MutationKey, MutationState, MutationTracker, SubmissionId};
use crate::query::QueryCache;
use crate::{CoreConfig, IdeaResult};

/// Cache key for the list of all ideas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllIdeas;

pub struct IdeaService<A> {
    api: Arc<A>,
    ideas: QueryCache<IdeaId, Idea>,
    idea_list: QueryCache<AllIdeas, Vec<Idea>>,
    mutations: MutationTracker,
}

impl<A> Clone for IdeaService<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            ideas: self.ideas.clone(),
            idea_list: self.idea_list.clone(),
            mutations: self.mutations.clone(),
        }
    }
}

impl<A: IdeaApi> IdeaService<A> {
    pub fn new(api: A, cfg: &CoreConfig) -> Self {
        Self::with_stale_time(api, cfg.stale_time())
    }

    pub fn with_stale_time(api: A, stale_time: Option<std::time::Duration>) -> Self {
        Self {
            api: Arc::new(api),
            ideas: QueryCache::new(stale_time),
            idea_list: QueryCache::new(stale_time),
            mutations: MutationTracker::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch-one, served from cache when possible. Route loaders use this.
    pub async fn ensure_idea(&self, id: &IdeaId) -> IdeaResult<Idea> {
        let api = Arc::clone(&self.api);
        let key = id.clone();
        self.ideas
            .ensure(id.clone(), move || async move { api.fetch_idea(&key).await })
            .await
    }

    /// Fetch-one that bypasses cached data.
    pub async fn refetch_idea(&self, id: &IdeaId) -> IdeaResult<Idea> {
        let api = Arc::clone(&self.api);
        let key = id.clone();
        self.ideas
            .fetch(id.clone(), move || async move { api.fetch_idea(&key).await })
            .await
    }

    pub async fn ensure_ideas(&self) -> IdeaResult<Vec<Idea>> {
        let api = Arc::clone(&self.api);
        self.idea_list
            .ensure(AllIdeas, move || async move { api.list_ideas().await })
            .await
    }

    pub fn cached_idea(&self, id: &IdeaId) -> Option<Idea> {
        self.ideas.get(id)
    }

    /// Validates `draft` and creates the idea.
    ///
    /// A draft with an empty required field fails with `Validation` and never reaches the
    /// store. On success the list cache and any cache entry for the new id are invalidated.
    pub async fn create_idea(&self, submission: SubmissionId, draft: &IdeaDraft) -> IdeaResult<Idea> {
        let new_idea = draft.validate()?;

        let result = self
            .mutations
            .run(MutationKey::Create(submission), self.api.create_idea(new_idea))
            .await;

        match &result {
            Ok(idea) => {
                info!(id = %idea.id, "created idea");
                self.ideas.invalidate(&idea.id);
                self.idea_list.invalidate(&AllIdeas);
            }
            Err(e) => warn!("create idea failed: {e}"),
        }
        result
    }

    /// Replaces the idea's fields with `draft`, stamping `updated_at` now.
    ///
    /// On success the cached fetch-one for `id` and the list cache are invalidated.
    pub async fn update_idea(&self, id: &IdeaId, draft: &IdeaDraft) -> IdeaResult<Idea> {
        let patch = draft.to_patch(Utc::now());

        let result = self
            .mutations
            .run(MutationKey::Update(id.clone()), self.api.update_idea(id, patch))
            .await;

        match &result {
            Ok(_) => {
                info!(%id, "updated idea");
                self.ideas.invalidate(id);
                self.idea_list.invalidate(&AllIdeas);
            }
            Err(e) => warn!(%id, "update idea failed: {e}"),
        }
        result
    }

    pub fn mutation_status(&self, key: &MutationKey) -> MutationState {
        self.mutations.status(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryIdeaApi;
    use crate::{DraftField, IdeaError, ValidationError};

    fn service() -> IdeaService<InMemoryIdeaApi> {
        IdeaService::with_stale_time(InMemoryIdeaApi::new(), None)
    }

    fn kettle() -> IdeaDraft {
        IdeaDraft::new("Solar Kettle", "Boils with sunlight", "...", "eco, travel")
    }

    #[tokio::test]
    async fn test_create_returns_persisted_record_with_parsed_tags() {
        let svc = service();
        let idea = svc.create_idea(SubmissionId::new(), &kettle()).await.unwrap();

        assert!(!idea.id.as_str().is_empty());
        assert_eq!(idea.title, "Solar Kettle");
        assert_eq!(idea.summary, "Boils with sunlight");
        assert_eq!(idea.description, "...");
        assert_eq!(idea.tags, vec!["eco", "travel"]);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_store() {
        let svc = service();
        let draft = kettle().with_summary("  ");

        let err = svc.create_idea(SubmissionId::new(), &draft).await.unwrap_err();
        assert!(matches!(
            err,
            IdeaError::Validation(ValidationError::EmptyFields(ref fields)) if fields == &[DraftField::Summary]
        ));
        assert_eq!(svc.api().create_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_then_fetch_round_trips() {
        let svc = service();
        let created = svc.create_idea(SubmissionId::new(), &kettle()).await.unwrap();
        let fetched = svc.ensure_idea(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_invalidates_cached_list() {
        let svc = service();
        assert!(svc.ensure_ideas().await.unwrap().is_empty());

        svc.create_idea(SubmissionId::new(), &kettle()).await.unwrap();
        let ideas = svc.ensure_ideas().await.unwrap();
        assert_eq!(ideas.len(), 1);
        assert_eq!(svc.api().list_calls(), 2);
    }

    #[tokio::test]
    async fn test_update_invalidates_cached_idea() {
        let svc = service();
        let created = svc.create_idea(SubmissionId::new(), &kettle()).await.unwrap();
        svc.ensure_idea(&created.id).await.unwrap();
        assert!(svc.cached_idea(&created.id).is_some());

        let edited = IdeaDraft::from_idea(&created).with_title("Solar Kettle v2");
        svc.update_idea(&created.id, &edited).await.unwrap();
        assert!(svc.cached_idea(&created.id).is_none());

        let fetched = svc.ensure_idea(&created.id).await.unwrap();
        assert_eq!(fetched.title, "Solar Kettle v2");
        assert!(fetched.updated_at.is_some());
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_is_idempotent_for_identical_drafts() {
        let svc = service();
        let created = svc.create_idea(SubmissionId::new(), &kettle()).await.unwrap();
        let edited = IdeaDraft::from_idea(&created).with_tags("eco,  travel, solar");

        let first = svc.update_idea(&created.id, &edited).await.unwrap();
        let second = svc.update_idea(&created.id, &edited).await.unwrap();

        let strip = |idea: Idea| Idea {
            updated_at: None,
            ..idea
        };
        assert_eq!(strip(first), strip(second));
    }

    #[tokio::test]
    async fn test_update_unknown_idea_is_not_found() {
        let svc = service();
        let err = svc
            .update_idea(&IdeaId::new("missing"), &kettle())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_ensure_idea_hits_store_once() {
        let svc = service();
        let created = svc.create_idea(SubmissionId::new(), &kettle()).await.unwrap();

        svc.ensure_idea(&created.id).await.unwrap();
        svc.ensure_idea(&created.id).await.unwrap();
        assert_eq!(svc.api().fetch_calls(), 1);

        svc.refetch_idea(&created.id).await.unwrap();
        assert_eq!(svc.api().fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_and_releases_submission() {
        let svc = service();
        let submission = SubmissionId::new();
        svc.api().set_offline(true);

        let err = svc.create_idea(submission, &kettle()).await.unwrap_err();
        assert!(matches!(err, IdeaError::Transport(_)));
        assert!(svc
            .mutation_status(&MutationKey::Create(submission))
            .is_idle());

        svc.api().set_offline(false);
        assert!(svc.create_idea(submission, &kettle()).await.is_ok());
    }
}
