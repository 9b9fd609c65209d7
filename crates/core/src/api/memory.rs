use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use uuid::Uuid;

use super::IdeaApi;
use crate::model::{Idea, IdeaId, IdeaPatch, NewIdea};
use crate::{IdeaError, IdeaResult};

#[derive(Debug, Default)]
struct CallCounts {
    list: AtomicUsize,
    fetch: AtomicUsize,
    create: AtomicUsize,
    update: AtomicUsize,
}

/// Process-local idea store.
///
/// Assigns ids and `created_at` the way the remote store does, keeps insertion order for
/// listing, and counts calls so callers can assert which requests reached the store.
/// Setting it offline makes every call fail with `Transport`.
#[derive(Debug, Default)]
pub struct InMemoryIdeaApi {
    ideas: RwLock<Vec<Idea>>,
    offline: AtomicBool,
    calls: CallCounts,
}

impl InMemoryIdeaApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ideas(ideas: Vec<Idea>) -> Self {
        Self {
            ideas: RwLock::new(ideas),
            ..Self::default()
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.calls.list.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.calls.fetch.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.calls.create.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.calls.update.load(Ordering::SeqCst)
    }

    /// Snapshot of the stored ideas without counting a call.
    pub fn snapshot(&self) -> Vec<Idea> {
        self.ideas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_online(&self) -> IdeaResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(IdeaError::Transport("idea store is offline".into()));
        }
        Ok(())
    }
}

impl IdeaApi for InMemoryIdeaApi {
    async fn list_ideas(&self) -> IdeaResult<Vec<Idea>> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.snapshot())
    }

    async fn fetch_idea(&self, id: &IdeaId) -> IdeaResult<Idea> {
        self.calls.fetch.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.ideas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|idea| &idea.id == id)
            .cloned()
            .ok_or_else(|| IdeaError::NotFound { id: id.clone() })
    }

    async fn create_idea(&self, new_idea: NewIdea) -> IdeaResult<Idea> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let id = IdeaId::new(Uuid::new_v4().simple().to_string());
        let idea = Idea::from_new(id, new_idea, Utc::now());
        self.ideas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(idea.clone());
        Ok(idea)
    }

    async fn update_idea(&self, id: &IdeaId, patch: IdeaPatch) -> IdeaResult<Idea> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let mut ideas = self.ideas.write().unwrap_or_else(PoisonError::into_inner);
        let idea = ideas
            .iter_mut()
            .find(|idea| &idea.id == id)
            .ok_or_else(|| IdeaError::NotFound { id: id.clone() })?;
        idea.apply(patch);
        Ok(idea.clone())
    }
}
