//! Idea store clients.
//!
//! [`IdeaApi`] is the seam between the CRUD contract and the remote store. [`HttpIdeaApi`]
//! talks to the real service; [`InMemoryIdeaApi`] behaves like the store and is used in tests
//! and local development.

mod http;
mod memory;

pub use http::HttpIdeaApi;
pub use memory::InMemoryIdeaApi;

use std::future::Future;

use crate::model::{Idea, IdeaId, IdeaPatch, NewIdea};
use crate::IdeaResult;

pub trait IdeaApi: Send + Sync + 'static {
    fn list_ideas(&self) -> impl Future<Output = IdeaResult<Vec<Idea>>> + Send;
    fn fetch_idea(&self, id: &IdeaId) -> impl Future<Output = IdeaResult<Idea>> + Send;
    fn create_idea(&self, new_idea: NewIdea) -> impl Future<Output = IdeaResult<Idea>> + Send;
    fn update_idea(
        &self,
        id: &IdeaId,
        patch: IdeaPatch,
    ) -> impl Future<Output = IdeaResult<Idea>> + Send;
}
