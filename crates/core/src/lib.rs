//! # IdeaHub Core
//!
//! Client-side business logic for IdeaHub:
//! - the idea record model and its wire format
//! - form drafts, validation and payload building
//! - clients for the remote idea store (HTTP and in-memory)
//! - a keyed query cache with in-flight deduplication and invalidate-after-write
//! - mutation tracking that refuses duplicate in-flight submissions
//! - [`IdeaService`], the create/read/update contract tying these together
//!
//! **No presentation concerns**: routing, HTML and the CLI belong in `ideahub-web` and
//! `ideahub-cli`.

pub mod api;
pub mod config;
pub mod constants;
pub mod draft;
pub mod error;
pub mod model;
pub mod mutation;
pub mod query;
pub mod service;

pub use api::{HttpIdeaApi, IdeaApi, InMemoryIdeaApi};
pub use config::CoreConfig;
pub use draft::IdeaDraft;
pub use error::{DraftField, IdeaError, IdeaResult, ValidationError};
pub use ideahub_types::{NonEmptyText, TagList, TextError};
pub use model::{Idea, IdeaId, IdeaPatch, NewIdea};
pub use mutation::{MutationKey, MutationState, MutationTracker, SubmissionId};
pub use query::QueryCache;
pub use service::{AllIdeas, IdeaService};
