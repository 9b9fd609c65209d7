//! Mutation lifecycle and duplicate-submission guard.
//!
//! A mutation moves `Idle -> Pending -> Success | Error`. The tracker reports the first two
//! through [`MutationState`]; the outcome is the [`IdeaResult`] returned by
//! [`MutationTracker::run`]. While one is pending for a logical action, another submission of
//! the same action is refused with [`IdeaError::AlreadyPending`] before it reaches the store.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::IdeaId;
use crate::{IdeaError, IdeaResult};

/// Identifies one rendered create form, so a resubmission of the same form is recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(input: &str) -> IdeaResult<Self> {
        Uuid::parse_str(input.trim())
            .map(Self)
            .map_err(|e| IdeaError::InvalidInput(format!("invalid submission id: {e}")))
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MutationKey {
    Create(SubmissionId),
    Update(IdeaId),
}

impl std::fmt::Display for MutationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationKey::Create(submission) => write!(f, "create of submission {submission}"),
            MutationKey::Update(id) => write!(f, "update of idea {id}"),
        }
    }
}

/// Whether a mutation for a key is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Pending,
}

impl MutationState {
    pub fn is_idle(self) -> bool {
        self == MutationState::Idle
    }

    pub fn is_pending(self) -> bool {
        self == MutationState::Pending
    }
}

/// Set of mutations currently in flight.
#[derive(Clone, Default)]
pub struct MutationTracker {
    pending: Arc<DashSet<MutationKey>>,
}

/// Holds a key as pending until dropped.
pub struct MutationTicket {
    pending: Arc<DashSet<MutationKey>>,
    key: MutationKey,
}

impl Drop for MutationTicket {
    fn drop(&mut self) {
        self.pending.remove(&self.key);
    }
}

impl MutationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, key: MutationKey) -> IdeaResult<MutationTicket> {
        if !self.pending.insert(key.clone()) {
            return Err(IdeaError::AlreadyPending(key.to_string()));
        }
        Ok(MutationTicket {
            pending: Arc::clone(&self.pending),
            key,
        })
    }

    /// `Pending` while a mutation for `key` is in flight, `Idle` otherwise.
    pub fn status(&self, key: &MutationKey) -> MutationState {
        if self.pending.contains(key) {
            MutationState::Pending
        } else {
            MutationState::Idle
        }
    }

    /// Runs `mutation` with `key` held pending for its whole duration.
    pub async fn run<T, Fut>(&self, key: MutationKey, mutation: Fut) -> IdeaResult<T>
    where
        Fut: Future<Output = IdeaResult<T>>,
    {
        let _ticket = self.begin(key)?;
        mutation.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_duplicate_submission_is_rejected_while_pending() {
        let tracker = MutationTracker::new();
        let key = MutationKey::Update(IdeaId::new("1"));
        let (tx, rx) = oneshot::channel::<()>();

        let first = tracker.run(key.clone(), async move {
            rx.await.ok();
            Ok::<_, IdeaError>("saved")
        });
        let second = async {
            tokio::task::yield_now().await;
            assert!(tracker.status(&key).is_pending());
            let result = tracker.run(key.clone(), async { Ok("duplicate") }).await;
            tx.send(()).ok();
            result
        };

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first.unwrap(), "saved");
        assert!(matches!(second, Err(IdeaError::AlreadyPending(msg)) if msg == "update of idea 1"));
        assert!(tracker.status(&key).is_idle());
    }

    #[tokio::test]
    async fn test_key_is_released_after_failure() {
        let tracker = MutationTracker::new();
        let key = MutationKey::Create(SubmissionId::new());

        let result: IdeaResult<()> = tracker
            .run(key.clone(), async { Err(IdeaError::Transport("down".into())) })
            .await;
        assert!(result.is_err());
        assert!(tracker.status(&key).is_idle());
        assert!(tracker.begin(key).is_ok());
    }

    #[test]
    fn test_different_keys_do_not_block_each_other() {
        let tracker = MutationTracker::new();
        let _a = tracker.begin(MutationKey::Update(IdeaId::new("a"))).unwrap();
        let _b = tracker.begin(MutationKey::Update(IdeaId::new("b"))).unwrap();
        assert!(tracker
            .begin(MutationKey::Update(IdeaId::new("a")))
            .is_err());
    }

    #[test]
    fn test_submission_id_parse() {
        let id = SubmissionId::new();
        assert_eq!(SubmissionId::parse(&id.to_string()).unwrap(), id);
        assert!(SubmissionId::parse("not-a-uuid").is_err());
    }
}
