use crate::models::Assignment;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors surfaced by an assignment persistence backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("assignment not found: {0}")]
    NotFound(Uuid),

    #[error("conflicting assignment already persisted: {0}")]
    Conflict(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Durable home of assignment records
///
/// The engine computes and emits batches; the store owns their lifetime.
/// `persist_batch` must be all-or-nothing: either the whole batch lands or
/// nothing does. Backends are expected to enforce uniqueness on
/// (team, week_start, reviewer), which also serializes concurrent runs for
/// the same team and week.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Assignments for a team with `from <= week_start < to`
    async fn assignments_in_range(
        &self,
        team_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Assignment>, StoreError>;

    /// Persist a full weekly batch atomically
    async fn persist_batch(&self, batch: &[Assignment]) -> Result<(), StoreError>;

    async fn find_assignment(&self, id: Uuid) -> Result<Option<Assignment>, StoreError>;

    async fn update_assignment(&self, assignment: &Assignment) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: AssignmentStore + ?Sized> AssignmentStore for std::sync::Arc<T> {
    async fn assignments_in_range(
        &self,
        team_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Assignment>, StoreError> {
        (**self).assignments_in_range(team_id, from, to).await
    }

    async fn persist_batch(&self, batch: &[Assignment]) -> Result<(), StoreError> {
        (**self).persist_batch(batch).await
    }

    async fn find_assignment(&self, id: Uuid) -> Result<Option<Assignment>, StoreError> {
        (**self).find_assignment(id).await
    }

    async fn update_assignment(&self, assignment: &Assignment) -> Result<(), StoreError> {
        (**self).update_assignment(assignment).await
    }
}

/// In-memory store with the same uniqueness constraint a database would carry
///
/// Reference implementation used by tests and benchmarks.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    assignments: RwLock<Vec<Assignment>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed historical assignments without batch constraints
    pub async fn seed(&self, assignments: Vec<Assignment>) {
        self.assignments.write().await.extend(assignments);
    }

    pub async fn all(&self) -> Vec<Assignment> {
        self.assignments.read().await.clone()
    }
}

#[async_trait]
impl AssignmentStore for InMemoryStore {
    async fn assignments_in_range(
        &self,
        team_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Assignment>, StoreError> {
        let assignments = self.assignments.read().await;
        Ok(assignments
            .iter()
            .filter(|a| a.team_id == team_id && a.week_start >= from && a.week_start < to)
            .cloned()
            .collect())
    }

    async fn persist_batch(&self, batch: &[Assignment]) -> Result<(), StoreError> {
        let mut assignments = self.assignments.write().await;
        // Check the whole batch before touching anything
        for candidate in batch {
            let clash = assignments.iter().any(|existing| {
                existing.team_id == candidate.team_id
                    && existing.week_start == candidate.week_start
                    && existing.reviewer_id == candidate.reviewer_id
            });
            if clash {
                return Err(StoreError::Conflict(format!(
                    "reviewer {} already assigned for team {} week {}",
                    candidate.reviewer_id, candidate.team_id, candidate.week_start
                )));
            }
        }
        assignments.extend_from_slice(batch);
        Ok(())
    }

    async fn find_assignment(&self, id: Uuid) -> Result<Option<Assignment>, StoreError> {
        let assignments = self.assignments.read().await;
        Ok(assignments.iter().find(|a| a.id == id).cloned())
    }

    async fn update_assignment(&self, assignment: &Assignment) -> Result<(), StoreError> {
        let mut assignments = self.assignments.write().await;
        let slot = assignments
            .iter_mut()
            .find(|a| a.id == assignment.id)
            .ok_or(StoreError::NotFound(assignment.id))?;
        *slot = assignment.clone();
        Ok(())
    }
}
