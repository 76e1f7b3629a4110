use crate::core::hungarian::{self, SolveError};
use crate::core::matrix::{build_cost_matrix, MatrixError};
use crate::core::validator::validate_batch;
use crate::models::{week_start_of, Assignment, AssignmentStatus, Member, PairingConfig};
use crate::services::{AssignmentStore, DirectoryError, MemberDirectory, StoreError};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Failures of a weekly assignment run or a manual override
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("assignment not found: {0}")]
    AssignmentNotFound(Uuid),

    #[error("override reviewee {reviewee_id} equals the assignment's reviewer")]
    InvalidOverride { reviewee_id: String },
}

/// Weekly assignment orchestrator for one team at a time
///
/// Fetches the roster and history through the collaborator traits, builds
/// the cost matrix, solves it, and maps the permutation back to member
/// identities. The core computation is synchronous and pure; only the
/// fetch and persist steps await the collaborators.
///
/// Concurrent runs for the same (team, week) are not serialized here; the
/// store's uniqueness constraint on (team, week, reviewer) is the backstop.
pub struct PairingEngine<D, S> {
    directory: D,
    store: S,
    config: PairingConfig,
}

impl<D, S> PairingEngine<D, S>
where
    D: MemberDirectory,
    S: AssignmentStore,
{
    pub fn new(directory: D, store: S, config: PairingConfig) -> Self {
        Self {
            directory,
            store,
            config,
        }
    }

    pub fn config(&self) -> &PairingConfig {
        &self.config
    }

    /// Compute and persist the weekly batch for a team
    ///
    /// `week_start` is snapped to the Monday of its week. Fewer than two
    /// active members is a valid terminal state and yields an empty batch.
    /// Persistence is all-or-nothing through the store contract.
    pub async fn run_weekly_assignment(
        &self,
        team_id: &str,
        week_start: NaiveDate,
    ) -> Result<Vec<Assignment>, EngineError> {
        let assignments = self.compute(team_id, week_start).await?;
        if assignments.is_empty() {
            return Ok(assignments);
        }

        self.store.persist_batch(&assignments).await?;
        info!(
            team_id,
            count = assignments.len(),
            "persisted weekly assignment batch"
        );
        Ok(assignments)
    }

    /// Dry-run variant: identical computation, nothing persisted
    pub async fn preview(
        &self,
        team_id: &str,
        week_start: NaiveDate,
    ) -> Result<Vec<Assignment>, EngineError> {
        self.compute(team_id, week_start).await
    }

    async fn compute(
        &self,
        team_id: &str,
        week_start: NaiveDate,
    ) -> Result<Vec<Assignment>, EngineError> {
        let week_start = week_start_of(week_start);

        let members = self.directory.active_members(team_id).await?;
        let members: Vec<Member> = members.into_iter().filter(|m| m.active).collect();
        if members.len() < 2 {
            warn!(
                team_id,
                count = members.len(),
                "fewer than 2 active members, skipping weekly assignment"
            );
            return Ok(Vec::new());
        }

        // One history fetch covers both the avoidance and the load windows
        let window_weeks = self
            .config
            .avoidance_window_weeks
            .max(self.config.load_window_weeks)
            .max(1);
        let from = week_start - Duration::weeks(i64::from(window_weeks));
        let history = self
            .store
            .assignments_in_range(team_id, from, week_start)
            .await?;
        let loads = self.load_counts(&history, week_start);

        debug!(
            team_id,
            members = members.len(),
            history = history.len(),
            %week_start,
            "building cost matrix"
        );

        let matrix = build_cost_matrix(&members, &history, &loads, week_start, &self.config)?;
        let permutation = hungarian::solve(matrix.costs())?;

        let mut assignments = Vec::with_capacity(permutation.len());
        for (row, &col) in permutation.iter().enumerate() {
            if row == col {
                // The diagonal sentinel makes this unreachable for a correct
                // solve; discard the pair and keep the rest of the batch.
                error!(
                    team_id,
                    member_id = matrix.member_id(row),
                    "solver produced a self-pair, discarding"
                );
                continue;
            }
            assignments.push(Assignment {
                id: Uuid::new_v4(),
                team_id: team_id.to_string(),
                reviewer_id: matrix.member_id(row).to_string(),
                reviewee_id: matrix.member_id(col).to_string(),
                week_start,
                status: AssignmentStatus::Assigned,
                total_score: matrix.score_at(row, col),
                manual_override: false,
                remarks: None,
            });
        }

        for diagnostic in validate_batch(&assignments, self.config.max_assignments_per_week) {
            warn!(team_id, kind = ?diagnostic.kind, "{}", diagnostic.message);
        }

        Ok(assignments)
    }

    /// Replace one assignment's reviewee by hand
    ///
    /// Bypasses the solver entirely; the result is tagged `manual_override`
    /// so the validator and downstream reporting can tell it apart from
    /// algorithmic pairs.
    pub async fn apply_manual_override(
        &self,
        assignment_id: Uuid,
        new_reviewee_id: &str,
        remarks: Option<String>,
    ) -> Result<Assignment, EngineError> {
        let Some(mut assignment) = self.store.find_assignment(assignment_id).await? else {
            return Err(EngineError::AssignmentNotFound(assignment_id));
        };

        if assignment.reviewer_id == new_reviewee_id {
            return Err(EngineError::InvalidOverride {
                reviewee_id: new_reviewee_id.to_string(),
            });
        }

        assignment.reviewee_id = new_reviewee_id.to_string();
        assignment.manual_override = true;
        assignment.remarks = remarks;
        self.store.update_assignment(&assignment).await?;

        info!(
            %assignment_id,
            reviewee_id = new_reviewee_id,
            "applied manual override"
        );
        Ok(assignment)
    }

    /// Per-member assignment counts over the trailing load window
    fn load_counts(&self, history: &[Assignment], week_start: NaiveDate) -> HashMap<String, u32> {
        let from = week_start - Duration::weeks(i64::from(self.config.load_window_weeks));
        let mut loads: HashMap<String, u32> = HashMap::new();
        for assignment in history {
            if assignment.week_start < from || assignment.week_start >= week_start {
                continue;
            }
            *loads.entry(assignment.reviewer_id.clone()).or_insert(0) += 1;
            *loads.entry(assignment.reviewee_id.clone()).or_insert(0) += 1;
        }
        loads
    }
}
