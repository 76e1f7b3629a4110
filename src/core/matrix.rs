use crate::core::scoring::score_pair;
use crate::models::{Assignment, Member, PairingConfig};
use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;

/// Cost placed on diagonal cells to forbid self-assignment
///
/// Off-diagonal costs are negated composite scores, so they lie in [-1, 0]
/// and any diagonal-free assignment of N members costs at least -N. The
/// sentinel therefore dominates every achievable total for any roster up to
/// a million members while staying finite, keeping row/column reduction
/// arithmetic stable.
pub const SELF_PAIR_COST: f64 = 1.0e6;

/// Errors raised while building a cost matrix
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("at least 2 active members are required to build a matrix, got {count}")]
    InsufficientMembers { count: usize },
}

/// Square cost matrix with an index <-> member-id lookup
///
/// Dense 2D array plus a parallel ordered id list, so the solver stays
/// generic over plain indices.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    costs: Vec<Vec<f64>>,
    member_ids: Vec<String>,
}

impl CostMatrix {
    /// Number of members (matrix dimension)
    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }

    /// The raw cost rows, for the solver
    pub fn costs(&self) -> &[Vec<f64>] {
        &self.costs
    }

    /// Member id backing a row/column index
    pub fn member_id(&self, index: usize) -> &str {
        &self.member_ids[index]
    }

    /// Recover the compatibility score behind a cell (costs are negated scores)
    pub fn score_at(&self, row: usize, col: usize) -> f64 {
        -self.costs[row][col]
    }
}

/// Build the cost matrix for one matching run
///
/// Scores are computed once per unordered pair and mirrored (every component
/// is pair-symmetric), negated into costs so the minimizing solver maximizes
/// compatibility, with [`SELF_PAIR_COST`] on the diagonal.
pub fn build_cost_matrix(
    members: &[Member],
    history: &[Assignment],
    loads: &HashMap<String, u32>,
    week_start: NaiveDate,
    config: &PairingConfig,
) -> Result<CostMatrix, MatrixError> {
    let n = members.len();
    if n < 2 {
        return Err(MatrixError::InsufficientMembers { count: n });
    }

    let mut costs = vec![vec![0.0; n]; n];
    for (i, row) in costs.iter_mut().enumerate() {
        row[i] = SELF_PAIR_COST;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let score = score_pair(&members[i], &members[j], history, loads, week_start, config);
            costs[i][j] = -score.total;
            costs[j][i] = -score.total;
        }
    }

    Ok(CostMatrix {
        costs,
        member_ids: members.iter().map(|m| m.id.clone()).collect(),
    })
}
