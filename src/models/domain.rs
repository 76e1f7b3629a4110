use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Team member snapshot used for one matching run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub role: String,
    pub level: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// Composite compatibility score for an ordered (reviewer, reviewee) pair
///
/// All components and the total are normalized to [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairScore {
    pub reviewer_id: String,
    pub reviewee_id: String,
    pub skill_match: f64,
    pub avoidance: f64,
    pub load_balance: f64,
    pub diversity: f64,
    pub total: f64,
}

/// Lifecycle status of a review assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    InProgress,
    Completed,
}

/// One reviewer -> reviewee pairing for a given team and week
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub team_id: String,
    pub reviewer_id: String,
    pub reviewee_id: String,
    /// Monday of the target week
    pub week_start: NaiveDate,
    pub status: AssignmentStatus,
    pub total_score: f64,
    #[serde(default)]
    pub manual_override: bool,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Scoring weights, one per score component
///
/// The avoidance weight is derived at resolve time as the remainder
/// `1 - skill_match - load_balance - diversity` so that the four weights
/// always sum to 1.0. A negative remainder is a configuration error.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoreWeights {
    pub skill_match: f64,
    pub load_balance: f64,
    pub diversity: f64,
    pub avoidance: f64,
}

impl ScoreWeights {
    /// Resolve the three configured weights into a full weight set
    pub fn resolve(
        skill_match: f64,
        load_balance: f64,
        diversity: f64,
    ) -> Result<Self, PairingConfigError> {
        for (name, value) in [
            ("skill_match", skill_match),
            ("load_balance", load_balance),
            ("diversity", diversity),
        ] {
            if value < 0.0 {
                return Err(PairingConfigError::NegativeWeight { name, value });
            }
        }

        let sum = skill_match + load_balance + diversity;
        let avoidance = 1.0 - sum;
        if avoidance < -f64::EPSILON {
            return Err(PairingConfigError::WeightSumExceedsOne { sum });
        }

        Ok(Self {
            skill_match,
            load_balance,
            diversity,
            avoidance: avoidance.max(0.0),
        })
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            skill_match: 0.30,
            load_balance: 0.20,
            diversity: 0.20,
            avoidance: 0.30,
        }
    }
}

/// Runtime configuration for one matching run
///
/// Passed explicitly into every scoring and matrix call; the engine holds
/// one value per instance and never reads ambient state.
#[derive(Debug, Clone)]
pub struct PairingConfig {
    pub avoidance_window_weeks: u32,
    /// Trailing window used for per-member load counts
    pub load_window_weeks: u32,
    pub max_assignments_per_week: u32,
    pub weights: ScoreWeights,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            avoidance_window_weeks: 4,
            load_window_weeks: 4,
            max_assignments_per_week: 2,
            weights: ScoreWeights::default(),
        }
    }
}

/// Configuration validation failures
#[derive(Debug, Error)]
pub enum PairingConfigError {
    #[error("scoring weight `{name}` must be non-negative, got {value}")]
    NegativeWeight { name: &'static str, value: f64 },

    #[error("scoring weights sum to {sum}, leaving a negative avoidance remainder")]
    WeightSumExceedsOne { sum: f64 },

    #[error("max_assignments_per_week must be at least 1")]
    ZeroMaxAssignments,
}

/// Snap a date to the Monday of its ISO week
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_start_of_snaps_to_monday() {
        // 2025-06-11 is a Wednesday
        let wednesday = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        assert_eq!(week_start_of(wednesday), monday);
        assert_eq!(week_start_of(monday), monday);

        // Sunday belongs to the week starting the previous Monday
        let sunday = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(week_start_of(sunday), monday);
    }

    #[test]
    fn test_resolve_weights_derives_avoidance() {
        let weights = ScoreWeights::resolve(0.30, 0.20, 0.20).unwrap();
        assert!((weights.avoidance - 0.30).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_rejects_negative_weight() {
        let err = ScoreWeights::resolve(-0.1, 0.2, 0.2).unwrap_err();
        assert!(matches!(err, PairingConfigError::NegativeWeight { .. }));
    }

    #[test]
    fn test_resolve_rejects_negative_remainder() {
        let err = ScoreWeights::resolve(0.5, 0.4, 0.3).unwrap_err();
        assert!(matches!(err, PairingConfigError::WeightSumExceedsOne { .. }));
    }

    #[test]
    fn test_resolve_allows_zero_avoidance() {
        let weights = ScoreWeights::resolve(0.5, 0.3, 0.2).unwrap();
        assert_eq!(weights.avoidance, 0.0);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ScoreWeights::default();
        let sum = w.skill_match + w.load_balance + w.diversity + w.avoidance;
        assert!((sum - 1.0).abs() < 1e-12);
    }
}
