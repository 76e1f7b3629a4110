//! PeerPair - weekly reviewer-pairing engine for peer code review
//!
//! Given a team roster, the engine computes a multi-factor compatibility
//! score for every reviewer/reviewee pair, assembles a cost matrix with
//! self-pairing forbidden, and solves the resulting assignment problem
//! (Kuhn-Munkres) to produce non-self, non-duplicate review pairs that
//! respect historical avoidance, load balancing, and diversity objectives.
//!
//! Member storage, notification delivery, and transport layers live in the
//! surrounding system; this crate talks to them through the traits in
//! [`services`].

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    build_cost_matrix, score_pair, solve, validate_batch, CostMatrix, Diagnostic, DiagnosticKind,
    EngineError, PairingEngine,
};
pub use models::{
    week_start_of, Assignment, AssignmentStatus, Member, PairScore, PairingConfig, ScoreWeights,
};
pub use services::{AssignmentStore, MemberDirectory};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let monday = week_start_of(NaiveDate::from_ymd_opt(2025, 6, 12).unwrap());
        assert_eq!(monday, NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
        assert!(PairingConfig::default().weights.avoidance > 0.0);
    }
}
