use crate::models::Assignment;
use serde::Serialize;
use std::collections::HashMap;

/// Category of an advisory finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    DuplicatePair,
    SelfPair,
    Overloaded,
}

/// Human-readable advisory finding over one team/week batch
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Inspect a finished batch for duplicate pairs, self-pairs, and overload
///
/// Advisory only: the result is meant for logging and alerting, and never
/// blocks persistence. Manual overrides can legitimately produce findings
/// here; surfacing them is the point.
pub fn validate_batch(assignments: &[Assignment], max_assignments_per_week: u32) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    // (a) duplicate reviewer -> reviewee pairs, one finding per duplicated pair
    let mut pair_counts: HashMap<(&str, &str), u32> = HashMap::new();
    for assignment in assignments {
        *pair_counts
            .entry((&assignment.reviewer_id, &assignment.reviewee_id))
            .or_insert(0) += 1;
    }
    let mut duplicates: Vec<_> = pair_counts
        .iter()
        .filter(|(_, &count)| count > 1)
        .collect();
    duplicates.sort();
    for (&(reviewer, reviewee), &count) in duplicates {
        diagnostics.push(Diagnostic {
            kind: DiagnosticKind::DuplicatePair,
            message: format!(
                "pair {} -> {} appears {} times in the batch",
                reviewer, reviewee, count
            ),
        });
    }

    // (b) self-pairs
    for assignment in assignments {
        if assignment.reviewer_id == assignment.reviewee_id {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::SelfPair,
                message: format!(
                    "assignment {} pairs {} with themselves",
                    assignment.id, assignment.reviewer_id
                ),
            });
        }
    }

    // (c) per-member total involvement (reviewer + reviewee) over the cap
    let mut involvement: HashMap<&str, u32> = HashMap::new();
    for assignment in assignments {
        *involvement.entry(&assignment.reviewer_id).or_insert(0) += 1;
        *involvement.entry(&assignment.reviewee_id).or_insert(0) += 1;
    }
    let mut overloaded: Vec<_> = involvement
        .iter()
        .filter(|(_, &count)| count > max_assignments_per_week)
        .collect();
    overloaded.sort();
    for (&member_id, &count) in overloaded {
        diagnostics.push(Diagnostic {
            kind: DiagnosticKind::Overloaded,
            message: format!(
                "member {} is involved in {} assignments, cap is {}",
                member_id, count, max_assignments_per_week
            ),
        });
    }

    diagnostics
}
