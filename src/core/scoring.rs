use crate::models::{Assignment, Member, PairScore, PairingConfig};
use chrono::{Months, NaiveDate, NaiveTime};
use std::collections::{HashMap, HashSet};

/// Compute the composite compatibility score for an ordered (reviewer, reviewee) pair
///
/// Scoring formula:
/// total = (
///     skill_match * w_skill +      # Jaccard similarity of skill sets
///     avoidance * w_avoidance +    # longer since last shared assignment = higher
///     load_balance * w_load +      # fewer recent assignments = higher
///     diversity * w_diversity      # cross-role / cross-seniority bonus
/// )
///
/// Pure function: everything it needs is passed in, nothing is fetched.
/// `loads` holds each member's assignment count over the trailing load window.
pub fn score_pair(
    reviewer: &Member,
    reviewee: &Member,
    history: &[Assignment],
    loads: &HashMap<String, u32>,
    week_start: NaiveDate,
    config: &PairingConfig,
) -> PairScore {
    let skill_match = skill_match_score(&reviewer.skills, &reviewee.skills);

    let avoidance = avoidance_score(
        &reviewer.id,
        &reviewee.id,
        history,
        week_start,
        config.avoidance_window_weeks,
    );

    let load_balance = load_balance_score(
        loads.get(&reviewer.id).copied().unwrap_or(0),
        loads.get(&reviewee.id).copied().unwrap_or(0),
        config.max_assignments_per_week,
    );

    let diversity = diversity_score(reviewer, reviewee, week_start);

    let w = config.weights;
    let total = (skill_match * w.skill_match
        + avoidance * w.avoidance
        + load_balance * w.load_balance
        + diversity * w.diversity)
        .clamp(0.0, 1.0);

    PairScore {
        reviewer_id: reviewer.id.clone(),
        reviewee_id: reviewee.id.clone(),
        skill_match,
        avoidance,
        load_balance,
        diversity,
        total,
    }
}

/// Jaccard similarity of the two skill sets (0-1)
///
/// An empty set on either side scores a neutral 0.5: absence of data must
/// not be penalized as a worst case.
pub fn skill_match_score(reviewer_skills: &[String], reviewee_skills: &[String]) -> f64 {
    if reviewer_skills.is_empty() || reviewee_skills.is_empty() {
        return 0.5;
    }

    let a: HashSet<String> = reviewer_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();
    let b: HashSet<String> = reviewee_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.5;
    }

    intersection as f64 / union as f64
}

/// Historical avoidance score (0-1)
///
/// 1.0 when the pair has never been matched; otherwise scaled linearly by
/// the weeks elapsed since their most recent shared assignment (in either
/// direction) before `week_start`, reaching 1.0 once the window has fully
/// elapsed.
pub fn avoidance_score(
    reviewer_id: &str,
    reviewee_id: &str,
    history: &[Assignment],
    week_start: NaiveDate,
    avoidance_window_weeks: u32,
) -> f64 {
    let last_shared = history
        .iter()
        .filter(|a| {
            a.week_start < week_start
                && ((a.reviewer_id == reviewer_id && a.reviewee_id == reviewee_id)
                    || (a.reviewer_id == reviewee_id && a.reviewee_id == reviewer_id))
        })
        .map(|a| a.week_start)
        .max();

    let Some(last) = last_shared else {
        return 1.0;
    };

    if avoidance_window_weeks == 0 {
        return 1.0;
    }

    let elapsed_weeks = (week_start - last).num_days() as f64 / 7.0;
    (elapsed_weeks / f64::from(avoidance_window_weeks)).clamp(0.0, 1.0)
}

/// Load-balance score (0-1): average of both members' remaining capacity
///
/// `load` is the member's assignment count over the trailing load window;
/// a member at or above the weekly cap contributes 0.
pub fn load_balance_score(reviewer_load: u32, reviewee_load: u32, max_per_week: u32) -> f64 {
    let cap = f64::from(max_per_week.max(1));
    let capacity = |load: u32| (1.0 - f64::from(load) / cap).max(0.0);
    (capacity(reviewer_load) + capacity(reviewee_load)) / 2.0
}

/// Diversity bonus (0-1), encouraging cross-pollination between tiers
///
/// +0.3 for differing seniority levels, +0.2 for differing roles, +0.5 when
/// one member is experienced (account older than 6 months at `week_start`)
/// and the other is new (younger than 3 months). Capped at 1.0.
pub fn diversity_score(reviewer: &Member, reviewee: &Member, week_start: NaiveDate) -> f64 {
    let mut score: f64 = 0.0;

    if reviewer.level != reviewee.level {
        score += 0.3;
    }
    if reviewer.role != reviewee.role {
        score += 0.2;
    }

    let reference = week_start.and_time(NaiveTime::MIN).and_utc();
    let experienced = |m: &Member| match m.created_at.checked_add_months(Months::new(6)) {
        Some(t) => t < reference,
        None => false,
    };
    let newcomer = |m: &Member| match m.created_at.checked_add_months(Months::new(3)) {
        Some(t) => t > reference,
        None => true,
    };

    if (experienced(reviewer) && newcomer(reviewee)) || (experienced(reviewee) && newcomer(reviewer))
    {
        score += 0.5;
    }

    score.min(1.0)
}
