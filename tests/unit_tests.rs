// Unit tests for PeerPair core algorithms

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use peerpair::core::{build_cost_matrix, score_pair, solve, SELF_PAIR_COST};
use peerpair::models::{
    Assignment, AssignmentStatus, Member, PairingConfig, ScoreWeights,
};
use std::collections::HashMap;
use uuid::Uuid;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 9).unwrap()
}

fn member(id: &str, skills: &[&str], role: &str, level: &str, age_days: i64) -> Member {
    Member {
        id: id.to_string(),
        name: format!("Member {}", id),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        role: role.to_string(),
        level: level.to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 6, 9, 0, 0, 0).unwrap() - Duration::days(age_days),
        active: true,
    }
}

fn roster(n: usize) -> Vec<Member> {
    (0..n)
        .map(|i| {
            member(
                &format!("m{}", i),
                &["rust", if i % 2 == 0 { "sql" } else { "go" }],
                if i % 2 == 0 { "backend" } else { "frontend" },
                if i % 3 == 0 { "senior" } else { "junior" },
                60 + (i as i64) * 90,
            )
        })
        .collect()
}

#[test]
fn test_solver_output_is_a_derangement_for_all_rosters() {
    for n in 2..=7 {
        let members = roster(n);
        let matrix = build_cost_matrix(
            &members,
            &[],
            &HashMap::new(),
            monday(),
            &PairingConfig::default(),
        )
        .unwrap();
        let permutation = solve(matrix.costs()).unwrap();

        assert_eq!(permutation.len(), n);
        let mut seen = vec![false; n];
        for (row, &col) in permutation.iter().enumerate() {
            assert_ne!(row, col, "self-pair at row {} for n={}", row, n);
            assert!(!seen[col], "column {} reused for n={}", col, n);
            seen[col] = true;
        }
    }
}

#[test]
fn test_cost_negation_round_trips_scores() {
    let members = roster(4);
    let config = PairingConfig::default();
    let matrix = build_cost_matrix(&members, &[], &HashMap::new(), monday(), &config).unwrap();

    for i in 0..members.len() {
        for j in 0..members.len() {
            if i == j {
                assert_eq!(matrix.costs()[i][j], SELF_PAIR_COST);
                continue;
            }
            let direct = score_pair(
                &members[i],
                &members[j],
                &[],
                &HashMap::new(),
                monday(),
                &config,
            );
            assert!(
                (matrix.score_at(i, j) - direct.total).abs() < 1e-12,
                "score mismatch at ({}, {})",
                i,
                j
            );
        }
    }
}

#[test]
fn test_zero_history_gives_max_avoidance_everywhere() {
    let members = roster(5);
    let config = PairingConfig::default();
    for reviewer in &members {
        for reviewee in &members {
            if reviewer.id == reviewee.id {
                continue;
            }
            let score = score_pair(
                reviewer,
                reviewee,
                &[],
                &HashMap::new(),
                monday(),
                &config,
            );
            assert_eq!(score.avoidance, 1.0);
        }
    }
}

#[test]
fn test_missing_skills_score_neutral() {
    let a = member("a", &[], "backend", "senior", 400);
    let b = member("b", &["rust"], "backend", "senior", 400);
    let score = score_pair(&a, &b, &[], &HashMap::new(), monday(), &PairingConfig::default());
    assert_eq!(score.skill_match, 0.5);
}

#[test]
fn test_diversity_cap_is_exact() {
    // Differing role and level, one experienced (>6 months), one new (<3 months)
    let experienced = member("a", &[], "backend", "senior", 365);
    let newcomer = member("b", &[], "frontend", "junior", 30);
    let score = score_pair(
        &experienced,
        &newcomer,
        &[],
        &HashMap::new(),
        monday(),
        &PairingConfig::default(),
    );
    assert_eq!(score.diversity, (0.3f64 + 0.2 + 0.5).min(1.0));
}

#[test]
fn test_recent_history_lowers_pair_total() {
    let a = member("a", &["rust"], "backend", "senior", 400);
    let b = member("b", &["rust"], "backend", "senior", 400);
    let config = PairingConfig::default();

    let fresh = score_pair(&a, &b, &[], &HashMap::new(), monday(), &config);

    let history = vec![Assignment {
        id: Uuid::new_v4(),
        team_id: "team-1".to_string(),
        reviewer_id: "a".to_string(),
        reviewee_id: "b".to_string(),
        week_start: monday() - Duration::weeks(1),
        status: AssignmentStatus::Completed,
        total_score: 0.9,
        manual_override: false,
        remarks: None,
    }];
    let repeat = score_pair(&a, &b, &history, &HashMap::new(), monday(), &config);

    assert!(repeat.total < fresh.total);
    assert!((repeat.avoidance - 0.25).abs() < 1e-12);
}

#[test]
fn test_custom_weights_shift_composite() {
    let a = member("a", &["rust"], "backend", "senior", 400);
    let b = member("b", &["go"], "backend", "senior", 400);

    // Disjoint skills: skill_match = 0. All weight on skills tanks the total;
    // all weight on avoidance (implicit remainder) ignores it.
    let skill_heavy = PairingConfig {
        weights: ScoreWeights::resolve(1.0, 0.0, 0.0).unwrap(),
        ..PairingConfig::default()
    };
    let avoidance_only = PairingConfig {
        weights: ScoreWeights::resolve(0.0, 0.0, 0.0).unwrap(),
        ..PairingConfig::default()
    };

    let low = score_pair(&a, &b, &[], &HashMap::new(), monday(), &skill_heavy);
    let high = score_pair(&a, &b, &[], &HashMap::new(), monday(), &avoidance_only);

    assert_eq!(low.total, 0.0);
    assert_eq!(high.total, 1.0);
}

#[test]
fn test_assignment_serializes_camel_case() {
    let assignment = Assignment {
        id: Uuid::nil(),
        team_id: "team-1".to_string(),
        reviewer_id: "a".to_string(),
        reviewee_id: "b".to_string(),
        week_start: monday(),
        status: AssignmentStatus::InProgress,
        total_score: 0.75,
        manual_override: true,
        remarks: Some("swapped by lead".to_string()),
    };

    let json = serde_json::to_value(&assignment).unwrap();
    assert_eq!(json["teamId"], "team-1");
    assert_eq!(json["reviewerId"], "a");
    assert_eq!(json["weekStart"], "2025-06-09");
    assert_eq!(json["status"], "in_progress");
    assert_eq!(json["manualOverride"], true);
}
