//! Minimum-cost bipartite perfect matching (Kuhn-Munkres / Hungarian method)
//!
//! The solver is fully generic: it sees only a square matrix of finite
//! costs and returns the row -> column permutation minimizing the total.
//! Domain rules such as "no self-pairing" are expressed purely through the
//! costs the caller supplies.

use std::collections::VecDeque;
use thiserror::Error;

/// Comparison tolerance for reduced costs; reductions leave values that are
/// zero up to floating-point noise.
const EPS: f64 = 1e-9;

/// Malformed-matrix and convergence failures
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("cost matrix is empty")]
    Empty,

    #[error("cost matrix is not square: row {row} has {len} columns, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("cost matrix contains a non-finite value at ({row}, {col})")]
    NonFinite { row: usize, col: usize },

    #[error("reduction made no progress; matrix is degenerate")]
    Stalled,
}

/// Solve the assignment problem for a square cost matrix
///
/// Returns `permutation` where `permutation[i]` is the column matched to
/// row `i`; the result is a bijection over `0..n` minimizing total cost.
/// Ties between equal-cost matchings are broken by search order, which is
/// deterministic for a fixed matrix. Worst case O(n^3).
pub fn solve(costs: &[Vec<f64>]) -> Result<Vec<usize>, SolveError> {
    let n = costs.len();
    if n == 0 {
        return Err(SolveError::Empty);
    }
    for (row, values) in costs.iter().enumerate() {
        if values.len() != n {
            return Err(SolveError::NotSquare {
                row,
                len: values.len(),
                expected: n,
            });
        }
        for (col, value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(SolveError::NonFinite { row, col });
            }
        }
    }

    let mut m: Vec<Vec<f64>> = costs.to_vec();

    // Step 1: row reduction
    for row in m.iter_mut() {
        let min = row.iter().copied().fold(f64::INFINITY, f64::min);
        for value in row.iter_mut() {
            *value -= min;
        }
    }

    // Step 2: column reduction
    for col in 0..n {
        let min = (0..n).map(|row| m[row][col]).fold(f64::INFINITY, f64::min);
        if min > 0.0 {
            for row in m.iter_mut() {
                row[col] -= min;
            }
        }
    }

    // Steps 3-5: grow a matching over zero cells, adjusting the matrix
    // whenever the matching is not yet perfect. Each adjustment creates at
    // least one new zero outside the current cover, so the loop is bounded.
    let max_rounds = n * n + n;
    for _ in 0..max_rounds {
        let (row_match, col_match) = max_zero_matching(&m);
        if row_match.iter().all(Option::is_some) {
            return Ok(row_match.into_iter().flatten().collect());
        }

        let (marked_rows, marked_cols) = cover_marks(&m, &row_match, &col_match);

        // Minimum value not covered by the line cover
        // (cover = unmarked rows + marked columns)
        let mut delta = f64::INFINITY;
        for row in 0..n {
            if !marked_rows[row] {
                continue;
            }
            for col in 0..n {
                if !marked_cols[col] {
                    delta = delta.min(m[row][col]);
                }
            }
        }
        if !delta.is_finite() || delta <= EPS {
            return Err(SolveError::Stalled);
        }

        for row in 0..n {
            for col in 0..n {
                if marked_rows[row] && !marked_cols[col] {
                    m[row][col] -= delta;
                } else if !marked_rows[row] && marked_cols[col] {
                    m[row][col] += delta;
                }
            }
        }
    }

    Err(SolveError::Stalled)
}

/// Maximum matching over zero-cost cells via Kuhn's augmenting-path search
fn max_zero_matching(m: &[Vec<f64>]) -> (Vec<Option<usize>>, Vec<Option<usize>>) {
    let n = m.len();
    let mut row_match: Vec<Option<usize>> = vec![None; n];
    let mut col_match: Vec<Option<usize>> = vec![None; n];

    for row in 0..n {
        let mut visited = vec![false; n];
        try_augment(m, row, &mut visited, &mut row_match, &mut col_match);
    }

    (row_match, col_match)
}

fn try_augment(
    m: &[Vec<f64>],
    row: usize,
    visited: &mut [bool],
    row_match: &mut [Option<usize>],
    col_match: &mut [Option<usize>],
) -> bool {
    for col in 0..m.len() {
        if visited[col] || m[row][col].abs() > EPS {
            continue;
        }
        visited[col] = true;

        let free = match col_match[col] {
            None => true,
            Some(owner) => try_augment(m, owner, visited, row_match, col_match),
        };
        if free {
            row_match[row] = Some(col);
            col_match[col] = Some(row);
            return true;
        }
    }
    false
}

/// Koenig-style marking for a minimum line cover
///
/// Starting from unmatched rows, alternately marks columns reachable through
/// zeros and the rows matched to them. The cover is the unmarked rows plus
/// the marked columns.
fn cover_marks(
    m: &[Vec<f64>],
    row_match: &[Option<usize>],
    col_match: &[Option<usize>],
) -> (Vec<bool>, Vec<bool>) {
    let n = m.len();
    let mut marked_rows = vec![false; n];
    let mut marked_cols = vec![false; n];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for (row, matched) in row_match.iter().enumerate() {
        if matched.is_none() {
            marked_rows[row] = true;
            queue.push_back(row);
        }
    }

    while let Some(row) = queue.pop_front() {
        for col in 0..n {
            if marked_cols[col] || m[row][col].abs() > EPS {
                continue;
            }
            marked_cols[col] = true;
            if let Some(owner) = col_match[col] {
                if !marked_rows[owner] {
                    marked_rows[owner] = true;
                    queue.push_back(owner);
                }
            }
        }
    }

    (marked_rows, marked_cols)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_cost(costs: &[Vec<f64>], permutation: &[usize]) -> f64 {
        permutation
            .iter()
            .enumerate()
            .map(|(row, &col)| costs[row][col])
            .sum()
    }

    fn assert_bijection(permutation: &[usize]) {
        let n = permutation.len();
        let mut seen = vec![false; n];
        for &col in permutation {
            assert!(col < n);
            assert!(!seen[col], "column {} used twice", col);
            seen[col] = true;
        }
    }

    #[test]
    fn test_textbook_three_by_three() {
        let costs = vec![
            vec![4.0, 1.0, 3.0],
            vec![2.0, 0.0, 5.0],
            vec![3.0, 2.0, 2.0],
        ];
        let permutation = solve(&costs).unwrap();
        assert_bijection(&permutation);
        assert!((total_cost(&costs, &permutation) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_unique_optimum_is_found() {
        // Identity is strictly cheaper than any alternative
        let costs = vec![
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ];
        assert_eq!(solve(&costs).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_single_cell_matrix() {
        assert_eq!(solve(&[vec![5.0]]).unwrap(), vec![0]);
    }

    #[test]
    fn test_negative_costs_supported() {
        // Our matrices hold negated scores in [-1, 0]
        let costs = vec![vec![-0.9, -0.1], vec![-0.2, -0.8]];
        let permutation = solve(&costs).unwrap();
        assert_eq!(permutation, vec![0, 1]);
        assert!((total_cost(&costs, &permutation) + 1.7).abs() < 1e-9);
    }

    #[test]
    fn test_requires_column_adjustment_rounds() {
        // Forces at least one cover-and-adjust iteration
        let costs = vec![
            vec![1.0, 2.0, 3.0],
            vec![2.0, 4.0, 6.0],
            vec![3.0, 6.0, 9.0],
        ];
        let permutation = solve(&costs).unwrap();
        assert_bijection(&permutation);
        // Optimal: rows take columns 2, 1, 0 -> 3 + 4 + 3 = 10
        assert!((total_cost(&costs, &permutation) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic_for_fixed_matrix() {
        let costs = vec![
            vec![1.0, 1.0, 1.0],
            vec![1.0, 1.0, 1.0],
            vec![1.0, 1.0, 1.0],
        ];
        let first = solve(&costs).unwrap();
        let second = solve(&costs).unwrap();
        assert_eq!(first, second);
        assert_bijection(&first);
    }

    #[test]
    fn test_sentinel_diagonal_yields_derangement() {
        let sentinel = 1.0e6;
        let n = 5;
        let costs: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            sentinel
                        } else {
                            -((i * n + j) as f64 % 7.0) / 10.0
                        }
                    })
                    .collect()
            })
            .collect();

        let permutation = solve(&costs).unwrap();
        assert_bijection(&permutation);
        for (row, &col) in permutation.iter().enumerate() {
            assert_ne!(row, col, "row {} matched to its own column", row);
        }
    }

    #[test]
    fn test_empty_matrix_rejected() {
        assert!(matches!(solve(&[]), Err(SolveError::Empty)));
    }

    #[test]
    fn test_ragged_matrix_rejected() {
        let costs = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            solve(&costs),
            Err(SolveError::NotSquare { row: 1, len: 1, expected: 2 })
        ));
    }

    #[test]
    fn test_non_finite_matrix_rejected() {
        let costs = vec![vec![1.0, f64::NAN], vec![3.0, 4.0]];
        assert!(matches!(
            solve(&costs),
            Err(SolveError::NonFinite { row: 0, col: 1 })
        ));

        let costs = vec![vec![1.0, 2.0], vec![f64::INFINITY, 4.0]];
        assert!(matches!(
            solve(&costs),
            Err(SolveError::NonFinite { row: 1, col: 0 })
        ));
    }
}
