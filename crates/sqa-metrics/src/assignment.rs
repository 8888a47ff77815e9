//! One-to-one matching of predicted and reference UI elements.
//!
//! Matching uses an optimal assignment (Hungarian algorithm with potentials,
//! O(n²m)) over a score matrix. Scores below the match threshold are zeroed
//! before solving, and only assigned pairs at or above the threshold count as
//! matches.

use crate::overlap::{degenerate_score, f1_from_counts};

/// Assignment maximizing the total weight. Returns `(row, column)` pairs; every
/// row is assigned when `rows <= columns`, otherwise every column is.
///
/// `weights` must be rectangular and contain finite values.
#[must_use]
pub fn max_weight_assignment(weights: &[Vec<f64>]) -> Vec<(usize, usize)> {
    let rows = weights.len();
    let cols = weights.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    if rows <= cols {
        let cost = |r: usize, c: usize| -weights[r][c];
        solve_min_cost(rows, cols, cost)
    } else {
        let cost = |r: usize, c: usize| -weights[c][r];
        solve_min_cost(cols, rows, cost)
            .into_iter()
            .map(|(c, r)| (r, c))
            .collect()
    }
}

/// Minimum-cost assignment for `n <= m`. Indices in the inner loops are
/// 1-based; column 0 is the virtual start column.
fn solve_min_cost(n: usize, m: usize, cost: impl Fn(usize, usize) -> f64) -> Vec<(usize, usize)> {
    let mut u = vec![0.0_f64; n + 1];
    let mut v = vec![0.0_f64; m + 1];
    // owner[j]: row assigned to column j (0 = free)
    let mut owner = vec![0_usize; m + 1];
    let mut way = vec![0_usize; m + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut j0 = 0;
        let mut min_slack = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let slack = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if slack < min_slack[j] {
                    min_slack[j] = slack;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }

            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // Augment along the alternating path.
        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut pairs: Vec<(usize, usize)> = (1..=m)
        .filter(|&j| owner[j] != 0)
        .map(|j| (owner[j] - 1, j - 1))
        .collect();
    pairs.sort_unstable();
    pairs
}

/// Count matches between `predicted` and `reference` under `score`, where a
/// pair matches when its assigned score is at least `threshold`.
pub fn count_matches<P, R>(
    predicted: &[P],
    reference: &[R],
    threshold: f64,
    score: impl Fn(&P, &R) -> f64,
) -> usize {
    let matrix: Vec<Vec<f64>> = predicted
        .iter()
        .map(|p| {
            reference
                .iter()
                .map(|r| {
                    let s = score(p, r);
                    if s >= threshold { s } else { 0.0 }
                })
                .collect()
        })
        .collect();

    max_weight_assignment(&matrix)
        .into_iter()
        .filter(|&(i, j)| matrix[i][j] >= threshold)
        .count()
}

/// F1 of an optimal one-to-one matching, with the degenerate rule for empty
/// sides.
pub fn matching_f1<P, R>(
    predicted: &[P],
    reference: &[R],
    threshold: f64,
    score: impl Fn(&P, &R) -> f64,
) -> f64 {
    if let Some(degenerate) = degenerate_score(predicted.len(), reference.len()) {
        return degenerate;
    }
    let matches = count_matches(predicted, reference, threshold, score);
    f1_from_counts(matches, predicted.len(), reference.len())
}
