//! Cosine similarity and exact top-K ranking over the embedding matrix.

use std::borrow::Cow;

use ndarray::Array2;
use serde::Serialize;

/// One ranked row of the embedding matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranked {
    /// Row index into the matrix (and the verse store).
    pub index: usize,
    /// Cosine similarity in `[-1, 1]`.
    pub score: f32,
}

/// Cosine similarity between two vectors.
///
/// Returns `0.0` when the lengths differ, either norm is zero, or the inputs
/// are not finite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a * norm_b);
    if score.is_finite() {
        score.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Score every row of `matrix` against `query` and return the best `top_k`.
///
/// The result has `min(top_k, N)` entries (none when `top_k <= 0`), sorted by
/// descending score with ties broken by ascending row index.
pub fn rank(query: &[f32], matrix: &Array2<f32>, top_k: i64) -> Vec<Ranked> {
    if top_k <= 0 {
        return Vec::new();
    }
    let k = usize::try_from(top_k).unwrap_or(usize::MAX).min(matrix.nrows());

    let mut scored: Vec<Ranked> = matrix
        .rows()
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let row = row
                .as_slice()
                .map(Cow::Borrowed)
                .unwrap_or_else(|| Cow::Owned(row.to_vec()));
            Ranked {
                index,
                score: cosine_similarity(query, &row),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn matrix() -> Array2<f32> {
        array![
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.7, 0.7, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
        ]
    }

    #[test]
    fn cosine_identical_and_orthogonal() {
        assert!((cosine_similarity(&[1.0, 2.0], &[1.0, 2.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_zero_norm_and_mismatch_are_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn rank_orders_by_descending_score() {
        let ranked = rank(&[1.0, 0.0, 0.0], &matrix(), 5);
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        // Rows 1 and 4 both score 0.0; the lower index comes first.
        assert_eq!(indices, vec![0, 2, 1, 4, 3]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn rank_self_query_scores_one() {
        let m = matrix();
        let ranked = rank(&[0.0, 1.0, 0.0], &m, 1);
        assert_eq!(ranked[0].index, 1);
        assert!((ranked[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rank_clamps_top_k() {
        assert!(rank(&[1.0, 0.0, 0.0], &matrix(), 0).is_empty());
        assert!(rank(&[1.0, 0.0, 0.0], &matrix(), -4).is_empty());
        assert_eq!(rank(&[1.0, 0.0, 0.0], &matrix(), 2).len(), 2);
        assert_eq!(rank(&[1.0, 0.0, 0.0], &matrix(), 100).len(), 5);
    }

    #[test]
    fn rank_ties_break_by_index() {
        let m = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0]];
        let ranked = rank(&[1.0, 0.0], &m, 3);
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn rank_empty_matrix() {
        let m = Array2::<f32>::zeros((0, 3));
        assert!(rank(&[1.0, 0.0, 0.0], &m, 5).is_empty());
    }

    #[test]
    fn scores_are_bounded() {
        let m = array![[1e30, 1e30], [-3.0, 4.0], [1e-30, 0.0]];
        for r in rank(&[1.0, 1.0], &m, 3) {
            assert!((-1.0..=1.0).contains(&r.score), "score out of range: {}", r.score);
        }
    }
}
