//! Cosine similarity helpers.

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched lengths or zero-magnitude inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot_product = 0.0f64;
    let mut a_magnitude_sq = 0.0f64;
    let mut b_magnitude_sq = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot_product += x * y;
        a_magnitude_sq += x * x;
        b_magnitude_sq += y * y;
    }

    let magnitude = a_magnitude_sq.sqrt() * b_magnitude_sq.sqrt();
    if magnitude == 0.0 {
        return 0.0;
    }

    dot_product / magnitude
}

/// Rank labelled vectors against `query`, most similar first, keeping `limit`.
pub fn rank_by_similarity<'a, K>(
    query: &[f32],
    candidates: impl IntoIterator<Item = (K, &'a [f32])>,
    limit: usize,
) -> Vec<(K, f64)> {
    let mut scored: Vec<(K, f64)> = candidates
        .into_iter()
        .map(|(key, vector)| (key, cosine_similarity(query, vector)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_and_orthogonal() {
        assert!((cosine_similarity(&[1.0, 2.0], &[1.0, 2.0]) - 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_rank_orders_descending_and_truncates() {
        let a = [1.0f32, 0.0];
        let b = [0.7f32, 0.7];
        let c = [0.0f32, 1.0];
        let ranked = rank_by_similarity(
            &[1.0, 0.1],
            [("c", &c[..]), ("a", &a[..]), ("b", &b[..])],
            2,
        );
        let keys: Vec<_> = ranked.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(ranked[0].1 >= ranked[1].1);
    }
}
