//! Vector similarity utilities.
//!
//! Pure-Rust cosine similarity and nearest-neighbour ranking over
//! archival records.

use mnemos_core::memory::ArchivalRecord;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if either vector is zero-length or empty.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Rank records by cosine similarity to a query embedding.
///
/// Returns records sorted by descending similarity, with `score` set to the
/// similarity. Records that are not positively similar are dropped.
pub fn vector_search(
    records: &[ArchivalRecord],
    query_embedding: &[f32],
    limit: usize,
) -> Vec<ArchivalRecord> {
    let mut scored: Vec<(f32, ArchivalRecord)> = records
        .iter()
        .filter_map(|record| {
            let sim = cosine_similarity(&record.embedding, query_embedding);
            if sim > 0.0 {
                let mut r = record.clone();
                r.score = sim;
                Some((sim, r))
            } else {
                None
            }
        })
        .collect();

    // Stable sort keeps insertion order among equal scores
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored.into_iter().map(|(_, r)| r).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str, embedding: Vec<f32>) -> ArchivalRecord {
        ArchivalRecord {
            id: id.into(),
            content: format!("Content for {id}"),
            created_at: Utc::now(),
            score: 0.0,
            embedding,
        }
    }

    #[test]
    fn cosine_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn cosine_mismatched_lengths() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn cosine_zero_vector() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn cosine_known_value() {
        // [1,1] · [1,0] = 1, |[1,1]| = sqrt(2), |[1,0]| = 1
        let a = vec![1.0, 1.0];
        let b = vec![1.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 0.7071).abs() < 0.001);
    }

    #[test]
    fn vector_search_ranks_by_similarity() {
        let query = vec![1.0, 0.0, 0.0];
        let records = vec![
            record("a", vec![0.2, 1.0, 0.0]), // weakly similar
            record("b", vec![1.0, 0.0, 0.0]), // identical
            record("c", vec![0.5, 0.5, 0.0]), // ~0.707
        ];

        let results = vector_search(&records, &query, 10);
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn vector_search_drops_unrelated_records() {
        let query = vec![1.0, 0.0];
        let records = vec![
            record("a", vec![1.0, 0.0]),
            record("b", vec![0.0, 1.0]),  // orthogonal
            record("c", vec![-1.0, 0.0]), // opposite
        ];

        let results = vector_search(&records, &query, 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "a");
    }

    #[test]
    fn vector_search_respects_limit() {
        let query = vec![1.0, 0.0];
        let records: Vec<_> = (0..10)
            .map(|i| record(&format!("r{i}"), vec![1.0, i as f32 * 0.1]))
            .collect();

        assert_eq!(vector_search(&records, &query, 3).len(), 3);
    }

    #[test]
    fn vector_search_empty_store() {
        assert!(vector_search(&[], &[1.0, 0.0], 5).is_empty());
    }
}
