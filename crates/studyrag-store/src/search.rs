//! Exact cosine-similarity ranking over a collection's vectors.
//!
//! A full O(n) scan plus O(n log n) sort per query; no incremental index is
//! maintained. Exactness and determinism matter more than speed at the
//! collection sizes this store serves.

use studyrag_core::error::{Error, Result};

/// One ranked row: original row index plus `distance = 1 - similarity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    pub index: usize,
    pub distance: f32,
}

/// Rank all rows against `query`, best first, at most `k` results.
///
/// Similarity is the dot product of L2-normalized vectors. Ties are broken
/// by ascending original index so repeated runs over identical input are
/// reproducible. Fails with [`Error::DimensionMismatch`] when the query
/// disagrees with a row's dimensionality, and with [`Error::ZeroVector`]
/// when the query or any stored vector has a zero norm.
pub fn rank(vectors: &[Vec<f32>], query: &[f32], k: usize) -> Result<Vec<Ranked>> {
    for row in vectors {
        if row.len() != query.len() {
            return Err(Error::DimensionMismatch {
                expected: row.len(),
                actual: query.len(),
            });
        }
    }
    let query = normalize(query)?;
    let mut scored = Vec::with_capacity(vectors.len());
    for (index, row) in vectors.iter().enumerate() {
        let row = normalize(row)?;
        let similarity: f32 = row.iter().zip(&query).map(|(a, b)| a * b).sum();
        scored.push((index, similarity));
    }
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    scored.truncate(k);
    Ok(scored
        .into_iter()
        .map(|(index, similarity)| Ranked {
            index,
            distance: 1.0 - similarity,
        })
        .collect())
}

fn normalize(v: &[f32]) -> Result<Vec<f32>> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return Err(Error::ZeroVector);
    }
    Ok(v.iter().map(|x| x / norm).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_similarity_is_distance_zero() {
        let vectors = vec![vec![0.3, -0.7, 0.2]];
        let ranked = rank(&vectors, &[0.3, -0.7, 0.2], 1).expect("rank");
        assert_eq!(ranked[0].index, 0);
        assert!(ranked[0].distance.abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vector_ranks_last() {
        let vectors = vec![
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.9, 0.1, 0.0, 0.0],
        ];
        let ranked = rank(&vectors, &[1.0, 0.0, 0.0, 0.0], 2).expect("rank");
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].index, 0);
        assert_eq!(ranked[1].index, 2);
        assert!(ranked[0].distance.abs() < 1e-6);
        assert!((ranked[1].distance - 0.0062).abs() < 1e-3);
    }

    #[test]
    fn ties_break_by_ascending_index() {
        let vectors = vec![vec![2.0, 0.0], vec![1.0, 0.0], vec![4.0, 0.0]];
        let ranked = rank(&vectors, &[1.0, 0.0], 3).expect("rank");
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn k_larger_than_collection_is_clamped() {
        let vectors = vec![vec![1.0, 0.0]];
        let ranked = rank(&vectors, &[0.0, 1.0], 10).expect("rank");
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn query_of_the_wrong_dimensionality_is_rejected() {
        let vectors = vec![vec![1.0, 0.0, 0.0]];
        assert!(matches!(
            rank(&vectors, &[1.0, 0.0], 1),
            Err(Error::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert!(matches!(
            rank(&vectors, &[1.0, 0.0, 0.0, 0.0], 1),
            Err(Error::DimensionMismatch {
                expected: 3,
                actual: 4
            })
        ));
    }

    #[test]
    fn zero_vector_is_rejected() {
        let vectors = vec![vec![1.0, 0.0]];
        assert!(matches!(rank(&vectors, &[0.0, 0.0], 1), Err(Error::ZeroVector)));
        let vectors = vec![vec![0.0, 0.0]];
        assert!(matches!(rank(&vectors, &[1.0, 0.0], 1), Err(Error::ZeroVector)));
    }
}
