//! Similarity ranking over candidate vectors
//!
//! Pure, side-effect-free exact search: O(N·D) over the candidate set.
//! Adequate for pools of tens to low thousands of documents; scaling
//! beyond that means swapping an approximate nearest-neighbor index in
//! behind `rank`, not changing its contract.

use crate::error::{Exclusion, Result, ResumeRankerError};
use serde::Serialize;
use std::sync::Arc;

/// A candidate document ready for ranking.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub filename: String,
    pub keywords: String,
    pub vector: Arc<Vec<f32>>,
}

/// One ranked entry: identity, keyword summary, and the similarity
/// score rounded to 3 decimal places for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub filename: String,
    pub keywords: String,
    pub score: f32,
}

/// The outcome of ranking one query against a candidate set: results in
/// descending score order plus a structured exclusion per candidate
/// that could not be scored.
#[derive(Debug, Clone, Serialize)]
pub struct RankOutcome {
    pub results: Vec<MatchResult>,
    pub exclusions: Vec<Exclusion>,
}

/// Cosine similarity of two equal-dimension vectors. A zero-magnitude
/// vector makes the similarity undefined and is a failure, not a silent
/// zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ResumeRankerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(ResumeRankerError::DegenerateVector(
            "cosine similarity is undefined for a zero-magnitude vector".to_string(),
        ));
    }

    Ok(dot / (norm_a * norm_b))
}

/// Round to 3 decimal places for presentation.
pub fn round_score(score: f32) -> f32 {
    (score * 1000.0).round() / 1000.0
}

/// Rank candidates against the query vector, descending by similarity.
/// The pre-rounding value determines the order so rounding cannot
/// destabilize it; the sort is stable, so exact ties keep their input
/// order. Candidates whose similarity is undefined are excluded and
/// reported, never scored zero.
pub fn rank(query: &[f32], candidates: &[Candidate]) -> RankOutcome {
    let mut scored: Vec<(f32, &Candidate)> = Vec::with_capacity(candidates.len());
    let mut exclusions = Vec::new();

    for candidate in candidates {
        match cosine_similarity(query, &candidate.vector) {
            Ok(score) => scored.push((score, candidate)),
            Err(e) => exclusions.push(Exclusion::from_error(candidate.filename.clone(), &e)),
        }
    }

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let results = scored
        .into_iter()
        .map(|(score, candidate)| MatchResult {
            filename: candidate.filename.clone(),
            keywords: candidate.keywords.clone(),
            score: round_score(score),
        })
        .collect();

    RankOutcome { results, exclusions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExclusionKind;

    fn candidate(filename: &str, vector: Vec<f32>) -> Candidate {
        Candidate {
            filename: filename.to_string(),
            keywords: String::new(),
            vector: Arc::new(vector),
        }
    }

    #[test]
    fn test_self_similarity_is_one() {
        let v = vec![0.3, -0.5, 0.8];
        let score = cosine_similarity(&v, &v).unwrap();
        assert!((round_score(score) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_similarity_bounds() {
        let a = vec![1.0, 0.0];
        let opposite = vec![-1.0, 0.0];
        let orthogonal = vec![0.0, 1.0];

        assert!((cosine_similarity(&a, &opposite).unwrap() - (-1.0)).abs() < 1e-6);
        assert!(cosine_similarity(&a, &orthogonal).unwrap().abs() < 1e-6);

        for v in [&opposite, &orthogonal] {
            let s = cosine_similarity(&a, v).unwrap();
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn test_zero_vector_is_an_error_not_zero() {
        let a = vec![1.0, 2.0];
        let zero = vec![0.0, 0.0];
        assert!(matches!(
            cosine_similarity(&a, &zero),
            Err(ResumeRankerError::DegenerateVector(_))
        ));
        assert!(matches!(
            cosine_similarity(&zero, &a),
            Err(ResumeRankerError::DegenerateVector(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        assert!(matches!(
            cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(ResumeRankerError::Embedding(_))
        ));
    }

    #[test]
    fn test_exact_query_match_ranks_first_with_score_one() {
        let query = vec![0.6, 0.8, 0.0];
        let candidates = vec![
            candidate("other.pdf", vec![0.0, 0.1, 0.9]),
            candidate("exact.pdf", vec![0.6, 0.8, 0.0]),
            candidate("near.pdf", vec![0.5, 0.8, 0.1]),
        ];

        let outcome = rank(&query, &candidates);
        assert_eq!(outcome.results[0].filename, "exact.pdf");
        assert_eq!(outcome.results[0].score, 1.0);
        assert!(outcome.exclusions.is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let query = vec![1.0, 0.0];
        // Identical vectors: exactly equal scores.
        let candidates = vec![
            candidate("first.pdf", vec![0.5, 0.5]),
            candidate("second.pdf", vec![0.5, 0.5]),
            candidate("third.pdf", vec![1.0, 0.0]),
        ];

        let outcome = rank(&query, &candidates);
        let names: Vec<&str> = outcome.results.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["third.pdf", "first.pdf", "second.pdf"]);
    }

    #[test]
    fn test_all_degenerate_candidates_yield_empty_results_with_reports() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            candidate("a.pdf", vec![0.0, 0.0]),
            candidate("b.pdf", vec![0.0, 0.0]),
        ];

        let outcome = rank(&query, &candidates);
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.exclusions.len(), 2);
        for exclusion in &outcome.exclusions {
            assert_eq!(exclusion.kind, ExclusionKind::DegenerateVector);
        }
    }

    #[test]
    fn test_pre_rounding_value_determines_order() {
        let query = vec![1.0, 0.0];
        // Both round to 0.707 but the raw scores differ slightly.
        let candidates = vec![
            candidate("lower.pdf", vec![0.7068, 0.7074]),
            candidate("higher.pdf", vec![0.7074, 0.7068]),
        ];

        let outcome = rank(&query, &candidates);
        assert_eq!(outcome.results[0].filename, "higher.pdf");
        assert_eq!(outcome.results[0].score, outcome.results[1].score);
    }

    #[test]
    fn test_one_degenerate_candidate_does_not_abort_the_rest() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            candidate("bad.pdf", vec![0.0, 0.0]),
            candidate("good.pdf", vec![0.9, 0.1]),
        ];

        let outcome = rank(&query, &candidates);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].filename, "good.pdf");
        assert_eq!(outcome.exclusions.len(), 1);
        assert_eq!(outcome.exclusions[0].filename, "bad.pdf");
    }
}
