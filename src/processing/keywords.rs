//! TF-IDF keyword extraction
//!
//! Fits a vocabulary jointly over the non-empty documents of one corpus
//! snapshot and reduces each document to its most salient terms. The
//! fitted model is an immutable value scoped to that snapshot; callers
//! pass it explicitly rather than sharing mutable state.

use crate::error::{Result, ResumeRankerError};
use std::collections::{HashMap, HashSet};

pub const NO_KEYWORDS_PLACEHOLDER: &str = "No keywords";

/// Immutable TF-IDF vocabulary and document frequencies for one corpus
/// snapshot.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vocabulary: Vec<String>,
    index: HashMap<String, usize>,
    doc_freq: Vec<usize>,
    num_docs: usize,
}

impl TfidfModel {
    /// Fit over non-empty normalized documents. The vocabulary is capped
    /// at `max_vocab` terms chosen by total corpus frequency, ties broken
    /// by first appearance; the retained terms keep first-seen order,
    /// which is the tie-break order for per-document extraction.
    pub fn fit<S: AsRef<str>>(documents: &[S], max_vocab: usize) -> Result<Self> {
        if max_vocab == 0 {
            return Err(ResumeRankerError::InvalidConfiguration(
                "max_vocab must be a positive integer".to_string(),
            ));
        }
        if documents.is_empty() {
            return Err(ResumeRankerError::EmptyCorpus);
        }

        // Corpus frequency and first-seen order in one pass.
        let mut corpus_freq: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        let mut doc_freq_by_term: HashMap<&str, usize> = HashMap::new();

        for doc in documents {
            let mut seen_in_doc: HashSet<&str> = HashSet::new();
            for term in doc.as_ref().split_whitespace() {
                let count = corpus_freq.entry(term).or_insert(0);
                if *count == 0 {
                    first_seen.push(term);
                }
                *count += 1;
                if seen_in_doc.insert(term) {
                    *doc_freq_by_term.entry(term).or_insert(0) += 1;
                }
            }
        }

        if first_seen.is_empty() {
            return Err(ResumeRankerError::EmptyCorpus);
        }

        // Select top max_vocab terms by corpus frequency; a stable sort
        // over first-seen order resolves frequency ties deterministically.
        let mut ranked: Vec<(usize, &str)> = first_seen
            .iter()
            .enumerate()
            .map(|(order, term)| (order, *term))
            .collect();
        ranked.sort_by(|a, b| corpus_freq[b.1].cmp(&corpus_freq[a.1]).then(a.0.cmp(&b.0)));
        ranked.truncate(max_vocab);
        // Restore first-seen order for the vocabulary index.
        ranked.sort_by_key(|(order, _)| *order);

        let vocabulary: Vec<String> = ranked.iter().map(|(_, term)| term.to_string()).collect();
        let index: HashMap<String, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        let doc_freq: Vec<usize> = vocabulary
            .iter()
            .map(|term| doc_freq_by_term[term.as_str()])
            .collect();

        Ok(Self {
            vocabulary,
            index,
            doc_freq,
            num_docs: documents.len(),
        })
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Smoothed inverse document frequency for a vocabulary index.
    fn idf(&self, term_index: usize) -> f64 {
        let n = self.num_docs as f64;
        let df = self.doc_freq[term_index] as f64;
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    }

    /// TF-IDF weight of every vocabulary term present in the document,
    /// as (vocabulary index, weight) pairs.
    pub fn weigh(&self, document: &str) -> Vec<(usize, f64)> {
        let mut term_counts: HashMap<usize, usize> = HashMap::new();
        for term in document.split_whitespace() {
            if let Some(&idx) = self.index.get(term) {
                *term_counts.entry(idx).or_insert(0) += 1;
            }
        }

        term_counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf as f64 * self.idf(idx)))
            .collect()
    }

    /// The document's `top_k` highest-weighted vocabulary terms,
    /// descending by weight, ties broken by vocabulary index. Returns
    /// fewer than `top_k` terms when fewer vocabulary terms appear in
    /// the document; never returns a term outside the vocabulary.
    pub fn top_terms(&self, document: &str, top_k: usize) -> Vec<String> {
        let mut weighted = self.weigh(document);
        weighted.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        weighted
            .into_iter()
            .take(top_k)
            .map(|(idx, _)| self.vocabulary[idx].clone())
            .collect()
    }
}

/// Fit a TF-IDF model over the non-empty documents of a corpus and
/// produce one comma-delimited keyword summary per input document, order
/// preserved. Empty documents receive the literal placeholder and are
/// excluded from vocabulary fitting so they cannot distort corpus-wide
/// term statistics.
pub fn fit_and_extract<S: AsRef<str>>(
    corpus: &[S],
    top_k: usize,
    max_vocab: usize,
) -> Result<Vec<String>> {
    if top_k == 0 {
        return Err(ResumeRankerError::InvalidConfiguration(
            "top_k must be a positive integer".to_string(),
        ));
    }

    let non_empty: Vec<&str> = corpus
        .iter()
        .map(|doc| doc.as_ref())
        .filter(|doc| !doc.is_empty())
        .collect();

    let model = TfidfModel::fit(&non_empty, max_vocab)?;

    Ok(corpus
        .iter()
        .map(|doc| {
            let doc = doc.as_ref();
            if doc.is_empty() {
                NO_KEYWORDS_PLACEHOLDER.to_string()
            } else {
                model.top_terms(doc, top_k).join(", ")
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_corpus_fails() {
        let corpus: Vec<String> = vec!["".to_string(), "".to_string()];
        assert!(matches!(
            fit_and_extract(&corpus, 5, 100),
            Err(ResumeRankerError::EmptyCorpus)
        ));
    }

    #[test]
    fn test_zero_top_k_fails_before_fitting() {
        let corpus = vec!["python engineer"];
        assert!(matches!(
            fit_and_extract(&corpus, 0, 100),
            Err(ResumeRankerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_max_vocab_fails() {
        let corpus = vec!["python engineer"];
        assert!(matches!(
            fit_and_extract(&corpus, 5, 0),
            Err(ResumeRankerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_empty_document_gets_placeholder() {
        let corpus = vec!["senior python engineer with aws experience", ""];
        let summaries = fit_and_extract(&corpus, 5, 100).unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1], NO_KEYWORDS_PLACEHOLDER);

        // Non-empty summary draws only from its own text.
        for term in summaries[0].split(", ") {
            assert!(corpus[0].split_whitespace().any(|t| t == term), "unexpected term {}", term);
        }
    }

    #[test]
    fn test_never_more_than_top_k_terms() {
        let corpus = vec![
            "rust python go java kotlin swift ruby scala",
            "python sql airflow spark kafka pandas numpy dbt",
        ];
        let summaries = fit_and_extract(&corpus, 3, 100).unwrap();
        for summary in &summaries {
            assert!(summary.split(", ").count() <= 3);
        }
    }

    #[test]
    fn test_capped_vocabulary_never_leaks_foreign_terms() {
        let corpus = vec![
            "alpha alpha alpha beta beta gamma delta",
            "alpha beta epsilon zeta eta theta",
        ];
        // Far fewer vocabulary slots than distinct terms.
        let model_summaries = fit_and_extract(&corpus, 10, 3).unwrap();

        let vocab = TfidfModel::fit(&corpus, 3).unwrap();
        assert_eq!(vocab.vocabulary().len(), 3);
        for (summary, doc) in model_summaries.iter().zip(&corpus) {
            for term in summary.split(", ").filter(|t| !t.is_empty()) {
                assert!(vocab.vocabulary().contains(&term.to_string()));
                assert!(doc.split_whitespace().any(|t| t == term));
            }
        }
    }

    #[test]
    fn test_vocab_cap_prefers_frequent_terms_with_first_seen_tie_break() {
        let corpus = vec!["common common rare1 rare2", "common rare3 rare4"];
        let model = TfidfModel::fit(&corpus, 2).unwrap();

        // "common" has the highest corpus frequency; among the singletons
        // "rare1" was seen first.
        assert_eq!(model.vocabulary(), &["common".to_string(), "rare1".to_string()]);
    }

    #[test]
    fn test_weight_ties_break_by_vocabulary_index() {
        // Both terms appear once in the document and once in the corpus,
        // so their TF-IDF weights are exactly equal.
        let corpus = vec!["zebra apple"];
        let model = TfidfModel::fit(&corpus, 10).unwrap();

        let terms = model.top_terms("zebra apple", 2);
        // Vocabulary order is first-seen, not alphabetical.
        assert_eq!(terms, vec!["zebra".to_string(), "apple".to_string()]);
    }

    #[test]
    fn test_summaries_are_order_independent_per_document() {
        let a = "senior python engineer aws";
        let b = "junior java developer spring";
        let c = "data analyst sql python";

        let forward = fit_and_extract(&[a, b, c], 4, 100).unwrap();
        let reversed = fit_and_extract(&[c, b, a], 4, 100).unwrap();

        assert_eq!(forward[0], reversed[2]);
        assert_eq!(forward[1], reversed[1]);
        assert_eq!(forward[2], reversed[0]);
    }

    #[test]
    fn test_distinctive_terms_outrank_ubiquitous_ones() {
        let corpus = vec![
            "engineer rust rust rust",
            "engineer python",
            "engineer java",
            "engineer go",
        ];
        let model = TfidfModel::fit(&corpus, 100).unwrap();
        let terms = model.top_terms(corpus[0], 1);

        // "rust" is frequent in the document and rare in the corpus;
        // "engineer" appears everywhere and carries a low idf.
        assert_eq!(terms, vec!["rust".to_string()]);
    }
}
