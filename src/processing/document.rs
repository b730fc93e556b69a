//! Document and corpus structures
//!
//! A corpus is one snapshot of documents sharing a single fitted
//! vocabulary. Documents are normalized once and keyword-summarized once
//! per snapshot, then treated as immutable for the rest of the run.

use crate::config::MatchingConfig;
use crate::error::Result;
use crate::processing::keywords;
use crate::processing::normalizer::{NormalizeStrategy, TextNormalizer};
use serde::Serialize;

/// A resume as ingested: identity plus raw extracted text.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub raw_text: String,
}

impl Document {
    pub fn new(filename: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// A document within a built corpus: normalized text and keyword
/// summary derived, immutable thereafter.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusDocument {
    pub filename: String,
    #[serde(skip)]
    pub normalized: String,
    pub keywords: String,
}

/// One corpus snapshot. Building it is the synchronization barrier the
/// pipeline needs: every document is normalized before the vocabulary
/// is fit, and every summary comes from that one fit.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<CorpusDocument>,
}

impl Corpus {
    /// Normalize all documents with the corpus strategy, fit TF-IDF over
    /// the non-empty ones, and summarize each. Fails with `EmptyCorpus`
    /// when nothing survives normalization, and with
    /// `InvalidConfiguration` before any work if the parameters are out
    /// of range.
    pub fn build(
        documents: Vec<Document>,
        normalizer: &TextNormalizer,
        matching: &MatchingConfig,
    ) -> Result<Self> {
        let normalized: Vec<String> = documents
            .iter()
            .map(|doc| normalizer.normalize(&doc.raw_text, NormalizeStrategy::Lemmatize))
            .collect();

        let summaries = keywords::fit_and_extract(&normalized, matching.top_k, matching.max_vocab)?;

        let documents = documents
            .into_iter()
            .zip(normalized)
            .zip(summaries)
            .map(|((doc, normalized), keywords)| CorpusDocument {
                filename: doc.filename,
                normalized,
                keywords,
            })
            .collect();

        Ok(Self { documents })
    }

    pub fn documents(&self) -> &[CorpusDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents ordered by filename: the presentation contract for
    /// keyword summary exports, not a pipeline requirement.
    pub fn by_filename(&self) -> Vec<&CorpusDocument> {
        let mut sorted: Vec<&CorpusDocument> = self.documents.iter().collect();
        sorted.sort_by(|a, b| a.filename.cmp(&b.filename));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ResumeRankerError;
    use crate::processing::keywords::NO_KEYWORDS_PLACEHOLDER;

    fn matching() -> MatchingConfig {
        Config::default().matching
    }

    #[test]
    fn test_build_summarizes_each_document() {
        let docs = vec![
            Document::new("r1.pdf", "senior python engineer with aws experience"),
            Document::new("r2.pdf", ""),
        ];
        let corpus = Corpus::build(docs, &TextNormalizer::new(), &matching()).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.documents()[1].keywords, NO_KEYWORDS_PLACEHOLDER);
        assert!(corpus.documents()[0].keywords.contains("python"));
    }

    #[test]
    fn test_build_fails_on_all_empty_corpus() {
        let docs = vec![Document::new("a.pdf", "   "), Document::new("b.pdf", "")];
        let result = Corpus::build(docs, &TextNormalizer::new(), &matching());
        assert!(matches!(result, Err(ResumeRankerError::EmptyCorpus)));
    }

    #[test]
    fn test_by_filename_is_alphabetical() {
        let docs = vec![
            Document::new("zeta.pdf", "rust developer"),
            Document::new("alpha.pdf", "python developer"),
        ];
        let corpus = Corpus::build(docs, &TextNormalizer::new(), &matching()).unwrap();

        let ordered: Vec<&str> = corpus.by_filename().iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(ordered, vec!["alpha.pdf", "zeta.pdf"]);
        // Pipeline order is untouched.
        assert_eq!(corpus.documents()[0].filename, "zeta.pdf");
    }
}
