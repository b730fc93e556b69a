//! Matching orchestrator
//!
//! Composes normalization, keyword summaries, embeddings, and ranking
//! into the end-to-end pipeline: one invocation ranks the full corpus
//! against one job posting. Independent jobs over the same corpus share
//! only the read-only precomputed document embeddings.

use crate::config::Config;
use crate::error::{Exclusion, Result};
use crate::input::jobs::JobPosting;
use crate::processing::document::Corpus;
use crate::processing::embeddings::{Embedder, EmbeddingEngine};
use crate::processing::normalizer::{NormalizeStrategy, TextNormalizer};
use crate::processing::ranker::{self, Candidate, MatchResult};
use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;

/// The externally visible output of one matching run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub job_id: String,
    pub job_title: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
    /// Ranked descending by similarity, ties in corpus order.
    pub results: Vec<MatchResult>,
    /// Every document left out of `results`, with the reason.
    pub exclusions: Vec<Exclusion>,
}

pub struct MatchEngine<E = EmbeddingEngine> {
    normalizer: TextNormalizer,
    embeddings: E,
    embed_full_text: bool,
}

impl<E: Embedder> MatchEngine<E> {
    pub fn new(embeddings: E, config: &Config) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            embeddings,
            embed_full_text: config.matching.embed_full_text,
        }
    }

    pub fn embeddings(&self) -> &E {
        &self.embeddings
    }

    /// The text a corpus document is embedded as: its keyword summary by
    /// default, or the full normalized body when configured. The two are
    /// a fidelity/cost trade-off, not different pipelines.
    fn document_text<'a>(&self, doc: &'a crate::processing::document::CorpusDocument) -> &'a str {
        if self.embed_full_text {
            &doc.normalized
        } else {
            &doc.keywords
        }
    }

    /// Warm the embedding cache for every corpus document, in batches.
    /// Returns the documents that could not be embedded; they will be
    /// excluded from any subsequent ranking and are reported here once.
    pub async fn precompute_embeddings(&self, corpus: &Corpus) -> Vec<Exclusion> {
        let items: Vec<(String, String)> = corpus
            .documents()
            .iter()
            .map(|doc| (doc.filename.clone(), self.document_text(doc).to_string()))
            .collect();

        let failures = self.embeddings.warm_cache(&items).await;
        for failure in &failures {
            warn!("Could not embed {}: {}", failure.filename, failure.detail);
        }
        failures
    }

    /// Rank the corpus against one job posting. Per-document embedding
    /// failures exclude that document and are reported; a query that
    /// cannot be embedded fails the run for that job.
    pub async fn match_job(&self, job: &JobPosting, corpus: &Corpus) -> Result<RunReport> {
        let query_text = self
            .normalizer
            .normalize(&job.composite_text(), NormalizeStrategy::Clean);
        let query_vector = self.embeddings.embed(&query_text).await?;

        let mut candidates = Vec::with_capacity(corpus.len());
        let mut exclusions = Vec::new();

        for doc in corpus.documents() {
            let text = self.document_text(doc);
            match self.embeddings.embed_cached(&doc.filename, text).await {
                Ok(vector) => candidates.push(Candidate {
                    filename: doc.filename.clone(),
                    keywords: doc.keywords.clone(),
                    vector,
                }),
                Err(e) => {
                    warn!("Excluding {} from job {}: {}", doc.filename, job.job_id, e);
                    exclusions.push(Exclusion::from_error(doc.filename.clone(), &e));
                }
            }
        }

        let outcome = ranker::rank(&query_vector, &candidates);
        exclusions.extend(outcome.exclusions);

        Ok(RunReport {
            job_id: job.job_id.clone(),
            job_title: job.job_title.clone(),
            model: self.embeddings.model_name().to_string(),
            generated_at: Utc::now(),
            results: outcome.results,
            exclusions,
        })
    }
}
