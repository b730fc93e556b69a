//! Embedding generation using Model2Vec
//!
//! Thin adapter over the pretrained sentence-embedding model. The model
//! handle is process-scoped and read-only once loaded; encode calls are
//! CPU-bound and run on the blocking pool, bounded by a concurrency
//! limit and a timeout so a stuck call fails instead of hanging the run.

use crate::config::Config;
use crate::error::{Exclusion, Result, ResumeRankerError};
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// The embedding operations the matching pipeline needs. Implemented by
/// [`EmbeddingEngine`]; the seam keeps the orchestrator testable without
/// model weights on disk.
pub trait Embedder {
    fn embed(&self, text: &str) -> impl std::future::Future<Output = Result<Vec<f32>>> + Send;
    fn embed_cached(
        &self,
        identity: &str,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Arc<Vec<f32>>>> + Send;
    fn warm_cache(
        &self,
        items: &[(String, String)],
    ) -> impl std::future::Future<Output = Vec<Exclusion>> + Send;
    fn model_name(&self) -> &str;
}

pub struct EmbeddingEngine {
    model: Arc<StaticModel>,
    model_name: String,
    dimension: usize,
    batch_size: usize,
    timeout: Duration,
    limiter: Arc<Semaphore>,
    /// Append-only vector cache keyed by document identity. Entries are
    /// inserted fully populated; readers never observe a torn write.
    cache: Mutex<HashMap<String, Arc<Vec<f32>>>>,
    caching_enabled: bool,
}

impl EmbeddingEngine {
    pub fn load(model_path: &Path, model_name: &str, config: &Config) -> Result<Self> {
        let start = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| ResumeRankerError::Embedding(format!("Failed to load model: {}", e)))?;

        // Probe the output dimension once; every vector compared in a
        // ranking run must match it.
        let probe = model.encode_single("dimension probe");
        if probe.is_empty() {
            return Err(ResumeRankerError::Embedding(
                "Model produced an empty probe vector".to_string(),
            ));
        }

        info!(
            "Model {} loaded in {:.2?} ({} dimensions)",
            model_name,
            start.elapsed(),
            probe.len()
        );

        Ok(Self {
            model: Arc::new(model),
            model_name: model_name.to_string(),
            dimension: probe.len(),
            batch_size: config.processing.batch_size,
            timeout: Duration::from_secs(config.processing.embed_timeout_secs),
            limiter: Arc::new(Semaphore::new(config.processing.max_concurrent_embeds)),
            cache: Mutex::new(HashMap::new()),
            caching_enabled: config.processing.enable_caching,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Embed one text. Surfaces the model's failure (or a timeout)
    /// unchanged; never substitutes a zero vector.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| ResumeRankerError::Embedding("Embedding limiter closed".to_string()))?;

        let model = Arc::clone(&self.model);
        let owned = text.to_string();
        let task = tokio::task::spawn_blocking(move || model.encode_single(&owned));

        let vector = tokio::time::timeout(self.timeout, task)
            .await
            .map_err(|_| {
                ResumeRankerError::Embedding(format!(
                    "Embedding timed out after {:?}",
                    self.timeout
                ))
            })?
            .map_err(|e| ResumeRankerError::Embedding(format!("Embedding task failed: {}", e)))?;

        self.check_dimension(&vector)?;
        Ok(vector)
    }

    /// Embed a sequence of texts, batching into the model. Output order
    /// matches input order one-to-one.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.batch_size) {
            let _permit = self
                .limiter
                .acquire()
                .await
                .map_err(|_| ResumeRankerError::Embedding("Embedding limiter closed".to_string()))?;

            let model = Arc::clone(&self.model);
            let owned: Vec<String> = chunk.to_vec();
            let task = tokio::task::spawn_blocking(move || model.encode(&owned));

            let batch = tokio::time::timeout(self.timeout, task)
                .await
                .map_err(|_| {
                    ResumeRankerError::Embedding(format!(
                        "Embedding batch timed out after {:?}",
                        self.timeout
                    ))
                })?
                .map_err(|e| ResumeRankerError::Embedding(format!("Embedding task failed: {}", e)))?;

            if batch.len() != chunk.len() {
                return Err(ResumeRankerError::Embedding(format!(
                    "Model returned {} vectors for {} inputs",
                    batch.len(),
                    chunk.len()
                )));
            }
            for vector in &batch {
                self.check_dimension(vector)?;
            }
            vectors.extend(batch);
        }

        Ok(vectors)
    }

    /// Embed a document's text, reusing the cached vector for its
    /// identity when present. Insert-if-absent: a concurrent run that
    /// embedded the same document first wins, and both see the same
    /// fully populated vector.
    pub async fn embed_cached(&self, identity: &str, text: &str) -> Result<Arc<Vec<f32>>> {
        if self.caching_enabled {
            let cache = self.cache.lock().expect("embedding cache poisoned");
            if let Some(vector) = cache.get(identity) {
                debug!("Embedding cache hit for {}", identity);
                return Ok(Arc::clone(vector));
            }
        }

        let vector = Arc::new(self.embed(text).await?);

        if self.caching_enabled {
            let mut cache = self.cache.lock().expect("embedding cache poisoned");
            let entry = cache.entry(identity.to_string()).or_insert_with(|| Arc::clone(&vector));
            return Ok(Arc::clone(entry));
        }

        Ok(vector)
    }

    /// Precompute and cache vectors for many (identity, text) pairs,
    /// batching the entries not already cached. A failed batch falls
    /// back to per-item embedding so one bad document cannot condemn
    /// its neighbors; the items that still fail are returned as
    /// exclusions. A no-op when caching is disabled.
    pub async fn warm_cache(&self, items: &[(String, String)]) -> Vec<Exclusion> {
        if !self.caching_enabled {
            return Vec::new();
        }

        let pending: Vec<&(String, String)> = {
            let cache = self.cache.lock().expect("embedding cache poisoned");
            items.iter().filter(|(id, _)| !cache.contains_key(id)).collect()
        };

        let mut failures = Vec::new();
        for chunk in pending.chunks(self.batch_size) {
            let texts: Vec<String> = chunk.iter().map(|(_, text)| text.clone()).collect();
            match self.embed_batch(&texts).await {
                Ok(vectors) => {
                    let mut cache = self.cache.lock().expect("embedding cache poisoned");
                    for ((identity, _), vector) in chunk.iter().zip(vectors) {
                        cache.entry(identity.clone()).or_insert_with(|| Arc::new(vector));
                    }
                }
                Err(batch_err) => {
                    debug!("Batch embedding failed ({}), retrying per item", batch_err);
                    for (identity, text) in chunk {
                        if let Err(e) = self.embed_cached(identity, text).await {
                            failures.push(Exclusion::from_error(identity.clone(), &e));
                        }
                    }
                }
            }
        }
        failures
    }

    pub fn cache_size(&self) -> usize {
        self.cache.lock().expect("embedding cache poisoned").len()
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(ResumeRankerError::Embedding(format!(
                "Model produced a {}-dimensional vector, expected {}",
                vector.len(),
                self.dimension
            )));
        }
        Ok(())
    }
}

impl Embedder for EmbeddingEngine {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        EmbeddingEngine::embed(self, text).await
    }

    async fn embed_cached(&self, identity: &str, text: &str) -> Result<Arc<Vec<f32>>> {
        EmbeddingEngine::embed_cached(self, identity, text).await
    }

    async fn warm_cache(&self, items: &[(String, String)]) -> Vec<Exclusion> {
        EmbeddingEngine::warm_cache(self, items).await
    }

    fn model_name(&self) -> &str {
        EmbeddingEngine::model_name(self)
    }
}
