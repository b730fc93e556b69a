//! The matching pipeline: normalization, keyword extraction, embedding,
//! ranking, and the orchestrator that composes them

pub mod document;
pub mod embeddings;
pub mod keywords;
pub mod matcher;
pub mod model_manager;
pub mod normalizer;
pub mod ranker;
