//! Integration tests for the resume ranker

use resume_ranker::config::Config;
use resume_ranker::error::ResumeRankerError;
use resume_ranker::input::jobs;
use resume_ranker::input::manager::InputManager;
use resume_ranker::processing::document::{Corpus, Document};
use resume_ranker::processing::keywords::NO_KEYWORDS_PLACEHOLDER;
use resume_ranker::processing::normalizer::{NormalizeStrategy, TextNormalizer};
use std::path::Path;

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("Kubernetes"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Rust"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_extraction_caching() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_extraction_with_caching_disabled() {
    let mut manager = InputManager::new().with_cache(false);
    let path = Path::new("tests/fixtures/sample_resume.txt");

    manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(ResumeRankerError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(ResumeRankerError::InvalidInput(_))));
}

#[tokio::test]
async fn test_corpus_load_skips_unsupported_files() {
    let mut manager = InputManager::new();
    let load = manager.load_corpus(Path::new("tests/fixtures")).await.unwrap();

    // The .xyz and .json files are not resume formats.
    let names: Vec<&str> = load.documents.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, vec!["sample_resume.md", "sample_resume.txt"]);
    assert!(load.failures.is_empty());
}

#[tokio::test]
async fn test_corpus_load_isolates_corrupt_documents() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("good.txt"), "senior rust engineer").unwrap();
    // Not a real PDF; extraction fails but the load continues.
    std::fs::write(dir.path().join("corrupt.pdf"), b"not a pdf").unwrap();

    let mut manager = InputManager::new();
    let load = manager.load_corpus(dir.path()).await.unwrap();

    assert_eq!(load.documents.len(), 1);
    assert_eq!(load.documents[0].filename, "good.txt");
    assert_eq!(load.failures.len(), 1);
    assert_eq!(load.failures[0].filename, "corrupt.pdf");
}

#[tokio::test]
async fn test_job_postings_load() {
    let postings = jobs::load_jobs(Path::new("tests/fixtures/jobs.json")).await.unwrap();

    assert_eq!(postings.len(), 2);
    assert_eq!(postings[0].job_id, "J1");
    assert!(postings[0].composite_text().contains("Skills Required: Python, Rust"));
}

#[test]
fn test_corpus_pipeline_with_empty_document() {
    let docs = vec![
        Document::new("r1.pdf", "senior python engineer with aws experience"),
        Document::new("r2.pdf", ""),
    ];
    let mut config = Config::default();
    config.matching.top_k = 5;

    let corpus = Corpus::build(docs, &TextNormalizer::new(), &config.matching).unwrap();

    let r1 = &corpus.documents()[0];
    let r2 = &corpus.documents()[1];

    assert_eq!(r2.keywords, NO_KEYWORDS_PLACEHOLDER);
    assert!(r1.keywords.split(", ").count() <= 5);
    for term in r1.keywords.split(", ") {
        assert!(
            r1.normalized.split_whitespace().any(|t| t == term),
            "term {} not drawn from the document's own text",
            term
        );
    }
}

#[test]
fn test_normalization_matches_keyword_tokens() {
    // The corpus normalization strategy feeds the extractor whitespace
    // separated tokens; contact details never become keywords.
    let normalizer = TextNormalizer::new();
    let text = "Reach me at jane@corp.io or (555) 123-4567 — Pythonic pipelines!";
    let normalized = normalizer.normalize(text, NormalizeStrategy::Lemmatize);

    assert!(!normalized.contains('@'));
    assert!(!normalized.contains("555"));
    for token in normalized.split_whitespace() {
        assert_eq!(token, token.to_lowercase());
    }
}
