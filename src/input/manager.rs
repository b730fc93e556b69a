//! Input manager for extracting text and loading resume corpora

use crate::error::{Exclusion, ExclusionKind, Result, ResumeRankerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::document::Document;
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

/// A corpus load: every document that could be extracted, plus a
/// structured record for every file that could not. One corrupt file
/// never aborts the load.
pub struct CorpusLoad {
    pub documents: Vec<Document>,
    pub failures: Vec<Exclusion>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        // Check cache first
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        // Validate file exists
        if !path.exists() {
            return Err(ResumeRankerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        // Detect file type
        let file_type = self.detect_file_type(path)?;

        // Route to appropriate extractor
        let text = match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ResumeRankerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        // Cache the result
        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Load every supported file in a directory as a corpus document.
    /// Extraction failures are recorded against the filename and the
    /// load continues with the remaining files.
    pub async fn load_corpus(&mut self, dir: &Path) -> Result<CorpusLoad> {
        if !dir.is_dir() {
            return Err(ResumeRankerError::InvalidInput(format!(
                "Not a directory: {}",
                dir.display()
            )));
        }

        let mut paths = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let supported = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FileType::from_extension(ext).is_supported())
                .unwrap_or(false);
            if supported {
                paths.push(path);
            }
        }
        // Directory iteration order is platform-defined; fix it so corpus
        // order (and therefore tie-break order) is reproducible.
        paths.sort();

        let mut documents = Vec::new();
        let mut failures = Vec::new();

        for path in paths {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string());

            match self.extract_text(&path).await {
                Ok(text) => documents.push(Document::new(filename, text)),
                Err(e) => {
                    warn!("Skipping {}: {}", filename, e);
                    failures.push(Exclusion::new(filename, ExclusionKind::Extraction, e.to_string()));
                }
            }
        }

        if documents.is_empty() && failures.is_empty() {
            return Err(ResumeRankerError::InvalidInput(format!(
                "No supported resume files found in {}",
                dir.display()
            )));
        }

        Ok(CorpusLoad { documents, failures })
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path.extension().and_then(|ext| ext.to_str()).ok_or_else(|| {
            ResumeRankerError::InvalidInput(format!("File has no extension: {}", path.display()))
        })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
