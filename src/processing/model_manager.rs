//! Embedding model management
//!
//! Downloads Model2Vec models from the Hugging Face Hub into a local
//! models directory and tracks which are present. The model identity is
//! recorded on every run report so cached vectors can be tied to the
//! model that produced them.

use crate::error::{Result, ResumeRankerError};
use hf_hub::api::tokio::Api;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: String,
}

pub struct ModelManager {
    models_dir: PathBuf,
    available_models: HashMap<String, ModelInfo>,
    downloaded_models: HashSet<String>,
    api: Api,
}

impl ModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                ResumeRankerError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let api = Api::new()
            .map_err(|e| ResumeRankerError::ModelError(format!("Failed to initialize HF API: {}", e)))?;

        let mut manager = Self {
            models_dir,
            available_models: Self::known_models(),
            downloaded_models: HashSet::new(),
            api,
        };

        manager.scan_downloaded_models().await?;
        Ok(manager)
    }

    fn known_models() -> HashMap<String, ModelInfo> {
        let mut models = HashMap::new();
        models.insert(
            "potion-base-8M".to_string(),
            ModelInfo {
                name: "Potion Base 8M".to_string(),
                repo_id: "minishlab/potion-base-8M".to_string(),
                size_mb: 33,
                dimensions: 256,
                description: "Model2Vec embeddings with 8M parameters, the recommended default".to_string(),
            },
        );
        models.insert(
            "m2v-base".to_string(),
            ModelInfo {
                name: "Model2Vec Base".to_string(),
                repo_id: "minishlab/M2V_base_output".to_string(),
                size_mb: 90,
                dimensions: 256,
                description: "Model2Vec base embeddings".to_string(),
            },
        );
        models.insert(
            "m2v-large".to_string(),
            ModelInfo {
                name: "Model2Vec Large".to_string(),
                repo_id: "minishlab/M2V_large_output".to_string(),
                size_mb: 250,
                dimensions: 512,
                description: "Higher-capacity Model2Vec embeddings".to_string(),
            },
        );
        models
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            ResumeRankerError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ResumeRankerError::ModelError(format!("Failed to read directory entry: {}", e)))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|e| ResumeRankerError::ModelError(format!("Failed to stat entry: {}", e)))?
                .is_dir();

            if is_dir && Self::is_valid_model_directory(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    async fn is_valid_model_directory(path: &Path) -> bool {
        let has_weights = fs::metadata(path.join("model.safetensors")).await.is_ok();
        let has_tokenizer = fs::metadata(path.join("tokenizer.json")).await.is_ok();
        has_weights && has_tokenizer
    }

    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let model_info = self
            .available_models
            .get(model_id)
            .ok_or_else(|| ResumeRankerError::ModelNotFound(model_id.to_string()))?
            .clone();

        let model_dir = self.models_dir.join(model_id);
        if self.downloaded_models.contains(model_id) {
            return Ok(model_dir);
        }

        info!("Downloading {} ({} MB) from {}", model_info.name, model_info.size_mb, model_info.repo_id);

        fs::create_dir_all(&model_dir).await.map_err(|e| {
            ResumeRankerError::ModelError(format!("Failed to create model directory: {}", e))
        })?;

        let repo = self.api.repo(hf_hub::Repo::model(model_info.repo_id.clone()));

        let required = ["model.safetensors", "tokenizer.json", "config.json"];
        for file in &required {
            let file_path = repo.get(file).await.map_err(|e| {
                ResumeRankerError::ModelError(format!("Failed to download {}: {}", file, e))
            })?;
            let dest_path = model_dir.join(file);
            fs::copy(&file_path, &dest_path)
                .await
                .map_err(|e| ResumeRankerError::ModelError(format!("Failed to copy {}: {}", file, e)))?;
        }

        self.downloaded_models.insert(model_id.to_string());
        info!("Model {} downloaded", model_info.name);
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        if self.downloaded_models.contains(model_id) {
            Some(self.models_dir.join(model_id))
        } else {
            None
        }
    }

    /// Get or download a model, returning its path.
    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        if let Some(path) = self.get_model_path(model_id) {
            return Ok(path);
        }
        self.download_model(model_id).await
    }

    pub fn list_available_models(&self) -> Vec<&ModelInfo> {
        let mut models: Vec<&ModelInfo> = self.available_models.values().collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));
        models
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        self.downloaded_models.iter().cloned().collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&ModelInfo> {
        self.available_models.get(model_id)
    }

    /// Prefer a downloaded model; otherwise recommend the smallest
    /// good-quality one.
    pub fn auto_select_model(&self) -> String {
        let preferred_order = ["potion-base-8M", "m2v-base", "m2v-large"];
        for model_id in &preferred_order {
            if self.downloaded_models.contains(*model_id) {
                return model_id.to_string();
            }
        }
        "potion-base-8M".to_string()
    }

    /// Resolve a model ID from an ID, repo ID, or display name.
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        for (id, info) in &self.available_models {
            if info.repo_id == input || info.name.eq_ignore_ascii_case(input) {
                return Some(id.clone());
            }
        }

        None
    }
}
