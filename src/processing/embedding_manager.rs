//! Embedding model management: catalog, download and lookup of Model2Vec models

use crate::config::{Config, EmbeddingBackendKind};
use crate::error::{Result, ResumeMatcherError};
use hf_hub::api::tokio::Api;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Information about an available embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub dimensions: u32,
}

/// Models the matcher knows how to fetch, keyed by short id.
pub fn known_models() -> BTreeMap<String, EmbeddingModelInfo> {
    let mut models = BTreeMap::new();

    models.insert(
        "potion-base-8M".to_string(),
        EmbeddingModelInfo {
            name: "Potion Base 8M".to_string(),
            repo_id: "minishlab/potion-base-8M".to_string(),
            size_mb: 33,
            description: "High-quality Model2Vec embeddings with 8M parameters".to_string(),
            dimensions: 256,
        },
    );

    models.insert(
        "m2v-base".to_string(),
        EmbeddingModelInfo {
            name: "Model2Vec Base".to_string(),
            repo_id: "minishlab/M2V_base_output".to_string(),
            size_mb: 90,
            description: "Legacy Model2Vec base embeddings model".to_string(),
            dimensions: 256,
        },
    );

    models.insert(
        "m2v-large".to_string(),
        EmbeddingModelInfo {
            name: "Model2Vec Large".to_string(),
            repo_id: "minishlab/M2V_large_output".to_string(),
            size_mb: 250,
            description: "High-capacity Model2Vec large embeddings model".to_string(),
            dimensions: 512,
        },
    );

    models
}

/// Map a short id, repo id or display name to the catalog's short id.
pub fn resolve_model_id(input: &str) -> Option<String> {
    let models = known_models();

    if models.contains_key(input) {
        return Some(input.to_string());
    }

    let input_lower = input.to_lowercase();
    models
        .iter()
        .find(|(_, info)| info.repo_id == input || info.name.to_lowercase() == input_lower)
        .map(|(id, _)| id.clone())
}

/// Manager for embedding models - handles download and local lookup
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
    api: Api,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                ResumeMatcherError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let api = Api::new().map_err(|e| {
            ResumeMatcherError::ModelError(format!("Failed to initialize HF API: {}", e))
        })?;

        let mut manager = Self {
            models_dir,
            available_models: known_models(),
            downloaded_models: HashSet::new(),
            api,
        };

        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            ResumeMatcherError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && is_model_directory(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        log::debug!("Found {} downloaded embedding model(s)", self.downloaded_models.len());
        Ok(())
    }

    /// Download an embedding model from the Hugging Face Hub
    pub async fn download_model(&mut self, model: &str) -> Result<PathBuf> {
        let model_id = resolve_model_id(model)
            .ok_or_else(|| ResumeMatcherError::ModelNotFound(model.to_string()))?;
        let model_info = self.available_models[&model_id].clone();
        let model_dir = self.models_dir.join(&model_id);

        if self.downloaded_models.contains(&model_id) {
            return Ok(model_dir);
        }

        log::info!(
            "Downloading embedding model {} ({} MB) from {}",
            model_info.name,
            model_info.size_mb,
            model_info.repo_id
        );

        fs::create_dir_all(&model_dir).await?;

        let repo = self.api.repo(hf_hub::Repo::model(model_info.repo_id.clone()));

        for file in ["model.safetensors", "tokenizer.json", "config.json", "README.md"] {
            match repo.get(file).await {
                Ok(file_path) => {
                    fs::copy(&file_path, model_dir.join(file)).await.map_err(|e| {
                        ResumeMatcherError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    log::info!("  downloaded {}", file);
                }
                Err(e) if file == "README.md" => {
                    log::warn!("  optional file {} not found: {}", file, e);
                }
                Err(e) => {
                    return Err(ResumeMatcherError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        self.downloaded_models.insert(model_id);
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.downloaded_models
            .contains(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        if let Some(path) = self.get_model_path(model_id) {
            return Ok(path);
        }
        self.download_model(model_id).await
    }

    pub fn list_available_models(&self) -> Vec<(&String, &EmbeddingModelInfo)> {
        self.available_models.iter().collect()
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.available_models.get(model_id)
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }
}

/// Make sure the configured catalog model is in the models directory,
/// downloading it on first use.
///
/// Returns `None` for the hashing backend and for repo ids outside the
/// catalog; the Model2Vec loader fetches those itself.
pub async fn provision_model(config: &Config) -> Result<Option<PathBuf>> {
    if config.models.backend != EmbeddingBackendKind::Model2Vec {
        return Ok(None);
    }
    let Some(model_id) = resolve_model_id(&config.models.embedding_model) else {
        return Ok(None);
    };

    let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
    let model_path = manager.ensure_model_available(&model_id).await.map_err(|e| {
        ResumeMatcherError::ModelLoading(format!("Model {} is not available: {}", model_id, e))
    })?;
    Ok(Some(model_path))
}

/// A Model2Vec directory needs its tokenizer, weights and config.
async fn is_model_directory(path: &Path) -> bool {
    for file in ["tokenizer.json", "model.safetensors", "config.json"] {
        if fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}
