//! Configuration management for the resume matcher

use crate::error::{Result, ResumeMatcherError};
use crate::processing::vocabulary::{
    BoostKeywords, StopWords, DEFAULT_BOOST_KEYWORDS, DEFAULT_STOP_WORDS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub matching: MatchingConfig,
    pub batch: BatchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    /// Model id under `models_dir`, or a Hugging Face repo id
    pub embedding_model: String,
    pub backend: EmbeddingBackendKind,
    pub hashing_dimension: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackendKind {
    Model2Vec,
    Hashing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub boost_keywords: Vec<String>,
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub max_concurrency: usize,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

fn default_stop_words() -> Vec<String> {
    DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-matcher")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                embedding_model: "potion-base-8M".to_string(),
                backend: EmbeddingBackendKind::Model2Vec,
                hashing_dimension: 512,
            },
            matching: MatchingConfig {
                boost_keywords: DEFAULT_BOOST_KEYWORDS.iter().map(|k| k.to_string()).collect(),
                stop_words: default_stop_words(),
            },
            batch: BatchConfig {
                max_concurrency: 4,
                timeout_ms: 30_000,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location. A missing default
    /// file is created with default values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path(), false),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeMatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
            log::debug!("Loaded configuration from {}", config_path.display());
            Ok(config)
        } else if explicit {
            Err(ResumeMatcherError::Configuration(format!(
                "Config file not found: {}",
                config_path.display()
            )))
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            log::info!("Wrote default configuration to {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeMatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-matcher")
            .join("config.toml")
    }

    /// Reject settings the matcher cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.boost_keywords()?;
        self.stop_words()?;

        if self.batch.max_concurrency == 0 {
            return Err(ResumeMatcherError::Configuration(
                "batch.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.batch.timeout_ms == 0 {
            return Err(ResumeMatcherError::Configuration(
                "batch.timeout_ms must be positive".to_string(),
            ));
        }
        if self.models.backend == EmbeddingBackendKind::Hashing && self.models.hashing_dimension == 0 {
            return Err(ResumeMatcherError::Configuration(
                "models.hashing_dimension must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn boost_keywords(&self) -> Result<BoostKeywords> {
        BoostKeywords::new(&self.matching.boost_keywords)
    }

    pub fn stop_words(&self) -> Result<StopWords> {
        StopWords::new(&self.matching.stop_words)
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.boost_keywords().unwrap().len(), 8);
        assert_eq!(config.stop_words().unwrap().len(), 179);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.models.backend = EmbeddingBackendKind::Hashing;
        config.matching.boost_keywords = vec!["rust".to_string(), "tokio".to_string()];
        config.batch.timeout_ms = 1_500;
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.models.backend, EmbeddingBackendKind::Hashing);
        assert_eq!(loaded.matching.boost_keywords, vec!["rust", "tokio"]);
        assert_eq!(loaded.batch.timeout_ms, 1_500);
        assert_eq!(loaded.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_missing_stop_words_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[models]
models_dir = "/tmp/models"
embedding_model = "m2v-base"
backend = "hashing"
hashing_dimension = 64

[matching]
boost_keywords = ["python"]

[batch]
max_concurrency = 2
timeout_ms = 100

[output]
format = "Json"
detailed = true
color_output = false
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.matching.stop_words.len(), 179);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ResumeMatcherError::Configuration(_)));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut config = Config::default();
        config.matching.boost_keywords.clear();
        assert!(config.validate().unwrap_err().is_fatal());

        let mut config = Config::default();
        config.matching.stop_words.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.batch.max_concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.batch.timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
