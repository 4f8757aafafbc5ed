//! Embedding backends and semantic similarity scoring

use crate::config::{Config, EmbeddingBackendKind};
use crate::error::{Result, ResumeMatcherError};
use crate::processing::embedding_manager::{known_models, resolve_model_id};
use model2vec_rs::model::StaticModel;
use siphasher::sip::SipHasher13;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use unicode_segmentation::UnicodeSegmentation;

/// A loaded text embedding model.
///
/// Loading is expensive and happens once per process; `embed` is called for
/// every document and must be safe to share across worker threads.
pub trait EmbeddingBackend: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Model2Vec static embeddings
pub struct Model2VecBackend {
    model: StaticModel,
    model_name: String,
    dimension: usize,
}

impl Model2VecBackend {
    /// Load from a local model directory or a Hugging Face repo id.
    pub fn load(repo_or_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        log::info!("Loading Model2Vec embedding model from: {}", repo_or_path.display());

        let model = StaticModel::from_pretrained(
            repo_or_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| ResumeMatcherError::from(e.context("Failed to load model")))?;

        // Encode once so the dimension is known before serving.
        let dimension = model.encode_single("dimension check").len();
        if dimension == 0 {
            return Err(ResumeMatcherError::ModelLoading(format!(
                "Model {} produced an empty embedding",
                model_name
            )));
        }

        log::info!(
            "Model {} loaded in {:.2?} ({} dimensions)",
            model_name,
            start_time.elapsed(),
            dimension
        );

        Ok(Self {
            model,
            model_name: model_name.to_string(),
            dimension,
        })
    }

    /// Resolve the configured model: a downloaded copy under the models
    /// directory wins, otherwise the name is handed to the hub as a repo id.
    pub fn from_config(config: &Config) -> Result<Self> {
        let model_path = Self::model_path(config);
        Self::load(&model_path, &config.models.embedding_model)
    }

    fn model_path(config: &Config) -> PathBuf {
        let model_name = &config.models.embedding_model;

        let local_id = resolve_model_id(model_name).unwrap_or_else(|| model_name.clone());
        let local_path = config.models_dir().join(&local_id);
        if local_path.exists() {
            return local_path;
        }

        match known_models().get(&local_id) {
            Some(info) => PathBuf::from(&info.repo_id),
            None => PathBuf::from(model_name),
        }
    }
}

impl EmbeddingBackend for Model2VecBackend {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.model.encode_single(text);
        validate_embedding(&embedding, self.dimension)?;
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

// Changing the keys changes every embedding.
const HASH_SEED_K0: u64 = 0x0123_4567_89ab_cdef;
const HASH_SEED_K1: u64 = 0xfedc_ba98_7654_3210;

/// Deterministic feature-hashing embedder.
///
/// Each word token lands in one signed bucket; the vector is L2-normalized.
/// Needs no model files, so it serves offline runs and tests.
pub struct HashingBackend {
    dimension: usize,
    model_name: String,
}

impl HashingBackend {
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            model_name: format!("hashing-{}", dimension),
        }
    }

    fn hash_token(&self, token: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        hasher.finish()
    }
}

impl EmbeddingBackend for HashingBackend {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text.unicode_words() {
            let hash = self.hash_token(word);
            let idx = (hash % self.dimension as u64) as usize;
            // Top bit picks the sign so collisions partly cancel.
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            return Err(ResumeMatcherError::Embedding(
                "text contains no embeddable tokens".to_string(),
            ));
        }
        for v in &mut vector {
            *v /= norm;
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Load the backend selected in the configuration. Failure here is fatal.
pub fn load_backend(config: &Config) -> Result<Arc<dyn EmbeddingBackend>> {
    match config.models.backend {
        EmbeddingBackendKind::Model2Vec => Ok(Arc::new(Model2VecBackend::from_config(config)?)),
        EmbeddingBackendKind::Hashing => {
            log::info!(
                "Using hashing embedding backend ({} dimensions)",
                config.models.hashing_dimension
            );
            Ok(Arc::new(HashingBackend::new(config.models.hashing_dimension)))
        }
    }
}

fn validate_embedding(embedding: &[f32], expected_dim: usize) -> Result<()> {
    if embedding.len() != expected_dim {
        return Err(ResumeMatcherError::Embedding(format!(
            "Expected {} dimensions, got {}",
            expected_dim,
            embedding.len()
        )));
    }
    if embedding.iter().any(|v| !v.is_finite()) {
        return Err(ResumeMatcherError::Embedding(
            "Embedding contains non-finite values".to_string(),
        ));
    }
    Ok(())
}

/// Cosine similarity in [-1, 1].
///
/// A dimension mismatch or a zero-norm vector is an error, never a zero score.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ResumeMatcherError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(ResumeMatcherError::Embedding("Empty embedding".to_string()));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(ResumeMatcherError::Embedding(
            "Cannot compare a zero-norm embedding".to_string(),
        ));
    }

    Ok((dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

/// Semantic similarity between two normalized texts.
#[derive(Clone)]
pub struct SemanticScorer {
    backend: Arc<dyn EmbeddingBackend>,
}

impl SemanticScorer {
    pub fn new(backend: Arc<dyn EmbeddingBackend>) -> Self {
        Self { backend }
    }

    pub fn embed(&self, normalized_text: &str) -> Result<Vec<f32>> {
        self.backend.embed(normalized_text)
    }

    pub fn score(&self, job_normalized: &str, resume_normalized: &str) -> Result<f32> {
        let job_embedding = self.embed(job_normalized)?;
        self.score_against(&job_embedding, resume_normalized)
    }

    /// Score a resume against an already embedded job description.
    pub fn score_against(&self, job_embedding: &[f32], resume_normalized: &str) -> Result<f32> {
        let resume_embedding = self.embed(resume_normalized)?;
        cosine_similarity(job_embedding, &resume_embedding)
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    pub fn dimension(&self) -> usize {
        self.backend.dimension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let a = vec![0.3, -0.2, 0.9];
        let sim = cosine_similarity(&a, &a).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_and_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((sim + 1.0).abs() < 1e-6);

        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 2.0]).unwrap();
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_errors() {
        assert!(cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]).is_err());
        assert!(cosine_similarity(&[], &[]).is_err());
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).is_err());
    }

    #[test]
    fn test_hashing_backend_is_normalized_and_deterministic() {
        let backend = HashingBackend::new(256);
        let first = backend.embed("python flask developer").unwrap();
        let second = backend.embed("python flask developer").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 256);
        let norm: f32 = first.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hashing_backend_rejects_tokenless_text() {
        let backend = HashingBackend::new(64);
        let err = backend.embed("  ... !!! ").unwrap_err();
        assert!(matches!(err, ResumeMatcherError::Embedding(_)));
    }

    #[test]
    fn test_scorer_ranks_related_text_higher() {
        let scorer = SemanticScorer::new(Arc::new(HashingBackend::new(512)));
        let job = "python developer building flask services for nlp";
        let related = "python engineer with flask and nlp services";
        let unrelated = "slow roasted tomato soup with basil and garlic";

        let related_score = scorer.score(job, related).unwrap();
        let unrelated_score = scorer.score(job, unrelated).unwrap();

        assert!(related_score > unrelated_score);
        assert!((scorer.score(job, job).unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_load_hashing_backend_from_config() {
        let mut config = Config::default();
        config.models.backend = EmbeddingBackendKind::Hashing;
        config.models.hashing_dimension = 128;

        let backend = load_backend(&config).unwrap();
        assert_eq!(backend.dimension(), 128);
        assert_eq!(backend.model_name(), "hashing-128");
    }

    #[test]
    fn test_model_path_prefers_downloaded_copy() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.models.models_dir = dir.path().to_path_buf();
        config.models.embedding_model = "minishlab/potion-base-8M".to_string();

        assert_eq!(
            Model2VecBackend::model_path(&config),
            PathBuf::from("minishlab/potion-base-8M")
        );

        std::fs::create_dir_all(dir.path().join("potion-base-8M")).unwrap();
        assert_eq!(
            Model2VecBackend::model_path(&config),
            dir.path().join("potion-base-8M")
        );

        config.models.embedding_model = "someone/custom-m2v".to_string();
        assert_eq!(
            Model2VecBackend::model_path(&config),
            PathBuf::from("someone/custom-m2v")
        );
    }

    #[test]
    fn test_missing_local_model_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("not-a-model");
        std::fs::create_dir_all(&missing).unwrap();

        let err = Model2VecBackend::load(&missing, "not-a-model").err().unwrap();
        assert!(err.is_fatal());
    }
}
