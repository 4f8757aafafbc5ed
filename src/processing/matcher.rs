//! Resume to job description matching

use crate::config::Config;
use crate::error::{Result, ResumeMatcherError};
use crate::processing::diff::{diff_keywords, KeywordDiff};
use crate::processing::embeddings::{load_backend, EmbeddingBackend, SemanticScorer};
use crate::processing::keyword_booster::KeywordBooster;
use crate::processing::scoring::compose_score;
use crate::processing::text_processor::{KeywordSet, TextProcessor};
use crate::processing::vocabulary::{BoostKeywords, StopWords};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use unicode_segmentation::UnicodeSegmentation;

/// Scores one resume against one job description.
///
/// Owns the read-only pieces every match shares: the stop word set, the boost
/// keyword list and the embedding backend handle.
pub struct ResumeMatcher {
    text_processor: TextProcessor,
    semantic_scorer: SemanticScorer,
    keyword_booster: KeywordBooster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Weighted percentage in [0, 100], two decimals
    pub final_score: f64,
    /// Cosine similarity of the normalized texts
    pub semantic_score: f64,
    /// Fraction of boost keywords found in both texts
    pub keyword_score: f64,
    pub common_keywords: Vec<String>,
    pub jd_keywords: KeywordSet,
    pub resume_keywords: KeywordSet,
}

impl MatchResult {
    pub fn keyword_diff(&self) -> KeywordDiff {
        diff_keywords(&self.jd_keywords, &self.resume_keywords)
    }
}

/// Job description work shared by every resume in a batch.
#[derive(Debug, Clone)]
pub struct PreparedJob {
    pub normalized: String,
    pub embedding: Vec<f32>,
    pub keywords: KeywordSet,
    boost_presence: Vec<bool>,
}

#[derive(Debug, Clone)]
pub struct MatcherInfo {
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub boost_keyword_count: usize,
    pub stop_word_count: usize,
}

impl ResumeMatcher {
    pub fn new(
        backend: Arc<dyn EmbeddingBackend>,
        stop_words: StopWords,
        boost_keywords: BoostKeywords,
    ) -> Result<Self> {
        Ok(Self {
            text_processor: TextProcessor::new(stop_words),
            semantic_scorer: SemanticScorer::new(backend),
            keyword_booster: KeywordBooster::new(boost_keywords)?,
        })
    }

    /// Load the configured embedding backend and vocabularies.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let backend = load_backend(config)?;
        Self::with_backend(config, backend)
    }

    /// Build from configuration around an already loaded backend.
    pub fn with_backend(config: &Config, backend: Arc<dyn EmbeddingBackend>) -> Result<Self> {
        Self::new(backend, config.stop_words()?, config.boost_keywords()?)
    }

    /// Normalize, embed and extract keywords from the job description once.
    pub fn prepare_job(&self, job_description: &str) -> Result<PreparedJob> {
        let normalized = self.text_processor.normalize(job_description);
        require_words(&normalized, "job description")?;

        let embedding = self.semantic_scorer.embed(&normalized)?;
        let keywords = self.text_processor.extract_keywords(job_description);
        let boost_presence = self.keyword_booster.presence(&normalized);

        Ok(PreparedJob {
            normalized,
            embedding,
            keywords,
            boost_presence,
        })
    }

    pub fn match_prepared(&self, job: &PreparedJob, resume_text: &str) -> Result<MatchResult> {
        let start_time = Instant::now();
        let resume_normalized = self.text_processor.normalize(resume_text);
        require_words(&resume_normalized, "resume")?;

        let semantic_score = self
            .semantic_scorer
            .score_against(&job.embedding, &resume_normalized)? as f64;

        let boost = self
            .keyword_booster
            .boost_with_presence(&job.boost_presence, &resume_normalized);

        let resume_keywords = self.text_processor.extract_keywords(resume_text);
        let final_score = compose_score(semantic_score, boost.score);

        log::debug!(
            "Matched resume in {:.2?}: final {:.2} (semantic {:.4}, keyword {:.4})",
            start_time.elapsed(),
            final_score,
            semantic_score,
            boost.score
        );

        Ok(MatchResult {
            final_score,
            semantic_score,
            keyword_score: boost.score,
            common_keywords: boost.common_keywords,
            jd_keywords: job.keywords.clone(),
            resume_keywords,
        })
    }

    /// Single entry point: score `resume_text` against `job_description`.
    pub fn match_resume(&self, job_description: &str, resume_text: &str) -> Result<MatchResult> {
        let job = self.prepare_job(job_description)?;
        self.match_prepared(&job, resume_text)
    }

    pub fn info(&self) -> MatcherInfo {
        MatcherInfo {
            embedding_model: self.semantic_scorer.model_name().to_string(),
            embedding_dimension: self.semantic_scorer.dimension(),
            boost_keyword_count: self.keyword_booster.keyword_count(),
            stop_word_count: self.text_processor.stop_words().len(),
        }
    }
}

/// Reject text with nothing to embed before it reaches the backend.
fn require_words(normalized: &str, what: &str) -> Result<()> {
    if normalized.unicode_words().next().is_none() {
        return Err(ResumeMatcherError::InsufficientInput(format!(
            "{} contains no words",
            what
        )));
    }
    Ok(())
}
