//! Parallel matching of many resumes against one job description

use crate::config::Config;
use crate::error::{Result, ResumeMatcherError};
use crate::processing::matcher::{MatchResult, ResumeMatcher};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

#[derive(Debug, Clone)]
pub struct ResumeInput {
    /// Display name, usually the file name
    pub name: String,
    pub text: String,
}

impl ResumeInput {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResumeOutcome {
    Matched { result: MatchResult },
    Failed { error: String },
    /// Not started because the batch was cancelled
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeMatch {
    pub name: String,
    #[serde(flatten)]
    pub outcome: ResumeOutcome,
}

impl ResumeMatch {
    pub fn result(&self) -> Option<&MatchResult> {
        match &self.outcome {
            ResumeOutcome::Matched { result } => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub embedding_model: String,
    /// One entry per input resume, in input order
    pub entries: Vec<ResumeMatch>,
    pub processing_time_ms: u64,
}

impl BatchReport {
    pub fn matched_count(&self) -> usize {
        self.entries.iter().filter(|e| e.result().is_some()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, ResumeOutcome::Failed { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, ResumeOutcome::Skipped))
            .count()
    }

    /// Put entries for inputs that never reached the batch (an unreadable
    /// file, say) back at their input positions. Indices refer to the full
    /// input list.
    pub fn merge_failures(&mut self, mut failures: Vec<(usize, ResumeMatch)>) {
        failures.sort_by_key(|(index, _)| *index);
        for (index, entry) in failures {
            let index = index.min(self.entries.len());
            self.entries.insert(index, entry);
        }
    }
}

/// Shared flag that stops a batch from starting new matches.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub max_concurrency: usize,
    /// Upper bound for a single resume's match
    pub timeout: Duration,
}

impl BatchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_concurrency: config.batch.max_concurrency.max(1),
            timeout: Duration::from_millis(config.batch.timeout_ms),
        }
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct BatchMatcher {
    matcher: Arc<ResumeMatcher>,
    options: BatchOptions,
}

impl BatchMatcher {
    pub fn new(matcher: Arc<ResumeMatcher>, options: BatchOptions) -> Self {
        Self { matcher, options }
    }

    pub async fn match_batch(
        &self,
        job_description: &str,
        resumes: Vec<ResumeInput>,
        cancel: &CancellationFlag,
    ) -> Result<BatchReport> {
        self.match_batch_with_progress(job_description, resumes, cancel, |_| {})
            .await
    }

    /// Match every resume, calling `on_complete` as each one finishes.
    ///
    /// Failures stay with their resume. Only a job description that cannot be
    /// prepared fails the whole batch.
    pub async fn match_batch_with_progress<F>(
        &self,
        job_description: &str,
        resumes: Vec<ResumeInput>,
        cancel: &CancellationFlag,
        mut on_complete: F,
    ) -> Result<BatchReport>
    where
        F: FnMut(&ResumeMatch),
    {
        let start_time = Instant::now();
        let timeout = self.options.timeout;

        let matcher = Arc::clone(&self.matcher);
        let job_text = job_description.to_string();
        let job = Arc::new(run_blocking(timeout, move || matcher.prepare_job(&job_text)).await?);

        log::info!(
            "Matching {} resume(s) with up to {} in parallel",
            resumes.len(),
            self.options.max_concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency));
        let names: Vec<String> = resumes.iter().map(|r| r.name.clone()).collect();
        let mut slots: Vec<Option<ResumeMatch>> = names.iter().map(|_| None).collect();
        let mut tasks = JoinSet::new();

        for (index, resume) in resumes.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let matcher = Arc::clone(&self.matcher);
            let job = Arc::clone(&job);
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let ResumeInput { name, text } = resume;

                let permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (index, ResumeMatch { name, outcome: ResumeOutcome::Skipped });
                    }
                };

                if cancel.is_cancelled() {
                    log::debug!("Batch cancelled, skipping {}", name);
                    return (index, ResumeMatch { name, outcome: ResumeOutcome::Skipped });
                }

                // The permit lives in the blocking closure so a timed out
                // match still counts against the limit until it returns.
                let work = move || {
                    let _permit = permit;
                    matcher.match_prepared(&job, &text)
                };
                let outcome = match run_blocking(timeout, work).await {
                    Ok(result) => ResumeOutcome::Matched { result },
                    Err(e) => {
                        log::warn!("Matching {} failed: {}", name, e);
                        ResumeOutcome::Failed { error: e.to_string() }
                    }
                };

                (index, ResumeMatch { name, outcome })
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, entry)) => {
                    on_complete(&entry);
                    slots[index] = Some(entry);
                }
                Err(e) => log::error!("Batch task aborted: {}", e),
            }
        }

        let entries = slots
            .into_iter()
            .zip(names)
            .map(|(slot, name)| {
                slot.unwrap_or(ResumeMatch {
                    name,
                    outcome: ResumeOutcome::Failed {
                        error: "matching task aborted".to_string(),
                    },
                })
            })
            .collect();

        Ok(BatchReport {
            embedding_model: self.matcher.info().embedding_model,
            entries,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

/// Run CPU-bound matching off the async workers, bounded by `timeout`.
async fn run_blocking<T, F>(timeout: Duration, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::task::spawn_blocking(work);
    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(ResumeMatcherError::Embedding(format!(
            "matching task panicked: {}",
            e
        ))),
        Err(_) => Err(ResumeMatcherError::EmbeddingTimeout(timeout.as_millis() as u64)),
    }
}
