//! Presentation model for match results

use crate::processing::batch::{BatchReport, ResumeOutcome};
use crate::processing::diff::KeywordDiff;
use crate::processing::matcher::MatchResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub generated_at: DateTime<Utc>,
    pub job_source: String,
    pub embedding_model: String,
    pub processing_time_ms: u64,
    pub summary: ReportSummary,
    /// Matched resumes by final score (best first), then failures and skips
    pub entries: Vec<ReportEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub matched: usize,
    pub failed: usize,
    pub skipped: usize,
    pub best_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub strength: Option<MatchStrength>,
    #[serde(flatten)]
    pub outcome: ResumeOutcome,
    pub keyword_diff: Option<DiffTable>,
}

impl ReportEntry {
    pub fn result(&self) -> Option<&MatchResult> {
        match &self.outcome {
            ResumeOutcome::Matched { result } => Some(result),
            _ => None,
        }
    }
}

/// Feedback band for a final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrength {
    Strong,
    Moderate,
    Weak,
}

impl MatchStrength {
    pub fn from_score(final_score: f64) -> Self {
        if final_score > 85.0 {
            MatchStrength::Strong
        } else if final_score > 60.0 {
            MatchStrength::Moderate
        } else {
            MatchStrength::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStrength::Strong => "Great Match",
            MatchStrength::Moderate => "Moderate Match",
            MatchStrength::Weak => "Poor Match",
        }
    }
}

/// Two-column keyword difference table, equal length columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffTable {
    pub rows: Vec<DiffRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRow {
    pub only_in_job: String,
    pub only_in_resume: String,
}

impl DiffTable {
    /// Sorted columns; an empty column shows `-`, the shorter one is padded
    /// with blanks.
    pub fn from_diff(diff: &KeywordDiff) -> Self {
        let column = |set: &crate::processing::text_processor::KeywordSet| -> Vec<String> {
            if set.is_empty() {
                vec!["-".to_string()]
            } else {
                set.iter().cloned().collect()
            }
        };

        let mut job_column = column(&diff.only_in_job).into_iter();
        let mut resume_column = column(&diff.only_in_resume).into_iter();
        let mut rows = Vec::new();

        loop {
            match (job_column.next(), resume_column.next()) {
                (None, None) => break,
                (job, resume) => rows.push(DiffRow {
                    only_in_job: job.unwrap_or_default(),
                    only_in_resume: resume.unwrap_or_default(),
                }),
            }
        }

        Self { rows }
    }
}

impl MatchReport {
    pub fn from_batch(batch: BatchReport, job_source: impl Into<String>) -> Self {
        let mut entries: Vec<ReportEntry> = batch
            .entries
            .into_iter()
            .map(|entry| {
                let (strength, keyword_diff) = match &entry.outcome {
                    ResumeOutcome::Matched { result } => (
                        Some(MatchStrength::from_score(result.final_score)),
                        Some(DiffTable::from_diff(&result.keyword_diff())),
                    ),
                    _ => (None, None),
                };
                ReportEntry {
                    name: entry.name,
                    strength,
                    outcome: entry.outcome,
                    keyword_diff,
                }
            })
            .collect();

        entries.sort_by(compare_entries);

        let summary = ReportSummary {
            total: entries.len(),
            matched: entries.iter().filter(|e| e.result().is_some()).count(),
            failed: entries
                .iter()
                .filter(|e| matches!(e.outcome, ResumeOutcome::Failed { .. }))
                .count(),
            skipped: entries
                .iter()
                .filter(|e| matches!(e.outcome, ResumeOutcome::Skipped))
                .count(),
            best_score: entries.iter().find_map(|e| e.result()).map(|r| r.final_score),
        };

        Self {
            generated_at: Utc::now(),
            job_source: job_source.into(),
            embedding_model: batch.embedding_model,
            processing_time_ms: batch.processing_time_ms,
            summary,
            entries,
        }
    }
}

fn outcome_rank(outcome: &ResumeOutcome) -> u8 {
    match outcome {
        ResumeOutcome::Matched { .. } => 0,
        ResumeOutcome::Failed { .. } => 1,
        ResumeOutcome::Skipped => 2,
    }
}

fn compare_entries(a: &ReportEntry, b: &ReportEntry) -> Ordering {
    match (a.result(), b.result()) {
        (Some(ra), Some(rb)) => rb
            .final_score
            .partial_cmp(&ra.final_score)
            .unwrap_or(Ordering::Equal),
        _ => outcome_rank(&a.outcome).cmp(&outcome_rank(&b.outcome)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::batch::ResumeMatch;
    use crate::processing::text_processor::KeywordSet;

    fn set(words: &[&str]) -> KeywordSet {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn matched(name: &str, final_score: f64) -> ResumeMatch {
        ResumeMatch {
            name: name.to_string(),
            outcome: ResumeOutcome::Matched {
                result: MatchResult {
                    final_score,
                    semantic_score: final_score / 100.0,
                    keyword_score: 0.0,
                    common_keywords: vec![],
                    jd_keywords: set(&["python", "flask"]),
                    resume_keywords: set(&["python"]),
                },
            },
        }
    }

    #[test]
    fn test_strength_thresholds() {
        assert_eq!(MatchStrength::from_score(92.5), MatchStrength::Strong);
        assert_eq!(MatchStrength::from_score(85.0), MatchStrength::Moderate);
        assert_eq!(MatchStrength::from_score(60.01), MatchStrength::Moderate);
        assert_eq!(MatchStrength::from_score(60.0), MatchStrength::Weak);
        assert_eq!(MatchStrength::from_score(0.0), MatchStrength::Weak);
    }

    #[test]
    fn test_diff_table_pads_columns() {
        let diff = KeywordDiff {
            only_in_job: set(&["nlp", "developer", "looking"]),
            only_in_resume: set(&["engineer"]),
        };
        let table = DiffTable::from_diff(&diff);

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].only_in_job, "developer");
        assert_eq!(table.rows[0].only_in_resume, "engineer");
        assert_eq!(table.rows[2].only_in_job, "nlp");
        assert_eq!(table.rows[2].only_in_resume, "");
    }

    #[test]
    fn test_diff_table_marks_empty_columns() {
        let table = DiffTable::from_diff(&KeywordDiff::default());
        assert_eq!(
            table.rows,
            vec![DiffRow {
                only_in_job: "-".to_string(),
                only_in_resume: "-".to_string(),
            }]
        );
    }

    #[test]
    fn test_report_orders_entries() {
        let batch = BatchReport {
            embedding_model: "hashing-256".to_string(),
            entries: vec![
                ResumeMatch {
                    name: "skipped.txt".to_string(),
                    outcome: ResumeOutcome::Skipped,
                },
                matched("low.txt", 41.0),
                ResumeMatch {
                    name: "broken.pdf".to_string(),
                    outcome: ResumeOutcome::Failed {
                        error: "Embedding timed out after 50ms".to_string(),
                    },
                },
                matched("high.txt", 88.2),
            ],
            processing_time_ms: 12,
        };

        let report = MatchReport::from_batch(batch, "job.txt");
        let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["high.txt", "low.txt", "broken.pdf", "skipped.txt"]);
        assert_eq!(report.entries[0].strength, Some(MatchStrength::Strong));
        assert_eq!(report.entries[1].strength, Some(MatchStrength::Weak));
        assert!(report.entries[2].keyword_diff.is_none());
        assert_eq!(report.summary.matched, 2);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.best_score, Some(88.2));
    }
}
