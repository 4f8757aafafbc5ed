//! Keyword differences between a job description and a resume

use crate::processing::text_processor::KeywordSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeywordDiff {
    pub only_in_job: KeywordSet,
    pub only_in_resume: KeywordSet,
}

impl KeywordDiff {
    pub fn is_empty(&self) -> bool {
        self.only_in_job.is_empty() && self.only_in_resume.is_empty()
    }
}

pub fn diff_keywords(job_keywords: &KeywordSet, resume_keywords: &KeywordSet) -> KeywordDiff {
    KeywordDiff {
        only_in_job: job_keywords.difference(resume_keywords).cloned().collect(),
        only_in_resume: resume_keywords.difference(job_keywords).cloned().collect(),
    }
}
