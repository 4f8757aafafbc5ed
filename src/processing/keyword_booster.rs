//! Boost scoring over a fixed list of domain keywords

use crate::error::{Result, ResumeMatcherError};
use crate::processing::vocabulary::BoostKeywords;
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};

/// Checks which boost keywords occur in both documents.
///
/// Presence is substring containment in the normalized text, so `api` is
/// found inside `rapid`. Overlapping search keeps that semantics for keywords
/// that share characters.
pub struct KeywordBooster {
    keywords: BoostKeywords,
    matcher: AhoCorasick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordBoost {
    /// Fraction of boost keywords present in both texts
    pub score: f64,
    /// Matched keywords in boost list order
    pub common_keywords: Vec<String>,
}

impl KeywordBooster {
    pub fn new(keywords: BoostKeywords) -> Result<Self> {
        let matcher = AhoCorasick::new(keywords.as_slice()).map_err(|e| {
            ResumeMatcherError::Configuration(format!("Failed to build keyword matcher: {}", e))
        })?;

        Ok(Self { keywords, matcher })
    }

    /// Which boost keywords occur in `text`, indexed like the boost list.
    pub fn presence(&self, text: &str) -> Vec<bool> {
        let mut present = vec![false; self.keywords.len()];
        for mat in self.matcher.find_overlapping_iter(text) {
            present[mat.pattern().as_usize()] = true;
        }
        present
    }

    pub fn boost(&self, job_normalized: &str, resume_normalized: &str) -> KeywordBoost {
        let job_presence = self.presence(job_normalized);
        self.boost_with_presence(&job_presence, resume_normalized)
    }

    /// Boost against a job description whose presence vector was computed once.
    pub fn boost_with_presence(&self, job_presence: &[bool], resume_normalized: &str) -> KeywordBoost {
        let resume_presence = self.presence(resume_normalized);

        let common_keywords: Vec<String> = self
            .keywords
            .iter()
            .enumerate()
            .filter(|(i, _)| job_presence[*i] && resume_presence[*i])
            .map(|(_, keyword)| keyword.clone())
            .collect();

        let score = common_keywords.len() as f64 / self.keywords.len() as f64;

        KeywordBoost {
            score,
            common_keywords,
        }
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

impl Default for KeywordBooster {
    fn default() -> Self {
        Self::new(BoostKeywords::default()).expect("Failed to create default keyword booster")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boost_counts_keywords_in_both_texts() {
        let booster = KeywordBooster::default();
        let boost = booster.boost(
            "looking for a python developer with flask and nlp experience",
            "experienced python and flask engineer",
        );

        assert_eq!(boost.common_keywords, vec!["python", "flask"]);
        assert!((boost.score - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boost_follows_list_order() {
        let booster = KeywordBooster::default();
        let text = "nlp with spacy, then tensorflow, fastapi and python";
        let boost = booster.boost(text, text);

        assert_eq!(
            boost.common_keywords,
            vec!["python", "fastapi", "tensorflow", "spacy", "nlp"]
        );
    }

    #[test]
    fn test_boost_uses_substring_containment() {
        let booster = KeywordBooster::new(BoostKeywords::new(["api", "nlp"]).unwrap()).unwrap();
        let boost = booster.boost("rapid prototyping", "an api gateway");

        assert_eq!(boost.common_keywords, vec!["api"]);
        assert!((boost.score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overlapping_keywords_are_all_found() {
        let booster = KeywordBooster::new(BoostKeywords::new(["fastapi", "api"]).unwrap()).unwrap();
        assert_eq!(booster.presence("fastapi"), vec![true, true]);
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        let booster = KeywordBooster::default();
        let boost = booster.boost("whisk the eggs and sugar", "python flask nlp");

        assert!(boost.common_keywords.is_empty());
        assert_eq!(boost.score, 0.0);
    }

    #[test]
    fn test_boost_is_monotonic() {
        let booster = KeywordBooster::default();
        let mut job = String::from("python services");
        let mut resume = String::from("python scripts");
        let mut previous = booster.boost(&job, &resume).score;

        for keyword in ["flask", "nlp", "spacy", "python"] {
            job.push(' ');
            job.push_str(keyword);
            resume.push(' ');
            resume.push_str(keyword);

            let current = booster.boost(&job, &resume).score;
            assert!(current >= previous);
            previous = current;
        }
        assert!((previous - 0.5).abs() < f64::EPSILON);
    }
}
