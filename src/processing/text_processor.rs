//! Text normalization and keyword extraction

use crate::processing::vocabulary::StopWords;
use regex::Regex;
use std::collections::BTreeSet;

/// Unique significant terms of one document.
pub type KeywordSet = BTreeSet<String>;

pub struct TextProcessor {
    stop_words: StopWords,
    apis_regex: Regex,
    ml_regex: Regex,
    whitespace_regex: Regex,
    word_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new(StopWords::default())
    }
}

impl TextProcessor {
    pub fn new(stop_words: StopWords) -> Self {
        let apis_regex = Regex::new(r"\bapis\b").expect("Invalid apis regex");
        let ml_regex = Regex::new(r"\bml\b").expect("Invalid ml regex");
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");
        let word_regex = Regex::new(r"[A-Za-z]{3,}").expect("Invalid word regex");

        Self {
            stop_words,
            apis_regex,
            ml_regex,
            whitespace_regex,
            word_regex,
        }
    }

    /// Canonicalize text for the semantic and boost paths.
    ///
    /// Steps run in a fixed order: lowercase, `apis` -> `api`,
    /// `ml` -> `machine learning`, collapse whitespace, trim.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let expanded = self.apis_regex.replace_all(&lowered, "api");
        let expanded = self.ml_regex.replace_all(&expanded, "machine learning");
        self.whitespace_regex
            .replace_all(&expanded, " ")
            .trim()
            .to_string()
    }

    /// Extract the set of alphabetic terms of three or more letters that are
    /// not stop words. Works on raw text.
    pub fn extract_keywords(&self, text: &str) -> KeywordSet {
        self.word_regex
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(|word| !self.stop_words.contains(word))
            .collect()
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }
}
