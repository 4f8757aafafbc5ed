//! Fixed vocabularies shared read-only by every match: the English stop word
//! set used by keyword extraction and the ordered boost keyword list.

use crate::error::{Result, ResumeMatcherError};
use std::collections::HashSet;

/// Domain keywords whose joint presence boosts the match score.
pub const DEFAULT_BOOST_KEYWORDS: &[&str] = &[
    "python",
    "flask",
    "fastapi",
    "tensorflow",
    "spacy",
    "textacy",
    "fastembed",
    "nlp",
];

/// NLTK English stop word list.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "that'll", "these", "those", "am", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "having", "do",
    "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because",
    "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below",
    "to", "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t",
    "can", "will", "just", "don", "don't", "should", "should've", "now", "d", "ll",
    "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't",
    "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't",
    "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't", "mustn",
    "mustn't", "needn", "needn't", "shan", "shan't", "shouldn", "shouldn't", "wasn",
    "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Lowercased stop word set. Never empty.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Err(ResumeMatcherError::Configuration(
                "stop word list is empty".to_string(),
            ));
        }

        Ok(Self { words })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self {
            words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Ordered, duplicate-free, non-empty list of lowercase boost keywords.
#[derive(Debug, Clone)]
pub struct BoostKeywords {
    keywords: Vec<String>,
}

impl BoostKeywords {
    pub fn new<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();

        for raw in keywords {
            let keyword = raw.as_ref().trim().to_lowercase();
            if keyword.is_empty() {
                return Err(ResumeMatcherError::Configuration(
                    "boost keyword list contains a blank entry".to_string(),
                ));
            }
            if seen.insert(keyword.clone()) {
                ordered.push(keyword);
            } else {
                log::debug!("Ignoring duplicate boost keyword: {}", keyword);
            }
        }

        if ordered.is_empty() {
            return Err(ResumeMatcherError::Configuration(
                "boost keyword list is empty".to_string(),
            ));
        }

        Ok(Self { keywords: ordered })
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.keywords.iter()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for BoostKeywords {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_BOOST_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}
