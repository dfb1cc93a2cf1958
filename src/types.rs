//! Core types for rapid_summarizer
//!
//! This module defines the data flowing between pipeline stages: the
//! segmented document, the weighting options of the term matrix, the shared
//! summarizer configuration and the returned summary.

use crate::errors::{Result, SummarizeError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Segmented document
// ============================================================================

/// The surviving sentences of one document.
///
/// `normalized[i]` and `display[i]` always describe the same sentence; the
/// index is the sentence identity for every later stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceSet {
    /// Lower-cased, stop-word-free, stemmed terms joined by single spaces
    pub normalized: Vec<String>,
    /// Original wording for output
    pub display: Vec<String>,
}

impl SentenceSet {
    /// Build from two index-aligned sequences
    pub fn new(normalized: Vec<String>, display: Vec<String>) -> Self {
        debug_assert_eq!(normalized.len(), display.len());
        Self {
            normalized,
            display,
        }
    }

    /// Number of surviving sentences
    pub fn len(&self) -> usize {
        self.display.len()
    }

    /// Check if no sentence survived filtering
    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }

    /// Display sentences at the given indices, in the order given
    pub fn select(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .filter_map(|&i| self.display.get(i).cloned())
            .collect()
    }
}

// ============================================================================
// Matrix options
// ============================================================================

/// How a term occurrence is turned into a matrix weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// 1 if the term occurs in the sentence, else 0
    Binary,
    /// Raw term count
    #[default]
    Frequency,
    /// Term count scaled by smoothed inverse document frequency
    Tfidf,
}

impl Weighting {
    /// Name used in configuration files and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Weighting::Binary => "binary",
            Weighting::Frequency => "frequency",
            Weighting::Tfidf => "tfidf",
        }
    }
}

impl FromStr for Weighting {
    type Err = SummarizeError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "binary" => Ok(Weighting::Binary),
            "frequency" => Ok(Weighting::Frequency),
            "tfidf" | "tf-idf" => Ok(Weighting::Tfidf),
            other => Err(SummarizeError::invalid_config(format!(
                "weighting must be one of \"binary\", \"frequency\" or \"tfidf\", got {other:?}"
            ))),
        }
    }
}

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    /// Leave rows as weighted
    #[default]
    None,
    /// Rows sum to 1 in absolute value
    L1,
    /// Rows have unit Euclidean length
    L2,
}

impl Norm {
    /// Name used in configuration files and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Norm::None => "none",
            Norm::L1 => "l1",
            Norm::L2 => "l2",
        }
    }
}

impl FromStr for Norm {
    type Err = SummarizeError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "none" | "" => Ok(Norm::None),
            "l1" => Ok(Norm::L1),
            "l2" => Ok(Norm::L2),
            other => Err(SummarizeError::invalid_config(format!(
                "norm can only take the values \"l1\", \"l2\" or none, got {other:?}"
            ))),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Default minimum number of significant terms a sentence must exceed
pub const DEFAULT_MIN_SIGNIFICANT_TERMS: usize = 5;

/// Default summary length (in sentences)
pub const DEFAULT_LENGTH: f64 = 5.0;

/// Settings shared by every summarizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Summary length: a sentence count (>= 1) or a fraction in (0, 1)
    pub length: f64,
    /// Sentences with at most this many normalized terms are dropped
    pub min_significant_terms: usize,
    /// Language tag for stop words and stemming (e.g. "en", "german")
    pub language: String,
    /// Explicit stop words; replaces the built-in list when non-empty
    #[serde(default)]
    pub stopwords: Vec<String>,
    /// Words whose trailing period does not end a sentence
    #[serde(default)]
    pub abbreviations: Option<Vec<String>>,
    /// Wall-clock budget for one summarize call
    #[serde(default)]
    pub time_limit: Option<Duration>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            min_significant_terms: DEFAULT_MIN_SIGNIFICANT_TERMS,
            language: "en".to_string(),
            stopwords: Vec::new(),
            abbreviations: None,
            time_limit: None,
        }
    }
}

impl SummarizerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(SummarizeError::invalid_config(format!(
                "length must be a positive number, got {}",
                self.length
            )));
        }

        if let Some(limit) = self.time_limit {
            if limit.is_zero() {
                return Err(SummarizeError::invalid_config("time_limit must be > 0"));
            }
        }

        Ok(())
    }

    /// Builder method: set summary length
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Builder method: set the significant-term threshold
    pub fn with_min_significant_terms(mut self, min: usize) -> Self {
        self.min_significant_terms = min;
        self
    }

    /// Builder method: set language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Builder method: set explicit stop words
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = words.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method: set abbreviations
    pub fn with_abbreviations<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abbreviations = Some(words.into_iter().map(Into::into).collect());
        self
    }

    /// Builder method: set a per-call time limit
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

// ============================================================================
// Summary
// ============================================================================

/// A recoverable condition: the summary is usable but may be degraded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SummaryWarning {
    /// More topics were requested than the matrix can support
    TopicsClamped { requested: usize, used: usize },
}

impl std::fmt::Display for SummaryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryWarning::TopicsClamped { requested, used } => write!(
                f,
                "requested {requested} topics but the matrix only supports {used}; \
                 summary quality may be degraded"
            ),
        }
    }
}

/// Output of a summarize call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Selected display sentences in document order
    pub sentences: Vec<String>,
    /// Indices of the selected sentences among the surviving sentences
    pub indices: Vec<usize>,
    /// Recoverable warnings raised while ranking
    pub warnings: Vec<SummaryWarning>,
}

impl Summary {
    /// Number of selected sentences
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Check if nothing was selected
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Whether any warning was raised
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Consume the summary, keeping only the sentences
    pub fn into_sentences(self) -> Vec<String> {
        self.sentences
    }
}
