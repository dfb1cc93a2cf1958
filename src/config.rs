//! Declarative summarizer configuration.
//!
//! A [`SummarizerSpec`] names an algorithm and its parameters, typically read
//! from JSON, and builds the matching [`Summarizer`].
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "algorithm": "lsa_steinberger",
//!   "length": 0.3,
//!   "topics": 4,
//!   "topic_sigma_threshold": 0.5,
//!   "language": "en",
//!   "time_limit_ms": 2000,
//!   "strict": true
//! }
//! ```
//!
//! Options that do not apply to the chosen algorithm (for example `topics`
//! with `textrank`) are configuration errors. Unrecognized fields are errors
//! when `strict` is set and logged warnings otherwise.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{Result, SummarizeError};
use crate::summarizer::{LsaOzsoy, LsaSteinberger, RelevanceSummarizer, Summarizer, TextRankSummarizer};
use crate::types::{Norm, SummarizerConfig, Weighting, DEFAULT_LENGTH, DEFAULT_MIN_SIGNIFICANT_TERMS};

/// The available ranking algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// LSA, strength-threshold variant.
    LsaSteinberger,
    /// LSA, cross (above-mean) variant.
    LsaOzsoy,
    /// Greedy relevance with coverage discount.
    Relevance,
    /// PageRank over the sentence similarity graph.
    Textrank,
}

impl Algorithm {
    /// Returns the user-facing name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LsaSteinberger => "lsa_steinberger",
            Self::LsaOzsoy => "lsa_ozsoy",
            Self::Relevance => "relevance",
            Self::Textrank => "textrank",
        }
    }

    fn is_lsa(&self) -> bool {
        matches!(self, Self::LsaSteinberger | Self::LsaOzsoy)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SummarizeError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "lsa_steinberger" | "steinberger" => Ok(Self::LsaSteinberger),
            "lsa_ozsoy" | "ozsoy" | "lsa" => Ok(Self::LsaOzsoy),
            "relevance" => Ok(Self::Relevance),
            "textrank" => Ok(Self::Textrank),
            other => Err(SummarizeError::invalid_config(format!(
                "unknown algorithm {other:?}; expected lsa_steinberger, lsa_ozsoy, relevance or textrank"
            ))),
        }
    }
}

fn default_length() -> f64 {
    DEFAULT_LENGTH
}

fn default_language() -> String {
    "en".to_string()
}

fn default_min_significant_terms() -> usize {
    DEFAULT_MIN_SIGNIFICANT_TERMS
}

/// Serializable description of a summarizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerSpec {
    /// Algorithm name (see [`Algorithm`]).
    pub algorithm: String,

    /// Sentence count, or a fraction in (0, 1).
    #[serde(default = "default_length")]
    pub length: f64,

    /// Number of concepts (LSA only).
    #[serde(default)]
    pub topics: Option<usize>,

    /// Term presence instead of counts (LSA and relevance).
    #[serde(default)]
    pub binary_matrix: Option<bool>,

    /// Concept strength cutoff in [0, 1] (LSA only).
    #[serde(default)]
    pub topic_sigma_threshold: Option<f64>,

    /// `binary`, `frequency` or `tfidf` (TextRank only).
    #[serde(default)]
    pub weighting: Option<String>,

    /// `none`, `l1` or `l2` (TextRank only).
    #[serde(default)]
    pub norm: Option<String>,

    /// PageRank damping (TextRank only).
    #[serde(default)]
    pub damping: Option<f64>,

    /// Language tag for stop words and stemming.
    #[serde(default = "default_language")]
    pub language: String,

    /// Explicit stop words replacing the built-in list.
    #[serde(default)]
    pub stopwords: Vec<String>,

    /// Sentences with at most this many normalized terms are dropped.
    #[serde(default = "default_min_significant_terms")]
    pub min_significant_terms: usize,

    /// Custom abbreviation list for the sentence splitter.
    #[serde(default)]
    pub abbreviations: Option<Vec<String>>,

    /// Per-call time limit in milliseconds.
    #[serde(default)]
    pub time_limit_ms: Option<u64>,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl SummarizerSpec {
    /// A spec for `algorithm` with every option at its default.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm: algorithm.as_str().to_string(),
            length: DEFAULT_LENGTH,
            topics: None,
            binary_matrix: None,
            topic_sigma_threshold: None,
            weighting: None,
            norm: None,
            damping: None,
            language: default_language(),
            stopwords: Vec::new(),
            min_significant_terms: DEFAULT_MIN_SIGNIFICANT_TERMS,
            abbreviations: None,
            time_limit_ms: None,
            strict: false,
            unknown_fields: HashMap::new(),
        }
    }

    /// Parse a spec from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SummarizeError::invalid_config(format!("invalid summarizer spec: {e}")))
    }

    /// Serialize the spec to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| SummarizeError::invalid_config(format!("cannot serialize spec: {e}")))
    }

    /// The parsed algorithm.
    pub fn algorithm(&self) -> Result<Algorithm> {
        self.algorithm.parse()
    }

    /// The shared settings described by this spec.
    pub fn summarizer_config(&self) -> SummarizerConfig {
        SummarizerConfig {
            length: self.length,
            min_significant_terms: self.min_significant_terms,
            language: self.language.clone(),
            stopwords: self.stopwords.clone(),
            abbreviations: self.abbreviations.clone(),
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }

    /// Check every field against the chosen algorithm.
    pub fn validate(&self) -> Result<()> {
        let algorithm = self.algorithm()?;

        if !self.unknown_fields.is_empty() {
            let mut names: Vec<&str> = self.unknown_fields.keys().map(String::as_str).collect();
            names.sort_unstable();
            if self.strict {
                return Err(SummarizeError::invalid_config(format!(
                    "unknown field(s): {}",
                    names.join(", ")
                )));
            }
            warn!(fields = ?names, "ignoring unknown summarizer spec fields");
        }

        let misplaced = |option: &str, present: bool, applies: bool| -> Result<()> {
            if present && !applies {
                Err(SummarizeError::invalid_config(format!(
                    "option {option:?} does not apply to {algorithm}"
                )))
            } else {
                Ok(())
            }
        };
        misplaced("topics", self.topics.is_some(), algorithm.is_lsa())?;
        misplaced(
            "topic_sigma_threshold",
            self.topic_sigma_threshold.is_some(),
            algorithm.is_lsa(),
        )?;
        misplaced(
            "binary_matrix",
            self.binary_matrix.is_some(),
            algorithm != Algorithm::Textrank,
        )?;
        misplaced("weighting", self.weighting.is_some(), algorithm == Algorithm::Textrank)?;
        misplaced("norm", self.norm.is_some(), algorithm == Algorithm::Textrank)?;
        misplaced("damping", self.damping.is_some(), algorithm == Algorithm::Textrank)?;

        if let Some(weighting) = &self.weighting {
            weighting.parse::<Weighting>()?;
        }
        if let Some(norm) = &self.norm {
            norm.parse::<Norm>()?;
        }

        // Parameter domains are checked by the summarizer itself.
        self.build_unchecked(algorithm)?.validate()
    }

    /// Validate the spec and build the summarizer it describes.
    pub fn build(&self) -> Result<Box<dyn Summarizer>> {
        self.validate()?;
        self.build_unchecked(self.algorithm()?)
    }

    fn build_unchecked(&self, algorithm: Algorithm) -> Result<Box<dyn Summarizer>> {
        let config = self.summarizer_config();

        Ok(match algorithm {
            Algorithm::LsaSteinberger => {
                let mut summarizer = LsaSteinberger::new().with_config(config)?;
                if let Some(topics) = self.topics {
                    summarizer = summarizer.with_topics(topics);
                }
                if let Some(binary) = self.binary_matrix {
                    summarizer = summarizer.with_binary_matrix(binary);
                }
                if let Some(threshold) = self.topic_sigma_threshold {
                    summarizer = summarizer.with_topic_sigma_threshold(threshold);
                }
                Box::new(summarizer)
            }
            Algorithm::LsaOzsoy => {
                let mut summarizer = LsaOzsoy::new().with_config(config)?;
                if let Some(topics) = self.topics {
                    summarizer = summarizer.with_topics(topics);
                }
                if let Some(binary) = self.binary_matrix {
                    summarizer = summarizer.with_binary_matrix(binary);
                }
                if let Some(threshold) = self.topic_sigma_threshold {
                    summarizer = summarizer.with_topic_sigma_threshold(threshold);
                }
                Box::new(summarizer)
            }
            Algorithm::Relevance => {
                let mut summarizer = RelevanceSummarizer::new().with_config(config)?;
                if let Some(binary) = self.binary_matrix {
                    summarizer = summarizer.with_binary_matrix(binary);
                }
                Box::new(summarizer)
            }
            Algorithm::Textrank => {
                let mut summarizer = TextRankSummarizer::new().with_config(config)?;
                if let Some(weighting) = &self.weighting {
                    summarizer = summarizer.with_weighting(weighting.parse()?);
                }
                if let Some(norm) = &self.norm {
                    summarizer = summarizer.with_norm(norm.parse()?);
                }
                if let Some(damping) = self.damping {
                    summarizer = summarizer.with_damping(damping);
                }
                Box::new(summarizer)
            }
        })
    }
}
