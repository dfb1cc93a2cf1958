//! Stopword filtering
//!
//! This module provides multi-language stopword filtering using the `stop-words` crate
//! with support for custom stopword lists and stopword files.

use super::language::Language;
use crate::errors::{Result, SummarizeError};
use rustc_hash::FxHashSet;
use std::path::Path;
use stop_words::get;

/// A filter for removing stopwords from text
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    /// Set of stopwords (lowercase)
    stopwords: FxHashSet<String>,
}

impl StopwordFilter {
    /// Create a stopword filter with the built-in list for `language`
    ///
    /// Fails with a configuration error for languages without a built-in list.
    pub fn new(language: &str) -> Result<Self> {
        let language: Language = language.parse()?;
        Ok(Self::for_language(language))
    }

    /// Create a stopword filter for an already resolved language
    pub fn for_language(language: Language) -> Self {
        let stopwords = get(language.stop_words_language())
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        Self { stopwords }
    }

    /// Create an empty stopword filter (no filtering)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a stopword filter from a custom list
    pub fn from_list<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { stopwords }
    }

    /// Load a stopword list from a file with one word per line
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| SummarizeError::io(path, e))?;
        let contents = String::from_utf8(bytes).map_err(|_| {
            SummarizeError::input(format!(
                "stopword file {} is not valid UTF-8",
                path.display()
            ))
        })?;
        Ok(Self::from_list(contents.lines()))
    }

    /// Check if a word is a stopword (case-insensitive)
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Get the number of stopwords in the filter
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Check if the filter is empty
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
