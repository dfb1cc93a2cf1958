//! Sentence and word tokenization
//!
//! The [`Tokenizer`] turns raw text into the two index-aligned sentence
//! sequences every summarizer consumes: display sentences for output and
//! normalized term strings for scoring.

use super::language::Language;
use super::splitter::SentenceSplitter;
use super::stopwords::StopwordFilter;
use crate::errors::Result;
use crate::types::{SentenceSet, SummarizerConfig};
use rust_stemmers::Stemmer;
use std::path::Path;
use tracing::debug;

/// Language-aware tokenizer with stop-word removal and Snowball stemming
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// `None` only when explicit stop words were given for an unsupported language
    language: Option<Language>,
    stopwords: StopwordFilter,
    splitter: SentenceSplitter,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::for_language(Language::English)
    }
}

impl Tokenizer {
    /// Create a tokenizer with the built-in stop words of `language`
    pub fn new(language: &str) -> Result<Self> {
        let language: Language = language.parse()?;
        Ok(Self::for_language(language))
    }

    /// Create a tokenizer for an already resolved language
    pub fn for_language(language: Language) -> Self {
        Self {
            language: Some(language),
            stopwords: StopwordFilter::for_language(language),
            splitter: SentenceSplitter::new(),
        }
    }

    /// Create a tokenizer with an explicit stop-word list
    ///
    /// An unsupported language is accepted here; stemming is then disabled.
    pub fn with_stopwords<I, S>(language: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            language: Language::parse(language),
            stopwords: StopwordFilter::from_list(words),
            splitter: SentenceSplitter::new(),
        }
    }

    /// Create a tokenizer whose stop words are read from a file
    pub fn with_stopword_file(language: &str, path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            language: Language::parse(language),
            stopwords: StopwordFilter::from_file(path)?,
            splitter: SentenceSplitter::new(),
        })
    }

    /// Build the tokenizer described by a summarizer config
    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        let tokenizer = if config.stopwords.is_empty() {
            Self::new(&config.language)?
        } else {
            Self::with_stopwords(&config.language, &config.stopwords)
        };

        Ok(match &config.abbreviations {
            Some(abbreviations) => {
                tokenizer.with_splitter(SentenceSplitter::with_abbreviations(abbreviations))
            }
            None => tokenizer,
        })
    }

    /// Replace the sentence splitter
    pub fn with_splitter(mut self, splitter: SentenceSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// The stemming language, if any
    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// The active stop words
    pub fn stopwords(&self) -> &StopwordFilter {
        &self.stopwords
    }

    fn stemmer(&self) -> Option<Stemmer> {
        self.language
            .map(|lang| Stemmer::create(lang.stemmer_algorithm()))
    }

    /// Remove all stopwords from a list of word tokens
    pub fn remove_stopwords<'a>(&self, tokens: &[&'a str]) -> Vec<&'a str> {
        tokens
            .iter()
            .copied()
            .filter(|t| !self.stopwords.is_stopword(t))
            .collect()
    }

    /// Stem a single word (identity when stemming is disabled)
    pub fn stem(&self, word: &str) -> String {
        stem_with(self.stemmer().as_ref(), word)
    }

    /// Stem every token
    pub fn stem_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        let stemmer = self.stemmer();
        tokens
            .iter()
            .map(|t| stem_with(stemmer.as_ref(), t.as_ref()))
            .collect()
    }

    /// Strip leading and trailing punctuation
    pub fn strip_punctuation(text: &str) -> &str {
        text.trim_matches(is_punctuation)
    }

    /// Split text into words with surrounding punctuation removed
    pub fn tokenize_words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_whitespace()
            .map(Self::strip_punctuation)
            .filter(|w| !w.is_empty())
            .collect()
    }

    /// Lower-case, strip punctuation, drop stop words and stem
    pub fn sanitize_text(&self, text: &str) -> String {
        self.normalize(text, self.stemmer().as_ref())
    }

    fn normalize(&self, text: &str, stemmer: Option<&Stemmer>) -> String {
        let lowered = text.to_lowercase();
        self.tokenize_words(&lowered)
            .into_iter()
            .filter(|w| !self.stopwords.is_stopword(w))
            .map(|w| stem_with(stemmer, w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Split text into display sentences
    pub fn tokenize_sentences(&self, text: &str) -> Vec<String> {
        self.splitter.split(text)
    }

    /// Split text into paragraphs (non-empty trimmed lines)
    pub fn tokenize_paragraphs(&self, text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Segment text into aligned normalized and display sentences
    ///
    /// Sentences with at most `min_significant_terms` normalized terms are
    /// dropped from both sequences.
    pub fn segment(&self, text: &str, min_significant_terms: usize) -> SentenceSet {
        let sentences = self.tokenize_sentences(text);
        let total = sentences.len();
        let stemmer = self.stemmer();

        let (normalized, originals): (Vec<String>, Vec<String>) = sentences
            .into_iter()
            .map(|sentence| (self.normalize(&sentence, stemmer.as_ref()), sentence))
            .filter(|(normalized, _)| normalized.split_whitespace().count() > min_significant_terms)
            .unzip();

        let kept = originals.len();
        debug!(total, kept, min_significant_terms, "segmented document");

        SentenceSet::new(normalized, originals)
    }
}

fn stem_with(stemmer: Option<&Stemmer>, word: &str) -> String {
    match stemmer {
        Some(stemmer) => stemmer.stem(word).into_owned(),
        None => word.to_string(),
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '“' | '”' | '‘' | '’' | '«' | '»' | '…' | '—' | '–'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_tokenizer() -> Tokenizer {
        Tokenizer::with_stopwords(
            "english",
            ["this", "is", "a", "do", "you", "want", "to", "and"],
        )
    }

    #[test]
    fn test_segment_without_threshold() {
        let tokenizer = custom_tokenizer();
        let text = "This is a sentence. Lorem ipsum dolor sit amet...\nFinal sentence";

        let set = tokenizer.segment(text, 0);

        assert_eq!(
            set.normalized,
            vec!["sentenc", "lorem ipsum dolor sit amet", "final sentenc"]
        );
        assert_eq!(
            set.display,
            vec![
                "This is a sentence.",
                "Lorem ipsum dolor sit amet...",
                "Final sentence"
            ]
        );
    }

    #[test]
    fn test_segment_drops_short_sentences() {
        let tokenizer = custom_tokenizer();
        let text = "This is a sentence. Lorem ipsum dolor sit amet...\nFinal sentence";

        let set = tokenizer.segment(text, 2);

        assert_eq!(set.len(), 1);
        assert_eq!(set.display, vec!["Lorem ipsum dolor sit amet..."]);
        assert_eq!(set.normalized, vec!["lorem ipsum dolor sit amet"]);
    }

    #[test]
    fn test_tokenize_words() {
        let tokenizer = Tokenizer::default();
        let words = tokenizer.tokenize_words("This is a sentence. Word.");
        assert_eq!(words, vec!["This", "is", "a", "sentence", "Word"]);
    }

    #[test]
    fn test_tokenize_paragraphs() {
        let tokenizer = Tokenizer::default();
        let text = "
            Here is a bunch of text.

            Another paragraph.
            Yet another paragraph.
            ";
        assert_eq!(
            tokenizer.tokenize_paragraphs(text),
            vec![
                "Here is a bunch of text.",
                "Another paragraph.",
                "Yet another paragraph."
            ]
        );
    }

    #[test]
    fn test_stem() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.stem("stupidity"), "stupid");
        assert_eq!(
            tokenizer.stem_tokens(&["stupidity", "pieces", "and"][..]),
            vec!["stupid", "piec", "and"]
        );
    }

    #[test]
    fn test_remove_stopwords() {
        let tokenizer = custom_tokenizer();
        let tokens = ["Do", "you", "want", "to", "play", "a", "game"];
        assert_eq!(tokenizer.remove_stopwords(&tokens), vec!["play", "game"]);
    }

    #[test]
    fn test_strip_punctuation() {
        assert_eq!(Tokenizer::strip_punctuation("\"(hello)!\""), "hello");
        assert_eq!(Tokenizer::strip_punctuation("don't"), "don't");
        assert_eq!(Tokenizer::strip_punctuation("..."), "");
    }

    #[test]
    fn test_sanitize_text() {
        let tokenizer = custom_tokenizer();
        assert_eq!(
            tokenizer.sanitize_text("This is a Sentence, and MORE sentences!"),
            "sentenc more sentenc"
        );
    }

    #[test]
    fn test_unknown_language() {
        assert!(Tokenizer::new("nonexistent language")
            .unwrap_err()
            .is_config_error());

        // Explicit stop words make the language optional; stemming is skipped.
        let tokenizer = Tokenizer::with_stopwords("klingon", ["the"]);
        assert_eq!(tokenizer.language(), None);
        assert_eq!(tokenizer.sanitize_text("The running dogs"), "running dogs");
    }

    #[test]
    fn test_from_config() {
        let config = SummarizerConfig::default()
            .with_stopwords(["the"])
            .with_abbreviations(["approx"]);
        let tokenizer = Tokenizer::from_config(&config).unwrap();
        assert_eq!(tokenizer.stopwords().len(), 1);
        assert_eq!(
            tokenizer.tokenize_sentences("It is approx. ten. Done."),
            vec!["It is approx. ten.", "Done."]
        );

        let config = SummarizerConfig::default().with_language("xx");
        assert!(Tokenizer::from_config(&config).is_err());
    }
}
