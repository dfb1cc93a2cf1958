//! Extractive summarizers
//!
//! Every summarizer runs the same pipeline (load, segment, resolve length,
//! rank) and differs only in how it ranks the surviving sentences. The
//! shared part lives in the provided methods of [`Summarizer`]; each
//! algorithm implements [`Summarizer::select`].

pub use crate::deadline::Deadline;
use crate::errors::Result;
use crate::loader::{DefaultTextLoader, TextLoader};
use crate::nlp::tokenizer::Tokenizer;
use crate::types::{SentenceSet, Summary, SummarizerConfig, SummaryWarning};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Enter a tracing span named after the current stage
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("summarize_stage", stage = $name).entered();
    };
}

/// Builder methods every summarizer shares
macro_rules! shared_builders {
    ($ty:ty) => {
        impl $ty {
            /// Replace the shared settings
            ///
            /// The tokenizer is rebuilt from `config` only when its language,
            /// stop words or abbreviations differ from the current settings, so
            /// a tokenizer set with `with_tokenizer` survives a config that
            /// changes only the length, threshold or time limit.
            pub fn with_config(mut self, config: $crate::types::SummarizerConfig) -> $crate::errors::Result<Self> {
                self.base = self.base.with_config(config)?;
                Ok(self)
            }

            /// Set the summary length (sentence count, or a fraction in (0, 1))
            pub fn with_length(mut self, length: f64) -> Self {
                self.base.config.length = length;
                self
            }

            /// Set the minimum number of significant terms a sentence must exceed
            pub fn with_min_significant_terms(mut self, min: usize) -> Self {
                self.base.config.min_significant_terms = min;
                self
            }

            /// Bound the wall-clock time of one summarize call
            pub fn with_time_limit(mut self, limit: std::time::Duration) -> Self {
                self.base.config.time_limit = Some(limit);
                self
            }

            /// Use a custom tokenizer
            pub fn with_tokenizer(mut self, tokenizer: $crate::nlp::tokenizer::Tokenizer) -> Self {
                self.base.tokenizer = tokenizer;
                self
            }

            /// Use a custom document loader
            pub fn with_loader(mut self, loader: impl $crate::loader::TextLoader + 'static) -> Self {
                self.base.loader = std::sync::Arc::new(loader);
                self
            }
        }
    };
}

pub mod length;
pub mod lsa;
pub mod relevance;
pub mod textrank;

pub use length::resolve_length;
pub use lsa::{LsaOzsoy, LsaSteinberger, LsaSummarizer};
pub use relevance::RelevanceSummarizer;
pub use textrank::TextRankSummarizer;

/// Sentences picked by a ranker, plus anything worth telling the caller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Picked sentence indices, in any order
    pub indices: Vec<usize>,
    /// Recoverable warnings raised while ranking
    pub warnings: Vec<SummaryWarning>,
}

impl Selection {
    /// A selection without warnings
    pub fn new(indices: Vec<usize>) -> Self {
        Self {
            indices,
            warnings: Vec::new(),
        }
    }

    /// Attach warnings
    pub fn with_warnings(mut self, warnings: Vec<SummaryWarning>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// An extractive summarization algorithm
///
/// Implementors provide their components and [`select`](Summarizer::select);
/// loading, segmentation, length resolution and ordering of the output are
/// shared.
pub trait Summarizer: Send + Sync + std::fmt::Debug {
    /// Short algorithm name, as used in configuration files
    fn name(&self) -> &'static str;

    /// Shared settings
    fn config(&self) -> &SummarizerConfig;

    /// Sentence pipeline
    fn tokenizer(&self) -> &Tokenizer;

    /// Document loader
    fn loader(&self) -> &dyn TextLoader;

    /// Check all parameters before any work is done
    fn validate(&self) -> Result<()> {
        self.config().validate()
    }

    /// Pick `count` sentences from `sentences`
    ///
    /// Called only with `1 <= count < sentences.len()`.
    fn select(&self, sentences: &SentenceSet, count: usize, deadline: &Deadline)
        -> Result<Selection>;

    /// Summarize a URL, a `.txt` path or raw text
    fn summarize(&self, input: &str) -> Result<Summary> {
        self.validate()?;
        let deadline = Deadline::start(self.config().time_limit);

        let text = {
            trace_stage!("load");
            self.loader().load(input)?
        };
        deadline.check("load")?;

        run_pipeline(self, &text, &deadline)
    }

    /// Summarize text that is already in memory
    fn summarize_text(&self, text: &str) -> Result<Summary> {
        self.validate()?;
        let deadline = Deadline::start(self.config().time_limit);
        run_pipeline(self, text, &deadline)
    }
}

fn run_pipeline<S: Summarizer + ?Sized>(
    summarizer: &S,
    text: &str,
    deadline: &Deadline,
) -> Result<Summary> {
    let config = summarizer.config();

    let sentences = {
        trace_stage!("segment");
        summarizer
            .tokenizer()
            .segment(text, config.min_significant_terms)
    };
    deadline.check("segment")?;

    let count = resolve_length(config.length, sentences.len())?;
    if count >= sentences.len() {
        debug!(
            algorithm = summarizer.name(),
            sentences = sentences.len(),
            "length covers every sentence, skipping ranking"
        );
        let indices: Vec<usize> = (0..sentences.len()).collect();
        return Ok(Summary {
            sentences: sentences.display,
            indices,
            warnings: Vec::new(),
        });
    }

    let selection = {
        trace_stage!("rank");
        summarizer.select(&sentences, count, deadline)?
    };
    deadline.check("rank")?;

    let mut indices = selection.indices;
    indices.sort_unstable();
    indices.dedup();

    debug!(
        algorithm = summarizer.name(),
        sentences = sentences.len(),
        selected = indices.len(),
        "summary ready"
    );

    Ok(Summary {
        sentences: sentences.select(&indices),
        indices,
        warnings: selection.warnings,
    })
}

/// Summarize many documents in parallel
///
/// Results come back in input order, one per input; a failing document does
/// not affect the others.
pub fn summarize_batch<S, I>(summarizer: &S, inputs: &[I]) -> Vec<Result<Summary>>
where
    S: Summarizer + ?Sized,
    I: AsRef<str> + Sync,
{
    inputs
        .par_iter()
        .map(|input| summarizer.summarize(input.as_ref()))
        .collect()
}

/// Indices of the `count` highest scores, ties going to the lower index
pub(crate) fn top_indices(scores: &[f64], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    order.truncate(count);
    order
}

/// Components shared by every summarizer
#[derive(Clone)]
pub(crate) struct Base {
    pub(crate) config: SummarizerConfig,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) loader: Arc<dyn TextLoader>,
}

impl Default for Base {
    fn default() -> Self {
        Self {
            config: SummarizerConfig::default(),
            tokenizer: Tokenizer::default(),
            loader: Arc::new(DefaultTextLoader::new()),
        }
    }
}

impl Base {
    pub(crate) fn with_config(self, config: SummarizerConfig) -> Result<Self> {
        let same_text_settings = config.language == self.config.language
            && config.stopwords == self.config.stopwords
            && config.abbreviations == self.config.abbreviations;
        let tokenizer = if same_text_settings {
            self.tokenizer
        } else {
            Tokenizer::from_config(&config)?
        };
        Ok(Self {
            config,
            tokenizer,
            loader: self.loader,
        })
    }
}

impl std::fmt::Debug for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Base")
            .field("config", &self.config)
            .field("tokenizer", &self.tokenizer)
            .finish_non_exhaustive()
    }
}
