//! # rapid_summarizer
//!
//! Extractive text summarization: pick the sentences that best represent a
//! document, without training any model.
//!
//! Four rankers share one sentence pipeline:
//!
//! - **LSA (Steinberger)**: sentences loading on the strongest latent concepts
//! - **LSA (Ozsoy)**: the cross method, favoring above-average loadings per concept
//! - **Relevance**: greedy picks by document overlap, discounting covered terms
//! - **TextRank**: PageRank centrality over a sentence similarity graph
//!
//! ```no_run
//! use rapid_summarizer::{LsaSteinberger, Summarizer};
//!
//! let summarizer = LsaSteinberger::new().with_length(3.0);
//! let summary = summarizer.summarize("article.txt")?;
//! for sentence in &summary.sentences {
//!     println!("{sentence}");
//! }
//! # Ok::<(), rapid_summarizer::SummarizeError>(())
//! ```

pub mod config;
pub mod deadline;
pub mod errors;
pub mod graph;
pub mod linalg;
pub mod loader;
pub mod matrix;
pub mod nlp;
pub mod pagerank;
pub mod summarizer;
pub mod types;

// Re-export commonly used types
pub use errors::{Result, SummarizeError};
pub use types::{Norm, SentenceSet, Summary, SummarizerConfig, SummaryWarning, Weighting};

// Re-export main functionality
pub use config::{Algorithm, SummarizerSpec};
pub use graph::SentenceGraph;
pub use linalg::{Decomposition, TruncatedSvd};
pub use loader::{DefaultTextLoader, RawTextLoader, TextLoader};
pub use matrix::TermMatrix;
pub use nlp::{
    language::Language, splitter::SentenceSplitter, stopwords::StopwordFilter,
    tokenizer::Tokenizer,
};
pub use pagerank::{standard::StandardPageRank, PageRankResult};
pub use deadline::Deadline;
pub use summarizer::{
    resolve_length, summarize_batch, LsaOzsoy, LsaSteinberger, LsaSummarizer,
    RelevanceSummarizer, Selection, Summarizer, TextRankSummarizer,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
