//! Latent semantic analysis rankers
//!
//! Both variants decompose the sentence × term matrix into concepts and score
//! each sentence by how strongly it loads on the strong concepts. They
//! differ in which loadings and strengths survive before scoring:
//!
//! - [`LsaSteinberger`] drops concepts weaker than a fraction of the
//!   strongest one (default half).
//! - [`LsaOzsoy`] (the "cross" method) keeps, per concept, only the sentences
//!   loading above that concept's mean, then scores the same way.

use super::{top_indices, Base, Deadline, Selection, Summarizer};
use crate::errors::{Result, SummarizeError};
use crate::linalg::{Decomposition, TruncatedSvd};
use crate::loader::TextLoader;
use crate::matrix::TermMatrix;
use crate::nlp::tokenizer::Tokenizer;
use crate::types::{Norm, SentenceSet, SummarizerConfig, SummaryWarning, Weighting};
use ndarray::Array2;
use tracing::{debug, warn};

/// Default number of concepts to extract
pub const DEFAULT_TOPICS: usize = 4;

/// Parameters common to both variants
#[derive(Debug, Clone)]
struct LsaParams {
    topics: usize,
    binary_matrix: bool,
    topic_sigma_threshold: f64,
    svd: TruncatedSvd,
}

impl LsaParams {
    fn new(topic_sigma_threshold: f64) -> Self {
        Self {
            topics: DEFAULT_TOPICS,
            binary_matrix: true,
            topic_sigma_threshold,
            svd: TruncatedSvd::new(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.topics == 0 {
            return Err(SummarizeError::invalid_config("topics must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.topic_sigma_threshold) {
            return Err(SummarizeError::invalid_config(format!(
                "topic_sigma_threshold must be in [0, 1], got {}",
                self.topic_sigma_threshold
            )));
        }
        Ok(())
    }

    /// Build the matrix, guard its rank and decompose it
    fn decompose(
        &self,
        sentences: &SentenceSet,
        deadline: &Deadline,
    ) -> Result<(Decomposition, Vec<SummaryWarning>)> {
        let weighting = if self.binary_matrix {
            Weighting::Binary
        } else {
            Weighting::Frequency
        };
        let mut matrix = {
            trace_stage!("matrix");
            TermMatrix::build(&sentences.normalized, weighting, Norm::None)
        };
        matrix.clip_negatives();
        deadline.check("matrix")?;

        let (topics, warnings) = clamp_topics(self.topics, matrix.distinct_term_sets())?;
        debug!(
            sentences = matrix.nrows(),
            terms = matrix.ncols(),
            topics,
            "decomposing term matrix"
        );

        let decomposition = self.svd.decompose(matrix.weights(), topics, deadline)?;
        Ok((decomposition, warnings))
    }
}

/// Check the rank estimate and cap the number of concepts below it
///
/// Returns the number of concepts to extract and any clamp warning.
fn clamp_topics(requested: usize, distinct_term_sets: usize) -> Result<(usize, Vec<SummaryWarning>)> {
    if distinct_term_sets <= 1 {
        return Err(SummarizeError::Rank { distinct_term_sets });
    }

    let supported = distinct_term_sets - 1;
    if requested <= supported {
        return Ok((requested, Vec::new()));
    }

    warn!(
        requested,
        used = supported,
        "too many topics requested for the document, summary may be degraded"
    );
    Ok((
        supported,
        vec![SummaryWarning::TopicsClamped {
            requested,
            used: supported,
        }],
    ))
}

/// Σ_c loading[i, c]² · σ_c², with σ_c zeroed below `threshold · σ_max`
fn saliency(loadings: &Array2<f64>, decomposition: &Decomposition, threshold: f64) -> Vec<f64> {
    let strongest = decomposition.strengths.iter().copied().fold(0.0, f64::max);
    let cutoff = threshold * strongest;
    let weights: Vec<f64> = decomposition
        .strengths
        .iter()
        .map(|&s| if s < cutoff { 0.0 } else { s * s })
        .collect();

    loadings
        .rows()
        .into_iter()
        .map(|row| row.iter().zip(&weights).map(|(u, w)| u * u * w).sum())
        .collect()
}

/// Zero every sentence loading at or below its concept's mean
fn keep_above_mean(loadings: &mut Array2<f64>) {
    for mut column in loadings.columns_mut() {
        let mean = column.mean().unwrap_or(0.0);
        column.mapv_inplace(|u| if u <= mean { 0.0 } else { u });
    }
}

macro_rules! lsa_variant {
    ($(#[$doc:meta])* $ty:ident, $name:literal, $threshold:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $ty {
            base: Base,
            params: LsaParams,
        }

        impl Default for $ty {
            fn default() -> Self {
                Self {
                    base: Base::default(),
                    params: LsaParams::new($threshold),
                }
            }
        }

        impl $ty {
            /// Create a summarizer with default settings
            pub fn new() -> Self {
                Self::default()
            }

            /// Set the number of concepts to extract
            pub fn with_topics(mut self, topics: usize) -> Self {
                self.params.topics = topics;
                self
            }

            /// Use term presence (true) or term counts (false)
            pub fn with_binary_matrix(mut self, binary: bool) -> Self {
                self.params.binary_matrix = binary;
                self
            }

            /// Drop concepts weaker than this fraction of the strongest one
            pub fn with_topic_sigma_threshold(mut self, threshold: f64) -> Self {
                self.params.topic_sigma_threshold = threshold;
                self
            }

            /// Use a custom SVD solver
            pub fn with_svd(mut self, svd: TruncatedSvd) -> Self {
                self.params.svd = svd;
                self
            }

            /// Number of concepts requested
            pub fn topics(&self) -> usize {
                self.params.topics
            }

            /// Strength threshold
            pub fn topic_sigma_threshold(&self) -> f64 {
                self.params.topic_sigma_threshold
            }
        }

        shared_builders!($ty);

        impl Summarizer for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn config(&self) -> &SummarizerConfig {
                &self.base.config
            }

            fn tokenizer(&self) -> &Tokenizer {
                &self.base.tokenizer
            }

            fn loader(&self) -> &dyn TextLoader {
                self.base.loader.as_ref()
            }

            fn validate(&self) -> Result<()> {
                self.base.config.validate()?;
                self.params.validate()
            }

            fn select(
                &self,
                sentences: &SentenceSet,
                count: usize,
                deadline: &Deadline,
            ) -> Result<Selection> {
                let (decomposition, warnings) = self.params.decompose(sentences, deadline)?;
                let scores = self.score(&decomposition);
                Ok(Selection::new(top_indices(&scores, count)).with_warnings(warnings))
            }
        }
    };
}

lsa_variant!(
    /// LSA summarizer after Steinberger & Ježek
    ///
    /// Defaults: 4 topics, binary matrix, strength threshold 0.5.
    LsaSteinberger,
    "lsa_steinberger",
    0.5
);

lsa_variant!(
    /// LSA summarizer after Ozsoy et al. ("cross" method)
    ///
    /// Defaults: 4 topics, binary matrix, strength threshold 0.
    LsaOzsoy,
    "lsa_ozsoy",
    0.0
);

/// The default LSA summarizer
pub type LsaSummarizer = LsaOzsoy;

impl LsaSteinberger {
    fn score(&self, decomposition: &Decomposition) -> Vec<f64> {
        saliency(
            &decomposition.sentence_loadings,
            decomposition,
            self.params.topic_sigma_threshold,
        )
    }
}

impl LsaOzsoy {
    fn score(&self, decomposition: &Decomposition) -> Vec<f64> {
        let mut loadings = decomposition.sentence_loadings.clone();
        keep_above_mean(&mut loadings);
        saliency(&loadings, decomposition, self.params.topic_sigma_threshold)
    }
}
