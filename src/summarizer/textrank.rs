//! TextRank summarizer
//!
//! Sentences are nodes of an undirected graph whose edge weights are the dot
//! products of their term rows. Weighted PageRank over that graph ranks the
//! sentences by centrality.

use super::{top_indices, Base, Deadline, Selection, Summarizer};
use crate::errors::{Result, SummarizeError};
use crate::graph::SentenceGraph;
use crate::loader::TextLoader;
use crate::matrix::TermMatrix;
use crate::nlp::tokenizer::Tokenizer;
use crate::pagerank::standard::StandardPageRank;
use crate::pagerank::PageRankResult;
use crate::types::{Norm, SentenceSet, SummarizerConfig, Weighting};
use tracing::debug;

/// Graph-centrality summarizer (Mihalcea & Tarau)
#[derive(Debug, Clone, Default)]
pub struct TextRankSummarizer {
    base: Base,
    weighting: Weighting,
    norm: Norm,
    pagerank: StandardPageRank,
}

impl TextRankSummarizer {
    /// Create a summarizer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the term weighting of the sentence rows
    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Set the row normalization
    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }

    /// Set the PageRank damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.pagerank = self.pagerank.with_damping(damping);
        self
    }

    /// Replace the PageRank settings
    pub fn with_pagerank(mut self, pagerank: StandardPageRank) -> Self {
        self.pagerank = pagerank;
        self
    }

    /// Term weighting in use
    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    /// Row normalization in use
    pub fn norm(&self) -> Norm {
        self.norm
    }

    /// Score every sentence
    pub fn rank(&self, sentences: &SentenceSet) -> Result<PageRankResult> {
        self.rank_with_deadline(sentences, &Deadline::unbounded())
    }

    fn rank_with_deadline(&self, sentences: &SentenceSet, deadline: &Deadline) -> Result<PageRankResult> {
        let matrix = {
            trace_stage!("matrix");
            TermMatrix::build(&sentences.normalized, self.weighting, self.norm)
        };
        deadline.check("matrix")?;

        let graph = SentenceGraph::from_weights(matrix.weights(), deadline)?;
        let result = self.pagerank.run(&graph, deadline)?;
        debug!(
            sentences = graph.len(),
            edges = graph.edge_count(),
            iterations = result.iterations,
            delta = result.delta,
            "ranked sentence graph"
        );
        Ok(result)
    }
}

shared_builders!(TextRankSummarizer);

impl Summarizer for TextRankSummarizer {
    fn name(&self) -> &'static str {
        "textrank"
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
        if !(0.0..1.0).contains(&self.pagerank.damping) {
            return Err(SummarizeError::invalid_config(format!(
                "damping must be in [0, 1), got {}",
                self.pagerank.damping
            )));
        }
        Ok(())
    }

    fn select(&self, sentences: &SentenceSet, count: usize, deadline: &Deadline) -> Result<Selection> {
        let result = self.rank_with_deadline(sentences, deadline)?;
        Ok(Selection::new(top_indices(&result.scores, count)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(normalized: &[&str]) -> SentenceSet {
        let normalized: Vec<String> = normalized.iter().map(|s| s.to_string()).collect();
        SentenceSet::new(normalized.clone(), normalized)
    }

    #[test]
    fn test_defaults() {
        let summarizer = TextRankSummarizer::new();
        assert_eq!(summarizer.weighting(), Weighting::Frequency);
        assert_eq!(summarizer.norm(), Norm::None);
        assert_eq!(summarizer.config().length, 5.0);
    }

    #[test]
    fn test_scores_sum_to_one() {
        let sentences = set(&["a b c", "b c d", "d e", "f"]);
        let result = TextRankSummarizer::new().rank(&sentences).unwrap();

        assert_eq!(result.scores.len(), 4);
        let sum: f64 = result.scores.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_central_sentence_wins() {
        // Sentence 1 overlaps both neighbours; sentence 3 is isolated
        let sentences = set(&["a b", "b c d", "d e", "z"]);
        let selection = TextRankSummarizer::new()
            .select(&sentences, 1, &Deadline::unbounded())
            .unwrap();
        assert_eq!(selection.indices, vec![1]);
    }

    #[test]
    fn test_reproducible() {
        let sentences = set(&["a b c", "b c d", "c d e", "a e"]);
        let summarizer = TextRankSummarizer::new().with_weighting(Weighting::Tfidf);
        let first = summarizer.rank(&sentences).unwrap();
        let second = summarizer.rank(&sentences).unwrap();
        assert_eq!(first.scores, second.scores);
    }

    #[test]
    fn test_iteration_cap_is_convergence_error() {
        let sentences = set(&["a b", "b c d", "d e"]);
        let summarizer = TextRankSummarizer::new().with_pagerank(
            StandardPageRank::new()
                .with_max_iterations(1)
                .with_threshold(0.0),
        );
        let err = summarizer
            .select(&sentences, 1, &Deadline::unbounded())
            .unwrap_err();
        assert!(matches!(
            err,
            SummarizeError::Convergence {
                stage: "pagerank",
                ..
            }
        ));
    }

    #[test]
    fn test_expired_deadline_stops_ranking() {
        let sentences = set(&["a b", "b c d", "d e"]);
        let err = TextRankSummarizer::new()
            .select(&sentences, 1, &crate::deadline::expired())
            .unwrap_err();
        assert!(matches!(err, SummarizeError::DeadlineExceeded { .. }));
    }

    #[test]
    fn test_invalid_damping() {
        let err = TextRankSummarizer::new()
            .with_damping(1.5)
            .validate()
            .unwrap_err();
        assert!(err.is_config_error());
    }
}
