//! Greedy relevance summarizer
//!
//! Sentences are picked one at a time by their overlap with the document's
//! term vector. Terms of a picked sentence are removed from that vector, so
//! later picks favor sentences that cover new material.

use super::{Base, Deadline, Selection, Summarizer};
use crate::errors::Result;
use crate::loader::TextLoader;
use crate::matrix::TermMatrix;
use crate::nlp::tokenizer::Tokenizer;
use crate::types::{Norm, SentenceSet, SummarizerConfig, Weighting};
use ndarray::{Array1, Array2};
use tracing::debug;

/// Relevance-based summarizer (Gong & Liu)
#[derive(Debug, Clone)]
pub struct RelevanceSummarizer {
    base: Base,
    binary_matrix: bool,
}

impl Default for RelevanceSummarizer {
    fn default() -> Self {
        Self {
            base: Base::default(),
            binary_matrix: true,
        }
    }
}

impl RelevanceSummarizer {
    /// Create a summarizer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Score sentences by term presence (true) or term counts (false)
    pub fn with_binary_matrix(mut self, binary: bool) -> Self {
        self.binary_matrix = binary;
        self
    }

    /// Whether sentence rows are binarized
    pub fn binary_matrix(&self) -> bool {
        self.binary_matrix
    }
}

shared_builders!(RelevanceSummarizer);

impl Summarizer for RelevanceSummarizer {
    fn name(&self) -> &'static str {
        "relevance"
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

    fn select(&self, sentences: &SentenceSet, count: usize, deadline: &Deadline) -> Result<Selection> {
        let matrix = {
            trace_stage!("matrix");
            TermMatrix::build(&sentences.normalized, Weighting::Frequency, Norm::None)
        };
        deadline.check("matrix")?;

        let document = matrix.column_sums();
        let rows = if self.binary_matrix {
            matrix.binarized()
        } else {
            matrix.into_weights()
        };

        Ok(Selection::new(greedy_coverage(rows, document, count, deadline)?))
    }
}

/// Pick `count` rows by repeated best overlap with `document`
///
/// After every pick, the terms of the picked row are zeroed in `document`
/// and the row itself is zeroed. Already picked rows are never picked again;
/// ties go to the lowest row index. Returns rows in pick order.
pub fn greedy_coverage(
    mut rows: Array2<f64>,
    mut document: Array1<f64>,
    count: usize,
    deadline: &Deadline,
) -> Result<Vec<usize>> {
    let mut picked = vec![false; rows.nrows()];
    let mut order = Vec::with_capacity(count);

    for _ in 0..count {
        deadline.check("rank")?;
        let mut best: Option<(usize, f64)> = None;
        for (i, row) in rows.rows().into_iter().enumerate() {
            if picked[i] {
                continue;
            }
            let score = row.dot(&document);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((i, score));
            }
        }

        let Some((index, score)) = best else {
            break;
        };
        debug!(sentence = index, score, "relevance pick");

        picked[index] = true;
        order.push(index);

        for (term, &weight) in rows.row(index).iter().enumerate() {
            if weight != 0.0 {
                document[term] = 0.0;
            }
        }
        rows.row_mut(index).fill(0.0);
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_covered_terms_are_discounted() {
        // terms: a b c d
        let rows = array![
            [1.0, 1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0, 1.0]
        ];
        let document = rows.sum_axis(ndarray::Axis(0));

        // Row 1 repeats row 0, so once a and b are covered it scores zero.
        let order = greedy_coverage(rows, document, 3, &Deadline::unbounded()).unwrap();
        assert_eq!(order, vec![0, 2, 3]);
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let rows = array![[0.0, 1.0], [1.0, 0.0]];
        let document = array![1.0, 1.0];
        assert_eq!(greedy_coverage(rows, document, 1, &Deadline::unbounded()).unwrap(), vec![0]);
    }

    #[test]
    fn test_never_repicks() {
        let rows = array![[1.0, 0.0], [1.0, 0.0], [1.0, 0.0]];
        let document = array![3.0, 0.0];
        let order = greedy_coverage(rows, document, 3, &Deadline::unbounded()).unwrap();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_count_beyond_rows() {
        let rows = array![[1.0]];
        assert_eq!(greedy_coverage(rows, array![1.0], 4, &Deadline::unbounded()).unwrap(), vec![0]);
    }

    #[test]
    fn test_select_binary_vs_frequency() {
        let normalized = vec![
            "alpha alpha alpha beta".to_string(),
            "beta gamma delta".to_string(),
            "gamma".to_string(),
        ];
        let sentences = SentenceSet::new(normalized.clone(), normalized);
        // document: alpha 3, beta 2, gamma 2, delta 1

        // Binary rows: s0 = 3 + 2 = 5, s1 = 2 + 2 + 1 = 5 -> tie, lower index
        let binary = RelevanceSummarizer::new()
            .select(&sentences, 1, &Deadline::unbounded())
            .unwrap();
        assert_eq!(binary.indices, vec![0]);

        // Count rows: s0 = 3*3 + 2 = 11 wins outright
        let counts = RelevanceSummarizer::new()
            .with_binary_matrix(false)
            .select(&sentences, 2, &Deadline::unbounded())
            .unwrap();
        assert_eq!(counts.indices, vec![0, 1]);
    }
}
