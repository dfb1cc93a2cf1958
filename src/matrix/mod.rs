//! Sentence × term weight matrix
//!
//! Each surviving sentence becomes one row and each distinct normalized term
//! one column. Columns are ordered lexicographically so a matrix built twice
//! from the same sentences is identical.

use crate::errors::Result;
use crate::types::{Norm, Weighting};
use ndarray::{Array2, ArrayView1, Axis};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;

/// A dense sentence × term weight matrix with its vocabulary
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatrix {
    /// Column labels, sorted
    vocabulary: Vec<String>,
    /// Row i is surviving sentence i
    weights: Array2<f64>,
}

impl TermMatrix {
    /// Build the matrix for a set of normalized sentences
    ///
    /// Sentences are split on whitespace; every token is a term.
    pub fn build<S: AsRef<str>>(sentences: &[S], weighting: Weighting, norm: Norm) -> Self {
        let vocabulary: Vec<String> = sentences
            .iter()
            .flat_map(|s| s.as_ref().split_whitespace())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let column: FxHashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let mut weights = Array2::<f64>::zeros((sentences.len(), vocabulary.len()));
        for (row, sentence) in sentences.iter().enumerate() {
            for term in sentence.as_ref().split_whitespace() {
                weights[[row, column[term]]] += 1.0;
            }
        }

        match weighting {
            Weighting::Binary => weights.mapv_inplace(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Weighting::Frequency => {}
            Weighting::Tfidf => apply_idf(&mut weights),
        }

        normalize_rows(&mut weights, norm);

        Self {
            vocabulary,
            weights,
        }
    }

    /// Build from weighting and norm names, as found in configuration
    pub fn build_named<S: AsRef<str>>(
        sentences: &[S],
        weighting: &str,
        norm: Option<&str>,
    ) -> Result<Self> {
        let weighting: Weighting = weighting.parse()?;
        let norm: Norm = match norm {
            Some(name) => name.parse()?,
            None => Norm::None,
        };
        Ok(Self::build(sentences, weighting, norm))
    }

    /// (sentences, terms)
    pub fn shape(&self) -> (usize, usize) {
        self.weights.dim()
    }

    /// Number of sentences
    pub fn nrows(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of distinct terms
    pub fn ncols(&self) -> usize {
        self.weights.ncols()
    }

    /// Column labels
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Column of a term, if present
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
    }

    /// The weight matrix
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Take ownership of the weight matrix
    pub fn into_weights(self) -> Array2<f64> {
        self.weights
    }

    /// Weight row of one sentence
    pub fn row(&self, sentence: usize) -> ArrayView1<'_, f64> {
        self.weights.row(sentence)
    }

    /// Replace negative weights by zero
    pub fn clip_negatives(&mut self) {
        self.weights.mapv_inplace(|v| v.max(0.0));
    }

    /// Presence matrix: 1 where the weight is non-zero
    pub fn binarized(&self) -> Array2<f64> {
        self.weights.mapv(|v| if v != 0.0 { 1.0 } else { 0.0 })
    }

    /// Column sums (total weight of each term over the document)
    pub fn column_sums(&self) -> ndarray::Array1<f64> {
        self.weights.sum_axis(Axis(0))
    }

    /// Number of distinct non-empty term sets across sentences
    ///
    /// Sentences using exactly the same terms count once. This is the
    /// effective rank estimate used before decomposition.
    pub fn distinct_term_sets(&self) -> usize {
        self.weights
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &w)| w != 0.0)
                    .map(|(i, _)| i)
                    .collect::<Vec<_>>()
            })
            .filter(|terms| !terms.is_empty())
            .collect::<FxHashSet<_>>()
            .len()
    }
}

/// Scale each column by the smoothed inverse document frequency
fn apply_idf(weights: &mut Array2<f64>) {
    let n = weights.nrows() as f64;
    for mut column in weights.columns_mut() {
        let df = column.iter().filter(|&&v| v > 0.0).count() as f64;
        let idf = ((1.0 + n) / (1.0 + df)).ln() + 1.0;
        column.mapv_inplace(|v| v * idf);
    }
}

fn normalize_rows(weights: &mut Array2<f64>, norm: Norm) {
    for mut row in weights.rows_mut() {
        let length = match norm {
            Norm::L1 => row.iter().map(|v| v.abs()).sum::<f64>(),
            Norm::L2 => row.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Norm::None => return,
        };
        // All-zero rows stay untouched.
        if length > 0.0 {
            row.mapv_inplace(|v| v / length);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences() -> Vec<&'static str> {
        vec!["bunch long words", "more long words", "hello dude"]
    }

    #[test]
    fn test_matrix_shape() {
        let matrix = TermMatrix::build(&sentences(), Weighting::Binary, Norm::None);
        assert_eq!(matrix.shape(), (3, 6));
        assert_eq!(
            matrix.vocabulary(),
            &["bunch", "dude", "hello", "long", "more", "words"]
        );
    }

    #[test]
    fn test_binary_vs_frequency() {
        let sentences = vec!["data data model", "model"];

        let binary = TermMatrix::build(&sentences, Weighting::Binary, Norm::None);
        let frequency = TermMatrix::build(&sentences, Weighting::Frequency, Norm::None);

        let data = binary.term_index("data").unwrap();
        assert_eq!(binary.weights()[[0, data]], 1.0);
        assert_eq!(frequency.weights()[[0, data]], 2.0);
        assert_eq!(frequency.weights()[[1, data]], 0.0);
    }

    #[test]
    fn test_tfidf_downweights_common_terms() {
        let sentences = vec!["rare common", "other common", "third common"];
        let matrix = TermMatrix::build(&sentences, Weighting::Tfidf, Norm::None);

        let rare = matrix.term_index("rare").unwrap();
        let common = matrix.term_index("common").unwrap();
        // idf(common) = ln(4/4) + 1 = 1, idf(rare) = ln(4/2) + 1
        assert!((matrix.weights()[[0, common]] - 1.0).abs() < 1e-12);
        assert!((matrix.weights()[[0, rare]] - (2.0f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_row_normalization() {
        let sentences = vec!["a a b", "c"];

        let l1 = TermMatrix::build(&sentences, Weighting::Frequency, Norm::L1);
        assert!((l1.row(0).sum() - 1.0).abs() < 1e-12);

        let l2 = TermMatrix::build(&sentences, Weighting::Frequency, Norm::L2);
        let norm: f64 = l2.row(0).iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_rows_survive_normalization() {
        let sentences = vec!["a b", ""];
        let matrix = TermMatrix::build(&sentences, Weighting::Frequency, Norm::L2);
        assert!(matrix.row(1).iter().all(|&v| v == 0.0));
        assert!(matrix.weights().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_build_named_rejects_unknown_options() {
        assert!(TermMatrix::build_named(&sentences(), "binary", Some("l2")).is_ok());
        assert!(TermMatrix::build_named(&sentences(), "bm25", None)
            .unwrap_err()
            .is_config_error());
        assert!(TermMatrix::build_named(&sentences(), "binary", Some("max"))
            .unwrap_err()
            .is_config_error());
    }

    #[test]
    fn test_distinct_term_sets() {
        let sentences = vec!["a b c", "c b a", "b a c c", "d"];
        let matrix = TermMatrix::build(&sentences, Weighting::Frequency, Norm::None);
        assert_eq!(matrix.distinct_term_sets(), 2);
    }

    #[test]
    fn test_column_sums() {
        let sentences = vec!["a b", "a"];
        let matrix = TermMatrix::build(&sentences, Weighting::Frequency, Norm::None);
        assert_eq!(matrix.column_sums().to_vec(), vec![2.0, 1.0]);
    }
}
