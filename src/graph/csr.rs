//! Compressed sentence graph
//!
//! Every sentence's neighbors sit in one contiguous slice, sorted by index,
//! which is the access pattern of the PageRank pull step.

use super::similarity::similarity_rows;
use crate::deadline::Deadline;
use crate::errors::Result;
use ndarray::Array2;

/// Undirected weighted graph over the sentences of a document
#[derive(Debug, Clone)]
pub struct SentenceGraph {
    /// Sentence i's edges are at `offsets[i]..offsets[i + 1]`
    offsets: Vec<usize>,
    targets: Vec<u32>,
    weights: Vec<f64>,
    /// Summed edge weight of every sentence
    strength: Vec<f64>,
}

impl SentenceGraph {
    /// Link sentences by the dot products of their weight rows
    pub fn from_weights(weights: &Array2<f64>, deadline: &Deadline) -> Result<Self> {
        Ok(Self::from_rows(similarity_rows(weights, deadline)?))
    }

    /// Freeze symmetric similarity rows
    pub fn from_rows(rows: Vec<Vec<(u32, f64)>>) -> Self {
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut targets = Vec::new();
        let mut weights = Vec::new();
        let mut strength = Vec::with_capacity(rows.len());
        offsets.push(0);

        for row in rows {
            strength.push(row.iter().map(|&(_, w)| w).sum());
            for (target, weight) in row {
                targets.push(target);
                weights.push(weight);
            }
            offsets.push(targets.len());
        }

        Self {
            offsets,
            targets,
            weights,
            strength,
        }
    }

    /// Number of sentences
    pub fn len(&self) -> usize {
        self.strength.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strength.is_empty()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }

    /// Neighbors of a sentence with their edge weights, by ascending index
    pub fn neighbors(&self, sentence: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let span = self.offsets[sentence]..self.offsets[sentence + 1];
        self.targets[span.clone()]
            .iter()
            .zip(&self.weights[span])
            .map(|(&target, &weight)| (target as usize, weight))
    }

    /// Summed edge weight of a sentence
    pub fn strength(&self, sentence: usize) -> f64 {
        self.strength[sentence]
    }

    /// Sentences that share no term with any other
    pub fn isolated(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.strength[i] == 0.0).collect()
    }
}
