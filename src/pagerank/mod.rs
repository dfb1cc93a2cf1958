//! PageRank over sentence graphs

pub mod standard;

/// Converged PageRank scores
#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// Score of every sentence, summing to one
    pub scores: Vec<f64>,
    /// Number of iterations performed
    pub iterations: usize,
    /// L1 change of the last iteration
    pub delta: f64,
}
