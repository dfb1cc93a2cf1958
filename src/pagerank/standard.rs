//! Weighted PageRank by power iteration
//!
//! Each sentence pulls rank from its neighbors in proportion to the edge
//! weight over the neighbor's strength. Sentences without neighbors spread
//! their mass uniformly, so the scores always sum to one.

use super::PageRankResult;
use crate::deadline::Deadline;
use crate::errors::{Result, SummarizeError};
use crate::graph::SentenceGraph;

/// Standard PageRank implementation
#[derive(Debug, Clone)]
pub struct StandardPageRank {
    /// Damping factor (typically 0.85)
    pub damping: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// L1 change at which the iteration stops
    pub threshold: f64,
}

impl Default for StandardPageRank {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            threshold: 1e-6,
        }
    }
}

impl StandardPageRank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Rank the sentences of `graph`
    ///
    /// Fails with `Convergence` when the cap is reached with the change still
    /// above the threshold, and with `DeadlineExceeded` when the budget runs
    /// out between iterations.
    pub fn run(&self, graph: &SentenceGraph, deadline: &Deadline) -> Result<PageRankResult> {
        if graph.is_empty() {
            return Ok(PageRankResult {
                scores: Vec::new(),
                iterations: 0,
                delta: 0.0,
            });
        }

        let n = graph.len();
        let isolated = graph.isolated();
        let uniform = 1.0 / n as f64;
        let mut scores = vec![uniform; n];
        let mut next = vec![0.0; n];
        let mut share = vec![0.0; n];
        let mut iterations = 0;

        loop {
            deadline.check("pagerank")?;

            for (i, slot) in share.iter_mut().enumerate() {
                let strength = graph.strength(i);
                *slot = if strength > 0.0 { scores[i] / strength } else { 0.0 };
            }
            let stranded: f64 = isolated.iter().map(|&i| scores[i]).sum();
            let base = (1.0 - self.damping + self.damping * stranded) * uniform;

            for (i, slot) in next.iter_mut().enumerate() {
                let pulled: f64 = graph.neighbors(i).map(|(j, w)| w * share[j]).sum();
                *slot = base + self.damping * pulled;
            }

            let delta: f64 = scores.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
            std::mem::swap(&mut scores, &mut next);
            iterations += 1;

            if delta <= self.threshold {
                let total: f64 = scores.iter().sum();
                if total > 0.0 {
                    scores.iter_mut().for_each(|s| *s /= total);
                }
                return Ok(PageRankResult {
                    scores,
                    iterations,
                    delta,
                });
            }
            if iterations >= self.max_iterations {
                return Err(SummarizeError::Convergence {
                    stage: "pagerank",
                    iterations,
                    delta,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undirected(n: usize, edges: &[(u32, u32, f64)]) -> SentenceGraph {
        let mut rows = vec![Vec::new(); n];
        for &(a, b, w) in edges {
            rows[a as usize].push((b, w));
            rows[b as usize].push((a, w));
        }
        rows.iter_mut().for_each(|row| row.sort_by_key(|&(t, _)| t));
        SentenceGraph::from_rows(rows)
    }

    fn triangle() -> SentenceGraph {
        undirected(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)])
    }

    fn star() -> SentenceGraph {
        // Hub sentence 0 shares terms with three others
        undirected(4, &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)])
    }

    fn run(graph: &SentenceGraph) -> PageRankResult {
        StandardPageRank::new()
            .run(graph, &Deadline::unbounded())
            .unwrap()
    }

    #[test]
    fn test_triangle_equal_scores() {
        let result = run(&triangle());
        for score in &result.scores {
            assert!((score - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_star_hub_highest() {
        let result = run(&star());
        assert!(result.scores[1..].iter().all(|&s| result.scores[0] > s));
        let sum: f64 = result.scores.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_heavier_edges_attract_more_mass() {
        let result = run(&undirected(3, &[(0, 1, 5.0), (0, 2, 1.0)]));
        assert!(result.scores[1] > result.scores[2]);
    }

    #[test]
    fn test_isolated_sentences_share_mass() {
        let result = run(&undirected(4, &[]));
        assert_eq!(result.iterations, 1);
        for score in &result.scores {
            assert!((score - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_isolated_sentence_keeps_teleport_share() {
        // Pair 0-1 plus a lone sentence 2
        let result = run(&undirected(3, &[(0, 1, 2.0)]));
        assert!((result.scores[0] - result.scores[1]).abs() < 1e-9);
        assert!(result.scores[2] < result.scores[0]);
        assert!(result.scores[2] > 0.0);
    }

    #[test]
    fn test_empty_graph() {
        let result = run(&SentenceGraph::from_rows(Vec::new()));
        assert!(result.scores.is_empty());
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_iteration_cap_is_convergence_error() {
        let err = StandardPageRank::new()
            .with_max_iterations(1)
            .with_threshold(0.0)
            .run(&star(), &Deadline::unbounded())
            .unwrap_err();
        assert!(matches!(
            err,
            SummarizeError::Convergence {
                stage: "pagerank",
                iterations: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_expired_deadline() {
        let err = StandardPageRank::new()
            .run(&star(), &crate::deadline::expired())
            .unwrap_err();
        assert!(matches!(
            err,
            SummarizeError::DeadlineExceeded {
                stage: "pagerank",
                ..
            }
        ));
    }

    #[test]
    fn test_damping_factor() {
        let graph = star();
        let low = StandardPageRank::new()
            .with_damping(0.5)
            .run(&graph, &Deadline::unbounded())
            .unwrap();
        let high = StandardPageRank::new()
            .with_damping(0.7)
            .run(&graph, &Deadline::unbounded())
            .unwrap();

        // More teleportation flattens the hub's advantage
        assert!(high.scores[0] - high.scores[1] > low.scores[0] - low.scores[1]);
    }
}
