//! Sentence similarity graphs
//!
//! Sentences are nodes; two sentences are linked when their weight rows
//! share terms, with the rows' dot product as the edge weight. Similarities
//! are gathered through an inverted term index and frozen into compressed
//! rows for PageRank.

pub mod csr;
pub mod similarity;

pub use csr::SentenceGraph;
