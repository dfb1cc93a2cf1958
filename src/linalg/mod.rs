//! Dense linear algebra kernels
//!
//! Only what the latent-semantic rankers need: a truncated singular value
//! decomposition by block subspace iteration.

pub mod svd;

pub use svd::{Decomposition, TruncatedSvd};
