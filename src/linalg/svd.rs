//! Truncated singular value decomposition
//!
//! The `k` strongest concepts come from block subspace iteration on the
//! sentence side: a block of `k + oversampling` vectors is pushed through
//! `A·Aᵀ`, re-orthonormalized, and rotated by a small Rayleigh-Ritz solve
//! until the residual of the leading `k` Ritz vectors drops below the
//! tolerance. Each iteration costs two products with `A`, so the work grows
//! with the block width rather than with the document size cubed.
//!
//! Iterations are capped; hitting the cap is a convergence error rather
//! than a silently inaccurate result. The deadline is checked before every
//! iteration.

use crate::deadline::Deadline;
use crate::errors::{Result, SummarizeError};
use ndarray::{s, Array1, Array2};
use tracing::debug;

/// Singular values below this are treated as zero when projecting
const RANK_EPSILON: f64 = 1e-10;

/// Columns shorter than this fraction of the longest are dropped from the block
const DROP_RATIO: f64 = 1e-12;

/// Sweep cap of the Rayleigh-Ritz eigen-solve (the block is small)
const RITZ_SWEEPS: usize = 64;

/// The `k` strongest concepts of a sentence × term matrix
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Sentence loadings, one column per concept (n × k)
    pub sentence_loadings: Array2<f64>,
    /// Concept strengths (singular values), descending
    pub strengths: Array1<f64>,
    /// Term loadings, one row per concept (k × m)
    pub term_loadings: Array2<f64>,
    /// Subspace iterations performed
    pub iterations: usize,
}

impl Decomposition {
    /// Number of concepts kept
    pub fn num_concepts(&self) -> usize {
        self.strengths.len()
    }
}

/// Truncated SVD via block subspace iteration
#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    /// Extra block vectors carried beyond the `k` requested
    pub oversampling: usize,
    /// Maximum number of subspace iterations
    pub max_iterations: usize,
    /// Ritz residual, relative to the largest eigenvalue, at which the solver stops
    pub tolerance: f64,
}

impl Default for TruncatedSvd {
    fn default() -> Self {
        Self {
            oversampling: 8,
            max_iterations: 1000,
            tolerance: 1e-8,
        }
    }
}

impl TruncatedSvd {
    /// Create a solver with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of extra block vectors
    pub fn with_oversampling(mut self, oversampling: usize) -> Self {
        self.oversampling = oversampling;
        self
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Decompose `matrix` and keep the `k` strongest concepts
    ///
    /// `k` is capped at `min(rows, cols)`. When the block is as wide as the
    /// matrix rank allows, the first Rayleigh-Ritz solve is already exact.
    pub fn decompose(
        &self,
        matrix: &Array2<f64>,
        k: usize,
        deadline: &Deadline,
    ) -> Result<Decomposition> {
        let (n, m) = matrix.dim();
        let full = n.min(m);
        let k = k.min(full);
        let width = (k + self.oversampling).min(full);

        // Starting inside the range of A makes a full-width block exact.
        let mut q = orthonormalize(matrix.dot(&start_block(m, width)));
        let mut iterations = 0;

        loop {
            deadline.check("svd")?;

            // Rayleigh-Ritz: rotate the block onto the eigenvectors of Qᵀ·A·Aᵀ·Q.
            let b = matrix.t().dot(&q);
            let (theta, w) = symmetric_eigen(b.t().dot(&b))?;
            q = q.dot(&w);
            let b = b.dot(&w);
            let z = matrix.dot(&b);

            let residual = ritz_residual(&q, &z, &theta, k);
            if residual <= self.tolerance {
                let strengths: Array1<f64> =
                    theta.iter().take(k).map(|t| t.max(0.0).sqrt()).collect();
                let mut sentence_loadings = q.slice(s![.., ..k]).to_owned();
                let mut term_loadings =
                    project(&b.slice(s![.., ..k]).to_owned(), &strengths).reversed_axes();
                fix_signs(&mut sentence_loadings, &mut term_loadings);

                debug!(
                    sentences = n,
                    terms = m,
                    concepts = k,
                    width,
                    iterations,
                    "decomposed term matrix"
                );

                return Ok(Decomposition {
                    sentence_loadings,
                    strengths,
                    term_loadings,
                    iterations,
                });
            }

            if iterations == self.max_iterations {
                return Err(SummarizeError::Convergence {
                    stage: "svd",
                    iterations,
                    delta: residual,
                });
            }
            iterations += 1;
            q = orthonormalize(z);
        }
    }
}

/// Deterministic pseudo-random start block with entries in [-1, 1)
fn start_block(rows: usize, cols: usize) -> Array2<f64> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    Array2::from_shape_simple_fn((rows, cols), || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 52) as f64 - 1.0
    })
}

/// Modified Gram-Schmidt, applied twice; numerically null columns become zero
fn orthonormalize(mut block: Array2<f64>) -> Array2<f64> {
    let longest = block
        .columns()
        .into_iter()
        .map(|c| c.dot(&c).sqrt())
        .fold(0.0f64, f64::max);
    let floor = longest * DROP_RATIO;
    let cols = block.ncols();

    for j in 0..cols {
        for _ in 0..2 {
            for i in 0..j {
                let overlap = block.column(i).dot(&block.column(j));
                let basis = block.column(i).to_owned();
                block.column_mut(j).scaled_add(-overlap, &basis);
            }
        }
        let norm = block.column(j).dot(&block.column(j)).sqrt();
        if norm > floor && norm > 0.0 {
            block.column_mut(j).mapv_inplace(|x| x / norm);
        } else {
            block.column_mut(j).fill(0.0);
        }
    }
    block
}

/// Largest residual `‖A·Aᵀ·q − θ·q‖ / θ₀` over the leading `k` Ritz pairs
fn ritz_residual(q: &Array2<f64>, z: &Array2<f64>, theta: &[f64], k: usize) -> f64 {
    let scale = theta.first().copied().unwrap_or(0.0).max(f64::MIN_POSITIVE);
    (0..k)
        .map(|c| {
            let r = &z.column(c) - &(&q.column(c) * theta[c]);
            r.dot(&r).sqrt() / scale
        })
        .fold(0.0f64, f64::max)
}

/// Eigen-decompose a small symmetric matrix by cyclic Jacobi rotations
///
/// Eigenvalues come back descending, with eigenvectors as matching columns.
fn symmetric_eigen(mut a: Array2<f64>) -> Result<(Vec<f64>, Array2<f64>)> {
    let size = a.nrows();
    let mut v = Array2::<f64>::eye(size);

    let total = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mut sweeps = 0;
    let mut off = off_diagonal_norm(&a);
    while total > 0.0 && off > 1e-14 * total {
        if sweeps == RITZ_SWEEPS {
            return Err(SummarizeError::Convergence {
                stage: "svd",
                iterations: sweeps,
                delta: off / total,
            });
        }
        sweeps += 1;

        for p in 0..size {
            for q in (p + 1)..size {
                let apq = a[[p, q]];
                if apq == 0.0 {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
                let t = sign / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                rotate_columns(&mut a, p, q, c, s);
                rotate_rows(&mut a, p, q, c, s);
                rotate_columns(&mut v, p, q, c, s);
            }
        }
        off = off_diagonal_norm(&a);
    }

    let diagonal = a.diag().to_vec();
    let mut order: Vec<usize> = (0..size).collect();
    order.sort_by(|&x, &y| diagonal[y].total_cmp(&diagonal[x]).then(x.cmp(&y)));

    let values = order.iter().map(|&i| diagonal[i]).collect();
    let vectors = v.select(ndarray::Axis(1), &order);
    Ok((values, vectors))
}

fn off_diagonal_norm(a: &Array2<f64>) -> f64 {
    a.indexed_iter()
        .filter(|((i, j), _)| i != j)
        .map(|(_, x)| x * x)
        .sum::<f64>()
        .sqrt()
}

fn rotate_columns(a: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64) {
    for k in 0..a.nrows() {
        let akp = a[[k, p]];
        let akq = a[[k, q]];
        a[[k, p]] = c * akp - s * akq;
        a[[k, q]] = s * akp + c * akq;
    }
}

fn rotate_rows(a: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64) {
    for k in 0..a.ncols() {
        let apk = a[[p, k]];
        let aqk = a[[q, k]];
        a[[p, k]] = c * apk - s * aqk;
        a[[q, k]] = s * apk + c * aqk;
    }
}

/// Divide each column by its singular value; null concepts project to zero
fn project(product: &Array2<f64>, strengths: &Array1<f64>) -> Array2<f64> {
    let mut out = product.clone();
    for (mut column, &sigma) in out.columns_mut().into_iter().zip(strengths.iter()) {
        if sigma > RANK_EPSILON {
            column.mapv_inplace(|x| x / sigma);
        } else {
            column.fill(0.0);
        }
    }
    out
}

/// Make the largest-magnitude sentence loading of every concept positive
fn fix_signs(u: &mut Array2<f64>, vt: &mut Array2<f64>) {
    for c in 0..u.ncols() {
        let pivot = u
            .column(c)
            .iter()
            .copied()
            .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
        if pivot < 0.0 {
            u.column_mut(c).mapv_inplace(|x| -x);
            vt.row_mut(c).mapv_inplace(|x| -x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn decompose(m: &Array2<f64>, k: usize) -> Decomposition {
        TruncatedSvd::new()
            .decompose(m, k, &Deadline::unbounded())
            .unwrap()
    }

    fn reconstruct(d: &Decomposition) -> Array2<f64> {
        let sigma = Array2::from_diag(&d.strengths);
        d.sentence_loadings.dot(&sigma).dot(&d.term_loadings)
    }

    fn assert_close(a: &Array2<f64>, b: &Array2<f64>) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-8, "{x} != {y}");
        }
    }

    /// Sparse 0/1 matrix with a few dense "topic" blocks, like a binary term matrix
    fn topical(rows: usize, cols: usize) -> Array2<f64> {
        Array2::from_shape_fn((rows, cols), |(i, j)| {
            let topic = i % 4;
            let in_topic = j % 4 == topic && (i * 7 + j * 3) % 5 != 0;
            let noise = (i * 31 + j * 17) % 23 == 0;
            if in_topic || noise {
                1.0
            } else {
                0.0
            }
        })
    }

    #[test]
    fn test_diagonal_matrix() {
        let m = array![[3.0, 0.0, 0.0], [0.0, 5.0, 0.0]];
        let d = decompose(&m, 2);

        assert!((d.strengths[0] - 5.0).abs() < 1e-10);
        assert!((d.strengths[1] - 3.0).abs() < 1e-10);
        // Strongest concept loads on sentence 1
        assert!((d.sentence_loadings[[1, 0]] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_full_rank_reconstruction_wide() {
        let m = array![
            [1.0, 1.0, 0.0, 0.0, 1.0],
            [0.0, 1.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 1.0, 1.0]
        ];
        let d = decompose(&m, 3);
        assert_close(&reconstruct(&d), &m);
    }

    #[test]
    fn test_full_rank_reconstruction_tall() {
        let m = array![[1.0, 2.0], [0.0, 1.0], [3.0, 0.0], [1.0, 1.0]];
        let d = decompose(&m, 2);
        assert_eq!(d.sentence_loadings.dim(), (4, 2));
        assert_eq!(d.term_loadings.dim(), (2, 2));
        assert_close(&reconstruct(&d), &m);
    }

    #[test]
    fn test_strengths_descending_and_truncated() {
        let m = array![
            [2.0, 0.0, 1.0, 0.0],
            [0.0, 1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0, 0.0]
        ];
        let d = decompose(&m, 2);
        assert_eq!(d.num_concepts(), 2);
        assert!(d.strengths[0] >= d.strengths[1]);
        assert_eq!(d.sentence_loadings.ncols(), 2);
        assert_eq!(d.term_loadings.nrows(), 2);
    }

    #[test]
    fn test_narrow_block_matches_full_block() {
        let m = topical(60, 40);
        let narrow = decompose(&m, 3);
        let full = TruncatedSvd::new()
            .with_oversampling(40)
            .decompose(&m, 3, &Deadline::unbounded())
            .unwrap();

        assert!(narrow.iterations > 0);
        assert_eq!(full.iterations, 0);
        for (a, b) in narrow.strengths.iter().zip(full.strengths.iter()) {
            assert!((a - b).abs() < 1e-6, "{a} != {b}");
        }
    }

    #[test]
    fn test_loadings_orthonormal() {
        let d = decompose(&topical(50, 30), 4);
        let gram = d.sentence_loadings.t().dot(&d.sentence_loadings);
        assert_close(&gram, &Array2::eye(4));
    }

    #[test]
    fn test_sign_convention() {
        let m = array![[1.0, 1.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]];
        let d = decompose(&m, 3);
        for column in d.sentence_loadings.columns() {
            let pivot = column
                .iter()
                .copied()
                .fold(0.0f64, |b, x| if x.abs() > b.abs() { x } else { b });
            assert!(pivot >= 0.0);
        }
    }

    #[test]
    fn test_zero_matrix() {
        let m = Array2::<f64>::zeros((3, 4));
        let d = decompose(&m, 2);
        assert!(d.strengths.iter().all(|&s| s == 0.0));
        assert!(d.sentence_loadings.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_iteration_cap_is_convergence_error() {
        let m = topical(6, 8);
        let err = TruncatedSvd::new()
            .with_oversampling(0)
            .with_max_iterations(1)
            .with_tolerance(1e-14)
            .decompose(&m, 1, &Deadline::unbounded())
            .unwrap_err();
        assert!(matches!(
            err,
            SummarizeError::Convergence {
                stage: "svd",
                iterations: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_expired_deadline_stops_iteration() {
        let err = TruncatedSvd::new()
            .decompose(&topical(40, 30), 2, &crate::deadline::expired())
            .unwrap_err();
        assert!(matches!(
            err,
            SummarizeError::DeadlineExceeded { stage: "svd", .. }
        ));
    }
}
