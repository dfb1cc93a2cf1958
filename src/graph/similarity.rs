//! Pairwise sentence similarity through an inverted term index
//!
//! Only sentence pairs that share a term are ever visited, so sparse
//! documents cost far less than the all-pairs dot products.

use crate::deadline::Deadline;
use crate::errors::Result;
use ndarray::Array2;
use rayon::prelude::*;

/// Below this many sentences the rows are computed sequentially
const PARALLEL_THRESHOLD: usize = 256;

/// Similar sentences of every sentence, as `(other, dot product)` sorted by `other`
///
/// Rows are symmetric, carry no self-similarity and no zero entries.
pub fn similarity_rows(weights: &Array2<f64>, deadline: &Deadline) -> Result<Vec<Vec<(u32, f64)>>> {
    let n = weights.nrows();
    let postings = postings(weights);

    let row = |scratch: &mut Vec<f64>, i: usize| -> Result<Vec<(u32, f64)>> {
        deadline.check("graph")?;
        let mut touched = Vec::new();
        for (term, &weight) in weights.row(i).indexed_iter() {
            if weight <= 0.0 {
                continue;
            }
            for &(other, other_weight) in &postings[term] {
                let other = other as usize;
                if other == i {
                    continue;
                }
                if scratch[other] == 0.0 {
                    touched.push(other as u32);
                }
                scratch[other] += weight * other_weight;
            }
        }
        touched.sort_unstable();
        touched.dedup();
        Ok(touched
            .into_iter()
            .map(|other| (other, std::mem::take(&mut scratch[other as usize])))
            .filter(|&(_, similarity)| similarity > 0.0)
            .collect())
    };

    if n < PARALLEL_THRESHOLD {
        let mut scratch = vec![0.0; n];
        (0..n).map(|i| row(&mut scratch, i)).collect()
    } else {
        (0..n)
            .into_par_iter()
            .map_init(|| vec![0.0; n], |scratch, i| row(scratch, i))
            .collect()
    }
}

/// Positive entries of every term column, as `(sentence, weight)`
fn postings(weights: &Array2<f64>) -> Vec<Vec<(u32, f64)>> {
    let mut postings = vec![Vec::new(); weights.ncols()];
    for ((sentence, term), &weight) in weights.indexed_iter() {
        if weight > 0.0 {
            postings[term].push((sentence as u32, weight));
        }
    }
    postings
}
