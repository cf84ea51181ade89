//! Binary matrix rank test over disjoint 32×32 sub-matrices.

use crate::{TestOutput, TestReturn, chi2_sf, pearson, require};

const SIDE: usize = 32;
const MIN_MATRICES: usize = 38;
/// P(rank = 32), P(rank = 31), P(rank ≤ 30) for a random 32×32 matrix over GF(2).
const RANK_PROBS: [f64; 3] = [0.2888, 0.5776, 0.1336];

/// Rank over GF(2) of a square matrix whose rows are packed into `u32`s.
fn gf2_rank(mut rows: [u32; SIDE]) -> usize {
    let mut rank = 0;
    for col in (0..SIDE).rev() {
        let bit = 1u32 << col;
        let Some(pivot) = (rank..SIDE).find(|&r| rows[r] & bit != 0) else {
            continue;
        };
        rows.swap(rank, pivot);
        let pivot_row = rows[rank];
        for (r, row) in rows.iter_mut().enumerate() {
            if r != rank && *row & bit != 0 {
                *row ^= pivot_row;
            }
        }
        rank += 1;
    }
    rank
}

fn pack(block: &[u8]) -> [u32; SIDE] {
    let mut rows = [0u32; SIDE];
    for (row, chunk) in rows.iter_mut().zip(block.chunks_exact(SIDE)) {
        *row = chunk
            .iter()
            .fold(0u32, |acc, &b| (acc << 1) | u32::from(b == 1));
    }
    rows
}

/// Distribution of ranks of 32×32 matrices filled row by row from the sequence.
pub fn binary_matrix_rank_text(bits: &[u8], verbose: bool) -> TestReturn {
    let per_matrix = SIDE * SIDE;
    require(MIN_MATRICES * per_matrix, bits.len())?;

    let mut observed = [0u64; 3];
    for block in bits.chunks_exact(per_matrix) {
        match gf2_rank(pack(block)) {
            SIDE => observed[0] += 1,
            r if r == SIDE - 1 => observed[1] += 1,
            _ => observed[2] += 1,
        }
    }
    let num_matrices = bits.len() / per_matrix;
    let chi2 = pearson(&observed, &RANK_PROBS, num_matrices as f64);
    let p = chi2_sf(2.0, chi2)?;
    Ok(TestOutput::scalar(p).with_detail(verbose, || {
        format!(
            "N={num_matrices}, full={}, full-1={}, rest={}",
            observed[0], observed[1], observed[2]
        )
    }))
}
