//! Linear complexity test (Berlekamp–Massey over fixed-size blocks).

use crate::{TestOutput, TestReturn, chi2_sf, pearson, require};

const PROBS: [f64; 7] = [0.010417, 0.03125, 0.125, 0.5, 0.25, 0.0625, 0.020833];
const PREFERRED_BLOCK: usize = 500;
const FALLBACK_BLOCK: usize = 200;
const PREFERRED_MIN_BLOCKS: usize = 200;
const MIN_BLOCKS: usize = 6;

/// Length of the shortest LFSR generating `seq`.
fn berlekamp_massey(seq: &[u8]) -> usize {
    let n = seq.len();
    let mut c = vec![0u8; n + 1];
    let mut b = vec![0u8; n + 1];
    c[0] = 1;
    b[0] = 1;
    let mut l = 0usize;
    let mut shift = 1usize;

    for i in 0..n {
        let d = (1..=l).fold(u8::from(seq[i] == 1), |d, j| {
            d ^ (c[j] & u8::from(seq[i - j] == 1))
        });
        if d == 0 {
            shift += 1;
            continue;
        }
        let previous = c.clone();
        for j in shift..=n {
            c[j] ^= b[j - shift];
        }
        if 2 * l <= i {
            l = i + 1 - l;
            b = previous;
            shift = 1;
        } else {
            shift += 1;
        }
    }
    l
}

/// Distribution of per-block linear complexities against the theoretical
/// seven-category distribution. Blocks are 500 bits when there are at least
/// 200 of them, 200 bits otherwise.
pub fn linear_complexity_test(bits: &[u8], verbose: bool) -> TestReturn {
    let n = bits.len();
    let m = if n / PREFERRED_BLOCK >= PREFERRED_MIN_BLOCKS {
        PREFERRED_BLOCK
    } else {
        FALLBACK_BLOCK
    };
    require(MIN_BLOCKS * m, n)?;

    let mf = m as f64;
    let sign = if m % 2 == 0 { 1.0 } else { -1.0 };
    let mu = mf / 2.0 + (9.0 - sign) / 36.0 - (mf / 3.0 + 2.0 / 9.0) / 2.0_f64.powf(mf);

    let mut observed = [0u64; 7];
    for block in bits.chunks_exact(m) {
        let t = sign * (berlekamp_massey(block) as f64 - mu) + 2.0 / 9.0;
        let bin = match t {
            t if t <= -2.5 => 0,
            t if t <= -1.5 => 1,
            t if t <= -0.5 => 2,
            t if t <= 0.5 => 3,
            t if t <= 1.5 => 4,
            t if t <= 2.5 => 5,
            _ => 6,
        };
        observed[bin] += 1;
    }
    let num_blocks = n / m;
    let chi2 = pearson(&observed, &PROBS, num_blocks as f64);
    let p = chi2_sf(6.0, chi2)?;
    Ok(TestOutput::scalar(p).with_detail(verbose, || {
        format!("M={m}, N={num_blocks}, v={observed:?}, chi2={chi2:.6}")
    }))
}
