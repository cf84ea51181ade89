//! Maurer's "universal statistical" test.

use statrs::function::erf::erfc;

use crate::{TestOutput, TestReturn, require};

/// (L, expected value, variance) for L = 6..=16.
const PARAMS: [(usize, f64, f64); 11] = [
    (6, 5.2177052, 2.954),
    (7, 6.1962507, 3.125),
    (8, 7.1836656, 3.238),
    (9, 8.1764248, 3.311),
    (10, 9.1723243, 3.356),
    (11, 10.170032, 3.384),
    (12, 11.168765, 3.401),
    (13, 12.168070, 3.410),
    (14, 13.167693, 3.416),
    (15, 14.167488, 3.419),
    (16, 15.167379, 3.421),
];
const MIN_TEST_BLOCKS: usize = 100;

/// Largest L with `n ≥ 1010 · L · 2^L`, or L = 6 for shorter inputs.
fn block_length(n: usize) -> (usize, f64, f64) {
    PARAMS
        .iter()
        .rev()
        .find(|&&(l, _, _)| n >= 1010 * l * (1usize << l))
        .copied()
        .unwrap_or(PARAMS[0])
}

/// Compressibility measured as the mean log2 distance between repeats of
/// each L-bit block.
pub fn statistical_test(bits: &[u8], verbose: bool) -> TestReturn {
    let n = bits.len();
    let (l, expected, variance) = block_length(n);
    let q = 10 * (1usize << l);
    require((q + MIN_TEST_BLOCKS) * l, n)?;
    let k = n / l - q;

    let block_value = |i: usize| {
        bits[i * l..(i + 1) * l]
            .iter()
            .fold(0usize, |acc, &b| (acc << 1) | usize::from(b == 1))
    };

    // Last 1-based position each block value was seen at.
    let mut last_seen = vec![0usize; 1 << l];
    for i in 0..q {
        last_seen[block_value(i)] = i + 1;
    }
    let mut sum = 0.0;
    for i in q..q + k {
        let v = block_value(i);
        sum += ((i + 1 - last_seen[v]) as f64).log2();
        last_seen[v] = i + 1;
    }

    let fn_val = sum / k as f64;
    let lf = l as f64;
    let kf = k as f64;
    let c = 0.7 - 0.8 / lf + (4.0 + 32.0 / lf) * kf.powf(-3.0 / lf) / 15.0;
    let sigma = c * (variance / kf).sqrt();
    let p = erfc((fn_val - expected).abs() / (2.0_f64.sqrt() * sigma));
    Ok(TestOutput::scalar(p).with_detail(verbose, || {
        format!("L={l}, Q={q}, K={k}, fn={fn_val:.6}, expected={expected:.6}")
    }))
}
