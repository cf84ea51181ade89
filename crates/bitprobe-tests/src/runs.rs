//! Runs test and longest-run-of-ones-in-a-block test.

use statrs::function::erf::erfc;

use crate::{TestOutput, TestReturn, chi2_sf, pearson, require};

/// Total number of runs (maximal blocks of identical bits).
///
/// Returns p = 0 without computing runs when the monobit pre-test fails.
pub fn run_test(bits: &[u8], verbose: bool) -> TestReturn {
    let n = bits.len();
    require(100, n)?;
    let nf = n as f64;
    let pi = bits.iter().filter(|&&b| b == 1).count() as f64 / nf;
    let tau = 2.0 / nf.sqrt();
    if (pi - 0.5).abs() >= tau {
        return Ok(TestOutput::scalar(0.0).with_detail(verbose, || {
            format!("pre-test failed: pi={pi:.6}, tau={tau:.6}")
        }));
    }

    let runs = 1 + bits.windows(2).filter(|w| w[0] != w[1]).count();
    let spread = pi * (1.0 - pi);
    let p = erfc((runs as f64 - 2.0 * nf * spread).abs() / (2.0 * (2.0 * nf).sqrt() * spread));
    Ok(TestOutput::scalar(p).with_detail(verbose, || format!("V_n={runs}, pi={pi:.6}")))
}

/// Block length, category bounds and category probabilities for a given `n`.
struct LongestRunTable {
    block: usize,
    lowest: usize,
    probs: &'static [f64],
}

fn longest_run_table(n: usize) -> LongestRunTable {
    if n < 6272 {
        LongestRunTable {
            block: 8,
            lowest: 1,
            probs: &[0.2148, 0.3672, 0.2305, 0.1875],
        }
    } else if n < 750_000 {
        LongestRunTable {
            block: 128,
            lowest: 4,
            probs: &[0.1174, 0.2430, 0.2493, 0.1752, 0.1027, 0.1124],
        }
    } else {
        LongestRunTable {
            block: 10_000,
            lowest: 10,
            probs: &[0.0882, 0.2092, 0.2483, 0.1933, 0.1208, 0.0675, 0.0727],
        }
    }
}

fn longest_run_of_ones(block: &[u8]) -> usize {
    let mut best = 0;
    let mut current = 0;
    for &b in block {
        if b == 1 {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Longest run of ones within blocks of 8, 128 or 10 000 bits depending on `n`.
pub fn longest_one_block_test(bits: &[u8], verbose: bool) -> TestReturn {
    let n = bits.len();
    require(128, n)?;
    let table = longest_run_table(n);
    let categories = table.probs.len();

    let mut observed = vec![0u64; categories];
    for block in bits.chunks_exact(table.block) {
        let run = longest_run_of_ones(block);
        let bin = run.clamp(table.lowest, table.lowest + categories - 1) - table.lowest;
        observed[bin] += 1;
    }
    let num_blocks = n / table.block;
    let chi2 = pearson(&observed, table.probs, num_blocks as f64);
    let p = chi2_sf((categories - 1) as f64, chi2)?;
    Ok(TestOutput::scalar(p).with_detail(verbose, || {
        format!(
            "M={}, N={num_blocks}, v={observed:?}, chi2={chi2:.6}",
            table.block
        )
    }))
}
