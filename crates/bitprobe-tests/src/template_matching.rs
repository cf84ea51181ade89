//! Non-overlapping and overlapping template matching tests.

use crate::{TestOutput, TestReturn, chi2_sf, pearson, require, require_default_pattern};

/// Aperiodic template used when no explicit one is given.
const DEFAULT_APERIODIC: [u8; 9] = [0, 0, 0, 0, 0, 0, 0, 0, 1];
const NON_OVERLAPPING_BLOCKS: usize = 8;

/// Occurrences of a 9-bit aperiodic template in each of 8 blocks, with the
/// window jumping past every match.
pub fn non_overlapping_test(bits: &[u8], default_pattern: bool) -> TestReturn {
    require_default_pattern(default_pattern, "non-overlapping template")?;
    let template = &DEFAULT_APERIODIC;
    let m = template.len();
    let n = bits.len();
    require(1000, n)?;

    let block_len = n / NON_OVERLAPPING_BLOCKS;
    let counts: Vec<u64> = bits
        .chunks_exact(block_len)
        .take(NON_OVERLAPPING_BLOCKS)
        .map(|block| {
            let mut hits = 0u64;
            let mut i = 0;
            while i + m <= block.len() {
                if block[i..i + m] == *template {
                    hits += 1;
                    i += m;
                } else {
                    i += 1;
                }
            }
            hits
        })
        .collect();

    let two_m = (1u64 << m) as f64;
    let mu = (block_len - m + 1) as f64 / two_m;
    let sigma2 = block_len as f64 * (1.0 / two_m - (2.0 * m as f64 - 1.0) / (two_m * two_m));
    let chi2: f64 = counts
        .iter()
        .map(|&w| (w as f64 - mu).powi(2) / sigma2)
        .sum();
    let p = chi2_sf(NON_OVERLAPPING_BLOCKS as f64, chi2)?;
    Ok(TestOutput::scalar(p).with_detail(true, || {
        format!("M={block_len}, mu={mu:.4}, W={counts:?}, chi2={chi2:.6}")
    }))
}

const OVERLAPPING_M: usize = 9;
const OVERLAPPING_BLOCK: usize = 1032;
/// P(k matches) for k = 0..=4 and k ≥ 5, for m = 9 and M = 1032.
const OVERLAPPING_PROBS: [f64; 6] = [0.364091, 0.185659, 0.139381, 0.100571, 0.0704323, 0.139865];

/// Overlapping occurrences of a run of nine ones in blocks of 1032 bits.
pub fn overlapping_patterns(bits: &[u8], default_pattern: bool) -> TestReturn {
    require_default_pattern(default_pattern, "overlapping template")?;
    let n = bits.len();
    require(OVERLAPPING_BLOCK, n)?;

    let mut observed = [0u64; 6];
    for block in bits.chunks_exact(OVERLAPPING_BLOCK) {
        let hits = block
            .windows(OVERLAPPING_M)
            .filter(|w| w.iter().all(|&b| b == 1))
            .count();
        observed[hits.min(5)] += 1;
    }
    let num_blocks = n / OVERLAPPING_BLOCK;
    let chi2 = pearson(&observed, &OVERLAPPING_PROBS, num_blocks as f64);
    let p = chi2_sf(5.0, chi2)?;
    Ok(TestOutput::scalar(p).with_detail(true, || {
        format!("N={num_blocks}, v={observed:?}, chi2={chi2:.6}")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::pseudo_random_bits;
    use bitprobe_core::{RawValue, TestFault};

    fn p(out: TestReturn) -> f64 {
        match out.unwrap().value {
            RawValue::Scalar(p) => p,
            RawValue::Tuple(_) => panic!("expected scalar"),
        }
    }

    #[test]
    fn explicit_template_is_not_supported() {
        assert!(matches!(
            non_overlapping_test(&[0; 2000], false),
            Err(TestFault::InvalidParameter(_))
        ));
        assert!(matches!(
            overlapping_patterns(&[0; 2000], false),
            Err(TestFault::InvalidParameter(_))
        ));
    }

    #[test]
    fn template_heavy_input_fails() {
        let data: Vec<u8> = DEFAULT_APERIODIC.iter().copied().cycle().take(9 * 1000).collect();
        assert!(p(non_overlapping_test(&data, true)) < 0.01);
    }

    #[test]
    fn all_ones_saturates_overlapping_bins() {
        let out = overlapping_patterns(&[1; 1032 * 10], true).unwrap();
        assert!(out.details[0].contains("v=[0, 0, 0, 0, 0, 10]"));
        assert!(matches!(out.value, RawValue::Scalar(p) if p < 0.01));
    }

    #[test]
    fn pseudo_random_passes() {
        let data = pseudo_random_bits(200_000);
        assert!(p(non_overlapping_test(&data, true)) > 0.01);
        assert!(p(overlapping_patterns(&data, true)) > 0.01);
    }
}
