//! Approximate entropy test.

use crate::{TestOutput, TestReturn, chi2_sf, pattern_counts, require, require_default_pattern};
use bitprobe_core::TestFault;

/// Default block length: `⌊log2 n⌋ - 6`, kept within 1..=10.
fn default_block_length(n: usize) -> usize {
    (n.max(1).ilog2() as usize).saturating_sub(6).clamp(1, 10)
}

/// Φ(m) = Σ πᵢ ln πᵢ over overlapping (wrapped) m-bit patterns.
fn phi(bits: &[u8], m: usize) -> f64 {
    let n = bits.len() as f64;
    pattern_counts(bits, m)
        .into_iter()
        .filter(|&c| c > 0)
        .map(|c| {
            let pi = c as f64 / n;
            pi * pi.ln()
        })
        .sum()
}

/// (ApEn, χ², p) for block length `m`.
fn statistic(bits: &[u8], m: usize) -> Result<(f64, f64, f64), TestFault> {
    let apen = phi(bits, m) - phi(bits, m + 1);
    let chi2 = 2.0 * bits.len() as f64 * (std::f64::consts::LN_2 - apen);
    let p = chi2_sf((1u64 << m) as f64, chi2)?;
    Ok((apen, chi2, p))
}

/// Frequency of overlapping m- and (m+1)-bit patterns compared against the
/// value expected of a random sequence.
pub fn approximate_entropy_test(bits: &[u8], default_pattern: bool) -> TestReturn {
    require_default_pattern(default_pattern, "approximate entropy block length")?;
    let n = bits.len();
    require(100, n)?;
    let m = default_block_length(n);
    let (apen, chi2, p) = statistic(bits, m)?;
    Ok(TestOutput::scalar(p).with_detail(true, || {
        format!("m={m}, ApEn={apen:.6}, chi2={chi2:.6}")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{PI_100, assert_close, bits, pseudo_random_bits};
    use bitprobe_core::RawValue;

    #[test]
    fn known_answers() {
        let (apen, chi2, p) = statistic(&bits("0100110101"), 3).unwrap();
        assert_close(apen, 0.190954, 1e-6);
        assert_close(chi2, 10.043859, 1e-6);
        assert_close(p, 0.261961, 1e-6);

        let (_, _, p) = statistic(&bits(PI_100), 2).unwrap();
        assert_close(p, 0.235301, 1e-6);
    }

    #[test]
    fn default_block_length_tracks_log2() {
        assert_eq!(default_block_length(100), 1);
        assert_eq!(default_block_length(10_000), 7);
        assert_eq!(default_block_length(1 << 20), 10);
    }

    #[test]
    fn periodic_input_fails_random_passes() {
        let periodic: Vec<u8> = (0..10_000).map(|i| (i % 2) as u8).collect();
        let out = approximate_entropy_test(&periodic, true).unwrap();
        assert!(matches!(out.value, RawValue::Scalar(p) if p < 0.01));

        let out = approximate_entropy_test(&pseudo_random_bits(10_000), true).unwrap();
        assert!(matches!(out.value, RawValue::Scalar(p) if p > 0.01));
        assert!(out.details[0].starts_with("m=7"));
    }
}
