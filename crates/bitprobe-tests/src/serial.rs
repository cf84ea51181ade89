//! Serial test: uniformity of overlapping m-bit patterns.

use bitprobe_core::TestFault;

use crate::{TestOutput, TestReturn, chi2_sf, pattern_counts, require, require_default_pattern};

/// Default pattern length: `⌊log2 n⌋ - 3`, kept within 2..=16.
fn default_block_length(n: usize) -> usize {
    (n.max(1).ilog2() as usize).saturating_sub(3).clamp(2, 16)
}

fn psi_sq(bits: &[u8], m: usize) -> f64 {
    if m == 0 {
        return 0.0;
    }
    let n = bits.len() as f64;
    let sum_sq: f64 = pattern_counts(bits, m)
        .iter()
        .map(|&c| (c as f64) * (c as f64))
        .sum();
    sum_sq * (1u64 << m) as f64 / n - n
}

/// (p1, p2) from the first and second differences of ψ².
fn p_values(bits: &[u8], m: usize) -> Result<(f64, f64, f64, f64), TestFault> {
    let psi_m = psi_sq(bits, m);
    let psi_m1 = psi_sq(bits, m - 1);
    let psi_m2 = psi_sq(bits, m.saturating_sub(2));
    let del1 = psi_m - psi_m1;
    let del2 = psi_m - 2.0 * psi_m1 + psi_m2;
    let p1 = chi2_sf((1u64 << (m - 1)) as f64, del1)?;
    let p2 = chi2_sf((1u64 << (m - 2)) as f64, del2)?;
    Ok((p1, p2, del1, del2))
}

/// Returns `(p1, p2)`; p1 is decisive.
pub fn serial_test(bits: &[u8], default_pattern: bool) -> TestReturn {
    require_default_pattern(default_pattern, "serial pattern length")?;
    let n = bits.len();
    require(100, n)?;
    let m = default_block_length(n);
    let (p1, p2, del1, del2) = p_values(bits, m)?;
    Ok(TestOutput::tuple(vec![p1, p2]).with_detail(true, || {
        format!("m={m}, del1={del1:.6}, del2={del2:.6}")
    }))
}
