//! Frequency (monobit) and frequency-within-a-block tests.

use statrs::function::erf::erfc;

use crate::{TestOutput, TestReturn, chi2_sf, require, signed};
use bitprobe_core::TestFault;

/// Proportion of ones vs zeros over the whole sequence.
pub fn monobit_test(bits: &[u8], verbose: bool) -> TestReturn {
    let n = bits.len();
    require(100, n)?;
    let s: i64 = bits.iter().map(|&b| signed(b)).sum();
    let s_obs = (s as f64).abs() / (n as f64).sqrt();
    let p = erfc(s_obs / 2.0_f64.sqrt());
    Ok(TestOutput::scalar(p).with_detail(verbose, || format!("S={s}, n={n}, s_obs={s_obs:.6}")))
}

/// Proportion of ones within non-overlapping blocks of `block_size` bits.
pub fn block_frequency(bits: &[u8], block_size: usize, verbose: bool) -> TestReturn {
    if block_size == 0 {
        return Err(TestFault::InvalidParameter(
            "block size must be positive".to_string(),
        ));
    }
    let n = bits.len();
    require(100.max(block_size), n)?;
    let num_blocks = n / block_size;

    let chi2 = 4.0
        * block_size as f64
        * bits
            .chunks_exact(block_size)
            .map(|block| {
                let ones = block.iter().filter(|&&b| b == 1).count();
                let pi = ones as f64 / block_size as f64 - 0.5;
                pi * pi
            })
            .sum::<f64>();
    let p = chi2_sf(num_blocks as f64, chi2)?;
    Ok(TestOutput::scalar(p).with_detail(verbose, || {
        format!("blocks={num_blocks}, M={block_size}, chi2={chi2:.6}")
    }))
}
