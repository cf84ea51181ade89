//! Discrete Fourier transform (spectral) test.

use rustfft::{FftPlanner, num_complex::Complex};
use statrs::function::erf::erfc;

use crate::{TestOutput, TestReturn, require, signed};

/// Peak heights in the DFT of the ±1 sequence: about 95% of the first n/2
/// magnitudes should fall under the 95% threshold.
pub fn spectral_test(bits: &[u8], verbose: bool) -> TestReturn {
    let n = bits.len();
    require(1000, n)?;

    let mut buffer: Vec<Complex<f64>> = bits
        .iter()
        .map(|&b| Complex::new(signed(b) as f64, 0.0))
        .collect();
    FftPlanner::new().plan_fft_forward(n).process(&mut buffer);

    let nf = n as f64;
    let threshold = ((1.0 / 0.05_f64).ln() * nf).sqrt();
    let n0 = 0.95 * nf / 2.0;
    let n1 = buffer[..n / 2]
        .iter()
        .filter(|c| c.norm() < threshold)
        .count() as f64;
    let d = (n1 - n0) / (nf * 0.95 * 0.05 / 4.0).sqrt();
    let p = erfc(d.abs() / 2.0_f64.sqrt());
    Ok(TestOutput::scalar(p).with_detail(verbose, || {
        format!("N0={n0:.1}, N1={n1}, d={d:.6}")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::pseudo_random_bits;
    use bitprobe_core::RawValue;

    fn p(bits: &[u8]) -> f64 {
        match spectral_test(bits, false).unwrap().value {
            RawValue::Scalar(p) => p,
            RawValue::Tuple(_) => panic!("expected scalar"),
        }
    }

    #[test]
    fn periodic_sequence_fails() {
        let data: Vec<u8> = (0..4096).map(|i| ((i / 4) % 2) as u8).collect();
        assert!(p(&data) < 0.01);
    }

    #[test]
    fn pseudo_random_passes() {
        assert!(p(&pseudo_random_bits(16_384)) > 0.01);
    }

    #[test]
    fn works_for_non_power_of_two_lengths() {
        let v = p(&pseudo_random_bits(10_007));
        assert!((0.0..=1.0).contains(&v));
    }
}
