//! Cumulative sums (cusum) test, forward and backward.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::{TestOutput, TestReturn, require, signed};

/// Maximum |partial sum| of the ±1 walk over `bits` in the given order.
fn max_excursion<'a>(bits: impl Iterator<Item = &'a u8>) -> i64 {
    let mut s = 0i64;
    let mut z = 0i64;
    for &b in bits {
        s += signed(b);
        z = z.max(s.abs());
    }
    z
}

fn p_value(n: usize, z: i64) -> f64 {
    let norm = Normal::standard();
    let nf = n as f64;
    let zf = z as f64;
    let sqrt_n = nf.sqrt();
    let phi = |k: i64, a: f64| norm.cdf((4.0 * k as f64 + a) * zf / sqrt_n);

    let upper = ((nf / zf - 1.0) / 4.0).floor() as i64;
    let first: f64 = (((-nf / zf + 1.0) / 4.0).floor() as i64..=upper)
        .map(|k| phi(k, 1.0) - phi(k, -1.0))
        .sum();
    let second: f64 = (((-nf / zf - 3.0) / 4.0).floor() as i64..=upper)
        .map(|k| phi(k, 3.0) - phi(k, 1.0))
        .sum();
    (1.0 - first + second).clamp(0.0, 1.0)
}

/// Returns `(forward, backward)`; the forward p-value is decisive.
pub fn cumulative_sums_test(bits: &[u8], verbose: bool) -> TestReturn {
    let n = bits.len();
    require(100, n)?;
    let z_fwd = max_excursion(bits.iter());
    let z_bwd = max_excursion(bits.iter().rev());
    let forward = p_value(n, z_fwd);
    let backward = p_value(n, z_bwd);
    Ok(TestOutput::tuple(vec![forward, backward]).with_detail(verbose, || {
        format!("z_forward={z_fwd}, z_backward={z_bwd}")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{PI_100, assert_close, bits, pseudo_random_bits};
    use bitprobe_core::RawValue;

    fn pair(out: TestOutput) -> (f64, f64) {
        match out.value {
            RawValue::Tuple(ps) => (ps[0], ps[1]),
            RawValue::Scalar(_) => panic!("expected tuple"),
        }
    }

    #[test]
    fn known_answer_both_directions() {
        let out = cumulative_sums_test(&bits(PI_100), true).unwrap();
        assert_eq!(out.details, vec!["z_forward=16, z_backward=19".to_string()]);
        let (fwd, bwd) = pair(out);
        assert_close(fwd, 0.219194, 1e-6);
        assert_close(bwd, 0.114866, 1e-6);
    }

    #[test]
    fn drifting_walk_fails() {
        let data: Vec<u8> = (0..1000).map(|i| u8::from(i % 4 != 0)).collect();
        let (fwd, _) = pair(cumulative_sums_test(&data, false).unwrap());
        assert!(fwd < 0.01);
    }

    #[test]
    fn pseudo_random_passes() {
        let (fwd, bwd) = pair(cumulative_sums_test(&pseudo_random_bits(10_000), false).unwrap());
        assert!(fwd > 0.01 && bwd > 0.01);
    }
}
