//! Random excursions and random excursions variant tests.
//!
//! Both look at the ±1 random walk split into cycles that start and end at
//! zero. A walk with no return to zero before its end has a single cycle.

use statrs::function::erf::erfc;

use crate::{TestOutput, TestReturn, chi2_sf, pearson, require, require_default_pattern, signed};

const STATES: [i64; 8] = [-4, -3, -2, -1, 1, 2, 3, 4];
const MIN_BITS: usize = 1000;
/// Fewer cycles than this makes the chi-squared approximation unreliable.
const RECOMMENDED_CYCLES: usize = 500;

/// Partial sums of the ±1 walk.
fn walk(bits: &[u8]) -> Vec<i64> {
    bits.iter()
        .scan(0i64, |s, &b| {
            *s += signed(b);
            Some(*s)
        })
        .collect()
}

/// Visits per cycle to each state in -4..=4, one row per cycle.
fn cycle_visits(sums: &[i64]) -> Vec<[u64; 9]> {
    let mut cycles = Vec::new();
    let mut current = [0u64; 9];
    for &s in sums {
        if s == 0 {
            cycles.push(current);
            current = [0; 9];
        } else if s.abs() <= 4 {
            current[(s + 4) as usize] += 1;
        }
    }
    if sums.last().is_some_and(|&s| s != 0) {
        cycles.push(current);
    }
    cycles
}

/// P(a cycle visits state `x` exactly k times), k = 0..=4, and k ≥ 5.
fn visit_probs(x: i64) -> [f64; 6] {
    let ax = x.unsigned_abs() as f64;
    let stay = 1.0 - 1.0 / (2.0 * ax);
    let mut probs = [0.0; 6];
    probs[0] = stay;
    for (k, p) in probs.iter_mut().enumerate().take(5).skip(1) {
        *p = stay.powi(k as i32 - 1) / (4.0 * ax * ax);
    }
    probs[5] = stay.powi(4) / (2.0 * ax);
    probs
}

fn low_cycle_note(j: usize, n: usize) -> Option<String> {
    let minimum = (0.005 * (n as f64).sqrt()).max(RECOMMENDED_CYCLES as f64);
    ((j as f64) < minimum).then(|| format!("J={j} is below the recommended minimum of {minimum:.0}"))
}

/// One p-value per state x in {-4..-1, 1..4}; the x = -4 value is decisive.
pub fn random_excursions_test(bits: &[u8], verbose: bool) -> TestReturn {
    let n = bits.len();
    require(MIN_BITS, n)?;
    let cycles = cycle_visits(&walk(bits));
    let j = cycles.len();

    let mut p_values = Vec::with_capacity(STATES.len());
    for &x in &STATES {
        let column = (x + 4) as usize;
        let mut observed = [0u64; 6];
        for cycle in &cycles {
            observed[(cycle[column] as usize).min(5)] += 1;
        }
        let chi2 = pearson(&observed, &visit_probs(x), j as f64);
        p_values.push(chi2_sf(5.0, chi2)?);
    }

    let mut out = TestOutput::tuple(p_values).with_detail(verbose, || format!("J={j}"));
    if let Some(note) = low_cycle_note(j, n) {
        out = out.with_detail(verbose, || note);
    }
    Ok(out)
}

/// One p-value per state x in {-9..-1, 1..9} from total visit counts; the
/// x = -9 value is decisive.
pub fn variant_test(bits: &[u8], default_pattern: bool) -> TestReturn {
    require_default_pattern(default_pattern, "excursion state range")?;
    let n = bits.len();
    require(MIN_BITS, n)?;
    let sums = walk(bits);
    let j = sums.iter().filter(|&&s| s == 0).count()
        + usize::from(sums.last().is_some_and(|&s| s != 0));

    let mut visits = [0u64; 19];
    for &s in &sums {
        if s != 0 && s.abs() <= 9 {
            visits[(s + 9) as usize] += 1;
        }
    }
    let jf = j as f64;
    let p_values: Vec<f64> = (-9i64..=9)
        .filter(|&x| x != 0)
        .map(|x| {
            let xi = visits[(x + 9) as usize] as f64;
            erfc((xi - jf).abs() / (2.0 * jf * (4.0 * x.abs() as f64 - 2.0)).sqrt())
        })
        .collect();

    let mut out = TestOutput::tuple(p_values).with_detail(true, || format!("J={j}"));
    if let Some(note) = low_cycle_note(j, n) {
        out = out.with_detail(true, || note);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{assert_close, bits, pseudo_random_bits};
    use bitprobe_core::{RawValue, TestFault};

    fn tuple(out: TestOutput) -> Vec<f64> {
        match out.value {
            RawValue::Tuple(ps) => ps,
            RawValue::Scalar(_) => panic!("expected tuple"),
        }
    }

    #[test]
    fn cycles_of_reference_walk() {
        // Three cycles, the last one open-ended.
        let sums = walk(&bits("0110110101"));
        assert_eq!(sums, vec![-1, 0, 1, 0, 1, 2, 1, 2, 1, 2]);
        let cycles = cycle_visits(&sums);
        assert_eq!(cycles.len(), 3);
        // State +1 (column 5): 0, 1, 3 visits per cycle.
        let ones: Vec<u64> = cycles.iter().map(|c| c[5]).collect();
        assert_eq!(ones, vec![0, 1, 3]);
        assert_eq!(cycles[0][3], 1);
        // State +2 (column 6) is only reached in the third cycle.
        assert_eq!(cycles[2][6], 3);
    }

    #[test]
    fn visit_probabilities_sum_to_one() {
        for &x in &STATES {
            let total: f64 = visit_probs(x).iter().sum();
            assert_close(total, 1.0, 1e-12);
        }
        assert_close(visit_probs(1)[0], 0.5, 1e-12);
        assert_close(visit_probs(1)[1], 0.25, 1e-12);
    }

    #[test]
    fn excursion_tuples_have_expected_arity() {
        let data = pseudo_random_bits(100_000);
        let out = random_excursions_test(&data, true).unwrap();
        assert!(out.details[0].starts_with("J="));
        let ps = tuple(out);
        assert_eq!(ps.len(), 8);
        assert!(ps.iter().all(|p| (0.0..=1.0).contains(p)));

        let ps = tuple(variant_test(&data, true).unwrap());
        assert_eq!(ps.len(), 18);
        assert!(ps.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn walk_that_never_returns_has_one_cycle() {
        let out = random_excursions_test(&[1; 1000], true).unwrap();
        assert_eq!(out.details[0], "J=1");
        assert!(out.details[1].contains("below the recommended minimum"));
    }

    #[test]
    fn variant_rejects_explicit_range() {
        assert!(matches!(
            variant_test(&[1; 1000], false),
            Err(TestFault::InvalidParameter(_))
        ));
    }
}
