//! NIST SP 800-22 randomness test battery over 0/1 bit sequences.
//!
//! Fifteen tests, grouped into the modules the [`bitprobe_core::Registry`]
//! binds to. Every test takes the bit slice plus a flag (`verbose`, or
//! `default_pattern` for the template and entropy family) and returns a
//! [`TestOutput`] holding a p-value or a tuple of p-values whose first
//! element is decisive. Bits are expected to be 0 or 1; any other value
//! counts as 0.
//!
//! [`catalog`] packages the modules for the dispatcher.

use bitprobe_core::{StaticCatalog, TestCallable, TestFault, TestModule};
use statrs::distribution::{ChiSquared, ContinuousCDF};

pub use bitprobe_core::TestOutput;

pub mod approximate_entropy;
pub mod complexity;
pub mod cumulative_sum;
pub mod frequency;
pub mod matrix;
pub mod random_excursions;
pub mod runs;
pub mod serial;
pub mod spectral;
pub mod template_matching;
pub mod universal;

/// Result of a single test callable.
pub type TestReturn = Result<TestOutput, TestFault>;

// ═══════════════════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════════════════

/// Every test module with its exports, named as the canonical registry expects.
pub fn catalog() -> StaticCatalog {
    use TestCallable::{Blocked, Unary};

    StaticCatalog::new()
        .with_module(
            TestModule::new("frequency")
                .export("FrequencyTest.monobit_test", Unary(frequency::monobit_test))
                .export(
                    "FrequencyTest.block_frequency",
                    Blocked(frequency::block_frequency),
                ),
        )
        .with_module(
            TestModule::new("runs")
                .export("RunTest.run_test", Unary(runs::run_test))
                .export(
                    "RunTest.longest_one_block_test",
                    Unary(runs::longest_one_block_test),
                ),
        )
        .with_module(TestModule::new("matrix").export(
            "Matrix.binary_matrix_rank_text",
            Unary(matrix::binary_matrix_rank_text),
        ))
        .with_module(
            TestModule::new("spectral")
                .export("SpectralTest.spectral_test", Unary(spectral::spectral_test)),
        )
        .with_module(
            TestModule::new("template_matching")
                .export(
                    "TemplateMatching.non_overlapping_test",
                    Unary(template_matching::non_overlapping_test),
                )
                .export(
                    "TemplateMatching.overlapping_patterns",
                    Unary(template_matching::overlapping_patterns),
                ),
        )
        .with_module(
            TestModule::new("universal")
                .export("Universal.statistical_test", Unary(universal::statistical_test)),
        )
        .with_module(TestModule::new("complexity").export(
            "ComplexityTest.linear_complexity_test",
            Unary(complexity::linear_complexity_test),
        ))
        .with_module(
            TestModule::new("serial").export("Serial.serial_test", Unary(serial::serial_test)),
        )
        .with_module(TestModule::new("approximate_entropy").export(
            "ApproximateEntropy.approximate_entropy_test",
            Unary(approximate_entropy::approximate_entropy_test),
        ))
        .with_module(TestModule::new("cumulative_sum").export(
            "CumulativeSums.cumulative_sums_test",
            Unary(cumulative_sum::cumulative_sums_test),
        ))
        .with_module(
            TestModule::new("random_excursions")
                .export(
                    "RandomExcursions.random_excursions_test",
                    Unary(random_excursions::random_excursions_test),
                )
                .export(
                    "RandomExcursions.variant_test",
                    Unary(random_excursions::variant_test),
                ),
        )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Fail with `InsufficientData` when fewer than `needed` bits are available.
pub(crate) fn require(needed: usize, got: usize) -> Result<(), TestFault> {
    if got < needed {
        log::debug!("insufficient data: need {needed}, got {got}");
        return Err(TestFault::InsufficientData { needed, got });
    }
    Ok(())
}

/// Tests driven by a default-pattern flag have no explicit-parameter form here.
pub(crate) fn require_default_pattern(default_pattern: bool, what: &str) -> Result<(), TestFault> {
    if default_pattern {
        Ok(())
    } else {
        Err(TestFault::InvalidParameter(format!(
            "{what} requires an explicit value when the default is not used"
        )))
    }
}

/// +1 for a one bit, -1 otherwise.
pub(crate) fn signed(bit: u8) -> i64 {
    if bit == 1 { 1 } else { -1 }
}

/// Upper tail of the chi-squared distribution. `igamc(df/2, x/2)` in NIST terms.
pub(crate) fn chi2_sf(df: f64, x: f64) -> Result<f64, TestFault> {
    let dist = ChiSquared::new(df)
        .map_err(|e| TestFault::Computation(format!("chi-squared with df={df}: {e}")))?;
    Ok(dist.sf(x))
}

/// Pearson statistic `Σ (observed - n·π)² / (n·π)`.
pub(crate) fn pearson(observed: &[u64], probs: &[f64], n: f64) -> f64 {
    observed
        .iter()
        .zip(probs)
        .map(|(&o, &p)| {
            let expected = n * p;
            let diff = o as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Count of every overlapping `m`-bit pattern, wrapping around the end.
pub(crate) fn pattern_counts(bits: &[u8], m: usize) -> Vec<u64> {
    let n = bits.len();
    let mut counts = vec![0u64; 1 << m];
    if m == 0 {
        counts[0] = n as u64;
        return counts;
    }
    let mask = (1usize << m) - 1;
    let mut window = 0usize;
    for &b in &bits[..m - 1] {
        window = (window << 1) | (b == 1) as usize;
    }
    for i in 0..n {
        let b = bits[(i + m - 1) % n];
        window = ((window << 1) | (b == 1) as usize) & mask;
        counts[window] += 1;
    }
    counts
}
