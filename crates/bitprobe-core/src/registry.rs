//! Test registry: canonical test names, the module/callable each one binds
//! to, and the argument profile used to invoke it.
//!
//! Implementations are supplied by a [`ModuleCatalog`]. A module is a named
//! table of exports; an export is addressed either as a free function
//! (`"serial_test"`) or as a `Type.method` pair (`"Serial.serial_test"`).

use std::collections::BTreeMap;
use std::fmt;

use crate::error::TestFault;

/// Block size passed to block-structured tests.
pub const BLOCK_FREQUENCY_BLOCK_SIZE: usize = 128;

/// How a registry entry is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentProfile {
    /// `(bits, verbose = true)`
    Standard,
    /// `(bits, block_size, verbose = true)`
    BlockParam(usize),
    /// `(bits, default_pattern = true)`: the test picks its default
    /// template or pattern length.
    DefaultPatternFlag,
}

impl fmt::Display for ArgumentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("Standard"),
            Self::BlockParam(m) => write!(f, "BlockParam({m})"),
            Self::DefaultPatternFlag => f.write_str("DefaultPatternFlag"),
        }
    }
}

/// What a test callable hands back: one p-value or an ordered tuple of them.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Scalar(f64),
    Tuple(Vec<f64>),
}

/// Return value of a test callable.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutput {
    pub value: RawValue,
    /// Diagnostic lines, filled when the callable was asked to be verbose.
    pub details: Vec<String>,
}

impl TestOutput {
    pub fn scalar(p: f64) -> Self {
        Self {
            value: RawValue::Scalar(p),
            details: Vec::new(),
        }
    }

    pub fn tuple(ps: Vec<f64>) -> Self {
        Self {
            value: RawValue::Tuple(ps),
            details: Vec::new(),
        }
    }

    /// Attach a detail line when `verbose` is set.
    pub fn with_detail(mut self, verbose: bool, line: impl FnOnce() -> String) -> Self {
        if verbose {
            self.details.push(line());
        }
        self
    }
}

pub type UnaryTest = fn(&[u8], bool) -> Result<TestOutput, TestFault>;
pub type BlockedTest = fn(&[u8], usize, bool) -> Result<TestOutput, TestFault>;

/// A bound test implementation.
#[derive(Clone, Copy)]
pub enum TestCallable {
    /// `fn(bits, flag)`, where the flag is `verbose` or `default_pattern`.
    Unary(UnaryTest),
    /// `fn(bits, block_size, verbose)`.
    Blocked(BlockedTest),
}

impl fmt::Debug for TestCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unary(_) => f.write_str("TestCallable::Unary"),
            Self::Blocked(_) => f.write_str("TestCallable::Blocked"),
        }
    }
}

/// A named table of test exports.
#[derive(Debug, Clone, Default)]
pub struct TestModule {
    name: String,
    exports: BTreeMap<String, TestCallable>,
}

impl TestModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exports: BTreeMap::new(),
        }
    }

    /// Builder-style export registration.
    pub fn export(mut self, reference: impl Into<String>, callable: TestCallable) -> Self {
        self.exports.insert(reference.into(), callable);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, reference: &str) -> Option<TestCallable> {
        self.exports.get(reference).copied()
    }

    /// All export references, sorted.
    pub fn exports(&self) -> impl Iterator<Item = &str> {
        self.exports.keys().map(String::as_str)
    }

    /// Distinct type names among `Type.method` exports.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self
            .exports
            .keys()
            .filter_map(|k| k.split_once('.').map(|(t, _)| t))
            .collect();
        types.dedup();
        types
    }

    /// Methods exported under `type_name`.
    pub fn methods_of(&self, type_name: &str) -> Vec<&str> {
        self.exports
            .keys()
            .filter_map(|k| k.split_once('.'))
            .filter(|(t, _)| *t == type_name)
            .map(|(_, m)| m)
            .collect()
    }

    /// Exports without a type prefix.
    pub fn functions(&self) -> Vec<&str> {
        self.exports
            .keys()
            .filter(|k| !k.contains('.'))
            .map(String::as_str)
            .collect()
    }
}

/// Source of test modules.
pub trait ModuleCatalog {
    /// Whether a module with this name exists.
    fn contains(&self, module: &str) -> bool;

    /// Load and bind a module. Only called for names where `contains` holds.
    fn load(&self, module: &str) -> Result<TestModule, String>;

    /// Every module name, for diagnostics.
    fn module_names(&self) -> Vec<String>;
}

/// A catalog backed by an in-memory list of modules.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    modules: BTreeMap<String, TestModule>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: TestModule) -> Self {
        self.insert(module);
        self
    }

    pub fn insert(&mut self, module: TestModule) {
        self.modules.insert(module.name.clone(), module);
    }

    pub fn remove(&mut self, module: &str) -> Option<TestModule> {
        self.modules.remove(module)
    }

    pub fn modules(&self) -> impl Iterator<Item = &TestModule> {
        self.modules.values()
    }
}

impl ModuleCatalog for StaticCatalog {
    fn contains(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    fn load(&self, module: &str) -> Result<TestModule, String> {
        self.modules
            .get(module)
            .cloned()
            .ok_or_else(|| format!("module '{module}' is not in the catalog"))
    }

    fn module_names(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSpec {
    pub name: &'static str,
    pub module: &'static str,
    pub callable: &'static str,
    pub profile: ArgumentProfile,
}

const fn spec(
    name: &'static str,
    module: &'static str,
    callable: &'static str,
    profile: ArgumentProfile,
) -> TestSpec {
    TestSpec {
        name,
        module,
        callable,
        profile,
    }
}

/// The fifteen canonical tests, in default run order.
pub const CANONICAL_TESTS: [TestSpec; 15] = [
    spec(
        "frequency",
        "frequency",
        "FrequencyTest.monobit_test",
        ArgumentProfile::Standard,
    ),
    spec(
        "block_frequency",
        "frequency",
        "FrequencyTest.block_frequency",
        ArgumentProfile::BlockParam(BLOCK_FREQUENCY_BLOCK_SIZE),
    ),
    spec("runs", "runs", "RunTest.run_test", ArgumentProfile::Standard),
    spec(
        "longest_run",
        "runs",
        "RunTest.longest_one_block_test",
        ArgumentProfile::Standard,
    ),
    spec(
        "rank",
        "matrix",
        "Matrix.binary_matrix_rank_text",
        ArgumentProfile::Standard,
    ),
    spec(
        "fft",
        "spectral",
        "SpectralTest.spectral_test",
        ArgumentProfile::Standard,
    ),
    spec(
        "non_overlapping_template",
        "template_matching",
        "TemplateMatching.non_overlapping_test",
        ArgumentProfile::DefaultPatternFlag,
    ),
    spec(
        "overlapping_template",
        "template_matching",
        "TemplateMatching.overlapping_patterns",
        ArgumentProfile::DefaultPatternFlag,
    ),
    spec(
        "universal",
        "universal",
        "Universal.statistical_test",
        ArgumentProfile::Standard,
    ),
    spec(
        "linear_complexity",
        "complexity",
        "ComplexityTest.linear_complexity_test",
        ArgumentProfile::Standard,
    ),
    spec(
        "serial",
        "serial",
        "Serial.serial_test",
        ArgumentProfile::DefaultPatternFlag,
    ),
    spec(
        "approximate_entropy",
        "approximate_entropy",
        "ApproximateEntropy.approximate_entropy_test",
        ArgumentProfile::DefaultPatternFlag,
    ),
    spec(
        "cumulative_sums",
        "cumulative_sum",
        "CumulativeSums.cumulative_sums_test",
        ArgumentProfile::Standard,
    ),
    spec(
        "random_excursions",
        "random_excursions",
        "RandomExcursions.random_excursions_test",
        ArgumentProfile::Standard,
    ),
    spec(
        "random_excursions_variant",
        "random_excursions",
        "RandomExcursions.variant_test",
        ArgumentProfile::DefaultPatternFlag,
    ),
];

/// Ordered, read-only name → [`TestSpec`] mapping.
#[derive(Debug, Clone)]
pub struct Registry {
    specs: Vec<TestSpec>,
}

impl Registry {
    /// Registry over the canonical fifteen tests.
    pub fn canonical() -> Self {
        Self {
            specs: CANONICAL_TESTS.to_vec(),
        }
    }

    /// Registry over an explicit list; a later duplicate name replaces an earlier one.
    pub fn from_specs(specs: impl IntoIterator<Item = TestSpec>) -> Self {
        let mut out: Vec<TestSpec> = Vec::new();
        for spec in specs {
            match out.iter_mut().find(|s| s.name == spec.name) {
                Some(existing) => *existing = spec,
                None => out.push(spec),
            }
        }
        Self { specs: out }
    }

    pub fn get(&self, name: &str) -> Option<&TestSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.specs.iter().map(|s| s.name).collect()
    }

    pub fn specs(&self) -> &[TestSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &[u8], _: bool) -> Result<TestOutput, TestFault> {
        Ok(TestOutput::scalar(0.5))
    }

    #[test]
    fn canonical_registry_has_fifteen_unique_names() {
        let reg = Registry::canonical();
        let mut names = reg.names();
        assert_eq!(names.len(), 15);
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 15);
    }

    #[test]
    fn profiles_follow_test_family() {
        let reg = Registry::canonical();
        assert_eq!(
            reg.get("block_frequency").unwrap().profile,
            ArgumentProfile::BlockParam(128)
        );
        for name in [
            "non_overlapping_template",
            "overlapping_template",
            "serial",
            "approximate_entropy",
            "random_excursions_variant",
        ] {
            assert_eq!(
                reg.get(name).unwrap().profile,
                ArgumentProfile::DefaultPatternFlag,
                "{name}"
            );
        }
        assert_eq!(reg.get("frequency").unwrap().profile, ArgumentProfile::Standard);
    }

    #[test]
    fn module_introspection() {
        let module = TestModule::new("frequency")
            .export("FrequencyTest.monobit_test", TestCallable::Unary(noop))
            .export("FrequencyTest.other", TestCallable::Unary(noop))
            .export("helper", TestCallable::Unary(noop));
        assert_eq!(module.types(), vec!["FrequencyTest"]);
        assert_eq!(module.methods_of("FrequencyTest"), vec!["monobit_test", "other"]);
        assert_eq!(module.functions(), vec!["helper"]);
        assert!(module.get("FrequencyTest.monobit_test").is_some());
        assert!(module.get("FrequencyTest.missing").is_none());
    }

    #[test]
    fn static_catalog_lookup() {
        let mut catalog = StaticCatalog::new().with_module(TestModule::new("runs"));
        assert!(catalog.contains("runs"));
        assert!(catalog.load("runs").is_ok());
        catalog.remove("runs");
        assert!(!catalog.contains("runs"));
        assert!(catalog.load("runs").is_err());
    }

    #[test]
    fn later_duplicate_spec_wins() {
        let reg = Registry::from_specs([
            spec("a", "m1", "f", ArgumentProfile::Standard),
            spec("a", "m2", "f", ArgumentProfile::Standard),
        ]);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("a").unwrap().module, "m2");
    }
}
