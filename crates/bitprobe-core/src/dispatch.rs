//! Per-test resolution and invocation with failure containment.
//!
//! Each selected name is resolved against the [`Registry`], its module is
//! bound through the [`ModuleCatalog`] (once per run), the export is looked
//! up and invoked with the entry's [`ArgumentProfile`]. Any failure along the
//! way, including a panic inside the callable, becomes an ERROR result for
//! that name only.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::aggregate::{TestResult, TestValue};
use crate::bits::BitSequence;
use crate::error::{DispatchError, TestFault};
use crate::registry::{
    ArgumentProfile, ModuleCatalog, Registry, TestCallable, TestModule, TestOutput,
};
use crate::transcript::Transcript;

/// Results in selection order plus everything written while producing them.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub results: Vec<TestResult>,
    pub transcript: Transcript,
}

impl DispatchReport {
    pub fn get(&self, name: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

/// Runs selected tests one after another.
///
/// Every [`dispatch`](Self::dispatch) call is one run: the module cache is
/// emptied when it starts, so a reused dispatcher rebinds its modules.
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    catalog: &'a dyn ModuleCatalog,
    modules: HashMap<String, TestModule>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry, catalog: &'a dyn ModuleCatalog) -> Self {
        Self {
            registry,
            catalog,
            modules: HashMap::new(),
        }
    }

    /// Number of modules bound during the latest run.
    pub fn cached_modules(&self) -> usize {
        self.modules.len()
    }

    /// Run every name in `selected` (duplicates after the first are skipped).
    pub fn dispatch<S: AsRef<str>>(&mut self, selected: &[S], bits: &BitSequence) -> DispatchReport {
        self.modules.clear();
        let mut report = DispatchReport::default();
        let mut seen = HashSet::new();

        let non_binary = bits.non_binary();
        if non_binary > 0 {
            report.transcript.warn(format!(
                "{non_binary} values are not 0 or 1 and are passed to tests as 0"
            ));
        }
        let bits = bits.to_bits();

        for name in selected.iter().map(AsRef::as_ref) {
            if !seen.insert(name) {
                log::debug!("skipping repeated selection of {name}");
                continue;
            }
            report.transcript.blank();
            report.transcript.line(format!("Running {name} test..."));

            let result = match self.run_one(name, &bits, &mut report.transcript) {
                Ok(value) => {
                    let result = TestResult::from_value(name, value);
                    if let Some(p) = result.decisive() {
                        report.transcript.line(format!(
                            "{name} test result: {p:.6} ({})",
                            result.status
                        ));
                    }
                    result
                }
                Err(err @ DispatchError::UnknownTest(_)) => {
                    report.transcript.line(format!("Unknown test: {name}"));
                    TestResult::from_error(name, &err)
                }
                Err(err) => {
                    report
                        .transcript
                        .error(format!("running {name} test: [{}] {err}", err.kind()));
                    describe_siblings(&err, &mut report.transcript);
                    TestResult::from_error(name, &err)
                }
            };
            report.results.push(result);
        }
        report
    }

    fn run_one(
        &mut self,
        name: &str,
        bits: &[u8],
        transcript: &mut Transcript,
    ) -> Result<TestValue, DispatchError> {
        let spec = self
            .registry
            .get(name)
            .ok_or_else(|| DispatchError::UnknownTest(name.to_string()))?
            .clone();

        let module = self.module(spec.module, transcript)?;
        let callable = resolve(module, spec.callable)?;
        let output = invoke(callable, spec.profile, spec.callable, bits)?;

        for detail in &output.details {
            transcript.line(format!("  {detail}"));
        }
        Ok(TestValue::try_from(output.value)?)
    }

    fn module(
        &mut self,
        name: &str,
        transcript: &mut Transcript,
    ) -> Result<&TestModule, DispatchError> {
        if !self.modules.contains_key(name) {
            if !self.catalog.contains(name) {
                transcript.line(format!(
                    "Available modules: {}",
                    self.catalog.module_names().join(", ")
                ));
                return Err(DispatchError::ModuleNotFound {
                    module: name.to_string(),
                });
            }
            let module = self
                .catalog
                .load(name)
                .map_err(|reason| DispatchError::ModuleLoad {
                    module: name.to_string(),
                    reason,
                })?;
            transcript.line(format!("Loaded test module: {name}"));
            self.modules.insert(name.to_string(), module);
        } else {
            log::debug!("module {name} served from run cache");
        }
        self.modules
            .get(name)
            .ok_or_else(|| DispatchError::ModuleNotFound {
                module: name.to_string(),
            })
    }
}

/// Look up `reference` (`"fn"` or `"Type.method"`) in `module`.
///
/// On failure the error carries the sibling names a caller could have meant:
/// the module's types when the type is missing, the type's methods when only
/// the method is missing, or the free functions otherwise.
pub fn resolve(module: &TestModule, reference: &str) -> Result<TestCallable, DispatchError> {
    if let Some(callable) = module.get(reference) {
        return Ok(callable);
    }
    let (scope, available) = match reference.split_once('.') {
        Some((type_name, _)) => {
            let methods = module.methods_of(type_name);
            if methods.is_empty() {
                ("types".to_string(), module.types())
            } else {
                (format!("methods in {type_name}"), methods)
            }
        }
        None => ("functions".to_string(), module.functions()),
    };
    Err(DispatchError::CallableNotFound {
        module: module.name().to_string(),
        callable: reference.to_string(),
        scope,
        available: available.into_iter().map(String::from).collect(),
    })
}

/// Call `callable` with the arguments `profile` prescribes. Panics are caught.
pub fn invoke(
    callable: TestCallable,
    profile: ArgumentProfile,
    reference: &str,
    bits: &[u8],
) -> Result<TestOutput, TestFault> {
    let call = || match (profile, callable) {
        (ArgumentProfile::Standard, TestCallable::Unary(f)) => f(bits, true),
        (ArgumentProfile::DefaultPatternFlag, TestCallable::Unary(f)) => f(bits, true),
        (ArgumentProfile::BlockParam(block), TestCallable::Blocked(f)) => f(bits, block, true),
        (profile, _) => Err(TestFault::ProfileMismatch {
            profile: profile.to_string(),
            callable: reference.to_string(),
        }),
    };
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => Err(TestFault::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn describe_siblings(err: &DispatchError, transcript: &mut Transcript) {
    if let DispatchError::CallableNotFound {
        scope, available, ..
    } = err
    {
        transcript.line(format!("Available {scope}: [{}]", available.join(", ")));
    }
}
