//! Running a test body over sampled parameter combinations.
//!
//! A run draws a population of exactly `samples` values per parameter,
//! shuffles every population independently, and zips them positionally: the
//! `i`-th combination takes the `i`-th value of every population. A filter
//! may discard combinations; discarded ones are not replaced, so a filter
//! only ever lowers the number of invocations. The first panicking
//! invocation ends the run and its panic propagates unchanged.

use crate::combination::{Combination, Sampled};
use crate::config::defaults;
use crate::error::{Error, Result};
use crate::gen::Gen;
use crate::rng::{self, with_rng, SplitMix64};
use crate::signature::{erase, Binding, Signature};
use log::{debug, error, trace};
use rand::seq::SliceRandom;
use std::fmt::{self, Debug};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

type Filter = Box<dyn Fn(&Combination) -> bool>;

/// Outcome of a run in which no invocation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Name of the test, if one was given.
    pub name: Option<String>,
    /// Seed the run was sampled from.
    pub seed: u64,
    /// Population size per parameter.
    pub samples: usize,
    /// Combinations the test body was invoked with.
    pub invoked: usize,
    /// Combinations the filter discarded.
    pub discarded: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("property");
        write!(f, "  ✓ {} passed {} tests", name, self.invoked)?;
        if self.discarded > 0 {
            write!(f, " ({} discarded by filter)", self.discarded)?;
        }
        write!(f, ".")
    }
}

/// The combination an invocation failed on.
struct Failure<'a> {
    name: Option<&'a str>,
    seed: u64,
    samples: usize,
    combination: &'a Combination,
}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name {
            writeln!(f, "━━━ {name} ━━━")?;
        }
        writeln!(
            f,
            "  ✗ failed on combination {} of {} (seed {}).",
            self.combination.index() + 1,
            self.samples,
            self.seed
        )?;
        if self.combination.is_empty() {
            write!(f, "    (no parameters)")
        } else {
            write!(f, "    {}", self.combination)
        }
    }
}

/// A parameterised test: generators bound by name, run over sampled
/// combinations.
///
/// ```rust
/// use factcheck_core::*;
///
/// let report = forall()
///     .samples(50)
///     .bind("x", ints(0, 10))
///     .bind("y", [20, 30])
///     .check(&Signature::new().param("x").param("y"), |c| {
///         let x: i64 = c.take("x");
///         let y: i32 = c.take("y");
///         assert!(x <= 10 && (y == 20 || y == 30));
///     });
/// assert_eq!(report.invoked, 50);
/// ```
#[derive(Default)]
pub struct Forall {
    name: Option<String>,
    samples: Option<usize>,
    seed: Option<u64>,
    bindings: Vec<Binding>,
    filter: Option<Filter>,
}

/// Start building a [`Forall`].
pub fn forall() -> Forall {
    Forall::new()
}

impl Forall {
    /// A run with no explicit bindings, using the thread's default samples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the test in logs and failure reports.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Draw `samples` values per parameter.
    ///
    /// Zero samples means zero invocations, which passes trivially.
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Sample from a fixed seed instead of fresh entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Bind a generator to a parameter, overriding any declared one.
    pub fn bind<T, G>(mut self, name: &str, gen: G) -> Self
    where
        T: Debug + 'static,
        G: Into<Gen<T>>,
    {
        self.bindings.push((Rc::from(name), erase(gen.into())));
        self
    }

    /// Only invoke the test on combinations for which `predicate` holds.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Combination) -> bool + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Run `body` once per surviving combination.
    ///
    /// Usage errors (unknown or unbound parameters, empty generators) are
    /// returned before the body runs. A panic in the body is reported and
    /// then resumed unchanged.
    pub fn run<F>(&self, signature: &Signature, mut body: F) -> Result<Report>
    where
        F: FnMut(&mut Combination),
    {
        let bindings = signature.resolve(&self.bindings)?;
        let samples = self.samples.unwrap_or_else(|| defaults().samples);
        let seed = self.seed.unwrap_or_else(rng::entropy_seed);
        let name = self.name.as_deref();

        debug!(
            "{}: sampling {} values for each of {} parameters (seed {})",
            name.unwrap_or("property"),
            samples,
            bindings.len(),
            seed
        );
        rng::reseed(seed);

        let mut populations = bindings
            .iter()
            .map(|(param, gen)| populate(param, gen, samples))
            .collect::<Result<Vec<_>>>()?;
        let mut shuffles = with_rng(SplitMix64::split);
        for population in &mut populations {
            population.shuffle(&mut shuffles.split());
        }
        let mut columns: Vec<_> = populations.into_iter().map(Vec::into_iter).collect();

        let mut report = Report {
            name: self.name.clone(),
            seed,
            samples,
            invoked: 0,
            discarded: 0,
        };

        for index in 0..samples {
            let Some(values) = bindings
                .iter()
                .zip(columns.iter_mut())
                .map(|((param, _), column)| column.next().map(|v| (Rc::clone(param), v)))
                .collect::<Option<Vec<_>>>()
            else {
                break;
            };
            let mut combination = Combination::new(index, values);

            if let Some(filter) = &self.filter {
                if !filter(&combination) {
                    trace!("discarding combination {index}: {combination}");
                    report.discarded += 1;
                    continue;
                }
            }

            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| body(&mut combination))) {
                let failure = Failure {
                    name,
                    seed,
                    samples,
                    combination: &combination,
                };
                error!("{failure}");
                eprintln!("{failure}");
                panic::resume_unwind(payload);
            }
            report.invoked += 1;
        }

        debug!("{report}");
        Ok(report)
    }

    /// Like [`run`](Forall::run), panicking on usage errors.
    pub fn check<F>(&self, signature: &Signature, body: F) -> Report
    where
        F: FnMut(&mut Combination),
    {
        match self.run(signature, body) {
            Ok(report) => report,
            Err(err) => err.raise(),
        }
    }

    /// Package the run as a zero-argument test function.
    ///
    /// Every call re-samples; it returns normally when all invocations pass
    /// and panics otherwise.
    pub fn into_test<F>(self, signature: Signature, body: F) -> impl Fn()
    where
        F: Fn(&mut Combination),
    {
        move || {
            self.check(&signature, &body);
        }
    }
}

/// Exactly `samples` values from `gen`, restarting its stream whenever it
/// ends.
fn populate(name: &str, gen: &Gen<Sampled>, samples: usize) -> Result<Vec<Sampled>> {
    let mut population = Vec::with_capacity(samples);
    let mut stream = gen.stream();
    let mut fresh = true;
    while population.len() < samples {
        match stream.next() {
            Some(value) => {
                population.push(value);
                fresh = false;
            }
            None if fresh => {
                return Err(Error::EmptyGenerator {
                    name: name.to_string(),
                })
            }
            None => {
                stream = gen.stream();
                fresh = true;
            }
        }
    }
    Ok(population)
}
