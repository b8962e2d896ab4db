//! Sampling engine properties
//!
//! These properties pin down how `forall` materializes populations, zips
//! them into combinations, filters, and reports failures.

use crate::arbitrary_seed;
use factcheck::*;
use std::cell::Cell;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

/// Property: finite generators cycle to fill any population size
pub fn test_finite_generators_cycle() {
    let signature = Signature::new().param("x").param("y");
    let mut ones = 0;
    let report = forall()
        .named("finite_generators_cycle")
        .samples(300)
        .bind("x", [1, 2])
        .bind("y", [20, 30])
        .check(&signature, |c| {
            let x: i32 = c.take("x");
            let y: i32 = c.take("y");
            assert!(x == 1 || x == 2, "x = {x}");
            assert!(y == 20 || y == 30, "y = {y}");
            if x == 1 {
                ones += 1;
            }
        });

    assert_eq!(report.invoked, 300);
    // Shuffling permutes a population, it never resamples it
    assert_eq!(ones, 150);
}

/// Property: a `where` filter skips combinations and never replaces them
pub fn test_filter_discards_without_replacement() {
    let signature = Signature::new().param("x").param("y");
    let report = forall()
        .named("filter_discards_without_replacement")
        .samples(100)
        .bind("x", [0, 1, 2, 3])
        .bind("y", [0, 1, 2, 3])
        .filter(|c| c.get::<i32>("x") != c.get::<i32>("y"))
        .check(&signature, |c| {
            let x: i32 = c.take("x");
            let y: i32 = c.take("y");
            assert_ne!(x, y);
        });

    assert_eq!(report.invoked + report.discarded, 100);
    assert!(report.invoked < 100, "{report}");
}

/// Property: the same seed yields the same combinations in the same order
pub fn test_fixed_seed_reproduces_combinations() {
    fn combinations(seed: u64) -> Vec<String> {
        let signature = Signature::new().param("x").param("xs").param("f");
        let mut seen = Vec::new();
        forall()
            .samples(30)
            .seed(seed)
            .bind("x", ints(None, None))
            .bind("xs", lists(ints(0, 4), choices(['a', 'b', 'c'])))
            .bind("f", floats(0.0, 1.0))
            .check(&signature, |c| seen.push(c.to_string()));
        seen
    }

    let signature = Signature::new().param("seed");
    forall()
        .named("fixed_seed_reproduces_combinations")
        .samples(10)
        .bind("seed", arbitrary_seed())
        .check(&signature, |c| {
            let seed: u64 = c.take("seed");
            let first = combinations(seed);
            assert_eq!(first.len(), 30);
            assert_eq!(first, combinations(seed), "seed {seed} is not reproducible");
        });
}

/// Property: a generator bound on the run replaces a declared one
pub fn test_explicit_bindings_win() {
    let signature = Signature::new()
        .param_with("x", always("declared"))
        .param_with("y", always("declared"));
    forall()
        .samples(10)
        .bind("x", always("explicit"))
        .check(&signature, |c| {
            assert_eq!(c.take::<&str>("x"), "explicit");
            assert_eq!(c.take::<&str>("y"), "declared");
        });
}

/// Property: supplied bounds land in the population even for tiny sample counts
pub fn test_boundaries_are_sampled() {
    let signature = Signature::new().param("i").param("r");
    let mut ints_seen = BTreeSet::new();
    let mut range_seen = BTreeSet::new();
    forall()
        .samples(2)
        .bind("i", ints(3, 9))
        .bind("r", from_range(2, 22, 4))
        .check(&signature, |c| {
            ints_seen.insert(c.take::<i64>("i"));
            range_seen.insert(c.take::<i64>("r"));
        });
    assert_eq!(ints_seen.into_iter().collect::<Vec<_>>(), vec![3, 9]);
    assert_eq!(range_seen.into_iter().collect::<Vec<_>>(), vec![2, 18]);

    let mut lower = None;
    forall()
        .samples(1)
        .bind("f", floats(1.0, 3.0))
        .check(&Signature::new().param("f"), |c| lower = Some(c.take::<f64>("f")));
    assert_eq!(lower, Some(1.0));
}

/// Property: misconfigured runs fail before the body is ever invoked
pub fn test_usage_errors_before_invocation() {
    let invoked = Cell::new(0);
    let body = |_: &mut Combination| invoked.set(invoked.get() + 1);
    let signature = Signature::new().param("x");

    let unknown = forall()
        .bind("x", always(1))
        .bind("z", always(1))
        .run(&signature, body);
    assert_eq!(
        unknown.err(),
        Some(Error::UnknownParameter {
            name: "z".to_string()
        })
    );

    let missing = forall().run(&signature, body);
    assert_eq!(
        missing.err(),
        Some(Error::MissingGenerator {
            name: "x".to_string()
        })
    );

    let empty = forall().bind("x", Vec::<i32>::new()).run(&signature, body);
    assert_eq!(
        empty.err(),
        Some(Error::EmptyGenerator {
            name: "x".to_string()
        })
    );
    assert_eq!(invoked.get(), 0);

    // Zero samples is not an error, just an empty run
    let report = forall()
        .samples(0)
        .bind("x", always(1))
        .check(&signature, body);
    assert_eq!((report.invoked, invoked.get()), (0, 0));
}

/// Property: the first failing combination ends the run with its own panic
pub fn test_first_failure_stops_the_run() {
    let signature = Signature::new().param("x");
    let mut seen = Vec::new();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        forall()
            .named("first_failure_stops_the_run")
            .samples(50)
            .bind("x", [1, 2, 3, 4, 5])
            .check(&signature, |c| {
                let x: i32 = c.take("x");
                seen.push(x);
                if x == 3 {
                    panic!("boom");
                }
            });
    }));

    let payload = result.expect_err("the run must fail");
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));
    assert_eq!(seen.last(), Some(&3));
    assert_eq!(seen.iter().filter(|x| **x == 3).count(), 1);
    assert!(seen.len() <= 50);
}

/// Property: a packaged test re-samples on every call
pub fn test_into_test_resamples() {
    let calls = Cell::new(0);
    let test = forall()
        .samples(10)
        .bind("x", ints(0, 5))
        .into_test(Signature::new().param("x"), |c| {
            assert!(*c.get::<i64>("x") <= 5);
            calls.set(calls.get() + 1);
        });
    test();
    test();
    assert_eq!(calls.get(), 20);

    let failing = forall()
        .samples(10)
        .bind("x", always(1))
        .into_test(Signature::new().param("x"), |c| {
            assert_eq!(*c.get::<i32>("x"), 2);
        });
    assert!(panic::catch_unwind(AssertUnwindSafe(failing)).is_err());
}
