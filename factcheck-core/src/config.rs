//! Default ranges and run settings.
//!
//! Generators constructed without explicit bounds read these values at
//! construction time. The defaults are stored per thread: the test harness
//! runs every test on its own thread, and an override made by one test must
//! not leak into another running next to it.

use std::cell::Cell;

/// Defaults applied when a generator or run leaves a setting out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defaults {
    /// Lower bound of `ints()` when `min` is omitted.
    pub min_int: i64,

    /// Upper bound of `ints()` when `max` is omitted.
    pub max_int: i64,

    /// Lower bound of `floats()` when `lower` is omitted.
    pub min_float: f64,

    /// Upper bound of `floats()` when `upper` is omitted.
    pub max_float: f64,

    /// Shortest sequence produced by the default `sequences`/`lists` lengths.
    pub min_length: usize,

    /// Longest sequence produced by the default `sequences`/`lists` lengths.
    pub max_length: usize,

    /// Population size drawn per parameter by `forall`.
    pub samples: usize,

    /// Consecutive duplicates `unique` tolerates before giving up.
    pub unique_attempts: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            min_int: -1000,
            max_int: 1000,
            min_float: f64::MIN_POSITIVE,
            max_float: f64::MAX,
            min_length: 0,
            max_length: 32,
            samples: 100,
            unique_attempts: 10_000,
        }
    }
}

impl Defaults {
    /// Use the given inclusive integer range.
    pub fn with_int_range(mut self, min: i64, max: i64) -> Self {
        self.min_int = min;
        self.max_int = max;
        self
    }

    /// Use the given half-open float range.
    pub fn with_float_range(mut self, min: f64, max: f64) -> Self {
        self.min_float = min;
        self.max_float = max;
        self
    }

    /// Use the given inclusive range of sequence lengths.
    pub fn with_lengths(mut self, min: usize, max: usize) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Draw this many samples per parameter.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Give up on `unique` after this many duplicates in a row.
    pub fn with_unique_attempts(mut self, attempts: usize) -> Self {
        self.unique_attempts = attempts;
        self
    }
}

thread_local! {
    static DEFAULTS: Cell<Defaults> = Cell::new(Defaults::default());
}

/// The defaults in effect on this thread.
pub fn defaults() -> Defaults {
    DEFAULTS.with(Cell::get)
}

/// Replace the defaults for this thread, returning the previous ones.
pub fn set_defaults(defaults: Defaults) -> Defaults {
    DEFAULTS.with(|cell| cell.replace(defaults))
}

/// Run `f` with `defaults` in effect, restoring the previous defaults after.
///
/// The previous defaults are restored even if `f` panics.
pub fn with_defaults<R>(defaults: Defaults, f: impl FnOnce() -> R) -> R {
    struct Restore(Defaults);

    impl Drop for Restore {
        fn drop(&mut self) {
            set_defaults(self.0);
        }
    }

    let _restore = Restore(set_defaults(defaults));
    f()
}
