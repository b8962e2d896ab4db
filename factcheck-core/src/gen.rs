//! The generator type.

use std::fmt;
use std::iter;
use std::rc::Rc;

/// A lazily evaluated stream of values, boxed.
pub type Stream<T> = Box<dyn Iterator<Item = T>>;

/// A generator for test data of type `T`.
///
/// A generator is a production rule, not a container: every call to
/// [`Gen::stream`] starts a fresh, independent stream of values. Random
/// generators produce unbounded streams; generators built from fixed values
/// may end, in which case the sampling engine restarts them.
///
/// Generators are cheap to clone; clones share the production rule.
pub struct Gen<T> {
    source: Rc<dyn Fn() -> Stream<T>>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen {
            source: Rc::clone(&self.source),
        }
    }
}

impl<T> fmt::Debug for Gen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gen").finish_non_exhaustive()
    }
}

impl<T: 'static> Gen<T> {
    /// Create a generator from a function that starts a new stream.
    pub fn new<F, I>(f: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: Iterator<Item = T> + 'static,
    {
        Gen {
            source: Rc::new(move || Box::new(f()) as Stream<T>),
        }
    }

    /// Create an unbounded generator that calls `f` for every value.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        let f = Rc::new(f);
        Gen::new(move || {
            let f = Rc::clone(&f);
            iter::repeat_with(move || f())
        })
    }

    /// Start a new stream of values.
    pub fn stream(&self) -> Stream<T> {
        (self.source)()
    }

    /// Collect the first `n` values of a fresh stream.
    ///
    /// Returns fewer than `n` values if the stream ends first.
    pub fn sample(&self, n: usize) -> Vec<T> {
        self.stream().take(n).collect()
    }

    /// Map a function over the generated values.
    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> U + 'static,
        U: 'static,
    {
        let f = Rc::new(f);
        Gen::new(move || {
            let f = Rc::clone(&f);
            self.stream().map(move |value| f(value))
        })
    }
}

/// A finite generator that yields `items` in order and then ends.
pub fn values<T>(items: impl Into<Vec<T>>) -> Gen<T>
where
    T: Clone + 'static,
{
    let items: Vec<T> = items.into();
    Gen::new(move || items.clone().into_iter())
}

impl<T> From<Vec<T>> for Gen<T>
where
    T: Clone + 'static,
{
    fn from(items: Vec<T>) -> Self {
        values(items)
    }
}

impl<T, const N: usize> From<[T; N]> for Gen<T>
where
    T: Clone + 'static,
{
    fn from(items: [T; N]) -> Self {
        values(items)
    }
}
