//! Generators built from other generators.

use crate::config::defaults;
use crate::error::Error;
use crate::gen::{Gen, Stream};
use crate::primitives::ints;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::iter;
use std::rc::Rc;

/// The lengths used by [`sequences`] and [`lists`] when none are given.
pub fn default_lengths() -> Gen<i64> {
    let d = defaults();
    ints(d.min_length as i64, d.max_length as i64)
}

/// The elements conventionally paired with [`default_lengths`]: `ints()`
/// over the default integer range.
pub fn default_elements() -> Gen<i64> {
    ints(None, None)
}

/// One lazily drawn sequence produced by [`sequences`].
///
/// All sequences from one stream share that stream's elements: values a
/// sequence does not consume are left for the next one.
pub struct Sequence<T> {
    elements: Rc<RefCell<Stream<T>>>,
    remaining: usize,
}

impl<T> Iterator for Sequence<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let next = self.elements.borrow_mut().next();
        self.remaining = if next.is_some() { self.remaining - 1 } else { 0 };
        next
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

/// Random-length sequences of random elements.
///
/// For every length drawn from `lengths` (or [`default_lengths`]), the next
/// sequence takes up to that many values from one shared stream of
/// `elements`.
///
/// # Panics
///
/// Pulling a negative length panics.
pub fn sequences<T>(lengths: impl Into<Option<Gen<i64>>>, elements: Gen<T>) -> Gen<Sequence<T>>
where
    T: 'static,
{
    let lengths = lengths.into().unwrap_or_else(default_lengths);
    Gen::new(move || {
        let shared = Rc::new(RefCell::new(elements.stream()));
        lengths.stream().map(move |length| Sequence {
            elements: Rc::clone(&shared),
            remaining: to_length(length),
        })
    })
}

/// Random-length lists of random elements; [`sequences`] collected eagerly.
pub fn lists<T>(lengths: impl Into<Option<Gen<i64>>>, elements: Gen<T>) -> Gen<Vec<T>>
where
    T: 'static,
{
    sequences(lengths, elements).map(Iterator::collect)
}

/// [`sequences`] of integers from [`default_elements`].
pub fn int_sequences(lengths: impl Into<Option<Gen<i64>>>) -> Gen<Sequence<i64>> {
    sequences(lengths, default_elements())
}

/// [`lists`] of integers from [`default_elements`].
pub fn int_lists(lengths: impl Into<Option<Gen<i64>>>) -> Gen<Vec<i64>> {
    lists(lengths, default_elements())
}

fn to_length(length: i64) -> usize {
    match usize::try_from(length) {
        Ok(length) => length,
        Err(_) => Error::invalid(format!("sequence length {length} is negative")).raise(),
    }
}

/// Tuples of generators that [`tuples`] can zip.
pub trait Tuples {
    /// The tuple of generated values.
    type Output;

    /// Zip the generators positionally.
    fn zip(self) -> Gen<Self::Output>;
}

macro_rules! impl_tuples {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: 'static),+> Tuples for ($(Gen<$name>,)+) {
            type Output = ($($name,)+);

            fn zip(self) -> Gen<Self::Output> {
                Gen::new(move || {
                    let mut streams = ($(self.$idx.stream(),)+);
                    iter::from_fn(move || Some(($(streams.$idx.next()?,)+)))
                })
            }
        }
    };
}

impl_tuples!(A: 0);
impl_tuples!(A: 0, B: 1);
impl_tuples!(A: 0, B: 1, C: 2);
impl_tuples!(A: 0, B: 1, C: 2, D: 3);
impl_tuples!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tuples!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_tuples!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_tuples!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

/// Fixed-size tuples, zipping a tuple of generators positionally.
///
/// The stream ends with the shortest input stream.
pub fn tuples<G: Tuples>(generators: G) -> Gen<G::Output> {
    generators.zip()
}

/// Maps with fixed keys and generated values.
///
/// Every produced map binds each key to the next value of its generator.
/// With no keys at all this is an unbounded stream of empty maps.
pub fn dicts<K, V, I>(generators: I) -> Gen<BTreeMap<K, V>>
where
    I: IntoIterator<Item = (K, Gen<V>)>,
    K: Ord + Clone + 'static,
    V: 'static,
{
    let entries: Vec<(K, Gen<V>)> = generators.into_iter().collect();
    Gen::new(move || {
        let mut streams: Vec<(K, Stream<V>)> = entries
            .iter()
            .map(|(key, gen)| (key.clone(), gen.stream()))
            .collect();
        iter::from_fn(move || {
            streams
                .iter_mut()
                .map(|(key, stream)| stream.next().map(|value| (key.clone(), value)))
                .collect::<Option<BTreeMap<K, V>>>()
        })
    })
}

/// `f` applied to positional and keyword values drawn in lockstep.
///
/// `args` is usually built with [`tuples`]; `kwargs` is zipped as by
/// [`dicts`].
pub fn mapping<A, K, V, R, F, I>(f: F, args: Gen<A>, kwargs: I) -> Gen<R>
where
    F: Fn(A, BTreeMap<K, V>) -> R + 'static,
    I: IntoIterator<Item = (K, Gen<V>)>,
    A: 'static,
    K: Ord + Clone + 'static,
    V: 'static,
    R: 'static,
{
    let kwargs = dicts(kwargs);
    let f = Rc::new(f);
    Gen::new(move || {
        let f = Rc::clone(&f);
        args.stream()
            .zip(kwargs.stream())
            .map(move |(args, kwargs)| f(args, kwargs))
    })
}

/// The first occurrence of every element, in order.
///
/// See [`unique_by`] for how exhaustion is reported.
pub fn unique<T>(elements: Gen<T>) -> Gen<T>
where
    T: Clone + Eq + Hash + 'static,
{
    unique_by(elements, T::clone)
}

/// The first element for every distinct `key`, in order.
///
/// A finite input ends the stream once it ends. An unbounded input that has
/// run out of new keys cannot be told apart from one that is merely unlucky,
/// so after `unique_attempts` consecutive duplicates (see
/// [`Defaults`](crate::Defaults)) the stream panics with
/// [`Error::Exhausted`] rather than spinning forever.
pub fn unique_by<T, K, F>(elements: Gen<T>, key: F) -> Gen<T>
where
    F: Fn(&T) -> K + 'static,
    K: Eq + Hash + 'static,
    T: 'static,
{
    let key = Rc::new(key);
    let attempts = defaults().unique_attempts;
    Gen::new(move || Unique {
        elements: elements.stream(),
        key: Rc::clone(&key),
        seen: HashSet::new(),
        attempts,
    })
}

struct Unique<T, K, F> {
    elements: Stream<T>,
    key: Rc<F>,
    seen: HashSet<K>,
    attempts: usize,
}

impl<T, K, F> Iterator for Unique<T, K, F>
where
    F: Fn(&T) -> K,
    K: Eq + Hash,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let mut duplicates = 0;
        for element in self.elements.by_ref() {
            if self.seen.insert((self.key)(&element)) {
                return Some(element);
            }
            duplicates += 1;
            if duplicates >= self.attempts {
                Error::Exhausted {
                    attempts: self.attempts,
                }
                .raise();
            }
        }
        None
    }
}
