//! Primitive generators.
//!
//! Range generators emit the bounds the caller supplied before switching to
//! uniform random draws, so edge values are exercised even with few samples.
//! Bounds left to the [`Defaults`](crate::Defaults) are never emitted this
//! way. Every fresh stream starts with its boundary values again.

use crate::config::defaults;
use crate::error::Error;
use crate::gen::Gen;
use crate::rng::with_rng;
use rand::Rng;
use std::iter;
use std::rc::Rc;

/// Always produces `value`. Consumes no randomness.
pub fn always<T>(value: T) -> Gen<T>
where
    T: Clone + 'static,
{
    Gen::new(move || iter::repeat(value.clone()))
}

/// Elements chosen uniformly at random, with replacement, from `items`.
///
/// # Panics
///
/// Panics if `items` is empty.
pub fn choices<T>(items: impl Into<Vec<T>>) -> Gen<T>
where
    T: Clone + 'static,
{
    let items: Vec<T> = items.into();
    if items.is_empty() {
        Error::EmptyChoices.raise();
    }
    Gen::from_fn(move || {
        let index = with_rng(|rng| rng.gen_range(0..items.len()));
        items[index].clone()
    })
}

/// For every length pulled from `lengths`, an integer drawn uniformly from
/// `[0, 2^length)`.
///
/// # Panics
///
/// Pulling a length outside `0..=128` panics.
pub fn bits(lengths: Gen<i64>) -> Gen<u128> {
    Gen::new(move || lengths.stream().map(random_bits))
}

/// Alias of [`bits`].
pub fn bitseqs(lengths: Gen<i64>) -> Gen<u128> {
    bits(lengths)
}

fn random_bits(length: i64) -> u128 {
    let width = match u32::try_from(length) {
        Ok(width) if width <= u128::BITS => width,
        _ => Error::invalid(format!("bit length {length} is outside 0..=128")).raise(),
    };
    if width == 0 {
        return 0;
    }
    with_rng(|rng| rng.gen::<u128>() >> (u128::BITS - width))
}

/// Integers drawn uniformly from the closed interval `[min, max]`.
///
/// An omitted bound falls back to the thread's defaults. Supplied bounds are
/// emitted first, `min` then `max`.
///
/// # Panics
///
/// Panics if `min > max`.
pub fn ints(min: impl Into<Option<i64>>, max: impl Into<Option<i64>>) -> Gen<i64> {
    let (min, max) = (min.into(), max.into());
    let d = defaults();
    let low = min.unwrap_or(d.min_int);
    let high = max.unwrap_or(d.max_int);
    if low > high {
        Error::invalid(format!("ints: min {low} is greater than max {high}")).raise();
    }

    let mut boundaries = Vec::with_capacity(2);
    boundaries.extend(min);
    if let Some(max) = max {
        if min != Some(max) {
            boundaries.push(max);
        }
    }
    boundary_first(boundaries, move || with_rng(|rng| rng.gen_range(low..=high)))
}

/// Integers drawn uniformly from the progression `start, start + step, ...`
/// up to, but excluding, `stop`.
///
/// With `stop` omitted the progression is `0, 1, ...` up to `start`, and
/// `step` defaults to 1. The first and last elements of the progression are
/// emitted first. A negative `step` counts down from `start` towards `stop`.
///
/// # Panics
///
/// Panics if `step` is zero or the progression is empty.
pub fn from_range(
    start: i64,
    stop: impl Into<Option<i64>>,
    step: impl Into<Option<i64>>,
) -> Gen<i64> {
    let (start, stop) = match stop.into() {
        Some(stop) => (start, stop),
        None => (0, start),
    };
    let step = step.into().unwrap_or(1);
    if step == 0 {
        Error::invalid("from_range: step must not be zero").raise();
    }

    let (start_wide, stop_wide, step_wide) = (start as i128, stop as i128, step as i128);
    let count = if step > 0 && stop_wide > start_wide {
        (stop_wide - start_wide - 1) / step_wide + 1
    } else if step < 0 && start_wide > stop_wide {
        (start_wide - stop_wide - 1) / -step_wide + 1
    } else {
        Error::invalid(format!(
            "from_range: no values in range({start}, {stop}, {step})"
        ))
        .raise()
    };

    let last = (start_wide + (count - 1) * step_wide) as i64;
    let mut boundaries = vec![start];
    if last != start {
        boundaries.push(last);
    }
    boundary_first(boundaries, move || {
        let offset = with_rng(|rng| rng.gen_range(0..count));
        (start_wide + offset * step_wide) as i64
    })
}

/// Reals drawn uniformly from the half-open interval `[lower, upper)`.
///
/// An omitted bound falls back to the thread's defaults. A supplied `lower`
/// is emitted first. When `lower == upper` the generator always produces
/// `lower`.
///
/// # Panics
///
/// Panics if `lower > upper`, either bound is NaN, or the width of the
/// interval overflows.
pub fn floats(lower: impl Into<Option<f64>>, upper: impl Into<Option<f64>>) -> Gen<f64> {
    let (lower, upper) = (lower.into(), upper.into());
    let d = defaults();
    let low = lower.unwrap_or(d.min_float);
    let high = upper.unwrap_or(d.max_float);
    if low.is_nan() || high.is_nan() || low > high || !(high - low).is_finite() {
        Error::invalid(format!("floats: cannot sample from [{low}, {high})")).raise();
    }

    boundary_first(lower.into_iter().collect(), move || {
        if low == high {
            low
        } else {
            with_rng(|rng| rng.gen_range(low..high))
        }
    })
}

/// Emit `boundaries` in order, then values from `draw` forever.
fn boundary_first<T, F>(boundaries: Vec<T>, draw: F) -> Gen<T>
where
    T: Clone + 'static,
    F: Fn() -> T + 'static,
{
    let draw = Rc::new(draw);
    Gen::new(move || {
        let draw = Rc::clone(&draw);
        boundaries
            .clone()
            .into_iter()
            .chain(iter::repeat_with(move || draw()))
    })
}
