//! Primitive generator invariants
//!
//! These properties check that every primitive generator stays inside the
//! bounds it was given, for bounds that are themselves generated.

use factcheck::*;

/// Property: every value of `ints(min, max)` lies in `[min, max]`
pub fn test_ints_stay_in_bounds() {
    let signature = Signature::new().param("min").param("width");
    let report = forall()
        .named("ints_stay_in_bounds")
        .samples(100)
        .bind("min", ints(-500, 500))
        .bind("width", ints(0, 500))
        .check(&signature, |c| {
            let min: i64 = c.take("min");
            let max = min + c.take::<i64>("width");
            for n in ints(min, max).sample(50) {
                assert!(min <= n && n <= max, "{n} outside [{min}, {max}]");
            }
        });
    println!("{report}");
}

/// Property: supplied bounds come out first, `min` before `max`
pub fn test_ints_emit_bounds_first() {
    let signature = Signature::new().param("min").param("width");
    forall()
        .samples(50)
        .bind("min", ints(-100, 100))
        .bind("width", ints(1, 100))
        .check(&signature, |c| {
            let min: i64 = c.take("min");
            let max = min + c.take::<i64>("width");
            assert_eq!(ints(min, max).sample(2), vec![min, max]);
            assert_eq!(ints(min, min).sample(3), vec![min; 3]);
        });

    // Omitted bounds are never emitted up front
    with_defaults(Defaults::default().with_int_range(0, 1_000_000), || {
        let first = ints(None, None).sample(20);
        assert!(first.iter().all(|n| (0..=1_000_000).contains(n)));
        assert_ne!(first[..2], [0, 1_000_000]);
    });
}

/// Property: `from_range(start, stop, step)` stays on `start, start + step, ... < stop`
pub fn test_from_range_stays_on_progression() {
    let signature = Signature::new().param("start").param("span").param("step");
    let report = forall()
        .named("from_range_stays_on_progression")
        .samples(100)
        .bind("start", ints(-100, 100))
        .bind("span", ints(1, 200))
        .bind("step", ints(1, 10))
        .check(&signature, |c| {
            let start: i64 = c.take("start");
            let stop = start + c.take::<i64>("span");
            let step: i64 = c.take("step");
            for n in from_range(start, stop, step).sample(50) {
                assert!(start <= n && n < stop, "{n} outside [{start}, {stop})");
                assert_eq!((n - start) % step, 0, "{n} is off the progression");
            }
        });
    println!("{report}");

    // The last element of the progression is the upper boundary
    assert_eq!(from_range(2, 22, 4).sample(2), vec![2, 18]);
    assert_eq!(from_range(0, 10, 3).sample(2), vec![0, 9]);
}

/// Property: a negative step counts down from `start`
pub fn test_from_range_counts_down() {
    let values = from_range(10, 0, -3).sample(200);
    assert_eq!(values[..2], [10, 1]);
    assert!(values.iter().all(|n| [10, 7, 4, 1].contains(n)));
}

/// Property: every value of `floats(a, b)` satisfies `a <= v < b`
pub fn test_floats_stay_half_open() {
    let signature = Signature::new().param("lower").param("width");
    forall()
        .named("floats_stay_half_open")
        .samples(100)
        .bind("lower", floats(-100.0, 100.0))
        .bind("width", floats(0.001, 100.0))
        .check(&signature, |c| {
            let lower: f64 = c.take("lower");
            let upper = lower + c.take::<f64>("width");
            let values = floats(lower, upper).sample(50);
            assert_eq!(values[0], lower);
            for v in values {
                assert!(lower <= v && v < upper, "{v} outside [{lower}, {upper})");
            }
        });

    assert_eq!(floats(2.5, 2.5).sample(3), vec![2.5; 3]);
}

/// Property: the default float range holds only positive finite values
pub fn test_default_floats_are_positive() {
    for v in floats(None, None).sample(200) {
        assert!(v.is_finite() && v >= f64::MIN_POSITIVE);
    }
}

/// Property: `bits` values fit in the bit length they were drawn for
pub fn test_bits_fit_their_length() {
    let signature = Signature::new().param("length");
    forall()
        .samples(64)
        .bind("length", ints(0, 127))
        .check(&signature, |c| {
            let length: i64 = c.take("length");
            for value in bits(always(length)).sample(20) {
                assert!(value < 1u128 << length, "{value} needs more than {length} bits");
            }
        });

    assert_eq!(bitseqs(always(0)).sample(5), vec![0; 5]);
    assert!(bits(always(128)).sample(5).len() == 5);
}

/// Property: `choices` only picks from its sequence, and eventually picks all of it
pub fn test_choices_stay_in_sequence() {
    let items = [3, 6, 2, 1, 11];
    let picked = choices(items).sample(500);
    assert!(picked.iter().all(|v| items.contains(v)));
    assert!(items.iter().all(|v| picked.contains(v)));
}
