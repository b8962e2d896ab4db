//! Factcheck property-based testing library.
//!
//! This is the main entry point for factcheck: generators and combinators
//! for building streams of test values, the [`Forall`] runner, and (with the
//! `derive` feature) the `#[forall]` attribute that turns a function with
//! parameters into a sampled `#[test]`.
//!
//! ```rust,ignore
//! use factcheck::*;
//!
//! #[forall(samples = 100, xs = lists(ints(0, 8), ints(None, None)))]
//! fn reversing_twice_is_identity(xs: Vec<i64>) {
//!     let mut twice = xs.clone();
//!     twice.reverse();
//!     twice.reverse();
//!     assert_eq!(twice, xs);
//! }
//! ```

pub use factcheck_core::*;

// Re-export the attribute macro when available
#[cfg(feature = "derive")]
pub use factcheck_derive::*;
