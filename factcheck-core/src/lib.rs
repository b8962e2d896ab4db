//! Core functionality for factcheck property testing.
//!
//! This crate provides generators (lazy, restartable streams of test values),
//! combinators that build generators from generators, and the engine that
//! runs a test body over sampled combinations of named parameters.

pub mod combination;
pub mod combinators;
pub mod config;
pub mod error;
pub mod gen;
pub mod primitives;
pub mod property;
pub mod rng;
pub mod signature;

// Re-export the main types
pub use combination::*;
pub use combinators::*;
pub use config::*;
pub use error::*;
pub use gen::*;
pub use primitives::*;
pub use property::*;
pub use rng::*;
pub use signature::*;
