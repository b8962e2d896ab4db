//! Declared test parameters.
//!
//! A [`Signature`] is the table of parameters a test accepts, each with an
//! optional generator declared alongside it. The `#[forall]` macro builds
//! one from `#[gen(...)]` parameter attributes; it can also be written by
//! hand. Generators bound explicitly on [`Forall`](crate::Forall) are merged
//! on top: **explicit bindings win** over declared ones.

use crate::combination::Sampled;
use crate::error::{Error, Result};
use crate::gen::Gen;
use std::fmt::Debug;
use std::rc::Rc;

/// A generator whose values have been erased to [`Sampled`].
pub(crate) type Binding = (Rc<str>, Gen<Sampled>);

pub(crate) fn erase<T: Debug + 'static>(gen: Gen<T>) -> Gen<Sampled> {
    gen.map(Sampled::new)
}

struct Param {
    name: Rc<str>,
    declared: Option<Gen<Sampled>>,
}

/// The parameters a test declares, in order.
#[derive(Default)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// An empty signature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter without a generator.
    pub fn param(mut self, name: &str) -> Self {
        self.params.push(Param {
            name: Rc::from(name),
            declared: None,
        });
        self
    }

    /// Declare a parameter together with its generator.
    pub fn param_with<T, G>(mut self, name: &str, gen: G) -> Self
    where
        T: Debug + 'static,
        G: Into<Gen<T>>,
    {
        self.params.push(Param {
            name: Rc::from(name),
            declared: Some(erase(gen.into())),
        });
        self
    }

    /// Parameter names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|param| &*param.name)
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameters are declared.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Merge explicit bindings over the declared generators.
    ///
    /// Later explicit bindings for the same name replace earlier ones.
    pub(crate) fn resolve(&self, explicit: &[Binding]) -> Result<Vec<Binding>> {
        for (i, param) in self.params.iter().enumerate() {
            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Err(Error::DuplicateParameter {
                    name: param.name.to_string(),
                });
            }
        }

        if let Some((name, _)) = explicit
            .iter()
            .find(|(name, _)| !self.params.iter().any(|p| p.name == *name))
        {
            return Err(Error::UnknownParameter {
                name: name.to_string(),
            });
        }

        self.params
            .iter()
            .map(|param| {
                let gen = explicit
                    .iter()
                    .rev()
                    .find(|(name, _)| *name == param.name)
                    .map(|(_, gen)| gen)
                    .or(param.declared.as_ref())
                    .ok_or_else(|| Error::MissingGenerator {
                        name: param.name.to_string(),
                    })?;
                Ok((Rc::clone(&param.name), gen.clone()))
            })
            .collect()
    }
}
