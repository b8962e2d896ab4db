//! Named argument sets handed to a test body.

use crate::error::{Error, Result};
use std::any::{type_name, Any};
use std::fmt;
use std::rc::Rc;

/// A generated value with its `Debug` rendering captured up front, so a
/// failure can still be reported after the test body took the value.
pub(crate) struct Sampled {
    value: Box<dyn Any>,
    rendered: String,
}

impl Sampled {
    pub(crate) fn new<T: fmt::Debug + 'static>(value: T) -> Self {
        Sampled {
            rendered: format!("{value:?}"),
            value: Box::new(value),
        }
    }
}

struct Entry {
    name: Rc<str>,
    rendered: String,
    value: Option<Box<dyn Any>>,
}

/// One test invocation's arguments: a value per parameter, by name.
///
/// Values are read by reference with [`get`](Combination::get) (as a filter
/// does) or moved out with [`take`](Combination::take) (as a test body
/// does).
pub struct Combination {
    index: usize,
    entries: Vec<Entry>,
}

impl Combination {
    pub(crate) fn new(index: usize, values: Vec<(Rc<str>, Sampled)>) -> Self {
        let entries = values
            .into_iter()
            .map(|(name, sampled)| Entry {
                name,
                rendered: sampled.rendered,
                value: Some(sampled.value),
            })
            .collect();
        Combination { index, entries }
    }

    /// Position of this combination within the sampled populations.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Parameter names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| &*entry.name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the test takes no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the value bound to `name`.
    pub fn try_get<T: 'static>(&self, name: &str) -> Result<&T> {
        let entry = self.entry(name)?;
        let value = entry.value.as_ref().ok_or_else(|| Error::AlreadyTaken {
            name: name.to_string(),
        })?;
        value.downcast_ref::<T>().ok_or_else(|| mismatch::<T>(name))
    }

    /// Move the value bound to `name` out of the combination.
    pub fn try_take<T: 'static>(&mut self, name: &str) -> Result<T> {
        let entry = self.entry_mut(name)?;
        match entry.value.take() {
            Some(value) => match value.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(value) => {
                    entry.value = Some(value);
                    Err(mismatch::<T>(name))
                }
            },
            None => Err(Error::AlreadyTaken {
                name: name.to_string(),
            }),
        }
    }

    /// Borrow the value bound to `name`.
    ///
    /// # Panics
    ///
    /// Panics if there is no such parameter, its value was taken, or it is
    /// not a `T`.
    pub fn get<T: 'static>(&self, name: &str) -> &T {
        match self.try_get(name) {
            Ok(value) => value,
            Err(err) => err.raise(),
        }
    }

    /// Move the value bound to `name` out of the combination.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`get`](Combination::get).
    pub fn take<T: 'static>(&mut self, name: &str) -> T {
        match self.try_take(name) {
            Ok(value) => value,
            Err(err) => err.raise(),
        }
    }

    fn entry(&self, name: &str) -> Result<&Entry> {
        self.entries
            .iter()
            .find(|entry| &*entry.name == name)
            .ok_or_else(|| unknown(name))
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|entry| &*entry.name == name)
            .ok_or_else(|| unknown(name))
    }
}

fn unknown(name: &str) -> Error {
    Error::UnknownParameter {
        name: name.to_string(),
    }
}

fn mismatch<T>(name: &str) -> Error {
    Error::TypeMismatch {
        name: name.to_string(),
        expected: type_name::<T>(),
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", entry.name, entry.rendered)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combination")
            .field("index", &self.index)
            .field("values", &format_args!("{self}"))
            .finish()
    }
}
