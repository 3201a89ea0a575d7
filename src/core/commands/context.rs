//! Invocation context handed to command handlers.

use std::io;

use crate::console::Console;
use crate::core::coerce::{Value, short_type_name};
use crate::core::error::ArgError;
use crate::models::Command;

use super::Registry;

// =============================================================================
// Arguments
// =============================================================================

/// Coerced arguments of one invocation, in declaration order.
#[derive(Debug, Default)]
pub struct Args {
    values: Vec<Option<Value>>,
}

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow argument `index` as `T`.
    pub fn get<T: 'static>(&self, index: usize) -> Result<&T, ArgError> {
        let value = self
            .values
            .get(index)
            .ok_or(ArgError::OutOfRange {
                index,
                len: self.values.len(),
            })?
            .as_deref()
            .ok_or(ArgError::AlreadyTaken { index })?;
        value.downcast_ref::<T>().ok_or(ArgError::TypeMismatch {
            index,
            requested: short_type_name::<T>(),
        })
    }

    /// Move argument `index` out as `T`.
    ///
    /// A failed downcast leaves the argument in place.
    pub fn take<T: 'static>(&mut self, index: usize) -> Result<T, ArgError> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(ArgError::OutOfRange { index, len })?;
        let value = slot.take().ok_or(ArgError::AlreadyTaken { index })?;
        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(original) => {
                *slot = Some(original);
                Err(ArgError::TypeMismatch {
                    index,
                    requested: short_type_name::<T>(),
                })
            }
        }
    }
}

// =============================================================================
// Context
// =============================================================================

/// Everything a handler can reach besides the shell state.
pub struct Context<'a, S> {
    args: Args,
    console: &'a mut dyn Console,
    registry: &'a Registry<S>,
}

impl<'a, S> Context<'a, S> {
    pub fn new(args: Args, console: &'a mut dyn Console, registry: &'a Registry<S>) -> Self {
        Self {
            args,
            console,
            registry,
        }
    }

    /// Take argument `index` as `T`.
    pub fn arg<T: 'static>(&mut self, index: usize) -> Result<T, ArgError> {
        self.args.take(index)
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Print without a trailing newline.
    pub fn print(&mut self, text: &str) -> io::Result<()> {
        self.console.print(text)
    }

    pub fn println(&mut self, text: &str) -> io::Result<()> {
        self.console.println(text)
    }

    /// All registered commands, in registry order.
    pub fn commands(&self) -> impl Iterator<Item = &Command<S>> {
        self.registry.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        let values: Vec<Value> = vec![Box::new("hello".to_string()), Box::new(7_i32)];
        Args::new(values)
    }

    #[test]
    fn test_take_typed() {
        let mut args = args();
        assert_eq!(args.take::<String>(0).unwrap(), "hello");
        assert_eq!(args.take::<i32>(1).unwrap(), 7);
    }

    #[test]
    fn test_take_twice() {
        let mut args = args();
        args.take::<String>(0).unwrap();
        assert_eq!(
            args.take::<String>(0),
            Err(ArgError::AlreadyTaken { index: 0 })
        );
    }

    #[test]
    fn test_wrong_type_keeps_value() {
        let mut args = args();
        assert_eq!(
            args.take::<i64>(1),
            Err(ArgError::TypeMismatch {
                index: 1,
                requested: "i64"
            })
        );
        assert_eq!(*args.get::<i32>(1).unwrap(), 7);
    }

    #[test]
    fn test_out_of_range() {
        let args = args();
        assert_eq!(
            args.get::<String>(5),
            Err(ArgError::OutOfRange { index: 5, len: 2 })
        );
        assert_eq!(args.len(), 2);
    }
}
