//! Conversion of raw argument strings into typed values.
//!
//! Target types are looked up by [`TypeId`]. Built-in rules cover `String`,
//! the signed integers `i8` through `i64`, `char` and `bool`; any other type
//! must be registered by the shell author, either with a closure or through
//! its [`FromStr`] implementation.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use log::warn;

use crate::core::error::CoercionError;

/// A coerced argument, ready to be taken by a handler.
pub type Value = Box<dyn Any>;

type BuiltinFn = fn(&str, usize) -> Result<Value, CoercionError>;
type CustomFn = Rc<dyn Fn(&str) -> Result<Value, String>>;

enum Rule {
    Builtin(BuiltinFn),
    Custom(CustomFn),
}

// =============================================================================
// Coercer Table
// =============================================================================

/// Table of coercion rules keyed by target type.
pub struct Coercers {
    rules: HashMap<TypeId, Rule>,
}

impl Default for Coercers {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Coercers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coercers")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl Coercers {
    /// Create a table holding only the built-in rules.
    pub fn new() -> Self {
        let mut rules = HashMap::new();
        rules.insert(TypeId::of::<String>(), Rule::Builtin(coerce_string));
        rules.insert(TypeId::of::<i8>(), Rule::Builtin(coerce_int::<i8>));
        rules.insert(TypeId::of::<i16>(), Rule::Builtin(coerce_int::<i16>));
        rules.insert(TypeId::of::<i32>(), Rule::Builtin(coerce_int::<i32>));
        rules.insert(TypeId::of::<i64>(), Rule::Builtin(coerce_int::<i64>));
        rules.insert(TypeId::of::<char>(), Rule::Builtin(coerce_char));
        rules.insert(TypeId::of::<bool>(), Rule::Builtin(coerce_bool));
        Self { rules }
    }

    /// Register a conversion for a user type, replacing any previous rule.
    pub fn register<T, E, F>(&mut self, convert: F)
    where
        T: 'static,
        E: fmt::Display,
        F: Fn(&str) -> Result<T, E> + 'static,
    {
        let rule: CustomFn = Rc::new(move |raw| {
            convert(raw)
                .map(|value| Box::new(value) as Value)
                .map_err(|err| err.to_string())
        });
        self.rules.insert(TypeId::of::<T>(), Rule::Custom(rule));
    }

    /// Register a user type through its `FromStr` implementation.
    pub fn register_from_str<T>(&mut self)
    where
        T: FromStr + 'static,
        T::Err: fmt::Display,
    {
        self.register::<T, T::Err, _>(str::parse::<T>);
    }

    /// Builder form of [`Coercers::register_from_str`].
    pub fn with_from_str<T>(mut self) -> Self
    where
        T: FromStr + 'static,
        T::Err: fmt::Display,
    {
        self.register_from_str::<T>();
        self
    }

    /// Whether a rule exists for the given type.
    pub fn supports(&self, target: TypeId) -> bool {
        self.rules.contains_key(&target)
    }

    /// Convert `raw` for the parameter at `index` whose type is `target`.
    ///
    /// `target_name` is only used for error messages.
    pub fn coerce(
        &self,
        raw: &str,
        target: TypeId,
        target_name: &'static str,
        index: usize,
    ) -> Result<Value, CoercionError> {
        let result = match self.rules.get(&target) {
            Some(Rule::Builtin(convert)) => convert(raw, index),
            Some(Rule::Custom(convert)) => {
                convert(raw).map_err(|reason| CoercionError::Construct {
                    target: target_name,
                    index,
                    reason,
                })
            }
            None => Err(CoercionError::Unsupported {
                target: target_name,
                index,
            }),
        };

        if let Err(err) = &result {
            if err.is_configuration() {
                warn!("argument declaration defect: {err}");
            }
        }
        result
    }
}

// =============================================================================
// Built-in Rules
// =============================================================================

/// Lenient boolean: true when the token starts with `t` or `T`.
pub fn parse_bool(raw: &str) -> bool {
    matches!(raw.chars().next(), Some('t' | 'T'))
}

/// A token of exactly one character.
pub fn parse_char(raw: &str, index: usize) -> Result<char, CoercionError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CoercionError::Input {
            raw: raw.to_string(),
            target: "char",
            index,
        }),
    }
}

fn coerce_string(raw: &str, _index: usize) -> Result<Value, CoercionError> {
    Ok(Box::new(raw.to_string()))
}

fn coerce_int<T>(raw: &str, index: usize) -> Result<Value, CoercionError>
where
    T: FromStr + 'static,
{
    raw.parse::<T>()
        .map(|value| Box::new(value) as Value)
        .map_err(|_| CoercionError::Input {
            raw: raw.to_string(),
            target: type_name::<T>(),
            index,
        })
}

fn coerce_char(raw: &str, index: usize) -> Result<Value, CoercionError> {
    parse_char(raw, index).map(|c| Box::new(c) as Value)
}

fn coerce_bool(raw: &str, _index: usize) -> Result<Value, CoercionError> {
    Ok(Box::new(parse_bool(raw)))
}

/// Type name without its module path, e.g. `String` for `alloc::string::String`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let head_end = full.find('<').unwrap_or(full.len());
    let start = full[..head_end].rfind("::").map_or(0, |idx| idx + 2);
    &full[start..]
}

// =============================================================================
// Tests
// =============================================================================
