//! Positional binder
//!
//! Matches the leftover positional tokens of an invocation against an
//! [`ArgumentList`]. Ordinary arguments take one token each in declaration
//! order; the trailing argument is either optional (zero or one token) or a
//! vararg (every remaining token).

use super::argument::Argument;
use super::list::ArgumentList;
use crate::error::BindError;
use crate::value::{coerce, FromValue};
use std::collections::HashMap;
use tracing::warn;

/// Positional values bound for one invocation
#[derive(Debug, Clone)]
pub struct ParsedPositionals<'a> {
    arguments: &'a ArgumentList,
    values: HashMap<usize, String>,
    varargs: Vec<String>,
    tokens: Vec<String>,
}

/// Bind positional tokens against an argument list
pub fn bind<'a>(tokens: &[String], arguments: &'a ArgumentList) -> Result<ParsedPositionals<'a>, BindError> {
    let required = arguments.iter().filter(|a| a.is_required()).count();
    let has_optional = arguments.iter().any(|a| !a.is_required());
    let has_vararg = arguments.iter().any(|a| a.is_vararg());
    let allowed = if has_optional { required + 1 } else { required };

    if tokens.len() < required {
        return Err(BindError::TooFewArguments {
            required,
            provided: tokens.len(),
        });
    }

    if !has_vararg && tokens.len() > allowed {
        return Err(BindError::TooManyArguments {
            allowed,
            provided: tokens.len(),
        });
    }

    let mut values = HashMap::new();
    let mut varargs = Vec::new();
    let mut cursor = 0;

    for (index, argument) in arguments.iter().enumerate() {
        if argument.is_required() && !argument.is_vararg() {
            values.insert(index, tokens[cursor].clone());
            cursor += 1;
            continue;
        }

        // terminal argument; the list is sealed after it
        if argument.is_vararg() {
            varargs = tokens[cursor.min(tokens.len())..].to_vec();
            if argument.is_required() && varargs.is_empty() {
                return Err(BindError::TooFewArguments {
                    required,
                    provided: tokens.len(),
                });
            }
        } else if let Some(token) = tokens.get(cursor) {
            values.insert(index, token.clone());
        }
        break;
    }

    Ok(ParsedPositionals {
        arguments,
        values,
        varargs,
        tokens: tokens.to_vec(),
    })
}

impl<'a> ParsedPositionals<'a> {
    /// Argument list these values were bound against
    pub fn arguments(&self) -> &'a ArgumentList {
        self.arguments
    }

    /// All positional tokens, as supplied
    pub fn leftover(&self) -> &[String] {
        &self.tokens
    }

    /// Whether the argument received a value
    pub fn has_value(&self, argument: &Argument) -> bool {
        if argument.is_vararg() {
            !self.varargs.is_empty()
        } else {
            self.index(argument)
                .map(|i| self.values.contains_key(&i))
                .unwrap_or(false)
        }
    }

    /// Single value of an argument; the first element for a vararg
    pub fn value(&self, argument: &Argument) -> Option<&str> {
        if argument.is_vararg() {
            self.varargs.first().map(String::as_str)
        } else {
            self.index(argument)
                .and_then(|i| self.values.get(&i))
                .map(String::as_str)
        }
    }

    /// Every value of an argument: the tail for a vararg, else zero or one
    pub fn values(&self, argument: &Argument) -> Vec<&str> {
        if argument.is_vararg() {
            self.varargs.iter().map(String::as_str).collect()
        } else {
            self.value(argument).into_iter().collect()
        }
    }

    /// Value converted to `T` through the argument's declared type.
    ///
    /// Malformed input is logged and reported as absent.
    pub fn value_as<T: FromValue>(&self, argument: &Argument) -> Option<T> {
        let raw = self.value(argument)?;
        match coerce(raw, argument.value_type()).and_then(T::from_value) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(argument = argument.name(), "Exception converting an arg to desired type: {}", e);
                None
            }
        }
    }

    /// Every value converted to `T`; malformed elements are logged and dropped
    pub fn values_as<T: FromValue>(&self, argument: &Argument) -> Vec<T> {
        self.values(argument)
            .into_iter()
            .filter_map(|raw| match coerce(raw, argument.value_type()).and_then(T::from_value) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(argument = argument.name(), "Exception converting an arg to desired type: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Whether the named argument received a value
    pub fn has_arg(&self, name: &str) -> bool {
        self.arguments
            .by_name(name)
            .map(|a| self.has_value(a))
            .unwrap_or(false)
    }

    /// Value of the named argument
    pub fn arg_value(&self, name: &str) -> Option<&str> {
        self.arguments.by_name(name).and_then(|a| self.value(a))
    }

    /// Values of the named argument
    pub fn arg_values(&self, name: &str) -> Vec<&str> {
        self.arguments
            .by_name(name)
            .map(|a| self.values(a))
            .unwrap_or_default()
    }

    fn index(&self, argument: &Argument) -> Option<usize> {
        self.arguments.index_of(argument)
    }
}
