//! Typed slots
//!
//! A slot is a field of a command struct that receives bound values. The
//! field type decides the slot's [`SlotShape`]: which value type it accepts
//! and whether it holds one value, an optional value or a sequence.

use crate::error::CoercionError;
use crate::value::{FromValue, Number, TypeName, Value, ValueType};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// How many values a slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one value; keeps its default when nothing is bound
    Single,
    /// Zero or one value
    Optional,
    /// Any number of values
    Many,
}

/// Value type and cardinality of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotShape {
    /// Accepted value type
    pub value_type: ValueType,
    /// Number of values held
    pub cardinality: Cardinality,
}

impl SlotShape {
    /// Shape of a plain field
    pub fn single(value_type: ValueType) -> Self {
        Self {
            value_type,
            cardinality: Cardinality::Single,
        }
    }

    /// Shape of an `Option<_>` field
    pub fn optional(value_type: ValueType) -> Self {
        Self {
            value_type,
            cardinality: Cardinality::Optional,
        }
    }

    /// Shape of a `Vec<_>` field
    pub fn many(value_type: ValueType) -> Self {
        Self {
            value_type,
            cardinality: Cardinality::Many,
        }
    }

    /// Plain `bool` fields bound to options become presence flags
    pub fn is_flag(&self) -> bool {
        self.value_type == ValueType::Bool && self.cardinality == Cardinality::Single
    }

    /// Whether the slot holds a sequence
    pub fn is_sequence(&self) -> bool {
        self.cardinality == Cardinality::Many
    }

    /// Whether values declared as `declared` can be written into this slot
    pub fn accepts(&self, declared: ValueType) -> bool {
        self.value_type == declared
            || matches!(self.value_type, ValueType::String | ValueType::Other(_))
    }
}

impl fmt::Display for SlotShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cardinality {
            Cardinality::Single => write!(f, "single {}", self.value_type),
            Cardinality::Optional => write!(f, "optional {}", self.value_type),
            Cardinality::Many => write!(f, "sequence of {}", self.value_type),
        }
    }
}

/// A field type that can receive bound values
pub trait SlotValue: 'static {
    /// Shape implied by the field type
    fn shape() -> SlotShape;

    /// Store `values`. Values that do not convert are returned as errors and
    /// leave the field untouched (scalars) or are left out (sequences).
    fn assign(&mut self, values: Vec<Value>) -> Vec<CoercionError>;
}

macro_rules! value_slots {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SlotValue for $ty {
                fn shape() -> SlotShape {
                    SlotShape::single(<$ty as FromValue>::value_type())
                }

                fn assign(&mut self, values: Vec<Value>) -> Vec<CoercionError> {
                    match values.into_iter().next().map(<$ty as FromValue>::from_value) {
                        Some(Ok(value)) => {
                            *self = value;
                            Vec::new()
                        }
                        Some(Err(e)) => vec![e],
                        None => Vec::new(),
                    }
                }
            }

            impl SlotValue for Option<$ty> {
                fn shape() -> SlotShape {
                    SlotShape::optional(<$ty as FromValue>::value_type())
                }

                fn assign(&mut self, values: Vec<Value>) -> Vec<CoercionError> {
                    match values.into_iter().next().map(<$ty as FromValue>::from_value) {
                        Some(Ok(value)) => {
                            *self = Some(value);
                            Vec::new()
                        }
                        Some(Err(e)) => vec![e],
                        None => Vec::new(),
                    }
                }
            }

            impl SlotValue for Vec<$ty> {
                fn shape() -> SlotShape {
                    SlotShape::many(<$ty as FromValue>::value_type())
                }

                fn assign(&mut self, values: Vec<Value>) -> Vec<CoercionError> {
                    let mut errors = Vec::new();
                    self.clear();
                    for value in values {
                        match <$ty as FromValue>::from_value(value) {
                            Ok(v) => self.push(v),
                            Err(e) => errors.push(e),
                        }
                    }
                    errors
                }
            }
        )*
    };
}

value_slots!(String, i64, f64, Number, bool, PathBuf, Url, TypeName);

/// Field wrapper for types outside the built-in set, parsed with `FromStr`.
///
/// Declaring one produces a registration warning; binding still works.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Custom<T>(pub T);

impl<T> Custom<T> {
    /// Unwrap the parsed value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Custom<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

fn parse_custom<T>(value: Value) -> Result<T, CoercionError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = String::from_value(value)?;
    raw.parse::<T>()
        .map_err(|e| CoercionError::new(&raw, std::any::type_name::<T>(), e.to_string()))
}

impl<T> SlotValue for Custom<T>
where
    T: FromStr + 'static,
    T::Err: fmt::Display,
{
    fn shape() -> SlotShape {
        SlotShape::single(ValueType::Other(std::any::type_name::<T>()))
    }

    fn assign(&mut self, values: Vec<Value>) -> Vec<CoercionError> {
        match values.into_iter().next().map(parse_custom::<T>) {
            Some(Ok(value)) => {
                self.0 = value;
                Vec::new()
            }
            Some(Err(e)) => vec![e],
            None => Vec::new(),
        }
    }
}

impl<T> SlotValue for Option<Custom<T>>
where
    T: FromStr + 'static,
    T::Err: fmt::Display,
{
    fn shape() -> SlotShape {
        SlotShape::optional(ValueType::Other(std::any::type_name::<T>()))
    }

    fn assign(&mut self, values: Vec<Value>) -> Vec<CoercionError> {
        match values.into_iter().next().map(parse_custom::<T>) {
            Some(Ok(value)) => {
                *self = Some(Custom(value));
                Vec::new()
            }
            Some(Err(e)) => vec![e],
            None => Vec::new(),
        }
    }
}

impl<T> SlotValue for Vec<Custom<T>>
where
    T: FromStr + 'static,
    T::Err: fmt::Display,
{
    fn shape() -> SlotShape {
        SlotShape::many(ValueType::Other(std::any::type_name::<T>()))
    }

    fn assign(&mut self, values: Vec<Value>) -> Vec<CoercionError> {
        let mut errors = Vec::new();
        self.clear();
        for value in values {
            match parse_custom::<T>(value) {
                Ok(v) => self.push(Custom(v)),
                Err(e) => errors.push(e),
            }
        }
        errors
    }
}

type Assign<C> = Box<dyn Fn(&mut C, Vec<Value>) -> Vec<CoercionError> + Send + Sync>;

/// A field of command type `C`, reachable through an accessor closure
pub struct Slot<C> {
    shape: SlotShape,
    assign: Assign<C>,
}

impl<C: 'static> Slot<C> {
    /// Slot for the field returned by `accessor`
    pub fn new<F, A>(accessor: A) -> Self
    where
        F: SlotValue,
        A: Fn(&mut C) -> &mut F + Send + Sync + 'static,
    {
        Self {
            shape: F::shape(),
            assign: Box::new(move |target: &mut C, values: Vec<Value>| accessor(target).assign(values)),
        }
    }

    /// Shape of the field
    pub fn shape(&self) -> SlotShape {
        self.shape
    }

    /// Write `values` into the field of `target`
    pub fn assign(&self, target: &mut C, values: Vec<Value>) -> Vec<CoercionError> {
        (self.assign)(target, values)
    }
}

impl<C> fmt::Debug for Slot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot").field("shape", &self.shape).finish()
    }
}
