//! Value types and string coercion
//!
//! Every argument and option carries a [`ValueType`]. Raw tokens are turned
//! into a [`Value`] by [`coerce`], and typed accessors convert that value into
//! a Rust type through [`FromValue`].

use crate::error::CoercionError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Declared type of an argument or option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Free text
    String,
    /// 64-bit signed integer
    Integer,
    /// 64-bit float
    Float,
    /// Integer or float, decided by the literal
    Number,
    /// Boolean (`true/yes/1/on`, `false/no/0/off`)
    Bool,
    /// Filesystem path, `~` expanded
    Path,
    /// Absolute URL
    Url,
    /// Qualified type reference such as `crate::module::Type`
    TypeRef,
    /// Caller type parsed with `FromStr`; outside the supported set
    Other(&'static str),
}

impl ValueType {
    /// Whether this type belongs to the built-in coercion set
    pub fn is_supported(&self) -> bool {
        !matches!(self, ValueType::Other(_))
    }

    /// Lowercase name used in help text and diagnostics
    pub fn display_name(&self) -> String {
        match self {
            ValueType::String => "string".to_string(),
            ValueType::Integer => "integer".to_string(),
            ValueType::Float => "float".to_string(),
            ValueType::Number => "number".to_string(),
            ValueType::Bool => "bool".to_string(),
            ValueType::Path => "path".to_string(),
            ValueType::Url => "url".to_string(),
            ValueType::TypeRef => "type".to_string(),
            ValueType::Other(name) => name
                .rsplit("::")
                .next()
                .unwrap_or(name)
                .to_lowercase(),
        }
    }

    /// Resolve a type name as written in a manifest
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "string" | "str" | "text" => Some(ValueType::String),
            "int" | "integer" => Some(ValueType::Integer),
            "float" | "double" => Some(ValueType::Float),
            "number" => Some(ValueType::Number),
            "bool" | "boolean" | "flag" => Some(ValueType::Bool),
            "path" | "file" | "dir" => Some(ValueType::Path),
            "url" => Some(ValueType::Url),
            "type" | "class" => Some(ValueType::TypeRef),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Integer-or-float number
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Whole number
    Int(i64),
    /// Floating point number
    Float(f64),
}

impl Number {
    /// Value as an integer, truncating floats
    pub fn as_i64(&self) -> i64 {
        match self {
            Number::Int(n) => *n,
            Number::Float(f) => *f as i64,
        }
    }

    /// Value as a float
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(n) => *n as f64,
            Number::Float(f) => *f,
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number::Int(0)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

impl FromStr for Number {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains(['.', 'e', 'E']) {
            s.parse::<f64>()
                .map(Number::Float)
                .map_err(|e| e.to_string())
        } else {
            s.parse::<i64>()
                .map(Number::Int)
                .map_err(|e| e.to_string())
        }
    }
}

/// Qualified type reference, e.g. `std::path::PathBuf` or `demo.cli.Yell`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeName(String);

impl TypeName {
    /// The reference as written
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, split on `::` or `.`
    pub fn segments(&self) -> Vec<&str> {
        if self.0.contains("::") {
            self.0.split("::").collect()
        } else {
            self.0.split('.').collect()
        }
    }

    /// Final segment
    pub fn simple_name(&self) -> &str {
        self.segments().last().copied().unwrap_or("")
    }
}

impl FromStr for TypeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let name = TypeName(s.to_string());
        if s.is_empty() {
            return Err("empty type reference".to_string());
        }
        for segment in name.segments() {
            let mut chars = segment.chars();
            let valid_start = chars
                .next()
                .map(|c| c.is_alphabetic() || c == '_')
                .unwrap_or(false);
            if !valid_start || !chars.all(|c| c.is_alphanumeric() || c == '_') {
                return Err(format!("'{}' is not a valid identifier", segment));
            }
        }
        Ok(name)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A coerced argument or option value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text
    String(String),
    /// Integer
    Integer(i64),
    /// Float
    Float(f64),
    /// Integer or float
    Number(Number),
    /// Boolean
    Bool(bool),
    /// Filesystem path
    Path(PathBuf),
    /// URL
    Url(Url),
    /// Type reference
    TypeRef(TypeName),
}

impl Value {
    /// Type tag of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::String(_) => ValueType::String,
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Number(_) => ValueType::Number,
            Value::Bool(_) => ValueType::Bool,
            Value::Path(_) => ValueType::Path,
            Value::Url(_) => ValueType::Url,
            Value::TypeRef(_) => ValueType::TypeRef,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Convert a raw token into a value of the declared type.
///
/// `Other` types pass the raw text through unchanged; the receiving slot
/// parses it.
pub fn coerce(raw: &str, value_type: ValueType) -> Result<Value, CoercionError> {
    let target = value_type.display_name();
    match value_type {
        ValueType::String | ValueType::Other(_) => Ok(Value::String(raw.to_string())),
        ValueType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| CoercionError::new(raw, target, e.to_string())),
        ValueType::Float => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| CoercionError::new(raw, target, e.to_string())),
        ValueType::Number => raw
            .parse::<Number>()
            .map(Value::Number)
            .map_err(|e| CoercionError::new(raw, target, e)),
        ValueType::Bool => parse_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| CoercionError::new(raw, target, "expected true/false, yes/no, 1/0 or on/off")),
        ValueType::Path => {
            if raw.is_empty() {
                return Err(CoercionError::new(raw, target, "empty path"));
            }
            Ok(Value::Path(PathBuf::from(shellexpand::tilde(raw).into_owned())))
        }
        ValueType::Url => Url::parse(raw.trim())
            .map(Value::Url)
            .map_err(|e| CoercionError::new(raw, target, e.to_string())),
        ValueType::TypeRef => raw
            .parse::<TypeName>()
            .map(Value::TypeRef)
            .map_err(|e| CoercionError::new(raw, target, e)),
    }
}

/// Conversion from a coerced [`Value`] into a Rust type
pub trait FromValue: Sized {
    /// Declared type of arguments bound to this Rust type
    fn value_type() -> ValueType;

    /// Convert, failing when the value has another shape
    fn from_value(value: Value) -> Result<Self, CoercionError>;
}

fn mismatch(value: &Value, target: ValueType) -> CoercionError {
    CoercionError::new(
        &format!("{:?}", value),
        target.display_name(),
        format!("value is a {}", value.value_type()),
    )
}

impl FromValue for String {
    fn value_type() -> ValueType {
        ValueType::String
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        Ok(match value {
            Value::String(s) => s,
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Path(p) => p.to_string_lossy().into_owned(),
            Value::Url(u) => u.to_string(),
            Value::TypeRef(t) => t.to_string(),
        })
    }
}

impl FromValue for i64 {
    fn value_type() -> ValueType {
        ValueType::Integer
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Integer(n) => Ok(n),
            Value::Number(Number::Int(n)) => Ok(n),
            Value::String(s) => coerce(&s, ValueType::Integer).and_then(Self::from_value),
            other => Err(mismatch(&other, ValueType::Integer)),
        }
    }
}

impl FromValue for f64 {
    fn value_type() -> ValueType {
        ValueType::Float
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Integer(n) => Ok(n as f64),
            Value::Number(n) => Ok(n.as_f64()),
            Value::String(s) => coerce(&s, ValueType::Float).and_then(Self::from_value),
            other => Err(mismatch(&other, ValueType::Float)),
        }
    }
}

impl FromValue for Number {
    fn value_type() -> ValueType {
        ValueType::Number
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Number(n) => Ok(n),
            Value::Integer(n) => Ok(Number::Int(n)),
            Value::Float(f) => Ok(Number::Float(f)),
            Value::String(s) => coerce(&s, ValueType::Number).and_then(Self::from_value),
            other => Err(mismatch(&other, ValueType::Number)),
        }
    }
}

impl FromValue for bool {
    fn value_type() -> ValueType {
        ValueType::Bool
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::String(s) => coerce(&s, ValueType::Bool).and_then(Self::from_value),
            other => Err(mismatch(&other, ValueType::Bool)),
        }
    }
}

impl FromValue for PathBuf {
    fn value_type() -> ValueType {
        ValueType::Path
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Path(p) => Ok(p),
            Value::String(s) => coerce(&s, ValueType::Path).and_then(Self::from_value),
            other => Err(mismatch(&other, ValueType::Path)),
        }
    }
}

impl FromValue for Url {
    fn value_type() -> ValueType {
        ValueType::Url
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Url(u) => Ok(u),
            Value::String(s) => coerce(&s, ValueType::Url).and_then(Self::from_value),
            other => Err(mismatch(&other, ValueType::Url)),
        }
    }
}

impl FromValue for TypeName {
    fn value_type() -> ValueType {
        ValueType::TypeRef
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::TypeRef(t) => Ok(t),
            Value::String(s) => coerce(&s, ValueType::TypeRef).and_then(Self::from_value),
            other => Err(mismatch(&other, ValueType::TypeRef)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_literals() {
        assert_eq!("3".parse::<Number>().unwrap(), Number::Int(3));
        assert_eq!("-12".parse::<Number>().unwrap(), Number::Int(-12));
        assert_eq!("2.5".parse::<Number>().unwrap(), Number::Float(2.5));
        assert_eq!("1e3".parse::<Number>().unwrap(), Number::Float(1000.0));
        assert!("three".parse::<Number>().is_err());
        assert_eq!(Number::Float(3.9).as_i64(), 3);
    }

    #[test]
    fn test_coerce_supported_types() {
        assert_eq!(coerce("text", ValueType::String).unwrap(), Value::String("text".into()));
        assert_eq!(coerce("42", ValueType::Integer).unwrap(), Value::Integer(42));
        assert_eq!(coerce("0.5", ValueType::Float).unwrap(), Value::Float(0.5));
        assert_eq!(coerce("3", ValueType::Number).unwrap(), Value::Number(Number::Int(3)));
        assert_eq!(coerce("Yes", ValueType::Bool).unwrap(), Value::Bool(true));
        assert_eq!(coerce("off", ValueType::Bool).unwrap(), Value::Bool(false));
        assert_eq!(
            coerce("out.txt", ValueType::Path).unwrap(),
            Value::Path(PathBuf::from("out.txt"))
        );
        match coerce("https://example.com/a?b=c", ValueType::Url).unwrap() {
            Value::Url(u) => assert_eq!(u.host_str(), Some("example.com")),
            other => panic!("Expected url, got {:?}", other),
        }
        match coerce("demo.cli.ParseTests", ValueType::TypeRef).unwrap() {
            Value::TypeRef(t) => assert_eq!(t.simple_name(), "ParseTests"),
            other => panic!("Expected type reference, got {:?}", other),
        }
    }

    #[test]
    fn test_coerce_failures() {
        let err = coerce("abc", ValueType::Integer).unwrap_err();
        assert_eq!(err.value, "abc");
        assert_eq!(err.target, "integer");

        assert!(coerce("maybe", ValueType::Bool).is_err());
        assert!(coerce("not a url", ValueType::Url).is_err());
        assert!(coerce("std::9lives", ValueType::TypeRef).is_err());
        assert!(coerce("", ValueType::Path).is_err());
    }

    #[test]
    fn test_other_passes_raw_text() {
        assert_eq!(
            coerce("00:01:30", ValueType::Other("Duration")).unwrap(),
            Value::String("00:01:30".into())
        );
        assert!(!ValueType::Other("Duration").is_supported());
        assert_eq!(ValueType::Other("std::time::Duration").display_name(), "duration");
    }

    #[test]
    fn test_type_names_from_manifest() {
        assert_eq!(ValueType::from_name("File"), Some(ValueType::Path));
        assert_eq!(ValueType::from_name("class"), Some(ValueType::TypeRef));
        assert_eq!(ValueType::from_name("uuid"), None);
    }

    #[test]
    fn test_from_value_conversions() {
        assert_eq!(i64::from_value(Value::Number(Number::Int(7))).unwrap(), 7);
        assert_eq!(f64::from_value(Value::Integer(2)).unwrap(), 2.0);
        assert_eq!(String::from_value(Value::Bool(true)).unwrap(), "true");
        assert!(bool::from_value(Value::Integer(1)).is_err());
    }
}
