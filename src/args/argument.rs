//! Positional argument descriptor

use crate::value::ValueType;

/// Metadata for one positional slot. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    name: String,
    value_type: ValueType,
    required: bool,
    vararg: bool,
}

impl Argument {
    /// Create a descriptor
    pub fn new(name: impl Into<String>, value_type: ValueType, required: bool, vararg: bool) -> Self {
        Self {
            name: name.into(),
            value_type,
            required,
            vararg,
        }
    }

    /// Required string argument
    pub fn required(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::String, true, false)
    }

    /// Argument name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether the argument must be supplied
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the argument absorbs all remaining tokens
    pub fn is_vararg(&self) -> bool {
        self.vararg
    }

    /// Whether appending this argument seals its list
    pub fn is_trailing(&self) -> bool {
        self.vararg || !self.required
    }

    /// Usage fragment for this argument at the given 1-based position
    pub fn usage(&self, position: usize) -> String {
        let title = self.title(position);
        match (self.vararg, self.required) {
            (true, true) => format!("{} [{}...]", title, title),
            (true, false) => format!("[{}...]", title),
            (false, true) => title,
            (false, false) => format!("[{}]", title),
        }
    }

    fn title(&self, position: usize) -> String {
        if self.name.is_empty() {
            format!("ARG{}", position)
        } else {
            format!("<{}>", self.name)
        }
    }
}

/// Builder used when declaring arguments on a command
#[derive(Debug, Clone)]
pub struct ArgumentBuilder {
    name: String,
    value_type: Option<ValueType>,
    required: bool,
    vararg: bool,
}

impl ArgumentBuilder {
    /// Start a required, non-vararg argument
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: None,
            required: true,
            vararg: false,
        }
    }

    /// Mark the argument optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Mark the argument as a vararg tail
    pub fn vararg(mut self) -> Self {
        self.vararg = true;
        self
    }

    /// Set requiredness explicitly
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Override the value type. When unset, the bound field decides.
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Name being declared
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a vararg was requested
    pub fn is_vararg(&self) -> bool {
        self.vararg
    }

    /// Finish the descriptor, using `fallback` when no type was set
    pub fn build(self, fallback: ValueType) -> Argument {
        Argument::new(
            self.name,
            self.value_type.unwrap_or(fallback),
            self.required,
            self.vararg,
        )
    }
}
