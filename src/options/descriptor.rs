//! Option descriptor and builder

use crate::error::ConstructionError;
use crate::value::ValueType;

/// A flagged option (`-n 3`, `--number 3`, `-f`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDescriptor {
    short: Option<char>,
    long: Option<String>,
    description: String,
    arg_name: Option<String>,
    required: bool,
    expects_value: bool,
    multiple: bool,
    value_type: ValueType,
}

impl OptionDescriptor {
    /// Lookup key: the short flag if any, else the long flag
    pub fn key(&self) -> String {
        match (self.short, &self.long) {
            (Some(c), _) => c.to_string(),
            (None, Some(long)) => long.clone(),
            (None, None) => String::new(),
        }
    }

    /// Short flag
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// Long flag
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// Help text
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Placeholder shown for the value in help, e.g. `number`
    pub fn arg_name(&self) -> String {
        self.arg_name
            .clone()
            .unwrap_or_else(|| self.value_type.display_name())
    }

    /// Whether the option must be present
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the option takes a value; otherwise it is a presence flag
    pub fn expects_value(&self) -> bool {
        self.expects_value
    }

    /// Whether the option may be repeated to collect several values
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Declared value type
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether `name` is this option's short or long flag
    pub fn matches(&self, name: &str) -> bool {
        let mut chars = name.chars();
        let short_match = match (self.short, chars.next(), chars.next()) {
            (Some(s), Some(c), None) => s == c,
            _ => false,
        };
        short_match || self.long.as_deref() == Some(name)
    }

    /// Label used in diagnostics, e.g. `-n/--number`
    pub fn label(&self) -> String {
        match (self.short, &self.long) {
            (Some(s), Some(l)) => format!("-{}/--{}", s, l),
            (Some(s), None) => format!("-{}", s),
            (None, Some(l)) => format!("--{}", l),
            (None, None) => "<unnamed>".to_string(),
        }
    }
}

/// Builder used when declaring options on a command
#[derive(Debug, Clone, Default)]
pub struct OptionBuilder {
    short: Option<char>,
    long: Option<String>,
    description: String,
    arg_name: Option<String>,
    required: bool,
    value_type: Option<ValueType>,
}

impl OptionBuilder {
    /// Start an option with a short flag
    pub fn short(c: char) -> Self {
        Self {
            short: Some(c),
            ..Self::default()
        }
    }

    /// Start an option with only a long flag
    pub fn long_only(long: impl Into<String>) -> Self {
        Self {
            long: Some(long.into()),
            ..Self::default()
        }
    }

    /// Start an unnamed option; a flag must be added before building
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the short flag
    pub fn with_short(mut self, c: char) -> Self {
        self.short = Some(c);
        self
    }

    /// Set the long flag
    pub fn long(mut self, long: impl Into<String>) -> Self {
        let long = long.into();
        if !long.trim().is_empty() {
            self.long = Some(long);
        }
        self
    }

    /// Set the help text
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the value placeholder shown in help
    pub fn arg_name(mut self, arg_name: impl Into<String>) -> Self {
        let arg_name = arg_name.into();
        if !arg_name.trim().is_empty() {
            self.arg_name = Some(arg_name);
        }
        self
    }

    /// Require the option
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Override the value type. When unset, the bound field decides.
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Label of the option being declared
    pub fn label(&self) -> String {
        match (self.short, &self.long) {
            (Some(s), _) => format!("-{}", s),
            (None, Some(l)) => format!("--{}", l),
            (None, None) => "<unnamed>".to_string(),
        }
    }

    /// Finish the descriptor
    pub fn build(
        self,
        fallback: ValueType,
        expects_value: bool,
        multiple: bool,
    ) -> Result<OptionDescriptor, ConstructionError> {
        if self.short.is_none() && self.long.is_none() {
            return Err(ConstructionError::UnnamedOption);
        }
        if let Some(short) = self.short {
            check_short(short)?;
        }
        if let Some(long) = &self.long {
            check_long(long)?;
        }
        Ok(OptionDescriptor {
            short: self.short,
            long: self.long,
            description: self.description,
            arg_name: self.arg_name,
            required: self.required,
            expects_value,
            multiple,
            value_type: self.value_type.unwrap_or(fallback),
        })
    }
}

fn check_short(c: char) -> Result<(), ConstructionError> {
    let reason = if c == '-' {
        "'-' cannot be a short flag"
    } else if c.is_whitespace() || c.is_control() {
        "short flag must be a visible character"
    } else {
        return Ok(());
    };
    Err(ConstructionError::InvalidFlag {
        flag: c.to_string(),
        reason: reason.to_string(),
    })
}

fn check_long(long: &str) -> Result<(), ConstructionError> {
    let reason = if long.is_empty() {
        "long flag is empty"
    } else if long.starts_with('-') {
        "long flag is declared without its leading dashes"
    } else if long.chars().any(|c| c.is_whitespace() || c.is_control()) {
        "long flag contains whitespace"
    } else if long.contains('=') {
        "long flag contains '='"
    } else {
        return Ok(());
    };
    Err(ConstructionError::InvalidFlag {
        flag: long.to_string(),
        reason: reason.to_string(),
    })
}
