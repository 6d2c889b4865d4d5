//! Error types for argument declaration, parsing and command execution

use thiserror::Error;

/// Errors raised while a command's shape is being declared.
///
/// These are fatal to the command being registered, never to the registry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstructionError {
    /// An argument was appended after the trailing optional or vararg argument
    #[error("Illegal arguments defined. No additional arguments may be defined after first optional or vararg argument (got '{name}').")]
    IllegalOrdering {
        /// Name of the rejected argument
        name: String,
    },

    /// A declared argument or option cannot be written into its field
    #[error("'{name}' cannot be bound: expected {expected} slot, found {found}")]
    SlotShape {
        /// Argument or option name
        name: String,
        /// Shape the declaration requires
        expected: String,
        /// Shape of the field
        found: String,
    },

    /// Two options share a flag
    #[error("Duplicate option flag: {0}")]
    DuplicateOption(String),

    /// Option flag that cannot be written on a command line
    #[error("Invalid option flag '{flag}': {reason}")]
    InvalidFlag {
        /// Flag as declared
        flag: String,
        /// What is wrong with it
        reason: String,
    },

    /// Option declared with neither a short nor a long flag
    #[error("Option has neither a short nor a long flag")]
    UnnamedOption,

    /// Command declared without a name
    #[error("Command name must not be empty")]
    EmptyCommandName,
}

/// Errors produced when positional tokens do not fit the argument list
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    /// Fewer tokens than required arguments
    #[error("Not enough arguments provided. {required} required, but only {provided} provided.")]
    TooFewArguments {
        /// Number of required arguments
        required: usize,
        /// Number of tokens supplied
        provided: usize,
    },

    /// More tokens than the list can absorb
    #[error("Too many arguments provided. Only {allowed} allowed, but {provided} provided.")]
    TooManyArguments {
        /// Maximum number of tokens accepted
        allowed: usize,
        /// Number of tokens supplied
        provided: usize,
    },
}

/// Error reported by an option tokenizer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TokenizeError {
    /// Human-readable message
    pub message: String,
}

impl TokenizeError {
    /// Create a tokenizer error from a message
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure of the parse stage of an invocation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// Flags could not be tokenized
    #[error(transparent)]
    Options(#[from] TokenizeError),

    /// Positional tokens did not fit the argument list
    #[error(transparent)]
    Positionals(#[from] BindError),
}

/// A raw string could not be converted to its declared type
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot convert '{value}' to {target}: {reason}")]
pub struct CoercionError {
    /// Raw input
    pub value: String,
    /// Name of the target type
    pub target: String,
    /// Why the conversion failed
    pub reason: String,
}

impl CoercionError {
    /// Create a coercion error
    pub fn new(value: &str, target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Errors returned by command handlers
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command rejected its input; shown to the user with usage help
    #[error("{0}")]
    Failed(String),

    /// Anything unexpected; shown with its full error chain
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CommandError {
    /// Create a user-facing failure
    pub fn failed<S: Into<String>>(msg: S) -> Self {
        Self::Failed(msg.into())
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::Internal(err.into())
    }
}

/// Result type for command handlers
pub type CommandResult<T = ()> = Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_messages() {
        let err = BindError::TooFewArguments {
            required: 2,
            provided: 1,
        };
        assert_eq!(
            err.to_string(),
            "Not enough arguments provided. 2 required, but only 1 provided."
        );

        let err = BindError::TooManyArguments {
            allowed: 1,
            provided: 3,
        };
        assert_eq!(
            err.to_string(),
            "Too many arguments provided. Only 1 allowed, but 3 provided."
        );
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let err: ParseError = TokenizeError::new("unexpected argument '-x' found").into();
        assert_eq!(err.to_string(), "unexpected argument '-x' found");
    }

    #[test]
    fn test_command_error_from_anyhow() {
        let err: CommandError = anyhow::anyhow!("disk on fire").into();
        assert!(matches!(err, CommandError::Internal(_)));
        assert_eq!(err.to_string(), "disk on fire");
    }
}
