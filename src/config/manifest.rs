//! Manifest schema and loading
//!
//! Defines the TOML/JSON structure for declaring commands without Rust types.

use crate::args::Argument;
use crate::command::{CommandDescriptor, CommandSet, Diagnostic, Handler};
use crate::error::ConstructionError;
use crate::options::OptionBuilder;
use crate::value::ValueType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Result type for manifest loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading a manifest
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// File that was being read
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The content did not parse
    #[error("Failed to parse {format}: {message}")]
    Parse {
        /// `TOML` or `JSON`
        format: &'static str,
        /// Parser message
        message: String,
    },
}

impl ConfigError {
    fn parse<S: Into<String>>(format: &'static str, message: S) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }
}

/// Root of a command manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandManifest {
    /// Application metadata
    pub app: AppConfig,

    /// Declared commands
    #[serde(default)]
    pub commands: Vec<CommandConfig>,

    /// Schema version
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1".to_string()
}

fn default_type() -> String {
    "string".to_string()
}

/// Application metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name shown in usage lines
    pub name: String,

    /// About text
    #[serde(default)]
    pub about: Option<String>,
}

/// One command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Command name
    pub name: String,

    /// One-line description
    #[serde(default)]
    pub description: String,

    /// Name of the handler to attach; defaults to the command name
    #[serde(default)]
    pub handler: Option<String>,

    /// Positional arguments, in order
    #[serde(default)]
    pub args: Vec<ArgConfig>,

    /// Options
    #[serde(default)]
    pub options: Vec<OptionConfig>,
}

/// One positional argument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgConfig {
    /// Argument name
    pub name: String,

    /// Type name: string, integer, float, number, bool, path, url, type
    #[serde(rename = "type", default = "default_type")]
    pub arg_type: String,

    /// Whether the argument may be omitted
    #[serde(default)]
    pub optional: bool,

    /// Whether the argument absorbs every remaining token
    #[serde(default)]
    pub vararg: bool,
}

/// One option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionConfig {
    /// Short flag (e.g. 'n' for -n)
    pub short: Option<char>,

    /// Long flag (e.g. "number" for --number)
    pub long: Option<String>,

    /// Help text
    #[serde(default)]
    pub help: String,

    /// Type name; `bool` makes the option a presence flag
    #[serde(rename = "type", default = "default_type")]
    pub arg_type: String,

    /// Whether the option must be given
    #[serde(default)]
    pub required: bool,

    /// Whether the option may be repeated
    #[serde(default)]
    pub multiple: bool,

    /// Value placeholder for help text
    pub arg_name: Option<String>,
}

fn resolve_type(name: &str, subject: &str, warnings: &mut Vec<String>) -> ValueType {
    match ValueType::from_name(name) {
        Some(value_type) => value_type,
        None => {
            warnings.push(format!(
                "{} has unknown type '{}'; treating it as string",
                subject, name
            ));
            ValueType::String
        }
    }
}

impl CommandConfig {
    /// Name of the handler this command is attached to
    pub fn handler_name(&self) -> &str {
        self.handler.as_deref().unwrap_or(&self.name)
    }

    /// Build the descriptor, collecting warnings for unknown type names
    pub fn to_descriptor(&self) -> Result<(CommandDescriptor, Vec<String>), ConstructionError> {
        if self.name.trim().is_empty() {
            return Err(ConstructionError::EmptyCommandName);
        }

        let mut warnings = Vec::new();
        let mut descriptor = CommandDescriptor::new(self.name.as_str(), self.description.as_str());

        for arg in &self.args {
            let subject = format!("argument '{}'", arg.name);
            let value_type = resolve_type(&arg.arg_type, &subject, &mut warnings);
            descriptor = descriptor.with_argument(Argument::new(
                arg.name.as_str(),
                value_type,
                !arg.optional,
                arg.vararg,
            ))?;
        }

        for opt in &self.options {
            let mut builder = OptionBuilder::new().help(opt.help.as_str());
            if let Some(short) = opt.short {
                builder = builder.with_short(short);
            }
            if let Some(long) = &opt.long {
                builder = builder.long(long.as_str());
            }
            if let Some(arg_name) = &opt.arg_name {
                builder = builder.arg_name(arg_name.as_str());
            }
            if opt.required {
                builder = builder.required();
            }

            let subject = format!("option {}", builder.label());
            let value_type = resolve_type(&opt.arg_type, &subject, &mut warnings);
            let flag = value_type == ValueType::Bool;
            descriptor = descriptor.with_option(builder.build(value_type, !flag, opt.multiple)?)?;
        }

        Ok((descriptor, warnings))
    }
}

impl CommandManifest {
    /// Parse a TOML manifest
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::parse("TOML", e.to_string()))
    }

    /// Parse a JSON manifest
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::parse("JSON", e.to_string()))
    }

    /// Load a TOML manifest from disk
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::from_toml_str(&read(path.as_ref())?)
    }

    /// Load a JSON manifest from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::from_json_str(&read(path.as_ref())?)
    }

    /// Load a manifest, choosing the format by extension.
    ///
    /// Unknown extensions try TOML first, then JSON. A leading `~` is expanded.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let expanded = shellexpand::tilde(&path.as_ref().to_string_lossy()).into_owned();
        let path = Path::new(&expanded);
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => {
                let content = read(path)?;
                Self::from_toml_str(&content).or_else(|_| Self::from_json_str(&content))
            }
        }
    }
}

fn read(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })
}

impl CommandSet {
    /// Build a registry from a manifest, attaching handlers by name.
    ///
    /// Several commands may name the same handler.
    ///
    /// A command whose handler is missing, or whose declarations are invalid,
    /// is skipped with an error diagnostic.
    pub fn from_manifest(manifest: &CommandManifest, handlers: HashMap<String, Handler>) -> Self {
        let mut set = CommandSet::new(manifest.app.name.as_str());

        for command in &manifest.commands {
            let (descriptor, warnings) = match command.to_descriptor() {
                Ok(built) => built,
                Err(e) => {
                    set.report(Diagnostic::error(command.name.as_str(), e.to_string()));
                    continue;
                }
            };

            let Some(handler) = handlers.get(command.handler_name()).map(Arc::clone) else {
                set.report(Diagnostic::error(
                    command.name.as_str(),
                    format!("no handler named '{}'", command.handler_name()),
                ));
                continue;
            };

            for warning in warnings {
                set.report(Diagnostic::warning(command.name.as_str(), warning));
            }
            debug!(command = %command.name, "Attaching manifest handler");
            set.register_handler(descriptor, move |ctx| handler(ctx));
        }

        set
    }
}
