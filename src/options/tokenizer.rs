//! Option tokenizer
//!
//! Flag syntax (`-n 3`, `--number=3`, `-fv`, `--`) is handled by an external
//! option parser. This module defines the seam ([`OptionTokenizer`]) and the
//! default implementation on top of clap ([`ClapTokenizer`]).

use super::table::OptionTable;
use crate::error::TokenizeError;
use clap::{Arg, ArgAction};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Id of the hidden catch-all positional in the generated clap command
const POSITIONALS: &str = "cmdkit::positionals";

/// Structured result of splitting flags from positional tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedArgs {
    /// Values per option key, in command-line order
    pub values: HashMap<String, Vec<String>>,
    /// Keys of flags that were present
    pub flags: HashSet<String>,
    /// Tokens that were not consumed by any option
    pub positionals: Vec<String>,
}

impl TokenizedArgs {
    /// Whether the option with this key was given
    pub fn contains(&self, key: &str) -> bool {
        self.flags.contains(key) || self.values.contains_key(key)
    }

    /// Values of the option with this key
    pub fn values(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of the option with this key
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values(key).first().map(String::as_str)
    }
}

/// Splits a command's tokens into option values and positional tokens
pub trait OptionTokenizer: Send + Sync {
    /// Tokenize `tokens` against the option table of `command`
    fn tokenize(
        &self,
        command: &str,
        table: &OptionTable,
        tokens: &[String],
    ) -> Result<TokenizedArgs, TokenizeError>;

    /// Help text for the option table, headed by `usage`
    fn help(&self, command: &str, usage: &str, table: &OptionTable) -> String;
}

/// Tokenizer backed by clap
#[derive(Debug, Clone, Copy, Default)]
pub struct ClapTokenizer;

impl ClapTokenizer {
    /// Build a clap command accepting exactly the options in `table`
    pub fn build_command(command: &str, table: &OptionTable) -> clap::Command {
        let mut cmd = clap::Command::new(command.to_string())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true)
            .color(clap::ColorChoice::Never)
            .arg(
                Arg::new(POSITIONALS)
                    .action(ArgAction::Append)
                    .value_parser(clap::value_parser!(String))
                    .num_args(1..)
                    .allow_negative_numbers(true)
                    .hide(true),
            );

        for option in table {
            let mut arg = Arg::new(option.key()).help(option.description().to_string());

            if let Some(short) = option.short() {
                arg = arg.short(short);
            }
            if let Some(long) = option.long() {
                arg = arg.long(long.to_string());
            }

            if option.expects_value() {
                arg = arg
                    .value_name(option.arg_name())
                    .value_parser(clap::value_parser!(String))
                    .num_args(1)
                    .allow_negative_numbers(true);
                arg = if option.is_multiple() {
                    arg.action(ArgAction::Append)
                } else {
                    arg.action(ArgAction::Set)
                };
            } else {
                arg = arg.action(ArgAction::SetTrue);
            }

            if option.is_required() {
                arg = arg.required(true);
            }

            cmd = cmd.arg(arg);
        }

        cmd
    }
}

impl OptionTokenizer for ClapTokenizer {
    fn tokenize(
        &self,
        command: &str,
        table: &OptionTable,
        tokens: &[String],
    ) -> Result<TokenizedArgs, TokenizeError> {
        let matches = Self::build_command(command, table)
            .try_get_matches_from(tokens.iter().cloned())
            .map_err(|e| {
                let rendered = e.to_string();
                let first = rendered.lines().next().unwrap_or_default();
                TokenizeError::new(first.strip_prefix("error: ").unwrap_or(first).trim())
            })?;

        let mut tokenized = TokenizedArgs::default();
        for option in table {
            let key = option.key();
            if option.expects_value() {
                if let Some(values) = matches.get_many::<String>(&key) {
                    tokenized.values.insert(key, values.cloned().collect());
                }
            } else if matches.get_flag(&key) {
                tokenized.flags.insert(key);
            }
        }

        tokenized.positionals = matches
            .get_many::<String>(POSITIONALS)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        debug!(
            command,
            options = tokenized.values.len() + tokenized.flags.len(),
            positionals = tokenized.positionals.len(),
            "Tokenized command line"
        );
        Ok(tokenized)
    }

    fn help(&self, command: &str, usage: &str, table: &OptionTable) -> String {
        Self::build_command(command, table)
            .override_usage(usage.to_string())
            .render_help()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{OptionBuilder, OptionDescriptor};
    use crate::value::ValueType;

    fn tokens(input: &str) -> Vec<String> {
        input.split_whitespace().map(String::from).collect()
    }

    fn table(options: Vec<OptionDescriptor>) -> OptionTable {
        let mut table = OptionTable::new();
        for option in options {
            table.add(option).unwrap();
        }
        table
    }

    fn number() -> OptionDescriptor {
        OptionBuilder::short('n')
            .long("number")
            .help("A number")
            .build(ValueType::Number, true, false)
            .unwrap()
    }

    fn flag() -> OptionDescriptor {
        OptionBuilder::short('f')
            .long("flag")
            .help("A flag")
            .build(ValueType::Bool, false, false)
            .unwrap()
    }

    #[test]
    fn test_flags_values_and_positionals() {
        let table = table(vec![number(), flag()]);
        let result = ClapTokenizer
            .tokenize("test1", &table, &tokens("-f -n 3 text out.txt"))
            .unwrap();

        assert!(result.flags.contains("f"));
        assert_eq!(result.first("n"), Some("3"));
        assert_eq!(result.positionals, vec!["text", "out.txt"]);
    }

    #[test]
    fn test_long_and_joined_forms() {
        let table = table(vec![number(), flag()]);
        let result = ClapTokenizer
            .tokenize("test1", &table, &tokens("X --number=7 --flag"))
            .unwrap();

        assert!(result.contains("f"));
        assert_eq!(result.values("n"), ["7".to_string()]);
        assert_eq!(result.positionals, vec!["X"]);
    }

    #[test]
    fn test_absent_options() {
        let table = table(vec![number(), flag()]);
        let result = ClapTokenizer.tokenize("test1", &table, &[]).unwrap();

        assert!(!result.contains("f"));
        assert!(!result.contains("n"));
        assert!(result.positionals.is_empty());
    }

    #[test]
    fn test_repeatable_option() {
        let include = OptionBuilder::short('I')
            .build(ValueType::Path, true, true)
            .unwrap();
        let table = table(vec![include]);
        let result = ClapTokenizer
            .tokenize("build", &table, &tokens("-I a -I b main.c"))
            .unwrap();

        assert_eq!(result.values("I"), ["a".to_string(), "b".to_string()]);
        assert_eq!(result.positionals, vec!["main.c"]);
    }

    #[test]
    fn test_unknown_flag_is_an_error() {
        let table = table(vec![flag()]);
        let err = ClapTokenizer
            .tokenize("test1", &table, &tokens("-x"))
            .unwrap_err();
        assert!(err.message.contains("-x"), "message was: {}", err.message);
        assert!(!err.message.starts_with("error:"));
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let table = table(vec![number()]);
        assert!(ClapTokenizer.tokenize("test1", &table, &tokens("-n")).is_err());
    }

    #[test]
    fn test_double_dash_ends_options() {
        let table = table(vec![flag()]);
        let result = ClapTokenizer
            .tokenize("test1", &table, &tokens("-- -f"))
            .unwrap();
        assert!(!result.contains("f"));
        assert_eq!(result.positionals, vec!["-f"]);
    }

    #[test]
    fn test_help_lists_options() {
        let table = table(vec![number(), flag()]);
        let help = ClapTokenizer.help("test1", "app test1 [options] <arg1> ", &table);
        assert!(help.contains("app test1 [options] <arg1>"));
        assert!(help.contains("--number"));
        assert!(help.contains("A flag"));
    }
}
