//! Per-invocation access to parsed options and positionals

use super::descriptor::CommandDescriptor;
use crate::args::ParsedPositionals;
use crate::error::CoercionError;
use crate::options::{OptionDescriptor, TokenizedArgs};
use crate::value::{coerce, FromValue, Value};
use tracing::warn;

/// Everything a handler can ask about one invocation.
///
/// Options are looked up by short or long flag, arguments by name.
#[derive(Debug)]
pub struct CommandContext<'a> {
    descriptor: &'a CommandDescriptor,
    tokenized: TokenizedArgs,
    positionals: ParsedPositionals<'a>,
}

impl<'a> CommandContext<'a> {
    /// Assemble a context from the two parse stages
    pub fn new(
        descriptor: &'a CommandDescriptor,
        tokenized: TokenizedArgs,
        positionals: ParsedPositionals<'a>,
    ) -> Self {
        Self {
            descriptor,
            tokenized,
            positionals,
        }
    }

    /// Name of the invoked command
    pub fn command_name(&self) -> &str {
        self.descriptor.name()
    }

    /// Descriptor of the invoked command
    pub fn descriptor(&self) -> &'a CommandDescriptor {
        self.descriptor
    }

    /// Raw tokenizer output
    pub fn tokenized(&self) -> &TokenizedArgs {
        &self.tokenized
    }

    /// Bound positional values
    pub fn positionals(&self) -> &ParsedPositionals<'a> {
        &self.positionals
    }

    /// Positional tokens left after option parsing
    pub fn args(&self) -> &[String] {
        self.positionals.leftover()
    }

    fn option(&self, name: &str) -> Option<&'a OptionDescriptor> {
        self.descriptor.options().find(name)
    }

    /// Whether the option was given
    pub fn has_option(&self, name: &str) -> bool {
        self.option(name)
            .map(|o| self.tokenized.contains(&o.key()))
            .unwrap_or(false)
    }

    /// First value of the option
    pub fn option_value(&self, name: &str) -> Option<&str> {
        let option = self.option(name)?;
        self.tokenized.first(&option.key())
    }

    /// First value of the option, or `default` when absent
    pub fn option_value_or<'s>(&'s self, name: &str, default: &'s str) -> &'s str {
        self.option_value(name).unwrap_or(default)
    }

    /// Every value of the option
    pub fn option_values(&self, name: &str) -> &[String] {
        match self.option(name) {
            Some(option) => self.tokenized.values(&option.key()),
            None => &[],
        }
    }

    /// Option value converted through its declared type.
    ///
    /// Flags convert their presence; malformed values are logged and reported
    /// as absent.
    pub fn option_object<T: FromValue>(&self, name: &str) -> Option<T> {
        let option = self.option(name)?;
        if !option.expects_value() {
            return self.convert(name, Ok(Value::Bool(self.has_option(name))));
        }
        let raw = self.option_value(name)?;
        self.convert(name, coerce(raw, option.value_type()))
    }

    /// Every option value converted through its declared type
    pub fn option_objects<T: FromValue>(&self, name: &str) -> Vec<T> {
        let Some(option) = self.option(name) else {
            return Vec::new();
        };
        self.option_values(name)
            .iter()
            .filter_map(|raw| self.convert(name, coerce(raw, option.value_type())))
            .collect()
    }

    /// Whether the named argument received a value
    pub fn has_arg(&self, name: &str) -> bool {
        self.positionals.has_arg(name)
    }

    /// Value of the named argument
    pub fn arg_value(&self, name: &str) -> Option<&str> {
        self.positionals.arg_value(name)
    }

    /// Values of the named argument
    pub fn arg_values(&self, name: &str) -> Vec<&str> {
        self.positionals.arg_values(name)
    }

    /// Value of the named argument converted through its declared type
    pub fn arg_object<T: FromValue>(&self, name: &str) -> Option<T> {
        let argument = self.descriptor.arguments().by_name(name)?;
        self.positionals.value_as(argument)
    }

    /// Values of the named argument converted through its declared type
    pub fn arg_objects<T: FromValue>(&self, name: &str) -> Vec<T> {
        self.descriptor
            .arguments()
            .by_name(name)
            .map(|argument| self.positionals.values_as(argument))
            .unwrap_or_default()
    }

    fn convert<T: FromValue>(
        &self,
        name: &str,
        value: Result<Value, CoercionError>,
    ) -> Option<T> {
        match value.and_then(T::from_value) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(command = self.command_name(), option = name, error = %e, "Exception converting an option to desired type");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{bind, Argument};
    use crate::options::{ClapTokenizer, OptionBuilder, OptionTokenizer};
    use crate::value::{Number, ValueType};
    use std::path::PathBuf;

    fn descriptor() -> CommandDescriptor {
        CommandDescriptor::new("test1", "Test command")
            .with_option(
                OptionBuilder::short('n')
                    .long("number")
                    .build(ValueType::Number, true, false)
                    .unwrap(),
            )
            .unwrap()
            .with_option(
                OptionBuilder::short('f')
                    .long("flag")
                    .build(ValueType::Bool, false, false)
                    .unwrap(),
            )
            .unwrap()
            .with_option(
                OptionBuilder::short('I')
                    .build(ValueType::Path, true, true)
                    .unwrap(),
            )
            .unwrap()
            .with_argument(Argument::required("arg1"))
            .unwrap()
            .with_argument(Argument::new("arg2", ValueType::Path, true, false))
            .unwrap()
    }

    fn with_context<F: FnOnce(&CommandContext<'_>)>(input: &str, check: F) {
        let descriptor = descriptor();
        let tokens: Vec<String> = input.split_whitespace().map(String::from).collect();
        let tokenized = ClapTokenizer
            .tokenize("test1", descriptor.options(), &tokens)
            .unwrap();
        let positionals = bind(&tokenized.positionals, descriptor.arguments()).unwrap();
        let ctx = CommandContext::new(&descriptor, tokenized, positionals);
        check(&ctx);
    }

    #[test]
    fn test_option_lookup_by_either_flag() {
        with_context("-f -n 3 text out.txt", |ctx| {
            assert!(ctx.has_option("f"));
            assert!(ctx.has_option("flag"));
            assert_eq!(ctx.option_value("number"), Some("3"));
            assert_eq!(ctx.option_object::<Number>("n"), Some(Number::Int(3)));
            assert_eq!(ctx.option_object::<bool>("f"), Some(true));
            assert!(!ctx.has_option("I"));
            assert!(!ctx.has_option("unknown"));
        });
    }

    #[test]
    fn test_absent_flag_converts_to_false() {
        with_context("a b", |ctx| {
            assert_eq!(ctx.option_object::<bool>("flag"), Some(false));
            assert_eq!(ctx.option_value_or("n", "10"), "10");
        });
    }

    #[test]
    fn test_repeated_option_values() {
        with_context("-I x -I y a b", |ctx| {
            assert_eq!(ctx.option_values("I").len(), 2);
            assert_eq!(
                ctx.option_objects::<PathBuf>("I"),
                vec![PathBuf::from("x"), PathBuf::from("y")]
            );
        });
    }

    #[test]
    fn test_argument_access() {
        with_context("-f text out.txt", |ctx| {
            assert_eq!(ctx.command_name(), "test1");
            assert_eq!(ctx.args(), ["text".to_string(), "out.txt".to_string()]);
            assert!(ctx.has_arg("arg1"));
            assert_eq!(ctx.arg_value("arg1"), Some("text"));
            assert_eq!(ctx.arg_object::<PathBuf>("arg2"), Some(PathBuf::from("out.txt")));
            assert_eq!(ctx.arg_values("arg2"), vec!["out.txt"]);
            assert!(ctx.arg_objects::<i64>("arg1").is_empty());
        });
    }

    #[test]
    fn test_malformed_option_value_is_absent() {
        with_context("-n abc a b", |ctx| {
            assert_eq!(ctx.option_value("n"), Some("abc"));
            assert_eq!(ctx.option_object::<Number>("n"), None);
        });
    }
}
