//! Typed command declarations

use super::context::CommandContext;
use super::descriptor::CommandDescriptor;
use crate::args::ArgumentBuilder;
use crate::binding::{Bindings, Slot, SlotValue};
use crate::error::{CommandResult, ConstructionError};
use crate::options::OptionBuilder;

/// A subcommand backed by a struct whose fields receive parsed values.
///
/// A fresh instance is created with `Default` for every invocation, the
/// declared fields are filled in, then [`Command::exec`] runs.
///
/// ```
/// use cmdkit::prelude::*;
///
/// #[derive(Default)]
/// struct Greet {
///     loud: bool,
///     names: Vec<String>,
/// }
///
/// impl Command for Greet {
///     fn spec() -> CommandSpec<Self> {
///         CommandSpec::new("greet", "Say hello")
///             .opt(OptionBuilder::short('l').long("loud"), |c: &mut Self| &mut c.loud)
///             .arg(ArgumentBuilder::new("names").optional().vararg(), |c: &mut Self| &mut c.names)
///     }
///
///     fn exec(&mut self, _ctx: &CommandContext<'_>) -> CommandResult {
///         for name in &self.names {
///             println!("hello {}", name);
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Command: Default + 'static {
    /// Name, description and field bindings of the command
    fn spec() -> CommandSpec<Self>;

    /// Run with the injected fields.
    ///
    /// A panic is caught by the dispatcher and reported like
    /// [`CommandError::Internal`](crate::error::CommandError::Internal).
    fn exec(&mut self, ctx: &CommandContext<'_>) -> CommandResult;
}

/// Declarations of a typed command, in order
pub struct CommandSpec<C> {
    name: String,
    description: String,
    arguments: Vec<(ArgumentBuilder, Slot<C>)>,
    options: Vec<(OptionBuilder, Slot<C>)>,
}

/// A validated command: descriptor, slots and non-fatal findings
pub(crate) struct Resolved<C> {
    pub descriptor: CommandDescriptor,
    pub bindings: Bindings<C>,
    pub warnings: Vec<String>,
}

impl<C: 'static> CommandSpec<C> {
    /// Start a command declaration
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            arguments: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Declare the next positional argument and the field it fills
    pub fn arg<F, A>(mut self, argument: ArgumentBuilder, accessor: A) -> Self
    where
        F: SlotValue,
        A: Fn(&mut C) -> &mut F + Send + Sync + 'static,
    {
        self.arguments.push((argument, Slot::new(accessor)));
        self
    }

    /// Declare an option and the field it fills.
    ///
    /// A plain `bool` field makes the option a presence flag; a `Vec` field
    /// makes it repeatable.
    pub fn opt<F, A>(mut self, option: OptionBuilder, accessor: A) -> Self
    where
        F: SlotValue,
        A: Fn(&mut C) -> &mut F + Send + Sync + 'static,
    {
        self.options.push((option, Slot::new(accessor)));
        self
    }

    /// Declared command name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate the declarations and build the descriptor
    pub(crate) fn resolve(self) -> Result<Resolved<C>, ConstructionError> {
        if self.name.trim().is_empty() {
            return Err(ConstructionError::EmptyCommandName);
        }

        let mut descriptor = CommandDescriptor::new(self.name, self.description);
        let mut bindings = Bindings::new();
        let mut warnings = Vec::new();

        for (builder, slot) in self.arguments {
            let shape = slot.shape();
            let name = builder.name().to_string();

            if builder.is_vararg() != shape.is_sequence() {
                let expected = if builder.is_vararg() {
                    "sequence"
                } else {
                    "single or optional"
                };
                return Err(ConstructionError::SlotShape {
                    name,
                    expected: expected.to_string(),
                    found: shape.to_string(),
                });
            }

            let argument = builder.build(shape.value_type);
            if !shape.accepts(argument.value_type()) {
                return Err(ConstructionError::SlotShape {
                    name,
                    expected: argument.value_type().to_string(),
                    found: shape.to_string(),
                });
            }
            if !argument.value_type().is_supported() {
                warnings.push(format!(
                    "argument '{}' has unsupported type {}; its raw text is passed to the field",
                    name,
                    argument.value_type()
                ));
            }
            if descriptor.arguments().contains(&name) {
                warnings.push(format!("argument '{}' is declared more than once", name));
            }

            descriptor.arguments_mut().append(argument)?;
            bindings.push_argument(slot);
        }

        for (builder, slot) in self.options {
            let shape = slot.shape();
            let label = builder.label();
            let flag = shape.is_flag();

            let option = builder.build(shape.value_type, !flag, shape.is_sequence())?;
            if !shape.accepts(option.value_type()) {
                return Err(ConstructionError::SlotShape {
                    name: label,
                    expected: option.value_type().to_string(),
                    found: shape.to_string(),
                });
            }
            if !option.value_type().is_supported() {
                warnings.push(format!(
                    "option {} has unsupported type {}; its raw text is passed to the field",
                    option.label(),
                    option.value_type()
                ));
            }

            let key = option.key();
            descriptor.options_mut().add(option)?;
            bindings.push_option(key, slot);
        }

        Ok(Resolved {
            descriptor,
            bindings,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Custom;
    use crate::value::ValueType;
    use std::net::Ipv4Addr;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Sample {
        verbose: bool,
        count: Option<i64>,
        includes: Vec<PathBuf>,
        first: String,
        rest: Vec<String>,
        addr: Option<Custom<Ipv4Addr>>,
    }

    #[test]
    fn test_resolve_builds_descriptor() {
        let resolved = CommandSpec::<Sample>::new("sample", "A sample")
            .opt(OptionBuilder::short('v').long("verbose"), |s| &mut s.verbose)
            .opt(OptionBuilder::short('c'), |s| &mut s.count)
            .opt(OptionBuilder::short('I'), |s| &mut s.includes)
            .arg(ArgumentBuilder::new("first"), |s| &mut s.first)
            .arg(ArgumentBuilder::new("rest").optional().vararg(), |s| &mut s.rest)
            .resolve()
            .unwrap();

        let d = &resolved.descriptor;
        assert_eq!(d.name(), "sample");
        assert_eq!(d.arguments().len(), 2);
        assert!(d.arguments().is_sealed());

        let verbose = d.options().find("verbose").unwrap();
        assert!(!verbose.expects_value());
        let count = d.options().find("c").unwrap();
        assert!(count.expects_value());
        assert_eq!(count.value_type(), ValueType::Integer);
        assert!(d.options().find("I").unwrap().is_multiple());

        assert_eq!(resolved.bindings.len(), 5);
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_vararg_needs_sequence_field() {
        let err = CommandSpec::<Sample>::new("sample", "")
            .arg(ArgumentBuilder::new("rest").vararg(), |s| &mut s.first)
            .resolve()
            .err()
            .unwrap();
        assert!(matches!(err, ConstructionError::SlotShape { ref name, .. } if name == "rest"));
    }

    #[test]
    fn test_sequence_field_needs_vararg() {
        let err = CommandSpec::<Sample>::new("sample", "")
            .arg(ArgumentBuilder::new("rest"), |s| &mut s.rest)
            .resolve()
            .err()
            .unwrap();
        assert!(matches!(err, ConstructionError::SlotShape { .. }));
    }

    #[test]
    fn test_type_override_must_fit_field() {
        let err = CommandSpec::<Sample>::new("sample", "")
            .opt(OptionBuilder::short('c').value_type(ValueType::Url), |s| &mut s.count)
            .resolve()
            .err()
            .unwrap();
        assert!(matches!(err, ConstructionError::SlotShape { .. }));

        let resolved = CommandSpec::<Sample>::new("sample", "")
            .arg(ArgumentBuilder::new("first").value_type(ValueType::Path), |s| &mut s.first)
            .resolve()
            .unwrap();
        assert_eq!(
            resolved.descriptor.arguments().by_name("first").unwrap().value_type(),
            ValueType::Path
        );
    }

    #[test]
    fn test_illegal_ordering() {
        let err = CommandSpec::<Sample>::new("sample", "")
            .arg(ArgumentBuilder::new("rest").optional().vararg(), |s| &mut s.rest)
            .arg(ArgumentBuilder::new("first"), |s| &mut s.first)
            .resolve()
            .err()
            .unwrap();
        assert_eq!(
            err,
            ConstructionError::IllegalOrdering {
                name: "first".into()
            }
        );
    }

    #[test]
    fn test_unsupported_type_warns() {
        let resolved = CommandSpec::<Sample>::new("sample", "")
            .opt(OptionBuilder::long_only("addr"), |s| &mut s.addr)
            .resolve()
            .unwrap();
        assert_eq!(resolved.warnings.len(), 1);
        assert!(resolved.warnings[0].contains("--addr"));
    }

    #[test]
    fn test_empty_name() {
        let err = CommandSpec::<Sample>::new(" ", "").resolve().err().unwrap();
        assert_eq!(err, ConstructionError::EmptyCommandName);
    }

    #[test]
    fn test_duplicate_option() {
        let err = CommandSpec::<Sample>::new("sample", "")
            .opt(OptionBuilder::short('v'), |s| &mut s.verbose)
            .opt(OptionBuilder::short('v'), |s| &mut s.count)
            .resolve()
            .err()
            .unwrap();
        assert_eq!(err, ConstructionError::DuplicateOption("v".into()));
    }

    #[test]
    fn test_dashed_long_flag() {
        let err = CommandSpec::<Sample>::new("sample", "")
            .opt(OptionBuilder::short('c').long("--count"), |s| &mut s.count)
            .resolve()
            .err()
            .unwrap();
        assert!(matches!(err, ConstructionError::InvalidFlag { ref flag, .. } if flag == "--count"));
    }
}
