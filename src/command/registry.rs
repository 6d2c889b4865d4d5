//! Command registry and dispatcher
//!
//! [`CommandSet`] maps lowercased names to registered commands. Invoking it
//! with argv selects a command by its first token, tokenizes options, binds
//! positionals, injects typed fields and runs the handler. The outcome is an
//! [`Invocation`]; only [`CommandSet::run`] turns it into a process exit code.

use super::context::CommandContext;
use super::descriptor::CommandDescriptor;
use super::diagnostics::{Diagnostic, Severity};
use super::help;
use super::spec::Command;
use crate::args::bind;
use crate::binding::{inject_all, Bindings};
use crate::error::{CommandError, CommandResult, ConstructionError, ParseError};
use crate::options::{ClapTokenizer, OptionTokenizer};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Closure handler for commands declared at runtime. Cloning shares it.
pub type Handler = Arc<dyn Fn(&CommandContext<'_>) -> CommandResult + Send + Sync>;

/// Wrap a closure as a [`Handler`]
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&CommandContext<'_>) -> CommandResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A registered command, typed or closure-backed
trait Runnable: Send + Sync {
    fn descriptor(&self) -> &CommandDescriptor;
    fn run(&self, ctx: &CommandContext<'_>) -> CommandResult;
}

struct TypedCommand<C> {
    descriptor: CommandDescriptor,
    bindings: Bindings<C>,
}

impl<C: Command> Runnable for TypedCommand<C> {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn run(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let mut command = C::default();
        inject_all(&self.bindings, ctx, &mut command);
        command.exec(ctx)
    }
}

struct HandlerCommand {
    descriptor: CommandDescriptor,
    handler: Handler,
}

impl Runnable for HandlerCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn run(&self, ctx: &CommandContext<'_>) -> CommandResult {
        (self.handler)(ctx)
    }
}

/// Outcome of one invocation
#[derive(Debug)]
pub enum Invocation {
    /// General or command help was printed
    Help,
    /// The first token named no registered command
    CommandNotFound(String),
    /// The handler ran and succeeded
    Completed(String),
    /// Options or positionals did not parse; the handler never ran
    ParseFailed {
        /// Command name
        command: String,
        /// What went wrong
        error: ParseError,
    },
    /// The handler returned [`CommandError::Failed`]
    HandlerFailed {
        /// Command name
        command: String,
        /// Failure message
        message: String,
    },
    /// The handler returned [`CommandError::Internal`] or panicked
    Crashed {
        /// Command name
        command: String,
        /// Rendered error chain, or the panic message
        message: String,
    },
}

impl Invocation {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            Invocation::Help | Invocation::CommandNotFound(_) | Invocation::Completed(_) => 0,
            Invocation::ParseFailed { .. }
            | Invocation::HandlerFailed { .. }
            | Invocation::Crashed { .. } => 1,
        }
    }

    /// Whether a handler ran to completion
    pub fn is_success(&self) -> bool {
        matches!(self, Invocation::Completed(_))
    }
}

/// Registry of subcommands for one application
pub struct CommandSet {
    app_name: String,
    commands: BTreeMap<String, Box<dyn Runnable>>,
    diagnostics: Vec<Diagnostic>,
    tokenizer: Box<dyn OptionTokenizer>,
}

impl fmt::Debug for CommandSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSet")
            .field("app_name", &self.app_name)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

impl CommandSet {
    /// Create an empty registry using the clap tokenizer
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            commands: BTreeMap::new(),
            diagnostics: Vec::new(),
            tokenizer: Box::new(ClapTokenizer),
        }
    }

    /// Replace the option tokenizer
    pub fn with_tokenizer<T: OptionTokenizer + 'static>(mut self, tokenizer: T) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Application name used in help
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Register a typed command.
    ///
    /// Returns the diagnostics of this registration. On an error diagnostic
    /// the command is skipped; the registry stays usable.
    pub fn register<C: Command>(&mut self) -> Vec<Diagnostic> {
        let spec = C::spec();
        let name = spec.name().to_string();
        let start = self.diagnostics.len();

        match spec.resolve() {
            Ok(resolved) => {
                for warning in resolved.warnings {
                    self.report(Diagnostic::warning(&name, warning));
                }
                self.insert(Box::new(TypedCommand::<C> {
                    descriptor: resolved.descriptor,
                    bindings: resolved.bindings,
                }));
            }
            Err(e) => self.report(Diagnostic::error(&name, e.to_string())),
        }

        self.diagnostics[start..].to_vec()
    }

    /// Register a command declared at runtime with a closure handler
    pub fn register_handler<H>(&mut self, descriptor: CommandDescriptor, handler: H) -> Vec<Diagnostic>
    where
        H: Fn(&CommandContext<'_>) -> CommandResult + Send + Sync + 'static,
    {
        let name = descriptor.name().to_string();
        let start = self.diagnostics.len();

        if name.trim().is_empty() {
            self.report(Diagnostic::error(&name, ConstructionError::EmptyCommandName.to_string()));
            return self.diagnostics[start..].to_vec();
        }

        for argument in descriptor.arguments() {
            if !argument.value_type().is_supported() {
                self.report(Diagnostic::warning(
                    &name,
                    format!("argument '{}' has unsupported type {}", argument.name(), argument.value_type()),
                ));
            }
        }
        for option in descriptor.options() {
            if !option.value_type().is_supported() {
                self.report(Diagnostic::warning(
                    &name,
                    format!("option {} has unsupported type {}", option.label(), option.value_type()),
                ));
            }
        }

        self.insert(Box::new(HandlerCommand {
            descriptor,
            handler: Arc::new(handler),
        }));
        self.diagnostics[start..].to_vec()
    }

    fn insert(&mut self, command: Box<dyn Runnable>) {
        let name = command.descriptor().name().trim().to_lowercase();
        if self.commands.contains_key(&name) {
            self.report(Diagnostic::warning(&name, "replaces an earlier command with the same name"));
        }
        info!(command = %name, "Registered command");
        self.commands.insert(name, command);
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => warn!(command = %diagnostic.command, "{}", diagnostic.message),
            Severity::Error => error!(command = %diagnostic.command, "Command skipped: {}", diagnostic.message),
        }
        self.diagnostics.push(diagnostic);
    }

    /// Every diagnostic reported so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether any registration was rejected
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Descriptor of a registered command, by case-insensitive name
    pub fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands
            .get(&name.trim().to_lowercase())
            .map(|c| c.descriptor())
    }

    /// Registered commands, sorted by name
    pub fn commands(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.values().map(|c| c.descriptor())
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command is registered
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Tokenize options and bind positionals for `descriptor`
    pub fn parse<'a>(
        &self,
        descriptor: &'a CommandDescriptor,
        tokens: &[String],
    ) -> Result<CommandContext<'a>, ParseError> {
        let tokenized = self
            .tokenizer
            .tokenize(descriptor.name(), descriptor.options(), tokens)?;
        let positionals = bind(&tokenized.positionals, descriptor.arguments())?;
        Ok(CommandContext::new(descriptor, tokenized, positionals))
    }

    /// Dispatch `argv` (without the program name), writing to stdout/stderr
    pub fn invoke<I, S>(&self, argv: I) -> io::Result<Invocation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let stdout = io::stdout();
        let stderr = io::stderr();
        self.invoke_with(&argv, &mut stdout.lock(), &mut stderr.lock())
    }

    /// Dispatch `argv` and exit-code the outcome
    pub fn run<I, S>(&self, argv: I) -> ExitCode
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.invoke(argv) {
            Ok(invocation) => ExitCode::from(invocation.exit_code()),
            Err(e) => {
                error!(error = %e, "Failed to write output");
                ExitCode::FAILURE
            }
        }
    }

    /// Dispatch `argv`, writing help and errors to the given writers
    pub fn invoke_with<O, E>(&self, argv: &[String], out: &mut O, err: &mut E) -> io::Result<Invocation>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        let Some(first) = argv.first() else {
            self.write_general_help(out)?;
            return Ok(Invocation::Help);
        };

        let name = first.trim().to_lowercase();
        if name == "help" {
            return match argv.get(1) {
                None => {
                    self.write_general_help(out)?;
                    Ok(Invocation::Help)
                }
                Some(target) => {
                    let target = target.trim().to_lowercase();
                    match self.commands.get(&target) {
                        Some(command) => {
                            help::write_command_help(out, &self.app_name, command.descriptor(), self.tokenizer.as_ref())?;
                            Ok(Invocation::Help)
                        }
                        None => self.not_found(target, out),
                    }
                }
            };
        }

        match self.commands.get(&name) {
            Some(command) => self.run_command(command.as_ref(), &argv[1..], out, err),
            None => self.not_found(name, out),
        }
    }

    fn not_found<O: Write + ?Sized>(&self, name: String, out: &mut O) -> io::Result<Invocation> {
        debug!(command = %name, "Command not found");
        writeln!(out, "Command not found: {}", name)?;
        self.write_general_help(out)?;
        Ok(Invocation::CommandNotFound(name))
    }

    fn run_command<O, E>(
        &self,
        command: &dyn Runnable,
        tokens: &[String],
        out: &mut O,
        err: &mut E,
    ) -> io::Result<Invocation>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        let descriptor = command.descriptor();
        let name = descriptor.name().to_string();
        debug!(command = %name, tokens = tokens.len(), "Dispatching command");

        let ctx = match self.parse(descriptor, tokens) {
            Ok(ctx) => ctx,
            Err(error) => {
                debug!(command = %name, error = %error, "Parse failed");
                self.write_failure(descriptor, &error.to_string(), out, err)?;
                return Ok(Invocation::ParseFailed { command: name, error });
            }
        };

        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| command.run(&ctx))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(command = %name, message = %message, "Command panicked");
                writeln!(err, "{}: panicked: {}", name, message)?;
                return Ok(Invocation::Crashed {
                    command: name,
                    message,
                });
            }
        };

        match outcome {
            Ok(()) => {
                debug!(command = %name, "Command completed");
                Ok(Invocation::Completed(name))
            }
            Err(CommandError::Failed(message)) => {
                debug!(command = %name, message = %message, "Command failed");
                self.write_failure(descriptor, &message, out, err)?;
                Ok(Invocation::HandlerFailed { command: name, message })
            }
            Err(CommandError::Internal(e)) => {
                error!(command = %name, error = %e, "Command crashed");
                writeln!(err, "{}: {:?}", name, e)?;
                Ok(Invocation::Crashed {
                    command: name,
                    message: format!("{:#}", e),
                })
            }
        }
    }

    fn write_general_help<O: Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        help::write_general_help(out, &self.app_name, self.commands())
    }

    fn write_failure<O, E>(
        &self,
        descriptor: &CommandDescriptor,
        message: &str,
        out: &mut O,
        err: &mut E,
    ) -> io::Result<()>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        writeln!(err, "{}: error: {}", descriptor.name(), message)?;
        writeln!(out)?;
        let usage = self
            .tokenizer
            .help(descriptor.name(), &descriptor.usage(&self.app_name), descriptor.options());
        write!(out, "{}", usage)?;
        if !usage.ends_with('\n') {
            writeln!(out)?;
        }
        Ok(())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
