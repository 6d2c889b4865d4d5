//! cmdkit - declarative subcommands for command-line applications
//!
//! cmdkit lets an application declare `git`-style subcommands, each with typed
//! positional arguments and flagged options, then dispatches argv to them:
//!
//! - **`args`** - positional argument descriptors, the ordered argument list
//!   and the positional binder
//! - **`options`** - option descriptors and the option tokenizer (clap)
//! - **`value`** - value types and coercion of raw tokens
//! - **`binding`** - typed slots that write parsed values into command fields
//! - **`command`** - the `Command` trait, handler context, registry and help
//! - **`config`** - commands declared in TOML/JSON manifests
//! - **`observability`** - log subscriber setup
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! cmdkit = { version = "0.3", features = ["config"] }
//! # Or enable everything:
//! cmdkit = { version = "0.3", features = ["all"] }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cmdkit::prelude::*;
//! use std::process::ExitCode;
//!
//! #[derive(Default)]
//! struct Yell {
//!     repeat: Option<i64>,
//!     text: Option<String>,
//! }
//!
//! impl Command for Yell {
//!     fn spec() -> CommandSpec<Self> {
//!         CommandSpec::new("yell", "Print text in upper case")
//!             .opt(OptionBuilder::short('n').long("repeat"), |c: &mut Self| &mut c.repeat)
//!             .arg(ArgumentBuilder::new("text").optional(), |c: &mut Self| &mut c.text)
//!     }
//!
//!     fn exec(&mut self, _ctx: &CommandContext<'_>) -> CommandResult {
//!         let text = self.text.as_deref().unwrap_or("Hey there!").to_uppercase();
//!         for _ in 0..self.repeat.unwrap_or(1) {
//!             println!("{}", text);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> ExitCode {
//!     let mut commands = CommandSet::new("demo");
//!     commands.register::<Yell>();
//!     commands.run(std::env::args().skip(1))
//! }
//! ```

#![warn(missing_docs)]

pub mod args;
pub mod binding;
pub mod command;
pub mod error;
pub mod options;
pub mod value;

/// Command manifests (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

/// Log subscriber setup (enabled with the `observability` feature)
#[cfg(feature = "observability")]
pub mod observability;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::args::{Argument, ArgumentBuilder};
    pub use crate::binding::Custom;
    pub use crate::command::{
        handler, Command, CommandContext, CommandDescriptor, CommandSet, CommandSpec, Invocation,
    };
    pub use crate::error::{CommandError, CommandResult};
    pub use crate::options::OptionBuilder;
    pub use crate::value::{Number, TypeName, ValueType};

    #[cfg(feature = "config")]
    pub use crate::config::CommandManifest;

    #[cfg(feature = "observability")]
    pub use crate::observability::init_logging;
}
