//! Commands, registration and dispatch
//!
//! - [`Command`] / [`CommandSpec`]: typed commands whose fields receive values
//! - [`CommandDescriptor`]: name, description, arguments and options
//! - [`CommandContext`]: per-invocation accessors for handlers
//! - [`CommandSet`]: the registry and dispatcher
//! - [`help`]: general and per-command help text

pub mod context;
pub mod descriptor;
pub mod diagnostics;
pub mod help;
pub mod registry;
pub mod spec;

pub use context::CommandContext;
pub use descriptor::CommandDescriptor;
pub use diagnostics::{Diagnostic, Severity};
pub use registry::{handler, CommandSet, Handler, Invocation};
pub use spec::{Command, CommandSpec};
