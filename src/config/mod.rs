//! Declarative command manifests.
//!
//! Commands can be described in TOML or JSON and bound to closure handlers
//! at startup, without a Rust type per command.
//!
//! # Example
//!
//! ```no_run
//! use cmdkit::command::{handler, CommandSet, Handler};
//! use cmdkit::config::CommandManifest;
//! use std::collections::HashMap;
//! use std::process::ExitCode;
//!
//! fn main() -> ExitCode {
//!     let manifest = CommandManifest::from_file("commands.toml").unwrap();
//!
//!     let mut handlers: HashMap<String, Handler> = HashMap::new();
//!     handlers.insert(
//!         "greet".to_string(),
//!         handler(|ctx| {
//!             println!("hello {}", ctx.arg_value("name").unwrap_or("world"));
//!             Ok(())
//!         }),
//!     );
//!
//!     CommandSet::from_manifest(&manifest, handlers).run(std::env::args().skip(1))
//! }
//! ```

pub mod manifest;

pub use self::manifest::{
    AppConfig, ArgConfig, CommandConfig, CommandManifest, ConfigError, ConfigResult, OptionConfig,
};
