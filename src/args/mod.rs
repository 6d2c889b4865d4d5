//! Positional arguments
//!
//! - [`Argument`] / [`ArgumentBuilder`] describe one positional slot
//! - [`ArgumentList`] holds them in order and enforces that at most one
//!   optional or vararg argument exists, and that it comes last
//! - [`bind`] matches positional tokens against a list, producing
//!   [`ParsedPositionals`]

pub mod argument;
pub mod binder;
pub mod list;

pub use argument::{Argument, ArgumentBuilder};
pub use binder::{bind, ParsedPositionals};
pub use list::ArgumentList;
