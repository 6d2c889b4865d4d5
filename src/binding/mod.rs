//! Binding parsed values into command fields
//!
//! Each declared argument or option of a typed command is paired with a
//! [`Slot`]: an accessor closure for one field of the command struct. The
//! field's Rust type fixes the slot's shape, which is checked against the
//! declaration when the command is registered. [`inject_all`] writes the
//! values of one invocation into a fresh command instance.

pub mod inject;
pub mod slot;

pub use inject::{inject_all, Bindings};
pub use slot::{Cardinality, Custom, Slot, SlotShape, SlotValue};
