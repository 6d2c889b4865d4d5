//! Flagged options
//!
//! Options are order-independent and unique by flag. Their metadata lives in
//! an [`OptionTable`]; the actual flag syntax is handled by an
//! [`OptionTokenizer`], by default [`ClapTokenizer`].

pub mod descriptor;
pub mod table;
pub mod tokenizer;

pub use descriptor::{OptionBuilder, OptionDescriptor};
pub use table::OptionTable;
pub use tokenizer::{ClapTokenizer, OptionTokenizer, TokenizedArgs};
