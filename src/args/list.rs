//! Ordered argument list with the trailing-argument seal

use super::argument::Argument;
use crate::error::ConstructionError;
use std::collections::HashMap;

/// Ordered, append-only collection of positional descriptors.
///
/// Once an optional or vararg argument is appended the list is sealed and
/// every later append fails with [`ConstructionError::IllegalOrdering`].
#[derive(Debug, Clone, Default)]
pub struct ArgumentList {
    arguments: Vec<Argument>,
    by_name: HashMap<String, usize>,
    sealed: bool,
}

impl ArgumentList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor, enforcing the ordering rule
    pub fn append(&mut self, argument: Argument) -> Result<(), ConstructionError> {
        if self.sealed {
            return Err(ConstructionError::IllegalOrdering {
                name: argument.name().to_string(),
            });
        }
        self.sealed = argument.is_trailing();

        let index = self.arguments.len();
        if !argument.name().is_empty() {
            self.by_name.insert(argument.name().to_string(), index);
        }
        self.arguments.push(argument);
        Ok(())
    }

    /// Whether no further arguments may be appended
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Descriptor by name
    pub fn by_name(&self, name: &str) -> Option<&Argument> {
        self.by_name.get(name).map(|&i| &self.arguments[i])
    }

    /// Position of a descriptor owned by this list
    pub fn index_of(&self, argument: &Argument) -> Option<usize> {
        if let Some(&i) = self.by_name.get(argument.name()) {
            if std::ptr::eq(&self.arguments[i], argument) {
                return Some(i);
            }
        }
        // shadowed duplicate names fall back to identity
        self.arguments.iter().position(|a| std::ptr::eq(a, argument))
    }

    /// Descriptor at a position
    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.arguments.get(index)
    }

    /// Whether a descriptor with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Descriptors in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.arguments.iter()
    }

    /// Number of descriptors
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Positional part of the usage line, each fragment followed by a space
    pub fn usage_string(&self) -> String {
        let mut usage = String::new();
        for (i, argument) in self.arguments.iter().enumerate() {
            usage.push_str(&argument.usage(i + 1));
            usage.push(' ');
        }
        usage
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.arguments.iter()
    }
}
