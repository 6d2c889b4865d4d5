//! Option table

use super::descriptor::OptionDescriptor;
use crate::error::ConstructionError;
use std::collections::HashMap;

/// The options of one command, unique by flag
#[derive(Debug, Clone, Default)]
pub struct OptionTable {
    options: Vec<OptionDescriptor>,
    by_flag: HashMap<String, usize>,
}

impl OptionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option; short and long flags must both be unused.
    ///
    /// Short and long flags share one namespace, so `-x` on one option and
    /// `--x` on another are duplicates. An option's [key](OptionDescriptor::key)
    /// is its short flag, else its long flag, and keys must stay unique.
    pub fn add(&mut self, option: OptionDescriptor) -> Result<(), ConstructionError> {
        let flags: Vec<String> = option
            .short()
            .map(|c| c.to_string())
            .into_iter()
            .chain(option.long().map(String::from))
            .collect();

        if let Some(taken) = flags.iter().find(|f| self.by_flag.contains_key(*f)) {
            return Err(ConstructionError::DuplicateOption(taken.clone()));
        }

        let index = self.options.len();
        for flag in flags {
            self.by_flag.insert(flag, index);
        }
        self.options.push(option);
        Ok(())
    }

    /// Find an option by short or long flag
    pub fn find(&self, name: &str) -> Option<&OptionDescriptor> {
        self.by_flag.get(name).map(|&i| &self.options[i])
    }

    /// Options in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, OptionDescriptor> {
        self.options.iter()
    }

    /// Number of options
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl<'a> IntoIterator for &'a OptionTable {
    type Item = &'a OptionDescriptor;
    type IntoIter = std::slice::Iter<'a, OptionDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionBuilder;
    use crate::value::ValueType;

    fn flag(short: char, long: &str) -> OptionDescriptor {
        OptionBuilder::short(short)
            .long(long)
            .build(ValueType::Bool, false, false)
            .unwrap()
    }

    #[test]
    fn test_lookup_by_either_flag() {
        let mut table = OptionTable::new();
        table.add(flag('f', "flag")).unwrap();

        assert_eq!(table.find("f").unwrap().key(), "f");
        assert_eq!(table.find("flag").unwrap().key(), "f");
        assert!(table.find("x").is_none());
    }

    #[test]
    fn test_duplicate_flags() {
        let mut table = OptionTable::new();
        table.add(flag('f', "flag")).unwrap();

        assert_eq!(
            table.add(flag('f', "force")).unwrap_err(),
            ConstructionError::DuplicateOption("f".into())
        );
        assert_eq!(
            table.add(flag('g', "flag")).unwrap_err(),
            ConstructionError::DuplicateOption("flag".into())
        );
        assert_eq!(table.len(), 1);
        assert!(table.find("g").is_none());
    }

    #[test]
    fn test_short_and_long_share_namespace() {
        let mut table = OptionTable::new();
        table
            .add(
                OptionBuilder::short('x')
                    .build(ValueType::Bool, false, false)
                    .unwrap(),
            )
            .unwrap();

        let long_x = OptionBuilder::long_only("x")
            .build(ValueType::Bool, false, false)
            .unwrap();
        assert_eq!(
            table.add(long_x).unwrap_err(),
            ConstructionError::DuplicateOption("x".into())
        );
        assert_eq!(table.find("x").unwrap().short(), Some('x'));
    }
}
