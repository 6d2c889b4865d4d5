//! Command descriptor

use crate::args::{Argument, ArgumentList};
use crate::error::ConstructionError;
use crate::options::{OptionDescriptor, OptionTable};

/// Name, description and declared arguments and options of one command
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    name: String,
    description: String,
    arguments: ArgumentList,
    options: OptionTable,
}

impl CommandDescriptor {
    /// Create a descriptor without arguments or options
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            arguments: ArgumentList::new(),
            options: OptionTable::new(),
        }
    }

    /// Append a positional argument
    pub fn with_argument(mut self, argument: Argument) -> Result<Self, ConstructionError> {
        self.arguments.append(argument)?;
        Ok(self)
    }

    /// Add an option
    pub fn with_option(mut self, option: OptionDescriptor) -> Result<Self, ConstructionError> {
        self.options.add(option)?;
        Ok(self)
    }

    /// Command name, as typed on the command line
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Positional arguments
    pub fn arguments(&self) -> &ArgumentList {
        &self.arguments
    }

    /// Options
    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    pub(crate) fn arguments_mut(&mut self) -> &mut ArgumentList {
        &mut self.arguments
    }

    pub(crate) fn options_mut(&mut self) -> &mut OptionTable {
        &mut self.options
    }

    /// Usage line, e.g. `app test1 [options] <arg1> [<arg2>...] `
    pub fn usage(&self, app: &str) -> String {
        format!("{} {} [options] {}", app, self.name, self.arguments.usage_string())
    }
}
