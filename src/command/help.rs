//! Help rendering

use super::descriptor::CommandDescriptor;
use crate::options::OptionTokenizer;
use std::io::{self, Write};

/// Write the list of available commands
pub fn write_general_help<'a, W, I>(out: &mut W, app: &str, commands: I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = &'a CommandDescriptor>,
{
    writeln!(out, "usage: {} <command> [<args>]", app)?;
    writeln!(out)?;
    writeln!(out, "Available commands are:")?;
    for command in commands {
        writeln!(out, "  {:<20.19} {}", command.name(), command.description())?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "See '{} help <command>' for more information on a specific command.",
        app
    )
}

/// Write the description, usage line and option table of one command
pub fn write_command_help<W>(
    out: &mut W,
    app: &str,
    command: &CommandDescriptor,
    tokenizer: &dyn OptionTokenizer,
) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(out, "{}: {}", command.name(), command.description())?;
    let help = tokenizer.help(command.name(), &command.usage(app), command.options());
    write!(out, "{}", help)?;
    if !help.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}
