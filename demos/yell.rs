//! Yell demo
//!
//! ```text
//! cargo run --example yell --features observability -- yell -n 3 "hello"
//! cargo run --example yell -- help yell
//! ```

use cmdkit::prelude::*;
use std::process::ExitCode;

struct Yell {
    text: String,
    yells: Number,
}

impl Default for Yell {
    fn default() -> Self {
        Self {
            text: "Hey there!".to_string(),
            yells: Number::Int(1),
        }
    }
}

impl Command for Yell {
    fn spec() -> CommandSpec<Self> {
        CommandSpec::new("yell", "Yell stuff")
            .arg(ArgumentBuilder::new("text").optional(), |c: &mut Self| &mut c.text)
            .opt(
                OptionBuilder::short('n')
                    .long("repeat")
                    .help("Number of times to yell the text"),
                |c: &mut Self| &mut c.yells,
            )
    }

    fn exec(&mut self, _ctx: &CommandContext<'_>) -> CommandResult {
        if self.yells.as_i64() < 0 {
            return Err(CommandError::failed("repeat count must not be negative"));
        }
        for _ in 0..self.yells.as_i64() {
            println!("{}", self.text.to_uppercase());
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    #[cfg(feature = "observability")]
    if let Err(e) = cmdkit::observability::init_logging("warn") {
        eprintln!("{:#}", e);
    }

    let mut commands = CommandSet::new("yell-demo");
    for diagnostic in commands.register::<Yell>() {
        eprintln!("{}", diagnostic);
    }
    commands.run(std::env::args().skip(1))
}
