#![forbid(unsafe_code)]

//! Command-line argument routing
//!
//! Turns the raw argument list into an [`Invocation`]. The three target flags
//! are mutually exclusive and exactly one of them must carry a value; the
//! clear flag is an independent boolean.

use crate::types::{Invocation, Mode};
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use thiserror::Error;

/// Printed when pdbe is run without any argument
pub const USAGE_HINT: &str =
    "Specify arguments for pdbe tool. Call --help (-H) command to know more about it.";

const LONG_ABOUT: &str = "\
pdbe puts an `import pdb; pdb.set_trace()` statement below every function \
definition in a file, in all files of a directory, or in all nested files of a \
directory, as long as the file has a `.py` extension.

The same targets can be cleared again with --clear.";

const EXAMPLES: &str = "\
Examples:
    pdbe --file path/to/file.py            put breakpoints into one file
    pdbe --file path/to/file.py --clear    remove them again
    pdbe --dir path/to/dir                 every .py file directly in the directory
    pdbe --ew path/to/dir                  every nested file in the directory tree
    pdbe --ew path/to/dir --clear          clear the whole tree";

/// Errors raised while routing command-line arguments
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// None of --file, --dir or --ew carried a value
    #[error("no target given, pass one of --file, --dir or --ew (see --help)")]
    NoTarget,

    /// More than one target flag carried a value
    #[error("only one target may be given, got {flags}")]
    ConflictingTargets { flags: String },

    /// The argument parser rejected the command line
    #[error("{0}")]
    Invalid(String),
}

/// pdbe command-line flags
#[derive(Parser, Debug)]
#[command(
    name = "pdbe",
    about = "Insert or clear pdb breakpoints below Python function definitions",
    long_about = LONG_ABOUT,
    after_long_help = EXAMPLES,
    disable_help_flag = true
)]
pub struct Cli {
    /// Print help
    #[arg(short = 'H', long = "help", action = ArgAction::Help)]
    help: Option<bool>,

    /// File to put breakpoints into
    #[arg(short = 'F', long = "file", value_name = "PATH")]
    pub file: Option<String>,

    /// Directory whose own .py files get breakpoints
    #[arg(short = 'D', long = "dir", value_name = "PATH")]
    pub dir: Option<String>,

    /// Directory whose nested files, at any depth, get breakpoints
    #[arg(short = 'E', long = "ew", visible_alias = "everywhere", value_name = "PATH")]
    pub ew: Option<String>,

    /// Clear breakpoint statements instead of inserting them
    #[arg(short = 'C', long = "clear")]
    pub clear: bool,
}

impl Cli {
    /// Validate that exactly one target flag is populated and build the invocation
    pub fn into_invocation(self) -> Result<Invocation, ArgumentError> {
        let targets = [
            (Mode::File, self.file),
            (Mode::Dir, self.dir),
            (Mode::RecursiveDir, self.ew),
        ];
        let mut populated = targets
            .into_iter()
            .filter_map(|(mode, value)| value.map(|target| (mode, target)));

        let (mode, target) = populated.next().ok_or(ArgumentError::NoTarget)?;

        let extra: Vec<Mode> = populated.map(|(mode, _)| mode).collect();
        if !extra.is_empty() {
            let flags = std::iter::once(mode)
                .chain(extra)
                .map(Mode::flag)
                .collect::<Vec<_>>()
                .join(" and ");
            return Err(ArgumentError::ConflictingTargets { flags });
        }

        Ok(Invocation {
            mode,
            target,
            clear: self.clear,
        })
    }
}

/// Outcome of routing the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// No arguments at all: show the short usage hint
    UsageHint,
    /// Help was requested: the rendered help text
    Help(String),
    /// A complete invocation to execute
    Invocation(Invocation),
}

/// Route the argument list (without the program name)
pub fn route<I, T>(args: I) -> Result<Routed, ArgumentError>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();

    let Some(first) = args.first() else {
        return Ok(Routed::UsageHint);
    };

    if first == "-H" || first == "--help" {
        return Ok(Routed::Help(help_text()));
    }

    let cli = match Cli::try_parse_from(std::iter::once("pdbe".to_string()).chain(args)) {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => return Ok(Routed::Help(help_text())),
        Err(e) => return Err(ArgumentError::Invalid(parser_message(&e))),
    };

    cli.into_invocation().map(Routed::Invocation)
}

/// Full help text, as printed for `-H`/`--help`
pub fn help_text() -> String {
    Cli::command().render_long_help().to_string()
}

/// clap renders its errors with an `error: ` prefix; pdbe adds its own
fn parser_message(error: &clap::Error) -> String {
    let rendered = error.render().to_string();
    rendered
        .trim_start_matches("error: ")
        .trim_end()
        .to_string()
}
