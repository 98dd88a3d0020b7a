#![forbid(unsafe_code)]

//! Human-readable output formatter with colorization support

use crate::engine::{DispatchSummary, Notice};
use crate::types::Operation;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Human-readable output formatter
///
/// Notices are plain single lines; the dispatch summary gets a colored verb.
pub struct HumanFormatter {
    color_choice: ColorChoice,
}

impl HumanFormatter {
    /// Creates a new HumanFormatter with the specified color choice
    pub fn new(color_choice: ColorChoice) -> Self {
        HumanFormatter { color_choice }
    }

    /// Format a dispatch summary, e.g. `Inserted 3 markers in 2 of 4 files`
    pub fn format_summary(&self, summary: &DispatchSummary) -> String {
        format!(
            "{} {}",
            verb(summary.operation),
            summary_details(summary)
        )
    }

    /// Write a recoverable notice to stdout as a single line
    pub fn write_notice(&self, notice: &Notice) -> io::Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);
        writeln!(stdout, "{}", notice)
    }

    /// Write the dispatch summary to stdout with colors
    pub fn write_summary(&self, summary: &DispatchSummary) -> io::Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);

        let color = if summary.markers_changed == 0 {
            Color::Yellow
        } else {
            Color::Green
        };
        stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(stdout, "{}", verb(summary.operation))?;
        stdout.reset()?;

        writeln!(stdout, " {}", summary_details(summary))?;
        stdout.flush()
    }
}

fn verb(operation: Operation) -> &'static str {
    match operation {
        Operation::Insert => "Inserted",
        Operation::Remove => "Removed",
    }
}

fn summary_details(summary: &DispatchSummary) -> String {
    format!(
        "{} in {} of {}",
        plural(summary.markers_changed, "marker"),
        summary.files_changed,
        plural(summary.files_visited, "file")
    )
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
