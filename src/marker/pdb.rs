#![forbid(unsafe_code)]

//! Line-based `pdb` marker engine
//!
//! Definitions are found with a regular expression rather than a parser. A
//! signature may span several lines; it ends on the first line where the
//! bracket depth returns to zero, and only counts when that line ends with
//! `:`. One-line bodies such as `def f(): return 1` are left alone.

use super::{MarkerEngine, MarkerError};
use crate::config::MarkerConfig;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Statement inserted when no configuration overrides it
pub const DEFAULT_STATEMENT: &str = "import pdb; pdb.set_trace()";

/// Indentation added relative to the `def` line when the body gives no hint
pub const DEFAULT_INDENT_WIDTH: usize = 4;

static DEF_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)(?:async[ \t]+)?def[ \t]+\w+")
        .expect("definition pattern is valid")
});

/// Marker engine writing a fixed statement below each function signature
///
/// Matching is line based. One-line bodies are skipped, and string literals
/// are not tracked across lines: a `def name(...):` line inside a multi-line
/// docstring is treated as a real definition and gets a marker inside the
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdbMarker {
    statement: String,
    indent_width: usize,
}

impl Default for PdbMarker {
    fn default() -> Self {
        PdbMarker::new(DEFAULT_STATEMENT, DEFAULT_INDENT_WIDTH)
    }
}

impl PdbMarker {
    pub fn new(statement: impl AsRef<str>, indent_width: usize) -> Self {
        PdbMarker {
            statement: statement.as_ref().trim().to_string(),
            indent_width,
        }
    }

    pub fn from_config(config: &MarkerConfig) -> Self {
        PdbMarker::new(&config.statement, config.indent_width)
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Insert the statement below every signature that lacks one
    ///
    /// Returns the rewritten source and the number of inserted lines.
    pub fn insert_into(&self, source: &str) -> (String, usize) {
        let lines: Vec<&str> = source.split_inclusive('\n').collect();
        let mut output = String::with_capacity(source.len());
        let mut inserted = 0;
        let mut index = 0;

        while index < lines.len() {
            let line = lines[index];

            let Some(indent) = DEF_LINE
                .captures(line)
                .and_then(|caps| caps.name("indent"))
                .map(|m| m.as_str())
            else {
                output.push_str(line);
                index += 1;
                continue;
            };

            let Some(end) = signature_end(&lines, index) else {
                output.push_str(line);
                index += 1;
                continue;
            };

            for signature_line in &lines[index..=end] {
                output.push_str(signature_line);
            }
            index = end + 1;

            if lines.get(index).is_some_and(|next| self.is_marker(next)) {
                continue;
            }

            let closing = lines[end];
            let eol = line_ending(closing);
            if !closing.ends_with('\n') {
                output.push_str(eol);
            }

            match body_indent(&lines, index) {
                Some(body) if body.len() > indent.len() => output.push_str(body),
                _ => {
                    output.push_str(indent);
                    output.push_str(&" ".repeat(self.indent_width));
                }
            }
            output.push_str(&self.statement);
            output.push_str(eol);
            inserted += 1;
        }

        (output, inserted)
    }

    /// Drop every line that consists of the statement alone
    pub fn remove_from(&self, source: &str) -> (String, usize) {
        let mut removed = 0;
        let output: String = source
            .split_inclusive('\n')
            .filter(|line| {
                let marker = self.is_marker(line);
                if marker {
                    removed += 1;
                }
                !marker
            })
            .collect();

        (output, removed)
    }

    fn is_marker(&self, line: &str) -> bool {
        line.trim() == self.statement
    }

    fn rewrite(
        &self,
        path: &Path,
        transform: impl Fn(&str) -> (String, usize),
    ) -> Result<usize, MarkerError> {
        let source = fs::read_to_string(path).map_err(|source| MarkerError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (updated, changed) = transform(&source);
        if changed > 0 {
            fs::write(path, updated).map_err(|source| MarkerError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        debug!(path = %path.display(), changed, "rewrote markers");
        Ok(changed)
    }
}

impl MarkerEngine for PdbMarker {
    fn insert_marker(&self, path: &Path) -> Result<usize, MarkerError> {
        self.rewrite(path, |source| self.insert_into(source))
    }

    fn remove_marker(&self, path: &Path) -> Result<usize, MarkerError> {
        self.rewrite(path, |source| self.remove_from(source))
    }
}

/// Index of the line closing the signature that starts at `start`
fn signature_end(lines: &[&str], start: usize) -> Option<usize> {
    let mut depth: i32 = 0;

    for (offset, line) in lines[start..].iter().enumerate() {
        let code = code_portion(line, &mut depth);
        if depth <= 0 {
            return code
                .trim_end()
                .ends_with(':')
                .then_some(start + offset);
        }
    }

    None
}

/// The part of `line` before any comment, tracking bracket depth on the way
fn code_portion<'a>(line: &'a str, depth: &mut i32) -> &'a str {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (index, ch) in line.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' => quote = Some(ch),
            '#' => return &line[..index],
            '(' | '[' | '{' => *depth += 1,
            ')' | ']' | '}' => *depth -= 1,
            _ => {}
        }
    }

    line
}

/// Leading whitespace of the first non-blank line at or after `from`
fn body_indent<'a>(lines: &[&'a str], from: usize) -> Option<&'a str> {
    lines
        .get(from..)?
        .iter()
        .find(|line| !line.trim().is_empty())
        .copied()
        .map(leading_whitespace)
}

fn leading_whitespace(line: &str) -> &str {
    let rest = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - rest.len()]
}

fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") { "\r\n" } else { "\n" }
}
