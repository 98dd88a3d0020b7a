#![forbid(unsafe_code)]

//! Core types shared between argument routing and path resolution

use std::fmt;

/// Path-resolution strategy selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// A single file (`--file`)
    File,
    /// The immediate `.py` files of a directory (`--dir`)
    Dir,
    /// Every nested file of a directory tree (`--ew`)
    RecursiveDir,
}

impl Mode {
    /// Long flag that selects this mode
    pub fn flag(self) -> &'static str {
        match self {
            Mode::File => "--file",
            Mode::Dir => "--dir",
            Mode::RecursiveDir => "--ew",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::File => "file",
            Mode::Dir => "dir",
            Mode::RecursiveDir => "recursive-dir",
        };
        f.write_str(name)
    }
}

/// Whether markers are added or cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Remove,
}

impl Operation {
    pub fn from_clear(clear: bool) -> Self {
        if clear {
            Operation::Remove
        } else {
            Operation::Insert
        }
    }
}

/// A fully routed command line: one mode, its target, and the clear flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub mode: Mode,
    /// Path fragment relative to the working directory unless absolute
    pub target: String,
    pub clear: bool,
}

impl Invocation {
    pub fn operation(&self) -> Operation {
        Operation::from_clear(self.clear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_follows_clear_flag() {
        let mut invocation = Invocation {
            mode: Mode::Dir,
            target: "src".to_string(),
            clear: false,
        };
        assert_eq!(invocation.operation(), Operation::Insert);

        invocation.clear = true;
        assert_eq!(invocation.operation(), Operation::Remove);
    }

    #[test]
    fn test_mode_flags() {
        assert_eq!(Mode::File.flag(), "--file");
        assert_eq!(Mode::Dir.flag(), "--dir");
        assert_eq!(Mode::RecursiveDir.flag(), "--ew");
        assert_eq!(Mode::RecursiveDir.to_string(), "recursive-dir");
    }
}
