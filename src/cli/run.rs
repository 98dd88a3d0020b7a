#![forbid(unsafe_code)]

//! End-to-end execution of one pdbe command line

use super::args::{Routed, USAGE_HINT, route};
use crate::config::Config;
use crate::engine::{Dispatcher, PathResolver};
use crate::error::{EXIT_SUCCESS, Error, Result};
use crate::marker::PdbMarker;
use crate::output::HumanFormatter;
use crate::types::Invocation;
use std::path::Path;
use termcolor::ColorChoice;
use tracing::debug;

/// Run pdbe with the given arguments (program name excluded)
///
/// Returns the process exit code:
/// - 0: Success, or help / usage hint shown
/// - 1: Argument or configuration error
/// - 2: Filesystem error
pub fn run(args: Vec<String>) -> i32 {
    match run_inner(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            e.exit_code()
        }
    }
}

fn run_inner(args: Vec<String>) -> Result<()> {
    let invocation = match route(args)? {
        Routed::UsageHint => {
            println!("{}", USAGE_HINT);
            return Ok(());
        }
        Routed::Help(text) => {
            println!("{}", text.trim_end());
            return Ok(());
        }
        Routed::Invocation(invocation) => invocation,
    };
    debug!(?invocation, "routed command line");

    let workdir = std::env::current_dir().map_err(Error::WorkingDirectory)?;
    execute(&invocation, &workdir)
}

/// Resolve and dispatch one invocation relative to `workdir`
///
/// `pdbe.toml` is only read once there are files to dispatch, so notices
/// never depend on the configuration.
pub fn execute(invocation: &Invocation, workdir: &Path) -> Result<()> {
    let resolved = PathResolver::new(workdir).resolve_invocation(invocation)?;
    if let Some(notice) = &resolved.notice {
        HumanFormatter::new(ColorChoice::Auto).write_notice(notice)?;
        if notice.halts_dispatch() {
            return Ok(());
        }
    }
    if resolved.is_empty() {
        return Ok(());
    }

    let config = Config::discover(workdir)?;
    let formatter = HumanFormatter::new(config.output.color.into());

    let engine = PdbMarker::from_config(&config.marker);
    let summary = Dispatcher::new(&engine).dispatch(&resolved.files, invocation.operation())?;

    formatter.write_summary(&summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;
    use std::fs;
    use tempfile::TempDir;

    fn invocation(mode: Mode, target: &str, clear: bool) -> Invocation {
        Invocation {
            mode,
            target: target.to_string(),
            clear,
        }
    }

    #[test]
    fn test_execute_insert_then_clear() {
        let temp_dir = TempDir::new().unwrap();
        let workdir = temp_dir.path();
        fs::create_dir(workdir.join("src")).unwrap();
        fs::write(workdir.join("src/a.py"), "def a():\n    pass\n").unwrap();

        execute(&invocation(Mode::Dir, "src", false), workdir).unwrap();
        let inserted = fs::read_to_string(workdir.join("src/a.py")).unwrap();
        assert_eq!(inserted, "def a():\n    import pdb; pdb.set_trace()\n    pass\n");

        execute(&invocation(Mode::Dir, "src", true), workdir).unwrap();
        let cleared = fs::read_to_string(workdir.join("src/a.py")).unwrap();
        assert_eq!(cleared, "def a():\n    pass\n");
    }

    #[test]
    fn test_execute_uses_configured_statement() {
        let temp_dir = TempDir::new().unwrap();
        let workdir = temp_dir.path();
        fs::write(
            workdir.join("pdbe.toml"),
            "[marker]\nstatement = \"breakpoint()\"\n",
        )
        .unwrap();
        fs::write(workdir.join("m.py"), "def m():\n    pass\n").unwrap();

        execute(&invocation(Mode::File, "m.py", false), workdir).unwrap();

        let content = fs::read_to_string(workdir.join("m.py")).unwrap();
        assert_eq!(content, "def m():\n    breakpoint()\n    pass\n");
    }

    #[test]
    fn test_execute_missing_file_is_filesystem_error() {
        let temp_dir = TempDir::new().unwrap();

        let err = execute(&invocation(Mode::File, "ghost.py", false), temp_dir.path()).unwrap_err();

        assert_eq!(err.exit_code(), crate::error::EXIT_FILESYSTEM);
    }

    #[test]
    fn test_execute_missing_directory_is_recoverable() {
        let temp_dir = TempDir::new().unwrap();

        execute(&invocation(Mode::Dir, "ghost", false), temp_dir.path()).unwrap();
    }

    #[test]
    fn test_execute_bad_config_is_usage_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("pdbe.toml"), "[marker]\nindent_width = 0\n").unwrap();
        fs::write(temp_dir.path().join("a.py"), "def a():\n    pass\n").unwrap();

        let err = execute(&invocation(Mode::Dir, ".", false), temp_dir.path()).unwrap_err();

        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }

    #[test]
    fn test_execute_trailing_separator_ignores_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("pdbe.toml"), "garbage = [").unwrap();

        execute(&invocation(Mode::RecursiveDir, "proj/", false), temp_dir.path()).unwrap();
    }

    #[test]
    fn test_execute_empty_set_ignores_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("pdbe.toml"), "garbage = [").unwrap();

        execute(&invocation(Mode::Dir, "missing", false), temp_dir.path()).unwrap();
        execute(&invocation(Mode::Dir, ".", false), temp_dir.path()).unwrap();
    }
}
