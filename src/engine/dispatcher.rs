#![forbid(unsafe_code)]

//! Sequential dispatch of resolved files to a marker engine
//!
//! Files are processed in order, each exactly once. The first failing file
//! stops the run; files already rewritten stay rewritten.

use crate::marker::{MarkerEngine, MarkerError};
use crate::types::Operation;
use std::path::PathBuf;
use tracing::{debug, info};

/// Counts gathered while dispatching, for reporting only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub operation: Operation,
    /// Files handed to the engine
    pub files_visited: usize,
    /// Files where at least one marker was added or removed
    pub files_changed: usize,
    /// Markers added or removed across all files
    pub markers_changed: usize,
}

impl DispatchSummary {
    fn new(operation: Operation) -> Self {
        DispatchSummary {
            operation,
            files_visited: 0,
            files_changed: 0,
            markers_changed: 0,
        }
    }
}

/// Hands every resolved file to a [`MarkerEngine`]
pub struct Dispatcher<'a, E: MarkerEngine + ?Sized> {
    engine: &'a E,
}

impl<'a, E: MarkerEngine + ?Sized> Dispatcher<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Dispatcher { engine }
    }

    /// Insert or remove markers in `files`, stopping at the first error
    pub fn dispatch(
        &self,
        files: &[PathBuf],
        operation: Operation,
    ) -> Result<DispatchSummary, MarkerError> {
        let mut summary = DispatchSummary::new(operation);

        for path in files {
            debug!(path = %path.display(), ?operation, "dispatching");

            let changed = match operation {
                Operation::Insert => self.engine.insert_marker(path)?,
                Operation::Remove => self.engine.remove_marker(path)?,
            };

            summary.files_visited += 1;
            if changed > 0 {
                summary.files_changed += 1;
                summary.markers_changed += changed;
            }
        }

        info!(
            files = summary.files_visited,
            changed = summary.files_changed,
            markers = summary.markers_changed,
            "dispatch finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io;
    use std::path::Path;

    /// Records every call and fails on one chosen path
    #[derive(Default)]
    struct RecordingEngine {
        calls: RefCell<Vec<(Operation, PathBuf)>>,
        fail_on: Option<PathBuf>,
    }

    impl RecordingEngine {
        fn record(&self, operation: Operation, path: &Path) -> Result<usize, MarkerError> {
            self.calls.borrow_mut().push((operation, path.to_path_buf()));
            if self.fail_on.as_deref() == Some(path) {
                return Err(MarkerError::Read {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                });
            }
            // Pretend every file named "clean*" already has nothing to change
            let clean = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with("clean"));
            Ok(if clean { 0 } else { 2 })
        }
    }

    impl MarkerEngine for RecordingEngine {
        fn insert_marker(&self, path: &Path) -> Result<usize, MarkerError> {
            self.record(Operation::Insert, path)
        }

        fn remove_marker(&self, path: &Path) -> Result<usize, MarkerError> {
            self.record(Operation::Remove, path)
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|name| PathBuf::from("/w").join(name)).collect()
    }

    #[test]
    fn test_dispatch_inserts_in_order() {
        let engine = RecordingEngine::default();
        let files = paths(&["b.py", "a.py", "clean.py"]);

        let summary = Dispatcher::new(&engine)
            .dispatch(&files, Operation::Insert)
            .unwrap();

        let calls = engine.calls.borrow();
        let called: Vec<&PathBuf> = calls.iter().map(|(_, path)| path).collect();
        assert_eq!(called, files.iter().collect::<Vec<_>>());
        assert!(calls.iter().all(|(op, _)| *op == Operation::Insert));
        assert_eq!(
            summary,
            DispatchSummary {
                operation: Operation::Insert,
                files_visited: 3,
                files_changed: 2,
                markers_changed: 4,
            }
        );
    }

    #[test]
    fn test_dispatch_clear_uses_removal() {
        let engine = RecordingEngine::default();
        let files = paths(&["a.py"]);

        Dispatcher::new(&engine)
            .dispatch(&files, Operation::Remove)
            .unwrap();

        assert_eq!(
            engine.calls.borrow().as_slice(),
            &[(Operation::Remove, files[0].clone())]
        );
    }

    #[test]
    fn test_dispatch_stops_at_first_failure() {
        let files = paths(&["a.py", "broken.py", "c.py"]);
        let engine = RecordingEngine {
            fail_on: Some(files[1].clone()),
            ..Default::default()
        };

        let err = Dispatcher::new(&engine)
            .dispatch(&files, Operation::Insert)
            .unwrap_err();

        assert!(err.to_string().contains("broken.py"));
        let calls = engine.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(!calls.iter().any(|(_, path)| path.ends_with("c.py")));
    }

    #[test]
    fn test_dispatch_empty_set() {
        let engine = RecordingEngine::default();

        let summary = Dispatcher::new(&engine)
            .dispatch(&[], Operation::Insert)
            .unwrap();

        assert!(engine.calls.borrow().is_empty());
        assert_eq!(summary.files_visited, 0);
    }

    #[test]
    fn test_dispatch_through_trait_object() {
        let engine = RecordingEngine::default();
        let dyn_engine: &dyn MarkerEngine = &engine;

        let summary = Dispatcher::new(dyn_engine)
            .dispatch(&paths(&["a.py"]), Operation::Insert)
            .unwrap();

        assert_eq!(summary.markers_changed, 2);
    }
}
