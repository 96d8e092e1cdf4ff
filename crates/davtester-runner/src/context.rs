//! State threaded through a run.

use std::path::Path;

use crate::observer::Notifier;
use crate::server_info::ServerInfo;
use crate::transport::Transport;

/// Borrowed run state handed down to files, suites and nodes.
///
/// The server info is mutable only so that suites can rotate UIDs.
pub struct RunContext<'a, T: Transport> {
    pub transport: &'a T,
    pub server: &'a mut ServerInfo,
    pub data_dir: &'a Path,
    pub notifier: &'a mut Notifier,
}

impl<T: Transport> RunContext<'_, T> {
    /// Resolves a path from a test file against the data directory.
    #[must_use]
    pub fn data_path(&self, path: &str) -> std::path::PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}
