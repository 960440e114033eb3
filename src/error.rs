//! Error type shared by the parser, serializer, encoder and reconstructor.
//!
//! Every filesystem failure aborts the current run and carries the path it happened on, so the
//! operator sees which artifact broke. Anomalies that do not stop a run (lonely combination
//! entries, out-of-range heading levels) are logged instead of being raised.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
/// Failure of a decompile or recompile run.
pub enum Error {
    /// No source document or tree root was supplied, or it does not exist.
    #[error("no {what} supplied: {}", .path.display())]
    InputUnavailable {
        /// Which input was missing ("markdown file", "folder structure").
        what: &'static str,
        /// The path that was requested.
        path: PathBuf,
    },
    /// A read, write, rename or directory creation failed.
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        /// The operation that failed, phrased as a verb.
        action: &'static str,
        /// The file or directory the operation targeted.
        path: PathBuf,
        /// Underlying error from the OS.
        #[source]
        source: io::Error,
    },
    /// An order manifest exists but is not valid JSON.
    #[error("malformed order manifest {}: {source}", .path.display())]
    Manifest {
        /// Location of the manifest file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Attach the failing action and path to an [`io::Result`].
pub(crate) trait IoContext<T> {
    fn at(self, action: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, action: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Io {
            action,
            path: path.to_path_buf(),
            source,
        })
    }
}
