//! Directory listing collaborator.

use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

/// Lists the entry names of a directory.
///
/// Order of the returned names is unspecified; the index builder sorts them.
pub trait DirectoryListing {
    fn list(&self, dir: &Path) -> io::Result<Vec<String>>;
}

/// Lists regular files on the local filesystem.
///
/// Subdirectories are skipped, as are names that are not valid UTF-8 since
/// they cannot carry a parseable tile name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDirectoryListing;

impl DirectoryListing for FsDirectoryListing {
    fn list(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            // Follows symlinks, so linked tiles are listed too.
            if !entry.path().is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!(name = ?raw, "Skipping non UTF-8 directory entry"),
            }
        }

        Ok(names)
    }
}

/// A fixed set of names, independent of any directory.
impl DirectoryListing for Vec<String> {
    fn list(&self, _dir: &Path) -> io::Result<Vec<String>> {
        Ok(self.clone())
    }
}
