// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
///
/// The loader reads the configuration document through it and the generator
/// writes every artifact through it, so tests can run against
/// [`mock::MockFileSystem`].
pub trait FileSystem: Send + Sync + Debug {
    /// Read a whole file as raw bytes. `Ok(None)` when the file does not
    /// exist. Decoding is left to the caller.
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>>;

    /// Write a file, replacing previous contents and creating missing parent
    /// directories.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading file {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        }
        let mut file = fs::File::create(path).with_context(|| format!("creating file {:?}", path))?;
        file.write_all(contents).with_context(|| format!("writing to file {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_fs_write_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/job.conf");
        let fs = RealFileSystem;

        fs.write(&path, b"first").unwrap();
        fs.write(&path, b"second").unwrap();

        assert_eq!(fs.read(&path).unwrap().as_deref(), Some(&b"second"[..]));
    }

    #[test]
    fn real_fs_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFileSystem;
        assert!(fs.read(&dir.path().join("absent.yml")).unwrap().is_none());
    }
}
