//! Filesystem access for the image container.
//!
//! The container never touches `std::fs` directly; it goes through a
//! [`FileSystem`] so tests can swap in an in-memory store.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

/// Characters that may not appear in a file name.
pub const FORBIDDEN_FILENAME_CHARS: &[char] = &['/', '?', '*', ':', ';', '{', '}', '\\'];

/// Byte-level file operations.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing file that can be opened for reading.
    fn is_readable(&self, path: &Path) -> bool;

    /// Whether `path` can be written. A path that does not exist yet counts
    /// as writable; the write itself reports any deeper problem.
    fn is_writable(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Last modification time, `None` when unavailable.
    fn modified(&self, path: &Path) -> Option<SystemTime>;

    fn delete(&self, path: &Path) -> io::Result<()>;

    /// Create a directory. Succeeds when it already exists.
    fn create_dir(&self, path: &Path, recursive: bool, mode: u32) -> io::Result<()>;
}

/// [`FileSystem`] over the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_readable(&self, path: &Path) -> bool {
        path.is_file() && fs::File::open(path).is_ok()
    }

    fn is_writable(&self, path: &Path) -> bool {
        match fs::metadata(path) {
            Ok(meta) => !meta.permissions().readonly(),
            Err(e) => e.kind() == io::ErrorKind::NotFound,
        }
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes)?;
        debug!(path = %path.display(), len = bytes.len(), "wrote file");
        Ok(())
    }

    fn modified(&self, path: &Path) -> Option<SystemTime> {
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }

    fn delete(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn create_dir(&self, path: &Path, recursive: bool, mode: u32) -> io::Result<()> {
        if path.is_dir() {
            return Ok(());
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(recursive);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;

        builder.create(path)
    }
}

/// Whether `name` is usable as a single file name.
pub fn is_acceptable_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains(FORBIDDEN_FILENAME_CHARS)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory filesystem that records writes.
    #[derive(Default)]
    pub struct MemoryFs {
        pub files: Mutex<HashMap<PathBuf, Vec<u8>>>,
        pub read_only: Mutex<Vec<PathBuf>>,
        pub writes: Mutex<Vec<PathBuf>>,
    }

    impl MemoryFs {
        pub fn with_file(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
            let fs = Self::default();
            fs.files.lock().unwrap().insert(path.into(), bytes);
            fs
        }

        pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned()
        }

        pub fn write_count(&self) -> usize {
            self.writes.lock().unwrap().len()
        }
    }

    impl FileSystem for MemoryFs {
        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }

        fn is_readable(&self, path: &Path) -> bool {
            self.exists(path)
        }

        fn is_writable(&self, path: &Path) -> bool {
            !self.read_only.lock().unwrap().iter().any(|p| p == path)
        }

        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.contents(path)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }

        fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), bytes.to_vec());
            self.writes.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }

        fn modified(&self, path: &Path) -> Option<SystemTime> {
            self.exists(path)
                .then(|| SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000))
        }

        fn delete(&self, path: &Path) -> io::Result<()> {
            self.files
                .lock()
                .unwrap()
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }

        fn create_dir(&self, _path: &Path, _recursive: bool, _mode: u32) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_acceptable_filenames() {
        assert!(is_acceptable_filename("photo.jpg"));
        assert!(is_acceptable_filename("my photo (1).png"));
        assert!(!is_acceptable_filename(""));
        for bad in ["a/b", "a?b", "a*b", "a:b", "a;b", "a{b", "a}b", "a\\b"] {
            assert!(!is_acceptable_filename(bad), "{bad}");
        }
    }

    #[test]
    fn test_local_read_write_delete() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.bin");
        let fs = LocalFs;

        assert!(!fs.exists(&path));
        assert!(!fs.is_readable(&path));
        assert!(fs.is_writable(&path));
        assert!(fs.modified(&path).is_none());

        fs.write(&path, b"abc").unwrap();
        assert!(fs.exists(&path));
        assert!(fs.is_readable(&path));
        assert_eq!(fs.read(&path).unwrap(), b"abc");
        assert!(fs.modified(&path).is_some());

        fs.delete(&path).unwrap();
        assert!(!fs.exists(&path));
        assert!(fs.delete(&path).is_err());
    }

    #[test]
    fn test_local_directory_not_readable_as_file() {
        let tmp = TempDir::new().unwrap();
        assert!(!LocalFs.is_readable(tmp.path()));
    }

    #[test]
    fn test_local_readonly_not_writable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("locked.txt");
        fs::write(&path, b"x").unwrap();

        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();

        assert!(!LocalFs.is_writable(&path));
    }

    #[test]
    fn test_create_dir_recursive_and_existing() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b").join("c");
        let fs = LocalFs;

        assert!(fs.create_dir(&nested, false, 0o777).is_err());
        fs.create_dir(&nested, true, 0o777).unwrap();
        assert!(nested.is_dir());

        // Already there
        fs.create_dir(&nested, false, 0o777).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_create_dir_applies_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("private");
        LocalFs.create_dir(&dir, false, 0o700).unwrap();

        let mode = fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }
}
