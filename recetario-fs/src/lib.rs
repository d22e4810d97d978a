//! Capability-based filesystem helpers for reading local photos.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::io;

/// Open the parent directory of `path` with ambient authority and return it
/// with the file name.
fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Read the whole file at `path`.
///
/// Directories are rejected with [`io::ErrorKind::InvalidInput`].
pub fn read_file_bytes(path: &Utf8Path) -> io::Result<Vec<u8>> {
    let (dir, name) = open_dir_and_file(path)?;
    if dir.metadata(name.as_str())?.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{path} is a directory"),
        ));
    }
    dir.read(name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn utf8(dir: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf-8 temp path")
    }

    #[rstest]
    fn reads_file_contents(temp_dir: TempDir) {
        let path = utf8(&temp_dir, "photo.jpg");
        std::fs::write(&path, b"\xff\xd8jpeg").expect("write photo");
        assert_eq!(read_file_bytes(&path).expect("read photo"), b"\xff\xd8jpeg");
    }

    #[rstest]
    fn missing_file_is_not_found(temp_dir: TempDir) {
        let path = utf8(&temp_dir, "missing.jpg");
        let err = read_file_bytes(&path).expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn missing_parent_is_not_found(temp_dir: TempDir) {
        let path = utf8(&temp_dir, "nowhere/photo.jpg");
        let err = read_file_bytes(&path).expect_err("missing parent");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn directories_are_rejected(temp_dir: TempDir) {
        let path = utf8(&temp_dir, "album");
        std::fs::create_dir(&path).expect("create dir");
        let err = read_file_bytes(&path).expect_err("directory");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
