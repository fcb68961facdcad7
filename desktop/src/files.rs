use std::{
    io::{BufWriter, Write},
    path::Path,
};

use log::debug;

use crate::{Error, Result};

/// Reads a source file, replacing invalid UTF-8 rather than failing on it.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_owned(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes `path` through a temporary file in the same directory.
///
/// The temporary file only replaces `path` once `write` succeeded, and it is
/// removed on any failure, so `path` is never left half written.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let write_error = |source| Error::Write {
        path: path.to_owned(),
        source,
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let temp = tempfile::Builder::new()
        .prefix(".oledgif-")
        .tempfile_in(dir)
        .map_err(write_error)?;
    debug!("Writing {} through {}", path.display(), temp.path().display());

    let mut writer = BufWriter::new(temp);
    write(&mut writer)?;
    let temp = writer
        .into_inner()
        .map_err(|e| write_error(e.into_error()))?;
    temp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}
