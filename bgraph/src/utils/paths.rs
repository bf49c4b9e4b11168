use crate::utils::IResult;
use std::fs;
use std::path::Path;
use anyhow::Context;

/// Equivalent to [`std::fs::create_dir_all`] with better error messages.
pub fn create_dir_all(p: impl AsRef<Path>) -> IResult<()> {
    let path = p.as_ref();
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory `{}`", path.display()))
}

/// Equivalent to [`std::fs::read_to_string`] with better error messages.
pub fn read_string(p: impl AsRef<Path>) -> IResult<String> {
    let path = p.as_ref();
    fs::read_to_string(path)
        .with_context(|| format!("failed to read file `{}`", path.display()))
}

/// Equivalent to [`std::fs::write`] with better error messages.
pub fn write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> IResult<()> {
    let path = path.as_ref();
    fs::write(path, contents.as_ref())
        .with_context(|| format!("failed to write `{}`", path.display()))
}

/// Like [`write`], but creates the parent directories first.
pub fn write_create_all<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> IResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    write(path, contents)
}

