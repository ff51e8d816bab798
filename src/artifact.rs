//! On-disk form of a compiled program.
//!
//! Layout: a `#!` launcher line so the file can be executed directly, the
//! `BFBC` magic, one format-version byte, then the postcard-encoded
//! [`ProgramBc`].

use crate::bytecode::ProgramBc;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};
use thiserror::Error;

pub const LAUNCHER: &[u8] = b"#!/usr/bin/env -S bfc --run\n";
pub const MAGIC: &[u8; 4] = b"BFBC";
pub const FORMAT_VERSION: u8 = 1;

/// Keeps temp names unique across concurrent writes in one process
static TMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("invalid output path '{}': it has no file name", .0.display())]
    InvalidOutputPath(PathBuf),

    #[error("cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot encode bytecode: {0}")]
    Encode(#[source] postcard::Error),

    #[error("not a bytecode artifact: {0}")]
    BadHeader(&'static str),

    #[error("unsupported artifact format version {0}")]
    UnsupportedVersion(u8),

    #[error("corrupt artifact: {0}")]
    Decode(#[source] postcard::Error),
}

pub fn encode_artifact(program: &ProgramBc) -> Result<Vec<u8>, ArtifactError> {
    let payload = postcard::to_allocvec(program).map_err(ArtifactError::Encode)?;

    let mut bytes = Vec::with_capacity(LAUNCHER.len() + MAGIC.len() + 1 + payload.len());
    bytes.extend_from_slice(LAUNCHER);
    bytes.extend_from_slice(MAGIC);
    bytes.push(FORMAT_VERSION);
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

pub fn decode_artifact(bytes: &[u8]) -> Result<ProgramBc, ArtifactError> {
    // Any launcher line is accepted, the installed path may differ
    let body = if bytes.starts_with(b"#!") {
        let newline = bytes
            .iter()
            .position(|b| *b == b'\n')
            .ok_or(ArtifactError::BadHeader("unterminated launcher line"))?;
        &bytes[newline + 1..]
    } else {
        bytes
    };

    let body = body
        .strip_prefix(MAGIC.as_slice())
        .ok_or(ArtifactError::BadHeader("missing BFBC magic"))?;

    let (&version, payload) = body
        .split_first()
        .ok_or(ArtifactError::BadHeader("missing format version"))?;
    if version != FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion(version));
    }

    postcard::from_bytes(payload).map_err(ArtifactError::Decode)
}

/// Write `program` to `out`, atomically.
///
/// The bytes go to a hidden temp file next to `out` which is then renamed
/// over it. On failure the temp file is removed and `out` is untouched.
pub fn write_artifact(program: &ProgramBc, out: &Path) -> Result<(), ArtifactError> {
    let file_name = out
        .file_name()
        .ok_or_else(|| ArtifactError::InvalidOutputPath(out.to_path_buf()))?;

    let dir = match out.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let bytes = encode_artifact(program)?;

    let tmp = dir.join(format!(
        ".{}.{}.{}.tmp",
        file_name.to_string_lossy(),
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    let result = persist(&tmp, out, &bytes);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result?;

    tracing::debug!(path = %out.display(), bytes = bytes.len(), "wrote artifact");
    Ok(())
}

fn persist(tmp: &Path, out: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    fs::write(tmp, bytes).map_err(write_error(tmp))?;
    make_executable(tmp).map_err(write_error(tmp))?;
    fs::rename(tmp, out).map_err(write_error(out))
}

fn write_error(path: &Path) -> impl FnOnce(io::Error) -> ArtifactError {
    let path = path.to_path_buf();
    move |source| ArtifactError::Write { path, source }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

pub fn read_artifact(path: &Path) -> Result<ProgramBc, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_artifact(&bytes)
}
