use std::{
    borrow::Cow,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process,
};

use tracing::warn;

use crate::{
    document::{markup, Document},
    errors::PriceError,
};

/// Writes the serialized document to disk atomically by staging to a temporary file.
pub fn save_document_to_file(doc: &Document, path: &Path) -> Result<(), PriceError> {
    write_atomic(path, markup::to_html(doc).as_bytes())
}

/// Loads and parses an HTML file. See [`decode_markup`] for non-UTF-8 input.
pub fn load_document_from_file(path: &Path) -> Result<Document, PriceError> {
    let bytes = fs::read(path)?;
    Ok(markup::parse_html(&decode_markup(&bytes)))
}

/// Decodes markup as UTF-8, replacing invalid sequences with U+FFFD.
pub fn decode_markup(bytes: &[u8]) -> Cow<'_, str> {
    let text = String::from_utf8_lossy(bytes);
    if matches!(text, Cow::Owned(_)) {
        warn!("input is not valid UTF-8; invalid bytes were replaced");
    }
    text
}

/// Replaces `path` with `data` through a staging file in the same directory.
///
/// The staging file is created exclusively, so an existing file of the same
/// name is never overwritten.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), PriceError> {
    let staging = staging_path(path);
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&staging)?;
    let written = file.write_all(data).and_then(|()| file.sync_all());
    drop(file);
    if let Err(err) = written.and_then(|()| fs::rename(&staging, path)) {
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", process::id()))
}
