//! Whole-file helpers and episode-specific file naming.

use std::{
    fs::File,
    io::{self, Read as _, Write as _},
    path::Path,
};

/// Replaces the last three characters of `name` with `ext`.
///
/// Asset files share a base name across episodes and differ only in their
/// extension (`EGAGRAPH.CK4`, `EGAGRAPH.CK5`, ...). Names shorter than three
/// characters, or extensions that are not exactly three characters, are
/// returned unchanged.
#[must_use]
pub fn adjust_extension(name: &str, ext: &str) -> String {
    if ext.chars().count() != 3 {
        return name.to_string();
    }
    let Some((split, _)) = name.char_indices().rev().nth(2) else {
        return name.to_string();
    };
    let mut adjusted = String::with_capacity(split + ext.len());
    adjusted.push_str(&name[..split]);
    adjusted.push_str(ext);
    adjusted
}

/// Reads an entire file into a freshly allocated buffer.
pub fn load_file(path: &Path) -> io::Result<Vec<u8>> {
    std::fs::read(path)
}

/// Reads at most `buf.len()` bytes from the start of the file at `path`.
///
/// Returns the number of bytes read, which is the smaller of the file size and
/// the buffer length.
pub fn read_file_into(path: &Path, buf: &mut [u8]) -> io::Result<usize> {
    let mut file = File::open(path)?;
    let file_len = usize::try_from(file.metadata()?.len()).unwrap_or(usize::MAX);
    let amount = file_len.min(buf.len());
    file.read_exact(&mut buf[..amount])?;
    Ok(amount)
}

/// Writes `data` to `path`, replacing any existing file.
pub fn write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()
}
