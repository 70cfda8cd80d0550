//! Random-access reads from an asset data file held open for the session.

use std::{
    fmt::Debug,
    fs::File,
    io::{self, BufReader, Read, Seek, SeekFrom},
    path::Path,
};

pub trait ReadSeek: Read + Seek {}

impl<T> ReadSeek for T where T: Read + Seek {}

/// A data file that is only ever read with seek-then-read.
pub struct DataFile {
    name: String,
    reader: Box<dyn ReadSeek>,
}

impl Debug for DataFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFile").field("name", &self.name).finish()
    }
}

impl DataFile {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(
            path.display().to_string(),
            BufReader::new(file),
        ))
    }

    pub fn from_reader<R>(name: impl Into<String>, reader: R) -> Self
    where
        R: Read + Seek + 'static,
    {
        DataFile {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fills `buf` with the bytes starting at `offset`.
    ///
    /// A file that ends before `buf` is full fails with
    /// [`io::ErrorKind::UnexpectedEof`].
    pub fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(offset))?;
        self.reader.read_exact(buf)
    }

    pub fn read_vec_at(&mut self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_at(offset, &mut buf)?;
        Ok(buf)
    }
}
