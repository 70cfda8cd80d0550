//! A bounds-checked cursor for parsing fixed-layout structures.

use std::borrow::Cow;

/// An error indicating that the data being parsed is malformed.
///
/// This does not represent an error in reading the data itself, only in the
/// format of the data.
#[derive(Debug, thiserror::Error)]
#[error("Invalid data at position {position} of {data_size} byte block: {message}")]
pub struct InvalidDataError {
    position: usize,
    data_size: usize,
    message: Cow<'static, str>,
}

impl InvalidDataError {
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type Result<T> = std::result::Result<T, InvalidDataError>;

macro_rules! impl_read_int {
    ($name:ident, $ty:ty) => {
        fn $name(&mut self) -> Result<$ty> {
            let mut buf = [0u8; std::mem::size_of::<$ty>()];
            self.read_exact(&mut buf)?;
            Ok(<$ty>::from_le_bytes(buf))
        }
    };
}

pub trait MemReader {
    fn seek_to(&mut self, offset: usize) -> Result<()>;

    #[must_use]
    fn tell(&self) -> usize;

    #[must_use]
    fn data_size(&self) -> usize;

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Create an `InvalidDataError` at the current position.
    fn create_invalid_data_error<M>(&self, message: M) -> InvalidDataError
    where
        M: Into<Cow<'static, str>>;

    #[must_use]
    fn remaining(&self) -> usize {
        self.data_size() - self.tell()
    }

    #[must_use]
    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    impl_read_int!(read_u8, u8);
    impl_read_int!(read_i8, i8);
    impl_read_int!(read_u16_le, u16);
    impl_read_int!(read_i16_le, i16);
    impl_read_int!(read_u32_le, u32);
    impl_read_int!(read_i32_le, i32);

    fn read_u24_le(&mut self) -> Result<u32> {
        let mut buf = [0u8; 3];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes([buf[0], buf[1], buf[2], 0]))
    }
}

#[derive(Debug, Clone)]
pub struct SliceMemReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> SliceMemReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }
}

impl MemReader for SliceMemReader<'_> {
    fn seek_to(&mut self, offset: usize) -> Result<()> {
        if self.data.len() < offset {
            return Err(self.create_invalid_data_error(format!(
                "Seek to {offset} is past the end of the data"
            )));
        }
        self.position = offset;
        Ok(())
    }

    fn tell(&self) -> usize {
        self.position
    }

    fn data_size(&self) -> usize {
        self.data.len()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.remaining() < buf.len() {
            return Err(self.create_invalid_data_error(format!(
                "Not enough data in buffer. Needed {}, but only {} available.",
                buf.len(),
                self.remaining()
            )));
        }
        let end = self.position + buf.len();
        buf.copy_from_slice(&self.data[self.position..end]);
        self.position = end;
        Ok(())
    }

    fn create_invalid_data_error<M>(&self, message: M) -> InvalidDataError
    where
        M: Into<Cow<'static, str>>,
    {
        InvalidDataError {
            position: self.position,
            data_size: self.data.len(),
            message: message.into(),
        }
    }
}

/// A trait for types that can be parsed from a `MemReader`.
pub trait Parse: Sized {
    /// Parses a value from the given `MemReader`.
    ///
    /// This function should leave the reader at the position immediately after
    /// the parsed value.
    fn parse<M: MemReader>(reader: &mut M) -> Result<Self>;
}
