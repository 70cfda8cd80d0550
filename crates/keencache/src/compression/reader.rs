use super::DecodeError;

pub(super) trait BitReader {
    fn read_bit(&mut self) -> Result<bool, DecodeError>;
}

/// Reads bits least-significant first from a byte slice.
///
/// A new byte is only fetched when the previous one is exhausted and another
/// bit is requested, so [`LittleEndianReader::bytes_consumed`] is the minimum
/// number of bytes needed for the bits read so far.
pub(super) struct LittleEndianReader<'a> {
    data: &'a [u8],
    next_byte: usize,
    curr_byte: u8,
    bits_left: u8,
}

impl<'a> LittleEndianReader<'a> {
    pub(super) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            next_byte: 0,
            curr_byte: 0,
            bits_left: 0,
        }
    }

    pub(super) fn bytes_consumed(&self) -> usize {
        self.next_byte
    }
}

impl BitReader for LittleEndianReader<'_> {
    fn read_bit(&mut self) -> Result<bool, DecodeError> {
        if self.bits_left == 0 {
            let Some(&byte) = self.data.get(self.next_byte) else {
                return Err(DecodeError::UnexpectedEndOfInput {
                    position: self.next_byte,
                });
            };
            self.curr_byte = byte;
            self.next_byte += 1;
            self.bits_left = 8;
        }
        let next_bit = self.curr_byte & 1 != 0;
        self.bits_left -= 1;
        self.curr_byte >>= 1;
        Ok(next_bit)
    }
}
