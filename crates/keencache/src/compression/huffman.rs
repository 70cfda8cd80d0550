//! Huffman expansion against a fixed 255-node dictionary.
//!
//! Each node holds two successors, one per input bit. A successor above 255
//! names another node (`value - 256`); anything else is a decoded byte, after
//! which decoding restarts at the root, node 254.

use crate::utils::mem_reader::{self, MemReader, Parse, SliceMemReader};

use super::{
    DecodeError,
    reader::{BitReader, LittleEndianReader},
};

pub const NUM_NODES: usize = 255;
pub const ROOT_NODE: usize = 254;

/// Size in bytes of a serialized dictionary.
pub const DICTIONARY_SIZE: usize = NUM_NODES * 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffNode {
    bit_0: u16,
    bit_1: u16,
}

impl HuffNode {
    #[must_use]
    pub fn new(bit_0: u16, bit_1: u16) -> Self {
        Self { bit_0, bit_1 }
    }

    #[must_use]
    pub fn bit_0(&self) -> u16 {
        self.bit_0
    }

    #[must_use]
    pub fn bit_1(&self) -> u16 {
        self.bit_1
    }

    fn successor(self, bit: bool) -> u16 {
        if bit { self.bit_1 } else { self.bit_0 }
    }
}

impl Parse for HuffNode {
    fn parse<M: MemReader>(reader: &mut M) -> mem_reader::Result<Self> {
        let bit_0 = reader.read_u16_le()?;
        let bit_1 = reader.read_u16_le()?;
        Ok(HuffNode { bit_0, bit_1 })
    }
}

#[derive(Debug, Clone)]
pub struct HuffmanDictionary {
    nodes: Vec<HuffNode>,
}

impl HuffmanDictionary {
    /// Builds a dictionary from exactly [`NUM_NODES`] nodes.
    #[must_use]
    pub fn from_nodes(nodes: [HuffNode; NUM_NODES]) -> Self {
        Self {
            nodes: nodes.to_vec(),
        }
    }

    /// Parses a dictionary file.
    ///
    /// Dictionary files on disk are commonly padded to 1024 bytes; anything
    /// past the 255th node is ignored.
    pub fn from_bytes(data: &[u8]) -> mem_reader::Result<Self> {
        let mut reader = SliceMemReader::new(data);
        Self::parse(&mut reader)
    }

    #[must_use]
    pub fn nodes(&self) -> &[HuffNode] {
        &self.nodes
    }

    /// Expands `src` until `dest` is full, returning the number of source
    /// bytes consumed.
    ///
    /// Source bytes are only read when another bit is needed, so the returned
    /// count is the minimum prefix of `src` that produces `dest`.
    pub fn expand_into(&self, src: &[u8], dest: &mut [u8]) -> Result<usize, DecodeError> {
        let mut reader = LittleEndianReader::new(src);
        let mut node = ROOT_NODE;
        let mut written = 0;
        while written < dest.len() {
            let bit = reader.read_bit()?;
            let next = usize::from(self.nodes[node].successor(bit));
            if next > 255 {
                node = next - 256;
                if node >= self.nodes.len() {
                    return Err(DecodeError::InvalidNode { node });
                }
            } else {
                dest[written] = (next & 0xFF) as u8;
                written += 1;
                node = ROOT_NODE;
            }
        }
        Ok(reader.bytes_consumed())
    }

    /// Expands `src` into a new buffer of `exp_length` bytes.
    ///
    /// Every code is at least one bit long, so a length above eight bytes per
    /// input byte fails before anything is allocated.
    pub fn expand(&self, src: &[u8], exp_length: usize) -> Result<Vec<u8>, DecodeError> {
        if exp_length > src.len().saturating_mul(8) {
            return Err(DecodeError::UnexpectedEndOfInput {
                position: src.len(),
            });
        }
        let mut dest = vec![0u8; exp_length];
        self.expand_into(src, &mut dest)?;
        Ok(dest)
    }
}

impl Parse for HuffmanDictionary {
    fn parse<M: MemReader>(reader: &mut M) -> mem_reader::Result<Self> {
        if reader.remaining() < DICTIONARY_SIZE {
            return Err(reader.create_invalid_data_error(format!(
                "Huffman dictionary needs {DICTIONARY_SIZE} bytes, found {}",
                reader.remaining()
            )));
        }
        let mut nodes = Vec::with_capacity(NUM_NODES);
        for _ in 0..NUM_NODES {
            nodes.push(HuffNode::parse(reader)?);
        }
        Ok(HuffmanDictionary { nodes })
    }
}
