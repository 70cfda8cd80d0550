//! The three codecs used by the asset files.
//!
//! Graphics and audio chunks are Huffman coded against a dictionary stored in
//! a separate file. Map planes are RLEW coded and then Carmack coded on top.

pub mod carmack;
pub mod errors;
pub mod huffman;
mod reader;
pub mod rlew;

pub use errors::DecodeError;
