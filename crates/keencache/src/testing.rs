//! Fixtures shared by the unit tests: encoders for the codecs and builders for
//! synthetic asset files.

use crate::{
    compression::{
        carmack::{FAR_TAG, NEAR_TAG},
        huffman::{HuffNode, HuffmanDictionary, NUM_NODES, ROOT_NODE},
    },
    pool::{Allocator, Handle, MemoryPool, PoolError, PurgeLevel},
};

pub(crate) mod assets;

fn nodes_to_dictionary(nodes: &[HuffNode]) -> HuffmanDictionary {
    let nodes: [HuffNode; NUM_NODES] = nodes.try_into().expect("dictionary has 255 nodes");
    HuffmanDictionary::from_nodes(nodes)
}

/// A perfectly balanced tree: every byte has an eight-bit code.
pub(crate) fn balanced_dictionary() -> HuffmanDictionary {
    let mut nodes = Vec::with_capacity(NUM_NODES);
    for j in 0..128u16 {
        nodes.push(HuffNode::new(2 * j, 2 * j + 1));
    }
    let mut level_start = 0u16;
    let mut level_len = 128u16;
    while level_len > 1 {
        for k in 0..level_len / 2 {
            let left = 256 + level_start + 2 * k;
            nodes.push(HuffNode::new(left, left + 1));
        }
        level_start += level_len;
        level_len /= 2;
    }
    assert_eq!(nodes.len(), ROOT_NODE + 1);
    nodes_to_dictionary(&nodes)
}

/// A degenerate tree where byte `k` takes `k + 1` bits, so codes straddle
/// byte boundaries.
pub(crate) fn chain_dictionary() -> HuffmanDictionary {
    let mut nodes = vec![HuffNode::new(254, 255); NUM_NODES];
    for k in 0..254u16 {
        nodes[ROOT_NODE - usize::from(k)] = HuffNode::new(k, 256 + 253 - k);
    }
    nodes_to_dictionary(&nodes)
}

fn visit_codes_rec(
    dict: &HuffmanDictionary,
    node: usize,
    prefix: &mut Vec<bool>,
    codes: &mut [Option<Vec<bool>>],
) {
    let entry = dict.nodes()[node];
    for (bit, successor) in [(false, entry.bit_0()), (true, entry.bit_1())] {
        prefix.push(bit);
        let successor = usize::from(successor);
        if successor > 255 {
            visit_codes_rec(dict, successor - 256, prefix, codes);
        } else if codes[successor].is_none() {
            codes[successor] = Some(prefix.clone());
        }
        prefix.pop();
    }
}

/// Encodes `data` against `dict`, packing bits least-significant first.
pub(crate) fn huffman_encode(dict: &HuffmanDictionary, data: &[u8]) -> Vec<u8> {
    let mut codes = vec![None; 256];
    visit_codes_rec(dict, ROOT_NODE, &mut Vec::new(), &mut codes);

    let mut out = Vec::new();
    let mut bit_pos = 0;
    for &byte in data {
        let code = codes[usize::from(byte)]
            .as_ref()
            .expect("dictionary encodes every byte");
        for &bit in code {
            if bit_pos % 8 == 0 {
                out.push(0);
            }
            if bit {
                *out.last_mut().unwrap() |= 1 << (bit_pos % 8);
            }
            bit_pos += 1;
        }
    }
    out
}

pub(crate) fn words_to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Carmack-encodes `words` without any back-references, escaping words that
/// collide with the near or far tag.
pub(crate) fn carmack_literal_encode(words: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.len() * 2);
    for &word in words {
        push_carmack_literal(&mut out, word);
    }
    out
}

fn push_carmack_literal(out: &mut Vec<u8>, word: u16) {
    let [low, high] = word.to_le_bytes();
    if high == NEAR_TAG || high == FAR_TAG {
        out.extend([0, high, low]);
    } else {
        out.extend([low, high]);
    }
}

/// Longest earlier match for `words[position..]`, preferring the nearest
/// source. Runs may overlap the words they produce.
fn longest_match(words: &[u16], position: usize) -> Option<(usize, usize)> {
    let max_len = (words.len() - position).min(255);
    let mut best: Option<(usize, usize)> = None;
    for source in (0..position).rev() {
        let len = (0..max_len)
            .take_while(|&k| words[source + k] == words[position + k])
            .count();
        if len >= 2 && best.is_none_or(|(_, best_len)| len > best_len) {
            best = Some((source, len));
            if len == max_len {
                break;
            }
        }
    }
    best
}

/// Greedy Carmack encoder emitting near runs for sources within 255 words and
/// far runs beyond that.
pub(crate) fn carmack_encode(words: &[u16]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut position = 0;
    while position < words.len() {
        match longest_match(words, position) {
            Some((source, len)) if position - source <= 255 => {
                let count = u8::try_from(len).unwrap();
                out.extend([count, NEAR_TAG, u8::try_from(position - source).unwrap()]);
                position += len;
            }
            Some((source, len)) if source <= 0xFFFF => {
                let count = u8::try_from(len).unwrap();
                out.extend([count, FAR_TAG]);
                out.extend(u16::try_from(source).unwrap().to_le_bytes());
                position += len;
            }
            _ => {
                push_carmack_literal(&mut out, words[position]);
                position += 1;
            }
        }
    }
    out
}

/// A pool that never hands out a writable block, as if each one were
/// reclaimed right after allocation.
#[derive(Debug, Default)]
pub(crate) struct UnwritablePool {
    inner: MemoryPool,
}

impl UnwritablePool {
    pub(crate) fn inner(&self) -> &MemoryPool {
        &self.inner
    }
}

impl Allocator for UnwritablePool {
    fn allocate(&mut self, size: usize) -> Result<Handle, PoolError> {
        self.inner.allocate(size)
    }

    fn set_purge(&mut self, handle: Handle, level: PurgeLevel) {
        self.inner.set_purge(handle, level);
    }

    fn free(&mut self, handle: Handle) {
        self.inner.free(handle);
    }

    fn get(&self, handle: Handle) -> Option<&[u8]> {
        self.inner.get(handle)
    }

    fn get_mut(&mut self, _handle: Handle) -> Option<&mut [u8]> {
        None
    }

    fn purge_level(&self, handle: Handle) -> Option<PurgeLevel> {
        self.inner.purge_level(handle)
    }
}
