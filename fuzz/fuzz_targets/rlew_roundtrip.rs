#![no_main]

use keencache::{compression::rlew, utils::byte_order::words_from_le_bytes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let (tag, words) = data.split_at(2);
    let tag = u16::from_le_bytes([tag[0], tag[1]]);
    let words = words_from_le_bytes(words);

    let compressed = rlew::compress(&words, tag);
    let expanded = rlew::expand(&compressed, words.len() * 2, tag).unwrap();
    assert_eq!(words, expanded);
});
