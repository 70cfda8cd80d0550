#![no_main]

use keencache::compression::carmack;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let (length, src) = data.split_at(2);
    let length = usize::from(u16::from_le_bytes([length[0], length[1]]));
    // Arbitrary input may fail to decode, but must never panic.
    let mut dest = vec![0u16; length / 2];
    if let Ok(consumed) = carmack::expand_into(src, &mut dest) {
        assert!(consumed <= src.len());
    }
});
