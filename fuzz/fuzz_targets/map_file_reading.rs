#![no_main]

use keencache::{CacheConfig, MemoryPool, cache::MapCache};
use libfuzzer_sys::fuzz_target;

fn body(root_dir: &std::path::Path) -> anyhow::Result<()> {
    let mut config = CacheConfig::default();
    config.maps.planes = 2;
    let mut maps = MapCache::open(root_dir, &config)?;
    let mut pool = MemoryPool::with_capacity(1 << 20);
    for map in 0..maps.map_count() {
        if maps.cache_map(&mut pool, map).is_ok() {
            let _ = maps.plane(&pool, 0)?;
        }
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    let (head_size_bytes, file_data) = data.split_at(8);
    let head_size = u64::from_le_bytes(head_size_bytes.try_into().unwrap());
    if file_data.len() < head_size as usize {
        return;
    }

    let (head_data, map_data) = file_data.split_at(head_size as usize);
    let tempdir = tempfile::tempdir().unwrap();

    std::fs::write(tempdir.path().join("MAPHEAD.CK5"), head_data).unwrap();
    std::fs::write(tempdir.path().join("GAMEMAPS.CK5"), map_data).unwrap();
    std::fs::write(tempdir.path().join("TILEINFO.CK5"), [0u8; 4]).unwrap();

    let _ = body(tempdir.path());
});
