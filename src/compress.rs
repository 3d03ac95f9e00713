//! Optional zlib transform applied to embedded file contents

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{self, Read, Write};

/// Default zlib level for embedded content
pub const DEFAULT_LEVEL: u32 = 9;

/// Compress `data` into a zlib stream at `level` (clamped to 1..=9)
pub fn compress(data: &[u8], level: u32) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2),
        Compression::new(level.clamp(1, 9)),
    );
    encoder.write_all(data)?;
    encoder.finish()
}

/// Inflate a zlib stream produced by [`compress`]
pub fn decompress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}
