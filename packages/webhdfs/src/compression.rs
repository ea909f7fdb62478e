//! Transparent decompression of files read through `OPEN`.

use std::io::Read;

use flate2::read::{DeflateDecoder, GzDecoder};

/// File name suffixes whose payload is decompressed on read.
pub const COMPRESSED_SUFFIXES: &[&str] = &[".gz", ".deflate"];

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_compressed(path: &str) -> bool {
    COMPRESSED_SUFFIXES
        .iter()
        .any(|suffix| path.ends_with(suffix))
}

/// Decompress `data`, producing at most `limit` bytes of output.
///
/// Payloads starting with the gzip magic are read as gzip members; anything
/// else is treated as a raw deflate stream. Output beyond `limit` is
/// dropped, so a stream that expands past the requested length comes back
/// truncated.
pub fn decompress_bounded(data: &[u8], limit: u64) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    if data.starts_with(&GZIP_MAGIC) {
        GzDecoder::new(data).take(limit).read_to_end(&mut out)?;
    } else {
        DeflateDecoder::new(data).take(limit).read_to_end(&mut out)?;
    }
    Ok(out)
}
