//! LZ4 section compression/decompression.

use crate::types::error::{IndexError, IndexResult};

/// Compress a section with LZ4 (prepend size for decompression).
pub fn compress_section(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(data)
}

/// Decompress an LZ4-compressed section.
pub fn decompress_section(data: &[u8]) -> IndexResult<Vec<u8>> {
    lz4_flex::decompress_size_prepended(data).map_err(|e| IndexError::Compression(e.to_string()))
}
