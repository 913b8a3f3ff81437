//! Capped file reads for tileset archives.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Maximum allowed tileset archive size for reading into memory.
pub const MAX_TILESET_BYTES: u64 = 64 * 1024 * 1024; // 64 MiB

/// Read a file into memory, failing if it holds more than `max_bytes`.
///
/// The cap is enforced on the bytes actually read, so a file growing after
/// it was opened cannot slip past it.
pub fn read_file_with_limit(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mut data = Vec::new();
    file.take(max_bytes.saturating_add(1))
        .read_to_end(&mut data)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    if data.len() as u64 > max_bytes {
        anyhow::bail!(
            "File too large: {} (more than {} bytes)",
            path.display(),
            max_bytes
        );
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_within_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Pa0_jyotyu.szs");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        assert_eq!(read_file_with_limit(&path, 3).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_read_over_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.szs");
        std::fs::write(&path, [0u8; 16]).unwrap();
        let err = read_file_with_limit(&path, 8).unwrap_err();
        assert!(err.to_string().contains("File too large"));
    }

    #[test]
    fn test_read_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file_with_limit(&dir.path().join("none.szs"), 8).unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
    }
}
