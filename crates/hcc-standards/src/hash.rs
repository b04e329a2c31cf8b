#![deny(unsafe_code)]

use std::path::Path;

use sha2::Digest;

use crate::error::StandardsError;

/// Lower-case hex sha256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(sha2::Sha256::digest(bytes))
}

/// Reads a table file and returns its bytes with their digest.
///
/// A missing file maps to [`StandardsError::MissingFile`] so manifest errors
/// point at the listed path rather than a bare I/O error.
pub fn read_with_digest(path: &Path) -> Result<(Vec<u8>, String), StandardsError> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StandardsError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            StandardsError::io(path, e)
        }
    })?;
    let digest = sha256_hex(&bytes);
    Ok((bytes, digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
