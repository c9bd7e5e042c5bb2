use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a string.
///
/// Used wherever a real email or alias address must be referenced in logs or
/// archival records without storing the address itself.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
