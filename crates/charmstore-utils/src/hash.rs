/// Computes the blake3 digest of an in-memory buffer as a lowercase hex string.
pub fn checksum_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Compares a buffer against an expected hex digest, ignoring case.
pub fn verify_bytes(data: &[u8], expected: &str) -> bool {
    checksum_bytes(data).eq_ignore_ascii_case(expected.trim())
}
