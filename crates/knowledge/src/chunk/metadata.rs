//! Chunk fingerprinting.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 hash of text.
pub fn calculate_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_hash() {
        let hash = calculate_hash("Place the robber on the desert.");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, calculate_hash("Place the robber on the desert."));
        assert_ne!(hash, calculate_hash("Place the robber on a forest."));
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            calculate_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
