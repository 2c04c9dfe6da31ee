use sha2::{Digest, Sha256};

const HASH_LEN: usize = 16;

/// Cache key for a job description: the first 16 hex chars of the SHA-256 of
/// the trimmed text.
pub fn hash_job_description(job_description: &str) -> String {
    let digest = Sha256::digest(job_description.trim().as_bytes());
    let mut hex = format!("{digest:x}");
    hex.truncate(HASH_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_sixteen_lowercase_hex_chars() {
        let hash = hash_job_description("Senior Rust engineer");
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_ignores_surrounding_whitespace() {
        assert_eq!(
            hash_job_description("  Senior Rust engineer\n"),
            hash_job_description("Senior Rust engineer")
        );
    }

    #[test]
    fn test_known_digest_prefix() {
        // sha256("abc") = ba7816bf8f01cfea...
        assert_eq!(hash_job_description("abc"), "ba7816bf8f01cfea");
    }

    #[test]
    fn test_different_text_different_hash() {
        assert_ne!(hash_job_description("a"), hash_job_description("b"));
    }
}
