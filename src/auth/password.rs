// Credential hashing

use sha2::{Digest, Sha256};

/// One-way, deterministic credential digest
///
/// Unsalted: the same secret always yields the same digest. Login works by
/// comparing digests, never by reversing them.
pub struct PasswordService;

impl PasswordService {
    /// Hash a secret with SHA-256, hex encoded
    pub fn hash_password(password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Verify a secret against a stored digest
    pub fn verify_password(password: &str, digest: &str) -> bool {
        Self::hash_password(password) == digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            PasswordService::hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_digest_is_not_plaintext() {
        let digest = PasswordService::hash_password("hunter2");
        assert_ne!(digest, "hunter2");
        assert_eq!(digest.len(), 64);
    }

    proptest! {
        #[test]
        fn prop_hash_is_deterministic(secret in ".{0,64}") {
            prop_assert_eq!(
                PasswordService::hash_password(&secret),
                PasswordService::hash_password(&secret)
            );
            prop_assert!(PasswordService::verify_password(&secret, &PasswordService::hash_password(&secret)));
        }

        #[test]
        fn prop_different_secrets_do_not_verify(a in "[a-z]{1,16}", b in "[A-Z]{1,16}") {
            let digest = PasswordService::hash_password(&a);
            prop_assert!(!PasswordService::verify_password(&b, &digest));
        }
    }
}
