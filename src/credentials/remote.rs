//! Remote secret store abstraction
//!
//! The durable source of truth for secrets. Implementations map "not found"
//! to `Ok(None)` and report every other failure as a remote error so callers
//! never mistake an unreachable store for an empty one.

use crate::error::SecureApiResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Policy for generating random secret values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretPolicy {
    /// Number of characters to generate
    pub length: u32,

    /// Characters that must not appear in the value
    pub exclude_chars: String,
}

impl SecretPolicy {
    /// Characters that are awkward in HTTP headers, shells or URLs
    pub const HEADER_UNSAFE_CHARS: &'static str = " ^,%+~`#$&*()|[]{}:;<>?!'/@\"\\";

    /// Create a policy with an explicit length and exclusion set
    pub fn new(length: u32, exclude_chars: impl Into<String>) -> Self {
        Self {
            length,
            exclude_chars: exclude_chars.into(),
        }
    }

    /// Policy for values sent in the `x-api-key` header
    pub fn api_key() -> Self {
        Self::new(40, Self::HEADER_UNSAFE_CHARS)
    }

    /// Whether `c` may appear in a generated value
    pub fn allows(&self, c: char) -> bool {
        !self.exclude_chars.contains(c)
    }
}

impl Default for SecretPolicy {
    fn default() -> Self {
        Self::api_key()
    }
}

/// Remote parameter / secret service
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a parameter by name, `None` if it does not exist
    async fn get_parameter(&self, name: &str) -> SecureApiResult<Option<String>>;

    /// Create a parameter; an existing parameter of the same name is an error
    async fn put_parameter(&self, name: &str, value: &str) -> SecureApiResult<()>;

    /// Generate a cryptographically strong random value
    async fn generate_random_secret(&self, policy: &SecretPolicy) -> SecureApiResult<String>;

    /// Human-readable backend name for display
    fn store_name(&self) -> &'static str;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_policy_excludes_header_hostile_chars() {
        let policy = SecretPolicy::api_key();
        assert_eq!(policy.length, 40);
        for c in [' ', '"', '\\', '/', '@', ':', ',', '%'] {
            assert!(!policy.allows(c), "{c:?} should be excluded");
        }
        assert!(policy.allows('a'));
        assert!(policy.allows('Z'));
        assert!(policy.allows('7'));
    }

    #[test]
    fn policy_is_parameterized() {
        let policy = SecretPolicy::new(16, "abc");
        assert!(!policy.allows('a'));
        assert!(policy.allows('@'));
    }

    #[tokio::test]
    async fn mock_generates_within_policy() {
        let store = mock::MockSecretStore::new();
        let policy = SecretPolicy::new(50, "0123456789");

        let value = store.generate_random_secret(&policy).await.unwrap();
        assert_eq!(value.len(), 50);
        assert!(value.chars().all(|c| policy.allows(c)));
    }
}
