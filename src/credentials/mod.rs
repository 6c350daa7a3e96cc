//! Credential resolution: local cache, remote store, resolver

pub mod aws;
pub mod cache;
pub mod remote;
pub mod resolver;

pub use aws::AwsCliSecretStore;
pub use cache::LocalCache;
pub use remote::{SecretPolicy, SecretStore};
pub use resolver::{CredentialResolver, SecretRef, StackIdentity, TEST_MODE_SECRET};
