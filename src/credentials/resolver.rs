//! Credential resolution across the local cache and the remote store
//!
//! Lookup order is cache, then remote, then generate. A generated value is
//! written to the remote store before the cache so the cache never holds a
//! secret that failed to persist remotely. Cache failures are logged and
//! skipped; remote failures abort the resolution.

use crate::config::{Config, ConfigManager};
use crate::credentials::aws::AwsCliSecretStore;
use crate::credentials::cache::LocalCache;
use crate::credentials::remote::{SecretPolicy, SecretStore};
use crate::error::SecureApiResult;
use tracing::{debug, info, warn};

/// Value returned in test mode, without touching the cache or remote store
pub const TEST_MODE_SECRET: &str = "dummy-value-for-test";

/// Logical identity of the infrastructure unit being deployed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackIdentity {
    /// Stack name
    pub stack_name: String,

    /// AWS account id, when known
    pub account: Option<String>,
}

impl StackIdentity {
    pub fn new(stack_name: impl Into<String>) -> Self {
        Self {
            stack_name: stack_name.into(),
            account: None,
        }
    }

    pub fn with_account(mut self, account: Option<String>) -> Self {
        self.account = account.filter(|a| !a.is_empty());
        self
    }
}

/// Where a secret lives locally and remotely
///
/// The two names are independent: the logical key is a flat cache key,
/// the remote name is a hierarchical parameter path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    logical_key: String,
    remote_name: String,
}

impl SecretRef {
    pub fn new(logical_key: impl Into<String>, remote_name: impl Into<String>) -> Self {
        Self {
            logical_key: logical_key.into(),
            remote_name: remote_name.into(),
        }
    }

    /// `<stack>-<purpose>` locally (prefixed `<account>:` when known),
    /// `/<stack>/<purpose>` remotely
    pub fn for_stack(stack: &StackIdentity, purpose: &str) -> Self {
        let local = format!("{}-{}", stack.stack_name, purpose);
        let logical_key = match &stack.account {
            Some(account) => format!("{}:{}", account, local),
            None => local,
        };
        let remote_name = format!("/{}/{}", stack.stack_name, purpose);
        Self {
            logical_key,
            remote_name,
        }
    }

    pub fn logical_key(&self) -> &str {
        &self.logical_key
    }

    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }
}

/// Resolves secrets with as few remote calls as possible
pub struct CredentialResolver {
    cache: LocalCache,
    store: Box<dyn SecretStore>,
    policy: SecretPolicy,
}

impl CredentialResolver {
    /// Create a resolver generating new values with `policy`
    pub fn new(cache: LocalCache, store: Box<dyn SecretStore>, policy: SecretPolicy) -> Self {
        Self {
            cache,
            store,
            policy,
        }
    }

    /// Resolver backed by the AWS CLI and the configured cache root
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            LocalCache::in_root(ConfigManager::cache_root(config)),
            Box::new(AwsCliSecretStore::new(&config.aws)),
            config.secret.policy(),
        )
    }

    /// Local cache used by this resolver
    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Resolve the secret for `secret`, creating it if it exists nowhere
    pub async fn resolve(&self, secret: &SecretRef, test_mode: bool) -> SecureApiResult<String> {
        if test_mode {
            debug!("Test mode: using placeholder for {}", secret.logical_key());
            return Ok(TEST_MODE_SECRET.to_string());
        }

        match self.cache.get(secret.logical_key()).await {
            Ok(Some(value)) => {
                debug!("Using cached secret {}", secret.logical_key());
                return Ok(value);
            }
            Ok(None) => debug!("No cached secret for {}", secret.logical_key()),
            Err(e) => warn!("Skipping credential cache: {}", e),
        }

        if let Some(value) = self.store.get_parameter(secret.remote_name()).await? {
            info!(
                "Found {} in {}",
                secret.remote_name(),
                self.store.store_name()
            );
            self.cache_value(secret, &value).await;
            return Ok(value);
        }

        let value = self.store.generate_random_secret(&self.policy).await?;
        info!(
            "[{}] Creating new parameter in {}...",
            secret.remote_name(),
            self.store.store_name()
        );
        self.store.put_parameter(secret.remote_name(), &value).await?;
        self.cache_value(secret, &value).await;

        Ok(value)
    }

    /// Resolve from raw logical key and remote name
    pub async fn resolve_parts(
        &self,
        logical_key: &str,
        remote_name: &str,
        test_mode: bool,
    ) -> SecureApiResult<String> {
        self.resolve(&SecretRef::new(logical_key, remote_name), test_mode)
            .await
    }

    async fn cache_value(&self, secret: &SecretRef, value: &str) {
        if let Err(e) = self.cache.put(secret.logical_key(), value).await {
            // Remote already holds the value; the next run re-warms the cache
            warn!("Failed to cache {}: {}", secret.logical_key(), e);
        }
    }
}
