//! Configuration schema for secure-api
//!
//! Configuration is stored at `~/.config/secure-api/config.toml`

use crate::access::AccessMode;
use crate::credentials::SecretPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// AWS account settings used by the remote secret store
    pub aws: AwsConfig,

    /// Local credential cache settings
    pub cache: CacheConfig,

    /// Secret generation settings
    pub secret: SecretConfig,

    /// REST API access settings
    pub api: ApiConfig,

    /// IAM access settings (used when `api.mode = "iam"`)
    pub iam: IamConfig,
}

/// AWS settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// AWS region, e.g. `us-east-1`
    pub region: Option<String>,

    /// AWS profile to use (falls back to `AWS_PROFILE`)
    pub profile: Option<String>,

    /// KMS key id used to encrypt SecureString parameters.
    /// The account default key is used when unset.
    pub key_id: Option<String>,
}

impl AwsConfig {
    /// Profile from config, then from the `AWS_PROFILE` environment variable
    pub fn effective_profile(&self) -> Option<String> {
        self.profile
            .clone()
            .or_else(|| std::env::var("AWS_PROFILE").ok())
            .filter(|p| !p.is_empty())
    }
}

/// Local cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding the cache file (default: `~/.cache/secure-api`)
    pub root: Option<PathBuf>,
}

/// Secret generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretConfig {
    /// Purpose segment of the remote parameter name (`/<stack>/<purpose>`)
    pub purpose: String,

    /// Length of generated secrets
    pub length: u32,

    /// Characters never used in generated secrets
    pub exclude_chars: String,
}

impl Default for SecretConfig {
    fn default() -> Self {
        let policy = SecretPolicy::api_key();
        Self {
            purpose: "api-key".to_string(),
            length: policy.length,
            exclude_chars: policy.exclude_chars,
        }
    }
}

impl SecretConfig {
    /// Generation policy described by this section
    pub fn policy(&self) -> SecretPolicy {
        SecretPolicy::new(self.length, self.exclude_chars.clone())
    }
}

/// REST API access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Access-control strategy
    pub mode: AccessMode,

    /// Rename the generated endpoint output to `APIEndpoint`
    pub override_endpoint_name: bool,

    /// Usage plan throttling
    pub throttle: ThrottleConfig,

    /// Usage plan quota
    pub quota: QuotaConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            mode: AccessMode::ApiKey,
            override_endpoint_name: true,
            throttle: ThrottleConfig::default(),
            quota: QuotaConfig::default(),
        }
    }
}

/// Usage plan throttle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Maximum request burst
    pub burst_limit: u32,

    /// Steady-state requests per second
    pub rate_limit: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            burst_limit: 500,
            rate_limit: 1000,
        }
    }
}

/// Quota period for a usage plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuotaPeriod {
    Day,
    Week,
    Month,
}

/// Usage plan quota settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    /// Maximum requests per period
    pub limit: u64,

    /// Quota period
    pub period: QuotaPeriod,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            limit: 10_000_000,
            period: QuotaPeriod::Month,
        }
    }
}

/// IAM access settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IamConfig {
    /// Secrets Manager secret holding the invoker credentials
    /// (default: `<stack>/api-credentials`)
    pub secret_name: Option<String>,

    /// Grant access through an assumable role instead of a user policy
    pub use_role: bool,
}
