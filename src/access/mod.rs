//! Access-control strategies for a secure REST API
//!
//! A strategy resolves the secrets it needs through the
//! [`CredentialResolver`] and describes what a deployment should provision
//! as an [`AccessPlan`].

pub mod api_key;
pub mod iam;
pub mod plan;

pub use api_key::ApiKeyAccess;
pub use iam::IamAccess;
pub use plan::{AccessPlan, Authorization, MethodPlan, StackOutput};

use crate::config::Config;
use crate::credentials::{CredentialResolver, StackIdentity};
use crate::error::{SecureApiError, SecureApiResult};
use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How callers authenticate against the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    /// `x-api-key` header checked by a usage plan
    #[default]
    ApiKey,
    /// SigV4-signed requests from a dedicated IAM identity
    Iam,
}

/// HTTP methods that can be attached to the API root resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Options,
    Get,
    Head,
    Put,
    Post,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to an access strategy
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Stack being deployed
    pub stack: StackIdentity,

    /// Methods to add on the root resource
    pub methods: Vec<HttpMethod>,

    /// Use the placeholder secret instead of live lookups
    pub test_mode: bool,
}

/// Access-control strategy
#[async_trait]
pub trait AccessStrategy: Send + Sync {
    /// Strategy kind
    fn mode(&self) -> AccessMode;

    /// Resolve secrets and build the access plan for `request`
    async fn plan(
        &self,
        request: &PlanRequest,
        resolver: &CredentialResolver,
    ) -> SecureApiResult<AccessPlan>;
}

/// Create the strategy selected by `api.mode`
pub fn create_strategy(config: &Config) -> Box<dyn AccessStrategy> {
    match config.api.mode {
        AccessMode::ApiKey => Box::new(ApiKeyAccess::new(
            config.api.clone(),
            config.secret.purpose.clone(),
        )),
        AccessMode::Iam => Box::new(IamAccess::new(
            config.api.clone(),
            config.iam.clone(),
            config.secret.purpose.clone(),
            config.aws.region.clone(),
        )),
    }
}

/// Method plans for the root resource; duplicates collapse, order is kept
pub(crate) fn root_methods(
    methods: &[HttpMethod],
    authorization: Authorization,
) -> SecureApiResult<Vec<MethodPlan>> {
    if methods.is_empty() {
        return Err(SecureApiError::NoMethods);
    }

    let mut seen = Vec::with_capacity(methods.len());
    for method in methods {
        if !seen.contains(method) {
            seen.push(*method);
        }
    }

    Ok(seen
        .into_iter()
        .map(|method| MethodPlan {
            method,
            resource: "/".to_string(),
            authorization,
        })
        .collect())
}

/// Stack output for the API endpoint URL
pub(crate) fn endpoint_output(override_name: bool) -> StackOutput {
    let name = if override_name {
        "APIEndpoint"
    } else {
        "Endpoint"
    };
    StackOutput {
        name: name.to_string(),
        value: "${RestApi.Url}".to_string(),
        export_name: None,
    }
}
