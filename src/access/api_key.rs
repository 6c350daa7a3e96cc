//! API key access: every method requires the `x-api-key` header

use crate::access::plan::{AccessPlan, ApiKeyPlan, Authorization, StackOutput, UsagePlan};
use crate::access::{endpoint_output, root_methods, AccessMode, AccessStrategy, PlanRequest};
use crate::config::schema::ApiConfig;
use crate::credentials::{CredentialResolver, SecretRef};
use crate::error::SecureApiResult;
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

/// API key + usage plan strategy
pub struct ApiKeyAccess {
    api: ApiConfig,
    purpose: String,
}

impl ApiKeyAccess {
    pub fn new(api: ApiConfig, purpose: impl Into<String>) -> Self {
        Self {
            api,
            purpose: purpose.into(),
        }
    }
}

#[async_trait]
impl AccessStrategy for ApiKeyAccess {
    fn mode(&self) -> AccessMode {
        AccessMode::ApiKey
    }

    async fn plan(
        &self,
        request: &PlanRequest,
        resolver: &CredentialResolver,
    ) -> SecureApiResult<AccessPlan> {
        let methods = root_methods(&request.methods, Authorization::ApiKey)?;
        let stack_name = &request.stack.stack_name;

        let secret = SecretRef::for_stack(&request.stack, &self.purpose);
        let value = resolver.resolve(&secret, request.test_mode).await?;
        debug!("Planning API key access for {}", stack_name);

        let outputs = vec![
            endpoint_output(self.api.override_endpoint_name),
            StackOutput {
                name: "APIKey".to_string(),
                value: value.clone(),
                // Unique per account + region
                export_name: Some(format!("x-api-key:{}", stack_name)),
            },
        ];

        Ok(AccessPlan {
            stack_name: stack_name.clone(),
            mode: AccessMode::ApiKey,
            generated_at: Utc::now(),
            api_key: Some(ApiKeyPlan {
                id: format!("{}-api-key", stack_name),
                name: stack_name.clone(),
                value,
            }),
            usage_plan: Some(UsagePlan {
                name: format!("{}-usage-plan", stack_name),
                throttle: self.api.throttle.clone(),
                quota: self.api.quota.clone(),
            }),
            iam: None,
            methods,
            outputs,
        })
    }
}
