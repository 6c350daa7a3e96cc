//! Declarative access plan produced by an access strategy

use crate::access::{AccessMode, HttpMethod};
use crate::config::schema::{QuotaConfig, ThrottleConfig};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a deployment needs to provision access to the API
#[derive(Debug, Clone, Serialize)]
pub struct AccessPlan {
    pub stack_name: String,
    pub mode: AccessMode,
    pub generated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<ApiKeyPlan>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_plan: Option<UsagePlan>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam: Option<IamPlan>,

    pub methods: Vec<MethodPlan>,
    pub outputs: Vec<StackOutput>,
}

/// How a method authorizes callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Authorization {
    ApiKey,
    AwsIam,
}

/// A method on an API resource
#[derive(Debug, Clone, Serialize)]
pub struct MethodPlan {
    pub method: HttpMethod,
    pub resource: String,
    pub authorization: Authorization,
}

/// API key attached to the usage plan
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyPlan {
    pub id: String,
    pub name: String,
    pub value: String,
}

/// Usage plan limiting the API key
#[derive(Debug, Clone, Serialize)]
pub struct UsagePlan {
    pub name: String,
    pub throttle: ThrottleConfig,
    pub quota: QuotaConfig,
}

/// IAM identity allowed to invoke the API
#[derive(Debug, Clone, Serialize)]
pub struct IamPlan {
    pub user_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RolePlan>,

    pub policy: InvokePolicy,
    pub secret: SecretPlan,
}

/// Role the IAM user assumes to invoke the API
#[derive(Debug, Clone, Serialize)]
pub struct RolePlan {
    pub name: String,
    pub assumed_by: String,
}

/// `execute-api:Invoke` grant
#[derive(Debug, Clone, Serialize)]
pub struct InvokePolicy {
    pub attached_to: String,
    pub actions: Vec<String>,
    pub resource: String,
}

/// Secrets Manager secret holding the caller's credentials
#[derive(Debug, Clone, Serialize)]
pub struct SecretPlan {
    pub name: String,
    pub payload: serde_json::Value,
}

/// CloudFormation stack output
#[derive(Debug, Clone, Serialize)]
pub struct StackOutput {
    pub name: String,
    pub value: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_name: Option<String>,
}

impl AccessPlan {
    /// Find a stack output by name
    pub fn output(&self, name: &str) -> Option<&StackOutput> {
        self.outputs.iter().find(|o| o.name == name)
    }
}
