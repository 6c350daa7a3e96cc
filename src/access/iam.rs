//! IAM access: methods require SigV4 requests from a dedicated IAM user
//!
//! The user's access key and the resolved API secret are bundled into a
//! Secrets Manager payload so callers have a single place to fetch them.

use crate::access::plan::{
    AccessPlan, Authorization, IamPlan, InvokePolicy, RolePlan, SecretPlan, StackOutput,
};
use crate::access::{endpoint_output, root_methods, AccessMode, AccessStrategy, PlanRequest};
use crate::config::schema::{ApiConfig, IamConfig};
use crate::credentials::{CredentialResolver, SecretRef};
use crate::error::SecureApiResult;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::debug;

/// IAM user / role strategy
pub struct IamAccess {
    api: ApiConfig,
    iam: IamConfig,
    purpose: String,
    region: Option<String>,
}

impl IamAccess {
    pub fn new(
        api: ApiConfig,
        iam: IamConfig,
        purpose: impl Into<String>,
        region: Option<String>,
    ) -> Self {
        Self {
            api,
            iam,
            purpose: purpose.into(),
            region,
        }
    }

    fn secret_name(&self, stack_name: &str) -> String {
        self.iam
            .secret_name
            .clone()
            .unwrap_or_else(|| format!("{}/api-credentials", stack_name))
    }
}

#[async_trait]
impl AccessStrategy for IamAccess {
    fn mode(&self) -> AccessMode {
        AccessMode::Iam
    }

    async fn plan(
        &self,
        request: &PlanRequest,
        resolver: &CredentialResolver,
    ) -> SecureApiResult<AccessPlan> {
        let methods = root_methods(&request.methods, Authorization::AwsIam)?;
        let stack_name = &request.stack.stack_name;

        let secret = SecretRef::for_stack(&request.stack, &self.purpose);
        let api_secret = resolver.resolve(&secret, request.test_mode).await?;

        let region = self.region.as_deref().unwrap_or("*");
        let account = request.stack.account.as_deref().unwrap_or("*");
        let user_name = format!("{}-invoker", stack_name);

        let role = self.iam.use_role.then(|| RolePlan {
            name: format!("{}-invoke-role", stack_name),
            assumed_by: user_name.clone(),
        });
        let attached_to = role
            .as_ref()
            .map(|r| r.name.clone())
            .unwrap_or_else(|| user_name.clone());
        debug!("Planning IAM access for {} via {}", stack_name, attached_to);

        let mut payload = json!({
            "user_name": user_name,
            "access_key_id": "${AccessKey.Ref}",
            "secret_access_key": "${AccessKey.SecretAccessKey}",
            "api_secret": api_secret,
            "region": region,
        });
        if let Some(role) = &role {
            payload["role_arn"] = json!(format!("arn:aws:iam::{}:role/{}", account, role.name));
        }

        let secret_name = self.secret_name(stack_name);
        let outputs = vec![
            endpoint_output(self.api.override_endpoint_name),
            StackOutput {
                name: "APICredentialsSecret".to_string(),
                value: secret_name.clone(),
                export_name: Some(format!("iam-secret:{}", stack_name)),
            },
        ];

        Ok(AccessPlan {
            stack_name: stack_name.clone(),
            mode: AccessMode::Iam,
            generated_at: Utc::now(),
            api_key: None,
            usage_plan: None,
            iam: Some(IamPlan {
                user_name,
                role,
                policy: InvokePolicy {
                    attached_to,
                    actions: vec!["execute-api:Invoke".to_string()],
                    resource: format!("arn:aws:execute-api:{}:{}:*/*/*/*", region, account),
                },
                secret: SecretPlan {
                    name: secret_name,
                    payload,
                },
            }),
            methods,
            outputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::HttpMethod;
    use crate::credentials::remote::mock::MockSecretStore;
    use crate::credentials::{LocalCache, SecretPolicy, StackIdentity, TEST_MODE_SECRET};
    use tempfile::TempDir;

    fn resolver(store: &MockSecretStore, temp: &TempDir) -> CredentialResolver {
        CredentialResolver::new(
            LocalCache::in_root(temp.path()),
            Box::new(store.clone()),
            SecretPolicy::api_key(),
        )
    }

    fn request(account: Option<&str>) -> PlanRequest {
        PlanRequest {
            stack: StackIdentity::new("billing").with_account(account.map(String::from)),
            methods: vec![HttpMethod::Post],
            test_mode: true,
        }
    }

    #[tokio::test]
    async fn user_policy_by_default() {
        let temp = TempDir::new().unwrap();
        let store = MockSecretStore::new();
        let strategy = IamAccess::new(
            ApiConfig::default(),
            IamConfig::default(),
            "api-key",
            Some("us-east-1".to_string()),
        );

        let plan = strategy
            .plan(&request(Some("123456789012")), &resolver(&store, &temp))
            .await
            .unwrap();

        assert_eq!(plan.mode, AccessMode::Iam);
        assert!(plan.api_key.is_none());
        assert!(plan.usage_plan.is_none());
        assert_eq!(plan.methods[0].authorization, Authorization::AwsIam);

        let iam = plan.iam.as_ref().unwrap();
        assert_eq!(iam.user_name, "billing-invoker");
        assert!(iam.role.is_none());
        assert_eq!(iam.policy.attached_to, "billing-invoker");
        assert_eq!(
            iam.policy.resource,
            "arn:aws:execute-api:us-east-1:123456789012:*/*/*/*"
        );
        assert_eq!(iam.secret.name, "billing/api-credentials");
        assert_eq!(iam.secret.payload["api_secret"], TEST_MODE_SECRET);
        assert!(iam.secret.payload.get("role_arn").is_none());
        assert_eq!(
            plan.output("APICredentialsSecret").unwrap().value,
            "billing/api-credentials"
        );
    }

    #[tokio::test]
    async fn role_when_configured() {
        let temp = TempDir::new().unwrap();
        let store = MockSecretStore::new();
        let iam_config = IamConfig {
            secret_name: Some("shared/billing-api".to_string()),
            use_role: true,
        };
        let strategy = IamAccess::new(ApiConfig::default(), iam_config, "api-key", None);

        let plan = strategy
            .plan(&request(None), &resolver(&store, &temp))
            .await
            .unwrap();

        let iam = plan.iam.unwrap();
        let role = iam.role.unwrap();
        assert_eq!(role.name, "billing-invoke-role");
        assert_eq!(role.assumed_by, "billing-invoker");
        assert_eq!(iam.policy.attached_to, "billing-invoke-role");
        assert_eq!(iam.policy.resource, "arn:aws:execute-api:*:*:*/*/*/*");
        assert_eq!(iam.secret.name, "shared/billing-api");
        assert_eq!(
            iam.secret.payload["role_arn"],
            "arn:aws:iam::*:role/billing-invoke-role"
        );
    }
}
