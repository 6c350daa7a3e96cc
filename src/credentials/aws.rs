//! AWS secret store using the AWS CLI
//!
//! Parameters live in SSM Parameter Store as `SecureString`; random values
//! come from Secrets Manager `get-random-password`.

use crate::config::schema::AwsConfig;
use crate::credentials::remote::{SecretPolicy, SecretStore};
use crate::error::{SecureApiError, SecureApiResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

const GET_PARAMETER: &str = "ssm get-parameter";
const PUT_PARAMETER: &str = "ssm put-parameter";
const GET_RANDOM_PASSWORD: &str = "secretsmanager get-random-password";

/// SSM + Secrets Manager store driven through the `aws` CLI
#[derive(Debug, Clone, Default)]
pub struct AwsCliSecretStore {
    profile: Option<String>,
    region: Option<String>,
    key_id: Option<String>,
    program: Option<PathBuf>,
}

impl AwsCliSecretStore {
    /// Create a store from AWS settings
    pub fn new(config: &AwsConfig) -> Self {
        Self {
            profile: config.effective_profile(),
            region: config.region.clone(),
            key_id: config.key_id.clone(),
            program: None,
        }
    }

    /// Use `program` instead of the `aws` found on PATH
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    fn command(&self, args: &[&str]) -> Command {
        let program = self.program.as_deref().unwrap_or(Path::new("aws"));
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.args(["--output", "json"]);

        if let Some(profile) = &self.profile {
            cmd.args(["--profile", profile]);
        }

        if let Some(region) = &self.region {
            cmd.args(["--region", region]);
        }

        cmd
    }

    /// Run a command, returning stdout on success or stderr on failure
    async fn run(
        &self,
        mut cmd: Command,
        operation: &str,
        name: &str,
    ) -> SecureApiResult<Result<Vec<u8>, String>> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SecureApiError::AwsCliNotFound {
                    operation: operation.to_string(),
                    name: name.to_string(),
                }
            } else {
                SecureApiError::remote(operation, name, e.to_string())
            }
        })?;

        if output.status.success() {
            Ok(Ok(output.stdout))
        } else {
            Ok(Err(String::from_utf8_lossy(&output.stderr).trim().to_string()))
        }
    }
}

#[async_trait]
impl SecretStore for AwsCliSecretStore {
    async fn get_parameter(&self, name: &str) -> SecureApiResult<Option<String>> {
        debug!("Fetching SSM parameter {}", name);

        let cmd = self.command(&["ssm", "get-parameter", "--name", name, "--with-decryption"]);
        let stdout = match self.run(cmd, GET_PARAMETER, name).await? {
            Ok(stdout) => stdout,
            Err(stderr) if is_parameter_not_found(&stderr) => {
                warn!("Parameter {} does not exist in the AWS account", name);
                return Ok(None);
            }
            Err(stderr) => return Err(classify_failure(GET_PARAMETER, name, &stderr)),
        };

        let response: GetParameterResponse = serde_json::from_slice(&stdout).map_err(|e| {
            SecureApiError::remote(
                GET_PARAMETER,
                name,
                format!("Failed to parse response: {}", e),
            )
        })?;

        Ok(Some(response.parameter.value))
    }

    async fn put_parameter(&self, name: &str, value: &str) -> SecureApiResult<()> {
        // The value goes through an owner-only request file, never argv
        let request = PutParameterRequest {
            name,
            value,
            kind: "SecureString",
            tier: "Standard",
            data_type: "text",
            overwrite: false,
            key_id: self.key_id.as_deref(),
        };
        let request_file = write_request(&request)
            .map_err(|e| SecureApiError::remote(PUT_PARAMETER, name, e.to_string()))?;
        let input_arg = format!("file://{}", request_file.path().display());

        let args = ["ssm", "put-parameter", "--cli-input-json", input_arg.as_str()];
        let stdout = self
            .run(self.command(&args), PUT_PARAMETER, name)
            .await?
            .map_err(|stderr| classify_failure(PUT_PARAMETER, name, &stderr))?;
        drop(request_file);

        match serde_json::from_slice::<PutParameterResponse>(&stdout) {
            Ok(response) => debug!(
                "Parameter {} stored with version {} and tier {}",
                name,
                response.version,
                response.tier.as_deref().unwrap_or("Standard")
            ),
            Err(e) => debug!("Parameter {} stored (unparsed response: {})", name, e),
        }

        Ok(())
    }

    async fn generate_random_secret(&self, policy: &SecretPolicy) -> SecureApiResult<String> {
        let length = policy.length.to_string();
        let exclude_arg = format!("--exclude-characters={}", policy.exclude_chars);
        let mut args = vec![
            "secretsmanager",
            "get-random-password",
            "--password-length",
            length.as_str(),
        ];
        if !policy.exclude_chars.is_empty() {
            args.push(exclude_arg.as_str());
        }

        let target = format!("password of length {}", policy.length);
        let stdout = self
            .run(self.command(&args), GET_RANDOM_PASSWORD, &target)
            .await?
            .map_err(|stderr| classify_failure(GET_RANDOM_PASSWORD, &target, &stderr))?;

        let response: RandomPasswordResponse = serde_json::from_slice(&stdout).map_err(|e| {
            SecureApiError::remote(
                GET_RANDOM_PASSWORD,
                &target,
                format!("Failed to parse response: {}", e),
            )
        })?;

        Ok(response.random_password)
    }

    fn store_name(&self) -> &'static str {
        "AWS SSM Parameter Store"
    }
}

/// Stage a request for `--cli-input-json`; removed when the handle drops
fn write_request<T: Serialize>(request: &T) -> std::io::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("secure-api-request-")
        .suffix(".json")
        .tempfile()?;
    serde_json::to_writer(file.as_file_mut(), request)?;
    file.as_file_mut().flush()?;
    Ok(file)
}

fn is_parameter_not_found(stderr: &str) -> bool {
    stderr.contains("ParameterNotFound")
}

/// Map CLI stderr to an error naming the call and the parameter involved
fn classify_failure(operation: &str, name: &str, stderr: &str) -> SecureApiError {
    if stderr.contains("Unable to locate credentials")
        || (stderr.contains("config profile") && stderr.contains("could not be found"))
        || stderr.contains("not configured")
    {
        return SecureApiError::AwsNotConfigured {
            operation: operation.to_string(),
            name: name.to_string(),
        };
    }

    let reason = if stderr.is_empty() {
        "aws CLI exited with an error".to_string()
    } else {
        stderr.to_string()
    };
    SecureApiError::remote(operation, name, reason)
}

#[derive(Deserialize)]
struct GetParameterResponse {
    #[serde(rename = "Parameter")]
    parameter: Parameter,
}

#[derive(Deserialize)]
struct Parameter {
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PutParameterRequest<'a> {
    name: &'a str,
    value: &'a str,
    #[serde(rename = "Type")]
    kind: &'a str,
    tier: &'a str,
    data_type: &'a str,
    overwrite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutParameterResponse {
    #[serde(rename = "Version")]
    version: u64,
    #[serde(rename = "Tier")]
    tier: Option<String>,
}

#[derive(Deserialize)]
struct RandomPasswordResponse {
    #[serde(rename = "RandomPassword")]
    random_password: String,
}
