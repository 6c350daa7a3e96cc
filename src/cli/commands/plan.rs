//! Plan command - resolve the secret and print the access plan

use crate::access::{create_strategy, PlanRequest};
use crate::cli::args::{PlanArgs, PlanFormat};
use crate::config::Config;
use crate::credentials::{CredentialResolver, StackIdentity};
use crate::error::SecureApiResult;

/// Execute the plan command
pub async fn execute(args: PlanArgs, config: &Config, test_mode: bool) -> SecureApiResult<()> {
    let mut config = config.clone();
    if let Some(mode) = args.mode {
        config.api.mode = mode;
    }

    let request = PlanRequest {
        stack: StackIdentity::new(args.stack).with_account(args.account),
        methods: args.methods,
        test_mode,
    };

    let strategy = create_strategy(&config);
    let resolver = CredentialResolver::from_config(&config);
    let plan = strategy.plan(&request, &resolver).await?;

    let rendered = match args.format {
        PlanFormat::Json => serde_json::to_string_pretty(&plan)?,
        PlanFormat::Toml => toml::to_string_pretty(&plan)?,
    };
    println!("{}", rendered);

    Ok(())
}
