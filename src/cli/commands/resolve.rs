//! Resolve command - print the API secret for a stack

use crate::cli::args::ResolveArgs;
use crate::config::Config;
use crate::credentials::{CredentialResolver, SecretRef, StackIdentity};
use crate::error::SecureApiResult;
use tracing::debug;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config, test_mode: bool) -> SecureApiResult<()> {
    let stack = StackIdentity::new(args.stack).with_account(args.account);
    let purpose = args.purpose.as_deref().unwrap_or(&config.secret.purpose);
    let secret = SecretRef::for_stack(&stack, purpose);

    debug!(
        "Resolving {} (remote {})",
        secret.logical_key(),
        secret.remote_name()
    );

    let resolver = CredentialResolver::from_config(config);
    let value = resolver.resolve(&secret, test_mode).await?;

    println!("{}", value);
    Ok(())
}
