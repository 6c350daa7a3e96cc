//! Cache command - inspect the local credential cache

use crate::cli::args::{CacheAction, CacheArgs};
use crate::config::{Config, ConfigManager};
use crate::credentials::LocalCache;
use crate::error::SecureApiResult;
use console::style;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> SecureApiResult<()> {
    let cache = LocalCache::in_root(ConfigManager::cache_root(config));

    match args.action {
        CacheAction::Path => println!("{}", cache.path().display()),
        CacheAction::List { show_values } => list_entries(&cache, show_values).await?,
    }

    Ok(())
}

async fn list_entries(cache: &LocalCache, show_values: bool) -> SecureApiResult<()> {
    let entries = cache.entries().await?;

    if entries.is_empty() {
        println!("No cached credentials in {}", cache.path().display());
        return Ok(());
    }

    println!("{:<50} {}", style("KEY").bold(), style("VALUE").bold());
    println!("{}", "-".repeat(72));

    for (key, value) in &entries {
        let shown = if show_values {
            value.clone()
        } else {
            mask(value)
        };
        println!("{:<50} {}", key, shown);
    }

    println!();
    println!("{} credential(s)", entries.len());
    Ok(())
}

/// Keep the last four characters of long values
fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_keeps_tail_of_long_values() {
        assert_eq!(mask("abcdefghijkl"), "********ijkl");
    }

    #[test]
    fn mask_hides_short_values() {
        assert_eq!(mask("ABC123"), "******");
        assert_eq!(mask(""), "");
    }
}
