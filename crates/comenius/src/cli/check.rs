//! Provider health check command handler.

use comenius_models::{ProviderKind, ProvidersConfig};

/// Probes the named provider (or the configured default) and reports
/// whether it answers.
pub async fn check_provider(provider: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = ProvidersConfig::load()?;
    let kind = match provider {
        Some(name) => name.parse::<ProviderKind>()?,
        None => *config.default_provider(),
    };
    let source = config.source_for(kind)?;
    source.validate().await?;
    println!("{} is reachable", kind.as_str());
    Ok(())
}
