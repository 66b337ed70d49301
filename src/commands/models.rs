//! Model catalog command for Chatkeep
//!
//! Lists the models configured per provider. The configured default model is
//! always shown under the default provider, even when the catalog omits it.

use crate::config::Config;
use crate::error::Result;
use crate::providers::ProviderKind;
use colored::Colorize;
use prettytable::{format, row, Table};

/// One row of the model catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Provider offering the model
    pub provider: ProviderKind,
    /// Model name
    pub model: String,
    /// Whether this is the configured default provider and model
    pub is_default: bool,
}

/// Collect the catalog, optionally restricted to one provider
///
/// # Errors
///
/// Returns `ChatkeepError::UnsupportedProvider` if `provider_filter` is not a
/// recognized provider name
pub fn catalog(config: &Config, provider_filter: Option<&str>) -> Result<Vec<CatalogEntry>> {
    let kinds: Vec<ProviderKind> = match provider_filter {
        Some(name) => vec![name.parse()?],
        None => ProviderKind::ALL.to_vec(),
    };
    let default_kind = config.provider.provider_type.parse::<ProviderKind>().ok();

    let mut entries = Vec::new();
    for kind in kinds {
        let mut models: Vec<String> = config.provider.models_for(kind).to_vec();
        if Some(kind) == default_kind && !models.contains(&config.provider.model) {
            models.insert(0, config.provider.model.clone());
        }

        entries.extend(models.into_iter().map(|model| CatalogEntry {
            is_default: Some(kind) == default_kind && model == config.provider.model,
            provider: kind,
            model,
        }));
    }

    Ok(entries)
}

/// List configured models
///
/// # Errors
///
/// Returns `ChatkeepError::UnsupportedProvider` for an unknown provider filter
///
/// # Examples
///
/// ```no_run
/// use chatkeep::config::Config;
/// use chatkeep::commands::models::list_models;
///
/// # fn example() -> anyhow::Result<()> {
/// list_models(&Config::default(), Some("ollama"))?;
/// # Ok(())
/// # }
/// ```
pub fn list_models(config: &Config, provider_filter: Option<&str>) -> Result<()> {
    let entries = catalog(config, provider_filter)?;
    tracing::debug!("Model catalog has {} entries", entries.len());

    if entries.is_empty() {
        println!("{}", "No models configured.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row!["Provider".bold(), "Model".bold(), "Default".bold()]);

    for entry in entries {
        let marker = if entry.is_default { "*" } else { "" };
        table.add_row(row![entry.provider.as_str(), entry.model.green(), marker]);
    }

    println!("\nConfigured Models:");
    table.printstd();
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatkeepError;

    fn config_with_catalog() -> Config {
        let mut config = Config::default();
        config.provider.models.insert(
            "ollama".to_string(),
            vec!["mistral:7b".to_string(), "llama3.2:latest".to_string()],
        );
        config
            .provider
            .models
            .insert("groq".to_string(), vec!["llama-3.1-8b-instant".to_string()]);
        config
    }

    #[test]
    fn test_catalog_lists_every_provider() {
        let entries = catalog(&config_with_catalog(), None).unwrap();
        let models: Vec<&str> = entries.iter().map(|e| e.model.as_str()).collect();
        assert_eq!(
            models,
            vec!["mistral:7b", "llama3.2:latest", "llama-3.1-8b-instant"]
        );
    }

    #[test]
    fn test_catalog_marks_default() {
        let entries = catalog(&config_with_catalog(), Some("ollama")).unwrap();
        let defaults: Vec<&CatalogEntry> = entries.iter().filter(|e| e.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].model, "llama3.2:latest");
    }

    #[test]
    fn test_catalog_includes_default_model_when_unlisted() {
        let entries = catalog(&Config::default(), None).unwrap();
        assert_eq!(
            entries,
            vec![CatalogEntry {
                provider: ProviderKind::Ollama,
                model: "llama3.2:latest".to_string(),
                is_default: true,
            }]
        );
    }

    #[test]
    fn test_catalog_filter_unknown_provider() {
        let err = catalog(&Config::default(), Some("bedrock")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatkeepError>(),
            Some(ChatkeepError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_catalog_filter_without_models_is_empty() {
        assert!(catalog(&Config::default(), Some("openai")).unwrap().is_empty());
    }
}
