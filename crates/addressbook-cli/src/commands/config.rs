//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use addressbook_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "seed_enabled": config.seed_enabled,
                    "seed_url": config.seed_url,
                    "seed_count": config.seed_count,
                    "seed_timeout_secs": config.seed_timeout_secs,
                    "page_size": config.page_size,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:          {}", config.data_dir.display());
            println!("  seed_enabled:      {}", config.seed_enabled);
            println!("  seed_url:          {}", config.seed_url);
            println!("  seed_count:        {}", config.seed_count);
            println!("  seed_timeout_secs: {}", config.seed_timeout_secs);
            println!(
                "  page_size:         {}",
                config
                    .page_size
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "(all)".to_string())
            );
            println!(
                "  log_file:          {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let unset = value.is_empty() || value == "none";

    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "seed_enabled" => {
            config.seed_enabled = value
                .parse()
                .context("Invalid value for seed_enabled. Use 'true' or 'false'.")?;
        }
        "seed_url" => {
            config.seed_url = value.to_string();
        }
        "seed_count" => {
            config.seed_count = value
                .parse()
                .context("Invalid value for seed_count. Use a whole number.")?;
        }
        "seed_timeout_secs" => {
            config.seed_timeout_secs = value
                .parse()
                .context("Invalid value for seed_timeout_secs. Use a whole number.")?;
        }
        "page_size" => {
            config.page_size = if unset {
                None
            } else {
                Some(
                    value
                        .parse()
                        .context("Invalid value for page_size. Use a whole number or 'none'.")?,
                )
            };
        }
        "log_file" => {
            config.log_file = if unset { None } else { Some(value.into()) };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, seed_enabled, seed_url, seed_count, \
                 seed_timeout_secs, page_size, log_file",
                key
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();

        apply(&mut config, "seed_count", "5").unwrap();
        apply(&mut config, "page_size", "10").unwrap();
        apply(&mut config, "seed_enabled", "false").unwrap();

        assert_eq!(config.seed_count, 5);
        assert_eq!(config.page_size, Some(10));
        assert!(!config.seed_enabled);

        apply(&mut config, "page_size", "none").unwrap();
        assert_eq!(config.page_size, None);
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut config = Config::default();

        assert!(apply(&mut config, "seed_count", "many").is_err());
        assert!(apply(&mut config, "seed_enabled", "yes please").is_err());
        assert!(apply(&mut config, "colour", "blue").is_err());
    }

    #[test]
    fn test_set_writes_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let output = Output::new(OutputFormat::Quiet);

        set("seed_count".to_string(), "3".to_string(), Some(&path), &output).unwrap();

        let saved = Config::load_from_path(&path).unwrap();
        assert_eq!(saved.seed_count, 3);
    }
}
