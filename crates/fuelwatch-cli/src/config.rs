//! CLI-side configuration resolution.
//!
//! Bridges `fuelwatch_config` profiles with `GlobalOpts` flag overrides.
//! This is the single boundary where CLI flags cross into core types.

use std::time::Duration;

use secrecy::SecretString;

use fuelwatch_config as cfg;
use fuelwatch_core::MonitorConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &cfg::Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `MonitorConfig` from the config file, profile, and CLI overrides.
pub fn resolve_monitor_config(global: &GlobalOpts) -> Result<MonitorConfig, CliError> {
    let config = cfg::load_config_or_default();
    let profile_name = active_profile_name(global, &config);

    let mut monitor_config = if let Some(profile) = config.profiles.get(&profile_name) {
        cfg::profile_to_monitor_config(profile, &profile_name)?
    } else if let Some(ref url_str) = global.database {
        // No profile -- build from CLI flags / env vars alone.
        let database_url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
            field: "database".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
        MonitorConfig {
            database_url,
            ..MonitorConfig::default()
        }
    } else if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&config),
        });
    } else {
        return Err(CliError::NoConfig {
            path: cfg::config_path().display().to_string(),
        });
    };

    // Flag overrides (flag > env > profile).
    if let Some(ref url_str) = global.database {
        monitor_config.database_url = url_str.parse().map_err(|_| CliError::Validation {
            field: "database".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
    }
    if let Some(ref token) = global.auth_token {
        monitor_config.auth_token = Some(SecretString::from(token.clone()));
    }
    if let Some(ref officer) = global.officer {
        monitor_config.officer = officer.clone();
    }
    if global.insecure {
        monitor_config.insecure_tls = true;
    }
    monitor_config.timeout = Duration::from_secs(global.timeout);

    tracing::debug!(
        profile = %profile_name,
        database = %monitor_config.database_url,
        "resolved monitor configuration"
    );
    Ok(monitor_config)
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &cfg::Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}
