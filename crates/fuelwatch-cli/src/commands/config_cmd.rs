//! `fuelwatch config` — profile management.

use std::io::IsTerminal;

use serde::Serialize;
use tabled::Tabled;

use fuelwatch_config as cfg;

use crate::cli::{ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn run(global: &GlobalOpts, command: ConfigCommand) -> Result<(), CliError> {
    match command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => {
            show(global);
            Ok(())
        }
        ConfigCommand::Path => {
            output::print_output(&cfg::config_path().display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Profiles => {
            profiles(global);
            Ok(())
        }
        ConfigCommand::SetToken { name } => set_token(global, name.as_deref()),
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Config(
            "config init is interactive and requires a terminal".into(),
        ));
    }

    let name: String = dialoguer::Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let database: String = dialoguer::Input::new()
        .with_prompt("Telemetry store URL")
        .interact_text()
        .map_err(prompt_err)?;

    let geocode: String = dialoguer::Input::new()
        .with_prompt("Reverse-geocoding URL")
        .default("https://nominatim.openstreetmap.org".into())
        .interact_text()
        .map_err(prompt_err)?;

    let officer: String = dialoguer::Input::new()
        .with_prompt("Officer name for reports")
        .default("Duty Officer".into())
        .interact_text()
        .map_err(prompt_err)?;

    let mut config = cfg::load_config_or_default();
    config.profiles.insert(
        name.clone(),
        cfg::Profile {
            database,
            geocode,
            auth_token: None,
            auth_token_env: None,
            officer: Some(officer),
            refresh_interval: None,
            insecure: None,
            timeout: None,
        },
    );
    if config.default_profile.is_none() {
        config.default_profile = Some(name.clone());
    }
    cfg::save_config(&config)?;

    output::print_output(
        &format!(
            "Profile '{name}' saved to {}",
            cfg::config_path().display()
        ),
        global.quiet,
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct ConfigView {
    path: String,
    default_profile: Option<String>,
    profiles: Vec<ProfileView>,
}

#[derive(Debug, Serialize)]
struct ProfileView {
    name: String,
    database: String,
    geocode: String,
    officer: Option<String>,
    // Plaintext tokens are never echoed back.
    has_auth_token: bool,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Database")]
    database: String,
    #[tabled(rename = "Default")]
    default: &'static str,
}

fn config_view(config: &cfg::Config) -> ConfigView {
    let mut profiles: Vec<ProfileView> = config
        .profiles
        .iter()
        .map(|(name, p)| ProfileView {
            name: name.clone(),
            database: p.database.clone(),
            geocode: p.geocode.clone(),
            officer: p.officer.clone(),
            has_auth_token: p.auth_token.is_some(),
        })
        .collect();
    profiles.sort_by(|a, b| a.name.cmp(&b.name));

    ConfigView {
        path: cfg::config_path().display().to_string(),
        default_profile: config.default_profile.clone(),
        profiles,
    }
}

fn show(global: &GlobalOpts) {
    let config = cfg::load_config_or_default();
    let view = config_view(&config);

    let rendered = output::render_single(
        &global.output,
        &view,
        |v| {
            let mut doc = format!("Config file: {}\n", v.path);
            doc.push_str(&format!(
                "Default profile: {}\n",
                v.default_profile.as_deref().unwrap_or("(none)")
            ));
            for p in &v.profiles {
                doc.push_str(&format!("\n[{}]\n  database: {}\n  geocode: {}\n", p.name, p.database, p.geocode));
                if let Some(ref officer) = p.officer {
                    doc.push_str(&format!("  officer: {officer}\n"));
                }
            }
            doc.pop();
            doc
        },
        |v| v.path.clone(),
    );
    output::print_output(&rendered, global.quiet);
}

fn profiles(global: &GlobalOpts) {
    let config = cfg::load_config_or_default();
    let view = config_view(&config);

    if view.profiles.is_empty() {
        output::print_output("No profiles configured. Run: fuelwatch config init", global.quiet);
        return;
    }

    let default = view.default_profile.clone().unwrap_or_default();
    let rendered = output::render_list(
        &global.output,
        &view.profiles,
        |p| ProfileRow {
            name: p.name.clone(),
            database: p.database.clone(),
            default: if p.name == default { "*" } else { "" },
        },
        |p| p.name.clone(),
    );
    output::print_output(&rendered, global.quiet);
}

fn set_token(global: &GlobalOpts, profile_flag: Option<&str>) -> Result<(), CliError> {
    let config = cfg::load_config_or_default();
    let name = profile_flag
        .map(String::from)
        .or_else(|| global.profile.clone())
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    if !std::io::stdin().is_terminal() {
        return Err(CliError::Config(
            "set-token is interactive and requires a terminal".into(),
        ));
    }

    let token: String = dialoguer::Password::new()
        .with_prompt(format!("Auth token for profile '{name}'"))
        .interact()
        .map_err(prompt_err)?;

    cfg::store_auth_token(&name, &token)?;
    output::print_output(
        &format!("Token stored in the system keyring for profile '{name}'."),
        global.quiet,
    );
    Ok(())
}

fn prompt_err(e: dialoguer::Error) -> CliError {
    CliError::Config(format!("prompt failed: {e}"))
}
