use std::path::Path;

use quotesync_core::util::normalize_text_option;
use quotesync_core::SyncSettings;

use crate::cli::ConfigCommands;
use crate::commands::common::load_settings;
use crate::error::CliError;

#[derive(Debug, Default)]
pub struct ConfigInitArgs {
    pub endpoint: Option<String>,
    pub default_category: Option<String>,
    pub interval_secs: Option<u64>,
    pub fetch_limit: Option<usize>,
    pub manual_conflicts: Option<bool>,
}

pub fn run_config(command: ConfigCommands, config_path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            endpoint,
            default_category,
            interval,
            fetch_limit,
            manual_conflicts,
        } => {
            let args = ConfigInitArgs {
                endpoint,
                default_category,
                interval_secs: interval,
                fetch_limit,
                manual_conflicts,
            };
            run_config_init(args, config_path)
        }
        ConfigCommands::Show { json } => run_config_show(json, config_path),
    }
}

pub fn run_config_init(args: ConfigInitArgs, config_path: &Path) -> Result<(), CliError> {
    let existing = SyncSettings::load_from_path(config_path)?;
    let settings = merge_config_init(existing, args)?;
    settings.save_to_path(config_path)?;

    println!("Config written to {}", config_path.display());
    Ok(())
}

/// Overlay explicit `config init` flags on previously saved settings.
pub fn merge_config_init(
    mut settings: SyncSettings,
    args: ConfigInitArgs,
) -> Result<SyncSettings, CliError> {
    if let Some(endpoint) = normalize_text_option(args.endpoint) {
        settings.endpoint = endpoint.trim_end_matches('/').to_string();
    }
    if let Some(category) = normalize_text_option(args.default_category) {
        settings.default_category = category;
    }
    if let Some(interval_secs) = args.interval_secs {
        settings.interval_secs = interval_secs;
    }
    if let Some(fetch_limit) = args.fetch_limit {
        settings.fetch_limit = fetch_limit;
    }
    if let Some(manual) = args.manual_conflicts {
        settings.manual_conflict_mode = manual;
    }

    settings
        .validate()
        .map_err(|error| CliError::Config(error.to_string()))?;
    Ok(settings)
}

pub fn run_config_show(as_json: bool, config_path: &Path) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        "defaults (no config file)".to_string()
    };
    println!("source:               {source}");
    println!("endpoint:             {}", settings.endpoint);
    println!("default_category:     {}", settings.default_category);
    println!("fetch_limit:          {}", settings.fetch_limit);
    println!("interval_secs:        {}", settings.interval_secs);
    println!("timeout_secs:         {}", settings.timeout_secs);
    println!("manual_conflict_mode: {}", settings.manual_conflict_mode);
    Ok(())
}
