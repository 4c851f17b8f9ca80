use std::env;

use diarydrift_core::models::MoodStyle;
use diarydrift_core::util::{is_http_url, normalize_text_option};

use crate::cli::ConfigCommands;
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

/// Values given to `config init`; `None` keeps what the profile already has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub sync_token_endpoint: Option<String>,
    pub database_url: Option<String>,
    pub database_token: Option<String>,
    pub refresh_interval_secs: Option<u64>,
    pub theme: Option<MoodStyle>,
}

impl ProfileUpdate {
    /// Fill unset endpoints from the environment.
    #[must_use]
    pub fn with_env_fallbacks(mut self) -> Self {
        let from_env = |name: &str| normalize_text_option(env::var(name).ok());
        self.supabase_url =
            normalize_text_option(self.supabase_url).or_else(|| from_env("SUPABASE_URL"));
        self.supabase_anon_key = normalize_text_option(self.supabase_anon_key)
            .or_else(|| from_env("SUPABASE_ANON_KEY"));
        self.sync_token_endpoint = normalize_text_option(self.sync_token_endpoint)
            .or_else(|| from_env("DIARYDRIFT_SYNC_TOKEN_ENDPOINT"));
        self
    }
}

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            supabase_url,
            supabase_anon_key,
            sync_token_endpoint,
            database_url,
            database_token,
            refresh_interval,
            mood_style,
            no_activate,
        } => {
            let update = ProfileUpdate {
                supabase_url,
                supabase_anon_key,
                sync_token_endpoint,
                database_url,
                database_token,
                refresh_interval_secs: refresh_interval,
                theme: mood_style.map(MoodStyle::from),
            }
            .with_env_fallbacks();
            run_config_init(global_profile, update, !no_activate)
        }
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    update: ProfileUpdate,
    activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    apply_profile_update(&mut config, &profile_name, update, activate)?;

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    let profile = config
        .profile(&profile_name)
        .ok_or_else(|| CliError::Config("Failed to persist profile".to_string()))?;
    let missing_fields = missing_auth_fields(profile);
    if missing_fields.is_empty() {
        println!(
            "Profile '{profile_name}' is ready. Run `diarydrift auth login --email <email> --password <password>`."
        );
    } else if missing_fields.len() == 2 {
        println!("Profile '{profile_name}' runs in local-only mode (no auth configured).");
    } else {
        println!(
            "Profile '{}' is missing: {}",
            profile_name,
            missing_fields.join(", ")
        );
    }

    Ok(())
}

/// Merge `update` into the named profile and validate the result.
pub fn apply_profile_update(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    update: ProfileUpdate,
    activate: bool,
) -> Result<(), CliError> {
    let profile = config.profile_mut_or_default(profile_name);
    if let Some(value) = normalize_text_option(update.supabase_url) {
        profile.supabase_url = Some(value);
    }
    if let Some(value) = normalize_text_option(update.supabase_anon_key) {
        profile.supabase_anon_key = Some(value);
    }
    if let Some(value) = normalize_text_option(update.sync_token_endpoint) {
        profile.sync_token_endpoint = Some(value);
    }
    if let Some(value) = normalize_text_option(update.database_url) {
        profile.database_url = Some(value);
    }
    if let Some(value) = normalize_text_option(update.database_token) {
        profile.database_token = Some(value);
    }
    if let Some(secs) = update.refresh_interval_secs {
        if secs == 0 {
            return Err(CliError::Config(
                "refresh_interval must be at least 1 second".to_string(),
            ));
        }
        profile.refresh_interval_secs = Some(secs);
    }
    if let Some(style) = update.theme {
        profile.theme = Some(style);
    }

    validate_profile_urls(profile)?;

    if activate {
        config.active_profile = Some(profile_name.to_string());
    }
    Ok(())
}

fn missing_auth_fields(profile: &CliProfile) -> Vec<&'static str> {
    let mut missing_fields = Vec::new();
    if profile.supabase_url().is_none() {
        missing_fields.push("supabase_url");
    }
    if profile.supabase_anon_key().is_none() {
        missing_fields.push("supabase_anon_key");
    }
    missing_fields
}

fn validate_profile_urls(profile: &CliProfile) -> Result<(), CliError> {
    if let Some(url) = profile.supabase_url() {
        if !is_http_url(&url) {
            return Err(CliError::Config(
                "supabase_url must include http:// or https://".to_string(),
            ));
        }
    }
    if let Some(url) = profile.managed_sync_endpoint() {
        if !is_http_url(&url) {
            return Err(CliError::Config(
                "sync_token_endpoint must include http:// or https://".to_string(),
            ));
        }
    }
    Ok(())
}
