use std::path::Path;

use diarydrift_core::auth::{AuthUser, SignUpOutcome};

use crate::auth::{clear_stored_session, load_stored_session, AuthService};
use crate::cli::AuthCommands;
use crate::commands::common::ActiveProfile;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub async fn run_auth(
    command: AuthCommands,
    global_profile: Option<&str>,
    db_path: &Path,
) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);

    match command {
        AuthCommands::Login { email, password } => {
            let auth_service = require_auth_service(&config, &profile_name)?;
            let session = auth_service
                .sign_in(&email, &password)
                .await
                .map_err(|error| CliError::Auth(error.to_string()))?;
            println!(
                "Signed in profile '{profile_name}' as {}",
                session.user.label()
            );
            ensure_user_profile(&profile_name, &session.user, db_path).await;
            Ok(())
        }
        AuthCommands::Register {
            email,
            password,
            confirm_password,
        } => {
            if password != confirm_password {
                return Err(CliError::PasswordMismatch);
            }
            let auth_service = require_auth_service(&config, &profile_name)?;
            let outcome = auth_service
                .register(&email, &password, &confirm_password)
                .await
                .map_err(|error| CliError::Auth(error.to_string()))?;

            match outcome {
                SignUpOutcome::SignedIn(session) => {
                    println!(
                        "Registration successful. Signed in profile '{profile_name}' as {}",
                        session.user.label()
                    );
                    ensure_user_profile(&profile_name, &session.user, db_path).await;
                }
                SignUpOutcome::ConfirmationRequired => {
                    println!(
                        "Registration successful. Confirm your email address, then run `diarydrift auth login`."
                    );
                }
            }
            Ok(())
        }
        AuthCommands::Status => {
            let Some(profile) = config.profile(&profile_name) else {
                println!("Profile '{profile_name}' is not configured (local-only mode).");
                return Ok(());
            };

            let maybe_auth_service = AuthService::new_for_profile(&profile_name, profile)
                .map_err(|error| CliError::Auth(error.to_string()))?;
            let session = if let Some(service) = maybe_auth_service {
                service
                    .restore_session()
                    .await
                    .map_err(|error| CliError::Auth(error.to_string()))?
            } else {
                println!("Profile '{profile_name}' has no auth configured (local-only mode).");
                return Ok(());
            };

            if let Some(session) = session {
                println!(
                    "Profile '{}' is signed in as {} (expires_at={})",
                    profile_name,
                    session.user.label(),
                    session.expires_at
                );
            } else {
                println!("Profile '{profile_name}' is not signed in.");
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let stored_session = load_stored_session(&profile_name)
                .map_err(|error| CliError::Auth(error.to_string()))?;
            let maybe_auth_service = config
                .profile(&profile_name)
                .map(|profile| AuthService::new_for_profile(&profile_name, profile))
                .transpose()
                .map_err(|error| CliError::Auth(error.to_string()))?
                .flatten();

            if let (Some(service), Some(session)) = (maybe_auth_service, stored_session) {
                service
                    .sign_out(&session.access_token)
                    .await
                    .map_err(|error| CliError::Auth(error.to_string()))?;
            } else {
                clear_stored_session(&profile_name)
                    .map_err(|error| CliError::Auth(error.to_string()))?;
            }

            println!("Signed out profile '{profile_name}'");
            Ok(())
        }
    }
}

fn require_auth_service(
    config: &CliProfilesConfig,
    profile_name: &str,
) -> Result<AuthService, CliError> {
    let profile = config.profile(profile_name).ok_or_else(|| {
        CliError::Config(format!(
            "Profile '{profile_name}' is not configured. Run `diarydrift config init --profile {profile_name}` first."
        ))
    })?;
    AuthService::new_for_profile(profile_name, profile)
        .map_err(|error| CliError::Auth(error.to_string()))?
        .ok_or_else(|| {
            CliError::Config(format!(
                "Profile '{profile_name}' is missing auth config. Set --supabase-url and --supabase-anon-key via `diarydrift config init`."
            ))
        })
}

/// Make sure the signed-in user has a profile document. Failure here does not
/// undo the sign-in.
async fn ensure_user_profile(profile_name: &str, user: &AuthUser, db_path: &Path) {
    let result = async {
        let active = ActiveProfile::load(Some(profile_name)).await?;
        let db = active.open_database(db_path).await?;
        db.create_user_profile(user).await?;
        Ok::<_, CliError>(())
    }
    .await;

    if let Err(error) = result {
        tracing::warn!("Signed in, but could not prepare the user profile: {}", error);
    }
}
