use diarydrift_core::auth::AuthUser;
use diarydrift_core::media::{prepare_photo, PhotoOptions};
use diarydrift_core::models::{UserProfile, UserProfilePatch};
use diarydrift_core::util::normalize_text_option;
use diarydrift_core::{AppContext, DatabaseService};

use crate::cli::ProfileCommands;
use crate::commands::common::confirm;
use crate::error::CliError;

/// Avatars are stored smaller than journal photos.
const AVATAR_SIZE: u32 = 512;

pub async fn run_profile(
    command: ProfileCommands,
    db: &DatabaseService,
    context: &AppContext,
) -> Result<(), CliError> {
    let user = context.current_user().ok_or(CliError::AccountRequired)?;

    match command {
        ProfileCommands::Show { json } => {
            let profile = db
                .get_user_profile(&user.id, Some(user))
                .await?
                .ok_or_else(|| missing_profile(user))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                print!("{}", render_profile(&profile));
            }
            Ok(())
        }
        ProfileCommands::Update {
            display_name,
            full_name,
            phone_number,
        } => {
            let patch = UserProfilePatch {
                display_name: normalize_text_option(display_name),
                full_name: normalize_text_option(full_name),
                phone_number: normalize_text_option(phone_number),
                ..UserProfilePatch::default()
            };
            if patch.is_empty() {
                return Err(CliError::NothingToUpdate);
            }

            let profile = db
                .update_user_profile(&user.id, &patch, Some(user))
                .await?
                .ok_or_else(|| missing_profile(user))?;
            print!("{}", render_profile(&profile));
            Ok(())
        }
        ProfileCommands::Image { path } => {
            let options = PhotoOptions {
                max_width: AVATAR_SIZE,
                max_height: AVATAR_SIZE,
                max_encoded_bytes: context.settings().max_media_bytes,
                ..PhotoOptions::default()
            };
            let prepared = prepare_photo(&std::fs::read(&path)?, options)?;
            db.update_profile_image(&user.id, prepared.base64, Some(user))
                .await?
                .ok_or_else(|| missing_profile(user))?;
            println!("Profile picture updated.");
            Ok(())
        }
        ProfileCommands::Delete { yes } => {
            if !yes && !confirm(&format!("Delete the profile for {}?", user.label()))? {
                println!("Cancelled.");
                return Ok(());
            }
            db.delete_user_profile(&user.id).await?;
            println!("Deleted profile for {}", user.label());
            Ok(())
        }
    }
}

fn missing_profile(user: &AuthUser) -> CliError {
    diarydrift_core::Error::NotFound(format!("profile for user {}", user.id)).into()
}

pub fn render_profile(profile: &UserProfile) -> String {
    let mut lines = vec![format!("email:        {}", profile.email)];
    let optional = [
        ("display name", profile.display_name.as_deref()),
        ("full name", profile.full_name.as_deref()),
        ("phone", profile.phone_number.as_deref()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{:<13} {value}", format!("{label}:")));
        }
    }
    lines.push(format!(
        "picture:      {}",
        if profile.profile_image.is_some() {
            "set"
        } else {
            "none"
        }
    ));
    lines.push(format!("following:    {}", profile.following));
    lines.push(format!("member since: {}", profile.created_at));
    let mut output = lines.join("\n");
    output.push('\n');
    output
}
