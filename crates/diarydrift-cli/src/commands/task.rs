use diarydrift_core::models::{Task, TaskDraft};
use diarydrift_core::{AppContext, DatabaseService};

use crate::cli::TaskCommands;
use crate::commands::common::{
    confirm, format_timestamp, preview, relative_time_label, resolve_task, short_id,
};
use crate::error::CliError;

pub async fn run_task(
    command: TaskCommands,
    db: &DatabaseService,
    context: &AppContext,
) -> Result<(), CliError> {
    match command {
        TaskCommands::Add { title, description } => {
            let draft = TaskDraft::new(title.trim(), description)
                .owned_by(context.user_id().map(str::to_string));
            let id = db.create_task(&draft).await?;
            println!("{id}");
            Ok(())
        }
        TaskCommands::List { mine, json } => {
            let tasks = if mine {
                let user_id = context.user_id().ok_or(CliError::AccountRequired)?;
                db.list_tasks_by_user(user_id).await?
            } else {
                db.list_tasks().await?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks yet.");
            } else {
                for line in format_task_lines(&tasks) {
                    println!("{line}");
                }
            }
            Ok(())
        }
        TaskCommands::Show { id, json } => {
            let task = resolve_task(&id, db).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("{}", task.title);
                println!("id:      {}", task.id);
                println!(
                    "created: {}",
                    format_timestamp(
                        diarydrift_core::util::parse_iso_timestamp(&task.date_created),
                        &task.date_created
                    )
                );
                if let Some(owner) = task.user_id.as_deref() {
                    println!("owner:   {owner}");
                }
                if !task.description.is_empty() {
                    println!();
                    println!("{}", task.description);
                }
            }
            Ok(())
        }
        TaskCommands::Edit {
            id,
            title,
            description,
        } => {
            if title.is_none() && description.is_none() {
                return Err(CliError::NothingToUpdate);
            }
            let task = resolve_task(&id, db).await?;
            let draft = TaskDraft {
                user_id: task.user_id.clone(),
                title: title.map_or(task.title, |value| value.trim().to_string()),
                description: description.unwrap_or(task.description),
            };
            draft.validate()?;
            db.update_task(&task.id, &draft).await?;
            println!("{}", task.id);
            Ok(())
        }
        TaskCommands::Delete { id, yes } => {
            let task = resolve_task(&id, db).await?;
            if !yes && !confirm(&format!("Delete task \"{}\"?", task.title))? {
                println!("Cancelled.");
                return Ok(());
            }
            db.delete_task(&task.id).await?;
            println!("Deleted {}", task.id);
            Ok(())
        }
    }
}

pub fn format_task_lines(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| {
            format!(
                "{:<13}  {:<40}  {}",
                short_id(&task.id.as_str()),
                preview(&task.title, 40),
                relative_time_label(diarydrift_core::util::parse_iso_timestamp(
                    &task.date_created
                ))
            )
        })
        .collect()
}
