use std::fmt::Write as _;
use std::time::Duration;

use diarydrift_core::home::{load_home_summary, HomeSummary};
use diarydrift_core::refresh::RefreshLoop;
use diarydrift_core::theme::Theme;
use diarydrift_core::{AppContext, DatabaseService};

use crate::commands::common::{preview, relative_time_label, short_id};
use crate::error::CliError;

const BAR_WIDTH: usize = 20;
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub async fn run_home(
    db: &DatabaseService,
    context: &AppContext,
    as_json: bool,
    watch: bool,
    interval_secs: Option<u64>,
) -> Result<(), CliError> {
    if watch {
        let interval = interval_secs.unwrap_or(context.settings().refresh_interval_secs);
        return watch_home(db, context, as_json, Duration::from_secs(interval)).await;
    }

    let summary = {
        let _loading = context.begin_loading();
        load_home_summary(db)
            .await
            .map_err(CliError::backend("Could not load journal entries."))?
    };
    print_summary(&summary, context.theme(), as_json, false)
}

async fn watch_home(
    db: &DatabaseService,
    context: &AppContext,
    as_json: bool,
    interval: Duration,
) -> Result<(), CliError> {
    let refresh = RefreshLoop::new(interval);
    tracing::info!(
        "Refreshing home every {}s, press Ctrl-C to stop",
        refresh.interval().as_secs()
    );

    let theme = context.theme();
    let fetch = || {
        let db = db.clone();
        let context = context.clone();
        async move {
            let _loading = context.begin_loading();
            load_home_summary(&db).await
        }
    };
    let on_update = |result: diarydrift_core::Result<HomeSummary>| match result {
        Ok(summary) => {
            if let Err(error) = print_summary(&summary, theme, as_json, !as_json) {
                tracing::error!("Failed to render home summary: {}", error);
            }
        }
        Err(error) => {
            tracing::error!("Home refresh failed: {}", error);
            eprintln!("Error: Could not load journal entries.");
        }
    };
    let shutdown = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", error);
            std::future::pending::<()>().await;
        }
    };

    let applied = refresh.run(fetch, on_update, shutdown).await;
    tracing::info!("Stopped watching after {} refreshes", applied);
    Ok(())
}

fn print_summary(
    summary: &HomeSummary,
    theme: Theme,
    as_json: bool,
    clear_screen: bool,
) -> Result<(), CliError> {
    if as_json {
        println!("{}", serde_json::to_string(summary)?);
        return Ok(());
    }

    if clear_screen {
        print!("{CLEAR_SCREEN}");
    }
    print!("{}", render_home(summary, theme));
    Ok(())
}

/// Plain-text home screen: recent entries, then the mood breakdown.
pub fn render_home(summary: &HomeSummary, theme: Theme) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Recent entries");
    if summary.recent.is_empty() {
        let _ = writeln!(output, "  No entries yet. Add one with `diarydrift journal add`.");
    }
    for journal in &summary.recent {
        let _ = writeln!(
            output,
            "  {:<13}  {:<32}  {:<10}  {}",
            short_id(&journal.id.as_str()),
            preview(&journal.title, 32),
            relative_time_label(journal.created_at()),
            theme.mood_label(journal.mood)
        );
    }

    let counted: usize = summary.moods.iter().map(|share| share.count).sum();
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Mood distribution ({counted} of {} entries)",
        summary.total_entries
    );
    if summary.moods.is_empty() {
        let _ = writeln!(output, "  No moods recorded yet.");
    }
    for share in &summary.moods {
        let _ = writeln!(
            output,
            "  {}  {} {:>3}% ({})",
            theme.percentage_bar(share.mood, share.percentage, BAR_WIDTH),
            theme.mood_label(Some(share.mood)),
            share.percentage,
            share.count
        );
    }

    if let Some(mood) = summary.most_common_mood {
        let _ = writeln!(output);
        let _ = writeln!(output, "Most common mood: {}", theme.mood_label(Some(mood)));
    }

    output
}
