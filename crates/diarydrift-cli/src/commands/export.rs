use std::path::{Path, PathBuf};

use chrono::Utc;
use diarydrift_core::export::{
    render_journals_export, suggested_export_file_name, ExportFormat as CoreExportFormat,
    ExportOptions,
};
use diarydrift_core::DatabaseService;

use crate::cli::ExportFormat;
use crate::error::CliError;

impl From<ExportFormat> for CoreExportFormat {
    fn from(value: ExportFormat) -> Self {
        match value {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

pub async fn run_export(
    db: &DatabaseService,
    format: ExportFormat,
    output_path: Option<&Path>,
    include_media: bool,
) -> Result<(), CliError> {
    let journals = db
        .list_journals()
        .await
        .map_err(CliError::backend("Could not load journal entries."))?;
    let format = CoreExportFormat::from(format);
    let rendered = render_journals_export(&journals, format, ExportOptions { include_media })?;

    if let Some(path) = output_path {
        let path = resolve_output_path(path, format);
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

/// A directory target gets a timestamped file name inside it.
fn resolve_output_path(path: &Path, format: CoreExportFormat) -> PathBuf {
    if path.is_dir() {
        path.join(suggested_export_file_name(
            format,
            Utc::now().timestamp_millis(),
        ))
    } else {
        path.to_path_buf()
    }
}
