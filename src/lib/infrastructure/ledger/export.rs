//! Failed recipients export

use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::domain::campaign::RunReport;

/// Writes the recipients that failed in `report` to `path`, one per line.
///
/// An existing file is replaced; a run without failures leaves it empty.
pub async fn export_failed(report: &RunReport, path: &Path) -> anyhow::Result<()> {
    let contents: String = report
        .failed_recipients()
        .map(|recipient| format!("{recipient}\n"))
        .collect();

    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(
        path = %path.display(),
        failed = report.summary.failed,
        "failed recipients exported"
    );

    Ok(())
}
