use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use crate::models::StudentForm;
use crate::records::Records;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub rejected: usize,
}

/// Rows that fail validation are skipped; store failures abort the import.
pub async fn import_students(records: &Records, csv_path: &Path) -> anyhow::Result<ImportSummary> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut summary = ImportSummary::default();

    for (index, result) in reader.deserialize::<StudentForm>().enumerate() {
        let line = index + 2;
        let form = match result {
            Ok(form) => form,
            Err(err) => {
                warn!(line, error = %err, "skipping unreadable row");
                summary.rejected += 1;
                continue;
            }
        };

        match records.save_student(Some(form.email.as_str()), &form).await {
            Ok(_) => summary.imported += 1,
            Err(err) if err.is_transient() => {
                return Err(err).with_context(|| format!("store failed at line {line}"));
            }
            Err(err) => {
                warn!(line, email = %form.email, error = %err, "skipping invalid row");
                summary.rejected += 1;
            }
        }
    }

    info!(
        path = %csv_path.display(),
        imported = summary.imported,
        rejected = summary.rejected,
        "imported students"
    );
    Ok(summary)
}
