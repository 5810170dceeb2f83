//! Pass-through CSV export of the in-scope rows.
//!
//! The header and cell text are written back exactly as ingested; nothing is
//! re-derived from the typed records.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::session::Snapshot;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Write the snapshot's header and rows to `writer`.
pub fn write_csv<W: Write>(snapshot: &Snapshot<'_>, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(snapshot.headers())?;
    for row in snapshot.rows() {
        wtr.write_record(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Export to a file, creating parent directories as needed.
pub fn export_to_path(snapshot: &Snapshot<'_>, path: &Path) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    write_csv(snapshot, file)?;
    info!(path = %path.display(), rows = snapshot.len(), "exported portfolio subset");
    Ok(())
}

/// `msme_portfolio_YYYYMMDD_HHMMSS.csv`
pub fn default_export_name(now: NaiveDateTime) -> String {
    format!("msme_portfolio_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
