//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. Every upload or row-limit change recomputes the
//! report synchronously from the session.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use msme_core::data::{default_export_name, export_to_path};
use msme_core::{AnalyzerConfig, Dataset, PortfolioReport, Session};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Overview,
    Segments,
    Collections,
    Dpd,
    Data,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Overview => 0,
            Panel::Segments => 1,
            Panel::Collections => 2,
            Panel::Dpd => 3,
            Panel::Data => 4,
            Panel::Help => 5,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Overview),
            1 => Some(Panel::Segments),
            2 => Some(Panel::Collections),
            3 => Some(Panel::Dpd),
            4 => Some(Panel::Data),
            5 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Overview => "Overview",
            Panel::Segments => "Segments",
            Panel::Collections => "Collections",
            Panel::Dpd => "DPD",
            Panel::Data => "Data",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 6).unwrap_or(Panel::Overview)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 5) % 6).unwrap_or(Panel::Overview)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Export,
    Config,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Data => "DATA",
            ErrorCategory::Export => "EXP",
            ErrorCategory::Config => "CFG",
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    OpenFile,
    ErrorHistory,
}

const ERROR_HISTORY_CAP: usize = 50;

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Analysis
    pub session: Option<Session>,
    pub report: Option<PortfolioReport>,
    pub report_generated_at: Option<NaiveDateTime>,
    pub config: AnalyzerConfig,

    // Data panel
    pub data_scroll: usize,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    pub path_input: String,

    // Paths
    pub export_dir: PathBuf,
}

impl AppState {
    pub fn new(config: AnalyzerConfig, export_dir: PathBuf) -> Self {
        Self {
            active_panel: Panel::Overview,
            running: true,
            session: None,
            report: None,
            report_generated_at: None,
            config,
            data_scroll: 0,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            path_input: String::new(),
            export_dir,
        }
    }

    /// Load a CSV upload. On failure the previous session stays in place.
    pub fn load_file(&mut self, path: &Path) -> bool {
        match Dataset::from_path(path) {
            Ok(dataset) => {
                let rows = dataset.len();
                let extras = dataset.unknown_columns().len();
                let unreadable = dataset.issues().total();
                match &mut self.session {
                    Some(session) => session.replace_dataset(dataset),
                    None => self.session = Some(Session::new(dataset, self.config.clone())),
                }
                self.data_scroll = 0;
                self.recompute();

                let mut msg = format!("Loaded {rows} rows from {}", path.display());
                if extras > 0 {
                    msg.push_str(&format!(", {extras} extra columns ignored"));
                }
                if unreadable > 0 {
                    msg.push_str(&format!(", {unreadable} unreadable cells"));
                    self.set_warning(msg);
                } else {
                    self.set_status(msg);
                }
                true
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "upload rejected");
                self.push_error(
                    ErrorCategory::Data,
                    format!("Upload rejected: {err}"),
                    path.display().to_string(),
                );
                false
            }
        }
    }

    /// Re-read the current upload from disk.
    pub fn reload(&mut self) {
        let source = self
            .session
            .as_ref()
            .and_then(|s| s.dataset().source().map(Path::to_path_buf));
        match source {
            Some(path) => {
                let limit = self.row_limit();
                if self.load_file(&path) {
                    if let Some(limit) = limit {
                        self.set_row_limit(limit);
                    }
                }
            }
            None => self.set_warning("Nothing to reload; press o to open a CSV"),
        }
    }

    pub fn row_limit(&self) -> Option<usize> {
        self.session.as_ref().map(Session::row_limit)
    }

    pub fn set_row_limit(&mut self, limit: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let before = session.row_limit();
        if session.set_row_limit(limit) != before {
            self.recompute();
        }
    }

    /// Move the slider one step; `up` raises the limit.
    pub fn step_row_limit(&mut self, up: bool) {
        if let Some(session) = &self.session {
            let bounds = session.bounds();
            let current = session.row_limit();
            let next = if up {
                bounds.step_up(current)
            } else {
                bounds.step_down(current)
            };
            self.set_row_limit(next);
        }
    }

    pub fn recompute(&mut self) {
        self.report = self.session.as_ref().map(Session::report);
        self.report_generated_at = self
            .report
            .as_ref()
            .map(|_| chrono::Local::now().naive_local());
        let rows = self.data_rows();
        if self.data_scroll >= rows {
            self.data_scroll = rows.saturating_sub(1);
        }
    }

    /// Rows visible in the raw data view.
    pub fn data_rows(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.snapshot().len())
    }

    /// Export the in-scope rows under a timestamped name.
    pub fn export(&mut self) {
        let Some(session) = &self.session else {
            self.set_warning("Nothing to export; press o to open a CSV");
            return;
        };
        let name = default_export_name(chrono::Local::now().naive_local());
        let path = self.export_dir.join(name);
        let snapshot = session.snapshot();
        let rows = snapshot.len();
        match export_to_path(&snapshot, &path) {
            Ok(()) => {
                info!(path = %path.display(), rows, "dashboard export");
                self.set_status(format!("Exported {rows} rows to {}", path.display()));
            }
            Err(err) => {
                self.push_error(
                    ErrorCategory::Export,
                    format!("Export failed: {err}"),
                    path.display().to_string(),
                );
            }
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
