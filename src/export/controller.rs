use anyhow::Result;
use std::fmt;
use tracing::{debug, error, info};

use crate::export::artifact::ExportFormat;

pub const IDLE_LABEL: &str = "Export";
pub const BUSY_LABEL: &str = "Exporting...";

/// Outcome of one export request, for the host to surface to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportNotice {
    Completed { format: ExportFormat, file_name: String },
    Failed { format: ExportFormat, message: String },
    /// The control was disabled or an export was already running
    Rejected,
}

impl ExportNotice {
    pub fn is_success(&self) -> bool {
        matches!(self, ExportNotice::Completed { .. })
    }
}

impl fmt::Display for ExportNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportNotice::Completed { file_name, .. } => write!(f, "Exported {}", file_name),
            ExportNotice::Failed { format, message } => {
                write!(f, "{} export failed: {}", format.extension().to_uppercase(), message)
            }
            ExportNotice::Rejected => f.write_str("Export unavailable"),
        }
    }
}

/// State behind an export button with a format menu
#[derive(Debug, Clone, Default)]
pub struct ExportController {
    label: Option<String>,
    menu_open: bool,
    exporting: bool,
    disabled: bool,
}

impl ExportController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle label override, e.g. "Export Report"
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.menu_open = false;
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled || self.exporting
    }

    pub fn is_busy(&self) -> bool {
        self.exporting
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) {
        if self.is_disabled() {
            return;
        }
        self.menu_open = !self.menu_open;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub fn label(&self) -> &str {
        if self.exporting {
            BUSY_LABEL
        } else {
            self.label.as_deref().unwrap_or(IDLE_LABEL)
        }
    }

    /// Run one export. The busy flag is set for the duration of `action` and
    /// cleared, with the menu closed, however the action ends.
    pub fn run<F>(&mut self, format: ExportFormat, action: F) -> ExportNotice
    where
        F: FnOnce(ExportFormat) -> Result<String>,
    {
        if self.is_disabled() {
            debug!("Ignoring {} export request while unavailable", format);
            return ExportNotice::Rejected;
        }

        let guard = BusyGuard::enter(self);
        let result = action(format);
        drop(guard);

        match result {
            Ok(file_name) => {
                info!("{} export completed: {}", format, file_name);
                ExportNotice::Completed { format, file_name }
            }
            Err(e) => {
                error!("Error exporting {}: {:#}", format, e);
                ExportNotice::Failed {
                    format,
                    message: format!("{:#}", e),
                }
            }
        }
    }
}

struct BusyGuard<'a> {
    controller: &'a mut ExportController,
}

impl<'a> BusyGuard<'a> {
    fn enter(controller: &'a mut ExportController) -> Self {
        controller.exporting = true;
        Self { controller }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.controller.exporting = false;
        self.controller.menu_open = false;
    }
}
