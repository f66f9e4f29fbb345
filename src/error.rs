use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool reads workbooks, loads roster snapshots, or talks to the browser.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a workbook does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a requested sheet is missing from the workbook.
    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    /// Raised when a header-title lookup finds no matching column.
    #[error("column '{column}' not found in sheet '{sheet}'")]
    ColumnNotFound { sheet: String, column: String },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Errors from the remote-debugging HTTP endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Raised when no open page matches the requested URL fragment.
    #[error("no open page matches '{0}'")]
    PageNotFound(String),

    /// Raised when a DevTools protocol exchange fails.
    #[error("devtools error: {0}")]
    Devtools(String),

    /// Raised when the interrupt handler cannot be installed.
    #[error("failed to install interrupt handler: {0}")]
    Interrupt(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
