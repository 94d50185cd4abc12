use thiserror::Error;

/// Failures raised by host capabilities or by the page boundary.
///
/// A selector that matches nothing is not an error; it is reported as a
/// not-found extraction and turned into a failure notification.
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("Clipboard write failed: {0}")]
    Clipboard(String),
    #[error("Notification failed: {0}")]
    Notification(String),
    #[error("Menu update failed: {0}")]
    Menu(String),
    #[error("Settings store failed: {0}")]
    Settings(String),
    #[error("Page script failed: {0}")]
    Page(String),
    #[error("Engine is no longer running")]
    EngineStopped,
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CopyError>;
