//! Host capabilities used by the side-effect actions (share, copy, download)
//!
//! The embedding application implements [`Platform`] on top of whatever its
//! runtime offers (Web Share API, clipboard, file save dialog).

use serde::Serialize;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: Option<String>,
}

impl SharePayload {
    /// Single-string form used when falling back to the clipboard
    pub fn to_clipboard_text(&self) -> String {
        match &self.url {
            Some(url) => format!("{}\n{}\n{}", self.title, self.text, url),
            None => format!("{}\n{}", self.title, self.text),
        }
    }
}

/// A client-side file download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Download {
    pub file_name: String,
    pub content_type: String,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait Platform: Send + Sync {
    /// Whether a native share sheet is available
    fn can_share(&self) -> bool;

    fn share(&self, payload: &SharePayload) -> AppResult<()>;

    fn copy_to_clipboard(&self, text: &str) -> AppResult<()>;

    fn offer_download(&self, download: &Download) -> AppResult<()>;
}
