//! Share and copy actions

use serde::Serialize;

use crate::{
    error::AppResult,
    platform::{Platform, SharePayload},
};

/// How a share request was fulfilled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareOutcome {
    Shared,
    Copied,
}

/// Share through the native sheet when available, else copy to the clipboard.
///
/// A native share that fails (dismissed sheet, permission error) also falls
/// back to the clipboard.
pub fn share(platform: &dyn Platform, payload: &SharePayload) -> AppResult<ShareOutcome> {
    if platform.can_share() {
        match platform.share(payload) {
            Ok(()) => return Ok(ShareOutcome::Shared),
            Err(e) => tracing::debug!("Native share failed, copying instead: {}", e),
        }
    }
    platform.copy_to_clipboard(&payload.to_clipboard_text())?;
    Ok(ShareOutcome::Copied)
}

pub fn copy_text(platform: &dyn Platform, text: &str) -> AppResult<()> {
    platform.copy_to_clipboard(text)
}
